//! Durable player progress: per-mode high scores and the highest level reached.
//!
//! Reads never fail. A missing or unreadable record reads as defaults
//! (score 0, level 1) so a broken store cannot stop a round; writes report
//! their errors and the controller logs them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::core::GameMode;
use crate::error::PersistenceError;

/// Key-value store for progress that outlives a round.
pub trait PersistenceStore {
    /// Stored high score for `mode`, 0 if none.
    fn high_score(&mut self, mode: GameMode) -> u32;

    fn set_high_score(&mut self, mode: GameMode, score: u32) -> Result<(), PersistenceError>;

    /// Highest level ever started, 1 if none.
    fn highest_level_reached(&mut self) -> u32;

    /// Record `level` if it is higher than the stored value.
    fn set_highest_level_reached(&mut self, level: u32) -> Result<(), PersistenceError>;

    fn clear_all(&mut self) -> Result<(), PersistenceError>;
}

impl<S: PersistenceStore + ?Sized> PersistenceStore for Box<S> {
    fn high_score(&mut self, mode: GameMode) -> u32 {
        (**self).high_score(mode)
    }

    fn set_high_score(&mut self, mode: GameMode, score: u32) -> Result<(), PersistenceError> {
        (**self).set_high_score(mode, score)
    }

    fn highest_level_reached(&mut self) -> u32 {
        (**self).highest_level_reached()
    }

    fn set_highest_level_reached(&mut self, level: u32) -> Result<(), PersistenceError> {
        (**self).set_highest_level_reached(level)
    }

    fn clear_all(&mut self) -> Result<(), PersistenceError> {
        (**self).clear_all()
    }
}

/// The persisted record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredProgress {
    pub high_scores: BTreeMap<GameMode, u32>,
    /// 0 means never recorded.
    pub highest_level: u32,
}

impl StoredProgress {
    #[must_use]
    pub fn high_score(&self, mode: GameMode) -> u32 {
        self.high_scores.get(&mode).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn highest_level(&self) -> u32 {
        self.highest_level.max(1)
    }

    /// Returns whether the record changed.
    pub fn raise_level(&mut self, level: u32) -> bool {
        if level > self.highest_level {
            self.highest_level = level;
            true
        } else {
            false
        }
    }
}

/// Process-local store. Nothing survives the process.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    progress: StoredProgress,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn progress(&self) -> &StoredProgress {
        &self.progress
    }
}

impl PersistenceStore for MemoryStore {
    fn high_score(&mut self, mode: GameMode) -> u32 {
        self.progress.high_score(mode)
    }

    fn set_high_score(&mut self, mode: GameMode, score: u32) -> Result<(), PersistenceError> {
        self.progress.high_scores.insert(mode, score);
        Ok(())
    }

    fn highest_level_reached(&mut self) -> u32 {
        self.progress.highest_level()
    }

    fn set_highest_level_reached(&mut self, level: u32) -> Result<(), PersistenceError> {
        self.progress.raise_level(level);
        Ok(())
    }

    fn clear_all(&mut self) -> Result<(), PersistenceError> {
        self.progress = StoredProgress::default();
        Ok(())
    }
}

/// Bincode-encoded progress in a single file.
///
/// The file is read on first access and cached; every write rewrites it.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
    cache: Option<StoredProgress>,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: None,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn progress(&mut self) -> &mut StoredProgress {
        let path = &self.path;
        self.cache.get_or_insert_with(|| read_progress(path))
    }

    fn save(&mut self) -> Result<(), PersistenceError> {
        let bytes = bincode::serialize(&*self.progress())?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, bytes)?;
        Ok(())
    }
}

fn read_progress(path: &Path) -> StoredProgress {
    match fs::read(path) {
        Ok(bytes) => bincode::deserialize(&bytes).unwrap_or_else(|err| {
            warn!(
                path = %path.display(),
                error = %err,
                "stored progress is corrupt, starting fresh"
            );
            StoredProgress::default()
        }),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no stored progress yet");
            StoredProgress::default()
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                error = %err,
                "stored progress unreadable, starting fresh"
            );
            StoredProgress::default()
        }
    }
}

impl PersistenceStore for FileStore {
    fn high_score(&mut self, mode: GameMode) -> u32 {
        self.progress().high_score(mode)
    }

    fn set_high_score(&mut self, mode: GameMode, score: u32) -> Result<(), PersistenceError> {
        self.progress().high_scores.insert(mode, score);
        self.save()
    }

    fn highest_level_reached(&mut self) -> u32 {
        self.progress().highest_level()
    }

    fn set_highest_level_reached(&mut self, level: u32) -> Result<(), PersistenceError> {
        if self.progress().raise_level(level) {
            self.save()?;
        }
        Ok(())
    }

    fn clear_all(&mut self) -> Result<(), PersistenceError> {
        self.cache = Some(StoredProgress::default());
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_defaults() {
        let mut store = MemoryStore::new();

        for mode in GameMode::ALL {
            assert_eq!(store.high_score(mode), 0);
        }
        assert_eq!(store.highest_level_reached(), 1);
    }

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        store.set_high_score(GameMode::Single, 120).unwrap();
        store.set_highest_level_reached(4).unwrap();
        store.set_highest_level_reached(2).unwrap();

        assert_eq!(store.high_score(GameMode::Single), 120);
        assert_eq!(store.high_score(GameMode::VsComputer), 0);
        assert_eq!(store.highest_level_reached(), 4);

        store.clear_all().unwrap();
        assert_eq!(store.high_score(GameMode::Single), 0);
        assert_eq!(store.highest_level_reached(), 1);
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("progress.bin");

        let mut store = FileStore::new(&path);
        assert_eq!(store.high_score(GameMode::VsComputer), 0);
        store.set_high_score(GameMode::VsComputer, 340).unwrap();
        store.set_highest_level_reached(6).unwrap();

        let mut reopened = FileStore::new(&path);
        assert_eq!(reopened.high_score(GameMode::VsComputer), 340);
        assert_eq!(reopened.highest_level_reached(), 6);
    }

    #[test]
    fn test_file_store_clear_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.bin");

        let mut store = FileStore::new(&path);
        store.set_high_score(GameMode::Single, 10).unwrap();
        assert!(path.exists());

        store.clear_all().unwrap();
        assert!(!path.exists());
        assert_eq!(store.high_score(GameMode::Single), 0);

        // Clearing twice is fine
        store.clear_all().unwrap();
    }

    #[test]
    fn test_file_store_tolerates_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.bin");
        fs::write(&path, [0xff; 3]).unwrap();

        let mut store = FileStore::new(&path);
        assert_eq!(store.high_score(GameMode::Single), 0);
        assert_eq!(store.highest_level_reached(), 1);

        store.set_high_score(GameMode::Single, 55).unwrap();
        assert_eq!(FileStore::new(&path).high_score(GameMode::Single), 55);
    }
}
