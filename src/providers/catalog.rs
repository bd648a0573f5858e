//! Deterministic in-memory catalog.

use rustc_hash::FxHashMap;

use crate::cards::{CreatureId, CreatureIdentity};
use crate::error::FetchError;

use super::creature_data::CreatureCatalog;

/// A fixed list of creatures with optional evolution links.
///
/// Paging wraps around the end of the list, so any offset yields a full
/// page as long as `limit` does not exceed the catalog size. Transient
/// failures can be queued to exercise retry paths.
#[derive(Clone, Debug, Default)]
pub struct StaticCatalog {
    entries: Vec<CreatureIdentity>,
    evolutions: FxHashMap<CreatureId, CreatureIdentity>,
    failing_listings: u32,
    failing_evolutions: u32,
    listing_calls: u32,
}

impl StaticCatalog {
    /// Creatures `#1..=#size` named `creature-N`.
    #[must_use]
    pub fn generated(size: u32) -> Self {
        let entries = (1..=size)
            .map(|n| {
                CreatureIdentity::new(
                    CreatureId::new(n),
                    format!("creature-{n}"),
                    format!("creatures/{n}.png"),
                )
            })
            .collect();
        Self::from_entries(entries)
    }

    #[must_use]
    pub fn from_entries(entries: Vec<CreatureIdentity>) -> Self {
        Self {
            entries,
            ..Self::default()
        }
    }

    /// Link `from` to evolve into `to`. Unknown ids are ignored.
    #[must_use]
    pub fn with_evolution(mut self, from: CreatureId, to: CreatureId) -> Self {
        if let Some(target) = self.entries.iter().find(|e| e.creature_id == to).cloned() {
            self.evolutions.insert(from, target);
        }
        self
    }

    /// Three-stage chains: `#1 -> #2 -> #3`, `#4 -> #5 -> #6`, ...
    #[must_use]
    pub fn with_generated_evolutions(mut self) -> Self {
        let ids: Vec<CreatureId> = self.entries.iter().map(|e| e.creature_id).collect();
        for id in ids {
            if id.raw() % 3 != 0 {
                self = self.with_evolution(id, CreatureId::new(id.raw() + 1));
            }
        }
        self
    }

    /// Fail the next `count` listing calls.
    pub fn fail_next_listings(&mut self, count: u32) {
        self.failing_listings = count;
    }

    /// Fail the next `count` evolution lookups.
    pub fn fail_next_evolutions(&mut self, count: u32) {
        self.failing_evolutions = count;
    }

    /// Listing calls served or failed so far.
    #[must_use]
    pub fn listing_calls(&self) -> u32 {
        self.listing_calls
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CreatureCatalog for StaticCatalog {
    fn list_creatures(
        &mut self,
        limit: usize,
        offset: u32,
    ) -> Result<Vec<CreatureIdentity>, FetchError> {
        self.listing_calls += 1;
        if self.failing_listings > 0 {
            self.failing_listings -= 1;
            return Err(FetchError(format!("listing at offset {offset} unavailable")));
        }
        if self.entries.is_empty() {
            return Ok(Vec::new());
        }

        let start = offset as usize % self.entries.len();
        Ok(self
            .entries
            .iter()
            .cycle()
            .skip(start)
            .take(limit)
            .cloned()
            .collect())
    }

    fn evolution_of(
        &mut self,
        creature_id: CreatureId,
    ) -> Result<Option<CreatureIdentity>, FetchError> {
        if self.failing_evolutions > 0 {
            self.failing_evolutions -= 1;
            return Err(FetchError(format!("evolution of {creature_id} unavailable")));
        }
        Ok(self.evolutions.get(&creature_id).cloned())
    }
}
