//! Collaborators at the edge of the engine.
//!
//! ## Creature data
//!
//! - `CreatureDataProvider`: what the round controller consumes
//! - `CreatureCatalog`: a raw, fallible catalog
//! - `CatalogProvider`: catalog plus `RetryPolicy` plus evolution lookups
//! - `StaticCatalog`: deterministic in-memory catalog
//!
//! ## Persistence
//!
//! - `PersistenceStore`: high scores and highest level
//! - `MemoryStore`, `FileStore`: process-local and bincode-file backings

pub mod catalog;
pub mod creature_data;
pub mod persistence;
pub mod retry;

pub use catalog::StaticCatalog;
pub use creature_data::{CatalogProvider, CreatureCatalog, CreatureDataProvider};
pub use persistence::{FileStore, MemoryStore, PersistenceStore, StoredProgress};
pub use retry::{Backoff, RecordingSleeper, RetryPolicy, Sleeper, ThreadSleeper};
