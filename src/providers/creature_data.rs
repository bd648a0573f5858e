//! Creature data for new boards.
//!
//! `CreatureDataProvider` is what the round controller consumes: it yields
//! exactly `pair_count` distinct creatures or a `DataError`. `CatalogProvider`
//! builds that contract on top of a raw, fallible `CreatureCatalog` by adding
//! retries and evolution lookups.

use tracing::{debug, error, warn};

use crate::cards::{Creature, CreatureId, CreatureIdentity};
use crate::error::{DataError, FetchError};

use super::retry::{RetryPolicy, Sleeper, ThreadSleeper};

/// Source of board creatures.
pub trait CreatureDataProvider {
    /// Fetch `pair_count` creatures starting at catalog position `offset`.
    fn fetch_board_creatures(
        &mut self,
        pair_count: usize,
        offset: u32,
    ) -> Result<Vec<Creature>, DataError>;
}

impl<P: CreatureDataProvider + ?Sized> CreatureDataProvider for Box<P> {
    fn fetch_board_creatures(
        &mut self,
        pair_count: usize,
        offset: u32,
    ) -> Result<Vec<Creature>, DataError> {
        (**self).fetch_board_creatures(pair_count, offset)
    }
}

/// Raw creature catalog, one request per call. Any failure is transient.
pub trait CreatureCatalog {
    /// List up to `limit` creatures starting at `offset`.
    fn list_creatures(&mut self, limit: usize, offset: u32)
        -> Result<Vec<CreatureIdentity>, FetchError>;

    /// The creature `creature_id` evolves into, if any.
    fn evolution_of(&mut self, creature_id: CreatureId)
        -> Result<Option<CreatureIdentity>, FetchError>;
}

/// A `CreatureDataProvider` over a `CreatureCatalog`.
///
/// The page listing must succeed within the retry budget. Evolution lookups
/// are best effort: one that still fails after retries leaves the creature
/// without an evolution target.
#[derive(Clone, Debug)]
pub struct CatalogProvider<C, W = ThreadSleeper> {
    catalog: C,
    retry: RetryPolicy,
    sleeper: W,
}

impl<C> CatalogProvider<C> {
    /// Provider with the default retry policy, waiting on the calling thread.
    ///
    /// Retries block with `std::thread::sleep`: with default settings a
    /// failing lookup holds the caller for up to 6s, and a deal performs one
    /// evolution lookup per pair. Hosts that deal from a UI thread should
    /// inject their own `Sleeper`.
    ///
    /// ```
    /// use creature_match::providers::{
    ///     CatalogProvider, CreatureDataProvider, RecordingSleeper, StaticCatalog,
    /// };
    ///
    /// let mut catalog = StaticCatalog::generated(20);
    /// catalog.fail_next_evolutions(1);
    /// let mut provider = CatalogProvider::new(catalog).with_sleeper(RecordingSleeper::new());
    ///
    /// provider.fetch_board_creatures(3, 0).unwrap();
    /// assert_eq!(provider.sleeper().slept().len(), 1);
    /// ```
    #[must_use]
    pub fn new(catalog: C) -> Self {
        Self {
            catalog,
            retry: RetryPolicy::default(),
            sleeper: ThreadSleeper,
        }
    }
}

impl<C, W> CatalogProvider<C, W> {
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replace the sleeper, e.g. with a `RecordingSleeper` in tests.
    #[must_use]
    pub fn with_sleeper<W2>(self, sleeper: W2) -> CatalogProvider<C, W2> {
        CatalogProvider {
            catalog: self.catalog,
            retry: self.retry,
            sleeper,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut C {
        &mut self.catalog
    }

    #[must_use]
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    #[must_use]
    pub fn sleeper(&self) -> &W {
        &self.sleeper
    }
}

impl<C: CreatureCatalog, W: Sleeper> CreatureDataProvider for CatalogProvider<C, W> {
    fn fetch_board_creatures(
        &mut self,
        pair_count: usize,
        offset: u32,
    ) -> Result<Vec<Creature>, DataError> {
        let catalog = &mut self.catalog;
        let page = self
            .retry
            .run(&mut self.sleeper, "list_creatures", || {
                catalog.list_creatures(pair_count, offset)
            })?;

        if page.len() != pair_count {
            error!(
                expected = pair_count,
                got = page.len(),
                offset,
                "catalog returned a short page"
            );
            return Err(DataError::WrongLength {
                expected: pair_count,
                got: page.len(),
            });
        }

        let mut creatures = Vec::with_capacity(pair_count);
        for identity in page {
            let id = identity.creature_id;
            let lookup = self
                .retry
                .run(&mut self.sleeper, "evolution_of", || catalog.evolution_of(id));
            let creature = match lookup {
                Ok(Some(target)) => Creature::new(identity).with_evolution(target),
                Ok(None) => Creature::new(identity),
                Err(err) => {
                    warn!(
                        creature = %id,
                        error = %err,
                        "evolution lookup failed, dealing without evolution"
                    );
                    Creature::new(identity)
                }
            };
            creatures.push(creature);
        }

        debug!(pair_count, offset, "fetched board creatures");
        Ok(creatures)
    }
}
