//! Error taxonomy.
//!
//! Two families live here:
//!
//! - **Absorbed**: `FlipRejected` and `StaleResolution` describe races between
//!   asynchronous input and deferred resolution. The controller logs and
//!   drops them; they never reach the user.
//! - **Surfaced**: `DataError`, `PersistenceError` and `RoundError` cross the
//!   controller boundary so the host can offer a retry or report a fault.

use thiserror::Error;

use crate::cards::CreatureId;

/// A flip request that was ignored.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FlipRejected {
    #[error("card index {index} is out of range for a board of {len} cards")]
    OutOfRange { index: usize, len: usize },

    #[error("card {0} is already matched")]
    AlreadyMatched(usize),

    #[error("card {0} is already face up")]
    AlreadyFaceUp(usize),

    #[error("input is locked while a pair resolves")]
    InputLocked,

    #[error("two cards are already selected")]
    SelectionFull,

    #[error("no level is in play")]
    NotPlaying,

    #[error("it is not this seat's turn")]
    NotYourTurn,
}

/// A deferred resolution that no longer applies to the board it targets.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StaleResolution {
    #[error("resolution for board generation {expected}, current generation is {actual}")]
    Replaced { expected: u64, actual: u64 },

    #[error("no evolution is pending for cards {0:?}")]
    NotPending([usize; 2]),
}

/// Transport-level failure from a creature catalog. Always treated as transient.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("catalog fetch failed: {0}")]
pub struct FetchError(pub String);

/// Failure to produce board creatures.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DataError {
    /// Retries exhausted; the host should offer a retry.
    #[error("creature data unavailable after {attempts} attempts: {reason}")]
    Unavailable { attempts: u32, reason: String },

    /// The provider broke its contract on the number of creatures.
    #[error("provider returned {got} creatures, expected {expected}")]
    WrongLength { expected: usize, got: usize },

    /// The provider returned the same creature twice.
    #[error("provider returned creature {0} more than once")]
    DuplicateCreature(CreatureId),
}

impl DataError {
    /// Whether the failure is a retryable outage rather than a contract violation.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, DataError::Unavailable { .. })
    }
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored progress could not be encoded: {0}")]
    Encode(#[from] bincode::Error),
}

/// Errors returned by `RoundController` operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RoundError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error("retry is only possible after a data failure")]
    NotRetryable,

    #[error("no round is in progress")]
    NoRound,
}
