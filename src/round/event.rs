//! Observable round transitions.
//!
//! The controller appends one event per transition; hosts drain them with
//! `RoundController::drain_events` to drive animation and sound.

use serde::{Deserialize, Serialize};

use crate::cards::{CreatureId, CreatureIdentity};
use crate::core::{GameMode, PlayerSlot};
use crate::error::DataError;

/// Outcome of a finished round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundResult {
    Winner(PlayerSlot),
    Draw,
}

impl RoundResult {
    #[must_use]
    pub fn winner(self) -> Option<PlayerSlot> {
        match self {
            RoundResult::Winner(slot) => Some(slot),
            RoundResult::Draw => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoundEvent {
    RoundStarted {
        mode: GameMode,
    },
    LevelStarted {
        level: u32,
        pair_count: usize,
    },
    CardFlipped {
        slot: PlayerSlot,
        index: usize,
        creature_id: CreatureId,
    },
    PairSelected {
        slot: PlayerSlot,
        first: usize,
        second: usize,
        is_match: bool,
    },
    Matched {
        slot: PlayerSlot,
        indices: [usize; 2],
        multiplier: u32,
        points: u32,
        score: u32,
    },
    /// Show the evolution, then call `resolve_evolution`.
    EvolutionPending {
        slot: PlayerSlot,
        indices: [usize; 2],
        target: CreatureIdentity,
    },
    Evolved {
        slot: PlayerSlot,
        indices: [usize; 2],
        identity: CreatureIdentity,
    },
    /// A mismatched pair turned face down again.
    CardsHidden {
        slot: PlayerSlot,
        indices: [usize; 2],
    },
    /// A lone selected card turned back down because the turn passed.
    SelectionAbandoned {
        slot: PlayerSlot,
        index: usize,
    },
    TurnPassed {
        from: PlayerSlot,
        to: PlayerSlot,
    },
    LevelCompleted {
        level: u32,
        by: PlayerSlot,
    },
    RoundComplete {
        result: RoundResult,
    },
    NewHighScore {
        mode: GameMode,
        score: u32,
    },
    /// Boards could not be dealt; offer `retry`.
    DataUnavailable {
        error: DataError,
    },
}
