//! Engine configuration.
//!
//! Hosts configure a round at construction by providing an `EngineConfig`:
//! - `Timings`: the user-perceptible delays between a flip and its resolution
//! - the RNG seed, opponent skill override and seat, and the round endpoint
//!
//! All delays are virtual: they only elapse when the host advances the
//! controller's clock, so tests can run a whole round instantly.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::player::PlayerSlot;
use crate::difficulty::AiSkill;

/// Delays used by the resolver, the controller and the computer opponent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timings {
    /// Two matching cards stay face up this long before they are marked matched.
    pub match_reveal: Duration,

    /// Two mismatched cards stay face up this long before they turn back over.
    pub no_match_reveal: Duration,

    /// Pause between the final match on a board and the level-complete signal.
    pub level_complete: Duration,

    /// Length of the level-up acknowledgment between two levels.
    pub level_up: Duration,

    /// Opponent "thinking" time before its first flip.
    pub agent_think: Duration,

    /// Opponent pause between its first and second flip.
    pub agent_second_flip: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            match_reveal: Duration::from_millis(1000),
            no_match_reveal: Duration::from_millis(1500),
            level_complete: Duration::from_millis(800),
            level_up: Duration::from_millis(3000),
            agent_think: Duration::from_millis(1500),
            agent_second_flip: Duration::from_millis(1000),
        }
    }
}

impl Timings {
    /// All delays set to zero. Deferred work still runs through the
    /// scheduler, but fires on the next `advance`.
    #[must_use]
    pub fn instant() -> Self {
        Self {
            match_reveal: Duration::ZERO,
            no_match_reveal: Duration::ZERO,
            level_complete: Duration::ZERO,
            level_up: Duration::ZERO,
            agent_think: Duration::ZERO,
            agent_second_flip: Duration::ZERO,
        }
    }
}

/// Complete engine configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub timings: Timings,

    /// Seed for shuffles, catalog offsets and opponent decisions.
    /// Same seed and same inputs produce the same round.
    pub seed: u64,

    /// Skill chosen by the user. `None` lets skill escalate with the level.
    pub ai_skill: Option<AiSkill>,

    /// Seat played by the computer in vs-computer rounds.
    pub agent_slot: PlayerSlot,

    /// Completing this level ends the round. `None` plays forever.
    pub final_level: Option<u32>,

    /// When set, pending evolutions resolve on their own after this delay
    /// instead of waiting for the presentation layer.
    pub auto_resolve_evolution: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timings: Timings::default(),
            seed: 42,
            ai_skill: None,
            agent_slot: PlayerSlot::Player2,
            final_level: Some(10),
            auto_resolve_evolution: None,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }

    /// Pin the opponent's skill instead of escalating it per level.
    #[must_use]
    pub fn with_ai_skill(mut self, skill: AiSkill) -> Self {
        self.ai_skill = Some(skill);
        self
    }

    #[must_use]
    pub fn with_agent_slot(mut self, slot: PlayerSlot) -> Self {
        self.agent_slot = slot;
        self
    }

    #[must_use]
    pub fn with_final_level(mut self, level: Option<u32>) -> Self {
        self.final_level = level;
        self
    }

    #[must_use]
    pub fn with_auto_resolve_evolution(mut self, delay: Duration) -> Self {
        self.auto_resolve_evolution = Some(delay);
        self
    }
}
