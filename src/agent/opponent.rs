//! Computer opponent for vs-computer rounds.
//!
//! The agent only *chooses* positions. The controller submits every choice
//! through the same flip path a human uses and feeds accepted flips back via
//! [`OpponentAgent::observe`].
//!
//! ## Turn shape
//!
//! 1. `plan_turn` decides once per turn whether memory is used (probability
//!    from [`AiSkill::memory_use_probability`]) and returns either a known
//!    pair or a random first card.
//! 2. For an exploring turn, `choose_second` picks the partner: a remembered
//!    position of the same creature when memory is in use, otherwise a
//!    random available card.

use tracing::debug;

use crate::board::Board;
use crate::cards::CreatureId;
use crate::core::GameRng;
use crate::difficulty::AiSkill;

use super::memory::AgentMemory;

/// What the agent intends to flip this turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnPlan {
    /// Both positions are remembered and hold the same creature.
    KnownPair { first: usize, second: usize },

    /// First card is a guess; the second is chosen after it is seen.
    Explore { first: usize },
}

impl TurnPlan {
    #[must_use]
    pub fn first(self) -> usize {
        match self {
            TurnPlan::KnownPair { first, .. } | TurnPlan::Explore { first } => first,
        }
    }
}

#[derive(Clone, Debug)]
pub struct OpponentAgent {
    skill: AiSkill,
    memory: AgentMemory,
    rng: GameRng,
    use_memory_this_turn: bool,
}

impl OpponentAgent {
    #[must_use]
    pub fn new(skill: AiSkill, rng: GameRng) -> Self {
        Self {
            skill,
            memory: AgentMemory::new(),
            rng,
            use_memory_this_turn: false,
        }
    }

    #[must_use]
    pub fn skill(&self) -> AiSkill {
        self.skill
    }

    pub fn set_skill(&mut self, skill: AiSkill) {
        self.skill = skill;
    }

    #[must_use]
    pub fn memory(&self) -> &AgentMemory {
        &self.memory
    }

    /// Forget everything. Call whenever the agent's board is replaced.
    pub fn reset(&mut self) {
        self.memory.clear();
        self.use_memory_this_turn = false;
    }

    /// Record a card the agent has flipped.
    pub fn observe(&mut self, index: usize, creature_id: CreatureId) {
        self.memory.observe(index, creature_id);
    }

    /// Decide the opening move of a turn. `None` if nothing is flippable.
    pub fn plan_turn(&mut self, board: &Board) -> Option<TurnPlan> {
        self.use_memory_this_turn = self.rng.gen_bool(self.skill.memory_use_probability());

        if self.use_memory_this_turn {
            if let Some([first, second]) = self.memory.known_pair(board) {
                debug!(skill = ?self.skill, first, second, "agent plays a remembered pair");
                return Some(TurnPlan::KnownPair { first, second });
            }
        }

        let available = board.available_positions();
        let first = *self.rng.choose(&available)?;
        debug!(
            skill = ?self.skill,
            first,
            use_memory = self.use_memory_this_turn,
            "agent explores"
        );
        Some(TurnPlan::Explore { first })
    }

    /// Pick the second card of an exploring turn once `first` is face up.
    pub fn choose_second(&mut self, board: &Board, first: usize) -> Option<usize> {
        if self.use_memory_this_turn {
            let partner = board
                .card(first)
                .and_then(|card| self.memory.partner_of(board, first, card.creature_id()));
            if let Some(second) = partner {
                debug!(first, second, "agent recalls the partner");
                return Some(second);
            }
        }

        let candidates: Vec<usize> = board
            .available_positions()
            .into_iter()
            .filter(|&i| i != first)
            .collect();
        self.rng.choose(&candidates).copied()
    }
}
