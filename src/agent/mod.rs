//! Computer opponent: per-turn strategy plus its private card memory.

mod memory;
mod opponent;

pub use memory::AgentMemory;
pub use opponent::{OpponentAgent, TurnPlan};
