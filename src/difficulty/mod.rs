//! Difficulty policy: level to board size, catalog offset, opponent skill
//! and scoring.
//!
//! No state. Safe to call from anywhere.

mod policy;

pub use policy::{
    ai_skill_for_level, data_offset_for_level, data_offset_for_slot, grid_shape_for_pair_count,
    match_points, pair_count_for_level, AiSkill, GridShape, EVOLUTION_BONUS, GENERATION_SIZE,
    MAX_COMBO, MAX_PAIRS,
};
