//! Pure level-scaling functions.
//!
//! Every function here is deterministic and side-effect free.

use serde::{Deserialize, Serialize};

use crate::core::PlayerSlot;

/// Size of one pseudo-generation of the creature catalog.
pub const GENERATION_SIZE: u32 = 150;

/// Number of pseudo-generations cycled through as levels climb.
pub const GENERATION_COUNT: u32 = 8;

/// Spread of the random offset inside one generation.
pub const OFFSET_SPREAD: u32 = 80;

/// Extra offset applied to the second seat's board.
pub const SECOND_SLOT_SHIFT: u32 = GENERATION_SIZE;

/// Upper bound on pairs per board.
pub const MAX_PAIRS: usize = 20;

/// Combo multiplier cap.
pub const MAX_COMBO: u32 = 3;

/// Flat bonus for a match that evolves.
pub const EVOLUTION_BONUS: u32 = 15;

/// How well the computer opponent uses what it has seen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiSkill {
    Easy,
    Medium,
    High,
}

impl AiSkill {
    /// Probability that the opponent consults its memory on a given turn.
    #[must_use]
    pub fn memory_use_probability(self) -> f64 {
        match self {
            AiSkill::Easy => 0.3,
            AiSkill::Medium => 0.8,
            AiSkill::High => 1.0,
        }
    }
}

/// Column layout for a board, as (compact, wide) column counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridShape {
    /// Columns on narrow displays.
    pub compact_columns: u8,
    /// Columns on wide displays.
    pub wide_columns: u8,
}

impl GridShape {
    const fn new(compact_columns: u8, wide_columns: u8) -> Self {
        Self { compact_columns, wide_columns }
    }
}

/// Number of card pairs on a board at `level`.
///
/// 6 for levels 1-3, 8 for 4-6, 10 for 7-9, 12 for 10-12, then one more
/// pair every two levels starting at level 13, capped at 20.
///
/// ```
/// use creature_match::difficulty::pair_count_for_level;
///
/// let counts: Vec<_> = (1..=16).map(pair_count_for_level).collect();
/// assert_eq!(counts, [6, 6, 6, 8, 8, 8, 10, 10, 10, 12, 12, 12, 13, 13, 14, 14]);
/// ```
#[must_use]
pub fn pair_count_for_level(level: u32) -> usize {
    match level {
        0..=3 => 6,
        4..=6 => 8,
        7..=9 => 10,
        10..=12 => 12,
        _ => {
            let additional = ((level - 11) / 2) as usize;
            (12 + additional).min(MAX_PAIRS)
        }
    }
}

/// Catalog offset for a board at `level`.
///
/// Levels are grouped five at a time into pseudo-generations so higher
/// levels draw different creatures; `random_seed` picks a spot inside the
/// generation.
#[must_use]
pub fn data_offset_for_level(level: u32, random_seed: u32) -> u32 {
    let level_group = level.saturating_sub(1) / 5;
    let generation_offset = (level_group % GENERATION_COUNT) * GENERATION_SIZE;
    generation_offset + random_seed % OFFSET_SPREAD
}

/// Catalog offset for a given seat. The second seat is shifted so the two
/// boards never share creatures.
#[must_use]
pub fn data_offset_for_slot(level: u32, random_seed: u32, slot: PlayerSlot) -> u32 {
    let base = data_offset_for_level(level, random_seed);
    match slot {
        PlayerSlot::Player1 => base,
        PlayerSlot::Player2 => base + SECOND_SLOT_SHIFT,
    }
}

/// Opponent skill at `level`.
///
/// An explicit user choice always wins; otherwise skill escalates from
/// easy (levels 1-3) to medium (4-8) to high.
#[must_use]
pub fn ai_skill_for_level(level: u32, user_selection: Option<AiSkill>) -> AiSkill {
    if let Some(skill) = user_selection {
        return skill;
    }
    match level {
        0..=3 => AiSkill::Easy,
        4..=8 => AiSkill::Medium,
        _ => AiSkill::High,
    }
}

/// Column layout for a board of `pair_count` pairs.
#[must_use]
pub fn grid_shape_for_pair_count(pair_count: usize) -> GridShape {
    match pair_count {
        0..=6 => GridShape::new(3, 4),
        7..=8 => GridShape::new(4, 4),
        9..=10 => GridShape::new(4, 5),
        11..=15 => GridShape::new(4, 6),
        _ => GridShape::new(5, 8),
    }
}

/// Points for one match.
///
/// `10 * min(3, combo) * level`, plus 15 when the pair evolves.
///
/// ```
/// use creature_match::difficulty::match_points;
///
/// assert_eq!(match_points(1, 1, false), 10);
/// assert_eq!(match_points(5, 3, true), 165);
/// ```
#[must_use]
pub fn match_points(level: u32, combo_count: u32, is_evolution: bool) -> u32 {
    let base = 10 * combo_count.min(MAX_COMBO) * level;
    if is_evolution {
        base + EVOLUTION_BONUS
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_count_sequence() {
        let counts: Vec<_> = (1..=16).map(pair_count_for_level).collect();
        assert_eq!(counts, vec![6, 6, 6, 8, 8, 8, 10, 10, 10, 12, 12, 12, 13, 13, 14, 14]);
    }

    #[test]
    fn test_pair_count_samples() {
        assert_eq!(pair_count_for_level(1), 6);
        assert_eq!(pair_count_for_level(7), 10);
        assert_eq!(pair_count_for_level(13), 13);
        assert_eq!(pair_count_for_level(20), 16);
    }

    #[test]
    fn test_pair_count_cap() {
        assert_eq!(pair_count_for_level(26), 19);
        assert_eq!(pair_count_for_level(27), 20);
        assert_eq!(pair_count_for_level(28), 20);
        assert_eq!(pair_count_for_level(29), 20);
        assert_eq!(pair_count_for_level(1_000), 20);
    }

    #[test]
    fn test_pair_count_monotonic() {
        for level in 1..200 {
            assert!(pair_count_for_level(level) <= pair_count_for_level(level + 1));
        }
    }

    #[test]
    fn test_data_offset() {
        assert_eq!(data_offset_for_level(1, 0), 0);
        assert_eq!(data_offset_for_level(5, 79), 79);
        assert_eq!(data_offset_for_level(6, 80), 150);
        assert_eq!(data_offset_for_level(11, 3), 303);
        // Eight generations, then back to the first
        assert_eq!(data_offset_for_level(41, 10), 10);
    }

    #[test]
    fn test_data_offset_second_slot() {
        let p1 = data_offset_for_slot(3, 17, PlayerSlot::Player1);
        let p2 = data_offset_for_slot(3, 17, PlayerSlot::Player2);
        assert_eq!(p1, 17);
        assert_eq!(p2, 167);
    }

    #[test]
    fn test_ai_skill_escalation() {
        assert_eq!(ai_skill_for_level(1, None), AiSkill::Easy);
        assert_eq!(ai_skill_for_level(3, None), AiSkill::Easy);
        assert_eq!(ai_skill_for_level(4, None), AiSkill::Medium);
        assert_eq!(ai_skill_for_level(8, None), AiSkill::Medium);
        assert_eq!(ai_skill_for_level(9, None), AiSkill::High);
    }

    #[test]
    fn test_ai_skill_user_choice_wins() {
        assert_eq!(ai_skill_for_level(12, Some(AiSkill::Easy)), AiSkill::Easy);
        assert_eq!(ai_skill_for_level(1, Some(AiSkill::High)), AiSkill::High);
        assert_eq!(ai_skill_for_level(1, Some(AiSkill::Medium)), AiSkill::Medium);
    }

    #[test]
    fn test_grid_shape_steps() {
        assert_eq!(grid_shape_for_pair_count(6), GridShape::new(3, 4));
        assert_eq!(grid_shape_for_pair_count(8), GridShape::new(4, 4));
        assert_eq!(grid_shape_for_pair_count(10), GridShape::new(4, 5));
        assert_eq!(grid_shape_for_pair_count(12), GridShape::new(4, 6));
        assert_eq!(grid_shape_for_pair_count(15), GridShape::new(4, 6));
        assert_eq!(grid_shape_for_pair_count(16), GridShape::new(5, 8));
        assert_eq!(grid_shape_for_pair_count(20), GridShape::new(5, 8));
    }

    #[test]
    fn test_grid_shape_monotonic() {
        for pairs in 1..30 {
            let a = grid_shape_for_pair_count(pairs);
            let b = grid_shape_for_pair_count(pairs + 1);
            assert!(a.compact_columns <= b.compact_columns);
            assert!(a.wide_columns <= b.wide_columns);
        }
    }

    #[test]
    fn test_match_points() {
        assert_eq!(match_points(1, 1, false), 10);
        assert_eq!(match_points(5, 3, true), 165);
        assert_eq!(match_points(2, 2, false), 40);
        // Combo is capped at 3
        assert_eq!(match_points(1, 7, false), 30);
    }

    #[test]
    fn test_memory_probability() {
        assert_eq!(AiSkill::High.memory_use_probability(), 1.0);
        assert_eq!(AiSkill::Medium.memory_use_probability(), 0.8);
        assert_eq!(AiSkill::Easy.memory_use_probability(), 0.3);
    }
}
