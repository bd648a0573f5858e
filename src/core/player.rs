//! Player slots and per-slot data storage.
//!
//! ## PlayerSlot
//!
//! A round always has exactly two seats. Single-player rounds only ever use
//! `Player1`; the second seat still exists so every mode shares one layout.
//!
//! ## SlotMap
//!
//! Per-slot storage with O(1) access, indexed by `PlayerSlot`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two seats in a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerSlot {
    Player1,
    Player2,
}

impl PlayerSlot {
    /// Both slots, in seating order.
    pub const ALL: [PlayerSlot; 2] = [PlayerSlot::Player1, PlayerSlot::Player2];

    /// The opposing seat.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            PlayerSlot::Player1 => PlayerSlot::Player2,
            PlayerSlot::Player2 => PlayerSlot::Player1,
        }
    }

    /// 0-based seat index.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            PlayerSlot::Player1 => 0,
            PlayerSlot::Player2 => 1,
        }
    }
}

impl std::fmt::Display for PlayerSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.index() + 1)
    }
}

/// Per-slot data storage.
///
/// ```
/// use creature_match::core::{PlayerSlot, SlotMap};
///
/// let mut scores: SlotMap<u32> = SlotMap::with_value(0);
/// scores[PlayerSlot::Player2] += 10;
///
/// assert_eq!(scores[PlayerSlot::Player1], 0);
/// assert_eq!(scores[PlayerSlot::Player2], 10);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotMap<T> {
    data: [T; 2],
}

impl<T> SlotMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(mut factory: impl FnMut(PlayerSlot) -> T) -> Self {
        Self {
            data: [factory(PlayerSlot::Player1), factory(PlayerSlot::Player2)],
        }
    }

    /// Create a map with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Create a map from values in seating order.
    pub const fn from_array(data: [T; 2]) -> Self {
        Self { data }
    }

    #[must_use]
    pub fn get(&self, slot: PlayerSlot) -> &T {
        &self.data[slot.index()]
    }

    pub fn get_mut(&mut self, slot: PlayerSlot) -> &mut T {
        &mut self.data[slot.index()]
    }

    /// Iterate over (PlayerSlot, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerSlot, &T)> {
        PlayerSlot::ALL.into_iter().zip(self.data.iter())
    }

    /// Iterate over (PlayerSlot, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerSlot, &mut T)> {
        PlayerSlot::ALL.into_iter().zip(self.data.iter_mut())
    }
}

impl<T> Index<PlayerSlot> for SlotMap<T> {
    type Output = T;

    fn index(&self, slot: PlayerSlot) -> &Self::Output {
        self.get(slot)
    }
}

impl<T> IndexMut<PlayerSlot> for SlotMap<T> {
    fn index_mut(&mut self, slot: PlayerSlot) -> &mut Self::Output {
        self.get_mut(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_basics() {
        assert_eq!(PlayerSlot::Player1.index(), 0);
        assert_eq!(PlayerSlot::Player2.index(), 1);
        assert_eq!(PlayerSlot::Player1.other(), PlayerSlot::Player2);
        assert_eq!(PlayerSlot::Player2.other(), PlayerSlot::Player1);
        assert_eq!(format!("{}", PlayerSlot::Player2), "Player 2");
    }

    #[test]
    fn test_slot_map_new() {
        let map = SlotMap::new(|slot| slot.index() * 10);

        assert_eq!(map[PlayerSlot::Player1], 0);
        assert_eq!(map[PlayerSlot::Player2], 10);
    }

    #[test]
    fn test_slot_map_mutation() {
        let mut map: SlotMap<u32> = SlotMap::with_value(0);

        map[PlayerSlot::Player1] = 5;
        *map.get_mut(PlayerSlot::Player2) += 7;

        assert_eq!(map[PlayerSlot::Player1], 5);
        assert_eq!(map[PlayerSlot::Player2], 7);
    }

    #[test]
    fn test_slot_map_iter() {
        let map = SlotMap::new(|slot| slot.index());
        let pairs: Vec<_> = map.iter().collect();

        assert_eq!(pairs, vec![(PlayerSlot::Player1, &0), (PlayerSlot::Player2, &1)]);
    }

    #[test]
    fn test_slot_map_serialization() {
        let map = SlotMap::new(|slot| slot.index() as u32 + 1);
        let json = serde_json::to_string(&map).unwrap();
        let deserialized: SlotMap<u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }
}
