//! Positions the opponent has personally seen face up.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::board::Board;
use crate::cards::CreatureId;

/// Creature id to the board positions where the agent saw it.
///
/// Only the agent's own flips feed this. It is cleared whenever the board it
/// describes is replaced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AgentMemory {
    seen: FxHashMap<CreatureId, SmallVec<[usize; 2]>>,
}

impl AgentMemory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `creature_id` sits at `index`. Repeats are ignored.
    pub fn observe(&mut self, index: usize, creature_id: CreatureId) {
        let positions = self.seen.entry(creature_id).or_default();
        if !positions.contains(&index) {
            positions.push(index);
        }
    }

    /// Remembered positions for one creature.
    #[must_use]
    pub fn positions(&self, creature_id: CreatureId) -> &[usize] {
        self.seen.get(&creature_id).map(SmallVec::as_slice).unwrap_or_default()
    }

    /// Number of creatures with at least one remembered position.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// A remembered pair whose two cards are both still available.
    ///
    /// When several qualify, the one with the lowest first position wins so
    /// the choice does not depend on hash order.
    #[must_use]
    pub fn known_pair(&self, board: &Board) -> Option<[usize; 2]> {
        self.seen
            .values()
            .filter_map(|positions| {
                let mut open = positions.iter().copied().filter(|&i| board.is_available(i));
                let first = open.next()?;
                let second = open.next()?;
                Some(if first < second { [first, second] } else { [second, first] })
            })
            .min()
    }

    /// A remembered, available position holding the same creature as `index`.
    #[must_use]
    pub fn partner_of(
        &self,
        board: &Board,
        index: usize,
        creature_id: CreatureId,
    ) -> Option<usize> {
        self.positions(creature_id)
            .iter()
            .copied()
            .find(|&i| i != index && board.is_available(i))
    }

    pub fn clear(&mut self) {
        self.seen.clear();
    }
}
