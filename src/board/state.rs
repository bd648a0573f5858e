//! Per-player board state.
//!
//! A `Board` owns the shuffled deck for one seat plus that seat's turn
//! state (current selection, input lock, pending evolution). Two boards in
//! the same round never share anything, so each can sit in a different
//! resolution phase.
//!
//! Cards live in an `im::Vector`, so handing a snapshot to a renderer or a
//! test is an O(1) clone.

use im::Vector;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::{Card, CardId, Creature, CreatureIdentity};
use crate::core::GameRng;
use crate::difficulty::{grid_shape_for_pair_count, GridShape};
use crate::error::DataError;

/// Where a board is in its two-card turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    /// No card selected.
    #[default]
    Idle,
    /// One card face up, waiting for the second.
    OneSelected,
    /// Two cards face up, input locked until the reveal delay elapses.
    Resolving,
    /// A matched pair is waiting for the presentation layer to finish its
    /// evolution before input unlocks.
    Evolving,
}

/// A matched pair whose evolution has not been applied yet.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PendingEvolution {
    pub indices: [usize; 2],
    pub target: CreatureIdentity,
}

/// One seat's board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Identity of this board instance. A replacement board always gets a
    /// new generation, which is how deferred work detects it went stale.
    generation: u64,

    cards: Vector<Card>,
    pair_count: usize,
    matched_pair_count: usize,

    /// Matches in a row since the last miss. Drives the score multiplier.
    consecutive_matches: u32,

    selection: SmallVec<[usize; 2]>,
    input_locked: bool,
    phase: TurnPhase,
    pending_evolution: Option<PendingEvolution>,
}

impl Board {
    /// Deal a board from `creatures`.
    ///
    /// Every creature becomes two face-down cards with distinct ids, then
    /// the whole deck is Fisher–Yates shuffled. Fails if the same creature
    /// appears twice, since that would put four cards under one pairing key.
    pub fn build(
        generation: u64,
        creatures: &[Creature],
        rng: &mut GameRng,
    ) -> Result<Self, DataError> {
        let mut seen = FxHashSet::default();
        for creature in creatures {
            if !seen.insert(creature.creature_id()) {
                return Err(DataError::DuplicateCreature(creature.creature_id()));
            }
        }

        let pair_count = creatures.len();
        let mut deck: Vec<Card> = creatures
            .iter()
            .chain(creatures.iter())
            .enumerate()
            .map(|(i, creature)| Card::new(CardId::new(i as u32), creature))
            .collect();
        rng.shuffle(&mut deck);

        Ok(Self {
            generation,
            cards: deck.into_iter().collect(),
            pair_count,
            matched_pair_count: 0,
            consecutive_matches: 0,
            selection: SmallVec::new(),
            input_locked: false,
            phase: TurnPhase::Idle,
            pending_evolution: None,
        })
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.pair_count
    }

    #[must_use]
    pub fn matched_pair_count(&self) -> usize {
        self.matched_pair_count
    }

    #[must_use]
    pub fn consecutive_matches(&self) -> u32 {
        self.consecutive_matches
    }

    /// Indices flipped this turn and not yet resolved.
    #[must_use]
    pub fn selection(&self) -> &[usize] {
        &self.selection
    }

    #[must_use]
    pub fn is_input_locked(&self) -> bool {
        self.input_locked
    }

    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    #[must_use]
    pub fn pending_evolution(&self) -> Option<&PendingEvolution> {
        self.pending_evolution.as_ref()
    }

    #[must_use]
    pub fn card(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Positions of cards that are face down and unmatched.
    #[must_use]
    pub fn available_positions(&self) -> Vec<usize> {
        self.cards
            .iter()
            .enumerate()
            .filter(|(_, card)| card.is_available())
            .map(|(i, _)| i)
            .collect()
    }

    #[must_use]
    pub fn is_available(&self, index: usize) -> bool {
        self.cards.get(index).is_some_and(Card::is_available)
    }

    /// Cards currently face up but not matched. Never more than two.
    #[must_use]
    pub fn face_up_unmatched_count(&self) -> usize {
        self.cards.iter().filter(|c| c.is_face_up() && !c.is_matched()).count()
    }

    /// Every pair has been matched.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.matched_pair_count >= self.pair_count
    }

    #[must_use]
    pub fn grid_shape(&self) -> GridShape {
        grid_shape_for_pair_count(self.pair_count)
    }

    // === Mutation (resolver only) ===

    pub(crate) fn card_mut(&mut self, index: usize) -> Option<&mut Card> {
        self.cards.get_mut(index)
    }

    pub(crate) fn push_selection(&mut self, index: usize) {
        self.selection.push(index);
        self.phase = if self.selection.len() >= 2 {
            self.input_locked = true;
            TurnPhase::Resolving
        } else {
            TurnPhase::OneSelected
        };
    }

    pub(crate) fn selected_pair(&self) -> Option<[usize; 2]> {
        match self.selection.as_slice() {
            &[first, second] => Some([first, second]),
            _ => None,
        }
    }

    pub(crate) fn record_match(&mut self) -> u32 {
        self.consecutive_matches += 1;
        self.consecutive_matches
    }

    pub(crate) fn record_miss(&mut self) {
        self.consecutive_matches = 0;
    }

    pub(crate) fn begin_evolution(&mut self, pending: PendingEvolution) {
        self.pending_evolution = Some(pending);
        self.phase = TurnPhase::Evolving;
    }

    pub(crate) fn take_pending_evolution(&mut self) -> Option<PendingEvolution> {
        self.pending_evolution.take()
    }

    /// Turn a lone selected card back down when its turn ends before the
    /// second flip. Counts as a miss. Returns the hidden index.
    pub(crate) fn abandon_selection(&mut self) -> Option<usize> {
        if self.phase != TurnPhase::OneSelected {
            return None;
        }
        let index = *self.selection.first()?;
        if let Some(card) = self.card_mut(index) {
            card.set_face_up(false);
        }
        self.record_miss();
        self.finish_turn(false);
        Some(index)
    }

    /// Close the current turn: clear the selection and unlock input.
    pub(crate) fn finish_turn(&mut self, pair_matched: bool) {
        if pair_matched {
            self.matched_pair_count = (self.matched_pair_count + 1).min(self.pair_count);
        }
        self.selection.clear();
        self.input_locked = false;
        self.phase = TurnPhase::Idle;
    }
}
