//! The two-card turn state machine.
//!
//! ```text
//! Idle --flip--> OneSelected --flip--> Resolving --resolve_pair--> Idle
//!                                          |
//!                                          +--(match, evolvable)--> Evolving
//!                                                                      |
//!                                               Idle <--resolve_evolution--+
//! ```
//!
//! The resolver never waits. `request_flip` reports when a pair has been
//! selected together with the delay the caller should wait before calling
//! `resolve_pair`; scheduling that call is the caller's job.

use std::time::Duration;

use crate::board::{Board, PendingEvolution, TurnPhase};
use crate::cards::CreatureIdentity;
use crate::core::Timings;
use crate::error::{FlipRejected, StaleResolution};

/// Result of an accepted flip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlipOutcome {
    /// First card of the turn is face up.
    Revealed { index: usize },

    /// Second card is face up and input is locked. Call `resolve_pair`
    /// after `reveal_delay`.
    PairSelected {
        first: usize,
        second: usize,
        is_match: bool,
        reveal_delay: Duration,
    },
}

/// A resolved match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchReport {
    pub indices: [usize; 2],

    /// Consecutive matches including this one, capped at 3.
    pub multiplier: u32,

    /// Set when the pair now waits in `Evolving` for `resolve_evolution`.
    pub evolution: Option<CreatureIdentity>,

    /// Every pair on the board is matched.
    pub level_complete: bool,
}

/// Result of `resolve_pair`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PairResolution {
    Matched(MatchReport),
    Mismatched { indices: [usize; 2] },
}

/// Result of `resolve_evolution`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvolutionReport {
    pub indices: [usize; 2],
    pub identity: CreatureIdentity,
    pub level_complete: bool,
}

/// Applies flips and resolutions to a board.
#[derive(Clone, Debug, Default)]
pub struct MatchResolver {
    timings: Timings,
}

impl MatchResolver {
    #[must_use]
    pub fn new(timings: Timings) -> Self {
        Self { timings }
    }

    #[must_use]
    pub fn timings(&self) -> &Timings {
        &self.timings
    }

    /// How long a selected pair stays face up before it resolves.
    #[must_use]
    pub fn reveal_delay(&self, is_match: bool) -> Duration {
        if is_match {
            self.timings.match_reveal
        } else {
            self.timings.no_match_reveal
        }
    }

    /// Turn one card face up.
    ///
    /// Rejected without touching the board when input is locked, two cards
    /// are already selected, or the target is out of range, face up or matched.
    pub fn request_flip(
        &self,
        board: &mut Board,
        index: usize,
    ) -> Result<FlipOutcome, FlipRejected> {
        if board.is_input_locked() {
            return Err(FlipRejected::InputLocked);
        }
        if board.selection().len() >= 2 {
            return Err(FlipRejected::SelectionFull);
        }
        let len = board.len();
        let card = board.card_mut(index).ok_or(FlipRejected::OutOfRange { index, len })?;
        if card.is_matched() {
            return Err(FlipRejected::AlreadyMatched(index));
        }
        if card.is_face_up() {
            return Err(FlipRejected::AlreadyFaceUp(index));
        }

        card.set_face_up(true);
        board.push_selection(index);

        let Some([first, second]) = board.selected_pair() else {
            return Ok(FlipOutcome::Revealed { index });
        };
        let is_match = match (board.card(first), board.card(second)) {
            (Some(a), Some(b)) => a.creature_id() == b.creature_id(),
            _ => false,
        };
        Ok(FlipOutcome::PairSelected {
            first,
            second,
            is_match,
            reveal_delay: self.reveal_delay(is_match),
        })
    }

    /// Resolve the selected pair once its reveal delay has elapsed.
    ///
    /// Returns `None` if the board is not in `Resolving`, which happens when
    /// a stale callback fires after its turn already ended.
    pub fn resolve_pair(&self, board: &mut Board) -> Option<PairResolution> {
        if board.phase() != TurnPhase::Resolving {
            return None;
        }
        let [first, second] = board.selected_pair()?;
        let (a, b) = (board.card(first)?, board.card(second)?);
        let is_match = a.creature_id() == b.creature_id();
        let evolution = a.evolution_target().cloned();

        if !is_match {
            for index in [first, second] {
                if let Some(card) = board.card_mut(index) {
                    card.set_face_up(false);
                }
            }
            board.record_miss();
            board.finish_turn(false);
            return Some(PairResolution::Mismatched { indices: [first, second] });
        }

        for index in [first, second] {
            if let Some(card) = board.card_mut(index) {
                card.set_matched();
            }
        }
        let multiplier = board.record_match().min(crate::difficulty::MAX_COMBO);

        match evolution {
            Some(target) => {
                board.begin_evolution(PendingEvolution {
                    indices: [first, second],
                    target: target.clone(),
                });
                Some(PairResolution::Matched(MatchReport {
                    indices: [first, second],
                    multiplier,
                    evolution: Some(target),
                    level_complete: false,
                }))
            }
            None => {
                board.finish_turn(true);
                Some(PairResolution::Matched(MatchReport {
                    indices: [first, second],
                    multiplier,
                    evolution: None,
                    level_complete: board.is_complete(),
                }))
            }
        }
    }

    /// Apply a pending evolution after the presentation layer has shown it.
    ///
    /// Both cards switch to `target` and stay matched and face up; the pair
    /// is counted and input unlocks. Fails if the board is not waiting on
    /// exactly this evolution.
    pub fn resolve_evolution(
        &self,
        board: &mut Board,
        indices: [usize; 2],
        target: &CreatureIdentity,
    ) -> Result<EvolutionReport, StaleResolution> {
        let waiting = board
            .pending_evolution()
            .is_some_and(|pending| pending.indices == indices && &pending.target == target);
        if board.phase() != TurnPhase::Evolving || !waiting {
            return Err(StaleResolution::NotPending(indices));
        }

        board.take_pending_evolution();
        for index in indices {
            if let Some(card) = board.card_mut(index) {
                card.evolve(target.clone());
            }
        }
        board.finish_turn(true);

        Ok(EvolutionReport {
            indices,
            identity: target.clone(),
            level_complete: board.is_complete(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Creature, CreatureId};
    use crate::core::GameRng;

    fn identity(id: u32) -> CreatureIdentity {
        CreatureIdentity::new(CreatureId::new(id), format!("c{id}"), format!("{id}.png"))
    }

    /// Board with creature 1 evolving into 100, the rest plain.
    fn board(pairs: u32) -> Board {
        let creatures: Vec<_> = (1..=pairs)
            .map(|i| {
                let c = Creature::new(identity(i));
                if i == 1 {
                    c.with_evolution(identity(100))
                } else {
                    c
                }
            })
            .collect();
        Board::build(7, &creatures, &mut GameRng::new(11)).unwrap()
    }

    fn positions_of(board: &Board, creature: u32) -> [usize; 2] {
        let found: Vec<_> = board
            .cards()
            .enumerate()
            .filter(|(_, c)| c.creature_id() == CreatureId::new(creature))
            .map(|(i, _)| i)
            .collect();
        [found[0], found[1]]
    }

    fn mismatched_pair(board: &Board) -> [usize; 2] {
        let [a, _] = positions_of(board, 2);
        let [b, _] = positions_of(board, 3);
        [a, b]
    }

    #[test]
    fn test_first_flip_reveals() {
        let resolver = MatchResolver::default();
        let mut board = board(6);

        let outcome = resolver.request_flip(&mut board, 4).unwrap();

        assert_eq!(outcome, FlipOutcome::Revealed { index: 4 });
        assert!(board.card(4).unwrap().is_face_up());
        assert_eq!(board.selection(), &[4]);
        assert_eq!(board.phase(), TurnPhase::OneSelected);
    }

    #[test]
    fn test_rejections_leave_board_untouched() {
        let resolver = MatchResolver::default();
        let mut board = board(6);

        assert_eq!(
            resolver.request_flip(&mut board, 12),
            Err(FlipRejected::OutOfRange { index: 12, len: 12 })
        );

        resolver.request_flip(&mut board, 0).unwrap();
        let before = board.clone();
        assert_eq!(resolver.request_flip(&mut board, 0), Err(FlipRejected::AlreadyFaceUp(0)));
        assert_eq!(board, before);

        let [a, b] = mismatched_pair(&board);
        let mut board = self::board(6);
        resolver.request_flip(&mut board, a).unwrap();
        resolver.request_flip(&mut board, b).unwrap();
        let locked = board.clone();
        let third = board.available_positions()[0];
        assert_eq!(resolver.request_flip(&mut board, third), Err(FlipRejected::InputLocked));
        assert_eq!(board, locked);
    }

    #[test]
    fn test_mismatch_resolution() {
        let resolver = MatchResolver::default();
        let mut board = board(6);
        let [a, b] = mismatched_pair(&board);

        resolver.request_flip(&mut board, a).unwrap();
        let outcome = resolver.request_flip(&mut board, b).unwrap();
        assert_eq!(
            outcome,
            FlipOutcome::PairSelected {
                first: a,
                second: b,
                is_match: false,
                reveal_delay: Duration::from_millis(1500)
            }
        );

        let resolution = resolver.resolve_pair(&mut board).unwrap();
        assert_eq!(resolution, PairResolution::Mismatched { indices: [a, b] });
        assert!(!board.card(a).unwrap().is_face_up());
        assert!(!board.card(b).unwrap().is_face_up());
        assert_eq!(board.consecutive_matches(), 0);
        assert!(!board.is_input_locked());
        assert_eq!(board.phase(), TurnPhase::Idle);
    }

    #[test]
    fn test_plain_match_resolution() {
        let resolver = MatchResolver::default();
        let mut board = board(6);
        let [a, b] = positions_of(&board, 2);

        resolver.request_flip(&mut board, a).unwrap();
        match resolver.request_flip(&mut board, b).unwrap() {
            FlipOutcome::PairSelected { is_match, reveal_delay, .. } => {
                assert!(is_match);
                assert_eq!(reveal_delay, Duration::from_millis(1000));
            }
            other => panic!("unexpected outcome {other:?}"),
        }

        let Some(PairResolution::Matched(report)) = resolver.resolve_pair(&mut board) else {
            panic!("expected a match");
        };
        assert_eq!(report.multiplier, 1);
        assert_eq!(report.evolution, None);
        assert!(!report.level_complete);
        assert_eq!(board.matched_pair_count(), 1);
        assert!(board.card(a).unwrap().is_matched());
        assert!(board.selection().is_empty());
        assert!(!board.is_input_locked());
    }

    #[test]
    fn test_evolving_match_defers_turn_end() {
        let resolver = MatchResolver::default();
        let mut board = board(6);
        let [a, b] = positions_of(&board, 1);

        resolver.request_flip(&mut board, a).unwrap();
        resolver.request_flip(&mut board, b).unwrap();
        let Some(PairResolution::Matched(report)) = resolver.resolve_pair(&mut board) else {
            panic!("expected a match");
        };

        assert_eq!(report.evolution, Some(identity(100)));
        assert_eq!(board.phase(), TurnPhase::Evolving);
        assert!(board.is_input_locked());
        assert_eq!(board.matched_pair_count(), 0);
        assert_eq!(board.selection().len(), 2);

        let evolved = resolver.resolve_evolution(&mut board, [a, b], &identity(100)).unwrap();
        assert!(!evolved.level_complete);
        assert_eq!(board.matched_pair_count(), 1);
        assert!(!board.is_input_locked());
        for index in [a, b] {
            let card = board.card(index).unwrap();
            assert!(card.is_evolved());
            assert!(card.is_matched());
            assert!(card.is_face_up());
            assert_eq!(card.display_name(), "c100");
        }

        // Counted once, not twice
        assert!(resolver.resolve_evolution(&mut board, [a, b], &identity(100)).is_err());
        assert_eq!(board.matched_pair_count(), 1);
    }

    #[test]
    fn test_evolution_for_wrong_pair_is_stale() {
        let resolver = MatchResolver::default();
        let mut board = board(6);
        let [a, b] = positions_of(&board, 1);

        resolver.request_flip(&mut board, a).unwrap();
        resolver.request_flip(&mut board, b).unwrap();
        resolver.resolve_pair(&mut board).unwrap();

        assert!(resolver.resolve_evolution(&mut board, [b, a], &identity(100)).is_err());
        assert!(resolver.resolve_evolution(&mut board, [a, b], &identity(5)).is_err());
        assert_eq!(board.phase(), TurnPhase::Evolving);
    }

    #[test]
    fn test_resolve_pair_without_selection_is_noop() {
        let resolver = MatchResolver::default();
        let mut board = board(6);

        assert_eq!(resolver.resolve_pair(&mut board), None);
        resolver.request_flip(&mut board, 0).unwrap();
        assert_eq!(resolver.resolve_pair(&mut board), None);
    }

    #[test]
    fn test_combo_caps_and_resets() {
        let resolver = MatchResolver::default();
        let mut board = board(6);

        let mut multipliers = Vec::new();
        for creature in 2..=5 {
            let [a, b] = positions_of(&board, creature);
            resolver.request_flip(&mut board, a).unwrap();
            resolver.request_flip(&mut board, b).unwrap();
            if let Some(PairResolution::Matched(report)) = resolver.resolve_pair(&mut board) {
                multipliers.push(report.multiplier);
            }
        }
        assert_eq!(multipliers, vec![1, 2, 3, 3]);
        assert_eq!(board.consecutive_matches(), 4);

        let [a, _] = positions_of(&board, 1);
        let [b, _] = positions_of(&board, 6);
        resolver.request_flip(&mut board, a).unwrap();
        resolver.request_flip(&mut board, b).unwrap();
        resolver.resolve_pair(&mut board).unwrap();
        assert_eq!(board.consecutive_matches(), 0);
    }

    #[test]
    fn test_last_pair_completes_level() {
        let resolver = MatchResolver::default();
        let mut board = board(6);

        let mut completions = Vec::new();
        for creature in 2..=6 {
            let [a, b] = positions_of(&board, creature);
            resolver.request_flip(&mut board, a).unwrap();
            resolver.request_flip(&mut board, b).unwrap();
            if let Some(PairResolution::Matched(report)) = resolver.resolve_pair(&mut board) {
                completions.push(report.level_complete);
            }
        }
        assert!(completions.iter().all(|done| !done));

        let [a, b] = positions_of(&board, 1);
        resolver.request_flip(&mut board, a).unwrap();
        resolver.request_flip(&mut board, b).unwrap();
        resolver.resolve_pair(&mut board).unwrap();
        let report = resolver.resolve_evolution(&mut board, [a, b], &identity(100)).unwrap();

        assert!(report.level_complete);
        assert!(board.is_complete());
        assert_eq!(board.matched_pair_count(), 6);
    }
}
