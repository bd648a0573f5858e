//! Per-round state: mode, level, scores, whose turn it is, and both boards.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::core::{GameMode, PlayerSlot, SlotMap};

use super::event::RoundResult;

/// Where the round is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundPhase {
    /// No round. `start_round` leaves this phase.
    #[default]
    MenuSelect,
    Playing,
    /// A level was cleared; the next one is dealt after the level-up pause.
    LevelTransition,
    /// The final level was cleared. Only `reset_round` leaves this phase.
    RoundComplete,
    /// Boards could not be dealt. `retry` leaves this phase.
    Error,
}

/// State of one round.
///
/// Boards are dealt for both seats together; `boards` is `None` while a
/// deal is outstanding or has failed, never half-filled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSession {
    mode: GameMode,
    level: u32,
    scores: SlotMap<u32>,
    active_player: PlayerSlot,
    boards: Option<SlotMap<Board>>,
    new_high_score: bool,
}

impl RoundSession {
    #[must_use]
    pub fn new(mode: GameMode) -> Self {
        Self {
            mode,
            level: 1,
            scores: SlotMap::with_value(0),
            active_player: PlayerSlot::Player1,
            boards: None,
            new_high_score: false,
        }
    }

    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub fn score(&self, slot: PlayerSlot) -> u32 {
        self.scores[slot]
    }

    #[must_use]
    pub fn scores(&self) -> &SlotMap<u32> {
        &self.scores
    }

    #[must_use]
    pub fn active_player(&self) -> PlayerSlot {
        self.active_player
    }

    #[must_use]
    pub fn board(&self, slot: PlayerSlot) -> Option<&Board> {
        self.boards.as_ref().map(|boards| &boards[slot])
    }

    #[must_use]
    pub fn active_board(&self) -> Option<&Board> {
        self.board(self.active_player)
    }

    /// Cards flipped but not yet resolved on the active board.
    #[must_use]
    pub fn pending_selection(&self) -> &[usize] {
        self.active_board().map(Board::selection).unwrap_or_default()
    }

    #[must_use]
    pub fn is_input_locked(&self) -> bool {
        self.active_board().is_some_and(Board::is_input_locked)
    }

    /// A stored high score was beaten at some point this round.
    #[must_use]
    pub fn is_new_high_score(&self) -> bool {
        self.new_high_score
    }

    /// Leader by score. Single-player rounds always report player 1.
    #[must_use]
    pub fn result(&self) -> RoundResult {
        if self.mode == GameMode::Single {
            return RoundResult::Winner(PlayerSlot::Player1);
        }
        let (p1, p2) = (self.scores[PlayerSlot::Player1], self.scores[PlayerSlot::Player2]);
        match p1.cmp(&p2) {
            std::cmp::Ordering::Greater => RoundResult::Winner(PlayerSlot::Player1),
            std::cmp::Ordering::Less => RoundResult::Winner(PlayerSlot::Player2),
            std::cmp::Ordering::Equal => RoundResult::Draw,
        }
    }

    pub(crate) fn board_mut(&mut self, slot: PlayerSlot) -> Option<&mut Board> {
        self.boards.as_mut().map(|boards| &mut boards[slot])
    }

    pub(crate) fn set_boards(&mut self, boards: SlotMap<Board>) {
        self.boards = Some(boards);
    }

    pub(crate) fn clear_boards(&mut self) {
        self.boards = None;
    }

    /// Returns the new score.
    pub(crate) fn add_points(&mut self, slot: PlayerSlot, points: u32) -> u32 {
        let score = &mut self.scores[slot];
        *score = score.saturating_add(points);
        *score
    }

    /// Hand the turn to the other seat. Returns the new active player.
    pub(crate) fn pass_turn(&mut self) -> PlayerSlot {
        self.active_player = self.active_player.other();
        self.active_player
    }

    pub(crate) fn advance_level(&mut self) -> u32 {
        self.level += 1;
        self.level
    }

    pub(crate) fn mark_new_high_score(&mut self) {
        self.new_high_score = true;
    }
}
