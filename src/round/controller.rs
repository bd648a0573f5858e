//! Round orchestration.
//!
//! `RoundController` owns everything a round needs: the session, one board
//! per seat, the resolver, the computer opponent, and a virtual-time
//! `Scheduler` holding every deferred step.
//!
//! ## Driving a round
//!
//! ```text
//! start_round(mode) ──> Playing ──pick_card / advance──> LevelTransition
//!        │                  ^                                  │
//!        │                  └────────────advance───────────────┤
//!        │                                                     └──(final level)──> RoundComplete
//!        └──(data failure)──> Error ──retry──> Playing
//! ```
//!
//! Hosts call `pick_card` for human input, `resolve_evolution` once an
//! evolution has been shown, and `advance` to let virtual time pass. Every
//! observable transition is queued as a `RoundEvent`.
//!
//! ## Staleness
//!
//! Deferred steps carry the seat and the generation of the board they were
//! scheduled against. A step whose board has since been replaced is dropped.
//! Level changes and resets also clear the scheduler outright, and passing
//! the turn cancels the previous seat's opponent steps.

use std::time::Duration;
use tracing::{debug, error, info, trace, warn};

use crate::agent::{OpponentAgent, TurnPlan};
use crate::board::Board;
use crate::cards::Card;
use crate::core::{EngineConfig, GameMode, GameRng, PlayerSlot, SlotMap};
use crate::difficulty::{
    ai_skill_for_level, data_offset_for_slot, match_points, pair_count_for_level,
};
use crate::error::{DataError, FlipRejected, RoundError, StaleResolution};
use crate::providers::{CreatureDataProvider, PersistenceStore};
use crate::resolver::{FlipOutcome, MatchResolver, PairResolution};
use crate::schedule::Scheduler;

use super::event::RoundEvent;
use super::session::{RoundPhase, RoundSession};

/// Work waiting on the virtual clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Deferred {
    ResolvePair { slot: PlayerSlot, generation: u64 },
    LevelComplete { slot: PlayerSlot, generation: u64 },
    AdvanceLevel,
    AgentThink { slot: PlayerSlot, generation: u64 },
    AgentSecondFlip { slot: PlayerSlot, generation: u64, planned: Option<usize> },
    AutoEvolve { slot: PlayerSlot, generation: u64 },
}

impl Deferred {
    fn is_agent_step_for(&self, target: PlayerSlot) -> bool {
        matches!(
            self,
            Deferred::AgentThink { slot, .. } | Deferred::AgentSecondFlip { slot, .. }
                if *slot == target
        )
    }
}

/// Orchestrates rounds over a creature provider and a persistence store.
#[derive(Debug)]
pub struct RoundController<P, S> {
    config: EngineConfig,
    provider: P,
    store: S,
    resolver: MatchResolver,
    scheduler: Scheduler<Deferred>,
    /// Catalog offsets and deck shuffles.
    deal_rng: GameRng,
    /// One fork per vs-computer round.
    agent_rng: GameRng,
    phase: RoundPhase,
    session: Option<RoundSession>,
    agent: Option<OpponentAgent>,
    next_generation: u64,
    events: Vec<RoundEvent>,
}

impl<P, S> RoundController<P, S> {
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// The current round, `None` at the menu.
    #[must_use]
    pub fn session(&self) -> Option<&RoundSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn board(&self, slot: PlayerSlot) -> Option<&Board> {
        self.session.as_ref().and_then(|session| session.board(slot))
    }

    #[must_use]
    pub fn active_player(&self) -> Option<PlayerSlot> {
        self.session.as_ref().map(RoundSession::active_player)
    }

    #[must_use]
    pub fn agent(&self) -> Option<&OpponentAgent> {
        self.agent.as_ref()
    }

    /// Whether the computer holds the turn.
    #[must_use]
    pub fn is_agent_turn(&self) -> bool {
        self.agent.is_some() && self.active_player() == Some(self.config.agent_slot)
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// Virtual time at which the next deferred step runs.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduler.next_due()
    }

    #[must_use]
    pub fn pending_steps(&self) -> usize {
        self.scheduler.len()
    }

    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Take every event queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<RoundEvent> {
        std::mem::take(&mut self.events)
    }
}

impl<P: CreatureDataProvider, S: PersistenceStore> RoundController<P, S> {
    #[must_use]
    pub fn new(config: EngineConfig, provider: P, store: S) -> Self {
        let root = GameRng::new(config.seed);
        let resolver = MatchResolver::new(config.timings.clone());
        Self {
            config,
            provider,
            store,
            resolver,
            scheduler: Scheduler::new(),
            deal_rng: root.for_context("deal"),
            agent_rng: root.for_context("agent"),
            phase: RoundPhase::MenuSelect,
            session: None,
            agent: None,
            next_generation: 0,
            events: Vec::new(),
        }
    }

    // === Lifecycle ===

    /// Start a fresh round at level 1 with both scores at 0.
    ///
    /// Any round in progress is discarded. On a data failure the controller
    /// is left in `RoundPhase::Error`, ready for `retry`.
    pub fn start_round(&mut self, mode: GameMode) -> Result<(), RoundError> {
        self.scheduler.clear();
        self.session = Some(RoundSession::new(mode));
        self.agent = if mode == GameMode::VsComputer {
            let skill = ai_skill_for_level(1, self.config.ai_skill);
            Some(OpponentAgent::new(skill, self.agent_rng.fork()))
        } else {
            None
        };

        info!(%mode, "round started");
        self.events.push(RoundEvent::RoundStarted { mode });
        self.deal_level()
    }

    /// Deal the current level again after a data failure.
    pub fn retry(&mut self) -> Result<(), RoundError> {
        if self.phase != RoundPhase::Error {
            return Err(RoundError::NotRetryable);
        }
        info!("retrying board deal");
        self.deal_level()
    }

    /// Back to the menu. Drops the session and every pending step.
    pub fn reset_round(&mut self) {
        let cancelled = self.scheduler.clear();
        self.session = None;
        self.agent = None;
        self.phase = RoundPhase::MenuSelect;
        info!(cancelled, "round reset");
    }

    /// Let `elapsed` virtual time pass, running every step that falls due.
    ///
    /// Only a failed level deal returns an error; the clock still advances.
    pub fn advance(&mut self, elapsed: Duration) -> Result<(), RoundError> {
        let until = self.scheduler.now().saturating_add(elapsed);
        let mut outcome = Ok(());
        while let Some((_, step)) = self.scheduler.pop_due(until) {
            if let Err(err) = self.run(step) {
                outcome = Err(err);
                break;
            }
        }
        self.scheduler.advance_clock_to(until);
        outcome
    }

    // === Input ===

    /// Flip a card for the human whose turn it is.
    ///
    /// Returns `false` when the flip is ignored: wrong phase, the computer's
    /// turn, input locked, or an unavailable card.
    pub fn pick_card(&mut self, index: usize) -> bool {
        let flipped = self.human_turn().and_then(|slot| self.flip(slot, index));
        match flipped {
            Ok(_) => true,
            Err(reason) => {
                debug!(index, %reason, "flip ignored");
                false
            }
        }
    }

    /// Apply the evolution pending on `slot`'s board.
    ///
    /// Called by the presentation layer once the evolution has been shown.
    /// Returns `false` if nothing is pending.
    pub fn resolve_evolution(&mut self, slot: PlayerSlot) -> bool {
        let Some(board) = self.session.as_mut().and_then(|s| s.board_mut(slot)) else {
            return false;
        };
        let Some(pending) = board.pending_evolution().cloned() else {
            trace!(%slot, "no evolution pending");
            return false;
        };
        let generation = board.generation();
        let resolved = self
            .resolver
            .resolve_evolution(board, pending.indices, &pending.target);
        let report = match resolved {
            Ok(report) => report,
            Err(stale) => {
                trace!(%slot, %stale, "evolution dropped");
                return false;
            }
        };

        self.scheduler
            .cancel_where(|step| {
                matches!(step, Deferred::AutoEvolve { slot: s, .. } if *s == slot)
            });
        debug!(%slot, creature = %report.identity.creature_id, "pair evolved");
        self.events.push(RoundEvent::Evolved {
            slot,
            indices: report.indices,
            identity: report.identity,
        });

        if report.level_complete {
            self.scheduler
                .schedule(
                    self.config.timings.level_complete,
                    Deferred::LevelComplete { slot, generation },
                );
        } else {
            self.schedule_agent_turn();
        }
        true
    }

    // === Score and turn hooks ===

    /// Credit the active player for a match. Never changes the active player.
    ///
    /// Returns the points awarded.
    pub fn on_match(&mut self, multiplier: u32, is_evolution: bool) -> u32 {
        let Some(slot) = self.active_player() else {
            return 0;
        };
        self.credit_match(slot, multiplier, is_evolution).0
    }

    /// A pair missed. Passes the turn in modes that alternate.
    ///
    /// A lone card left face up by the seat losing the turn is turned back
    /// down, so that seat starts its next turn from an idle board.
    pub fn on_no_match(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if !session.mode().passes_turns() {
            return;
        }

        let from = session.active_player();
        let to = session.pass_turn();
        let abandoned = session.board_mut(from).and_then(Board::abandon_selection);
        let cancelled = self.scheduler.cancel_where(|step| step.is_agent_step_for(from));
        debug!(%from, %to, cancelled, ?abandoned, "turn passed");
        if let Some(index) = abandoned {
            self.events.push(RoundEvent::SelectionAbandoned { slot: from, index });
        }
        self.events.push(RoundEvent::TurnPassed { from, to });
        self.schedule_agent_turn();
    }

    /// The active board is cleared. Ends the round at the final level,
    /// otherwise schedules the next level after the level-up pause.
    pub fn on_level_complete(&mut self) {
        if self.phase != RoundPhase::Playing {
            return;
        }
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let level = session.level();
        let by = session.active_player();
        let result = session.result();

        self.scheduler.clear();
        self.phase = RoundPhase::LevelTransition;
        info!(level, %by, "level complete");
        self.events.push(RoundEvent::LevelCompleted { level, by });

        if self.config.final_level.is_some_and(|last| level >= last) {
            self.phase = RoundPhase::RoundComplete;
            info!(?result, "round complete");
            self.events.push(RoundEvent::RoundComplete { result });
        } else {
            self.scheduler.schedule(self.config.timings.level_up, Deferred::AdvanceLevel);
        }
    }

    // === Deferred steps ===

    fn run(&mut self, step: Deferred) -> Result<(), RoundError> {
        match step {
            Deferred::ResolvePair { slot, generation } => self.finish_pair(slot, generation),
            Deferred::LevelComplete { slot, generation } => {
                if self.check_current(slot, generation) {
                    self.on_level_complete();
                }
            }
            Deferred::AdvanceLevel => return self.advance_level(),
            Deferred::AgentThink { slot, generation } => self.agent_open_turn(slot, generation),
            Deferred::AgentSecondFlip { slot, generation, planned } => {
                self.agent_second_flip(slot, generation, planned);
            }
            Deferred::AutoEvolve { slot, generation } => {
                if self.check_current(slot, generation) {
                    self.resolve_evolution(slot);
                }
            }
        }
        Ok(())
    }

    /// Whether `generation` is still the board on `slot`. Logs and returns
    /// `false` for replaced boards.
    fn check_current(&self, slot: PlayerSlot, generation: u64) -> bool {
        let actual = self.board(slot).map_or(0, Board::generation);
        if actual == generation {
            return true;
        }
        let stale = StaleResolution::Replaced {
            expected: generation,
            actual,
        };
        trace!(%slot, %stale, "dropping deferred step");
        false
    }

    fn finish_pair(&mut self, slot: PlayerSlot, generation: u64) {
        if !self.check_current(slot, generation) {
            return;
        }
        let Some(board) = self.session.as_mut().and_then(|s| s.board_mut(slot)) else {
            return;
        };
        let Some(resolution) = self.resolver.resolve_pair(board) else {
            trace!(%slot, "no pair waiting");
            return;
        };
        let is_active = self.active_player() == Some(slot);

        match resolution {
            PairResolution::Mismatched { indices } => {
                self.events.push(RoundEvent::CardsHidden { slot, indices });
                if is_active {
                    self.on_no_match();
                }
            }
            PairResolution::Matched(report) => {
                let is_evolution = report.evolution.is_some();
                let (points, score) = self.credit_match(slot, report.multiplier, is_evolution);
                self.events.push(RoundEvent::Matched {
                    slot,
                    indices: report.indices,
                    multiplier: report.multiplier,
                    points,
                    score,
                });

                if let Some(target) = report.evolution {
                    self.events.push(RoundEvent::EvolutionPending {
                        slot,
                        indices: report.indices,
                        target,
                    });
                    if let Some(delay) = self.config.auto_resolve_evolution {
                        self.scheduler.schedule(delay, Deferred::AutoEvolve { slot, generation });
                    }
                } else if report.level_complete {
                    self.scheduler
                        .schedule(
                            self.config.timings.level_complete,
                            Deferred::LevelComplete { slot, generation },
                        );
                } else {
                    self.schedule_agent_turn();
                }
            }
        }
    }

    fn advance_level(&mut self) -> Result<(), RoundError> {
        if self.phase != RoundPhase::LevelTransition {
            trace!("level advance no longer pending");
            return Ok(());
        }
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };
        let level = session.advance_level();
        debug!(level, "advancing level");
        self.deal_level()
    }

    // === Dealing ===

    /// Deal fresh boards for both seats at the session's level.
    fn deal_level(&mut self) -> Result<(), RoundError> {
        self.scheduler.clear();
        let Some(session) = self.session.as_mut() else {
            return Err(RoundError::NoRound);
        };
        session.clear_boards();
        let level = session.level();
        let pair_count = pair_count_for_level(level);

        let boards = match self.deal_boards(level, pair_count) {
            Ok(boards) => boards,
            Err(err) => {
                if err.is_unavailable() {
                    warn!(level, error = %err, "creature data unavailable");
                } else {
                    error!(level, error = %err, "creature provider broke its contract");
                }
                self.phase = RoundPhase::Error;
                self.events.push(RoundEvent::DataUnavailable { error: err.clone() });
                return Err(err.into());
            }
        };

        if let Some(session) = self.session.as_mut() {
            session.set_boards(boards);
        }
        if let Some(agent) = self.agent.as_mut() {
            agent.reset();
            agent.set_skill(ai_skill_for_level(level, self.config.ai_skill));
        }
        if let Err(err) = self.store.set_highest_level_reached(level) {
            warn!(level, error = %err, "could not record highest level");
        }

        info!(level, pair_count, "level started");
        self.events.push(RoundEvent::LevelStarted { level, pair_count });
        self.phase = RoundPhase::Playing;
        self.schedule_agent_turn();
        Ok(())
    }

    fn deal_boards(&mut self, level: u32, pair_count: usize) -> Result<SlotMap<Board>, DataError> {
        let seed = self.deal_rng.next_u32();
        let first = self.deal_board(PlayerSlot::Player1, level, pair_count, seed)?;
        let second = self.deal_board(PlayerSlot::Player2, level, pair_count, seed)?;
        Ok(SlotMap::from_array([first, second]))
    }

    fn deal_board(
        &mut self,
        slot: PlayerSlot,
        level: u32,
        pair_count: usize,
        seed: u32,
    ) -> Result<Board, DataError> {
        let offset = data_offset_for_slot(level, seed, slot);
        let creatures = self.provider.fetch_board_creatures(pair_count, offset)?;
        if creatures.len() != pair_count {
            return Err(DataError::WrongLength {
                expected: pair_count,
                got: creatures.len(),
            });
        }

        self.next_generation += 1;
        let mut shuffle = self.deal_rng.fork();
        let board = Board::build(self.next_generation, &creatures, &mut shuffle)?;
        debug!(%slot, level, offset, generation = board.generation(), "board dealt");
        Ok(board)
    }

    // === Turns and scoring ===

    fn human_turn(&self) -> Result<PlayerSlot, FlipRejected> {
        if self.phase != RoundPhase::Playing {
            return Err(FlipRejected::NotPlaying);
        }
        let active = self.active_player().ok_or(FlipRejected::NotPlaying)?;
        if self.is_agent_turn() {
            return Err(FlipRejected::NotYourTurn);
        }
        Ok(active)
    }

    /// Submit a flip on `slot`'s board, queuing events and the pair resolution.
    fn flip(&mut self, slot: PlayerSlot, index: usize) -> Result<FlipOutcome, FlipRejected> {
        let board = self
            .session
            .as_mut()
            .and_then(|s| s.board_mut(slot))
            .ok_or(FlipRejected::NotPlaying)?;
        let outcome = self.resolver.request_flip(board, index)?;
        let generation = board.generation();

        if let Some(card) = board.card(index) {
            self.events.push(RoundEvent::CardFlipped {
                slot,
                index,
                creature_id: card.creature_id(),
            });
        }
        if let FlipOutcome::PairSelected {
            first,
            second,
            is_match,
            reveal_delay,
        } = outcome
        {
            self.events.push(RoundEvent::PairSelected {
                slot,
                first,
                second,
                is_match,
            });
            self.scheduler
                .schedule(reveal_delay, Deferred::ResolvePair { slot, generation });
        }
        Ok(outcome)
    }

    /// Returns `(points, new score)`.
    fn credit_match(
        &mut self,
        slot: PlayerSlot,
        multiplier: u32,
        is_evolution: bool,
    ) -> (u32, u32) {
        let Some(session) = self.session.as_mut() else {
            return (0, 0);
        };
        let points = match_points(session.level(), multiplier, is_evolution);
        let score = session.add_points(slot, points);
        debug!(%slot, points, score, multiplier, is_evolution, "match scored");
        self.check_high_score(slot, score);
        (points, score)
    }

    /// Persist `score` if it beats the stored high score for the mode.
    ///
    /// Only the human seat of single and vs-computer rounds counts.
    fn check_high_score(&mut self, slot: PlayerSlot, score: u32) {
        let tracked = if self.agent.is_some() {
            self.config.agent_slot.other()
        } else {
            PlayerSlot::Player1
        };
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let mode = session.mode();
        if !mode.tracks_high_score() || slot != tracked {
            return;
        }

        let best = self.store.high_score(mode);
        if score <= best {
            return;
        }
        if let Err(err) = self.store.set_high_score(mode, score) {
            warn!(%mode, score, error = %err, "could not persist high score");
        }
        if !session.is_new_high_score() {
            info!(%mode, score, previous = best, "new high score");
            self.events.push(RoundEvent::NewHighScore { mode, score });
        }
        session.mark_new_high_score();
    }

    // === Opponent ===

    /// Queue the opponent's thinking step if it holds an idle turn.
    fn schedule_agent_turn(&mut self) {
        if self.phase != RoundPhase::Playing || !self.is_agent_turn() {
            return;
        }
        let slot = self.config.agent_slot;
        let Some(board) = self.board(slot) else {
            return;
        };
        if board.is_input_locked() || board.is_complete() || !board.selection().is_empty() {
            return;
        }
        if self.scheduler.any_pending(|step| step.is_agent_step_for(slot)) {
            return;
        }
        let generation = board.generation();
        self.scheduler
            .schedule(self.config.timings.agent_think, Deferred::AgentThink { slot, generation });
    }

    fn agent_may_act(&self, slot: PlayerSlot, generation: u64) -> bool {
        self.phase == RoundPhase::Playing
            && self.is_agent_turn()
            && slot == self.config.agent_slot
            && self.check_current(slot, generation)
            && self.board(slot).is_some_and(|board| !board.is_input_locked())
    }

    fn agent_open_turn(&mut self, slot: PlayerSlot, generation: u64) {
        if !self.agent_may_act(slot, generation) {
            return;
        }
        let Some(board) = self.session.as_ref().and_then(|s| s.board(slot)) else {
            return;
        };
        let Some(agent) = self.agent.as_mut() else {
            return;
        };
        let Some(plan) = agent.plan_turn(board) else {
            return;
        };

        let first = plan.first();
        if let Err(reason) = self.flip(slot, first) {
            debug!(%slot, first, %reason, "agent flip rejected");
            return;
        }
        self.agent_observe(slot, first);

        let planned = match plan {
            TurnPlan::KnownPair { second, .. } => Some(second),
            TurnPlan::Explore { .. } => None,
        };
        self.scheduler.schedule(
            self.config.timings.agent_second_flip,
            Deferred::AgentSecondFlip {
                slot,
                generation,
                planned,
            },
        );
    }

    fn agent_second_flip(&mut self, slot: PlayerSlot, generation: u64, planned: Option<usize>) {
        if !self.agent_may_act(slot, generation) {
            return;
        }
        let Some(board) = self.session.as_ref().and_then(|s| s.board(slot)) else {
            return;
        };
        let Some(&first) = board.selection().first() else {
            return;
        };
        let Some(agent) = self.agent.as_mut() else {
            return;
        };
        let second = match planned {
            Some(index) if board.is_available(index) => Some(index),
            _ => agent.choose_second(board, first),
        };
        let Some(second) = second else {
            return;
        };

        match self.flip(slot, second) {
            Ok(_) => self.agent_observe(slot, second),
            Err(reason) => debug!(%slot, second, %reason, "agent flip rejected"),
        }
    }

    fn agent_observe(&mut self, slot: PlayerSlot, index: usize) {
        let creature_id = self
            .board(slot)
            .and_then(|board| board.card(index))
            .map(Card::creature_id);
        if let (Some(agent), Some(creature_id)) = (self.agent.as_mut(), creature_id) {
            agent.observe(index, creature_id);
        }
    }
}
