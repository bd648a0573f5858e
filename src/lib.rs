//! # creature-match
//!
//! Game-round engine for a creature-themed memory-match game.
//!
//! ## Design Principles
//!
//! 1. **Headless**: No rendering, no wall clock. Every delay is a step on a
//!    virtual-time scheduler that the host advances explicitly.
//!
//! 2. **Two Seats, Always**: A round has exactly two seats, each with its own
//!    board. Single-player rounds simply never pass the turn.
//!
//! 3. **Injected Edges**: Creature data and persistence sit behind traits;
//!    the engine never reaches for a network or a filesystem on its own.
//!
//! ## Architecture
//!
//! - **Generation-Checked Deferred Work**: Every board carries a generation.
//!   A deferred step scheduled against a replaced board is dropped.
//!
//! - **Persistent Data Structures**: Board cards live in an `im::Vector`, so
//!   snapshots for rendering are O(1) clones.
//!
//! - **Deterministic RNG**: A single seeded ChaCha8 stream drives shuffles,
//!   catalog offsets and opponent decisions.
//!
//! ## Modules
//!
//! - `core`: Player slots, game modes, RNG, configuration
//! - `difficulty`: Level-to-difficulty mapping and scoring
//! - `cards`: Creature data and cards with one-way evolution
//! - `board`: Per-seat board state
//! - `schedule`: Virtual-time scheduler
//! - `resolver`: Two-card turn state machine
//! - `agent`: Computer opponent and its memory
//! - `providers`: Creature data and persistence collaborators
//! - `round`: Round controller, session and events

pub mod agent;
pub mod board;
pub mod cards;
pub mod core;
pub mod difficulty;
pub mod error;
pub mod providers;
pub mod resolver;
pub mod round;
pub mod schedule;

// Re-export commonly used types
pub use crate::core::{EngineConfig, GameMode, GameRng, PlayerSlot, SlotMap, Timings};

pub use crate::difficulty::{
    ai_skill_for_level, data_offset_for_level, data_offset_for_slot, grid_shape_for_pair_count,
    match_points,
    pair_count_for_level, AiSkill, GridShape,
};

pub use crate::cards::{Card, CardFace, CardId, Creature, CreatureId, CreatureIdentity};

pub use crate::board::{Board, PendingEvolution, TurnPhase};

pub use crate::schedule::{Scheduler, TimerId};

pub use crate::resolver::{EvolutionReport, FlipOutcome, MatchReport, MatchResolver, PairResolution};

pub use crate::agent::{AgentMemory, OpponentAgent, TurnPlan};

pub use crate::providers::{
    Backoff, CatalogProvider, CreatureCatalog, CreatureDataProvider, FileStore, MemoryStore,
    PersistenceStore,
    RecordingSleeper, RetryPolicy, Sleeper, StaticCatalog, ThreadSleeper,
};

pub use crate::round::{RoundController, RoundEvent, RoundPhase, RoundResult, RoundSession};

pub use crate::error::{
    DataError, FetchError, FlipRejected, PersistenceError, RoundError, StaleResolution,
};
