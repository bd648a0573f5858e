//! Core engine types: player slots, game modes, RNG, configuration.
//!
//! These are shared by every other module and carry no game rules of their own.

pub mod config;
pub mod mode;
pub mod player;
pub mod rng;

pub use config::{EngineConfig, Timings};
pub use mode::GameMode;
pub use player::{PlayerSlot, SlotMap};
pub use rng::GameRng;
