//! Round orchestration: mode, turns, levels, scoring and deferred steps.
//!
//! ## Key Types
//!
//! - `RoundController`: drives a round over a provider and a store
//! - `RoundSession`: scores, level, active seat and both boards
//! - `RoundPhase`: menu, playing, level transition, complete, error
//! - `RoundEvent` / `RoundResult`: what hosts observe

mod controller;
mod event;
mod session;

pub use controller::RoundController;
pub use event::{RoundEvent, RoundResult};
pub use session::{RoundPhase, RoundSession};
