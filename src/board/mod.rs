//! Board state: one shuffled deck per seat, plus that seat's turn state.

mod state;

pub use state::{Board, PendingEvolution, TurnPhase};
