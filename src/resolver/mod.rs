//! Match resolution: flip validation, pair outcome, evolution, combo.
//!
//! `MatchResolver` operates on one `Board` at a time and has no clock. The
//! round controller owns timing and decides when each resolution runs.

mod turn;

pub use turn::{EvolutionReport, FlipOutcome, MatchReport, MatchResolver, PairResolution};
