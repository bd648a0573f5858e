//! Card system: creature data and the cards dealt from it.
//!
//! ## Key Types
//!
//! - `CreatureId`: catalog identifier, also the pairing key of a card
//! - `CreatureIdentity`: name and image of a creature or evolution target
//! - `Creature`: provider output, one per pair
//! - `Card` / `CardFace`: runtime card state with a one-way evolution

pub mod card;
pub mod creature;

pub use card::{Card, CardFace, CardId};
pub use creature::{Creature, CreatureId, CreatureIdentity};
