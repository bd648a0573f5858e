//! Creature data as delivered by a data provider.

use serde::{Deserialize, Serialize};

/// Catalog identifier of a creature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CreatureId(pub u32);

impl CreatureId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CreatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The visible identity of a creature: who it is, what it is called, and
/// what it looks like. Also used as an evolution target.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CreatureIdentity {
    pub creature_id: CreatureId,
    pub display_name: String,
    pub image_ref: String,
}

impl CreatureIdentity {
    pub fn new(
        creature_id: CreatureId,
        display_name: impl Into<String>,
        image_ref: impl Into<String>,
    ) -> Self {
        Self {
            creature_id,
            display_name: display_name.into(),
            image_ref: image_ref.into(),
        }
    }
}

/// A creature ready to be doubled into a pair of cards.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Creature {
    pub identity: CreatureIdentity,

    /// The stronger form this creature turns into when matched, if any.
    pub evolution_target: Option<CreatureIdentity>,
}

impl Creature {
    #[must_use]
    pub fn new(identity: CreatureIdentity) -> Self {
        Self {
            identity,
            evolution_target: None,
        }
    }

    #[must_use]
    pub fn with_evolution(mut self, target: CreatureIdentity) -> Self {
        self.evolution_target = Some(target);
        self
    }

    #[must_use]
    pub fn creature_id(&self) -> CreatureId {
        self.identity.creature_id
    }

    #[must_use]
    pub fn can_evolve(&self) -> bool {
        self.evolution_target.is_some()
    }
}
