//! Cards on a board.
//!
//! A `Card` is one half of a pair. Its identity starts as the base creature
//! (`CardFace::Base`) and may move, exactly once, to `CardFace::Evolved`
//! when its pair is matched and the creature can evolve. The pairing key
//! (`creature_id`) never changes, so an evolved pair still reads as a pair.

use serde::{Deserialize, Serialize};

use super::creature::{Creature, CreatureId, CreatureIdentity};

/// Unique card identifier within one board.
///
/// Assigned sequentially across the doubled deck before shuffling: the
/// first copy of creature `i` gets `i`, the second gets `i + pair_count`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

/// What a card currently shows.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardFace {
    /// The creature the card was dealt as.
    Base {
        identity: CreatureIdentity,
        evolution_target: Option<CreatureIdentity>,
    },
    /// The stronger form the matched pair turned into.
    Evolved {
        base: CreatureIdentity,
        identity: CreatureIdentity,
    },
}

/// One card on a board.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    id: CardId,
    creature_id: CreatureId,
    face: CardFace,
    face_up: bool,
    matched: bool,
}

impl Card {
    /// Deal a face-down card for `creature`.
    #[must_use]
    pub fn new(id: CardId, creature: &Creature) -> Self {
        Self {
            id,
            creature_id: creature.creature_id(),
            face: CardFace::Base {
                identity: creature.identity.clone(),
                evolution_target: creature.evolution_target.clone(),
            },
            face_up: false,
            matched: false,
        }
    }

    #[must_use]
    pub fn id(&self) -> CardId {
        self.id
    }

    /// Pairing key. Stable across evolution.
    #[must_use]
    pub fn creature_id(&self) -> CreatureId {
        self.creature_id
    }

    #[must_use]
    pub fn face(&self) -> &CardFace {
        &self.face
    }

    /// The identity currently shown.
    #[must_use]
    pub fn identity(&self) -> &CreatureIdentity {
        match &self.face {
            CardFace::Base { identity, .. } | CardFace::Evolved { identity, .. } => identity,
        }
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.identity().display_name
    }

    #[must_use]
    pub fn image_ref(&self) -> &str {
        &self.identity().image_ref
    }

    /// The pending evolution, if the card has not evolved yet.
    #[must_use]
    pub fn evolution_target(&self) -> Option<&CreatureIdentity> {
        match &self.face {
            CardFace::Base { evolution_target, .. } => evolution_target.as_ref(),
            CardFace::Evolved { .. } => None,
        }
    }

    #[must_use]
    pub fn is_evolved(&self) -> bool {
        matches!(self.face, CardFace::Evolved { .. })
    }

    #[must_use]
    pub fn is_face_up(&self) -> bool {
        self.face_up
    }

    #[must_use]
    pub fn is_matched(&self) -> bool {
        self.matched
    }

    /// Face down and not yet matched: a legal flip target.
    #[must_use]
    pub fn is_available(&self) -> bool {
        !self.face_up && !self.matched
    }

    pub(crate) fn set_face_up(&mut self, face_up: bool) {
        self.face_up = face_up;
    }

    pub(crate) fn set_matched(&mut self) {
        self.matched = true;
        self.face_up = true;
    }

    /// Replace the shown identity with `target`.
    ///
    /// Returns false, leaving the card untouched, if it already evolved.
    pub(crate) fn evolve(&mut self, target: CreatureIdentity) -> bool {
        let CardFace::Base { identity, .. } = &self.face else {
            return false;
        };
        self.face = CardFace::Evolved {
            base: identity.clone(),
            identity: target,
        };
        self.face_up = true;
        self.matched = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creature(id: u32, evolves: bool) -> Creature {
        let base = Creature::new(CreatureIdentity::new(
            CreatureId::new(id),
            format!("c{id}"),
            format!("{id}.png"),
        ));
        if evolves {
            base.with_evolution(CreatureIdentity::new(
                CreatureId::new(id + 1),
                format!("c{}", id + 1),
                format!("{}.png", id + 1),
            ))
        } else {
            base
        }
    }

    #[test]
    fn test_new_card_is_face_down() {
        let card = Card::new(CardId::new(3), &creature(7, false));

        assert_eq!(card.id(), CardId::new(3));
        assert_eq!(card.creature_id(), CreatureId::new(7));
        assert_eq!(card.display_name(), "c7");
        assert!(card.is_available());
        assert!(!card.is_evolved());
        assert!(card.evolution_target().is_none());
    }

    #[test]
    fn test_evolve_once() {
        let mut card = Card::new(CardId::new(0), &creature(1, true));
        let target = card.evolution_target().cloned().unwrap();

        assert!(card.evolve(target.clone()));
        assert!(card.is_evolved());
        assert!(card.is_matched());
        assert!(card.is_face_up());
        assert_eq!(card.display_name(), "c2");
        assert_eq!(card.image_ref(), "2.png");
        // Pairing key survives evolution
        assert_eq!(card.creature_id(), CreatureId::new(1));
        assert!(card.evolution_target().is_none());

        // Second evolution is refused
        assert!(!card.evolve(target));
        match card.face() {
            CardFace::Evolved { base, .. } => assert_eq!(base.display_name, "c1"),
            CardFace::Base { .. } => panic!("card should be evolved"),
        }
    }

    #[test]
    fn test_matched_card_stays_face_up() {
        let mut card = Card::new(CardId::new(0), &creature(1, false));
        card.set_face_up(true);
        card.set_matched();

        assert!(card.is_matched());
        assert!(card.is_face_up());
        assert!(!card.is_available());
    }
}
