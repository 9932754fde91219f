//! Canned combatants for tests, demos, and quick simulations.

use crate::monster::{Genes, Monster};
use crate::moves::MoveId;
use crate::species::Species;

/// A level-50 combatant with zero genes and no stat experience, carrying
/// exactly the given moves. The flat build keeps computed stats easy to
/// reason about in tests.
pub fn flat(species: Species, moves: &[MoveId]) -> Monster {
    Monster::new(species, 50, Genes::ZERO, [0; 5], moves)
}

/// Same as [`flat`] at an arbitrary level.
pub fn flat_at(species: Species, level: u8, moves: &[MoveId]) -> Monster {
    Monster::new(species, level, Genes::ZERO, [0; 5], moves)
}

/// A tournament-style build: maxed genes and stat experience at level 100.
pub fn tuned(species: Species, moves: &[MoveId]) -> Monster {
    Monster::new(species, 100, Genes::MAX, [65535; 5], moves)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_build_is_reproducible() {
        let a = flat(Species::Pikachu, &[MoveId::Thunderbolt]);
        let b = flat(Species::Pikachu, &[MoveId::Thunderbolt]);
        assert_eq!(a.stats, b.stats);
        assert_eq!(a.hp, a.max_hp());
    }

    #[test]
    fn tuned_build_outclasses_flat() {
        let flat = flat_at(Species::Snorlax, 100, &[MoveId::BodySlam]);
        let tuned = tuned(Species::Snorlax, &[MoveId::BodySlam]);
        for i in 0..5 {
            assert!(tuned.stats[i] > flat.stats[i]);
        }
    }
}
