use crate::species::ElementType;

/// Per-type effectiveness on a half scale: 0 = immune, 1 = ½×, 2 = 1×,
/// 4 = 2×. The first-generation chart, quirks included (Bug beats
/// Poison, Ghost fails against Psychic, Ice is neutral into Fire).
pub fn single_effectiveness(attacking: ElementType, defending: ElementType) -> u8 {
    use ElementType::*;
    match (attacking, defending) {
        (Normal, Rock) => 1,
        (Normal, Ghost) => 0,

        (Fighting, Normal) | (Fighting, Rock) | (Fighting, Ice) => 4,
        (Fighting, Flying) | (Fighting, Poison) | (Fighting, Bug) | (Fighting, Psychic) => 1,
        (Fighting, Ghost) => 0,

        (Flying, Fighting) | (Flying, Bug) | (Flying, Grass) => 4,
        (Flying, Rock) | (Flying, Electric) => 1,

        (Poison, Grass) | (Poison, Bug) => 4,
        (Poison, Poison) | (Poison, Ground) | (Poison, Rock) | (Poison, Ghost) => 1,

        (Ground, Poison) | (Ground, Rock) | (Ground, Fire) | (Ground, Electric) => 4,
        (Ground, Grass) | (Ground, Bug) => 1,
        (Ground, Flying) => 0,

        (Rock, Flying) | (Rock, Bug) | (Rock, Fire) | (Rock, Ice) => 4,
        (Rock, Fighting) | (Rock, Ground) => 1,

        (Bug, Grass) | (Bug, Psychic) | (Bug, Poison) => 4,
        (Bug, Fighting) | (Bug, Flying) | (Bug, Ghost) | (Bug, Fire) => 1,

        (Ghost, Ghost) => 4,
        (Ghost, Normal) | (Ghost, Psychic) => 0,

        (Fire, Bug) | (Fire, Grass) | (Fire, Ice) => 4,
        (Fire, Rock) | (Fire, Fire) | (Fire, Water) | (Fire, Dragon) => 1,

        (Water, Ground) | (Water, Rock) | (Water, Fire) => 4,
        (Water, Water) | (Water, Grass) | (Water, Dragon) => 1,

        (Grass, Ground) | (Grass, Rock) | (Grass, Water) => 4,
        (Grass, Flying)
        | (Grass, Poison)
        | (Grass, Bug)
        | (Grass, Fire)
        | (Grass, Grass)
        | (Grass, Dragon) => 1,

        (Electric, Water) | (Electric, Flying) => 4,
        (Electric, Electric) | (Electric, Grass) | (Electric, Dragon) => 1,
        (Electric, Ground) => 0,

        (Psychic, Fighting) | (Psychic, Poison) => 4,
        (Psychic, Psychic) => 1,

        (Ice, Grass) | (Ice, Ground) | (Ice, Flying) | (Ice, Dragon) => 4,
        (Ice, Water) | (Ice, Ice) => 1,

        (Dragon, Dragon) => 4,

        _ => 2,
    }
}

/// Combined effectiveness over a defender's type set, on a quarter scale:
/// 4 = 1×. Single-typed defenders contribute one neutral factor.
pub fn combined_effectiveness(attacking: ElementType, defending: &[ElementType]) -> u8 {
    let first = defending.first().copied().map_or(2, |t| single_effectiveness(attacking, t));
    let second = defending.get(1).copied().map_or(2, |t| single_effectiveness(attacking, t));
    first * second
}

/// The combined value as a display multiplier.
pub fn effectiveness_multiplier(combined: u8) -> f32 {
    combined as f32 / 4.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use ElementType::*;

    #[test]
    fn immunities_zero_out() {
        assert_eq!(single_effectiveness(Normal, Ghost), 0);
        assert_eq!(single_effectiveness(Electric, Ground), 0);
        assert_eq!(single_effectiveness(Ground, Flying), 0);
        // The era's famous chart bug.
        assert_eq!(single_effectiveness(Ghost, Psychic), 0);
    }

    #[test]
    fn dual_types_multiply() {
        // Electric into Water/Flying: 2x * 2x = 4x.
        assert_eq!(combined_effectiveness(Electric, &[Water, Flying]), 16);
        // Grass into Grass/Poison: ½ * ½ = ¼.
        assert_eq!(combined_effectiveness(Grass, &[Grass, Poison]), 1);
        // Any immunity wins the product.
        assert_eq!(combined_effectiveness(Ground, &[Flying, Rock]), 0);
    }

    #[test]
    fn neutral_is_four() {
        assert_eq!(combined_effectiveness(Normal, &[Normal]), 4);
        assert!((effectiveness_multiplier(4) - 1.0).abs() < f32::EPSILON);
    }
}
