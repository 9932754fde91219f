use super::common::{apply_move, duel_state, mv, run_turn, start_scripted};
use crate::battle::calculators::{base_damage, screen_adjust};
use crate::battle::state::{BattleEvent, FailReason, SideId};
use crate::move_data::VolatileFlag;
use crate::prefabs::flat;
use crate::species::Species;
use crate::MoveId;
use pretty_assertions::assert_eq;

#[test]
fn reference_base_damage_value() {
    // Power 100, no crit, level 100, attack equal to defense:
    // (2*100/5 + 2) * 100 * 1 / 50 + 2 = 86.
    assert_eq!(base_damage(100, 100, 150, 150, false), 86);
}

#[test]
fn critical_hits_double_the_level_term() {
    assert_eq!(base_damage(100, 100, 150, 150, true), 166);
}

#[test]
fn screen_doubling_wraps_past_1024() {
    assert_eq!(screen_adjust(400), 800);
    assert_eq!(screen_adjust(512), 1024);
    // 600 doubles to 1200, which overflows down to 1024.
    assert_eq!(screen_adjust(600), 1024);
    assert_eq!(screen_adjust(900), 1024);
}

#[test]
fn stab_and_effectiveness_compound() {
    // Charizard's Ember into Venusaur: special 90 into 105, power 40.
    // Base 17, STAB 25, double effectiveness 50, roll 217 -> 42.
    let mut state = duel_state(
        flat(Species::Charizard, &[MoveId::Ember]),
        flat(Species::Venusaur, &[MoveId::RazorLeaf]),
    );
    let events = apply_move(&mut state, SideId::A, MoveId::Ember, vec![0, 255, 0, 255]);

    assert!(events.contains(&BattleEvent::Effectiveness { multiplier: 2.0 }));
    assert!(events.contains(&BattleEvent::DamageDealt {
        side: SideId::B,
        amount: 42,
        remaining_hp: 98
    }));
}

#[test]
fn critical_hit_bypasses_the_screen() {
    // Non-crit behind a light screen: defense 105 doubles to 210,
    // yielding 22 after STAB, effectiveness, and the 217 roll.
    let mut state = duel_state(
        flat(Species::Charizard, &[MoveId::Ember]),
        flat(Species::Venusaur, &[MoveId::RazorLeaf]),
    );
    state.side_mut(SideId::B).overlay.flags.set(VolatileFlag::LightScreen, true);
    let events = apply_move(&mut state, SideId::A, MoveId::Ember, vec![0, 255, 0, 255]);
    assert!(events.contains(&BattleEvent::DamageDealt {
        side: SideId::B,
        amount: 22,
        remaining_hp: 118
    }));

    // A critical hit (roll 0 < 50) ignores the screen entirely: base 30,
    // STAB 45, effectiveness 90, roll 217 -> 76.
    let mut state = duel_state(
        flat(Species::Charizard, &[MoveId::Ember]),
        flat(Species::Venusaur, &[MoveId::RazorLeaf]),
    );
    state.side_mut(SideId::B).overlay.flags.set(VolatileFlag::LightScreen, true);
    let events = apply_move(&mut state, SideId::A, MoveId::Ember, vec![0, 0, 0, 255]);
    assert!(events.contains(&BattleEvent::CriticalHit { side: SideId::A }));
    assert!(events.contains(&BattleEvent::DamageDealt {
        side: SideId::B,
        amount: 76,
        remaining_hp: 64
    }));
}

#[test]
fn fixed_damage_ignores_type_math() {
    // Sonic Boom (Normal) against a Ghost: a normal attack would be
    // immune, but fixed damage lands its flat 20.
    let mut state = duel_state(
        flat(Species::Snorlax, &[MoveId::SonicBoom]),
        flat(Species::Gengar, &[MoveId::Lick]),
    );
    let events = apply_move(&mut state, SideId::A, MoveId::SonicBoom, vec![0]);
    assert!(events.contains(&BattleEvent::DamageDealt {
        side: SideId::B,
        amount: 20,
        remaining_hp: 100
    }));
}

#[test]
fn level_based_fixed_damage_equals_user_level() {
    let mut state = duel_state(
        flat(Species::Snorlax, &[MoveId::SeismicToss]),
        flat(Species::Golem, &[MoveId::Tackle]),
    );
    let events = apply_move(&mut state, SideId::A, MoveId::SeismicToss, vec![0]);
    assert!(events.contains(&BattleEvent::DamageDealt {
        side: SideId::B,
        amount: 50,
        remaining_hp: 90
    }));
}

#[test]
fn one_hit_ko_flattens_a_slower_target() {
    let mut battle = start_scripted(
        flat(Species::Golem, &[MoveId::Fissure]),
        flat(Species::Snorlax, &[MoveId::BodySlam]),
        vec![0],
    );
    let events = run_turn(&mut battle, mv(0), mv(0));

    assert!(events.contains(&BattleEvent::DamageDealt {
        side: SideId::B,
        amount: 220,
        remaining_hp: 0
    }));
    assert!(events.contains(&BattleEvent::Victory { side: SideId::A }));
}

#[test]
fn one_hit_ko_always_fails_against_a_faster_target() {
    // Jolteon outspeeds Golem, so Fissure fails before any roll.
    let mut battle = start_scripted(
        flat(Species::Golem, &[MoveId::Fissure]),
        flat(Species::Jolteon, &[MoveId::Tackle]),
        vec![0, 255, 0],
    );
    let events = run_turn(&mut battle, mv(0), mv(0));
    assert!(events.contains(&BattleEvent::MoveFailed {
        side: SideId::A,
        mv: Some(MoveId::Fissure),
        reason: FailReason::Missed
    }));
    assert!(battle.victor().is_none());
}

#[test]
fn drain_heals_half_of_damage_dealt() {
    let mut state = duel_state(
        flat(Species::Venusaur, &[MoveId::MegaDrain]),
        flat(Species::Blastoise, &[MoveId::Surf]),
    );
    state.side_mut(SideId::A).active_monster_mut().hp = 50;

    // Mega Drain: special 105 into 90, power 40. Base 22, STAB 33,
    // double effectiveness 66, roll 217 -> 56. Heal is half: 28.
    let events = apply_move(&mut state, SideId::A, MoveId::MegaDrain, vec![0, 255, 0]);
    assert!(events.contains(&BattleEvent::DamageDealt {
        side: SideId::B,
        amount: 56,
        remaining_hp: 83
    }));
    assert!(events.contains(&BattleEvent::Healed {
        side: SideId::A,
        amount: 28,
        new_hp: 78
    }));
    assert_eq!(state.side(SideId::A).active_monster().hp, 78);
}

#[test]
fn recoil_is_a_quarter_of_damage_dealt_minimum_one() {
    let mut state = duel_state(
        flat(Species::Tauros, &[MoveId::DoubleEdge]),
        flat(Species::Snorlax, &[MoveId::BodySlam]),
    );
    // Double-Edge: 105 into 70, power 100. Base 68, roll 217 -> 57.
    let events = apply_move(&mut state, SideId::A, MoveId::DoubleEdge, vec![0, 255, 0]);
    assert!(events.contains(&BattleEvent::DamageDealt {
        side: SideId::B,
        amount: 57,
        remaining_hp: 163
    }));
    // Recoil: 57 / 4 = 14 back onto Tauros.
    assert!(events.contains(&BattleEvent::DamageDealt {
        side: SideId::A,
        amount: 14,
        remaining_hp: 121
    }));
}

#[test]
fn crash_moves_cost_one_hp_on_a_miss() {
    let mut state = duel_state(
        flat(Species::Hypno, &[MoveId::JumpKick]),
        flat(Species::Snorlax, &[MoveId::BodySlam]),
    );
    // Jump Kick is 95%: threshold 242, roll 250 misses.
    let events = apply_move(&mut state, SideId::A, MoveId::JumpKick, vec![250]);
    assert!(events.contains(&BattleEvent::MoveFailed {
        side: SideId::A,
        mv: Some(MoveId::JumpKick),
        reason: FailReason::Missed
    }));
    assert!(events.contains(&BattleEvent::DamageDealt {
        side: SideId::A,
        amount: 1,
        remaining_hp: 144
    }));
}

#[test]
fn explosion_faints_the_user_even_against_a_ghost() {
    let mut state = duel_state(
        flat(Species::Snorlax, &[MoveId::SelfDestruct]),
        flat(Species::Gengar, &[MoveId::Lick]),
    );
    // Normal into Ghost: immune — but the user still goes down.
    let events = apply_move(&mut state, SideId::A, MoveId::SelfDestruct, vec![0]);
    assert!(events.contains(&BattleEvent::MoveFailed {
        side: SideId::A,
        mv: Some(MoveId::SelfDestruct),
        reason: FailReason::Immune
    }));
    assert!(events.iter().any(|e| matches!(e, BattleEvent::Fainted { side: SideId::A, .. })));
    assert_eq!(state.side(SideId::A).active_monster().hp, 0);
}

#[test]
fn double_moves_hit_exactly_twice() {
    let mut state = duel_state(
        flat(Species::Jolteon, &[MoveId::DoubleKick]),
        flat(Species::Snorlax, &[MoveId::BodySlam]),
    );
    let events = apply_move(&mut state, SideId::A, MoveId::DoubleKick, vec![0, 255, 0]);
    let hits = events
        .iter()
        .filter(|e| matches!(e, BattleEvent::DamageDealt { side: SideId::B, .. }))
        .count();
    assert_eq!(hits, 2);
}

#[test]
fn weighted_multi_hit_count_follows_the_thresholds() {
    // Hit-count roll 200 lands in the 192..224 band: four hits.
    let mut state = duel_state(
        flat(Species::Tauros, &[MoveId::FurySwipes]),
        flat(Species::Snorlax, &[MoveId::BodySlam]),
    );
    let events = apply_move(&mut state, SideId::A, MoveId::FurySwipes, vec![0, 255, 0, 200]);
    let hits = events
        .iter()
        .filter(|e| matches!(e, BattleEvent::DamageDealt { side: SideId::B, .. }))
        .count();
    assert_eq!(hits, 4);

    // Roll 0 lands in the first band: two hits.
    let mut state = duel_state(
        flat(Species::Tauros, &[MoveId::FurySwipes]),
        flat(Species::Snorlax, &[MoveId::BodySlam]),
    );
    let events = apply_move(&mut state, SideId::A, MoveId::FurySwipes, vec![0, 255, 0, 0]);
    let hits = events
        .iter()
        .filter(|e| matches!(e, BattleEvent::DamageDealt { side: SideId::B, .. }))
        .count();
    assert_eq!(hits, 2);
}
