use super::common::{apply_move, duel_state, mv, run_turn, start_scripted};
use crate::battle::active::Commitment;
use crate::battle::state::{BattleEvent, FailReason, SideId};
use crate::move_data::StatKind;
use crate::prefabs::flat;
use crate::species::Species;
use crate::MoveId;
use pretty_assertions::assert_eq;

#[test]
fn hyper_beam_costs_the_following_turn() {
    // Turn 1: Hyper Beam connects; turn 2: Tauros must recharge while
    // Golem chips back; turn 3: Tauros fires again.
    let mut battle = start_scripted(
        flat(Species::Tauros, &[MoveId::HyperBeam]),
        flat(Species::Golem, &[MoveId::Tackle]),
        vec![0, 255, 0, 0, 255, 0, 0, 255, 0, 0, 255, 0, 0, 255, 0],
    );

    let events = run_turn(&mut battle, mv(0), mv(0));
    assert!(events.iter().any(|e| matches!(
        e,
        BattleEvent::MoveUsed {
            side: SideId::A,
            mv: MoveId::HyperBeam
        }
    )));
    let choices = battle.legal_choices(SideId::A);
    assert!(choices.must_recharge);

    let events = run_turn(&mut battle, mv(0), mv(0));
    assert!(events.contains(&BattleEvent::MoveFailed {
        side: SideId::A,
        mv: None,
        reason: FailReason::MustRecharge
    }));
    // The lost turn spends no PP.
    assert_eq!(battle.state().side(SideId::A).move_slot(0).unwrap().pp, 4);

    let events = run_turn(&mut battle, mv(0), mv(0));
    assert!(events.iter().any(|e| matches!(
        e,
        BattleEvent::MoveUsed {
            side: SideId::A,
            mv: MoveId::HyperBeam
        }
    )));
}

#[test]
fn thrash_locks_repeats_and_ends_in_confusion() {
    // Turn 1: Thrash draws its 2-turn total and strikes; Golem's
    // Earthquake finds a Flying target. Turn 2: the forced repeat lands
    // and the lock ends in self-inflicted confusion (draw 0 -> 2 turns).
    let mut battle = start_scripted(
        flat(Species::Dragonite, &[MoveId::Thrash]),
        flat(Species::Golem, &[MoveId::Earthquake]),
        vec![0, 0, 255, 0, 0, 0, 0, 255, 0, 0],
    );

    let events = run_turn(&mut battle, mv(0), mv(0));
    assert!(events.iter().any(|e| matches!(e, BattleEvent::DamageDealt { side: SideId::B, .. })));
    assert!(events.contains(&BattleEvent::MoveFailed {
        side: SideId::B,
        mv: Some(MoveId::Earthquake),
        reason: FailReason::Immune
    }));
    assert!(matches!(
        battle.state().side(SideId::A).overlay.commitment,
        Some(Commitment::Thrashing { turns_left: 1, .. })
    ));
    assert_eq!(battle.legal_choices(SideId::A).forced, Some(MoveId::Thrash));

    let events = run_turn(&mut battle, mv(0), mv(0));
    assert!(events.contains(&BattleEvent::ConfusionStarted { side: SideId::A }));
    assert_eq!(battle.state().side(SideId::A).overlay.commitment, None);
    assert_eq!(battle.state().side(SideId::A).overlay.confusion, 2);

    // PP went down once, on the turn the lock started.
    assert_eq!(battle.state().side(SideId::A).move_slot(0).unwrap().pp, 19);
}

#[test]
fn thrashing_reuses_the_accuracy_resolved_on_its_first_turn() {
    // The commitment carries a full 255 threshold even though the
    // defender has since maxed evasion; the repeat still connects.
    let mut state = duel_state(
        flat(Species::Dragonite, &[MoveId::Thrash]),
        flat(Species::Golem, &[MoveId::Earthquake]),
    );
    state.side_mut(SideId::A).overlay.commitment = Some(Commitment::Thrashing {
        mv: MoveId::Thrash,
        turns_left: 2,
        locked_accuracy: Some(255),
    });
    state.side_mut(SideId::B).overlay.stages.apply(StatKind::Evasion, 6);

    let events = apply_move(&mut state, SideId::A, MoveId::Thrash, vec![254, 255, 0]);
    assert!(events.iter().any(|e| matches!(e, BattleEvent::DamageDealt { side: SideId::B, .. })));
}

#[test]
fn bide_stores_damage_and_releases_double() {
    // Tauros is faster and slams every turn (49 each). Bide starts on
    // turn 1 (after the first hit, which therefore does not count),
    // stores turns 2 and 3, then releases 2 * (49 + 49) = 196 — enough
    // to flatten a 135 HP Tauros.
    let mut battle = start_scripted(
        flat(Species::Snorlax, &[MoveId::Bide]),
        flat(Species::Tauros, &[MoveId::BodySlam]),
        vec![
            0, 255, 0, 255, 0, // turn 1: slam (acc/crit/dmg/rider), bide length
            0, 255, 0, 255, // turn 2: slam
            0, 255, 0, 255, // turn 3: slam, then the release
        ],
    );

    let events = run_turn(&mut battle, mv(0), mv(0));
    assert!(events.iter().any(|e| matches!(
        e,
        BattleEvent::MoveUsed {
            side: SideId::A,
            mv: MoveId::Bide
        }
    )));

    run_turn(&mut battle, mv(0), mv(0));
    assert!(matches!(
        battle.state().side(SideId::A).overlay.commitment,
        Some(Commitment::Biding { stored: 49, .. })
    ));

    let events = run_turn(&mut battle, mv(0), mv(0));
    assert!(events.contains(&BattleEvent::DamageDealt {
        side: SideId::B,
        amount: 135,
        remaining_hp: 0
    }));
    assert!(events.contains(&BattleEvent::Victory { side: SideId::A }));
}

#[test]
fn sleep_disrupts_a_charge_commitment() {
    // Turn 1: Alakazam's Hypnosis misses (roll 200) and Tauros commits
    // to Razor Wind. Turn 2: Hypnosis lands first (Alakazam is faster),
    // so the committed strike never comes and the lock is dropped.
    let mut battle = start_scripted(
        flat(Species::Alakazam, &[MoveId::Hypnosis]),
        flat(Species::Tauros, &[MoveId::RazorWind]),
        vec![200, 0, 1],
    );

    let events = run_turn(&mut battle, mv(0), mv(0));
    assert!(events.contains(&BattleEvent::MoveFailed {
        side: SideId::A,
        mv: Some(MoveId::Hypnosis),
        reason: FailReason::Missed
    }));
    assert!(events.contains(&BattleEvent::ChargingStarted {
        side: SideId::B,
        mv: MoveId::RazorWind
    }));

    let events = run_turn(&mut battle, mv(0), mv(0));
    assert!(events.contains(&BattleEvent::MoveFailed {
        side: SideId::B,
        mv: Some(MoveId::RazorWind),
        reason: FailReason::Asleep
    }));
    assert!(!events
        .iter()
        .any(|e| matches!(e, BattleEvent::DamageDealt { side: SideId::A, .. })));
    assert_eq!(battle.state().side(SideId::B).overlay.commitment, None);
}
