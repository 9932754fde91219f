use super::common::{mv, run_turn, start_scripted};
use crate::battle::state::{BattleEvent, FailReason, SideId};
use crate::monster::StatusCondition;
use crate::prefabs::{flat, flat_at};
use crate::species::Species;
use crate::MoveId;
use pretty_assertions::assert_eq;

#[test]
fn toxic_damage_escalates_with_its_counter() {
    let mut battle = start_scripted(
        flat(Species::Venusaur, &[MoveId::Toxic, MoveId::Splash]),
        flat(Species::Snorlax, &[MoveId::Splash]),
        vec![0],
    );

    // Turn 1: Toxic lands; the first residual tick is 1/16 of 220 = 13.
    let events = run_turn(&mut battle, mv(0), mv(0));
    assert!(events.contains(&BattleEvent::StatusDamage {
        side: SideId::B,
        status: StatusCondition::Toxic(1),
        amount: 13,
        remaining_hp: 207
    }));

    // Turn 2: the counter climbs, the tick doubles.
    let events = run_turn(&mut battle, mv(1), mv(0));
    assert!(events.contains(&BattleEvent::StatusDamage {
        side: SideId::B,
        status: StatusCondition::Toxic(2),
        amount: 26,
        remaining_hp: 181
    }));
    assert_eq!(
        battle.state().side(SideId::B).active_monster().status,
        Some(StatusCondition::Toxic(2))
    );
}

#[test]
fn leech_seed_drains_into_the_opposing_active() {
    // Exeggutor seeds Snorlax; Body Slam takes 41 from Exeggutor, then
    // the end-of-turn drain moves 13 from Snorlax back across.
    let mut battle = start_scripted(
        flat(Species::Exeggutor, &[MoveId::LeechSeed]),
        flat(Species::Snorlax, &[MoveId::BodySlam]),
        vec![0, 0, 255, 0, 255],
    );

    let events = run_turn(&mut battle, mv(0), mv(0));
    assert!(events.contains(&BattleEvent::SeedDrained {
        side: SideId::B,
        amount: 13,
        remaining_hp: 207
    }));
    assert!(events.contains(&BattleEvent::Healed {
        side: SideId::A,
        amount: 13,
        new_hp: 127
    }));
}

#[test]
fn disable_expires_on_the_end_of_turn_countdown() {
    // Disable locks Body Slam for a single turn (turn-count draw 0), so
    // the lock is announced, prevents the slower action, and expires in
    // the same turn's bookkeeping.
    let mut battle = start_scripted(
        flat(Species::Alakazam, &[MoveId::Disable]),
        flat(Species::Snorlax, &[MoveId::BodySlam]),
        vec![0, 0, 0],
    );

    let events = run_turn(&mut battle, mv(0), mv(0));
    assert!(events.contains(&BattleEvent::MoveDisabled {
        side: SideId::B,
        mv: MoveId::BodySlam,
        turns: 1
    }));
    assert!(events.contains(&BattleEvent::MoveFailed {
        side: SideId::B,
        mv: Some(MoveId::BodySlam),
        reason: FailReason::Disabled
    }));
    assert!(events.contains(&BattleEvent::DisableEnded {
        side: SideId::B,
        mv: MoveId::BodySlam
    }));
    assert_eq!(battle.state().side(SideId::B).overlay.disabled, None);
}

#[test]
fn a_faint_during_actions_skips_the_residual_phase() {
    // Turn 1 poisons the runt; turn 2's Razor Leaf flattens it before
    // residuals, so no poison tick is recorded that turn.
    let mut battle = start_scripted(
        flat(Species::Venusaur, &[MoveId::PoisonPowder, MoveId::RazorLeaf]),
        flat_at(Species::Pikachu, 10, &[MoveId::Splash]),
        vec![0, 0, 200, 0],
    );

    let events = run_turn(&mut battle, mv(0), mv(0));
    assert!(events.iter().any(|e| matches!(
        e,
        BattleEvent::StatusDamage {
            side: SideId::B,
            status: StatusCondition::Poison,
            ..
        }
    )));

    let events = run_turn(&mut battle, mv(1), mv(0));
    assert!(events.iter().any(|e| matches!(e, BattleEvent::Fainted { side: SideId::B, .. })));
    assert!(events.contains(&BattleEvent::Victory { side: SideId::A }));
    assert!(!events.iter().any(|e| matches!(e, BattleEvent::StatusDamage { .. })));
}
