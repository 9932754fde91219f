use super::common::{mv, run_turn, start_scripted};
use crate::battle::engine::Battle;
use crate::battle::state::{BattleEvent, Choice, FailReason, SideId};
use crate::errors::ChoiceError;
use crate::monster::STAT_HP;
use crate::prefabs::flat;
use crate::rng::{ScriptedRng, SystemRng};
use crate::species::Species;
use crate::MoveId;
use pretty_assertions::assert_eq;

fn tackle_battle(script: Vec<u8>) -> Battle {
    start_scripted(
        flat(Species::Pikachu, &[MoveId::Tackle]),
        flat(Species::Pikachu, &[MoveId::Tackle]),
        script,
    )
}

#[test]
fn start_emits_switch_ins_and_opens_turn_one() {
    let (battle, events) = Battle::start(
        vec![flat(Species::Pikachu, &[MoveId::Tackle])],
        vec![flat(Species::Snorlax, &[MoveId::BodySlam])],
        Box::new(ScriptedRng::new(vec![])),
    )
    .unwrap();

    assert_eq!(battle.turn(), 1);
    assert_eq!(
        events,
        vec![
            BattleEvent::SwitchedIn {
                side: SideId::A,
                species: Species::Pikachu,
                slot: 0
            },
            BattleEvent::SwitchedIn {
                side: SideId::B,
                species: Species::Snorlax,
                slot: 0
            },
        ]
    );
}

#[test]
fn start_rejects_empty_and_moveless_rosters() {
    use crate::errors::StartError;
    use crate::monster::{Genes, Monster};

    let err = Battle::start(
        vec![],
        vec![flat(Species::Pikachu, &[MoveId::Tackle])],
        Box::new(ScriptedRng::new(vec![])),
    )
    .unwrap_err();
    assert_eq!(err, StartError::EmptyRoster(SideId::A));

    let moveless = Monster::new(Species::Pikachu, 50, Genes::ZERO, [0; 5], &[]);
    let err = Battle::start(
        vec![flat(Species::Pikachu, &[MoveId::Tackle])],
        vec![moveless],
        Box::new(ScriptedRng::new(vec![])),
    )
    .unwrap_err();
    assert_eq!(err, StartError::NoMoves(SideId::B));
}

#[test]
fn stale_turn_number_is_rejected() {
    let mut battle = tackle_battle(vec![]);
    let err = battle.submit_choice(SideId::A, mv(0), 5).unwrap_err();
    assert_eq!(
        err,
        ChoiceError::StaleChoice {
            submitted: 5,
            current: 1
        }
    );
}

#[test]
fn out_of_range_and_empty_move_slots_are_rejected() {
    let mut battle = tackle_battle(vec![]);
    assert_eq!(
        battle.submit_choice(SideId::A, mv(7), 1).unwrap_err(),
        ChoiceError::InvalidTarget { side: SideId::A }
    );
    // Slot 3 exists structurally but holds no move.
    assert_eq!(
        battle.submit_choice(SideId::A, mv(3), 1).unwrap_err(),
        ChoiceError::InvalidTarget { side: SideId::A }
    );
}

#[test]
fn exhausted_pp_is_rejected_at_submission() {
    let mut monster = flat(Species::Pikachu, &[MoveId::Tackle]);
    monster.moves[0].as_mut().unwrap().pp = 0;
    let mut battle = start_scripted(monster, flat(Species::Pikachu, &[MoveId::Tackle]), vec![]);

    assert_eq!(
        battle.submit_choice(SideId::A, mv(0), 1).unwrap_err(),
        ChoiceError::InvalidTarget { side: SideId::A }
    );
}

#[test]
fn first_choice_buffers_second_resolves() {
    // Equal speed and priority: the scripted coin flip (0 < 128) puts
    // side A first. Per attack: accuracy, crit, damage roll.
    let mut battle = tackle_battle(vec![0, 0, 255, 0, 0, 255, 0]);
    let events = run_turn(&mut battle, mv(0), mv(0));

    let move_users: Vec<SideId> = events
        .iter()
        .filter_map(|event| match event {
            BattleEvent::MoveUsed { side, .. } => Some(*side),
            _ => None,
        })
        .collect();
    assert_eq!(move_users, vec![SideId::A, SideId::B]);
    assert_eq!(battle.turn(), 2);
}

#[test]
fn coin_flip_decides_order_between_equal_sides() {
    // 200 >= 128: side B acts first this time.
    let mut battle = tackle_battle(vec![200, 0, 255, 0, 0, 255, 0]);
    let events = run_turn(&mut battle, mv(0), mv(0));

    let first_mover = events.iter().find_map(|event| match event {
        BattleEvent::MoveUsed { side, .. } => Some(*side),
        _ => None,
    });
    assert_eq!(first_mover, Some(SideId::B));
}

#[test]
fn equal_sides_split_the_initiative_evenly() {
    let mut a_first = 0u32;
    let trials = 200;
    for seed in 0..trials {
        let (mut battle, _) = Battle::start(
            vec![flat(Species::Pikachu, &[MoveId::Tackle])],
            vec![flat(Species::Pikachu, &[MoveId::Tackle])],
            Box::new(SystemRng::seeded(seed)),
        )
        .unwrap();
        let events = run_turn(&mut battle, mv(0), mv(0));
        let first = events.iter().find_map(|event| match event {
            BattleEvent::MoveUsed { side, .. } => Some(*side),
            _ => None,
        });
        if first == Some(SideId::A) {
            a_first += 1;
        }
    }
    // A fair coin over 200 independent turns.
    assert!((70..=130).contains(&a_first), "side A moved first {a_first}/200 times");
}

#[test]
fn cancel_clears_a_pending_choice() {
    let mut battle = tackle_battle(vec![0, 0, 255, 0, 0, 255, 0]);
    battle.submit_choice(SideId::A, mv(0), 1).unwrap();
    battle.cancel_choice(SideId::A, 1).unwrap();

    // B's choice alone does not resolve the turn.
    assert!(battle.submit_choice(SideId::B, mv(0), 1).unwrap().is_none());
    // Resubmitting A completes the pair.
    assert!(battle.submit_choice(SideId::A, mv(0), 1).unwrap().is_some());
}

#[test]
fn cancel_with_stale_turn_fails() {
    let mut battle = tackle_battle(vec![]);
    assert_eq!(
        battle.cancel_choice(SideId::A, 3).unwrap_err(),
        ChoiceError::StaleChoice {
            submitted: 3,
            current: 1
        }
    );
}

#[test]
fn no_choices_accepted_after_victory() {
    // Golem's one-hit KO move connects (roll 0 < 76) and ends it.
    let mut battle = start_scripted(
        flat(Species::Golem, &[MoveId::Fissure]),
        flat(Species::Snorlax, &[MoveId::BodySlam]),
        vec![0],
    );
    let events = run_turn(&mut battle, mv(0), mv(0));

    assert!(events.contains(&BattleEvent::Victory { side: SideId::A }));
    assert_eq!(battle.victor(), Some(SideId::A));
    assert_eq!(
        battle.submit_choice(SideId::B, mv(0), 2).unwrap_err(),
        ChoiceError::GameOver
    );
    assert_eq!(battle.cancel_choice(SideId::B, 2).unwrap_err(), ChoiceError::GameOver);
}

#[test]
fn switch_choice_is_accepted_but_unresolved() {
    let roster_a = vec![
        flat(Species::Pikachu, &[MoveId::Tackle]),
        flat(Species::Raichu, &[MoveId::Thunderbolt]),
    ];
    let (mut battle, _) = Battle::start(
        vec![roster_a[0].clone(), roster_a[1].clone()],
        vec![flat(Species::Snorlax, &[MoveId::BodySlam])],
        Box::new(ScriptedRng::new(vec![0, 255, 0])),
    )
    .unwrap();

    // Switching to the active slot or out of range is a selection error.
    assert_eq!(
        battle.submit_choice(SideId::A, Choice::Switch { slot: 0 }, 1).unwrap_err(),
        ChoiceError::InvalidTarget { side: SideId::A }
    );
    assert_eq!(
        battle.submit_choice(SideId::A, Choice::Switch { slot: 5 }, 1).unwrap_err(),
        ChoiceError::InvalidTarget { side: SideId::A }
    );

    // A structurally valid switch is buffered, then fails at execution.
    let events = run_turn(&mut battle, Choice::Switch { slot: 1 }, mv(0));
    assert!(events.contains(&BattleEvent::MoveFailed {
        side: SideId::A,
        mv: None,
        reason: FailReason::Unimplemented
    }));

    // Body Slam flattens the still-active Pikachu; the side has a healthy
    // reserve, so there is no victor and the battle moves on.
    assert!(events
        .iter()
        .any(|event| matches!(event, BattleEvent::Fainted { side: SideId::A, .. })));
    assert_eq!(battle.victor(), None);
    assert_eq!(battle.turn(), 2);
}

#[test]
fn identical_seeds_replay_identical_battles() {
    let build = || {
        Battle::start(
            vec![flat(Species::Pikachu, &[MoveId::Tackle])],
            vec![flat(Species::Pikachu, &[MoveId::Tackle])],
            Box::new(SystemRng::seeded(9001)),
        )
        .unwrap()
        .0
    };
    let mut left = build();
    let mut right = build();

    for _ in 0..3 {
        if left.victor().is_some() {
            break;
        }
        let events_left = run_turn(&mut left, mv(0), mv(0));
        let events_right = run_turn(&mut right, mv(0), mv(0));
        assert_eq!(events_left, events_right);
    }

    let hp = |battle: &Battle, side: SideId| battle.state().side(side).active_monster().hp;
    assert_eq!(hp(&left, SideId::A), hp(&right, SideId::A));
    assert_eq!(hp(&left, SideId::B), hp(&right, SideId::B));
    assert_eq!(
        left.state().side(SideId::A).active_monster().stats[STAT_HP],
        right.state().side(SideId::A).active_monster().stats[STAT_HP]
    );
}

#[test]
fn legal_choices_report_pp_and_switches() {
    let (battle, _) = Battle::start(
        vec![
            flat(Species::Pikachu, &[MoveId::Thunderbolt, MoveId::ThunderWave]),
            flat(Species::Raichu, &[MoveId::Thunderbolt]),
        ],
        vec![flat(Species::Snorlax, &[MoveId::BodySlam])],
        Box::new(ScriptedRng::new(vec![])),
    )
    .unwrap();

    let choices = battle.legal_choices(SideId::A);
    assert_eq!(choices.moves.len(), 2);
    assert!(choices.moves.iter().all(|option| option.usable));
    assert_eq!(choices.switches, vec![1]);
    assert_eq!(choices.forced, None);
    assert!(!choices.must_recharge);
}
