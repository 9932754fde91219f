//! Shared helpers for the scenario tests. Scripted RNG values cover the
//! whole battle in draw order, so each test narrates its own script.

use crate::battle::active::SideState;
use crate::battle::calculators;
use crate::battle::commands::execute_command_batch;
use crate::battle::engine::Battle;
use crate::battle::state::{BattleEvent, BattleState, Choice, EventBus, SideId};
use crate::monster::Monster;
use crate::moves::MoveId;
use crate::rng::ScriptedRng;

/// Start a 1-vs-1 battle over a fully scripted RNG. Returns the battle;
/// the turn-0 switch-in events are discarded.
pub fn start_scripted(a: Monster, b: Monster, script: Vec<u8>) -> Battle {
    let (battle, _) = Battle::start(vec![a], vec![b], Box::new(ScriptedRng::new(script)))
        .expect("battle starts");
    battle
}

/// Submit both choices for the current turn and return its events.
pub fn run_turn(battle: &mut Battle, a: Choice, b: Choice) -> Vec<BattleEvent> {
    let turn = battle.turn();
    let first = battle
        .submit_choice(SideId::A, a, turn)
        .expect("side A choice accepted");
    assert!(first.is_none(), "turn must not resolve on the first choice");
    battle
        .submit_choice(SideId::B, b, turn)
        .expect("side B choice accepted")
        .expect("turn resolves when both sides have chosen")
}

pub fn mv(index: usize) -> Choice {
    Choice::Move { index }
}

/// A bare two-side state for driving pipelines directly.
pub fn duel_state(a: Monster, b: Monster) -> BattleState {
    BattleState::new(
        SideState::new(SideId::A, vec![a]),
        SideState::new(SideId::B, vec![b]),
    )
}

/// Run one move pipeline against the state with a scripted RNG, apply
/// the commands, and return the events.
pub fn apply_move(
    state: &mut BattleState,
    user: SideId,
    mv_id: MoveId,
    script: Vec<u8>,
) -> Vec<BattleEvent> {
    let mut rng = ScriptedRng::new(script);
    let cmds = calculators::move_pipeline(state, user, mv_id, &mut rng);
    let mut bus = EventBus::new();
    execute_command_batch(cmds, state, &mut bus);
    bus.drain()
}
