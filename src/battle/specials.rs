//! Bespoke pipelines for the moves that refuse to generalize. Each one
//! implements its own narrow contract; none of them share the damaging
//! pipeline's machinery beyond the accuracy primitives.

use crate::battle::active::{Commitment, DisabledMove, TransformedIdentity};
use crate::battle::calculators::{move_pipeline, resolve_accuracy, roll_hit};
use crate::battle::commands::BattleCommand;
use crate::battle::state::{BattleEvent, BattleState, FailReason, SideId};
use crate::monster::MoveSlot;
use crate::move_data::{move_data, CustomMove, VolatileFlag};
use crate::moves::MoveId;
use crate::rng::BattleRng;
use crate::species::ElementType;

pub fn custom_pipeline(
    state: &BattleState,
    user: SideId,
    mv: MoveId,
    which: CustomMove,
    rng: &mut dyn BattleRng,
) -> Vec<BattleCommand> {
    match which {
        CustomMove::Transform => transform(state, user),
        CustomMove::Mimic => mimic(state, user, mv, rng),
        CustomMove::Disable => disable(state, user, mv, rng),
        CustomMove::Metronome => metronome(state, user, rng),
        CustomMove::MirrorMove => mirror_move(state, user, mv, rng),
        CustomMove::Conversion => conversion(state, user),
        CustomMove::Haze => haze(user),
        CustomMove::LeechSeed => leech_seed(state, user, mv, rng),
        CustomMove::Bide => bide(user, rng),
        CustomMove::Substitute => substitute(state, user, mv),
    }
}

fn fail(user: SideId, mv: MoveId, reason: FailReason) -> Vec<BattleCommand> {
    vec![BattleCommand::EmitEvent(BattleEvent::MoveFailed {
        side: user,
        mv: Some(mv),
        reason,
    })]
}

/// Copy the opponent's displayed stats, types, and moves. Borrowed moves
/// get an independent PP pool capped at 5; HP and level stay the user's
/// own.
fn transform(state: &BattleState, user: SideId) -> Vec<BattleCommand> {
    let def_side = state.side(user.opponent());
    let species = def_side
        .overlay
        .transform
        .as_ref()
        .map(|identity| identity.species)
        .unwrap_or(def_side.active_monster().species);

    let mut stats = [0u16; 5];
    for (i, stat) in stats.iter_mut().enumerate() {
        *stat = def_side.raw_stat(i);
    }

    let mut moves: [Option<MoveSlot>; 4] = [None; 4];
    for (i, slot) in moves.iter_mut().enumerate() {
        *slot = def_side.move_slot(i).map(|known| MoveSlot {
            id: known.id,
            pp: known.pp.min(5),
        });
    }

    vec![
        BattleCommand::SetTransform {
            side: user,
            identity: TransformedIdentity {
                species,
                stats,
                types: def_side.current_types(),
                moves,
            },
        },
        BattleCommand::EmitEvent(BattleEvent::Transformed {
            side: user,
            into: species,
        }),
    ]
}

/// Copy a uniformly random move the target knows into the user's Mimic
/// slot, keeping the slot's current PP.
fn mimic(state: &BattleState, user: SideId, mv: MoveId, rng: &mut dyn BattleRng) -> Vec<BattleCommand> {
    let user_side = state.side(user);
    let def_side = state.side(user.opponent());

    let threshold = resolve_accuracy(user_side, def_side, move_data(mv));
    if !roll_hit(def_side, threshold, true, rng) {
        return fail(user, mv, FailReason::Missed);
    }

    let Some(slot) = user_side.find_move(MoveId::Mimic) else {
        return fail(user, mv, FailReason::Generic);
    };
    let known: Vec<MoveId> = (0..4)
        .filter_map(|i| def_side.move_slot(i).map(|s| s.id))
        .collect();
    if known.is_empty() {
        return fail(user, mv, FailReason::Generic);
    }

    let copied = known[rng.rand_range(0, known.len() as u16 - 1) as usize];
    vec![
        BattleCommand::ReplaceMoveSlot {
            side: user,
            slot,
            mv: copied,
        },
        BattleCommand::EmitEvent(BattleEvent::Mimicked { side: user, copied }),
    ]
}

/// Lock a uniformly random target move with PP remaining for 1-8 turns.
fn disable(state: &BattleState, user: SideId, mv: MoveId, rng: &mut dyn BattleRng) -> Vec<BattleCommand> {
    let defender = user.opponent();
    let user_side = state.side(user);
    let def_side = state.side(defender);

    let threshold = resolve_accuracy(user_side, def_side, move_data(mv));
    if !roll_hit(def_side, threshold, true, rng) {
        return fail(user, mv, FailReason::Missed);
    }
    if def_side.overlay.disabled.is_some() {
        return fail(user, mv, FailReason::Generic);
    }

    let candidates: Vec<MoveId> = (0..4)
        .filter_map(|i| def_side.move_slot(i))
        .filter(|slot| slot.pp > 0)
        .map(|slot| slot.id)
        .collect();
    if candidates.is_empty() {
        return fail(user, mv, FailReason::Generic);
    }

    let locked = candidates[rng.rand_range(0, candidates.len() as u16 - 1) as usize];
    let turns = rng.rand_range(1, 8) as u8;
    vec![
        BattleCommand::SetDisabled {
            side: defender,
            disabled: Some(DisabledMove {
                mv: locked,
                turns_left: turns,
            }),
        },
        BattleCommand::EmitEvent(BattleEvent::MoveDisabled {
            side: defender,
            mv: locked,
            turns,
        }),
    ]
}

/// Invoke a uniformly random catalog move. The call-style moves are
/// excluded so the dispatch cannot recurse.
fn metronome(state: &BattleState, user: SideId, rng: &mut dyn BattleRng) -> Vec<BattleCommand> {
    let chosen = loop {
        let index = rng.rand_range(0, MoveId::ALL.len() as u16 - 1) as usize;
        let candidate = MoveId::ALL[index];
        if candidate != MoveId::Metronome && candidate != MoveId::MirrorMove {
            break candidate;
        }
    };
    invoke(state, user, chosen, rng)
}

/// Use the target's last move; fails when there is nothing to reflect.
fn mirror_move(state: &BattleState, user: SideId, mv: MoveId, rng: &mut dyn BattleRng) -> Vec<BattleCommand> {
    let def_side = state.side(user.opponent());
    match def_side.overlay.last_move {
        None | Some(MoveId::MirrorMove) => fail(user, mv, FailReason::Generic),
        Some(reflected) => invoke(state, user, reflected, rng),
    }
}

/// Re-dispatch into another move's pipeline: announce it, record it as
/// the last move, and run it without spending its PP.
fn invoke(state: &BattleState, user: SideId, mv: MoveId, rng: &mut dyn BattleRng) -> Vec<BattleCommand> {
    let mut cmds = vec![
        BattleCommand::EmitEvent(BattleEvent::MoveUsed { side: user, mv }),
        BattleCommand::SetLastMove {
            side: user,
            mv: Some(mv),
        },
    ];
    cmds.extend(move_pipeline(state, user, mv, rng));
    cmds
}

/// Replace the user's type set with the opponent's.
fn conversion(state: &BattleState, user: SideId) -> Vec<BattleCommand> {
    let types = state.side(user.opponent()).current_types();
    vec![
        BattleCommand::SetTypeOverride {
            side: user,
            types: types.clone(),
        },
        BattleCommand::EmitEvent(BattleEvent::TypesConverted { side: user, types }),
    ]
}

/// Wipe every stage counter on both sides.
fn haze(user: SideId) -> Vec<BattleCommand> {
    vec![
        BattleCommand::ResetStages { side: user },
        BattleCommand::ResetStages {
            side: user.opponent(),
        },
        BattleCommand::EmitEvent(BattleEvent::StagesCleared),
    ]
}

fn leech_seed(state: &BattleState, user: SideId, mv: MoveId, rng: &mut dyn BattleRng) -> Vec<BattleCommand> {
    let defender = user.opponent();
    let user_side = state.side(user);
    let def_side = state.side(defender);

    let threshold = resolve_accuracy(user_side, def_side, move_data(mv));
    if !roll_hit(def_side, threshold, true, rng) {
        return fail(user, mv, FailReason::Missed);
    }
    if def_side.current_types().contains(&ElementType::Grass) {
        return fail(user, mv, FailReason::Immune);
    }
    if def_side.has_flag(VolatileFlag::Seeded) || def_side.overlay.substitute_hp > 0 {
        return fail(user, mv, FailReason::Generic);
    }

    vec![
        BattleCommand::SetFlag {
            side: defender,
            flag: VolatileFlag::Seeded,
            value: true,
        },
        BattleCommand::EmitEvent(BattleEvent::FlagSet {
            side: defender,
            flag: VolatileFlag::Seeded,
        }),
    ]
}

/// Commit to storing damage for 2-3 turns. The release lives in
/// `calculators::bide_tick`.
fn bide(user: SideId, rng: &mut dyn BattleRng) -> Vec<BattleCommand> {
    let turns = rng.rand_range(2, 3) as u8;
    vec![BattleCommand::SetCommitment {
        side: user,
        commitment: Some(Commitment::Biding {
            turns_left: turns,
            stored: 0,
        }),
    }]
}

/// Pay a quarter of max HP for a decoy holding a quarter plus one.
fn substitute(state: &BattleState, user: SideId, mv: MoveId) -> Vec<BattleCommand> {
    let user_side = state.side(user);
    let monster = user_side.active_monster();

    if user_side.overlay.substitute_hp > 0 {
        return fail(user, mv, FailReason::Generic);
    }
    let cost = monster.max_hp() / 4;
    if cost == 0 || monster.hp <= cost {
        return fail(user, mv, FailReason::Generic);
    }

    let remaining = monster.hp - cost;
    vec![
        BattleCommand::DealDamage {
            side: user,
            amount: cost,
        },
        BattleCommand::EmitEvent(BattleEvent::DamageDealt {
            side: user,
            amount: cost,
            remaining_hp: remaining,
        }),
        BattleCommand::SetSubstitute {
            side: user,
            hp: cost + 1,
        },
        BattleCommand::EmitEvent(BattleEvent::SubstituteCreated {
            side: user,
            hp: cost + 1,
        }),
    ]
}
