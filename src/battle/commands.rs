use crate::battle::active::{Commitment, DisabledMove, TransformedIdentity};
use crate::battle::state::{BattleEvent, BattleState, EventBus, SideId};
use crate::monster::StatusCondition;
use crate::move_data::{StatKind, VolatileFlag};
use crate::moves::MoveId;
use crate::species::ElementType;
use log::trace;

/// Atomic state changes. Effect pipelines compute a list of these; the
/// executor below is the only code that mutates battle state, so every
/// mutation path is observable in one place.
#[derive(Debug, Clone, PartialEq)]
pub enum BattleCommand {
    EmitEvent(BattleEvent),

    /// Damage to the active combatant's real HP, flooring at zero. A
    /// biding combatant also accumulates the amount into its commitment.
    DealDamage { side: SideId, amount: u16 },
    Heal { side: SideId, amount: u16 },
    SetStatus { side: SideId, status: Option<StatusCondition> },
    /// The paralysis raw-stat rewrite.
    HalveSpeed { side: SideId },

    ApplyStage { side: SideId, stat: StatKind, delta: i8 },
    ResetStages { side: SideId },
    SetFlag { side: SideId, flag: VolatileFlag, value: bool },
    SetSubstitute { side: SideId, hp: u16 },
    SetConfusion { side: SideId, turns: u8 },
    SetFlinched { side: SideId, value: bool },
    SetCommitment { side: SideId, commitment: Option<Commitment> },
    SetDisabled { side: SideId, disabled: Option<DisabledMove> },
    SetLastMove { side: SideId, mv: Option<MoveId> },
    DeductPp { side: SideId, slot: usize },
    SetTransform { side: SideId, identity: TransformedIdentity },
    /// Mimic: swap the move in a slot, keeping the slot's current PP.
    ReplaceMoveSlot { side: SideId, slot: usize, mv: MoveId },
    /// Conversion: replace the combatant's displayed type set.
    SetTypeOverride { side: SideId, types: Vec<ElementType> },
}

/// Apply one command to the state, routing events to the bus.
pub fn execute_command(command: BattleCommand, state: &mut BattleState, bus: &mut EventBus) {
    trace!("executing {:?}", command);
    match command {
        BattleCommand::EmitEvent(event) => bus.push(event),

        BattleCommand::DealDamage { side, amount } => {
            let side_state = state.side_mut(side);
            if let Some(Commitment::Biding { stored, .. }) = &mut side_state.overlay.commitment {
                *stored = stored.saturating_add(amount);
            }
            side_state.active_monster_mut().take_damage(amount);
        }

        BattleCommand::Heal { side, amount } => {
            state.side_mut(side).active_monster_mut().heal(amount);
        }

        BattleCommand::SetStatus { side, status } => {
            state.side_mut(side).active_monster_mut().status = status;
        }

        BattleCommand::HalveSpeed { side } => {
            let side_state = state.side_mut(side);
            if let Some(identity) = &mut side_state.overlay.transform {
                identity.stats[crate::monster::STAT_SPEED] =
                    (identity.stats[crate::monster::STAT_SPEED] / 2).max(1);
            } else {
                side_state.active_monster_mut().halve_speed();
            }
        }

        BattleCommand::ApplyStage { side, stat, delta } => {
            state.side_mut(side).overlay.stages.apply(stat, delta);
        }

        BattleCommand::ResetStages { side } => {
            state.side_mut(side).overlay.stages.reset();
        }

        BattleCommand::SetFlag { side, flag, value } => {
            state.side_mut(side).overlay.flags.set(flag, value);
        }

        BattleCommand::SetSubstitute { side, hp } => {
            state.side_mut(side).overlay.substitute_hp = hp;
        }

        BattleCommand::SetConfusion { side, turns } => {
            state.side_mut(side).overlay.confusion = turns;
        }

        BattleCommand::SetFlinched { side, value } => {
            state.side_mut(side).overlay.flinched = value;
        }

        BattleCommand::SetCommitment { side, commitment } => {
            state.side_mut(side).overlay.commitment = commitment;
        }

        BattleCommand::SetDisabled { side, disabled } => {
            state.side_mut(side).overlay.disabled = disabled;
        }

        BattleCommand::SetLastMove { side, mv } => {
            state.side_mut(side).overlay.last_move = mv;
        }

        BattleCommand::DeductPp { side, slot } => {
            if let Some(move_slot) = state.side_mut(side).move_slot_mut(slot) {
                move_slot.deduct();
            }
        }

        BattleCommand::SetTransform { side, identity } => {
            state.side_mut(side).overlay.transform = Some(identity);
        }

        BattleCommand::ReplaceMoveSlot { side, slot, mv } => {
            if let Some(move_slot) = state.side_mut(side).move_slot_mut(slot) {
                move_slot.id = mv;
            }
        }

        BattleCommand::SetTypeOverride { side, types } => {
            state.side_mut(side).overlay.type_override = Some(types);
        }
    }
}

/// Apply a pipeline's command list in order.
pub fn execute_command_batch(commands: Vec<BattleCommand>, state: &mut BattleState, bus: &mut EventBus) {
    for command in commands {
        execute_command(command, state, bus);
    }
}
