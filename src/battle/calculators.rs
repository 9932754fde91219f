use crate::battle::active::{Commitment, SideState};
use crate::battle::commands::BattleCommand;
use crate::battle::specials;
use crate::battle::state::{BattleEvent, BattleState, FailReason, SideId};
use crate::battle::stats::{
    accuracy_roll, crit_roll, crit_threshold, effective_attack, effective_defense, scaled_accuracy,
};
use crate::battle::typechart::{combined_effectiveness, effectiveness_multiplier};
use crate::monster::{StatusCondition, STAT_SPEED};
use crate::move_data::{
    move_data, ChargeStyle, DamageProfile, EffectTarget, FixedAmount, HitCount, MoveData, MoveKind,
    Rider, StatKind, StatusKind, VolatileFlag,
};
use crate::moves::MoveId;
use crate::rng::{percent_roll, BattleRng};
use crate::species::{species_data, ElementType, Species};

/// Compute the full outcome of one move use as a command list. Pure over
/// the battle state: all mutation happens later in the command executor.
pub fn move_pipeline(
    state: &BattleState,
    user: SideId,
    mv: MoveId,
    rng: &mut dyn BattleRng,
) -> Vec<BattleCommand> {
    let data = move_data(mv);
    match &data.kind {
        MoveKind::Damaging(profile) => damaging_pipeline(state, user, mv, data, profile, rng),
        MoveKind::FixedDamage(amount) => fixed_damage_pipeline(state, user, mv, data, *amount, rng),
        MoveKind::OneHitKo => one_hit_ko_pipeline(state, user, mv, data, rng),
        MoveKind::StatStage { target, changes } => {
            stat_stage_pipeline(state, user, mv, data, *target, changes, rng)
        }
        MoveKind::InflictStatus(status) => {
            inflict_status_pipeline(state, user, mv, data, *status, rng)
        }
        MoveKind::InflictConfusion => inflict_confusion_pipeline(state, user, mv, data, rng),
        MoveKind::SetFlag(flag) => set_flag_pipeline(state, user, mv, *flag),
        MoveKind::Recovery { rest } => recovery_pipeline(state, user, mv, *rest),
        MoveKind::AlwaysFail(reason) => vec![BattleCommand::EmitEvent(BattleEvent::MoveFailed {
            side: user,
            mv: Some(mv),
            reason: *reason,
        })],
        MoveKind::Custom(which) => specials::custom_pipeline(state, user, mv, *which, rng),
    }
}

/// Resolve the 0-255 hit threshold for a move, or `None` when the move
/// has no accuracy and cannot miss.
pub fn resolve_accuracy(user_side: &SideState, def_side: &SideState, data: &MoveData) -> Option<u8> {
    data.accuracy.map(|base| {
        scaled_accuracy(
            base,
            user_side.overlay.stages.accuracy,
            def_side.overlay.stages.evasion,
        )
    })
}

/// Roll the resolved threshold. An invulnerable defender auto-misses any
/// move that carries an accuracy value; accuracy-less moves punch
/// through the vanish turn.
pub fn roll_hit(
    def_side: &SideState,
    threshold: Option<u8>,
    has_accuracy: bool,
    rng: &mut dyn BattleRng,
) -> bool {
    if has_accuracy && def_side.has_flag(VolatileFlag::Invulnerable) {
        return false;
    }
    match threshold {
        None => true,
        Some(t) => accuracy_roll(rng, t),
    }
}

/// Weighted 2-5 hit count: thresholds 96/192/224 over one 0-255 draw
/// give 37.5% / 37.5% / 12.5% / 12.5%.
fn weighted_hit_count(rng: &mut dyn BattleRng) -> u8 {
    let roll = rng.rand_u8();
    if roll < 96 {
        2
    } else if roll < 192 {
        3
    } else if roll < 224 {
        4
    } else {
        5
    }
}

/// A status move cannot land on a target whose typing is immune to the
/// condition's associated element.
fn status_blocked_by_type(status: StatusKind, types: &[ElementType]) -> bool {
    let blocking = match status {
        StatusKind::Poison | StatusKind::Toxic => ElementType::Poison,
        StatusKind::Paralysis => ElementType::Electric,
        StatusKind::Burn => ElementType::Fire,
        StatusKind::Freeze => ElementType::Ice,
        StatusKind::Sleep => return false,
    };
    types.contains(&blocking)
}

/// Instantiate a status condition, drawing counters where needed.
fn materialize_status(status: StatusKind, rng: &mut dyn BattleRng) -> StatusCondition {
    match status {
        StatusKind::Sleep => StatusCondition::Sleep(rng.rand_range(1, 7) as u8),
        StatusKind::Poison => StatusCondition::Poison,
        StatusKind::Toxic => StatusCondition::Toxic(0),
        StatusKind::Burn => StatusCondition::Burn,
        StatusKind::Freeze => StatusCondition::Freeze,
        StatusKind::Paralysis => StatusCondition::Paralysis,
    }
}

fn push_status(cmds: &mut Vec<BattleCommand>, target: SideId, condition: StatusCondition) {
    cmds.push(BattleCommand::SetStatus {
        side: target,
        status: Some(condition),
    });
    if condition == StatusCondition::Paralysis {
        cmds.push(BattleCommand::HalveSpeed { side: target });
    }
    cmds.push(BattleCommand::EmitEvent(BattleEvent::StatusInflicted {
        side: target,
        status: condition,
    }));
}

/// The core damage polynomial before STAB, effectiveness, and the random
/// roll. A critical hit doubles the level term.
pub fn base_damage(level: u32, power: u32, atk: u32, def: u32, crit: bool) -> u32 {
    let crit_factor = if crit { 2 } else { 1 };
    (2 * level * crit_factor / 5 + 2) * power * atk / def.max(1) / 50 + 2
}

/// Screen doubling with the original engine's overflow bug: a doubled
/// stat past 1024 loses its remainder mod 1024.
pub fn screen_adjust(def: u32) -> u32 {
    let mut doubled = def * 2;
    if doubled > 1024 {
        doubled -= doubled % 1024;
    }
    doubled
}

pub(crate) struct HitOutcome {
    pub dealt: u16,
    pub absorbed_by_substitute: bool,
    pub target_fainted: bool,
}

/// Route one hit's damage: substitute first, excess discarded, then the
/// real combatant. Emits the matching events and tracks local HP so
/// multi-hit sequences stay consistent before the commands are applied.
pub(crate) fn apply_hit_damage(
    cmds: &mut Vec<BattleCommand>,
    target: SideId,
    damage: u16,
    target_hp: &mut u16,
    substitute_hp: &mut u16,
    target_species: Species,
) -> HitOutcome {
    if *substitute_hp > 0 {
        let absorbed = damage.min(*substitute_hp);
        cmds.push(BattleCommand::EmitEvent(BattleEvent::SubstituteDamaged {
            side: target,
            amount: absorbed,
        }));
        if damage >= *substitute_hp {
            *substitute_hp = 0;
            cmds.push(BattleCommand::SetSubstitute { side: target, hp: 0 });
            cmds.push(BattleCommand::EmitEvent(BattleEvent::SubstituteBroke { side: target }));
        } else {
            *substitute_hp -= damage;
            cmds.push(BattleCommand::SetSubstitute {
                side: target,
                hp: *substitute_hp,
            });
        }
        return HitOutcome {
            dealt: absorbed,
            absorbed_by_substitute: true,
            target_fainted: false,
        };
    }

    let dealt = damage.min(*target_hp);
    *target_hp -= dealt;
    cmds.push(BattleCommand::DealDamage {
        side: target,
        amount: dealt,
    });
    cmds.push(BattleCommand::EmitEvent(BattleEvent::DamageDealt {
        side: target,
        amount: dealt,
        remaining_hp: *target_hp,
    }));
    let target_fainted = *target_hp == 0;
    if target_fainted {
        cmds.push(BattleCommand::EmitEvent(BattleEvent::Fainted {
            side: target,
            species: target_species,
        }));
    }
    HitOutcome {
        dealt,
        absorbed_by_substitute: false,
        target_fainted,
    }
}

/// Self-KO for the explosion family. Skipped if recoil already dropped
/// the user to zero (the faint event is already out).
fn faint_user(cmds: &mut Vec<BattleCommand>, user: SideId, user_hp: u16, species: Species) {
    if user_hp > 0 {
        cmds.push(BattleCommand::DealDamage {
            side: user,
            amount: user_hp,
        });
        cmds.push(BattleCommand::EmitEvent(BattleEvent::DamageDealt {
            side: user,
            amount: user_hp,
            remaining_hp: 0,
        }));
        cmds.push(BattleCommand::EmitEvent(BattleEvent::Fainted { side: user, species }));
    }
}

#[allow(clippy::too_many_arguments)]
fn apply_rider(
    cmds: &mut Vec<BattleCommand>,
    rider: &Rider,
    def_side: &SideState,
    defender: SideId,
    def_types: &[ElementType],
    def_status: &mut Option<StatusCondition>,
    def_confused: &mut bool,
    rng: &mut dyn BattleRng,
) {
    match rider {
        Rider::Status { status, chance } => {
            if percent_roll(rng, *chance)
                && def_status.is_none()
                && !status_blocked_by_type(*status, def_types)
            {
                let condition = materialize_status(*status, rng);
                push_status(cmds, defender, condition);
                *def_status = Some(condition);
            }
        }
        Rider::StageDrop { stat, stages, chance } => {
            if percent_roll(rng, *chance) && !def_side.has_flag(VolatileFlag::Mist) {
                let current = def_side.overlay.stages.get(*stat);
                let next = (current + stages).clamp(-6, 6);
                if next != current {
                    cmds.push(BattleCommand::ApplyStage {
                        side: defender,
                        stat: *stat,
                        delta: *stages,
                    });
                    cmds.push(BattleCommand::EmitEvent(BattleEvent::StageChanged {
                        side: defender,
                        stat: *stat,
                        delta: *stages,
                        stage: next,
                    }));
                }
            }
        }
        Rider::Confuse { chance } => {
            if percent_roll(rng, *chance) && !*def_confused {
                let turns = rng.rand_range(2, 5) as u8;
                cmds.push(BattleCommand::SetConfusion {
                    side: defender,
                    turns,
                });
                cmds.push(BattleCommand::EmitEvent(BattleEvent::ConfusionStarted {
                    side: defender,
                }));
                *def_confused = true;
            }
        }
        Rider::Flinch { chance } => {
            if percent_roll(rng, *chance) {
                cmds.push(BattleCommand::SetFlinched {
                    side: defender,
                    value: true,
                });
            }
        }
    }
}

fn damaging_pipeline(
    state: &BattleState,
    user: SideId,
    mv: MoveId,
    data: &MoveData,
    profile: &DamageProfile,
    rng: &mut dyn BattleRng,
) -> Vec<BattleCommand> {
    let defender = user.opponent();
    let user_side = state.side(user);
    let def_side = state.side(defender);
    let user_species = user_side.active_monster().species;
    let mut cmds = Vec::new();

    // A charge move's first turn only commits.
    let releasing = matches!(
        user_side.overlay.commitment,
        Some(Commitment::Charging { mv: committed, .. }) if committed == mv
    );
    if let Some(style) = profile.charge {
        if !releasing {
            cmds.push(BattleCommand::EmitEvent(BattleEvent::ChargingStarted {
                side: user,
                mv,
            }));
            if style == ChargeStyle::Vanish {
                cmds.push(BattleCommand::SetFlag {
                    side: user,
                    flag: VolatileFlag::Invulnerable,
                    value: true,
                });
            }
            cmds.push(BattleCommand::SetCommitment {
                side: user,
                commitment: Some(Commitment::Charging {
                    mv,
                    vanish: style == ChargeStyle::Vanish,
                }),
            });
            return cmds;
        }
        cmds.push(BattleCommand::SetCommitment {
            side: user,
            commitment: None,
        });
        if style == ChargeStyle::Vanish {
            cmds.push(BattleCommand::SetFlag {
                side: user,
                flag: VolatileFlag::Invulnerable,
                value: false,
            });
        }
    }

    // A thrashing lock reuses the accuracy resolved on its first turn.
    let thrashing = match user_side.overlay.commitment {
        Some(Commitment::Thrashing {
            mv: committed,
            turns_left,
            locked_accuracy,
        }) if committed == mv => Some((turns_left, locked_accuracy)),
        _ => None,
    };
    let threshold = match thrashing {
        Some((_, locked)) => locked,
        None => resolve_accuracy(user_side, def_side, data),
    };
    let hit = roll_hit(def_side, threshold, data.accuracy.is_some(), rng);

    // The lock advances whether or not the strike lands.
    if profile.thrash {
        match thrashing {
            None => {
                let total = rng.rand_range(2, 3) as u8;
                cmds.push(BattleCommand::SetCommitment {
                    side: user,
                    commitment: Some(Commitment::Thrashing {
                        mv,
                        turns_left: total - 1,
                        locked_accuracy: threshold,
                    }),
                });
            }
            Some((turns_left, locked)) if turns_left > 1 => {
                cmds.push(BattleCommand::SetCommitment {
                    side: user,
                    commitment: Some(Commitment::Thrashing {
                        mv,
                        turns_left: turns_left - 1,
                        locked_accuracy: locked,
                    }),
                });
            }
            Some(_) => {
                cmds.push(BattleCommand::SetCommitment {
                    side: user,
                    commitment: None,
                });
                let turns = rng.rand_range(2, 5) as u8;
                cmds.push(BattleCommand::SetConfusion { side: user, turns });
                cmds.push(BattleCommand::EmitEvent(BattleEvent::ConfusionStarted {
                    side: user,
                }));
            }
        }
    }

    let mut user_hp = user_side.active_monster().hp;

    if !hit {
        cmds.push(BattleCommand::EmitEvent(BattleEvent::MoveFailed {
            side: user,
            mv: Some(mv),
            reason: FailReason::Missed,
        }));
        if profile.crash {
            let user_has_sub = user_side.overlay.substitute_hp > 0;
            let target_has_sub = def_side.overlay.substitute_hp > 0;
            if !(user_has_sub && !target_has_sub) {
                let dealt = 1.min(user_hp);
                user_hp -= dealt;
                cmds.push(BattleCommand::DealDamage {
                    side: user,
                    amount: dealt,
                });
                cmds.push(BattleCommand::EmitEvent(BattleEvent::DamageDealt {
                    side: user,
                    amount: dealt,
                    remaining_hp: user_hp,
                }));
                if user_hp == 0 {
                    cmds.push(BattleCommand::EmitEvent(BattleEvent::Fainted {
                        side: user,
                        species: user_species,
                    }));
                }
            }
        }
        if profile.explode {
            faint_user(&mut cmds, user, user_hp, user_species);
        }
        return cmds;
    }

    // Type immunity short-circuits before any damage math.
    let def_types = def_side.current_types();
    let eff = combined_effectiveness(data.element, &def_types);
    if eff == 0 {
        cmds.push(BattleCommand::EmitEvent(BattleEvent::MoveFailed {
            side: user,
            mv: Some(mv),
            reason: FailReason::Immune,
        }));
        if profile.explode {
            faint_user(&mut cmds, user, user_hp, user_species);
        }
        return cmds;
    }

    let base_speed = species_data(user_species).base_stats.speed;
    let crit = crit_roll(
        rng,
        crit_threshold(
            base_speed,
            profile.high_crit,
            user_side.has_flag(VolatileFlag::FocusEnergy),
        ),
    );

    let special = data.element.is_special();
    let atk = effective_attack(user_side, special) as u32;
    let mut def = effective_defense(def_side, special) as u32;

    // Screens double the relevant defense except on a critical hit. The
    // doubled value wraps at 1024 exactly the way the original overflowed.
    let screened = if special {
        def_side.has_flag(VolatileFlag::LightScreen)
    } else {
        def_side.has_flag(VolatileFlag::Reflect)
    };
    if screened && !crit {
        def = screen_adjust(def);
    }
    if profile.explode {
        def = (def / 2).max(1);
    }

    let level = user_side.active_monster().level as u32;
    let power = data.power.expect("damaging move has base power") as u32;
    let mut damage = base_damage(level, power, atk, def, crit);

    if user_side.current_types().contains(&data.element) {
        damage = damage * 3 / 2;
    }
    damage = damage * eff as u32 / 4;

    if damage == 0 {
        cmds.push(BattleCommand::EmitEvent(BattleEvent::MoveFailed {
            side: user,
            mv: Some(mv),
            reason: FailReason::Missed,
        }));
        if profile.explode {
            faint_user(&mut cmds, user, user_hp, user_species);
        }
        return cmds;
    }

    let rand = if damage == 1 {
        255
    } else {
        rng.rand_range(217, 255) as u32
    };
    let damage = ((damage * rand) / 255).max(1) as u16;

    if crit {
        cmds.push(BattleCommand::EmitEvent(BattleEvent::CriticalHit { side: user }));
    }
    if eff != 4 {
        cmds.push(BattleCommand::EmitEvent(BattleEvent::Effectiveness {
            multiplier: effectiveness_multiplier(eff),
        }));
    }

    let hit_count = match profile.hits {
        HitCount::Single => 1,
        HitCount::Double => 2,
        HitCount::Weighted => weighted_hit_count(rng),
    };

    let mut def_hp = def_side.active_monster().hp;
    let mut sub_hp = def_side.overlay.substitute_hp;
    let def_species = def_side.active_monster().species;
    let mut def_status = def_side.active_monster().status;
    let mut def_confused = def_side.overlay.confusion > 0;
    let mut total_dealt: u32 = 0;

    for _ in 0..hit_count {
        if def_hp == 0 {
            break;
        }
        let outcome = apply_hit_damage(&mut cmds, defender, damage, &mut def_hp, &mut sub_hp, def_species);
        total_dealt += outcome.dealt as u32;

        // Breaking a substitute or fainting the target suppresses riders
        // for that hit.
        if !outcome.absorbed_by_substitute && !outcome.target_fainted {
            if let Some(rider) = &profile.rider {
                apply_rider(
                    &mut cmds,
                    rider,
                    def_side,
                    defender,
                    &def_types,
                    &mut def_status,
                    &mut def_confused,
                    rng,
                );
            }
        }
    }

    if profile.drain && total_dealt > 0 {
        let heal = ((total_dealt / 2).max(1)) as u16;
        let missing = user_side.active_monster().max_hp() - user_hp;
        let restored = heal.min(missing);
        if restored > 0 {
            user_hp += restored;
            cmds.push(BattleCommand::Heal {
                side: user,
                amount: restored,
            });
            cmds.push(BattleCommand::EmitEvent(BattleEvent::Healed {
                side: user,
                amount: restored,
                new_hp: user_hp,
            }));
        }
    }

    if profile.recoil && total_dealt > 0 {
        let recoil = ((total_dealt / 4) as u16).max(1);
        let dealt = recoil.min(user_hp);
        user_hp -= dealt;
        cmds.push(BattleCommand::DealDamage {
            side: user,
            amount: dealt,
        });
        cmds.push(BattleCommand::EmitEvent(BattleEvent::DamageDealt {
            side: user,
            amount: dealt,
            remaining_hp: user_hp,
        }));
        if user_hp == 0 {
            cmds.push(BattleCommand::EmitEvent(BattleEvent::Fainted {
                side: user,
                species: user_species,
            }));
        }
    }

    if profile.explode {
        faint_user(&mut cmds, user, user_hp, user_species);
    }

    if profile.recharge {
        cmds.push(BattleCommand::SetCommitment {
            side: user,
            commitment: Some(Commitment::Recharging),
        });
    }

    cmds
}

fn fixed_damage_pipeline(
    state: &BattleState,
    user: SideId,
    mv: MoveId,
    data: &MoveData,
    amount: FixedAmount,
    rng: &mut dyn BattleRng,
) -> Vec<BattleCommand> {
    let defender = user.opponent();
    let user_side = state.side(user);
    let def_side = state.side(defender);
    let mut cmds = Vec::new();

    let threshold = resolve_accuracy(user_side, def_side, data);
    if !roll_hit(def_side, threshold, data.accuracy.is_some(), rng) {
        cmds.push(BattleCommand::EmitEvent(BattleEvent::MoveFailed {
            side: user,
            mv: Some(mv),
            reason: FailReason::Missed,
        }));
        return cmds;
    }

    // No type math, no STAB, no crits; immunities do not apply.
    let damage = match amount {
        FixedAmount::Constant(value) => value,
        FixedAmount::UserLevel => user_side.active_monster().level as u16,
    };

    let mut def_hp = def_side.active_monster().hp;
    let mut sub_hp = def_side.overlay.substitute_hp;
    apply_hit_damage(
        &mut cmds,
        defender,
        damage,
        &mut def_hp,
        &mut sub_hp,
        def_side.active_monster().species,
    );
    cmds
}

fn one_hit_ko_pipeline(
    state: &BattleState,
    user: SideId,
    mv: MoveId,
    data: &MoveData,
    rng: &mut dyn BattleRng,
) -> Vec<BattleCommand> {
    let defender = user.opponent();
    let user_side = state.side(user);
    let def_side = state.side(defender);
    let mut cmds = Vec::new();

    // A strictly faster target is untouchable: accuracy is forced to
    // zero, which can never pass a strictly-less-than roll.
    if def_side.raw_stat(STAT_SPEED) > user_side.raw_stat(STAT_SPEED) {
        cmds.push(BattleCommand::EmitEvent(BattleEvent::MoveFailed {
            side: user,
            mv: Some(mv),
            reason: FailReason::Missed,
        }));
        return cmds;
    }

    let eff = combined_effectiveness(data.element, &def_side.current_types());
    if eff == 0 {
        cmds.push(BattleCommand::EmitEvent(BattleEvent::MoveFailed {
            side: user,
            mv: Some(mv),
            reason: FailReason::Immune,
        }));
        return cmds;
    }

    let threshold = resolve_accuracy(user_side, def_side, data);
    if !roll_hit(def_side, threshold, data.accuracy.is_some(), rng) {
        cmds.push(BattleCommand::EmitEvent(BattleEvent::MoveFailed {
            side: user,
            mv: Some(mv),
            reason: FailReason::Missed,
        }));
        return cmds;
    }

    let mut def_hp = def_side.active_monster().hp;
    let mut sub_hp = def_side.overlay.substitute_hp;
    apply_hit_damage(
        &mut cmds,
        defender,
        u16::MAX,
        &mut def_hp,
        &mut sub_hp,
        def_side.active_monster().species,
    );
    cmds
}

fn stat_stage_pipeline(
    state: &BattleState,
    user: SideId,
    mv: MoveId,
    data: &MoveData,
    target: EffectTarget,
    changes: &[(StatKind, i8)],
    rng: &mut dyn BattleRng,
) -> Vec<BattleCommand> {
    let defender = user.opponent();
    let user_side = state.side(user);
    let def_side = state.side(defender);
    let mut cmds = Vec::new();

    let (target_id, target_side) = match target {
        EffectTarget::User => (user, user_side),
        EffectTarget::Target => {
            let threshold = resolve_accuracy(user_side, def_side, data);
            if !roll_hit(def_side, threshold, data.accuracy.is_some(), rng) {
                cmds.push(BattleCommand::EmitEvent(BattleEvent::MoveFailed {
                    side: user,
                    mv: Some(mv),
                    reason: FailReason::Missed,
                }));
                return cmds;
            }
            if def_side.has_flag(VolatileFlag::Mist) {
                cmds.push(BattleCommand::EmitEvent(BattleEvent::MoveFailed {
                    side: user,
                    mv: Some(mv),
                    reason: FailReason::Mist,
                }));
                return cmds;
            }
            (defender, def_side)
        }
    };

    let mut any_changed = false;
    for &(stat, delta) in changes {
        let current = target_side.overlay.stages.get(stat);
        let next = (current + delta).clamp(-6, 6);
        if next != current {
            any_changed = true;
            cmds.push(BattleCommand::ApplyStage {
                side: target_id,
                stat,
                delta,
            });
            cmds.push(BattleCommand::EmitEvent(BattleEvent::StageChanged {
                side: target_id,
                stat,
                delta,
                stage: next,
            }));
        }
    }

    if !any_changed {
        cmds.push(BattleCommand::EmitEvent(BattleEvent::MoveFailed {
            side: user,
            mv: Some(mv),
            reason: FailReason::Generic,
        }));
    }
    cmds
}

fn inflict_status_pipeline(
    state: &BattleState,
    user: SideId,
    mv: MoveId,
    data: &MoveData,
    status: StatusKind,
    rng: &mut dyn BattleRng,
) -> Vec<BattleCommand> {
    let defender = user.opponent();
    let user_side = state.side(user);
    let def_side = state.side(defender);
    let mut cmds = Vec::new();

    let threshold = resolve_accuracy(user_side, def_side, data);
    if !roll_hit(def_side, threshold, data.accuracy.is_some(), rng) {
        cmds.push(BattleCommand::EmitEvent(BattleEvent::MoveFailed {
            side: user,
            mv: Some(mv),
            reason: FailReason::Missed,
        }));
        return cmds;
    }

    if def_side.active_monster().status.is_some() {
        cmds.push(BattleCommand::EmitEvent(BattleEvent::MoveFailed {
            side: user,
            mv: Some(mv),
            reason: FailReason::Generic,
        }));
        return cmds;
    }

    let def_types = def_side.current_types();
    if combined_effectiveness(data.element, &def_types) == 0
        || status_blocked_by_type(status, &def_types)
    {
        cmds.push(BattleCommand::EmitEvent(BattleEvent::MoveFailed {
            side: user,
            mv: Some(mv),
            reason: FailReason::Immune,
        }));
        return cmds;
    }

    let condition = materialize_status(status, rng);
    push_status(&mut cmds, defender, condition);
    cmds
}

fn inflict_confusion_pipeline(
    state: &BattleState,
    user: SideId,
    mv: MoveId,
    data: &MoveData,
    rng: &mut dyn BattleRng,
) -> Vec<BattleCommand> {
    let defender = user.opponent();
    let user_side = state.side(user);
    let def_side = state.side(defender);
    let mut cmds = Vec::new();

    let threshold = resolve_accuracy(user_side, def_side, data);
    if !roll_hit(def_side, threshold, data.accuracy.is_some(), rng) {
        cmds.push(BattleCommand::EmitEvent(BattleEvent::MoveFailed {
            side: user,
            mv: Some(mv),
            reason: FailReason::Missed,
        }));
        return cmds;
    }

    if def_side.overlay.confusion > 0 || def_side.overlay.substitute_hp > 0 {
        cmds.push(BattleCommand::EmitEvent(BattleEvent::MoveFailed {
            side: user,
            mv: Some(mv),
            reason: FailReason::Generic,
        }));
        return cmds;
    }

    let turns = rng.rand_range(2, 5) as u8;
    cmds.push(BattleCommand::SetConfusion {
        side: defender,
        turns,
    });
    cmds.push(BattleCommand::EmitEvent(BattleEvent::ConfusionStarted { side: defender }));
    cmds
}

fn set_flag_pipeline(state: &BattleState, user: SideId, mv: MoveId, flag: VolatileFlag) -> Vec<BattleCommand> {
    let user_side = state.side(user);
    if user_side.has_flag(flag) {
        return vec![BattleCommand::EmitEvent(BattleEvent::MoveFailed {
            side: user,
            mv: Some(mv),
            reason: FailReason::Generic,
        })];
    }
    vec![
        BattleCommand::SetFlag {
            side: user,
            flag,
            value: true,
        },
        BattleCommand::EmitEvent(BattleEvent::FlagSet { side: user, flag }),
    ]
}

fn recovery_pipeline(state: &BattleState, user: SideId, mv: MoveId, rest: bool) -> Vec<BattleCommand> {
    let user_side = state.side(user);
    let monster = user_side.active_monster();
    let max = monster.max_hp();
    let deficit = max - monster.hp;

    // The era computed the heal check with an 8-bit comparison: a deficit
    // of zero or any exact multiple of 255 reads as "already full".
    if deficit == 0 || deficit % 255 == 0 {
        return vec![BattleCommand::EmitEvent(BattleEvent::MoveFailed {
            side: user,
            mv: Some(mv),
            reason: FailReason::Generic,
        })];
    }

    let mut cmds = Vec::new();
    if rest {
        cmds.push(BattleCommand::Heal {
            side: user,
            amount: deficit,
        });
        cmds.push(BattleCommand::EmitEvent(BattleEvent::Healed {
            side: user,
            amount: deficit,
            new_hp: max,
        }));
        let condition = StatusCondition::Sleep(2);
        cmds.push(BattleCommand::SetStatus {
            side: user,
            status: Some(condition),
        });
        cmds.push(BattleCommand::EmitEvent(BattleEvent::StatusInflicted {
            side: user,
            status: condition,
        }));
    } else {
        let amount = (max / 2).min(deficit);
        cmds.push(BattleCommand::Heal {
            side: user,
            amount,
        });
        cmds.push(BattleCommand::EmitEvent(BattleEvent::Healed {
            side: user,
            amount,
            new_hp: monster.hp + amount,
        }));
    }
    cmds
}

/// The 50% confusion self-hit: a typeless 40-power physical strike
/// against the user's own defense, no crit, no STAB, no riders. The
/// user's own substitute absorbs it if one is up.
pub fn confusion_self_hit(state: &BattleState, side: SideId, rng: &mut dyn BattleRng) -> Vec<BattleCommand> {
    let side_state = state.side(side);
    let monster = side_state.active_monster();
    let mut cmds = Vec::new();

    let atk = effective_attack(side_state, false) as u32;
    let def = effective_defense(side_state, false) as u32;
    let level = monster.level as u32;
    let damage = base_damage(level, 40, atk, def, false);
    let rand = if damage == 1 {
        255
    } else {
        rng.rand_range(217, 255) as u32
    };
    let damage = ((damage * rand) / 255).max(1) as u16;

    let mut hp = monster.hp;
    let mut sub_hp = side_state.overlay.substitute_hp;
    if sub_hp > 0 {
        apply_hit_damage(&mut cmds, side, damage, &mut hp, &mut sub_hp, monster.species);
        return cmds;
    }

    let dealt = damage.min(hp);
    hp -= dealt;
    cmds.push(BattleCommand::DealDamage {
        side,
        amount: dealt,
    });
    cmds.push(BattleCommand::EmitEvent(BattleEvent::HurtByConfusion {
        side,
        amount: dealt,
        remaining_hp: hp,
    }));
    if hp == 0 {
        cmds.push(BattleCommand::EmitEvent(BattleEvent::Fainted {
            side,
            species: monster.species,
        }));
    }
    cmds
}

/// One forced turn of an active Bide commitment: keep storing, or
/// release double the stored damage as typeless fixed damage.
pub fn bide_tick(state: &BattleState, user: SideId) -> Vec<BattleCommand> {
    let defender = user.opponent();
    let user_side = state.side(user);
    let def_side = state.side(defender);
    let mut cmds = Vec::new();

    let (turns_left, stored) = match user_side.overlay.commitment {
        Some(Commitment::Biding { turns_left, stored }) => (turns_left, stored),
        _ => return cmds,
    };

    cmds.push(BattleCommand::EmitEvent(BattleEvent::MoveUsed {
        side: user,
        mv: MoveId::Bide,
    }));

    if turns_left > 1 {
        cmds.push(BattleCommand::SetCommitment {
            side: user,
            commitment: Some(Commitment::Biding {
                turns_left: turns_left - 1,
                stored,
            }),
        });
        return cmds;
    }

    cmds.push(BattleCommand::SetCommitment {
        side: user,
        commitment: None,
    });

    if stored == 0 {
        cmds.push(BattleCommand::EmitEvent(BattleEvent::MoveFailed {
            side: user,
            mv: Some(MoveId::Bide),
            reason: FailReason::Generic,
        }));
        return cmds;
    }

    let damage = stored.saturating_mul(2);
    let mut def_hp = def_side.active_monster().hp;
    let mut sub_hp = def_side.overlay.substitute_hp;
    apply_hit_damage(
        &mut cmds,
        defender,
        damage,
        &mut def_hp,
        &mut sub_hp,
        def_side.active_monster().species,
    );
    cmds
}
