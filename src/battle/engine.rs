use crate::battle::active::{Commitment, DisabledMove, SideState};
use crate::battle::calculators;
use crate::battle::commands::{execute_command_batch, BattleCommand};
use crate::battle::state::{
    BattleEvent, BattleState, Choice, EventBus, FailReason, Phase, SideId,
};
use crate::battle::stats::effective_speed;
use crate::errors::{ChoiceError, StartError};
use crate::monster::{Monster, StatusCondition};
use crate::move_data::{move_data, validate_catalog, VolatileFlag};
use crate::moves::MoveId;
use crate::rng::{coin_flip, percent_roll, BattleRng};
use log::debug;
use serde::{Deserialize, Serialize};

/// One selectable move as reported to the collaborator layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOption {
    pub index: usize,
    pub id: MoveId,
    pub pp: u8,
    pub usable: bool,
}

/// A side's currently legal choice set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalChoices {
    pub moves: Vec<MoveOption>,
    pub switches: Vec<usize>,
    /// A multi-turn commitment that will override whatever is submitted.
    pub forced: Option<MoveId>,
    /// The side loses this turn to recharging.
    pub must_recharge: bool,
}

/// One battle instance. Owns the state and the injected RNG; processes
/// exactly one turn at a time, synchronously, and performs no I/O.
#[derive(Debug)]
pub struct Battle {
    state: BattleState,
    rng: Box<dyn BattleRng>,
}

impl Battle {
    /// Construct a battle and field both sides' first roster slots.
    /// Returns the instance together with turn 0's switch-in events; the
    /// first choices are submitted for turn 1.
    pub fn start(
        roster_a: Vec<Monster>,
        roster_b: Vec<Monster>,
        rng: Box<dyn BattleRng>,
    ) -> Result<(Battle, Vec<BattleEvent>), StartError> {
        validate_catalog().expect("move catalog is internally consistent");

        for (side, roster) in [(SideId::A, &roster_a), (SideId::B, &roster_b)] {
            if roster.is_empty() {
                return Err(StartError::EmptyRoster(side));
            }
            if roster.iter().any(|monster| monster.moves.iter().all(Option::is_none)) {
                return Err(StartError::NoMoves(side));
            }
        }

        let mut state = BattleState::new(
            SideState::new(SideId::A, roster_a),
            SideState::new(SideId::B, roster_b),
        );
        let mut bus = EventBus::new();
        for side in [SideId::A, SideId::B] {
            bus.push(BattleEvent::SwitchedIn {
                side,
                species: state.side(side).active_monster().species,
                slot: 0,
            });
        }
        state.turn = 1;

        Ok((Battle { state, rng }, bus.drain()))
    }

    pub fn turn(&self) -> u32 {
        self.state.turn
    }

    pub fn victor(&self) -> Option<SideId> {
        self.state.victor()
    }

    /// Read-only view of the full battle state. Redaction for viewers is
    /// the collaborator's concern, not the engine's.
    pub fn state(&self) -> &BattleState {
        &self.state
    }

    /// What this side may legally do right now.
    pub fn legal_choices(&self, side: SideId) -> LegalChoices {
        let side_state = self.state.side(side);
        let forced = side_state
            .overlay
            .commitment
            .as_ref()
            .and_then(|commitment| commitment.forced_move());
        let must_recharge = matches!(side_state.overlay.commitment, Some(Commitment::Recharging));
        let disabled = side_state.overlay.disabled;

        let moves = (0..4)
            .filter_map(|index| {
                side_state.move_slot(index).map(|slot| MoveOption {
                    index,
                    id: slot.id,
                    pp: slot.pp,
                    usable: slot.pp > 0 && disabled.map_or(true, |d| d.mv != slot.id),
                })
            })
            .collect();

        let switches = (0..side_state.roster.len())
            .filter(|&slot| slot != side_state.active && !side_state.roster[slot].is_fainted())
            .collect();

        LegalChoices {
            moves,
            switches,
            forced,
            must_recharge,
        }
    }

    /// Buffer one side's choice for the given turn. When this call
    /// completes the pair, the whole turn resolves synchronously and its
    /// events are returned; otherwise `None`.
    pub fn submit_choice(
        &mut self,
        side: SideId,
        choice: Choice,
        for_turn: u32,
    ) -> Result<Option<Vec<BattleEvent>>, ChoiceError> {
        if self.state.victor().is_some() {
            return Err(ChoiceError::GameOver);
        }
        if for_turn != self.state.turn {
            return Err(ChoiceError::StaleChoice {
                submitted: for_turn,
                current: self.state.turn,
            });
        }
        self.validate_choice(side, choice)?;
        self.state.pending[side.index()] = Some(choice);

        if self.state.pending.iter().all(Option::is_some) {
            Ok(Some(self.resolve_turn()))
        } else {
            Ok(None)
        }
    }

    /// Clear a previously stored pending choice.
    pub fn cancel_choice(&mut self, side: SideId, for_turn: u32) -> Result<(), ChoiceError> {
        if self.state.victor().is_some() {
            return Err(ChoiceError::GameOver);
        }
        if for_turn != self.state.turn {
            return Err(ChoiceError::StaleChoice {
                submitted: for_turn,
                current: self.state.turn,
            });
        }
        self.state.pending[side.index()] = None;
        Ok(())
    }

    fn validate_choice(&self, side: SideId, choice: Choice) -> Result<(), ChoiceError> {
        let side_state = self.state.side(side);
        match choice {
            Choice::Move { index } => {
                if index >= 4 {
                    return Err(ChoiceError::InvalidTarget { side });
                }
                let slot = side_state
                    .move_slot(index)
                    .ok_or(ChoiceError::InvalidTarget { side })?;
                // A committed side's submission is overridden anyway, so
                // an empty PP counter is not held against it.
                let committed = side_state.overlay.commitment.is_some();
                if !committed && slot.pp == 0 {
                    return Err(ChoiceError::InvalidTarget { side });
                }
                Ok(())
            }
            Choice::Switch { slot } => {
                if slot >= side_state.roster.len()
                    || slot == side_state.active
                    || side_state.roster[slot].is_fainted()
                {
                    return Err(ChoiceError::InvalidTarget { side });
                }
                Ok(())
            }
        }
    }

    fn resolve_turn(&mut self) -> Vec<BattleEvent> {
        let mut bus = EventBus::new();
        self.state.phase = Phase::Resolving;
        debug!("resolving turn {}", self.state.turn);
        bus.push(BattleEvent::TurnStarted {
            turn: self.state.turn,
        });

        let order = self.action_order();
        let mut interrupted = false;
        for &side in order.iter() {
            if self.state.victor().is_some() {
                break;
            }
            self.execute_action(side, &mut bus);
            // Any faint stops the remaining queued actions and skips the
            // end-of-turn phase.
            if self.any_active_fainted() {
                interrupted = true;
                self.evaluate_victory(&mut bus);
                break;
            }
        }

        if !interrupted && self.state.victor().is_none() {
            self.end_of_turn(order, &mut bus);
        }

        if self.state.victor().is_none() {
            self.state.phase = Phase::TurnComplete;
        }
        self.finalize_turn(&mut bus);
        bus.drain()
    }

    /// Priority bracket first, stage-modified Speed second, coin flip
    /// last. Paralysis is not reapplied here; it already rewrote the raw
    /// stat when it landed.
    fn action_order(&mut self) -> [SideId; 2] {
        let priority_a = side_priority(&self.state, SideId::A);
        let priority_b = side_priority(&self.state, SideId::B);
        if priority_a != priority_b {
            return if priority_a > priority_b {
                [SideId::A, SideId::B]
            } else {
                [SideId::B, SideId::A]
            };
        }

        let speed_a = effective_speed(self.state.side(SideId::A));
        let speed_b = effective_speed(self.state.side(SideId::B));
        if speed_a != speed_b {
            return if speed_a > speed_b {
                [SideId::A, SideId::B]
            } else {
                [SideId::B, SideId::A]
            };
        }

        if coin_flip(self.rng.as_mut()) {
            [SideId::A, SideId::B]
        } else {
            [SideId::B, SideId::A]
        }
    }

    fn execute_action(&mut self, side: SideId, bus: &mut EventBus) {
        let commitment = self.state.side(side).overlay.commitment.clone();

        // A recharge turn is lost outright: no PP, no last-move, no
        // prevention rolls.
        if matches!(commitment, Some(Commitment::Recharging)) {
            execute_command_batch(
                vec![
                    BattleCommand::SetCommitment {
                        side,
                        commitment: None,
                    },
                    BattleCommand::EmitEvent(BattleEvent::MoveFailed {
                        side,
                        mv: None,
                        reason: FailReason::MustRecharge,
                    }),
                ],
                &mut self.state,
                bus,
            );
            return;
        }

        // Bide runs its own clock.
        if matches!(commitment, Some(Commitment::Biding { .. })) {
            if self.prevention_checks(side, MoveId::Bide, bus) {
                return;
            }
            let cmds = calculators::bide_tick(&self.state, side);
            execute_command_batch(cmds, &mut self.state, bus);
            return;
        }

        let forced = commitment.as_ref().and_then(|c| c.forced_move());
        let mv = match forced {
            Some(mv) => {
                if self.prevention_checks(side, mv, bus) {
                    // A disrupted lock is dropped, vanish included.
                    let mut cmds = vec![BattleCommand::SetCommitment {
                        side,
                        commitment: None,
                    }];
                    if self.state.side(side).has_flag(VolatileFlag::Invulnerable) {
                        cmds.push(BattleCommand::SetFlag {
                            side,
                            flag: VolatileFlag::Invulnerable,
                            value: false,
                        });
                    }
                    execute_command_batch(cmds, &mut self.state, bus);
                    return;
                }
                bus.push(BattleEvent::MoveUsed { side, mv });
                mv
            }
            None => {
                let choice = self.state.pending[side.index()].expect("both sides have chosen");
                match choice {
                    Choice::Switch { .. } => {
                        // Accepted structurally; execution semantics are
                        // an unresolved design gap.
                        bus.push(BattleEvent::MoveFailed {
                            side,
                            mv: None,
                            reason: FailReason::Unimplemented,
                        });
                        return;
                    }
                    Choice::Move { index } => {
                        let Some(slot) = self.state.side(side).move_slot(index) else {
                            bus.push(BattleEvent::MoveFailed {
                                side,
                                mv: None,
                                reason: FailReason::Generic,
                            });
                            return;
                        };
                        let mv = slot.id;
                        if self.prevention_checks(side, mv, bus) {
                            return;
                        }
                        execute_command_batch(
                            vec![
                                BattleCommand::DeductPp { side, slot: index },
                                BattleCommand::EmitEvent(BattleEvent::MoveUsed { side, mv }),
                                BattleCommand::SetLastMove { side, mv: Some(mv) },
                            ],
                            &mut self.state,
                            bus,
                        );
                        mv
                    }
                }
            }
        };

        let cmds = calculators::move_pipeline(&self.state, side, mv, self.rng.as_mut());
        execute_command_batch(cmds, &mut self.state, bus);
    }

    /// Status and volatile checks that can consume the turn before the
    /// move fires. Order: sleep, freeze, flinch, disable, confusion,
    /// paralysis. Returns true when the action is prevented; in that case
    /// no PP is spent and last-move is untouched.
    fn prevention_checks(&mut self, side: SideId, mv: MoveId, bus: &mut EventBus) -> bool {
        let status = self.state.side(side).active_monster().status;

        if let Some(StatusCondition::Sleep(turns)) = status {
            if turns > 1 {
                execute_command_batch(
                    vec![
                        BattleCommand::SetStatus {
                            side,
                            status: Some(StatusCondition::Sleep(turns - 1)),
                        },
                        BattleCommand::EmitEvent(BattleEvent::MoveFailed {
                            side,
                            mv: Some(mv),
                            reason: FailReason::Asleep,
                        }),
                    ],
                    &mut self.state,
                    bus,
                );
            } else {
                // Waking up consumes the turn.
                execute_command_batch(
                    vec![
                        BattleCommand::SetStatus { side, status: None },
                        BattleCommand::EmitEvent(BattleEvent::StatusCleared {
                            side,
                            status: StatusCondition::Sleep(0),
                        }),
                    ],
                    &mut self.state,
                    bus,
                );
            }
            return true;
        }

        if matches!(status, Some(StatusCondition::Freeze)) {
            bus.push(BattleEvent::MoveFailed {
                side,
                mv: Some(mv),
                reason: FailReason::Frozen,
            });
            return true;
        }

        if self.state.side(side).overlay.flinched {
            bus.push(BattleEvent::MoveFailed {
                side,
                mv: Some(mv),
                reason: FailReason::Flinched,
            });
            return true;
        }

        if let Some(DisabledMove { mv: locked, .. }) = self.state.side(side).overlay.disabled {
            if locked == mv {
                bus.push(BattleEvent::MoveFailed {
                    side,
                    mv: Some(mv),
                    reason: FailReason::Disabled,
                });
                return true;
            }
        }

        let confusion = self.state.side(side).overlay.confusion;
        if confusion > 0 {
            let next = confusion - 1;
            execute_command_batch(
                vec![BattleCommand::SetConfusion { side, turns: next }],
                &mut self.state,
                bus,
            );
            if next == 0 {
                bus.push(BattleEvent::ConfusionEnded { side });
            } else if coin_flip(self.rng.as_mut()) {
                bus.push(BattleEvent::MoveFailed {
                    side,
                    mv: Some(mv),
                    reason: FailReason::Confused,
                });
                let cmds = calculators::confusion_self_hit(&self.state, side, self.rng.as_mut());
                execute_command_batch(cmds, &mut self.state, bus);
                return true;
            }
        }

        if matches!(status, Some(StatusCondition::Paralysis))
            && percent_roll(self.rng.as_mut(), 25.0)
        {
            bus.push(BattleEvent::MoveFailed {
                side,
                mv: Some(mv),
                reason: FailReason::FullyParalyzed,
            });
            return true;
        }

        false
    }

    /// Ordered residual phase, run only when no faint interrupted the
    /// actions: per side in action order, burn/poison, then toxic, then
    /// leech-seed drain; afterwards the disable countdown.
    fn end_of_turn(&mut self, order: [SideId; 2], bus: &mut EventBus) {
        for &side in order.iter() {
            self.residual_damage(side, bus);
            if self.any_active_fainted() {
                self.evaluate_victory(bus);
                return;
            }
        }

        for &side in order.iter() {
            if let Some(disabled) = self.state.side(side).overlay.disabled {
                let cmds = if disabled.turns_left <= 1 {
                    vec![
                        BattleCommand::SetDisabled {
                            side,
                            disabled: None,
                        },
                        BattleCommand::EmitEvent(BattleEvent::DisableEnded {
                            side,
                            mv: disabled.mv,
                        }),
                    ]
                } else {
                    vec![BattleCommand::SetDisabled {
                        side,
                        disabled: Some(DisabledMove {
                            mv: disabled.mv,
                            turns_left: disabled.turns_left - 1,
                        }),
                    }]
                };
                execute_command_batch(cmds, &mut self.state, bus);
            }
        }
    }

    fn residual_damage(&mut self, side: SideId, bus: &mut EventBus) {
        let (mut hp, max, status, seeded, species) = {
            let side_state = self.state.side(side);
            let monster = side_state.active_monster();
            (
                monster.hp,
                monster.max_hp(),
                monster.status,
                side_state.has_flag(VolatileFlag::Seeded),
                monster.species,
            )
        };
        if hp == 0 {
            return;
        }

        let mut cmds = Vec::new();

        match status {
            Some(condition @ (StatusCondition::Burn | StatusCondition::Poison)) => {
                let amount = (max / 16).max(1).min(hp);
                hp -= amount;
                cmds.push(BattleCommand::DealDamage { side, amount });
                cmds.push(BattleCommand::EmitEvent(BattleEvent::StatusDamage {
                    side,
                    status: condition,
                    amount,
                    remaining_hp: hp,
                }));
                if hp == 0 {
                    cmds.push(BattleCommand::EmitEvent(BattleEvent::Fainted { side, species }));
                }
            }
            Some(StatusCondition::Toxic(counter)) => {
                let counter = counter.saturating_add(1);
                cmds.push(BattleCommand::SetStatus {
                    side,
                    status: Some(StatusCondition::Toxic(counter)),
                });
                let amount = ((counter as u32 * (max as u32 / 16)).max(1) as u16).min(hp);
                hp -= amount;
                cmds.push(BattleCommand::DealDamage { side, amount });
                cmds.push(BattleCommand::EmitEvent(BattleEvent::StatusDamage {
                    side,
                    status: StatusCondition::Toxic(counter),
                    amount,
                    remaining_hp: hp,
                }));
                if hp == 0 {
                    cmds.push(BattleCommand::EmitEvent(BattleEvent::Fainted { side, species }));
                }
            }
            _ => {}
        }

        if hp > 0 && seeded {
            let amount = (max / 16).max(1).min(hp);
            hp -= amount;
            cmds.push(BattleCommand::DealDamage { side, amount });
            cmds.push(BattleCommand::EmitEvent(BattleEvent::SeedDrained {
                side,
                amount,
                remaining_hp: hp,
            }));
            if hp == 0 {
                cmds.push(BattleCommand::EmitEvent(BattleEvent::Fainted { side, species }));
            }

            let opponent = side.opponent();
            let opp_monster = self.state.side(opponent).active_monster();
            if !opp_monster.is_fainted() {
                let restored = amount.min(opp_monster.max_hp() - opp_monster.hp);
                if restored > 0 {
                    cmds.push(BattleCommand::Heal {
                        side: opponent,
                        amount: restored,
                    });
                    cmds.push(BattleCommand::EmitEvent(BattleEvent::Healed {
                        side: opponent,
                        amount: restored,
                        new_hp: opp_monster.hp + restored,
                    }));
                }
            }
        }

        execute_command_batch(cmds, &mut self.state, bus);
    }

    fn any_active_fainted(&self) -> bool {
        [SideId::A, SideId::B]
            .iter()
            .any(|&side| self.state.side(side).active_monster().is_fainted())
    }

    fn evaluate_victory(&mut self, bus: &mut EventBus) -> bool {
        if self.state.victor().is_some() {
            return true;
        }
        let a_out = self.state.side(SideId::A).is_defeated();
        let b_out = self.state.side(SideId::B).is_defeated();
        let victor = match (a_out, b_out) {
            (true, _) => Some(SideId::B),
            (false, true) => Some(SideId::A),
            (false, false) => None,
        };
        if let Some(victor) = victor {
            self.state.phase = Phase::Finished { victor };
            bus.push(BattleEvent::Victory { side: victor });
            true
        } else {
            false
        }
    }

    fn finalize_turn(&mut self, bus: &mut EventBus) {
        // Flinch never outlives the turn it was stamped in.
        for side in [SideId::A, SideId::B] {
            if self.state.side(side).overlay.flinched {
                execute_command_batch(
                    vec![BattleCommand::SetFlinched { side, value: false }],
                    &mut self.state,
                    bus,
                );
            }
        }

        self.state.pending = [None, None];
        bus.push(BattleEvent::TurnEnded);

        if self.state.victor().is_none() {
            self.state.turn += 1;
            self.state.phase = Phase::AwaitingChoices;
        }
        debug!("turn finalized; next turn {}", self.state.turn);
    }
}

/// Priority bracket for whatever a side will actually do this turn: its
/// commitment's move if one exists, otherwise the chosen move. Switches
/// and recharge turns sit in the default bracket.
fn side_priority(state: &BattleState, side: SideId) -> i8 {
    let side_state = state.side(side);
    if let Some(commitment) = &side_state.overlay.commitment {
        return commitment
            .forced_move()
            .map(|mv| move_data(mv).priority)
            .unwrap_or(0);
    }
    match state.pending[side.index()] {
        Some(Choice::Move { index }) => side_state
            .move_slot(index)
            .map(|slot| move_data(slot.id).priority)
            .unwrap_or(0),
        _ => 0,
    }
}
