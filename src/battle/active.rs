use crate::battle::state::SideId;
use crate::monster::{Monster, MoveSlot, STAT_HP};
use crate::move_data::{StatKind, VolatileFlag};
use crate::moves::MoveId;
use crate::species::{species_data, ElementType, Species};
use serde::{Deserialize, Serialize};

/// The six stage counters, each clamped to [-6, +6].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stages {
    pub attack: i8,
    pub defense: i8,
    pub special: i8,
    pub speed: i8,
    pub accuracy: i8,
    pub evasion: i8,
}

impl Stages {
    pub fn get(&self, stat: StatKind) -> i8 {
        match stat {
            StatKind::Attack => self.attack,
            StatKind::Defense => self.defense,
            StatKind::Special => self.special,
            StatKind::Speed => self.speed,
            StatKind::Accuracy => self.accuracy,
            StatKind::Evasion => self.evasion,
        }
    }

    /// Apply a delta, clamping to [-6, 6]. Returns the new stage and
    /// whether anything actually changed.
    pub fn apply(&mut self, stat: StatKind, delta: i8) -> (i8, bool) {
        let current = self.get(stat);
        let next = (current + delta).clamp(-6, 6);
        let slot = match stat {
            StatKind::Attack => &mut self.attack,
            StatKind::Defense => &mut self.defense,
            StatKind::Special => &mut self.special,
            StatKind::Speed => &mut self.speed,
            StatKind::Accuracy => &mut self.accuracy,
            StatKind::Evasion => &mut self.evasion,
        };
        *slot = next;
        (next, next != current)
    }

    pub fn reset(&mut self) {
        *self = Stages::default();
    }
}

/// One boolean field per known flag; the flag vocabulary is the closed
/// `VolatileFlag` enumeration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagSet {
    focus_energy: bool,
    mist: bool,
    light_screen: bool,
    reflect: bool,
    seeded: bool,
    invulnerable: bool,
}

impl FlagSet {
    pub fn get(&self, flag: VolatileFlag) -> bool {
        match flag {
            VolatileFlag::FocusEnergy => self.focus_energy,
            VolatileFlag::Mist => self.mist,
            VolatileFlag::LightScreen => self.light_screen,
            VolatileFlag::Reflect => self.reflect,
            VolatileFlag::Seeded => self.seeded,
            VolatileFlag::Invulnerable => self.invulnerable,
        }
    }

    pub fn set(&mut self, flag: VolatileFlag, value: bool) {
        match flag {
            VolatileFlag::FocusEnergy => self.focus_energy = value,
            VolatileFlag::Mist => self.mist = value,
            VolatileFlag::LightScreen => self.light_screen = value,
            VolatileFlag::Reflect => self.reflect = value,
            VolatileFlag::Seeded => self.seeded = value,
            VolatileFlag::Invulnerable => self.invulnerable = value,
        }
    }

    pub fn clear(&mut self) {
        *self = FlagSet::default();
    }
}

/// At most one multi-turn commitment at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Commitment {
    /// First turn spent; the strike lands next turn.
    Charging { mv: MoveId, vanish: bool },
    /// Locked into repeats. The accuracy threshold resolved on the first
    /// turn is reused on every repeat instead of being rescaled.
    Thrashing {
        mv: MoveId,
        turns_left: u8,
        locked_accuracy: Option<u8>,
    },
    /// Lost turn after a recharge move connected.
    Recharging,
    /// Storing damage; releases double the total when the counter runs
    /// out.
    Biding { turns_left: u8, stored: u16 },
}

impl Commitment {
    /// The move this commitment forces the side to repeat, if any.
    pub fn forced_move(&self) -> Option<MoveId> {
        match self {
            Commitment::Charging { mv, .. } => Some(*mv),
            Commitment::Thrashing { mv, .. } => Some(*mv),
            Commitment::Biding { .. } => Some(MoveId::Bide),
            Commitment::Recharging => None,
        }
    }
}

/// Record of a move locked out by Disable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisabledMove {
    pub mv: MoveId,
    pub turns_left: u8,
}

/// Borrowed identity installed by Transform: the opponent's stats, types,
/// and moves with independent, capped PP. The wearer's HP and level stay
/// its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformedIdentity {
    pub species: Species,
    pub stats: [u16; 5],
    pub types: Vec<ElementType>,
    pub moves: [Option<MoveSlot>; 4],
}

/// Battle-scoped overlay on the currently fielded combatant. Everything
/// here resets on switch-in; substitute and confusion are independent
/// counters that only exist while the combatant is active.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveState {
    pub stages: Stages,
    pub flags: FlagSet,
    /// 0 = no substitute.
    pub substitute_hp: u16,
    /// 0 = not confused; decremented on each action attempt.
    pub confusion: u8,
    /// Set by a flinch rider this turn, cleared at end of turn.
    pub flinched: bool,
    pub commitment: Option<Commitment>,
    pub disabled: Option<DisabledMove>,
    pub last_move: Option<MoveId>,
    pub transform: Option<TransformedIdentity>,
    /// Type replacement from Conversion.
    pub type_override: Option<Vec<ElementType>>,
}

impl ActiveState {
    pub fn reset(&mut self) {
        *self = ActiveState::default();
    }
}

/// One side of the battle: the roster, which slot is fielded, and the
/// volatile overlay on that slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SideState {
    pub id: SideId,
    pub roster: Vec<Monster>,
    pub active: usize,
    pub overlay: ActiveState,
}

impl SideState {
    pub fn new(id: SideId, roster: Vec<Monster>) -> Self {
        SideState {
            id,
            roster,
            active: 0,
            overlay: ActiveState::default(),
        }
    }

    pub fn active_monster(&self) -> &Monster {
        &self.roster[self.active]
    }

    pub fn active_monster_mut(&mut self) -> &mut Monster {
        &mut self.roster[self.active]
    }

    /// Read a computed stat through the transform overlay. HP is always
    /// the combatant's own.
    pub fn raw_stat(&self, index: usize) -> u16 {
        if index != STAT_HP {
            if let Some(identity) = &self.overlay.transform {
                return identity.stats[index];
            }
        }
        self.active_monster().stats[index]
    }

    /// The fielded combatant's current type set: conversion override,
    /// then transform identity, then species typing.
    pub fn current_types(&self) -> Vec<ElementType> {
        if let Some(types) = &self.overlay.type_override {
            return types.clone();
        }
        if let Some(identity) = &self.overlay.transform {
            return identity.types.clone();
        }
        species_data(self.active_monster().species).types.clone()
    }

    /// Move slot read through the transform overlay.
    pub fn move_slot(&self, index: usize) -> Option<&MoveSlot> {
        if let Some(identity) = &self.overlay.transform {
            return identity.moves.get(index).and_then(|slot| slot.as_ref());
        }
        self.active_monster().moves.get(index).and_then(|slot| slot.as_ref())
    }

    pub fn move_slot_mut(&mut self, index: usize) -> Option<&mut MoveSlot> {
        if let Some(identity) = &mut self.overlay.transform {
            return identity.moves.get_mut(index).and_then(|slot| slot.as_mut());
        }
        self.roster[self.active].moves.get_mut(index).and_then(|slot| slot.as_mut())
    }

    /// Locate the slot index holding a given move, if any.
    pub fn find_move(&self, mv: MoveId) -> Option<usize> {
        (0..4).find(|&i| self.move_slot(i).map(|slot| slot.id) == Some(mv))
    }

    /// Field a roster slot, wiping all volatile state.
    pub fn switch_in(&mut self, slot: usize) {
        self.overlay.reset();
        self.active = slot;
    }

    /// Whether every combatant on this side is at 0 HP.
    pub fn is_defeated(&self) -> bool {
        self.roster.iter().all(|monster| monster.is_fainted())
    }

    pub fn has_flag(&self, flag: VolatileFlag) -> bool {
        self.overlay.flags.get(flag)
    }
}
