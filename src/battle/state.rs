use crate::battle::active::SideState;
use crate::monster::StatusCondition;
use crate::move_data::{StatKind, VolatileFlag};
use crate::moves::MoveId;
use crate::species::{ElementType, Species};
use serde::{Deserialize, Serialize};

/// One of the two battling sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SideId {
    A,
    B,
}

impl SideId {
    pub fn index(self) -> usize {
        match self {
            SideId::A => 0,
            SideId::B => 1,
        }
    }

    pub fn opponent(self) -> SideId {
        match self {
            SideId::A => SideId::B,
            SideId::B => SideId::A,
        }
    }

    pub fn from_index(index: usize) -> SideId {
        match index {
            0 => SideId::A,
            1 => SideId::B,
            _ => panic!("invalid side index: {}", index),
        }
    }
}

/// Turn-engine state machine. `Resolving` and `TurnComplete` are only
/// observable from inside a resolution; between calls the battle sits in
/// `AwaitingChoices` or `Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    AwaitingChoices,
    Resolving,
    TurnComplete,
    Finished { victor: SideId },
}

/// A side's action for one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Choice {
    /// Index into the active combatant's move slots.
    Move { index: usize },
    /// Index into the side's roster. Accepted structurally; execution is
    /// an unresolved design gap and fails as such.
    Switch { slot: usize },
}

/// Machine-readable reason attached to every in-battle failure event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailReason {
    Missed,
    Immune,
    /// Catch-all: already affected, nothing to restore, and similar.
    Generic,
    Asleep,
    Frozen,
    FullyParalyzed,
    Flinched,
    Confused,
    MustRecharge,
    Disabled,
    /// Blocked by the target's mist.
    Mist,
    /// Placeholder mechanics and the unresolved switch action.
    Unimplemented,
}

/// Structured record of something that happened during a turn. Events
/// are plain data; a collaborator layer serializes and redacts them
/// per viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BattleEvent {
    TurnStarted {
        turn: u32,
    },
    TurnEnded,

    SwitchedIn {
        side: SideId,
        species: Species,
        slot: usize,
    },

    MoveUsed {
        side: SideId,
        mv: MoveId,
    },
    MoveFailed {
        side: SideId,
        mv: Option<MoveId>,
        reason: FailReason,
    },
    CriticalHit {
        side: SideId,
    },
    Effectiveness {
        multiplier: f32,
    },

    DamageDealt {
        side: SideId,
        amount: u16,
        remaining_hp: u16,
    },
    SubstituteDamaged {
        side: SideId,
        amount: u16,
    },
    SubstituteCreated {
        side: SideId,
        hp: u16,
    },
    SubstituteBroke {
        side: SideId,
    },
    Healed {
        side: SideId,
        amount: u16,
        new_hp: u16,
    },

    StatusInflicted {
        side: SideId,
        status: StatusCondition,
    },
    StatusCleared {
        side: SideId,
        status: StatusCondition,
    },
    StatusDamage {
        side: SideId,
        status: StatusCondition,
        amount: u16,
        remaining_hp: u16,
    },
    SeedDrained {
        side: SideId,
        amount: u16,
        remaining_hp: u16,
    },

    StageChanged {
        side: SideId,
        stat: StatKind,
        delta: i8,
        stage: i8,
    },
    StagesCleared,
    FlagSet {
        side: SideId,
        flag: VolatileFlag,
    },

    ConfusionStarted {
        side: SideId,
    },
    ConfusionEnded {
        side: SideId,
    },
    HurtByConfusion {
        side: SideId,
        amount: u16,
        remaining_hp: u16,
    },

    ChargingStarted {
        side: SideId,
        mv: MoveId,
    },

    Transformed {
        side: SideId,
        into: Species,
    },
    Mimicked {
        side: SideId,
        copied: MoveId,
    },
    MoveDisabled {
        side: SideId,
        mv: MoveId,
        turns: u8,
    },
    DisableEnded {
        side: SideId,
        mv: MoveId,
    },
    TypesConverted {
        side: SideId,
        types: Vec<ElementType>,
    },

    Fainted {
        side: SideId,
        species: Species,
    },
    Victory {
        side: SideId,
    },
}

/// Append-only per-turn event buffer, drained when the turn is returned
/// to the caller.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        EventBus { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Hand the buffered events to the caller, clearing the buffer.
    pub fn drain(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }
}

impl std::fmt::Display for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for event in &self.events {
            writeln!(f, "  {:?}", event)?;
        }
        Ok(())
    }
}

/// Complete mutable battle state: both sides, the turn counter, the
/// phase machine, and the pending-choice buffer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleState {
    pub sides: [SideState; 2],
    pub turn: u32,
    pub phase: Phase,
    pub pending: [Option<Choice>; 2],
}

impl BattleState {
    pub fn new(side_a: SideState, side_b: SideState) -> Self {
        BattleState {
            sides: [side_a, side_b],
            turn: 0,
            phase: Phase::AwaitingChoices,
            pending: [None, None],
        }
    }

    pub fn side(&self, id: SideId) -> &SideState {
        &self.sides[id.index()]
    }

    pub fn side_mut(&mut self, id: SideId) -> &mut SideState {
        &mut self.sides[id.index()]
    }

    pub fn victor(&self) -> Option<SideId> {
        match self.phase {
            Phase::Finished { victor } => Some(victor),
            _ => None,
        }
    }
}
