use crate::battle::state::SideId;
use crate::moves::MoveId;
use thiserror::Error;

/// Selection-tier errors. These are returned to the caller before any
/// battle state is touched; they never correspond to in-battle outcomes,
/// which are events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChoiceError {
    /// The submitted turn number does not match the battle's current turn.
    #[error("choice was for turn {submitted} but the battle is on turn {current}")]
    StaleChoice { submitted: u32, current: u32 },

    /// Move index out of range, empty slot, or no PP remaining; or a
    /// switch slot that is out of range, fainted, or already active.
    #[error("invalid target for {side:?}")]
    InvalidTarget { side: SideId },

    /// The battle has ended; no further choices are accepted.
    #[error("the battle is over")]
    GameOver,
}

/// Errors raised when constructing a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StartError {
    #[error("side {0:?} has an empty roster")]
    EmptyRoster(SideId),

    #[error("side {0:?} has a combatant with no moves")]
    NoMoves(SideId),
}

/// Catalog-integrity failures surfaced by startup validation. Any of
/// these indicates a programming error in the move table, never a
/// runtime condition.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CatalogError {
    #[error("no catalog entry for {0:?}")]
    MissingEntry(MoveId),

    #[error("{0:?} has accuracy {1} outside 1..=100")]
    BadAccuracy(MoveId, u8),

    #[error("{0:?} is damaging but has no base power")]
    MissingPower(MoveId),

    #[error("{0:?} has rider chance {1} outside (0, 100]")]
    BadRiderChance(MoveId, f32),

    #[error("{0:?} has an empty or zero-delta stage change list")]
    BadStageChange(MoveId),
}
