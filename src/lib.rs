//! Retromon Battle Engine
//!
//! A first-generation monster battle engine: a synchronous turn resolver
//! that reproduces the era's interacting, order-sensitive combat rules —
//! stat stages, substitutes, confusion, multi-turn locks, type-chart
//! quirks, rounding bugs and all. The engine performs no I/O: it consumes
//! one choice per side, resolves the turn, and emits a structured event
//! log for a collaborator layer to serialize and redact.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod errors;
pub mod monster;
pub mod move_data;
pub mod moves;
pub mod prefabs;
pub mod rng;
pub mod species;

// --- PUBLIC API RE-EXPORTS ---

// The battle instance and its collaborator-facing surface.
pub use battle::engine::{Battle, LegalChoices, MoveOption};
pub use battle::state::{BattleEvent, BattleState, Choice, FailReason, Phase, SideId};

// Core data-model types.
pub use monster::{Genes, Monster, MoveSlot, StatusCondition};
pub use moves::MoveId;
pub use species::{species_data, BaseStats, ElementType, Species, SpeciesData};

// Catalog access and startup validation.
pub use move_data::{move_data, validate_catalog, MoveData, MoveKind};

// Injectable randomness.
pub use rng::{BattleRng, ScriptedRng, SystemRng};

// Error taxonomy.
pub use errors::{CatalogError, ChoiceError, StartError};
