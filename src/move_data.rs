use crate::battle::state::FailReason;
use crate::moves::MoveId;
use crate::species::ElementType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Status a move or rider may inflict. Mirrors `StatusCondition` without
/// the per-instance counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKind {
    Sleep,
    Poison,
    Toxic,
    Burn,
    Freeze,
    Paralysis,
}

/// The six staged stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatKind {
    Attack,
    Defense,
    Special,
    Speed,
    Accuracy,
    Evasion,
}

/// One-shot volatile flags settable by moves or consulted by formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolatileFlag {
    FocusEnergy,
    Mist,
    LightScreen,
    Reflect,
    Seeded,
    Invulnerable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectTarget {
    User,
    Target,
}

/// Secondary effect carried by a damaging move. The chance is a float
/// percent converted to the 0-255 domain at roll time.
#[derive(Debug, Clone, PartialEq)]
pub enum Rider {
    Status { status: StatusKind, chance: f32 },
    StageDrop { stat: StatKind, stages: i8, chance: f32 },
    Confuse { chance: f32 },
    Flinch { chance: f32 },
}

/// Hit multiplicity of a damaging move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HitCount {
    #[default]
    Single,
    /// Always exactly two hits.
    Double,
    /// Weighted 2-5 hits: 37.5% / 37.5% / 12.5% / 12.5%.
    Weighted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeStyle {
    /// Spend a turn charging, then strike.
    Plain,
    /// The charge turn also makes the user untargetable.
    Vanish,
}

/// Behavior switches for the damaging pipeline. A default profile is a
/// plain single-hit attack.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DamageProfile {
    pub rider: Option<Rider>,
    pub high_crit: bool,
    /// User heals half the damage dealt.
    pub drain: bool,
    /// User takes a quarter of the damage dealt, minimum 1.
    pub recoil: bool,
    /// User faints unconditionally; defender's Defense is halved first.
    pub explode: bool,
    /// User loses the next turn.
    pub recharge: bool,
    /// On a miss the user takes 1 HP.
    pub crash: bool,
    pub charge: Option<ChargeStyle>,
    /// Locks the user into 2-3 repeats, then self-inflicts confusion.
    pub thrash: bool,
    pub hits: HitCount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedAmount {
    Constant(u16),
    UserLevel,
}

/// Moves with bespoke pipelines that do not generalize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomMove {
    Transform,
    Mimic,
    Disable,
    Metronome,
    MirrorMove,
    Conversion,
    Haze,
    LeechSeed,
    Bide,
    Substitute,
}

/// Closed set of behavioral categories. Every move is exactly one of
/// these; dispatch is a pattern match so the table stays exhaustive.
#[derive(Debug, Clone, PartialEq)]
pub enum MoveKind {
    Damaging(DamageProfile),
    /// Bypasses type math and crits entirely, including immunities.
    FixedDamage(FixedAmount),
    /// Lethal unless the target is strictly faster or type-immune.
    OneHitKo,
    StatStage {
        target: EffectTarget,
        changes: Vec<(StatKind, i8)>,
    },
    InflictStatus(StatusKind),
    InflictConfusion,
    SetFlag(VolatileFlag),
    Recovery {
        /// Full heal plus a fixed two-turn sleep instead of a half heal.
        rest: bool,
    },
    /// Placeholder for mechanics outside this engine's scope.
    AlwaysFail(FailReason),
    Custom(CustomMove),
}

/// Static catalog entry. Immutable and shared across all battles.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveData {
    pub element: ElementType,
    pub max_pp: u8,
    /// Percent; `None` means the move skips the accuracy check entirely.
    pub accuracy: Option<u8>,
    pub power: Option<u8>,
    pub priority: i8,
    pub kind: MoveKind,
}

static CATALOG: LazyLock<HashMap<MoveId, MoveData>> = LazyLock::new(build_catalog);

/// Look up a catalog entry. A missing entry is a catalog-integrity bug;
/// `validate_catalog` exists so that failure happens at startup, not here.
pub fn move_data(id: MoveId) -> &'static MoveData {
    CATALOG.get(&id).expect("move catalog covers every MoveId")
}

/// Eagerly check catalog integrity. Call once at startup; a broken
/// catalog is a programming error and fails loudly.
pub fn validate_catalog() -> Result<(), crate::errors::CatalogError> {
    use crate::errors::CatalogError;

    for id in MoveId::ALL {
        let data = CATALOG
            .get(&id)
            .ok_or(CatalogError::MissingEntry(id))?;

        if let Some(acc) = data.accuracy {
            if acc == 0 || acc > 100 {
                return Err(CatalogError::BadAccuracy(id, acc));
            }
        }
        match &data.kind {
            MoveKind::Damaging(profile) => {
                if data.power.is_none() {
                    return Err(CatalogError::MissingPower(id));
                }
                if let Some(rider) = &profile.rider {
                    let chance = match rider {
                        Rider::Status { chance, .. }
                        | Rider::StageDrop { chance, .. }
                        | Rider::Confuse { chance }
                        | Rider::Flinch { chance } => *chance,
                    };
                    if !(chance > 0.0 && chance <= 100.0) {
                        return Err(CatalogError::BadRiderChance(id, chance));
                    }
                }
            }
            MoveKind::StatStage { changes, .. } => {
                if changes.is_empty() || changes.iter().any(|(_, delta)| *delta == 0) {
                    return Err(CatalogError::BadStageChange(id));
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn plain(element: ElementType, pp: u8, accuracy: u8, power: u8) -> MoveData {
    MoveData {
        element,
        max_pp: pp,
        accuracy: Some(accuracy),
        power: Some(power),
        priority: 0,
        kind: MoveKind::Damaging(DamageProfile::default()),
    }
}

fn damaging(element: ElementType, pp: u8, accuracy: u8, power: u8, profile: DamageProfile) -> MoveData {
    MoveData {
        element,
        max_pp: pp,
        accuracy: Some(accuracy),
        power: Some(power),
        priority: 0,
        kind: MoveKind::Damaging(profile),
    }
}

fn other(element: ElementType, pp: u8, accuracy: Option<u8>, kind: MoveKind) -> MoveData {
    MoveData {
        element,
        max_pp: pp,
        accuracy,
        power: None,
        priority: 0,
        kind,
    }
}

fn self_stage(element: ElementType, pp: u8, stat: StatKind, delta: i8) -> MoveData {
    other(
        element,
        pp,
        None,
        MoveKind::StatStage {
            target: EffectTarget::User,
            changes: vec![(stat, delta)],
        },
    )
}

fn target_stage(element: ElementType, pp: u8, accuracy: u8, stat: StatKind, delta: i8) -> MoveData {
    other(
        element,
        pp,
        Some(accuracy),
        MoveKind::StatStage {
            target: EffectTarget::Target,
            changes: vec![(stat, delta)],
        },
    )
}

fn status_rider(status: StatusKind, chance: f32) -> DamageProfile {
    DamageProfile {
        rider: Some(Rider::Status { status, chance }),
        ..DamageProfile::default()
    }
}

fn build_catalog() -> HashMap<MoveId, MoveData> {
    use ElementType::*;

    let mut map = HashMap::new();
    let mut add = |id: MoveId, data: MoveData| {
        map.insert(id, data);
    };

    // Plain and rider-carrying attacks.
    add(MoveId::Tackle, plain(Normal, 35, 95, 35));
    add(MoveId::Scratch, plain(Normal, 35, 100, 40));
    add(MoveId::BodySlam, damaging(Normal, 15, 100, 85, status_rider(StatusKind::Paralysis, 30.0)));
    add(MoveId::WaterGun, plain(Water, 25, 100, 40));
    add(MoveId::Surf, plain(Water, 15, 100, 95));
    add(MoveId::Earthquake, plain(Ground, 10, 100, 100));
    add(MoveId::DrillPeck, plain(Flying, 20, 100, 80));
    add(MoveId::Ember, damaging(Fire, 25, 100, 40, status_rider(StatusKind::Burn, 10.0)));
    add(MoveId::Flamethrower, damaging(Fire, 15, 100, 95, status_rider(StatusKind::Burn, 10.0)));
    add(MoveId::IceBeam, damaging(Ice, 10, 100, 95, status_rider(StatusKind::Freeze, 10.0)));
    add(MoveId::Blizzard, damaging(Ice, 5, 90, 120, status_rider(StatusKind::Freeze, 10.0)));
    add(MoveId::Thunderbolt, damaging(Electric, 15, 100, 95, status_rider(StatusKind::Paralysis, 10.0)));
    add(MoveId::Lick, damaging(Ghost, 30, 100, 20, status_rider(StatusKind::Paralysis, 30.0)));
    add(
        MoveId::Stomp,
        damaging(
            Normal,
            20,
            100,
            65,
            DamageProfile {
                rider: Some(Rider::Flinch { chance: 30.0 }),
                ..DamageProfile::default()
            },
        ),
    );
    add(
        MoveId::Psychic,
        damaging(
            ElementType::Psychic,
            10,
            100,
            90,
            DamageProfile {
                rider: Some(Rider::StageDrop {
                    stat: StatKind::Special,
                    stages: -1,
                    chance: 33.2,
                }),
                ..DamageProfile::default()
            },
        ),
    );
    add(
        MoveId::AuroraBeam,
        damaging(
            Ice,
            20,
            100,
            65,
            DamageProfile {
                rider: Some(Rider::StageDrop {
                    stat: StatKind::Attack,
                    stages: -1,
                    chance: 10.0,
                }),
                ..DamageProfile::default()
            },
        ),
    );
    add(
        MoveId::Psybeam,
        damaging(
            ElementType::Psychic,
            20,
            100,
            65,
            DamageProfile {
                rider: Some(Rider::Confuse { chance: 10.0 }),
                ..DamageProfile::default()
            },
        ),
    );
    add(
        MoveId::Confusion,
        damaging(
            ElementType::Psychic,
            25,
            100,
            50,
            DamageProfile {
                rider: Some(Rider::Confuse { chance: 10.0 }),
                ..DamageProfile::default()
            },
        ),
    );

    // High critical ratio.
    add(
        MoveId::Slash,
        damaging(Normal, 20, 100, 70, DamageProfile { high_crit: true, ..DamageProfile::default() }),
    );
    add(
        MoveId::RazorLeaf,
        damaging(Grass, 25, 95, 55, DamageProfile { high_crit: true, ..DamageProfile::default() }),
    );

    // Priority.
    add(
        MoveId::QuickAttack,
        MoveData {
            priority: 1,
            ..plain(Normal, 30, 100, 40)
        },
    );

    // Drain.
    add(
        MoveId::Absorb,
        damaging(Grass, 25, 100, 20, DamageProfile { drain: true, ..DamageProfile::default() }),
    );
    add(
        MoveId::MegaDrain,
        damaging(Grass, 15, 100, 40, DamageProfile { drain: true, ..DamageProfile::default() }),
    );

    // Recoil.
    add(
        MoveId::DoubleEdge,
        damaging(Normal, 15, 100, 100, DamageProfile { recoil: true, ..DamageProfile::default() }),
    );
    add(
        MoveId::TakeDown,
        damaging(Normal, 20, 85, 90, DamageProfile { recoil: true, ..DamageProfile::default() }),
    );
    add(
        MoveId::Submission,
        damaging(Fighting, 25, 80, 80, DamageProfile { recoil: true, ..DamageProfile::default() }),
    );

    // Explosion family.
    add(
        MoveId::SelfDestruct,
        damaging(Normal, 5, 100, 130, DamageProfile { explode: true, ..DamageProfile::default() }),
    );
    add(
        MoveId::Explosion,
        damaging(Normal, 5, 100, 170, DamageProfile { explode: true, ..DamageProfile::default() }),
    );

    // Recharge.
    add(
        MoveId::HyperBeam,
        damaging(Normal, 5, 90, 150, DamageProfile { recharge: true, ..DamageProfile::default() }),
    );

    // Crash on miss.
    add(
        MoveId::JumpKick,
        damaging(Fighting, 25, 95, 70, DamageProfile { crash: true, ..DamageProfile::default() }),
    );
    add(
        MoveId::HighJumpKick,
        damaging(Fighting, 20, 90, 85, DamageProfile { crash: true, ..DamageProfile::default() }),
    );

    // Charge, with and without the vanish turn.
    add(
        MoveId::RazorWind,
        damaging(
            Normal,
            10,
            75,
            80,
            DamageProfile { charge: Some(ChargeStyle::Plain), ..DamageProfile::default() },
        ),
    );
    add(
        MoveId::Fly,
        damaging(
            Flying,
            15,
            95,
            70,
            DamageProfile { charge: Some(ChargeStyle::Vanish), ..DamageProfile::default() },
        ),
    );
    add(
        MoveId::Dig,
        damaging(
            Ground,
            10,
            100,
            100,
            DamageProfile { charge: Some(ChargeStyle::Vanish), ..DamageProfile::default() },
        ),
    );

    // Thrashing locks.
    add(
        MoveId::Thrash,
        damaging(Normal, 20, 100, 90, DamageProfile { thrash: true, ..DamageProfile::default() }),
    );
    add(
        MoveId::PetalDance,
        damaging(Grass, 20, 100, 70, DamageProfile { thrash: true, ..DamageProfile::default() }),
    );

    // Multi-hit.
    add(
        MoveId::DoubleKick,
        damaging(Fighting, 30, 100, 30, DamageProfile { hits: HitCount::Double, ..DamageProfile::default() }),
    );
    add(
        MoveId::Twineedle,
        damaging(
            Bug,
            20,
            100,
            25,
            DamageProfile {
                hits: HitCount::Double,
                rider: Some(Rider::Status { status: StatusKind::Poison, chance: 20.0 }),
                ..DamageProfile::default()
            },
        ),
    );
    add(
        MoveId::FuryAttack,
        damaging(Normal, 20, 85, 15, DamageProfile { hits: HitCount::Weighted, ..DamageProfile::default() }),
    );
    add(
        MoveId::FurySwipes,
        damaging(Normal, 15, 80, 18, DamageProfile { hits: HitCount::Weighted, ..DamageProfile::default() }),
    );
    add(
        MoveId::PinMissile,
        damaging(Bug, 20, 85, 14, DamageProfile { hits: HitCount::Weighted, ..DamageProfile::default() }),
    );

    // Never misses.
    add(
        MoveId::Swift,
        MoveData {
            element: Normal,
            max_pp: 20,
            accuracy: None,
            power: Some(60),
            priority: 0,
            kind: MoveKind::Damaging(DamageProfile::default()),
        },
    );

    // Fixed damage.
    add(MoveId::SonicBoom, other(Normal, 20, Some(90), MoveKind::FixedDamage(FixedAmount::Constant(20))));
    add(MoveId::DragonRage, other(Dragon, 10, Some(100), MoveKind::FixedDamage(FixedAmount::Constant(40))));
    add(MoveId::SeismicToss, other(Fighting, 20, Some(100), MoveKind::FixedDamage(FixedAmount::UserLevel)));
    add(MoveId::NightShade, other(Ghost, 15, Some(100), MoveKind::FixedDamage(FixedAmount::UserLevel)));

    // One-hit KO.
    add(MoveId::Guillotine, other(Normal, 5, Some(30), MoveKind::OneHitKo));
    add(MoveId::HornDrill, other(Normal, 5, Some(30), MoveKind::OneHitKo));
    add(MoveId::Fissure, other(Ground, 5, Some(30), MoveKind::OneHitKo));

    // Stat stages.
    add(MoveId::SwordsDance, self_stage(Normal, 30, StatKind::Attack, 2));
    add(MoveId::Agility, self_stage(ElementType::Psychic, 30, StatKind::Speed, 2));
    add(MoveId::Amnesia, self_stage(ElementType::Psychic, 20, StatKind::Special, 2));
    add(MoveId::Growth, self_stage(Normal, 40, StatKind::Special, 1));
    add(MoveId::DoubleTeam, self_stage(Normal, 15, StatKind::Evasion, 1));
    add(MoveId::Growl, target_stage(Normal, 40, 100, StatKind::Attack, -1));
    add(MoveId::TailWhip, target_stage(Normal, 30, 100, StatKind::Defense, -1));
    add(MoveId::Screech, target_stage(Normal, 40, 85, StatKind::Defense, -2));
    add(MoveId::StringShot, target_stage(Bug, 40, 95, StatKind::Speed, -1));
    add(MoveId::SandAttack, target_stage(Normal, 15, 100, StatKind::Accuracy, -1));

    // Status infliction.
    add(MoveId::ThunderWave, other(Electric, 20, Some(100), MoveKind::InflictStatus(StatusKind::Paralysis)));
    add(MoveId::StunSpore, other(Grass, 30, Some(75), MoveKind::InflictStatus(StatusKind::Paralysis)));
    add(MoveId::SleepPowder, other(Grass, 15, Some(75), MoveKind::InflictStatus(StatusKind::Sleep)));
    add(MoveId::Hypnosis, other(ElementType::Psychic, 20, Some(60), MoveKind::InflictStatus(StatusKind::Sleep)));
    add(MoveId::PoisonPowder, other(ElementType::Poison, 35, Some(75), MoveKind::InflictStatus(StatusKind::Poison)));
    add(MoveId::Toxic, other(ElementType::Poison, 10, Some(85), MoveKind::InflictStatus(StatusKind::Toxic)));

    // Confusion infliction.
    add(MoveId::ConfuseRay, other(Ghost, 10, Some(100), MoveKind::InflictConfusion));
    add(MoveId::Supersonic, other(Normal, 20, Some(55), MoveKind::InflictConfusion));

    // One-shot flags.
    add(MoveId::Reflect, other(ElementType::Psychic, 20, None, MoveKind::SetFlag(VolatileFlag::Reflect)));
    add(MoveId::LightScreen, other(ElementType::Psychic, 30, None, MoveKind::SetFlag(VolatileFlag::LightScreen)));
    add(MoveId::Mist, other(Ice, 30, None, MoveKind::SetFlag(VolatileFlag::Mist)));
    add(MoveId::FocusEnergy, other(Normal, 30, None, MoveKind::SetFlag(VolatileFlag::FocusEnergy)));

    // Recovery.
    add(MoveId::Recover, other(Normal, 20, None, MoveKind::Recovery { rest: false }));
    add(MoveId::SoftBoiled, other(Normal, 10, None, MoveKind::Recovery { rest: false }));
    add(MoveId::Rest, other(ElementType::Psychic, 10, None, MoveKind::Recovery { rest: true }));

    // Placeholders for out-of-scope mechanics.
    add(MoveId::Splash, other(Normal, 40, None, MoveKind::AlwaysFail(FailReason::Generic)));
    add(MoveId::Roar, other(Normal, 20, None, MoveKind::AlwaysFail(FailReason::Unimplemented)));
    add(MoveId::Whirlwind, other(Normal, 20, None, MoveKind::AlwaysFail(FailReason::Unimplemented)));
    add(MoveId::Teleport, other(ElementType::Psychic, 20, None, MoveKind::AlwaysFail(FailReason::Unimplemented)));

    // Bespoke pipelines.
    add(MoveId::Transform, other(Normal, 10, None, MoveKind::Custom(CustomMove::Transform)));
    add(MoveId::Mimic, other(Normal, 10, Some(100), MoveKind::Custom(CustomMove::Mimic)));
    add(MoveId::Disable, other(Normal, 20, Some(55), MoveKind::Custom(CustomMove::Disable)));
    add(MoveId::Metronome, other(Normal, 10, None, MoveKind::Custom(CustomMove::Metronome)));
    add(MoveId::MirrorMove, other(Flying, 20, None, MoveKind::Custom(CustomMove::MirrorMove)));
    add(MoveId::Conversion, other(Normal, 30, None, MoveKind::Custom(CustomMove::Conversion)));
    add(MoveId::Haze, other(Ice, 30, None, MoveKind::Custom(CustomMove::Haze)));
    add(MoveId::LeechSeed, other(Grass, 10, Some(90), MoveKind::Custom(CustomMove::LeechSeed)));
    add(MoveId::Bide, other(Normal, 10, None, MoveKind::Custom(CustomMove::Bide)));
    add(MoveId::Substitute, other(Normal, 10, None, MoveKind::Custom(CustomMove::Substitute)));

    map
}
