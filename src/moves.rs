use serde::{Deserialize, Serialize};

/// Identifier for every move in the catalog.
///
/// The catalog entry behind each identifier lives in `move_data`; the enum
/// itself is just the key type shared by move slots, events, and the
/// disable/mimic bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveId {
    // Normal
    Tackle,
    Scratch,
    BodySlam,
    DoubleEdge,
    TakeDown,
    HyperBeam,
    Slash,
    QuickAttack,
    Stomp,
    Thrash,
    FuryAttack,
    FurySwipes,
    DoubleKick,
    SelfDestruct,
    Explosion,
    Swift,
    SonicBoom,
    Guillotine,
    HornDrill,
    SwordsDance,
    Growl,
    TailWhip,
    Screech,
    DoubleTeam,
    Recover,
    SoftBoiled,
    Rest,
    FocusEnergy,
    Splash,
    Roar,
    Whirlwind,
    Bide,
    Substitute,
    Transform,
    Mimic,
    Disable,
    Metronome,
    MirrorMove,
    Conversion,

    // Fighting
    SeismicToss,
    JumpKick,
    HighJumpKick,
    Submission,

    // Flying
    Fly,
    DrillPeck,
    RazorWind,

    // Ground
    Earthquake,
    Fissure,
    Dig,
    SandAttack,

    // Poison
    PoisonPowder,
    Toxic,
    Haze,
    Twineedle,
    PinMissile,

    // Fire
    Ember,
    Flamethrower,

    // Water
    WaterGun,
    Surf,
    Mist,

    // Grass
    RazorLeaf,
    MegaDrain,
    Absorb,
    LeechSeed,
    SleepPowder,
    StunSpore,
    StringShot,
    Growth,
    PetalDance,

    // Ice
    IceBeam,
    Blizzard,
    AuroraBeam,

    // Electric
    Thunderbolt,
    ThunderWave,

    // Psychic
    Psychic,
    Psybeam,
    Confusion,
    Hypnosis,
    ConfuseRay,
    Supersonic,
    LightScreen,
    Reflect,
    Amnesia,
    Agility,
    Teleport,

    // Ghost
    NightShade,
    Lick,

    // Dragon
    DragonRage,
}

impl MoveId {
    /// Every catalog identifier, in declaration order. Used by startup
    /// validation and by moves that draw a uniformly random catalog entry.
    pub const ALL: [MoveId; 88] = [
        MoveId::Tackle,
        MoveId::Scratch,
        MoveId::BodySlam,
        MoveId::DoubleEdge,
        MoveId::TakeDown,
        MoveId::HyperBeam,
        MoveId::Slash,
        MoveId::QuickAttack,
        MoveId::Stomp,
        MoveId::Thrash,
        MoveId::FuryAttack,
        MoveId::FurySwipes,
        MoveId::DoubleKick,
        MoveId::SelfDestruct,
        MoveId::Explosion,
        MoveId::Swift,
        MoveId::SonicBoom,
        MoveId::Guillotine,
        MoveId::HornDrill,
        MoveId::SwordsDance,
        MoveId::Growl,
        MoveId::TailWhip,
        MoveId::Screech,
        MoveId::DoubleTeam,
        MoveId::Recover,
        MoveId::SoftBoiled,
        MoveId::Rest,
        MoveId::FocusEnergy,
        MoveId::Splash,
        MoveId::Roar,
        MoveId::Whirlwind,
        MoveId::Bide,
        MoveId::Substitute,
        MoveId::Transform,
        MoveId::Mimic,
        MoveId::Disable,
        MoveId::Metronome,
        MoveId::MirrorMove,
        MoveId::Conversion,
        MoveId::SeismicToss,
        MoveId::JumpKick,
        MoveId::HighJumpKick,
        MoveId::Submission,
        MoveId::Fly,
        MoveId::DrillPeck,
        MoveId::RazorWind,
        MoveId::Earthquake,
        MoveId::Fissure,
        MoveId::Dig,
        MoveId::SandAttack,
        MoveId::PoisonPowder,
        MoveId::Toxic,
        MoveId::Haze,
        MoveId::Twineedle,
        MoveId::PinMissile,
        MoveId::Ember,
        MoveId::Flamethrower,
        MoveId::WaterGun,
        MoveId::Surf,
        MoveId::Mist,
        MoveId::RazorLeaf,
        MoveId::MegaDrain,
        MoveId::Absorb,
        MoveId::LeechSeed,
        MoveId::SleepPowder,
        MoveId::StunSpore,
        MoveId::StringShot,
        MoveId::Growth,
        MoveId::PetalDance,
        MoveId::IceBeam,
        MoveId::Blizzard,
        MoveId::AuroraBeam,
        MoveId::Thunderbolt,
        MoveId::ThunderWave,
        MoveId::Psychic,
        MoveId::Psybeam,
        MoveId::Confusion,
        MoveId::Hypnosis,
        MoveId::ConfuseRay,
        MoveId::Supersonic,
        MoveId::LightScreen,
        MoveId::Reflect,
        MoveId::Amnesia,
        MoveId::Agility,
        MoveId::Teleport,
        MoveId::NightShade,
        MoveId::Lick,
        MoveId::DragonRage,
    ];
}
