use crate::moves::MoveId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

/// The fifteen elemental types of the first-generation chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    Normal,
    Fighting,
    Flying,
    Poison,
    Ground,
    Rock,
    Bug,
    Ghost,
    Fire,
    Water,
    Grass,
    Electric,
    Psychic,
    Ice,
    Dragon,
}

impl ElementType {
    /// Whether moves of this type use the Special stat on both ends.
    /// Everything else is physical.
    pub fn is_special(self) -> bool {
        matches!(
            self,
            ElementType::Water
                | ElementType::Grass
                | ElementType::Fire
                | ElementType::Electric
                | ElementType::Ice
                | ElementType::Psychic
                | ElementType::Dragon
        )
    }
}

/// Base stat quintuple. The era had a single Special stat serving both
/// offense and defense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u8,
    pub attack: u8,
    pub defense: u8,
    pub special: u8,
    pub speed: u8,
}

/// Species identifiers for the built-in registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    Venusaur,
    Charizard,
    Blastoise,
    Pikachu,
    Raichu,
    Alakazam,
    Gengar,
    Golem,
    Hypno,
    Chansey,
    Starmie,
    Jolteon,
    Snorlax,
    Dragonite,
    Tauros,
    Exeggutor,
}

/// Static species record: identity, typing, base stats, the move pool a
/// roster builder may draw from, and relative weight. Never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesData {
    pub name: String,
    pub types: Vec<ElementType>,
    pub base_stats: BaseStats,
    pub move_pool: Vec<MoveId>,
    pub weight_kg: f32,
}

static SPECIES_DATA: LazyLock<HashMap<Species, SpeciesData>> = LazyLock::new(build_registry);

/// Look up the static record for a built-in species.
pub fn species_data(species: Species) -> &'static SpeciesData {
    SPECIES_DATA
        .get(&species)
        .expect("species registry covers every Species variant")
}

impl SpeciesData {
    /// Load a single species document from a RON file by name.
    /// Files live under `<data_path>/species/<name>.ron`.
    pub fn load_by_name(name: &str, data_path: &Path) -> Result<SpeciesData, Box<dyn std::error::Error>> {
        let species_dir = data_path.join("species");
        let file = species_dir.join(format!("{}.ron", name.to_lowercase()));
        if !file.exists() {
            return Err(format!("species '{}' not found under {}", name, species_dir.display()).into());
        }
        let content = fs::read_to_string(&file)?;
        let data: SpeciesData = ron::from_str(&content)?;
        Ok(data)
    }

    /// Load every species document in the data directory, keyed by
    /// upper-cased name.
    pub fn load_all(data_path: &Path) -> Result<HashMap<String, SpeciesData>, Box<dyn std::error::Error>> {
        let species_dir = data_path.join("species");
        if !species_dir.exists() {
            return Err(format!("species data directory not found: {}", species_dir.display()).into());
        }

        let mut map = HashMap::new();
        for entry in fs::read_dir(&species_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) == Some("ron") {
                let content = fs::read_to_string(&path)?;
                let data: SpeciesData = ron::from_str(&content)?;
                map.insert(data.name.to_uppercase(), data);
            }
        }
        Ok(map)
    }
}

fn build_registry() -> HashMap<Species, SpeciesData> {
    use ElementType::*;
    use MoveId::*;

    let mut map = HashMap::new();
    let mut add = |species: Species,
                   name: &str,
                   types: Vec<ElementType>,
                   stats: [u8; 5],
                   move_pool: Vec<MoveId>,
                   weight_kg: f32| {
        map.insert(
            species,
            SpeciesData {
                name: name.to_string(),
                types,
                base_stats: BaseStats {
                    hp: stats[0],
                    attack: stats[1],
                    defense: stats[2],
                    special: stats[3],
                    speed: stats[4],
                },
                move_pool,
                weight_kg,
            },
        );
    };

    add(
        Species::Venusaur,
        "Venusaur",
        vec![Grass, Poison],
        [80, 82, 83, 100, 80],
        vec![RazorLeaf, MegaDrain, LeechSeed, SleepPowder, Growth, BodySlam, Toxic],
        100.0,
    );
    add(
        Species::Charizard,
        "Charizard",
        vec![Fire, Flying],
        [78, 84, 78, 85, 100],
        vec![Flamethrower, Slash, Earthquake, Fly, SwordsDance, Ember],
        90.5,
    );
    add(
        Species::Blastoise,
        "Blastoise",
        vec![Water],
        [79, 83, 100, 85, 78],
        vec![Surf, WaterGun, BodySlam, Rest, Mist, Blizzard],
        85.5,
    );
    add(
        Species::Pikachu,
        "Pikachu",
        vec![Electric],
        [35, 55, 30, 50, 90],
        vec![Thunderbolt, ThunderWave, QuickAttack, DoubleTeam, Agility, Substitute],
        6.0,
    );
    add(
        Species::Raichu,
        "Raichu",
        vec![Electric],
        [60, 90, 55, 90, 100],
        vec![Thunderbolt, ThunderWave, BodySlam, Agility, Substitute],
        30.0,
    );
    add(
        Species::Alakazam,
        "Alakazam",
        vec![ElementType::Psychic],
        [55, 50, 45, 135, 120],
        vec![MoveId::Psychic, Psybeam, Recover, Reflect, ThunderWave, Disable],
        48.0,
    );
    add(
        Species::Gengar,
        "Gengar",
        vec![Ghost, Poison],
        [60, 65, 60, 130, 110],
        vec![Lick, Hypnosis, NightShade, ConfuseRay, Explosion, MegaDrain],
        40.5,
    );
    add(
        Species::Golem,
        "Golem",
        vec![Rock, Ground],
        [80, 110, 130, 55, 45],
        vec![Earthquake, Explosion, BodySlam, Fissure, Dig],
        300.0,
    );
    add(
        Species::Hypno,
        "Hypno",
        vec![ElementType::Psychic],
        [85, 73, 70, 115, 67],
        vec![MoveId::Psychic, Hypnosis, ThunderWave, Rest, Confusion, Mimic],
        75.6,
    );
    add(
        Species::Chansey,
        "Chansey",
        vec![Normal],
        [250, 5, 5, 105, 50],
        vec![SoftBoiled, ThunderWave, IceBeam, LightScreen, Mist, Substitute],
        34.6,
    );
    add(
        Species::Starmie,
        "Starmie",
        vec![Water, ElementType::Psychic],
        [60, 75, 85, 100, 115],
        vec![Surf, MoveId::Psychic, Blizzard, ThunderWave, Recover],
        80.0,
    );
    add(
        Species::Jolteon,
        "Jolteon",
        vec![Electric],
        [65, 65, 60, 110, 130],
        vec![Thunderbolt, ThunderWave, DoubleKick, Agility, PinMissile],
        24.5,
    );
    add(
        Species::Snorlax,
        "Snorlax",
        vec![Normal],
        [160, 110, 65, 65, 30],
        vec![BodySlam, HyperBeam, Rest, Earthquake, SelfDestruct, Amnesia],
        460.0,
    );
    add(
        Species::Dragonite,
        "Dragonite",
        vec![Dragon, Flying],
        [91, 134, 95, 100, 80],
        vec![DragonRage, HyperBeam, BodySlam, Blizzard, Thrash, Agility],
        210.0,
    );
    add(
        Species::Tauros,
        "Tauros",
        vec![Normal],
        [75, 100, 95, 70, 110],
        vec![BodySlam, HyperBeam, Earthquake, Blizzard, TailWhip],
        88.4,
    );
    add(
        Species::Exeggutor,
        "Exeggutor",
        vec![Grass, ElementType::Psychic],
        [95, 95, 85, 125, 55],
        vec![MoveId::Psychic, SleepPowder, Explosion, MegaDrain, StunSpore, LeechSeed],
        120.0,
    );

    map
}
