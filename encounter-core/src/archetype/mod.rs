//! Archetype catalog: the static table of hostile entity kinds.
//!
//! Archetype -> base record (stats, abilities, behavior tag, boss flag).
//! Level and boss scaling are pure functions of the record, so the same
//! (archetype, level, boss) triple always derives the same stats.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::constants::{
    BOSS_DAMAGE_MULT, BOSS_FOOTPRINT_MULT, BOSS_HEALTH_MULT, BOSS_SCORE_MULT, LEVEL_STEP,
};
use crate::error::{EncounterError, EncounterResult};

pub mod specials;

pub use specials::{SpecialAttack, SpecialKind};

/// Hostile entity kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Archetype {
    // Basic
    Goblin,
    Skeleton,
    Orc,
    Zombie,
    // Intermediate
    Demon,
    Wraith,
    Golem,
    Vampire,
    // Boss
    Dragon,
    Necromancer,
    DemonLord,
    Lich,
}

impl Archetype {
    pub const ALL: [Archetype; 12] = [
        Archetype::Goblin,
        Archetype::Skeleton,
        Archetype::Orc,
        Archetype::Zombie,
        Archetype::Demon,
        Archetype::Wraith,
        Archetype::Golem,
        Archetype::Vampire,
        Archetype::Dragon,
        Archetype::Necromancer,
        Archetype::DemonLord,
        Archetype::Lich,
    ];

    /// Display name for UI/quest collaborators
    pub fn name(&self) -> &'static str {
        match self {
            Self::Goblin => "Goblin",
            Self::Skeleton => "Skeleton",
            Self::Orc => "Orc",
            Self::Zombie => "Zombie",
            Self::Demon => "Demon",
            Self::Wraith => "Wraith",
            Self::Golem => "Golem",
            Self::Vampire => "Vampire",
            Self::Dragon => "Dragon",
            Self::Necromancer => "Necromancer",
            Self::DemonLord => "Demon Lord",
            Self::Lich => "Lich",
        }
    }
}

/// Special capabilities an archetype may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    Heal,
    Teleport,
    Summon,
    Invisible,
    Poison,
    Fire,
    Ice,
    Lightning,
}

impl Ability {
    /// Elemental abilities only decorate attacks; the host resolves them
    pub fn is_elemental(&self) -> bool {
        matches!(
            self,
            Ability::Poison | Ability::Fire | Ability::Ice | Ability::Lightning
        )
    }
}

/// Movement/tactics tag, fixed at spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Behavior {
    Aggressive, // always chases
    Defensive,  // wanders until hit
    Ranged,     // holds a distance band
    Patrol,     // walks waypoints
    Ambush,     // hides until the target comes close
    Swarm,      // stronger near peers
    Berserker,  // stronger at low health
}

/// Base record for one archetype (values at the nominal tick rate)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeRecord {
    pub max_health: f32,
    pub damage: f32,
    /// Distance per tick
    pub speed: f32,
    pub attack_range: f32,
    /// Ticks between attacks
    pub attack_cooldown: u32,
    pub score_value: u32,
    /// Square footprint edge length
    pub footprint: f32,
    #[serde(default)]
    pub abilities: Vec<Ability>,
    pub behavior: Behavior,
    #[serde(default)]
    pub boss: bool,
}

impl ArchetypeRecord {
    fn validate(&self, archetype: Archetype) -> EncounterResult<()> {
        let invalid = |reason: &str| EncounterError::InvalidArchetype {
            archetype,
            reason: reason.to_string(),
        };
        if !(self.max_health > 0.0 && self.max_health.is_finite()) {
            return Err(invalid("max_health must be positive"));
        }
        if !(self.damage >= 0.0 && self.damage.is_finite()) {
            return Err(invalid("damage must be non-negative"));
        }
        if !(self.speed > 0.0 && self.speed.is_finite()) {
            return Err(invalid("speed must be positive"));
        }
        if !(self.attack_range > 0.0 && self.attack_range.is_finite()) {
            return Err(invalid("attack_range must be positive"));
        }
        if self.attack_cooldown == 0 {
            return Err(invalid("attack_cooldown must be at least one tick"));
        }
        if !(self.footprint > 0.0 && self.footprint.is_finite()) {
            return Err(invalid("footprint must be positive"));
        }
        Ok(())
    }
}

/// Stats of one agent after level and boss scaling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedStats {
    pub archetype: Archetype,
    pub level: u32,
    pub is_boss: bool,
    pub max_health: f32,
    pub damage: f32,
    pub speed: f32,
    pub attack_range: f32,
    pub attack_cooldown: u32,
    pub score_value: u32,
    pub footprint: f32,
    pub abilities: Vec<Ability>,
    pub behavior: Behavior,
}

/// Level growth factor: 1 + 0.2 * (level - 1); level 0 is treated as 1
pub fn level_factor(level: u32) -> f32 {
    1.0 + LEVEL_STEP * (level.max(1) - 1) as f32
}

/// Apply the level factor and drop the fractional part
fn level_scaled(base: f32, level: u32) -> f32 {
    // The epsilon keeps exact products like 5 * 1.6 from truncating to 7.
    (base * level_factor(level) + 1e-3).floor()
}

/// Row of the built-in table
struct StandardRow {
    archetype: Archetype,
    max_health: f32,
    damage: f32,
    speed: f32,
    attack_range: f32,
    attack_cooldown: u32,
    score_value: u32,
    footprint: f32,
    abilities: &'static [Ability],
    behavior: Behavior,
    boss: bool,
}

#[rustfmt::skip]
const STANDARD_TABLE: &[StandardRow] = &[
    StandardRow { archetype: Archetype::Goblin, max_health: 40.0, damage: 3.0, speed: 2.0, attack_range: 40.0, attack_cooldown: 60, score_value: 10, footprint: 64.0, abilities: &[], behavior: Behavior::Swarm, boss: false },
    StandardRow { archetype: Archetype::Skeleton, max_health: 50.0, damage: 5.0, speed: 1.6, attack_range: 50.0, attack_cooldown: 75, score_value: 15, footprint: 64.0, abilities: &[], behavior: Behavior::Aggressive, boss: false },
    StandardRow { archetype: Archetype::Orc, max_health: 70.0, damage: 7.0, speed: 1.4, attack_range: 60.0, attack_cooldown: 90, score_value: 25, footprint: 64.0, abilities: &[], behavior: Behavior::Aggressive, boss: false },
    StandardRow { archetype: Archetype::Zombie, max_health: 60.0, damage: 4.0, speed: 1.0, attack_range: 45.0, attack_cooldown: 100, score_value: 15, footprint: 64.0, abilities: &[Ability::Heal], behavior: Behavior::Aggressive, boss: false },
    StandardRow { archetype: Archetype::Demon, max_health: 120.0, damage: 10.0, speed: 1.8, attack_range: 70.0, attack_cooldown: 80, score_value: 40, footprint: 64.0, abilities: &[Ability::Fire], behavior: Behavior::Aggressive, boss: false },
    StandardRow { archetype: Archetype::Wraith, max_health: 80.0, damage: 8.0, speed: 2.2, attack_range: 60.0, attack_cooldown: 70, score_value: 35, footprint: 64.0, abilities: &[Ability::Invisible, Ability::Teleport], behavior: Behavior::Ambush, boss: false },
    StandardRow { archetype: Archetype::Golem, max_health: 200.0, damage: 12.0, speed: 1.0, attack_range: 80.0, attack_cooldown: 120, score_value: 50, footprint: 64.0, abilities: &[], behavior: Behavior::Defensive, boss: false },
    StandardRow { archetype: Archetype::Vampire, max_health: 150.0, damage: 9.0, speed: 1.9, attack_range: 65.0, attack_cooldown: 75, score_value: 45, footprint: 64.0, abilities: &[Ability::Heal], behavior: Behavior::Aggressive, boss: false },
    StandardRow { archetype: Archetype::Dragon, max_health: 500.0, damage: 20.0, speed: 1.5, attack_range: 120.0, attack_cooldown: 100, score_value: 200, footprint: 96.0, abilities: &[Ability::Fire], behavior: Behavior::Aggressive, boss: true },
    StandardRow { archetype: Archetype::Necromancer, max_health: 400.0, damage: 15.0, speed: 1.3, attack_range: 150.0, attack_cooldown: 120, score_value: 180, footprint: 80.0, abilities: &[Ability::Summon], behavior: Behavior::Ranged, boss: true },
    StandardRow { archetype: Archetype::DemonLord, max_health: 600.0, damage: 25.0, speed: 1.7, attack_range: 100.0, attack_cooldown: 90, score_value: 250, footprint: 96.0, abilities: &[Ability::Fire, Ability::Teleport], behavior: Behavior::Aggressive, boss: true },
    StandardRow { archetype: Archetype::Lich, max_health: 450.0, damage: 18.0, speed: 1.4, attack_range: 180.0, attack_cooldown: 110, score_value: 220, footprint: 80.0, abilities: &[Ability::Ice, Ability::Summon], behavior: Behavior::Ranged, boss: true },
];

/// Archetypes a Summon may produce
const SUMMONABLE: &[Archetype] = &[Archetype::Goblin, Archetype::Skeleton];

impl From<&StandardRow> for ArchetypeRecord {
    fn from(row: &StandardRow) -> Self {
        Self {
            max_health: row.max_health,
            damage: row.damage,
            speed: row.speed,
            attack_range: row.attack_range,
            attack_cooldown: row.attack_cooldown,
            score_value: row.score_value,
            footprint: row.footprint,
            abilities: row.abilities.to_vec(),
            behavior: row.behavior,
            boss: row.boss,
        }
    }
}

/// Archetype -> record lookup
#[derive(Debug, Clone, Default)]
pub struct ArchetypeCatalog {
    records: HashMap<Archetype, ArchetypeRecord>,
}

impl ArchetypeCatalog {
    /// Catalog with no entries; every lookup is a configuration error
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in twelve-archetype table
    pub fn standard() -> Self {
        let records = STANDARD_TABLE
            .iter()
            .map(|row| (row.archetype, ArchetypeRecord::from(row)))
            .collect();
        Self { records }
    }

    /// Replace or add a single entry
    pub fn with_entry(mut self, archetype: Archetype, record: ArchetypeRecord) -> Self {
        self.records.insert(archetype, record);
        self
    }

    /// Parse a complete catalog from a RON map and validate every entry
    pub fn from_ron(text: &str) -> EncounterResult<Self> {
        let records: HashMap<Archetype, ArchetypeRecord> = ron::from_str(text)?;
        let catalog = Self { records };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Overlay RON entries on top of this catalog
    pub fn overlay_ron(mut self, text: &str) -> EncounterResult<Self> {
        let overrides: HashMap<Archetype, ArchetypeRecord> = ron::from_str(text)?;
        self.records.extend(overrides);
        self.validate()?;
        Ok(self)
    }

    /// Load a RON overlay from disk on top of the standard table
    pub fn load_overlay(path: impl AsRef<Path>) -> EncounterResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::standard().overlay_ron(&text)
    }

    pub fn to_ron(&self) -> EncounterResult<String> {
        // Sorted for stable output
        let sorted: std::collections::BTreeMap<_, _> = self.records.iter().collect();
        ron::ser::to_string_pretty(&sorted, ron::ser::PrettyConfig::default())
            .map_err(|e| EncounterError::InvalidConfig(e.to_string()))
    }

    pub fn validate(&self) -> EncounterResult<()> {
        for (archetype, record) in &self.records {
            record.validate(*archetype)?;
        }
        Ok(())
    }

    pub fn contains(&self, archetype: Archetype) -> bool {
        self.records.contains_key(&archetype)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&self, archetype: Archetype) -> EncounterResult<&ArchetypeRecord> {
        self.records
            .get(&archetype)
            .ok_or(EncounterError::UnknownArchetype(archetype))
    }

    /// Whether the archetype always spawns as a boss
    pub fn is_boss_archetype(&self, archetype: Archetype) -> EncounterResult<bool> {
        Ok(self.record(archetype)?.boss)
    }

    /// Derive the stats of an agent of `archetype` at `level`.
    ///
    /// Health, damage and score grow with level (truncated to whole units);
    /// boss scaling is applied on top of the level-scaled values.
    pub fn stats_for(
        &self,
        archetype: Archetype,
        level: u32,
        is_boss: bool,
    ) -> EncounterResult<DerivedStats> {
        let record = self.record(archetype)?;
        let level = level.max(1);

        let mut max_health = level_scaled(record.max_health, level);
        let mut damage = level_scaled(record.damage, level);
        let mut score_value = level_scaled(record.score_value as f32, level) as u32;
        let mut footprint = record.footprint;

        if is_boss {
            max_health *= BOSS_HEALTH_MULT;
            damage *= BOSS_DAMAGE_MULT;
            score_value *= BOSS_SCORE_MULT;
            footprint *= BOSS_FOOTPRINT_MULT;
        }

        Ok(DerivedStats {
            archetype,
            level,
            is_boss,
            // Tiny bases can truncate to zero at level 1; keep agents alive on spawn
            max_health: max_health.max(1.0),
            damage,
            speed: record.speed,
            attack_range: record.attack_range,
            attack_cooldown: record.attack_cooldown,
            score_value,
            footprint,
            abilities: record.abilities.clone(),
            behavior: record.behavior,
        })
    }

    /// Resolved special-attack rotation for a boss with these stats
    pub fn special_attacks(&self, stats: &DerivedStats) -> Vec<SpecialAttack> {
        specials::resolve_rotation(stats)
    }

    /// Low-tier archetypes produced by Summon
    pub fn summonable(&self) -> &'static [Archetype] {
        summonable()
    }
}

/// Low-tier archetypes produced by Summon
pub fn summonable() -> &'static [Archetype] {
    SUMMONABLE
}
