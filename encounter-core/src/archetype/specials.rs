//! Boss special-attack rotations.
//!
//! One rotation per boss archetype, indexed by phase. Damage and range are
//! declared as multiples of the boss's spawn-time stats and resolved once
//! when the boss is created.

use serde::{Deserialize, Serialize};

use super::{Archetype, DerivedStats};

/// How a special attack is carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecialKind {
    /// Pure damage; the host resolves it from declared damage/range
    Strike,
    /// Reuses the Summon ability
    Summon,
    /// Heals the boss by part of the declared damage
    LifeDrain,
    /// Reuses the Teleport ability, then strikes
    TeleportStrike,
}

struct SpecialSpec {
    name: &'static str,
    kind: SpecialKind,
    damage_mult: f32,
    range_mult: f32,
    cooldown: u32,
}

#[rustfmt::skip]
const DRAGON: &[SpecialSpec] = &[
    SpecialSpec { name: "Fire Breath", kind: SpecialKind::Strike, damage_mult: 2.0, range_mult: 1.5, cooldown: 180 },
    SpecialSpec { name: "Tail Swipe", kind: SpecialKind::Strike, damage_mult: 1.5, range_mult: 0.8, cooldown: 120 },
    SpecialSpec { name: "Wing Gust", kind: SpecialKind::Strike, damage_mult: 1.0, range_mult: 2.0, cooldown: 240 },
];

#[rustfmt::skip]
const NECROMANCER: &[SpecialSpec] = &[
    SpecialSpec { name: "Death Ray", kind: SpecialKind::Strike, damage_mult: 1.8, range_mult: 2.0, cooldown: 200 },
    SpecialSpec { name: "Summon Undead", kind: SpecialKind::Summon, damage_mult: 0.0, range_mult: 0.0, cooldown: 300 },
    SpecialSpec { name: "Life Drain", kind: SpecialKind::LifeDrain, damage_mult: 1.0, range_mult: 1.2, cooldown: 150 },
];

#[rustfmt::skip]
const DEMON_LORD: &[SpecialSpec] = &[
    SpecialSpec { name: "Hellfire", kind: SpecialKind::Strike, damage_mult: 2.5, range_mult: 1.2, cooldown: 210 },
    SpecialSpec { name: "Shadow Strike", kind: SpecialKind::TeleportStrike, damage_mult: 1.7, range_mult: 1.0, cooldown: 120 },
    SpecialSpec { name: "Demonic Roar", kind: SpecialKind::Strike, damage_mult: 1.2, range_mult: 1.8, cooldown: 180 },
];

#[rustfmt::skip]
const LICH: &[SpecialSpec] = &[
    SpecialSpec { name: "Frost Nova", kind: SpecialKind::Strike, damage_mult: 1.5, range_mult: 1.5, cooldown: 180 },
    SpecialSpec { name: "Soul Harvest", kind: SpecialKind::Strike, damage_mult: 2.0, range_mult: 1.0, cooldown: 240 },
    SpecialSpec { name: "Arcane Missiles", kind: SpecialKind::Strike, damage_mult: 1.3, range_mult: 2.0, cooldown: 150 },
];

fn rotation_table(archetype: Archetype) -> &'static [SpecialSpec] {
    match archetype {
        Archetype::Dragon => DRAGON,
        Archetype::Necromancer => NECROMANCER,
        Archetype::DemonLord => DEMON_LORD,
        Archetype::Lich => LICH,
        _ => &[],
    }
}

/// A resolved special attack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialAttack {
    pub name: String,
    pub kind: SpecialKind,
    pub damage: f32,
    /// A zero range only connects when standing on the target
    pub range: f32,
    /// Dedicated cooldown in nominal ticks
    pub cooldown: u32,
}

/// Resolve the rotation for a boss from its spawn-time stats.
/// Archetypes without a table get an empty rotation.
pub fn resolve_rotation(stats: &DerivedStats) -> Vec<SpecialAttack> {
    rotation_table(stats.archetype)
        .iter()
        .map(|spec| SpecialAttack {
            name: spec.name.to_string(),
            kind: spec.kind,
            damage: stats.damage * spec.damage_mult,
            range: stats.attack_range * spec.range_mult,
            cooldown: spec.cooldown,
        })
        .collect()
}
