//! Ability activation.
//!
//! Every activation resets the shared ability cooldown, including ones whose
//! own gate (teleport/summon cooldown, peer limit) kept them from doing
//! anything.

use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;

use super::{Agent, EffectKind, PeerView, SpawnRequest};
use crate::archetype::{self, Ability};
use crate::constants::{
    ABILITY_COOLDOWN_TICKS, ELEMENTAL_MARKER_TICKS, HEAL_FRACTION, HEAL_MARKER_TICKS,
    INVISIBILITY_TICKS, INVISIBLE_MARKER_TICKS, SUMMON_COOLDOWN_TICKS, SUMMON_MAX_OFFSET,
    SUMMON_MIN_OFFSET, SUMMON_PEER_LIMIT, TELEPORT_COOLDOWN_TICKS, TELEPORT_MARKER_TICKS,
    TELEPORT_MIN_DISTANCE,
};

impl Agent {
    /// Run `ability` now, ignoring the shared cooldown. Returns spawn
    /// requests produced by Summon.
    pub fn activate_ability<R: Rng + ?Sized>(
        &mut self,
        ability: Ability,
        target: Vec2,
        peers: &[PeerView],
        rng: &mut R,
    ) -> Vec<SpawnRequest> {
        let mut spawned = Vec::new();
        match ability {
            Ability::Heal => {
                self.heal((self.stats.max_health * HEAL_FRACTION).floor());
                self.push_effect(EffectKind::Heal, HEAL_MARKER_TICKS);
            }
            Ability::Teleport => {
                if self.cooldowns.teleport == 0 {
                    self.teleport_near(target, rng);
                    self.cooldowns.teleport = self.rate.ticks(TELEPORT_COOLDOWN_TICKS);
                    self.push_effect(EffectKind::Teleport, TELEPORT_MARKER_TICKS);
                }
            }
            Ability::Summon => {
                if self.cooldowns.summon == 0 && peers.len() < SUMMON_PEER_LIMIT {
                    spawned = self.summon(rng);
                    self.cooldowns.summon = self.rate.ticks(SUMMON_COOLDOWN_TICKS);
                }
            }
            Ability::Invisible => {
                self.invisible_ticks = self.rate.ticks(INVISIBILITY_TICKS);
                self.push_effect(EffectKind::Invisible, INVISIBLE_MARKER_TICKS);
            }
            Ability::Poison | Ability::Fire | Ability::Ice | Ability::Lightning => {
                self.push_effect(EffectKind::Elemental(ability), ELEMENTAL_MARKER_TICKS);
            }
        }
        self.cooldowns.ability = self.rate.ticks(ABILITY_COOLDOWN_TICKS);

        tracing::trace!(
            agent = self.id,
            archetype = ?self.stats.archetype,
            ?ability,
            spawned = spawned.len(),
            "ability used"
        );
        spawned
    }

    /// Relocate to a random point around the target
    fn teleport_near<R: Rng + ?Sized>(&mut self, target: Vec2, rng: &mut R) {
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        let max = self.teleport_distance.max(TELEPORT_MIN_DISTANCE);
        let distance = rng.gen_range(TELEPORT_MIN_DISTANCE..=max);
        self.position = target + Vec2::from_angle(angle) * distance;
    }

    fn summon<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<SpawnRequest> {
        let count = rng.gen_range(1..=3);
        let level = self.stats.level.saturating_sub(1).max(1);
        (0..count)
            .filter_map(|_| {
                let archetype = *archetype::summonable().choose(rng)?;
                let angle = rng.gen_range(0.0..std::f32::consts::TAU);
                let offset = rng.gen_range(SUMMON_MIN_OFFSET..=SUMMON_MAX_OFFSET);
                Some(SpawnRequest {
                    archetype,
                    level,
                    origin: self.position + Vec2::from_angle(angle) * offset,
                })
            })
            .collect()
    }
}
