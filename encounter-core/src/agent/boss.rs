//! Boss phase machine and special-attack rotation.
//!
//! Per tick, ahead of the base update:
//! 1. at most one phase transition (phase 3 is terminal)
//! 2. while locked, count down and hold; buffs land when the lock expires
//! 3. a ready special attack in range pre-empts the rest of the tick
//!
//! Anything else falls through to the regular agent update.

use bevy::prelude::*;
use rand::Rng;

use super::{Agent, AgentOutcome, EffectKind, PeerView, SpecialAttackCast};
use crate::terrain::Passability;
use crate::archetype::specials::resolve_rotation;
use crate::archetype::{Ability, DerivedStats, SpecialAttack, SpecialKind};
use crate::constants::{
    DEFAULT_PHASE_THRESHOLDS, LIFE_DRAIN_FRACTION, MAX_BOSS_PHASE, PHASE_DAMAGE_MULT,
    PHASE_HEAL_FRACTION, PHASE_LOCK_TICKS, PHASE_SPEED_MULT, SPECIAL_MARKER_TICKS,
};
use crate::error::{EncounterError, EncounterResult};

/// Boss-only state carried by an `Agent`
#[derive(Debug, Clone, PartialEq)]
pub struct BossExtension {
    phase: u8,
    thresholds: Vec<f32>,
    lock_ticks: u32,
    rotation: Vec<SpecialAttack>,
    special_cooldown: u32,
}

impl BossExtension {
    pub fn new(stats: &DerivedStats) -> Self {
        Self {
            phase: 1,
            thresholds: DEFAULT_PHASE_THRESHOLDS.to_vec(),
            lock_ticks: 0,
            rotation: resolve_rotation(stats),
            special_cooldown: 0,
        }
    }

    pub fn with_thresholds(mut self, thresholds: &[f32]) -> EncounterResult<Self> {
        validate_thresholds(thresholds)?;
        self.thresholds = thresholds.to_vec();
        Ok(self)
    }

    pub fn phase(&self) -> u8 {
        self.phase
    }

    pub fn thresholds(&self) -> &[f32] {
        &self.thresholds
    }

    pub fn is_transitioning(&self) -> bool {
        self.lock_ticks > 0
    }

    pub fn lock_ticks_remaining(&self) -> u32 {
        self.lock_ticks
    }

    pub fn rotation(&self) -> &[SpecialAttack] {
        &self.rotation
    }

    pub fn special_cooldown(&self) -> u32 {
        self.special_cooldown
    }

    /// Special attack for the current phase
    pub fn current_special(&self) -> Option<&SpecialAttack> {
        let last = self.rotation.len().checked_sub(1)?;
        self.rotation.get((self.phase as usize - 1).min(last))
    }

    /// Phase to enter at `health_fraction`, if any
    fn pending_transition(&self, health_fraction: f32) -> Option<u8> {
        if self.phase >= MAX_BOSS_PHASE {
            return None;
        }
        self.thresholds
            .iter()
            .enumerate()
            .find(|(i, threshold)| {
                health_fraction <= **threshold && self.phase as usize == i + 1
            })
            .map(|_| self.phase + 1)
    }
}

/// Thresholds must be non-empty, strictly descending and within (0, 1]
pub fn validate_thresholds(thresholds: &[f32]) -> EncounterResult<()> {
    let in_range = thresholds.iter().all(|t| *t > 0.0 && *t <= 1.0);
    let descending = thresholds.windows(2).all(|w| w[0] > w[1]);
    if thresholds.is_empty() || !in_range || !descending {
        return Err(EncounterError::NonDescendingThresholds(thresholds.to_vec()));
    }
    Ok(())
}

impl Agent {
    /// Run the boss stage of the tick. Returns true when the tick is consumed.
    pub(super) fn advance_boss<P, R>(
        &mut self,
        target: Vec2,
        terrain: &P,
        peers: &[PeerView],
        rng: &mut R,
        outcome: &mut AgentOutcome,
    ) -> bool
    where
        P: Passability + ?Sized,
        R: Rng + ?Sized,
    {
        self.check_phase_transition();
        if self.tick_phase_lock() {
            self.attacking = false;
            return true;
        }
        if let Some(cast) = self.try_special_attack(target, terrain, peers, rng, outcome) {
            outcome.special_attack = Some(cast);
            self.attacking = false;
            return true;
        }
        false
    }

    fn check_phase_transition(&mut self) {
        let fraction = self.health_fraction();
        let Some(boss) = self.boss.as_mut() else {
            return;
        };
        let Some(next) = boss.pending_transition(fraction) else {
            return;
        };
        boss.phase = next;
        boss.lock_ticks = self.rate.ticks(PHASE_LOCK_TICKS);

        self.heal((self.stats.max_health * PHASE_HEAL_FRACTION).floor());
        self.push_effect(EffectKind::PhaseTransition, PHASE_LOCK_TICKS);
        tracing::debug!(
            agent = self.id,
            archetype = ?self.stats.archetype,
            phase = next,
            health = self.health,
            "boss phase transition"
        );
    }

    /// Count the lock down; returns true while the boss is held
    fn tick_phase_lock(&mut self) -> bool {
        let Some(boss) = self.boss.as_mut() else {
            return false;
        };
        if boss.lock_ticks == 0 {
            return false;
        }
        boss.lock_ticks -= 1;
        if boss.lock_ticks == 0 {
            let phase = boss.phase;
            self.stats.damage = (self.stats.damage * PHASE_DAMAGE_MULT).floor();
            self.stats.speed *= PHASE_SPEED_MULT;
            let granted = match phase {
                2 => Some(Ability::Teleport),
                3 => Some(Ability::Summon),
                _ => None,
            };
            if let Some(ability) = granted {
                if !self.stats.abilities.contains(&ability) {
                    self.stats.abilities.push(ability);
                }
            }
        }
        true
    }

    fn try_special_attack<P, R>(
        &mut self,
        target: Vec2,
        terrain: &P,
        peers: &[PeerView],
        rng: &mut R,
        outcome: &mut AgentOutcome,
    ) -> Option<SpecialAttackCast>
    where
        P: Passability + ?Sized,
        R: Rng + ?Sized,
    {
        let distance = self.position.distance(target);
        let boss = self.boss.as_mut()?;
        boss.special_cooldown = boss.special_cooldown.saturating_sub(1);
        if boss.special_cooldown > 0 {
            return None;
        }
        let attack = boss.current_special()?.clone();
        if distance > attack.range {
            return None;
        }
        boss.special_cooldown = self.rate.ticks(attack.cooldown);

        match attack.kind {
            SpecialKind::Strike => {}
            SpecialKind::Summon => {
                let spawned = self.activate_ability(Ability::Summon, target, peers, rng);
                outcome.spawn_requests.extend(spawned);
            }
            SpecialKind::LifeDrain => {
                self.heal((attack.damage * LIFE_DRAIN_FRACTION).floor());
                self.push_effect(EffectKind::Heal, SPECIAL_MARKER_TICKS);
            }
            SpecialKind::TeleportStrike => {
                let from = self.position;
                self.activate_ability(Ability::Teleport, target, peers, rng);
                if !terrain.is_passable(self.position) {
                    self.position = from;
                    self.redirect(rng);
                }
            }
        }
        self.push_effect(EffectKind::SpecialAttack, SPECIAL_MARKER_TICKS);

        Some(SpecialAttackCast {
            name: attack.name,
            kind: attack.kind,
            damage: attack.damage,
            range: attack.range,
            origin: self.position,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentSpec;
    use crate::archetype::{Archetype, ArchetypeCatalog};
    use crate::terrain::OpenField;
    use crate::timing::{seeded_rng, TickRate};

    fn spawn_boss(archetype: Archetype) -> Agent {
        let spec = AgentSpec {
            archetype,
            level: 1,
            position: Vec2::ZERO,
        };
        Agent::new(
            7,
            &spec,
            &ArchetypeCatalog::standard(),
            TickRate::NOMINAL,
            &mut seeded_rng(1),
        )
        .unwrap()
    }

    const FAR: Vec2 = Vec2::new(5000.0, 0.0);

    #[test]
    fn test_threshold_validation() {
        assert!(validate_thresholds(&[0.7, 0.4, 0.1]).is_ok());
        assert!(validate_thresholds(&[0.4, 0.7]).is_err());
        assert!(validate_thresholds(&[0.5, 0.5]).is_err());
        assert!(validate_thresholds(&[1.2, 0.5]).is_err());
        assert!(validate_thresholds(&[0.5, 0.0]).is_err());
        assert!(validate_thresholds(&[]).is_err());
    }

    #[test]
    fn test_transition_locks_and_heals() {
        let mut boss = spawn_boss(Archetype::Dragon);
        let max = boss.max_health();
        boss.take_damage(max * 0.31);
        let mut rng = seeded_rng(2);
        boss.update(FAR, &OpenField, &[], &mut rng);

        let ext = boss.boss().unwrap();
        assert_eq!(ext.phase(), 2);
        assert!(ext.is_transitioning());
        assert_eq!(ext.lock_ticks_remaining(), 119);
        assert!((boss.health() - (max * 0.69 + max * 0.1).floor()).abs() <= 1.0);
    }

    #[test]
    fn test_lock_holds_then_buffs() {
        let mut boss = spawn_boss(Archetype::Dragon);
        let damage = boss.damage();
        let speed = boss.speed();
        boss.take_damage(boss.max_health() * 0.35);
        let mut rng = seeded_rng(3);
        let start = boss.position();
        for _ in 0..120 {
            boss.update(FAR, &OpenField, &[], &mut rng);
            assert_eq!(boss.position(), start);
            assert!(!boss.is_attacking());
        }
        assert!(!boss.boss().unwrap().is_transitioning());
        assert_eq!(boss.damage(), (damage * 1.2).floor());
        assert!((boss.speed() - speed * 1.1).abs() < 1e-4);
        assert!(boss.abilities().contains(&Ability::Teleport));

        boss.update(FAR, &OpenField, &[], &mut rng);
        assert!(boss.position().x > start.x);
    }

    #[test]
    fn test_one_transition_per_tick() {
        let mut boss = spawn_boss(Archetype::Lich);
        boss.take_damage(boss.max_health() * 0.95);
        let mut rng = seeded_rng(4);
        boss.update(FAR, &OpenField, &[], &mut rng);
        assert_eq!(boss.phase(), Some(2));
    }

    /// Damage down to `fraction` of max health, then let the lock run out
    fn drive_to(boss: &mut Agent, fraction: f32, rng: &mut crate::timing::SimRng) {
        let amount = boss.health() - boss.max_health() * fraction;
        boss.take_damage(amount);
        for _ in 0..121 {
            boss.update(FAR, &OpenField, &[], rng);
        }
    }

    #[test]
    fn test_phase_three_is_terminal() {
        let mut boss = spawn_boss(Archetype::Lich);
        let mut rng = seeded_rng(5);
        drive_to(&mut boss, 0.65, &mut rng);
        assert_eq!(boss.phase(), Some(2));
        drive_to(&mut boss, 0.35, &mut rng);
        assert_eq!(boss.phase(), Some(3));

        let low = boss.max_health() * 0.05;
        boss.take_damage(boss.health() - low);
        boss.update(FAR, &OpenField, &[], &mut rng);
        assert_eq!(boss.phase(), Some(3));
        assert!(!boss.boss().unwrap().is_transitioning());
        assert!((boss.health() - low).abs() < 1e-3);
        assert!(boss.abilities().contains(&Ability::Summon));
    }

    #[test]
    fn test_special_preempts_when_in_range() {
        let mut boss = spawn_boss(Archetype::Dragon);
        let mut rng = seeded_rng(6);
        // Fire Breath range 180
        let target = Vec2::new(150.0, 0.0);
        let outcome = boss.update(target, &OpenField, &[], &mut rng);
        let cast = outcome.special_attack.expect("special fired");
        assert_eq!(cast.name, "Fire Breath");
        assert_eq!(cast.kind, SpecialKind::Strike);
        assert_eq!(boss.position(), Vec2::ZERO);
        assert_eq!(boss.boss().unwrap().special_cooldown(), 180);

        let outcome = boss.update(target, &OpenField, &[], &mut rng);
        assert!(outcome.special_attack.is_none());
        assert!(boss.position().x > 0.0, "falls through to the chase");
    }

    #[test]
    fn test_life_drain_heals() {
        let mut boss = spawn_boss(Archetype::Necromancer);
        let mut rng = seeded_rng(7);
        drive_to(&mut boss, 0.65, &mut rng);
        drive_to(&mut boss, 0.35, &mut rng);
        assert_eq!(boss.phase(), Some(3));
        let special = boss.boss().unwrap().current_special().unwrap().clone();
        assert_eq!(special.kind, SpecialKind::LifeDrain);

        boss.take_damage(100.0);
        let before = boss.health();
        let outcome = boss.update(boss.position(), &OpenField, &[], &mut rng);
        let cast = outcome.special_attack.expect("life drain fired");
        assert_eq!(cast.name, "Life Drain");
        assert_eq!(boss.health(), before + (special.damage * 0.5).floor());
    }

    #[test]
    fn test_promoted_boss_without_rotation() {
        let mut record = ArchetypeCatalog::standard()
            .record(Archetype::Demon)
            .unwrap()
            .clone();
        record.boss = true;
        let catalog = ArchetypeCatalog::standard().with_entry(Archetype::Demon, record);
        let spec = AgentSpec {
            archetype: Archetype::Demon,
            level: 1,
            position: Vec2::ZERO,
        };
        let mut boss =
            Agent::new(7, &spec, &catalog, TickRate::NOMINAL, &mut seeded_rng(1)).unwrap();
        assert!(boss.boss().unwrap().rotation().is_empty());
        assert!(boss.boss().unwrap().current_special().is_none());
        let mut rng = seeded_rng(8);
        let outcome = boss.update(Vec2::new(10.0, 0.0), &OpenField, &[], &mut rng);
        assert!(outcome.special_attack.is_none());
    }
}
