//! Agents: live instances of an archetype.
//!
//! One `Agent::update` call is one simulation tick:
//! - cooldowns and invisibility count down
//! - the behavior tag picks a movement policy (see `behavior`)
//! - a ready ability fires (see `ability`)
//! - the passability check reverts illegal moves
//! - the attack gate opens when the target is in range
//!
//! Bosses carry a `BossExtension` that runs the phase machine ahead of the
//! base update (see `boss`). Cross-agent effects never happen here: peers are
//! a read-only snapshot and spawns are returned to the host.

use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::archetype::{
    Ability, Archetype, ArchetypeCatalog, Behavior, DerivedStats, SpecialKind,
};
use crate::constants::{
    BERSERKER_DAMAGE_MULT, BERSERKER_SPEED_MULT, BERSERKER_THRESHOLD, TELEPORT_DISTANCE,
};
use crate::error::{EncounterError, EncounterResult};
use crate::terrain::Passability;
use crate::timing::TickRate;

pub mod ability;
pub mod behavior;
pub mod boss;

pub use boss::BossExtension;

/// Host-assigned agent identifier
pub type AgentId = u64;

/// What one agent may know about another during its update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeerView {
    pub id: AgentId,
    pub archetype: Archetype,
    pub position: Vec2,
    pub alive: bool,
}

/// Spawn descriptor handed to the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    pub archetype: Archetype,
    pub level: u32,
    pub origin: Vec2,
}

/// Everything needed to create an agent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSpec {
    pub archetype: Archetype,
    pub level: u32,
    pub position: Vec2,
}

/// Visual marker kinds; opaque to the core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    Heal,
    Teleport,
    Invisible,
    Elemental(Ability),
    PhaseTransition,
    SpecialAttack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectMarker {
    pub kind: EffectKind,
    pub ticks_remaining: u32,
}

/// A boss special attack fired this tick
#[derive(Debug, Clone, PartialEq)]
pub struct SpecialAttackCast {
    pub name: String,
    pub kind: SpecialKind,
    pub damage: f32,
    pub range: f32,
    pub origin: Vec2,
}

/// Result of one update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentOutcome {
    pub spawn_requests: Vec<SpawnRequest>,
    pub special_attack: Option<SpecialAttackCast>,
}

impl AgentOutcome {
    pub fn is_empty(&self) -> bool {
        self.spawn_requests.is_empty() && self.special_attack.is_none()
    }
}

/// Remaining ticks per capability; zero means ready
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cooldowns {
    pub attack: u32,
    pub ability: u32,
    pub teleport: u32,
    pub summon: u32,
}

impl Cooldowns {
    fn tick(&mut self) {
        self.attack = self.attack.saturating_sub(1);
        self.ability = self.ability.saturating_sub(1);
        self.teleport = self.teleport.saturating_sub(1);
        self.summon = self.summon.saturating_sub(1);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PatrolRoute {
    pub(crate) waypoints: Vec<Vec2>,
    pub(crate) next: usize,
}

#[derive(Debug, Clone)]
pub struct Agent {
    id: AgentId,
    stats: DerivedStats,
    rate: TickRate,
    position: Vec2,
    health: f32,
    direction: Vec2,
    facing_right: bool,
    wander_timer: u32,
    cooldowns: Cooldowns,
    invisible_ticks: u32,
    attacking: bool,
    was_attacked: bool,
    swarm_bonus: f32,
    berserker_active: bool,
    teleport_distance: f32,
    patrol: Option<PatrolRoute>,
    effects: Vec<EffectMarker>,
    boss: Option<BossExtension>,
}

impl Agent {
    /// Create an agent from the catalog. Fails on unknown archetypes.
    /// Only boss-flagged archetypes get boss scaling and a phase machine.
    pub fn new<R: Rng + ?Sized>(
        id: AgentId,
        spec: &AgentSpec,
        catalog: &ArchetypeCatalog,
        rate: TickRate,
        rng: &mut R,
    ) -> EncounterResult<Self> {
        let is_boss = catalog.is_boss_archetype(spec.archetype)?;
        let stats = catalog.stats_for(spec.archetype, spec.level, is_boss)?;
        let boss = is_boss.then(|| BossExtension::new(&stats));
        let mut agent = Self {
            id,
            health: stats.max_health,
            stats,
            rate,
            position: spec.position,
            direction: Vec2::X,
            facing_right: true,
            wander_timer: 0,
            cooldowns: Cooldowns::default(),
            invisible_ticks: 0,
            attacking: false,
            was_attacked: false,
            swarm_bonus: 0.0,
            berserker_active: false,
            teleport_distance: TELEPORT_DISTANCE,
            patrol: None,
            effects: Vec::new(),
            boss,
        };
        agent.redirect(rng);
        Ok(agent)
    }

    /// Replace the default boss thresholds. No effect on non-bosses.
    pub fn with_phase_thresholds(mut self, thresholds: &[f32]) -> EncounterResult<Self> {
        if let Some(boss) = self.boss.take() {
            self.boss = Some(boss.with_thresholds(thresholds)?);
        }
        Ok(self)
    }

    /// Waypoints for the Patrol policy
    pub fn with_patrol_route(mut self, waypoints: Vec<Vec2>) -> Self {
        self.patrol = Some(PatrolRoute { waypoints, next: 0 });
        self
    }

    pub fn with_teleport_distance(mut self, distance: f32) -> Self {
        self.teleport_distance = distance;
        self
    }

    // ===================================================================
    // Read surface
    // ===================================================================

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn archetype(&self) -> Archetype {
        self.stats.archetype
    }

    pub fn level(&self) -> u32 {
        self.stats.level
    }

    pub fn behavior(&self) -> Behavior {
        self.stats.behavior
    }

    pub fn stats(&self) -> &DerivedStats {
        &self.stats
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    pub fn facing_right(&self) -> bool {
        self.facing_right
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.stats.max_health
    }

    pub fn health_fraction(&self) -> f32 {
        self.health / self.stats.max_health
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn is_attacking(&self) -> bool {
        self.attacking
    }

    pub fn is_boss(&self) -> bool {
        self.boss.is_some()
    }

    /// Current phase; `None` for non-bosses
    pub fn phase(&self) -> Option<u8> {
        self.boss.as_ref().map(|b| b.phase())
    }

    pub fn boss(&self) -> Option<&BossExtension> {
        self.boss.as_ref()
    }

    pub fn score_value(&self) -> u32 {
        self.stats.score_value
    }

    pub fn damage(&self) -> f32 {
        self.stats.damage
    }

    pub fn speed(&self) -> f32 {
        self.stats.speed
    }

    pub fn attack_range(&self) -> f32 {
        self.stats.attack_range
    }

    pub fn footprint(&self) -> f32 {
        self.stats.footprint
    }

    pub fn abilities(&self) -> &[Ability] {
        &self.stats.abilities
    }

    pub fn cooldowns(&self) -> Cooldowns {
        self.cooldowns
    }

    pub fn is_invisible(&self) -> bool {
        self.invisible_ticks > 0
    }

    pub fn was_attacked(&self) -> bool {
        self.was_attacked
    }

    pub fn swarm_bonus(&self) -> f32 {
        self.swarm_bonus
    }

    pub fn berserker_active(&self) -> bool {
        self.berserker_active
    }

    pub fn effects(&self) -> &[EffectMarker] {
        &self.effects
    }

    pub fn tick_rate(&self) -> TickRate {
        self.rate
    }

    /// Snapshot entry for the host's peer list
    pub fn peer_view(&self) -> PeerView {
        PeerView {
            id: self.id,
            archetype: self.stats.archetype,
            position: self.position,
            alive: self.is_alive(),
        }
    }

    // ===================================================================
    // Host mutation entry points
    // ===================================================================

    /// Position correction from the host (placement, knockback)
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Apply damage from the host. Returns true when this hit killed the agent.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.is_alive() {
            return false;
        }
        let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
        self.was_attacked = true;
        self.invisible_ticks = 0;
        self.health = (self.health - amount).max(0.0);
        !self.is_alive()
    }

    pub fn is_target_in_range(&self, target: Vec2) -> bool {
        self.position.distance(target) <= self.stats.attack_range
    }

    // ===================================================================
    // Tick
    // ===================================================================

    /// Advance one tick. A dead agent returns an empty outcome and changes nothing.
    pub fn update<P, R>(
        &mut self,
        target: Vec2,
        terrain: &P,
        peers: &[PeerView],
        rng: &mut R,
    ) -> AgentOutcome
    where
        P: Passability + ?Sized,
        R: Rng + ?Sized,
    {
        let mut outcome = AgentOutcome::default();
        if !self.is_alive() {
            return outcome;
        }
        self.age_effects();

        if self.boss.is_some() && self.advance_boss(target, terrain, peers, rng, &mut outcome) {
            debug_assert!(self.check_invariants().is_ok());
            return outcome;
        }

        let previous = self.position;

        self.cooldowns.tick();
        self.invisible_ticks = self.invisible_ticks.saturating_sub(1);
        self.apply_berserker();

        behavior::steer(self, target, peers, rng);

        if self.cooldowns.ability == 0 {
            if let Some(ability) = self.stats.abilities.choose(rng).copied() {
                let spawned = self.activate_ability(ability, target, peers, rng);
                outcome.spawn_requests.extend(spawned);
            }
        }

        if !terrain.is_passable(self.position) {
            self.position = previous;
            self.redirect(rng);
        }

        if self.direction.x > 0.0 {
            self.facing_right = true;
        } else if self.direction.x < 0.0 {
            self.facing_right = false;
        }

        if self.is_target_in_range(target) && self.cooldowns.attack == 0 {
            self.attacking = true;
            self.cooldowns.attack = self.rate.ticks(self.stats.attack_cooldown);
        } else {
            self.attacking = false;
        }

        debug_assert!(self.check_invariants().is_ok());
        outcome
    }

    /// Check health bounds and boss phase range
    pub fn check_invariants(&self) -> EncounterResult<()> {
        if !self.health.is_finite() || self.health < 0.0 || self.health > self.stats.max_health {
            return Err(EncounterError::InvariantViolation(format!(
                "{:?} #{} health {} outside [0, {}]",
                self.stats.archetype, self.id, self.health, self.stats.max_health
            )));
        }
        if let Some(boss) = &self.boss {
            if !(1..=crate::constants::MAX_BOSS_PHASE).contains(&boss.phase()) {
                return Err(EncounterError::InvariantViolation(format!(
                    "{:?} #{} boss phase {} outside [1, {}]",
                    self.stats.archetype,
                    self.id,
                    boss.phase(),
                    crate::constants::MAX_BOSS_PHASE
                )));
            }
        }
        Ok(())
    }

    // ===================================================================
    // Internals shared by behavior/ability/boss
    // ===================================================================

    fn apply_berserker(&mut self) {
        if self.stats.behavior == Behavior::Berserker
            && !self.berserker_active
            && self.health < self.stats.max_health * BERSERKER_THRESHOLD
        {
            self.berserker_active = true;
            self.stats.damage = (self.stats.damage * BERSERKER_DAMAGE_MULT).floor();
            self.stats.speed *= BERSERKER_SPEED_MULT;
        }
    }

    /// Per-tick distance at the host's tick rate
    pub(crate) fn step_length(&self) -> f32 {
        self.rate.per_tick(self.stats.speed)
    }

    /// Pick a fresh uniformly random heading
    pub(crate) fn redirect<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        self.direction = Vec2::from_angle(angle);
    }

    pub(crate) fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount.max(0.0)).min(self.stats.max_health);
    }

    pub(crate) fn push_effect(&mut self, kind: EffectKind, nominal_ticks: u32) {
        self.effects.push(EffectMarker {
            kind,
            ticks_remaining: self.rate.ticks(nominal_ticks),
        });
    }

    fn age_effects(&mut self) {
        for effect in &mut self.effects {
            effect.ticks_remaining = effect.ticks_remaining.saturating_sub(1);
        }
        self.effects.retain(|e| e.ticks_remaining > 0);
    }
}
