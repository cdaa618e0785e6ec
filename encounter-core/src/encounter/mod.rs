//! Reference host wiring the director and agents together.
//!
//! One `Encounter::tick`:
//! 1. the director may request a spawn, placed on a ring around the target
//! 2. live agents update in stable id order against a peer snapshot
//! 3. summon requests are applied after the pass
//! 4. dead agents are reaped, score and kills accumulate
//! 5. the next wave starts once enough kills are in
//!
//! Combat against the target stays outside: the tick reports attacks and
//! special casts, and the caller feeds damage back with `damage_agent`.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::agent::{Agent, AgentId, AgentSpec, PeerView, SpecialAttackCast};
use crate::archetype::{self, Archetype, ArchetypeCatalog};
use crate::config::{EncounterConfig, PlacementConfig};
use crate::director::{waves, weights, ArchetypeRequest, SpawnDirector};
use crate::error::{EncounterError, EncounterResult};
use crate::terrain::Passability;
use crate::timing::{seeded_rng, SimRng, TickRate};

pub mod plugin;

pub use plugin::{EncounterPlugin, EncounterResource};

/// An agent's attack that landed this tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackEvent {
    pub agent: AgentId,
    pub archetype: Archetype,
    pub damage: f32,
}

/// A reaped agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kill {
    pub agent: AgentId,
    pub archetype: Archetype,
    pub boss: bool,
    pub score: u32,
}

/// What happened during one tick
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub spawned: Vec<AgentId>,
    pub attacks: Vec<AttackEvent>,
    pub special_attacks: Vec<(AgentId, SpecialAttackCast)>,
    pub kills: Vec<Kill>,
    pub wave_started: Option<u32>,
}

/// Aggregates a save collaborator can persist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterSummary {
    pub tick: u64,
    pub wave: u32,
    pub score: u64,
    pub kills: u32,
    pub wave_kills: u32,
    pub live_agents: usize,
    pub live_bosses: usize,
}

#[derive(Clone)]
pub struct Encounter {
    config: EncounterConfig,
    catalog: ArchetypeCatalog,
    director: SpawnDirector,
    agents: Vec<Agent>,
    rng: SimRng,
    rate: TickRate,
    next_id: AgentId,
    tick: u64,
    score: u64,
    kills: u32,
    wave_kills: u32,
}

impl Encounter {
    /// Build from config, loading the catalog overlay if one is configured
    pub fn new(config: EncounterConfig) -> EncounterResult<Self> {
        let catalog = config.catalog()?;
        Self::with_catalog(config, catalog)
    }

    pub fn with_catalog(
        config: EncounterConfig,
        catalog: ArchetypeCatalog,
    ) -> EncounterResult<Self> {
        config.validate()?;
        catalog.validate()?;
        ensure_spawnable(&catalog)?;

        let mut rng = seeded_rng(config.seed);
        let mut director = SpawnDirector::new(config.director_settings());
        director.start_wave(1, &mut rng);

        Ok(Self {
            rate: config.tick_rate(),
            config,
            catalog,
            director,
            agents: Vec::new(),
            rng,
            next_id: 1,
            tick: 0,
            score: 0,
            kills: 0,
            wave_kills: 0,
        })
    }

    /// Advance one tick with the target at `target`
    pub fn tick<P: Passability + ?Sized>(&mut self, target: Vec2, terrain: &P) -> TickReport {
        let mut report = TickReport::default();
        self.tick += 1;

        if let Some(request) = self.director.update(&mut self.rng) {
            let position = self.place_near(target, terrain);
            if let Some(id) = self.try_spawn(&request, position) {
                report.spawned.push(id);
            }
        }

        let peers: Vec<PeerView> = self
            .agents
            .iter()
            .filter(|a| a.is_alive())
            .map(Agent::peer_view)
            .collect();

        let mut summons = Vec::new();
        for agent in &mut self.agents {
            let outcome = agent.update(target, terrain, &peers, &mut self.rng);
            summons.extend(outcome.spawn_requests);
            if let Some(cast) = outcome.special_attack {
                report.special_attacks.push((agent.id(), cast));
            }
            if agent.is_attacking() {
                report.attacks.push(AttackEvent {
                    agent: agent.id(),
                    archetype: agent.archetype(),
                    damage: agent.damage() * (1.0 + agent.swarm_bonus()),
                });
            }
        }

        for summon in summons {
            let position = if terrain.is_passable(summon.origin) {
                summon.origin
            } else {
                self.place_near(target, terrain)
            };
            let request = ArchetypeRequest {
                archetype: summon.archetype,
                level: summon.level,
                boss: false,
            };
            if let Some(id) = self.try_spawn(&request, position) {
                report.spawned.push(id);
            }
        }

        report.kills = self.reap();
        report.wave_started = self.advance_wave();
        report
    }

    /// Host combat entry point. Returns true if the hit killed the agent.
    pub fn damage_agent(&mut self, id: AgentId, amount: f32) -> bool {
        self.agents
            .iter_mut()
            .find(|a| a.id() == id)
            .is_some_and(|a| a.take_damage(amount))
    }

    /// Spawn directly (scripted events, tests)
    pub fn spawn(
        &mut self,
        request: &ArchetypeRequest,
        position: Vec2,
    ) -> EncounterResult<AgentId> {
        let id = self.next_id;
        let spec = AgentSpec {
            archetype: request.archetype,
            level: request.level,
            position,
        };
        let agent = Agent::new(id, &spec, &self.catalog, self.rate, &mut self.rng)?
            .with_phase_thresholds(&self.config.boss_thresholds)?;
        if agent.is_boss() {
            tracing::info!(
                agent = id,
                archetype = ?agent.archetype(),
                level = agent.level(),
                "boss spawned"
            );
        }
        self.next_id += 1;
        self.agents.push(agent);
        Ok(id)
    }

    fn try_spawn(&mut self, request: &ArchetypeRequest, position: Vec2) -> Option<AgentId> {
        match self.spawn(request, position) {
            Ok(id) => Some(id),
            Err(err) => {
                tracing::error!(?request, %err, "spawn rejected");
                None
            }
        }
    }

    /// Ring search around `anchor`; falls back to the last candidate
    fn place_near<P: Passability + ?Sized>(&mut self, anchor: Vec2, terrain: &P) -> Vec2 {
        let placement = self.config.placement;
        let mut candidate = anchor;
        for _ in 0..placement.max_attempts {
            candidate = ring_point(anchor, &placement, &mut self.rng);
            if terrain.is_passable(candidate) {
                return candidate;
            }
        }
        tracing::warn!(
            attempts = placement.max_attempts,
            x = candidate.x,
            y = candidate.y,
            "no passable spawn position found, placing anyway"
        );
        candidate
    }

    fn reap(&mut self) -> Vec<Kill> {
        let mut kills = Vec::new();
        self.agents.retain(|agent| {
            if agent.is_alive() {
                return true;
            }
            kills.push(Kill {
                agent: agent.id(),
                archetype: agent.archetype(),
                boss: agent.is_boss(),
                score: agent.score_value(),
            });
            false
        });
        for kill in &kills {
            self.score += kill.score as u64;
        }
        self.kills += kills.len() as u32;
        self.wave_kills += kills.len() as u32;
        kills
    }

    fn advance_wave(&mut self) -> Option<u32> {
        let wave = self.director.current_wave().max(1);
        if self.wave_kills < waves::wave_count(wave) {
            return None;
        }
        self.wave_kills = 0;
        let next = wave + 1;
        self.director.start_wave(next, &mut self.rng);
        Some(next)
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id() == id)
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|a| a.id() == id)
    }

    pub fn director(&self) -> &SpawnDirector {
        &self.director
    }

    pub fn director_mut(&mut self) -> &mut SpawnDirector {
        &mut self.director
    }

    pub fn catalog(&self) -> &ArchetypeCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &EncounterConfig {
        &self.config
    }

    pub fn wave(&self) -> u32 {
        self.director.current_wave()
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn summary(&self) -> EncounterSummary {
        EncounterSummary {
            tick: self.tick,
            wave: self.director.current_wave(),
            score: self.score,
            kills: self.kills,
            wave_kills: self.wave_kills,
            live_agents: self.agents.len(),
            live_bosses: self.agents.iter().filter(|a| a.is_boss()).count(),
        }
    }
}

/// Uniform angle, uniform distance within the placement ring
fn ring_point<R: Rng + ?Sized>(anchor: Vec2, placement: &PlacementConfig, rng: &mut R) -> Vec2 {
    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    let distance = rng.gen_range(placement.min_distance..=placement.max_distance);
    anchor + Vec2::from_angle(angle) * distance
}

/// Every archetype the director or Summon can request must be in the catalog
fn ensure_spawnable(catalog: &ArchetypeCatalog) -> EncounterResult<()> {
    let required = weights::BASE_ORDER
        .iter()
        .chain(weights::BOSS_ORDER.iter())
        .chain(archetype::summonable().iter());
    for archetype in required {
        if !catalog.contains(*archetype) {
            return Err(EncounterError::UnknownArchetype(*archetype));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::{BoundedArena, OpenField};

    fn encounter() -> Encounter {
        Encounter::new(EncounterConfig::default()).unwrap()
    }

    #[test]
    fn test_starts_at_wave_one() {
        let encounter = encounter();
        assert_eq!(encounter.wave(), 1);
        assert_eq!(encounter.director().queue_len(), 7);
        assert!(encounter.agents().is_empty());
    }

    #[test]
    fn test_first_spawn_on_ring() {
        let mut encounter = encounter();
        let target = Vec2::new(100.0, -50.0);
        let mut spawned = None;
        for _ in 0..45 {
            let report = encounter.tick(target, &OpenField);
            if let Some(id) = report.spawned.first() {
                spawned = Some(*id);
            }
        }
        let id = spawned.expect("queue spawn at tick 45");
        let agent = encounter.agent(id).unwrap();
        // Spawned this tick, then moved at most one step
        let distance = agent.position().distance(target);
        assert!((295.0..=605.0).contains(&distance), "{distance}");
    }

    #[test]
    fn test_kills_score_and_wave_advance() {
        let mut encounter = encounter();
        let request = ArchetypeRequest {
            archetype: Archetype::Goblin,
            level: 1,
            boss: false,
        };
        let ids: Vec<_> = (0..10)
            .map(|i| {
                encounter
                    .spawn(&request, Vec2::new(1000.0 + i as f32, 0.0))
                    .unwrap()
            })
            .collect();
        for id in &ids {
            assert!(encounter.damage_agent(*id, 1000.0));
        }
        let report = encounter.tick(Vec2::ZERO, &OpenField);
        assert_eq!(report.kills.len(), 10);
        assert_eq!(encounter.score(), 100);
        assert_eq!(report.wave_started, Some(2));
        assert_eq!(encounter.wave(), 2);
        assert_eq!(encounter.summary().wave_kills, 0);
    }

    #[test]
    fn test_impassable_terrain_never_panics() {
        let mut encounter = encounter();
        let wall = |_: Vec2| false;
        for _ in 0..200 {
            encounter.tick(Vec2::ZERO, &wall);
        }
        assert!(!encounter.agents().is_empty());
    }

    #[test]
    fn test_arena_spawns_inside() {
        let mut encounter = encounter();
        let arena = BoundedArena::centered(2000.0);
        for _ in 0..300 {
            encounter.tick(Vec2::ZERO, &arena);
        }
        for agent in encounter.agents() {
            assert!(arena.is_passable(agent.position()));
        }
    }

    #[test]
    fn test_catalog_missing_spawnable_rejected() {
        let result =
            Encounter::with_catalog(EncounterConfig::default(), ArchetypeCatalog::empty());
        assert!(matches!(result, Err(EncounterError::UnknownArchetype(_))));
    }

    #[test]
    fn test_summary_serializes() {
        let encounter = encounter();
        let json = serde_json::to_string(&encounter.summary()).unwrap();
        assert!(json.contains("\"wave\":1"));
    }
}
