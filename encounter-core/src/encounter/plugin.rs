use bevy::prelude::*;

use super::{AttackEvent, Encounter, Kill};
use crate::agent::{AgentId, SpecialAttackCast};
use crate::archetype::Archetype;
use crate::config::EncounterConfig;
use crate::error::EncounterResult;
use crate::terrain::{OpenField, Passability};

/// Runs one encounter tick per `Update`
pub struct EncounterPlugin {
    encounter: Encounter,
}

impl EncounterPlugin {
    /// Builds the encounter up front; config, catalog and spawnability
    /// errors surface here rather than in `build`
    pub fn new(config: EncounterConfig) -> EncounterResult<Self> {
        Ok(Self {
            encounter: Encounter::new(config)?,
        })
    }

    pub fn from_encounter(encounter: Encounter) -> Self {
        Self { encounter }
    }
}

impl Plugin for EncounterPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(EncounterResource(self.encounter.clone()))
            .init_resource::<TargetPosition>()
            .init_resource::<EncounterTerrain>()
            .add_event::<DamageAgentEvent>()
            .add_event::<AgentSpawnedEvent>()
            .add_event::<AgentAttackEvent>()
            .add_event::<SpecialAttackEvent>()
            .add_event::<AgentKilledEvent>()
            .add_event::<WaveStartedEvent>()
            .add_systems(Update, (apply_damage_system, encounter_tick_system).chain());
    }
}

#[derive(Resource)]
pub struct EncounterResource(pub Encounter);

/// Where the agents' target currently stands
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct TargetPosition(pub Vec2);

#[derive(Resource)]
pub struct EncounterTerrain(pub Box<dyn Passability + Send + Sync>);

impl Default for EncounterTerrain {
    fn default() -> Self {
        Self(Box::new(OpenField))
    }
}

/// Host-side damage to an agent, applied before the next tick
#[derive(Event, Debug, Clone, Copy)]
pub struct DamageAgentEvent {
    pub agent: AgentId,
    pub amount: f32,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct AgentSpawnedEvent {
    pub agent: AgentId,
    pub archetype: Archetype,
    pub boss: bool,
    pub position: Vec2,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct AgentAttackEvent(pub AttackEvent);

#[derive(Event, Debug, Clone)]
pub struct SpecialAttackEvent {
    pub agent: AgentId,
    pub cast: SpecialAttackCast,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct AgentKilledEvent(pub Kill);

#[derive(Event, Debug, Clone, Copy)]
pub struct WaveStartedEvent {
    pub wave: u32,
}

fn apply_damage_system(
    mut events: EventReader<DamageAgentEvent>,
    mut encounter: ResMut<EncounterResource>,
) {
    for event in events.read() {
        encounter.0.damage_agent(event.agent, event.amount);
    }
}

#[allow(clippy::too_many_arguments)]
fn encounter_tick_system(
    mut encounter: ResMut<EncounterResource>,
    target: Res<TargetPosition>,
    terrain: Res<EncounterTerrain>,
    mut spawned: EventWriter<AgentSpawnedEvent>,
    mut attacks: EventWriter<AgentAttackEvent>,
    mut specials: EventWriter<SpecialAttackEvent>,
    mut killed: EventWriter<AgentKilledEvent>,
    mut waves: EventWriter<WaveStartedEvent>,
) {
    let encounter = &mut encounter.0;
    let report = encounter.tick(target.0, terrain.0.as_ref());

    for id in report.spawned {
        if let Some(agent) = encounter.agent(id) {
            spawned.send(AgentSpawnedEvent {
                agent: id,
                archetype: agent.archetype(),
                boss: agent.is_boss(),
                position: agent.position(),
            });
        }
    }
    for attack in report.attacks {
        attacks.send(AgentAttackEvent(attack));
    }
    for (agent, cast) in report.special_attacks {
        specials.send(SpecialAttackEvent { agent, cast });
    }
    for kill in report.kills {
        killed.send(AgentKilledEvent(kill));
    }
    if let Some(wave) = report.wave_started {
        waves.send(WaveStartedEvent { wave });
    }
}
