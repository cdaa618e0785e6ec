//! Encounter Director - Core Library
//!
//! Deterministic hostile-encounter logic for an action RPG:
//! - Archetype catalog (base records, level scaling, boss scaling)
//! - Agents (behavior policies, abilities, cooldowns)
//! - Boss phases (threshold transitions, special-attack rotation)
//! - Spawn director (authored waves, synthesized waves, weighted ad-hoc draws)
//! - Encounter host (placement, kills, wave progression) and its Bevy plugin
//! - Monte-Carlo spawn-mix sampling

pub mod agent;
pub mod archetype;
pub mod balance;
pub mod config;
pub mod constants;
pub mod director;
pub mod encounter;
pub mod error;
pub mod logging;
pub mod terrain;
pub mod timing;

pub use agent::{Agent, AgentId, AgentOutcome, AgentSpec, PeerView, SpawnRequest};
pub use archetype::{Ability, Archetype, ArchetypeCatalog, Behavior, DerivedStats};
pub use config::EncounterConfig;
pub use director::{ArchetypeRequest, SpawnDirector};
pub use encounter::{Encounter, EncounterPlugin};
pub use error::{EncounterError, EncounterResult};
pub use terrain::Passability;
pub use timing::{seeded_rng, SimRng, TickRate};
