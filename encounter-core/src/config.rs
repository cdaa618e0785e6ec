//! Encounter configuration, loadable from RON or JSON.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::agent::boss::validate_thresholds;
use crate::archetype::ArchetypeCatalog;
use crate::constants::{
    ADHOC_CADENCE_TICKS, AUTHORED_WAVE_COUNT, DEFAULT_PHASE_THRESHOLDS, PLACEMENT_MAX_ATTEMPTS,
    PLACEMENT_MAX_DISTANCE, PLACEMENT_MIN_DISTANCE, QUEUE_CADENCE_TICKS,
};
use crate::director::DirectorSettings;
use crate::error::{EncounterError, EncounterResult};
use crate::logging::TracingConfig;
use crate::timing::TickRate;

/// Ring around the target used to place director spawns
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementConfig {
    pub min_distance: f32,
    pub max_distance: f32,
    pub max_attempts: u32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            min_distance: PLACEMENT_MIN_DISTANCE,
            max_distance: PLACEMENT_MAX_DISTANCE,
            max_attempts: PLACEMENT_MAX_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterConfig {
    pub tick_rate: u32,
    pub seed: u64,
    pub infinite_mode: bool,
    pub authored_waves: u32,
    pub queue_cadence_ticks: u32,
    pub adhoc_cadence_ticks: u32,
    pub placement: PlacementConfig,
    pub boss_thresholds: Vec<f32>,
    /// RON overlay applied on top of the standard catalog
    pub catalog_path: Option<PathBuf>,
    pub tracing: TracingConfig,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            tick_rate: TickRate::NOMINAL.ticks_per_second(),
            seed: 42,
            infinite_mode: true,
            authored_waves: AUTHORED_WAVE_COUNT,
            queue_cadence_ticks: QUEUE_CADENCE_TICKS,
            adhoc_cadence_ticks: ADHOC_CADENCE_TICKS,
            placement: PlacementConfig::default(),
            boss_thresholds: DEFAULT_PHASE_THRESHOLDS.to_vec(),
            catalog_path: None,
            tracing: TracingConfig::default(),
        }
    }
}

impl EncounterConfig {
    pub fn from_ron(text: &str) -> EncounterResult<Self> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(text: &str) -> EncounterResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load by extension: `.json` as JSON, anything else as RON
    pub fn load(path: impl AsRef<Path>) -> EncounterResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&text),
            _ => Self::from_ron(&text),
        }
    }

    pub fn to_ron(&self) -> EncounterResult<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| EncounterError::InvalidConfig(e.to_string()))
    }

    pub fn validate(&self) -> EncounterResult<()> {
        if self.tick_rate == 0 {
            return Err(EncounterError::InvalidConfig(
                "tick_rate must be positive".into(),
            ));
        }
        if self.queue_cadence_ticks == 0 || self.adhoc_cadence_ticks == 0 {
            return Err(EncounterError::InvalidConfig(
                "spawn cadences must be positive".into(),
            ));
        }
        let placement = &self.placement;
        if !(placement.min_distance >= 0.0 && placement.min_distance <= placement.max_distance) {
            return Err(EncounterError::InvalidConfig(format!(
                "placement ring [{}, {}] is inverted",
                placement.min_distance, placement.max_distance
            )));
        }
        if placement.max_attempts == 0 {
            return Err(EncounterError::InvalidConfig(
                "placement needs at least one attempt".into(),
            ));
        }
        validate_thresholds(&self.boss_thresholds)
    }

    pub fn tick_rate(&self) -> TickRate {
        TickRate::new(self.tick_rate)
    }

    pub fn director_settings(&self) -> DirectorSettings {
        DirectorSettings {
            queue_cadence_ticks: self.queue_cadence_ticks,
            adhoc_cadence_ticks: self.adhoc_cadence_ticks,
            authored_waves: self.authored_waves,
            infinite_mode: self.infinite_mode,
            tick_rate: self.tick_rate(),
        }
    }

    /// Standard catalog, with the configured overlay if any
    pub fn catalog(&self) -> EncounterResult<ArchetypeCatalog> {
        match &self.catalog_path {
            Some(path) => ArchetypeCatalog::load_overlay(path),
            None => Ok(ArchetypeCatalog::standard()),
        }
    }
}
