//! Structured logging via `tracing`.
//!
//! - Per-subsystem levels (agents, bosses, director, encounter, balance)
//! - Idempotent initialization; the first config wins
//! - `RUST_LOG` extends the filter; configured targets win on conflict
//! - `TimingSpan` guards report elapsed time when span timing is on

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Once;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

/// Installs the subscriber when the app is built
#[derive(Default)]
pub struct LoggingPlugin {
    pub config: TracingConfig,
}

impl Plugin for LoggingPlugin {
    fn build(&self, _app: &mut App) {
        init_tracing(&self.config);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Off,
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

/// Subsystems that emit events
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogTarget {
    /// Ability use (trace)
    Agent,
    /// Phase transitions (debug)
    Boss,
    /// Wave starts and boss requests (info)
    Director,
    /// Spawns, kills and wave advances
    Encounter,
    /// Sampler summaries
    Balance,
}

impl LogTarget {
    pub fn module_path(self) -> &'static str {
        match self {
            LogTarget::Agent => "encounter_core::agent::ability",
            LogTarget::Boss => "encounter_core::agent::boss",
            LogTarget::Director => "encounter_core::director",
            LogTarget::Encounter => "encounter_core::encounter",
            LogTarget::Balance => "encounter_core::balance",
        }
    }

    fn directive(self, level: LogLevel) -> Option<Directive> {
        format!("{}={}", self.module_path(), LevelFilter::from(level))
            .parse()
            .ok()
    }
}

/// Configuration for tracing initialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    pub default_level: LogLevel,
    pub targets: Vec<(LogTarget, LogLevel)>,
    /// Log elapsed time when a `TimingSpan` closes
    pub span_timing: bool,
    pub show_targets: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: LogLevel::Warn,
            targets: vec![
                (LogTarget::Director, LogLevel::Info),
                (LogTarget::Encounter, LogLevel::Info),
                (LogTarget::Balance, LogLevel::Info),
            ],
            span_timing: true,
            show_targets: true,
        }
    }
}

impl TracingConfig {
    /// Override (or add) the level for one subsystem
    pub fn with_target(mut self, target: LogTarget, level: LogLevel) -> Self {
        match self.targets.iter_mut().find(|(t, _)| *t == target) {
            Some(entry) => entry.1 = level,
            None => self.targets.push((target, level)),
        }
        self
    }

    pub fn level_for(&self, target: LogTarget) -> LogLevel {
        self.targets
            .iter()
            .find(|(t, _)| *t == target)
            .map_or(self.default_level, |(_, level)| *level)
    }

    /// `RUST_LOG` (or the default level) plus one directive per target
    pub fn env_filter(&self) -> EnvFilter {
        let base = EnvFilter::builder()
            .with_default_directive(LevelFilter::from(self.default_level).into())
            .from_env_lossy();
        self.targets
            .iter()
            .filter_map(|(target, level)| target.directive(*level))
            .fold(base, EnvFilter::add_directive)
    }
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing (idempotent; first call wins)
pub fn init_tracing(config: &TracingConfig) {
    let config = config.clone();
    TRACING_INIT.call_once(move || {
        let span_events = if config.span_timing {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(config.env_filter())
            .with_target(config.show_targets)
            .with_span_events(span_events)
            .compact();

        // A host may already own the global subscriber
        let _ = subscriber.try_init();
    });
}

/// Span guard for timing an encounter operation
pub struct TimingSpan {
    _span: tracing::span::EnteredSpan,
}

impl TimingSpan {
    pub fn new(op: &'static str) -> Self {
        let span = tracing::info_span!("timed", op);
        Self {
            _span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_conversion() {
        assert_eq!(LevelFilter::from(LogLevel::Trace), LevelFilter::TRACE);
        assert_eq!(LevelFilter::from(LogLevel::Off), LevelFilter::OFF);
        assert_eq!(LevelFilter::from(LogLevel::Error), LevelFilter::ERROR);
    }

    #[test]
    fn test_target_directives() {
        let targets = [
            LogTarget::Agent,
            LogTarget::Boss,
            LogTarget::Director,
            LogTarget::Encounter,
            LogTarget::Balance,
        ];
        for target in targets {
            assert!(target.module_path().starts_with("encounter_core::"));
            assert!(target.directive(LogLevel::Debug).is_some(), "{target:?}");
        }
        let _ = TracingConfig::default().env_filter();
    }

    #[test]
    fn test_with_target_overrides() {
        let config = TracingConfig::default()
            .with_target(LogTarget::Director, LogLevel::Trace)
            .with_target(LogTarget::Boss, LogLevel::Debug);
        assert_eq!(config.level_for(LogTarget::Director), LogLevel::Trace);
        assert_eq!(config.level_for(LogTarget::Boss), LogLevel::Debug);
        assert_eq!(config.level_for(LogTarget::Agent), LogLevel::Warn);
        assert_eq!(config.targets.len(), 4);
    }

    #[test]
    fn test_tracing_config_ron_roundtrip() {
        let config = TracingConfig::default().with_target(LogTarget::Agent, LogLevel::Off);
        let text = ron::to_string(&config).unwrap();
        let restored: TracingConfig = ron::from_str(&text).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: TracingConfig =
            ron::from_str("(default_level: Debug, targets: [(Boss, Trace)])").unwrap();
        assert_eq!(config.default_level, LogLevel::Debug);
        assert_eq!(config.level_for(LogTarget::Boss), LogLevel::Trace);
        assert!(config.span_timing);
    }

    #[test]
    fn test_init_tracing_idempotent() {
        init_tracing(&TracingConfig::default());
        init_tracing(&TracingConfig::default().with_target(LogTarget::Agent, LogLevel::Trace));
    }

    #[test]
    fn test_timing_span() {
        init_tracing(&TracingConfig::default());
        let _span = TimingSpan::new("unit_test");
        tracing::info!(target: "encounter_core::balance", "inside span");
    }
}
