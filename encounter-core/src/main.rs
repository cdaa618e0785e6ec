//! Headless encounter run: `encounter-core [config.ron|config.json] [ticks]`
//!
//! Prints the final summary as JSON.

use anyhow::Context;
use bevy::prelude::*;

use encounter_core::encounter::plugin::{EncounterResource, TargetPosition};
use encounter_core::logging::{LoggingPlugin, TimingSpan};
use encounter_core::{EncounterConfig, EncounterPlugin};

const DEFAULT_TICKS: u32 = 60 * 60 * 5;

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => EncounterConfig::load(&path)
            .with_context(|| format!("loading encounter config from {path}"))?,
        None => EncounterConfig::default(),
    };
    let ticks = match args.next() {
        Some(raw) => raw
            .parse::<u32>()
            .with_context(|| format!("tick count {raw:?} is not a number"))?,
        None => DEFAULT_TICKS,
    };

    let logging = LoggingPlugin {
        config: config.tracing.clone(),
    };
    let encounter = EncounterPlugin::new(config).context("building encounter")?;

    let mut app = App::new();
    app.add_plugins(logging)
        .add_plugins(encounter)
        .add_systems(Update, circle_target);

    {
        let _span = TimingSpan::new("headless_run");
        for _ in 0..ticks {
            app.update();
        }
    }

    let summary = app
        .world()
        .get_resource::<EncounterResource>()
        .map(|r| r.0.summary())
        .context("encounter resource missing")?;
    tracing::info!(ticks, wave = summary.wave, score = summary.score, "run finished");
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Walks the target slowly around the origin so agents have something to chase
fn circle_target(mut target: ResMut<TargetPosition>, mut frame: Local<u32>) {
    *frame = frame.wrapping_add(1);
    let angle = *frame as f32 * 0.002;
    target.0 = Vec2::from_angle(angle) * 200.0;
}
