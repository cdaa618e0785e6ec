//! Spawn director: decides which archetype appears next.
//!
//! Two channels share one `update` call per tick:
//! - Queue: the current wave's pre-shuffled list, one entry per cadence
//! - Ad-hoc: one weighted-random draw per cadence, infinite mode only
//!
//! The director never positions anything. It emits `ArchetypeRequest`s and
//! the host places them.

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::archetype::Archetype;
use crate::constants::{ADHOC_CADENCE_TICKS, AUTHORED_WAVE_COUNT, QUEUE_CADENCE_TICKS};
use crate::timing::TickRate;

pub mod waves;
pub mod weights;

pub use waves::{QueuedSpawn, WaveSpec};
pub use weights::{boss_chance, WeightTable};

/// What the host should spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchetypeRequest {
    pub archetype: Archetype,
    pub level: u32,
    /// Boss-tier draw (boss roll or wave boss slot). Promotion itself follows
    /// the catalog's boss flag.
    pub boss: bool,
}

/// Which channel produced a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnChannel {
    Queue,
    AdHoc,
}

/// Director tuning in nominal ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectorSettings {
    pub queue_cadence_ticks: u32,
    pub adhoc_cadence_ticks: u32,
    pub authored_waves: u32,
    pub infinite_mode: bool,
    pub tick_rate: TickRate,
}

impl Default for DirectorSettings {
    fn default() -> Self {
        Self {
            queue_cadence_ticks: QUEUE_CADENCE_TICKS,
            adhoc_cadence_ticks: ADHOC_CADENCE_TICKS,
            authored_waves: AUTHORED_WAVE_COUNT,
            infinite_mode: true,
            tick_rate: TickRate::NOMINAL,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpawnDirector {
    settings: DirectorSettings,
    queue_cadence: u32,
    adhoc_cadence: u32,
    current_wave: u32,
    queue: VecDeque<QueuedSpawn>,
    queue_timer: u32,
    adhoc_timer: u32,
    last_channel: Option<SpawnChannel>,
}

impl SpawnDirector {
    pub fn new(settings: DirectorSettings) -> Self {
        let rate = settings.tick_rate;
        Self {
            queue_cadence: rate.ticks(settings.queue_cadence_ticks).max(1),
            adhoc_cadence: rate.ticks(settings.adhoc_cadence_ticks).max(1),
            settings,
            current_wave: 0,
            queue: VecDeque::new(),
            queue_timer: 0,
            adhoc_timer: 0,
            last_channel: None,
        }
    }

    /// Reset the queue for `index` (authored, synthesized or fallback)
    pub fn start_wave<R: Rng + ?Sized>(&mut self, index: u32, rng: &mut R) {
        let spec = waves::wave_for(
            index,
            self.settings.authored_waves,
            self.settings.infinite_mode,
        );
        self.current_wave = index;
        self.queue = spec.build_queue(rng).into();
        self.queue_timer = 0;

        tracing::info!(
            wave = index,
            queued = self.queue.len(),
            boss_slot = ?spec.boss_slot,
            "wave started"
        );
    }

    /// Advance one tick; at most one request per tick
    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<ArchetypeRequest> {
        let mut emitted = None;

        if !self.queue.is_empty() {
            self.queue_timer += 1;
            if self.queue_timer >= self.queue_cadence {
                self.queue_timer = 0;
                emitted = self.queue.pop_front().map(|q| self.request(q.archetype, q.boss));
                if emitted.is_some() {
                    self.last_channel = Some(SpawnChannel::Queue);
                }
            }
        }

        if self.settings.infinite_mode {
            self.adhoc_timer = self.adhoc_timer.saturating_add(1);
            // A due draw that collides with a queue spawn waits for the next tick
            if emitted.is_none() && self.adhoc_timer >= self.adhoc_cadence {
                self.adhoc_timer = 0;
                emitted = Some(self.draw(rng));
                self.last_channel = Some(SpawnChannel::AdHoc);
            }
        }

        if let Some(request) = &emitted {
            if request.boss {
                tracing::info!(
                    archetype = ?request.archetype,
                    level = request.level,
                    channel = ?self.last_channel,
                    "boss spawn requested"
                );
            }
        }
        emitted
    }

    /// One weighted-random request at the current difficulty. The boss roll
    /// comes first and replaces the base draw on success.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> ArchetypeRequest {
        let difficulty = self.difficulty();
        if rng.gen_bool(boss_chance(difficulty)) {
            let archetype = weights::boss_table(difficulty).pick(rng);
            return self.request(archetype, true);
        }
        let archetype = weights::base_table(difficulty).pick(rng);
        self.request(archetype, false)
    }

    fn request(&self, archetype: Archetype, boss: bool) -> ArchetypeRequest {
        ArchetypeRequest {
            archetype,
            level: self.difficulty(),
            boss,
        }
    }

    /// `max(1, current_wave)`
    pub fn difficulty(&self) -> u32 {
        self.current_wave.max(1)
    }

    pub fn current_wave(&self) -> u32 {
        self.current_wave
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_queue_drained(&self) -> bool {
        self.queue.is_empty()
    }

    /// Remaining queue in spawn order
    pub fn queued(&self) -> impl Iterator<Item = &QueuedSpawn> {
        self.queue.iter()
    }

    pub fn infinite_mode(&self) -> bool {
        self.settings.infinite_mode
    }

    pub fn set_infinite_mode(&mut self, enabled: bool) {
        self.settings.infinite_mode = enabled;
    }

    pub fn settings(&self) -> &DirectorSettings {
        &self.settings
    }

    pub fn last_channel(&self) -> Option<SpawnChannel> {
        self.last_channel
    }
}

impl Default for SpawnDirector {
    fn default() -> Self {
        Self::new(DirectorSettings::default())
    }
}
