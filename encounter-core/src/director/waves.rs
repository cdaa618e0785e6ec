//! Wave composition: the authored table and synthesized infinite waves.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::archetype::Archetype;
use crate::constants::{AUTHORED_WAVE_COUNT, WAVE_BASE_COUNT, WAVE_COUNT_STEP};

/// One queued spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedSpawn {
    pub archetype: Archetype,
    /// Came from the boss slot
    pub boss: bool,
}

/// Counts per archetype plus an optional boss slot appended last.
/// The slot only fixes queue order; it does not promote the archetype.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveSpec {
    pub entries: Vec<(Archetype, u32)>,
    pub boss_slot: Option<Archetype>,
}

impl WaveSpec {
    /// Number of queued spawns, boss slot included
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, n)| *n as usize).sum::<usize>()
            + usize::from(self.boss_slot.is_some())
    }

    /// Expand into a shuffled queue; the boss slot always comes last
    pub fn build_queue<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<QueuedSpawn> {
        let mut queue: Vec<QueuedSpawn> = self
            .entries
            .iter()
            .flat_map(|(archetype, count)| {
                std::iter::repeat(QueuedSpawn {
                    archetype: *archetype,
                    boss: false,
                })
                .take(*count as usize)
            })
            .collect();
        queue.shuffle(rng);
        if let Some(archetype) = self.boss_slot {
            queue.push(QueuedSpawn {
                archetype,
                boss: true,
            });
        }
        queue
    }
}

/// Nominal wave size: `10 + 2 * (index - 1)`, saturating at `u32::MAX`
pub fn wave_count(index: u32) -> u32 {
    WAVE_COUNT_STEP
        .saturating_mul(index.max(1) - 1)
        .saturating_add(WAVE_BASE_COUNT)
}

/// Scripted waves 1..=5
pub fn authored_wave(index: u32) -> Option<WaveSpec> {
    use Archetype::*;
    let (entries, boss_slot) = match index {
        1 => (vec![(Goblin, 5), (Skeleton, 2)], None),
        2 => (vec![(Goblin, 8), (Skeleton, 5), (Orc, 1)], None),
        3 => (vec![(Goblin, 6), (Skeleton, 8), (Orc, 3)], Some(Demon)),
        4 => (vec![(Skeleton, 10), (Orc, 6), (Demon, 2)], None),
        5 => (vec![(Orc, 8), (Demon, 5)], Some(Dragon)),
        _ => return None,
    };
    Some(WaveSpec { entries, boss_slot })
}

/// Used for unscripted indices when waves are not synthesized
pub fn fallback_wave() -> WaveSpec {
    WaveSpec {
        entries: vec![(Archetype::Goblin, 5), (Archetype::Skeleton, 5)],
        boss_slot: None,
    }
}

/// Wave past the authored table. `authored` is how many scripted waves
/// precede it.
pub fn synthesized_wave(index: u32, authored: u32) -> WaveSpec {
    use Archetype::*;
    let authored = authored.min(AUTHORED_WAVE_COUNT);
    let s = (index + 1).saturating_sub(authored).max(1);
    let n = wave_count(index);

    let entries = if s <= 3 {
        vec![(Goblin, n / 2), (Skeleton, n / 3), (Orc, s)]
    } else if s <= 6 {
        vec![(Goblin, n / 4), (Skeleton, n / 3), (Orc, n / 3), (Demon, s - 2)]
    } else {
        vec![(Goblin, n / 5), (Skeleton, n / 4), (Orc, n / 3), (Demon, s - 1)]
    };

    let boss_slot = if s % 10 == 0 {
        Some(Dragon)
    } else if s % 5 == 0 {
        Some(Demon)
    } else {
        None
    };
    WaveSpec { entries, boss_slot }
}

/// Composition for `index`
pub fn wave_for(index: u32, authored: u32, infinite: bool) -> WaveSpec {
    let authored = authored.min(AUTHORED_WAVE_COUNT);
    if (1..=authored).contains(&index) {
        if let Some(spec) = authored_wave(index) {
            return spec;
        }
    }
    if infinite && index > authored {
        synthesized_wave(index, authored)
    } else {
        fallback_wave()
    }
}
