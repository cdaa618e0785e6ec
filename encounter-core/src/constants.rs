//! Centralized encounter constants.
//!
//! Every duration is a tick count at the nominal rate (`NOMINAL_TICK_RATE`).
//! Runtime code converts them through `TickRate` before use, so a host running
//! at a different fixed rate keeps the same wall-clock pacing.
//! Per-archetype numbers (stats, special attacks, spawn weights) live in their
//! respective tables as the single source of truth.

// =====================================================
// Timing
// =====================================================

/// Tick rate every constant in this file is expressed at
pub const NOMINAL_TICK_RATE: u32 = 60;

// =====================================================
// Agent abilities
// =====================================================

/// Shared ability cooldown, reset by every activation
pub const ABILITY_COOLDOWN_TICKS: u32 = 300;

/// Teleport's own cooldown on top of the shared one
pub const TELEPORT_COOLDOWN_TICKS: u32 = 180;

/// Summon's own cooldown on top of the shared one
pub const SUMMON_COOLDOWN_TICKS: u32 = 300;

/// Length of the invisibility window
pub const INVISIBILITY_TICKS: u32 = 180;

/// Maximum teleport distance from the target
pub const TELEPORT_DISTANCE: f32 = 200.0;

/// Minimum teleport distance from the target
pub const TELEPORT_MIN_DISTANCE: f32 = 100.0;

/// Fraction of max health restored by Heal
pub const HEAL_FRACTION: f32 = 0.1;

/// Summon is refused once the peer snapshot holds this many agents
pub const SUMMON_PEER_LIMIT: usize = 10;

/// Summoned minions appear this far from the summoner
pub const SUMMON_MIN_OFFSET: f32 = 50.0;
pub const SUMMON_MAX_OFFSET: f32 = 100.0;

// =====================================================
// Movement
// =====================================================

/// Wander picks a fresh heading this often
pub const WANDER_REDIRECT_TICKS: u32 = 120;

/// A patrol waypoint counts as reached inside this radius
pub const PATROL_ARRIVAL_RADIUS: f32 = 10.0;

/// Ranged agents hold `attack_range * RANGED_IDEAL_FRACTION` +/- this band
pub const RANGED_BAND: f32 = 20.0;
pub const RANGED_IDEAL_FRACTION: f32 = 0.8;

/// Peers closer than this count toward the swarm bonus
pub const SWARM_RADIUS: f32 = 150.0;

/// Bonus per nearby peer
pub const SWARM_BONUS_PER_PEER: f32 = 0.1;

// =====================================================
// Berserker
// =====================================================

/// Health fraction below which the berserker bonus engages
pub const BERSERKER_THRESHOLD: f32 = 0.3;
pub const BERSERKER_DAMAGE_MULT: f32 = 1.5;
pub const BERSERKER_SPEED_MULT: f32 = 1.3;

// =====================================================
// Scaling
// =====================================================

/// Per-level stat growth: factor = 1 + LEVEL_STEP * (level - 1)
pub const LEVEL_STEP: f32 = 0.2;

pub const BOSS_HEALTH_MULT: f32 = 2.0;
pub const BOSS_DAMAGE_MULT: f32 = 1.5;
pub const BOSS_SCORE_MULT: u32 = 3;
pub const BOSS_FOOTPRINT_MULT: f32 = 1.5;

// =====================================================
// Boss phases
// =====================================================

pub const MAX_BOSS_PHASE: u8 = 3;
pub const DEFAULT_PHASE_THRESHOLDS: [f32; 3] = [0.7, 0.4, 0.1];

/// Transition lock length (no movement, no attacks)
pub const PHASE_LOCK_TICKS: u32 = 120;

/// Fraction of max health restored when a phase begins
pub const PHASE_HEAL_FRACTION: f32 = 0.1;

/// Permanent multipliers applied when a transition lock expires
pub const PHASE_DAMAGE_MULT: f32 = 1.2;
pub const PHASE_SPEED_MULT: f32 = 1.1;

/// Life Drain heals this fraction of its declared damage
pub const LIFE_DRAIN_FRACTION: f32 = 0.5;

// =====================================================
// Visual markers (opaque to the core, read by renderers)
// =====================================================

pub const HEAL_MARKER_TICKS: u32 = 60;
pub const TELEPORT_MARKER_TICKS: u32 = 30;
pub const INVISIBLE_MARKER_TICKS: u32 = 30;
pub const ELEMENTAL_MARKER_TICKS: u32 = 30;
pub const SPECIAL_MARKER_TICKS: u32 = 60;

// =====================================================
// Spawn director
// =====================================================

/// Queue channel cadence
pub const QUEUE_CADENCE_TICKS: u32 = 45;

/// Ad-hoc (infinite mode) channel cadence
pub const ADHOC_CADENCE_TICKS: u32 = 120;

/// Number of scripted waves before synthesis takes over
pub const AUTHORED_WAVE_COUNT: u32 = 5;

/// Boss roll: min(BOSS_CHANCE_BASE + (d - 1) * BOSS_CHANCE_STEP, BOSS_CHANCE_CAP)
pub const BOSS_CHANCE_BASE: f64 = 0.05;
pub const BOSS_CHANCE_STEP: f64 = 0.005;
pub const BOSS_CHANCE_CAP: f64 = 0.15;

/// Wave size: WAVE_BASE_COUNT + WAVE_COUNT_STEP * (wave - 1)
pub const WAVE_BASE_COUNT: u32 = 10;
pub const WAVE_COUNT_STEP: u32 = 2;

// =====================================================
// Reference host placement
// =====================================================

pub const PLACEMENT_MIN_DISTANCE: f32 = 300.0;
pub const PLACEMENT_MAX_DISTANCE: f32 = 600.0;
pub const PLACEMENT_MAX_ATTEMPTS: u32 = 50;
