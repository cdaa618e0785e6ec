//! Edge case & boundary tests
//!
//! Tests behavior at system boundaries:
//! - Impassable terrain during movement and placement, never a panic
//! - Unknown archetypes and malformed content → typed errors
//! - Out-of-range inputs (level 0, wave 0, NaN damage, zero weights)
//! - Dead agents and exhausted gates (summon limit, teleport cooldown)
//! - Non-nominal tick rates

use bevy::math::Vec2;

use encounter_core::agent::{Agent, AgentSpec};
use encounter_core::archetype::{Ability, Archetype, ArchetypeCatalog};
use encounter_core::director::{waves, ArchetypeRequest, SpawnDirector, WeightTable};
use encounter_core::terrain::{BoundedArena, OpenField, Passability};
use encounter_core::timing::{seeded_rng, TickRate};
use encounter_core::{Encounter, EncounterConfig, EncounterError};

// ============================================================
// Helpers
// ============================================================

fn spec(archetype: Archetype, level: u32, position: Vec2) -> AgentSpec {
    AgentSpec {
        archetype,
        level,
        position,
    }
}

fn spawn_at(archetype: Archetype, position: Vec2) -> Agent {
    Agent::new(
        1,
        &spec(archetype, 1, position),
        &ArchetypeCatalog::standard(),
        TickRate::NOMINAL,
        &mut seeded_rng(1),
    )
    .unwrap()
}

// ============================================================
// 1. Terrain
// ============================================================

#[test]
fn blocked_step_is_reverted() {
    let mut skeleton = spawn_at(Archetype::Skeleton, Vec2::new(9.0, 0.0));
    let wall = |p: Vec2| p.x < 10.0;
    skeleton.update(Vec2::new(200.0, 0.0), &wall, &[], &mut seeded_rng(2));
    assert_eq!(
        skeleton.position(),
        Vec2::new(9.0, 0.0),
        "a step into impassable terrain must be undone"
    );
}

#[test]
fn agent_leaves_arena_edge_only_inward() {
    let arena = BoundedArena::centered(100.0);
    let mut goblin = spawn_at(Archetype::Goblin, Vec2::new(99.0, 0.0));
    let mut rng = seeded_rng(3);
    for _ in 0..200 {
        goblin.update(Vec2::new(400.0, 0.0), &arena, &[], &mut rng);
        assert!(arena.is_passable(goblin.position()));
    }
}

#[test]
fn placement_on_solid_map_still_spawns() {
    let mut encounter = Encounter::new(EncounterConfig::default()).unwrap();
    let solid = |_: Vec2| false;
    let mut spawned = Vec::new();
    for _ in 0..45 {
        spawned.extend(encounter.tick(Vec2::ZERO, &solid).spawned);
    }
    assert_eq!(spawned.len(), 1, "placement exhausts attempts then places anyway");
    let agent = encounter.agent(spawned[0]).unwrap();
    let distance = agent.position().length();
    assert!((299.0..=601.0).contains(&distance), "{distance}");
}

#[test]
fn shadow_strike_never_lands_on_blocked_ground() {
    let home = Vec2::new(40.0, 0.0);
    let mut demon_lord = spawn_at(Archetype::DemonLord, home);
    assert!(demon_lord.is_boss());
    let mut rng = seeded_rng(12);

    // Phase 2 lock runs out, granting Teleport
    demon_lord.take_damage(demon_lord.max_health() * 0.35);
    for _ in 0..120 {
        demon_lord.update(Vec2::new(4000.0, 0.0), &OpenField, &[], &mut rng);
    }
    assert_eq!(demon_lord.phase(), Some(2));
    assert!(!demon_lord.boss().unwrap().is_transitioning());

    let only_home = |p: Vec2| p.distance(home) < 1.0;
    let target = home + Vec2::new(50.0, 0.0);
    let outcome = demon_lord.update(target, &only_home, &[], &mut rng);

    let cast = outcome.special_attack.expect("shadow strike in range");
    assert_eq!(cast.name, "Shadow Strike");
    assert_eq!(demon_lord.position(), home, "blocked landing must be undone");
    assert_eq!(cast.origin, home);
    assert!(only_home.is_passable(demon_lord.position()));
}

// ============================================================
// 2. Content errors
// ============================================================

#[test]
fn unknown_archetype_is_error() {
    let result = Agent::new(
        1,
        &spec(Archetype::Lich, 1, Vec2::ZERO),
        &ArchetypeCatalog::empty(),
        TickRate::NOMINAL,
        &mut seeded_rng(1),
    );
    assert!(matches!(
        result,
        Err(EncounterError::UnknownArchetype(Archetype::Lich))
    ));
}

#[test]
fn spawn_at_level_zero_uses_level_one() {
    let mut encounter = Encounter::new(EncounterConfig::default()).unwrap();
    let catalog_has_all = Archetype::ALL
        .iter()
        .all(|a| encounter.catalog().contains(*a));
    assert!(catalog_has_all);

    let request = ArchetypeRequest {
        archetype: Archetype::Vampire,
        level: 0,
        boss: false,
    };
    let id = encounter.spawn(&request, Vec2::ZERO).unwrap();
    assert_eq!(encounter.agent(id).unwrap().level(), 1, "level 0 is treated as 1");
}

#[test]
fn malformed_catalog_ron_is_error() {
    let result = ArchetypeCatalog::standard().overlay_ron("{ Goblin: (max_health: ");
    assert!(matches!(result, Err(EncounterError::Ron(_))));
}

#[test]
fn invalid_record_is_rejected() {
    let text = "{ Orc: (max_health: -5.0, damage: 7.0, speed: 1.4, attack_range: 60.0, \
                attack_cooldown: 90, score_value: 25, footprint: 64.0, behavior: Aggressive) }";
    let result = ArchetypeCatalog::standard().overlay_ron(text);
    assert!(matches!(
        result,
        Err(EncounterError::InvalidArchetype {
            archetype: Archetype::Orc,
            ..
        })
    ));
}

#[test]
fn bad_thresholds_are_error() {
    let agent = spawn_at(Archetype::Dragon, Vec2::ZERO);
    let cases: [&[f32]; 4] = [&[0.4, 0.7], &[0.5, 0.5], &[1.5], &[]];
    for thresholds in cases {
        let result = agent.clone().with_phase_thresholds(thresholds);
        assert!(
            matches!(result, Err(EncounterError::NonDescendingThresholds(_))),
            "{thresholds:?} accepted"
        );
    }
}

#[test]
fn thresholds_ignored_for_regular_agents() {
    let agent = spawn_at(Archetype::Goblin, Vec2::ZERO)
        .with_phase_thresholds(&[0.5])
        .unwrap();
    assert!(agent.boss().is_none());
}

#[test]
fn zero_weight_table_is_error() {
    let result = WeightTable::new(vec![(Archetype::Goblin, 0), (Archetype::Orc, 0)]);
    assert!(matches!(result, Err(EncounterError::EmptyWeightTable(_))));
}

// ============================================================
// 3. Damage boundaries
// ============================================================

#[test]
fn non_finite_damage_is_ignored() {
    let mut orc = spawn_at(Archetype::Orc, Vec2::ZERO);
    assert!(!orc.take_damage(f32::NAN));
    assert!(!orc.take_damage(f32::INFINITY));
    assert!(!orc.take_damage(-30.0));
    assert_eq!(orc.health(), orc.max_health());
    assert!(orc.was_attacked(), "a zero hit still counts as being attacked");
}

#[test]
fn overkill_clamps_and_kills_once() {
    let mut orc = spawn_at(Archetype::Orc, Vec2::ZERO);
    assert!(orc.take_damage(10_000.0));
    assert_eq!(orc.health(), 0.0);
    assert!(!orc.take_damage(10.0), "already dead");
    assert!(!orc.is_alive());
}

#[test]
fn damage_to_unknown_id_is_noop() {
    let mut encounter = Encounter::new(EncounterConfig::default()).unwrap();
    assert!(!encounter.damage_agent(999, 50.0));
}

// ============================================================
// 4. Gates
// ============================================================

#[test]
fn summon_refused_at_peer_limit() {
    let mut lich = spawn_at(Archetype::Lich, Vec2::ZERO);
    let peers: Vec<_> = (0..10)
        .map(|i| spawn_at(Archetype::Goblin, Vec2::new(i as f32, 0.0)).peer_view())
        .collect();
    let spawned = lich.activate_ability(Ability::Summon, Vec2::ZERO, &peers, &mut seeded_rng(4));
    assert!(spawned.is_empty());
    assert_eq!(lich.cooldowns().ability, 300, "the attempt still costs the cooldown");
    assert_eq!(lich.cooldowns().summon, 0);
}

#[test]
fn summon_level_floors_at_one() {
    let mut lich = spawn_at(Archetype::Lich, Vec2::ZERO);
    let spawned = lich.activate_ability(Ability::Summon, Vec2::ZERO, &[], &mut seeded_rng(5));
    assert!(!spawned.is_empty());
    assert!(spawned.iter().all(|r| r.level == 1));
}

#[test]
fn teleport_respects_its_own_cooldown() {
    let mut wraith = spawn_at(Archetype::Wraith, Vec2::new(800.0, 0.0));
    let mut rng = seeded_rng(6);
    wraith.activate_ability(Ability::Teleport, Vec2::ZERO, &[], &mut rng);
    let landed = wraith.position();
    let distance = landed.length();
    assert!((99.9..=200.1).contains(&distance), "{distance}");
    assert_eq!(wraith.cooldowns().teleport, 180);

    wraith.activate_ability(Ability::Teleport, Vec2::new(-900.0, 0.0), &[], &mut rng);
    assert_eq!(wraith.position(), landed, "teleport still cooling down");
}

#[test]
fn short_teleport_distance_clamps_to_minimum() {
    let mut wraith = spawn_at(Archetype::Wraith, Vec2::new(800.0, 0.0)).with_teleport_distance(20.0);
    wraith.activate_ability(Ability::Teleport, Vec2::ZERO, &[], &mut seeded_rng(7));
    assert!((wraith.position().length() - 100.0).abs() < 1e-3);
}

// ============================================================
// 5. Director boundaries
// ============================================================

#[test]
fn wave_zero_uses_fallback() {
    let mut director = SpawnDirector::default();
    let mut rng = seeded_rng(8);
    director.start_wave(0, &mut rng);
    assert_eq!(director.difficulty(), 1);
    assert_eq!(director.queue_len(), waves::fallback_wave().total());
}

#[test]
fn empty_queue_without_infinite_mode_is_silent() {
    let mut director = SpawnDirector::default();
    director.set_infinite_mode(false);
    let mut rng = seeded_rng(9);
    assert!((0..1_000).all(|_| director.update(&mut rng).is_none()));
}

// ============================================================
// 6. Tick rates
// ============================================================

#[test]
fn double_rate_halves_step_and_doubles_cooldown() {
    let catalog = ArchetypeCatalog::standard();
    let fast = TickRate::new(120);
    let mut skeleton = Agent::new(
        1,
        &spec(Archetype::Skeleton, 1, Vec2::ZERO),
        &catalog,
        fast,
        &mut seeded_rng(10),
    )
    .unwrap();
    skeleton.update(Vec2::new(30.0, 0.0), &OpenField, &[], &mut seeded_rng(11));
    assert!((skeleton.position().x - 0.8).abs() < 1e-5);
    assert!(skeleton.is_attacking());
    assert_eq!(skeleton.cooldowns().attack, 150);
}
