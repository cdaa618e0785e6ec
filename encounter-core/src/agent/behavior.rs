//! Movement policies.
//!
//! The policy is a stateless function of the behavior tag; the only memory
//! is what the agent already carries (wander timer, patrol index,
//! invisibility, `was_attacked`). Bosses always chase.

use bevy::prelude::*;
use rand::Rng;

use super::{Agent, PeerView};
use crate::archetype::{Ability, Behavior};
use crate::constants::{
    PATROL_ARRIVAL_RADIUS, RANGED_BAND, RANGED_IDEAL_FRACTION, SWARM_BONUS_PER_PEER,
    SWARM_RADIUS, WANDER_REDIRECT_TICKS,
};

/// Movement policy selected for a behavior tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    Chase,
    Wander,
    KeepDistance,
    Patrol,
    Ambush,
    Swarm,
}

impl Policy {
    pub fn select(behavior: Behavior, is_boss: bool, was_attacked: bool) -> Self {
        if is_boss {
            return Policy::Chase;
        }
        match behavior {
            Behavior::Aggressive => Policy::Chase,
            Behavior::Defensive if was_attacked => Policy::Chase,
            Behavior::Ranged => Policy::KeepDistance,
            Behavior::Patrol => Policy::Patrol,
            Behavior::Ambush => Policy::Ambush,
            Behavior::Swarm => Policy::Swarm,
            Behavior::Defensive | Behavior::Berserker => Policy::Wander,
        }
    }
}

pub(crate) fn steer<R: Rng + ?Sized>(
    agent: &mut Agent,
    target: Vec2,
    peers: &[PeerView],
    rng: &mut R,
) {
    match Policy::select(agent.stats.behavior, agent.is_boss(), agent.was_attacked) {
        Policy::Chase => chase(agent, target, rng),
        Policy::Wander => wander(agent, rng),
        Policy::KeepDistance => keep_distance(agent, target),
        Policy::Patrol => patrol(agent, rng),
        Policy::Ambush => ambush(agent, target, peers, rng),
        Policy::Swarm => {
            agent.swarm_bonus = swarm_bonus(agent, peers);
            chase(agent, target, rng);
        }
    }
}

/// Count live peers (excluding self) within the swarm radius
pub fn nearby_peers(id: super::AgentId, position: Vec2, peers: &[PeerView]) -> usize {
    peers
        .iter()
        .filter(|p| p.id != id && p.alive && p.position.distance(position) < SWARM_RADIUS)
        .count()
}

fn swarm_bonus(agent: &Agent, peers: &[PeerView]) -> f32 {
    nearby_peers(agent.id, agent.position, peers) as f32 * SWARM_BONUS_PER_PEER
}

fn chase<R: Rng + ?Sized>(agent: &mut Agent, target: Vec2, rng: &mut R) {
    let offset = target - agent.position;
    let distance = offset.length();
    if distance > 0.0 {
        agent.direction = offset / distance;
        let step = agent.direction * agent.step_length();
        agent.position += step;
    } else {
        // Standing on the target; no defined heading
        agent.redirect(rng);
    }
}

fn wander<R: Rng + ?Sized>(agent: &mut Agent, rng: &mut R) {
    agent.wander_timer += 1;
    if agent.wander_timer >= agent.rate.ticks(WANDER_REDIRECT_TICKS) {
        agent.wander_timer = 0;
        agent.redirect(rng);
    }
    let step = agent.direction * agent.step_length();
    agent.position += step;
}

fn keep_distance(agent: &mut Agent, target: Vec2) {
    let ideal = agent.stats.attack_range * RANGED_IDEAL_FRACTION;
    let offset = target - agent.position;
    let distance = offset.length();
    let toward = offset.normalize_or_zero();

    agent.direction = if distance < ideal - RANGED_BAND {
        -toward
    } else if distance > ideal + RANGED_BAND {
        toward
    } else {
        Vec2::ZERO
    };
    let step = agent.direction * agent.step_length();
    agent.position += step;
}

fn patrol<R: Rng + ?Sized>(agent: &mut Agent, rng: &mut R) {
    let Some(route) = agent.patrol.as_mut().filter(|r| !r.waypoints.is_empty()) else {
        wander(agent, rng);
        return;
    };
    let waypoint = route.waypoints[route.next % route.waypoints.len()];
    let offset = waypoint - agent.position;
    if offset.length() < PATROL_ARRIVAL_RADIUS {
        route.next = (route.next + 1) % route.waypoints.len();
        return;
    }
    agent.direction = offset.normalize_or_zero();
    let step = agent.direction * agent.step_length();
    agent.position += step;
}

fn ambush<R: Rng + ?Sized>(agent: &mut Agent, target: Vec2, peers: &[PeerView], rng: &mut R) {
    let in_range = agent.is_target_in_range(target);
    if in_range {
        if agent.is_invisible() {
            agent.invisible_ticks = 0;
        }
        chase(agent, target, rng);
        return;
    }

    if !agent.is_invisible() && agent.cooldowns.ability == 0 {
        agent.activate_ability(Ability::Invisible, target, peers, rng);
    }
    if !agent.is_invisible() {
        wander(agent, rng);
    }
}
