//! Slam attacks
//!
//! Both attacks follow the same sequence: pass the cooldown gate, jump, then
//! (after `resolve_delay`) chip every obstacle within the damage radius and
//! throw a ring of debris. Damage is queued as a [`Command`] so it resolves
//! on a later frame, the way a delayed engine callback would.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use super::events::{Command, GameEvent};
use super::state::{AttackKind, AttackState, GameState, Particle};
use super::tween::Tween;
use crate::tuning::ParticleBurst;

impl AttackState {
    /// Would a trigger at `now` be accepted?
    pub fn can_trigger(&self, now: f32) -> bool {
        !self.in_progress && !self.cooling_down(now)
    }

    /// Gate and arm the attack. Rejected triggers leave the state untouched.
    pub fn try_trigger(&mut self, now: f32) -> bool {
        if !self.can_trigger(now) {
            return false;
        }
        self.in_progress = true;
        self.last_trigger = Some(now);
        true
    }
}

/// Try to fire an attack from the player's current position
///
/// Returns false (and changes nothing) when the cooldown gate rejects it.
pub fn trigger_attack(state: &mut GameState, kind: AttackKind) -> bool {
    let now = state.time;
    let attack = state.attack_mut(kind);
    if !attack.try_trigger(now) {
        return false;
    }
    let spec = attack.spec.clone();

    let origin = state.player.position;
    state.player.jump = Some(Tween::new(
        origin.y,
        origin.y + spec.jump_height,
        now,
        spec.jump_duration,
        spec.jump_easing,
    ));

    state.commands.schedule(
        now + spec.resolve_delay,
        Command::ApplyAreaDamage {
            attack: kind,
            origin,
            radius: spec.damage_radius,
            damage: spec.damage,
        },
    );

    log::debug!("{} triggered at t={:.2}", kind.name(), now);
    state.push_event(GameEvent::AttackStarted { attack: kind, at: now });
    true
}

/// Apply a queued area-damage command
pub fn resolve_area_damage(
    state: &mut GameState,
    kind: AttackKind,
    origin: Vec3,
    radius: f32,
    damage: f32,
) {
    let attack = state.attack_mut(kind);
    attack.in_progress = false;
    let land = attack.spec.land_on_resolve;
    let burst = attack.spec.burst.clone();

    if land {
        state.player.position.y = origin.y;
        state.player.jump = None;
    }

    // Queued damage cannot be cancelled, so it checks the match itself
    if !state.match_state.is_active() {
        log::debug!("{} resolved after game over, dropping damage", kind.name());
        state.push_event(GameEvent::AttackDiscarded { attack: kind });
        return;
    }

    let mut hits = 0u32;
    let mut destroyed = Vec::new();
    for obstacle in &mut state.obstacles {
        if obstacle.position.distance(origin) < radius {
            obstacle.scale -= damage;
            hits += 1;
            if obstacle.is_destroyed() {
                destroyed.push(obstacle.id);
            }
        }
    }

    let points = state.tuning.kill_score;
    let mut kills = 0u32;
    for id in destroyed {
        // Only the removal that actually finds the obstacle scores
        if state.remove_obstacle(id).is_some() && state.match_state.award(points) {
            kills += 1;
            state.push_event(GameEvent::ObstacleDestroyed { id, points });
        }
    }

    log::debug!(
        "{} landed: {} hits, {} kills, score {}",
        kind.name(),
        hits,
        kills,
        state.match_state.score
    );

    let at = state.player.position;
    spawn_burst(state, &burst, at);
    state.push_event(GameEvent::ParticleBurst {
        attack: kind,
        origin: at,
        count: burst.count,
    });
    state.push_event(GameEvent::AttackResolved {
        attack: kind,
        hits,
        kills,
    });
}

/// Radial debris ring at `at`
pub fn spawn_burst(state: &mut GameState, burst: &ParticleBurst, at: Vec3) {
    let mut rng = state.rng_state.next_rng();
    let now = state.time;
    for _ in 0..burst.count {
        let angle = rng.random_range(0.0..TAU);
        state.particles.push(Particle {
            origin: at,
            direction: Vec3::new(angle.cos(), 0.0, angle.sin()),
            travel: burst.travel,
            travel_duration: burst.travel_duration,
            shrink_delay: burst.shrink_delay,
            shrink_duration: burst.shrink_duration,
            spawned_at: now,
            lifetime: burst.lifetime,
            color: burst.color,
        });
    }
}

/// Drop particles whose lifetime has run out
pub fn expire_particles(state: &mut GameState) {
    let now = state.time;
    state.particles.retain(|p| !p.expired(now));
}
