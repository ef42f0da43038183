//! Obstacle spawning and roaming
//!
//! Batches are scattered over the top face with coherent noise sampled at
//! `(index * 0.5, time * 0.2)`. Each frame obstacles roam twice: a soft pass
//! that bounces off the shell edge, then a hard pass that teleports strays
//! back inside.

use glam::Vec3;
use rand::Rng;

use super::events::GameEvent;
use super::noise::CoherentNoise;
use super::state::{GameState, Obstacle, ObstacleKind};
use crate::consts::*;
use crate::random_flat_direction;

/// Noise-derived spot on the top face for a given batch index
pub fn noise_position(noise: &CoherentNoise, seed: u32, now: f32, half: f32) -> Vec3 {
    let nx = seed as f32 * NOISE_INDEX_STRIDE;
    let nt = now * NOISE_TIME_SCALE;
    Vec3::new(
        noise.sample(nx, nt) * half,
        half + OBSTACLE_LIFT,
        noise.sample(nx + NOISE_Z_OFFSET, nt) * half,
    )
}

/// Clear the obstacle batch and spawn a fresh one
pub fn generate_obstacles(state: &mut GameState) {
    state.obstacles.clear();

    let mut rng = state.rng_state.next_rng();
    let tuning = &state.tuning;
    let count = rng.random_range(tuning.obstacles_min..=tuning.obstacles_max);
    let half = state.shell.half_extent();
    let now = state.time;
    let fade_in_start = now + tuning.obstacle_fade_in_delay;
    let (min_scale, spread) = (tuning.obstacle_min_scale, tuning.obstacle_scale_spread);

    let mut batch = Vec::with_capacity(count as usize);
    for i in 0..count {
        let scale_noise = state.noise.sample(
            i as f32 * NOISE_INDEX_STRIDE + NOISE_SCALE_OFFSET,
            now * NOISE_TIME_SCALE,
        );
        let kind = ObstacleKind::ALL[rng.random_range(0..ObstacleKind::ALL.len())];
        let color = [rng.random(), rng.random(), rng.random()];

        batch.push(Obstacle {
            id: 0,
            seed: i,
            kind,
            color,
            position: noise_position(&state.noise, i, now, half),
            direction: random_flat_direction(&mut rng),
            scale: scale_noise.abs() * spread + min_scale,
            fade_in_start,
            alpha: 0.0,
        });
    }

    for obstacle in &mut batch {
        obstacle.id = state.next_entity_id();
    }
    state.obstacles = batch;

    log::info!("Spawned {} obstacles at t={:.2}", count, now);
    state.push_event(GameEvent::ObstaclesRegenerated {
        count: count as usize,
    });
}

/// Teleport an obstacle back onto the top face with a new heading
pub fn reset_obstacle_position<R: Rng + ?Sized>(
    obstacle: &mut Obstacle,
    noise: &CoherentNoise,
    rng: &mut R,
    now: f32,
    half: f32,
) {
    obstacle.position = noise_position(noise, obstacle.seed, now, half);
    obstacle.direction = random_flat_direction(rng);
}

/// Per-frame obstacle movement and fade-in
pub fn roam_obstacles(state: &mut GameState, dt: f32) {
    let half = state.shell.half_extent();
    let step = state.tuning.obstacle_speed * dt;
    let now = state.time;
    let fade_duration = state.tuning.obstacle_fade_in_duration;

    // Soft pass: bounce off the edges
    for obstacle in &mut state.obstacles {
        obstacle.position += obstacle.direction * step;
        if obstacle.position.x.abs() > half {
            obstacle.direction.x *= -1.0;
        }
        if obstacle.position.z.abs() > half {
            obstacle.direction.z *= -1.0;
        }
    }

    for obstacle in &mut state.obstacles {
        obstacle.update_fade(now, fade_duration);
    }

    // Hard pass: strays past the padded bound are respawned via noise
    let bound = half + OBSTACLE_RESET_MARGIN;
    let mut rng = None;
    for obstacle in &mut state.obstacles {
        obstacle.position += obstacle.direction * step;
        if obstacle.position.x.abs() > bound || obstacle.position.z.abs() > bound {
            let rng = rng.get_or_insert_with(|| state.rng_state.next_rng());
            reset_obstacle_position(obstacle, &state.noise, rng, now, half);
        }
    }
}
