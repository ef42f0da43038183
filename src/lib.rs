//! Cube Arena - a cube-in-a-cube arena brawler
//!
//! Core modules:
//! - `sim`: Deterministic simulation (locomotion, face transitions, attacks, match timer)
//! - `tuning`: Data-driven game balance
//! - `ui`: HUD view model derived from game state
//! - `audio`: Sound cues (Web Audio backend on wasm32)
//!
//! Rendering, collision meshes and the main loop belong to the host engine;
//! this crate is driven once per frame through [`sim::tick`].

pub mod audio;
pub mod sim;
pub mod tuning;
pub mod ui;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use tuning::{Tuning, TuningError};
pub use ui::Hud;

use glam::Vec3;
use rand::Rng;

/// Game configuration constants
pub mod consts {
    /// Nominal frame timestep used by the native runner (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Largest dt accepted by a single tick (hitches are clamped)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Player cube half extent (unit cube)
    pub const PLAYER_HALF_EXTENT: f32 = 0.5;
    /// Below this height the player has fallen out of the arena
    pub const FALL_OFF_Y: f32 = -10.0;
    /// Respawn height above the shell's top face
    pub const RESPAWN_LIFT: f32 = 1.0;

    /// Obstacles float just above the top face
    pub const OBSTACLE_LIFT: f32 = 0.5;
    /// Extra slack past the shell edge before an obstacle is hard-reset
    pub const OBSTACLE_RESET_MARGIN: f32 = 0.5;

    /// Noise sampling: index stride, time scale and per-axis offsets
    pub const NOISE_INDEX_STRIDE: f32 = 0.5;
    pub const NOISE_TIME_SCALE: f32 = 0.2;
    pub const NOISE_Z_OFFSET: f32 = 100.0;
    pub const NOISE_SCALE_OFFSET: f32 = 200.0;

    /// Particle quad starting scale
    pub const PARTICLE_SCALE: f32 = 0.2;
}

/// Linear interpolation between two scalars
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Linear interpolation between two points
#[inline]
pub fn lerp_vec3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a + (b - a) * t
}

/// Random horizontal unit vector (y = 0)
///
/// Components are drawn from [-1, 1) and normalized; a degenerate draw falls
/// back to +X so the result is always unit length.
pub fn random_flat_direction<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let dir = Vec3::new(rng.random_range(-1.0..1.0), 0.0, rng.random_range(-1.0..1.0));
    dir.try_normalize().unwrap_or(Vec3::X)
}
