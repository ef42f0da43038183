//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Simulation clock only (no wall-clock reads)
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod attack;
pub mod events;
pub mod face;
pub mod noise;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod tween;

pub use attack::{resolve_area_damage, trigger_attack};
pub use events::{Command, CommandQueue, CrossAxis, GameEvent};
pub use noise::CoherentNoise;
pub use spawn::generate_obstacles;
pub use state::{
    AttackKind, AttackState, Fade, GameState, MatchPhase, MatchState, Obstacle, ObstacleKind,
    Particle, Player, Shell, UltimateGauge,
};
pub use tick::{TickInput, tick};
pub use tween::{Easing, Tween};
