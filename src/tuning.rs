//! Data-driven game balance
//!
//! Every gameplay constant lives here so a host can rebalance the arena from
//! a JSON file without recompiling. Missing fields fall back to defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::tween::Easing;

/// Errors raised while loading or validating tuning data
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid tuning value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Cosmetic radial burst spawned when an attack lands
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParticleBurst {
    /// Number of quads in the burst
    pub count: u32,
    /// RGB tint
    pub color: [f32; 3],
    /// Outward travel distance
    pub travel: f32,
    /// Time to cover the travel distance
    pub travel_duration: f32,
    /// Delay before the quad starts shrinking
    pub shrink_delay: f32,
    /// Time to shrink to nothing
    pub shrink_duration: f32,
    /// Quad is removed after this long
    pub lifetime: f32,
}

/// One attack ability (slam or ultimate)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttackSpec {
    /// Seconds between accepted triggers
    pub cooldown: f32,
    /// Obstacles closer than this are hit
    pub damage_radius: f32,
    /// Scale removed from each obstacle hit
    pub damage: f32,
    /// Jump height above the take-off point
    pub jump_height: f32,
    pub jump_duration: f32,
    pub jump_easing: Easing,
    /// Delay between trigger and damage resolution
    pub resolve_delay: f32,
    /// Drop the player back to the take-off height when damage resolves
    pub land_on_resolve: bool,
    pub burst: ParticleBurst,
}

impl AttackSpec {
    /// Quick ground slam (space)
    pub fn slam() -> Self {
        let slam_duration = 0.5;
        Self {
            cooldown: 1.0,
            damage_radius: 10.0,
            damage: 0.2,
            jump_height: 3.0,
            jump_duration: 0.5,
            jump_easing: Easing::OutCubic,
            resolve_delay: 0.0,
            land_on_resolve: false,
            burst: ParticleBurst {
                count: 15,
                color: [1.0, 0.5, 0.0],
                travel: 10.0,
                travel_duration: slam_duration * 2.0,
                shrink_delay: slam_duration,
                shrink_duration: slam_duration,
                lifetime: slam_duration + 0.01,
            },
        }
    }

    /// Wide ultimate (e)
    pub fn ultimate() -> Self {
        let slam_duration = 0.5;
        Self {
            cooldown: 5.0,
            damage_radius: 50.0,
            damage: 0.2,
            jump_height: 8.0,
            jump_duration: 1.0,
            jump_easing: Easing::OutExpo,
            resolve_delay: 0.2,
            land_on_resolve: true,
            burst: ParticleBurst {
                count: 30,
                color: [0.0, 0.0, 1.0],
                travel: 30.0,
                travel_duration: slam_duration * 3.0,
                shrink_delay: slam_duration,
                shrink_duration: slam_duration * 3.0,
                lifetime: slam_duration * 3.0 + 0.01,
            },
        }
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Tuning {
    /// Edge length of the hollow shell cube
    pub edge_size: f32,

    /// Player acceleration from directional input (units/s²)
    pub move_speed: f32,
    pub gravity: f32,
    /// Per-frame velocity multiplier
    pub velocity_damping: f32,

    /// Shell rotation rate (degrees/s)
    pub rotation_speed: f32,
    /// Seconds to carry the player onto the next face
    pub translation_duration: f32,
    /// Seconds for the player to fade back in after arriving
    pub opacity_fade_in: f32,

    /// Obstacle batch size range (inclusive)
    pub obstacles_min: u32,
    pub obstacles_max: u32,
    pub obstacle_speed: f32,
    pub obstacle_fade_in_delay: f32,
    pub obstacle_fade_in_duration: f32,
    /// Obstacle base scale and noise-driven spread
    pub obstacle_min_scale: f32,
    pub obstacle_scale_spread: f32,

    /// Match length in seconds
    pub match_duration: f32,
    /// Points per destroyed obstacle
    pub kill_score: u64,

    pub slam: AttackSpec,
    pub ultimate: AttackSpec,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            edge_size: 50.0,

            move_speed: 60.0,
            gravity: 30.0,
            velocity_damping: 0.95,

            rotation_speed: 90.0,
            translation_duration: 1.0,
            opacity_fade_in: 0.5,

            obstacles_min: 5,
            obstacles_max: 30,
            obstacle_speed: 10.0,
            obstacle_fade_in_delay: 0.5,
            obstacle_fade_in_duration: 1.0,
            obstacle_min_scale: 0.5,
            obstacle_scale_spread: 1.5,

            match_duration: 60.0,
            kill_score: 10,

            slam: AttackSpec::slam(),
            ultimate: AttackSpec::ultimate(),
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Half the shell edge; crossing it starts a face transition
    #[inline]
    pub fn edge_threshold(&self) -> f32 {
        self.edge_size / 2.0
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: format!("must be positive, got {value}"),
                })
            }
        }

        positive("edge_size", self.edge_size)?;
        // Translation lands the player edge_size - 2 away, which must stay inside the shell
        if self.edge_size <= 2.0 {
            return Err(TuningError::Invalid {
                field: "edge_size",
                reason: format!("must exceed 2, got {}", self.edge_size),
            });
        }
        positive("rotation_speed", self.rotation_speed)?;
        positive("translation_duration", self.translation_duration)?;
        positive("opacity_fade_in", self.opacity_fade_in)?;
        positive("obstacle_fade_in_duration", self.obstacle_fade_in_duration)?;
        positive("match_duration", self.match_duration)?;

        if !(0.0..=1.0).contains(&self.velocity_damping) {
            return Err(TuningError::Invalid {
                field: "velocity_damping",
                reason: format!("must be within [0, 1], got {}", self.velocity_damping),
            });
        }
        if self.obstacles_min > self.obstacles_max {
            return Err(TuningError::Invalid {
                field: "obstacles_min",
                reason: format!(
                    "{} exceeds obstacles_max {}",
                    self.obstacles_min, self.obstacles_max
                ),
            });
        }

        for (field, attack) in [("slam", &self.slam), ("ultimate", &self.ultimate)] {
            if attack.cooldown < 0.0 || attack.resolve_delay < 0.0 || attack.damage <= 0.0 {
                return Err(TuningError::Invalid {
                    field,
                    reason: "cooldown and resolve_delay must be >= 0, damage > 0".to_string(),
                });
            }
            positive(field, attack.jump_duration)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.edge_threshold(), 25.0);
    }

    #[test]
    fn test_partial_json_overrides() {
        let tuning = Tuning::from_json(r#"{ "match_duration": 30.0, "kill_score": 25 }"#).unwrap();
        assert_eq!(tuning.match_duration, 30.0);
        assert_eq!(tuning.kill_score, 25);
        // Untouched fields keep defaults
        assert_eq!(tuning.edge_size, 50.0);
        assert_eq!(tuning.slam, AttackSpec::slam());
    }

    #[test]
    fn test_rejects_bad_json() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_rejects_inverted_batch_range() {
        let err = Tuning::from_json(r#"{ "obstacles_min": 40, "obstacles_max": 30 }"#).unwrap_err();
        match err {
            TuningError::Invalid { field, .. } => assert_eq!(field, "obstacles_min"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_tiny_shell() {
        let err = Tuning::from_json(r#"{ "edge_size": 1.5 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "edge_size", .. }));
    }
}
