//! Typed value tweens
//!
//! A tween is a plain `{start, end, start_time, duration, easing}` record that
//! is sampled against the simulation clock. Whoever owns the tween decides
//! which field it drives.

use serde::{Deserialize, Serialize};

use crate::lerp;

/// Easing curves used by the attack animations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    #[default]
    Linear,
    OutCubic,
    OutExpo,
}

impl Easing {
    /// Map normalized time `t` in [0, 1] to progress in [0, 1]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::OutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::OutExpo => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2f32.powf(-10.0 * t)
                }
            }
        }
    }
}

/// A scalar animation on the simulation clock
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tween {
    pub start: f32,
    pub end: f32,
    pub start_time: f32,
    pub duration: f32,
    pub easing: Easing,
}

impl Tween {
    pub fn new(start: f32, end: f32, start_time: f32, duration: f32, easing: Easing) -> Self {
        Self {
            start,
            end,
            start_time,
            duration,
            easing,
        }
    }

    /// Normalized elapsed time, clamped to [0, 1]
    pub fn progress(&self, now: f32) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.start_time) / self.duration).clamp(0.0, 1.0)
    }

    /// Eased value at `now`
    pub fn sample(&self, now: f32) -> f32 {
        lerp(self.start, self.end, self.easing.apply(self.progress(now)))
    }

    /// True once `now` is past the end of the tween
    pub fn finished(&self, now: f32) -> bool {
        now - self.start_time > self.duration
    }
}
