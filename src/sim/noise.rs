//! Seeded 2D coherent noise
//!
//! Smoothly varying values in [-1, 1] used to scatter obstacles across the
//! top face. Nearby sample points give nearby values, so a batch spawned in
//! one frame clusters loosely instead of looking like white noise.

use serde::{Deserialize, Serialize};

/// Hashed lattice noise with smoothstep interpolation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoherentNoise {
    seed: u32,
}

impl CoherentNoise {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }

    /// Pseudo-random lattice value in [-1, 1]
    fn hash(&self, x: i32, y: i32) -> f32 {
        let mut n = x
            .wrapping_mul(374761393)
            .wrapping_add(y.wrapping_mul(668265263))
            .wrapping_add((self.seed as i32).wrapping_mul(1442695041));
        n = (n ^ (n >> 13)).wrapping_mul(1274126177);
        ((n ^ (n >> 16)) as u32 as f32 / 4294967296.0) * 2.0 - 1.0
    }

    /// Sample the noise field at (x, y)
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let ix = x.floor() as i32;
        let iy = y.floor() as i32;
        let fx = x - ix as f32;
        let fy = y - iy as f32;

        let fade = |t: f32| t * t * (3.0 - 2.0 * t);
        let u = fade(fx);
        let v = fade(fy);

        let a = self.hash(ix, iy);
        let b = self.hash(ix + 1, iy);
        let c = self.hash(ix, iy + 1);
        let d = self.hash(ix + 1, iy + 1);

        let x1 = a * (1.0 - u) + b * u;
        let x2 = c * (1.0 - u) + d * u;
        (x1 * (1.0 - v) + x2 * v).clamp(-1.0, 1.0)
    }
}
