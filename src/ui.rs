//! HUD view model
//!
//! Everything the host draws on screen, derived from [`GameState`] each
//! frame. Layout and styling stay with the host.

use glam::Vec3;
use serde::Serialize;

use crate::sim::GameState;

/// Ultimate cooldown slider
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Slider {
    pub min: f32,
    pub max: f32,
    pub value: f32,
}

/// On-screen widgets for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    /// "Time: N" (hidden once the match is over)
    pub timer: Option<String>,
    /// "Score: N"
    pub score: String,
    /// "GAME OVER" banner
    pub game_over: Option<&'static str>,
    /// "Final Score: N"
    pub final_score: Option<String>,
    pub ult_slider: Slider,
    /// "ULT READY" label
    pub ult_ready: Option<&'static str>,
    /// Player cube alpha
    pub player_opacity: f32,
}

impl Hud {
    pub fn from_state(state: &GameState) -> Self {
        let m = &state.match_state;
        let over = !m.is_active();
        let gauge = state.ult_gauge;

        Self {
            timer: (!over).then(|| format!("Time: {:.0}", m.remaining.max(0.0))),
            score: format!("Score: {}", m.score),
            game_over: over.then_some("GAME OVER"),
            final_score: over.then(|| format!("Final Score: {}", m.score)),
            ult_slider: Slider {
                min: 0.0,
                max: gauge.max,
                value: gauge.value,
            },
            ult_ready: gauge.ready.then_some("ULT READY"),
            player_opacity: state.player.opacity,
        }
    }
}

/// One debris quad sampled at the current frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParticleView {
    pub position: Vec3,
    pub scale: f32,
    pub color: [f32; 3],
}

/// Live particles as the host should draw them this frame
pub fn particle_views(state: &GameState) -> Vec<ParticleView> {
    let now = state.time;
    state
        .particles
        .iter()
        .map(|p| ParticleView {
            position: p.position(now),
            scale: p.scale(now),
            color: p.color,
        })
        .collect()
}
