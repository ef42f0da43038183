//! Face transitions
//!
//! Walking off an edge of the top face turns the shell a quarter turn and
//! carries the player to the opposite edge, so the next face looks like it
//! rolled into place under them. Rotation and translation share the trigger
//! (crossing `edge_size / 2` on x or z) but run as two independent
//! animations with their own timing.

use glam::Vec3;

use super::events::{CrossAxis, GameEvent};
use super::spawn::generate_obstacles;
use super::state::{Fade, GameState};
use super::tween::{Easing, Tween};
use crate::lerp_vec3;

/// Which edge the player is past, x checked first
fn crossed_edge(position: Vec3, threshold: f32) -> Option<(CrossAxis, f32)> {
    if position.x.abs() > threshold {
        Some((CrossAxis::X, position.x.signum()))
    } else if position.z.abs() > threshold {
        Some((CrossAxis::Z, position.z.signum()))
    } else {
        None
    }
}

/// Run the whole face-transition controller for one frame
pub fn update_face_transition(state: &mut GameState, dt: f32) {
    start_rotation(state);
    step_rotation(state, dt);
    start_translation(state);
    step_translation(state);
    step_opacity(state);
}

/// Begin a quarter turn if the player crossed an edge and the shell is idle
pub fn start_rotation(state: &mut GameState) {
    if state.shell.rotating {
        return;
    }
    let threshold = state.tuning.edge_threshold();
    let Some((axis, sign)) = crossed_edge(state.player.position, threshold) else {
        return;
    };

    generate_obstacles(state);

    let shell = &mut state.shell;
    shell.rotating = true;
    shell.rotation_axis = match axis {
        CrossAxis::X => Vec3::Z,
        CrossAxis::Z => Vec3::X,
    };
    shell.target_rotation = if sign > 0.0 { -90.0 } else { 90.0 };
    shell.current_rotation = 0.0;
    shell.base_orientation = shell.orientation;

    log::info!(
        "Face transition: crossed {:?} edge (sign {}), turning shell {} deg",
        axis,
        sign,
        shell.target_rotation
    );
    state.push_event(GameEvent::FaceTransitionStarted { axis, sign });
}

/// Advance the quarter turn at a fixed angular rate, snapping the last step
pub fn step_rotation(state: &mut GameState, dt: f32) {
    let shell = &mut state.shell;
    if !shell.rotating {
        return;
    }

    let amount = state.tuning.rotation_speed * dt;
    let remaining = shell.target_rotation - shell.current_rotation;

    if remaining.abs() < amount {
        // Finish the turn, then fold it back into the base frame so nothing drifts
        let axis = shell.rotation_axis;
        let degrees = shell.target_rotation;
        shell.orientation = shell.base_orientation;
        shell.rotating = false;
        shell.current_rotation = 0.0;
        shell.turns += 1;
        state.push_event(GameEvent::ShellTurned { axis, degrees });
    } else {
        let step = amount.copysign(shell.target_rotation);
        shell.orientation += shell.rotation_axis * step;
        shell.current_rotation += step;
    }
}

/// Begin carrying the player to the opposite edge
pub fn start_translation(state: &mut GameState) {
    if state.transition.translating {
        return;
    }
    let threshold = state.tuning.edge_threshold();
    let Some((axis, sign)) = crossed_edge(state.player.position, threshold) else {
        return;
    };

    let axis = match axis {
        CrossAxis::X => Vec3::X,
        CrossAxis::Z => Vec3::Z,
    };
    let hop = state.tuning.edge_size - 2.0;
    let now = state.time;
    let start = state.player.position;

    let transition = &mut state.transition;
    transition.translating = true;
    transition.axis = axis;
    transition.start_time = now;
    transition.start_position = start;
    transition.target_position = start - axis * hop * sign;
    transition.fade = Fade::Out(Tween::new(
        1.0,
        0.0,
        now,
        state.tuning.translation_duration,
        Easing::Linear,
    ));
    state.player.opacity = 1.0;
}

/// Interpolate the player toward the target position
pub fn step_translation(state: &mut GameState) {
    let transition = &mut state.transition;
    if !transition.translating {
        return;
    }

    let duration = state.tuning.translation_duration;
    let elapsed = state.time - transition.start_time;

    if elapsed <= duration {
        state.player.position = lerp_vec3(
            transition.start_position,
            transition.target_position,
            elapsed / duration,
        );
    } else {
        transition.translating = false;
        state.player.position = transition.target_position;
        transition.fade = Fade::In(Tween::new(
            0.0,
            1.0,
            state.time,
            state.tuning.opacity_fade_in,
            Easing::Linear,
        ));
        log::debug!("Player arrived at {:?}", transition.target_position);
        let position = transition.target_position;
        state.push_event(GameEvent::TranslationFinished { position });
    }
}

/// Fade out during translation, back in afterwards
pub fn step_opacity(state: &mut GameState) {
    let now = state.time;
    match state.transition.fade {
        Fade::Visible => {}
        Fade::Out(tween) => {
            state.player.opacity = tween.sample(now);
        }
        Fade::In(tween) => {
            if tween.finished(now) {
                state.transition.fade = Fade::Visible;
                state.player.opacity = 1.0;
            } else {
                state.player.opacity = tween.sample(now);
            }
        }
    }
}
