//! Per-frame simulation step
//!
//! Core game loop that advances the arena by one rendered frame.

use glam::Vec3;

use super::attack::{expire_particles, resolve_area_damage, trigger_attack};
use super::events::{Command, GameEvent};
use super::face::update_face_transition;
use super::spawn::{generate_obstacles, roam_obstacles};
use super::state::{AttackKind, GameState, UltimateGauge};
use crate::consts::*;

/// Held keys for a single frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// W
    pub forward: bool,
    /// S
    pub back: bool,
    /// A
    pub left: bool,
    /// D
    pub right: bool,
    /// Space
    pub slam: bool,
    /// E
    pub ultimate: bool,
    /// Idle/demo mode - AI plays the game
    pub autopilot: bool,
}

impl TickInput {
    // Input bit positions - movement
    pub const FORWARD: u8 = 1 << 0;
    pub const BACK: u8 = 1 << 1;
    pub const LEFT: u8 = 1 << 2;
    pub const RIGHT: u8 = 1 << 3;

    // Actions
    pub const SLAM: u8 = 1 << 4;
    pub const ULTIMATE: u8 = 1 << 5;
    pub const AUTOPILOT: u8 = 1 << 6;

    /// Decode a packed key bitfield (as sent by a JS host)
    pub fn from_bits(bits: u8) -> Self {
        Self {
            forward: bits & Self::FORWARD != 0,
            back: bits & Self::BACK != 0,
            left: bits & Self::LEFT != 0,
            right: bits & Self::RIGHT != 0,
            slam: bits & Self::SLAM != 0,
            ultimate: bits & Self::ULTIMATE != 0,
            autopilot: bits & Self::AUTOPILOT != 0,
        }
    }

    /// Pack back into a bitfield
    pub fn to_bits(&self) -> u8 {
        let mut bits = 0;
        for (held, bit) in [
            (self.forward, Self::FORWARD),
            (self.back, Self::BACK),
            (self.left, Self::LEFT),
            (self.right, Self::RIGHT),
            (self.slam, Self::SLAM),
            (self.ultimate, Self::ULTIMATE),
            (self.autopilot, Self::AUTOPILOT),
        ] {
            if held {
                bits |= bit;
            }
        }
        bits
    }
}

/// Advance the game state by one frame of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    let dt = dt.max(0.0);
    state.time += dt;
    state.frame += 1;

    // Idle/demo mode - AI plays the game
    let mut input = input.clone();
    if input.autopilot {
        autopilot(state, &mut input);
    }
    let input = &input;

    // Match clock (only the countdown stops at game over)
    if state.match_state.update(dt) {
        let score = state.match_state.score;
        log::info!("Game over! Final score: {}", score);
        state.push_event(GameEvent::GameOver { score });
    }

    // Deferred commands whose time has come
    for command in state.commands.drain_due(state.time) {
        match command {
            Command::ApplyAreaDamage {
                attack,
                origin,
                radius,
                damage,
            } => resolve_area_damage(state, attack, origin, radius, damage),
        }
    }

    update_player(state, input, dt);
    update_face_transition(state, dt);
    roam_obstacles(state, dt);
    expire_particles(state);
    state.ult_gauge = ultimate_gauge(state);

    // Attack keys: the sound plays on every held frame, cooldown or not
    if input.slam {
        state.push_event(GameEvent::AttackSound(AttackKind::Slam));
        trigger_attack(state, AttackKind::Slam);
    }
    if input.ultimate {
        state.push_event(GameEvent::AttackSound(AttackKind::Ultimate));
        trigger_attack(state, AttackKind::Ultimate);
    }

    // Ensure deterministic ordering
    state.normalize_order();
}

/// Gravity, fall-off respawn, input, integration, ground clamp, jump, damping
fn update_player(state: &mut GameState, input: &TickInput, dt: f32) {
    let tuning = &state.tuning;
    let (gravity, speed, damping) = (tuning.gravity, tuning.move_speed, tuning.velocity_damping);
    let half = state.shell.half_extent();
    let standing = state.shell.standing_height();

    state.player.velocity.y -= gravity * dt;

    if state.player.position.y < FALL_OFF_Y {
        log::info!("Player fell off at {:?}, respawning", state.player.position);
        state.player.position = Vec3::new(0.0, half + RESPAWN_LIFT, 0.0);
        state.player.velocity = Vec3::ZERO;
        state.player.jump = None;
        state.push_event(GameEvent::PlayerRespawned);
        generate_obstacles(state);
    }

    if !state.is_attacking() {
        let accel = speed * dt;
        let player = &mut state.player;
        if input.forward {
            player.velocity += Vec3::Z * accel;
        }
        if input.back {
            player.velocity -= Vec3::Z * accel;
        }
        if input.left {
            player.velocity -= Vec3::X * accel;
        }
        if input.right {
            player.velocity += Vec3::X * accel;
        }
    }

    let player = &mut state.player;
    player.position += player.velocity * dt;

    // Stand on the top face
    if player.touches_box(half) && player.velocity.y < 0.0 {
        player.velocity.y = 0.0;
        player.position.y = standing;
    }

    // Attack jump owns the height while it plays
    if let Some(jump) = player.jump {
        player.position.y = jump.sample(state.time);
        player.velocity.y = 0.0;
        if jump.finished(state.time) {
            player.jump = None;
        }
    }

    player.velocity *= damping;
}

/// Slider value and ready flag for the ultimate
fn ultimate_gauge(state: &GameState) -> UltimateGauge {
    let ult = &state.ultimate;
    let max = ult.spec.cooldown;
    if ult.in_progress || ult.cooling_down(state.time) {
        let value = ult.since_trigger(state.time).unwrap_or(0.0).clamp(0.0, max);
        UltimateGauge {
            value,
            max,
            ready: false,
        }
    } else {
        UltimateGauge {
            value: max,
            max,
            ready: true,
        }
    }
}

/// Demo player: chase the nearest obstacle, slam when close
fn autopilot(state: &GameState, input: &mut TickInput) {
    let pos = state.player.position;
    let now = state.time;
    let slam_radius = state.slam.spec.damage_radius;
    let ult_radius = state.ultimate.spec.damage_radius;

    let crowd = state
        .obstacles
        .iter()
        .filter(|o| o.position.distance(pos) < ult_radius)
        .count();
    input.ultimate = crowd > 0 && state.ultimate.can_trigger(now);

    let nearest = state
        .obstacles
        .iter()
        .map(|o| (o, o.position.distance(pos)))
        .min_by(|a, b| a.1.total_cmp(&b.1));

    let Some((target, distance)) = nearest else {
        return;
    };

    // Keep clear of the edges so the demo stays on one face
    let reach = state.shell.half_extent() - 4.0;
    let goal = target.position.clamp(Vec3::splat(-reach), Vec3::splat(reach));
    let to = goal - pos;
    input.right = to.x > 1.0;
    input.left = to.x < -1.0;
    input.forward = to.z > 1.0;
    input.back = to.z < -1.0;

    input.slam = distance < slam_radius * 0.8 && state.slam.can_trigger(now);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::MatchPhase;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_input_bits_roundtrip() {
        let input = TickInput::from_bits(TickInput::FORWARD | TickInput::SLAM);
        assert!(input.forward && input.slam);
        assert!(!input.back && !input.ultimate && !input.autopilot);
        assert_eq!(input.to_bits(), TickInput::FORWARD | TickInput::SLAM);
    }

    #[test]
    fn test_timer_counts_down_then_ends() {
        let mut state = GameState::new(12345);
        state.match_state.remaining = 0.05;

        tick(&mut state, &TickInput::default(), 0.02);
        assert_eq!(state.match_state.phase, MatchPhase::Active);
        assert!((state.match_state.remaining - 0.03).abs() < 1e-6);

        tick(&mut state, &TickInput::default(), 0.02);
        tick(&mut state, &TickInput::default(), 0.02);
        assert_eq!(state.match_state.phase, MatchPhase::Over);
        let overs = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);

        let remaining = state.match_state.remaining;
        tick(&mut state, &TickInput::default(), 0.5);
        assert_eq!(state.match_state.phase, MatchPhase::Over);
        assert_eq!(state.match_state.remaining, remaining);
    }

    #[test]
    fn test_player_rests_on_top_face() {
        let mut state = GameState::new(1);
        for _ in 0..120 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert_eq!(state.player.position.y, 25.5);
        assert_eq!(state.player.velocity.y, 0.0);
    }

    #[test]
    fn test_movement_accelerates_along_axes() {
        let mut state = GameState::new(1);
        let input = TickInput {
            forward: true,
            right: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT);
        assert!(state.player.velocity.z > 0.0);
        assert!(state.player.velocity.x > 0.0);
        assert!(state.player.position.z > 0.0);
    }

    #[test]
    fn test_movement_ignored_while_attacking() {
        let mut state = GameState::new(1);
        state.slam.in_progress = true;
        let input = TickInput {
            forward: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT);
        assert_eq!(state.player.velocity.z, 0.0);
    }

    #[test]
    fn test_fall_off_respawns_and_regenerates() {
        let mut state = GameState::new(1);
        let old: Vec<u32> = state.obstacles.iter().map(|o| o.id).collect();
        state.player.position = Vec3::new(10.0, -11.0, 0.0);
        state.player.velocity = Vec3::new(3.0, -20.0, 0.0);

        tick(&mut state, &TickInput::default(), DT);
        assert!(state.events.contains(&GameEvent::PlayerRespawned));
        assert_eq!(state.player.position.x, 0.0);
        assert!(state.obstacles.iter().all(|o| !old.contains(&o.id)));
    }

    #[test]
    fn test_slam_sound_plays_even_on_cooldown() {
        let mut state = GameState::new(1);
        let input = TickInput {
            slam: true,
            ..Default::default()
        };
        for _ in 0..5 {
            tick(&mut state, &input, DT);
        }
        let sounds = state
            .events
            .iter()
            .filter(|e| **e == GameEvent::AttackSound(AttackKind::Slam))
            .count();
        let starts = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::AttackStarted { .. }))
            .count();
        assert_eq!(sounds, 5);
        assert_eq!(starts, 1);
    }

    #[test]
    fn test_slam_resolves_next_frame() {
        let mut state = GameState::new(1);
        let slam = TickInput {
            slam: true,
            ..Default::default()
        };
        tick(&mut state, &slam, DT);
        assert!(state.slam.in_progress);
        assert_eq!(state.commands.len(), 1);

        tick(&mut state, &TickInput::default(), DT);
        assert!(!state.slam.in_progress);
        assert!(state.commands.is_empty());
        assert!(state
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::AttackResolved { attack: AttackKind::Slam, .. })));
    }

    #[test]
    fn test_slam_jump_lifts_player() {
        let mut state = GameState::new(1);
        let slam = TickInput {
            slam: true,
            ..Default::default()
        };
        tick(&mut state, &slam, DT);
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert!(state.player.position.y > 25.5);
        assert!(state.player.position.y <= 28.5);
    }

    #[test]
    fn test_ult_gauge_tracks_cooldown() {
        let mut state = GameState::new(1);
        tick(&mut state, &TickInput::default(), DT);
        assert!(state.ult_gauge.ready);
        assert_eq!(state.ult_gauge.value, 5.0);

        let ult = TickInput {
            ultimate: true,
            ..Default::default()
        };
        tick(&mut state, &ult, DT);
        for _ in 0..60 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert!(!state.ult_gauge.ready);
        assert!((state.ult_gauge.value - 1.0).abs() < 0.05);

        for _ in 0..300 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert!(state.ult_gauge.ready);
        assert_eq!(state.ult_gauge.value, 5.0);
    }

    #[test]
    fn test_movement_continues_after_game_over() {
        let mut state = GameState::new(1);
        state.match_state.phase = MatchPhase::Over;
        let input = TickInput {
            right: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT);
        assert!(state.player.velocity.x > 0.0);
    }

    #[test]
    fn test_autopilot_fires_ultimate_into_crowd() {
        let mut state = GameState::new(2024);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT);
        assert!(state.events.contains(&GameEvent::AttackSound(AttackKind::Ultimate)));
        assert!(state.ultimate.in_progress);

        for _ in 0..60 * 20 {
            tick(&mut state, &input, DT);
        }
        let ults = state
            .events
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    GameEvent::AttackStarted {
                        attack: AttackKind::Ultimate,
                        ..
                    }
                )
            })
            .count();
        // Roughly one per 5 s cooldown
        assert!(ults >= 3, "{ults} ultimates");
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);

        let inputs = [
            TickInput {
                forward: true,
                ..Default::default()
            },
            TickInput {
                slam: true,
                ..Default::default()
            },
            TickInput {
                right: true,
                ultimate: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for _ in 0..50 {
            for input in &inputs {
                tick(&mut state1, input, DT);
                tick(&mut state2, input, DT);
            }
        }

        assert_eq!(state1.frame, state2.frame);
        assert_eq!(state1.match_state.score, state2.match_state.score);
        assert_eq!(state1.player.position, state2.player.position);
        assert_eq!(state1.obstacles.len(), state2.obstacles.len());
        for (a, b) in state1.obstacles.iter().zip(&state2.obstacles) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.position, b.position);
        }
    }
}
