//! End-to-end match scenarios driven through `tick`

use cube_arena::Hud;
use cube_arena::sim::events::MAX_PENDING_EVENTS;
use cube_arena::sim::{
    AttackKind, GameEvent, GameState, MatchPhase, Obstacle, ObstacleKind, TickInput, tick,
};
use glam::Vec3;

const DT: f32 = 1.0 / 60.0;

fn idle(state: &mut GameState, frames: usize) {
    for _ in 0..frames {
        tick(state, &TickInput::default(), DT);
    }
}

fn held(slam: bool, ultimate: bool) -> TickInput {
    TickInput {
        slam,
        ultimate,
        ..Default::default()
    }
}

#[test]
fn crossing_positive_x_edge_completes_a_quarter_turn() {
    let mut state = GameState::new(2024);
    let old_ids: Vec<u32> = state.obstacles.iter().map(|o| o.id).collect();
    state.drain_events();
    state.player.position.x = 26.0;

    idle(&mut state, 120);

    assert_eq!(state.shell.turns, 1);
    assert!(!state.shell.rotating);
    assert_eq!(state.shell.rotation_axis, Vec3::Z);
    assert_eq!(state.shell.current_rotation, 0.0);
    assert_eq!(state.shell.orientation, Vec3::ZERO);

    assert!(!state.transition.translating);
    assert!((state.player.position.x + 22.0).abs() < 1e-4);
    assert_eq!(state.player.position.y, 25.5);

    let count = state.obstacles.len();
    assert!((5..=30).contains(&count), "regenerated {count}");
    assert!(state.obstacles.iter().all(|o| !old_ids.contains(&o.id)));

    let events = state.drain_events();
    assert!(events.contains(&GameEvent::ShellTurned {
        axis: Vec3::Z,
        degrees: -90.0
    }));
    let starts = events
        .iter()
        .filter(|e| matches!(e, GameEvent::FaceTransitionStarted { .. }))
        .count();
    assert_eq!(starts, 1);
}

#[test]
fn slam_retrigger_inside_cooldown_is_rejected() {
    let mut state = GameState::new(7);
    tick(&mut state, &held(true, false), DT);
    let first = state.slam.last_trigger;
    assert!(first.is_some());

    // Damage resolves on the next frame, leaving only the cooldown in the way
    idle(&mut state, 29);
    assert!(!state.slam.in_progress);
    let before = serde_json::to_value(&state.slam).unwrap();
    let queued = state.commands.len();

    tick(&mut state, &held(true, false), DT);
    assert!(state.time < 1.0);
    assert_eq!(serde_json::to_value(&state.slam).unwrap(), before);
    assert_eq!(state.commands.len(), queued);

    // Once the cooldown has elapsed the same key fires again
    idle(&mut state, 40);
    tick(&mut state, &held(true, false), DT);
    assert!(state.slam.last_trigger > first);
}

#[test]
fn nearly_dead_obstacle_dies_and_scores_once() {
    let mut state = GameState::new(99);
    state.obstacles.clear();
    let id = state.next_entity_id();
    let position = state.player.position;
    state.obstacles.push(Obstacle {
        id,
        seed: 0,
        kind: ObstacleKind::Sphere,
        color: [1.0, 0.0, 0.0],
        position,
        direction: Vec3::X,
        scale: 0.15,
        fade_in_start: 0.0,
        alpha: 1.0,
    });

    tick(&mut state, &held(true, false), DT);
    idle(&mut state, 2);
    assert!(state.obstacle(id).is_none());
    assert_eq!(state.match_state.score, 10);

    // More slams over an empty arena change nothing
    for _ in 0..3 {
        idle(&mut state, 70);
        tick(&mut state, &held(true, false), DT);
    }
    idle(&mut state, 2);
    assert_eq!(state.match_state.score, 10);
    let kills = state
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, GameEvent::ObstacleDestroyed { .. }))
        .count();
    assert_eq!(kills, 1);
}

#[test]
fn full_match_ends_and_stays_over() {
    let mut state = GameState::new(31337);
    let autopilot = TickInput {
        autopilot: true,
        ..Default::default()
    };

    let mut frames = 0;
    while state.match_state.is_active() {
        tick(&mut state, &autopilot, DT);
        frames += 1;
        assert!(frames < 4000, "match never ended");
    }
    assert!((3590..=3610).contains(&frames), "ended after {frames}");

    let score = state.match_state.score;
    let remaining = state.match_state.remaining;
    let game_overs = state
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, GameEvent::GameOver { .. }))
        .count();
    assert_eq!(game_overs, 1);

    // Attacks still fire after the whistle but no longer score
    for _ in 0..600 {
        tick(&mut state, &autopilot, DT);
    }
    assert_eq!(state.match_state.phase, MatchPhase::Over);
    assert_eq!(state.match_state.remaining, remaining);
    assert_eq!(state.match_state.score, score);
    assert!(
        !state
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::GameOver { .. } | GameEvent::ObstacleDestroyed { .. }))
    );

    let hud = Hud::from_state(&state);
    assert_eq!(hud.game_over, Some("GAME OVER"));
    assert_eq!(hud.final_score, Some(format!("Final Score: {score}")));
}

#[test]
fn same_seed_and_inputs_replay_identically() {
    let script = [
        TickInput::default(),
        TickInput {
            forward: true,
            right: true,
            ..Default::default()
        },
        held(true, false),
        held(false, true),
        TickInput {
            autopilot: true,
            ..Default::default()
        },
    ];

    let run = || {
        let mut state = GameState::new(555);
        for frame in 0..900 {
            tick(&mut state, &script[(frame / 60) % script.len()], DT);
        }
        (
            serde_json::to_string(&state).unwrap(),
            state.particles.len(),
            state.drain_events(),
        )
    };

    assert_eq!(run(), run());
}

#[test]
fn ultimate_discards_nothing_while_match_runs() {
    let mut state = GameState::new(4);
    tick(&mut state, &held(false, true), DT);
    idle(&mut state, 30);
    let events = state.drain_events();
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::AttackResolved {
            attack: AttackKind::Ultimate,
            ..
        }
    )));
    assert!(!events.iter().any(|e| matches!(e, GameEvent::AttackDiscarded { .. })));
    assert_eq!(state.player.position.y, 25.5);
}

#[test]
fn undrained_events_stay_bounded_while_a_key_is_held() {
    let mut state = GameState::new(21);
    for _ in 0..2000 {
        tick(&mut state, &held(true, false), DT);
    }
    assert_eq!(state.events.len(), MAX_PENDING_EVENTS);
    // Newest events survive: the last frame's sound is still queued
    let sound = GameEvent::AttackSound(AttackKind::Slam);
    assert!(state.events.iter().rev().take(2).any(|e| *e == sound));
}

#[test]
fn slam_reports_a_visible_burst() {
    let mut state = GameState::new(3);
    tick(&mut state, &held(true, false), DT);
    idle(&mut state, 1);

    let bursts: Vec<_> = state
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            GameEvent::ParticleBurst { attack, count, .. } => Some((attack, count)),
            _ => None,
        })
        .collect();
    assert_eq!(bursts, vec![(AttackKind::Slam, 15)]);

    let views = cube_arena::ui::particle_views(&state);
    assert_eq!(views.len(), 15);
    assert!(views.iter().all(|v| v.scale > 0.0));
}
