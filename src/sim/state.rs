//! Game state and core simulation types
//!
//! Everything the frame loop mutates lives in [`GameState`]; nothing is
//! global. The state is serializable so a host can snapshot and replay runs.

use glam::Vec3;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::{CommandQueue, GameEvent, push_bounded};
use super::noise::CoherentNoise;
use super::tween::{Easing, Tween};
use crate::consts::*;
use crate::tuning::{AttackSpec, Tuning, TuningError};

/// Match state machine. `Over` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Countdown running
    Active,
    /// Countdown hit zero
    Over,
}

/// Countdown, score and phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchState {
    /// Seconds left on the clock (may dip below zero on the final frame)
    pub remaining: f32,
    pub score: u64,
    pub phase: MatchPhase,
}

impl MatchState {
    pub fn new(duration: f32) -> Self {
        Self {
            remaining: duration,
            score: 0,
            phase: MatchPhase::Active,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.phase == MatchPhase::Active
    }

    /// Run the countdown. Returns true on the frame the match ends.
    pub fn update(&mut self, dt: f32) -> bool {
        if !self.is_active() {
            return false;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.phase = MatchPhase::Over;
            return true;
        }
        false
    }

    /// Add points while the match is running; ignored once over
    pub fn award(&mut self, points: u64) -> bool {
        if !self.is_active() {
            return false;
        }
        self.score += points;
        true
    }
}

/// The player cube
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub position: Vec3,
    pub velocity: Vec3,
    /// 0 = invisible, 1 = opaque
    pub opacity: f32,
    /// Attack jump animation driving `position.y`
    pub jump: Option<Tween>,
}

impl Player {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            opacity: 1.0,
            jump: None,
        }
    }

    /// Does the player's unit box touch an axis-aligned box of `half` extent at the origin?
    pub fn touches_box(&self, half: f32) -> bool {
        let p = self.position.abs();
        let reach = half + PLAYER_HALF_EXTENT;
        p.x <= reach && p.y <= reach && p.z <= reach
    }
}

/// Obstacle primitive shapes (cosmetic, all share a box collider)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObstacleKind {
    #[default]
    Cube,
    Sphere,
    Cylinder,
    Cone,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 4] = [
        ObstacleKind::Cube,
        ObstacleKind::Sphere,
        ObstacleKind::Cylinder,
        ObstacleKind::Cone,
    ];
}

/// A destructible roaming shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    /// Unique entity id, never reused
    pub id: u32,
    /// Index within its spawn batch; keys the noise lookup on reset
    pub seed: u32,
    pub kind: ObstacleKind,
    pub color: [f32; 3],
    pub position: Vec3,
    /// Horizontal unit vector (y = 0)
    pub direction: Vec3,
    /// Uniform scale, doubles as health
    pub scale: f32,
    /// Simulation time the fade-in begins
    pub fade_in_start: f32,
    pub alpha: f32,
}

impl Obstacle {
    /// Advance the fade-in for the current time
    pub fn update_fade(&mut self, now: f32, duration: f32) {
        if now < self.fade_in_start {
            return;
        }
        let elapsed = now - self.fade_in_start;
        self.alpha = if elapsed <= duration {
            crate::lerp(0.0, 1.0, elapsed / duration)
        } else {
            1.0
        };
    }

    pub fn is_destroyed(&self) -> bool {
        self.scale <= 0.0
    }
}

/// The hollow world cube and its in-progress quarter turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shell {
    pub edge_size: f32,
    /// Visual orientation (euler degrees)
    pub orientation: Vec3,
    /// Orientation when the current turn began; restored when it ends
    pub base_orientation: Vec3,
    pub rotating: bool,
    pub rotation_axis: Vec3,
    /// Degrees turned so far in the current turn (signed)
    pub current_rotation: f32,
    /// ±90 while rotating
    pub target_rotation: f32,
    /// Completed quarter turns
    pub turns: u32,
}

impl Shell {
    pub fn new(edge_size: f32) -> Self {
        Self {
            edge_size,
            orientation: Vec3::ZERO,
            base_orientation: Vec3::ZERO,
            rotating: false,
            rotation_axis: Vec3::ZERO,
            current_rotation: 0.0,
            target_rotation: 0.0,
            turns: 0,
        }
    }

    #[inline]
    pub fn half_extent(&self) -> f32 {
        self.edge_size / 2.0
    }

    /// Height of a unit cube resting on the top face
    #[inline]
    pub fn standing_height(&self) -> f32 {
        self.half_extent() + PLAYER_HALF_EXTENT
    }
}

/// Player opacity sequence around a face transition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Fade {
    Visible,
    /// Fading out while being carried to the next face
    Out(Tween),
    /// Fading back in after arriving
    In(Tween),
}

/// Player translation onto the adjacent face
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceTransition {
    pub translating: bool,
    /// Unit axis of travel
    pub axis: Vec3,
    pub start_time: f32,
    pub start_position: Vec3,
    pub target_position: Vec3,
    pub fade: Fade,
}

impl Default for FaceTransition {
    fn default() -> Self {
        Self {
            translating: false,
            axis: Vec3::ZERO,
            start_time: 0.0,
            start_position: Vec3::ZERO,
            target_position: Vec3::ZERO,
            fade: Fade::Visible,
        }
    }
}

/// The two attack abilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackKind {
    /// Short-range ground slam
    Slam,
    /// Wide, slow-charging slam
    Ultimate,
}

impl AttackKind {
    pub fn name(&self) -> &'static str {
        match self {
            AttackKind::Slam => "slam",
            AttackKind::Ultimate => "ultimate",
        }
    }
}

/// Cooldown-gated attack instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackState {
    pub kind: AttackKind,
    pub spec: AttackSpec,
    /// Simulation time of the last accepted trigger
    pub last_trigger: Option<f32>,
    /// Between trigger and damage resolution
    pub in_progress: bool,
}

impl AttackState {
    pub fn new(kind: AttackKind, spec: AttackSpec) -> Self {
        Self {
            kind,
            spec,
            last_trigger: None,
            in_progress: false,
        }
    }

    /// Seconds since the last accepted trigger (None if never fired)
    pub fn since_trigger(&self, now: f32) -> Option<f32> {
        self.last_trigger.map(|t| now - t)
    }

    /// Still within the cooldown window?
    pub fn cooling_down(&self, now: f32) -> bool {
        self.since_trigger(now)
            .is_some_and(|elapsed| elapsed < self.spec.cooldown)
    }
}

/// Cosmetic slam debris quad
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub origin: Vec3,
    pub direction: Vec3,
    pub travel: f32,
    pub travel_duration: f32,
    pub shrink_delay: f32,
    pub shrink_duration: f32,
    pub spawned_at: f32,
    pub lifetime: f32,
    pub color: [f32; 3],
}

impl Particle {
    pub fn position(&self, now: f32) -> Vec3 {
        let t = Tween::new(0.0, self.travel, self.spawned_at, self.travel_duration, Easing::OutCubic);
        self.origin + self.direction * t.sample(now)
    }

    pub fn scale(&self, now: f32) -> f32 {
        let shrink = Tween::new(
            PARTICLE_SCALE,
            0.0,
            self.spawned_at + self.shrink_delay,
            self.shrink_duration,
            Easing::OutCubic,
        );
        shrink.sample(now)
    }

    pub fn expired(&self, now: f32) -> bool {
        now - self.spawned_at >= self.lifetime
    }
}

/// Ultimate cooldown slider and "ready" label state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UltimateGauge {
    /// Slider value in [0, max]
    pub value: f32,
    pub max: f32,
    pub ready: bool,
}

/// RNG state wrapper for serialization
///
/// Each consumer takes a fresh generator on its own stream, so a snapshot
/// only needs the seed and the stream counter to resume deterministically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// Generator for the next consumer
    pub fn next_rng(&mut self) -> Pcg32 {
        let rng = Pcg32::new(self.seed, self.stream);
        self.stream += 1;
        rng
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng_state: RngState,
    pub tuning: Tuning,
    /// Simulation clock (seconds)
    pub time: f32,
    /// Frames simulated
    pub frame: u64,
    pub match_state: MatchState,
    pub player: Player,
    pub shell: Shell,
    pub transition: FaceTransition,
    pub noise: CoherentNoise,
    /// Live obstacles (sorted by id for determinism)
    pub obstacles: Vec<Obstacle>,
    pub slam: AttackState,
    pub ultimate: AttackState,
    /// Deferred effects
    pub commands: CommandQueue,
    pub ult_gauge: UltimateGauge,
    /// Visual particles (not gameplay-affecting)
    #[serde(skip)]
    pub particles: Vec<Particle>,
    /// Events produced since the host last drained them
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game with default tuning
    pub fn new(seed: u64) -> Self {
        Self::build(seed, Tuning::default())
    }

    /// Create a new game with the given balance sheet
    ///
    /// The tuning is validated first; values the spawner or the face
    /// controller cannot run with are rejected instead of panicking later.
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::build(seed, tuning))
    }

    fn build(seed: u64, tuning: Tuning) -> Self {
        use rand::Rng;

        let mut rng_state = RngState::new(seed);
        let noise_seed = rng_state.next_rng().random_range(0..10_000);
        let shell = Shell::new(tuning.edge_size);
        let spawn = Vec3::new(0.0, shell.standing_height(), 0.0);
        let ult_cooldown = tuning.ultimate.cooldown;

        let mut state = Self {
            seed,
            rng_state,
            time: 0.0,
            frame: 0,
            match_state: MatchState::new(tuning.match_duration),
            player: Player::new(spawn),
            shell,
            transition: FaceTransition::default(),
            noise: CoherentNoise::new(noise_seed),
            obstacles: Vec::new(),
            slam: AttackState::new(AttackKind::Slam, tuning.slam.clone()),
            ultimate: AttackState::new(AttackKind::Ultimate, tuning.ultimate.clone()),
            commands: CommandQueue::new(),
            ult_gauge: UltimateGauge {
                value: ult_cooldown,
                max: ult_cooldown,
                ready: true,
            },
            particles: Vec::new(),
            events: Vec::new(),
            tuning,
            next_id: 1,
        };

        super::spawn::generate_obstacles(&mut state);
        log::info!(
            "Match started: seed={}, duration={}s, obstacles={}",
            seed,
            state.tuning.match_duration,
            state.obstacles.len()
        );

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn obstacle(&self, id: u32) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    /// Remove an obstacle by id. Removing an absent id is a no-op.
    pub fn remove_obstacle(&mut self, id: u32) -> Option<Obstacle> {
        let idx = self.obstacles.iter().position(|o| o.id == id)?;
        Some(self.obstacles.remove(idx))
    }

    pub fn attack(&self, kind: AttackKind) -> &AttackState {
        match kind {
            AttackKind::Slam => &self.slam,
            AttackKind::Ultimate => &self.ultimate,
        }
    }

    pub fn attack_mut(&mut self, kind: AttackKind) -> &mut AttackState {
        match kind {
            AttackKind::Slam => &mut self.slam,
            AttackKind::Ultimate => &mut self.ultimate,
        }
    }

    /// Either attack between trigger and resolution
    pub fn is_attacking(&self) -> bool {
        self.slam.in_progress || self.ultimate.in_progress
    }

    /// Queue an event for the host (bounded, oldest dropped first)
    pub fn push_event(&mut self, event: GameEvent) {
        push_bounded(&mut self.events, event);
    }

    /// Hand the accumulated events to the host
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure obstacles are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.obstacles.sort_by_key(|o| o.id);
    }
}
