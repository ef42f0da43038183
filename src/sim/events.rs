//! Deferred commands and outgoing game events
//!
//! Effects that land "later" (slam damage after the jump) are queued as
//! timestamped commands and drained by `tick` once the clock reaches them.
//! Events flow the other way: the host drains them each frame to drive audio,
//! effects and logging.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::state::AttackKind;

/// A deferred state change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Damage every obstacle within `radius` of `origin`
    ApplyAreaDamage {
        attack: AttackKind,
        origin: Vec3,
        radius: f32,
        damage: f32,
    },
}

/// A command waiting for its due time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledCommand {
    /// Simulation time at which the command fires
    pub due: f32,
    /// Insertion order, breaks ties between equal due times
    pub seq: u64,
    pub command: Command,
}

/// Pending commands, fired in (due, seq) order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandQueue {
    pending: Vec<ScheduledCommand>,
    next_seq: u64,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a command to fire at `due`. Scheduled commands cannot be cancelled.
    pub fn schedule(&mut self, due: f32, command: Command) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(ScheduledCommand { due, seq, command });
    }

    /// Remove and return every command due at or before `now`, oldest first
    pub fn drain_due(&mut self, now: f32) -> Vec<Command> {
        let (mut due, later): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|c| c.due <= now);
        self.pending = later;
        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|c| c.command).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Most events kept for a host that has not drained them yet
pub const MAX_PENDING_EVENTS: usize = 1024;

/// Append an event, dropping the oldest ones once the buffer is full
pub fn push_bounded(buffer: &mut Vec<GameEvent>, event: GameEvent) {
    if buffer.len() >= MAX_PENDING_EVENTS {
        let excess = buffer.len() + 1 - MAX_PENDING_EVENTS;
        buffer.drain(..excess);
    }
    buffer.push(event);
}

/// Axis the player crossed when leaving a face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossAxis {
    X,
    Z,
}

/// Things that happened during a tick, for the host to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// An attack key was held this frame (plays even if the attack is on cooldown)
    AttackSound(AttackKind),
    /// Attack passed its cooldown gate and started its jump
    AttackStarted { attack: AttackKind, at: f32 },
    /// Deferred area damage was applied
    AttackResolved { attack: AttackKind, hits: u32, kills: u32 },
    /// Deferred area damage fired after the match ended and was dropped
    AttackDiscarded { attack: AttackKind },
    /// Debris ring spawned where an attack landed
    ParticleBurst {
        attack: AttackKind,
        origin: Vec3,
        count: u32,
    },
    /// Obstacle scale reached zero; awarded `points`
    ObstacleDestroyed { id: u32, points: u64 },
    /// Obstacle batch was cleared and respawned
    ObstaclesRegenerated { count: usize },
    /// Player crossed a face edge
    FaceTransitionStarted { axis: CrossAxis, sign: f32 },
    /// Shell finished a quarter turn
    ShellTurned { axis: Vec3, degrees: f32 },
    /// Player arrived on the new face
    TranslationFinished { position: Vec3 },
    /// Player fell out of the arena and was put back on top
    PlayerRespawned,
    /// Countdown hit zero
    GameOver { score: u64 },
}
