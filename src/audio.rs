//! Attack sound cues
//!
//! The simulation only reports that an attack key was pressed; this module
//! turns that into sound. On wasm32 the cues are synthesized with the Web
//! Audio API, so no clip files need to ship. Hosts that prefer recorded
//! clips can look them up with [`SoundEffect::clip_name`].

use crate::sim::{AttackKind, GameEvent};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ground slam (attack 1)
    Slam,
    /// Ultimate (attack 2)
    Ultimate,
}

impl From<AttackKind> for SoundEffect {
    fn from(kind: AttackKind) -> Self {
        match kind {
            AttackKind::Slam => SoundEffect::Slam,
            AttackKind::Ultimate => SoundEffect::Ultimate,
        }
    }
}

impl SoundEffect {
    /// Clip file a sample-based host should play for this cue
    pub fn clip_name(&self) -> &'static str {
        match self {
            SoundEffect::Slam => "attack1.mp3",
            SoundEffect::Ultimate => "attack2.mp3",
        }
    }

    /// Sound cue carried by a game event, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::AttackSound(kind) => Some((*kind).into()),
            _ => None,
        }
    }
}

/// Effective output volume for the given mix settings
pub fn mix_volume(master: f32, sfx: f32, muted: bool) -> f32 {
    if muted {
        0.0
    } else {
        master.clamp(0.0, 1.0) * sfx.clamp(0.0, 1.0)
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(not(target_arch = "wasm32"))]
pub use native::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{SoundEffect, mix_volume};

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        master_volume: f32,
        sfx_volume: f32,
        muted: bool,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: 0.8,
                sfx_volume: 1.0,
                muted: false,
            }
        }

        pub fn set_master_volume(&mut self, vol: f32) {
            self.master_volume = vol.clamp(0.0, 1.0);
        }

        pub fn set_sfx_volume(&mut self, vol: f32) {
            self.sfx_volume = vol.clamp(0.0, 1.0);
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        /// Fire and forget
        pub fn play(&self, effect: SoundEffect) {
            let vol = mix_volume(self.master_volume, self.sfx_volume, self.muted);
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Slam => self.play_slam(ctx, vol),
                SoundEffect::Ultimate => self.play_ultimate(ctx, vol),
            }
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Slam - short whoosh into a thud
        fn play_slam(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();

            if let Some((osc, gain)) = self.create_osc(ctx, 220.0, OscillatorType::Triangle) {
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                    .ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(520.0, t + 0.12)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.18).ok();
            }

            if let Some((osc, gain)) = self.create_osc(ctx, 120.0, OscillatorType::Sine) {
                let hit = t + 0.12;
                gain.gain().set_value_at_time(0.0, t).ok();
                gain.gain().set_value_at_time(vol * 0.6, hit).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, hit + 0.2)
                    .ok();
                osc.frequency().set_value_at_time(120.0, hit).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(45.0, hit + 0.2)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(hit + 0.25).ok();
            }
        }

        /// Ultimate - rising charge and a deep boom
        fn play_ultimate(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();

            if let Some((osc, gain)) = self.create_osc(ctx, 150.0, OscillatorType::Sawtooth) {
                gain.gain().set_value_at_time(vol * 0.2, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.35)
                    .ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(900.0, t + 0.3)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.4).ok();
            }

            for (i, freq) in [80.0, 60.0, 40.0].iter().enumerate() {
                let hit = t + 0.2 + i as f64 * 0.06;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                    gain.gain().set_value_at_time(vol * 0.5, hit).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, hit + 0.5)
                        .ok();
                    osc.start_with_when(hit).ok();
                    osc.stop_with_when(hit + 0.55).ok();
                }
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::{SoundEffect, mix_volume};

    /// Headless stand-in: counts cues instead of playing them
    #[derive(Debug)]
    pub struct AudioManager {
        master_volume: f32,
        sfx_volume: f32,
        muted: bool,
        played: usize,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            Self {
                master_volume: 0.8,
                sfx_volume: 1.0,
                muted: false,
                played: 0,
            }
        }

        pub fn set_master_volume(&mut self, vol: f32) {
            self.master_volume = vol.clamp(0.0, 1.0);
        }

        pub fn set_sfx_volume(&mut self, vol: f32) {
            self.sfx_volume = vol.clamp(0.0, 1.0);
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        pub fn play(&mut self, effect: SoundEffect) {
            if mix_volume(self.master_volume, self.sfx_volume, self.muted) <= 0.0 {
                return;
            }
            log::trace!("play {}", effect.clip_name());
            self.played += 1;
        }

        /// Cues played so far
        pub fn played_count(&self) -> usize {
            self.played
        }
    }
}
