//! Browser bindings
//!
//! A JS host engine owns the scene graph and the frame loop. Each frame it
//! calls [`WasmGame::tick`] with the elapsed time and a packed key bitfield
//! (see [`TickInput`]), then reads back the HUD and the frame's events as
//! JSON to update its entities.

use wasm_bindgen::prelude::*;

use crate::audio::{AudioManager, SoundEffect};
use crate::consts::MAX_FRAME_DT;
use crate::sim::events::push_bounded;
use crate::sim::{GameEvent, GameState, TickInput, tick};
use crate::tuning::Tuning;
use crate::ui::{Hud, particle_views};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }
    log::info!("Cube Arena module loaded");
}

fn to_js_err(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// One running match plus its audio output
#[wasm_bindgen]
pub struct WasmGame {
    state: GameState,
    audio: AudioManager,
    pending: Vec<GameEvent>,
}

#[wasm_bindgen]
impl WasmGame {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> WasmGame {
        Self::with_state(GameState::new(seed))
    }

    /// Seeded from the page clock
    #[wasm_bindgen(js_name = fromClock)]
    pub fn from_clock() -> WasmGame {
        let seed = js_sys::Date::now() as u64;
        log::info!("Game initialized with seed: {}", seed);
        Self::new(seed)
    }

    /// Start a match with tuning overrides given as JSON
    #[wasm_bindgen(js_name = withTuning)]
    pub fn with_tuning(seed: u64, tuning_json: &str) -> Result<WasmGame, JsValue> {
        let tuning = Tuning::from_json(tuning_json).map_err(to_js_err)?;
        let state = GameState::with_tuning(seed, tuning).map_err(to_js_err)?;
        Ok(Self::with_state(state))
    }

    /// Advance one rendered frame
    pub fn tick(&mut self, dt: f32, bits: u8) {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        let input = TickInput::from_bits(bits);
        tick(&mut self.state, &input, dt);

        for event in self.state.drain_events() {
            if let Some(effect) = SoundEffect::for_event(&event) {
                self.audio.play(effect);
            }
            push_bounded(&mut self.pending, event);
        }
    }

    #[wasm_bindgen(js_name = hudJson)]
    pub fn hud_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&Hud::from_state(&self.state)).map_err(to_js_err)
    }

    /// Debris quads sampled at the current sim time
    #[wasm_bindgen(js_name = particlesJson)]
    pub fn particles_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&particle_views(&self.state)).map_err(to_js_err)
    }

    #[wasm_bindgen(js_name = stateJson)]
    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state).map_err(to_js_err)
    }

    /// Events since the last call, oldest first
    #[wasm_bindgen(js_name = drainEventsJson)]
    pub fn drain_events_json(&mut self) -> Result<String, JsValue> {
        let json = serde_json::to_string(&self.pending).map_err(to_js_err)?;
        self.pending.clear();
        Ok(json)
    }

    #[wasm_bindgen(js_name = setMuted)]
    pub fn set_muted(&mut self, muted: bool) {
        self.audio.set_muted(muted);
    }

    #[wasm_bindgen(js_name = setVolume)]
    pub fn set_volume(&mut self, master: f32, sfx: f32) {
        self.audio.set_master_volume(master);
        self.audio.set_sfx_volume(sfx);
    }

    #[wasm_bindgen(js_name = isOver)]
    pub fn is_over(&self) -> bool {
        !self.state.match_state.is_active()
    }
}

impl WasmGame {
    fn with_state(state: GameState) -> Self {
        Self {
            state,
            audio: AudioManager::new(),
            pending: Vec::new(),
        }
    }
}
