//! Cube Arena entry point
//!
//! Native builds run a headless match on autopilot and print the final HUD.
//! The browser build is driven through `cube_arena::wasm::WasmGame`.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use anyhow::{Context, Result, bail};

    use cube_arena::audio::{AudioManager, SoundEffect};
    use cube_arena::consts::{FRAME_DT, MAX_FRAME_DT};
    use cube_arena::sim::{GameEvent, GameState, TickInput, tick};
    use cube_arena::{Hud, Tuning};

    /// Command line options
    #[derive(Debug)]
    pub struct Args {
        pub tuning: Option<PathBuf>,
        pub seed: u64,
        /// Frame cap; by default the match runs until the timer ends
        pub frames: Option<u64>,
        pub dt: f32,
    }

    impl Default for Args {
        fn default() -> Self {
            Self {
                tuning: None,
                seed: 0,
                frames: None,
                dt: FRAME_DT,
            }
        }
    }

    impl Args {
        pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
            let mut out = Args::default();
            let mut args = args.into_iter();
            while let Some(flag) = args.next() {
                let mut value = || {
                    args.next()
                        .with_context(|| format!("missing value for {flag}"))
                };
                match flag.as_str() {
                    "--tuning" => out.tuning = Some(PathBuf::from(value()?)),
                    "--seed" => {
                        out.seed = value()?.parse().context("--seed expects an integer")?
                    }
                    "--frames" => {
                        out.frames = Some(value()?.parse().context("--frames expects an integer")?)
                    }
                    "--dt" => {
                        let dt: f32 = value()?.parse().context("--dt expects seconds")?;
                        if !(dt > 0.0 && dt <= MAX_FRAME_DT) {
                            bail!("--dt must be in (0, {MAX_FRAME_DT}], got {dt}");
                        }
                        out.dt = dt;
                    }
                    other => bail!("unknown argument: {other}"),
                }
            }
            Ok(out)
        }
    }

    fn load_tuning(args: &Args) -> Result<Tuning> {
        let Some(path) = &args.tuning else {
            return Ok(Tuning::default());
        };
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading tuning file {}", path.display()))?;
        let tuning = Tuning::from_json(&json)
            .with_context(|| format!("parsing tuning file {}", path.display()))?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    fn report(event: &GameEvent, audio: &mut AudioManager) {
        if let Some(effect) = SoundEffect::for_event(event) {
            audio.play(effect);
            return;
        }
        match event {
            GameEvent::ObstacleDestroyed { id, points } => {
                log::debug!("obstacle {id} destroyed (+{points})")
            }
            GameEvent::GameOver { score } => log::info!("Game over, final score {score}"),
            other => log::trace!("{other:?}"),
        }
    }

    pub fn run() -> Result<()> {
        let args = Args::parse(std::env::args().skip(1))?;
        let tuning = load_tuning(&args)?;

        let mut state = GameState::with_tuning(args.seed, tuning)?;
        let mut audio = AudioManager::new();
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };

        log::info!("Running headless match (seed {}, dt {:.4})", args.seed, args.dt);

        let mut frames = 0u64;
        while state.match_state.is_active() && args.frames.is_none_or(|cap| frames < cap) {
            tick(&mut state, &input, args.dt);
            for event in state.drain_events() {
                report(&event, &mut audio);
            }
            frames += 1;
        }

        let hud = Hud::from_state(&state);
        log::info!(
            "Finished after {} frames ({:.1}s sim), {} attack cues, {} face turns",
            frames,
            state.time,
            audio.played_count(),
            state.shell.turns
        );
        println!(
            "{}",
            serde_json::to_string_pretty(&hud).context("serializing HUD")?
        );
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Cube Arena (native) starting...");
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is cube_arena::wasm::start, this is just to satisfy the compiler
}
