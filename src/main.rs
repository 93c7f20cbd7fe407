//! Last Ball headless runner
//!
//! Builds a session from flags (or a JSON config), drives it with a frame
//! budget and prints the outcome. The browser build goes through `web`.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use anyhow::{Context, Result, bail};
    use clap::Parser;

    use last_ball::{
        ArenaShape, FrameBudget, PhysicsPreset, RunState, Session, SimConfig, SpeedPreset, run,
    };

    #[derive(Parser, Debug)]
    #[command(about = "Run a last-ball-standing simulation headlessly", version)]
    struct Args {
        /// Number of balls (overrides the config file)
        #[arg(long)]
        balls: Option<usize>,
        /// RNG seed; defaults to the current time
        #[arg(long)]
        seed: Option<u64>,
        /// JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Physics preset: classic or gravity
        #[arg(long)]
        preset: Option<String>,
        /// Speed preset: fast or super-fast
        #[arg(long)]
        speed: Option<String>,
        /// Give up after this many ticks
        #[arg(long, default_value_t = 1_000_000)]
        max_ticks: u64,
        /// Rectangular arena as WIDTHxHEIGHT instead of the circle
        #[arg(long)]
        rect: Option<String>,
        /// Print the final snapshot as JSON
        #[arg(long)]
        json: bool,
    }

    fn parse_rect(s: &str) -> Result<ArenaShape> {
        let Some((w, h)) = s.split_once(['x', 'X']) else {
            bail!("expected WIDTHxHEIGHT, got {s:?}");
        };
        let width: f32 = w.trim().parse().with_context(|| format!("bad width {w:?}"))?;
        let height: f32 = h.trim().parse().with_context(|| format!("bad height {h:?}"))?;
        Ok(ArenaShape::Rectangular { width, height })
    }

    fn build_config(args: &Args) -> Result<SimConfig> {
        let mut config = match &args.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                SimConfig::from_json(&text)?
            }
            None => SimConfig::default(),
        };
        if let Some(n) = args.balls {
            config.ball_count = n;
        }
        if let Some(name) = &args.preset {
            config.physics = PhysicsPreset::from_name(name)
                .with_context(|| format!("unknown physics preset {name:?}"))?;
        }
        if let Some(name) = &args.speed {
            let preset = SpeedPreset::from_str(name)
                .with_context(|| format!("unknown speed preset {name:?}"))?;
            config = config.with_speed(preset);
        }
        if let Some(rect) = &args.rect {
            config.arena = parse_rect(rect)?;
        }
        Ok(config)
    }

    pub fn main() -> Result<()> {
        env_logger::init();
        let args = Args::parse();

        let config = build_config(&args)?;
        let seed = match args.seed {
            Some(seed) => seed,
            None => SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis() as u64,
        };
        log::info!("Last Ball (native) starting with seed {seed}");

        let mut session = Session::new(config, seed)?;
        session.start();
        let mut budget = FrameBudget::new(args.max_ticks);
        let ticks = run(&mut session, &mut budget);

        if args.json {
            println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
            return Ok(());
        }

        match session.state() {
            RunState::Finished => match session.winner().and_then(|id| session.ball(id)) {
                Some(ball) => println!(
                    "ball {} wins after {} ticks with {} lines and {} bounces (seed {})",
                    ball.id.0,
                    ticks,
                    ball.lines.len(),
                    ball.bounces,
                    seed
                ),
                None => println!("no survivors after {ticks} ticks (seed {seed})"),
            },
            state => println!(
                "stopped after {} ticks, {} balls left, state {} (seed {})",
                ticks,
                session.active_ball_count(),
                state.as_str(),
                seed
            ),
        }
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::main()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is in `last_ball::web`, this is just to satisfy the compiler
}
