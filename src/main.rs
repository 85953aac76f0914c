//! Headless runner for the landing page effects
//!
//! Steps one effect for a number of frames against a recording surface and
//! logs what it drew. Run with: cargo run --features cli --bin fx-cli -- grid

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use clap::Parser;
    use landing_fx::config::Config;
    use landing_fx::core::{rng, DrawCmd, Recorder, Size};
    use landing_fx::effect::{Effect, EffectKind, FrameInput};
    use landing_fx::field::ParticleField;
    use landing_fx::grid::GridSimulation;
    use landing_fx::network::NodeNetwork;
    use landing_fx::theme::Theme;
    use tracing::{debug, info};
    use tracing_subscriber::{fmt, EnvFilter};

    #[derive(Parser, Debug)]
    #[command(name = "fx-cli", about = "Run a landing page effect headless")]
    struct Args {
        /// Effect to run: field, network or grid
        kind: EffectKind,
        #[arg(long, default_value_t = 600)]
        frames: u64,
        /// Fixed seed; OS entropy when omitted
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value_t = 1200.0, value_parser = parse_extent)]
        width: f64,
        #[arg(long, default_value_t = 800.0, value_parser = parse_extent)]
        height: f64,
        /// JSON file overriding the default tuning
        #[arg(long)]
        config: Option<std::path::PathBuf>,
        /// Run with the pointer over the container
        #[arg(long)]
        hover: bool,
        #[arg(long)]
        light: bool,
    }

    fn parse_extent(raw: &str) -> Result<f64, String> {
        let v: f64 = raw.parse().map_err(|e| format!("{e}"))?;
        if v.is_finite() && v > 0.0 {
            Ok(v)
        } else {
            Err(format!("expected a positive finite pixel size, got {raw}"))
        }
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,landing_fx=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let rng = match args.seed {
        Some(seed) => rng::seeded(seed),
        None => rng::from_entropy(),
    };
    let size = Size::new(args.width, args.height);
    let theme = Theme::from_dark(!args.light);

    info!(kind = %args.kind, frames = args.frames, ?size, seed = ?args.seed, "Running effect");

    // Concrete types so the grid's counters stay reachable.
    let mut field;
    let mut network;
    let mut grid: Option<GridSimulation> = None;
    let effect: &mut dyn Effect = match args.kind {
        EffectKind::Field => {
            field = ParticleField::new(size, &config.field, rng);
            &mut field
        }
        EffectKind::Network => {
            network = NodeNetwork::new(size, &config.network, rng);
            &mut network
        }
        EffectKind::Grid => grid.insert(GridSimulation::new(size, &config.grid, rng)),
    };

    let mut surface = Recorder::new(size);
    let (mut lines, mut circles, mut glows, mut texts, mut paths) = (0u64, 0u64, 0u64, 0u64, 0u64);
    for frame in 0..args.frames {
        let input = FrameInput { theme, hovered: args.hover, now: frame as f64 / 60.0 };
        effect.frame(&mut surface, &input);
        for cmd in surface.take() {
            match cmd {
                DrawCmd::Line { .. } => lines += 1,
                DrawCmd::Circle { .. } => circles += 1,
                DrawCmd::Glow { .. } => glows += 1,
                DrawCmd::Text { .. } => texts += 1,
                DrawCmd::Path { .. } => paths += 1,
                DrawCmd::Clear | DrawCmd::Gradient { .. } => {}
            }
        }
        if frame % 60 == 59 {
            debug!(frame = frame + 1, lines, circles, "progress");
        }
    }

    let per_frame = |n: u64| format!("{:.1}", n as f64 / args.frames.max(1) as f64);
    info!(
        lines = per_frame(lines),
        circles = per_frame(circles),
        glows = per_frame(glows),
        texts = per_frame(texts),
        paths = per_frame(paths),
        "draw calls per frame"
    );

    if let Some(grid) = &grid {
        let stats = grid.stats();
        info!(
            nodes = stats.nodes,
            edges = stats.edges,
            active = stats.active,
            packets = stats.packets,
            spawned = stats.spawned,
            expired = stats.expired,
            spawn_attempts = stats.spawn_attempts,
            spawn_skipped = stats.spawn_skipped,
            flips = stats.flips,
            "grid stats"
        );
    }
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {}
