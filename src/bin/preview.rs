//! Native preview window for the landing page effects
//!
//! Run with: cargo run --features preview --bin fx-preview
//!
//! `FX_SEED` fixes the random seed, `FX_CONFIG` points at a JSON config file.

use landing_fx::app::PreviewApp;
use landing_fx::config::Config;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,landing_fx=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let config = match std::env::var("FX_CONFIG") {
        Ok(path) => {
            info!(path = %path, "Loading config");
            Config::load(&path)?
        }
        Err(_) => Config::default(),
    };

    let seed = match std::env::var("FX_SEED") {
        Ok(raw) => match raw.parse::<u64>() {
            Ok(seed) => Some(seed),
            Err(e) => {
                warn!(value = %raw, error = %e, "Ignoring FX_SEED");
                None
            }
        },
        Err(_) => None,
    };

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("landing-fx preview")
            .with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };

    eframe::run_native(
        "landing-fx preview",
        options,
        Box::new(move |cc| Ok(Box::new(PreviewApp::new(cc, config, seed)))),
    )?;
    Ok(())
}
