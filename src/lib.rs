//! Landing page background effects
//!
//! Three self-contained canvas animation loops plus two small page effects:
//! - Particle field: drifting wrapped particles, proximity links, sine waves
//! - Node network: a few bouncing nodes that light up on hover
//! - Tech grid: a jittered node lattice with pulsing nodes and data packets
//! - Decrypt text and hero parallax
//!
//! The simulations draw through [`core::Surface`], so the same code runs on a
//! browser canvas (`wasm` feature), in a native egui window (`preview`) and
//! headless (`cli`, tests).

pub mod config;
pub mod core;
pub mod decrypt;
pub mod effect;
pub mod error;
pub mod field;
pub mod grid;
pub mod lifecycle;
pub mod network;
pub mod parallax;
pub mod theme;
pub mod time;

#[cfg(feature = "preview")]
pub mod app;

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
mod web;

pub use config::Config;
pub use effect::{Effect, EffectKind, FrameInput, Scene};
pub use error::{ConfigError, MountError};
pub use theme::Theme;
