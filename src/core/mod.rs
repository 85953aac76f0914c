//! Platform-agnostic core - shared between the browser, preview and CLI hosts

pub mod geom;
pub mod rng;
pub mod surface;

pub use geom::{fade, pairs_within, Size, Vec2};
pub use rng::{seeded, FxRng};
pub use surface::{sample_stops, DrawCmd, Recorder, Rgba, Stop, Surface};
