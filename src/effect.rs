//! The frame-stepped effect interface shared by all three loops

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::Config;
use crate::core::{FxRng, Size, Surface};
use crate::field::ParticleField;
use crate::grid::GridSimulation;
use crate::lifecycle::CancelToken;
use crate::network::NodeNetwork;
use crate::theme::Theme;

/// External inputs for one frame. Passed explicitly on every call instead of
/// being looked up from page context.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    pub theme: Theme,
    /// Pointer is over the effect's container
    pub hovered: bool,
    /// Monotonic wall clock, seconds
    pub now: f64,
}

/// A self-contained animation loop owning its own points.
pub trait Effect {
    fn kind(&self) -> EffectKind;

    /// Current logical surface size.
    fn size(&self) -> Size;

    /// Surface dimensions changed. Existing points are kept as they are.
    fn resize(&mut self, size: Size);

    /// Update state, then draw the whole frame.
    fn frame(&mut self, surface: &mut dyn Surface, input: &FrameInput);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    Field,
    Network,
    Grid,
}

impl EffectKind {
    pub const ALL: &'static [EffectKind] = &[EffectKind::Field, EffectKind::Network, EffectKind::Grid];

    pub fn label(self) -> &'static str {
        match self {
            EffectKind::Field => "Particle field",
            EffectKind::Network => "Node network",
            EffectKind::Grid => "Tech grid",
        }
    }

    /// Whether the host should size the surface from the element box and
    /// device pixel ratio (`true`) or from the window viewport (`false`).
    pub fn sizes_from_element(self) -> bool {
        matches!(self, EffectKind::Network)
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EffectKind::Field => "field",
            EffectKind::Network => "network",
            EffectKind::Grid => "grid",
        };
        f.write_str(name)
    }
}

impl FromStr for EffectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "field" | "particles" | "hero" => Ok(EffectKind::Field),
            "network" | "nodes" => Ok(EffectKind::Network),
            "grid" | "techgrid" => Ok(EffectKind::Grid),
            other => Err(other.to_string()),
        }
    }
}

/// Construct an effect of the given kind.
pub fn build(kind: EffectKind, size: Size, config: &Config, rng: FxRng) -> Box<dyn Effect> {
    match kind {
        EffectKind::Field => Box::new(ParticleField::new(size, &config.field, rng)),
        EffectKind::Network => Box::new(NodeNetwork::new(size, &config.network, rng)),
        EffectKind::Grid => Box::new(GridSimulation::new(size, &config.grid, rng)),
    }
}

/// A mounted effect plus the flags hosts toggle between frames.
pub struct Scene {
    effect: Box<dyn Effect>,
    pub theme: Theme,
    pub hovered: bool,
    frames: u64,
}

impl Scene {
    pub fn new(effect: Box<dyn Effect>, theme: Theme) -> Self {
        Self { effect, theme, hovered: false, frames: 0 }
    }

    pub fn kind(&self) -> EffectKind {
        self.effect.kind()
    }

    pub fn size(&self) -> Size {
        self.effect.size()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn resize(&mut self, size: Size) {
        self.effect.resize(size);
    }

    pub fn step(&mut self, surface: &mut dyn Surface, now: f64) {
        let input = FrameInput { theme: self.theme, hovered: self.hovered, now };
        self.effect.frame(surface, &input);
        self.frames += 1;
    }

    /// Run one frame unless the owner has been torn down. Returns whether the
    /// frame ran, i.e. whether the caller should schedule the next one.
    pub fn step_if_live(&mut self, token: &CancelToken, surface: &mut dyn Surface, now: f64) -> bool {
        if token.is_cancelled() {
            trace!(kind = %self.kind(), "Frame skipped after teardown");
            return false;
        }
        self.step(surface, now);
        true
    }
}
