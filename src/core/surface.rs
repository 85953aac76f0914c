//! Drawing surface abstraction
//!
//! Effects only ever talk to a [`Surface`]. The browser host implements it on a
//! 2D canvas context, the preview host on an egui painter, and [`Recorder`]
//! keeps a display list so tests and the CLI can inspect what a frame drew.

use super::geom::{Size, Vec2};

/// Straight (non-premultiplied) color with a fractional alpha, as used by
/// CSS `rgba()`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with its alpha replaced (clamped to [0, 1]).
    #[inline]
    pub fn with_alpha(self, a: f64) -> Self {
        Self { a: a.clamp(0.0, 1.0), ..self }
    }

    /// CSS color string, e.g. `rgba(93, 190, 189, 0.4)`.
    pub fn css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// One color stop of a gradient, `offset` in [0, 1].
pub type Stop = (f64, Rgba);

/// Color of a gradient at offset `t`, for backends without native
/// gradients. Stops must be sorted by offset.
pub fn sample_stops(stops: &[Stop], t: f64) -> Rgba {
    let Some(&(first_at, first)) = stops.first() else {
        return Rgba::rgba(0, 0, 0, 0.0);
    };
    if t <= first_at {
        return first;
    }
    for pair in stops.windows(2) {
        let ((a_at, a), (b_at, b)) = (pair[0], pair[1]);
        if t <= b_at {
            let span = b_at - a_at;
            let k = if span > 0.0 { (t - a_at) / span } else { 1.0 };
            let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * k).round() as u8;
            return Rgba::rgba(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b), a.a + (b.a - a.a) * k);
        }
    }
    stops[stops.len() - 1].1
}

pub trait Surface {
    /// Logical size of the drawable area.
    fn size(&self) -> Size;

    fn clear(&mut self);

    /// Fill the whole surface with a top-to-bottom linear gradient.
    fn fill_vertical_gradient(&mut self, stops: &[Stop]);

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Rgba, width: f64);

    /// Stroke a polyline, optionally closing it back to the first point.
    fn stroke_path(&mut self, points: &[Vec2], closed: bool, color: Rgba, width: f64);

    fn fill_circle(&mut self, center: Vec2, radius: f64, color: Rgba);

    /// Fill a circle with a radial gradient from its center outwards.
    fn fill_glow(&mut self, center: Vec2, radius: f64, stops: &[Stop]);

    /// Monospace text with its baseline at `pos`.
    fn fill_text(&mut self, text: &str, pos: Vec2, size_px: f64, color: Rgba);
}

/// A recorded draw call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCmd {
    Clear,
    Gradient { stops: Vec<Stop> },
    Line { from: Vec2, to: Vec2, color: Rgba, width: f64 },
    Path { points: Vec<Vec2>, closed: bool, color: Rgba, width: f64 },
    Circle { center: Vec2, radius: f64, color: Rgba },
    Glow { center: Vec2, radius: f64, stops: Vec<Stop> },
    Text { text: String, pos: Vec2, size_px: f64, color: Rgba },
}

/// Headless surface that records every draw call.
#[derive(Debug, Default)]
pub struct Recorder {
    size: Size,
    commands: Vec<DrawCmd>,
}

impl Recorder {
    pub fn new(size: Size) -> Self {
        Self { size, commands: Vec::new() }
    }

    pub fn commands(&self) -> &[DrawCmd] {
        &self.commands
    }

    /// Drain the display list, e.g. between frames.
    pub fn take(&mut self) -> Vec<DrawCmd> {
        std::mem::take(&mut self.commands)
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCmd> {
        self.commands.iter().filter(|c| matches!(c, DrawCmd::Line { .. }))
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCmd> {
        self.commands.iter().filter(|c| matches!(c, DrawCmd::Circle { .. }))
    }

    pub fn glows(&self) -> impl Iterator<Item = &DrawCmd> {
        self.commands.iter().filter(|c| matches!(c, DrawCmd::Glow { .. }))
    }

    pub fn texts(&self) -> impl Iterator<Item = &DrawCmd> {
        self.commands.iter().filter(|c| matches!(c, DrawCmd::Text { .. }))
    }

    pub fn paths(&self) -> impl Iterator<Item = &DrawCmd> {
        self.commands.iter().filter(|c| matches!(c, DrawCmd::Path { .. }))
    }
}

impl Surface for Recorder {
    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self) {
        self.commands.push(DrawCmd::Clear);
    }

    fn fill_vertical_gradient(&mut self, stops: &[Stop]) {
        self.commands.push(DrawCmd::Gradient { stops: stops.to_vec() });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Rgba, width: f64) {
        self.commands.push(DrawCmd::Line { from, to, color, width });
    }

    fn stroke_path(&mut self, points: &[Vec2], closed: bool, color: Rgba, width: f64) {
        self.commands.push(DrawCmd::Path { points: points.to_vec(), closed, color, width });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f64, color: Rgba) {
        self.commands.push(DrawCmd::Circle { center, radius, color });
    }

    fn fill_glow(&mut self, center: Vec2, radius: f64, stops: &[Stop]) {
        self.commands.push(DrawCmd::Glow { center, radius, stops: stops.to_vec() });
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, size_px: f64, color: Rgba) {
        self.commands.push(DrawCmd::Text { text: text.to_string(), pos, size_px, color });
    }
}
