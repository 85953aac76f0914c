//! Lattice node: drift, pulse and the active/inactive timer

use rand::Rng;

use crate::config::{GridConfig, Span};
use crate::core::rng::{centered, uniform};
use crate::core::{FxRng, Size, Vec2};

/// Growth of the drawn radius at the top of a pulse, px.
const PULSE_GROWTH: f64 = 1.5;

#[derive(Clone, Debug, PartialEq)]
pub struct GridNode {
    pub pos: Vec2,
    /// Lattice position the node is slowly pulled back to
    pub base: Vec2,
    pub vel: Vec2,
    pub radius: f64,
    pub pulse_phase: f64,
    pub pulse_speed: f64,
    pub active: bool,
    /// Frames until the next state flip
    pub timer: f64,
    /// Indices of adjacent nodes, fixed at construction
    pub neighbors: Vec<usize>,
}

impl GridNode {
    pub(super) fn new(pos: Vec2, config: &GridConfig, rng: &mut FxRng) -> Self {
        Self {
            pos,
            base: pos,
            vel: Vec2::new(centered(rng, config.max_speed), centered(rng, config.max_speed)),
            radius: config.radius.sample(rng),
            pulse_phase: uniform(rng, 0.0, std::f64::consts::TAU),
            pulse_speed: config.pulse_speed.sample(rng),
            active: rng.gen::<f64>() < config.initial_active_chance,
            timer: uniform(rng, 0.0, config.initial_timer_max),
            neighbors: Vec::new(),
        }
    }

    /// Pulse level in [0, 1].
    #[inline]
    pub fn pulse(&self) -> f64 {
        self.pulse_phase.sin() * 0.5 + 0.5
    }

    #[inline]
    pub fn current_radius(&self) -> f64 {
        self.radius + self.pulse() * PULSE_GROWTH
    }

    /// Integrate velocity, bounce off the margin box, pull towards the lattice
    /// position and keep the node inside the box.
    pub(super) fn drift(&mut self, bounds: &Bounds, restoring: f64) {
        self.pos += self.vel;
        if self.pos.x < bounds.min.x || self.pos.x > bounds.max.x {
            self.vel.x = -self.vel.x;
        }
        if self.pos.y < bounds.min.y || self.pos.y > bounds.max.y {
            self.vel.y = -self.vel.y;
        }
        self.pos += (self.base - self.pos) * restoring;
        self.pos = bounds.clamp(self.pos);
        self.pulse_phase += self.pulse_speed;
    }

    /// Count the activation timer down one frame. On expiry the node flips
    /// state and draws a fresh dwell time from `reset`. Returns whether it
    /// flipped.
    pub(super) fn tick_timer(&mut self, reset: Span, rng: &mut FxRng) -> bool {
        self.timer -= 1.0;
        if self.timer <= 0.0 {
            self.active = !self.active;
            self.timer = reset.sample(rng);
            return true;
        }
        false
    }
}

/// Box nodes are kept in: the surface inset by the margin on every side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    /// Inset `size` by `margin`. An axis too short for two margins collapses
    /// to its midpoint.
    pub fn inset(size: Size, margin: f64) -> Self {
        let axis = |extent: f64| {
            if extent - margin >= margin {
                (margin, extent - margin)
            } else {
                let mid = extent.max(0.0) / 2.0;
                (mid, mid)
            }
        };
        let (x0, x1) = axis(size.width);
        let (y0, y1) = axis(size.height);
        Self { min: Vec2::new(x0, y0), max: Vec2::new(x1, y1) }
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    #[inline]
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x.clamp(self.min.x, self.max.x), p.y.clamp(self.min.y, self.max.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::seeded;

    fn node_at(x: f64, y: f64) -> GridNode {
        let mut rng = seeded(1);
        GridNode::new(Vec2::new(x, y), &GridConfig::default(), &mut rng)
    }

    #[test]
    fn timer_flips_state_and_resets_into_range() {
        let mut rng = seeded(2);
        let reset = Span::new(50.0, 200.0);
        let mut node = node_at(100.0, 100.0);
        node.timer = 2.5;
        let was = node.active;

        assert!(!node.tick_timer(reset, &mut rng));
        assert_eq!(node.timer, 1.5);
        assert!(!node.tick_timer(reset, &mut rng));
        assert!(node.tick_timer(reset, &mut rng), "0.5 - 1 <= 0 must flip");
        assert_eq!(node.active, !was);
        assert!(reset.contains(node.timer), "reset timer {} outside [50, 200)", node.timer);
    }

    #[test]
    fn timer_is_never_left_negative() {
        let mut rng = seeded(3);
        let reset = Span::new(50.0, 200.0);
        let mut node = node_at(100.0, 100.0);
        for _ in 0..10_000 {
            let flipped = node.tick_timer(reset, &mut rng);
            assert!(node.timer > 0.0);
            if flipped {
                assert!(reset.contains(node.timer));
            }
        }
    }

    #[test]
    fn bounds_inset_and_collapse() {
        let b = Bounds::inset(Size::new(1200.0, 800.0), 50.0);
        assert_eq!(b.min, Vec2::new(50.0, 50.0));
        assert_eq!(b.max, Vec2::new(1150.0, 750.0));

        let tiny = Bounds::inset(Size::new(60.0, 800.0), 50.0);
        assert_eq!(tiny.min.x, 30.0);
        assert_eq!(tiny.max.x, 30.0);
    }

    #[test]
    fn drift_pulls_outside_nodes_into_the_box() {
        let bounds = Bounds::inset(Size::new(400.0, 300.0), 50.0);
        let mut node = node_at(-20.0, 500.0);
        node.drift(&bounds, 0.001);
        assert!(bounds.contains(node.pos), "{:?}", node.pos);
    }

    #[test]
    fn drift_restores_towards_base() {
        let bounds = Bounds::inset(Size::new(1000.0, 1000.0), 50.0);
        let mut node = node_at(500.0, 500.0);
        node.vel = Vec2::ZERO;
        node.pos = Vec2::new(600.0, 500.0);
        node.drift(&bounds, 0.001);
        assert!((node.pos.x - 599.9).abs() < 1e-9);
        assert_eq!(node.pos.y, 500.0);
    }

    #[test]
    fn pulse_grows_radius_by_at_most_growth() {
        let mut node = node_at(0.0, 0.0);
        for k in 0..64 {
            node.pulse_phase = k as f64 * 0.1;
            let r = node.current_radius();
            assert!(r >= node.radius && r <= node.radius + PULSE_GROWTH);
        }
    }
}
