//! Data packets travelling along one grid edge

use crate::core::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Packet {
    /// Index of the source node
    pub from: usize,
    /// Index of the destination node, adjacent to `from`
    pub to: usize,
    /// Fraction of the edge covered, starts at 0
    pub progress: f64,
    /// Progress added per frame
    pub speed: f64,
}

impl Packet {
    pub fn new(from: usize, to: usize, speed: f64) -> Self {
        Self { from, to, progress: 0.0, speed }
    }

    /// Advance one frame; `false` once the packet has arrived.
    #[inline]
    pub fn advance(&mut self) -> bool {
        self.progress += self.speed;
        !self.arrived()
    }

    #[inline]
    pub fn arrived(&self) -> bool {
        self.progress >= 1.0
    }

    /// Position between the current endpoint positions.
    #[inline]
    pub fn position(&self, from: Vec2, to: Vec2) -> Vec2 {
        from.lerp(to, self.progress)
    }
}
