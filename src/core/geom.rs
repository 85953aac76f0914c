//! Pixel-space geometry shared by every effect.

use std::ops::{Add, AddAssign, Mul, Sub};

/// Logical (CSS pixel) size of a drawing surface.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Logical size from a physical backing-store size and a device pixel ratio.
    pub fn from_physical(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        let dpr = if device_pixel_ratio > 0.0 { device_pixel_ratio } else { 1.0 };
        Self::new(width / dpr, height / dpr)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Position or velocity in pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2::new(0.0, 0.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    #[inline]
    pub fn distance(self, other: Vec2) -> f64 {
        (self - other).length()
    }

    /// Linear interpolation, `t = 0` is `self`, `t = 1` is `other`.
    #[inline]
    pub fn lerp(self, other: Vec2, t: f64) -> Vec2 {
        self + (other - self) * t
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Every unordered pair `(i, j)`, `i < j`, whose distance is below `threshold`.
///
/// The O(n²) scan is fine for the few dozen points a decorative layer carries.
pub fn pairs_within(points: &[Vec2], threshold: f64) -> Vec<(usize, usize, f64)> {
    let mut out = Vec::new();
    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            let d = points[i].distance(points[j]);
            if d < threshold {
                out.push((i, j, d));
            }
        }
    }
    out
}

/// Opacity that fades linearly from `alpha` at distance 0 to 0 at `threshold`.
#[inline]
pub fn fade(distance: f64, threshold: f64, alpha: f64) -> f64 {
    (1.0 - distance / threshold).max(0.0) * alpha
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_within_is_strict_and_ordered() {
        let pts = [Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0), Vec2::new(100.0, 0.0)];
        let pairs = pairs_within(&pts, 5.0);
        assert!(pairs.is_empty(), "distance equal to threshold must not connect");

        let pairs = pairs_within(&pts, 5.5);
        assert_eq!(pairs.len(), 1);
        assert_eq!((pairs[0].0, pairs[0].1), (0, 1));
        assert!((pairs[0].2 - 5.0).abs() < 1e-12);
    }

    #[test]
    fn fade_is_linear_and_clamped() {
        assert!((fade(0.0, 120.0, 0.4) - 0.4).abs() < 1e-12);
        assert!((fade(60.0, 120.0, 0.4) - 0.2).abs() < 1e-12);
        assert_eq!(fade(200.0, 120.0, 0.4), 0.0);
    }

    #[test]
    fn physical_size_divides_by_ratio() {
        let s = Size::from_physical(1600.0, 900.0, 2.0);
        assert_eq!(s, Size::new(800.0, 450.0));
        // Nonsense ratios fall back to 1
        assert_eq!(Size::from_physical(10.0, 10.0, 0.0), Size::new(10.0, 10.0));
    }
}
