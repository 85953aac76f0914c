//! Scroll and pointer parallax.
//!
//! Hero background: the grid layer follows scroll, the two glow orbs follow
//! the pointer in opposite directions and breathe slowly. Sections: layers
//! drift and bob with how far the section has scrolled past the top.

use crate::core::Vec2;

const SCROLL_SHIFT: f64 = 0.8;
const SCROLL_ZOOM: f64 = 0.0005;
const POINTER_SHIFT: f64 = 0.05;
const BREATH: f64 = 0.1;

/// CSS `translate(..) scale(..)` for one layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerTransform {
    pub translate: Vec2,
    pub scale: f64,
}

impl LayerTransform {
    pub fn css(&self) -> String {
        format!(
            "translate({}px, {}px) scale({})",
            self.translate.x, self.translate.y, self.scale
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Parallax {
    pub scroll_y: f64,
    pub pointer: Vec2,
}

impl Parallax {
    pub fn grid(&self) -> LayerTransform {
        LayerTransform {
            translate: Vec2::new(0.0, self.scroll_y * SCROLL_SHIFT),
            scale: 1.0 + self.scroll_y * SCROLL_ZOOM,
        }
    }

    /// Leading orb, `now_ms` is wall-clock milliseconds.
    pub fn primary_orb(&self, now_ms: f64) -> LayerTransform {
        LayerTransform {
            translate: self.pointer * POINTER_SHIFT,
            scale: 1.0 + (now_ms * 0.001).sin() * BREATH,
        }
    }

    pub fn secondary_orb(&self, now_ms: f64) -> LayerTransform {
        LayerTransform {
            translate: self.pointer * -POINTER_SHIFT,
            scale: 1.0 + (now_ms * 0.001).cos() * BREATH,
        }
    }
}

/// How far a section has scrolled past the viewport top, in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SectionScroll {
    progress: f64,
}

impl SectionScroll {
    /// From the section's bounding rect: `clamp(-top / height, 0, 1)`.
    pub fn from_rect(top: f64, height: f64) -> Self {
        let progress = if height > 0.0 { (-top / height).clamp(0.0, 1.0) } else { 0.0 };
        Self { progress }
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Vertical offset for one layer: a linear drift of `motion.drift` px
    /// over the whole section plus a sine bob of `motion.bob` px.
    pub fn layer(&self, motion: LayerMotion) -> LayerTransform {
        let p = self.progress;
        let y = p * motion.drift + ((p + motion.phase) * SECTION_BOB_FREQ).sin() * motion.bob;
        LayerTransform { translate: Vec2::new(0.0, y), scale: 1.0 }
    }
}

const SECTION_BOB_FREQ: f64 = 3.0;

/// Per-layer section motion, read from the element's data attributes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayerMotion {
    pub drift: f64,
    pub bob: f64,
    pub phase: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_moves_and_zooms_grid() {
        let p = Parallax { scroll_y: 1000.0, ..Default::default() };
        let t = p.grid();
        assert_eq!(t.translate, Vec2::new(0.0, 800.0));
        assert!((t.scale - 1.5).abs() < 1e-12);
    }

    #[test]
    fn orbs_mirror_the_pointer() {
        let p = Parallax { pointer: Vec2::new(200.0, -100.0), ..Default::default() };
        assert_eq!(p.primary_orb(0.0).translate, Vec2::new(10.0, -5.0));
        assert_eq!(p.secondary_orb(0.0).translate, Vec2::new(-10.0, 5.0));
        assert_eq!(p.primary_orb(0.0).scale, 1.0);
        assert!((p.secondary_orb(0.0).scale - 1.1).abs() < 1e-12);
    }

    #[test]
    fn css_is_a_transform_list() {
        let t = LayerTransform { translate: Vec2::new(1.5, -2.0), scale: 1.25 };
        assert_eq!(t.css(), "translate(1.5px, -2px) scale(1.25)");
    }

    #[test]
    fn section_progress_clamps_to_unit_range() {
        assert_eq!(SectionScroll::from_rect(200.0, 800.0).progress(), 0.0);
        assert_eq!(SectionScroll::from_rect(-400.0, 800.0).progress(), 0.5);
        assert_eq!(SectionScroll::from_rect(-2000.0, 800.0).progress(), 1.0);
        assert_eq!(SectionScroll::from_rect(-100.0, 0.0).progress(), 0.0);
    }

    #[test]
    fn section_layers_drift_and_bob() {
        let half = SectionScroll::from_rect(-400.0, 800.0);
        let drift = half.layer(LayerMotion { drift: -80.0, ..Default::default() });
        assert_eq!(drift.translate, Vec2::new(0.0, -40.0));
        assert_eq!(drift.scale, 1.0);

        let bob = half.layer(LayerMotion { bob: 15.0, ..Default::default() });
        assert!((bob.translate.y - (1.5f64).sin() * 15.0).abs() < 1e-12);

        let phased = SectionScroll::default().layer(LayerMotion { bob: 10.0, phase: 0.1, ..Default::default() });
        assert!((phased.translate.y - (0.3f64).sin() * 10.0).abs() < 1e-12);
    }
}
