//! Hero particle field
//!
//! Drifting points that wrap around the viewport, joined by faint lines when
//! they come close, over three slow decorative sine waves.

use tracing::{debug, trace};

use crate::config::FieldConfig;
use crate::core::rng::{centered, uniform};
use crate::core::{fade, pairs_within, FxRng, Size, Surface, Vec2};
use crate::effect::{Effect, EffectKind, FrameInput};
use crate::theme::{colors, field_alphas};
use crate::time::FrameClock;

const WAVE_WIDTH: f64 = 3.0;
const LINK_WIDTH: f64 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub opacity: f64,
    pub size: f64,
}

pub struct ParticleField {
    size: Size,
    particles: Vec<Particle>,
    clock: FrameClock,
    config: FieldConfig,
}

impl ParticleField {
    pub fn new(size: Size, config: &FieldConfig, mut rng: FxRng) -> Self {
        let particles = (0..config.count)
            .map(|_| Particle {
                pos: Vec2::new(
                    uniform(&mut rng, 0.0, size.width),
                    uniform(&mut rng, 0.0, size.height),
                ),
                vel: Vec2::new(
                    centered(&mut rng, config.max_speed),
                    centered(&mut rng, config.max_speed),
                ),
                opacity: config.opacity.sample(&mut rng),
                size: config.size.sample(&mut rng),
            })
            .collect();

        debug!(count = config.count, width = size.width, height = size.height, "Particle field created");

        Self {
            size,
            particles,
            clock: FrameClock::new(config.time_step),
            config: config.clone(),
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn time(&self) -> f64 {
        self.clock.now()
    }

    /// Unordered pairs `(i, j)`, `i < j`, currently close enough to connect.
    pub fn connections(&self) -> Vec<(usize, usize)> {
        let positions: Vec<Vec2> = self.particles.iter().map(|p| p.pos).collect();
        pairs_within(&positions, self.config.link_distance)
            .into_iter()
            .map(|(i, j, _)| (i, j))
            .collect()
    }

    /// Advance every particle one frame and wrap it into the surface.
    fn advance(&mut self) {
        let Size { width, height } = self.size;
        for p in &mut self.particles {
            p.pos += p.vel;
            p.pos.x = wrap(p.pos.x, width);
            p.pos.y = wrap(p.pos.y, height);
        }
    }

    fn draw_waves(&self, surface: &mut dyn Surface, t: f64, base: f64, step: f64) {
        let Size { width, height } = self.size;
        let dx = self.config.wave_sample_step;
        let samples = (width / dx).ceil().max(0.0) as usize;

        for wave in 0..self.config.wave_count {
            let w = wave as f64;
            let points: Vec<Vec2> = (0..samples)
                .map(|k| {
                    let x = k as f64 * dx;
                    let y = height / 2.0
                        + (x * 0.005 + t + w * 0.5).sin() * 80.0
                        + (x * 0.003 + t * 0.8 + w).sin() * 40.0;
                    Vec2::new(x, y)
                })
                .collect();
            if points.len() < 2 {
                continue;
            }
            surface.stroke_path(&points, false, colors::TEAL.with_alpha(base - w * step), WAVE_WIDTH);
        }
    }
}

/// Wrap into `[0, extent)`; a zero extent pins to 0.
#[inline]
fn wrap(v: f64, extent: f64) -> f64 {
    if extent <= 0.0 {
        return 0.0;
    }
    let w = v.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs
    if w >= extent {
        0.0
    } else {
        w
    }
}

impl Effect for ParticleField {
    fn kind(&self) -> EffectKind {
        EffectKind::Field
    }

    fn size(&self) -> Size {
        self.size
    }

    fn resize(&mut self, size: Size) {
        debug!(width = size.width, height = size.height, "Particle field resized");
        self.size = size;
    }

    fn frame(&mut self, surface: &mut dyn Surface, input: &FrameInput) {
        let (wave_base, wave_step, link_alpha, particle_scale) = field_alphas(input.theme);

        surface.clear();
        let t = self.clock.tick();
        self.draw_waves(surface, t, wave_base, wave_step);

        self.advance();
        for p in &self.particles {
            surface.fill_circle(p.pos, p.size, colors::TEAL.with_alpha(p.opacity * particle_scale));
        }

        let positions: Vec<Vec2> = self.particles.iter().map(|p| p.pos).collect();
        let links = pairs_within(&positions, self.config.link_distance);
        for &(i, j, d) in &links {
            let alpha = fade(d, self.config.link_distance, link_alpha);
            surface.stroke_line(positions[i], positions[j], colors::TEAL.with_alpha(alpha), LINK_WIDTH);
        }

        trace!(t, links = links.len(), "Particle field frame");
    }
}
