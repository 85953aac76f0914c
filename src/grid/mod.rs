//! Full-page tech grid
//!
//! A jittered lattice of nodes with adjacency fixed at mount time. Nodes blink
//! between active and idle on independent random timers, and every
//! `spawn_period` frames a packet leaves a random active node towards one of
//! its neighbours. A static hex tiling and drifting code glyphs sit behind.

mod decor;
mod node;
mod packet;

pub use decor::{glyph_position, hex_lattice};
pub use node::{Bounds, GridNode};
pub use packet::Packet;

use tracing::{debug, trace};

use crate::config::GridConfig;
use crate::core::rng::{centered, pick};
use crate::core::{fade, FxRng, Size, Surface, Vec2};
use crate::effect::{Effect, EffectKind, FrameInput};
use crate::theme::{colors, grid_background};
use crate::time::FrameClock;

const EDGE_ALPHA: f64 = 0.3;
const HEX_ALPHA: f64 = 0.08;
const GLYPH_ALPHA: f64 = 0.15;
const GLYPH_PX: f64 = 10.0;
const GLOW_SCALE: f64 = 4.0;
const PACKET_GLOW: f64 = 8.0;
const PACKET_CORE: f64 = 3.0;
/// Per axis. Adjacency is built pairwise, so the node count must stay small.
const MAX_LATTICE_CELLS: f64 = 400.0;

/// Running counters, for the CLI and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GridStats {
    pub nodes: usize,
    pub edges: usize,
    pub active: usize,
    pub packets: usize,
    pub spawned: u64,
    pub expired: u64,
    pub spawn_attempts: u64,
    pub spawn_skipped: u64,
    pub flips: u64,
}

pub struct GridSimulation {
    size: Size,
    nodes: Vec<GridNode>,
    /// Unordered adjacency pairs `(i, j)`, `i < j`
    edges: Vec<(usize, usize)>,
    packets: Vec<Packet>,
    hexes: Vec<[Vec2; 6]>,
    clock: FrameClock,
    spawn_clock: u32,
    stats: GridStats,
    config: GridConfig,
    rng: FxRng,
}

impl GridSimulation {
    pub fn new(size: Size, config: &GridConfig, mut rng: FxRng) -> Self {
        let cols = lattice_span(size.width, config.spacing_x);
        let rows = lattice_span(size.height, config.spacing_y);
        let half_jitter = config.jitter / 2.0;

        let mut nodes = Vec::with_capacity(cols * rows);
        for i in 0..cols {
            for j in 0..rows {
                let pos = Vec2::new(
                    i as f64 * config.spacing_x + centered(&mut rng, half_jitter),
                    j as f64 * config.spacing_y + centered(&mut rng, half_jitter),
                );
                nodes.push(GridNode::new(pos, config, &mut rng));
            }
        }

        let edges = link(&mut nodes, config.link_distance);
        let stats = GridStats {
            nodes: nodes.len(),
            edges: edges.len(),
            active: nodes.iter().filter(|n| n.active).count(),
            ..Default::default()
        };

        debug!(
            cols,
            rows,
            nodes = nodes.len(),
            edges = edges.len(),
            active = stats.active,
            "Grid simulation created"
        );

        Self {
            size,
            nodes,
            edges,
            packets: Vec::new(),
            hexes: hex_lattice(size, config.hex_size),
            clock: FrameClock::new(config.time_step),
            spawn_clock: 0,
            stats,
            config: config.clone(),
            rng,
        }
    }

    pub fn nodes(&self) -> &[GridNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn packets(&self) -> &[Packet] {
        &self.packets
    }

    pub fn stats(&self) -> GridStats {
        self.stats
    }

    pub fn time(&self) -> f64 {
        self.clock.now()
    }

    /// Containment box for the current surface size.
    pub fn bounds(&self) -> Bounds {
        Bounds::inset(self.size, self.config.margin)
    }

    fn draw_background(&self, surface: &mut dyn Surface, input: &FrameInput) {
        let [top, mid, bottom] = grid_background(input.theme);
        surface.fill_vertical_gradient(&[(0.0, top), (0.5, mid), (1.0, bottom)]);

        let hex_color = colors::SLATE.with_alpha(HEX_ALPHA);
        for hex in &self.hexes {
            surface.stroke_path(hex, true, hex_color, 1.0);
        }
    }

    fn draw_edges(&self, surface: &mut dyn Surface) {
        for &(i, j) in &self.edges {
            let (a, b) = (&self.nodes[i], &self.nodes[j]);
            let alpha = fade(a.pos.distance(b.pos), self.config.link_distance, EDGE_ALPHA);
            if a.active && b.active {
                surface.stroke_line(a.pos, b.pos, colors::SKY.with_alpha(alpha), 1.5);
            } else {
                surface.stroke_line(a.pos, b.pos, colors::SLATE.with_alpha(alpha * 0.5), 1.0);
            }
        }
    }

    fn update_nodes(&mut self, surface: &mut dyn Surface) {
        let bounds = self.bounds();
        let mut flips = 0;
        for node in &mut self.nodes {
            node.drift(&bounds, self.config.restoring);
            if node.tick_timer(self.config.timer_reset, &mut self.rng) {
                flips += 1;
            }

            let r = node.current_radius();
            let (tint, core_alpha, stops) = if node.active {
                (colors::SKY, 1.0, [0.8, 0.3, 0.0])
            } else {
                (colors::SLATE, 0.8, [0.5, 0.15, 0.0])
            };
            surface.fill_glow(
                node.pos,
                r * GLOW_SCALE,
                &[
                    (0.0, tint.with_alpha(stops[0])),
                    (0.3, tint.with_alpha(stops[1])),
                    (1.0, tint.with_alpha(stops[2])),
                ],
            );
            surface.fill_circle(node.pos, r, tint.with_alpha(core_alpha));
        }
        self.stats.flips += flips;
        self.stats.active = self.nodes.iter().filter(|n| n.active).count();
    }

    /// Count the spawn clock; on the period boundary try to launch a packet
    /// from a random active node with neighbours.
    fn maybe_spawn(&mut self) {
        self.spawn_clock += 1;
        if self.spawn_clock < self.config.spawn_period {
            return;
        }
        self.spawn_clock = 0;
        self.stats.spawn_attempts += 1;

        let candidates: Vec<usize> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.active && !n.neighbors.is_empty())
            .map(|(i, _)| i)
            .collect();

        let Some(from) = pick(&mut self.rng, candidates.len()).map(|k| candidates[k]) else {
            self.stats.spawn_skipped += 1;
            trace!("No active connected node, packet spawn skipped");
            return;
        };
        let neighbors = &self.nodes[from].neighbors;
        let Some(to) = pick(&mut self.rng, neighbors.len()).map(|k| neighbors[k]) else {
            return;
        };

        let speed = self.config.packet_speed.sample(&mut self.rng);
        self.packets.push(Packet::new(from, to, speed));
        self.stats.spawned += 1;
        trace!(from, to, speed, "Packet spawned");
    }

    fn update_packets(&mut self, surface: &mut dyn Surface) {
        let before = self.packets.len();
        self.packets.retain_mut(|p| p.advance());
        self.stats.expired += (before - self.packets.len()) as u64;
        self.stats.packets = self.packets.len();

        for packet in &self.packets {
            let pos = packet.position(self.nodes[packet.from].pos, self.nodes[packet.to].pos);
            surface.fill_glow(
                pos,
                PACKET_GLOW,
                &[
                    (0.0, colors::SKY),
                    (0.5, colors::SKY.with_alpha(0.5)),
                    (1.0, colors::SKY.with_alpha(0.0)),
                ],
            );
            surface.fill_circle(pos, PACKET_CORE, colors::WHITE);
        }
    }

    fn draw_glyphs(&self, surface: &mut dyn Surface, t: f64) {
        if self.config.glyphs.is_empty() || self.size.is_empty() {
            return;
        }
        let color = colors::SKY.with_alpha(GLYPH_ALPHA);
        for i in 0..self.config.glyph_count {
            let glyph = &self.config.glyphs[i % self.config.glyphs.len()];
            surface.fill_text(glyph, glyph_position(i, t, self.size), GLYPH_PX, color);
        }
    }
}

/// Lattice lines needed to cover `extent`: `ceil(extent / spacing) + 2`.
/// Non-finite or negative extents get only the overscan lines.
fn lattice_span(extent: f64, spacing: f64) -> usize {
    let cells = (extent / spacing).ceil();
    let cells = if cells.is_finite() && cells > 0.0 { cells.min(MAX_LATTICE_CELLS) as usize } else { 0 };
    cells + 2
}

/// Connect every unordered pair closer than `max_distance`, recording each
/// neighbour on both ends.
fn link(nodes: &mut [GridNode], max_distance: f64) -> Vec<(usize, usize)> {
    let mut edges = Vec::new();
    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            if nodes[i].pos.distance(nodes[j].pos) < max_distance {
                edges.push((i, j));
            }
        }
    }
    for &(i, j) in &edges {
        nodes[i].neighbors.push(j);
        nodes[j].neighbors.push(i);
    }
    edges
}

impl Effect for GridSimulation {
    fn kind(&self) -> EffectKind {
        EffectKind::Grid
    }

    fn size(&self) -> Size {
        self.size
    }

    /// Only the surface changes; the lattice is not re-laid out.
    fn resize(&mut self, size: Size) {
        debug!(width = size.width, height = size.height, nodes = self.nodes.len(), "Grid resized");
        self.size = size;
        self.hexes = hex_lattice(size, self.config.hex_size);
    }

    fn frame(&mut self, surface: &mut dyn Surface, input: &FrameInput) {
        let t = self.clock.tick();

        self.draw_background(surface, input);
        self.draw_edges(surface);
        self.update_nodes(surface);
        self.maybe_spawn();
        self.update_packets(surface);
        self.draw_glyphs(surface, t);

        trace!(
            t,
            active = self.stats.active,
            packets = self.stats.packets,
            "Grid frame"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Span;
    use crate::core::{seeded, Recorder};

    fn grid(seed: u64, size: Size) -> GridSimulation {
        GridSimulation::new(size, &GridConfig::default(), seeded(seed))
    }

    fn run(sim: &mut GridSimulation, frames: usize) {
        let mut rec = Recorder::new(sim.size());
        let input = FrameInput::default();
        for _ in 0..frames {
            sim.frame(&mut rec, &input);
            rec.take();
        }
    }

    #[test]
    fn lattice_size_matches_viewport() {
        let sim = grid(1, Size::new(1200.0, 800.0));
        assert_eq!(sim.nodes().len(), 12 * 10);
        assert_eq!(sim.stats().nodes, 120);
    }

    #[test]
    fn degenerate_extents_keep_only_overscan() {
        assert_eq!(lattice_span(1200.0, 120.0), 12);
        assert_eq!(lattice_span(f64::INFINITY, 120.0), 2);
        assert_eq!(lattice_span(f64::NAN, 120.0), 2);
        assert_eq!(lattice_span(-50.0, 120.0), 2);
        assert_eq!(lattice_span(1e12, 120.0), 402);

        let sim = grid(9, Size::new(f64::INFINITY, 800.0));
        assert_eq!(sim.nodes().len(), 2 * 10);
    }

    #[test]
    fn about_a_third_start_active() {
        let sim = grid(2, Size::new(2400.0, 1600.0));
        let share = sim.stats().active as f64 / sim.nodes().len() as f64;
        assert!((0.2..0.4).contains(&share), "active share {share}");
    }

    #[test]
    fn adjacency_is_symmetric_and_fixed() {
        let mut sim = grid(3, Size::new(800.0, 600.0));
        let edges = sim.edges().to_vec();
        assert!(!edges.is_empty());
        for &(i, j) in &edges {
            assert!(i < j);
            assert!(sim.nodes()[i].neighbors.contains(&j));
            assert!(sim.nodes()[j].neighbors.contains(&i));
        }
        for (i, node) in sim.nodes().iter().enumerate() {
            for &j in &node.neighbors {
                assert!(sim.nodes()[j].neighbors.contains(&i), "{i} -> {j} is one-way");
            }
        }

        run(&mut sim, 200);
        assert_eq!(sim.edges(), &edges[..], "adjacency must not be recomputed");
    }

    #[test]
    fn one_spawn_attempt_per_period() {
        let mut sim = grid(4, Size::new(1200.0, 800.0));
        run(&mut sim, 29);
        assert_eq!(sim.stats().spawn_attempts, 0);
        run(&mut sim, 1);
        let stats = sim.stats();
        assert_eq!(stats.spawn_attempts, 1);
        assert_eq!(stats.spawned + stats.spawn_skipped, 1);
        run(&mut sim, 60);
        assert_eq!(sim.stats().spawn_attempts, 3);
    }

    #[test]
    fn no_candidates_means_no_packet() {
        let config = GridConfig { initial_active_chance: 0.0, initial_timer_max: 0.0, ..GridConfig::default() };
        let mut sim = GridSimulation::new(Size::new(1200.0, 800.0), &config, seeded(5));
        // Keep everything idle through the first spawn tick
        for node in &mut sim.nodes {
            node.active = false;
            node.timer = 1_000.0;
        }
        run(&mut sim, 30);
        let stats = sim.stats();
        assert_eq!(stats.spawn_attempts, 1);
        assert_eq!(stats.spawn_skipped, 1);
        assert!(sim.packets().is_empty());
    }

    #[test]
    fn spawned_packets_follow_an_edge_from_an_active_node() {
        let mut sim = grid(6, Size::new(1200.0, 800.0));
        for node in &mut sim.nodes {
            node.timer = 1_000.0;
        }
        run(&mut sim, 30);
        for p in sim.packets() {
            assert!(sim.nodes()[p.from].active);
            assert!(sim.nodes()[p.from].neighbors.contains(&p.to));
            assert!(Span::new(0.008, 0.02).contains(p.speed));
        }
    }

    #[test]
    fn packets_progress_monotonically_and_expire_once() {
        let config = GridConfig { spawn_period: 1, ..GridConfig::default() };
        let mut sim = GridSimulation::new(Size::new(800.0, 600.0), &config, seeded(7));
        let mut rec = Recorder::new(sim.size());
        let input = FrameInput::default();

        let mut last: Option<Packet> = None;
        let mut tracked: Option<(usize, usize, f64)> = None;
        for _ in 0..400 {
            sim.frame(&mut rec, &input);
            rec.take();
            for p in sim.packets() {
                assert!(p.progress < 1.0, "arrived packet still live: {p:?}");
            }
            // Follow the oldest packet by identity of (from, to, speed)
            let current = tracked.and_then(|(f, t, s)| {
                sim.packets().iter().find(|p| p.from == f && p.to == t && p.speed == s).copied()
            });
            match (last, current) {
                (Some(prev), Some(now)) => assert!(now.progress >= prev.progress),
                (Some(prev), None) => assert!(prev.progress + prev.speed >= 1.0, "removed early"),
                _ => {}
            }
            if current.is_none() {
                tracked = sim.packets().first().map(|p| (p.from, p.to, p.speed));
                last = sim.packets().first().copied();
            } else {
                last = current;
            }
        }

        let stats = sim.stats();
        assert!(stats.spawned > 0);
        assert_eq!(stats.spawned, stats.expired + sim.packets().len() as u64);
    }

    #[test]
    fn nodes_stay_inside_margin_box() {
        let size = Size::new(1000.0, 700.0);
        let config = GridConfig { max_speed: 4.0, ..GridConfig::default() };
        let mut sim = GridSimulation::new(size, &config, seeded(8));
        let mut rec = Recorder::new(size);
        let bounds = sim.bounds();
        for frame in 0..1_000 {
            sim.frame(&mut rec, &FrameInput::default());
            rec.take();
            for n in sim.nodes() {
                assert!(bounds.contains(n.pos), "frame {frame}: {:?} outside {:?}", n.pos, bounds);
            }
        }
    }

    #[test]
    fn timers_stay_positive_and_resets_in_range() {
        let mut sim = grid(9, Size::new(600.0, 400.0));
        let mut rec = Recorder::new(sim.size());
        for _ in 0..500 {
            let before: Vec<bool> = sim.nodes().iter().map(|n| n.active).collect();
            sim.frame(&mut rec, &FrameInput::default());
            rec.take();
            for (n, was) in sim.nodes().iter().zip(before) {
                assert!(n.timer > 0.0);
                if n.active != was {
                    assert!(Span::new(50.0, 200.0).contains(n.timer));
                }
            }
        }
        assert!(sim.stats().flips > 0);
    }

    #[test]
    fn resize_keeps_lattice() {
        let mut sim = grid(10, Size::new(1200.0, 800.0));
        let bases: Vec<Vec2> = sim.nodes().iter().map(|n| n.base).collect();
        sim.resize(Size::new(600.0, 400.0));
        assert_eq!(sim.nodes().len(), 120);
        assert_eq!(bases, sim.nodes().iter().map(|n| n.base).collect::<Vec<_>>());
        assert_eq!(sim.bounds().max, Vec2::new(550.0, 350.0));
    }

    #[test]
    fn frame_draws_every_layer() {
        let size = Size::new(800.0, 600.0);
        let mut sim = grid(11, size);
        let mut rec = Recorder::new(size);
        sim.frame(&mut rec, &FrameInput::default());

        assert!(matches!(rec.commands()[0], crate::core::DrawCmd::Gradient { .. }));
        assert_eq!(rec.paths().count(), hex_lattice(size, 30.0).len());
        assert_eq!(rec.lines().count(), sim.edges().len());
        assert_eq!(rec.glows().count(), sim.nodes().len());
        assert_eq!(rec.texts().count(), 20);
    }
}
