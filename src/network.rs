//! "Connected innovation" node network
//!
//! A dozen nodes bouncing inside the card. Hovering the card widens the link
//! radius, adds glow halos and sends a dot oscillating along every link.

use tracing::{debug, trace};

use crate::config::NetworkConfig;
use crate::core::rng::{centered, uniform};
use crate::core::{fade, pairs_within, FxRng, Size, Surface, Vec2};
use crate::effect::{Effect, EffectKind, FrameInput};
use crate::theme::colors;

const LINK_ALPHA: f64 = 0.4;
const GLOW_SCALE: f64 = 3.0;
const PACKET_RADIUS: f64 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NetNode {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f64,
}

pub struct NodeNetwork {
    size: Size,
    nodes: Vec<NetNode>,
    config: NetworkConfig,
}

impl NodeNetwork {
    pub fn new(size: Size, config: &NetworkConfig, mut rng: FxRng) -> Self {
        let nodes = (0..config.count)
            .map(|_| NetNode {
                pos: Vec2::new(uniform(&mut rng, 0.0, size.width), uniform(&mut rng, 0.0, size.height)),
                vel: Vec2::new(centered(&mut rng, config.max_speed), centered(&mut rng, config.max_speed)),
                radius: config.radius.sample(&mut rng),
            })
            .collect();

        debug!(count = config.count, width = size.width, height = size.height, "Node network created");

        Self { size, nodes, config: config.clone() }
    }

    pub fn nodes(&self) -> &[NetNode] {
        &self.nodes
    }

    pub fn link_distance(&self, hovered: bool) -> f64 {
        if hovered {
            self.config.active_link_distance
        } else {
            self.config.link_distance
        }
    }

    /// Linked pairs `(i, j, distance)`, `i < j`, for the given hover state.
    pub fn connections(&self, hovered: bool) -> Vec<(usize, usize, f64)> {
        let positions: Vec<Vec2> = self.nodes.iter().map(|n| n.pos).collect();
        pairs_within(&positions, self.link_distance(hovered))
    }

    /// Where the hover packets sit at wall-clock time `now`: one per link,
    /// oscillating back and forth as `(sin(2·now + i) + 1) / 2`.
    pub fn packet_positions(&self, now: f64) -> Vec<Vec2> {
        self.connections(true)
            .into_iter()
            .map(|(i, j, _)| {
                let progress = ((now * 2.0 + i as f64).sin() + 1.0) * 0.5;
                self.nodes[i].pos.lerp(self.nodes[j].pos, progress)
            })
            .collect()
    }

    /// Move every node and reflect it off the card edges.
    fn advance(&mut self) {
        let Size { width, height } = self.size;
        for node in &mut self.nodes {
            node.pos += node.vel;
            if node.pos.x < 0.0 || node.pos.x > width {
                node.vel.x = -node.vel.x;
            }
            if node.pos.y < 0.0 || node.pos.y > height {
                node.vel.y = -node.vel.y;
            }
            node.pos.x = node.pos.x.clamp(0.0, width.max(0.0));
            node.pos.y = node.pos.y.clamp(0.0, height.max(0.0));
        }
    }
}

impl Effect for NodeNetwork {
    fn kind(&self) -> EffectKind {
        EffectKind::Network
    }

    fn size(&self) -> Size {
        self.size
    }

    fn resize(&mut self, size: Size) {
        debug!(width = size.width, height = size.height, "Node network resized");
        self.size = size;
    }

    fn frame(&mut self, surface: &mut dyn Surface, input: &FrameInput) {
        surface.clear();
        self.advance();

        let hovered = input.hovered;
        let reach = self.link_distance(hovered);
        let links = self.connections(hovered);
        let line_width = if hovered { 1.5 } else { 1.0 };
        for &(i, j, d) in &links {
            surface.stroke_line(
                self.nodes[i].pos,
                self.nodes[j].pos,
                colors::CYAN.with_alpha(fade(d, reach, LINK_ALPHA)),
                line_width,
            );
        }

        for node in &self.nodes {
            if hovered {
                surface.fill_glow(
                    node.pos,
                    node.radius * GLOW_SCALE,
                    &[(0.0, colors::CYAN.with_alpha(0.3)), (1.0, colors::CYAN.with_alpha(0.0))],
                );
            }
            surface.fill_circle(node.pos, node.radius, colors::CYAN);
            surface.fill_circle(node.pos, node.radius * 0.5, colors::CYAN_BRIGHT);
        }

        if hovered {
            for pos in self.packet_positions(input.now) {
                surface.fill_circle(pos, PACKET_RADIUS, colors::CYAN_BRIGHT);
            }
        }

        trace!(hovered, links = links.len(), "Node network frame");
    }
}
