//! [`Surface`] on an egui painter, for the native preview

use eframe::egui::{self, Color32, Pos2, Rect, Shape, Stroke};

use crate::core::{sample_stops, Rgba, Size, Stop, Surface, Vec2};

/// Concentric rings used to approximate a radial gradient.
const GLOW_RINGS: usize = 12;

pub(crate) fn color32(c: Rgba) -> Color32 {
    Color32::from_rgba_unmultiplied(c.r, c.g, c.b, (c.a.clamp(0.0, 1.0) * 255.0).round() as u8)
}

/// Draws into the rect handed out by `allocate_painter`. Effect coordinates
/// are relative to the rect's top-left corner.
pub struct PainterSurface<'a> {
    painter: &'a egui::Painter,
    rect: Rect,
}

impl<'a> PainterSurface<'a> {
    pub fn new(painter: &'a egui::Painter, rect: Rect) -> Self {
        Self { painter, rect }
    }

    #[inline]
    fn pos(&self, p: Vec2) -> Pos2 {
        Pos2::new(self.rect.min.x + p.x as f32, self.rect.min.y + p.y as f32)
    }
}

impl Surface for PainterSurface<'_> {
    fn size(&self) -> Size {
        Size::new(self.rect.width() as f64, self.rect.height() as f64)
    }

    // egui repaints from scratch every frame
    fn clear(&mut self) {}

    fn fill_vertical_gradient(&mut self, stops: &[Stop]) {
        let mut mesh = egui::Mesh::default();
        let (left, right) = (self.rect.min.x, self.rect.max.x);
        let height = self.rect.height();
        for (i, &(offset, color)) in stops.iter().enumerate() {
            let y = self.rect.min.y + offset.clamp(0.0, 1.0) as f32 * height;
            let c = color32(color);
            mesh.colored_vertex(Pos2::new(left, y), c);
            mesh.colored_vertex(Pos2::new(right, y), c);
            if i > 0 {
                let base = (i as u32 - 1) * 2;
                mesh.add_triangle(base, base + 1, base + 2);
                mesh.add_triangle(base + 1, base + 3, base + 2);
            }
        }
        self.painter.add(Shape::mesh(mesh));
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Rgba, width: f64) {
        self.painter.line_segment(
            [self.pos(from), self.pos(to)],
            Stroke::new(width as f32, color32(color)),
        );
    }

    fn stroke_path(&mut self, points: &[Vec2], closed: bool, color: Rgba, width: f64) {
        let points: Vec<Pos2> = points.iter().map(|&p| self.pos(p)).collect();
        let stroke = Stroke::new(width as f32, color32(color));
        let shape = if closed {
            Shape::closed_line(points, stroke)
        } else {
            Shape::line(points, stroke)
        };
        self.painter.add(shape);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f64, color: Rgba) {
        self.painter.circle_filled(self.pos(center), radius.max(0.0) as f32, color32(color));
    }

    fn fill_glow(&mut self, center: Vec2, radius: f64, stops: &[Stop]) {
        let c = self.pos(center);
        // Outside in, so inner rings sit on top. Alpha is divided across the
        // rings because they overlap.
        for ring in (1..=GLOW_RINGS).rev() {
            let t = ring as f64 / GLOW_RINGS as f64;
            let color = sample_stops(stops, t);
            let color = color.with_alpha(color.a / GLOW_RINGS as f64 * 2.0);
            self.painter.circle_filled(c, (radius.max(0.0) * t) as f32, color32(color));
        }
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, size_px: f64, color: Rgba) {
        self.painter.text(
            self.pos(pos),
            egui::Align2::LEFT_BOTTOM,
            text,
            egui::FontId::monospace(size_px as f32),
            color32(color),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color32_scales_alpha() {
        let c = color32(Rgba::rgba(10, 20, 30, 0.5));
        assert_eq!(c, Color32::from_rgba_unmultiplied(10, 20, 30, 128));
        assert_eq!(color32(Rgba::rgba(0, 0, 0, 4.0)).a(), 255);
    }
}
