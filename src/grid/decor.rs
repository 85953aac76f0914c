//! Static hex tiling and drifting code glyphs behind the grid

use crate::core::{Size, Vec2};

/// Outlines of every hexagon covering `size`, cells of circumradius
/// `hex_size`, odd columns shifted down half a cell. Includes one cell of
/// overscan on each side.
pub fn hex_lattice(size: Size, hex_size: f64) -> Vec<[Vec2; 6]> {
    let hex_height = hex_size * 3f64.sqrt();
    let hex_width = hex_size * 2.0;
    let col_step = hex_width * 0.75;

    let row_limit = size.height / hex_height + 1.0;
    let col_limit = size.width / col_step + 1.0;
    if !(row_limit.is_finite() && col_limit.is_finite()) {
        return Vec::new();
    }

    let mut cells = Vec::new();
    let mut row = -1i64;
    while (row as f64) < row_limit {
        let mut col = -1i64;
        while (col as f64) < col_limit {
            let cx = col as f64 * col_step;
            let cy = row as f64 * hex_height + (col % 2) as f64 * (hex_height / 2.0);
            cells.push(hexagon(Vec2::new(cx, cy), hex_size));
            col += 1;
        }
        row += 1;
    }
    cells
}

fn hexagon(center: Vec2, r: f64) -> [Vec2; 6] {
    use std::f64::consts::{FRAC_PI_3, FRAC_PI_6};
    std::array::from_fn(|i| {
        let angle = FRAC_PI_3 * i as f64 + FRAC_PI_6;
        Vec2::new(center.x + r * angle.cos(), center.y + r * angle.sin())
    })
}

/// Baseline position of glyph `i` at grid time `t`: scrolls right with a
/// period of `width + 100` px and bobs vertically.
pub fn glyph_position(i: usize, t: f64, size: Size) -> Vec2 {
    let i = i as f64;
    let x = (t * 20.0 + i * 200.0).rem_euclid(size.width + 100.0) - 50.0;
    let y = (i * 80.0 + (t + i).sin() * 20.0).rem_euclid(size.height);
    Vec2::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lattice_covers_surface_with_overscan() {
        let size = Size::new(600.0, 400.0);
        let cells = hex_lattice(size, 30.0);
        let hex_h = 30.0 * 3f64.sqrt();
        let rows = ((400.0 / hex_h + 1.0) as i64 + 2) as usize; // -1 ..< limit
        let cols = ((600.0 / 45.0 + 1.0) as i64 + 2) as usize;
        assert_eq!(cells.len(), rows * cols);

        let min_x = cells.iter().flat_map(|c| c.iter()).map(|p| p.x).fold(f64::MAX, f64::min);
        let max_x = cells.iter().flat_map(|c| c.iter()).map(|p| p.x).fold(f64::MIN, f64::max);
        assert!(min_x < 0.0 && max_x > 600.0);
    }

    #[test]
    fn hexagon_vertices_are_on_circumcircle() {
        let c = Vec2::new(10.0, 20.0);
        for v in hexagon(c, 30.0) {
            assert!((v.distance(c) - 30.0).abs() < 1e-9);
        }
    }

    #[test]
    fn glyphs_loop_horizontally() {
        let size = Size::new(800.0, 600.0);
        let period = (size.width + 100.0) / 20.0;
        for i in 0..20 {
            let a = glyph_position(i, 3.0, size);
            let b = glyph_position(i, 3.0 + period, size);
            assert!((a.x - b.x).abs() < 1e-6);
            assert!(a.x >= -50.0 && a.x < size.width + 50.0);
            assert!(a.y >= 0.0 && a.y < size.height);
        }
    }
}
