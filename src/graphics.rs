use crate::math::{dot, length, multiply_mv, normalize, subtract, Mat4};
use crate::vertex::{ShadedVertex, Vertex};

/// Background color of a cleared framebuffer
pub const CLEAR_COLOR: [f64; 3] = [0.0, 0.0, 0.0];

/// Lower bound on the diffuse term; the sphere never falls fully into shadow
pub const MIN_DIFFUSE: f64 = 0.9;

/// Quadratic falloff of the point light with distance
pub const ATTENUATION: f64 = 0.1;

/// tan(22.5 deg), the slope where a line stops looking horizontal or vertical
const GLYPH_SLOPE: f64 = 0.414_213_562_373_095;

/// One character cell of the framebuffer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub glyph: char,
    pub color: [f64; 3],
}

impl Cell {
    pub const EMPTY: Cell = Cell {
        glyph: ' ',
        color: CLEAR_COLOR,
    };

    /// Cell color as 8-bit RGB
    pub fn rgb8(&self) -> (u8, u8, u8) {
        let channel = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        (
            channel(self.color[0]),
            channel(self.color[1]),
            channel(self.color[2]),
        )
    }
}

/// Character-cell render target
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Framebuffer {
    /// Creates a cleared framebuffer of `width` x `height` cells
    pub fn new(width: usize, height: usize) -> Self {
        Framebuffer {
            width,
            height,
            cells: vec![Cell::EMPTY; width * height],
        }
    }

    /// Width in cells
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in cells
    pub fn height(&self) -> usize {
        self.height
    }

    /// Resizes and clears the framebuffer
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.cells = vec![Cell::EMPTY; width * height];
    }

    /// Resets every cell to the clear color
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Cells of row `y`, left to right
    pub fn row(&self, y: usize) -> &[Cell] {
        &self.cells[y * self.width..(y + 1) * self.width]
    }

    /// Writes `glyph` at (x, y), blending `color` over the existing cell with
    /// source alpha. Returns false when the cell lies outside the buffer.
    pub fn blend(&mut self, x: isize, y: isize, glyph: char, color: [f64; 4]) -> bool {
        if x < 0 || y < 0 || x >= self.width as isize || y >= self.height as isize {
            return false;
        }
        let cell = &mut self.cells[y as usize * self.width + x as usize];
        let alpha = color[3].clamp(0.0, 1.0);
        if alpha > 0.0 {
            for (dst, src) in cell.color.iter_mut().zip(&color[..3]) {
                *dst = src * alpha + *dst * (1.0 - alpha);
            }
            cell.glyph = glyph;
        }
        true
    }

    /// Darkens every cell by blending black over it
    pub fn dim(&mut self, alpha: f64) {
        let keep = 1.0 - alpha.clamp(0.0, 1.0);
        for cell in &mut self.cells {
            for c in &mut cell.color {
                *c *= keep;
            }
        }
    }

    /// Writes overlay text starting at (x, y), clipped to the buffer
    pub fn put_str(&mut self, x: usize, y: usize, text: &str, color: [f64; 3]) {
        if y >= self.height {
            return;
        }
        for (i, glyph) in text.chars().enumerate() {
            let col = x + i;
            if col >= self.width {
                break;
            }
            self.cells[y * self.width + col] = Cell { glyph, color };
        }
    }
}

/// Per-vertex lighting: transforms the vertex and its normal into eye space,
/// applies a diffuse term with a floor of `MIN_DIFFUSE`, and attenuates it by
/// the squared distance to the light.
pub fn shade_vertex(
    mv: &Mat4,
    mvp: &Mat4,
    light_pos_eye: &[f64; 3],
    vertex: &Vertex,
) -> ShadedVertex {
    let [px, py, pz] = vertex.position;
    let [nx, ny, nz] = vertex.normal;

    let eye_vertex = multiply_mv(mv, &[px, py, pz, 1.0]);
    let eye_vertex = [eye_vertex[0], eye_vertex[1], eye_vertex[2]];
    let eye_normal = multiply_mv(mv, &[nx, ny, nz, 0.0]);
    let eye_normal = [eye_normal[0], eye_normal[1], eye_normal[2]];

    let to_light = subtract(light_pos_eye, &eye_vertex);
    let distance = length(&to_light);
    let light_vector = normalize(&to_light);

    let diffuse = dot(&eye_normal, &light_vector).max(MIN_DIFFUSE)
        * (1.0 / (1.0 + ATTENUATION * distance * distance));

    let color = vertex.color.map(|c| c * diffuse);

    ShadedVertex {
        clip_position: multiply_mv(mvp, &[px, py, pz, 1.0]),
        color,
    }
}

/// Signed distances of a clip-space point to the six frustum planes;
/// all are non-negative inside the view volume.
fn plane_distances(p: &[f64; 4]) -> [f64; 6] {
    let [x, y, z, w] = *p;
    [w + x, w - x, w + y, w - y, w + z, w - z]
}

/// True when a clip-space point lies inside the view volume
pub fn in_view_volume(p: &[f64; 4]) -> bool {
    plane_distances(p).iter().all(|d| *d >= 0.0)
}

fn lerp4(a: &[f64; 4], b: &[f64; 4], t: f64) -> [f64; 4] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
        a[3] + (b[3] - a[3]) * t,
    ]
}

/// Clips a segment to the view volume in homogeneous clip space
/// (Liang-Barsky). Colors are interpolated along with positions.
pub fn clip_segment(
    a: &ShadedVertex,
    b: &ShadedVertex,
) -> Option<(ShadedVertex, ShadedVertex)> {
    let da = plane_distances(&a.clip_position);
    let db = plane_distances(&b.clip_position);
    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;

    for (&pa, &pb) in da.iter().zip(&db) {
        if pa < 0.0 && pb < 0.0 {
            return None;
        }
        if pa < 0.0 {
            t0 = t0.max(pa / (pa - pb));
        } else if pb < 0.0 {
            t1 = t1.min(pa / (pa - pb));
        }
        if t0 > t1 {
            return None;
        }
    }

    let at = |t: f64| ShadedVertex {
        clip_position: lerp4(&a.clip_position, &b.clip_position, t),
        color: lerp4(&a.color, &b.color, t),
    };
    Some((at(t0), at(t1)))
}

/// Perspective divide and viewport transform. Returns (x, y, depth) in cell
/// units with y pointing down, or `None` for points on or behind the eye.
pub fn to_screen(clip: &[f64; 4], width: usize, height: usize) -> Option<[f64; 3]> {
    let w = clip[3];
    if w <= 0.0 {
        return None;
    }
    let (x, y, z) = (clip[0] / w, clip[1] / w, clip[2] / w);
    Some([
        (x + 1.0) * 0.5 * width as f64,
        (1.0 - y) * 0.5 * height as f64,
        z,
    ])
}

/// Picks the character that best follows a screen-space direction.
/// Cells are `cell_aspect` times taller than they are wide.
pub fn line_glyph(dx: f64, dy: f64, cell_aspect: f64) -> char {
    let vy = dy * cell_aspect;
    if dx == 0.0 && vy == 0.0 {
        return '.';
    }
    if vy.abs() <= GLYPH_SLOPE * dx.abs() {
        '-'
    } else if dx.abs() <= GLYPH_SLOPE * vy.abs() {
        '|'
    } else if (dx > 0.0) == (vy > 0.0) {
        '\\'
    } else {
        '/'
    }
}

/// Draws a line between two points in the framebuffer using Bresenham's
/// algorithm, interpolating the color from `c0` to `c1`. Each end lands in
/// the cell that contains it.
pub fn draw_line(
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    c0: [f64; 4],
    c1: [f64; 4],
    fb: &mut Framebuffer,
    cell_aspect: f64,
) {
    let glyph = line_glyph(x1 - x0, y1 - y0, cell_aspect);
    let (mut x0, mut y0, x1, y1) = (
        x0.floor() as isize,
        y0.floor() as isize,
        x1.floor() as isize,
        y1.floor() as isize,
    );
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy; // error value e_xy

    let steps = dx.max(-dy).max(1) as f64;
    let mut step: u32 = 0;

    loop {
        let color = lerp4(&c0, &c1, f64::from(step) / steps);
        fb.blend(x0, y0, glyph, color);

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
        step += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::identity;
    use crate::sphere::SPHERE_COLOR;
    use approx::assert_abs_diff_eq;

    const WHITE: [f64; 4] = [1.0, 1.0, 1.0, 1.0];

    fn shaded(clip_position: [f64; 4]) -> ShadedVertex {
        ShadedVertex {
            clip_position,
            color: WHITE,
        }
    }

    #[test]
    fn facing_vertex_is_lit_and_attenuated() {
        let vertex = Vertex {
            position: [0.0, 0.0, 0.0],
            normal: [0.0, 0.0, 1.0],
            color: SPHERE_COLOR,
        };
        let lit = shade_vertex(&identity(), &identity(), &[0.0, 0.0, 2.0], &vertex);
        let diffuse = 1.0 / (1.0 + 0.1 * 4.0);
        for i in 0..4 {
            assert_abs_diff_eq!(lit.color[i], SPHERE_COLOR[i] * diffuse, epsilon = 1e-12);
        }
        assert_eq!(lit.clip_position, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn averted_vertex_keeps_the_diffuse_floor() {
        let vertex = Vertex {
            position: [0.0, 0.0, 0.0],
            normal: [0.0, 0.0, -1.0],
            color: [1.0, 1.0, 1.0, 1.0],
        };
        let lit = shade_vertex(&identity(), &identity(), &[0.0, 0.0, 2.0], &vertex);
        assert_abs_diff_eq!(lit.color[0], MIN_DIFFUSE / 1.4, epsilon = 1e-12);
    }

    #[test]
    fn segment_inside_is_untouched() {
        let a = shaded([-0.5, 0.0, 0.0, 1.0]);
        let b = shaded([0.5, 0.5, 0.0, 1.0]);
        let (ca, cb) = clip_segment(&a, &b).unwrap();
        assert_eq!(ca, a);
        assert_eq!(cb, b);
    }

    #[test]
    fn segment_outside_is_rejected() {
        let a = shaded([2.0, 0.0, 0.0, 1.0]);
        let b = shaded([3.0, 0.5, 0.0, 1.0]);
        assert!(clip_segment(&a, &b).is_none());

        // entirely behind the near plane
        let a = shaded([0.0, 0.0, -2.0, 1.0]);
        let b = shaded([0.0, 0.0, -3.0, 1.0]);
        assert!(clip_segment(&a, &b).is_none());
    }

    #[test]
    fn crossing_segment_is_cut_at_the_boundary() {
        let a = ShadedVertex {
            clip_position: [0.0, 0.0, 0.0, 1.0],
            color: [0.0, 0.0, 0.0, 1.0],
        };
        let b = ShadedVertex {
            clip_position: [2.0, 0.0, 0.0, 1.0],
            color: [1.0, 1.0, 1.0, 1.0],
        };
        let (ca, cb) = clip_segment(&a, &b).unwrap();
        assert_eq!(ca, a);
        assert_abs_diff_eq!(cb.clip_position[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(cb.color[0], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn view_volume_test() {
        assert!(in_view_volume(&[0.5, -0.5, 0.0, 1.0]));
        assert!(in_view_volume(&[1.0, 1.0, 1.0, 1.0]));
        assert!(!in_view_volume(&[1.5, 0.0, 0.0, 1.0]));
        assert!(!in_view_volume(&[0.0, 0.0, 0.0, -1.0]));
    }

    #[test]
    fn screen_mapping_flips_y() {
        let top_left = to_screen(&[-2.0, 2.0, 0.0, 2.0], 80, 24).unwrap();
        assert_eq!(top_left, [0.0, 0.0, 0.0]);
        let centre = to_screen(&[0.0, 0.0, 0.5, 1.0], 80, 24).unwrap();
        assert_eq!(centre, [40.0, 12.0, 0.5]);
        assert!(to_screen(&[0.0, 0.0, 0.0, 0.0], 80, 24).is_none());
    }

    #[test]
    fn glyphs_follow_the_slope() {
        assert_eq!(line_glyph(5.0, 0.0, 2.0), '-');
        assert_eq!(line_glyph(0.0, 3.0, 2.0), '|');
        assert_eq!(line_glyph(2.0, 1.0, 2.0), '\\');
        assert_eq!(line_glyph(-2.0, -1.0, 2.0), '\\');
        assert_eq!(line_glyph(2.0, -1.0, 2.0), '/');
        assert_eq!(line_glyph(0.0, 0.0, 2.0), '.');
        // the same step reads as diagonal only once cells are tall
        assert_eq!(line_glyph(4.0, 1.0, 1.0), '-');
        assert_eq!(line_glyph(4.0, 1.0, 4.0), '\\');
    }

    #[test]
    fn horizontal_line_fills_every_cell() {
        let mut fb = Framebuffer::new(10, 3);
        draw_line(1.2, 1.5, 8.7, 1.5, WHITE, WHITE, &mut fb, 2.0);
        for x in 1..=8 {
            assert_eq!(fb.row(1)[x].glyph, '-');
        }
        assert_eq!(fb.row(1)[0].glyph, ' ');
        assert_eq!(fb.row(1)[9].glyph, ' ');
    }

    #[test]
    fn line_ends_land_in_the_containing_cell() {
        let mut fb = Framebuffer::new(6, 2);
        draw_line(0.9, 0.6, 3.9, 0.6, WHITE, WHITE, &mut fb, 2.0);
        for x in 0..=3 {
            assert_eq!(fb.row(0)[x].glyph, '-');
        }
        assert_eq!(fb.row(0)[4].glyph, ' ');
        assert_eq!(fb.row(1)[0].glyph, ' ');
    }

    #[test]
    fn line_color_is_interpolated() {
        let mut fb = Framebuffer::new(5, 1);
        draw_line(0.0, 0.0, 4.0, 0.0, [0.0, 0.0, 0.0, 1.0], WHITE, &mut fb, 2.0);
        assert_abs_diff_eq!(fb.row(0)[0].color[0], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(fb.row(0)[2].color[0], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(fb.row(0)[4].color[0], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn lines_leaving_the_buffer_are_cut() {
        let mut fb = Framebuffer::new(4, 4);
        draw_line(-3.0, -3.0, 6.0, 6.0, WHITE, WHITE, &mut fb, 1.0);
        for i in 0..4 {
            assert_eq!(fb.row(i)[i].glyph, '\\');
        }
    }

    #[test]
    fn blending_uses_source_alpha() {
        let mut fb = Framebuffer::new(1, 1);
        assert!(fb.blend(0, 0, '*', [1.0, 0.5, 0.0, 0.5]));
        let cell = fb.row(0)[0];
        assert_eq!(cell.glyph, '*');
        assert_eq!(cell.color, [0.5, 0.25, 0.0]);
        assert!(!fb.blend(1, 0, '*', WHITE));
        assert!(!fb.blend(0, -1, '*', WHITE));
    }

    #[test]
    fn text_is_clipped_to_the_buffer() {
        let mut fb = Framebuffer::new(4, 2);
        fb.put_str(2, 1, "hello", [1.0, 1.0, 1.0]);
        let row: String = fb.row(1).iter().map(|c| c.glyph).collect();
        assert_eq!(row, "  he");
        fb.put_str(0, 5, "x", [1.0, 1.0, 1.0]);
        fb.clear();
        assert!(fb.row(1).iter().all(|c| *c == Cell::EMPTY));
    }

    #[test]
    fn cell_colors_convert_to_rgb8() {
        let cell = Cell {
            glyph: '-',
            color: [1.0, 0.5, 2.0],
        };
        assert_eq!(cell.rgb8(), (255, 128, 255));
    }
}
