use crate::config::SceneConfig;
use crate::error::{Result, SphereError};
use crate::graphics::{
    clip_segment, draw_line, in_view_volume, shade_vertex, to_screen, Framebuffer,
};
use crate::lighting::{Lighting, LIGHT_POS_IN_MODEL_SPACE};
use crate::math::{frustum, multiply_mv};
use crate::sphere::SphereLine;
use crate::state::WireStyle;
use crate::vertex::ShadedVertex;

pub const NEAR: f64 = 1.0;
pub const FAR: f64 = 10.0;
pub const MIN_ZOOM: f64 = 0.05;
pub const MAX_ZOOM: f64 = 10.0;

const LIGHT_GLYPH: char = '*';
const LIGHT_COLOR: [f64; 4] = [1.0, 1.0, 1.0, 1.0];

/// Renders the line sphere.
///
/// Each frame is "update, then draw": `step` integrates the current touch
/// deltas into the model matrix and `draw_frame` rasterises the result.
#[derive(Debug)]
pub struct SphereLineRenderer {
    sphere: SphereLine,
    lighting: Lighting,
    dx: f64,
    dy: f64,
    zoom: f64,
    initial_zoom: f64,
    /// Half-width of the unzoomed frustum at the near plane
    ratio: f64,
    cell_aspect: f64,
    segments: Vec<(usize, usize)>,
    segment_style: WireStyle,
    shaded: Vec<ShadedVertex>,
}

impl SphereLineRenderer {
    /// Builds the sphere for `config`. Call `on_surface_changed` before drawing.
    pub fn new(config: &SceneConfig) -> Result<Self> {
        let sphere = SphereLine::new(config.radius, config.step)?;
        let segments = sphere.segments(WireStyle::Grid);
        Ok(SphereLineRenderer {
            shaded: Vec::with_capacity(sphere.point_count()),
            sphere,
            lighting: Lighting::new(),
            dx: 0.0,
            dy: 0.0,
            zoom: config.zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            initial_zoom: config.zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            ratio: 1.0,
            cell_aspect: config.cell_aspect,
            segments,
            segment_style: WireStyle::Grid,
        })
    }

    /// Sets the change along the x axis of the last touch move
    pub fn set_dx(&mut self, dx: f64) {
        self.dx = dx;
    }

    /// Sets the change along the y axis of the last touch move
    pub fn set_dy(&mut self, dy: f64) {
        self.dy = dy;
    }

    /// Sets both deltas at once
    pub fn set_deltas(&mut self, dx: f64, dy: f64) {
        self.dx = dx;
        self.dy = dy;
    }

    /// Current (dx, dy) applied on every step
    pub fn deltas(&self) -> (f64, f64) {
        (self.dx, self.dy)
    }

    /// Stops the spin left over from the last drag
    pub fn stop(&mut self) {
        self.set_deltas(0.0, 0.0);
    }

    /// Recomputes the projection for a new surface size, in cells. The
    /// height stays fixed while the width varies with the aspect ratio.
    pub fn on_surface_changed(&mut self, width: usize, height: usize) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(SphereError::Frustum(format!(
                "surface has no area ({width}x{height})"
            )));
        }
        self.ratio = width as f64 / (height as f64 * self.cell_aspect);
        self.apply_projection()
    }

    /// Scales the frustum by `mult`; values below 1 bring the sphere closer
    pub fn zoom(&mut self, mult: f64) -> Result<()> {
        if !mult.is_finite() || mult <= 0.0 {
            return Err(SphereError::Frustum(format!("invalid zoom factor {mult}")));
        }
        self.zoom = (self.zoom * mult).clamp(MIN_ZOOM, MAX_ZOOM);
        log::debug!("zoom x{mult:.3} -> {:.3}", self.zoom);
        self.apply_projection()
    }

    /// Current frustum scale
    pub fn zoom_level(&self) -> f64 {
        self.zoom
    }

    fn apply_projection(&mut self) -> Result<()> {
        let z = self.zoom;
        let projection = frustum(-z * self.ratio, z * self.ratio, -z, z, NEAR, FAR)?;
        self.lighting.set_projection(projection);
        Ok(())
    }

    /// Integrates the current deltas into the scene
    pub fn step(&mut self) {
        self.lighting.render_lighting(self.dx, self.dy);
    }

    /// Back to the initial orientation, zoom, and a still sphere
    pub fn reset(&mut self) -> Result<()> {
        self.lighting = Lighting::new();
        self.zoom = self.initial_zoom;
        self.stop();
        self.apply_projection()?;
        self.step();
        Ok(())
    }

    /// Clears `fb` and draws the sphere, plus the light marker if asked
    pub fn draw_frame(&mut self, fb: &mut Framebuffer, style: WireStyle, show_light: bool) {
        fb.clear();

        if style != self.segment_style {
            self.segments = self.sphere.segments(style);
            self.segment_style = style;
        }

        let (mv, mvp) = self.lighting.compose();
        let [lx, ly, lz, _] = *self.lighting.light_pos_in_eye_space();
        let light_pos = [lx, ly, lz];

        self.shaded.clear();
        self.shaded.extend(
            self.sphere
                .vertices()
                .iter()
                .map(|v| shade_vertex(&mv, &mvp, &light_pos, v)),
        );

        let (width, height) = (fb.width(), fb.height());
        for &(a, b) in &self.segments {
            let Some((ca, cb)) = clip_segment(&self.shaded[a], &self.shaded[b]) else {
                continue;
            };
            let (Some(sa), Some(sb)) = (
                to_screen(&ca.clip_position, width, height),
                to_screen(&cb.clip_position, width, height),
            ) else {
                continue;
            };
            draw_line(
                sa[0],
                sa[1],
                sb[0],
                sb[1],
                ca.color,
                cb.color,
                fb,
                self.cell_aspect,
            );
        }

        if show_light {
            let clip = multiply_mv(&self.lighting.light_mvp(), &LIGHT_POS_IN_MODEL_SPACE);
            if in_view_volume(&clip) {
                if let Some([x, y, _]) = to_screen(&clip, width, height) {
                    fb.blend(x.floor() as isize, y.floor() as isize, LIGHT_GLYPH, LIGHT_COLOR);
                }
            }
        }
    }

    /// The sphere geometry being drawn
    pub fn sphere(&self) -> &SphereLine {
        &self.sphere
    }

    /// Matrices and light state of the last step
    pub fn lighting(&self) -> &Lighting {
        &self.lighting
    }
}
