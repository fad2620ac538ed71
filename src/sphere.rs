use crate::error::{Result, SphereError};
use crate::math::normalize;
use crate::state::WireStyle;
use crate::vertex::Vertex;
use std::f64::consts::PI;

/// Flat color shared by every sphere vertex (RGBA)
pub const SPHERE_COLOR: [f64; 4] = [0.63671875, 0.76953125, 0.22265625, 1.0];

/// Slack so that a closing angle of exactly PI or 2*PI survives rounding
const ANGLE_TOLERANCE: f64 = 1e-9;

/// Latitude/longitude line sphere.
///
/// Vertices are generated once from a radius and an angular step and are
/// never mutated afterwards. Samples are stored ring by ring: `rings()` rings
/// of constant phi, each holding `ring_len()` samples of increasing theta.
#[derive(Debug, Clone)]
pub struct SphereLine {
    radius: f64,
    step: f64,
    rings: usize,
    ring_len: usize,
    vertices: Vec<Vertex>,
}

impl SphereLine {
    /// Samples a sphere of `radius` every `step_degrees` in both phi and theta
    pub fn new(radius: f64, step_degrees: f64) -> Result<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(SphereError::Geometry(format!(
                "radius must be a positive number, got {radius}"
            )));
        }
        if !step_degrees.is_finite() || step_degrees <= 0.0 || step_degrees > 360.0 {
            return Err(SphereError::Geometry(format!(
                "step must be in (0, 360] degrees, got {step_degrees}"
            )));
        }

        let increment = step_degrees.to_radians();
        // phi spans -PI..=PI and theta spans 0..=2*PI, so both take the same count
        let rings = sample_count(2.0 * PI, increment);
        let ring_len = rings;

        let mut vertices = Vec::with_capacity(rings * ring_len);
        for i in 0..rings {
            let phi = -PI + i as f64 * increment;
            let (sin_phi, cos_phi) = phi.sin_cos();
            for j in 0..ring_len {
                let theta = j as f64 * increment;
                let (sin_theta, cos_theta) = theta.sin_cos();
                let position = [
                    radius * sin_phi * cos_theta,
                    radius * sin_phi * sin_theta,
                    radius * cos_phi,
                ];
                vertices.push(Vertex {
                    position,
                    normal: normalize(&position),
                    color: SPHERE_COLOR,
                });
            }
        }

        log::debug!(
            "built sphere: radius {radius}, step {step_degrees} deg, {rings}x{ring_len} samples"
        );

        Ok(SphereLine {
            radius,
            step: step_degrees,
            rings,
            ring_len,
            vertices,
        })
    }

    /// All sampled vertices, ring by ring
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Total number of sampled vertices
    pub fn point_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of constant-phi rings
    pub fn rings(&self) -> usize {
        self.rings
    }

    /// Number of theta samples in each ring
    pub fn ring_len(&self) -> usize {
        self.ring_len
    }

    /// Sphere radius in model units
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Angular step in degrees
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Index pairs of the line segments to draw for `style`
    pub fn segments(&self, style: WireStyle) -> Vec<(usize, usize)> {
        match style {
            WireStyle::Grid => self.grid_segments(),
            WireStyle::Pairs => (0..self.vertices.len() / 2)
                .map(|k| (2 * k, 2 * k + 1))
                .collect(),
        }
    }

    fn grid_segments(&self) -> Vec<(usize, usize)> {
        let index = |ring: usize, sample: usize| ring * self.ring_len + sample;
        let mut segments = Vec::with_capacity(2 * self.vertices.len());

        // Latitude lines
        for ring in 0..self.rings {
            for sample in 1..self.ring_len {
                segments.push((index(ring, sample - 1), index(ring, sample)));
            }
        }
        // Longitude lines
        for ring in 1..self.rings {
            for sample in 0..self.ring_len {
                segments.push((index(ring - 1, sample), index(ring, sample)));
            }
        }
        segments
    }
}

/// Number of samples taken from 0 to `range` inclusive, every `increment`
fn sample_count(range: f64, increment: f64) -> usize {
    (range / increment + ANGLE_TOLERANCE).floor() as usize + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{dot, length};
    use approx::assert_abs_diff_eq;

    #[test]
    fn five_degree_sphere_has_closed_rings() {
        let sphere = SphereLine::new(1.0, 5.0).unwrap();
        assert_eq!(sphere.rings(), 73);
        assert_eq!(sphere.ring_len(), 73);
        assert_eq!(sphere.point_count(), 73 * 73);
    }

    #[test]
    fn uneven_step_stops_before_overshooting() {
        let sphere = SphereLine::new(1.0, 7.0).unwrap();
        // 360 / 7 = 51.4, so samples at 0, 7, ..., 357 degrees
        assert_eq!(sphere.ring_len(), 52);
        assert_eq!(sphere.point_count(), 52 * 52);
    }

    #[test]
    fn positions_lie_on_the_surface() {
        let sphere = SphereLine::new(2.5, 10.0).unwrap();
        for v in sphere.vertices() {
            assert_abs_diff_eq!(length(&v.position), 2.5, epsilon = 1e-9);
        }
    }

    #[test]
    fn normals_are_unit_and_outward() {
        let sphere = SphereLine::new(3.0, 15.0).unwrap();
        for v in sphere.vertices() {
            assert_abs_diff_eq!(length(&v.normal), 1.0, epsilon = 1e-9);
            assert_abs_diff_eq!(dot(&v.normal, &v.position), 3.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn colors_are_flat() {
        let sphere = SphereLine::new(1.0, 30.0).unwrap();
        assert!(sphere.vertices().iter().all(|v| v.color == SPHERE_COLOR));
    }

    #[test]
    fn rings_run_from_pole_through_pole_and_back() {
        let sphere = SphereLine::new(1.0, 5.0).unwrap();
        let first = sphere.vertices()[0].position;
        let middle = sphere.vertices()[36 * sphere.ring_len()].position;
        let last = sphere.vertices()[sphere.point_count() - 1].position;
        assert_abs_diff_eq!(first[2], -1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(middle[2], 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(last[2], -1.0, epsilon = 1e-9);
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        assert!(SphereLine::new(0.0, 5.0).is_err());
        assert!(SphereLine::new(-1.0, 5.0).is_err());
        assert!(SphereLine::new(f64::NAN, 5.0).is_err());
        assert!(SphereLine::new(1.0, 0.0).is_err());
        assert!(SphereLine::new(1.0, -5.0).is_err());
        assert!(SphereLine::new(1.0, 400.0).is_err());
        assert!(SphereLine::new(1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn full_turn_step_keeps_both_ends() {
        let sphere = SphereLine::new(1.0, 360.0).unwrap();
        assert_eq!(sphere.rings(), 2);
        assert_eq!(sphere.ring_len(), 2);
    }

    #[test]
    fn grid_segments_join_neighbours() {
        let sphere = SphereLine::new(1.0, 30.0).unwrap();
        let (rings, len) = (sphere.rings(), sphere.ring_len());
        let segments = sphere.segments(WireStyle::Grid);
        assert_eq!(segments.len(), rings * (len - 1) + (rings - 1) * len);
        for &(a, b) in &segments {
            assert!(a < b && b < sphere.point_count());
            // same ring, next sample; or same sample, next ring
            assert!((b - a == 1 && a / len == b / len) || b - a == len);
        }
    }

    #[test]
    fn pair_segments_drop_a_trailing_vertex() {
        let sphere = SphereLine::new(1.0, 5.0).unwrap();
        let segments = sphere.segments(WireStyle::Pairs);
        assert_eq!(sphere.point_count() % 2, 1);
        assert_eq!(segments.len(), sphere.point_count() / 2);
        assert_eq!(segments[0], (0, 1));
        assert_eq!(segments[1], (2, 3));
    }
}
