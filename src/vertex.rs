/// Sphere vertex with position, normal, and flat color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: [f64; 3],
    pub normal: [f64; 3],
    /// RGBA, each channel in 0.0..=1.0
    pub color: [f64; 4],
}

/// Vertex after the lighting pass: clip-space position and lit color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadedVertex {
    pub clip_position: [f64; 4],
    pub color: [f64; 4],
}
