use crate::math::{identity, look_at, multiply_mm, multiply_mv, rotate, translate, Mat4};

/// Degrees of rotation per pixel of touch movement
pub const TOUCH_SCALE_FACTOR: f64 = 180.0 / 320.0;

/// The light sits at the origin of its own model space
pub const LIGHT_POS_IN_MODEL_SPACE: [f64; 4] = [0.0, 0.0, 0.0, 1.0];

const EYE: [f64; 3] = [0.0, 0.0, -0.5];
const LOOK: [f64; 3] = [0.0, 0.0, -5.0];
const UP: [f64; 3] = [0.0, 1.0, 0.0];

/// Distance the scene is pushed away from the origin
const SCENE_DEPTH: f64 = -5.0;

/// Point light and the model/view/projection chain for the sphere.
///
/// `render_lighting` integrates touch deltas into two rotation angles and a
/// drifting rotation axis, then rebuilds the model and light matrices.
#[derive(Debug, Clone)]
pub struct Lighting {
    light_model_matrix: Mat4,
    light_pos_in_world_space: [f64; 4],
    light_pos_in_eye_space: [f64; 4],
    model_matrix: Mat4,
    view_matrix: Mat4,
    projection_matrix: Mat4,
    mvp_matrix: Mat4,
    /// Accumulated rotation axis components
    axis: [f64; 3],
    x_angle: f64,
    y_angle: f64,
}

impl Default for Lighting {
    fn default() -> Self {
        Self::new()
    }
}

impl Lighting {
    /// Starts with an identity model and the fixed view
    pub fn new() -> Self {
        Lighting {
            light_model_matrix: identity(),
            light_pos_in_world_space: [0.0; 4],
            light_pos_in_eye_space: [0.0; 4],
            model_matrix: identity(),
            view_matrix: look_at(&EYE, &LOOK, &UP),
            projection_matrix: identity(),
            mvp_matrix: identity(),
            axis: [1.0, 1.0, 1.0],
            x_angle: 0.0,
            y_angle: 0.0,
        }
    }

    /// Integrates one frame of touch movement and rebuilds the model and
    /// light matrices.
    pub fn render_lighting(&mut self, dx: f64, dy: f64) {
        self.axis[0] += -dy.abs();
        self.axis[1] = 0.0;
        self.axis[2] += dx.abs();

        self.x_angle += dy;
        self.y_angle += dx;

        // Rotate the light and then push it into the distance
        let mut light_model = identity();
        translate(&mut light_model, 0.0, 0.0, SCENE_DEPTH);
        rotate(&mut light_model, 35.0, -1.7, -1.5, 0.0);
        translate(&mut light_model, 0.0, 0.0, 2.0);
        self.light_model_matrix = light_model;

        self.light_pos_in_world_space =
            multiply_mv(&self.light_model_matrix, &LIGHT_POS_IN_MODEL_SPACE);
        self.light_pos_in_eye_space =
            multiply_mv(&self.view_matrix, &self.light_pos_in_world_space);

        let s = TOUCH_SCALE_FACTOR;
        let [ax, ay, az] = self.axis;
        let mut model = identity();
        translate(&mut model, 0.0, 0.0, SCENE_DEPTH);
        rotate(&mut model, self.x_angle * s, ax * s, ay * s, 0.0);
        rotate(&mut model, self.y_angle * s, 0.0, ay * s, az * s);
        self.model_matrix = model;
    }

    /// Replaces the projection matrix
    pub fn set_projection(&mut self, projection: Mat4) {
        self.projection_matrix = projection;
    }

    /// Returns `(model_view, model_view_projection)` and keeps the latter
    pub fn compose(&mut self) -> (Mat4, Mat4) {
        let mv = multiply_mm(&self.view_matrix, &self.model_matrix);
        self.mvp_matrix = multiply_mm(&self.projection_matrix, &mv);
        (mv, self.mvp_matrix)
    }

    /// Transform that places the light point on screen
    pub fn light_mvp(&self) -> Mat4 {
        let vm = multiply_mm(&self.view_matrix, &self.light_model_matrix);
        multiply_mm(&self.projection_matrix, &vm)
    }

    /// Accumulated (x, y) rotation angles, before touch scaling
    pub fn angles(&self) -> (f64, f64) {
        (self.x_angle, self.y_angle)
    }

    /// Light position after the light model matrix
    pub fn light_pos_in_world_space(&self) -> &[f64; 4] {
        &self.light_pos_in_world_space
    }

    /// Light position after the view matrix, used for shading
    pub fn light_pos_in_eye_space(&self) -> &[f64; 4] {
        &self.light_pos_in_eye_space
    }
}

#[cfg(test)]
impl Lighting {
    pub fn light_model_matrix(&self) -> &Mat4 {
        &self.light_model_matrix
    }

    pub fn model_matrix(&self) -> &Mat4 {
        &self.model_matrix
    }

    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }

    pub fn mvp_matrix(&self) -> &Mat4 {
        &self.mvp_matrix
    }

    pub fn axis(&self) -> [f64; 3] {
        self.axis
    }
}
