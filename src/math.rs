use crate::error::{Result, SphereError};

/// Column-major 4x4 matrix, indexed as `m[col * 4 + row]`
pub type Mat4 = [f64; 16];

/// Returns the 4x4 identity matrix
pub fn identity() -> Mat4 {
    let mut m = [0.0; 16];
    m[0] = 1.0;
    m[5] = 1.0;
    m[10] = 1.0;
    m[15] = 1.0;
    m
}

/// Multiplies two 4x4 matrices, returning `lhs * rhs`
pub fn multiply_mm(lhs: &Mat4, rhs: &Mat4) -> Mat4 {
    let mut result = [0.0; 16];
    for col in 0..4 {
        for row in 0..4 {
            for k in 0..4 {
                result[col * 4 + row] += lhs[k * 4 + row] * rhs[col * 4 + k];
            }
        }
    }
    result
}

/// Multiplies a 4x4 matrix by a homogeneous 4-dimensional vector
pub fn multiply_mv(matrix: &Mat4, vector: &[f64; 4]) -> [f64; 4] {
    let mut result = [0.0; 4];
    for (row, value) in result.iter_mut().enumerate() {
        for k in 0..4 {
            *value += matrix[k * 4 + row] * vector[k];
        }
    }
    result
}

/// Post-multiplies `matrix` by a translation of (x, y, z)
pub fn translate(matrix: &mut Mat4, x: f64, y: f64, z: f64) {
    for i in 0..4 {
        matrix[12 + i] += matrix[i] * x + matrix[4 + i] * y + matrix[8 + i] * z;
    }
}

/// Builds a rotation of `angle_degrees` around the axis (x, y, z).
///
/// The axis is normalised first. Returns `None` for a zero-length or
/// non-finite axis, since no rotation is defined for it.
pub fn rotation(angle_degrees: f64, x: f64, y: f64, z: f64) -> Option<Mat4> {
    let len = length(&[x, y, z]);
    if len <= 0.0 || !len.is_finite() {
        return None;
    }
    let [x, y, z] = [x / len, y / len, z / len];
    let (s, c) = angle_degrees.to_radians().sin_cos();
    let nc = 1.0 - c;

    let mut m = identity();
    m[0] = x * x * nc + c;
    m[1] = x * y * nc + z * s;
    m[2] = z * x * nc - y * s;
    m[4] = x * y * nc - z * s;
    m[5] = y * y * nc + c;
    m[6] = y * z * nc + x * s;
    m[8] = z * x * nc + y * s;
    m[9] = y * z * nc - x * s;
    m[10] = z * z * nc + c;
    Some(m)
}

/// Post-multiplies `matrix` by a rotation of `angle_degrees` around (x, y, z).
/// A zero-length axis leaves the matrix unchanged.
pub fn rotate(matrix: &mut Mat4, angle_degrees: f64, x: f64, y: f64, z: f64) {
    if let Some(r) = rotation(angle_degrees, x, y, z) {
        *matrix = multiply_mm(matrix, &r);
    }
}

/// Builds a perspective projection from the six planes of a view frustum
pub fn frustum(left: f64, right: f64, bottom: f64, top: f64, near: f64, far: f64) -> Result<Mat4> {
    if left == right {
        return Err(SphereError::Frustum(format!("left == right ({left})")));
    }
    if bottom == top {
        return Err(SphereError::Frustum(format!("bottom == top ({bottom})")));
    }
    if near == far {
        return Err(SphereError::Frustum(format!("near == far ({near})")));
    }
    if near <= 0.0 || far <= 0.0 {
        return Err(SphereError::Frustum(format!(
            "near and far must be positive (near {near}, far {far})"
        )));
    }

    let r_width = 1.0 / (right - left);
    let r_height = 1.0 / (top - bottom);
    let r_depth = 1.0 / (near - far);

    let mut m = [0.0; 16];
    m[0] = 2.0 * near * r_width;
    m[5] = 2.0 * near * r_height;
    m[8] = (right + left) * r_width;
    m[9] = (top + bottom) * r_height;
    m[10] = (far + near) * r_depth;
    m[11] = -1.0;
    m[14] = 2.0 * far * near * r_depth;
    Ok(m)
}

/// Builds a view matrix looking from `eye` towards `center`
pub fn look_at(eye: &[f64; 3], center: &[f64; 3], up: &[f64; 3]) -> Mat4 {
    let f = normalize(&subtract(center, eye));
    let s = normalize(&cross(&f, up));
    let u = cross(&s, &f);

    let mut m = [
        s[0], u[0], -f[0], 0.0, //
        s[1], u[1], -f[1], 0.0, //
        s[2], u[2], -f[2], 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ];
    translate(&mut m, -eye[0], -eye[1], -eye[2]);
    m
}

/// Component-wise `a - b`
pub fn subtract(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// Dot product of two 3-vectors
pub fn dot(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Cross product `a x b`
pub fn cross(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Euclidean length of a 3-vector
pub fn length(v: &[f64; 3]) -> f64 {
    dot(v, v).sqrt()
}

/// Scales a vector to unit length; a zero vector is returned unchanged
pub fn normalize(v: &[f64; 3]) -> [f64; 3] {
    let len = length(v);
    if len > 0.0 {
        [v[0] / len, v[1] / len, v[2] / len]
    } else {
        *v
    }
}
