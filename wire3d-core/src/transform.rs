/// 3D transformation matrices, point transforms and rotation state
///
/// Matrices use the column-vector convention (`p' = M * p`). Chains compose
/// right-to-left: in `multiply(&[a, b, c])` the matrix `c` reaches the point first.
use nalgebra::{Matrix4, Point3, Vector3, Vector4};

/// Rotation angles around three axes (in radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EulerAngles {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl EulerAngles {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Per-axis angles scaled by a common factor
    pub fn scaled(&self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor, self.z * factor)
    }
}

impl Default for EulerAngles {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<[f32; 3]> for EulerAngles {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    pub fn identity() -> Matrix4<f32> {
        Matrix4::identity()
    }

    /// Create a translation matrix
    pub fn translation(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    /// Create a non-uniform scale matrix
    pub fn scale(sx: f32, sy: f32, sz: f32) -> Matrix4<f32> {
        Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz))
    }

    pub fn uniform_scale(s: f32) -> Matrix4<f32> {
        Matrix4::new_scaling(s)
    }

    pub fn rotation_x(rad: f32) -> Matrix4<f32> {
        Matrix4::new_rotation(Vector3::new(rad, 0.0, 0.0))
    }

    /// Right-handed: `(1, 0, 0)` turns towards `(cos, 0, -sin)`
    pub fn rotation_y(rad: f32) -> Matrix4<f32> {
        Matrix4::new_rotation(Vector3::new(0.0, rad, 0.0))
    }

    pub fn rotation_z(rad: f32) -> Matrix4<f32> {
        Matrix4::new_rotation(Vector3::new(0.0, 0.0, rad))
    }

    /// Combined rotation, chained as Y * X * Z (Z is applied to the point first).
    /// Changing the order changes the animation.
    pub fn rotation_xyz(angles: &EulerAngles) -> Matrix4<f32> {
        Self::multiply(&[
            Self::rotation_y(angles.y),
            Self::rotation_x(angles.x),
            Self::rotation_z(angles.z),
        ])
    }

    /// Compose a chain of matrices right-to-left. An empty chain is the identity.
    pub fn multiply(chain: &[Matrix4<f32>]) -> Matrix4<f32> {
        chain
            .iter()
            .fold(Matrix4::identity(), |acc, m| acc * m)
    }
}

/// Multiply a point, extended with `w = 1`, by a matrix
#[inline]
pub fn transform_point(m: &Matrix4<f32>, p: &Point3<f32>) -> Vector4<f32> {
    m * p.to_homogeneous()
}

/// Collapse a homogeneous point back to 3D.
///
/// Zero or negative `w` is not special-cased: the result may be infinite or NaN.
#[inline]
pub fn perspective_divide(v: &Vector4<f32>) -> Point3<f32> {
    Point3::new(v.x / v.w, v.y / v.w, v.z / v.w)
}

#[inline]
pub fn transform_point_divided(m: &Matrix4<f32>, p: &Point3<f32>) -> Point3<f32> {
    perspective_divide(&transform_point(m, p))
}

/// Unit vector in the direction of `v`, or the zero vector when `v` has no length
pub fn normalize_or_zero(v: &Vector3<f32>) -> Vector3<f32> {
    v.try_normalize(0.0).unwrap_or_else(Vector3::zeros)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_3};

    const EPS: f32 = 1e-5;

    fn sample_matrices() -> (Matrix4<f32>, Matrix4<f32>, Matrix4<f32>) {
        let a = Transform::rotation_xyz(&EulerAngles::new(0.3, -1.2, 0.7));
        let b = Transform::multiply(&[
            Transform::translation(1.0, -2.0, 3.5),
            Transform::scale(2.0, 0.5, 1.5),
        ]);
        let c = Transform::rotation_z(FRAC_PI_3);
        (a, b, c)
    }

    #[test]
    fn test_euler_angles() {
        assert_eq!(EulerAngles::default(), EulerAngles::new(0.0, 0.0, 0.0));

        let state = EulerAngles::from([0.1, 0.2, 0.3]);
        let half = state.scaled(0.5);
        assert!((half.x - 0.05).abs() < 1e-6);
        assert!((half.y - 0.1).abs() < 1e-6);
        assert!((half.z - 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_identity_rotation() {
        let matrix = Transform::rotation_xyz(&EulerAngles::zero());
        assert!((matrix - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_multiply_is_associative() {
        let (a, b, c) = sample_matrices();
        let left = Transform::multiply(&[Transform::multiply(&[a, b]), c]);
        let right = Transform::multiply(&[a, Transform::multiply(&[b, c])]);
        for (l, r) in left.iter().zip(right.iter()) {
            assert!((l - r).abs() < EPS, "{l} != {r}");
        }
    }

    #[test]
    fn test_identity_is_neutral() {
        let (m, _, _) = sample_matrices();
        let id = Transform::identity();
        assert_eq!(Transform::multiply(&[id, m]), m);
        assert_eq!(Transform::multiply(&[m, id]), m);
        assert_eq!(Transform::multiply(&[]), id);
    }

    #[test]
    fn test_multiply_applies_rightmost_first() {
        // Scale first, then translate: (1,1,1) -> (2,2,2) -> (12,2,2)
        let m = Transform::multiply(&[
            Transform::translation(10.0, 0.0, 0.0),
            Transform::uniform_scale(2.0),
        ]);
        let p = transform_point_divided(&m, &Point3::new(1.0, 1.0, 1.0));
        assert!((p - Point3::new(12.0, 2.0, 2.0)).norm() < EPS);
    }

    #[test]
    fn test_translation_round_trip() {
        let p = Point3::new(0.25, -4.0, 7.5);
        let there = transform_point_divided(&Transform::translation(3.0, -1.0, 2.0), &p);
        let back = transform_point_divided(&Transform::translation(-3.0, 1.0, -2.0), &there);
        assert!((back - p).norm() < EPS);
    }

    #[test]
    fn test_rotation_y_sign_convention() {
        let theta = 0.4_f32;
        let p = transform_point_divided(&Transform::rotation_y(theta), &Point3::new(1.0, 0.0, 0.0));
        assert!((p.x - theta.cos()).abs() < EPS);
        assert!(p.y.abs() < EPS);
        assert!((p.z + theta.sin()).abs() < EPS);
    }

    #[test]
    fn test_axis_rotations_quarter_turn() {
        let x = transform_point_divided(&Transform::rotation_x(FRAC_PI_2), &Point3::new(0.0, 1.0, 0.0));
        assert!((x - Point3::new(0.0, 0.0, 1.0)).norm() < EPS);

        let z = transform_point_divided(&Transform::rotation_z(FRAC_PI_2), &Point3::new(1.0, 0.0, 0.0));
        assert!((z - Point3::new(0.0, 1.0, 0.0)).norm() < EPS);
    }

    #[test]
    fn test_rotation_xyz_applies_z_first() {
        let angles = EulerAngles::new(FRAC_PI_2, FRAC_PI_2, FRAC_PI_2);
        let chained = Transform::multiply(&[
            Transform::rotation_y(angles.y),
            Transform::rotation_x(angles.x),
            Transform::rotation_z(angles.z),
        ]);
        assert!((Transform::rotation_xyz(&angles) - chained).norm() < EPS);

        let other_order = Transform::multiply(&[
            Transform::rotation_z(angles.z),
            Transform::rotation_x(angles.x),
            Transform::rotation_y(angles.y),
        ]);
        assert!((Transform::rotation_xyz(&angles) - other_order).norm() > 0.1);
    }

    #[test]
    fn test_transform_point_keeps_w_for_affine() {
        let v = transform_point(&Transform::translation(1.0, 2.0, 3.0), &Point3::origin());
        assert_eq!(v, Vector4::new(1.0, 2.0, 3.0, 1.0));
    }

    #[test]
    fn test_perspective_divide() {
        let p = perspective_divide(&Vector4::new(2.0, 4.0, 8.0, 2.0));
        assert_eq!(p, Point3::new(1.0, 2.0, 4.0));

        let degenerate = perspective_divide(&Vector4::new(1.0, 0.0, -1.0, 0.0));
        assert!(degenerate.x.is_infinite());
        assert!(degenerate.y.is_nan());
        assert!(degenerate.z.is_infinite());
    }

    #[test]
    fn test_normalize_or_zero() {
        assert_eq!(normalize_or_zero(&Vector3::zeros()), Vector3::zeros());
        let n = normalize_or_zero(&Vector3::new(3.0, 0.0, 4.0));
        assert!((n - Vector3::new(0.6, 0.0, 0.8)).norm() < EPS);
    }
}
