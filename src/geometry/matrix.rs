//! 4x4 affine transform used by the gaze camera.

use glam::{Mat4, Vec3, Vec4};

/// Column-major 4x4 transform.
///
/// Rotations follow the right-handed convention; all angles are radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix4 {
    m: Mat4,
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<Mat4> for Matrix4 {
    fn from(m: Mat4) -> Self {
        Self { m }
    }
}

impl Matrix4 {
    pub fn identity() -> Self {
        Self { m: Mat4::IDENTITY }
    }

    pub fn rotation_x(angle: f32) -> Self {
        Self {
            m: Mat4::from_rotation_x(angle),
        }
    }

    pub fn rotation_y(angle: f32) -> Self {
        Self {
            m: Mat4::from_rotation_y(angle),
        }
    }

    pub fn rotation_z(angle: f32) -> Self {
        Self {
            m: Mat4::from_rotation_z(angle),
        }
    }

    pub fn as_mat4(&self) -> Mat4 {
        self.m
    }

    /// Replace this matrix with a rotation about the X axis.
    pub fn set_rotation_x(&mut self, angle: f32) {
        self.m = Mat4::from_rotation_x(angle);
    }

    /// Replace this matrix with a rotation about the Y axis.
    pub fn set_rotation_y(&mut self, angle: f32) {
        self.m = Mat4::from_rotation_y(angle);
    }

    /// Replace this matrix with a rotation about the Z axis.
    pub fn set_rotation_z(&mut self, angle: f32) {
        self.m = Mat4::from_rotation_z(angle);
    }

    /// Overwrite the translation column, leaving the rotation part untouched.
    pub fn set_translation(&mut self, v: Vec3) {
        self.m.w_axis.x = v.x;
        self.m.w_axis.y = v.y;
        self.m.w_axis.z = v.z;
    }

    /// Compose a translation on the right: `self = self * T(v)`.
    pub fn translate(&mut self, v: Vec3) {
        self.m *= Mat4::from_translation(v);
    }

    /// True inverse, valid for matrices that carry translation.
    pub fn invert(&self) -> Matrix4 {
        Self {
            m: self.m.inverse(),
        }
    }

    /// `self * other`
    pub fn multiply(&self, other: &Matrix4) -> Matrix4 {
        Self {
            m: self.m * other.m,
        }
    }

    /// Transform a point (implicit w = 1).
    pub fn transform(&self, point: Vec3) -> Vec4 {
        self.m * point.extend(1.0)
    }

    /// Column `index` without its w component.
    ///
    /// # Panics
    /// Panics if `index > 3`.
    pub fn axis(&self, index: usize) -> Vec3 {
        self.m.col(index).truncate()
    }

    /// OpenGL-compatible (column-major) element array.
    pub fn to_gl_array(&self) -> [f32; 16] {
        self.m.to_cols_array()
    }

    pub fn abs_diff_eq(&self, other: &Matrix4, max_abs_diff: f32) -> bool {
        self.m.abs_diff_eq(other.m, max_abs_diff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::FRAC_PI_2;

    fn assert_vec3_near(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-5, "{a:?} != {b:?}");
    }

    #[test]
    fn test_rotation_x_right_handed() {
        let m = Matrix4::rotation_x(FRAC_PI_2);
        let v = m.transform(Vec3::Y);
        assert_vec3_near(v.truncate(), Vec3::Z);
    }

    #[test]
    fn test_rotation_y_right_handed() {
        let mut m = Matrix4::identity();
        m.set_rotation_y(FRAC_PI_2);
        let v = m.transform(Vec3::Z);
        assert_vec3_near(v.truncate(), Vec3::X);
    }

    #[test]
    fn test_rotation_z_right_handed() {
        let mut m = Matrix4::identity();
        m.set_rotation_z(FRAC_PI_2);
        let v = m.transform(Vec3::X);
        assert_vec3_near(v.truncate(), Vec3::Y);
    }

    #[test]
    fn test_transform_applies_translation() {
        let mut m = Matrix4::identity();
        m.set_translation(Vec3::new(1.0, 2.0, 3.0));
        let v = m.transform(Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(v, Vec4::new(2.0, 3.0, 4.0, 1.0));
    }

    #[test]
    fn test_translate_composes_after_rotation() {
        let mut m = Matrix4::rotation_z(FRAC_PI_2);
        m.translate(Vec3::X);
        // Local +X becomes world +Y once rotated.
        assert_vec3_near(m.axis(3), Vec3::Y);
    }

    #[test]
    fn test_invert_with_translation() {
        let mut m = Matrix4::rotation_y(0.3);
        m.set_translation(Vec3::new(0.5, -1.0, 2.0));
        let product = m.multiply(&m.invert());
        assert!(product.abs_diff_eq(&Matrix4::identity(), 1e-5));
    }

    #[test]
    fn test_axis_extraction() {
        let m = Matrix4::rotation_x(FRAC_PI_2);
        assert_vec3_near(m.axis(0), Vec3::X);
        assert_vec3_near(m.axis(1), Vec3::Z);
        assert_vec3_near(m.axis(2), -Vec3::Y);
    }

    #[test]
    fn test_gl_array_is_column_major() {
        let mut m = Matrix4::identity();
        m.set_translation(Vec3::new(4.0, 5.0, 6.0));
        let raw = m.to_gl_array();
        assert_eq!(&raw[12..15], &[4.0, 5.0, 6.0]);
    }

    proptest! {
        #[test]
        fn prop_double_inverse_round_trip(
            h in -0.8f32..0.8,
            v in -0.8f32..0.8,
            tx in -5.0f32..5.0,
            tz in -5.0f32..5.0,
        ) {
            let mut m = Matrix4::rotation_y(h).multiply(&Matrix4::rotation_x(v));
            m.set_translation(Vec3::new(tx, 0.0, tz));
            prop_assert!(m.invert().invert().abs_diff_eq(&m, 1e-4));
        }
    }
}
