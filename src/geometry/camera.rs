//! Yaw/pitch gaze camera with clamped angles.

use glam::Vec3;

use super::matrix::Matrix4;
use crate::core::config::CameraConfig;

/// Gaze camera: two bounded angles and the transform derived from them.
///
/// The transform is recomputed on every angle change, horizontal rotation
/// applied after vertical: `rot_y(h) * rot_x(v)`.
#[derive(Debug, Clone)]
pub struct Camera {
    config: CameraConfig,
    angle_h: f32,
    angle_v: f32,
    transform: Matrix4,
}

impl Camera {
    pub fn new(config: CameraConfig) -> Self {
        let mut camera = Self {
            config,
            angle_h: 0.0,
            angle_v: 0.0,
            transform: Matrix4::identity(),
        };
        camera.reset();
        camera
    }

    /// Restore horizontal = 0 and vertical = configured initial pitch.
    pub fn reset(&mut self) {
        self.angle_h = 0.0;
        self.angle_v = self.config.initial_angle_v;
        self.update_transform();
    }

    /// Add angle deltas, clamping each axis independently.
    pub fn change_angle(&mut self, d_angle_h: f32, d_angle_v: f32) {
        let max_h = self.config.max_angle_h;
        let max_v = self.config.max_angle_v;
        self.angle_h = (self.angle_h + d_angle_h).clamp(-max_h, max_h);
        self.angle_v = (self.angle_v + d_angle_v).clamp(-max_v, max_v);
        self.update_transform();
    }

    /// Current absolute (horizontal, vertical) angles in radians.
    pub fn angles(&self) -> (f32, f32) {
        (self.angle_h, self.angle_v)
    }

    pub fn transform(&self) -> &Matrix4 {
        &self.transform
    }

    /// Forward is the camera's -Z axis.
    pub fn forward(&self) -> Vec3 {
        -self.transform.axis(2)
    }

    /// World-to-camera matrix for the renderer.
    pub fn inverse_matrix(&self) -> Matrix4 {
        self.transform.invert()
    }

    pub fn fov_y_degrees(&self) -> f32 {
        self.config.fov_y_degrees
    }

    fn update_transform(&mut self) {
        let pitch = Matrix4::rotation_x(self.angle_v);
        let yaw = Matrix4::rotation_y(self.angle_h);
        self.transform = yaw.multiply(&pitch);
    }
}
