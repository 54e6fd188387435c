//! Gaze geometry: a 4x4 transform and the yaw/pitch camera built on it.

pub mod camera;
pub mod matrix;

pub use camera::Camera;
pub use matrix::Matrix4;
