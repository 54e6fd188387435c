//! Renderer collaborator and the headless implementation.
//!
//! The environment hands the renderer a frozen [`SceneView`] snapshot and
//! never lets it reach back into task state.

use serde::{Deserialize, Serialize};

use crate::content::{DrawDirective, DrawList};
use crate::core::types::Color;
use crate::geometry::Matrix4;

/// Frozen snapshot of everything needed to draw one frame.
#[derive(Debug, Clone, Copy)]
pub struct SceneView<'a> {
    pub draw_list: &'a DrawList,
    /// World-to-camera matrix (inverse of the camera transform)
    pub view: Matrix4,
    pub fov_y_degrees: f32,
    pub plane_distance: f32,
}

/// Turns scene snapshots into frames.
pub trait Renderer {
    type Frame;

    /// Draw the scene into a square frame of `resolution` pixels.
    fn render_scene(&mut self, scene: &SceneView<'_>, resolution: u32) -> Self::Frame;

    /// Show a frame on the human display path.
    fn present(&mut self, frame: &Self::Frame);

    /// Release display resources.
    fn close(&mut self) {}
}

/// Frame produced by [`HeadlessRenderer`]: the draw call list instead of pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneFrame {
    pub resolution: u32,
    /// Column-major view matrix
    pub view: [f32; 16],
    pub fov_y_degrees: f32,
    pub plane_distance: f32,
    pub background: Color,
    pub sprites: Vec<DrawDirective>,
}

/// Renderer that records scenes without a GPU.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    frames_rendered: u64,
    frames_presented: u64,
    closed: bool,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Renderer for HeadlessRenderer {
    type Frame = SceneFrame;

    fn render_scene(&mut self, scene: &SceneView<'_>, resolution: u32) -> SceneFrame {
        self.frames_rendered += 1;
        SceneFrame {
            resolution,
            view: scene.view.to_gl_array(),
            fov_y_degrees: scene.fov_y_degrees,
            plane_distance: scene.plane_distance,
            background: scene.draw_list.background(),
            sprites: scene.draw_list.sprites().to_vec(),
        }
    }

    fn present(&mut self, frame: &SceneFrame) {
        self.frames_presented += 1;
        tracing::trace!(
            resolution = frame.resolution,
            sprites = frame.sprites.len(),
            "Presented frame"
        );
    }

    fn close(&mut self) {
        self.closed = true;
    }
}
