//! Environment: couples the gaze camera with one task.
//!
//! Each `step` turns the camera by the action, projects the gaze onto the
//! content plane, advances the task and renders an observation.

pub mod renderer;

pub use renderer::{HeadlessRenderer, Renderer, SceneFrame, SceneView};

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::content::{Content, ContentRunner, TextureRegistry, TrialInfo};
use crate::core::config::EnvConfig;
use crate::core::error::{OculoError, Result};
use crate::core::types::{task_rng, TaskRng};
use crate::geometry::Camera;
use crate::tasks::TaskKind;

/// How [`Environment::render`] hands out the display frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Present on the display path and return nothing
    Human,
    /// Return the display-resolution frame to the caller
    RgbArray,
}

/// What the agent sees after each reset or step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation<F> {
    pub screen: F,
    /// Absolute (horizontal, vertical) camera angles in radians
    pub angle: (f32, f32),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepResult<F> {
    pub observation: Observation<F>,
    pub reward: u32,
    pub done: bool,
    pub info: Option<TrialInfo>,
    /// Whether the task asked for a repaint on this tick
    pub rendered: bool,
}

/// Check that an action is exactly `[d_angle_h, d_angle_v]` with finite values.
pub fn parse_action(action: &[f32]) -> Result<(f32, f32)> {
    match *action {
        [dh, dv] if dh.is_finite() && dv.is_finite() => Ok((dh, dv)),
        [_, _] => Err(OculoError::InvalidAction(format!(
            "non-finite component in {action:?}"
        ))),
        _ => Err(OculoError::InvalidAction(format!(
            "expected 2 components, got {}",
            action.len()
        ))),
    }
}

/// Intersect the gaze ray with the content plane at `plane_distance`.
///
/// The forward depth is clamped to `min_depth` so a gaze running parallel to
/// (or away from) the plane still yields a finite position.
pub fn project_focus(forward: Vec3, plane_distance: f32, min_depth: f32) -> Vec2 {
    let mut depth = -forward.z;
    if depth < min_depth {
        warn!(depth, min_depth, "Degenerate gaze projection, clamping forward depth");
        depth = min_depth;
    }
    let scale = plane_distance / depth;
    Vec2::new(forward.x * scale, forward.y * scale)
}

pub struct Environment<R: Renderer = HeadlessRenderer> {
    config: EnvConfig,
    camera: Camera,
    runner: ContentRunner,
    renderer: R,
}

impl Environment<HeadlessRenderer> {
    /// Build a task by kind with in-memory textures and a headless renderer.
    pub fn for_task(kind: TaskKind, difficulty: Option<u32>, config: EnvConfig) -> Result<Self> {
        let mut rng = task_rng(config.seed);
        let mut registry = TextureRegistry::new();
        let content = kind.build(difficulty, &mut registry, &mut rng)?;
        Self::new(content, rng, config, HeadlessRenderer::new())
    }
}

impl<R: Renderer> Environment<R> {
    pub fn new(
        content: Box<dyn Content>,
        rng: TaskRng,
        config: EnvConfig,
        renderer: R,
    ) -> Result<Self> {
        config.validate()?;
        let camera = Camera::new(config.camera.clone());
        let runner = ContentRunner::with_max_steps(content, rng, config.max_step_count);
        info!(
            task = %runner.kind(),
            max_step_count = config.max_step_count,
            seed = ?config.seed,
            "Created environment"
        );
        Ok(Self {
            config,
            camera,
            runner,
            renderer,
        })
    }

    /// Reset the task, then the camera.
    pub fn reset(&mut self) -> Observation<R::Frame> {
        self.runner.reset();
        self.camera.reset();
        info!(task = %self.runner.kind(), "Reset environment");
        self.observation()
    }

    /// Apply `[d_angle_h, d_angle_v]` (radians) and advance one tick.
    ///
    /// A malformed action is rejected before any state changes.
    pub fn step(&mut self, action: &[f32]) -> Result<StepResult<R::Frame>> {
        let (dh, dv) = parse_action(action)?;
        self.camera.change_angle(dh, dv);

        let focus = self.focus();
        let outcome = self.runner.step(focus);

        Ok(StepResult {
            observation: self.observation(),
            reward: outcome.reward,
            done: outcome.done,
            info: outcome.info,
            rendered: outcome.rendered,
        })
    }

    /// Display-resolution frame; `Human` presents it instead of returning it.
    pub fn render(&mut self, mode: RenderMode) -> Option<R::Frame> {
        let frame = self.render_frame(self.config.on_buffer_width);
        match mode {
            RenderMode::RgbArray => Some(frame),
            RenderMode::Human => {
                self.renderer.present(&frame);
                None
            }
        }
    }

    pub fn close(&mut self) {
        self.renderer.close();
    }

    /// Current gaze position on the content plane.
    pub fn focus(&self) -> Vec2 {
        project_focus(
            self.camera.forward(),
            self.config.plane_distance,
            self.config.min_forward_depth,
        )
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn runner(&self) -> &ContentRunner {
        &self.runner
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    fn observation(&mut self) -> Observation<R::Frame> {
        Observation {
            screen: self.render_frame(self.config.off_buffer_width),
            angle: self.camera.angles(),
        }
    }

    fn render_frame(&mut self, resolution: u32) -> R::Frame {
        let scene = SceneView {
            draw_list: self.runner.bind(),
            view: self.camera.inverse_matrix(),
            fov_y_degrees: self.camera.fov_y_degrees(),
            plane_distance: self.config.plane_distance,
        };
        self.renderer.render_scene(&scene, resolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(kind: TaskKind) -> Environment {
        Environment::for_task(kind, None, EnvConfig::with_seed(42)).unwrap()
    }

    #[test]
    fn test_parse_action_shapes() {
        assert_eq!(parse_action(&[0.1, -0.2]).unwrap(), (0.1, -0.2));
        assert!(matches!(parse_action(&[]), Err(OculoError::InvalidAction(_))));
        assert!(matches!(parse_action(&[0.1]), Err(OculoError::InvalidAction(_))));
        assert!(matches!(
            parse_action(&[0.1, 0.2, 0.3]),
            Err(OculoError::InvalidAction(_))
        ));
        assert!(matches!(
            parse_action(&[f32::NAN, 0.0]),
            Err(OculoError::InvalidAction(_))
        ));
        assert!(matches!(
            parse_action(&[0.0, f32::INFINITY]),
            Err(OculoError::InvalidAction(_))
        ));
    }

    #[test]
    fn test_projection_straight_ahead_hits_origin() {
        let focus = project_focus(Vec3::new(0.0, 0.0, -1.0), 3.0, 1e-3);
        assert_eq!(focus, Vec2::ZERO);
    }

    #[test]
    fn test_projection_perspective_divide() {
        let forward = Vec3::new(0.3, -0.2, -0.5);
        let focus = project_focus(forward, 3.0, 1e-3);
        assert!((focus - Vec2::new(1.8, -1.2)).length() < 1e-5);
    }

    #[test]
    fn test_projection_clamps_degenerate_depth() {
        let focus = project_focus(Vec3::new(1.0, 0.0, 0.0), 3.0, 1e-3);
        assert!(focus.is_finite());
        assert!((focus.x - 3000.0).abs() < 1e-2);

        let behind = project_focus(Vec3::new(0.0, 0.5, 0.8), 3.0, 1e-3);
        assert!(behind.is_finite());
    }

    #[test]
    fn test_initial_focus_is_above_center() {
        let env = env(TaskKind::PointToTarget);
        let focus = env.focus();
        let expected = 3.0 * 10.0_f32.to_radians().tan();
        assert!(focus.x.abs() < 1e-5);
        assert!((focus.y - expected).abs() < 1e-4);
    }

    #[test]
    fn test_invalid_action_leaves_state_untouched() {
        let mut env = env(TaskKind::VisualSearch);
        let angles = env.camera().angles();
        assert!(env.step(&[0.5]).is_err());
        assert_eq!(env.camera().angles(), angles);
        assert_eq!(env.runner().step_count(), 0);
    }

    #[test]
    fn test_step_reports_absolute_angles() {
        let mut env = env(TaskKind::RandomDotMotion);
        let result = env.step(&[0.1, -0.05]).unwrap();
        let (h, v) = result.observation.angle;
        assert!((h - 0.1).abs() < 1e-6);
        assert!((v - (10.0_f32.to_radians() - 0.05)).abs() < 1e-6);
        assert_eq!(result.observation.screen.resolution, 128);
    }

    #[test]
    fn test_reset_restores_camera_and_counter() {
        let mut env = env(TaskKind::ChangeDetection);
        env.step(&[0.3, 0.3]).unwrap();
        env.step(&[0.3, 0.3]).unwrap();
        let obs = env.reset();
        assert_eq!(obs.angle.0, 0.0);
        assert_eq!(env.runner().step_count(), 0);
    }

    #[test]
    fn test_render_modes() {
        let mut env = env(TaskKind::OddOneOut);
        let frame = env.render(RenderMode::RgbArray).unwrap();
        assert_eq!(frame.resolution, 640);
        assert!(env.render(RenderMode::Human).is_none());
        assert_eq!(env.renderer().frames_presented(), 1);
        env.close();
        assert!(env.renderer().is_closed());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EnvConfig {
            plane_distance: 0.0,
            ..EnvConfig::default()
        };
        let result = Environment::for_task(TaskKind::PointToTarget, None, config);
        assert!(matches!(result, Err(OculoError::InvalidConfig(_))));
    }
}
