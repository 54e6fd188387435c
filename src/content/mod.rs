//! Content framework: the lifecycle contract every task implements, the
//! shared sprite primitives, and the runner that owns episode bookkeeping.
//!
//! A task is constructed once (loading its textures and building its first
//! stimuli), then driven through [`Content::reset`] and [`Content::step`].
//! [`ContentRunner`] wraps a task with the step counter, the episode ceiling,
//! the random source and the latest draw list.

pub mod answer;
pub mod constants;
pub mod placement;
pub mod sprite;
pub mod textures;

pub use answer::{AnswerButtons, AnswerHit};
pub use placement::{CellGrid, Quadrant};
pub use sprite::{DrawDirective, DrawList, SignSprite, Sprite};
pub use textures::{TextureLoader, TextureRegistry};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::config::DEFAULT_MAX_STEP_COUNT;
use crate::core::types::{Color, TaskRng};
use crate::tasks::TaskKind;

/// Outcome of a finished trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrialResult {
    Success,
    Fail,
}

impl TrialResult {
    pub fn from_reward(reward: u32) -> Self {
        if reward > 0 {
            TrialResult::Success
        } else {
            TrialResult::Fail
        }
    }
}

/// Diagnostic info recorded on the tick a trial ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialInfo {
    pub result: TrialResult,
    /// Ticks since the response phase began, including the answering tick
    pub reaction_step: u32,
}

impl TrialInfo {
    pub fn new(result: TrialResult, reaction_step: u32) -> Self {
        Self {
            result,
            reaction_step,
        }
    }
}

/// What a task reports for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TaskStep {
    pub reward: u32,
    pub need_render: bool,
    pub info: Option<TrialInfo>,
}

impl TaskStep {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn redraw() -> Self {
        Self {
            need_render: true,
            ..Self::default()
        }
    }

    /// Trial ended: report reward and info, and repaint.
    pub fn finished(reward: u32, info: TrialInfo) -> Self {
        Self {
            reward,
            need_render: true,
            info: Some(info),
        }
    }
}

/// Lifecycle contract of an oculomotor task.
///
/// Construction plays the role of one-time initialisation: implementors load
/// their textures and build their first stimuli in `new`.
pub trait Content: Send {
    fn kind(&self) -> TaskKind;

    /// Clear colour of the content panel.
    fn background(&self) -> Color {
        Color::WHITE
    }

    /// Called at episode reset.
    fn reset(&mut self, rng: &mut TaskRng);

    /// Advance one tick with the gaze at `focus` (content-local coordinates).
    fn step(&mut self, focus: Vec2, rng: &mut TaskRng) -> TaskStep;

    /// Emit draw directives for the active phase only.
    fn render(&self, list: &mut DrawList);
}

/// What [`ContentRunner::step`] hands back to the environment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub reward: u32,
    pub done: bool,
    pub info: Option<TrialInfo>,
    /// Whether the draw list was refreshed on this tick
    pub rendered: bool,
}

/// Owns a task together with its step counter, random source and latest frame.
pub struct ContentRunner<C: Content + ?Sized = dyn Content> {
    content: Box<C>,
    rng: TaskRng,
    step_count: u32,
    max_step_count: u32,
    frame: DrawList,
}

impl<C: Content + ?Sized> ContentRunner<C> {
    /// Wrap a task and run an initial reset.
    pub fn new(content: Box<C>, rng: TaskRng) -> Self {
        Self::with_max_steps(content, rng, DEFAULT_MAX_STEP_COUNT)
    }

    pub fn with_max_steps(content: Box<C>, rng: TaskRng, max_step_count: u32) -> Self {
        debug_assert!(max_step_count > 0);
        let frame = DrawList::new(content.background());
        let mut runner = Self {
            content,
            rng,
            step_count: 0,
            max_step_count,
            frame,
        };
        runner.reset();
        runner
    }

    pub fn reset(&mut self) {
        self.content.reset(&mut self.rng);
        self.step_count = 0;
        self.render();
    }

    /// One tick. `done` is raised exactly on tick `max_step_count - 1`.
    pub fn step(&mut self, focus: Vec2) -> StepOutcome {
        let done = self.step_count >= self.max_step_count - 1;
        let step = self.content.step(focus, &mut self.rng);
        self.step_count += 1;

        if step.need_render {
            self.render();
        }

        if let Some(info) = step.info {
            tracing::debug!(
                task = %self.content.kind(),
                result = ?info.result,
                reaction_step = info.reaction_step,
                reward = step.reward,
                "Trial finished"
            );
        }

        StepOutcome {
            reward: step.reward,
            done,
            info: step.info,
            rendered: step.need_render,
        }
    }

    /// Rebuild the draw list from the task's current phase.
    pub fn render(&mut self) {
        self.frame.clear(self.content.background());
        self.content.render(&mut self.frame);
    }

    /// Latest rendered frame.
    pub fn bind(&self) -> &DrawList {
        &self.frame
    }

    pub fn step_count(&self) -> u32 {
        self.step_count
    }

    pub fn max_step_count(&self) -> u32 {
        self.max_step_count
    }

    pub fn kind(&self) -> TaskKind {
        self.content.kind()
    }

    pub fn content(&self) -> &C {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut C {
        &mut self.content
    }

    pub fn rng_mut(&mut self) -> &mut TaskRng {
        &mut self.rng
    }
}
