//! Oculomotor - gaze-controlled cognitive task environments
//!
//! An agent steers a camera by angle deltas; its gaze lands on a content
//! panel where one of six psychophysics tasks runs trial after trial.

pub mod content;
pub mod core;
pub mod environment;
pub mod geometry;
pub mod tasks;

pub use crate::content::{Content, ContentRunner, TrialInfo, TrialResult};
pub use crate::core::{EnvConfig, OculoError, Result};
pub use crate::environment::{Environment, Observation, RenderMode, StepResult};
pub use crate::tasks::TaskKind;
