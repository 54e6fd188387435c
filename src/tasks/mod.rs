//! The six oculomotor tasks and the factory that builds them by name.

pub mod change_detection;
pub mod multiple_object_tracking;
pub mod odd_one_out;
pub mod point_to_target;
pub mod random_dot;
pub mod visual_search;

pub use change_detection::ChangeDetection;
pub use multiple_object_tracking::MultipleObjectTracking;
pub use odd_one_out::OddOneOut;
pub use point_to_target::PointToTarget;
pub use random_dot::RandomDotMotion;
pub use visual_search::VisualSearch;

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::content::{Content, TextureLoader};
use crate::core::error::{OculoError, Result};
use crate::core::types::TaskRng;

/// Task identifier used by the factory and the runner CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    PointToTarget,
    ChangeDetection,
    OddOneOut,
    VisualSearch,
    MultipleObjectTracking,
    RandomDotMotion,
}

impl TaskKind {
    pub const ALL: [TaskKind; 6] = [
        TaskKind::PointToTarget,
        TaskKind::ChangeDetection,
        TaskKind::OddOneOut,
        TaskKind::VisualSearch,
        TaskKind::MultipleObjectTracking,
        TaskKind::RandomDotMotion,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TaskKind::PointToTarget => "point_to_target",
            TaskKind::ChangeDetection => "change_detection",
            TaskKind::OddOneOut => "odd_one_out",
            TaskKind::VisualSearch => "visual_search",
            TaskKind::MultipleObjectTracking => "multiple_object_tracking",
            TaskKind::RandomDotMotion => "random_dot_motion",
        }
    }

    /// Number of valid difficulty levels; `0` means the task takes none.
    pub fn difficulty_range(&self) -> u32 {
        match self {
            TaskKind::PointToTarget => point_to_target::DIFFICULTY_RANGE,
            TaskKind::ChangeDetection => change_detection::DIFFICULTY_RANGE,
            TaskKind::OddOneOut => odd_one_out::DIFFICULTY_RANGE,
            TaskKind::VisualSearch => visual_search::DIFFICULTY_RANGE,
            TaskKind::MultipleObjectTracking => multiple_object_tracking::DIFFICULTY_RANGE,
            TaskKind::RandomDotMotion => random_dot::DIFFICULTY_RANGE,
        }
    }

    /// Construct the task with its default options.
    pub fn build(
        &self,
        difficulty: Option<u32>,
        loader: &mut dyn TextureLoader,
        rng: &mut TaskRng,
    ) -> Result<Box<dyn Content>> {
        let content: Box<dyn Content> = match self {
            TaskKind::PointToTarget => Box::new(PointToTarget::new(difficulty, true, loader, rng)?),
            TaskKind::ChangeDetection => Box::new(ChangeDetection::new(difficulty, loader, rng)?),
            TaskKind::OddOneOut => Box::new(OddOneOut::new(difficulty, loader, rng)?),
            TaskKind::VisualSearch => Box::new(VisualSearch::new(difficulty, loader)?),
            TaskKind::MultipleObjectTracking => {
                Box::new(MultipleObjectTracking::new(difficulty, loader)?)
            }
            TaskKind::RandomDotMotion => Box::new(RandomDotMotion::new(difficulty, loader, rng)?),
        };
        tracing::debug!(task = %self, ?difficulty, "Built task content");
        Ok(content)
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TaskKind {
    type Err = OculoError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "point_to_target" | "ptt" => Ok(TaskKind::PointToTarget),
            "change_detection" | "cd" => Ok(TaskKind::ChangeDetection),
            "odd_one_out" | "ooo" => Ok(TaskKind::OddOneOut),
            "visual_search" | "vs" => Ok(TaskKind::VisualSearch),
            "multiple_object_tracking" | "mot" => Ok(TaskKind::MultipleObjectTracking),
            "random_dot_motion" | "random_dot" | "rdm" => Ok(TaskKind::RandomDotMotion),
            _ => Err(OculoError::UnknownTask(s.to_string())),
        }
    }
}

/// Reject difficulties outside `0..range` at construction time.
pub(crate) fn check_difficulty(kind: TaskKind, difficulty: Option<u32>) -> Result<()> {
    let range = kind.difficulty_range();
    match difficulty {
        Some(d) if d >= range => Err(OculoError::InvalidDifficulty {
            task: kind.name(),
            difficulty: d,
            range,
        }),
        _ => Ok(()),
    }
}

/// Fixed difficulty, or a fresh uniform draw from `0..range`.
pub(crate) fn trial_difficulty(difficulty: Option<u32>, range: u32, rng: &mut TaskRng) -> u32 {
    difficulty.unwrap_or_else(|| rng.gen_range(0..range))
}
