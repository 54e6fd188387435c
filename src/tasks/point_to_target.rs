//! Point-To-Target: look at the start marker, then saccade to the target.
//!
//! On entering the target phase the target and an optional lure are placed in
//! two different quadrants. Difficulty sets their relative sizes:
//!
//! | difficulty | target | lure  |
//! |------------|--------|-------|
//! | 0          | large  | small |
//! | 1          | equal, both small or both large (50/50) ||
//! | 2          | small  | large |
//!
//! Hitting the target pays 2, hitting the lure pays 1; either returns to start.

use glam::Vec2;
use rand::seq::index;
use rand::Rng;

use super::{check_difficulty, trial_difficulty, TaskKind};
use crate::content::constants::START_MARKER_HALF_WIDTH;
use crate::content::placement::{quadrants_around_center, Quadrant};
use crate::content::textures::assets;
use crate::content::{
    Content, DrawList, Sprite, TaskStep, TextureLoader, TrialInfo, TrialResult,
};
use crate::core::error::Result;
use crate::core::types::{Color, TaskRng};

pub const DIFFICULTY_RANGE: u32 = 3;

pub const TARGET_HALF_WIDTH_SMALL: f32 = 0.1;
pub const TARGET_HALF_WIDTH_LARGE: f32 = 0.2;

pub const TARGET_REWARD: u32 = 2;
pub const LURE_REWARD: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    Target { reaction_step: u32 },
}

pub struct PointToTarget {
    difficulty: Option<u32>,
    use_lure: bool,
    quadrants: [Quadrant; 4],
    start_sprite: Sprite,
    target_sprite: Sprite,
    lure_sprite: Sprite,
    phase: Phase,
}

impl PointToTarget {
    pub fn new(
        difficulty: Option<u32>,
        use_lure: bool,
        loader: &mut dyn TextureLoader,
        rng: &mut TaskRng,
    ) -> Result<Self> {
        check_difficulty(TaskKind::PointToTarget, difficulty)?;

        let start_texture = loader.load(assets::START_MARKER)?;
        let e_texture = loader.load(assets::E_MARKER)?;

        let mut task = Self {
            difficulty,
            use_lure,
            // Margin keeps targets clear of the start marker.
            quadrants: quadrants_around_center(START_MARKER_HALF_WIDTH),
            start_sprite: Sprite::start_marker(start_texture),
            target_sprite: Sprite::new(e_texture, Vec2::ZERO, TARGET_HALF_WIDTH_SMALL)
                .with_color(Color::BLACK),
            lure_sprite: Sprite::new(e_texture, Vec2::ZERO, TARGET_HALF_WIDTH_SMALL)
                .with_rotation(1)
                .with_color(Color::BLACK),
            phase: Phase::Start,
        };
        task.apply_difficulty(rng);
        Ok(task)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn difficulty(&self) -> Option<u32> {
        self.difficulty
    }

    pub fn target(&self) -> &Sprite {
        &self.target_sprite
    }

    pub fn lure(&self) -> &Sprite {
        &self.lure_sprite
    }

    pub fn quadrants(&self) -> &[Quadrant; 4] {
        &self.quadrants
    }

    /// (target, lure) half widths for a difficulty level.
    pub fn half_widths(difficulty: u32, rng: &mut TaskRng) -> (f32, f32) {
        match difficulty {
            0 => (TARGET_HALF_WIDTH_LARGE, TARGET_HALF_WIDTH_SMALL),
            1 => {
                if rng.gen_bool(0.5) {
                    (TARGET_HALF_WIDTH_SMALL, TARGET_HALF_WIDTH_SMALL)
                } else {
                    (TARGET_HALF_WIDTH_LARGE, TARGET_HALF_WIDTH_LARGE)
                }
            }
            _ => (TARGET_HALF_WIDTH_SMALL, TARGET_HALF_WIDTH_LARGE),
        }
    }

    fn apply_difficulty(&mut self, rng: &mut TaskRng) {
        let level = trial_difficulty(self.difficulty, DIFFICULTY_RANGE, rng);
        let (target, lure) = Self::half_widths(level, rng);
        self.target_sprite.half_width = target;
        self.lure_sprite.half_width = lure;
    }

    fn locate_targets(&mut self, rng: &mut TaskRng) {
        let picks = index::sample(rng, self.quadrants.len(), 2);
        let target_quadrant = self.quadrants[picks.index(0)];
        let lure_quadrant = self.quadrants[picks.index(1)];

        self.target_sprite.position =
            target_quadrant.random_location(self.target_sprite.half_width, rng);
        if self.use_lure {
            self.lure_sprite.position =
                lure_quadrant.random_location(self.lure_sprite.half_width, rng);
        }
    }

    fn enter_target_phase(&mut self, rng: &mut TaskRng) {
        self.apply_difficulty(rng);
        self.locate_targets(rng);
        self.phase = Phase::Target { reaction_step: 0 };
    }
}

impl Content for PointToTarget {
    fn kind(&self) -> TaskKind {
        TaskKind::PointToTarget
    }

    fn reset(&mut self, _rng: &mut TaskRng) {
        self.phase = Phase::Start;
    }

    fn step(&mut self, focus: Vec2, rng: &mut TaskRng) -> TaskStep {
        match &mut self.phase {
            Phase::Start => {
                if self.start_sprite.contains(focus) {
                    self.enter_target_phase(rng);
                    return TaskStep::redraw();
                }
                TaskStep::idle()
            }
            Phase::Target { reaction_step } => {
                *reaction_step += 1;
                let reaction_step = *reaction_step;

                let (reward, result) = if self.target_sprite.contains(focus) {
                    (TARGET_REWARD, TrialResult::Success)
                } else if self.use_lure && self.lure_sprite.contains(focus) {
                    (LURE_REWARD, TrialResult::Fail)
                } else {
                    return TaskStep::idle();
                };

                self.phase = Phase::Start;
                TaskStep::finished(reward, TrialInfo::new(result, reaction_step))
            }
        }
    }

    fn render(&self, list: &mut DrawList) {
        match self.phase {
            Phase::Start => self.start_sprite.draw(list),
            Phase::Target { .. } => {
                if self.use_lure {
                    self.lure_sprite.draw(list);
                }
                self.target_sprite.draw(list);
            }
        }
    }
}
