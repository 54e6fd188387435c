//! Change Detection: memorise a set of coloured signs, wait through a blank
//! interval, then answer whether one of them changed.
//!
//! The trial runs `Start -> Learning -> Interval -> Evaluation -> Start`.
//! With probability 0.4 one sign changes its colour, its texture or (for the
//! E glyph only) its rotation before evaluation. YES on the left, NO on the
//! right; a correct answer pays 1.

use glam::Vec2;
use rand::seq::SliceRandom;
use rand::Rng;

use super::{check_difficulty, trial_difficulty, TaskKind};
use crate::content::textures::assets;
use crate::content::{
    AnswerButtons, CellGrid, Content, DrawList, Sprite, TaskStep, TextureLoader, TrialInfo,
    TrialResult,
};
use crate::core::error::Result;
use crate::core::types::{Color, TaskRng, TextureId};

pub const DIFFICULTY_RANGE: u32 = 5;

pub const GRID_DIVISION: usize = 8;
pub const GRID_HALF_WIDTH: f32 = 0.1;

pub const LEARNING_STEPS: u32 = 20;
pub const INTERVAL_STEPS: u32 = 10;

/// A draw below this leaves the stimuli untouched.
pub const TARGET_CHANGE_THRESHOLD: f64 = 0.6;

/// Fewest signs shown; difficulty adds to it.
pub const BASE_TARGET_COUNT: usize = 2;

pub const COLORS: [Color; 5] = [
    Color::rgb(1.0, 0.0, 0.75),  // magenta
    Color::rgb(1.0, 0.75, 0.0),  // orange
    Color::rgb(0.0, 1.0, 1.0),   // light blue
    Color::rgb(0.0, 0.25, 1.0),  // blue
    Color::rgb(0.5, 0.0, 1.0),   // deep purple
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    Learning { count: u32 },
    Interval { count: u32 },
    Evaluation { reaction_step: u32 },
}

/// Which attribute of a sign gets altered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Change {
    Color,
    Texture,
    Rotation,
}

pub struct ChangeDetection {
    difficulty: Option<u32>,
    grid: CellGrid,
    e_texture: TextureId,
    box_texture: TextureId,
    start_sprite: Sprite,
    buttons: AnswerButtons,
    targets: Vec<Sprite>,
    changed: bool,
    phase: Phase,
}

impl ChangeDetection {
    pub fn new(
        difficulty: Option<u32>,
        loader: &mut dyn TextureLoader,
        rng: &mut TaskRng,
    ) -> Result<Self> {
        check_difficulty(TaskKind::ChangeDetection, difficulty)?;

        let start_texture = loader.load(assets::START_MARKER)?;
        let e_texture = loader.load(assets::E_MARKER)?;
        let box_texture = loader.load(assets::WHITE_BOX)?;

        let mut task = Self {
            difficulty,
            grid: CellGrid::new(GRID_DIVISION, GRID_HALF_WIDTH),
            e_texture,
            box_texture,
            start_sprite: Sprite::start_marker(start_texture),
            buttons: AnswerButtons::at_sides(box_texture),
            targets: Vec::new(),
            changed: false,
            phase: Phase::Start,
        };
        task.prepare_targets(rng);
        Ok(task)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn targets(&self) -> &[Sprite] {
        &self.targets
    }

    /// Whether a sign was altered for the current evaluation.
    pub fn changed(&self) -> bool {
        self.changed
    }

    pub fn buttons(&self) -> &AnswerButtons {
        &self.buttons
    }

    fn prepare_targets(&mut self, rng: &mut TaskRng) {
        let level = trial_difficulty(self.difficulty, DIFFICULTY_RANGE, rng);
        let count = BASE_TARGET_COUNT + level as usize;
        let textures = [self.e_texture, self.box_texture];

        self.targets = self
            .grid
            .sample_centers(count, rng)
            .into_iter()
            .map(|center| {
                let texture = textures[rng.gen_range(0..textures.len())];
                let color = COLORS[rng.gen_range(0..COLORS.len())];
                Sprite::new(texture, center, self.grid.half_width).with_color(color)
            })
            .collect();
        self.changed = false;
    }

    fn apply_change(&mut self, rng: &mut TaskRng) {
        self.changed = rng.gen::<f64>() >= TARGET_CHANGE_THRESHOLD;
        if !self.changed {
            return;
        }

        let index = rng.gen_range(0..self.targets.len());
        let is_e = self.targets[index].texture == self.e_texture;
        let options: &[Change] = if is_e {
            &[Change::Color, Change::Texture, Change::Rotation]
        } else {
            &[Change::Color, Change::Texture]
        };
        let change = options.choose(rng).copied().unwrap_or(Change::Color);

        let (e_texture, box_texture) = (self.e_texture, self.box_texture);
        let target = &mut self.targets[index];
        match change {
            Change::Color => {
                let others: Vec<Color> = COLORS
                    .iter()
                    .copied()
                    .filter(|c| *c != target.color)
                    .collect();
                if let Some(color) = others.choose(rng) {
                    target.color = *color;
                }
            }
            Change::Texture => {
                target.texture = if is_e { box_texture } else { e_texture };
            }
            Change::Rotation => {
                target.rotation = (target.rotation + rng.gen_range(1..4)) % 4;
            }
        }
        tracing::trace!(index, ?change, "Changed target");
    }
}

impl Content for ChangeDetection {
    fn kind(&self) -> TaskKind {
        TaskKind::ChangeDetection
    }

    fn reset(&mut self, rng: &mut TaskRng) {
        self.prepare_targets(rng);
        self.phase = Phase::Start;
    }

    fn step(&mut self, focus: Vec2, rng: &mut TaskRng) -> TaskStep {
        match &mut self.phase {
            Phase::Start => {
                if !self.start_sprite.contains(focus) {
                    return TaskStep::idle();
                }
                self.phase = Phase::Learning { count: 0 };
                TaskStep::redraw()
            }
            Phase::Learning { count } => {
                *count += 1;
                if *count < LEARNING_STEPS {
                    return TaskStep::idle();
                }
                self.phase = Phase::Interval { count: 0 };
                TaskStep::redraw()
            }
            Phase::Interval { count } => {
                *count += 1;
                if *count < INTERVAL_STEPS {
                    return TaskStep::idle();
                }
                self.apply_change(rng);
                self.phase = Phase::Evaluation { reaction_step: 0 };
                TaskStep::redraw()
            }
            Phase::Evaluation { reaction_step } => {
                *reaction_step += 1;
                let reaction_step = *reaction_step;

                let hit = self.buttons.detect_hit(focus);
                if !hit.is_hit() {
                    return TaskStep::idle();
                }
                let reward = hit.reward(self.changed);
                let info = TrialInfo::new(TrialResult::from_reward(reward), reaction_step);

                self.prepare_targets(rng);
                self.phase = Phase::Start;
                TaskStep::finished(reward, info)
            }
        }
    }

    fn render(&self, list: &mut DrawList) {
        match self.phase {
            Phase::Start => self.start_sprite.draw(list),
            Phase::Learning { .. } => self.targets.iter().for_each(|t| t.draw(list)),
            Phase::Interval { .. } => {}
            Phase::Evaluation { .. } => {
                self.targets.iter().for_each(|t| t.draw(list));
                self.buttons.draw(list);
            }
        }
    }
}
