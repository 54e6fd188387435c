//! Multiple Object Tracking: remember the highlighted ball, follow it while
//! all balls drift, then say whether the re-highlighted ball is the same one.
//!
//! Difficulty sets the ball count (`2 + difficulty`). Balls move at constant
//! speed inside a square region and never overlap; a ball that cannot find a
//! legal heading within the watchdog budget stays put for the tick.

use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;

use super::{check_difficulty, trial_difficulty, TaskKind};
use crate::content::constants::WATCHDOG_LIMIT;
use crate::content::textures::assets;
use crate::content::{
    AnswerButtons, Content, DrawList, Sprite, TaskStep, TextureLoader, TrialInfo, TrialResult,
};
use crate::core::error::Result;
use crate::core::types::{Color, TaskRng, TextureId};

pub const DIFFICULTY_RANGE: u32 = 6;

pub const BALL_HALF_WIDTH: f32 = 0.1;
/// Balls stay within `[-MOVE_REGION, MOVE_REGION]` on both axes.
pub const MOVE_REGION: f32 = 0.7;
pub const MOVE_SPEED: f32 = 0.05;

pub const MEMORY_STEPS: u32 = 30;
pub const MOVE_STEPS: u32 = 60;

pub const BASE_BALL_COUNT: usize = 2;

pub const BALL_MEMORY_COLOR: Color = Color::rgb(0.0, 0.78, 0.0);
pub const BALL_RESPONSE_COLOR: Color = Color::rgb(0.0, 0.0, 0.78);
pub const BALL_COLOR: Color = Color::BLACK;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    Memory { count: u32 },
    Move { count: u32 },
    Response { reaction_step: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub position: Vec2,
    /// Heading in radians
    pub direction: f32,
    pub memory_target: bool,
    pub response_target: bool,
}

impl Ball {
    fn new(memory_target: bool, response_target: bool, rng: &mut TaskRng) -> Self {
        let mut ball = Self {
            position: Vec2::ZERO,
            direction: 0.0,
            memory_target,
            response_target,
        };
        ball.randomize_position(rng);
        ball.randomize_direction(rng);
        ball
    }

    fn randomize_position(&mut self, rng: &mut TaskRng) {
        self.position = Vec2::new(
            rng.gen_range(-MOVE_REGION..MOVE_REGION),
            rng.gen_range(-MOVE_REGION..MOVE_REGION),
        );
    }

    fn randomize_direction(&mut self, rng: &mut TaskRng) {
        self.direction = rng.gen_range(-PI..PI);
    }

    fn candidate(&self) -> Vec2 {
        self.position + Vec2::new(self.direction.cos(), self.direction.sin()) * MOVE_SPEED
    }

    pub fn is_correct_target(&self) -> bool {
        self.memory_target && self.response_target
    }
}

/// Whether a ball at `pos` would touch any of `others`.
fn conflicts(pos: Vec2, others: impl IntoIterator<Item = Vec2>) -> bool {
    let min_dist = BALL_HALF_WIDTH * 2.0;
    others
        .into_iter()
        .any(|other| pos.distance_squared(other) < min_dist * min_dist)
}

fn out_of_region(pos: Vec2) -> bool {
    pos.x.abs() > MOVE_REGION || pos.y.abs() > MOVE_REGION
}

pub struct MultipleObjectTracking {
    difficulty: Option<u32>,
    ball_texture: TextureId,
    start_sprite: Sprite,
    buttons: AnswerButtons,
    balls: Vec<Ball>,
    phase: Phase,
}

impl MultipleObjectTracking {
    pub fn new(difficulty: Option<u32>, loader: &mut dyn TextureLoader) -> Result<Self> {
        check_difficulty(TaskKind::MultipleObjectTracking, difficulty)?;

        let start_texture = loader.load(assets::START_MARKER)?;
        let white_texture = loader.load(assets::WHITE_BOX)?;
        let ball_texture = loader.load(assets::BALL)?;

        Ok(Self {
            difficulty,
            ball_texture,
            start_sprite: Sprite::start_marker(start_texture),
            buttons: AnswerButtons::at_bottom(white_texture),
            balls: Vec::new(),
            phase: Phase::Start,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn buttons(&self) -> &AnswerButtons {
        &self.buttons
    }

    /// Whether the response highlight is on the remembered ball.
    pub fn is_target_correct(&self) -> bool {
        self.balls.first().map_or(false, Ball::is_correct_target)
    }

    fn prepare_balls(&mut self, rng: &mut TaskRng) {
        let level = trial_difficulty(self.difficulty, DIFFICULTY_RANGE, rng);
        let count = BASE_BALL_COUNT + level as usize;
        let response_index = if rng.gen_bool(0.5) {
            0
        } else {
            rng.gen_range(1..count)
        };

        self.balls.clear();
        for i in 0..count {
            let mut ball = Ball::new(i == 0, i == response_index, rng);
            let mut attempts = 1;
            while conflicts(ball.position, self.balls.iter().map(|b| b.position)) {
                if attempts >= WATCHDOG_LIMIT {
                    tracing::warn!(ball = i, "Watchdog reached placing ball");
                    break;
                }
                ball.randomize_position(rng);
                attempts += 1;
            }
            self.balls.push(ball);
        }
    }

    /// Move balls one after another against the others' current positions.
    fn move_balls(&mut self, rng: &mut TaskRng) {
        for i in 0..self.balls.len() {
            let mut moved = None;
            for attempt in 0..WATCHDOG_LIMIT {
                let candidate = self.balls[i].candidate();
                let others = self
                    .balls
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .map(|(_, b)| b.position);
                if !out_of_region(candidate) && !conflicts(candidate, others) {
                    moved = Some(candidate);
                    break;
                }
                if attempt + 1 < WATCHDOG_LIMIT {
                    self.balls[i].randomize_direction(rng);
                }
            }
            match moved {
                Some(position) => self.balls[i].position = position,
                None => tracing::warn!(ball = i, "Watchdog reached moving ball"),
            }
        }
    }

    fn ball_color(&self, ball: &Ball) -> Color {
        match self.phase {
            Phase::Memory { .. } if ball.memory_target => BALL_MEMORY_COLOR,
            Phase::Response { .. } if ball.response_target => BALL_RESPONSE_COLOR,
            _ => BALL_COLOR,
        }
    }
}

impl Content for MultipleObjectTracking {
    fn kind(&self) -> TaskKind {
        TaskKind::MultipleObjectTracking
    }

    fn reset(&mut self, _rng: &mut TaskRng) {
        self.phase = Phase::Start;
    }

    fn step(&mut self, focus: Vec2, rng: &mut TaskRng) -> TaskStep {
        match &mut self.phase {
            Phase::Start => {
                if !self.start_sprite.contains(focus) {
                    return TaskStep::idle();
                }
                self.prepare_balls(rng);
                self.phase = Phase::Memory { count: 0 };
                TaskStep::redraw()
            }
            Phase::Memory { count } => {
                *count += 1;
                if *count < MEMORY_STEPS {
                    return TaskStep::idle();
                }
                self.phase = Phase::Move { count: 0 };
                TaskStep::redraw()
            }
            Phase::Move { count } => {
                *count += 1;
                if *count >= MOVE_STEPS {
                    self.phase = Phase::Response { reaction_step: 0 };
                }
                self.move_balls(rng);
                TaskStep::redraw()
            }
            Phase::Response { reaction_step } => {
                *reaction_step += 1;
                let reaction_step = *reaction_step;

                let hit = self.buttons.detect_hit(focus);
                if !hit.is_hit() {
                    return TaskStep::idle();
                }
                let reward = hit.reward(self.is_target_correct());
                self.phase = Phase::Start;
                TaskStep::finished(
                    reward,
                    TrialInfo::new(TrialResult::from_reward(reward), reaction_step),
                )
            }
        }
    }

    fn render(&self, list: &mut DrawList) {
        if self.phase == Phase::Start {
            self.start_sprite.draw(list);
            return;
        }
        for ball in &self.balls {
            Sprite::new(self.ball_texture, ball.position, BALL_HALF_WIDTH)
                .with_color(self.ball_color(ball))
                .draw(list);
        }
        if let Phase::Response { .. } = self.phase {
            self.buttons.draw(list);
        }
    }
}
