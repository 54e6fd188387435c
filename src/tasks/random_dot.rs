//! Random Dot Motion discrimination: a fraction of dots drifts in one of
//! eight directions while the rest flicker at random positions; look at the
//! arrow pointing the way the coherent dots move.
//!
//! Difficulty selects the coherent fraction from [`COHERENT_RATES`]. Dot
//! brightness falls off with a Gaussian of the distance from the centre.

use std::f32::consts::{FRAC_PI_4, PI};

use glam::Vec2;
use rand::Rng;

use super::{check_difficulty, trial_difficulty, TaskKind};
use crate::content::textures::assets;
use crate::content::{
    Content, DrawList, Sprite, TaskStep, TextureLoader, TrialInfo, TrialResult,
};
use crate::core::error::Result;
use crate::core::types::{Color, TaskRng, TextureId};

pub const COHERENT_RATES: [f64; 5] = [0.7, 0.5, 0.3, 0.1, 0.05];
pub const DIFFICULTY_RANGE: u32 = COHERENT_RATES.len() as u32;

pub const DOT_COUNT: usize = 100;
pub const DOT_HALF_WIDTH: f32 = 0.02;
pub const DOT_SPEED: f32 = 0.03;
/// Dots live in `[-DOT_MOVE_RANGE, DOT_MOVE_RANGE]` on both axes.
pub const DOT_MOVE_RANGE: f32 = 0.6;

const ATTENUATE_SIGMA_SQ: f32 = 0.2 * 0.2;
const BRIGHTNESS_GAIN: f32 = 1.1;

pub const DIRECTION_COUNT: usize = 8;
pub const ARROW_DISTANCE: f32 = 0.8;
pub const ARROW_HALF_WIDTH: f32 = 0.08;

pub const CORRECT_REWARD: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    Response { reaction_step: u32 },
}

/// Unit vector of direction `index` (multiples of 45 degrees, CCW from +x).
pub fn direction_vector(index: usize) -> Vec2 {
    let angle = FRAC_PI_4 * index as f32;
    Vec2::new(angle.cos(), angle.sin())
}

/// Gaussian brightness at `distance` from the centre, clamped to 1.0.
pub fn dot_brightness(distance: f32) -> f32 {
    let norm = 1.0 / (2.0 * PI * ATTENUATE_SIGMA_SQ).sqrt();
    let rate = norm * (-(distance * distance) / (2.0 * ATTENUATE_SIGMA_SQ)).exp();
    (rate * BRIGHTNESS_GAIN).min(1.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dot {
    pub position: Vec2,
    pub coherent: bool,
    pub color: Color,
}

impl Dot {
    fn random(rng: &mut TaskRng) -> Self {
        let mut dot = Self {
            position: Vec2::ZERO,
            coherent: true,
            color: Color::WHITE,
        };
        dot.randomize_position(rng);
        dot.update_color();
        dot
    }

    fn randomize_position(&mut self, rng: &mut TaskRng) {
        self.position = Vec2::new(
            rng.gen_range(-DOT_MOVE_RANGE..DOT_MOVE_RANGE),
            rng.gen_range(-DOT_MOVE_RANGE..DOT_MOVE_RANGE),
        );
    }

    fn update_color(&mut self) {
        self.color = Color::gray(dot_brightness(self.position.length()));
    }

    /// Coherent dots drift by `delta` and wrap once per axis; the rest jump.
    fn step(&mut self, delta: Vec2, rng: &mut TaskRng) {
        if self.coherent {
            self.position = Vec2::new(
                wrap(self.position.x + delta.x),
                wrap(self.position.y + delta.y),
            );
        } else {
            self.randomize_position(rng);
        }
        self.update_color();
    }
}

fn wrap(v: f32) -> f32 {
    let span = DOT_MOVE_RANGE * 2.0;
    if v > DOT_MOVE_RANGE {
        v - span
    } else if v < -DOT_MOVE_RANGE {
        v + span
    } else {
        v
    }
}

pub struct RandomDotMotion {
    difficulty: Option<u32>,
    start_sprite: Sprite,
    dot_texture: TextureId,
    dots: Vec<Dot>,
    arrows: Vec<Sprite>,
    direction_index: usize,
    phase: Phase,
}

impl RandomDotMotion {
    pub fn new(
        difficulty: Option<u32>,
        loader: &mut dyn TextureLoader,
        rng: &mut TaskRng,
    ) -> Result<Self> {
        check_difficulty(TaskKind::RandomDotMotion, difficulty)?;

        let start_texture = loader.load(assets::START_MARKER)?;
        let dot_texture = loader.load(assets::DOT)?;
        let straight = loader.load(assets::ARROW_STRAIGHT)?;
        let diagonal = loader.load(assets::ARROW_DIAGONAL)?;

        let arrows = (0..DIRECTION_COUNT)
            .map(|i| {
                let texture = if i % 2 == 0 { straight } else { diagonal };
                Sprite::new(texture, direction_vector(i) * ARROW_DISTANCE, ARROW_HALF_WIDTH)
                    .with_rotation((i / 2) as u8)
            })
            .collect();

        Ok(Self {
            difficulty,
            start_sprite: Sprite::start_marker(start_texture),
            dot_texture,
            dots: (0..DOT_COUNT).map(|_| Dot::random(rng)).collect(),
            arrows,
            direction_index: 0,
            phase: Phase::Start,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn dots(&self) -> &[Dot] {
        &self.dots
    }

    pub fn arrows(&self) -> &[Sprite] {
        &self.arrows
    }

    /// Index of the coherent motion direction for the current trial.
    pub fn direction_index(&self) -> usize {
        self.direction_index
    }

    /// Number of coherent dots for a difficulty level.
    pub fn coherent_count(level: u32) -> usize {
        (DOT_COUNT as f64 * COHERENT_RATES[level as usize]).round() as usize
    }

    fn enter_response_phase(&mut self, rng: &mut TaskRng) {
        self.direction_index = rng.gen_range(0..DIRECTION_COUNT);
        let level = trial_difficulty(self.difficulty, DIFFICULTY_RANGE, rng);
        let coherent = Self::coherent_count(level);
        for (i, dot) in self.dots.iter_mut().enumerate() {
            dot.coherent = i < coherent;
        }
        self.phase = Phase::Response { reaction_step: 0 };
    }

    /// `Some(true)` for the correct arrow, `Some(false)` for any other.
    fn arrow_hit(&self, focus: Vec2) -> Option<bool> {
        self.arrows
            .iter()
            .position(|arrow| arrow.contains(focus))
            .map(|i| i == self.direction_index)
    }
}

impl Content for RandomDotMotion {
    fn kind(&self) -> TaskKind {
        TaskKind::RandomDotMotion
    }

    fn background(&self) -> Color {
        Color::BLACK
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
                self.enter_response_phase(rng);
                TaskStep::redraw()
            }
            Phase::Response { reaction_step } => {
                *reaction_step += 1;
                let reaction_step = *reaction_step;

                let delta = direction_vector(self.direction_index) * DOT_SPEED;
                for dot in &mut self.dots {
                    dot.step(delta, rng);
                }

                match self.arrow_hit(focus) {
                    None => TaskStep::redraw(),
                    Some(correct) => {
                        let (reward, result) = if correct {
                            (CORRECT_REWARD, TrialResult::Success)
                        } else {
                            (0, TrialResult::Fail)
                        };
                        self.phase = Phase::Start;
                        TaskStep::finished(reward, TrialInfo::new(result, reaction_step))
                    }
                }
            }
        }
    }

    fn render(&self, list: &mut DrawList) {
        match self.phase {
            Phase::Start => self.start_sprite.draw(list),
            Phase::Response { .. } => {
                for dot in &self.dots {
                    Sprite::new(self.dot_texture, dot.position, DOT_HALF_WIDTH)
                        .with_color(dot.color)
                        .draw(list);
                }
                self.arrows.iter().for_each(|a| a.draw(list));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::TextureRegistry;
    use rand::SeedableRng;

    const AWAY: Vec2 = Vec2::new(0.0, 0.5);

    fn build(difficulty: Option<u32>, seed: u64) -> (RandomDotMotion, TaskRng) {
        let mut rng = TaskRng::seed_from_u64(seed);
        let mut registry = TextureRegistry::new();
        let task = RandomDotMotion::new(difficulty, &mut registry, &mut rng).unwrap();
        (task, rng)
    }

    #[test]
    fn test_coherent_counts() {
        let counts: Vec<usize> = (0..DIFFICULTY_RANGE)
            .map(RandomDotMotion::coherent_count)
            .collect();
        assert_eq!(counts, vec![70, 50, 30, 10, 5]);
    }

    #[test]
    fn test_brightness_peaks_at_center_and_decays() {
        assert_eq!(dot_brightness(0.0), 1.0);
        let far = dot_brightness(0.6);
        assert!(far > 0.0 && far < 0.1, "{far}");
        assert!(dot_brightness(0.3) > dot_brightness(0.4));
    }

    #[test]
    fn test_arrow_layout() {
        let (task, _) = build(None, 1);
        let arrows = task.arrows();
        assert_eq!(arrows.len(), DIRECTION_COUNT);
        assert!((arrows[0].position - Vec2::new(0.8, 0.0)).length() < 1e-6);
        assert!((arrows[2].position - Vec2::new(0.0, 0.8)).length() < 1e-6);
        assert_eq!(arrows[0].texture, arrows[2].texture);
        assert_ne!(arrows[0].texture, arrows[1].texture);
        let rotations: Vec<u8> = arrows.iter().map(|a| a.rotation).collect();
        assert_eq!(rotations, vec![0, 0, 1, 1, 2, 2, 3, 3]);
    }

    #[test]
    fn test_coherent_dots_drift_and_wrap() {
        let (mut task, mut rng) = build(Some(0), 2);
        task.step(Vec2::ZERO, &mut rng);
        let delta = direction_vector(task.direction_index()) * DOT_SPEED;
        let before = task.dots().to_vec();
        assert_eq!(before.iter().filter(|d| d.coherent).count(), 70);

        task.step(AWAY, &mut rng);
        for (a, b) in before.iter().zip(task.dots()).filter(|(a, _)| a.coherent) {
            let expected = Vec2::new(wrap(a.position.x + delta.x), wrap(a.position.y + delta.y));
            assert!((b.position - expected).length() < 1e-6);
        }
        for dot in task.dots() {
            assert!(dot.position.x.abs() <= DOT_MOVE_RANGE + 1e-6);
            assert!(dot.position.y.abs() <= DOT_MOVE_RANGE + 1e-6);
            assert!(dot.color.r <= 1.0);
        }
    }

    #[test]
    fn test_response_always_repaints() {
        let (mut task, mut rng) = build(Some(3), 3);
        task.step(Vec2::ZERO, &mut rng);
        for i in 1..=5 {
            let step = task.step(AWAY, &mut rng);
            assert!(step.need_render);
            assert_eq!(step.reward, 0);
            assert_eq!(task.phase(), Phase::Response { reaction_step: i });
        }
    }

    #[test]
    fn test_correct_arrow_pays_one() {
        let (mut task, mut rng) = build(None, 4);
        task.step(Vec2::ZERO, &mut rng);
        let arrow = task.arrows()[task.direction_index()].position;
        let step = task.step(arrow, &mut rng);
        assert_eq!(step.reward, CORRECT_REWARD);
        assert_eq!(step.info, Some(TrialInfo::new(TrialResult::Success, 1)));
        assert_eq!(task.phase(), Phase::Start);
    }

    #[test]
    fn test_wrong_arrow_fails() {
        let (mut task, mut rng) = build(None, 5);
        task.step(Vec2::ZERO, &mut rng);
        let wrong = (task.direction_index() + 3) % DIRECTION_COUNT;
        let step = task.step(task.arrows()[wrong].position, &mut rng);
        assert_eq!(step.reward, 0);
        assert_eq!(step.info.map(|i| i.result), Some(TrialResult::Fail));
    }

    #[test]
    fn test_render_dots_then_arrows() {
        let (mut task, mut rng) = build(Some(1), 6);
        assert_eq!(task.background(), Color::BLACK);
        task.step(Vec2::ZERO, &mut rng);
        let mut list = DrawList::new(Color::BLACK);
        task.render(&mut list);
        assert_eq!(list.len(), DOT_COUNT + DIRECTION_COUNT);
        assert_eq!(list.sprites()[0].half_width, DOT_HALF_WIDTH);
        assert_eq!(list.sprites()[DOT_COUNT].half_width, ARROW_HALF_WIDTH);
    }
}
