//! Visual Search: report whether a magenta T is among the signs on screen.
//!
//! Difficulty sets the sign count (`2 + difficulty`). Distractors differ from
//! the target by colour, by shape, or by a conjunction of both, chosen per
//! trial. NO sits left and YES right along the bottom edge.

use glam::Vec2;
use rand::Rng;

use super::{check_difficulty, trial_difficulty, TaskKind};
use crate::content::constants::SIGN_SCALE;
use crate::content::textures::assets;
use crate::content::{
    AnswerButtons, CellGrid, Content, DrawList, SignSprite, Sprite, TaskStep, TextureLoader,
    TrialInfo, TrialResult,
};
use crate::core::error::Result;
use crate::core::types::{Color, TaskRng, TextureId};

pub const DIFFICULTY_RANGE: u32 = 6;

pub const GRID_DIVISION: usize = 7;
/// Signs fill 80% of the panel.
pub const GRID_HALF_WIDTH: f32 = (2.0 * 0.8) / (GRID_DIVISION as f32 * 2.0);

pub const BASE_SIGN_COUNT: usize = 2;

const SIGN_ASSETS: [&str; 8] = [
    assets::T0,
    assets::T1,
    assets::L0,
    assets::L1,
    assets::R0,
    assets::R1,
    assets::S0,
    assets::Z0,
];

/// Index 0 is the target colour.
pub const COLORS: [Color; 5] = [
    Color::rgb(1.0, 0.0, 0.75),
    Color::rgb(1.0, 0.75, 0.0),
    Color::rgb(0.0, 1.0, 1.0),
    Color::rgb(0.0, 0.25, 1.0),
    Color::rgb(0.5, 0.0, 1.0),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    Find { reaction_step: u32 },
}

/// How distractors differ from the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Distraction {
    Color,
    Shape,
    Conjunction,
}

impl Distraction {
    pub const ALL: [Distraction; 3] = [
        Distraction::Color,
        Distraction::Shape,
        Distraction::Conjunction,
    ];

    /// (texture, colour) indices of a distractor; never the target pair.
    pub fn sample(self, rng: &mut TaskRng) -> (usize, usize) {
        match self {
            Distraction::Color => (0, rng.gen_range(1..COLORS.len())),
            Distraction::Shape => (rng.gen_range(1..SIGN_ASSETS.len()), 0),
            Distraction::Conjunction => {
                let index = rng.gen_range(1..SIGN_ASSETS.len() * COLORS.len());
                (index / COLORS.len(), index % COLORS.len())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchSign {
    pub sprite: SignSprite,
    pub texture_index: usize,
    pub color_index: usize,
}

impl SearchSign {
    pub fn is_target(&self) -> bool {
        self.texture_index == 0 && self.color_index == 0
    }
}

pub struct VisualSearch {
    difficulty: Option<u32>,
    grid: CellGrid,
    textures: Vec<TextureId>,
    start_sprite: Sprite,
    buttons: AnswerButtons,
    signs: Vec<SearchSign>,
    distraction: Distraction,
    phase: Phase,
}

impl VisualSearch {
    pub fn new(difficulty: Option<u32>, loader: &mut dyn TextureLoader) -> Result<Self> {
        check_difficulty(TaskKind::VisualSearch, difficulty)?;

        let start_texture = loader.load(assets::START_MARKER)?;
        let white_texture = loader.load(assets::WHITE_BOX)?;
        let textures = loader.load_all(&SIGN_ASSETS)?;

        Ok(Self {
            difficulty,
            grid: CellGrid::new(GRID_DIVISION, GRID_HALF_WIDTH),
            textures,
            start_sprite: Sprite::start_marker(start_texture),
            buttons: AnswerButtons::at_bottom(white_texture),
            signs: Vec::new(),
            distraction: Distraction::Color,
            phase: Phase::Start,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn signs(&self) -> &[SearchSign] {
        &self.signs
    }

    pub fn distraction(&self) -> Distraction {
        self.distraction
    }

    pub fn buttons(&self) -> &AnswerButtons {
        &self.buttons
    }

    /// The target, when present, is always the first sign.
    pub fn has_target(&self) -> bool {
        self.signs.first().map_or(false, SearchSign::is_target)
    }

    fn prepare_signs(&mut self, rng: &mut TaskRng) {
        let level = trial_difficulty(self.difficulty, DIFFICULTY_RANGE, rng);
        let count = BASE_SIGN_COUNT + level as usize;
        let cells = self.grid.sample_indices(count, rng);
        let has_target = rng.gen_bool(0.5);
        self.distraction = Distraction::ALL[rng.gen_range(0..Distraction::ALL.len())];

        self.signs = cells
            .into_iter()
            .enumerate()
            .map(|(i, cell)| {
                let (texture_index, color_index) = if has_target && i == 0 {
                    (0, 0)
                } else {
                    self.distraction.sample(rng)
                };
                SearchSign {
                    sprite: SignSprite::new(
                        self.textures[texture_index],
                        self.grid.center(cell),
                        self.grid.half_width,
                        SIGN_SCALE,
                        COLORS[color_index],
                    ),
                    texture_index,
                    color_index,
                }
            })
            .collect();
    }
}

impl Content for VisualSearch {
    fn kind(&self) -> TaskKind {
        TaskKind::VisualSearch
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
                self.prepare_signs(rng);
                self.phase = Phase::Find { reaction_step: 0 };
                TaskStep::redraw()
            }
            Phase::Find { reaction_step } => {
                *reaction_step += 1;
                let reaction_step = *reaction_step;

                let hit = self.buttons.detect_hit(focus);
                if !hit.is_hit() {
                    return TaskStep::idle();
                }
                let reward = hit.reward(self.has_target());
                self.phase = Phase::Start;
                TaskStep::finished(
                    reward,
                    TrialInfo::new(TrialResult::from_reward(reward), reaction_step),
                )
            }
        }
    }

    fn render(&self, list: &mut DrawList) {
        match self.phase {
            Phase::Start => self.start_sprite.draw(list),
            Phase::Find { .. } => {
                self.buttons.draw(list);
                self.signs.iter().for_each(|s| s.sprite.draw(list));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::TextureRegistry;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn build(difficulty: Option<u32>, seed: u64) -> (VisualSearch, TaskRng) {
        let mut registry = TextureRegistry::new();
        let task = VisualSearch::new(difficulty, &mut registry).unwrap();
        (task, TaskRng::seed_from_u64(seed))
    }

    #[test]
    fn test_sign_count_follows_difficulty() {
        for difficulty in 0..DIFFICULTY_RANGE {
            let (mut task, mut rng) = build(Some(difficulty), 1);
            task.step(Vec2::ZERO, &mut rng);
            assert_eq!(task.signs().len(), 2 + difficulty as usize);
        }
    }

    #[test]
    fn test_distractors_never_match_target() {
        let mut rng = TaskRng::seed_from_u64(2);
        for distraction in Distraction::ALL {
            for _ in 0..200 {
                let (texture, color) = distraction.sample(&mut rng);
                assert!(texture < 8 && color < COLORS.len());
                assert!(!(texture == 0 && color == 0), "{distraction:?}");
            }
        }
    }

    #[test]
    fn test_target_only_at_first_slot() {
        let (mut task, mut rng) = build(None, 3);
        let mut seen = HashSet::new();
        let mut present = 0;
        for _ in 0..200 {
            task.prepare_signs(&mut rng);
            seen.insert(task.distraction());
            assert!(task.signs()[1..].iter().all(|s| !s.is_target()));
            present += usize::from(task.has_target());
        }
        assert_eq!(seen.len(), 3);
        assert!(present > 50 && present < 150, "target present {present}/200");
    }

    #[test]
    fn test_signs_stay_on_inner_grid() {
        let (mut task, mut rng) = build(Some(5), 4);
        task.step(Vec2::ZERO, &mut rng);
        for sign in task.signs() {
            let p = sign.sprite.base;
            assert!(p.x.abs() < 0.8 && p.y.abs() < 0.8);
            assert_eq!(sign.sprite.offset, Vec2::ZERO);
        }
    }

    #[test]
    fn test_answer_scored_against_presence() {
        let (mut task, mut rng) = build(Some(3), 5);
        for _ in 0..20 {
            task.step(Vec2::ZERO, &mut rng);
            let right = if task.has_target() {
                task.buttons().yes.position
            } else {
                task.buttons().no.position
            };
            task.step(Vec2::ZERO, &mut rng);
            let step = task.step(right, &mut rng);
            assert_eq!(step.reward, 1);
            assert_eq!(step.info, Some(TrialInfo::new(TrialResult::Success, 2)));
            assert_eq!(task.phase(), Phase::Start);
        }

        task.step(Vec2::ZERO, &mut rng);
        let wrong = if task.has_target() {
            task.buttons().no.position
        } else {
            task.buttons().yes.position
        };
        let step = task.step(wrong, &mut rng);
        assert_eq!(step.reward, 0);
        assert_eq!(step.info.map(|i| i.result), Some(TrialResult::Fail));
    }

    #[test]
    fn test_render_buttons_before_signs() {
        let (mut task, mut rng) = build(Some(0), 6);
        task.step(Vec2::ZERO, &mut rng);
        let mut list = DrawList::default();
        task.render(&mut list);
        assert_eq!(list.len(), 4);
        assert_eq!(list.sprites()[0].color, Color::BLACK);
        assert_eq!(list.sprites()[1].color, Color::BLACK);
    }
}
