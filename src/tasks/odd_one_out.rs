//! Odd-One-Out: find the single sign on a full-panel grid that differs from
//! the rest in colour, shape, orientation or motion.
//!
//! The task takes no difficulty. Each trial picks the odd type uniformly and a
//! grid of 3x3, 5x5 or 7x7 cells. Looking at the odd sign pays 1; the trial
//! only ends on success.

use glam::Vec2;
use rand::seq::SliceRandom;
use rand::Rng;

use super::{check_difficulty, TaskKind};
use crate::content::constants::SIGN_SCALE;
use crate::content::textures::assets;
use crate::content::{
    CellGrid, Content, DrawList, SignSprite, Sprite, TaskStep, TextureLoader, TrialInfo,
    TrialResult,
};
use crate::core::error::Result;
use crate::core::types::{Color, TaskRng, TextureId};

pub const DIFFICULTY_RANGE: u32 = 0;

pub const GRID_DIVISIONS: [usize; 3] = [3, 5, 7];

/// Ticks between the two positions of a moving sign.
pub const MOTION_INTERVAL_FRAMES: u32 = 2;

/// Jitter of still signs, as a fraction of the cell half width.
pub const JITTER_RATE: f32 = 0.15;
/// Swing of the moving sign, as a fraction of the cell half width.
pub const MOTION_RATE: f32 = 0.2;

pub const FOUND_REWARD: u32 = 1;

pub const COLORS: [Color; 6] = [
    Color::rgb(1.0, 0.0, 0.0), // red
    Color::rgb(1.0, 1.0, 0.0), // yellow
    Color::rgb(0.0, 1.0, 0.0), // green
    Color::rgb(0.0, 1.0, 1.0), // cyan
    Color::rgb(0.0, 0.0, 1.0), // blue
    Color::rgb(1.0, 0.0, 1.0), // magenta
];

/// Sign texture slots. Shape pairs with 0/1, orientation with 2/3.
pub const TEX_PLUS: usize = 0;
pub const TEX_RECT: usize = 1;
pub const TEX_H_BAR: usize = 2;
pub const TEX_V_BAR: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    Find { reaction_step: u32 },
}

/// Dimension along which the odd sign differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OddType {
    Color,
    Shape,
    Orientation,
    Motion,
}

impl OddType {
    pub const ALL: [OddType; 4] = [
        OddType::Color,
        OddType::Shape,
        OddType::Orientation,
        OddType::Motion,
    ];
}

/// Texture and colour choices for one trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignVariables {
    pub main_texture: usize,
    pub odd_texture: usize,
    pub main_color: usize,
    pub odd_color: usize,
    pub odd_moves: bool,
}

impl SignVariables {
    pub fn sample(odd_type: OddType, rng: &mut TaskRng) -> Self {
        match odd_type {
            OddType::Color => {
                let texture = rng.gen_range(0..4);
                let mut colors: Vec<usize> = (0..COLORS.len()).collect();
                colors.shuffle(rng);
                Self {
                    main_texture: texture,
                    odd_texture: texture,
                    main_color: colors[0],
                    odd_color: colors[1],
                    odd_moves: false,
                }
            }
            OddType::Shape => {
                let texture = rng.gen_range(TEX_PLUS..=TEX_RECT);
                let color = rng.gen_range(0..COLORS.len());
                Self {
                    main_texture: texture,
                    odd_texture: 1 - texture,
                    main_color: color,
                    odd_color: color,
                    odd_moves: false,
                }
            }
            OddType::Orientation => {
                let texture = rng.gen_range(TEX_H_BAR..=TEX_V_BAR);
                let color = rng.gen_range(0..COLORS.len());
                Self {
                    main_texture: texture,
                    odd_texture: TEX_H_BAR + TEX_V_BAR - texture,
                    main_color: color,
                    odd_color: color,
                    odd_moves: false,
                }
            }
            OddType::Motion => {
                let texture = rng.gen_range(TEX_H_BAR..=TEX_V_BAR);
                let color = rng.gen_range(0..COLORS.len());
                Self {
                    main_texture: texture,
                    odd_texture: texture,
                    main_color: color,
                    odd_color: color,
                    odd_moves: true,
                }
            }
        }
    }
}

/// One grid sign plus its odd flag and motion state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OddSign {
    pub sprite: SignSprite,
    pub texture_index: usize,
    pub color_index: usize,
    pub odd: bool,
    pub has_motion: bool,
    motion_count: u32,
    motion_pos_index: u8,
}

impl OddSign {
    fn new(
        sprite: SignSprite,
        texture_index: usize,
        color_index: usize,
        odd: bool,
        has_motion: bool,
        rng: &mut TaskRng,
    ) -> Self {
        let mut sign = Self {
            sprite,
            texture_index,
            color_index,
            odd,
            has_motion,
            motion_count: 0,
            motion_pos_index: 0,
        };
        if has_motion {
            sign.set_motion_offset();
        } else {
            let jitter = Vec2::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
            sign.sprite.offset = jitter * JITTER_RATE * sign.sprite.half_width;
        }
        sign
    }

    /// Horizontal bars swing vertically; everything else swings sideways.
    fn set_motion_offset(&mut self) {
        let direction = if self.motion_pos_index == 0 { -1.0 } else { 1.0 };
        let axis = if self.texture_index == TEX_H_BAR {
            Vec2::Y
        } else {
            Vec2::X
        };
        self.sprite.offset = axis * direction * self.sprite.half_width * MOTION_RATE;
    }

    /// Advance motion; returns whether the sign moved.
    pub fn step(&mut self) -> bool {
        if !self.has_motion {
            return false;
        }
        self.motion_count += 1;
        if self.motion_count < MOTION_INTERVAL_FRAMES {
            return false;
        }
        self.motion_pos_index = 1 - self.motion_pos_index;
        self.motion_count = 0;
        self.set_motion_offset();
        true
    }
}

pub struct OddOneOut {
    textures: [TextureId; 4],
    start_sprite: Sprite,
    signs: Vec<OddSign>,
    odd_type: OddType,
    division: usize,
    phase: Phase,
}

impl OddOneOut {
    pub fn new(
        difficulty: Option<u32>,
        loader: &mut dyn TextureLoader,
        rng: &mut TaskRng,
    ) -> Result<Self> {
        check_difficulty(TaskKind::OddOneOut, difficulty)?;

        let start_texture = loader.load(assets::START_MARKER)?;
        let loaded = loader.load_all(&[assets::PLUS, assets::RECT, assets::H_BAR, assets::V_BAR])?;
        let textures = [loaded[0], loaded[1], loaded[2], loaded[3]];

        let mut task = Self {
            textures,
            start_sprite: Sprite::start_marker(start_texture),
            signs: Vec::new(),
            odd_type: OddType::Color,
            division: GRID_DIVISIONS[0],
            phase: Phase::Start,
        };
        task.prepare_signs(rng);
        Ok(task)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn signs(&self) -> &[OddSign] {
        &self.signs
    }

    pub fn odd_type(&self) -> OddType {
        self.odd_type
    }

    pub fn division(&self) -> usize {
        self.division
    }

    pub fn odd_sign(&self) -> Option<&OddSign> {
        self.signs.iter().find(|s| s.odd)
    }

    fn prepare_signs(&mut self, rng: &mut TaskRng) {
        self.odd_type = OddType::ALL[rng.gen_range(0..OddType::ALL.len())];
        let vars = SignVariables::sample(self.odd_type, rng);

        self.division = GRID_DIVISIONS[rng.gen_range(0..GRID_DIVISIONS.len())];
        let grid = CellGrid::full_panel(self.division);
        let odd_index = rng.gen_range(0..grid.len());

        self.signs.clear();
        // Columns outer, rows inner.
        for column in 0..self.division {
            for row in 0..self.division {
                let odd = column * self.division + row == odd_index;
                let (texture_index, color_index) = if odd {
                    (vars.odd_texture, vars.odd_color)
                } else {
                    (vars.main_texture, vars.main_color)
                };
                let sprite = SignSprite::new(
                    self.textures[texture_index],
                    grid.cell_center(column, row),
                    grid.half_width,
                    SIGN_SCALE,
                    COLORS[color_index],
                );
                let has_motion = odd && vars.odd_moves;
                self.signs.push(OddSign::new(
                    sprite,
                    texture_index,
                    color_index,
                    odd,
                    has_motion,
                    rng,
                ));
            }
        }
        tracing::trace!(odd_type = ?self.odd_type, division = self.division, "Prepared signs");
    }
}

impl Content for OddOneOut {
    fn kind(&self) -> TaskKind {
        TaskKind::OddOneOut
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
                self.prepare_signs(rng);
                self.phase = Phase::Find { reaction_step: 0 };
                TaskStep::redraw()
            }
            Phase::Find { reaction_step } => {
                *reaction_step += 1;
                let reaction_step = *reaction_step;

                let mut moved = false;
                for sign in &mut self.signs {
                    moved |= sign.step();
                }

                let found = self
                    .signs
                    .iter()
                    .any(|s| s.odd && s.sprite.contains(focus));
                if !found {
                    return TaskStep {
                        need_render: moved,
                        ..TaskStep::idle()
                    };
                }

                self.phase = Phase::Start;
                TaskStep::finished(
                    FOUND_REWARD,
                    TrialInfo::new(TrialResult::Success, reaction_step),
                )
            }
        }
    }

    fn render(&self, list: &mut DrawList) {
        match self.phase {
            Phase::Start => self.start_sprite.draw(list),
            Phase::Find { .. } => self.signs.iter().for_each(|s| s.sprite.draw(list)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::TextureRegistry;
    use crate::core::error::OculoError;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn build(seed: u64) -> (OddOneOut, TaskRng) {
        let mut rng = TaskRng::seed_from_u64(seed);
        let mut registry = TextureRegistry::new();
        let task = OddOneOut::new(None, &mut registry, &mut rng).unwrap();
        (task, rng)
    }

    #[test]
    fn test_rejects_any_difficulty() {
        let mut rng = TaskRng::seed_from_u64(0);
        let mut registry = TextureRegistry::new();
        let result = OddOneOut::new(Some(0), &mut registry, &mut rng);
        assert!(matches!(result, Err(OculoError::InvalidDifficulty { .. })));
    }

    #[test]
    fn test_exactly_one_odd_sign_per_grid() {
        let (mut task, mut rng) = build(1);
        for _ in 0..50 {
            task.reset(&mut rng);
            task.step(Vec2::new(0.9, 0.9), &mut rng);
            task.step(Vec2::ZERO, &mut rng);
            let n = task.division();
            assert!(GRID_DIVISIONS.contains(&n));
            assert_eq!(task.signs().len(), n * n);
            assert_eq!(task.signs().iter().filter(|s| s.odd).count(), 1);
        }
    }

    #[test]
    fn test_odd_differs_only_along_its_type() {
        let (mut task, mut rng) = build(2);
        let mut seen = HashSet::new();
        for _ in 0..200 {
            task.prepare_signs(&mut rng);
            let odd = *task.odd_sign().unwrap();
            let main = *task.signs().iter().find(|s| !s.odd).unwrap();
            seen.insert(task.odd_type());

            match task.odd_type() {
                OddType::Color => {
                    assert_eq!(odd.texture_index, main.texture_index);
                    assert_ne!(odd.color_index, main.color_index);
                    assert!(!odd.has_motion);
                }
                OddType::Shape => {
                    assert!(main.texture_index <= TEX_RECT);
                    assert_eq!(odd.texture_index, 1 - main.texture_index);
                    assert_eq!(odd.color_index, main.color_index);
                }
                OddType::Orientation => {
                    assert!(main.texture_index >= TEX_H_BAR);
                    assert_eq!(odd.texture_index, 5 - main.texture_index);
                    assert_eq!(odd.color_index, main.color_index);
                }
                OddType::Motion => {
                    assert!(main.texture_index >= TEX_H_BAR);
                    assert_eq!(odd.texture_index, main.texture_index);
                    assert!(odd.has_motion);
                }
            }
            assert!(task.signs().iter().filter(|s| !s.odd).all(|s| !s.has_motion));
        }
        assert_eq!(seen.len(), OddType::ALL.len());
    }

    #[test]
    fn test_still_sign_jitter_is_bounded() {
        let (task, _) = build(3);
        for sign in task.signs().iter().filter(|s| !s.has_motion) {
            let limit = JITTER_RATE * sign.sprite.half_width;
            assert!(sign.sprite.offset.x.abs() <= limit);
            assert!(sign.sprite.offset.y.abs() <= limit);
        }
    }

    #[test]
    fn test_moving_sign_alternates_every_interval() {
        let mut rng = TaskRng::seed_from_u64(4);
        let sprite = SignSprite::new(TextureId(0), Vec2::ZERO, 0.2, SIGN_SCALE, Color::WHITE);
        let mut sign = OddSign::new(sprite, TEX_H_BAR, 0, true, true, &mut rng);
        let swing = 0.2 * MOTION_RATE;
        assert!((sign.sprite.offset.y + swing).abs() < 1e-6);
        assert_eq!(sign.sprite.offset.x, 0.0);

        assert!(!sign.step());
        assert!(sign.step());
        assert!((sign.sprite.offset.y - swing).abs() < 1e-6);
        assert!(!sign.step());
        assert!(sign.step());
        assert!((sign.sprite.offset.y + swing).abs() < 1e-6);
    }

    #[test]
    fn test_vertical_bar_moves_sideways() {
        let mut rng = TaskRng::seed_from_u64(5);
        let sprite = SignSprite::new(TextureId(0), Vec2::ZERO, 0.2, SIGN_SCALE, Color::WHITE);
        let sign = OddSign::new(sprite, TEX_V_BAR, 0, true, true, &mut rng);
        assert!(sign.sprite.offset.x < 0.0);
        assert_eq!(sign.sprite.offset.y, 0.0);
    }

    #[test]
    fn test_finding_odd_pays_one() {
        let (mut task, mut rng) = build(6);
        task.step(Vec2::ZERO, &mut rng);
        let odd = task.odd_sign().unwrap().sprite.base;
        let step = task.step(odd, &mut rng);
        assert_eq!(step.reward, FOUND_REWARD);
        assert_eq!(step.info, Some(TrialInfo::new(TrialResult::Success, 1)));
        assert_eq!(task.phase(), Phase::Start);
    }

    #[test]
    fn test_missing_odd_keeps_searching() {
        let (mut task, mut rng) = build(7);
        task.step(Vec2::ZERO, &mut rng);
        let other = task.signs().iter().find(|s| !s.odd).unwrap().sprite.base;
        for i in 1..=5 {
            let step = task.step(other, &mut rng);
            assert_eq!(step.reward, 0);
            assert_eq!(task.phase(), Phase::Find { reaction_step: i });
        }
    }

    #[test]
    fn test_render_black_background_and_all_signs() {
        let (mut task, mut rng) = build(8);
        assert_eq!(task.background(), Color::BLACK);
        task.step(Vec2::ZERO, &mut rng);
        let mut list = DrawList::new(task.background());
        task.render(&mut list);
        assert_eq!(list.len(), task.signs().len());
    }
}
