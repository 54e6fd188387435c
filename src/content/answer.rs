//! YES/NO answer buttons shared by the two-alternative tasks.

use glam::Vec2;

use super::constants::BUTTON_HALF_WIDTH;
use super::sprite::{DrawList, Sprite};
use crate::core::types::{Color, TextureId};

/// Which answer button, if any, the gaze hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerHit {
    None,
    Yes,
    No,
}

impl AnswerHit {
    pub fn is_hit(self) -> bool {
        self != AnswerHit::None
    }

    /// Reward for this answer given the true state of the trial.
    pub fn reward(self, truth: bool) -> u32 {
        match self {
            AnswerHit::Yes if truth => 1,
            AnswerHit::No if !truth => 1,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnswerButtons {
    pub yes: Sprite,
    pub no: Sprite,
}

impl AnswerButtons {
    pub fn new(texture: TextureId, yes_pos: Vec2, no_pos: Vec2) -> Self {
        let button = |pos| Sprite::new(texture, pos, BUTTON_HALF_WIDTH).with_color(Color::BLACK);
        Self {
            yes: button(yes_pos),
            no: button(no_pos),
        }
    }

    /// YES on the far left, NO on the far right.
    pub fn at_sides(texture: TextureId) -> Self {
        Self::new(texture, Vec2::new(-0.9, 0.0), Vec2::new(0.9, 0.0))
    }

    /// NO left and YES right of centre, along the bottom edge.
    pub fn at_bottom(texture: TextureId) -> Self {
        Self::new(texture, Vec2::new(0.2, -0.9), Vec2::new(-0.2, -0.9))
    }

    pub fn detect_hit(&self, pos: Vec2) -> AnswerHit {
        if self.yes.contains(pos) {
            AnswerHit::Yes
        } else if self.no.contains(pos) {
            AnswerHit::No
        } else {
            AnswerHit::None
        }
    }

    pub fn draw(&self, list: &mut DrawList) {
        self.no.draw(list);
        self.yes.draw(list);
    }
}
