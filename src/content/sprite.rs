//! Sprite primitives and the draw directives they emit.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::constants::START_MARKER_HALF_WIDTH;
use crate::core::types::{Color, TextureId};

/// One textured quad for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawDirective {
    pub texture: TextureId,
    pub position: Vec2,
    pub half_width: f32,
    /// Quarter turns counter-clockwise (0..=3)
    pub rotation: u8,
    pub color: Color,
}

/// Ordered draw directives for one content frame, painted back to front.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawList {
    background: Color,
    sprites: Vec<DrawDirective>,
}

impl DrawList {
    pub fn new(background: Color) -> Self {
        Self {
            background,
            sprites: Vec::new(),
        }
    }

    /// Drop all directives and set the clear colour.
    pub fn clear(&mut self, background: Color) {
        self.background = background;
        self.sprites.clear();
    }

    pub fn push(&mut self, directive: DrawDirective) {
        self.sprites.push(directive);
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn sprites(&self) -> &[DrawDirective] {
        &self.sprites
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn count_texture(&self, texture: TextureId) -> usize {
        self.sprites.iter().filter(|s| s.texture == texture).count()
    }
}

/// Square sprite on the content panel.
///
/// Hit-testing uses the unscaled half width around `position`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub texture: TextureId,
    pub position: Vec2,
    pub half_width: f32,
    pub rotation: u8,
    pub color: Color,
}

impl Sprite {
    pub fn new(texture: TextureId, position: Vec2, half_width: f32) -> Self {
        debug_assert!(half_width > 0.0, "sprite half width must be positive");
        Self {
            texture,
            position,
            half_width,
            rotation: 0,
            color: Color::WHITE,
        }
    }

    /// Central marker the gaze must hit to start a trial.
    pub fn start_marker(texture: TextureId) -> Self {
        Self::new(texture, Vec2::ZERO, START_MARKER_HALF_WIDTH)
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_rotation(mut self, rotation: u8) -> Self {
        self.rotation = rotation % 4;
        self
    }

    pub fn contains(&self, pos: Vec2) -> bool {
        box_contains(self.position, self.half_width, pos)
    }

    pub fn draw(&self, list: &mut DrawList) {
        list.push(DrawDirective {
            texture: self.texture,
            position: self.position,
            half_width: self.half_width,
            rotation: self.rotation,
            color: self.color,
        });
    }
}

/// Grid-cell sign that renders smaller than its cell and may be jittered.
///
/// Both rendering and hit-testing use `half_width * scale`; hit-testing is
/// anchored at the unperturbed `base` position, rendering at `base + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignSprite {
    pub texture: TextureId,
    pub base: Vec2,
    pub offset: Vec2,
    pub half_width: f32,
    pub scale: f32,
    pub color: Color,
}

impl SignSprite {
    pub fn new(texture: TextureId, base: Vec2, half_width: f32, scale: f32, color: Color) -> Self {
        debug_assert!(half_width > 0.0, "sign half width must be positive");
        Self {
            texture,
            base,
            offset: Vec2::ZERO,
            half_width,
            scale,
            color,
        }
    }

    pub fn scaled_half_width(&self) -> f32 {
        self.half_width * self.scale
    }

    pub fn render_position(&self) -> Vec2 {
        self.base + self.offset
    }

    pub fn contains(&self, pos: Vec2) -> bool {
        box_contains(self.base, self.scaled_half_width(), pos)
    }

    pub fn draw(&self, list: &mut DrawList) {
        list.push(DrawDirective {
            texture: self.texture,
            position: self.render_position(),
            half_width: self.scaled_half_width(),
            rotation: 0,
            color: self.color,
        });
    }
}

/// Inclusive axis-aligned box test.
fn box_contains(center: Vec2, half_width: f32, pos: Vec2) -> bool {
    pos.x >= center.x - half_width
        && pos.x <= center.x + half_width
        && pos.y >= center.y - half_width
        && pos.y <= center.y + half_width
}
