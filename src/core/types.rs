//! Core type definitions used throughout the codebase

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Deterministic random source threaded through every task.
pub type TaskRng = ChaCha8Rng;

/// Create a task RNG from a seed, or from entropy when no seed is given.
pub fn task_rng(seed: Option<u64>) -> TaskRng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Opaque handle into a texture cache owned by the asset loader.
///
/// The core only compares and forwards handles; it never resolves them to pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureId(pub u32);

/// RGB colour, each channel in 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Grey level, clamped to the displayable range.
    pub fn gray(level: f32) -> Self {
        let level = level.clamp(0.0, 1.0);
        Self::rgb(level, level, level)
    }

    /// Pack colour into u32 (RGBA8 format, opaque alpha).
    pub fn to_u32(&self) -> u32 {
        let r = (self.r.clamp(0.0, 1.0) * 255.0) as u32;
        let g = (self.g.clamp(0.0, 1.0) * 255.0) as u32;
        let b = (self.b.clamp(0.0, 1.0) * 255.0) as u32;
        (r << 24) | (g << 16) | (b << 8) | 0xFF
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
