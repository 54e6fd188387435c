//! Reusable stimulus placement helpers.

use glam::Vec2;
use rand::seq::index;
use rand::Rng;

use crate::core::types::TaskRng;

/// Rectangular region described by a centre and four edge distances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadrant {
    pub center: Vec2,
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Quadrant {
    pub fn new(center: Vec2, left: f32, right: f32, top: f32, bottom: f32) -> Self {
        Self {
            center,
            left,
            right,
            top,
            bottom,
        }
    }

    /// Uniform position such that a sprite of `half_width` stays inside.
    pub fn random_location(&self, half_width: f32, rng: &mut TaskRng) -> Vec2 {
        let min_x = self.center.x - self.left + half_width;
        let max_x = self.center.x + self.right - half_width;
        let min_y = self.center.y - self.bottom + half_width;
        let max_y = self.center.y + self.top - half_width;
        debug_assert!(min_x <= max_x && min_y <= max_y, "sprite wider than quadrant");

        Vec2::new(rng.gen_range(min_x..=max_x), rng.gen_range(min_y..=max_y))
    }
}

/// The four panel quadrants, each trimmed by `margin` along the edges that
/// touch the panel centre.
///
/// Order: upper right, upper left, lower left, lower right.
pub fn quadrants_around_center(margin: f32) -> [Quadrant; 4] {
    [
        Quadrant::new(Vec2::new(0.5, 0.5), 0.5 - margin, 0.5, 0.5, 0.5 - margin),
        Quadrant::new(Vec2::new(-0.5, 0.5), 0.5, 0.5 - margin, 0.5, 0.5 - margin),
        Quadrant::new(Vec2::new(-0.5, -0.5), 0.5, 0.5 - margin, 0.5 - margin, 0.5),
        Quadrant::new(Vec2::new(0.5, -0.5), 0.5 - margin, 0.5, 0.5 - margin, 0.5),
    ]
}

/// Square grid of equal cells centred on the panel origin.
///
/// Cell `index` maps to column `index % division`, row `index / division`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellGrid {
    pub division: usize,
    pub half_width: f32,
}

impl CellGrid {
    pub fn new(division: usize, half_width: f32) -> Self {
        debug_assert!(division > 0, "grid needs at least one cell");
        Self {
            division,
            half_width,
        }
    }

    /// Grid whose cells tile the whole -1..1 panel.
    pub fn full_panel(division: usize) -> Self {
        Self::new(division, 1.0 / division as f32)
    }

    pub fn len(&self) -> usize {
        self.division * self.division
    }

    pub fn is_empty(&self) -> bool {
        self.division == 0
    }

    pub fn cell_center(&self, column: usize, row: usize) -> Vec2 {
        let w = self.half_width;
        let origin = -w * self.division as f32;
        Vec2::new(
            origin + w * (1 + 2 * column) as f32,
            origin + w * (1 + 2 * row) as f32,
        )
    }

    pub fn center(&self, index: usize) -> Vec2 {
        self.cell_center(index % self.division, index / self.division)
    }

    /// `count` distinct cell indices in random order.
    ///
    /// # Panics
    /// Panics if `count` exceeds the number of cells.
    pub fn sample_indices(&self, count: usize, rng: &mut TaskRng) -> Vec<usize> {
        index::sample(rng, self.len(), count).into_vec()
    }

    /// Centres of `count` distinct random cells.
    pub fn sample_centers(&self, count: usize, rng: &mut TaskRng) -> Vec<Vec2> {
        self.sample_indices(count, rng)
            .into_iter()
            .map(|i| self.center(i))
            .collect()
    }
}
