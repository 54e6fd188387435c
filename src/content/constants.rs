//! Content panel constants shared by every task.
//!
//! Content-local coordinates span -1.0..=1.0 on both axes; widths are half
//! widths in the same units.

/// Half width of the central start marker
pub const START_MARKER_HALF_WIDTH: f32 = 0.15;

/// Half width of YES/NO answer buttons
pub const BUTTON_HALF_WIDTH: f32 = 0.1;

/// Render scale applied to sign sprites relative to their grid cell
pub const SIGN_SCALE: f32 = 0.8;

/// Attempt cap for rejection-sampling loops (placement and movement)
pub const WATCHDOG_LIMIT: usize = 200;
