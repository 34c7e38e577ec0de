//! Mirror Blocks - a two-player cooperative mirror puzzle
//!
//! Core modules:
//! - `sim`: Deterministic simulation (block physics, collisions, missions, mirror metric, rounds)
//! - `platform`: Browser/native platform abstraction (keyboard mapping, clock)
//! - `tuning`: Data-driven game balance and arena geometry
//! - `records`: Per-level completion time log

pub mod error;
pub mod platform;
pub mod records;
pub mod sim;
pub mod tuning;

pub use error::{ConfigError, SimError};
pub use records::LevelTimes;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// The simulation advances exactly one step per rendered frame
    pub const FRAMES_PER_SECOND: u32 = 60;

    /// Block movement (px/frame and px/frame²)
    pub const BLOCK_ACCELERATION: f32 = 0.3;
    pub const BLOCK_FRICTION: f32 = 0.15;
    pub const BLOCK_MAX_VELOCITY: f32 = 3.0;

    /// Mirror divergence at which the Inspector notices the deception
    pub const MIRROR_TOLERANCE: f32 = 100.0;
    /// Fraction of the tolerance at which the music switches to the fast mode
    pub const MIRROR_URGENCY_RATIO: f32 = 0.5;
    /// Mirror-O-Meter pointer travel (px)
    pub const INDICATOR_BASE_X: f32 = 362.0;
    pub const INDICATOR_RANGE: f32 = 246.0;

    /// Level grid placement
    pub const GRID_SIZE: f32 = 12.5;
    /// Top-left corner of the primary (left) side
    pub const PRIMARY_ORIGIN: Vec2 = Vec2::new(10.0, 10.0);
    /// Top-right corner of the secondary (right) side
    pub const SECONDARY_ORIGIN: Vec2 = Vec2::new(630.0, 10.0);

    /// Play field halves: each side is a 300px square
    pub const ARENA_SIZE: f32 = 300.0;
    /// Horizontal offset between the left edges of the two halves
    pub const SIDE_OFFSET: f32 = 320.0;

    /// Sprite extents (blocks, hazards and checkpoints share the 25px grid)
    pub const SPRITE_SIZE: f32 = 25.0;

    /// Ticks between game over and the circle transformation (~1 second)
    pub const CIRCLE_DELAY_TICKS: u32 = 60;
}

/// Reflect a primary-side point onto the secondary side (horizontal mirror, y unchanged)
#[inline]
pub fn mirror_point(pos: Vec2, primary_origin: Vec2, secondary_origin: Vec2) -> Vec2 {
    Vec2::new(secondary_origin.x - (pos.x - primary_origin.x), pos.y)
}

/// Convert a frame count to milliseconds of simulated time
#[inline]
pub fn ticks_to_ms(ticks: u64) -> f64 {
    ticks as f64 * 1000.0 / consts::FRAMES_PER_SECOND as f64
}
