//! Data-driven game balance and arena geometry
//!
//! Defaults reproduce the shipped game. Overrides can be supplied as JSON
//! (any missing field falls back to its default) and are persisted in
//! LocalStorage on the web build.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::rect::{MoveBounds, Rect};
use crate::sim::state::Side;

/// Tunable simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Block motion (per frame) ===
    /// Velocity added per frame while a direction is held
    pub acceleration: f32,
    /// Velocity removed per frame, never past zero
    pub friction: f32,
    /// Per-axis velocity cap
    pub max_velocity: f32,

    // === Mirror-O-Meter ===
    /// Divergence at which the round fails
    pub mirror_tolerance: f32,
    /// Fraction of the tolerance that raises the urgency hint
    pub urgency_ratio: f32,
    /// Pointer position at zero divergence
    pub indicator_base_x: f32,
    /// Pointer travel between zero divergence and the tolerance
    pub indicator_range: f32,

    // === Layout ===
    pub grid_size: f32,
    /// Top-left corner of the primary side
    pub primary_origin: Vec2,
    /// Top-right corner of the secondary side
    pub secondary_origin: Vec2,
    pub primary_arena: Rect,
    pub secondary_arena: Rect,
    pub block_size: Vec2,
    pub hazard_size: Vec2,
    pub checkpoint_size: Vec2,

    // === Effects ===
    /// Frames between game over and the circle transformation
    pub circle_delay_ticks: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            acceleration: BLOCK_ACCELERATION,
            friction: BLOCK_FRICTION,
            max_velocity: BLOCK_MAX_VELOCITY,

            mirror_tolerance: MIRROR_TOLERANCE,
            urgency_ratio: MIRROR_URGENCY_RATIO,
            indicator_base_x: INDICATOR_BASE_X,
            indicator_range: INDICATOR_RANGE,

            grid_size: GRID_SIZE,
            primary_origin: PRIMARY_ORIGIN,
            secondary_origin: SECONDARY_ORIGIN,
            primary_arena: Rect::new(PRIMARY_ORIGIN.x, PRIMARY_ORIGIN.y, ARENA_SIZE, ARENA_SIZE),
            secondary_arena: Rect::new(
                PRIMARY_ORIGIN.x + SIDE_OFFSET,
                PRIMARY_ORIGIN.y,
                ARENA_SIZE,
                ARENA_SIZE,
            ),
            block_size: Vec2::splat(SPRITE_SIZE),
            hazard_size: Vec2::splat(SPRITE_SIZE),
            checkpoint_size: Vec2::splat(SPRITE_SIZE),

            circle_delay_ticks: CIRCLE_DELAY_TICKS,
        }
    }
}

impl Tuning {
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "mirror_blocks_tuning";

    /// Parse overrides from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Reject values that would break the simulation invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.acceleration <= 0.0 {
            return Err(ConfigError::Invalid("acceleration must be positive"));
        }
        if self.friction <= 0.0 {
            return Err(ConfigError::Invalid("friction must be positive"));
        }
        if self.max_velocity <= 0.0 {
            return Err(ConfigError::Invalid("max_velocity must be positive"));
        }
        if self.mirror_tolerance <= 0.0 {
            return Err(ConfigError::Invalid("mirror_tolerance must be positive"));
        }
        if !(0.0..=1.0).contains(&self.urgency_ratio) {
            return Err(ConfigError::Invalid("urgency_ratio must be within 0..=1"));
        }
        if self.grid_size <= 0.0 {
            return Err(ConfigError::Invalid("grid_size must be positive"));
        }
        Ok(())
    }

    /// Arena rectangle for a side
    pub fn arena(&self, side: Side) -> Rect {
        match side {
            Side::Primary => self.primary_arena,
            Side::Secondary => self.secondary_arena,
        }
    }

    /// Where a block centre may move on a side
    pub fn block_bounds(&self, side: Side) -> MoveBounds {
        MoveBounds::inset(&self.arena(side), self.block_size)
    }

    /// Divergence that raises the urgency hint
    pub fn urgency_threshold(&self) -> f32 {
        self.mirror_tolerance * self.urgency_ratio
    }

    /// Load tuning from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring stored tuning: {}", e),
                }
            }
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        // Friction is exactly half the acceleration
        assert!((tuning.friction * 2.0 - tuning.acceleration).abs() < 1e-6);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{"mirror_tolerance": 150.0}"#).unwrap();
        assert_eq!(tuning.mirror_tolerance, 150.0);
        assert_eq!(tuning.grid_size, GRID_SIZE);
        assert_eq!(tuning.circle_delay_ticks, CIRCLE_DELAY_TICKS);
    }

    #[test]
    fn test_json_round_trip() {
        let tuning = Tuning::default();
        let json = tuning.to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), tuning);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            Tuning::from_json(r#"{"friction": 0.0}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{"urgency_ratio": 2.0}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Tuning::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_side_bounds() {
        let tuning = Tuning::default();
        let left = tuning.block_bounds(Side::Primary);
        let right = tuning.block_bounds(Side::Secondary);
        assert_eq!(left.min.x, 22.5);
        assert_eq!(left.max.x, 297.5);
        assert_eq!(right.min.x, 342.5);
        assert_eq!(right.max.x, 617.5);
        assert_eq!(left.min.y, right.min.y);
        assert_eq!(tuning.urgency_threshold(), 50.0);
    }
}
