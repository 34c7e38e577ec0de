//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one tick per frame)
//! - Stable iteration order (insertion order, paired by index across sides)
//! - No rendering or platform dependencies

pub mod block;
pub mod collision;
pub mod level;
pub mod mirror;
pub mod rect;
pub mod state;
pub mod tick;
pub mod view;

pub use block::{Block, BlockCollection, BlockKind, Direction, Motion, VisualFrame};
pub use collision::{
    Collision, MissionProgress, check_block_collisions, check_checkpoint_progress,
    check_hazard_collisions,
};
pub use level::{Cell, Level, LevelCatalog};
pub use mirror::{MirrorReading, mirror_value};
pub use rect::{MoveBounds, Rect};
pub use state::{
    Arena, Checkpoint, CheckpointKind, FailureReason, GameEvent, GameState, Hazard, MusicMode,
    Round, RoundPhase, Session, Side, SidePair,
};
pub use tick::{SideInput, TickInput, tick};
pub use view::{BlockView, CheckpointView, FrameView, HazardView};
