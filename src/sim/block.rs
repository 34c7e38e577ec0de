//! Player-controlled blocks and the per-side block collection
//!
//! Blocks integrate motion once per frame whether or not they are active:
//! friction always applies, input only reaches the active block.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::{MoveBounds, Rect};
use super::state::{CheckpointKind, Side};
use crate::error::SimError;
use crate::tuning::Tuning;

/// Remaining speed below which friction snaps an axis to rest.
/// Absorbs float residue so a coasting block stops on schedule.
const REST_EPSILON: f32 = 1e-4;

/// The three block characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    /// Plain block
    Standard,
    /// Pirate: both control axes reversed
    Inverted,
    /// Block with glasses
    MirrorBiased,
}

impl BlockKind {
    pub const ALL: [BlockKind; 3] = [Self::Standard, Self::Inverted, Self::MirrorBiased];

    /// Layout/mission code (1..=3)
    pub fn code(self) -> u8 {
        match self {
            Self::Standard => 1,
            Self::Inverted => 2,
            Self::MirrorBiased => 3,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Standard),
            2 => Some(Self::Inverted),
            3 => Some(Self::MirrorBiased),
            _ => None,
        }
    }

    /// Position in per-kind tables such as a level's mission lists
    pub fn index(self) -> usize {
        self.code() as usize - 1
    }

    /// Multiplier applied to directional input
    pub fn control_factor(self) -> f32 {
        match self {
            Self::Inverted => -1.0,
            Self::Standard | Self::MirrorBiased => 1.0,
        }
    }
}

/// Directional input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Unit vector in screen space (y grows downward)
    pub fn unit(self) -> Vec2 {
        match self {
            Self::Up => Vec2::NEG_Y,
            Self::Down => Vec2::Y,
            Self::Left => Vec2::NEG_X,
            Self::Right => Vec2::X,
        }
    }
}

/// Sprite frame shown for a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisualFrame {
    Inactive,
    Active,
    /// Penalty shape after a failed round
    Circle,
}

impl VisualFrame {
    /// Index into the block spritesheet
    pub fn sheet_index(self) -> u32 {
        match self {
            Self::Inactive => 0,
            Self::Active => 1,
            Self::Circle => 2,
        }
    }
}

/// Motion constants carried by each block
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    pub acceleration: f32,
    pub friction: f32,
    pub max_velocity: f32,
}

impl From<&Tuning> for Motion {
    fn from(tuning: &Tuning) -> Self {
        Self {
            acceleration: tuning.acceleration,
            friction: tuning.friction,
            max_velocity: tuning.max_velocity,
        }
    }
}

/// A movable block on one side of the mirror
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub kind: BlockKind,
    pub side: Side,
    /// Sprite centre
    pub pos: Vec2,
    /// Velocity (px/frame)
    pub vel: Vec2,
    pub size: Vec2,
    /// Checkpoints still to visit, front first
    missions: VecDeque<CheckpointKind>,
    active: bool,
    /// False once the round has ended
    alive: bool,
    /// Shown as a circle after a failed round
    transformed: bool,
    /// Secondary-side sprites face the mirror
    pub flip_x: bool,
    bounds: MoveBounds,
    motion: Motion,
}

impl Block {
    pub fn new(
        kind: BlockKind,
        side: Side,
        pos: Vec2,
        missions: &[CheckpointKind],
        tuning: &Tuning,
    ) -> Self {
        let bounds = tuning.block_bounds(side);
        Self {
            kind,
            side,
            pos: bounds.clamp(pos),
            vel: Vec2::ZERO,
            size: tuning.block_size,
            missions: missions.iter().copied().collect(),
            active: false,
            alive: true,
            transformed: false,
            flip_x: side == Side::Secondary,
            bounds,
            motion: Motion::from(tuning),
        }
    }

    /// Bounding box of the sprite
    pub fn bounds(&self) -> Rect {
        Rect::centered(self.pos, self.size)
    }

    pub fn move_bounds(&self) -> &MoveBounds {
        &self.bounds
    }

    pub fn motion(&self) -> &Motion {
        &self.motion
    }

    /// Accelerate in `direction`, scaled by the kind's control factor.
    ///
    /// No activation check happens here: routing input only to the active,
    /// live block is the collection's job (see `BlockCollection::steer`).
    pub fn apply_input(&mut self, direction: Direction) {
        let delta = direction.unit() * self.motion.acceleration * self.kind.control_factor();
        let max = self.motion.max_velocity;
        self.vel = (self.vel + delta).clamp(Vec2::splat(-max), Vec2::splat(max));
    }

    /// Advance one frame: friction, integration, then bounds clamping
    pub fn tick(&mut self) {
        self.vel.x = damp(self.vel.x, self.motion.friction);
        self.vel.y = damp(self.vel.y, self.motion.friction);

        self.pos += self.vel;
        self.pos = self.bounds.clamp(self.pos);
    }

    pub fn next_mission(&self) -> Option<CheckpointKind> {
        self.missions.front().copied()
    }

    /// True iff the front of the mission queue is `kind`
    pub fn next_mission_matches(&self, kind: CheckpointKind) -> bool {
        self.next_mission() == Some(kind)
    }

    /// Pop the front mission if it is `kind`. Returns whether a mission was completed.
    pub fn complete_mission(&mut self, kind: CheckpointKind) -> bool {
        if !self.next_mission_matches(kind) {
            return false;
        }
        self.missions.pop_front();
        true
    }

    pub fn missions(&self) -> impl Iterator<Item = CheckpointKind> + '_ {
        self.missions.iter().copied()
    }

    pub fn remaining_missions(&self) -> usize {
        self.missions.len()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Deactivate and stop dead (no coasting)
    pub fn deactivate(&mut self) {
        self.active = false;
        self.vel = Vec2::ZERO;
    }

    /// Freeze the block at the end of a round
    pub fn disable(&mut self) {
        self.alive = false;
        self.vel = Vec2::ZERO;
    }

    pub fn transform_to_circle(&mut self) {
        self.transformed = true;
    }

    pub fn frame(&self) -> VisualFrame {
        if self.transformed {
            VisualFrame::Circle
        } else if self.active {
            VisualFrame::Active
        } else {
            VisualFrame::Inactive
        }
    }
}

/// Move `v` toward zero by `friction` without crossing it
fn damp(v: f32, friction: f32) -> f32 {
    if v.abs() <= friction + REST_EPSILON {
        0.0
    } else {
        v - friction * v.signum()
    }
}

/// All blocks of one side, plus which one receives input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockCollection {
    side: Side,
    blocks: Vec<Block>,
    active: usize,
}

impl BlockCollection {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            blocks: Vec::new(),
            active: 0,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Append a block; the first one added becomes active
    pub fn add(&mut self, mut block: Block) {
        debug_assert_eq!(block.side, self.side, "block added to the wrong side");
        if self.blocks.is_empty() {
            block.activate();
        }
        self.blocks.push(block);
    }

    /// Hand control to the next block in insertion order, wrapping around.
    /// Returns the new active index.
    pub fn activate_next(&mut self) -> Result<usize, SimError> {
        if self.blocks.is_empty() {
            return Err(SimError::EmptyBlockCollection { side: self.side });
        }
        self.blocks[self.active].deactivate();
        self.active = (self.active + 1) % self.blocks.len();
        self.blocks[self.active].activate();
        Ok(self.active)
    }

    pub fn active(&self) -> Result<&Block, SimError> {
        self.blocks
            .get(self.active)
            .ok_or(SimError::EmptyBlockCollection { side: self.side })
    }

    pub fn active_mut(&mut self) -> Result<&mut Block, SimError> {
        let side = self.side;
        self.blocks
            .get_mut(self.active)
            .ok_or(SimError::EmptyBlockCollection { side })
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    /// Route a held direction to the active block, if it is still alive
    pub fn steer(&mut self, direction: Direction) {
        if let Ok(block) = self.active_mut() {
            if block.is_alive() {
                block.apply_input(direction);
            }
        }
    }

    /// Advance every block one frame, active or not
    pub fn tick_all(&mut self) {
        for block in &mut self.blocks {
            block.tick();
        }
    }

    pub fn disable_all(&mut self) {
        for block in &mut self.blocks {
            block.disable();
        }
    }

    pub fn transform_all(&mut self) {
        for block in &mut self.blocks {
            block.transform_to_circle();
        }
    }

    /// Sum of mission queue lengths
    pub fn remaining_missions(&self) -> usize {
        self.blocks.iter().map(Block::remaining_missions).sum()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Block> {
        self.blocks.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    pub fn as_slice(&self) -> &[Block] {
        &self.blocks
    }
}
