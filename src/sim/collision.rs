//! Collision detection between blocks, hazards and checkpoints
//!
//! All tests are axis-aligned box overlaps on post-integration positions.
//! Hazard and block-block contacts end the round; checkpoint contacts advance
//! missions, but only when both mirror instances of a block are on the
//! matching checkpoint instance in the same frame.

use serde::{Deserialize, Serialize};

use super::block::BlockCollection;
use super::state::{Arena, CheckpointKind, Checkpoint, FailureReason, Hazard, Side};

/// A contact that fails the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collision {
    pub reason: FailureReason,
    pub side: Side,
    /// Index of the block that was hit
    pub block: usize,
    /// Index of the hazard or second block involved
    pub other: usize,
}

/// A mission advanced on both sides at once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionProgress {
    pub block: usize,
    pub checkpoint: usize,
    pub kind: CheckpointKind,
}

/// First block touching any hazard on the same side
pub fn check_hazard_collisions(blocks: &BlockCollection, hazards: &[Hazard]) -> Option<Collision> {
    for (i, block) in blocks.iter().enumerate() {
        let bounds = block.bounds();
        if let Some(j) = hazards.iter().position(|h| bounds.intersects(&h.bounds())) {
            return Some(Collision {
                reason: FailureReason::Hazard,
                side: blocks.side(),
                block: i,
                other: j,
            });
        }
    }
    None
}

/// First pair of distinct blocks on one side that touch
pub fn check_block_collisions(blocks: &BlockCollection) -> Option<Collision> {
    let all = blocks.as_slice();
    for (i, a) in all.iter().enumerate() {
        let bounds = a.bounds();
        for (j, b) in all.iter().enumerate().skip(i + 1) {
            if bounds.intersects(&b.bounds()) {
                return Some(Collision {
                    reason: FailureReason::BlockCollision,
                    side: blocks.side(),
                    block: i,
                    other: j,
                });
            }
        }
    }
    None
}

/// Advance every mission whose block pair is standing on the matching
/// checkpoint pair. Returns what was completed, in block order.
pub fn check_checkpoint_progress(
    primary: &mut BlockCollection,
    secondary: &mut BlockCollection,
    primary_checkpoints: &[Checkpoint],
    secondary_checkpoints: &[Checkpoint],
) -> Vec<MissionProgress> {
    let mut progress = Vec::new();
    let pairs = primary_checkpoints.iter().zip(secondary_checkpoints).enumerate();

    for i in 0..primary.len().min(secondary.len()) {
        for (j, (cp_left, cp_right)) in pairs.clone() {
            let (Some(left), Some(right)) = (primary.get(i), secondary.get(i)) else {
                continue;
            };
            let kind = cp_left.kind;
            let on_both = left.bounds().intersects(&cp_left.bounds())
                && right.bounds().intersects(&cp_right.bounds());
            if !on_both || !left.next_mission_matches(kind) || !right.next_mission_matches(kind) {
                continue;
            }

            for blocks in [&mut *primary, &mut *secondary] {
                if let Some(block) = blocks.get_mut(i) {
                    block.complete_mission(kind);
                }
            }
            log::debug!("Block {} completed mission at checkpoint {} ({:?})", i, j, kind);
            progress.push(MissionProgress {
                block: i,
                checkpoint: j,
                kind,
            });
        }
    }
    progress
}

impl Arena {
    /// Hazard contacts on both sides, then block-block contacts on both sides
    pub fn find_collision(&self) -> Option<Collision> {
        Side::BOTH
            .into_iter()
            .find_map(|side| check_hazard_collisions(self.blocks.get(side), self.hazards.get(side)))
            .or_else(|| {
                Side::BOTH
                    .into_iter()
                    .find_map(|side| check_block_collisions(self.blocks.get(side)))
            })
    }

    pub fn advance_missions(&mut self) -> Vec<MissionProgress> {
        let Arena {
            blocks, checkpoints, ..
        } = self;
        check_checkpoint_progress(
            &mut blocks.primary,
            &mut blocks.secondary,
            &checkpoints.primary,
            &checkpoints.secondary,
        )
    }
}
