//! Read-only snapshot of everything the renderer and HUD draw
//!
//! Built once per frame after `tick` and handed to the presentation layer
//! (as JSON on the web build).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::block::{Block, BlockKind, VisualFrame};
use super::mirror::MirrorReading;
use super::state::{CheckpointKind, FailureReason, GameState, MusicMode, RoundPhase, Side};
use crate::records::format_clock;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockView {
    pub side: Side,
    pub kind: BlockKind,
    pub pos: Vec2,
    pub frame: VisualFrame,
    /// Spritesheet frame for `frame`
    pub sheet_index: u32,
    pub flip_x: bool,
    pub visible: bool,
    /// Checkpoints still to visit, next first
    pub missions: Vec<CheckpointKind>,
}

impl BlockView {
    fn new(block: &Block, visible: bool) -> Self {
        let frame = block.frame();
        Self {
            side: block.side,
            kind: block.kind,
            pos: block.pos,
            frame,
            sheet_index: frame.sheet_index(),
            flip_x: block.flip_x,
            visible,
            missions: block.missions().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardView {
    pub side: Side,
    pub pos: Vec2,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointView {
    pub side: Side,
    pub kind: CheckpointKind,
    pub pos: Vec2,
    pub sheet_index: u32,
    pub visible: bool,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameView {
    pub level: usize,
    pub level_count: usize,
    /// None while in the menu
    pub phase: Option<RoundPhase>,
    pub failure: Option<FailureReason>,
    pub elapsed_ms: f64,
    /// `MM:SS` form of `elapsed_ms`
    pub clock: String,
    pub par_ms: Option<u64>,
    pub mirror: Option<MirrorReading>,
    pub music: MusicMode,
    pub blocks: Vec<BlockView>,
    pub hazards: Vec<HazardView>,
    pub checkpoints: Vec<CheckpointView>,
    /// Recorded (level, ms) pairs for the summary screen
    pub times: Vec<(usize, f64)>,
    pub total_ms: f64,
}

impl FrameView {
    pub fn capture(state: &GameState) -> Self {
        let round = state.round.as_ref();
        let phase = round.map(|r| r.phase);
        // The level is cleared away on the summary screen
        let visible = phase != Some(RoundPhase::AllLevelsComplete);

        let mut blocks = Vec::new();
        let mut hazards = Vec::new();
        let mut checkpoints = Vec::new();
        if let Some(round) = round {
            for side in Side::BOTH {
                let arena = &round.arena;
                blocks.extend(arena.blocks.get(side).iter().map(|b| BlockView::new(b, visible)));
                hazards.extend(arena.hazards.get(side).iter().map(|h| HazardView {
                    side,
                    pos: h.pos,
                    visible,
                }));
                checkpoints.extend(arena.checkpoints.get(side).iter().map(|c| CheckpointView {
                    side,
                    kind: c.kind,
                    pos: c.pos,
                    sheet_index: u32::from(c.kind.code()) - 1,
                    visible,
                }));
            }
        }

        let elapsed_ms = round.map_or(0.0, |r| r.elapsed_ms);
        let mirror = round.map(|r| r.mirror);
        Self {
            level: state.session.level,
            level_count: state.session.level_count,
            phase,
            failure: round.and_then(|r| r.failure()),
            elapsed_ms,
            clock: format_clock(elapsed_ms),
            par_ms: round.map(|r| r.par_ms),
            music: mirror.map_or(MusicMode::Normal, |m| m.music_mode()),
            mirror,
            blocks,
            hazards,
            checkpoints,
            times: state.session.times.iter().collect(),
            total_ms: state.session.times.total_ms(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
