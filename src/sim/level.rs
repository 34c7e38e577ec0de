//! Level definitions and the mirrored layout decoder
//!
//! A level is a grid of cell codes. One decode pass places every non-empty
//! cell on both sides at once: the primary side reads the grid left to right
//! from its top-left origin, the secondary side reads it right to left from
//! its top-right origin. Entities are emitted in row-major order in lockstep,
//! so index `i` on one side is always the mirror image of index `i` on the other.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::block::{Block, BlockKind};
use super::state::{Arena, Checkpoint, CheckpointKind, Hazard, Side};
use crate::error::SimError;
use crate::tuning::Tuning;

/// Contents of one layout cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Block(BlockKind),
    Hazard,
    Checkpoint(CheckpointKind),
}

impl Cell {
    /// Decode a layout code: 0 empty, 1-3 blocks, 4 hazard, 5-7 checkpoints
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Empty),
            1..=3 => BlockKind::from_code(code).map(Self::Block),
            4 => Some(Self::Hazard),
            5..=7 => CheckpointKind::from_code(code - 4).map(Self::Checkpoint),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Block(kind) => kind.code(),
            Self::Hazard => 4,
            Self::Checkpoint(kind) => kind.code() + 4,
        }
    }
}

/// A static level: layout, per-kind missions and par time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub layout: Vec<Vec<Cell>>,
    /// Mission list for each block kind, indexed by `BlockKind::index`
    pub missions: [Vec<CheckpointKind>; 3],
    /// Developer's best time (ms)
    pub par_ms: u64,
}

impl Level {
    /// Build a level from raw codes, validating every cell and mission entry
    pub fn from_codes<R: AsRef<[u8]>>(
        rows: &[R],
        missions: [&[u8]; 3],
        par_ms: u64,
    ) -> Result<Self, SimError> {
        let layout = rows
            .iter()
            .enumerate()
            .map(|(row, cells)| {
                cells
                    .as_ref()
                    .iter()
                    .enumerate()
                    .map(|(col, &code)| {
                        Cell::from_code(code).ok_or(SimError::UnknownCell { row, col, code })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let parse = |codes: &[u8]| -> Result<Vec<CheckpointKind>, SimError> {
            codes
                .iter()
                .map(|&code| {
                    CheckpointKind::from_code(code).ok_or(SimError::UnknownCheckpoint { code })
                })
                .collect()
        };
        let missions = [parse(missions[0])?, parse(missions[1])?, parse(missions[2])?];

        let level = Self {
            layout,
            missions,
            par_ms,
        };
        level.validate()?;
        Ok(level)
    }

    /// The grid must be rectangular and contain at least one block
    pub fn validate(&self) -> Result<(), SimError> {
        let expected = self.layout.first().map_or(0, Vec::len);
        for (row, cells) in self.layout.iter().enumerate() {
            if cells.len() != expected {
                return Err(SimError::RaggedLayout {
                    row,
                    expected,
                    found: cells.len(),
                });
            }
        }
        let has_block = self
            .layout
            .iter()
            .flatten()
            .any(|cell| matches!(cell, Cell::Block(_)));
        if !has_block {
            return Err(SimError::NoBlocks);
        }
        Ok(())
    }

    pub fn missions_for(&self, kind: BlockKind) -> &[CheckpointKind] {
        &self.missions[kind.index()]
    }

    pub fn rows(&self) -> usize {
        self.layout.len()
    }

    pub fn cols(&self) -> usize {
        self.layout.first().map_or(0, Vec::len)
    }

    /// Place every entity on both sides of the mirror
    pub fn decode(&self, tuning: &Tuning) -> Result<Arena, SimError> {
        self.validate()?;
        let mut arena = Arena::empty();

        for (row, cells) in self.layout.iter().enumerate() {
            for (col, &cell) in cells.iter().enumerate() {
                let offset = Vec2::new(col as f32, row as f32) * tuning.grid_size;
                let primary = tuning.primary_origin + offset;
                let secondary = Vec2::new(tuning.secondary_origin.x - offset.x, primary.y);

                match cell {
                    Cell::Empty => {}
                    Cell::Block(kind) => {
                        let missions = self.missions_for(kind);
                        arena
                            .blocks
                            .primary
                            .add(Block::new(kind, Side::Primary, primary, missions, tuning));
                        arena
                            .blocks
                            .secondary
                            .add(Block::new(kind, Side::Secondary, secondary, missions, tuning));
                    }
                    Cell::Hazard => {
                        let placements = [(Side::Primary, primary), (Side::Secondary, secondary)];
                        for (side, pos) in placements {
                            arena.hazards.get_mut(side).push(Hazard {
                                pos,
                                size: tuning.hazard_size,
                                side,
                            });
                        }
                    }
                    Cell::Checkpoint(kind) => {
                        let placements = [(Side::Primary, primary), (Side::Secondary, secondary)];
                        for (side, pos) in placements {
                            arena.checkpoints.get_mut(side).push(Checkpoint {
                                pos,
                                size: tuning.checkpoint_size,
                                kind,
                                side,
                            });
                        }
                    }
                }
            }
        }

        arena.check_pairing()?;
        log::info!(
            "Decoded {}x{} level: {} blocks, {} hazards, {} checkpoints per side",
            self.rows(),
            self.cols(),
            arena.blocks.primary.len(),
            arena.hazards.primary.len(),
            arena.checkpoints.primary.len()
        );
        Ok(arena)
    }
}

/// Ordered list of playable levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelCatalog {
    levels: Vec<Level>,
}

impl LevelCatalog {
    pub fn new(levels: Vec<Level>) -> Self {
        Self { levels }
    }

    /// The three shipped levels
    pub fn standard() -> Result<Self, SimError> {
        Ok(Self::new(vec![level_1()?, level_2()?, level_3()?]))
    }

    /// Only the developer test level
    pub fn test_only() -> Result<Self, SimError> {
        Ok(Self::new(vec![test_level()?]))
    }

    /// Level by 1-based index
    pub fn get(&self, index: usize) -> Result<&Level, SimError> {
        index
            .checked_sub(1)
            .and_then(|i| self.levels.get(i))
            .ok_or(SimError::LevelIndexOutOfRange {
                index,
                count: self.levels.len(),
            })
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

// === Level data (24x24 grids) ===
// 0 empty, 1 standard, 2 inverted, 3 mirror-biased, 4 hazard, 5 tree, 6 rocket, 7 potato

const LEVEL_1: [[u8; 24]; 24] = [
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 6],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 4, 0, 4, 0, 4, 0, 4, 0, 4],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 2, 0, 0, 0, 0, 0, 0, 0, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 5],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 4, 0, 4, 0, 4],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 3, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 7],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
];

const LEVEL_2: [[u8; 24]; 24] = [
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 4, 0, 0, 0, 0, 0, 0, 0, 0, 4, 0, 0, 4, 0, 0, 4, 0],
    [0, 0, 0, 0, 7, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 4, 0, 4, 0, 4, 0, 4, 0, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 4, 0, 0, 0, 0, 0, 0, 0, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 5, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 4, 0, 0, 0, 0, 0, 0, 0, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 4, 0, 4, 0, 0, 4, 0, 0, 0, 0, 0, 0, 0, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 6, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 3, 0, 0, 0, 0, 0, 0, 0, 0, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
];

const LEVEL_3: [[u8; 24]; 24] = [
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 4, 0, 4, 0, 4, 0, 4, 0, 4, 0, 4, 0, 4, 0, 4, 0, 4, 0, 4, 0, 0, 0, 5],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 4, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 7, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 4, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 4, 0, 4, 0, 4, 0, 4, 0, 4, 0, 4, 0, 4, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 4, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 6, 0, 0, 0, 0, 0, 0, 0, 0, 4, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 4, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 4, 0, 4, 0, 4, 0, 4, 0, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 4, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 4, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 4, 0, 4, 0, 4, 0, 4, 0, 4, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3],
];

const TEST_LEVEL: [[u8; 24]; 24] = [
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 5, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 4],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 6, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 4, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 3, 0, 0, 0, 0, 0, 0, 0, 0, 0, 7, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
];

fn level_1() -> Result<Level, SimError> {
    Level::from_codes(&LEVEL_1, [&[2], &[3], &[1, 3]], 27_000)
}

fn level_2() -> Result<Level, SimError> {
    Level::from_codes(&LEVEL_2, [&[1], &[2, 1], &[2, 3, 1]], 84_000)
}

fn level_3() -> Result<Level, SimError> {
    Level::from_codes(&LEVEL_3, [&[2, 3, 1], &[1, 3], &[2, 3]], 245_000)
}

fn test_level() -> Result<Level, SimError> {
    Level::from_codes(&TEST_LEVEL, [&[1, 2], &[], &[]], 10_000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::block::VisualFrame;
    use crate::sim::rect::Rect;

    fn small_tuning() -> Tuning {
        let field = Rect::new(-50.0, -50.0, 150.0, 150.0);
        Tuning {
            primary_arena: field,
            secondary_arena: field,
            grid_size: 10.0,
            primary_origin: Vec2::ZERO,
            secondary_origin: Vec2::new(20.0, 0.0),
            ..Tuning::default()
        }
    }

    #[test]
    fn test_cell_codes() {
        for code in 0..=7 {
            assert_eq!(Cell::from_code(code).unwrap().code(), code);
        }
        assert_eq!(Cell::from_code(8), None);
        assert_eq!(Cell::from_code(5), Some(Cell::Checkpoint(CheckpointKind::Tree)));
        assert_eq!(Cell::from_code(2), Some(Cell::Block(BlockKind::Inverted)));
    }

    #[test]
    fn test_decode_mirrors_single_block() {
        let layout = [[1u8, 0, 0], [0, 0, 0], [0, 0, 0]];
        let level = Level::from_codes(&layout, [&[2, 1], &[], &[]], 1000).unwrap();
        let arena = level.decode(&small_tuning()).unwrap();

        let left = arena.blocks.primary.get(0).unwrap();
        let right = arena.blocks.secondary.get(0).unwrap();
        assert_eq!(left.pos, Vec2::new(0.0, 0.0));
        assert_eq!(right.pos, Vec2::new(20.0, 0.0));
        assert!(!left.flip_x);
        assert!(right.flip_x);

        let expected = vec![CheckpointKind::Rocket, CheckpointKind::Tree];
        assert_eq!(left.missions().collect::<Vec<_>>(), expected);
        assert_eq!(right.missions().collect::<Vec<_>>(), expected);
        assert_eq!(left.frame(), VisualFrame::Active);
        assert_eq!(right.frame(), VisualFrame::Active);
    }

    #[test]
    fn test_mission_lists_are_independent_copies() {
        let level = Level::from_codes(&[[1u8, 0, 0]], [&[2, 1], &[], &[]], 1000).unwrap();
        let mut arena = level.decode(&small_tuning()).unwrap();
        arena
            .blocks
            .primary
            .get_mut(0)
            .unwrap()
            .complete_mission(CheckpointKind::Rocket);
        assert_eq!(arena.blocks.primary.remaining_missions(), 1);
        assert_eq!(arena.blocks.secondary.remaining_missions(), 2);
        assert_eq!(level.missions_for(BlockKind::Standard).len(), 2);
    }

    #[test]
    fn test_decode_places_pairs_in_scan_order() {
        let level = Level::from_codes(
            &[[0u8, 4, 0, 5], [2, 0, 6, 0], [0, 1, 0, 4]],
            [&[], &[], &[]],
            1000,
        )
        .unwrap();
        let tuning = small_tuning();
        let arena = level.decode(&tuning).unwrap();
        assert!(arena.check_pairing().is_ok());

        let kinds: Vec<_> = arena.blocks.primary.iter().map(|b| b.kind).collect();
        assert_eq!(kinds, vec![BlockKind::Inverted, BlockKind::Standard]);
        // First block added is the active one on both sides
        assert_eq!(arena.blocks.primary.active().unwrap().kind, BlockKind::Inverted);
        assert_eq!(arena.blocks.secondary.active().unwrap().kind, BlockKind::Inverted);

        for side in Side::BOTH {
            assert_eq!(arena.hazards.get(side).len(), 2);
            assert_eq!(arena.checkpoints.get(side).len(), 2);
        }
        for (l, r) in arena.hazards.primary.iter().zip(&arena.hazards.secondary) {
            assert_eq!(
                r.pos,
                crate::mirror_point(l.pos, tuning.primary_origin, tuning.secondary_origin)
            );
        }
        let cp_kinds: Vec<_> = arena.checkpoints.secondary.iter().map(|c| c.kind).collect();
        assert_eq!(cp_kinds, vec![CheckpointKind::Tree, CheckpointKind::Rocket]);
        assert_eq!(arena.checkpoints.primary[1].pos, Vec2::new(20.0, 10.0));
        assert_eq!(arena.checkpoints.secondary[1].pos, Vec2::new(0.0, 10.0));
    }

    #[test]
    fn test_invalid_levels_rejected() {
        assert_eq!(
            Level::from_codes(&[[0u8, 9]], [&[], &[], &[]], 0),
            Err(SimError::UnknownCell {
                row: 0,
                col: 1,
                code: 9
            })
        );
        assert_eq!(
            Level::from_codes(&[[1u8, 0]], [&[4], &[], &[]], 0),
            Err(SimError::UnknownCheckpoint { code: 4 })
        );
        assert_eq!(
            Level::from_codes(&[[0u8, 4]], [&[], &[], &[]], 0),
            Err(SimError::NoBlocks)
        );
        let ragged: [&[u8]; 2] = [&[1, 0], &[0]];
        assert_eq!(
            Level::from_codes(&ragged, [&[], &[], &[]], 0),
            Err(SimError::RaggedLayout {
                row: 1,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_standard_catalog() {
        let catalog = LevelCatalog::standard().unwrap();
        assert_eq!(catalog.len(), 3);
        let pars: Vec<_> = (1..=3).map(|i| catalog.get(i).unwrap().par_ms).collect();
        assert_eq!(pars, vec![27_000, 84_000, 245_000]);
        assert!(matches!(
            catalog.get(0),
            Err(SimError::LevelIndexOutOfRange { index: 0, count: 3 })
        ));
        assert!(catalog.get(4).is_err());

        let tuning = Tuning::default();
        for i in 1..=3 {
            let arena = catalog.get(i).unwrap().decode(&tuning).unwrap();
            assert_eq!(arena.blocks.primary.len(), 3);
            assert_eq!(arena.checkpoints.primary.len(), 3);
        }
    }

    #[test]
    fn test_test_level() {
        let catalog = LevelCatalog::test_only().unwrap();
        let level = catalog.get(1).unwrap();
        assert_eq!(level.par_ms, 10_000);
        assert!(level.missions_for(BlockKind::Inverted).is_empty());
        assert_eq!(level.rows(), 24);
        assert_eq!(level.cols(), 24);
    }
}
