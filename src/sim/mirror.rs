//! Mirror-O-Meter: how far the two sides have drifted out of sync
//!
//! Each primary block is compared with its same-index partner on the
//! secondary side. Positions are taken relative to each side's origin, with
//! the secondary x axis running right to left, so a perfect mirror image
//! scores zero.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::block::BlockCollection;
use super::state::{MusicMode, SidePair};
use crate::tuning::Tuning;

/// Result of one divergence evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MirrorReading {
    /// Summed per-block divergence
    pub value: f32,
    /// Pointer position on the meter
    pub indicator_x: f32,
    /// Divergence is past the urgency threshold
    pub urgent: bool,
    /// Divergence reached the tolerance; the round is lost
    pub diverged: bool,
}

impl MirrorReading {
    /// Reading for perfectly mirrored sides
    pub fn at_rest(tuning: &Tuning) -> Self {
        Self::from_value(0.0, tuning)
    }

    pub fn from_value(value: f32, tuning: &Tuning) -> Self {
        Self {
            value,
            indicator_x: tuning.indicator_base_x
                + value / tuning.mirror_tolerance * tuning.indicator_range,
            urgent: value >= tuning.urgency_threshold(),
            diverged: value >= tuning.mirror_tolerance,
        }
    }

    /// Measure both block collections
    pub fn evaluate(blocks: &SidePair<BlockCollection>, tuning: &Tuning) -> Self {
        let value = mirror_value(
            &blocks.primary,
            &blocks.secondary,
            tuning.primary_origin,
            tuning.secondary_origin,
        );
        Self::from_value(value, tuning)
    }

    pub fn music_mode(&self) -> MusicMode {
        if self.urgent {
            MusicMode::Fast
        } else {
            MusicMode::Normal
        }
    }
}

/// Manhattan distance between a primary position and its secondary partner,
/// both mapped into primary orientation
pub fn pair_divergence(
    primary: Vec2,
    secondary: Vec2,
    primary_origin: Vec2,
    secondary_origin: Vec2,
) -> f32 {
    let left = primary - primary_origin;
    let right = Vec2::new(secondary_origin.x - secondary.x, secondary.y - secondary_origin.y);
    (left - right).abs().element_sum()
}

/// Sum of pair divergences over every block index
pub fn mirror_value(
    primary: &BlockCollection,
    secondary: &BlockCollection,
    primary_origin: Vec2,
    secondary_origin: Vec2,
) -> f32 {
    debug_assert_eq!(primary.len(), secondary.len(), "unpaired block collections");
    primary
        .iter()
        .zip(secondary.iter())
        .map(|(l, r)| pair_divergence(l.pos, r.pos, primary_origin, secondary_origin))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mirror_point;
    use crate::sim::block::{Block, BlockKind};
    use crate::sim::state::Side;
    use proptest::prelude::*;

    fn pair(tuning: &Tuning, left: &[Vec2], right: &[Vec2]) -> SidePair<BlockCollection> {
        let mut blocks = SidePair::new(
            BlockCollection::new(Side::Primary),
            BlockCollection::new(Side::Secondary),
        );
        for &pos in left {
            blocks
                .primary
                .add(Block::new(BlockKind::Standard, Side::Primary, pos, &[], tuning));
        }
        for &pos in right {
            blocks
                .secondary
                .add(Block::new(BlockKind::Standard, Side::Secondary, pos, &[], tuning));
        }
        blocks
    }

    #[test]
    fn test_exact_mirror_reads_zero() {
        let tuning = Tuning::default();
        let left = [Vec2::new(22.5, 60.0), Vec2::new(150.0, 200.0)];
        let right: Vec<_> = left
            .iter()
            .map(|&p| mirror_point(p, tuning.primary_origin, tuning.secondary_origin))
            .collect();
        let reading = MirrorReading::evaluate(&pair(&tuning, &left, &right), &tuning);
        assert_eq!(reading.value, 0.0);
        assert_eq!(reading.indicator_x, tuning.indicator_base_x);
        assert!(!reading.urgent);
        assert!(!reading.diverged);
        assert_eq!(reading.music_mode(), MusicMode::Normal);
    }

    #[test]
    fn test_divergence_sums_both_axes_and_blocks() {
        let tuning = Tuning::default();
        let left = [Vec2::new(100.0, 100.0), Vec2::new(50.0, 50.0)];
        // First pair off by 10 on x and 5 on y, second by 20 on y
        let right = [Vec2::new(530.0, 105.0), Vec2::new(590.0, 70.0)];
        let blocks = pair(&tuning, &left, &right);
        let value = mirror_value(
            &blocks.primary,
            &blocks.secondary,
            tuning.primary_origin,
            tuning.secondary_origin,
        );
        assert!((value - 35.0).abs() < 1e-4);
    }

    #[test]
    fn test_thresholds() {
        let tuning = Tuning::default();

        let below = MirrorReading::from_value(49.9, &tuning);
        assert!(!below.urgent);

        let half = MirrorReading::from_value(50.0, &tuning);
        assert!(half.urgent);
        assert!(!half.diverged);
        assert_eq!(half.music_mode(), MusicMode::Fast);
        assert!((half.indicator_x - (362.0 + 123.0)).abs() < 1e-4);

        assert!(!MirrorReading::from_value(99.99, &tuning).diverged);
        let full = MirrorReading::from_value(100.0, &tuning);
        assert!(full.diverged);
        assert!((full.indicator_x - 608.0).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_mirrored_pairs_always_zero(
            points in proptest::collection::vec((22.5f32..297.5, 22.5f32..297.5), 1..6)
        ) {
            let tuning = Tuning::default();
            let left: Vec<_> = points.iter().map(|&(x, y)| Vec2::new(x, y)).collect();
            let right: Vec<_> = left
                .iter()
                .map(|&p| mirror_point(p, tuning.primary_origin, tuning.secondary_origin))
                .collect();
            let reading = MirrorReading::evaluate(&pair(&tuning, &left, &right), &tuning);
            prop_assert!(reading.value.abs() < 1e-3);
        }

        #[test]
        fn prop_divergence_iff_tolerance(value in 0.0f32..200.0) {
            let tuning = Tuning::default();
            let reading = MirrorReading::from_value(value, &tuning);
            prop_assert_eq!(reading.diverged, value >= tuning.mirror_tolerance);
        }
    }
}
