//! Per-level completion times for the current run
//!
//! Times are wall-clock milliseconds from the start input to the frame the
//! last mission was fulfilled. They live for one session only.

use serde::{Deserialize, Serialize};

/// Completion time log, indexed by 1-based level number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LevelTimes {
    times: Vec<Option<f64>>,
}

impl LevelTimes {
    pub fn new() -> Self {
        Self { times: Vec::new() }
    }

    /// Store the time for a level, replacing any earlier entry
    pub fn record(&mut self, level: usize, elapsed_ms: f64) {
        let Some(slot) = level.checked_sub(1) else {
            log::warn!("Ignoring time for invalid level 0");
            return;
        };
        if self.times.len() <= slot {
            self.times.resize(slot + 1, None);
        }
        self.times[slot] = Some(elapsed_ms);
        log::info!("Level {} time recorded: {}", level, format_clock(elapsed_ms));
    }

    pub fn get(&self, level: usize) -> Option<f64> {
        level
            .checked_sub(1)
            .and_then(|slot| self.times.get(slot).copied().flatten())
    }

    /// Number of levels with a recorded time
    pub fn completed(&self) -> usize {
        self.times.iter().flatten().count()
    }

    /// Sum of all recorded times
    pub fn total_ms(&self) -> f64 {
        self.times.iter().flatten().sum()
    }

    /// Whether the recorded time for `level` is at or under `par_ms`
    pub fn beat_par(&self, level: usize, par_ms: u64) -> Option<bool> {
        self.get(level).map(|ms| ms <= par_ms as f64)
    }

    /// (level, time) pairs in level order
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.times
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.map(|ms| (i + 1, ms)))
    }
}

/// Render milliseconds as `MM:SS`, truncating partial seconds
pub fn format_clock(ms: f64) -> String {
    let total_secs = (ms.max(0.0) / 1000.0).floor() as u64;
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_get() {
        let mut times = LevelTimes::new();
        assert_eq!(times.get(1), None);

        times.record(2, 30_500.0);
        assert_eq!(times.get(1), None);
        assert_eq!(times.get(2), Some(30_500.0));
        assert_eq!(times.completed(), 1);

        times.record(1, 12_000.0);
        assert_eq!(times.iter().collect::<Vec<_>>(), vec![(1, 12_000.0), (2, 30_500.0)]);
        assert_eq!(times.total_ms(), 42_500.0);
    }

    #[test]
    fn test_rerecord_replaces() {
        let mut times = LevelTimes::new();
        times.record(1, 50_000.0);
        times.record(1, 20_000.0);
        assert_eq!(times.get(1), Some(20_000.0));
        assert_eq!(times.completed(), 1);
    }

    #[test]
    fn test_level_zero_ignored() {
        let mut times = LevelTimes::new();
        times.record(0, 1000.0);
        assert_eq!(times.completed(), 0);
        assert_eq!(times.get(0), None);
    }

    #[test]
    fn test_beat_par() {
        let mut times = LevelTimes::new();
        times.record(1, 27_000.0);
        times.record(2, 90_000.0);
        assert_eq!(times.beat_par(1, 27_000), Some(true));
        assert_eq!(times.beat_par(2, 84_000), Some(false));
        assert_eq!(times.beat_par(3, 245_000), None);
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0.0), "00:00");
        assert_eq!(format_clock(27_000.0), "00:27");
        assert_eq!(format_clock(84_999.0), "01:24");
        assert_eq!(format_clock(245_000.0), "04:05");
        assert_eq!(format_clock(-5.0), "00:00");
    }
}
