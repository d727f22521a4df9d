//! Concrete grid cell variants
//!
//! These only store values. How the values are updated from scans is up to
//! the map-update logic that owns the grid.

use crate::common::Cell;

/// Occupancy cell holding a log-odds value.
///
/// `update_index` lets a map updater remember the update generation in
/// which the cell was last touched, so one scan only affects it once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OccupancyCell {
    pub log_odds: f32,
    pub update_index: i32,
}

impl OccupancyCell {
    pub fn is_occupied(&self) -> bool {
        self.log_odds > 0.0
    }

    pub fn is_free(&self) -> bool {
        self.log_odds < 0.0
    }

    /// Occupancy probability derived from the log-odds value
    pub fn probability(&self) -> f32 {
        let odds = self.log_odds.exp();
        odds / (odds + 1.0)
    }
}

impl Default for OccupancyCell {
    fn default() -> Self {
        Self {
            log_odds: 0.0,
            update_index: -1,
        }
    }
}

impl Cell for OccupancyCell {
    fn value(&self) -> f32 {
        self.log_odds
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Binary cell marking a hole (obstacle) or free space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HoleCell {
    pub hole: bool,
}

impl Cell for HoleCell {
    fn value(&self) -> f32 {
        if self.hole {
            1.0
        } else {
            0.0
        }
    }

    fn reset(&mut self) {
        self.hole = false;
    }
}
