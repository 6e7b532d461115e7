//! Detection of repeating grid states.
//!
//! Still lifes repeat with period 1 and oscillators with their period. The
//! detector keeps fingerprints of the most recent grids and reports the
//! distance back to a matching one. Fingerprints are 64-bit hashes, so a
//! match is overwhelmingly likely but not certain to be a true repeat.

use std::collections::VecDeque;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use petri_grid::ToroidalGrid;

/// Fingerprint of a grid: its size and every cell.
pub fn fingerprint(grid: &ToroidalGrid) -> u64 {
    let mut hasher = DefaultHasher::new();
    grid.size().hash(&mut hasher);
    grid.cells().hash(&mut hasher);
    hasher.finish()
}

/// Remembers the last few grids and spots repeats.
#[derive(Debug, Clone)]
pub struct CycleDetector {
    /// Most recent fingerprint last.
    history: VecDeque<u64>,
    /// Maximum fingerprints kept, at least 1.
    capacity: usize,
}

impl CycleDetector {
    /// Create a detector that remembers `capacity` grids (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record `grid` and return the period if it matches a remembered grid.
    ///
    /// The period is the number of observations between the match and now,
    /// so a still life reports 1 and a blinker reports 2.
    pub fn observe(&mut self, grid: &ToroidalGrid) -> Option<usize> {
        let print = fingerprint(grid);
        let period = self
            .history
            .iter()
            .rev()
            .position(|&seen| seen == print)
            .map(|distance| distance.saturating_add(1));

        if self.history.len() >= self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(print);
        period
    }

    /// Forget every remembered grid.
    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Number of grids currently remembered.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Whether nothing is remembered yet.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
