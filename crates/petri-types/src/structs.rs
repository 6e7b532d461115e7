//! Value structs exchanged between the engine and its collaborators.
//!
//! None of these own behaviour beyond small geometry helpers. The renderer
//! reads [`EngineSnapshot`], the selection layer produces [`Region`], and the
//! pattern store speaks [`PatternDocument`] and [`TagCount`].

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::PatternId;

// ---------------------------------------------------------------------------
// Region
// ---------------------------------------------------------------------------

/// A square sub-region of a grid, addressed by its top-left cell.
///
/// A size of 0 or 1 means "no meaningful selection".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Region {
    /// Column of the top-left cell.
    pub x: usize,
    /// Row of the top-left cell.
    pub y: usize,
    /// Side length in cells.
    pub size: usize,
}

impl Region {
    /// Create a region from its top-left cell and side length.
    pub const fn new(x: usize, y: usize, size: usize) -> Self {
        Self { x, y, size }
    }

    /// Build the square region spanned by a drag from `start` to `end`.
    ///
    /// Each axis spans `end - start + 1` cells (signed). The side length is
    /// the smaller of the two magnitudes, and the region grows from `start`
    /// in the direction of the drag on each axis.
    pub fn from_corners(start: (usize, usize), end: (usize, usize)) -> Self {
        let (width, x_backwards) = axis_extent(start.0, end.0);
        let (height, y_backwards) = axis_extent(start.1, end.1);
        let size = width.min(height);

        let x = if x_backwards {
            start.0.saturating_sub(size)
        } else {
            start.0
        };
        let y = if y_backwards {
            start.1.saturating_sub(size)
        } else {
            start.1
        };

        Self { x, y, size }
    }

    /// Whether the region is large enough to count as a selection.
    pub const fn is_meaningful(&self) -> bool {
        self.size > 1
    }

    /// Trim the region so it lies entirely inside a grid of `grid_size`.
    ///
    /// The region stays square: the side shrinks to the tighter of the two
    /// remaining extents. A region starting outside the grid collapses to
    /// size 0.
    #[must_use]
    pub const fn clip_to(&self, grid_size: usize) -> Self {
        if self.x >= grid_size || self.y >= grid_size {
            return Self {
                x: self.x,
                y: self.y,
                size: 0,
            };
        }
        let room_x = grid_size.saturating_sub(self.x);
        let room_y = grid_size.saturating_sub(self.y);
        let room = if room_x < room_y { room_x } else { room_y };
        let size = if self.size < room { self.size } else { room };
        Self {
            x: self.x,
            y: self.y,
            size,
        }
    }
}

/// Magnitude of `end - start + 1`, and whether that signed value is negative.
const fn axis_extent(start: usize, end: usize) -> (usize, bool) {
    if end >= start {
        (end.saturating_sub(start).saturating_add(1), false)
    } else {
        // end - start + 1 == -(start - end - 1)
        let magnitude = start.saturating_sub(end).saturating_sub(1);
        (magnitude, magnitude > 0)
    }
}

// ---------------------------------------------------------------------------
// Persistence shapes
// ---------------------------------------------------------------------------

/// The document shape a pattern is stored as.
///
/// Text fields are stored as given; empty strings are resolved to
/// `"Unknown"` when a pattern is rebuilt from the document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PatternDocument {
    /// Store-assigned identity, absent until the first save.
    #[serde(rename = "_id")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional, rename = "_id")]
    pub id: Option<PatternId>,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Normalized pattern text: square rows of `O` and `.` joined by newlines.
    pub pattern: String,
    /// Where the pattern was found (usually a URL).
    #[serde(default)]
    pub source: String,
    /// Who discovered the pattern.
    #[serde(default)]
    pub founder: String,
    /// When the pattern was discovered, free text.
    #[serde(default)]
    pub found_date: String,
    /// Lowercase search tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A search key and the number of index rows that carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TagCount {
    /// The index key (a name, founder or tag).
    pub tag: String,
    /// How many patterns emit this key.
    pub count: usize,
}

// ---------------------------------------------------------------------------
// Engine snapshot
// ---------------------------------------------------------------------------

/// Read-only copy of the engine state handed to a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EngineSnapshot {
    /// Side length of the square grid.
    pub size: usize,
    /// Generations stepped since the last reset.
    pub generation: u64,
    /// Number of live cells.
    pub population: u64,
    /// Row-major cell states, `1` alive and `0` dead, `size * size` long.
    pub cells: Vec<u8>,
}
