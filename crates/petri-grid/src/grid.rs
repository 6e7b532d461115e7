//! The toroidal cell grid.
//!
//! A [`ToroidalGrid`] owns a flat row-major buffer of `size * size` cells,
//! each `1` (alive) or `0` (dead). Cell `(x, y)` lives at `y * size + x`.
//!
//! Reads through [`ToroidalGrid::alive`] wrap both coordinates around the
//! edges, so there is no invalid coordinate to read. [`ToroidalGrid::toggle`]
//! does NOT wrap: it flips the literal index `y * size + x`. Callers pass
//! coordinates they already know are in range, and some of them read the
//! same cell back through the wrapping accessor straight afterwards.

use core::fmt;

use tracing::debug;

use crate::error::GridError;

/// Cell value for a live cell.
pub const ALIVE: u8 = 1;

/// Cell value for a dead cell.
pub const DEAD: u8 = 0;

/// Number of cells in a grid of the given side length.
///
/// # Errors
///
/// Returns [`GridError::InvalidDimension`] if `size` is zero or `size * size`
/// overflows `usize`.
pub const fn cell_count(size: usize) -> Result<usize, GridError> {
    if size == 0 {
        return Err(GridError::InvalidDimension { size });
    }
    match size.checked_mul(size) {
        Some(count) => Ok(count),
        None => Err(GridError::InvalidDimension { size }),
    }
}

/// Wrap a coordinate into `[0, size)`.
///
/// Neighbor lookups only ever step one cell past an edge (`-1 -> size - 1`,
/// `size -> 0`); larger offsets wrap the same way, modulo `size`.
pub fn wrap_coordinate(value: isize, size: usize) -> usize {
    let Ok(modulus) = isize::try_from(size) else {
        // A grid this large cannot have negative coordinates in range.
        return usize::try_from(value).unwrap_or(0);
    };
    value
        .checked_rem_euclid(modulus)
        .and_then(|wrapped| usize::try_from(wrapped).ok())
        .unwrap_or(0)
}

/// A square grid whose edges wrap around (a torus).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToroidalGrid {
    /// Side length, always at least 1.
    size: usize,
    /// Row-major cell states, exactly `size * size` long.
    cells: Vec<u8>,
}

impl ToroidalGrid {
    /// Create an all-dead grid.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidDimension`] if `size` is zero.
    pub fn new(size: usize) -> Result<Self, GridError> {
        let count = cell_count(size)?;
        Ok(Self {
            size,
            cells: vec![DEAD; count],
        })
    }

    /// Create a grid from an existing row-major buffer.
    ///
    /// Any non-zero cell value is stored as [`ALIVE`].
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidDimension`] if `size` is zero, or
    /// [`GridError::SizeMismatch`] if `cells.len() != size * size`.
    pub fn from_cells(size: usize, mut cells: Vec<u8>) -> Result<Self, GridError> {
        let expected = cell_count(size)?;
        if cells.len() != expected {
            return Err(GridError::SizeMismatch {
                expected,
                actual: cells.len(),
            });
        }
        for cell in &mut cells {
            *cell = u8::from(*cell != DEAD);
        }
        Ok(Self { size, cells })
    }

    /// Side length of the grid.
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Row-major cell states.
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Mutable row-major cell states. Writers must store only [`ALIVE`] or [`DEAD`].
    pub fn cells_mut(&mut self) -> &mut [u8] {
        &mut self.cells
    }

    /// Flat index of `(x, y)` after wrapping both coordinates.
    pub fn index_for(&self, x: isize, y: isize) -> usize {
        let col = wrap_coordinate(x, self.size);
        let row = wrap_coordinate(y, self.size);
        flat_index(col, row, self.size).unwrap_or(0)
    }

    /// Whether the cell at `(x, y)` is alive, wrapping around the edges.
    pub fn alive(&self, x: isize, y: isize) -> bool {
        self.alive_at(self.index_for(x, y))
    }

    /// Whether the cell at a flat index is alive. Out-of-buffer indices read as dead.
    pub fn alive_at(&self, index: usize) -> bool {
        self.cells.get(index).is_some_and(|&cell| cell != DEAD)
    }

    /// Flip the cell at the literal index `y * size + x`, without wrapping.
    ///
    /// Returns the new state of the flipped cell, or `None` if the literal
    /// index falls outside the buffer (nothing is changed in that case).
    pub fn toggle(&mut self, x: usize, y: usize) -> Option<bool> {
        let index = flat_index(x, y, self.size)?;
        let cell = self.cells.get_mut(index)?;
        *cell = if *cell == DEAD { ALIVE } else { DEAD };
        Some(*cell == ALIVE)
    }

    /// Set the cell at a flat index. Returns `false` if the index is outside the buffer.
    pub fn set_at(&mut self, index: usize, alive: bool) -> bool {
        self.cells.get_mut(index).is_some_and(|cell| {
            *cell = u8::from(alive);
            true
        })
    }

    /// Kill every cell.
    pub fn reset(&mut self) {
        self.cells.fill(DEAD);
    }

    /// Change the side length, keeping the overlapping top-left square.
    ///
    /// Cells outside the overlap start dead. The grid is only replaced once
    /// the new buffer is complete.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidDimension`] if `new_size` is zero. The
    /// grid is left untouched on error.
    pub fn resize(&mut self, new_size: usize) -> Result<(), GridError> {
        let count = cell_count(new_size)?;
        let mut resized = vec![DEAD; count];
        let overlap = self.size.min(new_size);

        for y in 0..overlap {
            let (Some(from), Some(to)) = (
                flat_index(0, y, self.size),
                flat_index(0, y, new_size),
            ) else {
                continue;
            };
            let source = self.cells.get(from..from.saturating_add(overlap));
            let target = resized.get_mut(to..to.saturating_add(overlap));
            if let (Some(source), Some(target)) = (source, target) {
                target.copy_from_slice(source);
            }
        }

        debug!(from = self.size, to = new_size, overlap, "Grid resized");
        self.size = new_size;
        self.cells = resized;
        Ok(())
    }

    /// Count live cells by scanning the whole buffer.
    pub fn population(&self) -> u64 {
        let live = self.cells.iter().filter(|&&cell| cell != DEAD).count();
        u64::try_from(live).unwrap_or(u64::MAX)
    }

    /// Iterate over the rows of the grid, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks(self.size.max(1))
    }
}

/// Renders the grid as rows of `O` (alive) and `.` (dead).
impl fmt::Display for ToroidalGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row_index, row) in self.rows().enumerate() {
            if row_index > 0 {
                writeln!(f)?;
            }
            for &cell in row {
                f.write_str(if cell == DEAD { "." } else { "O" })?;
            }
        }
        Ok(())
    }
}

/// `y * size + x` with overflow checking.
pub(crate) fn flat_index(x: usize, y: usize, size: usize) -> Option<usize> {
    y.checked_mul(size)?.checked_add(x)
}
