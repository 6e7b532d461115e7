//! Precomputed neighbor topology.
//!
//! Building the table costs O(size²) once per grid dimension. In exchange,
//! each generation reads a cell's eight neighbors as plain indices with no
//! coordinate math. The table must be rebuilt whenever the side length
//! changes and reused otherwise.

use crate::error::GridError;
use crate::grid::{DEAD, cell_count, flat_index};

/// Number of neighbors of every cell on a torus.
pub const NEIGHBOR_COUNT: usize = 8;

/// Wrapped neighbor indices for every cell of one grid dimension.
///
/// Neighbors are stored in the order NW, N, NE, W, E, SW, S, SE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborTopology {
    /// The side length this table was built for.
    size: usize,
    /// `table[i]` holds the eight neighbor indices of cell `i`.
    table: Vec<[usize; NEIGHBOR_COUNT]>,
}

impl NeighborTopology {
    /// Build the table for a grid of side length `size`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidDimension`] if `size` is zero.
    pub fn build(size: usize) -> Result<Self, GridError> {
        let count = cell_count(size)?;
        let mut table = Vec::with_capacity(count);

        for y in 0..size {
            let north = step_back(y, size);
            let south = step_forward(y, size);
            for x in 0..size {
                let west = step_back(x, size);
                let east = step_forward(x, size);
                let at = |col: usize, row: usize| flat_index(col, row, size).unwrap_or(0);
                table.push([
                    at(west, north),
                    at(x, north),
                    at(east, north),
                    at(west, y),
                    at(east, y),
                    at(west, south),
                    at(x, south),
                    at(east, south),
                ]);
            }
        }

        Ok(Self { size, table })
    }

    /// The side length this table was built for.
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Number of cells covered.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the table is empty. Never true for a built table.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// The eight neighbor indices of the cell at `index`.
    pub fn neighbors(&self, index: usize) -> Option<&[usize; NEIGHBOR_COUNT]> {
        self.table.get(index)
    }

    /// Iterate over every cell's neighbor indices in cell order.
    pub fn iter(&self) -> impl Iterator<Item = &[usize; NEIGHBOR_COUNT]> {
        self.table.iter()
    }

    /// Count the live neighbors of the cell at `index` within `cells`.
    pub fn live_neighbors(&self, index: usize, cells: &[u8]) -> u8 {
        self.neighbors(index)
            .map_or(0, |neighbors| count_live(neighbors, cells))
    }
}

/// Sum of the live cells among `neighbors`.
pub fn count_live(neighbors: &[usize; NEIGHBOR_COUNT], cells: &[u8]) -> u8 {
    neighbors.iter().fold(0_u8, |sum, &n| {
        let live = cells.get(n).is_some_and(|&cell| cell != DEAD);
        sum.saturating_add(u8::from(live))
    })
}

/// One step toward the origin, wrapping `0` to `size - 1`.
const fn step_back(value: usize, size: usize) -> usize {
    if value == 0 {
        size.saturating_sub(1)
    } else {
        value.saturating_sub(1)
    }
}

/// One step away from the origin, wrapping `size - 1` to `0`.
const fn step_forward(value: usize, size: usize) -> usize {
    let next = value.saturating_add(1);
    if next >= size { 0 } else { next }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;
    use crate::grid::ToroidalGrid;

    #[test]
    fn table_covers_every_cell() {
        let topology = NeighborTopology::build(6).unwrap();
        assert_eq!(topology.len(), 36);
        assert_eq!(topology.size(), 6);
        assert!(topology.neighbors(36).is_none());
    }

    #[test]
    fn interior_cell_neighbors_in_order() {
        let topology = NeighborTopology::build(5).unwrap();
        // Cell (2, 2) is index 12.
        assert_eq!(
            topology.neighbors(12),
            Some(&[6, 7, 8, 11, 13, 16, 17, 18])
        );
    }

    #[test]
    fn corner_cell_wraps_both_axes() {
        let topology = NeighborTopology::build(4).unwrap();
        // Cell (0, 0): NW is (3, 3) = 15, N is (0, 3) = 12, NE is (1, 3) = 13,
        // W is (3, 0) = 3, E is (1, 0) = 1, SW is (3, 1) = 7, S is 4, SE is 5.
        assert_eq!(topology.neighbors(0), Some(&[15, 12, 13, 3, 1, 7, 4, 5]));
    }

    #[test]
    fn neighbors_match_wrapping_reads() {
        let size = 5;
        let topology = NeighborTopology::build(size).unwrap();
        let grid = ToroidalGrid::new(size).unwrap();
        let offsets = [(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (-1, 1), (0, 1), (1, 1)];
        for y in 0..5_isize {
            for x in 0..5_isize {
                let index = grid.index_for(x, y);
                let expected: Vec<usize> = offsets
                    .iter()
                    .map(|&(dx, dy)| grid.index_for(x + dx, y + dy))
                    .collect();
                assert_eq!(topology.neighbors(index).unwrap().to_vec(), expected);
            }
        }
    }

    #[test]
    fn single_cell_grid_is_its_own_neighbor() {
        let topology = NeighborTopology::build(1).unwrap();
        assert_eq!(topology.neighbors(0), Some(&[0; NEIGHBOR_COUNT]));
        assert_eq!(topology.live_neighbors(0, &[1]), 8);
    }

    #[test]
    fn live_neighbor_count() {
        let topology = NeighborTopology::build(3).unwrap();
        let cells = [1, 1, 0, 0, 1, 0, 0, 0, 1];
        // Every other cell is a neighbor of the centre on a 3x3 torus.
        assert_eq!(topology.live_neighbors(4, &cells), 3);
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(NeighborTopology::build(0).is_err());
    }
}
