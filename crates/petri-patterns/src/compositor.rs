//! Stamping patterns onto grids and lifting them back off.
//!
//! Unlike neighbor lookups, compositing never wraps. A pattern blitted near
//! the bottom-right edge is truncated at the edge, and an offset already
//! past the edge writes nothing. Neither case is an error.

use petri_grid::{GridError, ToroidalGrid};
use petri_types::Region;
use tracing::debug;

use crate::pattern::Pattern;

/// Copy `pattern` into `grid` with its top-left cell at `(x, y)`.
///
/// Dead pattern cells overwrite live grid cells, so the whole clipped square
/// is replaced. The copied extent is `min(grid.size - x, pattern.side)`
/// wide and `min(grid.size - y, pattern.side)` tall.
///
/// Returns the number of grid cells written.
///
/// # Errors
///
/// Returns a [`GridError`] if the pattern rows cannot form a grid.
pub fn blit(
    grid: &mut ToroidalGrid,
    x: usize,
    y: usize,
    pattern: &Pattern,
) -> Result<usize, GridError> {
    let source = pattern.to_grid()?;
    let size = grid.size();
    if x >= size || y >= size {
        debug!(x, y, size, "Blit offset outside grid, nothing written");
        return Ok(0);
    }

    let width = size.saturating_sub(x).min(source.size());
    let height = size.saturating_sub(y).min(source.size());
    let mut written: usize = 0;

    for (dy, source_row) in source.rows().take(height).enumerate() {
        let Some(start) = y
            .saturating_add(dy)
            .checked_mul(size)
            .and_then(|row| row.checked_add(x))
        else {
            continue;
        };
        let target = grid
            .cells_mut()
            .get_mut(start..start.saturating_add(width));
        if let (Some(target), Some(source_cells)) = (target, source_row.get(..width)) {
            target.copy_from_slice(source_cells);
            written = written.saturating_add(width);
        }
    }

    debug!(x, y, width, height, written, "Pattern blitted");
    Ok(written)
}

/// Lift a square region of `grid` out as a new anonymous pattern.
///
/// The region is clipped to the grid first, so nothing wraps around.
pub fn extract(grid: &ToroidalGrid, region: Region) -> Pattern {
    let clipped = region.clip_to(grid.size());
    Pattern::from_region(grid, clipped)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    fn solid(side: usize) -> Pattern {
        let row = "O".repeat(side);
        let text = vec![row; side].join("\n");
        Pattern::from_text(&text)
    }

    #[test]
    fn blit_copies_whole_pattern() {
        let mut grid = ToroidalGrid::new(6).unwrap();
        let glider = Pattern::from_text(".O.\n..O\nOOO");
        let written = blit(&mut grid, 1, 2, &glider).unwrap();
        assert_eq!(written, 9);
        assert_eq!(grid.population(), 5);
        assert!(grid.alive(2, 2));
        assert!(grid.alive(3, 3));
        assert!(grid.alive(1, 4));
    }

    #[test]
    fn blit_clips_at_far_edges() {
        let size = 8;
        let mut grid = ToroidalGrid::new(size).unwrap();
        let written = blit(&mut grid, size - 2, size - 2, &solid(4)).unwrap();
        assert_eq!(written, 4);
        assert_eq!(grid.population(), 4);
        for (x, y) in [(6, 6), (7, 6), (6, 7), (7, 7)] {
            assert!(grid.alive(x, y));
        }
        // Nothing wrapped onto the opposite edges.
        assert!(!grid.alive(0, 0));
        assert!(!grid.alive(0, 6));
        assert!(!grid.alive(6, 0));
    }

    #[test]
    fn blit_past_edge_is_a_no_op() {
        let mut grid = ToroidalGrid::new(4).unwrap();
        assert_eq!(blit(&mut grid, 4, 0, &solid(2)).unwrap(), 0);
        assert_eq!(blit(&mut grid, 0, 9, &solid(2)).unwrap(), 0);
        assert_eq!(grid.population(), 0);
    }

    #[test]
    fn blit_overwrites_live_cells_with_dead() {
        let mut grid = ToroidalGrid::from_cells(3, vec![1; 9]).unwrap();
        let empty = Pattern::from_text("..\n..");
        blit(&mut grid, 0, 0, &empty).unwrap();
        assert_eq!(grid.population(), 5);
        assert!(!grid.alive(1, 1));
        assert!(grid.alive(2, 2));
    }

    #[test]
    fn extract_inverts_blit() {
        let mut grid = ToroidalGrid::new(10).unwrap();
        let pattern = Pattern::from_text("O.O\n.O.\nO..");
        blit(&mut grid, 4, 5, &pattern).unwrap();
        let lifted = extract(&grid, Region::new(4, 5, 3));
        assert_eq!(lifted.rows(), pattern.rows());
    }

    #[test]
    fn extract_clips_region() {
        let mut grid = ToroidalGrid::new(4).unwrap();
        let _ = grid.toggle(3, 2);
        let lifted = extract(&grid, Region::new(2, 2, 5));
        assert_eq!(lifted.side(), 2);
        assert_eq!(lifted.rows(), &[".O", ".."]);
    }
}
