//! Error types for the `petri-grid` crate.
//!
//! All fallible grid operations return [`GridError`]. Both variants are
//! caller contract violations; none of them is transient.

/// Errors that can occur when building or reshaping a grid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// The requested side length is zero, or its square does not fit in memory.
    #[error("invalid grid dimension: {size}")]
    InvalidDimension {
        /// The rejected side length.
        size: usize,
    },

    /// A supplied cell buffer does not hold exactly `size * size` cells.
    #[error("cell buffer holds {actual} cells, expected {expected}")]
    SizeMismatch {
        /// The required length, `size * size`.
        expected: usize,
        /// The length that was supplied.
        actual: usize,
    },
}
