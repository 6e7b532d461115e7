//! Error types for the `petri-patterns` crate.

use petri_grid::GridError;
use petri_types::PatternId;

/// Errors raised by a single pattern.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    /// Identity was requested before the pattern store assigned one.
    #[error("no identifier yet assigned")]
    NoIdentifierAssigned,

    /// Identity is assigned at most once.
    #[error("pattern already has identifier {existing}")]
    IdentityAlreadyAssigned {
        /// The identifier the pattern already carries.
        existing: PatternId,
    },

    /// Converting the pattern rows into a grid failed.
    #[error("grid error: {source}")]
    Grid {
        /// The underlying grid error.
        #[from]
        source: GridError,
    },
}

/// Errors raised by the pattern library and its stores.
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    /// A document with this identifier is already stored.
    #[error("duplicate pattern id: {0}")]
    DuplicatePattern(PatternId),

    /// The backing store failed.
    #[error("pattern store error: {message}")]
    Store {
        /// Description of the store failure.
        message: String,
    },

    /// A pattern-level contract was violated.
    #[error("pattern error: {source}")]
    Pattern {
        /// The underlying pattern error.
        #[from]
        source: PatternError,
    },
}
