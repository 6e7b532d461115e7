//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure mode of startup and the run so that
//! `main` can propagate with `?`.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: petri_core::config::ConfigError,
    },

    /// Grid construction or a pattern placement failed.
    #[error("grid error: {source}")]
    Grid {
        /// The underlying grid error.
        #[from]
        source: petri_grid::GridError,
    },

    /// The pattern library failed.
    #[error("library error: {source}")]
    Library {
        /// The underlying library error.
        #[from]
        source: petri_patterns::LibraryError,
    },

    /// The configured seed pattern is neither in the library nor on the seed shelf.
    #[error("unknown seed pattern: {name}")]
    UnknownPattern {
        /// The name that was looked up.
        name: String,
    },
}
