//! Patterns, compositing and the pattern library for the Petri Life engine.
//!
//! # Modules
//!
//! - [`compositor`] -- [`blit`] a pattern onto a grid (clipped, never
//!   wrapped) and [`extract`] a region back out.
//! - [`error`] -- Pattern and library error types.
//! - [`library`] -- [`PatternStore`] trait, the in-memory [`MemoryStore`],
//!   and [`PatternLibrary`] with its tag index and cursor paging.
//! - [`pattern`] -- [`Pattern`], a named square block with normalization
//!   and rotation.
//! - [`seed`] -- The built-in seed shelf.
//! - [`tags`] -- Comma-separated tag parsing.

pub mod compositor;
pub mod error;
pub mod library;
pub mod pattern;
pub mod seed;
pub mod tags;

pub use compositor::{blit, extract};
pub use error::{LibraryError, PatternError};
pub use library::{Cursor, MemoryStore, PatternLibrary, PatternPage, PatternStore};
pub use pattern::{Pattern, PatternInfo, normalize};
pub use seed::{seed_pattern, seed_patterns};
pub use tags::parse_tags;
