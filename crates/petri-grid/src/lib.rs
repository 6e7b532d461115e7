//! Toroidal cell grid and neighbor topology for the Petri Life engine.
//!
//! # Modules
//!
//! - [`error`] -- Error types for grid construction and reshaping.
//! - [`grid`] -- [`ToroidalGrid`], a flat edge-wrapping buffer of cell states
//!   with point toggle, bulk reset and overlap-preserving resize.
//! - [`topology`] -- [`NeighborTopology`], the eight wrapped neighbor indices
//!   of every cell, built once per dimension.

pub mod error;
pub mod grid;
pub mod topology;

pub use error::GridError;
pub use grid::{ALIVE, DEAD, ToroidalGrid};
pub use topology::{NEIGHBOR_COUNT, NeighborTopology, count_live};
