//! Shared value types for the Petri Life engine.
//!
//! These are the values that cross the engine boundary: the renderer reads
//! snapshots, the selection layer hands over regions, and the pattern store
//! exchanges documents. Types flow to `TypeScript` via `ts-rs` for the UI.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrapper for pattern identity
//! - [`structs`] -- Regions, pattern documents, tag counts, engine snapshots

pub mod ids;
pub mod structs;

pub use ids::PatternId;
pub use structs::{EngineSnapshot, PatternDocument, Region, TagCount};

#[cfg(test)]
mod tests {
    #[test]
    fn export_bindings() {
        use ts_rs::TS;

        let _ = crate::ids::PatternId::export_all();
        let _ = crate::structs::Region::export_all();
        let _ = crate::structs::PatternDocument::export_all();
        let _ = crate::structs::TagCount::export_all();
        let _ = crate::structs::EngineSnapshot::export_all();
    }
}
