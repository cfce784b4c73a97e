//! Shared type definitions for the Cryptgrow simulation.
//!
//! This crate is the single source of truth for the types exchanged between
//! the growth engine and the browser front end. Types flow downstream to
//! `TypeScript` via `ts-rs`.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers (session identifiers)
//! - [`enums`] -- Catalog identifiers, growth stages, speed, hazards, log severity
//! - [`structs`] -- Selections, harvest results, log entries, and the render snapshot

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{
    DefenseId, GameSpeed, GrowthStage, HazardKind, LogSeverity, NutrientMixId, ParseIdError,
    PlantMood, SeedId, SoilId, SpeedError,
};
pub use ids::SessionId;
pub use structs::{
    FeedingDraft, FeedingPlan, GameSnapshot, HarvestResult, HazardView, LogEntry, Modifiers,
    ResourceLevels, SelectionDraft, SelectionError, Selections,
};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // Importing the types here triggers ts-rs generation. Files are
        // written to `bindings/` relative to the crate root.
        use ts_rs::TS;

        let _ = crate::ids::SessionId::export_all();

        let _ = crate::enums::SeedId::export_all();
        let _ = crate::enums::SoilId::export_all();
        let _ = crate::enums::DefenseId::export_all();
        let _ = crate::enums::NutrientMixId::export_all();
        let _ = crate::enums::GrowthStage::export_all();
        let _ = crate::enums::GameSpeed::export_all();
        let _ = crate::enums::HazardKind::export_all();
        let _ = crate::enums::LogSeverity::export_all();
        let _ = crate::enums::PlantMood::export_all();

        let _ = crate::structs::SelectionDraft::export_all();
        let _ = crate::structs::FeedingDraft::export_all();
        let _ = crate::structs::Selections::export_all();
        let _ = crate::structs::FeedingPlan::export_all();
        let _ = crate::structs::HarvestResult::export_all();
        let _ = crate::structs::LogEntry::export_all();
        let _ = crate::structs::ResourceLevels::export_all();
        let _ = crate::structs::Modifiers::export_all();
        let _ = crate::structs::HazardView::export_all();
        let _ = crate::structs::GameSnapshot::export_all();
    }
}
