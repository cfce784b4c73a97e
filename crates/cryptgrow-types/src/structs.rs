//! Core data structs: player selections, harvest results, the event log
//! entry, and the render snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{
    DefenseId, GameSpeed, GrowthStage, HazardKind, LogSeverity, NutrientMixId, PlantMood, SeedId,
    SoilId,
};
use crate::ids::SessionId;

/// A selection slot that must be filled before a game can start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    /// No seed chosen.
    #[error("no seed selected")]
    MissingSeed,
    /// No soil chosen.
    #[error("no soil selected")]
    MissingSoil,
    /// No defense chosen.
    #[error("no defense selected")]
    MissingDefense,
    /// No nutrient mix chosen for the given stage.
    #[error("no nutrient mix selected for the {0} stage")]
    MissingFeeding(GrowthStage),
}

// ---------------------------------------------------------------------------
// Selections
// ---------------------------------------------------------------------------

/// In-progress choices from the selection and feeding screens.
///
/// Every field may still be empty. Call [`SelectionDraft::complete`] to
/// obtain validated [`Selections`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SelectionDraft {
    /// Chosen seed strain.
    pub seed: Option<SeedId>,
    /// Chosen soil.
    pub soil: Option<SoilId>,
    /// Chosen defense.
    pub defense: Option<DefenseId>,
    /// Chosen nutrient mix for each growing stage.
    pub feeding_schedule: FeedingDraft,
}

/// Per-stage nutrient mix choices, possibly incomplete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FeedingDraft {
    /// Mix for the sprout stage.
    pub sprout: Option<NutrientMixId>,
    /// Mix for the vegetative stage.
    pub vegetative: Option<NutrientMixId>,
    /// Mix for the flowering stage.
    pub flowering: Option<NutrientMixId>,
}

impl SelectionDraft {
    /// Validate that every slot is filled.
    ///
    /// Slots are checked in screen order, so the error names the first
    /// thing the player still has to pick.
    pub const fn complete(&self) -> Result<Selections, SelectionError> {
        let Some(seed) = self.seed else {
            return Err(SelectionError::MissingSeed);
        };
        let Some(soil) = self.soil else {
            return Err(SelectionError::MissingSoil);
        };
        let Some(defense) = self.defense else {
            return Err(SelectionError::MissingDefense);
        };
        let Some(sprout) = self.feeding_schedule.sprout else {
            return Err(SelectionError::MissingFeeding(GrowthStage::Sprout));
        };
        let Some(vegetative) = self.feeding_schedule.vegetative else {
            return Err(SelectionError::MissingFeeding(GrowthStage::Vegetative));
        };
        let Some(flowering) = self.feeding_schedule.flowering else {
            return Err(SelectionError::MissingFeeding(GrowthStage::Flowering));
        };
        Ok(Selections {
            seed,
            soil,
            defense,
            feeding: FeedingPlan {
                sprout,
                vegetative,
                flowering,
            },
        })
    }
}

/// Validated selections. The engine can only be built from these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Selections {
    /// Seed strain.
    pub seed: SeedId,
    /// Soil.
    pub soil: SoilId,
    /// Defense.
    pub defense: DefenseId,
    /// Nutrient mix per growing stage.
    pub feeding: FeedingPlan,
}

/// One nutrient mix per growing stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FeedingPlan {
    /// Mix for the sprout stage.
    pub sprout: NutrientMixId,
    /// Mix for the vegetative stage.
    pub vegetative: NutrientMixId,
    /// Mix for the flowering stage.
    pub flowering: NutrientMixId,
}

impl FeedingPlan {
    /// The same mix for every stage.
    pub const fn uniform(mix: NutrientMixId) -> Self {
        Self {
            sprout: mix,
            vegetative: mix,
            flowering: mix,
        }
    }

    /// The mix for a stage. `None` for `Harvest`, which is never fed.
    pub const fn mix_for(&self, stage: GrowthStage) -> Option<NutrientMixId> {
        match stage {
            GrowthStage::Sprout => Some(self.sprout),
            GrowthStage::Vegetative => Some(self.vegetative),
            GrowthStage::Flowering => Some(self.flowering),
            GrowthStage::Harvest => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Results and log
// ---------------------------------------------------------------------------

/// Final harvest score reported through the completion callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct HarvestResult {
    /// Potency percentage, 0 to 70.
    pub potency: u32,
    /// Yield in grams, 1 to 200.
    #[serde(rename = "yield")]
    pub yield_grams: u32,
}

/// One entry in the in-game event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LogEntry {
    /// Player-facing text.
    pub message: String,
    /// Severity tag used for coloring.
    pub severity: LogSeverity,
    /// When the entry was recorded.
    pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Resource bar values, each in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ResourceLevels {
    /// Plant health. Zero is death.
    pub health: f64,
    /// Water level.
    pub water: f64,
    /// Light level.
    pub light: f64,
    /// Nutrient level.
    pub nutrients: f64,
    /// Stress level.
    pub stress: f64,
}

/// Multiplicative modifiers accumulated over a run and applied at harvest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Modifiers {
    /// Product of the nutrient mix potency factors applied so far.
    pub potency_boost: f64,
    /// Shrunk by unblocked pest hazards; scales potency.
    pub pest_penalty: f64,
    /// Shrunk by unblocked raider hazards; scales yield.
    pub raider_penalty: f64,
}

impl Default for Modifiers {
    fn default() -> Self {
        Self {
            potency_boost: 1.0,
            pest_penalty: 1.0,
            raider_penalty: 1.0,
        }
    }
}

/// The hazard currently awaiting resolution, as shown to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct HazardView {
    /// Pest or raider.
    pub kind: HazardKind,
    /// Variant name, e.g. "Crypt Mites".
    pub name: String,
    /// Cosmetic damage range shown next to the name.
    pub damage: (u32, u32),
    /// Whether the equipped defense will neutralize it.
    pub blocked: bool,
}

/// Read-only view of a growth session for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameSnapshot {
    /// Session this snapshot belongs to.
    pub session_id: SessionId,
    /// Seed strain.
    pub seed: SeedId,
    /// Soil.
    pub soil: SoilId,
    /// Defense.
    pub defense: DefenseId,
    /// Resource bars.
    pub resources: ResourceLevels,
    /// Current growth stage.
    pub stage: GrowthStage,
    /// Ticks elapsed in the current stage.
    pub stage_time: u32,
    /// Overall growth progress, 0 to 100.
    pub progress_pct: u32,
    /// How the plant should be drawn.
    pub mood: PlantMood,
    /// Whether the tick loop is running.
    pub is_growing: bool,
    /// Whether ticks are being skipped.
    pub is_paused: bool,
    /// Current speed.
    pub speed: GameSpeed,
    /// Whether the grow lights work.
    pub lights_on: bool,
    /// The outstanding hazard, if any.
    pub hazard: Option<HazardView>,
    /// Accumulated modifiers.
    pub modifiers: Modifiers,
    /// Final score once harvested.
    pub result: Option<HarvestResult>,
    /// Most recent log entries, newest first.
    pub event_log: Vec<LogEntry>,
}
