//! Enumeration types for the Cryptgrow simulation.
//!
//! Catalog identifiers (seeds, soils, defenses, nutrient mixes) serialize
//! to the same kebab-case strings the browser front end uses, so a
//! selection posted from the UI deserializes straight into these types.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A catalog identifier string did not match any known entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} identifier: {value:?}")]
pub struct ParseIdError {
    /// Which catalog was being searched (e.g. "seed").
    pub kind: &'static str,
    /// The string that failed to parse.
    pub value: String,
}

/// The requested game speed was not 1, 2, or 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("game speed must be 1, 2, or 3 (got {0})")]
pub struct SpeedError(pub u8);

/// Generates `as_str`, `ALL`, [`core::str::FromStr`] and
/// [`core::fmt::Display`] for a catalog identifier enum.
///
/// The first string for each variant is canonical; any further strings are
/// accepted aliases when parsing.
macro_rules! catalog_id {
    ($name:ident, $kind:literal, { $($variant:ident => $canonical:literal $(| $alias:literal)*),+ $(,)? }) => {
        impl $name {
            /// Every variant, in catalog order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The canonical identifier string.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $canonical),+
                }
            }
        }

        impl core::str::FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($canonical $(| $alias)* => Ok(Self::$variant),)+
                    _ => Err(ParseIdError {
                        kind: $kind,
                        value: s.to_owned(),
                    }),
                }
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Catalog identifiers
// ---------------------------------------------------------------------------

/// A seed strain the player can plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export, export_to = "bindings/")]
pub enum SeedId {
    /// Balanced, classic strain.
    CryptCookies,
    /// Potent, nutrient-hungry.
    SkeleSkittlez,
    /// Unpredictable, mid stats.
    BoneBlossom,
}

catalog_id!(SeedId, "seed", {
    CryptCookies => "crypt-cookies",
    SkeleSkittlez => "skele-skittlez",
    BoneBlossom => "bone-blossom",
});

/// A growing medium. Soil sets the per-tick water drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export, export_to = "bindings/")]
pub enum SoilId {
    /// Rich in calcium.
    BoneDust,
    /// Mystical properties.
    MagicMoss,
    /// Standard growing medium.
    BasicSoil,
}

catalog_id!(SoilId, "soil", {
    BoneDust => "bone-dust",
    MagicMoss => "magic-moss",
    BasicSoil => "basic-soil",
});

/// A defense that can neutralize one category of hazard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export, export_to = "bindings/")]
pub enum DefenseId {
    /// Blocks pest hazards.
    Grower,
    /// Blocks raider hazards.
    Hound,
    /// Protects the seed bank; blocks no in-game hazard.
    Vault,
}

catalog_id!(DefenseId, "defense", {
    Grower => "grower",
    Hound => "hound",
    Vault => "vault",
});

impl DefenseId {
    /// Whether this defense neutralizes the given hazard kind.
    pub const fn blocks(self, kind: HazardKind) -> bool {
        matches!(
            (self, kind),
            (Self::Grower, HazardKind::Pest) | (Self::Hound, HazardKind::Raider)
        )
    }
}

/// A nutrient mix fed to the plant during one growth stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export, export_to = "bindings/")]
pub enum NutrientMixId {
    /// Standard, reliable feed.
    Basic,
    /// Bigger yields, less potency.
    Growth,
    /// More potent, less yield.
    Potent,
    /// Slight boost to both.
    Balanced,
    /// Unpredictable, sometimes amazing.
    Cosmic,
    /// Dangerous, huge yields if you survive.
    Doomdust,
}

// The feeding station UI labels some mixes differently; accept those too.
catalog_id!(NutrientMixId, "nutrient mix", {
    Basic => "basic" | "basic-mix",
    Growth => "growth" | "growth-boost",
    Potent => "potent" | "potency-plus",
    Balanced => "balanced" | "balanced-blend",
    Cosmic => "cosmic" | "cosmic-compost",
    Doomdust => "doomdust" | "doom-dust",
});

// ---------------------------------------------------------------------------
// Growth stages
// ---------------------------------------------------------------------------

/// One of the four ordered growth stages.
///
/// The first three carry a duration in ticks; `Harvest` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum GrowthStage {
    /// Seedling stage.
    Sprout,
    /// Leaf growth stage.
    Vegetative,
    /// Bud stage; the only stage in which raiders appear.
    Flowering,
    /// Terminal stage once growth completes.
    Harvest,
}

impl GrowthStage {
    /// Every stage in order.
    pub const ALL: [Self; 4] = [
        Self::Sprout,
        Self::Vegetative,
        Self::Flowering,
        Self::Harvest,
    ];

    /// The stages that have a duration and a feeding schedule.
    pub const GROWING: [Self; 3] = [Self::Sprout, Self::Vegetative, Self::Flowering];

    /// Zero-based position in the stage sequence.
    pub const fn index(self) -> usize {
        match self {
            Self::Sprout => 0,
            Self::Vegetative => 1,
            Self::Flowering => 2,
            Self::Harvest => 3,
        }
    }

    /// The stage that follows this one. `Harvest` is its own successor.
    pub const fn next(self) -> Self {
        match self {
            Self::Sprout => Self::Vegetative,
            Self::Vegetative => Self::Flowering,
            Self::Flowering | Self::Harvest => Self::Harvest,
        }
    }

    /// Display label shown in the stage header and the event log.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sprout => "Sprout",
            Self::Vegetative => "Vegetative",
            Self::Flowering => "Flowering",
            Self::Harvest => "Harvest",
        }
    }

    /// Whether this is the final stage before harvest.
    pub const fn is_last_growing(self) -> bool {
        matches!(self, Self::Flowering)
    }
}

impl core::fmt::Display for GrowthStage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Game speed
// ---------------------------------------------------------------------------

/// Simulation speed multiplier.
///
/// Scales both the per-tick drain and the real-time tick rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum GameSpeed {
    /// 1x.
    #[default]
    Normal,
    /// 2x.
    Double,
    /// 3x.
    Triple,
}

impl GameSpeed {
    /// The integer multiplier (1, 2, or 3).
    pub const fn multiplier(self) -> u8 {
        match self {
            Self::Normal => 1,
            Self::Double => 2,
            Self::Triple => 3,
        }
    }

    /// The multiplier as a float, for drain arithmetic.
    pub fn factor(self) -> f64 {
        f64::from(self.multiplier())
    }

    /// The next speed in the 1 → 2 → 3 → 1 cycle.
    pub const fn cycled(self) -> Self {
        match self {
            Self::Normal => Self::Double,
            Self::Double => Self::Triple,
            Self::Triple => Self::Normal,
        }
    }
}

impl TryFrom<u8> for GameSpeed {
    type Error = SpeedError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Normal),
            2 => Ok(Self::Double),
            3 => Ok(Self::Triple),
            other => Err(SpeedError(other)),
        }
    }
}

impl From<GameSpeed> for u8 {
    fn from(speed: GameSpeed) -> Self {
        speed.multiplier()
    }
}

// ---------------------------------------------------------------------------
// Hazards, log severity, plant mood
// ---------------------------------------------------------------------------

/// The category of a random hazard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum HazardKind {
    /// Pests reduce potency. Blocked by the Grower.
    Pest,
    /// Raiders reduce yield. Blocked by the Hound. Flowering only.
    Raider,
}

/// Severity tag attached to each event log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum LogSeverity {
    /// Routine progress.
    Info,
    /// Something needs attention.
    Warning,
    /// Something went wrong for the plant.
    Error,
}

/// How the plant should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum PlantMood {
    /// Sprout stage.
    Seedling,
    /// Vegetative or flowering with stress at or below 50.
    Thriving,
    /// Vegetative or flowering with stress above 50.
    Wilting,
    /// Growth complete.
    Harvested,
    /// Health reached zero.
    Dead,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_parse_canonical_and_aliases() {
        assert_eq!("crypt-cookies".parse::<SeedId>().unwrap(), SeedId::CryptCookies);
        assert_eq!("Bone-Dust".parse::<SoilId>().unwrap(), SoilId::BoneDust);
        assert_eq!("hound".parse::<DefenseId>().unwrap(), DefenseId::Hound);
        assert_eq!(
            "doom-dust".parse::<NutrientMixId>().unwrap(),
            NutrientMixId::Doomdust
        );
        assert_eq!(
            "basic-mix".parse::<NutrientMixId>().unwrap(),
            NutrientMixId::Basic
        );
    }

    #[test]
    fn unknown_id_reports_kind() {
        let err = "kale".parse::<SeedId>().unwrap_err();
        assert_eq!(err.kind, "seed");
        assert_eq!(err.value, "kale");
    }

    #[test]
    fn serde_matches_canonical_strings() {
        for seed in SeedId::ALL {
            let json = serde_json::to_string(seed).unwrap();
            assert_eq!(json, format!("\"{}\"", seed.as_str()));
        }
        for mix in NutrientMixId::ALL {
            let json = serde_json::to_string(mix).unwrap();
            assert_eq!(json, format!("\"{}\"", mix.as_str()));
        }
    }

    #[test]
    fn defenses_block_matching_hazards_only() {
        assert!(DefenseId::Grower.blocks(HazardKind::Pest));
        assert!(!DefenseId::Grower.blocks(HazardKind::Raider));
        assert!(DefenseId::Hound.blocks(HazardKind::Raider));
        assert!(!DefenseId::Hound.blocks(HazardKind::Pest));
        assert!(!DefenseId::Vault.blocks(HazardKind::Pest));
        assert!(!DefenseId::Vault.blocks(HazardKind::Raider));
    }

    #[test]
    fn stages_advance_in_order_and_stop_at_harvest() {
        assert_eq!(GrowthStage::Sprout.next(), GrowthStage::Vegetative);
        assert_eq!(GrowthStage::Flowering.next(), GrowthStage::Harvest);
        assert_eq!(GrowthStage::Harvest.next(), GrowthStage::Harvest);
        for (i, stage) in GrowthStage::ALL.iter().enumerate() {
            assert_eq!(stage.index(), i);
        }
    }

    #[test]
    fn speed_cycles_and_validates() {
        assert_eq!(GameSpeed::Normal.cycled(), GameSpeed::Double);
        assert_eq!(GameSpeed::Triple.cycled(), GameSpeed::Normal);
        assert_eq!(GameSpeed::try_from(2).unwrap(), GameSpeed::Double);
        assert_eq!(GameSpeed::try_from(4), Err(SpeedError(4)));
        assert_eq!(GameSpeed::try_from(0), Err(SpeedError(0)));
    }
}
