//! Static reference data: seeds, soils, defenses, nutrient mixes, and the
//! pest and raider hazard catalogs.
//!
//! Everything here is `const` and loaded once. Lookups are total: every
//! identifier enum variant has exactly one profile.

use cryptgrow_types::{DefenseId, HazardKind, NutrientMixId, SeedId, SoilId};

/// Display metadata and drain coefficients for a seed strain.
///
/// The strain coefficients are shown in the seed bank. Per-tick drain
/// comes from the soil and the base nutrient drain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeedProfile {
    /// Display name.
    pub name: &'static str,
    /// Short description for the seed bank.
    pub description: &'static str,
    /// Strain water drain coefficient.
    pub water_drain: f64,
    /// Strain nutrient drain coefficient.
    pub nutrient_drain: f64,
}

/// Display metadata and drain coefficients for a soil.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoilProfile {
    /// Display name.
    pub name: &'static str,
    /// Short description.
    pub description: &'static str,
    /// Water lost per tick at 1x speed.
    pub water_drain: f64,
    /// Soil nutrient drain coefficient, shown in the selection screen.
    pub nutrient_drain: f64,
}

/// Display metadata for a defense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefenseProfile {
    /// Display name.
    pub name: &'static str,
    /// Short description.
    pub description: &'static str,
}

/// Effects of a nutrient mix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NutrientMix {
    /// Display name.
    pub name: &'static str,
    /// Short description.
    pub description: &'static str,
    /// Multiplies the potency boost the first time the mix is fed in a stage.
    pub potency: f64,
    /// Advertised yield factor. Harvest scoring does not read it.
    pub yield_factor: f64,
    /// Nutrients added on every scheduled feed.
    pub nutrient_feed: f64,
}

/// One named pest or raider variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HazardVariant {
    /// Display name.
    pub name: &'static str,
    /// Cosmetic damage range shown to the player. Scoring ignores it.
    pub damage: (u32, u32),
    /// Warning logged when the hazard appears.
    pub message: &'static str,
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

const CRYPT_COOKIES: SeedProfile = SeedProfile {
    name: "Crypt Cookies",
    description: "Balanced, classic strain.",
    water_drain: 0.6,
    nutrient_drain: 0.5,
};

const SKELE_SKITTLEZ: SeedProfile = SeedProfile {
    name: "Skele Skittlez",
    description: "Potent, nutrient-hungry.",
    water_drain: 0.5,
    nutrient_drain: 0.7,
};

const BONE_BLOSSOM: SeedProfile = SeedProfile {
    name: "Bone Blossom",
    description: "Unpredictable, mid stats.",
    water_drain: 0.7,
    nutrient_drain: 0.6,
};

const BONE_DUST: SoilProfile = SoilProfile {
    name: "Bone Dust",
    description: "Rich in calcium",
    water_drain: 0.5,
    nutrient_drain: 0.6,
};

const MAGIC_MOSS: SoilProfile = SoilProfile {
    name: "Magic Moss",
    description: "Mystical properties",
    water_drain: 0.6,
    nutrient_drain: 0.4,
};

const BASIC_SOIL: SoilProfile = SoilProfile {
    name: "Eh.. Not sure",
    description: "Standard growing medium",
    water_drain: 0.5,
    nutrient_drain: 0.5,
};

/// Pest variants, picked uniformly outside the flowering stage.
pub const PEST_VARIANTS: [HazardVariant; 4] = [
    HazardVariant {
        name: "Space Slugs",
        damage: (4, 12),
        message: "Space slugs are oozing over your plants!",
    },
    HazardVariant {
        name: "Brain Leeches",
        damage: (5, 15),
        message: "Brain leeches are draining your plant's will to live!",
    },
    HazardVariant {
        name: "Crypt Mites",
        damage: (3, 10),
        message: "Crypt mites are gnawing at your roots!",
    },
    HazardVariant {
        name: "Phantom Gnats",
        damage: (2, 8),
        message: "Phantom gnats are haunting your soil!",
    },
];

/// Raider variants, picked uniformly during flowering.
pub const RAIDER_VARIANTS: [HazardVariant; 4] = [
    HazardVariant {
        name: "Crypt Bandits",
        damage: (10, 20),
        message: "Crypt bandits are sneaking into your garden!",
    },
    HazardVariant {
        name: "Mutant Chickens",
        damage: (8, 18),
        message: "Mutant chickens are pecking at your stash!",
    },
    HazardVariant {
        name: "Alien Harvesters",
        damage: (15, 25),
        message: "Alien harvesters are beaming up your buds!",
    },
    HazardVariant {
        name: "Corporate Thieves",
        damage: (20, 30),
        message: "Corporate security forces are attempting to seize your crop!",
    },
];

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

/// Profile for a seed strain.
pub const fn seed(id: SeedId) -> &'static SeedProfile {
    match id {
        SeedId::CryptCookies => &CRYPT_COOKIES,
        SeedId::SkeleSkittlez => &SKELE_SKITTLEZ,
        SeedId::BoneBlossom => &BONE_BLOSSOM,
    }
}

/// Profile for a soil.
pub const fn soil(id: SoilId) -> &'static SoilProfile {
    match id {
        SoilId::BoneDust => &BONE_DUST,
        SoilId::MagicMoss => &MAGIC_MOSS,
        SoilId::BasicSoil => &BASIC_SOIL,
    }
}

/// Profile for a defense.
pub const fn defense(id: DefenseId) -> &'static DefenseProfile {
    match id {
        DefenseId::Grower => &DefenseProfile {
            name: "Grower",
            description: "Defends against pests",
        },
        DefenseId::Hound => &DefenseProfile {
            name: "Hound",
            description: "Defends against raiders",
        },
        DefenseId::Vault => &DefenseProfile {
            name: "Vault",
            description: "Protects your seeds",
        },
    }
}

/// Effects of a nutrient mix.
pub const fn nutrient_mix(id: NutrientMixId) -> &'static NutrientMix {
    match id {
        NutrientMixId::Basic => &NutrientMix {
            name: "Basic Mix",
            description: "Standard, reliable feed.",
            potency: 1.0,
            yield_factor: 1.0,
            nutrient_feed: 10.0,
        },
        NutrientMixId::Growth => &NutrientMix {
            name: "Growth Boost",
            description: "Bigger yields, less potency.",
            potency: 0.9,
            yield_factor: 1.2,
            nutrient_feed: 25.0,
        },
        NutrientMixId::Potent => &NutrientMix {
            name: "Potency Plus",
            description: "More potent, less yield.",
            potency: 1.2,
            yield_factor: 0.9,
            nutrient_feed: 15.0,
        },
        NutrientMixId::Balanced => &NutrientMix {
            name: "Balanced Blend",
            description: "Slight boost to both.",
            potency: 1.1,
            yield_factor: 1.1,
            nutrient_feed: 18.0,
        },
        NutrientMixId::Cosmic => &NutrientMix {
            name: "Cosmic Compost",
            description: "Unpredictable, sometimes amazing.",
            potency: 1.4,
            yield_factor: 1.0,
            nutrient_feed: 20.0,
        },
        NutrientMixId::Doomdust => &NutrientMix {
            name: "Doom Dust",
            description: "Dangerous, huge yields if you survive.",
            potency: 0.6,
            yield_factor: 1.4,
            nutrient_feed: 28.0,
        },
    }
}

/// The variant table for a hazard kind.
pub const fn hazard_variants(kind: HazardKind) -> &'static [HazardVariant; 4] {
    match kind {
        HazardKind::Pest => &PEST_VARIANTS,
        HazardKind::Raider => &RAIDER_VARIANTS,
    }
}

/// Look up one variant. Out-of-range indices fall back to the first entry.
pub fn hazard_variant(kind: HazardKind, index: usize) -> &'static HazardVariant {
    let table = hazard_variants(kind);
    table.get(index).unwrap_or(&table[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn soils_carry_documented_water_drain() {
        assert!((soil(SoilId::BoneDust).water_drain - 0.5).abs() < f64::EPSILON);
        assert!((soil(SoilId::MagicMoss).water_drain - 0.6).abs() < f64::EPSILON);
        assert!((soil(SoilId::BasicSoil).water_drain - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn every_mix_feeds_a_positive_amount() {
        for id in NutrientMixId::ALL {
            let mix = nutrient_mix(*id);
            assert!(mix.nutrient_feed > 0.0, "{} feeds nothing", mix.name);
            assert!(mix.potency > 0.0);
        }
    }

    #[test]
    fn every_profile_has_a_name() {
        for id in SeedId::ALL {
            assert!(!seed(*id).name.is_empty());
        }
        for id in DefenseId::ALL {
            assert!(!defense(*id).description.is_empty());
        }
    }

    #[test]
    fn hazard_tables_have_four_distinct_variants() {
        for kind in [HazardKind::Pest, HazardKind::Raider] {
            let table = hazard_variants(kind);
            for (i, a) in table.iter().enumerate() {
                for b in table.iter().skip(i.saturating_add(1)) {
                    assert_ne!(a.name, b.name);
                }
            }
        }
    }

    #[test]
    fn out_of_range_variant_falls_back() {
        assert_eq!(hazard_variant(HazardKind::Pest, 99).name, "Space Slugs");
        assert_eq!(hazard_variant(HazardKind::Raider, 3).name, "Corporate Thieves");
    }
}
