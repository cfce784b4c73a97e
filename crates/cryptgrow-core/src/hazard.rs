//! Pest and raider hazards: rolling a new hazard during a tick and the
//! deferred resolution that either clears it or applies a penalty.
//!
//! At most one hazard is pending at a time. Raiders only appear during
//! flowering; pests only outside it.

use cryptgrow_types::{GrowthStage, HazardKind, LogSeverity};
use rand::Rng;

use crate::catalog;
use crate::config::GrowthRules;
use crate::dice;
use crate::state::{GameState, Hazard, PendingHazard};

/// A hazard that started this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HazardStart {
    /// Pest or raider.
    pub kind: HazardKind,
    /// Whether the equipped defense neutralizes it.
    pub blocked: bool,
    /// Session clock time (ms) at which it resolves.
    pub resolves_at_ms: u64,
}

/// How a pending hazard ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HazardResolution {
    /// The defense turned it away.
    Blocked(HazardKind),
    /// The matching penalty shrank by this percentage.
    Damaged {
        /// Pest or raider.
        kind: HazardKind,
        /// Percentage removed from the penalty modifier.
        pct: u32,
    },
}

/// Roll for a new hazard. Does nothing while one is already pending.
pub fn roll_hazard<R: Rng + ?Sized>(
    state: &mut GameState,
    rules: &GrowthRules,
    now_ms: u64,
    rng: &mut R,
) -> Option<HazardStart> {
    if !state.hazard.is_clear() || !dice::chance(rng, rules.hazard_chance) {
        return None;
    }
    let kind = match state.stage {
        GrowthStage::Flowering => {
            if !dice::chance(rng, rules.raider_chance) {
                return None;
            }
            HazardKind::Raider
        }
        GrowthStage::Sprout | GrowthStage::Vegetative => HazardKind::Pest,
        GrowthStage::Harvest => return None,
    };

    let variant = dice::index(rng, catalog::hazard_variants(kind).len());
    let blocked = state.selections.defense.blocks(kind);
    let resolves_at_ms = now_ms.saturating_add(rules.hazard_delay_ms(blocked));
    state.hazard = Hazard::pending(
        kind,
        PendingHazard {
            variant,
            blocked,
            resolves_at_ms,
        },
    );

    let info = catalog::hazard_variant(kind, variant);
    state.log(info.message, LogSeverity::Warning);
    tracing::info!(?kind, name = info.name, blocked, resolves_at_ms, "hazard appeared");
    Some(HazardStart {
        kind,
        blocked,
        resolves_at_ms,
    })
}

/// Resolve the pending hazard against the current state and clear it.
///
/// Returns `None` when nothing was pending.
pub fn resolve_hazard<R: Rng + ?Sized>(
    state: &mut GameState,
    rules: &GrowthRules,
    rng: &mut R,
) -> Option<HazardResolution> {
    let (kind, pending) = state.hazard.active()?;
    state.hazard = Hazard::Clear;

    if pending.blocked {
        let message = match kind {
            HazardKind::Raider => "Your Hound chased off the raiders!",
            HazardKind::Pest => "Your Grower defended against the pests!",
        };
        state.log(message, LogSeverity::Info);
        tracing::info!(?kind, "hazard blocked");
        return Some(HazardResolution::Blocked(kind));
    }

    let pct = dice::uniform_u32(rng, rules.penalty_pct_range).min(100);
    let factor = 1.0 - f64::from(pct) / 100.0;
    let message = match kind {
        HazardKind::Raider => {
            state.modifiers.raider_penalty *= factor;
            format!("Raiders reduced yield by {pct}%")
        }
        HazardKind::Pest => {
            state.modifiers.pest_penalty *= factor;
            format!("Pests reduced potency by {pct}%")
        }
    };
    state.log(message, LogSeverity::Error);
    tracing::warn!(?kind, pct, "hazard damaged the crop");
    Some(HazardResolution::Damaged { kind, pct })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cryptgrow_types::DefenseId;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::state::tests::basic_selections;
    use crate::testing::NeverRng;

    fn always_hazard() -> GrowthRules {
        GrowthRules {
            hazard_chance: 1.0,
            ..GrowthRules::default()
        }
    }

    fn state_with(defense: DefenseId, stage: GrowthStage) -> GameState {
        let mut selections = basic_selections();
        selections.defense = defense;
        let mut state = GameState::new(&selections, &GrowthRules::default());
        state.stage = stage;
        state
    }

    #[test]
    fn never_rolls_while_one_is_pending() {
        let rules = always_hazard();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut state = state_with(DefenseId::Vault, GrowthStage::Sprout);
        assert!(roll_hazard(&mut state, &rules, 0, &mut rng).is_some());
        let pending = state.hazard;
        assert!(roll_hazard(&mut state, &rules, 1_000, &mut rng).is_none());
        assert_eq!(state.hazard, pending);
    }

    #[test]
    fn pests_outside_flowering_raiders_inside() {
        let rules = always_hazard();
        let mut rng = SmallRng::seed_from_u64(9);
        for _ in 0..50 {
            for stage in [GrowthStage::Sprout, GrowthStage::Vegetative] {
                let mut state = state_with(DefenseId::Vault, stage);
                let start = roll_hazard(&mut state, &rules, 0, &mut rng).unwrap();
                assert_eq!(start.kind, HazardKind::Pest);
            }
            let mut state = state_with(DefenseId::Vault, GrowthStage::Flowering);
            if let Some(start) = roll_hazard(&mut state, &rules, 0, &mut rng) {
                assert_eq!(start.kind, HazardKind::Raider);
            }
        }
    }

    #[test]
    fn flowering_sub_roll_can_yield_nothing() {
        let rules = GrowthRules {
            hazard_chance: 1.0,
            raider_chance: 0.0,
            ..GrowthRules::default()
        };
        let mut state = state_with(DefenseId::Vault, GrowthStage::Flowering);
        let mut rng = SmallRng::seed_from_u64(4);
        assert!(roll_hazard(&mut state, &rules, 0, &mut rng).is_none());
        assert!(state.hazard.is_clear());
    }

    #[test]
    fn blocked_hazards_resolve_sooner() {
        let rules = always_hazard();
        let mut rng = SmallRng::seed_from_u64(5);
        let mut state = state_with(DefenseId::Grower, GrowthStage::Sprout);
        let start = roll_hazard(&mut state, &rules, 10_000, &mut rng).unwrap();
        assert!(start.blocked);
        assert_eq!(start.resolves_at_ms, 13_000);

        let mut state = state_with(DefenseId::Hound, GrowthStage::Sprout);
        let start = roll_hazard(&mut state, &rules, 10_000, &mut rng).unwrap();
        assert!(!start.blocked);
        assert_eq!(start.resolves_at_ms, 15_000);
    }

    #[test]
    fn grower_never_loses_potency_to_pests() {
        let rules = always_hazard();
        let mut rng = SmallRng::seed_from_u64(11);
        let mut state = state_with(DefenseId::Grower, GrowthStage::Vegetative);
        for _ in 0..100 {
            roll_hazard(&mut state, &rules, 0, &mut rng).unwrap();
            let outcome = resolve_hazard(&mut state, &rules, &mut rng).unwrap();
            assert_eq!(outcome, HazardResolution::Blocked(HazardKind::Pest));
        }
        assert!((state.modifiers.pest_penalty - 1.0).abs() < f64::EPSILON);
        assert!(state.event_log.contains("Your Grower defended against the pests!"));
    }

    #[test]
    fn hound_never_loses_yield_to_raiders() {
        let rules = GrowthRules {
            hazard_chance: 1.0,
            raider_chance: 1.0,
            ..GrowthRules::default()
        };
        let mut rng = SmallRng::seed_from_u64(12);
        let mut state = state_with(DefenseId::Hound, GrowthStage::Flowering);
        for _ in 0..100 {
            roll_hazard(&mut state, &rules, 0, &mut rng).unwrap();
            resolve_hazard(&mut state, &rules, &mut rng).unwrap();
        }
        assert!((state.modifiers.raider_penalty - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unblocked_pests_shrink_pest_penalty() {
        let rules = always_hazard();
        let mut rng = SmallRng::seed_from_u64(13);
        let mut state = state_with(DefenseId::Hound, GrowthStage::Sprout);
        roll_hazard(&mut state, &rules, 0, &mut rng).unwrap();
        let Some(HazardResolution::Damaged { kind, pct }) =
            resolve_hazard(&mut state, &rules, &mut rng)
        else {
            panic!("expected damage");
        };
        assert_eq!(kind, HazardKind::Pest);
        assert!((5..15).contains(&pct));
        let expected = 1.0 - f64::from(pct) / 100.0;
        assert!((state.modifiers.pest_penalty - expected).abs() < 1e-12);
        assert!((state.modifiers.raider_penalty - 1.0).abs() < f64::EPSILON);
        assert!(state.hazard.is_clear());
        assert!(state.event_log.contains(&format!("Pests reduced potency by {pct}%")));
    }

    #[test]
    fn resolving_with_nothing_pending_is_a_no_op() {
        let rules = GrowthRules::default();
        let mut state = state_with(DefenseId::Vault, GrowthStage::Sprout);
        assert_eq!(resolve_hazard(&mut state, &rules, &mut NeverRng), None);
        assert!(state.event_log.is_empty());
    }
}
