//! Harvest scoring.
//!
//! Potency scales with the nutrient potency boost and shrinks with pest
//! damage. Yield scales with the run's average health and shrinks with
//! raider damage. Both are rounded and clamped into their reportable
//! ranges.

use cryptgrow_types::HarvestResult;
use rand::Rng;

use crate::config::GrowthRules;
use crate::dice;
use crate::state::GameState;

/// Average sampled health as a fraction of 100. `1.0` before any sample.
pub fn average_health(state: &GameState) -> f64 {
    if state.health_ticks == 0 {
        return 1.0;
    }
    state.health_sum / f64::from(state.health_ticks) / 100.0
}

/// Round and clamp a score into `[low, high]`.
fn clamp_score(value: f64, low: u32, high: u32) -> u32 {
    let clamped = value.round().clamp(f64::from(low), f64::from(high));
    // Within u32 range after the clamp; NaN casts to 0.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let score = clamped as u32;
    score.clamp(low, high)
}

/// Final potency: `round(base * potency_boost * pest_penalty)` in `[0, cap]`.
pub fn compute_potency(base: f64, potency_boost: f64, pest_penalty: f64, cap: u32) -> u32 {
    clamp_score(base * potency_boost * pest_penalty, 0, cap)
}

/// Final yield: `round(base * avg_health * raider_penalty)` in `bounds`.
pub fn compute_yield(
    base: f64,
    avg_health: f64,
    raider_penalty: f64,
    (low, high): (u32, u32),
) -> u32 {
    clamp_score(base * avg_health * raider_penalty, low, high)
}

/// Draw the base rolls and score the harvest from the current state.
pub fn roll_harvest<R: Rng + ?Sized>(
    state: &GameState,
    rules: &GrowthRules,
    rng: &mut R,
) -> HarvestResult {
    let mut base_potency = dice::uniform(rng, rules.potency_base_range);
    if dice::chance(rng, rules.potency_high_chance) {
        base_potency = dice::uniform(rng, rules.potency_high_range);
    }
    let base_yield = dice::uniform(rng, rules.yield_base_range);

    let m = &state.modifiers;
    let avg_health = average_health(state);
    let result = HarvestResult {
        potency: compute_potency(base_potency, m.potency_boost, m.pest_penalty, rules.potency_cap),
        yield_grams: compute_yield(base_yield, avg_health, m.raider_penalty, rules.yield_bounds),
    };
    tracing::debug!(
        base_potency,
        base_yield,
        avg_health,
        potency = result.potency,
        yield_grams = result.yield_grams,
        "harvest scored"
    );
    result
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::state::tests::basic_selections;

    #[test]
    fn average_health_defaults_to_full() {
        let mut state = GameState::new(&basic_selections(), &GrowthRules::default());
        assert!((average_health(&state) - 1.0).abs() < f64::EPSILON);
        state.health_sum = 150.0;
        state.health_ticks = 2;
        assert!((average_health(&state) - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn potency_rounds_and_caps() {
        assert_eq!(compute_potency(25.0, 1.2, 1.0, 70), 30);
        assert_eq!(compute_potency(60.0, 1.4, 1.0, 70), 70);
        assert_eq!(compute_potency(29.4, 1.0, 1.0, 70), 29);
    }

    #[test]
    fn zero_pest_penalty_means_zero_potency() {
        assert_eq!(compute_potency(69.9, 1.4, 0.0, 70), 0);
    }

    #[test]
    fn yield_never_drops_below_one() {
        let bounds = GrowthRules::default().yield_bounds;
        assert_eq!(compute_yield(150.0, 0.0, 1.0, bounds), 1);
        assert_eq!(compute_yield(199.9, 1.0, 1.0, bounds), 200);
        assert_eq!(compute_yield(100.0, 0.5, 0.9, bounds), 45);
    }

    #[test]
    fn rolled_scores_stay_in_range() {
        let rules = GrowthRules::default();
        let mut state = GameState::new(&basic_selections(), &rules);
        state.modifiers.potency_boost = 1.4 * 1.4 * 1.4;
        let mut rng = SmallRng::seed_from_u64(21);
        for _ in 0..1_000 {
            let result = roll_harvest(&state, &rules, &mut rng);
            assert!(result.potency <= 70);
            assert!((1..=200).contains(&result.yield_grams));
        }
    }
}
