//! Per-tick resource rules: drain, scheduled feeding, lighting, stress and
//! health.
//!
//! Each function applies one step of the tick in isolation and clamps every
//! resource it touches back into `[0, 100]`. [`crate::tick::tick`] calls
//! them in order.

use std::time::Duration;

use cryptgrow_types::LogSeverity;
use rand::Rng;

use crate::catalog;
use crate::config::GrowthRules;
use crate::dice;
use crate::state::GameState;

/// Upper bound of every resource bar.
pub const RESOURCE_MAX: f64 = 100.0;

/// Clamp a resource value into `[0, 100]`.
pub const fn clamp_resource(value: f64) -> f64 {
    value.clamp(0.0, RESOURCE_MAX)
}

fn out_of_band(value: f64, rules: &GrowthRules) -> bool {
    !(rules.optimal_min..=rules.optimal_max).contains(&value)
}

/// Number of `true` flags, as a float multiplier.
fn count_flags(flags: &[bool]) -> f64 {
    flags.iter().map(|flag| f64::from(u8::from(*flag))).sum()
}

/// Drain water by the soil rate and nutrients by the base rate, both scaled
/// by the game speed.
pub fn apply_drain(state: &mut GameState, rules: &GrowthRules) {
    let speed = state.speed.factor();
    let soil = catalog::soil(state.selections.soil);
    state.resources.water = clamp_resource(soil.water_drain.mul_add(-speed, state.resources.water));
    state.resources.nutrients =
        clamp_resource(rules.base_nutrient_drain.mul_add(-speed, state.resources.nutrients));
}

/// What a scheduled feed did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedEvent {
    /// Whether this feed applied the stage's potency factor.
    pub boosted: bool,
}

/// Advance the feeding counter and feed when it lands on the interval.
///
/// The mix's potency factor is multiplied into the boost only on the
/// first feed of each stage.
pub fn apply_feeding(state: &mut GameState, rules: &GrowthRules) -> Option<FeedEvent> {
    state.feed_ticks = state.feed_ticks.saturating_add(1);
    let schedule = *state.current_schedule()?;
    let interval = schedule.feed_interval()?;
    if state.feed_ticks % interval != 0 {
        return None;
    }

    let mix = catalog::nutrient_mix(schedule.mix);
    state.resources.water = clamp_resource(state.resources.water + rules.feed_water);
    state.resources.nutrients = clamp_resource(state.resources.nutrients + mix.nutrient_feed);

    let applied = state.mix_applied.get_mut(state.stage.index())?;
    let boosted = !*applied;
    if boosted {
        *applied = true;
        state.modifiers.potency_boost *= mix.potency;
    }
    tracing::debug!(stage = %state.stage, mix = %schedule.mix, boosted, "scheduled feed");
    Some(FeedEvent { boosted })
}

/// Change to the lighting subsystem during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightingChange {
    /// Lights stayed on.
    Steady,
    /// Lights failed this tick.
    Failed,
    /// Lights are still out and darkness effects were applied.
    Dark,
}

/// Roll for a light failure, then apply darkness effects while off.
///
/// Darkness applies from the failure tick onward. The failure tick keeps
/// its randomly dimmed light level; later ticks set light from
/// `light_decay_per_sec` per second since the failure. The health drain
/// ramps up with time in the dark.
pub fn apply_lighting<R: Rng + ?Sized>(
    state: &mut GameState,
    rules: &GrowthRules,
    now_ms: u64,
    rng: &mut R,
) -> LightingChange {
    let change = if state.lights_on {
        if !dice::chance(rng, rules.light_failure_chance) {
            return LightingChange::Steady;
        }
        state.lights_on = false;
        state.light_failure_at_ms = Some(now_ms);
        state.resources.light = clamp_resource(dice::uniform(rng, rules.failed_light_range));
        state.log("Lights have gone out! Click to fix them!", LogSeverity::Warning);
        tracing::info!(light = state.resources.light, "grow lights failed");
        LightingChange::Failed
    } else {
        LightingChange::Dark
    };

    let failed_at = state.light_failure_at_ms.unwrap_or(now_ms);
    let seconds_off = Duration::from_millis(now_ms.saturating_sub(failed_at)).as_secs_f64();
    if change == LightingChange::Dark {
        state.resources.light =
            clamp_resource(seconds_off.mul_add(-rules.light_decay_per_sec, RESOURCE_MAX));
    }
    let health_drain = (rules.dark_health_base + seconds_off / rules.dark_health_ramp_secs)
        .min(rules.dark_health_max);
    state.resources.health = clamp_resource(state.resources.health - health_drain);
    state.resources.stress = clamp_resource(state.resources.stress + rules.dark_stress);
    change
}

/// Restore the lights. Returns `false` when they were already on.
pub fn fix_lights(state: &mut GameState) -> bool {
    if state.lights_on {
        return false;
    }
    state.lights_on = true;
    state.light_failure_at_ms = None;
    state.resources.light = RESOURCE_MAX;
    state.log("Lights are back on!", LogSeverity::Info);
    tracing::info!("grow lights fixed");
    true
}

/// Raise stress for each unhealthy condition, or relax it when there are
/// none.
pub fn apply_stress(state: &mut GameState, rules: &GrowthRules) {
    let r = &state.resources;
    let conditions = [
        out_of_band(r.water, rules),
        out_of_band(r.nutrients, rules),
        r.light < rules.low_light,
    ];
    let count = count_flags(&conditions);
    let delta = if count > 0.0 {
        rules.stress_step * count
    } else {
        -rules.stress_step
    };
    state.resources.stress = clamp_resource(state.resources.stress + delta);
}

/// Damage health for each harmful condition, then sample it for the
/// harvest average.
pub fn apply_health(state: &mut GameState, rules: &GrowthRules) {
    let r = &state.resources;
    let conditions = [
        out_of_band(r.water, rules),
        out_of_band(r.nutrients, rules),
        r.stress > rules.high_stress,
    ];
    let count = count_flags(&conditions);
    state.resources.health = clamp_resource(rules.health_step.mul_add(-count, state.resources.health));
    state.health_sum += state.resources.health;
    state.health_ticks = state.health_ticks.saturating_add(1);
}

#[cfg(test)]
mod tests {
    use cryptgrow_types::{GameSpeed, GrowthStage, NutrientMixId};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::state::tests::basic_selections;
    use crate::testing::NeverRng;

    fn fresh() -> (GameState, GrowthRules) {
        let rules = GrowthRules::default();
        (GameState::new(&basic_selections(), &rules), rules)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn drain_scales_with_speed() {
        let (mut state, rules) = fresh();
        apply_drain(&mut state, &rules);
        assert!(close(state.resources.water, 79.5));
        assert!(close(state.resources.nutrients, 79.5));

        state.speed = GameSpeed::Triple;
        apply_drain(&mut state, &rules);
        assert!(close(state.resources.water, 78.0));
        assert!(close(state.resources.nutrients, 78.0));
    }

    #[test]
    fn drain_floors_at_zero() {
        let (mut state, rules) = fresh();
        state.resources.water = 0.2;
        state.resources.nutrients = 0.1;
        apply_drain(&mut state, &rules);
        assert!(close(state.resources.water, 0.0));
        assert!(close(state.resources.nutrients, 0.0));
    }

    #[test]
    fn feeding_fires_on_interval_and_boosts_once() {
        let rules = GrowthRules::default();
        let mut selections = basic_selections();
        selections.feeding.sprout = NutrientMixId::Potent;
        let mut state = GameState::new(&selections, &rules);
        state.resources.water = 50.0;

        for _ in 0..15 {
            assert_eq!(apply_feeding(&mut state, &rules), None);
        }
        assert_eq!(
            apply_feeding(&mut state, &rules),
            Some(FeedEvent { boosted: true })
        );
        assert!(close(state.resources.water, 70.0));
        assert!(close(state.resources.nutrients, 95.0));
        assert!(close(state.modifiers.potency_boost, 1.2));
        assert_eq!(state.mix_applied, [true, false, false]);

        for _ in 0..15 {
            assert_eq!(apply_feeding(&mut state, &rules), None);
        }
        assert_eq!(
            apply_feeding(&mut state, &rules),
            Some(FeedEvent { boosted: false })
        );
        assert!(close(state.modifiers.potency_boost, 1.2));
        assert!(close(state.resources.water, 90.0));
        assert!(close(state.resources.nutrients, 100.0));
    }

    #[test]
    fn harvest_stage_is_never_fed() {
        let (mut state, rules) = fresh();
        state.stage = GrowthStage::Harvest;
        for _ in 0..40 {
            assert_eq!(apply_feeding(&mut state, &rules), None);
        }
    }

    #[test]
    fn lights_fail_then_darken_over_time() {
        let (mut state, mut rules) = fresh();
        rules.light_failure_chance = 1.0;
        let mut rng = SmallRng::seed_from_u64(3);

        assert_eq!(
            apply_lighting(&mut state, &rules, 1_000, &mut rng),
            LightingChange::Failed
        );
        assert!(!state.lights_on);
        assert!((30.0..70.0).contains(&state.resources.light));
        assert_eq!(
            state.event_log.latest().map(|e| e.severity),
            Some(LogSeverity::Warning)
        );

        // 10 s in the dark: light 80, health -(0.1 + 10/300), stress +0.5.
        assert_eq!(
            apply_lighting(&mut state, &rules, 11_000, &mut rng),
            LightingChange::Dark
        );
        assert!(close(state.resources.light, 80.0));
        assert!(close(
            state.resources.health,
            100.0 - 0.1 - (0.1 + 10.0 / 300.0)
        ));
        assert!(close(state.resources.stress, 1.0));
    }

    #[test]
    fn failure_tick_already_drains_health_and_adds_stress() {
        let (mut state, mut rules) = fresh();
        rules.light_failure_chance = 1.0;
        let mut rng = SmallRng::seed_from_u64(11);

        assert_eq!(
            apply_lighting(&mut state, &rules, 1_000, &mut rng),
            LightingChange::Failed
        );
        let dimmed = state.resources.light;
        assert!((30.0..70.0).contains(&dimmed));
        assert!(close(state.resources.health, 99.9));
        assert!(close(state.resources.stress, 0.5));

        // One second later the decay curve takes over from the dimmed level.
        apply_lighting(&mut state, &rules, 2_000, &mut rng);
        assert!(close(state.resources.light, 98.0));
        assert!(close(state.resources.health, 99.9 - (0.1 + 1.0 / 300.0)));
        assert!(close(state.resources.stress, 1.0));
    }

    #[test]
    fn long_darkness_caps_health_drain_and_floors_light() {
        let (mut state, rules) = fresh();
        state.lights_on = false;
        state.light_failure_at_ms = Some(0);
        apply_lighting(&mut state, &rules, 600_000, &mut NeverRng);
        assert!(close(state.resources.light, 0.0));
        assert!(close(state.resources.health, 99.0));
    }

    #[test]
    fn fix_lights_is_a_no_op_when_on() {
        let (mut state, _) = fresh();
        let before = state.clone();
        assert!(!fix_lights(&mut state));
        assert_eq!(state, before);
    }

    #[test]
    fn fix_lights_restores_full_light() {
        let (mut state, _) = fresh();
        state.lights_on = false;
        state.light_failure_at_ms = Some(5);
        state.resources.light = 12.0;
        assert!(fix_lights(&mut state));
        assert!(state.lights_on);
        assert_eq!(state.light_failure_at_ms, None);
        assert!(close(state.resources.light, 100.0));
        assert!(state.event_log.contains("Lights are back on!"));
    }

    #[test]
    fn stress_rises_per_condition_and_relaxes_otherwise() {
        let (mut state, rules) = fresh();
        state.resources.stress = 10.0;
        apply_stress(&mut state, &rules);
        assert!(close(state.resources.stress, 9.5));

        state.resources.water = 10.0;
        state.resources.nutrients = 99.0;
        state.resources.light = 20.0;
        apply_stress(&mut state, &rules);
        assert!(close(state.resources.stress, 11.0));

        state.resources.water = 50.0;
        state.resources.nutrients = 50.0;
        state.resources.light = 100.0;
        state.resources.stress = 0.0;
        apply_stress(&mut state, &rules);
        assert!(close(state.resources.stress, 0.0));
    }

    #[test]
    fn health_drops_per_condition_and_is_sampled() {
        let (mut state, rules) = fresh();
        apply_health(&mut state, &rules);
        assert!(close(state.resources.health, 100.0));

        state.resources.water = 96.0;
        state.resources.stress = 81.0;
        apply_health(&mut state, &rules);
        assert!(close(state.resources.health, 99.0));
        assert_eq!(state.health_ticks, 2);
        assert!(close(state.health_sum, 199.0));
    }
}
