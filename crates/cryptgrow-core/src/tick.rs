//! The per-tick state transition.
//!
//! # Order of operations
//!
//! 1. Drain water and nutrients
//! 2. Scheduled feeding
//! 3. Lighting failure or darkness effects
//! 4. Stress
//! 5. Health (and the health sample for harvest)
//! 6. Hazard roll
//! 7. Stage progression or harvest
//! 8. Death check
//!
//! A plant whose health reached zero this tick neither advances nor
//! harvests: death wins.

use cryptgrow_types::{GrowthStage, HarvestResult, LogSeverity};
use rand::Rng;

use crate::config::GrowthRules;
use crate::harvest;
use crate::hazard::{self, HazardStart};
use crate::resources::{self, FeedEvent, LightingChange};
use crate::state::GameState;

/// How a tick ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not growing, or paused. Nothing changed.
    Skipped,
    /// The plant grew within its current stage.
    Continued,
    /// The plant entered a new growing stage.
    StageAdvanced(GrowthStage),
    /// Flowering finished and the harvest was scored.
    Harvested(HarvestResult),
    /// Health reached zero.
    Died,
}

impl TickOutcome {
    /// Whether this tick ended the run.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Harvested(_) | Self::Died)
    }
}

/// Everything a tick did that the session runtime reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// How the tick ended.
    pub outcome: TickOutcome,
    /// A hazard that started this tick and needs a deferred resolution.
    pub hazard_started: Option<HazardStart>,
    /// What happened to the lights.
    pub lighting: LightingChange,
    /// Whether a scheduled feed landed.
    pub fed: bool,
}

impl TickReport {
    const fn skipped() -> Self {
        Self {
            outcome: TickOutcome::Skipped,
            hazard_started: None,
            lighting: LightingChange::Steady,
            fed: false,
        }
    }
}

/// Apply one tick to the state.
///
/// `now_ms` is the session clock, used to time darkness and hazards.
pub fn tick<R: Rng + ?Sized>(
    state: &mut GameState,
    rules: &GrowthRules,
    now_ms: u64,
    rng: &mut R,
) -> TickReport {
    if !state.is_live() {
        return TickReport::skipped();
    }

    // 1. Drain
    resources::apply_drain(state, rules);

    // 2. Scheduled feeding
    let fed: Option<FeedEvent> = resources::apply_feeding(state, rules);

    // 3. Lighting
    let lighting = resources::apply_lighting(state, rules, now_ms, rng);

    // 4-5. Stress, then health
    resources::apply_stress(state, rules);
    resources::apply_health(state, rules);

    // 6. Hazard roll
    let hazard_started = hazard::roll_hazard(state, rules, now_ms, rng);

    // 7-8. Progression, unless the plant just died
    let outcome = if state.is_dead() {
        die(state);
        TickOutcome::Died
    } else {
        progress(state, rules, rng)
    };

    tracing::debug!(
        stage = %state.stage,
        stage_time = state.stage_time,
        health = state.resources.health,
        water = state.resources.water,
        nutrients = state.resources.nutrients,
        light = state.resources.light,
        stress = state.resources.stress,
        ?outcome,
        "tick"
    );

    TickReport {
        outcome,
        hazard_started,
        lighting,
        fed: fed.is_some(),
    }
}

fn progress<R: Rng + ?Sized>(
    state: &mut GameState,
    rules: &GrowthRules,
    rng: &mut R,
) -> TickOutcome {
    state.stage_time = state.stage_time.saturating_add(1);
    if state.stage_time < state.stage_duration() {
        return TickOutcome::Continued;
    }

    if state.stage.is_last_growing() {
        let result = harvest::roll_harvest(state, rules, rng);
        state.record_result(result);
        state.stage = GrowthStage::Harvest;
        state.stage_time = 0;
        state.is_growing = false;
        state.log("Plant is ready for harvest!", LogSeverity::Info);
        tracing::info!(
            potency = result.potency,
            yield_grams = result.yield_grams,
            "plant harvested"
        );
        return TickOutcome::Harvested(result);
    }

    let next = state.stage.next();
    state.stage = next;
    state.stage_time = 0;
    state.feed_ticks = 0;
    state.log(format!("Entering {next} stage"), LogSeverity::Info);
    tracing::info!(stage = %next, "stage advanced");
    TickOutcome::StageAdvanced(next)
}

fn die(state: &mut GameState) {
    state.is_growing = false;
    state.log("Your plant has died from neglect!", LogSeverity::Error);
    tracing::warn!(stage = %state.stage, stage_time = state.stage_time, "plant died");
}
