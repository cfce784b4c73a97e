//! The `GameState` aggregate mutated by the tick function.
//!
//! One `GameState` exists per growth session. It is created from validated
//! [`Selections`], owned by the session runtime, and read by the front end
//! only through [`GameState::snapshot`].

use std::collections::VecDeque;

use chrono::Utc;
use cryptgrow_types::{
    GameSnapshot, GameSpeed, GrowthStage, HarvestResult, HazardKind, HazardView, LogEntry,
    LogSeverity, Modifiers, NutrientMixId, PlantMood, ResourceLevels, Selections, SessionId,
};

use crate::catalog;
use crate::config::GrowthRules;

/// How many log entries the in-game event log retains.
pub const EVENT_LOG_CAPACITY: usize = 10;

/// Stress above which the plant is drawn wilting.
const WILT_STRESS: f64 = 50.0;

// ---------------------------------------------------------------------------
// Hazard
// ---------------------------------------------------------------------------

/// A hazard waiting for its deferred resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingHazard {
    /// Index into the variant table for the hazard kind.
    pub variant: usize,
    /// Whether the equipped defense neutralizes it.
    pub blocked: bool,
    /// Session clock time (ms) at which it resolves.
    pub resolves_at_ms: u64,
}

/// The single outstanding hazard slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Hazard {
    /// No hazard is pending; a new one may roll.
    #[default]
    Clear,
    /// Pests threaten potency.
    Pest(PendingHazard),
    /// Raiders threaten yield.
    Raider(PendingHazard),
}

impl Hazard {
    /// Build the slot for a freshly rolled hazard.
    pub const fn pending(kind: HazardKind, pending: PendingHazard) -> Self {
        match kind {
            HazardKind::Pest => Self::Pest(pending),
            HazardKind::Raider => Self::Raider(pending),
        }
    }

    /// Whether no hazard is pending.
    pub const fn is_clear(&self) -> bool {
        matches!(self, Self::Clear)
    }

    /// The pending hazard's kind and details.
    pub const fn active(&self) -> Option<(HazardKind, PendingHazard)> {
        match *self {
            Self::Clear => None,
            Self::Pest(p) => Some((HazardKind::Pest, p)),
            Self::Raider(p) => Some((HazardKind::Raider, p)),
        }
    }

    /// Render view of the pending hazard.
    pub fn view(&self) -> Option<HazardView> {
        self.active().map(|(kind, p)| {
            let variant = catalog::hazard_variant(kind, p.variant);
            HazardView {
                kind,
                name: variant.name.to_owned(),
                damage: variant.damage,
                blocked: p.blocked,
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Event log
// ---------------------------------------------------------------------------

/// Bounded in-game event log, newest entry first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    entries: VecDeque<LogEntry>,
}

impl EventLog {
    /// Record an entry, dropping the oldest beyond capacity.
    pub fn push(&mut self, message: impl Into<String>, severity: LogSeverity) {
        self.entries.push_front(LogEntry {
            message: message.into(),
            severity,
            timestamp: Utc::now(),
        });
        self.entries.truncate(EVENT_LOG_CAPACITY);
    }

    /// Entries, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// The most recent entry.
    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been logged.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any retained entry has exactly this message.
    pub fn contains(&self, message: &str) -> bool {
        self.entries.iter().any(|e| e.message == message)
    }
}

// ---------------------------------------------------------------------------
// Feeding schedule
// ---------------------------------------------------------------------------

/// Duration and feeding plan for one growing stage, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageSchedule {
    /// Ticks the stage lasts.
    pub duration: u32,
    /// Scheduled feeds during the stage.
    pub water_times: u32,
    /// Mix fed on each scheduled feed.
    pub mix: NutrientMixId,
}

impl StageSchedule {
    /// Ticks between feeds: `max(1, duration / water_times)`.
    ///
    /// `None` when the stage is never fed.
    pub fn feed_interval(&self) -> Option<u32> {
        self.duration.checked_div(self.water_times).map(|i| i.max(1))
    }
}

// ---------------------------------------------------------------------------
// GameState
// ---------------------------------------------------------------------------

/// Round a fraction to a whole percentage in `[0, 100]`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_percent(fraction: f64) -> u32 {
    (fraction * 100.0).round().clamp(0.0, 100.0) as u32
}

/// Complete mutable state of one growth session.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    /// Seed, soil, defense and mixes chosen before the run.
    pub selections: Selections,
    /// Resource bars, each clamped to `[0, 100]`.
    pub resources: ResourceLevels,
    /// Current stage. Never moves backwards.
    pub stage: GrowthStage,
    /// Ticks elapsed in the current stage.
    pub stage_time: u32,
    /// Ticks counted toward the next scheduled feed in this stage.
    pub feed_ticks: u32,
    /// Per-stage schedule for Sprout, Vegetative and Flowering.
    pub schedule: [StageSchedule; 3],
    /// Sum of every growing stage's duration.
    pub total_growth_ticks: u32,
    /// Whether the tick loop is live.
    pub is_growing: bool,
    /// Whether ticks are currently skipped.
    pub is_paused: bool,
    /// Drain multiplier and tick rate.
    pub speed: GameSpeed,
    /// The outstanding hazard, if any.
    pub hazard: Hazard,
    /// Whether the grow lights work.
    pub lights_on: bool,
    /// Session clock time (ms) when the lights went out.
    pub light_failure_at_ms: Option<u64>,
    /// Whether each growing stage's mix potency factor has been applied.
    pub mix_applied: [bool; 3],
    /// Accumulated potency boost and hazard penalties.
    pub modifiers: Modifiers,
    /// Sum of health sampled once per tick.
    pub health_sum: f64,
    /// Number of health samples.
    pub health_ticks: u32,
    /// Final score. Written once at harvest.
    pub result: Option<HarvestResult>,
    /// Recent player-facing messages.
    pub event_log: EventLog,
}

impl GameState {
    /// Fresh state for a new run.
    pub fn new(selections: &Selections, rules: &GrowthRules) -> Self {
        let schedule = GrowthStage::GROWING.map(|stage| StageSchedule {
            duration: rules.stage_duration(stage),
            water_times: rules.water_times(stage),
            mix: selections
                .feeding
                .mix_for(stage)
                .unwrap_or(selections.feeding.sprout),
        });
        Self {
            selections: *selections,
            resources: ResourceLevels {
                health: rules.initial_health,
                water: rules.initial_water,
                light: rules.initial_light,
                nutrients: rules.initial_nutrients,
                stress: rules.initial_stress,
            },
            stage: GrowthStage::Sprout,
            stage_time: 0,
            feed_ticks: 0,
            schedule,
            total_growth_ticks: rules.total_growth_ticks(),
            is_growing: false,
            is_paused: false,
            speed: GameSpeed::Normal,
            hazard: Hazard::Clear,
            lights_on: true,
            light_failure_at_ms: None,
            mix_applied: [false; 3],
            modifiers: Modifiers::default(),
            health_sum: 0.0,
            health_ticks: 0,
            result: None,
            event_log: EventLog::default(),
        }
    }

    /// Schedule of the current stage. `None` once harvested.
    pub fn current_schedule(&self) -> Option<&StageSchedule> {
        self.schedule.get(self.stage.index())
    }

    /// Duration of the current stage. Zero at `Harvest`.
    pub fn stage_duration(&self) -> u32 {
        self.current_schedule().map_or(0, |s| s.duration)
    }

    /// Whether the plant has died.
    pub const fn is_dead(&self) -> bool {
        self.resources.health <= 0.0
    }

    /// Whether ticks should currently advance the simulation.
    pub const fn is_live(&self) -> bool {
        self.is_growing && !self.is_paused
    }

    /// Overall growth progress as a whole percentage, capped at 100.
    pub fn progress_pct(&self) -> u32 {
        if self.total_growth_ticks == 0 {
            return 100;
        }
        let completed: u32 = self
            .schedule
            .iter()
            .take(self.stage.index())
            .fold(0_u32, |acc, s| acc.saturating_add(s.duration));
        let elapsed = completed.saturating_add(self.stage_time);
        whole_percent(f64::from(elapsed) / f64::from(self.total_growth_ticks))
    }

    /// How the plant should be drawn.
    pub const fn mood(&self) -> PlantMood {
        if self.is_dead() {
            return PlantMood::Dead;
        }
        match self.stage {
            GrowthStage::Sprout => PlantMood::Seedling,
            GrowthStage::Vegetative | GrowthStage::Flowering => {
                if self.resources.stress > WILT_STRESS {
                    PlantMood::Wilting
                } else {
                    PlantMood::Thriving
                }
            }
            GrowthStage::Harvest => PlantMood::Harvested,
        }
    }

    /// Append a player-facing message to the event log.
    pub fn log(&mut self, message: impl Into<String>, severity: LogSeverity) {
        let message = message.into();
        tracing::debug!(?severity, stage = %self.stage, "{message}");
        self.event_log.push(message, severity);
    }

    /// Record the harvest score. Later calls are ignored.
    pub fn record_result(&mut self, result: HarvestResult) -> bool {
        if self.result.is_some() {
            return false;
        }
        self.result = Some(result);
        true
    }

    /// Read-only view for rendering.
    pub fn snapshot(&self, session_id: SessionId) -> GameSnapshot {
        GameSnapshot {
            session_id,
            seed: self.selections.seed,
            soil: self.selections.soil,
            defense: self.selections.defense,
            resources: self.resources,
            stage: self.stage,
            stage_time: self.stage_time,
            progress_pct: self.progress_pct(),
            mood: self.mood(),
            is_growing: self.is_growing,
            is_paused: self.is_paused,
            speed: self.speed,
            lights_on: self.lights_on,
            hazard: self.hazard.view(),
            modifiers: self.modifiers,
            result: self.result,
            event_log: self.event_log.iter().cloned().collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use cryptgrow_types::{DefenseId, FeedingPlan, SeedId, SoilId};

    use super::*;

    pub(crate) fn basic_selections() -> Selections {
        Selections {
            seed: SeedId::CryptCookies,
            soil: SoilId::BoneDust,
            defense: DefenseId::Grower,
            feeding: FeedingPlan::uniform(NutrientMixId::Basic),
        }
    }

    #[test]
    fn new_state_has_stock_resources() {
        let state = GameState::new(&basic_selections(), &GrowthRules::default());
        assert!((state.resources.health - 100.0).abs() < f64::EPSILON);
        assert!((state.resources.water - 80.0).abs() < f64::EPSILON);
        assert!((state.resources.light - 100.0).abs() < f64::EPSILON);
        assert!((state.resources.nutrients - 80.0).abs() < f64::EPSILON);
        assert!(state.resources.stress.abs() < f64::EPSILON);
        assert_eq!(state.total_growth_ticks, 144);
        assert_eq!(state.mix_applied, [false; 3]);
        assert!(state.hazard.is_clear());
        assert!(!state.is_growing);
        assert_eq!(state.result, None);
    }

    #[test]
    fn feed_interval_follows_water_times() {
        let state = GameState::new(&basic_selections(), &GrowthRules::default());
        let intervals: Vec<_> = state.schedule.iter().map(StageSchedule::feed_interval).collect();
        assert_eq!(intervals, vec![Some(16), Some(16), Some(16)]);

        let unfed = StageSchedule {
            duration: 10,
            water_times: 0,
            mix: NutrientMixId::Basic,
        };
        assert_eq!(unfed.feed_interval(), None);

        let dense = StageSchedule {
            duration: 3,
            water_times: 5,
            mix: NutrientMixId::Basic,
        };
        assert_eq!(dense.feed_interval(), Some(1));
    }

    #[test]
    fn event_log_keeps_ten_newest_first() {
        let mut log = EventLog::default();
        for i in 0..15 {
            log.push(format!("entry {i}"), LogSeverity::Info);
        }
        assert_eq!(log.len(), EVENT_LOG_CAPACITY);
        assert_eq!(log.latest().map(|e| e.message.as_str()), Some("entry 14"));
        assert!(log.contains("entry 5"));
        assert!(!log.contains("entry 4"));
    }

    #[test]
    fn progress_counts_completed_stages() {
        let mut state = GameState::new(&basic_selections(), &GrowthRules::default());
        assert_eq!(state.progress_pct(), 0);
        state.stage = GrowthStage::Vegetative;
        state.stage_time = 40;
        // (32 + 40) / 144 = 50%
        assert_eq!(state.progress_pct(), 50);
        state.stage = GrowthStage::Harvest;
        state.stage_time = 0;
        assert_eq!(state.progress_pct(), 100);
    }

    #[test]
    fn mood_tracks_stage_stress_and_death() {
        let mut state = GameState::new(&basic_selections(), &GrowthRules::default());
        assert_eq!(state.mood(), PlantMood::Seedling);
        state.stage = GrowthStage::Flowering;
        assert_eq!(state.mood(), PlantMood::Thriving);
        state.resources.stress = 51.0;
        assert_eq!(state.mood(), PlantMood::Wilting);
        state.resources.health = 0.0;
        assert_eq!(state.mood(), PlantMood::Dead);
    }

    #[test]
    fn result_is_write_once() {
        let mut state = GameState::new(&basic_selections(), &GrowthRules::default());
        let first = HarvestResult {
            potency: 30,
            yield_grams: 100,
        };
        assert!(state.record_result(first));
        assert!(!state.record_result(HarvestResult {
            potency: 1,
            yield_grams: 1,
        }));
        assert_eq!(state.result, Some(first));
    }

    #[test]
    fn snapshot_reflects_hazard_view() {
        let mut state = GameState::new(&basic_selections(), &GrowthRules::default());
        state.hazard = Hazard::pending(
            HazardKind::Pest,
            PendingHazard {
                variant: 2,
                blocked: true,
                resolves_at_ms: 3000,
            },
        );
        let snap = state.snapshot(SessionId::new());
        let view = snap.hazard.unwrap();
        assert_eq!(view.kind, HazardKind::Pest);
        assert_eq!(view.name, "Crypt Mites");
        assert_eq!(view.damage, (3, 10));
        assert!(view.blocked);
        assert_eq!(snap.mood, PlantMood::Seedling);
    }
}
