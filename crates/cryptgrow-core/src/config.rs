//! Configuration loading and typed config structures.
//!
//! The optional `cryptgrow-config.yaml` mirrors [`GrowConfig`]. Every key
//! has a default matching the shipped game, so an empty file (or no file)
//! reproduces stock behavior. [`GrowthRules`] bundles the numeric tunables
//! consumed by the pure rule functions in [`crate::resources`],
//! [`crate::hazard`] and [`crate::harvest`].

use std::path::Path;
use std::time::Duration;

use cryptgrow_types::{
    DefenseId, FeedingDraft, GameSpeed, GrowthStage, NutrientMixId, SeedId, SelectionDraft, SoilId,
};
use serde::Deserialize;

/// Environment variable that overrides `session.rng_seed`.
pub const RNG_SEED_ENV: &str = "CRYPTGROW_RNG_SEED";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is unusable.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GrowConfig {
    /// Scheduler and randomness settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// Real-time delays for deferred callbacks.
    #[serde(default)]
    pub delays: DelayConfig,

    /// Numeric simulation rules.
    #[serde(default)]
    pub rules: GrowthRules,

    /// Choices used by the headless engine.
    #[serde(default = "default_selections")]
    pub selections: SelectionDraft,

    /// Headless auto-play behavior.
    #[serde(default)]
    pub autopilot: AutopilotConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for GrowConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            delays: DelayConfig::default(),
            rules: GrowthRules::default(),
            selections: default_selections(),
            autopilot: AutopilotConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl GrowConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `CRYPTGROW_RNG_SEED` overrides `session.rng_seed` when set to a
    /// valid integer.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let yaml = if yaml.trim().is_empty() { "{}" } else { yaml };
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.session.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would stall the scheduler or break the rules.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session.base_tick_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                reason: "session.base_tick_interval_ms must be at least 1".to_owned(),
            });
        }
        GameSpeed::try_from(self.session.starting_speed).map_err(|e| ConfigError::Invalid {
            reason: format!("session.starting_speed: {e}"),
        })?;
        self.rules.validate()
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Scheduler and randomness settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionConfig {
    /// Real-time milliseconds per tick at 1x speed.
    #[serde(default = "default_base_tick_interval_ms")]
    pub base_tick_interval_ms: u64,

    /// Speed the session starts at (1, 2, or 3).
    #[serde(default = "default_starting_speed")]
    pub starting_speed: u8,

    /// Seed for the session RNG. OS entropy when absent.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl SessionConfig {
    /// Apply [`RNG_SEED_ENV`] if it is set to a valid integer.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(RNG_SEED_ENV) {
            match val.trim().parse::<u64>() {
                Ok(seed) => self.rng_seed = Some(seed),
                Err(e) => {
                    tracing::warn!(value = %val, error = %e, "ignoring invalid {RNG_SEED_ENV}");
                }
            }
        }
    }

    /// Tick period for a given speed: `base_tick_interval_ms / multiplier`.
    pub fn tick_period(&self, speed: GameSpeed) -> Duration {
        let ms = self
            .base_tick_interval_ms
            .checked_div(u64::from(speed.multiplier()))
            .unwrap_or(self.base_tick_interval_ms)
            .max(1);
        Duration::from_millis(ms)
    }

    /// The configured starting speed, falling back to 1x if invalid.
    pub fn starting_speed(&self) -> GameSpeed {
        GameSpeed::try_from(self.starting_speed).unwrap_or_default()
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_tick_interval_ms: default_base_tick_interval_ms(),
            starting_speed: default_starting_speed(),
            rng_seed: None,
        }
    }
}

/// Real-time delays, in milliseconds, before the outcome callbacks run.
///
/// Hazard delays are part of [`GrowthRules`] because the tick stamps
/// each pending hazard with its resolution time.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DelayConfig {
    /// Completion callback delay after harvest.
    #[serde(default = "default_harvest_callback_ms")]
    pub harvest_callback_ms: u64,
    /// Death callback delay after health reaches zero.
    #[serde(default = "default_death_callback_ms")]
    pub death_callback_ms: u64,
}

impl DelayConfig {
    /// Delay before the completion callback.
    pub const fn harvest(&self) -> Duration {
        Duration::from_millis(self.harvest_callback_ms)
    }

    /// Delay before the death callback.
    pub const fn death(&self) -> Duration {
        Duration::from_millis(self.death_callback_ms)
    }
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            harvest_callback_ms: default_harvest_callback_ms(),
            death_callback_ms: default_death_callback_ms(),
        }
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Numeric rules for the growth simulation.
///
/// All resource quantities live on the 0-100 scale. Probabilities are per
/// tick. Drain amounts are for 1x speed and scale with the multiplier.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GrowthRules {
    /// Starting health (default: 100).
    pub initial_health: f64,
    /// Starting water (default: 80).
    pub initial_water: f64,
    /// Starting light (default: 100).
    pub initial_light: f64,
    /// Starting nutrients (default: 80).
    pub initial_nutrients: f64,
    /// Starting stress (default: 0).
    pub initial_stress: f64,

    /// Duration in ticks of Sprout, Vegetative, Flowering (default: 32/48/64).
    pub stage_ticks: [u32; 3],
    /// Scheduled waterings per stage (default: 2/3/4).
    pub water_times: [u32; 3],

    /// Nutrients lost per tick (default: 0.5).
    pub base_nutrient_drain: f64,
    /// Water added by each scheduled feed (default: 20).
    pub feed_water: f64,

    /// Lower edge of the healthy water/nutrient band (default: 30).
    pub optimal_min: f64,
    /// Upper edge of the healthy water/nutrient band (default: 95).
    pub optimal_max: f64,
    /// Light below this stresses the plant (default: 50).
    pub low_light: f64,
    /// Stress above this damages health (default: 80).
    pub high_stress: f64,
    /// Stress change per condition per tick (default: 0.5).
    pub stress_step: f64,
    /// Health lost per condition per tick (default: 0.5).
    pub health_step: f64,

    /// Chance per tick that working lights fail (default: 0.05).
    pub light_failure_chance: f64,
    /// Light level range right after a failure (default: 30..=70).
    pub failed_light_range: (f64, f64),
    /// Light lost per second of darkness (default: 2).
    pub light_decay_per_sec: f64,
    /// Health drained per dark tick at the moment of failure (default: 0.1).
    pub dark_health_base: f64,
    /// Seconds of darkness for the health drain to grow by 1 (default: 300).
    pub dark_health_ramp_secs: f64,
    /// Cap on health drained per dark tick (default: 1.0).
    pub dark_health_max: f64,
    /// Stress added per dark tick (default: 0.5).
    pub dark_stress: f64,

    /// Chance per tick to roll a hazard when none is active (default: 0.02).
    pub hazard_chance: f64,
    /// During flowering, chance that a hazard roll produces raiders (default: 0.5).
    pub raider_chance: f64,
    /// Penalty percentage range for unblocked hazards, end exclusive (default: 5..15).
    pub penalty_pct_range: (u32, u32),
    /// Milliseconds until a blocked hazard clears (default: 3000).
    pub hazard_blocked_ms: u64,
    /// Milliseconds until an unblocked hazard applies its penalty (default: 5000).
    pub hazard_damage_ms: u64,

    /// Common base potency range, end exclusive (default: 20..30).
    pub potency_base_range: (f64, f64),
    /// Chance of rolling from the high potency range instead (default: 0.2).
    pub potency_high_chance: f64,
    /// High base potency range, end exclusive (default: 30..70).
    pub potency_high_range: (f64, f64),
    /// Largest reportable potency (default: 70).
    pub potency_cap: u32,
    /// Base yield range in grams, end exclusive (default: 1..200).
    pub yield_base_range: (f64, f64),
    /// Smallest and largest reportable yield (default: 1..=200).
    pub yield_bounds: (u32, u32),
}

impl Default for GrowthRules {
    fn default() -> Self {
        Self {
            initial_health: 100.0,
            initial_water: 80.0,
            initial_light: 100.0,
            initial_nutrients: 80.0,
            initial_stress: 0.0,
            stage_ticks: [32, 48, 64],
            water_times: [2, 3, 4],
            base_nutrient_drain: 0.5,
            feed_water: 20.0,
            optimal_min: 30.0,
            optimal_max: 95.0,
            low_light: 50.0,
            high_stress: 80.0,
            stress_step: 0.5,
            health_step: 0.5,
            light_failure_chance: 0.05,
            failed_light_range: (30.0, 70.0),
            light_decay_per_sec: 2.0,
            dark_health_base: 0.1,
            dark_health_ramp_secs: 300.0,
            dark_health_max: 1.0,
            dark_stress: 0.5,
            hazard_chance: 0.02,
            raider_chance: 0.5,
            penalty_pct_range: (5, 15),
            hazard_blocked_ms: 3000,
            hazard_damage_ms: 5000,
            potency_base_range: (20.0, 30.0),
            potency_high_chance: 0.2,
            potency_high_range: (30.0, 70.0),
            potency_cap: 70,
            yield_base_range: (1.0, 200.0),
            yield_bounds: (1, 200),
        }
    }
}

impl GrowthRules {
    /// Duration in ticks of a stage. `Harvest` has no duration.
    pub fn stage_duration(&self, stage: GrowthStage) -> u32 {
        self.stage_ticks.get(stage.index()).copied().unwrap_or(0)
    }

    /// Scheduled waterings during a stage. `Harvest` is never watered.
    pub fn water_times(&self, stage: GrowthStage) -> u32 {
        self.water_times.get(stage.index()).copied().unwrap_or(0)
    }

    /// Milliseconds between a hazard appearing and its resolution.
    pub const fn hazard_delay_ms(&self, blocked: bool) -> u64 {
        if blocked {
            self.hazard_blocked_ms
        } else {
            self.hazard_damage_ms
        }
    }

    /// Sum of every growing stage's duration.
    pub fn total_growth_ticks(&self) -> u32 {
        self.stage_ticks
            .iter()
            .fold(0_u32, |acc, ticks| acc.saturating_add(*ticks))
    }

    /// Check that probabilities are probabilities and ranges are non-empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let probabilities = [
            ("light_failure_chance", self.light_failure_chance),
            ("hazard_chance", self.hazard_chance),
            ("raider_chance", self.raider_chance),
            ("potency_high_chance", self.potency_high_chance),
        ];
        for (name, p) in probabilities {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::Invalid {
                    reason: format!("rules.{name} must be within [0, 1] (got {p})"),
                });
            }
        }

        let ranges = [
            ("failed_light_range", self.failed_light_range),
            ("potency_base_range", self.potency_base_range),
            ("potency_high_range", self.potency_high_range),
            ("yield_base_range", self.yield_base_range),
        ];
        for (name, (low, high)) in ranges {
            if low >= high {
                return Err(ConfigError::Invalid {
                    reason: format!("rules.{name} is empty ({low}..{high})"),
                });
            }
        }

        let (pct_low, pct_high) = self.penalty_pct_range;
        if pct_low >= pct_high || pct_high > 100 {
            return Err(ConfigError::Invalid {
                reason: format!("rules.penalty_pct_range must satisfy low < high <= 100 (got {pct_low}..{pct_high})"),
            });
        }
        let (yield_low, yield_high) = self.yield_bounds;
        if yield_low > yield_high {
            return Err(ConfigError::Invalid {
                reason: format!("rules.yield_bounds is inverted ({yield_low}..={yield_high})"),
            });
        }
        if self.stage_ticks.contains(&0) {
            return Err(ConfigError::Invalid {
                reason: "rules.stage_ticks entries must be at least 1".to_owned(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Headless engine settings
// ---------------------------------------------------------------------------

/// Auto-play behavior for the headless engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AutopilotConfig {
    /// Fix the lights automatically when they fail.
    #[serde(default = "default_true")]
    pub fix_lights: bool,
    /// How long the autopilot waits before fixing the lights.
    #[serde(default = "default_fix_lights_after_ms")]
    pub fix_lights_after_ms: u64,
}

impl Default for AutopilotConfig {
    fn default() -> Self {
        Self {
            fix_lights: true,
            fix_lights_after_ms: default_fix_lights_after_ms(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_true() -> bool {
    true
}

const fn default_base_tick_interval_ms() -> u64 {
    1000
}

const fn default_starting_speed() -> u8 {
    1
}

const fn default_harvest_callback_ms() -> u64 {
    2000
}

const fn default_death_callback_ms() -> u64 {
    3000
}

const fn default_fix_lights_after_ms() -> u64 {
    4000
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_selections() -> SelectionDraft {
    SelectionDraft {
        seed: Some(SeedId::CryptCookies),
        soil: Some(SoilId::BoneDust),
        defense: Some(DefenseId::Grower),
        feeding_schedule: FeedingDraft {
            sprout: Some(NutrientMixId::Basic),
            vegetative: Some(NutrientMixId::Growth),
            flowering: Some(NutrientMixId::Potent),
        },
    }
}
