//! Headless engine binary for Cryptgrow.
//!
//! Runs one growth session end to end without a browser: the configured
//! selections are planted, the autopilot stands in for the player, and the
//! harvest score (or the plant's death) is logged when the session ends.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `cryptgrow-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Validate the configured selections
//! 4. Create the session and its outcome channel
//! 5. Start the autopilot and the session
//! 6. Wait for the outcome (or Ctrl-C)
//! 7. Stop the session and log the result

mod autopilot;
mod error;
mod outcome;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use cryptgrow_core::catalog;
use cryptgrow_core::config::GrowConfig;
use cryptgrow_core::session::GrowSession;
use cryptgrow_types::{GrowthStage, Selections};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::outcome::{OutcomeObserver, RunOutcome};

/// Environment variable naming an alternative config file.
const CONFIG_PATH_ENV: &str = "CRYPTGROW_CONFIG";

/// Default config file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "cryptgrow-config.yaml";

/// Application entry point for the headless engine.
///
/// # Errors
///
/// Returns an error if configuration, selections, or session startup fail.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let (config, config_path) = load_config()?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("cryptgrow-engine starting");
    let source = config_path
        .as_deref()
        .map_or_else(|| "built-in defaults".to_owned(), |p| p.display().to_string());
    info!(source = %source, "Configuration loaded");
    info!(
        base_tick_interval_ms = config.session.base_tick_interval_ms,
        starting_speed = config.session.starting_speed,
        rng_seed = ?config.session.rng_seed,
        autopilot = config.autopilot.fix_lights,
        "Session settings"
    );

    // 3. Validate selections.
    let selections = config.selections.complete().map_err(EngineError::from)?;
    info!(
        seed = catalog::seed(selections.seed).name,
        soil = catalog::soil(selections.soil).name,
        defense = catalog::defense(selections.defense).name,
        sprout = catalog::nutrient_mix(selections.feeding.sprout).name,
        vegetative = catalog::nutrient_mix(selections.feeding.vegetative).name,
        flowering = catalog::nutrient_mix(selections.feeding.flowering).name,
        "Selections validated"
    );
    log_profiles(&selections);

    // 4. Create the session.
    let (observer, mut outcomes) = OutcomeObserver::channel();
    let session = Arc::new(GrowSession::new(&selections, &config, Arc::new(observer)));

    // 5. Start the autopilot, then the session.
    let pilot = tokio::spawn(autopilot::run(
        Arc::clone(&session),
        config.autopilot.clone(),
    ));
    session.start().map_err(EngineError::from)?;

    // 6. Wait for the outcome.
    let outcome = tokio::select! {
        outcome = outcomes.recv() => outcome.ok_or(EngineError::NoOutcome),
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                warn!(error = %e, "failed to listen for Ctrl-C");
            }
            info!("Interrupted, abandoning the grow");
            session.stop();
            pilot.abort();
            return Ok(());
        }
    };

    // 7. Tear down and log.
    pilot.abort();
    session.stop();
    log_outcome(&session, outcome?);

    info!(session_id = %session.id(), "cryptgrow-engine shutdown complete");
    Ok(())
}

/// Load configuration from `CRYPTGROW_CONFIG` or `cryptgrow-config.yaml`.
///
/// Returns the path that was read, or `None` when defaults were used.
fn load_config() -> Result<(GrowConfig, Option<PathBuf>), EngineError> {
    let config_path = std::env::var_os(CONFIG_PATH_ENV)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    if Path::new(&config_path).exists() {
        let config = GrowConfig::from_file(&config_path)?;
        Ok((config, Some(config_path)))
    } else {
        let mut config = GrowConfig::default();
        config.session.apply_env_overrides();
        Ok((config, None))
    }
}

/// Log the catalog details behind each selection at debug level.
fn log_profiles(selections: &Selections) {
    let seed = catalog::seed(selections.seed);
    let soil = catalog::soil(selections.soil);
    let defense = catalog::defense(selections.defense);
    debug!(
        seed = seed.name,
        about = seed.description,
        water_drain = seed.water_drain,
        nutrient_drain = seed.nutrient_drain,
        "Seed profile"
    );
    debug!(
        soil = soil.name,
        about = soil.description,
        water_drain = soil.water_drain,
        nutrient_drain = soil.nutrient_drain,
        "Soil profile"
    );
    debug!(defense = defense.name, about = defense.description, "Defense profile");
    for stage in GrowthStage::GROWING {
        if let Some(id) = selections.feeding.mix_for(stage) {
            let mix = catalog::nutrient_mix(id);
            debug!(
                %stage,
                mix = mix.name,
                about = mix.description,
                potency = mix.potency,
                yield_factor = mix.yield_factor,
                nutrient_feed = mix.nutrient_feed,
                "Feeding plan"
            );
        }
    }
}

fn log_outcome(session: &GrowSession, outcome: RunOutcome) {
    let snapshot = session.snapshot();
    match outcome {
        RunOutcome::Harvested(result) => info!(
            potency = result.potency,
            yield_grams = result.yield_grams,
            pest_penalty = snapshot.modifiers.pest_penalty,
            raider_penalty = snapshot.modifiers.raider_penalty,
            potency_boost = snapshot.modifiers.potency_boost,
            "Harvest complete"
        ),
        RunOutcome::Died => warn!(
            stage = %snapshot.stage,
            progress_pct = snapshot.progress_pct,
            "Plant died before harvest"
        ),
    }

    for entry in snapshot.event_log.iter().rev() {
        info!(severity = ?entry.severity, at = %entry.timestamp, "{}", entry.message);
    }
    match serde_json::to_string(&snapshot) {
        Ok(json) => debug!(snapshot = %json, "Final snapshot"),
        Err(e) => warn!(error = %e, "failed to serialize final snapshot"),
    }
}
