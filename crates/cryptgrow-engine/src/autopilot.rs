//! Headless stand-in for the player.
//!
//! Watches the snapshot stream, reports stage changes and hazards, and
//! (when enabled) fixes failed lights after a configurable reaction delay.

use std::sync::Arc;
use std::time::Duration;

use cryptgrow_core::config::AutopilotConfig;
use cryptgrow_core::session::GrowSession;
use cryptgrow_types::{GameSnapshot, GrowthStage};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info};

/// What the autopilot saw on the previous snapshot.
#[derive(Debug, Default)]
struct Seen {
    stage: Option<GrowthStage>,
    hazard: bool,
}

/// Follow the session until its snapshot channel closes.
pub async fn run(session: Arc<GrowSession>, config: AutopilotConfig) {
    let mut rx = session.subscribe();
    let delay = Duration::from_millis(config.fix_lights_after_ms);
    let mut seen = Seen::default();

    loop {
        let snapshot = match rx.recv().await {
            Ok(snapshot) => snapshot,
            Err(RecvError::Lagged(skipped)) => {
                debug!(skipped, "autopilot lagged, skipping ahead");
                continue;
            }
            Err(RecvError::Closed) => break,
        };
        report(&snapshot, &mut seen);

        if config.fix_lights && !snapshot.lights_on && snapshot.is_growing {
            tokio::time::sleep(delay).await;
            if session.fix_lights() {
                info!(after_ms = config.fix_lights_after_ms, "autopilot fixed the lights");
            }
        }
    }
}

fn report(snapshot: &GameSnapshot, seen: &mut Seen) {
    if seen.stage != Some(snapshot.stage) {
        seen.stage = Some(snapshot.stage);
        info!(
            stage = %snapshot.stage,
            progress_pct = snapshot.progress_pct,
            health = snapshot.resources.health,
            mood = ?snapshot.mood,
            "stage reached"
        );
    }
    match (&snapshot.hazard, seen.hazard) {
        (Some(hazard), false) => {
            seen.hazard = true;
            info!(
                kind = ?hazard.kind,
                name = %hazard.name,
                damage = ?hazard.damage,
                blocked = hazard.blocked,
                "hazard spotted"
            );
        }
        (None, true) => seen.hazard = false,
        _ => {}
    }
}
