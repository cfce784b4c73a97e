//! The async growth session runtime.
//!
//! A [`GrowSession`] owns one [`GameState`] and drives it in real time:
//!
//! - **Tick loop**: a single tokio task that ticks every
//!   `base_tick_interval_ms / speed` and rebuilds its interval when the
//!   speed changes
//! - **Deferred tasks**: one-shot timers for hazard resolution and for the
//!   completion and death callbacks
//! - **Controls**: pause, resume, speed, fix lights and stop, applied
//!   between ticks under the state lock
//! - **Snapshots**: a [`GameSnapshot`] is broadcast after every tick,
//!   control action and hazard resolution
//!
//! Every task lives in the session's [`TaskSet`]. [`GrowSession::stop`]
//! (and dropping the session) cancels all of them. Tasks re-check the
//! cancelled flag under the state lock, and observer callbacks are
//! delivered under a gate that `stop` waits on, so nothing fires once
//! `stop` has returned.

use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::Duration;

use cryptgrow_types::{GameSnapshot, GameSpeed, HarvestResult, LogSeverity, Selections, SessionId};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tokio::runtime::{Handle, TryCurrentError};
use tokio::sync::{broadcast, watch};
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::config::{DelayConfig, GrowConfig, GrowthRules, SessionConfig};
use crate::hazard::{self, HazardStart};
use crate::resources;
use crate::state::GameState;
use crate::tasks::TaskSet;
use crate::tick::{self, TickOutcome};

/// Capacity of the snapshot broadcast channel.
const SNAPSHOT_CHANNEL_CAPACITY: usize = 64;

/// Errors from session lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// `start` was called twice.
    #[error("session {0} has already been started")]
    AlreadyStarted(SessionId),

    /// The session was stopped and cannot be restarted.
    #[error("session {0} has been stopped")]
    Stopped(SessionId),

    /// `start` was called outside a tokio runtime.
    #[error("no tokio runtime available to drive the session: {source}")]
    NoRuntime {
        /// The underlying runtime lookup error.
        #[from]
        source: TryCurrentError,
    },
}

/// Receives the end-of-run callbacks.
///
/// Exactly one of the two methods is called per session, at most once,
/// after its configured delay. Neither is called after the session stops.
///
/// [`GrowSession::stop`] waits for a callback that is being delivered, so
/// a callback must not stop or drop its own session.
pub trait SessionObserver: Send + Sync {
    /// Called after a successful harvest.
    fn on_complete(&self, result: HarvestResult);

    /// Called after the plant died.
    fn on_plant_died(&self);
}

/// An observer that ignores both callbacks.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl SessionObserver for NoOpObserver {
    fn on_complete(&self, _result: HarvestResult) {}

    fn on_plant_died(&self) {}
}

struct Inner {
    state: GameState,
    rng: SmallRng,
    origin: Option<Instant>,
}

impl Inner {
    /// Milliseconds since `start`, on the tokio clock.
    fn now_ms(&self) -> u64 {
        self.origin.map_or(0, |origin| {
            u64::try_from(origin.elapsed().as_millis()).unwrap_or(u64::MAX)
        })
    }
}

struct Shared {
    id: SessionId,
    inner: Mutex<Inner>,
    rules: GrowthRules,
    timing: SessionConfig,
    delays: DelayConfig,
    tasks: TaskSet,
    runtime: OnceLock<Handle>,
    snapshots: broadcast::Sender<GameSnapshot>,
    speed_tx: watch::Sender<GameSpeed>,
    observer: Arc<dyn SessionObserver>,
    /// Held while an observer callback runs. `true` once one was delivered.
    delivery: Mutex<bool>,
}

/// A running (or ready to run) growth session.
///
/// Dropping the session cancels its tick loop and every pending callback.
pub struct GrowSession {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for GrowSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrowSession")
            .field("id", &self.shared.id)
            .field("cancelled", &self.shared.tasks.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl GrowSession {
    /// Prepare a session for validated selections. Nothing runs until
    /// [`start`](Self::start).
    pub fn new(
        selections: &Selections,
        config: &GrowConfig,
        observer: Arc<dyn SessionObserver>,
    ) -> Self {
        let speed = config.session.starting_speed();
        let mut state = GameState::new(selections, &config.rules);
        state.speed = speed;
        let rng = config
            .session
            .rng_seed
            .map_or_else(SmallRng::from_os_rng, SmallRng::seed_from_u64);
        let (snapshots, _) = broadcast::channel(SNAPSHOT_CHANNEL_CAPACITY);
        let (speed_tx, _) = watch::channel(speed);

        Self {
            shared: Arc::new(Shared {
                id: SessionId::new(),
                inner: Mutex::new(Inner {
                    state,
                    rng,
                    origin: None,
                }),
                rules: config.rules.clone(),
                timing: config.session.clone(),
                delays: config.delays.clone(),
                tasks: TaskSet::new(),
                runtime: OnceLock::new(),
                snapshots,
                speed_tx,
                observer,
                delivery: Mutex::new(false),
            }),
        }
    }

    /// This session's identifier.
    pub fn id(&self) -> SessionId {
        self.shared.id
    }

    /// Begin growing and spawn the tick loop on the current runtime.
    pub fn start(&self) -> Result<(), SessionError> {
        let runtime = Handle::try_current()?;
        let shared = &self.shared;
        let snapshot = {
            let mut inner = shared.lock();
            if shared.tasks.is_cancelled() {
                return Err(SessionError::Stopped(shared.id));
            }
            if inner.origin.is_some() {
                return Err(SessionError::AlreadyStarted(shared.id));
            }
            inner.origin = Some(Instant::now());
            let state = &mut inner.state;
            state.is_growing = true;
            state.is_paused = false;
            state.feed_ticks = 0;
            state.log("Game started! Your plant begins to grow.", LogSeverity::Info);
            state.snapshot(shared.id)
        };

        let runtime = shared.runtime.get_or_init(|| runtime);
        let speed_rx = shared.speed_tx.subscribe();
        shared
            .tasks
            .spawn(runtime, run_ticks(Arc::clone(shared), speed_rx));

        info!(
            session_id = %shared.id,
            seed = %snapshot.seed,
            soil = %snapshot.soil,
            defense = %snapshot.defense,
            speed = u8::from(snapshot.speed),
            "growth session started"
        );
        shared.publish(snapshot);
        Ok(())
    }

    /// Stop advancing ticks until [`resume`](Self::resume).
    pub fn pause(&self) {
        self.update_paused(|_| true);
    }

    /// Resume ticking after [`pause`](Self::pause).
    pub fn resume(&self) {
        self.update_paused(|_| false);
    }

    /// Flip the paused flag. Returns the new value.
    pub fn toggle_pause(&self) -> bool {
        self.update_paused(|paused| !paused)
    }

    fn update_paused(&self, f: impl FnOnce(bool) -> bool) -> bool {
        let (paused, snapshot) = {
            let mut inner = self.shared.lock();
            inner.state.is_paused = f(inner.state.is_paused);
            (inner.state.is_paused, inner.state.snapshot(self.shared.id))
        };
        debug!(session_id = %self.shared.id, paused, "pause toggled");
        self.shared.publish(snapshot);
        paused
    }

    /// Change the drain multiplier and the tick period immediately.
    pub fn set_speed(&self, speed: GameSpeed) {
        self.update_speed(|_| speed);
    }

    /// Step the speed 1 → 2 → 3 → 1. Returns the new speed.
    pub fn cycle_speed(&self) -> GameSpeed {
        self.update_speed(GameSpeed::cycled)
    }

    fn update_speed(&self, f: impl FnOnce(GameSpeed) -> GameSpeed) -> GameSpeed {
        let (speed, snapshot) = {
            let mut inner = self.shared.lock();
            let speed = f(inner.state.speed);
            inner.state.speed = speed;
            // Sent under the lock so the tick loop sees changes in order.
            self.shared.speed_tx.send_replace(speed);
            (speed, inner.state.snapshot(self.shared.id))
        };
        info!(session_id = %self.shared.id, speed = u8::from(speed), "game speed changed");
        self.shared.publish(snapshot);
        speed
    }

    /// Turn the lights back on. Returns `false` if they were already on.
    pub fn fix_lights(&self) -> bool {
        let snapshot = {
            let mut inner = self.shared.lock();
            if !resources::fix_lights(&mut inner.state) {
                return false;
            }
            inner.state.snapshot(self.shared.id)
        };
        self.shared.publish(snapshot);
        true
    }

    /// Cancel the tick loop and every pending callback. Idempotent.
    pub fn stop(&self) {
        self.shared.stop();
    }

    /// Whether the session has been stopped.
    pub fn is_stopped(&self) -> bool {
        self.shared.tasks.is_cancelled()
    }

    /// The current render snapshot.
    pub fn snapshot(&self) -> GameSnapshot {
        self.shared.lock().state.snapshot(self.shared.id)
    }

    /// Receive a snapshot after every state change.
    pub fn subscribe(&self) -> broadcast::Receiver<GameSnapshot> {
        self.shared.snapshots.subscribe()
    }
}

impl Drop for GrowSession {
    fn drop(&mut self) {
        self.shared.stop();
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, snapshot: GameSnapshot) {
        // Zero receivers is not an error.
        self.snapshots.send(snapshot).unwrap_or(0);
    }

    fn stop(&self) {
        let aborted = {
            let mut inner = self.lock();
            if self.tasks.is_cancelled() {
                None
            } else {
                inner.state.is_growing = false;
                Some(self.tasks.cancel_all())
            }
        };
        // Wait out a callback that is mid-delivery, on every call.
        drop(self.delivery.lock().unwrap_or_else(PoisonError::into_inner));
        if let Some(aborted) = aborted {
            info!(session_id = %self.id, aborted, "growth session stopped");
        }
    }

    /// Deliver the end-of-run callback unless the session stopped or one
    /// was already delivered.
    fn deliver(&self, notify: impl FnOnce(&dyn SessionObserver)) {
        let mut delivered = self.delivery.lock().unwrap_or_else(PoisonError::into_inner);
        if *delivered || self.tasks.is_cancelled() {
            return;
        }
        *delivered = true;
        notify(self.observer.as_ref());
    }

    /// Whether the session is still live. Callers hold the state lock.
    fn live(&self, _inner: &Inner) -> bool {
        !self.tasks.is_cancelled()
    }

    fn spawn<F>(&self, future: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        if let Some(runtime) = self.runtime.get() {
            self.tasks.spawn(runtime, future);
        }
    }

    /// Run one tick. Returns `false` once the loop should end.
    fn on_tick(self: &Arc<Self>) -> bool {
        let (report, snapshot, origin) = {
            let mut inner = self.lock();
            if !self.live(&inner) {
                return false;
            }
            let now_ms = inner.now_ms();
            let Inner { state, rng, origin } = &mut *inner;
            let report = tick::tick(state, &self.rules, now_ms, rng);
            if report.outcome == TickOutcome::Skipped {
                return state.is_growing;
            }
            (report, state.snapshot(self.id), *origin)
        };
        self.publish(snapshot);

        if let (Some(start), Some(origin)) = (report.hazard_started, origin) {
            self.schedule_hazard(start, origin);
        }
        match report.outcome {
            TickOutcome::Harvested(result) => {
                self.schedule_complete(result);
                false
            }
            TickOutcome::Died => {
                self.schedule_death();
                false
            }
            TickOutcome::Skipped | TickOutcome::Continued | TickOutcome::StageAdvanced(_) => true,
        }
    }

    fn schedule_hazard(self: &Arc<Self>, start: HazardStart, origin: Instant) {
        let deadline = origin
            .checked_add(Duration::from_millis(start.resolves_at_ms))
            .unwrap_or_else(Instant::now);
        let shared = Arc::clone(self);
        self.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            shared.resolve_hazard();
        });
    }

    fn resolve_hazard(&self) {
        let snapshot = {
            let mut inner = self.lock();
            if !self.live(&inner) {
                return;
            }
            let Inner { state, rng, .. } = &mut *inner;
            if hazard::resolve_hazard(state, &self.rules, rng).is_none() {
                return;
            }
            state.snapshot(self.id)
        };
        self.publish(snapshot);
    }

    fn schedule_complete(self: &Arc<Self>, result: HarvestResult) {
        let shared = Arc::clone(self);
        let delay = self.delays.harvest();
        self.spawn(async move {
            tokio::time::sleep(delay).await;
            shared.deliver(|observer| {
                info!(
                    session_id = %shared.id,
                    potency = result.potency,
                    yield_grams = result.yield_grams,
                    "harvest complete"
                );
                observer.on_complete(result);
            });
        });
    }

    fn schedule_death(self: &Arc<Self>) {
        let shared = Arc::clone(self);
        let delay = self.delays.death();
        self.spawn(async move {
            tokio::time::sleep(delay).await;
            shared.deliver(|observer| {
                info!(session_id = %shared.id, "plant died, returning to menu");
                observer.on_plant_died();
            });
        });
    }
}

fn tick_interval(timing: &SessionConfig, speed: GameSpeed) -> Interval {
    let period = timing.tick_period(speed);
    let now = Instant::now();
    let first = now.checked_add(period).unwrap_or(now);
    let mut interval = tokio::time::interval_at(first, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

/// The tick loop. Ends on harvest, death, or when the speed channel
/// closes; stop aborts it.
async fn run_ticks(shared: Arc<Shared>, mut speed_rx: watch::Receiver<GameSpeed>) {
    let mut interval = tick_interval(&shared.timing, *speed_rx.borrow_and_update());
    loop {
        tokio::select! {
            _ = interval.tick() => {
                if !shared.on_tick() {
                    break;
                }
            }
            changed = speed_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let speed = *speed_rx.borrow_and_update();
                interval = tick_interval(&shared.timing, speed);
                debug!(session_id = %shared.id, period = ?shared.timing.tick_period(speed), "tick interval rebuilt");
            }
        }
    }
    debug!(session_id = %shared.id, "tick loop finished");
}
