//! `MotionSimulator<P>`: owns one simulation at a time and drives it on a
//! tokio timer.
//!
//! Each `MotionSimulator` is an independent instance: the push server creates
//! one per connected client, so sessions never share vehicles or timers.
//!
//! # Concurrency
//!
//! The running [`Fleet`] and its observer live behind a mutex shared with a
//! single spawned timer task.  The task locks only for the synchronous
//! duration of one tick (never across an `.await`), so a tick is never
//! interrupted and a slow observer delays later ticks instead of overlapping
//! them.  Every `start` allocates a fresh session slot, so an aborted task
//! from an earlier start can never touch the new fleet.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use bt_core::{GeoPoint, MotionConfig, SimRng, Tick, Timestamp, VehicleId, VehicleInfo};
use bt_route::{RouteProvider, RouteTable};

use crate::resolve::resolve_fleet;
use crate::{Fleet, FleetObserver, SimError, SimResult, TrackedVehicle};

struct Session {
    fleet:    Fleet,
    observer: Box<dyn FleetObserver>,
}

type SharedSession = Arc<Mutex<Option<Session>>>;

/// Poisoning only happens when an observer panics after the fleet has
/// finished its tick, so the data is still usable.
fn lock(session: &SharedSession) -> MutexGuard<'_, Option<Session>> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The motion simulator.
///
/// Build one with [`SimulatorBuilder`][crate::SimulatorBuilder].
pub struct MotionSimulator<P: RouteProvider> {
    config:   MotionConfig,
    provider: Arc<P>,
    table:    Arc<RouteTable>,
    rng:      SimRng,
    session:  SharedSession,
    task:     Option<JoinHandle<()>>,
}

impl<P: RouteProvider> MotionSimulator<P> {
    pub(crate) fn from_parts(config: MotionConfig, provider: Arc<P>, table: Arc<RouteTable>) -> Self {
        Self {
            rng: SimRng::new(config.seed),
            config,
            provider,
            table,
            session: Arc::new(Mutex::new(None)),
            task: None,
        }
    }

    /// Start a new simulation, replacing any running one.
    ///
    /// Resolves every vehicle's route concurrently, then starts ticking all
    /// of them from the same boundary.  `reference` anchors synthesized
    /// destinations for vehicles without a known line.  Returns the initial
    /// state the observer also received through `on_start`.
    ///
    /// Per-vehicle routing problems never fail the call; only an invalid
    /// configuration, an empty fleet or duplicate ids do.
    pub async fn start<O: FleetObserver>(
        &mut self,
        vehicles:  Vec<VehicleInfo>,
        reference: GeoPoint,
        observer:  O,
    ) -> SimResult<Vec<TrackedVehicle>> {
        self.stop();

        self.config.validate()?;
        if vehicles.is_empty() {
            return Err(SimError::NoVehicles);
        }
        ensure_unique(&vehicles)?;

        let tracked = resolve_fleet(
            &self.provider,
            vehicles,
            &self.table,
            reference,
            self.config.destination_radius_km,
            &mut self.rng,
            Timestamp::now(),
        )
        .await;

        let fleet = Fleet::new(tracked, self.config.tick_interval_ms);
        let mut observer: Box<dyn FleetObserver> = Box::new(observer);
        observer.on_start(fleet.vehicles());
        let initial = fleet.snapshot();

        let session = Arc::new(Mutex::new(Some(Session { fleet, observer })));
        self.session = Arc::clone(&session);
        // First tick one full period after start, not immediately.
        let first_tick = Instant::now() + self.config.tick_interval();
        self.task = Some(tokio::spawn(run_ticks(session, self.config.clone(), first_tick)));

        info!(
            vehicles    = initial.len(),
            moving      = initial.iter().filter(|v| v.is_moving()).count(),
            interval_ms = self.config.tick_interval_ms,
            "simulation started"
        );
        Ok(initial)
    }

    /// Stop the running simulation and discard its vehicles.
    ///
    /// No tick fires after this returns.  Calling it with nothing running is
    /// a no-op.
    pub fn stop(&mut self) {
        let taken = lock(&self.session).take();
        if let Some(task) = self.task.take() {
            task.abort();
        }
        if let Some(mut session) = taken {
            let final_tick = session.fleet.current_tick();
            session.observer.on_stop(final_tick);
            info!(%final_tick, clock = %session.fleet.clock(), "simulation stopped");
        }
    }

    /// Copy of the current vehicle state; empty when nothing is running.
    pub fn snapshot(&self) -> Vec<TrackedVehicle> {
        lock(&self.session)
            .as_ref()
            .map(|s| s.fleet.snapshot())
            .unwrap_or_default()
    }

    /// Copy of one vehicle's current state.
    pub fn vehicle(&self, id: &VehicleId) -> Option<TrackedVehicle> {
        lock(&self.session)
            .as_ref()
            .and_then(|s| s.fleet.get(id).cloned())
    }

    pub fn is_running(&self) -> bool {
        lock(&self.session).is_some()
    }

    /// Ticks processed by the current simulation (`Tick::ZERO` when idle).
    pub fn tick_count(&self) -> Tick {
        lock(&self.session)
            .as_ref()
            .map_or(Tick::ZERO, |s| s.fleet.current_tick())
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }
}

impl<P: RouteProvider> Drop for MotionSimulator<P> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn ensure_unique(vehicles: &[VehicleInfo]) -> SimResult<()> {
    let mut seen = HashSet::with_capacity(vehicles.len());
    for v in vehicles {
        if !seen.insert(&v.id) {
            return Err(SimError::DuplicateVehicle(v.id.clone()));
        }
    }
    Ok(())
}

// ── Timer task ────────────────────────────────────────────────────────────────

async fn run_ticks(session: SharedSession, config: MotionConfig, first_tick: Instant) {
    let mut interval = time::interval_at(first_tick, config.tick_interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        if !tick_once(&session, &config) {
            break;
        }
    }
    debug!("tick loop exited");
}

/// Run one tick; `false` once the session has been cleared.
fn tick_once(session: &SharedSession, config: &MotionConfig) -> bool {
    let mut guard = lock(session);
    let Some(s) = guard.as_mut() else {
        return false;
    };
    let summary = s.fleet.tick(config.progress_step, config.end_policy, Timestamp::now());
    s.observer.on_tick(summary.tick, s.fleet.vehicles());
    true
}
