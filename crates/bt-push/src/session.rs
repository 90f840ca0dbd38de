//! One connected client's simulation.
//!
//! A `Session` owns its own [`MotionSimulator`], so clients never see each
//! other's buses.  Tick batches leave the simulator through a
//! [`WatchObserver`] into a `tokio::sync::watch` channel: the socket task
//! always forwards the latest batch, and a slow client skips stale ones
//! instead of queueing them.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};

use bt_core::{GeoPoint, MotionConfig, SimRng, Tick};
use bt_route::{RouteProvider, RouteTable};
use bt_sim::{FleetObserver, MotionSimulator, SimulatorBuilder, TrackedVehicle};

use crate::wire::{ClientMessage, ServerMessage, VehicleDto};
use crate::{PushError, PushResult, ServerConfig, generate_fleet};

type UpdateSender = Arc<watch::Sender<Option<ServerMessage>>>;

/// Publishes every tick as a [`ServerMessage::Update`].
pub struct WatchObserver {
    tx: UpdateSender,
}

impl FleetObserver for WatchObserver {
    fn on_tick(&mut self, tick: Tick, vehicles: &[TrackedVehicle]) {
        let update = ServerMessage::Update {
            tick,
            vehicles: VehicleDto::list(vehicles, false),
        };
        self.tx.send_replace(Some(update));
    }
}

pub struct Session<P: RouteProvider> {
    id:     u64,
    sim:    MotionSimulator<P>,
    table:  Arc<RouteTable>,
    config: Arc<ServerConfig>,
    rng:    SimRng,
    tx:     UpdateSender,
}

impl<P: RouteProvider> Session<P> {
    /// Create session `id`.  Its random stream is derived from the
    /// configured seed and `id`, so two sessions spawn different fleets.
    pub fn new(
        id:       u64,
        provider: Arc<P>,
        table:    Arc<RouteTable>,
        config:   Arc<ServerConfig>,
    ) -> PushResult<Self> {
        let mut rng = SimRng::new(config.motion.seed).child(id);
        let motion = MotionConfig {
            seed: rng.random(),
            ..config.motion.clone()
        };
        let sim = SimulatorBuilder::with_shared_provider(provider)
            .config(motion)
            .table(Arc::clone(&table))
            .build()?;
        let (tx, _) = watch::channel(None);

        Ok(Self {
            id,
            sim,
            table,
            config,
            rng,
            tx: Arc::new(tx),
        })
    }

    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// A receiver for tick updates.  Holds `None` until the first tick and
    /// again after every start or stop.
    pub fn subscribe(&self) -> watch::Receiver<Option<ServerMessage>> {
        self.tx.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.sim.is_running()
    }

    /// Answer one client request.
    pub async fn handle(&mut self, message: ClientMessage) -> ServerMessage {
        match message {
            ClientMessage::Start { location, count } => match self.start(location, count).await {
                Ok(vehicles) => ServerMessage::Started {
                    vehicles: VehicleDto::list(&vehicles, true),
                },
                Err(e) => ServerMessage::error(e),
            },
            ClientMessage::Stop => {
                self.close();
                ServerMessage::Stopped
            }
            ClientMessage::Snapshot => ServerMessage::Snapshot {
                vehicles: VehicleDto::list(&self.sim.snapshot(), true),
            },
        }
    }

    async fn start(&mut self, location: GeoPoint, count: Option<usize>) -> PushResult<Vec<TrackedVehicle>> {
        if !location.is_finite() {
            return Err(PushError::BadRequest(format!("unusable start location {location}")));
        }
        let count = self.config.fleet_count(count);
        let vehicles = generate_fleet(count, location, self.config.spawn_radius_km, &self.table, &mut self.rng);
        debug!(session = self.id, count, %location, "starting simulation");

        // Stop first so a late tick from the old fleet cannot land after the
        // cleared channel.
        self.sim.stop();
        self.tx.send_replace(None);

        let observer = WatchObserver { tx: Arc::clone(&self.tx) };
        let initial = self.sim.start(vehicles, location, observer).await?;
        info!(session = self.id, vehicles = initial.len(), "session started");
        Ok(initial)
    }

    /// Stop the simulation, if any, and clear pending updates.
    pub fn close(&mut self) {
        if self.sim.is_running() {
            info!(session = self.id, "session stopped");
        }
        self.sim.stop();
        self.tx.send_replace(None);
    }
}
