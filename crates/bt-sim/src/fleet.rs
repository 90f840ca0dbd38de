//! The `Fleet`: the simulated vehicle collection and its tick handler.

use bt_core::{EndPolicy, SimClock, Tick, Timestamp, VehicleId};
use tracing::trace;

use crate::TrackedVehicle;

#[cfg(feature = "fx-hash")]
type IdMap<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fx-hash"))]
type IdMap<K, V> = std::collections::HashMap<K, V>;

/// Counts reported for one processed tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TickSummary {
    pub tick:       Tick,
    /// Vehicles whose position was updated.
    pub moved:      usize,
    /// Vehicles passed through unchanged (no route, or unusable route).
    pub stationary: usize,
}

/// Holds every vehicle of one simulation, in input order.
///
/// `Fleet` is synchronous.  The simulator owns one behind a mutex and calls
/// [`Fleet::tick`] from its timer task; tests drive it directly.
#[derive(Debug, Clone)]
pub struct Fleet {
    vehicles: Vec<TrackedVehicle>,
    index:    IdMap<VehicleId, usize>,
    clock:    SimClock,
}

impl Fleet {
    /// Wrap `vehicles`.  Ids are expected to be unique; with duplicates,
    /// [`Fleet::get`] finds the last one.
    pub fn new(vehicles: Vec<TrackedVehicle>, tick_interval_ms: u64) -> Self {
        let index = vehicles
            .iter()
            .enumerate()
            .map(|(i, v)| (v.id.clone(), i))
            .collect();
        Self {
            vehicles,
            index,
            clock: SimClock::new(tick_interval_ms),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Read-only view of the current state.
    #[inline]
    pub fn vehicles(&self) -> &[TrackedVehicle] {
        &self.vehicles
    }

    pub fn get(&self, id: &VehicleId) -> Option<&TrackedVehicle> {
        self.index.get(id).map(|&i| &self.vehicles[i])
    }

    /// The last tick processed (`Tick::ZERO` before the first).
    #[inline]
    pub fn current_tick(&self) -> Tick {
        self.clock.current_tick
    }

    #[inline]
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Owned copy of every vehicle.  Routes are shared immutably, so the
    /// copy costs one allocation per name plus a refcount bump per route.
    pub fn snapshot(&self) -> Vec<TrackedVehicle> {
        self.vehicles.clone()
    }

    /// Advance every movable vehicle by one tick.
    ///
    /// Vehicles without a usable route are passed through unchanged.
    pub fn tick(&mut self, step: f64, policy: EndPolicy, now: Timestamp) -> TickSummary {
        let tick = self.clock.advance();
        let mut moved = 0;

        for vehicle in &mut self.vehicles {
            let Some(motion) = vehicle.motion.as_mut() else {
                continue;
            };
            let Some(pose) = motion.advance(step, policy) else {
                continue;
            };
            vehicle.location = pose.location;
            vehicle.heading = pose.heading;
            vehicle.last_updated = now;
            moved += 1;
        }

        let summary = TickSummary {
            tick,
            moved,
            stationary: self.vehicles.len() - moved,
        };
        trace!(%tick, moved, stationary = summary.stationary, "fleet tick");
        summary
    }
}
