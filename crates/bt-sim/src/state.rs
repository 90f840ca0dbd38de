//! Per-vehicle motion state.

use std::sync::Arc;

use bt_core::{GeoPoint, LineId, Timestamp, VehicleId, VehicleInfo, VehicleKind};

/// Traversal direction along a route.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum Direction {
    /// Towards higher waypoint indices (default).
    #[default]
    Forward,
    /// Towards lower waypoint indices.
    Backward,
}

impl Direction {
    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Direction::Forward  => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }

    /// `+1` or `-1`.
    #[inline]
    pub fn sign(self) -> i8 {
        match self {
            Direction::Forward  => 1,
            Direction::Backward => -1,
        }
    }

    /// The index one step from `index` in this direction, or `None` if that
    /// would leave `[0, len)`.
    #[inline]
    pub fn step_from(self, index: usize, len: usize) -> Option<usize> {
        match self {
            Direction::Forward  => (index + 1 < len).then_some(index + 1),
            Direction::Backward => index.checked_sub(1),
        }
    }
}

/// Where a vehicle is along its route.
///
/// The route is shared (`Arc<[GeoPoint]>`) and never mutated after
/// assignment, so snapshots clone it for free and a listener holding an old
/// snapshot always sees the path the vehicle is actually on.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionState {
    /// Waypoints, fixed at simulation start.
    pub route: Arc<[GeoPoint]>,

    /// The waypoint the vehicle occupies or is departing.
    pub route_index: usize,

    /// Direction of travel; flips at the route ends under ping-pong.
    pub direction: Direction,

    /// Fraction in `[0, 1)` of the way from `route[route_index]` to the next
    /// waypoint in `direction`.
    pub progress: f64,
}

impl MotionState {
    /// Fresh state at the first waypoint, heading forward.
    pub fn new(route: Arc<[GeoPoint]>) -> Self {
        Self {
            route,
            route_index: 0,
            direction:   Direction::Forward,
            progress:    0.0,
        }
    }

    /// `true` if the state can carry motion: at least two waypoints and an
    /// in-bounds index.
    #[inline]
    pub fn is_movable(&self) -> bool {
        self.route.len() >= 2 && self.route_index < self.route.len()
    }
}

/// A vehicle as the simulator tracks and reports it.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedVehicle {
    pub id:           VehicleId,
    pub name:         String,
    pub kind:         VehicleKind,
    pub line:         Option<LineId>,
    /// Display-only nominal speed.
    pub speed_kmh:    f64,
    /// Current position, rewritten every tick.
    pub location:     GeoPoint,
    /// Degrees clockwise from north, `[0, 360)`.
    pub heading:      f64,
    /// `None` for vehicles that never got a usable route; they stay put.
    pub motion:       Option<MotionState>,
    pub last_updated: Timestamp,
}

impl TrackedVehicle {
    /// A stationary vehicle at `info.location` with no route.
    pub fn stationary(info: VehicleInfo, now: Timestamp) -> Self {
        Self {
            id:           info.id,
            name:         info.name,
            kind:         info.kind,
            line:         info.line,
            speed_kmh:    info.speed_kmh,
            location:     info.location,
            heading:      0.0,
            motion:       None,
            last_updated: now,
        }
    }

    /// A vehicle bound to `route`, placed on its first waypoint and facing
    /// the second.
    ///
    /// Routes shorter than two points leave the vehicle stationary at its
    /// own location.
    pub fn on_route(info: VehicleInfo, route: Arc<[GeoPoint]>, now: Timestamp) -> Self {
        if route.len() < 2 {
            return Self::stationary(info, now);
        }
        let mut vehicle = Self::stationary(info, now);
        vehicle.location = route[0];
        vehicle.heading = route[0].bearing_deg(route[1]);
        vehicle.motion = Some(MotionState::new(route));
        vehicle
    }

    /// Assigned waypoints, if any.
    pub fn route(&self) -> Option<&[GeoPoint]> {
        self.motion.as_ref().map(|m| &*m.route)
    }

    /// `true` if the vehicle will move on the next tick.
    pub fn is_moving(&self) -> bool {
        self.motion.as_ref().is_some_and(MotionState::is_movable)
    }
}
