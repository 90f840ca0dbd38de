//! The `Route` value returned by every provider.

use bt_core::GeoPoint;

use crate::{RouteError, RouteResult};

/// A validated, ordered waypoint sequence plus the provider's totals.
///
/// Construction goes through [`Route::new`], so a `Route` always holds at
/// least one waypoint and every waypoint is finite.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    waypoints: Vec<GeoPoint>,
    /// Travel distance reported by the provider, in kilometres.
    pub distance_km: f64,
    /// Travel time reported by the provider, in minutes.
    pub duration_min: f64,
}

impl Route {
    /// Validate and wrap a waypoint list.
    ///
    /// # Errors
    ///
    /// [`RouteError::Empty`] for an empty list, [`RouteError::Malformed`] if
    /// any waypoint has a non-finite component.
    pub fn new(waypoints: Vec<GeoPoint>, distance_km: f64, duration_min: f64) -> RouteResult<Self> {
        if waypoints.is_empty() {
            return Err(RouteError::Empty);
        }
        if let Some(bad) = waypoints.iter().position(|p| !p.is_finite()) {
            return Err(RouteError::Malformed(format!("waypoint {bad} is not finite")));
        }
        Ok(Self { waypoints, distance_km, duration_min })
    }

    /// A direct two-point line from `origin` to `destination`, with duration
    /// derived from `speed_kmh`.
    pub fn straight_line(origin: GeoPoint, destination: GeoPoint, speed_kmh: f64) -> RouteResult<Self> {
        let distance_km = origin.distance_km(destination);
        let duration_min = if speed_kmh > 0.0 {
            distance_km / speed_kmh * 60.0
        } else {
            0.0
        };
        Self::new(vec![origin, destination], distance_km, duration_min)
    }

    #[inline]
    pub fn waypoints(&self) -> &[GeoPoint] {
        &self.waypoints
    }

    pub fn into_waypoints(self) -> Vec<GeoPoint> {
        self.waypoints
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Always `false`; kept for the `len`/`is_empty` convention.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// `true` if the route cannot carry motion (fewer than two waypoints).
    #[inline]
    pub fn is_trivial(&self) -> bool {
        self.waypoints.len() < 2
    }

    /// Sum of haversine lengths along the waypoints.
    pub fn path_length_km(&self) -> f64 {
        self.waypoints
            .windows(2)
            .map(|w| w[0].distance_km(w[1]))
            .sum()
    }
}
