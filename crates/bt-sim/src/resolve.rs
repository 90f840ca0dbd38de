//! Endpoint planning and concurrent route resolution.
//!
//! Every vehicle gets one provider call at simulation start.  Calls run
//! concurrently on a `JoinSet` and are all joined before the caller sees the
//! fleet, so the first tick moves every vehicle together.
//!
//! | Outcome                                  | Vehicle gets                  |
//! |------------------------------------------|-------------------------------|
//! | Provider route with ≥ 2 waypoints        | that route                    |
//! | Provider error, empty/1-point route, panic | straight line origin → dest |
//! | Non-finite location, origin or destination | no route (stationary)       |

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, warn};

use bt_core::geo::random_point_within_radius;
use bt_core::{GeoPoint, SimRng, Timestamp, VehicleInfo};
use bt_route::{Route, RouteProvider, RouteResult, RouteTable};

use crate::TrackedVehicle;

/// Origin and destination chosen for one vehicle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Endpoints {
    pub origin:      GeoPoint,
    pub destination: GeoPoint,
}

/// Choose where `vehicle` travels.
///
/// A vehicle whose line is in `table` uses that line's endpoints.  Any other
/// vehicle departs from its own location towards a random point within
/// `radius_km` of `reference`.  Returns `None` if the vehicle's own location
/// or either endpoint is not finite.
pub fn plan_endpoints(
    vehicle:   &VehicleInfo,
    table:     &RouteTable,
    reference: GeoPoint,
    radius_km: f64,
    rng:       &mut SimRng,
) -> Option<Endpoints> {
    if !vehicle.location.is_finite() {
        return None;
    }

    let endpoints = match vehicle.line.as_ref().and_then(|line| table.get(line)) {
        Some(line) => Endpoints {
            origin:      line.origin,
            destination: line.destination,
        },
        None => Endpoints {
            origin:      vehicle.location,
            destination: random_point_within_radius(reference, radius_km, rng.inner()),
        },
    };

    (endpoints.origin.is_finite() && endpoints.destination.is_finite()).then_some(endpoints)
}

/// Resolve a route for every vehicle and bind it, in input order.
///
/// Never fails: every per-vehicle problem degrades that vehicle alone (see
/// the module table).
pub async fn resolve_fleet<P: RouteProvider>(
    provider:  &Arc<P>,
    vehicles:  Vec<VehicleInfo>,
    table:     &RouteTable,
    reference: GeoPoint,
    radius_km: f64,
    rng:       &mut SimRng,
    now:       Timestamp,
) -> Vec<TrackedVehicle> {
    let plans: Vec<Option<Endpoints>> = vehicles
        .iter()
        .map(|v| plan_endpoints(v, table, reference, radius_km, rng))
        .collect();

    // ── Fan out ───────────────────────────────────────────────────────────
    let mut set: JoinSet<(usize, RouteResult<Route>)> = JoinSet::new();
    for (i, plan) in plans.iter().enumerate() {
        if let Some(ep) = *plan {
            let provider = Arc::clone(provider);
            set.spawn(async move { (i, provider.resolve(ep.origin, ep.destination).await) });
        }
    }

    // ── Join ──────────────────────────────────────────────────────────────
    let mut results: Vec<Option<RouteResult<Route>>> = (0..vehicles.len()).map(|_| None).collect();
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((i, result)) => results[i] = Some(result),
            // The slot stays `None` and falls back below.
            Err(e) => warn!(error = %e, "route resolution task failed"),
        }
    }

    // ── Bind ──────────────────────────────────────────────────────────────
    vehicles
        .into_iter()
        .zip(plans)
        .zip(results)
        .map(|((info, plan), result)| bind_route(info, plan, result, now))
        .collect()
}

fn bind_route(
    info:   VehicleInfo,
    plan:   Option<Endpoints>,
    result: Option<RouteResult<Route>>,
    now:    Timestamp,
) -> TrackedVehicle {
    let Some(ep) = plan else {
        warn!(vehicle = %info.id, location = %info.location, "no usable endpoints; vehicle stays put");
        return TrackedVehicle::stationary(info, now);
    };

    let waypoints = match result {
        Some(Ok(route)) if !route.is_trivial() => {
            debug!(vehicle = %info.id, waypoints = route.len(), "route resolved");
            route.into_waypoints()
        }
        Some(Ok(_)) => {
            warn!(vehicle = %info.id, "provider returned a single-point route; using straight line");
            vec![ep.origin, ep.destination]
        }
        Some(Err(e)) => {
            warn!(vehicle = %info.id, error = %e, "route resolution failed; using straight line");
            vec![ep.origin, ep.destination]
        }
        None => vec![ep.origin, ep.destination],
    };

    TrackedVehicle::on_route(info, Arc::from(waypoints), now)
}
