//! Synthetic fleet generation.

use bt_core::geo::random_point_within_radius;
use bt_core::{GeoPoint, LineId, SimRng, VehicleInfo, VehicleKind};
use bt_route::RouteTable;

const MIN_SPEED_KMH: f64 = 20.0;
const MAX_SPEED_KMH: f64 = 60.0;

/// Create `count` buses named `Bus 1..=count` with ids `bus-1..`.
///
/// Lines from `table` are dealt out round-robin in key order, and a lined
/// bus starts at its line's origin.  With an empty table every bus spawns at
/// a random point within `spawn_radius_km` of `center`.
pub fn generate_fleet(
    count:           usize,
    center:          GeoPoint,
    spawn_radius_km: f64,
    table:           &RouteTable,
    rng:             &mut SimRng,
) -> Vec<VehicleInfo> {
    let lines: Vec<&LineId> = table.lines().collect();

    (1..=count)
        .map(|n| {
            let speed = rng.gen_range(MIN_SPEED_KMH..=MAX_SPEED_KMH);
            let line = (!lines.is_empty()).then(|| lines[(n - 1) % lines.len()]);
            let location = match line.and_then(|l| table.get(l)) {
                Some(endpoints) => endpoints.origin,
                None => random_point_within_radius(center, spawn_radius_km, rng.inner()),
            };

            let info = VehicleInfo::new(format!("bus-{n}"), format!("Bus {n}"), location)
                .with_kind(VehicleKind::Bus)
                .with_speed(speed);
            match line {
                Some(l) => info.with_line(l.clone()),
                None => info,
            }
        })
        .collect()
}
