//! Tests for bt-sim.
//!
//! Timer-driven tests run on a paused tokio clock, so tick counts are exact.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use bt_core::{GeoPoint, Tick, Timestamp, VehicleInfo};
use bt_route::{Route, RouteError, RouteProvider, RouteResult};

use crate::{FleetObserver, TrackedVehicle};

// ── Helpers ───────────────────────────────────────────────────────────────────

const EPS: f64 = 1e-9;

fn p(lat: f64, lon: f64) -> GeoPoint {
    GeoPoint::new(lat, lon)
}

fn assert_at(actual: GeoPoint, expected: GeoPoint) {
    assert!(
        (actual.lat - expected.lat).abs() < EPS && (actual.lon - expected.lon).abs() < EPS,
        "expected {expected}, got {actual}"
    );
}

/// `(0,0) → (0,1) → (1,1)`: east, then north.
fn l_route() -> Arc<[GeoPoint]> {
    Arc::from(vec![p(0.0, 0.0), p(0.0, 1.0), p(1.0, 1.0)])
}

fn bus(id: &str, location: GeoPoint) -> VehicleInfo {
    VehicleInfo::new(id, format!("Bus {id}"), location)
}

/// Always fails.
struct FailingProvider;

impl RouteProvider for FailingProvider {
    fn resolve(
        &self,
        _origin:      GeoPoint,
        _destination: GeoPoint,
    ) -> impl Future<Output = RouteResult<Route>> + Send {
        async {
            Err(RouteError::Provider {
                status:  "OVER_QUERY_LIMIT".into(),
                message: "quota exhausted".into(),
            })
        }
    }
}

/// Answers with the origin alone.
struct SinglePointProvider;

impl RouteProvider for SinglePointProvider {
    fn resolve(
        &self,
        origin:       GeoPoint,
        _destination: GeoPoint,
    ) -> impl Future<Output = RouteResult<Route>> + Send {
        async move { Route::new(vec![origin], 0.0, 0.0) }
    }
}

/// Answers with a three-point dog-leg through `(origin.lat, dest.lon)`.
struct DogLegProvider {
    calls: AtomicUsize,
}

impl RouteProvider for DogLegProvider {
    fn resolve(
        &self,
        origin:      GeoPoint,
        destination: GeoPoint,
    ) -> impl Future<Output = RouteResult<Route>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let corner = GeoPoint::new(origin.lat, destination.lon);
        async move { Route::new(vec![origin, corner, destination], 0.0, 0.0) }
    }
}

#[derive(Default, Clone)]
struct Recording {
    started: Arc<AtomicUsize>,
    ticks:   Arc<Mutex<Vec<(Tick, usize)>>>,
    stops:   Arc<Mutex<Vec<Tick>>>,
    last:    Arc<Mutex<Vec<TrackedVehicle>>>,
}

impl Recording {
    fn ticks(&self) -> Vec<(Tick, usize)> {
        self.ticks.lock().unwrap().clone()
    }

    fn stops(&self) -> Vec<Tick> {
        self.stops.lock().unwrap().clone()
    }

    fn last_batch(&self) -> Vec<TrackedVehicle> {
        self.last.lock().unwrap().clone()
    }
}

impl FleetObserver for Recording {
    fn on_start(&mut self, _vehicles: &[TrackedVehicle]) {
        self.started.fetch_add(1, Ordering::SeqCst);
    }

    fn on_tick(&mut self, tick: Tick, vehicles: &[TrackedVehicle]) {
        self.ticks.lock().unwrap().push((tick, vehicles.len()));
        *self.last.lock().unwrap() = vehicles.to_vec();
    }

    fn on_stop(&mut self, final_tick: Tick) {
        self.stops.lock().unwrap().push(final_tick);
    }
}

// ── Direction ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod direction {
    use crate::Direction;

    #[test]
    fn step_from_bounds() {
        assert_eq!(Direction::Forward.step_from(0, 3), Some(1));
        assert_eq!(Direction::Forward.step_from(2, 3), None);
        assert_eq!(Direction::Backward.step_from(2, 3), Some(1));
        assert_eq!(Direction::Backward.step_from(0, 3), None);
    }

    #[test]
    fn flip_and_sign() {
        assert_eq!(Direction::Forward.flipped(), Direction::Backward);
        assert_eq!(Direction::Backward.flipped().sign(), 1);
        assert_eq!(Direction::Backward.sign(), -1);
    }
}

// ── Motion ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod motion {
    use super::*;
    use bt_core::{EndPolicy, MotionConfig};
    use crate::{Direction, MotionState};

    #[test]
    fn l_route_half_steps() {
        let mut m = MotionState::new(l_route());

        let pose = m.advance(0.5, EndPolicy::PingPong).unwrap();
        assert_at(pose.location, p(0.0, 0.5));
        assert!((pose.heading - 90.0).abs() < EPS);
        assert_eq!(m.route_index, 0);

        let pose = m.advance(0.5, EndPolicy::PingPong).unwrap();
        assert_at(pose.location, p(0.0, 1.0));
        assert_eq!(m.route_index, 1);
        assert_eq!(m.direction, Direction::Forward);
        assert_eq!(m.progress, 0.0);

        let pose = m.advance(0.5, EndPolicy::PingPong).unwrap();
        assert_at(pose.location, p(0.5, 1.0));
        assert!(pose.heading.abs() < EPS);

        let pose = m.advance(0.5, EndPolicy::PingPong).unwrap();
        assert_at(pose.location, p(1.0, 1.0));
        assert_eq!(m.route_index, 2);
        // Reversal is visible on the arrival tick itself.
        assert_eq!(m.direction, Direction::Backward);

        let pose = m.advance(0.5, EndPolicy::PingPong).unwrap();
        assert_at(pose.location, p(0.5, 1.0));
        assert!((pose.heading - 180.0).abs() < EPS);
    }

    #[test]
    fn two_point_route_takes_ceil_inverse_step_ticks() {
        let a = p(40.0, -3.0);
        let b = p(40.1, -3.1);
        for step in [0.1, 0.25, 0.3, 0.02, 1.0, 1.0 / 3.0, 1.0 / 7.0] {
            let n = MotionConfig { progress_step: step, ..Default::default() }.ticks_per_segment();
            let mut m = MotionState::new(Arc::from(vec![a, b]));

            for _ in 0..n - 1 {
                m.advance(step, EndPolicy::PingPong).unwrap();
            }
            assert_eq!(m.route_index, 0, "step {step} arrived early");

            let pose = m.advance(step, EndPolicy::PingPong).unwrap();
            assert_eq!(pose.location, b, "step {step}");
            assert_eq!(m.route_index, 1);
            assert_eq!(m.direction, Direction::Backward);

            // And the same count back again.
            for _ in 0..n {
                m.advance(step, EndPolicy::PingPong).unwrap();
            }
            assert_eq!(m.route_index, 0, "step {step}");
            assert_eq!(m.direction, Direction::Forward);
        }
    }

    #[test]
    fn ping_pong_never_leaves_route_bounds() {
        let mut m = MotionState::new(l_route());
        for _ in 0..1_000 {
            m.advance(0.3, EndPolicy::PingPong).unwrap();
            assert!(m.route_index < 3);
            assert!((0.0..1.0).contains(&m.progress));
        }
    }

    #[test]
    fn loop_to_start_snaps_back() {
        let mut m = MotionState::new(l_route());
        m.advance(1.0, EndPolicy::LoopToStart).unwrap();
        m.advance(1.0, EndPolicy::LoopToStart).unwrap();
        assert_eq!(m.route_index, 2);
        assert_eq!(m.direction, Direction::Forward);

        let pose = m.advance(1.0, EndPolicy::LoopToStart).unwrap();
        assert_eq!(pose.location, p(0.0, 0.0));
        assert!((pose.heading - 90.0).abs() < EPS);
        assert_eq!(m.route_index, 0);

        m.advance(1.0, EndPolicy::LoopToStart).unwrap();
        assert_eq!(m.route_index, 1);
    }

    #[test]
    fn out_of_range_next_flips_and_continues() {
        // Parked at the far end still facing forward.
        let mut m = MotionState::new(l_route());
        m.route_index = 2;

        let pose = m.advance(0.5, EndPolicy::PingPong).unwrap();
        assert_eq!(m.direction, Direction::Backward);
        assert_at(pose.location, p(0.5, 1.0));
    }

    #[test]
    fn corrupt_index_is_left_alone() {
        let mut m = MotionState::new(l_route());
        m.route_index = 7;
        let before = m.clone();
        assert!(m.advance(0.5, EndPolicy::PingPong).is_none());
        assert_eq!(m, before);
    }

    #[test]
    fn single_point_route_cannot_move() {
        let mut m = MotionState::new(Arc::from(vec![p(1.0, 1.0)]));
        assert!(!m.is_movable());
        assert!(m.advance(0.5, EndPolicy::PingPong).is_none());
    }
}

// ── TrackedVehicle ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tracked {
    use super::*;

    #[test]
    fn on_route_starts_at_first_waypoint() {
        let v = TrackedVehicle::on_route(bus("1", p(9.0, 9.0)), l_route(), Timestamp(5));
        assert_eq!(v.location, p(0.0, 0.0));
        assert!((v.heading - 90.0).abs() < EPS);
        assert!(v.is_moving());
        assert_eq!(v.route().map(<[GeoPoint]>::len), Some(3));
        assert_eq!(v.last_updated, Timestamp(5));
    }

    #[test]
    fn short_route_leaves_vehicle_stationary() {
        let home = p(9.0, 9.0);
        let v = TrackedVehicle::on_route(bus("1", home), Arc::from(vec![p(0.0, 0.0)]), Timestamp(0));
        assert_eq!(v.location, home);
        assert!(v.motion.is_none());
        assert!(!v.is_moving());
    }
}

// ── Fleet ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod fleet {
    use super::*;
    use bt_core::{EndPolicy, VehicleId};
    use crate::Fleet;

    fn two_vehicle_fleet() -> Fleet {
        let moving = TrackedVehicle::on_route(bus("a", p(0.0, 0.0)), l_route(), Timestamp(0));
        let parked = TrackedVehicle::stationary(bus("b", p(5.0, 5.0)), Timestamp(0));
        Fleet::new(vec![moving, parked], 50)
    }

    #[test]
    fn tick_moves_only_routed_vehicles() {
        let mut fleet = two_vehicle_fleet();
        let summary = fleet.tick(0.5, EndPolicy::PingPong, Timestamp(100));

        assert_eq!(summary.tick, Tick(1));
        assert_eq!(summary.moved, 1);
        assert_eq!(summary.stationary, 1);

        let a = fleet.get(&VehicleId::from("a")).unwrap();
        assert_at(a.location, p(0.0, 0.5));
        assert_eq!(a.last_updated, Timestamp(100));

        let b = fleet.get(&VehicleId::from("b")).unwrap();
        assert_eq!(b.location, p(5.0, 5.0));
        assert_eq!(b.last_updated, Timestamp(0));
    }

    #[test]
    fn corrupt_vehicle_does_not_halt_fleet() {
        let mut fleet = two_vehicle_fleet();
        let mut broken = TrackedVehicle::on_route(bus("c", p(0.0, 0.0)), l_route(), Timestamp(0));
        broken.motion.as_mut().unwrap().route_index = 99;
        let mut vehicles = fleet.snapshot();
        vehicles.push(broken.clone());
        fleet = Fleet::new(vehicles, 50);

        let summary = fleet.tick(0.5, EndPolicy::PingPong, Timestamp(1));
        assert_eq!(summary.moved, 1);
        assert_eq!(fleet.get(&VehicleId::from("c")), Some(&broken));
    }

    #[test]
    fn snapshot_is_detached() {
        let mut fleet = two_vehicle_fleet();
        let mut snap = fleet.snapshot();
        snap[0].location = p(50.0, 50.0);
        fleet.tick(0.5, EndPolicy::PingPong, Timestamp(1));
        assert_at(fleet.vehicles()[0].location, p(0.0, 0.5));
        assert_eq!(snap[0].location, p(50.0, 50.0));
    }

    #[test]
    fn clock_counts_ticks() {
        let mut fleet = two_vehicle_fleet();
        assert_eq!(fleet.current_tick(), Tick::ZERO);
        for _ in 0..1_200 {
            fleet.tick(0.1, EndPolicy::PingPong, Timestamp(0));
        }
        assert_eq!(fleet.current_tick(), Tick(1_200));
        assert_eq!(fleet.clock().to_string(), "T1200 (1m00s)");
    }
}

// ── Resolution ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod resolve {
    use super::*;
    use bt_core::SimRng;
    use bt_route::{LineEndpoints, RouteTable, StraightLineProvider};
    use crate::resolve::{plan_endpoints, resolve_fleet};

    fn table() -> RouteTable {
        let mut t = RouteTable::empty();
        t.insert("12".into(), LineEndpoints { origin: p(40.0, -3.0), destination: p(40.1, -3.0) });
        t
    }

    #[test]
    fn line_vehicle_uses_table_endpoints() {
        let mut rng = SimRng::new(1);
        let v = bus("1", p(0.0, 0.0)).with_line("12");
        let ep = plan_endpoints(&v, &table(), p(0.0, 0.0), 5.0, &mut rng).unwrap();
        assert_eq!(ep.origin, p(40.0, -3.0));
        assert_eq!(ep.destination, p(40.1, -3.0));
    }

    #[test]
    fn unknown_line_gets_nearby_destination() {
        let mut rng = SimRng::new(1);
        let center = p(40.4168, -3.7038);
        let v = bus("1", p(40.42, -3.70)).with_line("not-in-table");
        for _ in 0..50 {
            let ep = plan_endpoints(&v, &table(), center, 5.0, &mut rng).unwrap();
            assert_eq!(ep.origin, v.location);
            assert!(center.distance_km(ep.destination) <= 5.05);
        }
    }

    #[test]
    fn same_seed_same_destinations() {
        let v = bus("1", p(40.42, -3.70));
        let center = p(40.4168, -3.7038);
        let a = plan_endpoints(&v, &table(), center, 5.0, &mut SimRng::new(9));
        let b = plan_endpoints(&v, &table(), center, 5.0, &mut SimRng::new(9));
        assert_eq!(a, b);
    }

    #[test]
    fn non_finite_location_has_no_plan() {
        let mut rng = SimRng::new(1);
        let v = bus("1", p(f64::NAN, 0.0));
        assert!(plan_endpoints(&v, &table(), p(0.0, 0.0), 5.0, &mut rng).is_none());
    }

    #[test]
    fn non_finite_location_has_no_plan_even_on_a_known_line() {
        let mut rng = SimRng::new(1);
        let v = bus("1", p(f64::NAN, f64::NAN)).with_line("12");
        assert!(plan_endpoints(&v, &table(), p(0.0, 0.0), 5.0, &mut rng).is_none());
    }

    #[tokio::test]
    async fn lined_vehicle_with_bad_location_stays_put() {
        let mut rng = SimRng::new(1);
        let vehicles = vec![bus("nan", p(f64::NAN, f64::NAN)).with_line("12")];
        let out = resolve_fleet(
            &Arc::new(StraightLineProvider::default()),
            vehicles,
            &table(),
            p(0.0, 0.0),
            5.0,
            &mut rng,
            Timestamp(0),
        )
        .await;
        assert!(!out[0].is_moving());
        assert!(out[0].route().is_none());
        assert!(out[0].location.lat.is_nan() && out[0].location.lon.is_nan());
    }

    #[tokio::test]
    async fn failures_fall_back_to_straight_line() {
        let mut rng = SimRng::new(1);
        let vehicles = vec![bus("1", p(0.0, 0.0)).with_line("12")];
        let out = resolve_fleet(
            &Arc::new(FailingProvider),
            vehicles,
            &table(),
            p(0.0, 0.0),
            5.0,
            &mut rng,
            Timestamp(0),
        )
        .await;
        assert_eq!(out[0].route(), Some(&[p(40.0, -3.0), p(40.1, -3.0)][..]));
        assert_eq!(out[0].location, p(40.0, -3.0));
    }

    #[tokio::test]
    async fn single_point_answer_falls_back_too() {
        let mut rng = SimRng::new(1);
        let vehicles = vec![bus("1", p(0.0, 0.0)).with_line("12")];
        let out = resolve_fleet(
            &Arc::new(SinglePointProvider),
            vehicles,
            &table(),
            p(0.0, 0.0),
            5.0,
            &mut rng,
            Timestamp(0),
        )
        .await;
        assert_eq!(out[0].route().map(<[GeoPoint]>::len), Some(2));
    }

    #[tokio::test]
    async fn unusable_vehicle_degrades_alone() {
        let mut rng = SimRng::new(1);
        let provider = Arc::new(DogLegProvider { calls: AtomicUsize::new(0) });
        let vehicles = vec![
            bus("ok", p(0.0, 0.0)).with_line("12"),
            bus("bad", p(f64::NAN, f64::NAN)),
            bus("free", p(40.0, -3.0)),
        ];
        let out = resolve_fleet(&provider, vehicles, &table(), p(40.0, -3.0), 2.0, &mut rng, Timestamp(0)).await;

        // Input order is preserved.
        let ids: Vec<_> = out.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, ["ok", "bad", "free"]);

        assert_eq!(out[0].route().map(<[GeoPoint]>::len), Some(3));
        assert!(out[1].motion.is_none());
        assert!(out[2].is_moving());
        // No call is made for a vehicle without endpoints.
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn straight_line_provider_round_trip() {
        let mut rng = SimRng::new(1);
        let vehicles = vec![bus("1", p(0.0, 0.0)).with_line("12")];
        let out = resolve_fleet(
            &Arc::new(StraightLineProvider::default()),
            vehicles,
            &table(),
            p(0.0, 0.0),
            5.0,
            &mut rng,
            Timestamp(0),
        )
        .await;
        assert_eq!(out[0].route(), Some(&[p(40.0, -3.0), p(40.1, -3.0)][..]));
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use bt_core::MotionConfig;
    use bt_route::StraightLineProvider;
    use crate::{SimError, SimulatorBuilder};

    #[test]
    fn defaults_build() {
        let sim = SimulatorBuilder::new(StraightLineProvider::default()).build().unwrap();
        assert_eq!(sim.config(), &MotionConfig::default());
        assert!(!sim.is_running());
    }

    #[test]
    fn invalid_config_rejected() {
        let cfg = MotionConfig { progress_step: 0.0, ..Default::default() };
        let result = SimulatorBuilder::new(StraightLineProvider::default()).config(cfg).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }
}

// ── Simulator lifecycle ───────────────────────────────────────────────────────

#[cfg(test)]
mod simulator {
    use std::time::Duration;

    use tokio::time::Instant;

    use super::*;
    use bt_core::{MotionConfig, VehicleId};
    use bt_route::{LineEndpoints, RouteTable, StraightLineProvider};
    use crate::{CallbackObserver, MotionSimulator, NoopObserver, SimError, SimulatorBuilder};

    const INTERVAL_MS: u64 = 50;

    fn sim(step: f64) -> MotionSimulator<StraightLineProvider> {
        let mut table = RouteTable::empty();
        table.insert("A".into(), LineEndpoints { origin: p(0.0, 0.0), destination: p(0.0, 1.0) });
        SimulatorBuilder::new(StraightLineProvider::default())
            .config(MotionConfig {
                tick_interval_ms: INTERVAL_MS,
                progress_step:    step,
                ..Default::default()
            })
            .table(table)
            .build()
            .unwrap()
    }

    fn line_bus(id: &str) -> VehicleInfo {
        bus(id, p(0.0, 0.0)).with_line("A")
    }

    /// Sleep until halfway between tick `n` and tick `n + 1` of a
    /// simulation started at `t0`.
    async fn past_tick(t0: Instant, n: u64) {
        tokio::time::sleep_until(t0 + Duration::from_millis(n * INTERVAL_MS + INTERVAL_MS / 2)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn start_returns_initial_state() {
        let mut sim = sim(0.5);
        let rec = Recording::default();
        let initial = sim.start(vec![line_bus("1"), line_bus("2")], p(0.0, 0.0), rec.clone()).await.unwrap();

        assert_eq!(initial.len(), 2);
        assert_eq!(initial[0].location, p(0.0, 0.0));
        assert!(sim.is_running());
        assert_eq!(sim.tick_count(), Tick::ZERO);
        assert_eq!(rec.started.load(Ordering::SeqCst), 1);
        assert!(rec.ticks().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn unroutable_vehicle_rides_along_unchanged() {
        let mut sim = sim(0.5);
        let rec = Recording::default();
        let home = p(40.42, -3.70);
        // A non-finite reference leaves the unlined bus without a destination.
        sim.start(vec![bus("lost", home), line_bus("1")], p(f64::NAN, f64::NAN), rec.clone())
            .await
            .unwrap();
        let t0 = Instant::now();

        past_tick(t0, 1).await;
        let batch = rec.last_batch();
        assert_eq!(batch.len(), 2);
        let lost = batch.iter().find(|v| v.id.as_str() == "lost").unwrap();
        assert_eq!(lost.location, home);
        assert!(lost.route().is_none());
        // The routable bus still moved.
        let moving = batch.iter().find(|v| v.id.as_str() == "1").unwrap();
        assert_at(moving.location, p(0.0, 0.5));
    }

    #[tokio::test(start_paused = true)]
    async fn observer_gets_one_batch_per_tick() {
        let mut sim = sim(0.5);
        let rec = Recording::default();
        sim.start(vec![line_bus("1"), line_bus("2")], p(0.0, 0.0), rec.clone()).await.unwrap();
        let t0 = Instant::now();

        past_tick(t0, 3).await;
        assert_eq!(rec.ticks(), vec![(Tick(1), 2), (Tick(2), 2), (Tick(3), 2)]);
        assert_eq!(sim.tick_count(), Tick(3));
    }

    #[tokio::test(start_paused = true)]
    async fn vehicles_move_between_line_endpoints() {
        let mut sim = sim(0.5);
        sim.start(vec![line_bus("1")], p(0.0, 0.0), NoopObserver).await.unwrap();
        let t0 = Instant::now();
        let id = VehicleId::from("1");

        past_tick(t0, 1).await;
        assert_at(sim.vehicle(&id).unwrap().location, p(0.0, 0.5));
        past_tick(t0, 2).await;
        assert_at(sim.vehicle(&id).unwrap().location, p(0.0, 1.0));
        past_tick(t0, 4).await;
        assert_at(sim.vehicle(&id).unwrap().location, p(0.0, 0.0));
    }

    #[tokio::test(start_paused = true)]
    async fn callback_observer_sees_positions() {
        let mut sim = sim(0.25);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let observer = CallbackObserver(move |_tick: Tick, vs: &[TrackedVehicle]| {
            sink.lock().unwrap().push(vs[0].location.lon);
        });
        sim.start(vec![line_bus("1")], p(0.0, 0.0), observer).await.unwrap();
        let t0 = Instant::now();

        past_tick(t0, 4).await;
        let lons = seen.lock().unwrap().clone();
        assert_eq!(lons.len(), 4);
        for (got, want) in lons.iter().zip([0.25, 0.5, 0.75, 1.0]) {
            assert!((got - want).abs() < EPS);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn stop_is_idempotent_and_final() {
        let mut sim = sim(0.5);
        let rec = Recording::default();
        sim.start(vec![line_bus("1")], p(0.0, 0.0), rec.clone()).await.unwrap();
        let t0 = Instant::now();
        past_tick(t0, 2).await;

        sim.stop();
        sim.stop();
        sim.stop();

        assert!(!sim.is_running());
        assert!(sim.snapshot().is_empty());
        assert_eq!(sim.tick_count(), Tick::ZERO);
        assert_eq!(rec.stops(), vec![Tick(2)]);

        past_tick(t0, 7).await;
        assert_eq!(rec.ticks().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_without_start_is_noop() {
        let mut sim = sim(0.5);
        sim.stop();
        assert!(!sim.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn restart_leaves_one_fleet_and_one_timer() {
        let mut sim = sim(0.5);
        let first = Recording::default();
        let second = Recording::default();

        sim.start(vec![line_bus("1"), line_bus("2")], p(0.0, 0.0), first.clone()).await.unwrap();
        past_tick(Instant::now(), 1).await;
        sim.start(vec![line_bus("3")], p(0.0, 0.0), second.clone()).await.unwrap();
        let t1 = Instant::now();

        past_tick(t1, 3).await;
        assert_eq!(first.ticks().len(), 1);
        assert_eq!(first.stops(), vec![Tick(1)]);

        let snap = sim.snapshot();
        assert_eq!(snap.len(), 1);
        assert_eq!(snap[0].id.as_str(), "3");
        // A leaked first timer would double the tick rate.
        assert_eq!(second.ticks(), vec![(Tick(1), 1), (Tick(2), 1), (Tick(3), 1)]);
    }

    #[tokio::test(start_paused = true)]
    async fn independent_simulators_do_not_share_state() {
        let mut a = sim(0.5);
        let mut b = sim(0.5);
        a.start(vec![line_bus("1")], p(0.0, 0.0), NoopObserver).await.unwrap();
        b.start(vec![line_bus("2")], p(0.0, 0.0), NoopObserver).await.unwrap();
        let t0 = Instant::now();
        past_tick(t0, 1).await;

        a.stop();
        past_tick(t0, 2).await;
        assert!(b.is_running());
        assert_eq!(b.snapshot()[0].id.as_str(), "2");
        assert_eq!(b.tick_count(), Tick(2));
        assert!(a.snapshot().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn snapshot_copies_do_not_leak_back() {
        let mut sim = sim(0.5);
        sim.start(vec![line_bus("1")], p(0.0, 0.0), NoopObserver).await.unwrap();
        let mut snap = sim.snapshot();
        snap[0].location = p(80.0, 80.0);
        snap.clear();
        assert_eq!(sim.snapshot()[0].location, p(0.0, 0.0));
    }

    #[tokio::test(start_paused = true)]
    async fn rejects_empty_and_duplicate_fleets() {
        let mut sim = sim(0.5);
        assert!(matches!(
            sim.start(vec![], p(0.0, 0.0), NoopObserver).await,
            Err(SimError::NoVehicles)
        ));
        assert!(matches!(
            sim.start(vec![line_bus("1"), line_bus("1")], p(0.0, 0.0), NoopObserver).await,
            Err(SimError::DuplicateVehicle(id)) if id.as_str() == "1"
        ));
        assert!(!sim.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_start_still_stops_previous() {
        let mut sim = sim(0.5);
        let rec = Recording::default();
        sim.start(vec![line_bus("1")], p(0.0, 0.0), rec.clone()).await.unwrap();
        let _ = sim.start(vec![], p(0.0, 0.0), NoopObserver).await;
        assert!(!sim.is_running());
        assert_eq!(rec.stops().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_stops_the_timer() {
        let rec = Recording::default();
        let t0 = Instant::now();
        {
            let mut sim = sim(0.5);
            sim.start(vec![line_bus("1")], p(0.0, 0.0), rec.clone()).await.unwrap();
            past_tick(t0, 1).await;
        }
        past_tick(t0, 4).await;
        assert_eq!(rec.ticks().len(), 1);
        assert_eq!(rec.stops(), vec![Tick(1)]);
    }
}
