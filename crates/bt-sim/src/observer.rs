//! Simulation observer trait for pushing vehicle batches to listeners.

use bt_core::Tick;

use crate::TrackedVehicle;

/// Callbacks invoked by [`MotionSimulator`][crate::MotionSimulator] over the
/// life of one simulation.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Callbacks run on the simulator's timer
/// task while it holds the session lock: keep them short, and never call back
/// into the simulator from inside one.
///
/// # Example: tick counter
///
/// ```rust,ignore
/// struct Counter(usize);
///
/// impl FleetObserver for Counter {
///     fn on_tick(&mut self, _tick: Tick, vehicles: &[TrackedVehicle]) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait FleetObserver: Send + 'static {
    /// Called once with the resolved fleet, before the first tick.
    fn on_start(&mut self, _vehicles: &[TrackedVehicle]) {}

    /// Called exactly once per tick with the whole updated fleet.
    fn on_tick(&mut self, _tick: Tick, _vehicles: &[TrackedVehicle]) {}

    /// Called once when the simulation is stopped or replaced.
    fn on_stop(&mut self, _final_tick: Tick) {}
}

/// A [`FleetObserver`] that does nothing.
pub struct NoopObserver;

impl FleetObserver for NoopObserver {}

/// Adapts a closure into a [`FleetObserver`] that only handles ticks.
pub struct CallbackObserver<F>(pub F);

impl<F> FleetObserver for CallbackObserver<F>
where
    F: FnMut(Tick, &[TrackedVehicle]) + Send + 'static,
{
    fn on_tick(&mut self, tick: Tick, vehicles: &[TrackedVehicle]) {
        (self.0)(tick, vehicles)
    }
}
