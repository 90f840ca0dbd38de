//! Motion simulator configuration.
//!
//! Typically embedded in the server's JSON config file and passed to the
//! simulator builder.  Every field has a default, so a partial file works.

use std::time::Duration;

use crate::{CoreError, CoreResult};

/// Progress within this distance of 1.0 counts as arrival, so a step like
/// 0.1 reaches the waypoint in exactly ten ticks despite rounding.
pub const ARRIVAL_EPSILON: f64 = 1e-9;

/// What a vehicle does when it reaches either end of its route.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EndPolicy {
    /// Reverse direction at both ends and retrace the route (default).
    #[default]
    PingPong,
    /// On reaching the last waypoint, snap back to the first and run
    /// forward again.
    LoopToStart,
}

/// Tunables for the motion simulator.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MotionConfig {
    /// Timer period.  Shorter is smoother but pushes more updates.
    pub tick_interval_ms: u64,

    /// Fraction of a waypoint segment covered per tick, in `(0, 1]`.
    /// Segments take `ceil(1 / progress_step)` ticks regardless of length.
    pub progress_step: f64,

    /// Behaviour at route ends.
    pub end_policy: EndPolicy,

    /// Master RNG seed.  The same seed always synthesizes the same
    /// destinations.
    pub seed: u64,

    /// Radius around the reference location in which destinations are
    /// synthesized for vehicles without a predefined line.
    pub destination_radius_km: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms:      50,
            progress_step:         0.02,
            end_policy:            EndPolicy::PingPong,
            seed:                  42,
            destination_radius_km: 5.0,
        }
    }
}

impl MotionConfig {
    /// Reject values the tick loop cannot run with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.tick_interval_ms == 0 {
            return Err(CoreError::Config("tick_interval_ms must be > 0".into()));
        }
        if !(self.progress_step > 0.0 && self.progress_step <= 1.0) {
            return Err(CoreError::Config(format!(
                "progress_step must be in (0, 1], got {}",
                self.progress_step
            )));
        }
        if !(self.destination_radius_km.is_finite() && self.destination_radius_km >= 0.0) {
            return Err(CoreError::Config(format!(
                "destination_radius_km must be a non-negative number, got {}",
                self.destination_radius_km
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Ticks needed to cross one segment.
    pub fn ticks_per_segment(&self) -> u64 {
        (1.0 / self.progress_step - ARRIVAL_EPSILON).ceil() as u64
    }
}
