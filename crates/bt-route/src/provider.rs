//! Route provider trait and the straight-line provider.
//!
//! # Failure model
//!
//! Providers may fail for any reason (network, quota, no path).  Callers in
//! `bt-sim` treat every error as "use the straight-line fallback", so
//! implementations should return errors rather than invent geometry.

use std::future::Future;

use bt_core::GeoPoint;

use crate::{Route, RouteResult};

// ── RouteProvider trait ───────────────────────────────────────────────────────

/// Pluggable route lookup.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync + 'static` and return `Send`
/// futures: the simulator resolves every vehicle's route concurrently on a
/// tokio `JoinSet`, sharing the provider behind an `Arc`.
pub trait RouteProvider: Send + Sync + 'static {
    /// Resolve a travel path from `origin` to `destination`.
    fn resolve(
        &self,
        origin:      GeoPoint,
        destination: GeoPoint,
    ) -> impl Future<Output = RouteResult<Route>> + Send;
}

// ── StraightLineProvider ──────────────────────────────────────────────────────

/// Always answers with a direct two-point line.
///
/// Used when no directions backend is configured, and as the reference
/// behaviour for the simulator's own fallback.
#[derive(Debug, Clone, Copy)]
pub struct StraightLineProvider {
    /// Speed used to fill in `Route::duration_min`.
    pub assumed_speed_kmh: f64,
}

impl Default for StraightLineProvider {
    fn default() -> Self {
        Self { assumed_speed_kmh: 30.0 }
    }
}

impl RouteProvider for StraightLineProvider {
    fn resolve(
        &self,
        origin:      GeoPoint,
        destination: GeoPoint,
    ) -> impl Future<Output = RouteResult<Route>> + Send {
        let speed = self.assumed_speed_kmh;
        async move { Route::straight_line(origin, destination, speed) }
    }
}
