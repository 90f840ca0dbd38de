//! HTTP directions lookup.
//!
//! Speaks the Google Directions JSON API: one GET per origin/destination
//! pair, geometry taken from `routes[0].overview_polyline.points`, totals
//! summed over `routes[0].legs`.  Any non-`"OK"` status is an error, which
//! the simulator turns into a straight-line fallback.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use bt_core::GeoPoint;

use crate::{Route, RouteError, RouteProvider, RouteResult, polyline};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";

// ── Configuration ─────────────────────────────────────────────────────────────

/// Connection settings for [`DirectionsProvider`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DirectionsConfig {
    pub api_key: String,

    /// Endpoint URL.  Override to point at a proxy or a test server.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

fn default_timeout_ms() -> u64 {
    5_000
}

impl DirectionsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key:    api_key.into(),
            base_url:   default_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

// ── Response shape ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<ResponseRoute>,
}

#[derive(Deserialize)]
struct ResponseRoute {
    overview_polyline: EncodedPolyline,
    #[serde(default)]
    legs: Vec<ResponseLeg>,
}

#[derive(Deserialize)]
struct EncodedPolyline {
    points: String,
}

#[derive(Deserialize)]
struct ResponseLeg {
    distance: TextValue,
    duration: TextValue,
}

#[derive(Deserialize)]
struct TextValue {
    value: f64,
}

/// Turn a directions response body into a [`Route`].
///
/// Split out from the HTTP call so it can be exercised without a network.
pub fn parse_response(body: &str) -> RouteResult<Route> {
    let response: DirectionsResponse = serde_json::from_str(body)?;
    if response.status != "OK" {
        return Err(RouteError::Provider {
            status:  response.status,
            message: response.error_message.unwrap_or_default(),
        });
    }

    let route = response.routes.into_iter().next().ok_or(RouteError::Empty)?;
    let waypoints = polyline::decode(&route.overview_polyline.points)?;

    let metres: f64 = route.legs.iter().map(|l| l.distance.value).sum();
    let seconds: f64 = route.legs.iter().map(|l| l.duration.value).sum();

    Route::new(waypoints, metres / 1_000.0, seconds / 60.0)
}

// ── DirectionsProvider ────────────────────────────────────────────────────────

/// [`RouteProvider`] backed by an HTTP directions service.
#[derive(Debug, Clone)]
pub struct DirectionsProvider {
    client: reqwest::Client,
    config: DirectionsConfig,
}

impl DirectionsProvider {
    /// Build the HTTP client.
    pub fn new(config: DirectionsConfig) -> RouteResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self { client, config })
    }

    async fn fetch(&self, origin: GeoPoint, destination: GeoPoint) -> RouteResult<Route> {
        debug!(%origin, %destination, "requesting directions");
        let body = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("origin",      format!("{},{}", origin.lat, origin.lon)),
                ("destination", format!("{},{}", destination.lat, destination.lon)),
                ("mode",        "driving".to_owned()),
                ("key",         self.config.api_key.clone()),
            ])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let route = parse_response(&body)?;
        debug!(waypoints = route.len(), distance_km = route.distance_km, "directions resolved");
        Ok(route)
    }
}

impl RouteProvider for DirectionsProvider {
    fn resolve(
        &self,
        origin:      GeoPoint,
        destination: GeoPoint,
    ) -> impl Future<Output = RouteResult<Route>> + Send {
        self.fetch(origin, destination)
    }
}
