//! Server configuration.
//!
//! Loaded from a JSON file in which every field is optional:
//!
//! ```json
//! {
//!   "bind": "0.0.0.0:8080",
//!   "fleet_size": 12,
//!   "spawn_radius_km": 3.0,
//!   "route_table": "data/lines.csv",
//!   "motion": { "tick_interval_ms": 100, "progress_step": 0.01 },
//!   "directions": { "api_key": "..." }
//! }
//! ```
//!
//! `BT_BIND` and `BT_DIRECTIONS_KEY` override the file, so a deployment can
//! keep its key out of the config.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use bt_core::MotionConfig;
use bt_route::DirectionsConfig;

use crate::{PushError, PushResult};

/// Upper bound on vehicles per session, whatever a client asks for.
pub const MAX_FLEET_SIZE: usize = 64;

pub const ENV_BIND: &str = "BT_BIND";
pub const ENV_DIRECTIONS_KEY: &str = "BT_DIRECTIONS_KEY";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address.
    pub bind: String,

    /// Motion tunables shared by every session.
    pub motion: MotionConfig,

    /// Vehicles per session when the client does not ask for a count.
    pub fleet_size: usize,

    /// Radius around the client's location in which unlined buses spawn.
    pub spawn_radius_km: f64,

    /// Optional CSV of predefined line endpoints.
    pub route_table: Option<PathBuf>,

    /// Directions backend.  `None` means straight-line routes only.
    pub directions: Option<DirectionsConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind:            "0.0.0.0:8080".to_owned(),
            motion:          MotionConfig::default(),
            fleet_size:      8,
            spawn_radius_km: 3.0,
            route_table:     None,
            directions:      None,
        }
    }
}

impl ServerConfig {
    pub fn from_json_str(json: &str) -> PushResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON config file.
    pub fn load(path: &Path) -> PushResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Apply `BT_BIND` / `BT_DIRECTIONS_KEY` from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup.  Empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(bind) = lookup(ENV_BIND).filter(|v| !v.is_empty()) {
            self.bind = bind;
        }
        if let Some(key) = lookup(ENV_DIRECTIONS_KEY).filter(|v| !v.is_empty()) {
            match self.directions.as_mut() {
                Some(directions) => directions.api_key = key,
                None => self.directions = Some(DirectionsConfig::new(key)),
            }
        }
    }

    pub fn validate(&self) -> PushResult<()> {
        self.motion.validate()?;
        if self.fleet_size == 0 || self.fleet_size > MAX_FLEET_SIZE {
            return Err(PushError::Config(format!(
                "fleet_size must be in 1..={MAX_FLEET_SIZE}, got {}",
                self.fleet_size
            )));
        }
        if !(self.spawn_radius_km.is_finite() && self.spawn_radius_km >= 0.0) {
            return Err(PushError::Config(format!(
                "spawn_radius_km must be a non-negative number, got {}",
                self.spawn_radius_km
            )));
        }
        if self.directions.as_ref().is_some_and(|d| d.api_key.is_empty()) {
            return Err(PushError::Config("directions.api_key is empty".into()));
        }
        Ok(())
    }

    /// The fleet size to use for a client request.
    pub fn fleet_count(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.fleet_size).clamp(1, MAX_FLEET_SIZE)
    }
}
