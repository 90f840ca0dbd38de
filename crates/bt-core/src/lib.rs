//! `bt-core`: foundational types for the `bus_tracker` workspace.
//!
//! This crate is a dependency of every other `bt-*` crate.  It intentionally
//! has no `bt-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `VehicleId`, `LineId`                                 |
//! | [`geo`]         | `GeoPoint`, haversine, bearing, lerp, random sampling |
//! | [`time`]        | `Tick`, `Timestamp`, `SimClock`                       |
//! | [`rng`]         | `SimRng` (seedable simulation RNG)                    |
//! | [`vehicle`]     | `VehicleKind`, `VehicleInfo`                          |
//! | [`config`]      | `MotionConfig`, `EndPolicy`                           |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;
pub mod vehicle;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{EndPolicy, MotionConfig};
pub use error::{CoreError, CoreResult};
pub use geo::GeoPoint;
pub use ids::{LineId, VehicleId};
pub use rng::SimRng;
pub use time::{SimClock, Tick, Timestamp};
pub use vehicle::{VehicleInfo, VehicleKind};
