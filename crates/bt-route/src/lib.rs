//! `bt-route`: route providers and predefined line endpoints.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                 |
//! |----------------|----------------------------------------------------------|
//! | [`route`]      | `Route`: validated waypoint sequence + totals            |
//! | [`provider`]   | `RouteProvider` trait, `StraightLineProvider`            |
//! | [`directions`] | `DirectionsProvider`: HTTP directions lookup             |
//! | [`polyline`]   | Encoded-polyline decoding                                |
//! | [`table`]      | `RouteTable`: per-line endpoints loaded from CSV         |
//! | [`error`]      | `RouteError`, `RouteResult<T>`                           |
//!
//! # Pluggability
//!
//! `bt-sim` resolves routes through the [`RouteProvider`] trait, so the
//! directions backend can be swapped (or stubbed in tests) without touching
//! the simulator.

pub mod directions;
pub mod error;
pub mod polyline;
pub mod provider;
pub mod route;
pub mod table;


pub use directions::{DirectionsConfig, DirectionsProvider};
pub use error::{RouteError, RouteResult};
pub use provider::{RouteProvider, StraightLineProvider};
pub use route::Route;
pub use table::{LineEndpoints, RouteTable, load_table_csv, load_table_reader};
