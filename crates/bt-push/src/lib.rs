//! `bt-push`: real-time push server for simulated bus positions.
//!
//! Map clients connect over a WebSocket, ask for a simulation around a
//! location, and receive the whole fleet once per tick.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                 |
//! |---------------|----------------------------------------------------------|
//! | [`config`]    | `ServerConfig`: JSON file plus environment overrides     |
//! | [`generate`]  | `generate_fleet`: synthetic buses for a session          |
//! | [`wire`]      | `ClientMessage`, `ServerMessage`, `VehicleDto`           |
//! | [`session`]   | `Session<P>`: one client's simulator and update channel  |
//! | [`server`]    | `AppState`, `router`, the `/ws` socket loop              |
//! | [`error`]     | `PushError`, `PushResult<T>`                             |
//!
//! # Wire protocol
//!
//! ```text
//! client → server   {"type":"start","location":{"lat":..,"lon":..},"count":8}
//!                   {"type":"stop"}
//!                   {"type":"snapshot"}
//! server → client   {"type":"started","vehicles":[.. with "route" ..]}
//!                   {"type":"update","tick":17,"vehicles":[..]}
//!                   {"type":"snapshot","vehicles":[..]}
//!                   {"type":"stopped"}
//!                   {"type":"error","message":".."}
//! ```

pub mod config;
pub mod error;
pub mod generate;
pub mod server;
pub mod session;
pub mod wire;


pub use config::{MAX_FLEET_SIZE, ServerConfig};
pub use error::{PushError, PushResult};
pub use generate::generate_fleet;
pub use server::{AnyProvider, AppState, router};
pub use session::Session;
pub use wire::{ClientMessage, ServerMessage, VehicleDto};
