//! `bt-sim`: waypoint-following motion simulator.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                       |
//! |---------------|----------------------------------------------------------------|
//! | [`state`]     | `Direction`, `MotionState`, `TrackedVehicle`                   |
//! | [`motion`]    | Per-tick advancement along a route (`MotionState::advance`)    |
//! | [`fleet`]     | `Fleet`: the vehicle collection and its synchronous `tick`     |
//! | [`resolve`]   | Endpoint planning and concurrent route resolution              |
//! | [`observer`]  | `FleetObserver` trait, `NoopObserver`, `CallbackObserver`      |
//! | [`simulator`] | `MotionSimulator<P>`: start / stop / snapshot on a timer       |
//! | [`builder`]   | `SimulatorBuilder<P>`                                          |
//! | [`error`]     | `SimError`, `SimResult<T>`                                     |
//!
//! # Tick model
//!
//! ```text
//! start(vehicles, reference, observer):
//!   ① stop any running simulation
//!   ② resolve every vehicle's route concurrently (fallback: straight line)
//!   ③ observer.on_start(initial)
//!   ④ spawn the timer task
//!
//! every tick_interval_ms:
//!   for each vehicle with a ≥2-point route:
//!     progress += progress_step
//!     progress ≥ 1 → snap to next waypoint, advance index, flip at ends
//!     otherwise    → lerp between current and next waypoint
//!   observer.on_tick(tick, all vehicles)      : once per tick, batched
//! ```
//!
//! # Cargo features
//!
//! | Feature   | Effect                                               |
//! |-----------|------------------------------------------------------|
//! | `fx-hash` | Uses FxHash for the vehicle-id index in [`Fleet`].   |

pub mod builder;
pub mod error;
pub mod fleet;
pub mod motion;
pub mod observer;
pub mod resolve;
pub mod simulator;
pub mod state;

#[cfg(test)]
mod tests;

pub use builder::SimulatorBuilder;
pub use error::{SimError, SimResult};
pub use fleet::{Fleet, TickSummary};
pub use motion::Pose;
pub use observer::{CallbackObserver, FleetObserver, NoopObserver};
pub use simulator::MotionSimulator;
pub use state::{Direction, MotionState, TrackedVehicle};
