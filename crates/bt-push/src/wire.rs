//! JSON messages exchanged over the WebSocket.
//!
//! Both directions are internally tagged by a `"type"` field with
//! snake_case variant names.

use serde::{Deserialize, Serialize};

use bt_core::{GeoPoint, LineId, Tick, Timestamp, VehicleId, VehicleKind};
use bt_sim::TrackedVehicle;

use crate::PushResult;

/// Requests a client can send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Start (or restart) a simulation around `location`.
    Start {
        location: GeoPoint,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        count: Option<usize>,
    },
    Stop,
    Snapshot,
}

/// Messages the server pushes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// The initial fleet, routes included so the client can draw them once.
    Started { vehicles: Vec<VehicleDto> },
    /// One tick's worth of positions, without routes.
    Update { tick: Tick, vehicles: Vec<VehicleDto> },
    Snapshot { vehicles: Vec<VehicleDto> },
    Stopped,
    Error { message: String },
}

impl ServerMessage {
    pub fn error(message: impl ToString) -> Self {
        ServerMessage::Error { message: message.to_string() }
    }
}

/// A vehicle as clients see it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleDto {
    pub id:           VehicleId,
    pub name:         String,
    pub kind:         VehicleKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line:         Option<LineId>,
    pub location:     GeoPoint,
    pub heading:      f64,
    pub speed_kmh:    f64,
    /// `1` forward, `-1` backward, `0` for a vehicle that does not move.
    pub direction:    i8,
    pub last_updated: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route:        Option<Vec<GeoPoint>>,
}

impl VehicleDto {
    pub fn from_tracked(v: &TrackedVehicle, with_route: bool) -> Self {
        Self {
            id:           v.id.clone(),
            name:         v.name.clone(),
            kind:         v.kind,
            line:         v.line.clone(),
            location:     v.location,
            heading:      v.heading,
            speed_kmh:    v.speed_kmh,
            direction:    v.motion.as_ref().map_or(0, |m| m.direction.sign()),
            last_updated: v.last_updated,
            route:        with_route.then(|| v.route().map(<[GeoPoint]>::to_vec)).flatten(),
        }
    }

    pub fn list(vehicles: &[TrackedVehicle], with_route: bool) -> Vec<Self> {
        vehicles.iter().map(|v| Self::from_tracked(v, with_route)).collect()
    }
}

pub fn decode(text: &str) -> PushResult<ClientMessage> {
    Ok(serde_json::from_str(text)?)
}

pub fn encode(message: &ServerMessage) -> PushResult<String> {
    Ok(serde_json::to_string(message)?)
}
