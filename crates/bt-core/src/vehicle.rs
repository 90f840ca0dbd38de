//! Base vehicle records.
//!
//! A [`VehicleInfo`] is what a vehicle looks like before the simulator has
//! bound it to a route: identity, display attributes, and a starting
//! location.  The motion fields live in `bt-sim`.

use crate::{GeoPoint, LineId, VehicleId};

/// The kind of vehicle, used by clients to choose an icon.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[non_exhaustive]
pub enum VehicleKind {
    /// Regular city bus (default).
    #[default]
    Bus,
    /// Small feeder or airport shuttle.
    Shuttle,
    /// Street-running tram.
    Tram,
    /// Long-distance coach.
    Coach,
}

impl VehicleKind {
    /// Lowercase label, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            VehicleKind::Bus     => "bus",
            VehicleKind::Shuttle => "shuttle",
            VehicleKind::Tram    => "tram",
            VehicleKind::Coach   => "coach",
        }
    }
}

impl std::fmt::Display for VehicleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A vehicle's immutable attributes plus its starting location.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleInfo {
    pub id:        VehicleId,
    pub name:      String,
    pub kind:      VehicleKind,
    /// Predefined line this vehicle serves, if any.  Lines found in the
    /// route table supply fixed origin/destination endpoints.
    pub line:      Option<LineId>,
    pub location:  GeoPoint,
    /// Nominal display speed.  Not used to derive displacement.
    pub speed_kmh: f64,
}

impl VehicleInfo {
    /// A bus at `location` with no line and zero display speed.
    pub fn new(id: impl Into<VehicleId>, name: impl Into<String>, location: GeoPoint) -> Self {
        Self {
            id:        id.into(),
            name:      name.into(),
            kind:      VehicleKind::Bus,
            line:      None,
            location,
            speed_kmh: 0.0,
        }
    }

    pub fn with_line(mut self, line: impl Into<LineId>) -> Self {
        self.line = Some(line.into());
        self
    }

    pub fn with_kind(mut self, kind: VehicleKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_speed(mut self, speed_kmh: f64) -> Self {
        self.speed_kmh = speed_kmh;
        self
    }
}
