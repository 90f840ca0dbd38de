//! Strongly typed string identifiers.
//!
//! Vehicle and line identifiers arrive from clients and CSV files as
//! free-form strings.  Wrapping them keeps a `VehicleId` from being passed
//! where a `LineId` is expected.  Both are `Ord + Hash` so they work as map
//! keys without ceremony.

use std::fmt;

/// Generate a typed ID wrapper around an owned `String`.
macro_rules! string_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id! {
    /// Identity of a simulated vehicle.  Unique per simulation session and
    /// stable for the vehicle's lifetime.
    pub struct VehicleId;
}

string_id! {
    /// Key of a predefined line in the route table (e.g. `"12"` or `"airport"`).
    pub struct LineId;
}
