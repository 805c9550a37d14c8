//! Opaque identifier types for timetable data.
//!
//! Station names, stop point references, vehicle journey codes and line
//! names all arrive as free-form strings from the timetable extraction.
//! The only validation is that they are non-empty, but giving each its own
//! type stops a stop point reference being passed where a station name is
//! expected.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when constructing an identifier from an empty string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: cannot be empty")]
pub struct InvalidIdentifier {
    kind: &'static str,
}

impl InvalidIdentifier {
    /// The kind of identifier that failed validation.
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier, rejecting empty strings.
            pub fn new(s: impl Into<String>) -> Result<Self, InvalidIdentifier> {
                let s = s.into();
                if s.is_empty() {
                    return Err(InvalidIdentifier { kind: $kind });
                }
                Ok(Self(s))
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes the identifier and returns the inner String.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = InvalidIdentifier;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

identifier!(
    /// A human-readable station name, e.g. "Oxford Circus".
    ///
    /// Many stop events share one station name. Names are compared by exact
    /// equality: "Bank" and "Bankside" are different stations.
    ///
    /// # Examples
    ///
    /// ```
    /// use tube_planner::domain::StationName;
    ///
    /// let bank = StationName::new("Bank").unwrap();
    /// assert_eq!(bank.as_str(), "Bank");
    /// assert_ne!(bank, StationName::new("Bankside").unwrap());
    ///
    /// assert!(StationName::new("").is_err());
    /// ```
    StationName,
    "station name"
);

identifier!(
    /// A reference to a stop point (platform or stop) within a station.
    StopPointRef,
    "stop point reference"
);

identifier!(
    /// Identifier of one scheduled run of a vehicle along its route.
    VehicleJourneyId,
    "vehicle journey id"
);

identifier!(
    /// The line (service) a vehicle journey runs on, e.g. "CEN" or "VIC".
    LineName,
    "line name"
);
