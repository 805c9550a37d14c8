//! Domain types for the tube journey planner.
//!
//! Identifiers are validated at construction, so code that receives them
//! can trust they are non-empty. Times are minutes past midnight.

mod identifier;
mod time;

pub use identifier::{InvalidIdentifier, LineName, StationName, StopPointRef, VehicleJourneyId};
pub use time::{TimeError, decode, encode};
