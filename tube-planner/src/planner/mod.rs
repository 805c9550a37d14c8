//! Journey planning over a time-expanded network.
//!
//! A [`JourneyQuery`] names an origin, a destination, a minute of the day
//! and whether that minute is a departure or an arrival bound. The
//! [`Planner`] wires the query into the network with a [`QueryOverlay`],
//! runs a shortest-path search from `Start` to `End` and formats the result
//! as an itinerary.

mod config;
mod overlay;
mod query;
mod search;

pub use config::PlannerConfig;
pub use overlay::QueryOverlay;
pub use query::{JourneyQuery, QueryMode};
pub use search::{JourneyPlan, PlanError, Planner, ShortestPath, shortest_path};
