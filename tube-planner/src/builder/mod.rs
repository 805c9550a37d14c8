//! Construction of the time-expanded network from timetable records.

mod graph;
mod link;

pub use graph::{BuildError, BuildSummary, GraphBuilder, build_network};
pub use link::{TimetableLink, sort_links};
