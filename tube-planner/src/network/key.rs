//! Node identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{StopPointRef, VehicleJourneyId};

/// Composite key of a scheduled stop event: one vehicle journey calling at
/// one stop point.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StopKey {
    pub journey: VehicleJourneyId,
    pub stop: StopPointRef,
}

impl StopKey {
    pub fn new(journey: VehicleJourneyId, stop: StopPointRef) -> Self {
        Self { journey, stop }
    }
}

impl fmt::Display for StopKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.journey, self.stop)
    }
}

/// Identifier of a node in the time-expanded graph.
///
/// Real stop events are keyed by [`StopKey`]. `Start` and `End` are the
/// virtual endpoints of a single query and never appear in a network
/// produced by the builder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeId {
    Start,
    Event(StopKey),
    End,
}

impl NodeId {
    /// Shorthand for an event node id.
    pub fn event(journey: VehicleJourneyId, stop: StopPointRef) -> Self {
        NodeId::Event(StopKey::new(journey, stop))
    }
}

impl From<StopKey> for NodeId {
    fn from(key: StopKey) -> Self {
        NodeId::Event(key)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Start => f.write_str("Start"),
            NodeId::Event(key) => key.fmt(f),
            NodeId::End => f.write_str("End"),
        }
    }
}
