//! Turning a raw node path into travel instructions.
//!
//! A shortest path is a list of stop events. Most of them are uninteresting
//! (riding through an intermediate stop); the itinerary keeps only the
//! points where the traveller has to act: setting off, boarding,
//! disembarking and arriving.

mod state;

use std::fmt;

pub use state::{Emit, RideState};

use crate::domain::{LineName, StationName, encode};
use crate::network::{GraphView, Node, NodeId};

/// Errors from formatting a path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItineraryError {
    #[error("path is empty")]
    EmptyPath,

    #[error("path starts at {0}, not Start")]
    NotFromStart(NodeId),

    #[error("path ends at {0}, not End")]
    NotToEnd(NodeId),

    #[error("node {0} is not in the graph")]
    UnknownNode(NodeId),

    #[error("no edge from {from} to {to}")]
    MissingEdge { from: NodeId, to: NodeId },

    #[error("node {0} has no minute of day")]
    MissingMinute(NodeId),

    /// The edge kind is not allowed from the current ride state
    #[error("{edge} edge cannot follow state {state}")]
    UnexpectedEdge {
        state: &'static str,
        edge: &'static str,
    },
}

/// One instruction of an itinerary. Minutes are minutes past midnight.
#[derive(Debug, Clone, PartialEq)]
pub enum ItineraryStep {
    Start {
        station: StationName,
        minute: f64,
    },
    Board {
        line: LineName,
        station: StationName,
        minute: f64,
    },
    Disembark {
        line: LineName,
        station: StationName,
        minute: f64,
    },
    Finish {
        station: StationName,
        minute: f64,
    },
}

impl ItineraryStep {
    pub fn station(&self) -> &StationName {
        match self {
            ItineraryStep::Start { station, .. }
            | ItineraryStep::Board { station, .. }
            | ItineraryStep::Disembark { station, .. }
            | ItineraryStep::Finish { station, .. } => station,
        }
    }

    pub fn minute(&self) -> f64 {
        match self {
            ItineraryStep::Start { minute, .. }
            | ItineraryStep::Board { minute, .. }
            | ItineraryStep::Disembark { minute, .. }
            | ItineraryStep::Finish { minute, .. } => *minute,
        }
    }

    /// The line boarded or left, for board and disembark steps.
    pub fn line(&self) -> Option<&LineName> {
        match self {
            ItineraryStep::Board { line, .. } | ItineraryStep::Disembark { line, .. } => {
                Some(line)
            }
            ItineraryStep::Start { .. } | ItineraryStep::Finish { .. } => None,
        }
    }
}

impl fmt::Display for ItineraryStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItineraryStep::Start { station, minute } => {
                write!(f, "Start journey from {station} at {}", encode(*minute))
            }
            ItineraryStep::Board {
                line,
                station,
                minute,
            } => write!(
                f,
                "Board the {line} line train from {station} at {}",
                encode(*minute)
            ),
            ItineraryStep::Disembark {
                line,
                station,
                minute,
            } => write!(
                f,
                "Disembark the {line} line train at {station} at {}",
                encode(*minute)
            ),
            ItineraryStep::Finish { station, minute } => {
                write!(f, "Finish journey at {station} at {}", encode(*minute))
            }
        }
    }
}

/// Walk a `Start`..`End` path and produce its itinerary.
pub fn format_path<G: GraphView>(
    graph: &G,
    path: &[NodeId],
) -> Result<Vec<ItineraryStep>, ItineraryError> {
    let (first, last) = match (path.first(), path.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(ItineraryError::EmptyPath),
    };
    if *first != NodeId::Start {
        return Err(ItineraryError::NotFromStart(first.clone()));
    }
    if *last != NodeId::End {
        return Err(ItineraryError::NotToEnd(last.clone()));
    }

    let mut state = RideState::AtOrigin;
    let mut steps = Vec::new();

    for pair in path.windows(2) {
        let (u, v) = (&pair[0], &pair[1]);
        let edge = graph
            .edge(u, v)
            .ok_or_else(|| ItineraryError::MissingEdge {
                from: u.clone(),
                to: v.clone(),
            })?;
        let (next, emit) = state.transition(&edge.kind)?;
        let here = lookup(graph, u)?;

        match emit {
            Emit::Nothing => {}
            Emit::Start => {
                let boarded = minute_of(v, lookup(graph, v)?)?;
                steps.push(ItineraryStep::Start {
                    station: here.station().clone(),
                    minute: boarded - edge.cost,
                });
            }
            Emit::Board(line) => steps.push(ItineraryStep::Board {
                line,
                station: here.station().clone(),
                minute: minute_of(u, here)?,
            }),
            Emit::Disembark(line) => steps.push(ItineraryStep::Disembark {
                line,
                station: here.station().clone(),
                minute: minute_of(u, here)?,
            }),
            Emit::Change { from, to } => {
                let minute = minute_of(u, here)?;
                steps.push(ItineraryStep::Disembark {
                    line: from,
                    station: here.station().clone(),
                    minute,
                });
                steps.push(ItineraryStep::Board {
                    line: to,
                    station: here.station().clone(),
                    minute,
                });
            }
            Emit::Finish => steps.push(ItineraryStep::Finish {
                station: here.station().clone(),
                minute: minute_of(u, here)?,
            }),
        }

        state = next;
    }

    if state != RideState::AtDestination {
        return Err(ItineraryError::NotToEnd(last.clone()));
    }

    Ok(steps)
}

fn lookup<'g, G: GraphView>(graph: &'g G, id: &NodeId) -> Result<&'g Node, ItineraryError> {
    graph
        .node(id)
        .ok_or_else(|| ItineraryError::UnknownNode(id.clone()))
}

fn minute_of(id: &NodeId, node: &Node) -> Result<f64, ItineraryError> {
    node.minute()
        .ok_or_else(|| ItineraryError::MissingMinute(id.clone()))
}
