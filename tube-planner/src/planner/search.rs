//! Shortest-path journey search.
//!
//! Each query augments the network with virtual `Start` and `End` nodes
//! (see [`QueryOverlay`]) and runs Dijkstra from one to the other. Edge
//! costs are minutes, so the cheapest path is the earliest arrival for a
//! depart-after query and the latest departure for an arrive-before query.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use tracing::{debug, trace};

use super::config::PlannerConfig;
use super::overlay::QueryOverlay;
use super::query::JourneyQuery;
use crate::domain::StationName;
use crate::itinerary::{ItineraryError, ItineraryStep, format_path};
use crate::network::{GraphView, Network, NodeId};

/// Error from journey planning.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanError {
    /// Malformed query; nothing was searched
    #[error("invalid journey query: {0}")]
    InvalidQuery(String),

    /// A query station has no stop events in the network
    #[error("unknown station: {0}")]
    UnknownStation(StationName),

    /// The destination cannot be reached within the query's constraints
    #[error("no path from {from} to {to}")]
    NoPath { from: StationName, to: StationName },

    /// The path found could not be turned into an itinerary
    #[error("cannot format itinerary: {0}")]
    Itinerary(#[from] ItineraryError),
}

/// A raw shortest path.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPath {
    /// Nodes from source to target inclusive.
    pub nodes: Vec<NodeId>,
    /// Sum of edge costs along the path.
    pub cost: f64,
}

/// Result of a successful query.
#[derive(Debug, Clone, PartialEq)]
pub struct JourneyPlan {
    /// Raw node path, `Start` first and `End` last.
    pub path: Vec<NodeId>,

    /// Total cost of the path in minutes.
    pub total_cost: f64,

    /// Human-readable instructions.
    pub steps: Vec<ItineraryStep>,
}

impl JourneyPlan {
    /// Minute the traveller sets off from the origin.
    pub fn departure_minute(&self) -> Option<f64> {
        self.steps.first().map(ItineraryStep::minute)
    }

    /// Minute the traveller reaches the destination.
    pub fn arrival_minute(&self) -> Option<f64> {
        self.steps.last().map(ItineraryStep::minute)
    }
}

/// Dijkstra heap entry. Ordered so that `BinaryHeap` pops the cheapest
/// entry first, breaking ties on the smaller node id.
#[derive(Debug, Clone, PartialEq)]
struct State {
    cost: f64,
    node: NodeId,
}

impl Eq for State {}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Find the cheapest path from `source` to `target`.
///
/// Costs must be non-negative. Predecessors are only replaced by strictly
/// cheaper routes, so the result is deterministic for a given graph.
pub fn shortest_path<G: GraphView>(
    graph: &G,
    source: &NodeId,
    target: &NodeId,
) -> Option<ShortestPath> {
    let mut dist: HashMap<NodeId, f64> = HashMap::new();
    let mut previous: HashMap<NodeId, NodeId> = HashMap::new();
    let mut heap = BinaryHeap::new();
    let mut settled = 0usize;

    dist.insert(source.clone(), 0.0);
    heap.push(State {
        cost: 0.0,
        node: source.clone(),
    });

    while let Some(State { cost, node }) = heap.pop() {
        if cost > dist.get(&node).copied().unwrap_or(f64::INFINITY) {
            continue;
        }

        if &node == target {
            trace!(settled, cost, "reached target");
            return Some(ShortestPath {
                nodes: reconstruct(&previous, source, target),
                cost,
            });
        }
        settled += 1;

        for edge in graph.outgoing(&node) {
            let next = cost + edge.cost;
            if next < dist.get(&edge.to).copied().unwrap_or(f64::INFINITY) {
                dist.insert(edge.to.clone(), next);
                previous.insert(edge.to.clone(), node.clone());
                heap.push(State {
                    cost: next,
                    node: edge.to.clone(),
                });
            }
        }
    }

    trace!(settled, "target unreachable");
    None
}

fn reconstruct(
    previous: &HashMap<NodeId, NodeId>,
    source: &NodeId,
    target: &NodeId,
) -> Vec<NodeId> {
    let mut nodes = vec![target.clone()];
    let mut current = target;
    while current != source {
        match previous.get(current) {
            Some(prev) => {
                nodes.push(prev.clone());
                current = prev;
            }
            None => break,
        }
    }
    nodes.reverse();
    nodes
}

/// Journey planner over a built network.
///
/// The network is only ever borrowed immutably, so any number of planners
/// can share one network (e.g. behind an `Arc`) without their queries
/// seeing each other's `Start`/`End` nodes.
pub struct Planner<'a> {
    network: &'a Network,
    config: &'a PlannerConfig,
}

impl<'a> Planner<'a> {
    /// Create a new planner.
    pub fn new(network: &'a Network, config: &'a PlannerConfig) -> Self {
        Self { network, config }
    }

    /// Answer a query with a formatted itinerary.
    pub fn plan(&self, query: &JourneyQuery) -> Result<JourneyPlan, PlanError> {
        self.prepare(query)?;

        let overlay = QueryOverlay::setup(self.network, query, self.config);
        let outcome = search(&overlay, query).and_then(|path| {
            let steps = format_path(&overlay, &path.nodes)?;
            Ok(JourneyPlan {
                path: path.nodes,
                total_cost: path.cost,
                steps,
            })
        });
        overlay.teardown();

        if let Ok(plan) = &outcome {
            debug!(
                from = %query.from,
                to = %query.to,
                cost = plan.total_cost,
                steps = plan.steps.len(),
                "journey planned"
            );
        }
        outcome
    }

    /// Answer a query with the raw node path only.
    pub fn shortest_path(&self, query: &JourneyQuery) -> Result<ShortestPath, PlanError> {
        self.prepare(query)?;

        let overlay = QueryOverlay::setup(self.network, query, self.config);
        let outcome = search(&overlay, query);
        overlay.teardown();
        outcome
    }

    fn prepare(&self, query: &JourneyQuery) -> Result<(), PlanError> {
        query.validate()?;

        if self.config.reject_unknown_stations {
            for station in [&query.from, &query.to] {
                if !self.network.has_station(station) {
                    return Err(PlanError::UnknownStation(station.clone()));
                }
            }
        }

        Ok(())
    }
}

fn search(overlay: &QueryOverlay<'_>, query: &JourneyQuery) -> Result<ShortestPath, PlanError> {
    shortest_path(overlay, &NodeId::Start, &NodeId::End).ok_or_else(|| {
        debug!(from = %query.from, to = %query.to, "no path");
        PlanError::NoPath {
            from: query.from.clone(),
            to: query.to.clone(),
        }
    })
}
