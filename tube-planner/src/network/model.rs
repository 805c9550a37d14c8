//! The time-expanded network.
//!
//! Every scheduled stop event is a node. Edges are either riding a vehicle
//! to its next stop (`Travel`), waiting on the platform for a later
//! departure (`Wait`), or the query-scoped `Start`/`End` connections.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::key::NodeId;
use super::view::{GraphView, Neighbors};
use crate::domain::{LineName, StationName};

/// Errors from mutating the network.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NetworkError {
    /// An edge endpoint is not in the network
    #[error("node {0} is not in the network")]
    UnknownNode(NodeId),

    /// Edge costs must be finite and non-negative
    #[error("edge {from} -> {to} has invalid cost {cost}")]
    InvalidCost { from: NodeId, to: NodeId, cost: f64 },
}

/// Whether a stop event is a vehicle leaving or reaching a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Movement {
    Departure,
    Arrival,
}

/// A scheduled stop event.
#[derive(Debug, Clone, PartialEq)]
pub struct StopEvent {
    pub station: StationName,
    /// Minutes past midnight.
    pub minute: f64,
    pub movement: Movement,
}

/// A virtual query endpoint.
///
/// The minute is `None` on the side of the query whose time is unknown,
/// e.g. the end of a depart-after query.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub station: StationName,
    pub minute: Option<f64>,
    pub movement: Movement,
}

/// A node of the time-expanded graph.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Event(StopEvent),
    Endpoint(Endpoint),
}

impl Node {
    /// Create a stop event node.
    pub fn event(station: StationName, minute: f64, movement: Movement) -> Self {
        Node::Event(StopEvent {
            station,
            minute,
            movement,
        })
    }

    /// Returns the station this node belongs to.
    pub fn station(&self) -> &StationName {
        match self {
            Node::Event(event) => &event.station,
            Node::Endpoint(endpoint) => &endpoint.station,
        }
    }

    /// Returns the minute of day, if known.
    pub fn minute(&self) -> Option<f64> {
        match self {
            Node::Event(event) => Some(event.minute),
            Node::Endpoint(endpoint) => endpoint.minute,
        }
    }

    pub fn movement(&self) -> Movement {
        match self {
            Node::Event(event) => event.movement,
            Node::Endpoint(endpoint) => endpoint.movement,
        }
    }
}

/// What traversing an edge means for the traveller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EdgeKind {
    /// Riding a vehicle of the given line to its next stop.
    Travel { line: LineName },
    /// Staying at a station until a later departure.
    Wait,
    /// From the virtual start to a boardable event.
    Start,
    /// From an event to the virtual end.
    End,
}

impl EdgeKind {
    /// Short lowercase name, used in logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            EdgeKind::Travel { .. } => "travel",
            EdgeKind::Wait => "wait",
            EdgeKind::Start => "start",
            EdgeKind::End => "end",
        }
    }
}

/// A directed, weighted edge. The source is implied by the adjacency list
/// holding it.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub to: NodeId,
    pub kind: EdgeKind,
    /// Cost in minutes.
    pub cost: f64,
}

/// A time-expanded transit network.
///
/// Holds at most one edge per ordered pair of nodes; adding a second edge
/// between the same pair replaces the first. Iteration orders are sorted by
/// [`NodeId`], so two networks built from the same input behave identically.
#[derive(Debug, Clone, Default)]
pub struct Network {
    nodes: BTreeMap<NodeId, Node>,
    outgoing: BTreeMap<NodeId, Vec<Edge>>,
    incoming: BTreeMap<NodeId, BTreeSet<NodeId>>,
    stations: BTreeMap<StationName, BTreeSet<NodeId>>,
    edge_count: usize,
}

impl Network {
    /// Create an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, replacing the attributes of an existing node with the
    /// same id. Edges of a replaced node are kept.
    pub fn add_node(&mut self, id: NodeId, node: Node) {
        if let Some(previous) = self.nodes.get(&id) {
            if previous.station() != node.station() {
                let station = previous.station().clone();
                self.unindex_station(&station, &id);
            }
        }

        self.stations
            .entry(node.station().clone())
            .or_default()
            .insert(id.clone());
        self.nodes.insert(id, node);
    }

    /// Add a directed edge between two existing nodes.
    pub fn add_edge(
        &mut self,
        from: &NodeId,
        to: &NodeId,
        kind: EdgeKind,
        cost: f64,
    ) -> Result<(), NetworkError> {
        if !cost.is_finite() || cost < 0.0 {
            return Err(NetworkError::InvalidCost {
                from: from.clone(),
                to: to.clone(),
                cost,
            });
        }
        if !self.nodes.contains_key(from) {
            return Err(NetworkError::UnknownNode(from.clone()));
        }
        if !self.nodes.contains_key(to) {
            return Err(NetworkError::UnknownNode(to.clone()));
        }

        let edges = self.outgoing.entry(from.clone()).or_default();
        let edge = Edge {
            to: to.clone(),
            kind,
            cost,
        };
        match edges.iter_mut().find(|e| &e.to == to) {
            Some(existing) => *existing = edge,
            None => {
                edges.push(edge);
                self.edge_count += 1;
            }
        }

        self.incoming
            .entry(to.clone())
            .or_default()
            .insert(from.clone());
        Ok(())
    }

    /// Remove nodes and every edge touching them.
    ///
    /// Ids that are not in the network are ignored, so calling this twice
    /// with the same ids is harmless.
    pub fn remove_nodes<'a, I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = &'a NodeId>,
    {
        for id in ids {
            let Some(node) = self.nodes.remove(id) else {
                continue;
            };
            self.unindex_station(node.station(), id);

            if let Some(edges) = self.outgoing.remove(id) {
                self.edge_count -= edges.len();
                for edge in edges {
                    if let Some(sources) = self.incoming.get_mut(&edge.to) {
                        sources.remove(id);
                    }
                }
            }

            if let Some(sources) = self.incoming.remove(id) {
                for source in sources {
                    if let Some(edges) = self.outgoing.get_mut(&source) {
                        let before = edges.len();
                        edges.retain(|e| &e.to != id);
                        self.edge_count -= before - edges.len();
                    }
                }
            }
        }
    }

    /// Iterate over all nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = (&NodeId, &Node)> {
        self.nodes.iter()
    }

    /// Returns the attributes of a node.
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Returns true if the node is in the network.
    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Outgoing edges of a node. Unknown nodes have none.
    pub fn neighbors(&self, id: &NodeId) -> &[Edge] {
        self.outgoing.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate over all edges as `(from, edge)` pairs.
    pub fn edges(&self) -> impl Iterator<Item = (&NodeId, &Edge)> {
        self.outgoing
            .iter()
            .flat_map(|(from, edges)| edges.iter().map(move |edge| (from, edge)))
    }

    /// Ids of every node at exactly this station.
    pub fn nodes_at(&self, station: &StationName) -> impl Iterator<Item = &NodeId> {
        self.stations.get(station).into_iter().flatten()
    }

    /// Returns true if at least one node has this exact station name.
    pub fn has_station(&self, station: &StationName) -> bool {
        self.stations.contains_key(station)
    }

    /// Iterate over the distinct station names.
    pub fn stations(&self) -> impl Iterator<Item = &StationName> {
        self.stations.keys()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    fn unindex_station(&mut self, station: &StationName, id: &NodeId) {
        if let Some(ids) = self.stations.get_mut(station) {
            ids.remove(id);
            if ids.is_empty() {
                self.stations.remove(station);
            }
        }
    }
}

impl GraphView for Network {
    fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    fn outgoing(&self, id: &NodeId) -> Neighbors<'_> {
        Neighbors::new(self.neighbors(id), None)
    }
}
