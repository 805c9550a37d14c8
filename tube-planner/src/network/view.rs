//! Read-only access to a graph.
//!
//! The search and the itinerary formatter only need to look nodes up and
//! walk outgoing edges. Abstracting that lets them run over a bare
//! [`Network`](super::Network) or over a query overlay layered on top of one.

use super::key::NodeId;
use super::model::{Edge, Node};

/// A read-only view of a weighted directed graph.
pub trait GraphView {
    /// Returns the attributes of a node.
    fn node(&self, id: &NodeId) -> Option<&Node>;

    /// Iterate over the outgoing edges of a node.
    fn outgoing(&self, id: &NodeId) -> Neighbors<'_>;

    /// Returns the edge from `from` to `to`, if there is one.
    fn edge(&self, from: &NodeId, to: &NodeId) -> Option<&Edge> {
        self.outgoing(from).find(|edge| &edge.to == to)
    }
}

/// Iterator over outgoing edges: a slice of stored edges, optionally
/// followed by one extra edge contributed by an overlay.
#[derive(Debug, Clone)]
pub struct Neighbors<'a> {
    edges: std::slice::Iter<'a, Edge>,
    extra: Option<&'a Edge>,
}

impl<'a> Neighbors<'a> {
    pub fn new(edges: &'a [Edge], extra: Option<&'a Edge>) -> Self {
        Self {
            edges: edges.iter(),
            extra,
        }
    }
}

impl<'a> Iterator for Neighbors<'a> {
    type Item = &'a Edge;

    fn next(&mut self) -> Option<Self::Item> {
        self.edges.next().or_else(|| self.extra.take())
    }
}
