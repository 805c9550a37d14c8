//! Per-query augmentation of the network.
//!
//! A query needs a virtual `Start` node wired to every boardable event at
//! the origin, and a virtual `End` node wired from every usable event at
//! the destination. Rather than inserting those into the shared network
//! and removing them afterwards, the overlay keeps them to itself and
//! borrows the network read-only. Dropping the overlay is the teardown,
//! so nothing can leak into the next query whichever way this one ends.

use std::collections::HashMap;

use tracing::{debug, trace};

use super::config::PlannerConfig;
use super::query::{JourneyQuery, QueryMode};
use crate::network::{
    Edge, EdgeKind, Endpoint, GraphView, Movement, Neighbors, Network, Node, NodeId,
};

/// A network plus the `Start`/`End` nodes and edges of one query.
///
/// Any `Start` or `End` node stored in the base network is shadowed.
#[derive(Debug)]
pub struct QueryOverlay<'a> {
    base: &'a Network,
    start: Node,
    end: Node,
    start_edges: Vec<Edge>,
    end_edges: HashMap<NodeId, Edge>,
}

impl<'a> QueryOverlay<'a> {
    /// Build the overlay for a query.
    pub fn setup(base: &'a Network, query: &JourneyQuery, config: &PlannerConfig) -> Self {
        let requested = query.requested_minute;
        let (start_minute, end_minute) = match query.mode {
            QueryMode::DepartAfter => (Some(requested), None),
            QueryMode::ArriveBefore => (None, Some(requested)),
        };

        let start = Node::Endpoint(Endpoint {
            station: query.from.clone(),
            minute: start_minute,
            movement: Movement::Departure,
        });
        let end = Node::Endpoint(Endpoint {
            station: query.to.clone(),
            minute: end_minute,
            movement: Movement::Arrival,
        });

        let mut start_edges = Vec::new();
        for id in base.nodes_at(&query.from) {
            let Some(minute) = event_minute(base, id) else {
                continue;
            };
            let cost = match query.mode {
                // Wait on the platform until this train leaves
                QueryMode::DepartAfter if minute >= requested => minute - requested,
                QueryMode::ArriveBefore if minute <= requested => 0.0,
                _ => continue,
            };
            if !config.within_window((minute - requested).abs()) {
                continue;
            }
            start_edges.push(Edge {
                to: id.clone(),
                kind: EdgeKind::Start,
                cost,
            });
        }

        let mut end_edges = HashMap::new();
        for id in base.nodes_at(&query.to) {
            let Some(minute) = event_minute(base, id) else {
                continue;
            };
            let cost = match query.mode {
                QueryMode::DepartAfter if minute >= requested => 0.0,
                // Time to spare before the deadline
                QueryMode::ArriveBefore if minute <= requested => requested - minute,
                _ => continue,
            };
            if !config.within_window((minute - requested).abs()) {
                continue;
            }
            end_edges.insert(
                id.clone(),
                Edge {
                    to: NodeId::End,
                    kind: EdgeKind::End,
                    cost,
                },
            );
        }

        debug!(
            from = %query.from,
            to = %query.to,
            minute = requested,
            mode = ?query.mode,
            start_edges = start_edges.len(),
            end_edges = end_edges.len(),
            "query overlay ready"
        );

        Self {
            base,
            start,
            end,
            start_edges,
            end_edges,
        }
    }

    /// Edges leaving `Start`.
    pub fn start_edges(&self) -> &[Edge] {
        &self.start_edges
    }

    /// Edges entering `End`, keyed by their source node.
    pub fn end_edges(&self) -> impl Iterator<Item = (&NodeId, &Edge)> {
        self.end_edges.iter()
    }

    /// Number of edges the overlay adds to the base network.
    pub fn added_edge_count(&self) -> usize {
        self.start_edges.len() + self.end_edges.len()
    }

    /// Discard the overlay's nodes and edges.
    pub fn teardown(self) {
        trace!(
            removed_edges = self.added_edge_count(),
            "query overlay torn down"
        );
    }
}

impl GraphView for QueryOverlay<'_> {
    fn node(&self, id: &NodeId) -> Option<&Node> {
        match id {
            NodeId::Start => Some(&self.start),
            NodeId::End => Some(&self.end),
            NodeId::Event(_) => self.base.node(id),
        }
    }

    fn outgoing(&self, id: &NodeId) -> Neighbors<'_> {
        match id {
            NodeId::Start => Neighbors::new(&self.start_edges, None),
            NodeId::End => Neighbors::new(&[], None),
            NodeId::Event(_) => {
                Neighbors::new(self.base.neighbors(id), self.end_edges.get(id))
            }
        }
    }
}

/// Minute of a real stop event; virtual nodes in the base are skipped.
fn event_minute(network: &Network, id: &NodeId) -> Option<f64> {
    match network.node(id)? {
        Node::Event(event) => Some(event.minute),
        Node::Endpoint(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{node_id, station, tube_network};

    fn depart_after(from: &str, to: &str, minute: f64) -> JourneyQuery {
        JourneyQuery::depart_after(station(from), station(to), minute)
    }

    fn arrive_before(from: &str, to: &str, minute: f64) -> JourneyQuery {
        JourneyQuery::arrive_before(station(from), station(to), minute)
    }

    #[test]
    fn depart_after_costs() {
        let network = tube_network();
        let query = depart_after("Bank", "Victoria", 540.0);
        let overlay = QueryOverlay::setup(&network, &query, &PlannerConfig::default());

        // CEN-0 left Bank at 530; only CEN-1 at 541 is boardable
        assert_eq!(overlay.start_edges().len(), 1);
        assert_eq!(overlay.start_edges()[0].to, node_id("CEN-1", "BNK"));
        assert_eq!(overlay.start_edges()[0].cost, 1.0);

        // Every Victoria arrival is after 09:00 and costs nothing extra
        let mut ends: Vec<_> = overlay
            .end_edges()
            .map(|(from, edge)| (from.clone(), edge.cost))
            .collect();
        ends.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(
            ends,
            vec![
                (node_id("RV1-0", "VIC"), 0.0),
                (node_id("VIC-0", "VIC"), 0.0),
                (node_id("VIC-1", "VIC"), 0.0),
            ]
        );
    }

    #[test]
    fn arrive_before_costs() {
        let network = tube_network();
        let query = arrive_before("Bank", "Victoria", 550.0);
        let overlay = QueryOverlay::setup(&network, &query, &PlannerConfig::default());

        let starts: Vec<_> = overlay
            .start_edges()
            .iter()
            .map(|e| (e.to.clone(), e.cost))
            .collect();
        assert_eq!(
            starts,
            vec![(node_id("CEN-0", "BNK"), 0.0), (node_id("CEN-1", "BNK"), 0.0)]
        );

        // Slack is requested minus arrival, never the reverse
        let mut ends: Vec<_> = overlay
            .end_edges()
            .map(|(from, edge)| (from.clone(), edge.cost))
            .collect();
        ends.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(
            ends,
            vec![(node_id("RV1-0", "VIC"), 2.0), (node_id("VIC-0", "VIC"), 7.0)]
        );
    }

    #[test]
    fn endpoint_times_follow_mode() {
        let network = tube_network();
        let config = PlannerConfig::default();

        let query = depart_after("Bank", "Victoria", 540.0);
        let overlay = QueryOverlay::setup(&network, &query, &config);
        assert_eq!(overlay.node(&NodeId::Start).unwrap().minute(), Some(540.0));
        assert_eq!(overlay.node(&NodeId::End).unwrap().minute(), None);

        let query = arrive_before("Bank", "Victoria", 560.0);
        let overlay = QueryOverlay::setup(&network, &query, &config);
        assert_eq!(overlay.node(&NodeId::Start).unwrap().minute(), None);
        assert_eq!(overlay.node(&NodeId::End).unwrap().minute(), Some(560.0));
        assert_eq!(
            overlay.node(&NodeId::End).unwrap().station(),
            &station("Victoria")
        );
    }

    #[test]
    fn station_match_is_exact() {
        let network = tube_network();
        let query = depart_after("Bank", "Victoria", 540.0);
        let overlay = QueryOverlay::setup(&network, &query, &PlannerConfig::default());

        for edge in overlay.start_edges() {
            assert_eq!(network.node(&edge.to).unwrap().station(), &station("Bank"));
        }
        assert!(
            overlay
                .start_edges()
                .iter()
                .all(|e| e.to != node_id("RV1-0", "BSD"))
        );
    }

    #[test]
    fn window_limits_candidates() {
        let network = tube_network();
        let query = depart_after("Oxford Circus", "Victoria", 538.0);

        let overlay = QueryOverlay::setup(&network, &query, &PlannerConfig::default());
        assert_eq!(overlay.start_edges().len(), 4);

        let config = PlannerConfig::new(true, Some(5.0));
        let overlay = QueryOverlay::setup(&network, &query, &config);
        let starts: Vec<_> = overlay
            .start_edges()
            .iter()
            .map(|e| e.to.clone())
            .collect();
        assert_eq!(
            starts,
            vec![node_id("CEN-0", "OXC-C"), node_id("VIC-0", "OXC-V")]
        );
    }

    #[test]
    fn overlay_adds_edges_to_view_only() {
        let network = tube_network();
        let query = depart_after("Bank", "Victoria", 540.0);
        let overlay = QueryOverlay::setup(&network, &query, &PlannerConfig::default());

        let from = node_id("VIC-1", "VIC");
        assert!(network.neighbors(&from).is_empty());
        let through_overlay: Vec<_> = overlay.outgoing(&from).map(|e| e.to.clone()).collect();
        assert_eq!(through_overlay, vec![NodeId::End]);

        assert!(!network.contains(&NodeId::Start));
        assert_eq!(overlay.outgoing(&NodeId::End).count(), 0);
        assert_eq!(overlay.added_edge_count(), 4);

        overlay.teardown();
        assert!(!network.contains(&NodeId::End));
    }
}
