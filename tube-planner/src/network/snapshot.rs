//! Flat-table representation of a network.
//!
//! A network round-trips through two tables, nodes and edges, which is all
//! an external persistence layer needs to store it.

use serde::{Deserialize, Serialize};

use super::key::NodeId;
use super::model::{EdgeKind, Endpoint, Movement, Network, NetworkError, Node};
use crate::domain::StationName;

/// Errors from restoring a network from a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// An event node row has no minute of day
    #[error("event node {0} has no minute of day")]
    MissingMinute(NodeId),

    /// Edge rows reference missing nodes or carry invalid costs
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// The JSON document is malformed
    #[error("snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One row of the nodes table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRow {
    pub id: NodeId,
    pub station: StationName,
    pub minute: Option<f64>,
    pub movement: Movement,
}

/// One row of the edges table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRow {
    pub from: NodeId,
    pub to: NodeId,
    #[serde(flatten)]
    pub kind: EdgeKind,
    pub cost: f64,
}

/// A network as two flat tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub nodes: Vec<NodeRow>,
    pub edges: Vec<EdgeRow>,
}

impl NetworkSnapshot {
    /// Serialize to a JSON string.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Rebuild the network described by these tables.
    pub fn into_network(self) -> Result<Network, SnapshotError> {
        let mut network = Network::new();

        for row in self.nodes {
            let node = match &row.id {
                NodeId::Event(_) => {
                    let minute = row
                        .minute
                        .ok_or_else(|| SnapshotError::MissingMinute(row.id.clone()))?;
                    Node::event(row.station, minute, row.movement)
                }
                NodeId::Start | NodeId::End => Node::Endpoint(Endpoint {
                    station: row.station,
                    minute: row.minute,
                    movement: row.movement,
                }),
            };
            network.add_node(row.id, node);
        }

        for row in self.edges {
            network.add_edge(&row.from, &row.to, row.kind, row.cost)?;
        }

        Ok(network)
    }
}

impl Network {
    /// Flatten the network into node and edge tables.
    pub fn snapshot(&self) -> NetworkSnapshot {
        let nodes = self
            .nodes()
            .map(|(id, node)| NodeRow {
                id: id.clone(),
                station: node.station().clone(),
                minute: node.minute(),
                movement: node.movement(),
            })
            .collect();

        let edges = self
            .edges()
            .map(|(from, edge)| EdgeRow {
                from: from.clone(),
                to: edge.to.clone(),
                kind: edge.kind.clone(),
                cost: edge.cost,
            })
            .collect();

        NetworkSnapshot { nodes, edges }
    }
}
