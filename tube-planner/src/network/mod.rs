//! The time-expanded network model.

mod key;
mod model;
mod snapshot;
mod view;

pub use key::{NodeId, StopKey};
pub use model::{Edge, EdgeKind, Endpoint, Movement, Network, NetworkError, Node, StopEvent};
pub use snapshot::{EdgeRow, NetworkSnapshot, NodeRow, SnapshotError};
pub use view::{GraphView, Neighbors};
