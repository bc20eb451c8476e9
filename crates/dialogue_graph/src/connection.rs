// SPDX-License-Identifier: MIT OR Apache-2.0
//! Edges of the dialogue graph, live and persisted.
//!
//! A live [`Connection`] points at nodes and ports by id. Once saved it is
//! flattened into a [`NodeLinkData`] that refers to both nodes by their
//! `unique_name` and to the output port by its label.

use crate::node::NodeId;
use crate::port::PortId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    /// Create a new random connection ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

/// A directed edge from one node's output port to another node's input port
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// Unique connection ID
    pub id: ConnectionId,
    /// Source node
    pub from_node: NodeId,
    /// Output port on the source node
    pub from_port: PortId,
    /// Target node
    pub to_node: NodeId,
    /// Input port on the target node
    pub to_port: PortId,
}

impl Connection {
    pub(crate) fn new(
        from_node: NodeId,
        from_port: PortId,
        to_node: NodeId,
        to_port: PortId,
    ) -> Self {
        Self {
            id: ConnectionId::new(),
            from_node,
            from_port,
            to_node,
            to_port,
        }
    }

    /// Check if this connection touches a specific node
    pub fn involves_node(&self, node_id: NodeId) -> bool {
        self.from_node == node_id || self.to_node == node_id
    }

    /// Check if this connection leaves through a specific output port
    pub fn starts_at(&self, port_id: PortId) -> bool {
        self.from_port == port_id
    }
}

/// A saved edge: `(base node, output port label, target node)` by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeLinkData {
    /// `unique_name` of the node owning the output port
    pub base_node_name: String,
    /// Label of the output port
    pub port_name: String,
    /// `unique_name` of the node owning the input port
    pub target_node_name: String,
}

impl NodeLinkData {
    /// Create a link record
    pub fn new(
        base_node_name: impl Into<String>,
        port_name: impl Into<String>,
        target_node_name: impl Into<String>,
    ) -> Self {
        Self {
            base_node_name: base_node_name.into(),
            port_name: port_name.into(),
            target_node_name: target_node_name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_endpoints() {
        let (a, b, c) = (NodeId::new(), NodeId::new(), NodeId::new());
        let out = PortId::new();
        let connection = Connection::new(a, out, b, PortId::new());

        assert!(connection.involves_node(a));
        assert!(connection.involves_node(b));
        assert!(!connection.involves_node(c));
        assert!(connection.starts_at(out));
        assert!(!connection.starts_at(connection.to_port));
    }

    #[test]
    fn test_link_ron_layout() {
        let link = NodeLinkData::new("Intro", "Choice 1", "Greeting");
        let text = ron::to_string(&link).unwrap();
        assert!(text.contains("base_node_name"));
        let back: NodeLinkData = ron::from_str(&text).unwrap();
        assert_eq!(back, link);
    }
}
