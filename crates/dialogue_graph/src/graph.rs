// SPDX-License-Identifier: MIT OR Apache-2.0
//! The dialogue graph: nodes, output ports and the edges between them.

use crate::connection::{Connection, ConnectionId};
use crate::events::{EventQueue, GraphEvent};
use crate::node::{DialogueNode, DialogueNodeData, NodeId};
use crate::port::{choice_label, Port, PortDirection, PortId};
use indexmap::IndexMap;
use uuid::Uuid;

/// A dialogue graph.
///
/// Always holds exactly one entry point. Every connection joins two nodes
/// that are in the graph, and no output port carries more than one
/// connection.
#[derive(Debug, Clone)]
pub struct DialogueGraph {
    /// Nodes in creation order
    nodes: IndexMap<NodeId, DialogueNode>,
    /// Connections in creation order
    connections: IndexMap<ConnectionId, Connection>,
    /// The entry point
    entry: NodeId,
    /// Notifications not yet picked up by the front end
    events: EventQueue,
}

impl DialogueGraph {
    /// Create a graph holding only the entry point
    pub fn new() -> Self {
        let entry = DialogueNode::entry_point();
        let entry_id = entry.id;
        let mut nodes = IndexMap::new();
        nodes.insert(entry_id, entry);

        Self {
            nodes,
            connections: IndexMap::new(),
            entry: entry_id,
            events: EventQueue::new(),
        }
    }

    /// The entry point's ID
    pub fn entry_point_id(&self) -> NodeId {
        self.entry
    }

    /// The entry point
    pub fn entry_point(&self) -> &DialogueNode {
        &self.nodes[&self.entry]
    }

    /// Add a dialogue node under a freshly generated `unique_name`.
    ///
    /// The node gets one input port and no output ports.
    pub fn add_node(&mut self, mut data: DialogueNodeData, position: [f32; 2]) -> NodeId {
        data.unique_name = Uuid::new_v4().to_string();
        data.position = position;
        self.insert(DialogueNode::new(data))
    }

    /// Add a dialogue node keeping the `unique_name` and position in `data`
    pub fn add_named_node(&mut self, data: DialogueNodeData) -> Result<NodeId, GraphError> {
        if self.name_taken(&data.unique_name, None) {
            return Err(GraphError::DuplicateNodeName(data.unique_name));
        }
        Ok(self.insert(DialogueNode::new(data)))
    }

    fn insert(&mut self, node: DialogueNode) -> NodeId {
        let id = node.id;
        self.nodes.insert(id, node);
        self.events.push(GraphEvent::NodeAdded(id));
        id
    }

    /// Remove a node and every connection touching it
    pub fn remove_node(&mut self, node_id: NodeId) -> Result<DialogueNode, GraphError> {
        self.editable(node_id)?;

        let touching: Vec<ConnectionId> = self
            .connections_for_node(node_id)
            .map(|c| c.id)
            .collect();
        for connection_id in touching {
            self.connections.shift_remove(&connection_id);
            self.events.push(GraphEvent::Disconnected(connection_id));
        }

        let node = self
            .nodes
            .shift_remove(&node_id)
            .ok_or(GraphError::NodeNotFound(node_id))?;
        self.events.push(GraphEvent::NodeRemoved(node_id));
        Ok(node)
    }

    /// Move a node. The entry point is pinned.
    pub fn move_node(&mut self, node_id: NodeId, position: [f32; 2]) -> Result<(), GraphError> {
        self.editable(node_id)?;
        if let Some(node) = self.nodes.get_mut(&node_id) {
            node.data.position = position;
        }
        self.events.push(GraphEvent::NodeMoved { node: node_id, position });
        Ok(())
    }

    /// Edit a node's field data.
    ///
    /// The edit is discarded if it renames the node onto another node's
    /// `unique_name`.
    pub fn update_node<F>(&mut self, node_id: NodeId, edit: F) -> Result<(), GraphError>
    where
        F: FnOnce(&mut DialogueNodeData),
    {
        self.editable(node_id)?;
        let mut data = self.nodes[&node_id].data.clone();
        edit(&mut data);

        if self.name_taken(&data.unique_name, Some(node_id)) {
            return Err(GraphError::DuplicateNodeName(data.unique_name));
        }
        if let Some(node) = self.nodes.get_mut(&node_id) {
            node.data = data;
        }
        self.events.push(GraphEvent::NodeUpdated(node_id));
        Ok(())
    }

    /// Append an output port.
    ///
    /// Without a label (or with an empty one) the port is called
    /// `"Choice {n}"`, `n` being one more than the node's current output
    /// count.
    pub fn add_output_port(
        &mut self,
        node_id: NodeId,
        label: Option<&str>,
    ) -> Result<PortId, GraphError> {
        self.editable(node_id)?;
        let node = self
            .nodes
            .get_mut(&node_id)
            .ok_or(GraphError::NodeNotFound(node_id))?;

        let label = match label {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => choice_label(node.outputs.len()),
        };
        let port = Port::output(label.clone());
        let port_id = port.id;
        node.outputs.push(port);

        self.events.push(GraphEvent::PortAdded {
            node: node_id,
            port: port_id,
            label,
        });
        Ok(port_id)
    }

    /// Remove an output port, dropping its connection first
    pub fn remove_output_port(
        &mut self,
        node_id: NodeId,
        port_id: PortId,
    ) -> Result<Port, GraphError> {
        self.editable(node_id)?;
        let index = self.nodes[&node_id]
            .output_index(port_id)
            .ok_or(GraphError::PortNotFound(port_id))?;

        if let Some(connection_id) = self.connection_from(port_id).map(|c| c.id) {
            self.connections.shift_remove(&connection_id);
            self.events.push(GraphEvent::Disconnected(connection_id));
        }

        let port = match self.nodes.get_mut(&node_id) {
            Some(node) => node.outputs.remove(index),
            None => return Err(GraphError::NodeNotFound(node_id)),
        };
        self.events.push(GraphEvent::PortRemoved { node: node_id, port: port_id });
        Ok(port)
    }

    /// Connect an output port to an input port
    pub fn connect(
        &mut self,
        from_node: NodeId,
        from_port: PortId,
        to_node: NodeId,
        to_port: PortId,
    ) -> Result<ConnectionId, GraphError> {
        // Validate nodes exist
        let source_node = self
            .nodes
            .get(&from_node)
            .ok_or(GraphError::NodeNotFound(from_node))?;
        let target_node = self
            .nodes
            .get(&to_node)
            .ok_or(GraphError::NodeNotFound(to_node))?;

        // Validate ports exist
        let source_port = source_node
            .port(from_port)
            .ok_or(GraphError::PortNotFound(from_port))?;
        let target_port = target_node
            .port(to_port)
            .ok_or(GraphError::PortNotFound(to_port))?;

        if source_port.direction != PortDirection::Output || !source_port.can_connect(target_port) {
            return Err(GraphError::IncompatiblePorts);
        }

        if from_node == to_node {
            return Err(GraphError::SelfLoop);
        }

        if !source_port.is_multi() && self.connection_from(from_port).is_some() {
            return Err(GraphError::PortAlreadyConnected(from_port));
        }
        if !target_port.is_multi() && self.connections_to(to_port).next().is_some() {
            return Err(GraphError::PortAlreadyConnected(to_port));
        }

        let connection = Connection::new(from_node, from_port, to_node, to_port);
        let id = connection.id;
        self.connections.insert(id, connection);
        self.events.push(GraphEvent::Connected(id));
        Ok(id)
    }

    /// Connect an output port to the input port of `to_node`
    pub fn connect_to_input(
        &mut self,
        from_node: NodeId,
        from_port: PortId,
        to_node: NodeId,
    ) -> Result<ConnectionId, GraphError> {
        let target = self
            .nodes
            .get(&to_node)
            .ok_or(GraphError::NodeNotFound(to_node))?;
        let to_port = target
            .input
            .as_ref()
            .map(|p| p.id)
            .ok_or(GraphError::IncompatiblePorts)?;
        self.connect(from_node, from_port, to_node, to_port)
    }

    /// Remove a connection, freeing both ports
    pub fn disconnect(&mut self, connection_id: ConnectionId) -> Result<Connection, GraphError> {
        let connection = self
            .connections
            .shift_remove(&connection_id)
            .ok_or(GraphError::ConnectionNotFound(connection_id))?;
        self.events.push(GraphEvent::Disconnected(connection_id));
        Ok(connection)
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&DialogueNode> {
        self.nodes.get(&node_id)
    }

    /// Find a node by `unique_name`
    pub fn node_by_name(&self, unique_name: &str) -> Option<&DialogueNode> {
        self.nodes.values().find(|n| n.unique_name() == unique_name)
    }

    /// All nodes, entry point included, in creation order
    pub fn nodes(&self) -> impl Iterator<Item = &DialogueNode> {
        self.nodes.values()
    }

    /// All nodes except the entry point
    pub fn dialogue_nodes(&self) -> impl Iterator<Item = &DialogueNode> {
        self.nodes.values().filter(|n| !n.entry_point)
    }

    /// Number of nodes, entry point included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Nodes whose speaker is `property_name`
    pub fn nodes_with_speaker(&self, property_name: &str) -> Vec<NodeId> {
        self.dialogue_nodes()
            .filter(|n| n.data.speaker_id == property_name)
            .map(|n| n.id)
            .collect()
    }

    /// Get a connection by ID
    pub fn connection(&self, connection_id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&connection_id)
    }

    /// All connections in creation order
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    /// The connection leaving an output port, if any
    pub fn connection_from(&self, port_id: PortId) -> Option<&Connection> {
        self.connections.values().find(|c| c.starts_at(port_id))
    }

    /// Connections arriving at a port
    pub fn connections_to(&self, port_id: PortId) -> impl Iterator<Item = &Connection> {
        self.connections.values().filter(move |c| c.to_port == port_id)
    }

    /// Connections touching a node
    pub fn connections_for_node(&self, node_id: NodeId) -> impl Iterator<Item = &Connection> {
        self.connections.values().filter(move |c| c.involves_node(node_id))
    }

    /// Number of connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Targets of a node's connected output ports, in port order.
    ///
    /// Unconnected ports are skipped, so the result is not aligned with
    /// port indices.
    pub fn branch_targets(&self, node_id: NodeId) -> Vec<&DialogueNode> {
        let Some(node) = self.nodes.get(&node_id) else {
            return Vec::new();
        };
        node.outputs
            .iter()
            .filter_map(|port| self.connection_from(port.id))
            .filter_map(|c| self.nodes.get(&c.to_node))
            .collect()
    }

    /// Remove every node but the entry point, along with all connections
    pub fn clear_except_entry(&mut self) {
        for (id, _) in self.connections.drain(..) {
            self.events.push(GraphEvent::Disconnected(id));
        }
        let entry = self.entry;
        let removed: Vec<NodeId> = self.nodes.keys().copied().filter(|id| *id != entry).collect();
        for id in removed {
            self.nodes.shift_remove(&id);
            self.events.push(GraphEvent::NodeRemoved(id));
        }
    }

    /// Give the entry point a new `unique_name`
    pub(crate) fn rename_entry_point(&mut self, unique_name: &str) {
        if let Some(entry) = self.nodes.get_mut(&self.entry) {
            entry.data.unique_name = unique_name.to_string();
        }
    }

    /// Queue a notification for the front end
    pub(crate) fn emit(&mut self, event: GraphEvent) {
        self.events.push(event);
    }

    /// Take every pending notification
    pub fn drain_events(&mut self) -> Vec<GraphEvent> {
        self.events.drain()
    }

    fn editable(&self, node_id: NodeId) -> Result<(), GraphError> {
        if !self.nodes.contains_key(&node_id) {
            return Err(GraphError::NodeNotFound(node_id));
        }
        if node_id == self.entry {
            return Err(GraphError::EntryPointLocked);
        }
        Ok(())
    }

    fn name_taken(&self, unique_name: &str, except: Option<NodeId>) -> bool {
        self.nodes
            .values()
            .any(|n| Some(n.id) != except && n.unique_name() == unique_name)
    }
}

impl Default for DialogueGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Error from a graph edit
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Port not found
    #[error("Port not found: {0:?}")]
    PortNotFound(PortId),

    /// Connection not found
    #[error("Connection not found: {0:?}")]
    ConnectionNotFound(ConnectionId),

    /// Edge must run from an output port to an input port
    #[error("Incompatible ports")]
    IncompatiblePorts,

    /// Port is already connected
    #[error("Port already connected: {0:?}")]
    PortAlreadyConnected(PortId),

    /// Self-loop not allowed
    #[error("Self-loop not allowed")]
    SelfLoop,

    /// The entry point cannot be moved, edited or deleted
    #[error("The entry point cannot be modified")]
    EntryPointLocked,

    /// Another node already uses this name
    #[error("Node name already in use: {0}")]
    DuplicateNodeName(String),
}

impl GraphError {
    /// Whether this error rejects a requested connection
    pub fn is_invalid_connection(&self) -> bool {
        matches!(
            self,
            Self::IncompatiblePorts | Self::PortAlreadyConnected(_) | Self::SelfLoop
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::ENTRY_POINT_NAME;

    fn node(graph: &mut DialogueGraph) -> NodeId {
        graph.add_node(DialogueNodeData::default(), [0.0, 0.0])
    }

    fn input_of(graph: &DialogueGraph, node_id: NodeId) -> PortId {
        graph.node(node_id).unwrap().input.as_ref().unwrap().id
    }

    #[test]
    fn test_new_graph_has_entry_point() {
        let graph = DialogueGraph::new();
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.entry_point().unique_name(), ENTRY_POINT_NAME);
        assert_eq!(graph.dialogue_nodes().count(), 0);
    }

    #[test]
    fn test_add_node_generates_unique_names() {
        let mut graph = DialogueGraph::new();
        let a = graph.add_node(DialogueNodeData::named("ignored"), [5.0, 6.0]);
        let b = node(&mut graph);

        let a = graph.node(a).unwrap();
        let b = graph.node(b).unwrap();
        assert_ne!(a.unique_name(), "ignored");
        assert_ne!(a.unique_name(), b.unique_name());
        assert_eq!(a.position(), [5.0, 6.0]);
        assert!(a.outputs.is_empty());
        assert!(a.input.is_some());
    }

    #[test]
    fn test_add_named_node_rejects_duplicates() {
        let mut graph = DialogueGraph::new();
        graph.add_named_node(DialogueNodeData::named("Intro")).unwrap();
        let err = graph.add_named_node(DialogueNodeData::named("Intro")).unwrap_err();
        assert_eq!(err, GraphError::DuplicateNodeName("Intro".to_string()));
    }

    #[test]
    fn test_default_port_labels_count_current_ports() {
        let mut graph = DialogueGraph::new();
        let a = node(&mut graph);
        let first = graph.add_output_port(a, None).unwrap();
        graph.add_output_port(a, None).unwrap();
        graph.add_output_port(a, Some("Refuse")).unwrap();
        graph.remove_output_port(a, first).unwrap();
        graph.add_output_port(a, Some("")).unwrap();

        let labels: Vec<_> = graph
            .node(a)
            .unwrap()
            .outputs
            .iter()
            .map(|p| p.label.as_str())
            .collect();
        // Numbering follows the live count, so "Choice 3" can repeat an older label
        assert_eq!(labels, ["Choice 2", "Refuse", "Choice 3"]);
    }

    #[test]
    fn test_connect_rejects_self_loop() {
        let mut graph = DialogueGraph::new();
        let a = node(&mut graph);
        let port = graph.add_output_port(a, None).unwrap();
        let input = input_of(&graph, a);

        let err = graph.connect(a, port, a, input).unwrap_err();
        assert_eq!(err, GraphError::SelfLoop);
        assert!(err.is_invalid_connection());
    }

    #[test]
    fn test_output_port_holds_one_connection() {
        let mut graph = DialogueGraph::new();
        let a = node(&mut graph);
        let b = node(&mut graph);
        let c = node(&mut graph);
        let port = graph.add_output_port(a, None).unwrap();

        let first = graph.connect_to_input(a, port, b).unwrap();
        let err = graph.connect_to_input(a, port, c).unwrap_err();
        assert_eq!(err, GraphError::PortAlreadyConnected(port));

        graph.disconnect(first).unwrap();
        graph.connect_to_input(a, port, c).unwrap();
        assert_eq!(graph.connection_count(), 1);
        assert_eq!(graph.connection_from(port).unwrap().to_node, c);
    }

    #[test]
    fn test_input_port_accepts_many() {
        let mut graph = DialogueGraph::new();
        let a = node(&mut graph);
        let b = node(&mut graph);
        let target = node(&mut graph);
        let pa = graph.add_output_port(a, None).unwrap();
        let pb = graph.add_output_port(b, None).unwrap();

        graph.connect_to_input(a, pa, target).unwrap();
        graph.connect_to_input(b, pb, target).unwrap();
        assert_eq!(graph.connections_to(input_of(&graph, target)).count(), 2);
    }

    #[test]
    fn test_connect_requires_output_to_input() {
        let mut graph = DialogueGraph::new();
        let a = node(&mut graph);
        let b = node(&mut graph);
        let pa = graph.add_output_port(a, None).unwrap();
        let pb = graph.add_output_port(b, None).unwrap();

        assert_eq!(graph.connect(a, pa, b, pb).unwrap_err(), GraphError::IncompatiblePorts);
        let entry = graph.entry_point_id();
        assert_eq!(
            graph.connect_to_input(a, pa, entry).unwrap_err(),
            GraphError::IncompatiblePorts
        );
    }

    #[test]
    fn test_remove_output_port_drops_its_connection() {
        let mut graph = DialogueGraph::new();
        let a = node(&mut graph);
        let b = node(&mut graph);
        let c = node(&mut graph);
        let p1 = graph.add_output_port(a, None).unwrap();
        let p2 = graph.add_output_port(a, None).unwrap();
        graph.connect_to_input(a, p1, b).unwrap();
        graph.connect_to_input(a, p2, c).unwrap();

        let removed = graph.remove_output_port(a, p1).unwrap();
        assert_eq!(removed.label, "Choice 1");
        assert_eq!(graph.connection_count(), 1);
        assert!(graph.connections().all(|conn| conn.from_port != p1));
        assert_eq!(graph.node(a).unwrap().outputs.len(), 1);
    }

    #[test]
    fn test_remove_node_drops_connections() {
        let mut graph = DialogueGraph::new();
        let entry = graph.entry_point_id();
        let next = graph.entry_point().outputs[0].id;
        let a = node(&mut graph);
        let b = node(&mut graph);
        let pa = graph.add_output_port(a, None).unwrap();
        graph.connect_to_input(entry, next, a).unwrap();
        graph.connect_to_input(a, pa, b).unwrap();

        graph.remove_node(a).unwrap();
        assert_eq!(graph.connection_count(), 0);
        assert!(graph.node(a).is_none());
        assert!(graph.node(b).is_some());
    }

    #[test]
    fn test_entry_point_is_locked() {
        let mut graph = DialogueGraph::new();
        let entry = graph.entry_point_id();
        assert_eq!(graph.remove_node(entry).unwrap_err(), GraphError::EntryPointLocked);
        assert_eq!(graph.move_node(entry, [1.0, 1.0]).unwrap_err(), GraphError::EntryPointLocked);
        assert_eq!(graph.add_output_port(entry, None).unwrap_err(), GraphError::EntryPointLocked);
        assert_eq!(
            graph.update_node(entry, |d| d.body_text = "x".into()).unwrap_err(),
            GraphError::EntryPointLocked
        );
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_update_node_rolls_back_name_collision() {
        let mut graph = DialogueGraph::new();
        let a = graph.add_named_node(DialogueNodeData::named("A")).unwrap();
        graph.add_named_node(DialogueNodeData::named("B")).unwrap();

        let err = graph
            .update_node(a, |d| {
                d.unique_name = "B".into();
                d.body_text = "lost".into();
            })
            .unwrap_err();
        assert_eq!(err, GraphError::DuplicateNodeName("B".into()));
        assert_eq!(graph.node(a).unwrap().unique_name(), "A");
        assert!(graph.node(a).unwrap().data.body_text.is_empty());

        graph.update_node(a, |d| d.speaker_id = "Narrator".into()).unwrap();
        assert_eq!(graph.nodes_with_speaker("Narrator"), vec![a]);
    }

    #[test]
    fn test_branch_targets_skip_unconnected_ports() {
        let mut graph = DialogueGraph::new();
        let a = node(&mut graph);
        let b = node(&mut graph);
        let c = node(&mut graph);
        let p1 = graph.add_output_port(a, None).unwrap();
        let _gap = graph.add_output_port(a, None).unwrap();
        let p3 = graph.add_output_port(a, None).unwrap();
        graph.connect_to_input(a, p3, c).unwrap();
        graph.connect_to_input(a, p1, b).unwrap();

        let targets: Vec<NodeId> = graph.branch_targets(a).iter().map(|n| n.id).collect();
        assert_eq!(targets, vec![b, c]);
    }

    #[test]
    fn test_events_report_edits() {
        let mut graph = DialogueGraph::new();
        let a = node(&mut graph);
        let b = node(&mut graph);
        graph.drain_events();

        let port = graph.add_output_port(a, None).unwrap();
        let connection = graph.connect_to_input(a, port, b).unwrap();
        graph.move_node(b, [3.0, 4.0]).unwrap();

        assert_eq!(
            graph.drain_events(),
            vec![
                GraphEvent::PortAdded { node: a, port, label: "Choice 1".into() },
                GraphEvent::Connected(connection),
                GraphEvent::NodeMoved { node: b, position: [3.0, 4.0] },
            ]
        );
        assert!(graph.drain_events().is_empty());
    }

    #[test]
    fn test_clear_except_entry() {
        let mut graph = DialogueGraph::new();
        let entry = graph.entry_point_id();
        let next = graph.entry_point().outputs[0].id;
        let a = node(&mut graph);
        graph.connect_to_input(entry, next, a).unwrap();

        graph.clear_except_entry();
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.connection_count(), 0);
        assert_eq!(graph.entry_point_id(), entry);
    }
}
