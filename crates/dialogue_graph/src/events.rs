// SPDX-License-Identifier: MIT OR Apache-2.0
//! Notifications from the core to the front end.
//!
//! The core never touches widgets. Anything a front end needs to redraw is
//! queued as a [`GraphEvent`] and picked up with
//! [`DialogueGraph::drain_events`](crate::DialogueGraph::drain_events).

use crate::connection::ConnectionId;
use crate::node::NodeId;
use crate::port::PortId;

/// Something the front end should reflect
#[derive(Debug, Clone, PartialEq)]
pub enum GraphEvent {
    /// A node was created
    NodeAdded(NodeId),
    /// A node and its edges were removed
    NodeRemoved(NodeId),
    /// A node was placed at a new position
    NodeMoved {
        /// Node that moved
        node: NodeId,
        /// New canvas position
        position: [f32; 2],
    },
    /// A node's field data was edited
    NodeUpdated(NodeId),
    /// An output port was appended; render a selector for it
    PortAdded {
        /// Owning node
        node: NodeId,
        /// New port
        port: PortId,
        /// Port label
        label: String,
    },
    /// An output port was removed
    PortRemoved {
        /// Owning node
        node: NodeId,
        /// Removed port
        port: PortId,
    },
    /// An edge was created
    Connected(ConnectionId),
    /// An edge was removed
    Disconnected(ConnectionId),
    /// The exposed property names changed; refresh every speaker choice list
    SpeakerChoicesChanged {
        /// Current property names, in table order
        choices: Vec<String>,
        /// Nodes whose `speaker_id` names the renamed or removed property
        referencing: Vec<NodeId>,
    },
}

/// FIFO of pending events
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    pending: Vec<GraphEvent>,
}

impl EventQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event
    pub fn push(&mut self, event: GraphEvent) {
        self.pending.push(event);
    }

    /// Take every pending event, oldest first
    pub fn drain(&mut self) -> Vec<GraphEvent> {
        std::mem::take(&mut self.pending)
    }

    /// Number of pending events
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is pending
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
