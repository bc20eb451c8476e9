// SPDX-License-Identifier: MIT OR Apache-2.0
//! Dialogue node definitions.

use crate::port::{Port, PortId, ENTRY_PORT_LABEL};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `unique_name` (and response text) of a freshly created entry point
pub const ENTRY_POINT_NAME: &str = "ENTRYPOINT";

/// Where the entry point sits on a new canvas
pub const ENTRY_POINT_POSITION: [f32; 2] = [100.0, 200.0];

/// Unique identifier for a node instance.
///
/// This is the handle the front end holds on to; it never leaves the
/// session. Saved data refers to nodes by `unique_name` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// The persisted field set of a dialogue node.
///
/// Everything except `unique_name`, `speaker_id` and `position` is opaque
/// text interpreted by game logic downstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DialogueNodeData {
    /// Identifier unique within a graph, used as the link join key
    pub unique_name: String,
    /// Name of an exposed property; may be stale
    #[serde(default)]
    pub speaker_id: String,
    /// Short label shown as the choice leading into this node
    #[serde(default)]
    pub response_text: String,
    /// Long dialogue text
    #[serde(default)]
    pub body_text: String,
    /// Character traits gating this line
    #[serde(default)]
    pub traits: String,
    /// Conditions evaluated before offering this node
    #[serde(default)]
    pub conditions: String,
    /// Action run before the line plays
    #[serde(default)]
    pub pre_action: String,
    /// Action run after the line plays
    #[serde(default)]
    pub post_action: String,
    /// Voice-over clip reference
    #[serde(default)]
    pub audio_clip: String,
    /// Canvas position
    #[serde(default)]
    pub position: [f32; 2],
}

impl DialogueNodeData {
    /// Create node data with the given name and empty text fields
    pub fn named(unique_name: impl Into<String>) -> Self {
        Self {
            unique_name: unique_name.into(),
            ..Default::default()
        }
    }

    /// Set the speaker
    pub fn with_speaker(mut self, speaker_id: impl Into<String>) -> Self {
        self.speaker_id = speaker_id.into();
        self
    }

    /// Set the response and body text
    pub fn with_text(
        mut self,
        response_text: impl Into<String>,
        body_text: impl Into<String>,
    ) -> Self {
        self.response_text = response_text.into();
        self.body_text = body_text.into();
        self
    }
}

/// A node instance in the dialogue graph
#[derive(Debug, Clone, PartialEq)]
pub struct DialogueNode {
    /// Unique instance ID
    pub id: NodeId,
    /// Persisted fields, including position
    pub data: DialogueNodeData,
    /// Whether this is the graph's starting node
    pub entry_point: bool,
    /// Input port; `None` only on the entry point
    pub input: Option<Port>,
    /// Output ports in display order
    pub outputs: Vec<Port>,
}

impl DialogueNode {
    /// Create a regular dialogue node with one input and no outputs
    pub fn new(data: DialogueNodeData) -> Self {
        Self {
            id: NodeId::new(),
            data,
            entry_point: false,
            input: Some(Port::input()),
            outputs: Vec::new(),
        }
    }

    /// Create the entry point: no input, a single `"Next"` output
    pub fn entry_point() -> Self {
        let data = DialogueNodeData {
            unique_name: ENTRY_POINT_NAME.to_string(),
            response_text: ENTRY_POINT_NAME.to_string(),
            position: ENTRY_POINT_POSITION,
            ..Default::default()
        };

        Self {
            id: NodeId::new(),
            data,
            entry_point: true,
            input: None,
            outputs: vec![Port::output(ENTRY_PORT_LABEL)],
        }
    }

    /// The node's `unique_name`
    pub fn unique_name(&self) -> &str {
        &self.data.unique_name
    }

    /// Canvas position
    pub fn position(&self) -> [f32; 2] {
        self.data.position
    }

    /// Get an output port by index
    pub fn output(&self, index: usize) -> Option<&Port> {
        self.outputs.get(index)
    }

    /// Index of an output port
    pub fn output_index(&self, port_id: PortId) -> Option<usize> {
        self.outputs.iter().position(|p| p.id == port_id)
    }

    /// Get a port by ID
    pub fn port(&self, port_id: PortId) -> Option<&Port> {
        self.input
            .iter()
            .chain(self.outputs.iter())
            .find(|p| p.id == port_id)
    }

    /// Get all ports
    pub fn ports(&self) -> impl Iterator<Item = &Port> {
        self.input.iter().chain(self.outputs.iter())
    }
}
