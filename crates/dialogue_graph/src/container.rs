// SPDX-License-Identifier: MIT OR Apache-2.0
//! The persisted snapshot of a dialogue graph.

use crate::connection::NodeLinkData;
use crate::error::{DialogueError, Result};
use crate::node::DialogueNodeData;
use crate::properties::ExposedProperty;
use serde::{Deserialize, Serialize};

/// Current container format version
pub const CONTAINER_FORMAT_VERSION: u32 = 1;

/// A dialogue graph flattened for storage.
///
/// Nodes are stored without the entry point and edges as name triples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueContainer {
    /// Format version
    #[serde(default = "default_version")]
    pub version: u32,
    /// Every node except the entry point
    #[serde(default)]
    pub nodes: Vec<DialogueNodeData>,
    /// Every edge, entry point links first
    #[serde(default)]
    pub links: Vec<NodeLinkData>,
    /// Exposed properties in table order
    #[serde(default)]
    pub exposed_properties: Vec<ExposedProperty>,
}

fn default_version() -> u32 {
    CONTAINER_FORMAT_VERSION
}

impl DialogueContainer {
    /// Create an empty container
    pub fn new() -> Self {
        Self {
            version: CONTAINER_FORMAT_VERSION,
            nodes: Vec::new(),
            links: Vec::new(),
            exposed_properties: Vec::new(),
        }
    }

    /// Parse a container from RON text
    pub fn from_ron(text: &str) -> Result<Self> {
        let container: DialogueContainer = ron::from_str(text)?;

        if container.version > CONTAINER_FORMAT_VERSION {
            return Err(DialogueError::UnsupportedVersion {
                found: container.version,
                supported: CONTAINER_FORMAT_VERSION,
            });
        }

        Ok(container)
    }

    /// Render the container as pretty RON
    pub fn to_ron(&self) -> Result<String> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);

        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Saved node record by name
    pub fn node(&self, unique_name: &str) -> Option<&DialogueNodeData> {
        self.nodes.iter().find(|n| n.unique_name == unique_name)
    }

    /// Links leaving the named node, in saved order
    pub fn links_from<'a>(
        &'a self,
        unique_name: &'a str,
    ) -> impl Iterator<Item = &'a NodeLinkData> {
        self.links.iter().filter(move |l| l.base_node_name == unique_name)
    }

    /// Base name of the first link that does not leave a saved record.
    ///
    /// Only the entry point has no record, so this is the name it carried
    /// when saved. `None` if the entry point had no links.
    pub fn entry_point_name(&self) -> Option<&str> {
        self.links
            .iter()
            .map(|l| l.base_node_name.as_str())
            .find(|base| self.node(base).is_none())
    }
}

impl Default for DialogueContainer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DialogueContainer {
        let mut container = DialogueContainer::new();
        container.nodes.push(DialogueNodeData::named("A").with_text("Hi", "Hello there"));
        container.nodes.push(DialogueNodeData::named("B"));
        container.links.push(NodeLinkData::new("ENTRYPOINT", "Next", "A"));
        container.links.push(NodeLinkData::new("A", "Choice 1", "B"));
        container.exposed_properties.push(ExposedProperty::new("Narrator"));
        container
    }

    #[test]
    fn test_ron_text_reloads() {
        let container = sample();
        let text = container.to_ron().unwrap();
        assert!(text.contains("DialogueContainer"));
        assert_eq!(DialogueContainer::from_ron(&text).unwrap(), container);
    }

    #[test]
    fn test_newer_version_rejected() {
        let err = DialogueContainer::from_ron("(version: 99)").unwrap_err();
        assert!(matches!(err, DialogueError::UnsupportedVersion { found: 99, .. }));
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let container = DialogueContainer::from_ron("()").unwrap();
        assert_eq!(container, DialogueContainer::new());
        assert!(container.entry_point_name().is_none());
    }

    #[test]
    fn test_lookups() {
        let container = sample();
        assert_eq!(container.entry_point_name(), Some("ENTRYPOINT"));
        assert_eq!(container.node("A").unwrap().response_text, "Hi");
        assert_eq!(container.links_from("A").count(), 1);
        assert_eq!(container.links_from("B").count(), 0);
    }

    #[test]
    fn test_entry_name_skips_record_links() {
        let mut container = sample();
        container.links.rotate_left(1);
        assert_eq!(container.links[0].base_node_name, "A");
        assert_eq!(container.entry_point_name(), Some("ENTRYPOINT"));

        container.links.retain(|l| l.base_node_name == "A");
        assert!(container.entry_point_name().is_none());
    }
}
