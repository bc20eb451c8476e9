// SPDX-License-Identifier: MIT OR Apache-2.0
//! Port definitions for dialogue node inputs/outputs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Label given to the entry point's only output port
pub const ENTRY_PORT_LABEL: &str = "Next";

/// Unique identifier for a port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortId(pub Uuid);

impl PortId {
    /// Create a new random port ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PortId {
    fn default() -> Self {
        Self::new()
    }
}

/// Port direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortDirection {
    /// Input port
    Input,
    /// Output port
    Output,
}

/// How many edges may attach to a port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortCapacity {
    /// At most one edge
    Single,
    /// Any number of edges
    Multi,
}

/// A port on a dialogue node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    /// Unique port ID
    pub id: PortId,
    /// Display label; for outputs this is also the saved port name
    pub label: String,
    /// Port direction
    pub direction: PortDirection,
    /// Edge capacity
    pub capacity: PortCapacity,
}

impl Port {
    /// Create a new input port. Inputs accept any number of edges.
    pub fn input() -> Self {
        Self {
            id: PortId::new(),
            label: String::new(),
            direction: PortDirection::Input,
            capacity: PortCapacity::Multi,
        }
    }

    /// Create a new output port. Outputs hold a single edge.
    pub fn output(label: impl Into<String>) -> Self {
        Self {
            id: PortId::new(),
            label: label.into(),
            direction: PortDirection::Output,
            capacity: PortCapacity::Single,
        }
    }

    /// Whether this port accepts more than one edge
    pub fn is_multi(&self) -> bool {
        self.capacity == PortCapacity::Multi
    }

    /// Check if an edge between this port and another is valid
    pub fn can_connect(&self, other: &Port) -> bool {
        // Must be opposite directions
        self.direction != other.direction
    }
}

/// Default label for the next output port of a node that already has
/// `existing` output ports.
pub fn choice_label(existing: usize) -> String {
    format!("Choice {}", existing + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_capacities() {
        assert!(Port::input().is_multi());
        assert!(!Port::output("Choice 1").is_multi());
    }

    #[test]
    fn test_can_connect_requires_opposite_directions() {
        let out = Port::output("Choice 1");
        let other_out = Port::output("Choice 2");
        let input = Port::input();

        assert!(out.can_connect(&input));
        assert!(input.can_connect(&out));
        assert!(!out.can_connect(&other_out));
    }

    #[test]
    fn test_choice_label() {
        assert_eq!(choice_label(0), "Choice 1");
        assert_eq!(choice_label(2), "Choice 3");
    }
}
