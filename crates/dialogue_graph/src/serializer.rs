// SPDX-License-Identifier: MIT OR Apache-2.0
//! Conversion between a live session and a [`DialogueContainer`].
//!
//! ## Save
//!
//! Every connection becomes a `(base, port label, target)` link, every node
//! but the entry point becomes a record, and the property table is copied.
//! A graph without connections cannot be saved.
//!
//! ## Load
//!
//! The container is checked as a whole before anything in the session
//! changes. Then the graph is cleared down to its entry point and the entry
//! point takes its saved name: the base of the first link that does not
//! leave a saved record. Nodes are recreated one by one through a
//! [`NodeMaterializer`], ports are recreated from the links, links are
//! wired by name, and saved positions are applied last.

use crate::connection::NodeLinkData;
use crate::container::DialogueContainer;
use crate::error::{DialogueError, Result};
use crate::graph::DialogueGraph;
use crate::node::{DialogueNodeData, NodeId, ENTRY_POINT_NAME};
use crate::port::PortId;
use crate::properties::ExposedPropertyTable;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Front-end hook called once per node recreated during a load.
///
/// The node already exists in the graph when this runs; `node` is the handle
/// later events and edges refer to. Nodes are created at the origin and
/// moved to their saved position once every link is wired.
pub trait NodeMaterializer {
    /// Build the visual counterpart of a loaded node
    fn materialize(&mut self, node: NodeId, data: &DialogueNodeData, position: [f32; 2]);
}

impl<F> NodeMaterializer for F
where
    F: FnMut(NodeId, &DialogueNodeData, [f32; 2]),
{
    fn materialize(&mut self, node: NodeId, data: &DialogueNodeData, position: [f32; 2]) {
        self(node, data, position);
    }
}

/// What a load produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    /// `unique_name` the entry point ended up with
    pub entry_name: String,
    /// Nodes recreated, entry point excluded
    pub nodes: usize,
    /// Links wired
    pub links: usize,
}

/// Snapshot a graph and its properties into a new container
pub fn serialize(
    graph: &DialogueGraph,
    properties: &ExposedPropertyTable,
) -> Result<DialogueContainer> {
    let mut container = DialogueContainer::new();
    serialize_into(graph, properties, &mut container)?;
    Ok(container)
}

/// Append a snapshot of a graph and its properties to `container`.
///
/// Nothing is appended when the graph has no connections.
pub fn serialize_into(
    graph: &DialogueGraph,
    properties: &ExposedPropertyTable,
    container: &mut DialogueContainer,
) -> Result<()> {
    if graph.connection_count() == 0 {
        return Err(DialogueError::EmptyGraph);
    }

    let entry = graph.entry_point_id();
    let mut links: Vec<(bool, NodeLinkData)> = Vec::with_capacity(graph.connection_count());
    for connection in graph.connections() {
        let (Some(base), Some(target)) = (
            graph.node(connection.from_node),
            graph.node(connection.to_node),
        ) else {
            continue;
        };
        let Some(port) = base.port(connection.from_port) else {
            continue;
        };
        links.push((
            connection.from_node == entry,
            NodeLinkData::new(base.unique_name(), port.label.clone(), target.unique_name()),
        ));
    }
    // The loader renames the entry point after the first link's base node
    links.sort_by_key(|(from_entry, _)| !from_entry);
    container.links.extend(links.into_iter().map(|(_, link)| link));

    container.nodes.extend(graph.dialogue_nodes().map(|node| node.data.clone()));
    container.exposed_properties.extend(properties.iter().cloned());

    tracing::debug!(
        "Serialized {} nodes, {} links, {} properties",
        container.nodes.len(),
        container.links.len(),
        container.exposed_properties.len()
    );
    Ok(())
}

/// Rebuild a graph and property table from a container.
///
/// On error the graph and table are left exactly as they were.
pub fn deserialize<M>(
    container: &DialogueContainer,
    graph: &mut DialogueGraph,
    properties: &mut ExposedPropertyTable,
    materializer: &mut M,
) -> Result<LoadSummary>
where
    M: NodeMaterializer + ?Sized,
{
    let entry_name = loaded_entry_name(container);
    validate(container, graph, &entry_name)?;

    graph.clear_except_entry();
    graph.rename_entry_point(&entry_name);
    let entry = graph.entry_point_id();

    properties.clear();
    for property in &container.exposed_properties {
        properties.add(&property.property_name);
    }

    // Validation guarantees no record shares the entry point name
    let mut by_name: HashMap<&str, NodeId> = HashMap::new();
    by_name.insert(entry_name.as_str(), entry);

    for record in &container.nodes {
        let mut data = record.clone();
        data.position = [0.0, 0.0];
        let node_id = graph.add_named_node(data)?;
        materializer.materialize(node_id, record, [0.0, 0.0]);

        for link in container.links_from(&record.unique_name) {
            graph.add_output_port(node_id, Some(&link.port_name))?;
        }
        by_name.insert(record.unique_name.as_str(), node_id);
        tracing::debug!("Materialized node {}", record.unique_name);
    }

    // The j-th link leaving a node goes out through its j-th output port
    let mut next_port: HashMap<NodeId, usize> = HashMap::new();
    for link in &container.links {
        let base = resolve(&by_name, link, &link.base_node_name)?;
        let target = resolve(&by_name, link, &link.target_node_name)?;

        let cursor = next_port.entry(base).or_insert(0);
        let port: PortId = graph
            .node(base)
            .and_then(|node| node.output(*cursor))
            .map(|port| port.id)
            .ok_or_else(|| {
                DialogueError::CorruptContainer(format!(
                    "node {} has more links than output ports",
                    link.base_node_name
                ))
            })?;
        *cursor += 1;

        graph.connect_to_input(base, port, target)?;
    }

    for record in &container.nodes {
        if let Some(&node_id) = by_name.get(record.unique_name.as_str()) {
            graph.move_node(node_id, record.position)?;
        }
    }

    Ok(LoadSummary {
        entry_name,
        nodes: container.nodes.len(),
        links: container.links.len(),
    })
}

fn resolve(by_name: &HashMap<&str, NodeId>, link: &NodeLinkData, name: &str) -> Result<NodeId> {
    by_name
        .get(name)
        .copied()
        .ok_or_else(|| dangling(link, name))
}

fn dangling(link: &NodeLinkData, missing: &str) -> DialogueError {
    DialogueError::DanglingReference {
        base: link.base_node_name.clone(),
        port: link.port_name.clone(),
        target: link.target_node_name.clone(),
        missing: missing.to_string(),
    }
}

/// Name the entry point carries after loading `container`.
///
/// Without entry point links the default name is used, or a fresh one if a
/// record already has it. Never the name of a saved record.
fn loaded_entry_name(container: &DialogueContainer) -> String {
    if let Some(name) = container.entry_point_name() {
        return name.to_string();
    }
    if container.node(ENTRY_POINT_NAME).is_none() {
        return ENTRY_POINT_NAME.to_string();
    }
    Uuid::new_v4().to_string()
}

/// Reject anything that would fail halfway through a load
fn validate(container: &DialogueContainer, graph: &DialogueGraph, entry_name: &str) -> Result<()> {
    let mut records: HashSet<&str> = HashSet::new();
    for record in &container.nodes {
        if !records.insert(record.unique_name.as_str()) {
            return Err(DialogueError::CorruptContainer(format!(
                "duplicate node name {}",
                record.unique_name
            )));
        }
    }

    let entry_ports = graph.entry_point().outputs.len();
    let mut entry_links = 0;

    for link in &container.links {
        let base_is_record = records.contains(link.base_node_name.as_str());
        if !base_is_record {
            if link.base_node_name != entry_name {
                return Err(dangling(link, &link.base_node_name));
            }
            entry_links += 1;
        }
        if !records.contains(link.target_node_name.as_str()) {
            return Err(dangling(link, &link.target_node_name));
        }
        if link.base_node_name == link.target_node_name {
            return Err(DialogueError::CorruptContainer(format!(
                "node {} links to itself",
                link.base_node_name
            )));
        }
    }

    if entry_links > entry_ports {
        return Err(DialogueError::CorruptContainer(format!(
            "entry point {entry_name} has {entry_links} links but {entry_ports} output port(s)"
        )));
    }
    Ok(())
}
