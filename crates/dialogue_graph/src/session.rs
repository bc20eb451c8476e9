// SPDX-License-Identifier: MIT OR Apache-2.0
//! An editing session: one graph and the properties its nodes refer to.
//!
//! Front ends hold a `DialogueSession` and pass it to whatever needs the
//! active graph. Property edits go through the session so the graph can
//! tell the front end which speaker choice lists to refresh.

use crate::container::DialogueContainer;
use crate::error::Result;
use crate::events::GraphEvent;
use crate::export::{self, CsvQuoting};
use crate::graph::DialogueGraph;
use crate::node::NodeId;
use crate::properties::{ExposedProperty, ExposedPropertyTable};
use crate::serializer::{self, LoadSummary, NodeMaterializer};
use crate::storage::{validate_file_name, ContainerStore, SaveTarget};
use std::path::{Path, PathBuf};

/// The active dialogue graph and its exposed properties
#[derive(Debug, Clone, Default)]
pub struct DialogueSession {
    /// Nodes and edges
    pub graph: DialogueGraph,
    /// Speaker names and other exposed strings
    pub properties: ExposedPropertyTable,
}

impl DialogueSession {
    /// Start a session with an empty graph (entry point only)
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property, disambiguating its name. Returns the stored name.
    pub fn add_property(&mut self, name: &str) -> String {
        let stored = self.properties.add(name).property_name.clone();
        self.notify_choices(Vec::new());
        stored
    }

    /// Add a property under the default name. Returns the stored name.
    pub fn add_default_property(&mut self) -> String {
        let stored = self.properties.add_default().property_name.clone();
        self.notify_choices(Vec::new());
        stored
    }

    /// Rename a property.
    ///
    /// Nodes naming the old property keep their `speaker_id`; they are
    /// listed in the resulting event so the front end can refresh them.
    pub fn rename_property(&mut self, old_name: &str, new_name: &str) -> Result<()> {
        if let Err(err) = self.properties.rename(old_name, new_name) {
            tracing::warn!("Rename of property {} rejected: {}", old_name, err);
            return Err(err);
        }
        let referencing = self.graph.nodes_with_speaker(old_name);
        self.notify_choices(referencing);
        Ok(())
    }

    /// Remove a property. Nodes naming it keep the stale `speaker_id`.
    pub fn remove_property(&mut self, name: &str) -> Option<ExposedProperty> {
        let removed = self.properties.remove(name)?;
        let referencing = self.graph.nodes_with_speaker(name);
        self.notify_choices(referencing);
        Some(removed)
    }

    /// Remove every property
    pub fn clear_properties(&mut self) {
        self.properties.clear();
        self.notify_choices(Vec::new());
    }

    fn notify_choices(&mut self, referencing: Vec<NodeId>) {
        self.graph.emit(GraphEvent::SpeakerChoicesChanged {
            choices: self.properties.names(),
            referencing,
        });
    }

    /// Snapshot the session into a fresh container
    pub fn save(&self) -> Result<DialogueContainer> {
        serializer::serialize(&self.graph, &self.properties)
    }

    /// Replace the session's contents with a container's
    pub fn load<M>(
        &mut self,
        container: &DialogueContainer,
        materializer: &mut M,
    ) -> Result<LoadSummary>
    where
        M: NodeMaterializer + ?Sized,
    {
        let summary = serializer::deserialize(
            container,
            &mut self.graph,
            &mut self.properties,
            materializer,
        )?;
        self.notify_choices(Vec::new());
        tracing::info!(
            "Loaded {} nodes and {} links (entry point {})",
            summary.nodes,
            summary.links,
            summary.entry_name
        );
        Ok(summary)
    }

    /// Save into a store under `name`.
    ///
    /// Nothing is written if the name is invalid or the graph has no
    /// connections.
    pub fn save_to_store(
        &self,
        store: &ContainerStore,
        name: &str,
        target: SaveTarget,
    ) -> Result<PathBuf> {
        validate_file_name(name)?;
        let container = self.save().inspect_err(|err| {
            tracing::warn!("Not saving {}: {}", name, err);
        })?;
        store.save(name, &container, target)
    }

    /// Load the container saved under `name`.
    ///
    /// A missing container is reported and leaves the session as it was.
    pub fn load_from_store<M>(
        &mut self,
        store: &ContainerStore,
        name: &str,
        materializer: &mut M,
    ) -> Result<LoadSummary>
    where
        M: NodeMaterializer + ?Sized,
    {
        let container = store.load(name)?;
        self.load(&container, materializer)
    }

    /// Export the graph as CSV
    pub fn export_csv(&self, path: &Path, quoting: CsvQuoting) -> Result<usize> {
        export::export_csv(&self.graph, path, quoting)
    }

    /// Take every pending notification
    pub fn drain_events(&mut self) -> Vec<GraphEvent> {
        self.graph.drain_events()
    }
}
