// SPDX-License-Identifier: MIT OR Apache-2.0
//! Subcommand implementations.

use dialogue_graph::{
    DialogueGraph, DialogueNode, DialogueNodeData, DialogueSession, EditorSettings, NodeId,
    NodeMaterializer, Result,
};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Materializer for a headless session: nothing to draw, so it only logs
#[derive(Debug, Default)]
struct LoggingMaterializer {
    created: usize,
}

impl NodeMaterializer for LoggingMaterializer {
    fn materialize(&mut self, node: NodeId, data: &DialogueNodeData, position: [f32; 2]) {
        self.created += 1;
        tracing::debug!("Node {} ({:?}) at {:?}", data.unique_name, node, position);
    }
}

/// Load a saved graph, `settings.default_file_name` if no name is given
fn open(project: &Path, name: Option<&str>) -> Result<(EditorSettings, DialogueSession)> {
    let settings = EditorSettings::load_or_default(project)?;
    let store = settings.container_store(project);
    let name = name.unwrap_or(settings.default_file_name.as_str());

    let mut session = DialogueSession::new();
    let mut materializer = LoggingMaterializer::default();
    session.load_from_store(&store, name, &mut materializer)?;

    // No view to keep in sync
    let events = session.drain_events();
    tracing::debug!(
        "Materialized {} nodes, dropped {} events",
        materializer.created,
        events.len()
    );

    Ok((settings, session))
}

/// Export a saved graph. Returns the output path and the row count.
pub fn export(
    project: &Path,
    name: Option<&str>,
    out: Option<PathBuf>,
) -> Result<(PathBuf, usize)> {
    let (settings, session) = open(project, name)?;
    let path = out.unwrap_or_else(|| settings.csv_path(project));
    let rows = session.export_csv(&path, settings.csv_quoting)?;
    Ok((path, rows))
}

/// Text outline of a saved graph
pub fn inspect(project: &Path, name: Option<&str>) -> Result<String> {
    let (_, session) = open(project, name)?;
    Ok(outline(&session))
}

/// Names of the saved graphs
pub fn list(project: &Path) -> Result<Vec<String>> {
    let settings = EditorSettings::load_or_default(project)?;
    settings.container_store(project).list()
}

/// Write default settings unless a file exists and `force` is off
pub fn init_settings(project: &Path, force: bool) -> Result<PathBuf> {
    let path = EditorSettings::settings_file_path(project);
    if path.exists() && !force {
        tracing::warn!("Keeping existing settings at {:?}", path);
        return Ok(path);
    }

    std::fs::create_dir_all(project)?;
    EditorSettings::default().save(&path)?;
    tracing::info!("Wrote default settings to {:?}", path);
    Ok(path)
}

fn outline(session: &DialogueSession) -> String {
    let graph = &session.graph;
    let mut text = String::new();

    let _ = writeln!(text, "Properties: {}", session.properties.names().join(", "));
    write_node(&mut text, graph, graph.entry_point());
    for node in graph.dialogue_nodes() {
        write_node(&mut text, graph, node);
    }
    text
}

fn write_node(text: &mut String, graph: &DialogueGraph, node: &DialogueNode) {
    if node.entry_point {
        let _ = writeln!(text, "{} (entry point)", node.unique_name());
    } else if node.data.speaker_id.is_empty() {
        let _ = writeln!(text, "{}", node.unique_name());
    } else {
        let _ = writeln!(text, "{} [{}]", node.unique_name(), node.data.speaker_id);
    }

    for port in &node.outputs {
        let target = graph
            .connection_from(port.id)
            .and_then(|connection| graph.node(connection.to_node))
            .map_or("-", DialogueNode::unique_name);
        let _ = writeln!(text, "  {} -> {}", port.label, target);
    }
}
