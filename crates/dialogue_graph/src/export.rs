// SPDX-License-Identifier: MIT OR Apache-2.0
//! Flat CSV export of a dialogue graph, one row per dialogue node.

use crate::error::Result;
use crate::graph::DialogueGraph;
use crate::node::DialogueNode;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// Fixed header row
pub const CSV_HEADER: [&str; 10] = [
    "Name",
    "SpeakerId",
    "Text",
    "ResponseText",
    "Branches",
    "Traits",
    "Conditions",
    "PreAction",
    "PostAction",
    "AudioClip",
];

/// Separator between branch targets
pub const BRANCH_SEPARATOR: &str = ";";

/// How fields are quoted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CsvQuoting {
    /// `Text` and `ResponseText` are wrapped in double quotes as-is; embedded
    /// quotes and commas are not escaped. This is the layout downstream
    /// dialogue tables already import.
    #[default]
    Verbatim,
    /// Every field quoted, embedded quotes doubled (RFC 4180)
    Escaped,
}

/// Raw field values of one row, in [`CSV_HEADER`] order
pub fn csv_row(graph: &DialogueGraph, node: &DialogueNode) -> [String; 10] {
    let data = &node.data;
    let branches: Vec<&str> = graph
        .branch_targets(node.id)
        .into_iter()
        .map(DialogueNode::unique_name)
        .collect();

    [
        data.unique_name.clone(),
        data.speaker_id.clone(),
        data.body_text.clone(),
        data.response_text.clone(),
        branches.join(BRANCH_SEPARATOR),
        data.traits.clone(),
        data.conditions.clone(),
        data.pre_action.clone(),
        data.post_action.clone(),
        data.audio_clip.clone(),
    ]
}

/// Write the header and one row per dialogue node. Returns the row count.
pub fn write_csv<W: Write>(graph: &DialogueGraph, writer: W, quoting: CsvQuoting) -> Result<usize> {
    let quote_style = match quoting {
        CsvQuoting::Verbatim => csv::QuoteStyle::Never,
        CsvQuoting::Escaped => csv::QuoteStyle::Always,
    };
    let mut csv_writer = csv::WriterBuilder::new()
        .quote_style(quote_style)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv_writer.write_record(CSV_HEADER)?;

    let mut rows = 0;
    for node in graph.dialogue_nodes() {
        let mut row = csv_row(graph, node);
        if quoting == CsvQuoting::Verbatim {
            for text in &mut row[2..4] {
                *text = format!("\"{text}\"");
            }
        }
        csv_writer.write_record(&row)?;
        rows += 1;
    }

    csv_writer.flush()?;
    Ok(rows)
}

/// Export to a file, creating parent directories as needed
pub fn export_csv(graph: &DialogueGraph, path: &Path, quoting: CsvQuoting) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::File::create(path)?;
    let rows = write_csv(graph, std::io::BufWriter::new(file), quoting)?;

    tracing::info!("Exported {} dialogue rows to {:?}", rows, path);
    Ok(rows)
}
