// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error type shared by the session, serializer and storage layers.

use crate::graph::GraphError;
use thiserror::Error;

/// Dialogue core errors.
///
/// Every variant is reported back to the caller; none of them leaves the
/// session in a half-edited state.
#[derive(Debug, Error)]
pub enum DialogueError {
    /// Save requested on a graph without a single connection
    #[error("The graph has no connections; nothing to save")]
    EmptyGraph,

    /// No container stored under this name
    #[error("Target dialogue graph file does not exist: {0}")]
    FileNotFound(String),

    /// A property with this name already exists
    #[error("Property with name: {0} already defined!")]
    DuplicateName(String),

    /// No property with this name
    #[error("Property not found: {0}")]
    PropertyNotFound(String),

    /// A saved link names a node that is not in the container
    #[error("Link {base} ({port}) -> {target} references unknown node {missing}")]
    DanglingReference {
        /// Link base node name
        base: String,
        /// Link port name
        port: String,
        /// Link target node name
        target: String,
        /// The name that did not resolve
        missing: String,
    },

    /// The container is structurally unusable
    #[error("Corrupt dialogue container: {0}")]
    CorruptContainer(String),

    /// Empty or path-like container name
    #[error("Invalid file name: {0:?}")]
    InvalidFileName(String),

    /// File written by a newer format
    #[error("Format version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version in the file
        found: u32,
        /// Newest version this build reads
        supported: u32,
    },

    /// Graph edit rejected
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// RON encoding error
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),

    /// RON decoding error
    #[error("Deserialization error: {0}")]
    Deserialize(#[from] ron::error::SpannedError),

    /// CSV writer error
    #[error("CSV export error: {0}")]
    Csv(#[from] csv::Error),
}

impl DialogueError {
    /// Whether this is a rejected connection request
    pub fn is_invalid_connection(&self) -> bool {
        matches!(self, Self::Graph(err) if err.is_invalid_connection())
    }
}

/// Result type for dialogue operations
pub type Result<T> = std::result::Result<T, DialogueError>;
