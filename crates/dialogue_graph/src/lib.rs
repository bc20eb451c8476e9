// SPDX-License-Identifier: MIT OR Apache-2.0
//! Branching dialogue graphs for narrative tools.
//!
//! This crate provides the editor-independent core of a dialogue editor:
//! - A graph of dialogue nodes with one fixed entry point
//! - Exposed properties (speaker names) shared by the nodes
//! - Save/load through a flat, name-keyed container
//! - CSV export for dialogue tables
//!
//! ## Architecture
//!
//! The model is built around a [`DialogueGraph`] with:
//! - Single-capacity choice ports and multi-capacity inputs
//! - Connection validation
//! - An event queue front ends drain to keep their views in sync
//! - A [`NodeMaterializer`] seam so loads can create front-end nodes
//!
//! [`DialogueSession`] ties a graph to its [`ExposedPropertyTable`] and to
//! the [`ContainerStore`] on disk.

pub mod port;
pub mod connection;
pub mod node;
pub mod graph;
pub mod events;
pub mod properties;
pub mod container;
pub mod serializer;
pub mod export;
pub mod storage;
pub mod settings;
pub mod session;
pub mod error;

pub use port::{Port, PortCapacity, PortDirection, PortId};
pub use connection::{Connection, ConnectionId, NodeLinkData};
pub use node::{DialogueNode, DialogueNodeData, NodeId, ENTRY_POINT_NAME};
pub use graph::{DialogueGraph, GraphError};
pub use events::{EventQueue, GraphEvent};
pub use properties::{ExposedProperty, ExposedPropertyTable};
pub use container::DialogueContainer;
pub use serializer::{LoadSummary, NodeMaterializer};
pub use export::CsvQuoting;
pub use storage::{ContainerStore, SaveTarget};
pub use settings::EditorSettings;
pub use session::DialogueSession;
pub use error::{DialogueError, Result};
