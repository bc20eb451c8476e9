// SPDX-License-Identifier: MIT OR Apache-2.0
//! File-system storage for dialogue containers.
//!
//! Containers live under a resources directory as `<name>.ron`, one per
//! file. Temporary saves go to a subdirectory of it.

use crate::container::DialogueContainer;
use crate::error::{DialogueError, Result};
use std::path::{Path, PathBuf};

/// Extension of stored containers
pub const CONTAINER_EXTENSION: &str = "ron";

/// Default name of the temporary-save subdirectory
pub const DEFAULT_TEMP_DIR: &str = "Tmp";

/// Where a save goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveTarget {
    /// The resources directory itself; loadable by name
    #[default]
    Primary,
    /// The temporary subdirectory
    Temporary,
}

/// Reject names that are empty or would escape the store directory
pub fn validate_file_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || name.contains(['/', '\\'])
    {
        return Err(DialogueError::InvalidFileName(name.to_string()));
    }
    Ok(())
}

/// A directory of named containers
#[derive(Debug, Clone)]
pub struct ContainerStore {
    root: PathBuf,
    temp_dir: String,
}

impl ContainerStore {
    /// Create a store rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            temp_dir: DEFAULT_TEMP_DIR.to_string(),
        }
    }

    /// Use a different temporary subdirectory
    pub fn with_temp_dir(mut self, temp_dir: impl Into<String>) -> Self {
        self.temp_dir = temp_dir.into();
        self
    }

    /// The resources directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File path a container name maps to
    pub fn path_for(&self, name: &str, target: SaveTarget) -> Result<PathBuf> {
        validate_file_name(name)?;
        let dir = match target {
            SaveTarget::Primary => self.root.clone(),
            SaveTarget::Temporary => self.root.join(&self.temp_dir),
        };
        Ok(dir.join(format!("{name}.{CONTAINER_EXTENSION}")))
    }

    /// Write a container, replacing any previous one with the same name.
    ///
    /// The text goes to a sibling file first and is renamed into place, so a
    /// failed write never leaves a truncated container behind.
    pub fn save(
        &self,
        name: &str,
        container: &DialogueContainer,
        target: SaveTarget,
    ) -> Result<PathBuf> {
        let path = self.path_for(name, target)?;
        let content = container.to_ron()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let staging = path.with_extension(format!("{CONTAINER_EXTENSION}.partial"));
        std::fs::write(&staging, content)?;
        std::fs::rename(&staging, &path)?;

        tracing::info!("Saved dialogue graph {} to {:?}", name, path);
        Ok(path)
    }

    /// Read a container saved under `name`
    pub fn load(&self, name: &str) -> Result<DialogueContainer> {
        let path = self.path_for(name, SaveTarget::Primary)?;
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("Dialogue graph {} not found at {:?}", name, path);
                return Err(DialogueError::FileNotFound(name.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        DialogueContainer::from_ron(&content)
    }

    /// Whether a container is saved under `name`
    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name, SaveTarget::Primary)
            .map(|path| path.is_file())
            .unwrap_or(false)
    }

    /// Names of all containers in the resources directory, sorted
    pub fn list(&self) -> Result<Vec<String>> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let extension = path.extension().and_then(|e| e.to_str());
            if !path.is_file() || extension != Some(CONTAINER_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::NodeLinkData;
    use crate::node::DialogueNodeData;

    fn container() -> DialogueContainer {
        let mut container = DialogueContainer::new();
        container.nodes.push(DialogueNodeData::named("A"));
        container.links.push(NodeLinkData::new("ENTRYPOINT", "Next", "A"));
        container
    }

    #[test]
    fn test_file_name_validation() {
        assert!(validate_file_name("New Narrative").is_ok());
        for bad in ["", "   ", "..", "a/b", "a\\b"] {
            let result = validate_file_name(bad);
            assert!(matches!(result, Err(DialogueError::InvalidFileName(_))), "{bad:?}");
        }
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContainerStore::new(dir.path().join("Resources"));

        let path = store.save("Tavern", &container(), SaveTarget::Primary).unwrap();
        assert_eq!(path, dir.path().join("Resources").join("Tavern.ron"));
        assert!(store.exists("Tavern"));
        assert_eq!(store.load("Tavern").unwrap(), container());
        assert_eq!(store.list().unwrap(), ["Tavern"]);
    }

    #[test]
    fn test_temporary_saves_are_not_listed() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContainerStore::new(dir.path()).with_temp_dir("Scratch");

        let path = store.save("Draft", &container(), SaveTarget::Temporary).unwrap();
        assert_eq!(path, dir.path().join("Scratch").join("Draft.ron"));
        assert!(!store.exists("Draft"));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_missing_container_is_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContainerStore::new(dir.path());
        let err = store.load("Nowhere").unwrap_err();
        assert!(matches!(err, DialogueError::FileNotFound(name) if name == "Nowhere"));
    }

    #[test]
    fn test_list_missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContainerStore::new(dir.path().join("absent"));
        assert!(store.list().unwrap().is_empty());
    }
}
