// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor settings for a dialogue project.
//!
//! Stored as RON in `dialogue_graph.ron` at the project root. Every path is
//! relative to the project directory.

use crate::error::{DialogueError, Result};
use crate::export::CsvQuoting;
use crate::storage::{ContainerStore, DEFAULT_TEMP_DIR};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Current settings format version
pub const SETTINGS_FORMAT_VERSION: u32 = 1;

/// Settings file name
pub const SETTINGS_FILE_NAME: &str = "dialogue_graph.ron";

/// Project-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Settings format version
    pub version: u32,
    /// Directory holding saved containers
    pub resources_dir: PathBuf,
    /// Subdirectory of `resources_dir` for temporary saves
    pub temp_dir: String,
    /// Base directory for the CSV export
    pub data_dir: PathBuf,
    /// CSV file name, relative to `data_dir`
    pub csv_file: String,
    /// CSV quoting mode
    pub csv_quoting: CsvQuoting,
    /// Container name used when none is given
    pub default_file_name: String,
    /// Size graphical front ends give to dialogue nodes. Layout only; the
    /// core never reads it.
    pub node_size: [f32; 2],
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_FORMAT_VERSION,
            resources_dir: PathBuf::from("Assets/Resources"),
            temp_dir: DEFAULT_TEMP_DIR.to_string(),
            data_dir: PathBuf::from("Assets"),
            csv_file: "DT_Dialogue.csv".to_string(),
            csv_quoting: CsvQuoting::default(),
            default_file_name: "New Narrative".to_string(),
            node_size: [150.0, 200.0],
        }
    }
}

impl EditorSettings {
    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: EditorSettings = ron::from_str(&content)?;

        // Version check
        if settings.version > SETTINGS_FORMAT_VERSION {
            return Err(DialogueError::UnsupportedVersion {
                found: settings.version,
                supported: SETTINGS_FORMAT_VERSION,
            });
        }

        Ok(settings)
    }

    /// Load the project's settings, or defaults when it has no settings file
    pub fn load_or_default(project_dir: &Path) -> Result<Self> {
        let path = Self::settings_file_path(project_dir);
        if !path.exists() {
            tracing::debug!("No settings at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);

        let content = ron::ser::to_string_pretty(self, config)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Settings file path for a project directory
    pub fn settings_file_path(project_dir: &Path) -> PathBuf {
        project_dir.join(SETTINGS_FILE_NAME)
    }

    /// Container store for a project directory
    pub fn container_store(&self, project_dir: &Path) -> ContainerStore {
        ContainerStore::new(project_dir.join(&self.resources_dir))
            .with_temp_dir(self.temp_dir.clone())
    }

    /// CSV export path for a project directory
    pub fn csv_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.data_dir).join(&self.csv_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = EditorSettings::default();
        assert_eq!(settings.version, SETTINGS_FORMAT_VERSION);
        assert_eq!(settings.default_file_name, "New Narrative");
        assert_eq!(settings.csv_quoting, CsvQuoting::Verbatim);
        assert_eq!(settings.node_size, [150.0, 200.0]);
        assert_eq!(
            settings.csv_path(Path::new("game")),
            Path::new("game").join("Assets").join("DT_Dialogue.csv")
        );
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = EditorSettings::settings_file_path(dir.path());

        let mut settings = EditorSettings::default();
        settings.csv_quoting = CsvQuoting::Escaped;
        settings.resources_dir = PathBuf::from("Dialogue");
        settings.save(&path).unwrap();

        let loaded = EditorSettings::load_or_default(dir.path()).unwrap();
        assert_eq!(loaded, settings);
        assert_eq!(loaded.container_store(dir.path()).root(), dir.path().join("Dialogue"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = EditorSettings::settings_file_path(dir.path());
        std::fs::write(&path, r#"(csv_file: "Lines.csv")"#).unwrap();

        let loaded = EditorSettings::load(&path).unwrap();
        assert_eq!(loaded.csv_file, "Lines.csv");
        assert_eq!(loaded.temp_dir, DEFAULT_TEMP_DIR);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(EditorSettings::load_or_default(dir.path()).unwrap(), EditorSettings::default());
    }

    #[test]
    fn test_newer_version_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = EditorSettings::settings_file_path(dir.path());
        std::fs::write(&path, "(version: 7)").unwrap();
        assert!(matches!(
            EditorSettings::load(&path),
            Err(DialogueError::UnsupportedVersion { found: 7, .. })
        ));
    }
}
