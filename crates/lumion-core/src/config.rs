//! Project configuration for lumion.
//!
//! Loads a TOML config at `<project>/lumion.toml`. Every section is
//! optional; missing fields fall back to the built-in defaults.

use crate::LumionError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the per-project config file.
pub const CONFIG_FILE_NAME: &str = "lumion.toml";

/// Top-level lumion configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LumionConfig {
    pub index: IndexConfig,
    pub output: OutputConfig,
    pub communities: CommunityConfig,
}

impl LumionConfig {
    /// Load configuration from the given path.
    pub fn load(path: &Path) -> Result<Self, LumionError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| LumionError::Config(e.to_string()))
    }

    /// Load `<project>/lumion.toml`, or return defaults if the file doesn't exist.
    ///
    /// A file that exists but does not parse is an error rather than a silent
    /// fallback.
    pub fn load_for_project(project_root: &Path) -> Result<Self, LumionError> {
        let path = Self::project_path(project_root);
        if path.exists() {
            tracing::debug!("Loading config from {}", path.display());
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Config path for a project: `<project>/lumion.toml`.
    pub fn project_path(project_root: &Path) -> PathBuf {
        project_root.join(CONFIG_FILE_NAME)
    }
}

/// Source tree selection and extraction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Source directory, relative to the project root.
    pub source_dir: String,
    /// File extensions (without the dot) that are extracted.
    pub extensions: Vec<String>,
    /// Apply `.gitignore` and hidden-file filtering while walking.
    pub respect_gitignore: bool,
    /// Number of characters kept in each file's text unit.
    pub text_unit_chars: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            source_dir: "src".to_string(),
            extensions: vec!["ts".to_string(), "tsx".to_string()],
            respect_gitignore: false,
            text_unit_chars: 800,
        }
    }
}

/// Artifact output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Base directory for artifacts. Relative paths resolve against the
    /// workspace root (the parent of the project root).
    pub base: String,
    /// Environment variable that overrides `base`.
    pub env_var: String,
    /// Directory name under the system temp dir used when `base` cannot be created.
    pub fallback_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base: "graphrag-pipeline/output".to_string(),
            env_var: "GRAPHRAG_INDEX_PATH".to_string(),
            fallback_dir: "lumion_graphrag_output".to_string(),
        }
    }
}

/// Community report settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommunityConfig {
    /// Maximum number of modules listed in `top_imports`.
    pub top_imports: usize,
}

impl Default for CommunityConfig {
    fn default() -> Self {
        Self { top_imports: 5 }
    }
}
