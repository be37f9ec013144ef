//! Artifact output location resolution.
//!
//! The artifacts of a run land in `<base>/<epoch>/artifacts`. `<base>` is an
//! explicit override (CLI flag or environment variable) or the configured
//! base; if that directory cannot be created, a fixed directory under the
//! system temp dir is used instead.

use crate::{LumionError, OutputConfig};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Where the artifacts of a run were placed, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLocation {
    /// Base came from the CLI or the environment.
    Override(PathBuf),
    /// Base came from config or the built-in default.
    Computed(PathBuf),
    /// The primary directory could not be created.
    Fallback(PathBuf),
}

impl OutputLocation {
    pub fn path(&self) -> &Path {
        match self {
            Self::Override(p) | Self::Computed(p) | Self::Fallback(p) => p,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// Inputs to output resolution, with all ambient lookups already performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSettings {
    /// Explicit base from the CLI or environment.
    pub override_base: Option<PathBuf>,
    /// Configured (or default) base, possibly relative.
    pub configured_base: PathBuf,
    /// Anchor for relative bases.
    pub workspace_root: PathBuf,
    /// Base used after a failed creation.
    pub fallback_base: PathBuf,
}

impl OutputSettings {
    /// Build settings from config, reading the override environment variable.
    ///
    /// A CLI override wins over the environment.
    pub fn from_config(
        config: &OutputConfig,
        workspace_root: &Path,
        cli_override: Option<PathBuf>,
    ) -> Self {
        let env_value = std::env::var_os(&config.env_var);
        Self::from_parts(config, workspace_root, cli_override, env_value)
    }

    /// Build settings from explicit values. Empty environment values are ignored.
    pub fn from_parts(
        config: &OutputConfig,
        workspace_root: &Path,
        cli_override: Option<PathBuf>,
        env_value: Option<OsString>,
    ) -> Self {
        let override_base = cli_override.or_else(|| {
            env_value
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        });
        Self {
            override_base,
            configured_base: PathBuf::from(&config.base),
            workspace_root: workspace_root.to_path_buf(),
            fallback_base: std::env::temp_dir().join(&config.fallback_dir),
        }
    }

    /// The effective base, resolved against the workspace root when relative.
    pub fn base_dir(&self) -> PathBuf {
        let base = self
            .override_base
            .as_deref()
            .unwrap_or(&self.configured_base);
        if base.is_absolute() {
            base.to_path_buf()
        } else {
            self.workspace_root.join(base)
        }
    }
}

/// Resolve and create the artifacts directory for a run.
///
/// `create_dir` is called for the primary directory and, on failure, once for
/// the fallback. Failure of the fallback is fatal.
pub fn resolve_output_location<F>(
    settings: &OutputSettings,
    epoch: i64,
    mut create_dir: F,
) -> Result<OutputLocation, LumionError>
where
    F: FnMut(&Path) -> std::io::Result<()>,
{
    let primary = artifacts_dir(&settings.base_dir(), epoch);
    match create_dir(&primary) {
        Ok(()) if settings.override_base.is_some() => Ok(OutputLocation::Override(primary)),
        Ok(()) => Ok(OutputLocation::Computed(primary)),
        Err(err) => {
            tracing::warn!(
                "Cannot create {}: {}; falling back to temp dir",
                primary.display(),
                err
            );
            let fallback = artifacts_dir(&settings.fallback_base, epoch);
            create_dir(&fallback).map_err(|e| {
                LumionError::Output(format!("cannot create {}: {e}", fallback.display()))
            })?;
            Ok(OutputLocation::Fallback(fallback))
        }
    }
}

/// Resolve the artifacts directory, creating it on disk.
pub fn create_output_location(
    settings: &OutputSettings,
    epoch: i64,
) -> Result<OutputLocation, LumionError> {
    resolve_output_location(settings, epoch, |p| std::fs::create_dir_all(p))
}

fn artifacts_dir(base: &Path, epoch: i64) -> PathBuf {
    base.join(epoch.to_string()).join("artifacts")
}
