//! Index command: extract a source tree and write the artifact set.

use lumion_core::{create_output_location, write_artifacts, LumionConfig, OutputSettings};
use lumion_index::{IndexSettings, Indexer};
use std::path::{Path, PathBuf};

pub(crate) fn cmd_index(
    project_dir: &Path,
    src: Option<&Path>,
    output: Option<PathBuf>,
    config_path: Option<&Path>,
) -> anyhow::Result<PathBuf> {
    let config = match config_path {
        Some(path) => LumionConfig::load(path)?,
        None => LumionConfig::load_for_project(project_dir)?,
    };

    let settings = IndexSettings::from_config(project_dir, &config, src)?;
    let indexer = Indexer::new(settings);
    let run = indexer.run()?;

    // Nothing is created on disk until extraction has succeeded.
    let project_root = &indexer.settings().project_root;
    let workspace_root = project_root.parent().unwrap_or(project_root);
    let output_settings = OutputSettings::from_config(&config.output, workspace_root, output);
    let epoch = chrono::Utc::now().timestamp();
    let location = create_output_location(&output_settings, epoch)?;
    if location.is_fallback() {
        tracing::warn!("Writing artifacts to fallback {}", location.path().display());
    }

    write_artifacts(location.path(), &run.artifacts)?;

    eprintln!(
        "Indexed {} files: {} entities, {} relationships, {} communities",
        run.files_indexed,
        run.artifacts.entities.len(),
        run.artifacts.relationships.len(),
        run.artifacts.community_reports.len(),
    );
    println!("{}", location.path().display());
    Ok(location.path().to_path_buf())
}
