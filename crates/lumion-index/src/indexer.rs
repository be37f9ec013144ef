//! Main extraction pipeline.
//!
//! Walks the source tree, extracts each file in walk order, and accumulates
//! entities, relationships, text units, and community buckets. Nothing is
//! written here; the caller persists the resulting [`ArtifactSet`].

use crate::community::CommunityAggregator;
use crate::extractor::Extractor;
use crate::identity::IdScheme;
use crate::walker::{extension_filter, walk_source_files, WalkOptions};
use lumion_core::{ArtifactSet, LumionConfig, LumionError};
use std::path::{Path, PathBuf};

/// Resolved inputs of an indexing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSettings {
    /// Anchor for file ids.
    pub project_root: PathBuf,
    /// Directory that is walked.
    pub source_root: PathBuf,
    pub extensions: Vec<String>,
    pub respect_gitignore: bool,
    pub text_unit_chars: usize,
    pub top_imports: usize,
}

impl IndexSettings {
    /// Settings for `project_root` with the given config. `source_override`
    /// replaces `index.source_dir`; relative paths resolve against the
    /// project root.
    pub fn from_config(
        project_root: &Path,
        config: &LumionConfig,
        source_override: Option<&Path>,
    ) -> Result<Self, LumionError> {
        let project_root = std::fs::canonicalize(project_root).map_err(|e| {
            LumionError::Walk(format!("cannot open project {}: {e}", project_root.display()))
        })?;
        let source = source_override
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(&config.index.source_dir));
        let source_root = if source.is_absolute() {
            source
        } else {
            project_root.join(source)
        };

        Ok(Self {
            project_root,
            source_root,
            extensions: config.index.extensions.clone(),
            respect_gitignore: config.index.respect_gitignore,
            text_unit_chars: config.index.text_unit_chars,
            top_imports: config.communities.top_imports,
        })
    }
}

/// Result of an indexing run.
#[derive(Debug, Clone, Default)]
pub struct IndexRun {
    pub files_indexed: usize,
    pub artifacts: ArtifactSet,
}

/// The extraction pipeline.
pub struct Indexer {
    settings: IndexSettings,
    extractor: Extractor,
}

impl Indexer {
    pub fn new(settings: IndexSettings) -> Self {
        let extractor = Extractor::new(
            IdScheme::new(settings.project_root.clone()),
            settings.text_unit_chars,
        );
        Self {
            settings,
            extractor,
        }
    }

    pub fn settings(&self) -> &IndexSettings {
        &self.settings
    }

    /// Walk and extract the whole source tree.
    ///
    /// A parse error in any file aborts the run.
    pub fn run(&self) -> Result<IndexRun, LumionError> {
        let files = walk_source_files(
            &self.settings.source_root,
            WalkOptions {
                respect_gitignore: self.settings.respect_gitignore,
            },
            extension_filter(&self.settings.extensions),
        )?;
        self.index_files(&files)
    }

    /// Extract an explicit list of files, in order.
    pub fn index_files(&self, files: &[PathBuf]) -> Result<IndexRun, LumionError> {
        let mut artifacts = ArtifactSet::default();
        let mut communities = CommunityAggregator::new(&self.settings.source_root);

        for file in files {
            let extraction = self.extractor.extract_file(file)?;
            tracing::debug!(
                "Extracted {}: {} entities, {} relationships",
                file.display(),
                extraction.entities.len(),
                extraction.relationships.len()
            );

            communities.add_file(file, &extraction.entities);
            artifacts.entities.extend(extraction.entities);
            artifacts.relationships.extend(extraction.relationships);
            artifacts.text_units.push(extraction.text_unit);
        }

        artifacts.community_reports = communities.reports(self.settings.top_imports);

        tracing::info!(
            "Indexed {}: {} files, {} entities, {} relationships, {} communities",
            self.settings.source_root.display(),
            files.len(),
            artifacts.entities.len(),
            artifacts.relationships.len(),
            artifacts.community_reports.len(),
        );

        Ok(IndexRun {
            files_indexed: files.len(),
            artifacts,
        })
    }
}
