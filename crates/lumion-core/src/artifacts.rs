//! Artifact tables: the four JSON collections written at the end of a run.

use crate::{CommunityReport, Entity, LumionError, Relationship, TextUnit};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

pub const ENTITIES_FILE: &str = "create_final_entities.json";
pub const RELATIONSHIPS_FILE: &str = "create_final_relationships.json";
pub const TEXT_UNITS_FILE: &str = "create_final_text_units.json";
pub const COMMUNITY_REPORTS_FILE: &str = "create_final_community_reports.json";

/// Everything a run produces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArtifactSet {
    pub entities: Vec<Entity>,
    pub relationships: Vec<Relationship>,
    pub text_units: Vec<TextUnit>,
    pub community_reports: Vec<CommunityReport>,
}

/// Write all four collections into `dir` as pretty-printed JSON arrays,
/// overwriting existing files.
pub fn write_artifacts(dir: &Path, artifacts: &ArtifactSet) -> Result<(), LumionError> {
    write_table(dir, ENTITIES_FILE, &artifacts.entities)?;
    write_table(dir, RELATIONSHIPS_FILE, &artifacts.relationships)?;
    write_table(dir, TEXT_UNITS_FILE, &artifacts.text_units)?;
    write_table(dir, COMMUNITY_REPORTS_FILE, &artifacts.community_reports)?;
    tracing::info!(
        "Wrote {} entities, {} relationships, {} text units, {} community reports to {}",
        artifacts.entities.len(),
        artifacts.relationships.len(),
        artifacts.text_units.len(),
        artifacts.community_reports.len(),
        dir.display()
    );
    Ok(())
}

/// Load a previously written artifacts directory.
pub fn read_artifacts(dir: &Path) -> Result<ArtifactSet, LumionError> {
    if !dir.is_dir() {
        return Err(LumionError::NotFound(format!(
            "artifacts directory {}",
            dir.display()
        )));
    }
    Ok(ArtifactSet {
        entities: read_table(dir, ENTITIES_FILE)?,
        relationships: read_table(dir, RELATIONSHIPS_FILE)?,
        text_units: read_table(dir, TEXT_UNITS_FILE)?,
        community_reports: read_table(dir, COMMUNITY_REPORTS_FILE)?,
    })
}

fn write_table<T: Serialize>(dir: &Path, name: &str, rows: &[T]) -> Result<(), LumionError> {
    let json = serde_json::to_string_pretty(rows)?;
    std::fs::write(dir.join(name), json)?;
    Ok(())
}

fn read_table<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<Vec<T>, LumionError> {
    let content = std::fs::read_to_string(dir.join(name))?;
    Ok(serde_json::from_str(&content)?)
}
