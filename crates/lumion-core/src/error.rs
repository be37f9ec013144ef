use std::path::PathBuf;

/// Unified error type for lumion.
#[derive(Debug, thiserror::Error)]
pub enum LumionError {
    #[error("Walk error: {0}")]
    Walk(String),

    #[error("Parse error in {path} at {line}:{column}")]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
    },

    #[error("Parser setup error: {0}")]
    Language(String),

    #[error("Output error: {0}")]
    Output(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid entity type: {0}")]
    InvalidEntityType(String),

    #[error("Invalid relationship type: {0}")]
    InvalidRelationshipType(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
