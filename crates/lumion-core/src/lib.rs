//! lumion-core: Shared types, configuration, and artifact I/O for the lumion
//! code graph extractor.

pub mod artifacts;
pub mod config;
pub mod error;
pub mod output;
pub mod types;

pub use artifacts::{read_artifacts, write_artifacts, ArtifactSet};
pub use config::{CommunityConfig, IndexConfig, LumionConfig, OutputConfig};
pub use error::*;
pub use output::{create_output_location, resolve_output_location, OutputLocation, OutputSettings};
pub use types::*;
