//! lumion-index: Tree-sitter based knowledge graph extraction for
//! TypeScript/TSX source trees.
//!
//! # Architecture
//!
//! - **walker**: recursive source file enumeration
//! - **resolver**: relative import specifiers to concrete files
//! - **identity**: deterministic entity ids
//! - **parser**: grammar selection and tree-sitter parsing
//! - **extractor**: per-file entities and relationships
//! - **community**: directory-level aggregation and reports
//! - **indexer**: the pipeline tying the above together

pub mod community;
pub mod extractor;
pub mod identity;
pub mod indexer;
pub mod parser;
pub mod resolver;
pub mod walker;

pub use community::{CommunityAggregator, CommunityBucket};
pub use extractor::{Extractor, FileExtraction, Scope};
pub use identity::IdScheme;
pub use indexer::{IndexRun, IndexSettings, Indexer};
pub use parser::{parse_source, Grammar};
pub use resolver::{resolve_import, ResolvedImport};
pub use walker::{extension_filter, walk_source_files, WalkOptions};
