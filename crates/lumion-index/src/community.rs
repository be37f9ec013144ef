//! Directory-level community aggregation.
//!
//! Files are grouped by their first directory segment under the source root
//! (`src`, `src/components`, `src/lib`, ...). Each group counts files,
//! components, and functions, and ranks the modules its files import.

use lumion_core::{CommunityReport, Entity, EntityType, TopImport};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Module name recorded for Import entities without a module specifier.
pub const UNKNOWN_MODULE: &str = "unknown";

/// Running counters for one community.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommunityBucket {
    pub files: usize,
    pub components: usize,
    pub functions: usize,
    /// Import frequency in first-encounter order.
    imports: Vec<(String, usize)>,
    import_index: HashMap<String, usize>,
}

impl CommunityBucket {
    fn count_import(&mut self, module: &str) {
        match self.import_index.get(module) {
            Some(&i) => self.imports[i].1 += 1,
            None => {
                self.import_index.insert(module.to_string(), self.imports.len());
                self.imports.push((module.to_string(), 1));
            }
        }
    }

    /// Import counts in first-encounter order.
    pub fn imports(&self) -> &[(String, usize)] {
        &self.imports
    }

    /// The `limit` most imported modules, by count descending. Ties keep
    /// first-encounter order.
    pub fn top_imports(&self, limit: usize) -> Vec<TopImport> {
        let mut ranked: Vec<&(String, usize)> = self.imports.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
            .into_iter()
            .take(limit)
            .map(|(module, count)| TopImport {
                module: module.clone(),
                count: *count,
            })
            .collect()
    }
}

/// Groups per-file extraction results into communities.
#[derive(Debug, Clone)]
pub struct CommunityAggregator {
    source_root: PathBuf,
    root_key: String,
    /// Buckets in first-encounter order.
    buckets: Vec<(String, CommunityBucket)>,
    bucket_index: HashMap<String, usize>,
}

impl CommunityAggregator {
    /// Keys are prefixed with the source root's directory name.
    pub fn new(source_root: impl Into<PathBuf>) -> Self {
        let source_root = source_root.into();
        let root_key = source_root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "src".to_string());
        Self {
            source_root,
            root_key,
            buckets: Vec::new(),
            bucket_index: HashMap::new(),
        }
    }

    /// Community key for a file: the root key, or `<root>/<first-dir>`.
    pub fn key_for(&self, file: &Path) -> String {
        let first_segment = file
            .parent()
            .and_then(|dir| dir.strip_prefix(&self.source_root).ok())
            .and_then(|rel| rel.components().next())
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .filter(|s| !s.is_empty());

        match first_segment {
            Some(segment) => format!("{}/{}", self.root_key, segment),
            None => self.root_key.clone(),
        }
    }

    /// Record one file and the entities extracted from it.
    pub fn add_file(&mut self, file: &Path, entities: &[Entity]) {
        let key = self.key_for(file);
        let bucket = self.bucket_mut(key);
        bucket.files += 1;
        for entity in entities {
            match entity.entity_type {
                EntityType::Component => bucket.components += 1,
                EntityType::Function => bucket.functions += 1,
                EntityType::Import => {
                    bucket.count_import(entity.module().unwrap_or(UNKNOWN_MODULE));
                }
                EntityType::File | EntityType::Export => {}
            }
        }
    }

    pub fn bucket(&self, key: &str) -> Option<&CommunityBucket> {
        self.bucket_index.get(key).map(|&i| &self.buckets[i].1)
    }

    /// Render every community, in first-encounter order.
    pub fn reports(&self, top_imports: usize) -> Vec<CommunityReport> {
        self.buckets
            .iter()
            .map(|(key, bucket)| render_report(key, bucket, top_imports))
            .collect()
    }

    fn bucket_mut(&mut self, key: String) -> &mut CommunityBucket {
        let index = match self.bucket_index.get(&key) {
            Some(&i) => i,
            None => {
                let i = self.buckets.len();
                self.bucket_index.insert(key.clone(), i);
                self.buckets.push((key, CommunityBucket::default()));
                i
            }
        };
        &mut self.buckets[index].1
    }
}

fn render_report(key: &str, bucket: &CommunityBucket, limit: usize) -> CommunityReport {
    let top_imports = bucket.top_imports(limit);
    let listed = top_imports
        .iter()
        .map(|t| format!("{}({})", t.module, t.count))
        .collect::<Vec<_>>()
        .join(", ");
    CommunityReport {
        community_id: key.to_string(),
        report: format!(
            "Community {key}: files={}, components={}, functions={}, top imports: {listed}",
            bucket.files, bucket.components, bucket.functions
        ),
        files: bucket.files,
        components: bucket.components,
        functions: bucket.functions,
        top_imports,
    }
}
