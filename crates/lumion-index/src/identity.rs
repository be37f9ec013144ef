//! Deterministic entity identifiers.
//!
//! Ids are pure functions of their inputs, so edges between files can be
//! emitted without a lookup table. Function, component, and hook ids depend on
//! the symbol name alone: two files defining `format` both map to `fn_format`.

use std::path::{Path, PathBuf};

/// Maps paths and symbol names to entity ids.
#[derive(Debug, Clone)]
pub struct IdScheme {
    project_root: PathBuf,
}

impl IdScheme {
    /// File ids are computed relative to `project_root`.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }

    /// `file_` + the path relative to the project root (or the path itself
    /// when it lies outside), with separators and dots replaced by `_`.
    ///
    /// Package specifiers such as `react` go through the same mapping.
    pub fn file_id(&self, path: &str) -> String {
        let relative = Path::new(path)
            .strip_prefix(&self.project_root)
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|_| path.to_string());
        let trimmed = relative.trim_start_matches(['/', '\\']);
        let mut id = String::with_capacity(trimmed.len() + 5);
        id.push_str("file_");
        id.extend(trimmed.chars().map(|c| match c {
            '/' | '\\' | '.' => '_',
            other => other,
        }));
        id
    }
}

pub fn fn_id(name: &str) -> String {
    format!("fn_{name}")
}

pub fn cmp_id(name: &str) -> String {
    format!("cmp_{name}")
}

pub fn hook_id(name: &str) -> String {
    format!("hook_{name}")
}

pub fn import_id(file_id: &str, name: &str) -> String {
    format!("import_{file_id}_{name}")
}

pub fn export_id(file_id: &str, name: &str) -> String {
    format!("export_{file_id}_{name}")
}

/// PascalCase heuristic: the first character is an ASCII uppercase letter.
pub fn is_component_name(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}
