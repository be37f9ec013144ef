//! Import specifier resolution.
//!
//! Relative specifiers are joined to the importing file's directory and
//! probed against a fixed list of suffixes. Bare package specifiers are kept
//! as opaque strings.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// Suffixes probed, in order, for a relative specifier.
pub const CANDIDATE_SUFFIXES: [&str; 5] = [".ts", ".tsx", ".js", "/index.tsx", "/index.ts"];

/// Outcome of resolving one module specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedImport {
    /// A candidate file exists on disk.
    Resolved(PathBuf),
    /// No candidate exists; the joined path is used as a best-effort stand-in.
    Unresolved(PathBuf),
    /// A bare package specifier, passed through unchanged.
    Package(String),
}

impl ResolvedImport {
    /// The string used to derive the target's file id.
    pub fn path(&self) -> String {
        match self {
            Self::Resolved(p) | Self::Unresolved(p) => p.to_string_lossy().into_owned(),
            Self::Package(s) => s.clone(),
        }
    }
}

/// Resolve `specifier` as imported from `from_file`.
pub fn resolve_import(from_file: &Path, specifier: &str) -> ResolvedImport {
    resolve_import_with(from_file, specifier, |p| p.exists())
}

/// Resolve with an injectable existence check.
pub fn resolve_import_with<F>(from_file: &Path, specifier: &str, exists: F) -> ResolvedImport
where
    F: Fn(&Path) -> bool,
{
    if !(specifier.starts_with('.') || specifier.starts_with('/')) {
        return ResolvedImport::Package(specifier.to_string());
    }

    let base = from_file.parent().unwrap_or_else(|| Path::new(""));
    let target = normalize(&base.join(specifier));

    for suffix in CANDIDATE_SUFFIXES {
        let mut candidate = OsString::from(target.as_os_str());
        candidate.push(suffix);
        let candidate = PathBuf::from(candidate);
        if exists(&candidate) {
            return ResolvedImport::Resolved(candidate);
        }
    }

    tracing::debug!(
        "Unresolved import {:?} from {}",
        specifier,
        from_file.display()
    );
    ResolvedImport::Unresolved(target)
}

/// Fold `.` and `..` components without touching the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = match out.components().next_back() {
                    Some(Component::Normal(_)) => out.pop(),
                    _ => false,
                };
                if !popped && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn fs_with(paths: &[&str]) -> impl Fn(&Path) -> bool {
        let set: HashSet<PathBuf> = paths.iter().map(PathBuf::from).collect();
        move |p: &Path| set.contains(p)
    }

    #[test]
    fn package_specifier_passes_through() {
        let r = resolve_import_with(Path::new("/p/src/a.ts"), "react", fs_with(&[]));
        assert_eq!(r, ResolvedImport::Package("react".to_string()));
        assert_eq!(r.path(), "react");
    }

    #[test]
    fn first_existing_candidate_wins() {
        let exists = fs_with(&["/p/src/b.tsx", "/p/src/b.js"]);
        let r = resolve_import_with(Path::new("/p/src/a.ts"), "./b", exists);
        assert_eq!(r, ResolvedImport::Resolved(PathBuf::from("/p/src/b.tsx")));
    }

    #[test]
    fn ts_is_preferred_over_tsx() {
        let exists = fs_with(&["/p/src/b.ts", "/p/src/b.tsx"]);
        let r = resolve_import_with(Path::new("/p/src/a.ts"), "./b", exists);
        assert_eq!(r.path(), "/p/src/b.ts");
    }

    #[test]
    fn index_tsx_is_probed_before_index_ts() {
        let exists = fs_with(&["/p/src/ui/index.ts", "/p/src/ui/index.tsx"]);
        let r = resolve_import_with(Path::new("/p/src/a.ts"), "./ui", exists);
        assert_eq!(r.path(), "/p/src/ui/index.tsx");
    }

    #[test]
    fn parent_segments_are_folded() {
        let exists = fs_with(&["/p/lib/util.ts"]);
        let r = resolve_import_with(Path::new("/p/src/deep/a.ts"), "../../lib/util", exists);
        assert_eq!(r, ResolvedImport::Resolved(PathBuf::from("/p/lib/util.ts")));
    }

    #[test]
    fn missing_candidates_yield_best_effort_path() {
        let r = resolve_import_with(Path::new("/p/src/a.ts"), "./missing", fs_with(&[]));
        assert_eq!(r, ResolvedImport::Unresolved(PathBuf::from("/p/src/missing")));
    }

    #[test]
    fn absolute_specifier_gets_suffixes() {
        let exists = fs_with(&["/abs/mod.ts"]);
        let r = resolve_import_with(Path::new("/p/src/a.ts"), "/abs/mod", exists);
        assert_eq!(r.path(), "/abs/mod.ts");
    }

    #[test]
    fn specifier_with_extension_is_not_stripped() {
        let exists = fs_with(&["/p/src/data.json.ts"]);
        let r = resolve_import_with(Path::new("/p/src/a.ts"), "./data.json", exists);
        assert_eq!(r.path(), "/p/src/data.json.ts");
    }

    #[test]
    fn normalize_keeps_leading_parents_of_relative_paths() {
        assert_eq!(normalize(Path::new("../a/./b/../c")), PathBuf::from("../a/c"));
        assert_eq!(normalize(Path::new("/../a")), PathBuf::from("/a"));
    }
}
