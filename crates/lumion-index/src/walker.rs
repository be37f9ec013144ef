//! Recursive source file enumeration.

use ignore::WalkBuilder;
use lumion_core::LumionError;
use std::path::{Path, PathBuf};

/// Walk options.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkOptions {
    /// Apply `.gitignore`/hidden-file filtering.
    pub respect_gitignore: bool,
}

/// Recursively collect regular files under `root` accepted by `predicate`.
///
/// Files come back in directory-listing order at each level, with a
/// subdirectory's contents appearing where the subdirectory is listed. A
/// missing or unreadable root is fatal; errors further down are logged and
/// skipped.
pub fn walk_source_files<F>(
    root: &Path,
    options: WalkOptions,
    predicate: F,
) -> Result<Vec<PathBuf>, LumionError>
where
    F: Fn(&Path) -> bool,
{
    std::fs::read_dir(root)
        .map_err(|e| LumionError::Walk(format!("cannot read {}: {e}", root.display())))?;

    let walker = WalkBuilder::new(root)
        .standard_filters(options.respect_gitignore)
        .require_git(false)
        .follow_links(true)
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                tracing::warn!("Walk error: {}", err);
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = entry.path();
        if predicate(path) {
            files.push(path.to_path_buf());
        }
    }

    tracing::debug!("Found {} source files under {}", files.len(), root.display());
    Ok(files)
}

/// Predicate accepting files whose extension is one of `extensions`.
pub fn extension_filter(extensions: &[String]) -> impl Fn(&Path) -> bool + '_ {
    move |path: &Path| {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| extensions.iter().any(|allowed| allowed == ext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn ts_exts() -> Vec<String> {
        vec!["ts".to_string(), "tsx".to_string()]
    }

    #[test]
    fn collects_matching_files_recursively() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("components/ui")).unwrap();
        fs::write(dir.path().join("main.ts"), "").unwrap();
        fs::write(dir.path().join("components/Card.tsx"), "").unwrap();
        fs::write(dir.path().join("components/ui/Button.tsx"), "").unwrap();
        fs::write(dir.path().join("styles.css"), "").unwrap();
        fs::write(dir.path().join("legacy.js"), "").unwrap();

        let exts = ts_exts();
        let mut files = walk_source_files(dir.path(), WalkOptions::default(), extension_filter(&exts))
            .unwrap();
        files.sort();

        let expected: Vec<PathBuf> = ["components/Card.tsx", "components/ui/Button.tsx", "main.ts"]
            .iter()
            .map(|p| dir.path().join(p))
            .collect();
        assert_eq!(files, expected);
    }

    #[test]
    fn declaration_files_match_ts_extension() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join("env.d.ts"), "").unwrap();
        let exts = ts_exts();
        let files = walk_source_files(dir.path(), WalkOptions::default(), extension_filter(&exts))
            .unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn gitignore_is_ignored_by_default() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join(".gitignore"), "generated.ts\n").unwrap();
        fs::write(dir.path().join("generated.ts"), "").unwrap();
        fs::write(dir.path().join("kept.ts"), "").unwrap();

        let exts = ts_exts();
        let all = walk_source_files(dir.path(), WalkOptions::default(), extension_filter(&exts))
            .unwrap();
        assert_eq!(all.len(), 2);

        let filtered = walk_source_files(
            dir.path(),
            WalkOptions {
                respect_gitignore: true,
            },
            extension_filter(&exts),
        )
        .unwrap();
        assert_eq!(filtered, vec![dir.path().join("kept.ts")]);
    }

    #[test]
    fn missing_root_is_fatal() {
        let result = walk_source_files(
            Path::new("/nonexistent/lumion/src"),
            WalkOptions::default(),
            |_| true,
        );
        assert!(matches!(result, Err(LumionError::Walk(_))));
    }
}
