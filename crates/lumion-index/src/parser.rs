//! Tree-sitter parsing for TypeScript and TSX sources.

use lumion_core::LumionError;
use std::path::Path;
use tree_sitter::{Node, Parser, Tree};

/// Grammar used for a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    TypeScript,
    /// TypeScript with JSX.
    Tsx,
}

impl Grammar {
    /// `.tsx` files use the TSX grammar; everything else is plain TypeScript,
    /// so `<T>value` assertions in `.ts` files are not mistaken for JSX.
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("tsx") => Self::Tsx,
            _ => Self::TypeScript,
        }
    }

    pub fn language(self) -> tree_sitter::Language {
        match self {
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

/// Parse `source` with the grammar selected by `path`.
///
/// A tree containing syntax errors is rejected with the position of the first
/// error, so malformed input aborts a run instead of yielding a partial graph.
pub fn parse_source(path: &Path, source: &str) -> Result<Tree, LumionError> {
    let grammar = Grammar::for_path(path);
    let mut parser = Parser::new();
    parser
        .set_language(&grammar.language())
        .map_err(|e| LumionError::Language(e.to_string()))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| LumionError::Parse {
            path: path.to_path_buf(),
            line: 0,
            column: 0,
        })?;

    let root = tree.root_node();
    if root.has_error() {
        let at = first_error(root).unwrap_or(root).start_position();
        return Err(LumionError::Parse {
            path: path.to_path_buf(),
            line: at.row + 1,
            column: at.column + 1,
        });
    }

    Ok(tree)
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}
