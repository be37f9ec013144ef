use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::LumionError;

// ── Entity Types ────────────────────────────────────────────────────────────

/// The kinds of nodes produced by extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    File,
    Import,
    Export,
    Function,
    /// PascalCase function, treated as a UI component.
    Component,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File => write!(f, "File"),
            Self::Import => write!(f, "Import"),
            Self::Export => write!(f, "Export"),
            Self::Function => write!(f, "Function"),
            Self::Component => write!(f, "Component"),
        }
    }
}

impl std::str::FromStr for EntityType {
    type Err = LumionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "File" => Ok(Self::File),
            "Import" => Ok(Self::Import),
            "Export" => Ok(Self::Export),
            "Function" => Ok(Self::Function),
            "Component" => Ok(Self::Component),
            _ => Err(LumionError::InvalidEntityType(s.to_string())),
        }
    }
}

// ── Relationship Types ──────────────────────────────────────────────────────

/// Directed edge types between entity ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipType {
    /// File contains a symbol.
    Contains,
    /// File imports another file (or an opaque package specifier).
    Imports,
    /// File exports a name.
    Exports,
    /// Function (or file) calls a function.
    Calls,
    /// File invokes a hook as a statement.
    UsesHook,
    /// Component (or function, or file) renders a JSX component.
    Renders,
}

impl std::fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Contains => write!(f, "CONTAINS"),
            Self::Imports => write!(f, "IMPORTS"),
            Self::Exports => write!(f, "EXPORTS"),
            Self::Calls => write!(f, "CALLS"),
            Self::UsesHook => write!(f, "USES_HOOK"),
            Self::Renders => write!(f, "RENDERS"),
        }
    }
}

impl std::str::FromStr for RelationshipType {
    type Err = LumionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CONTAINS" => Ok(Self::Contains),
            "IMPORTS" => Ok(Self::Imports),
            "EXPORTS" => Ok(Self::Exports),
            "CALLS" => Ok(Self::Calls),
            "USES_HOOK" => Ok(Self::UsesHook),
            "RENDERS" => Ok(Self::Renders),
            _ => Err(LumionError::InvalidRelationshipType(s.to_string())),
        }
    }
}

// ── Graph Records ───────────────────────────────────────────────────────────

/// A typed node in the extracted graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    /// Path of the defining file.
    pub file_path: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl Entity {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        entity_type: EntityType,
        file_path: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            entity_type,
            file_path: file_path.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// Attach the module specifier an Import/Export entity came from.
    /// `None` is recorded as JSON `null`.
    pub fn with_module(mut self, module: Option<&str>) -> Self {
        let value = match module {
            Some(m) => serde_json::Value::String(m.to_string()),
            None => serde_json::Value::Null,
        };
        self.metadata.insert("module".to_string(), value);
        self
    }

    /// The recorded module specifier, if it is a string.
    pub fn module(&self) -> Option<&str> {
        self.metadata.get("module").and_then(|v| v.as_str())
    }
}

/// A typed directed edge. Either endpoint may be a soft reference to an id
/// with no materialized entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub relationship_type: RelationshipType,
}

impl Relationship {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        relationship_type: RelationshipType,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            relationship_type,
        }
    }
}

/// A raw-text retrieval snippet for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextUnit {
    pub document_id: String,
    pub chunk_id: usize,
    pub text: String,
}

// ── Community Reports ───────────────────────────────────────────────────────

/// One entry of a community's import frequency ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopImport {
    pub module: String,
    pub count: usize,
}

/// Summary of a directory-level grouping of files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityReport {
    pub community_id: String,
    pub report: String,
    pub files: usize,
    pub components: usize,
    pub functions: usize,
    pub top_imports: Vec<TopImport>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_serializes_type_field() {
        let entity = Entity::new("fn_main", "main", EntityType::Function, "/p/src/main.ts");
        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(json["type"], "Function");
        assert_eq!(json["file_path"], "/p/src/main.ts");
        assert!(json["metadata"].as_object().unwrap().is_empty());
    }

    #[test]
    fn relationship_type_uses_screaming_snake_case() {
        let rel = Relationship::new("file_a_ts", "hook_useThing", RelationshipType::UsesHook);
        let json = serde_json::to_string(&rel).unwrap();
        assert_eq!(
            json,
            r#"{"source":"file_a_ts","target":"hook_useThing","type":"USES_HOOK"}"#
        );
    }

    #[test]
    fn relationship_type_display_matches_serde() {
        for rt in [
            RelationshipType::Contains,
            RelationshipType::Imports,
            RelationshipType::Exports,
            RelationshipType::Calls,
            RelationshipType::UsesHook,
            RelationshipType::Renders,
        ] {
            let json = serde_json::to_value(rt).unwrap();
            assert_eq!(json.as_str().unwrap(), rt.to_string());
            assert_eq!(rt.to_string().parse::<RelationshipType>().unwrap(), rt);
        }
    }

    #[test]
    fn export_without_module_records_null() {
        let entity = Entity::new("export_file_a_ts_x", "x", EntityType::Export, "a.ts")
            .with_module(None);
        assert_eq!(entity.metadata["module"], serde_json::Value::Null);
        assert_eq!(entity.module(), None);
    }

    #[test]
    fn unknown_entity_type_is_rejected() {
        assert!(matches!(
            "Widget".parse::<EntityType>(),
            Err(LumionError::InvalidEntityType(name)) if name == "Widget"
        ));
        assert_eq!("Component".parse::<EntityType>().unwrap(), EntityType::Component);
    }

    #[test]
    fn unknown_relationship_type_is_rejected() {
        assert!(matches!(
            "DEPENDS_ON".parse::<RelationshipType>(),
            Err(LumionError::InvalidRelationshipType(name)) if name == "DEPENDS_ON"
        ));
        assert_eq!("uses_hook".parse::<RelationshipType>().unwrap(), RelationshipType::UsesHook);
    }
}
