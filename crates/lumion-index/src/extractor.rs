//! Per-file entity and relationship extraction.
//!
//! A single depth-first walk over the tree-sitter AST classifies each node
//! into a [`Construct`] and emits graph records for it. The enclosing
//! function/component is carried as an immutable [`Scope`] value passed down
//! the recursion, so a nested definition only affects its own subtree.

use crate::identity::{cmp_id, export_id, fn_id, hook_id, import_id, is_component_name, IdScheme};
use crate::parser::parse_source;
use crate::resolver::resolve_import;
use lumion_core::{Entity, EntityType, LumionError, Relationship, RelationshipType, TextUnit};
use std::path::Path;
use tree_sitter::Node;

/// Everything extracted from one file.
#[derive(Debug, Clone)]
pub struct FileExtraction {
    pub file_id: String,
    /// The File entity comes first, followed by entities in traversal order.
    pub entities: Vec<Entity>,
    pub relationships: Vec<Relationship>,
    pub text_unit: TextUnit,
}

/// Enclosing named function and component at a point in the traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scope<'a> {
    pub function: Option<&'a str>,
    pub component: Option<&'a str>,
}

impl<'a> Scope<'a> {
    /// Scope inside the body of a function named `name`. A lowercase name
    /// clears the enclosing component.
    pub fn enter(name: &'a str) -> Self {
        Self {
            function: Some(name),
            component: is_component_name(name).then_some(name),
        }
    }

    /// Source id for a call made in this scope.
    fn caller_id(&self, file_id: &str) -> String {
        match self.function {
            Some(f) => fn_id(f),
            None => file_id.to_string(),
        }
    }

    /// Source id for a JSX render made in this scope.
    fn renderer_id(&self, file_id: &str) -> String {
        match (self.component, self.function) {
            (Some(c), _) => cmp_id(c),
            (None, Some(f)) => fn_id(f),
            (None, None) => file_id.to_string(),
        }
    }
}

/// Syntax constructs that produce graph records.
#[derive(Debug)]
enum Construct<'a> {
    /// `import ... from "mod"` or `import "mod"`.
    Import {
        specifier: &'a str,
        bindings: Vec<&'a str>,
    },
    /// `export { a, b as c }` with an optional `from "mod"`.
    NamedExports {
        module: Option<&'a str>,
        names: Vec<&'a str>,
    },
    /// A named `function` (or generator) declaration.
    FunctionDeclaration { name: &'a str },
    /// `const`/`let`/`var` declarations; declarators are inspected individually.
    Variables,
    /// `useX(...);` as a bare statement.
    HookStatement { call: Node<'a>, callee: &'a str },
    Call { callee: &'a str },
    /// Opening or self-closing JSX tag.
    JsxElement { tag: &'a str },
    Other,
}

/// How a function was defined; component entities from variable
/// initializers are registered without a `CONTAINS` edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Definition {
    Declaration,
    Initializer,
}

/// Extracts graph records from TypeScript/TSX files.
#[derive(Debug, Clone)]
pub struct Extractor {
    ids: IdScheme,
    text_unit_chars: usize,
}

impl Extractor {
    pub fn new(ids: IdScheme, text_unit_chars: usize) -> Self {
        Self {
            ids,
            text_unit_chars,
        }
    }

    /// Read and extract one file. An unreadable file is treated as empty;
    /// invalid UTF-8 is decoded lossily.
    pub fn extract_file(&self, path: &Path) -> Result<FileExtraction, LumionError> {
        let source = match std::fs::read(path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(err) => {
                tracing::warn!("Failed to read {}: {}; treating as empty", path.display(), err);
                String::new()
            }
        };
        self.extract_source(path, &source)
    }

    /// Extract from already-loaded source text.
    pub fn extract_source(&self, path: &Path, source: &str) -> Result<FileExtraction, LumionError> {
        let file_path = path.to_string_lossy().into_owned();
        let file_id = self.ids.file_id(&file_path);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_path.clone());

        let text_unit = TextUnit {
            document_id: file_path.clone(),
            chunk_id: 0,
            text: source.chars().take(self.text_unit_chars).collect(),
        };

        let tree = if source.is_empty() {
            None
        } else {
            Some(parse_source(path, source)?)
        };

        let mut visitor = Visitor {
            source: source.as_bytes(),
            path,
            file_path: &file_path,
            file_id: &file_id,
            ids: &self.ids,
            entities: vec![Entity::new(
                file_id.clone(),
                name,
                EntityType::File,
                file_path.clone(),
            )],
            relationships: Vec::new(),
        };

        if let Some(tree) = &tree {
            visitor.visit(tree.root_node(), Scope::default());
        }

        let Visitor {
            entities,
            relationships,
            ..
        } = visitor;

        Ok(FileExtraction {
            file_id,
            entities,
            relationships,
            text_unit,
        })
    }
}

struct Visitor<'a> {
    source: &'a [u8],
    path: &'a Path,
    file_path: &'a str,
    file_id: &'a str,
    ids: &'a IdScheme,
    entities: Vec<Entity>,
    relationships: Vec<Relationship>,
}

impl<'a> Visitor<'a> {
    fn visit(&mut self, node: Node<'a>, scope: Scope<'a>) {
        match classify(node, self.source) {
            Construct::Import {
                specifier,
                bindings,
            } => {
                let target = resolve_import(self.path, specifier);
                let target_id = self.ids.file_id(&target.path());
                self.relate(self.file_id.to_string(), target_id, RelationshipType::Imports);
                for binding in bindings {
                    let id = import_id(self.file_id, binding);
                    self.entities.push(
                        Entity::new(id.clone(), binding, EntityType::Import, self.file_path)
                            .with_module(Some(specifier)),
                    );
                    self.contains(id);
                }
            }
            Construct::NamedExports { module, names } => {
                for name in names {
                    let id = export_id(self.file_id, name);
                    self.entities.push(
                        Entity::new(id.clone(), name, EntityType::Export, self.file_path)
                            .with_module(module),
                    );
                    self.contains(id.clone());
                    self.relate(self.file_id.to_string(), id, RelationshipType::Exports);
                }
            }
            Construct::FunctionDeclaration { name } => {
                self.define_function(name, Definition::Declaration);
                self.visit_children(node, Scope::enter(name));
                return;
            }
            Construct::Variables => {
                self.visit_variables(node, scope);
                return;
            }
            Construct::HookStatement { call, callee } => {
                self.relate(
                    self.file_id.to_string(),
                    hook_id(callee),
                    RelationshipType::UsesHook,
                );
                // The hook call itself is not a call-graph edge, but its
                // arguments (e.g. effect callbacks) still are.
                let mut cursor = node.walk();
                for child in node.children(&mut cursor) {
                    if child == call {
                        self.visit_children(call, scope);
                    } else {
                        self.visit(child, scope);
                    }
                }
                return;
            }
            Construct::Call { callee } => {
                self.relate(scope.caller_id(self.file_id), fn_id(callee), RelationshipType::Calls);
            }
            Construct::JsxElement { tag } => {
                if is_component_name(tag) {
                    self.relate(
                        scope.renderer_id(self.file_id),
                        cmp_id(tag),
                        RelationshipType::Renders,
                    );
                }
            }
            Construct::Other => {}
        }

        self.visit_children(node, scope);
    }

    fn visit_children(&mut self, node: Node<'a>, scope: Scope<'a>) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.visit(child, scope);
        }
    }

    /// Declarators initialized with a function get their own scope for the
    /// initializer; everything else is walked in the current scope.
    fn visit_variables(&mut self, node: Node<'a>, scope: Scope<'a>) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            let function_value = (child.kind() == "variable_declarator")
                .then(|| function_initializer(child))
                .flatten();
            match function_value {
                Some((name_node, value)) => {
                    let name = text(name_node, self.source);
                    self.define_function(name, Definition::Initializer);
                    self.visit(value, Scope::enter(name));
                }
                None => self.visit(child, scope),
            }
        }
    }

    fn define_function(&mut self, name: &str, definition: Definition) {
        let id = fn_id(name);
        self.entities
            .push(Entity::new(id.clone(), name, EntityType::Function, self.file_path));
        self.contains(id);

        if is_component_name(name) {
            let id = cmp_id(name);
            self.entities
                .push(Entity::new(id.clone(), name, EntityType::Component, self.file_path));
            if definition == Definition::Declaration {
                self.contains(id);
            }
        }
    }

    fn contains(&mut self, target: String) {
        self.relate(self.file_id.to_string(), target, RelationshipType::Contains);
    }

    fn relate(&mut self, source: String, target: String, relationship_type: RelationshipType) {
        self.relationships
            .push(Relationship::new(source, target, relationship_type));
    }
}

// ── Classification ────────────────────────────────────────────────────────

fn classify<'a>(node: Node<'a>, source: &'a [u8]) -> Construct<'a> {
    match node.kind() {
        "import_statement" => match node.child_by_field_name("source") {
            Some(module) => Construct::Import {
                specifier: unquote(text(module, source)),
                bindings: import_bindings(node, source),
            },
            // `import x = require("y")`
            None => Construct::Other,
        },
        "export_statement" => match child_of_kind(node, "export_clause") {
            Some(clause) => Construct::NamedExports {
                module: node
                    .child_by_field_name("source")
                    .map(|s| unquote(text(s, source))),
                names: specifier_names(clause, "export_specifier", source),
            },
            None => Construct::Other,
        },
        "function_declaration" | "generator_function_declaration" | "function_signature" => {
            match node.child_by_field_name("name") {
                Some(name) => Construct::FunctionDeclaration {
                    name: text(name, source),
                },
                None => Construct::Other,
            }
        }
        "lexical_declaration" | "variable_declaration" => Construct::Variables,
        "expression_statement" => match hook_call(node, source) {
            Some((call, callee)) => Construct::HookStatement { call, callee },
            None => Construct::Other,
        },
        "call_expression" => match call_callee(node) {
            Some(callee) => Construct::Call {
                callee: text(callee, source),
            },
            None => Construct::Other,
        },
        "jsx_element" => match node
            .child_by_field_name("open_tag")
            .and_then(|tag| tag.child_by_field_name("name"))
        {
            Some(name) => Construct::JsxElement {
                tag: text(name, source),
            },
            None => Construct::Other,
        },
        "jsx_self_closing_element" => match node.child_by_field_name("name") {
            Some(name) => Construct::JsxElement {
                tag: text(name, source),
            },
            None => Construct::Other,
        },
        _ => Construct::Other,
    }
}

/// Local names bound by `import { a, b as c }` (here `a` and `c`).
fn import_bindings<'a>(node: Node<'a>, source: &'a [u8]) -> Vec<&'a str> {
    child_of_kind(node, "import_clause")
        .and_then(|clause| child_of_kind(clause, "named_imports"))
        .map(|named| specifier_names(named, "import_specifier", source))
        .unwrap_or_default()
}

/// The visible name of each specifier: the alias when present, else the name.
fn specifier_names<'a>(list: Node<'a>, kind: &str, source: &'a [u8]) -> Vec<&'a str> {
    let mut cursor = list.walk();
    list.named_children(&mut cursor)
        .filter(|item| item.kind() == kind)
        .filter_map(|item| {
            item.child_by_field_name("alias")
                .or_else(|| item.child_by_field_name("name"))
        })
        .map(|name| unquote(text(name, source)))
        .collect()
}

/// The callee of a call expression; tagged templates are not calls.
fn call_callee(node: Node) -> Option<Node> {
    let arguments = node.child_by_field_name("arguments")?;
    if arguments.kind() == "template_string" {
        return None;
    }
    node.child_by_field_name("function")
}

/// `useX(...)` as the whole expression of a statement.
fn hook_call<'a>(statement: Node<'a>, source: &'a [u8]) -> Option<(Node<'a>, &'a str)> {
    let mut cursor = statement.walk();
    let call = statement.named_children(&mut cursor).next()?;
    if call.kind() != "call_expression" {
        return None;
    }
    let callee = text(call_callee(call)?, source);
    callee.starts_with("use").then_some((call, callee))
}

/// `name = <arrow function | function expression>` in a variable declarator.
fn function_initializer(declarator: Node) -> Option<(Node, Node)> {
    let value = declarator.child_by_field_name("value")?;
    match value.kind() {
        "arrow_function" | "function_expression" | "function" | "generator_function" => {
            Some((declarator.child_by_field_name("name")?, value))
        }
        _ => None,
    }
}

fn child_of_kind<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|c| c.kind() == kind);
    found
}

fn text<'a>(node: Node, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}

fn unquote(s: &str) -> &str {
    s.trim_matches(|c| c == '\'' || c == '"')
}
