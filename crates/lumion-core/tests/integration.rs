//! Integration tests for lumion-core: config files, output resolution and
//! artifact persistence working together on a real filesystem.

use lumion_core::{
    create_output_location, read_artifacts, write_artifacts, ArtifactSet, CommunityReport,
    Entity, EntityType, LumionConfig, LumionError, OutputLocation, OutputSettings, Relationship,
    RelationshipType, TextUnit, TopImport,
};
use std::fs;
use std::path::PathBuf;

#[test]
fn project_config_overrides_defaults() {
    let dir = tempfile::TempDir::new().unwrap();
    fs::write(
        dir.path().join("lumion.toml"),
        "[index]\nsource_dir = \"app\"\n\n[communities]\ntop_imports = 3\n",
    )
    .unwrap();

    let config = LumionConfig::load_for_project(dir.path()).unwrap();
    assert_eq!(config.index.source_dir, "app");
    assert_eq!(config.communities.top_imports, 3);
    assert_eq!(config.index.extensions, vec!["ts", "tsx"]);
    assert_eq!(config.output.base, "graphrag-pipeline/output");
}

#[test]
fn malformed_project_config_is_an_error() {
    let dir = tempfile::TempDir::new().unwrap();
    fs::write(dir.path().join("lumion.toml"), "[index\nsource_dir = ").unwrap();
    assert!(matches!(
        LumionConfig::load_for_project(dir.path()),
        Err(LumionError::Config(_))
    ));
}

#[test]
fn explicit_config_path_loads() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("custom.toml");
    fs::write(&path, "[index]\nrespect_gitignore = true\n").unwrap();
    let config = LumionConfig::load(&path).unwrap();
    assert!(config.index.respect_gitignore);
    assert_eq!(config.index.text_unit_chars, 800);
}

#[test]
fn computed_location_receives_artifacts() {
    let workspace = tempfile::TempDir::new().unwrap();
    let settings =
        OutputSettings::from_parts(&LumionConfig::default().output, workspace.path(), None, None);

    let location = create_output_location(&settings, 1_700_000_000).unwrap();
    let expected: PathBuf = workspace
        .path()
        .join("graphrag-pipeline/output/1700000000/artifacts");
    assert_eq!(location, OutputLocation::Computed(expected.clone()));

    let set = ArtifactSet {
        entities: vec![Entity::new("file_a_ts", "a.ts", EntityType::File, "/p/a.ts")],
        relationships: vec![Relationship::new(
            "file_a_ts",
            "file_b_ts",
            RelationshipType::Imports,
        )],
        text_units: vec![TextUnit {
            document_id: "file_a_ts".to_string(),
            chunk_id: 0,
            text: "import { foo } from './b';".to_string(),
        }],
        community_reports: vec![CommunityReport {
            community_id: "src".to_string(),
            report: "Community src: files=1, components=0, functions=0, top imports: ./b(1)"
                .to_string(),
            files: 1,
            components: 0,
            functions: 0,
            top_imports: vec![TopImport {
                module: "./b".to_string(),
                count: 1,
            }],
        }],
    };
    write_artifacts(location.path(), &set).unwrap();
    assert_eq!(read_artifacts(&expected).unwrap(), set);
}

#[test]
fn relationship_json_uses_wire_names() {
    let dir = tempfile::TempDir::new().unwrap();
    let set = ArtifactSet {
        relationships: vec![Relationship::new("file_a", "hook_useState", RelationshipType::UsesHook)],
        ..ArtifactSet::default()
    };
    write_artifacts(dir.path(), &set).unwrap();
    let raw = fs::read_to_string(dir.path().join("create_final_relationships.json")).unwrap();
    assert!(raw.contains("\"type\": \"USES_HOOK\""));
}

#[test]
fn missing_artifacts_dir_is_not_found() {
    let dir = tempfile::TempDir::new().unwrap();
    assert!(matches!(
        read_artifacts(&dir.path().join("nope")),
        Err(LumionError::NotFound(_))
    ));
}
