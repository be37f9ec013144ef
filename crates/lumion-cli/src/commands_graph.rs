//! Graph queries over written artifacts.

use lumion_core::{read_artifacts, EntityType};
use lumion_graph::ArtifactGraph;
use std::io::Write;
use std::path::Path;

fn load_graph(artifacts_dir: &Path) -> anyhow::Result<ArtifactGraph> {
    let set = read_artifacts(artifacts_dir)?;
    Ok(ArtifactGraph::from_artifacts(&set.entities, &set.relationships))
}

pub(crate) fn cmd_neighbors(artifacts_dir: &Path, id: &str, depth: usize) -> anyhow::Result<()> {
    let graph = load_graph(artifacts_dir)?;
    let neighborhood = graph.neighbors(id, depth)?;
    println!("{}", serde_json::to_string_pretty(&neighborhood)?);
    Ok(())
}

pub(crate) fn cmd_stats(artifacts_dir: &Path) -> anyhow::Result<()> {
    let graph = load_graph(artifacts_dir)?;
    println!("{}", serde_json::to_string_pretty(&graph.stats())?);
    Ok(())
}

pub(crate) fn cmd_export(
    artifacts_dir: &Path,
    types: &[String],
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let types = types
        .iter()
        .map(|t| t.parse::<EntityType>())
        .collect::<Result<Vec<_>, _>>()?;
    let graph = load_graph(artifacts_dir)?;
    let export = graph.export(&types);

    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(std::fs::File::create(path)?),
        None => Box::new(std::io::stdout()),
    };
    writeln!(writer, "{}", serde_json::to_string_pretty(&export)?)?;

    eprintln!(
        "Exported {} nodes, {} edges.",
        export.nodes.len(),
        export.edges.len()
    );
    Ok(())
}
