//! lumion-cli: CLI entry point for the lumion code graph extractor.

mod commands_graph;
mod commands_index;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "lumion",
    about = "Extract a code knowledge graph from a TypeScript/React source tree"
)]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index a source tree and write graph artifacts
    Index {
        /// Project directory (defaults to current directory)
        #[arg(short, long)]
        project: Option<PathBuf>,

        /// Source directory to walk, relative to the project (overrides index.source_dir)
        #[arg(short, long)]
        src: Option<PathBuf>,

        /// Output base directory (overrides GRAPHRAG_INDEX_PATH and output.base)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Config file (defaults to <project>/lumion.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show the neighborhood of a node in written artifacts
    Neighbors {
        /// Artifacts directory
        artifacts: PathBuf,

        /// Entity id (e.g. cmp_Card, file_src_main_ts)
        id: String,

        /// Traversal depth
        #[arg(short, long, default_value = "1")]
        depth: usize,
    },

    /// Show graph statistics for written artifacts
    Stats {
        /// Artifacts directory
        artifacts: PathBuf,
    },

    /// Export the graph of written artifacts as {nodes, edges} JSON
    Export {
        /// Artifacts directory
        artifacts: PathBuf,

        /// Keep only these entity types (e.g. Component,Function)
        #[arg(short, long, value_delimiter = ',')]
        types: Vec<String>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries paths and JSON.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lumion=info".parse().expect("valid tracing directive")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Index {
            project,
            src,
            output,
            config,
        } => {
            let project_dir = match project {
                Some(p) => p,
                None => std::env::current_dir()?,
            };
            commands_index::cmd_index(&project_dir, src.as_deref(), output, config.as_deref())?;
        }
        Commands::Neighbors {
            artifacts,
            id,
            depth,
        } => {
            commands_graph::cmd_neighbors(&artifacts, &id, depth)?;
        }
        Commands::Stats { artifacts } => {
            commands_graph::cmd_stats(&artifacts)?;
        }
        Commands::Export {
            artifacts,
            types,
            output,
        } => {
            commands_graph::cmd_export(&artifacts, &types, output.as_deref())?;
        }
    }

    Ok(())
}
