//! Entity graph export.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use super::load_session;
use crate::config::Config;
use crate::graph::KnowledgeGraph;

/// Output format for the graph command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphFormat {
    /// Graphviz (render with `neato -Tpng`)
    Dot,
    Json,
    /// `subject,relation,object` triples
    Csv,
}

impl GraphFormat {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "dot" | "graphviz" => Ok(Self::Dot),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => anyhow::bail!("unknown graph format '{}': expected dot, json or csv", other),
        }
    }
}

pub async fn run(
    config: &Config,
    pdfs: &[PathBuf],
    format: GraphFormat,
    output: Option<&Path>,
) -> Result<()> {
    let (_models, state) = load_session(config, pdfs).await?;
    let rendered = render(state.graph(), format)?;

    match output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(
                "Graph with {} nodes and {} edges saved to {}",
                state.graph().node_count(),
                state.graph().edge_count(),
                path.display()
            );
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

pub fn render(graph: &KnowledgeGraph, format: GraphFormat) -> Result<String> {
    let rendered = match format {
        GraphFormat::Dot => graph.to_dot(),
        GraphFormat::Json => format!("{}\n", graph.to_json()?),
        GraphFormat::Csv => {
            let mut buffer = Vec::new();
            graph.write_csv_triples(&mut buffer)?;
            String::from_utf8(buffer).context("CSV output is not UTF-8")?
        }
    };
    Ok(rendered)
}
