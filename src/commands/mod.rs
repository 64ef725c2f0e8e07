//! Command implementations
//!
//! Each module corresponds to a subcommand in the CLI. Every command that
//! reads documents goes through `load_session`, which mirrors one upload in
//! the chat UI.

pub mod ask;
pub mod chat;
pub mod doctor;
pub mod graph;
pub mod pages;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::pdf::{collect_pdf_paths, PdfSource};
use crate::pipeline::Models;
use crate::session::{on_upload, SessionState};

pub use ask::run as ask_run;
pub use chat::run as chat_run;
pub use graph::{run as graph_run, GraphFormat};

/// Load configuration from an explicit file, or the default lookup.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::new().context("failed to load config")?,
    };
    Ok(config)
}

/// Read every PDF named on the command line (directories are expanded).
pub fn read_sources(inputs: &[PathBuf]) -> Result<Vec<PdfSource>> {
    let paths = collect_pdf_paths(inputs)?;
    if paths.is_empty() {
        anyhow::bail!("no PDF files found in the given paths");
    }

    paths
        .iter()
        .map(|path| {
            PdfSource::from_path(path).with_context(|| format!("failed to read {}", path.display()))
        })
        .collect()
}

/// Initialize models and run one upload.
pub async fn load_session(config: &Config, inputs: &[PathBuf]) -> Result<(Models, SessionState)> {
    let models = Models::from_config(config).context("failed to initialize models")?;
    let sources = read_sources(inputs)?;
    info!("Uploading {} PDF files", sources.len());

    let state = on_upload(&models, &sources)
        .await
        .context("failed to process uploaded PDFs")?;
    Ok((models, state))
}
