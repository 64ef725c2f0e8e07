//! PDF chatbot CLI - main entry point
//!
//! Each invocation performs one upload of the given PDFs and then runs the
//! selected action against the resulting session.

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use pdf_chatbot::commands::{self, GraphFormat};
use pdf_chatbot::metrics;
use tracing::warn;

#[derive(Parser)]
#[command(name = "pdf_chatbot")]
#[command(about = "Ask questions about PDF documents and map their entities", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config.yml (default: ./config.yml, then ../config.yml)
    #[arg(long, global = true, env = "PDF_CHATBOT_CONFIG")]
    config: Option<PathBuf>,

    /// Address to expose Prometheus metrics (e.g., 0.0.0.0:9898)
    #[arg(long, env = "METRICS_ADDR")]
    metrics_addr: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a single question from the documents
    Ask {
        /// Question to answer
        question: String,

        /// PDF files or directories with PDFs
        #[arg(long = "pdf", required = true, num_args = 1..)]
        pdfs: Vec<PathBuf>,

        /// Print the retrieved chunks after the answer
        #[arg(long, default_value_t = false)]
        show_sources: bool,
    },

    /// Upload documents once, then answer questions from stdin
    Chat {
        /// PDF files or directories with PDFs
        #[arg(long = "pdf", required = true, num_args = 1..)]
        pdfs: Vec<PathBuf>,
    },

    /// Build the entity co-occurrence graph
    Graph {
        /// PDF files or directories with PDFs
        #[arg(long = "pdf", required = true, num_args = 1..)]
        pdfs: Vec<PathBuf>,

        /// Output format: dot | json | csv
        #[arg(long, default_value = "dot")]
        format: String,

        /// Optional output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the text extracted from every page
    Pages {
        /// PDF files or directories with PDFs
        #[arg(long = "pdf", required = true, num_args = 1..)]
        pdfs: Vec<PathBuf>,

        /// Truncate each page to this many characters
        #[arg(long)]
        max_chars: Option<usize>,
    },

    /// Check that configured model services are available
    Doctor,
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Ask { .. } => "ask",
            Commands::Chat { .. } => "chat",
            Commands::Graph { .. } => "graph",
            Commands::Pages { .. } => "pages",
            Commands::Doctor => "doctor",
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env for local development
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("pdf_chatbot=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Some(addr) = cli.metrics_addr.as_deref() {
        match addr.parse::<SocketAddr>() {
            Ok(socket) => metrics::spawn_metrics_server(socket),
            Err(err) => warn!(%addr, "Invalid metrics address: {}", err),
        }
    }

    let command_name = cli.command.name();
    metrics::record_command_start(command_name);
    let start = Instant::now();

    let result = execute_command(cli.config, cli.command).await;

    metrics::record_command_result(command_name, start.elapsed(), result.is_ok());

    result
}

async fn execute_command(config_path: Option<PathBuf>, command: Commands) -> anyhow::Result<()> {
    if let Commands::Pages { pdfs, max_chars } = &command {
        return commands::pages::run(pdfs, *max_chars);
    }

    let config = commands::load_config(config_path.as_deref())?;

    match command {
        Commands::Ask {
            question,
            pdfs,
            show_sources,
        } => {
            commands::ask::run(&config, &pdfs, &question, show_sources).await?;
        }
        Commands::Chat { pdfs } => {
            commands::chat::run(&config, &pdfs).await?;
        }
        Commands::Graph {
            pdfs,
            format,
            output,
        } => {
            let format = GraphFormat::parse(&format)?;
            commands::graph::run(&config, &pdfs, format, output.as_deref()).await?;
        }
        Commands::Doctor => {
            commands::doctor::run(&config).await?;
        }
        Commands::Pages { .. } => {}
    }

    Ok(())
}
