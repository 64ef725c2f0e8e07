//! One upload, one question.

use std::path::PathBuf;

use anyhow::{Context, Result};

use super::load_session;
use crate::config::Config;
use crate::rag::Answer;
use crate::session::on_question;

pub async fn run(config: &Config, pdfs: &[PathBuf], question: &str, show_sources: bool) -> Result<()> {
    let (models, state) = load_session(config, pdfs).await?;
    let answer = on_question(&models, &state, question)
        .await
        .context("failed to answer question")?;

    print!("{}", format_answer(&answer, show_sources));
    Ok(())
}

/// Answer text, optionally followed by the chunks it was built from.
pub fn format_answer(answer: &Answer, show_sources: bool) -> String {
    let mut out = format!("{}\n", answer.text);
    if show_sources && !answer.sources.is_empty() {
        out.push_str("\nSources:\n");
        for (rank, hit) in answer.sources.iter().enumerate() {
            out.push_str(&format!(
                "  {}. {} (score {:.3})\n",
                rank + 1,
                hit.chunk.source,
                hit.score
            ));
            for line in hit.chunk.text.lines() {
                out.push_str(&format!("     {}\n", line));
            }
        }
    }
    out
}
