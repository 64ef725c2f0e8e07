//! Interactive question loop over one upload.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::warn;

use super::load_session;
use crate::config::Config;
use crate::pipeline::Models;
use crate::session::{on_question, SessionState};

pub async fn run(config: &Config, pdfs: &[PathBuf]) -> Result<()> {
    let (models, state) = load_session(config, pdfs).await?;
    println!(
        "Loaded {} pages ({} chunks). Ask a question, or type 'exit' to quit.",
        state.page_count(),
        state.index().len()
    );

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    let answered = question_loop(&models, &state, stdin, &mut stdout).await?;
    println!("Answered {} questions.", answered);
    Ok(())
}

/// Answer questions line by line until EOF or `exit`/`quit`.
///
/// A failed question is reported and the loop continues with the next one.
pub async fn question_loop<R, W>(
    models: &Models,
    state: &SessionState,
    reader: R,
    out: &mut W,
) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = reader.lines();
    let mut answered = 0;

    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question.eq_ignore_ascii_case("exit") || question.eq_ignore_ascii_case("quit") {
            break;
        }

        match on_question(models, state, question).await {
            Ok(answer) => {
                writeln!(out, "{}", answer.text)?;
                answered += 1;
            }
            Err(err) => {
                warn!("Question failed: {}", err);
                writeln!(out, "Error: {}", err)?;
            }
        }
    }

    Ok(answered)
}
