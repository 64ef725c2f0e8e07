//! Upload and question handlers.
//!
//! An upload extracts page texts, builds the vector index and the entity
//! graph, and returns them as a fresh `SessionState`. Questions are answered
//! against that state until the caller drops it or uploads again.

use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::graph::{build_graph, KnowledgeGraph};
use crate::metrics::{self, STAGE_ANSWER, STAGE_CHUNK, STAGE_EMBED, STAGE_EXTRACT, STAGE_GRAPH};
use crate::pdf::{extract_texts, PageText, PdfSource};
use crate::pipeline::Models;
use crate::rag::{Answer, VectorIndex};
use crate::{Error, Result};

/// Everything derived from the most recent upload.
#[derive(Debug, Clone)]
pub struct SessionState {
    id: Uuid,
    created_at: DateTime<Utc>,
    pages: Vec<PageText>,
    index: VectorIndex,
    graph: KnowledgeGraph,
}

impl SessionState {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn pages(&self) -> &[PageText] {
        &self.pages
    }

    /// Pages across all uploaded files, empty pages included.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    pub fn graph(&self) -> &KnowledgeGraph {
        &self.graph
    }
}

/// Handle an upload: extract, index and graph all files at once.
///
/// Any unreadable file fails the whole upload; no state is produced.
pub async fn on_upload(models: &Models, sources: &[PdfSource]) -> Result<SessionState> {
    if sources.is_empty() {
        return Err(Error::InvalidArgument("no PDF files uploaded".to_string()));
    }

    let started = Instant::now();
    let pages = metrics::time_stage(STAGE_EXTRACT, || extract_texts(sources))?;
    let state = build_session(models, pages).await?;

    info!(
        "Session {} ready in {:.2?}: {} pages, {} chunks, {} graph nodes",
        state.id,
        started.elapsed(),
        state.page_count(),
        state.index.len(),
        state.graph.node_count()
    );
    Ok(state)
}

/// Build session state from already extracted page texts.
pub async fn build_session(models: &Models, pages: Vec<PageText>) -> Result<SessionState> {
    let chunks = metrics::time_stage(STAGE_CHUNK, || models.chunker.chunk_all(&pages));
    info!("Split {} pages into {} chunks", pages.len(), chunks.len());

    let started = Instant::now();
    let index = VectorIndex::build(chunks, &models.embedder).await?;
    metrics::record_stage(STAGE_EMBED, started.elapsed());

    let started = Instant::now();
    let texts: Vec<&str> = pages.iter().map(|p| p.text.as_str()).collect();
    let graph = build_graph(&texts, &models.recognizer).await?;
    metrics::record_stage(STAGE_GRAPH, started.elapsed());

    Ok(SessionState {
        id: Uuid::new_v4(),
        created_at: Utc::now(),
        pages,
        index,
        graph,
    })
}

/// Handle one question against the current session.
pub async fn on_question(
    models: &Models,
    state: &SessionState,
    question: &str,
) -> Result<Answer> {
    let started = Instant::now();
    let answer = models.answerer().answer(&state.index, question).await;
    metrics::record_stage(STAGE_ANSWER, started.elapsed());
    answer
}
