use tracing::{debug, info};

use super::chunker::Chunk;
use super::embeddings::Embedder;
use crate::{Error, Result};

/// Stored chunk with its embedding.
#[derive(Debug, Clone)]
pub struct IndexedChunk {
    pub chunk: Chunk,
    pub embedding: Vec<f32>,
}

/// Retrieval hit.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

/// In-memory exact cosine-similarity index.
///
/// Built once from the full chunk set of an upload and never mutated; a new
/// upload builds a new index.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    model: String,
    dimension: usize,
    entries: Vec<IndexedChunk>,
}

impl VectorIndex {
    /// Embed every chunk with `embedder` and index the results.
    pub async fn build(chunks: Vec<Chunk>, embedder: &Embedder) -> Result<Self> {
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = embedder.embed_batch(&texts).await?;
        let index = Self::from_embeddings(embedder.model_name(), chunks, embeddings)?;

        info!(
            "Indexed {} chunks with {} (dim {})",
            index.len(),
            index.model,
            index.dimension
        );
        Ok(index)
    }

    /// Assemble an index from precomputed vectors, one per chunk.
    pub fn from_embeddings(
        model: impl Into<String>,
        chunks: Vec<Chunk>,
        embeddings: Vec<Vec<f32>>,
    ) -> Result<Self> {
        if chunks.len() != embeddings.len() {
            return Err(Error::Embedding(format!(
                "{} embeddings for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }

        let dimension = embeddings.first().map(Vec::len).unwrap_or(0);
        if let Some(bad) = embeddings.iter().find(|e| e.len() != dimension) {
            return Err(Error::Embedding(format!(
                "inconsistent embedding dimension: {} vs {}",
                bad.len(),
                dimension
            )));
        }

        let entries = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| IndexedChunk { chunk, embedding })
            .collect();

        Ok(Self {
            model: model.into(),
            dimension,
            entries,
        })
    }

    /// Exact k-NN: `min(k, len)` hits ordered by non-increasing similarity,
    /// ties kept in insertion order.
    pub fn query(&self, embedding: &[f32], k: usize) -> Result<Vec<ScoredChunk>> {
        if self.entries.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        if embedding.len() != self.dimension {
            return Err(Error::Embedding(format!(
                "query dimension {} does not match index dimension {}",
                embedding.len(),
                self.dimension
            )));
        }

        let mut scored: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|entry| ScoredChunk {
                chunk: entry.chunk.clone(),
                score: cosine_similarity(embedding, &entry.embedding),
            })
            .collect();

        // sort_by is stable
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k.min(scored.len()));
        debug!("Vector index returned {} results", scored.len());

        Ok(scored)
    }

    /// Name of the embedding model that produced the vectors.
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[IndexedChunk] {
        &self.entries
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || b.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;

    for (&x, &y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(text: &str) -> Chunk {
        Chunk::new(text.to_string(), 0, text.len(), "doc#page=1")
    }

    fn index_of(vectors: Vec<Vec<f32>>) -> VectorIndex {
        let chunks = (0..vectors.len()).map(|i| chunk(&format!("c{i}"))).collect();
        VectorIndex::from_embeddings("test", chunks, vectors).unwrap()
    }

    #[test]
    fn cosine_similarity_handles_edge_cases() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[0.0, 0.0]), 0.0);

        let aligned = cosine_similarity(&[1.0, 0.0], &[2.0, 0.0]);
        assert!((aligned - 1.0).abs() < 1e-6);

        let orthogonal = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]);
        assert!(orthogonal.abs() < 1e-6);
    }

    #[test]
    fn query_returns_min_k_n_in_descending_order() {
        let index = index_of(vec![
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![0.7, 0.7],
            vec![-1.0, 0.0],
        ]);

        let hits = index.query(&[1.0, 0.0], 3).unwrap();
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].chunk.text, "c1");
        assert_eq!(hits[1].chunk.text, "c2");
        for pair in hits.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }

        let all = index.query(&[1.0, 0.0], 10).unwrap();
        assert_eq!(all.len(), 4);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let index = index_of(vec![vec![1.0, 0.0], vec![1.0, 0.0], vec![1.0, 0.0]]);

        let hits = index.query(&[1.0, 0.0], 3).unwrap();
        let order: Vec<&str> = hits.iter().map(|h| h.chunk.text.as_str()).collect();

        assert_eq!(order, vec!["c0", "c1", "c2"]);
    }

    #[test]
    fn query_dimension_mismatch_is_error() {
        let index = index_of(vec![vec![1.0, 0.0]]);
        let err = index.query(&[1.0, 0.0, 0.0], 1).unwrap_err();
        assert!(matches!(err, Error::Embedding(_)));
    }

    #[test]
    fn empty_index_returns_no_hits() {
        let index = VectorIndex::from_embeddings("test", Vec::new(), Vec::new()).unwrap();
        assert!(index.is_empty());
        assert_eq!(index.dimension(), 0);
        assert!(index.query(&[1.0], 3).unwrap().is_empty());
    }

    #[test]
    fn from_embeddings_rejects_count_mismatch() {
        let err = VectorIndex::from_embeddings("test", vec![chunk("a")], Vec::new()).unwrap_err();
        assert!(matches!(err, Error::Embedding(_)));
    }

    #[test]
    fn from_embeddings_rejects_ragged_vectors() {
        let err = VectorIndex::from_embeddings(
            "test",
            vec![chunk("a"), chunk("b")],
            vec![vec![1.0, 0.0], vec![1.0]],
        )
        .unwrap_err();
        assert!(matches!(err, Error::Embedding(_)));
    }

    #[tokio::test]
    async fn build_with_local_embedder_finds_relevant_chunk() {
        let embedder = Embedder::local(256);
        let chunks = vec![
            chunk("Alice loves Rust programming and open source projects."),
            chunk("Gardening on weekends helps Bob relax and enjoy nature."),
        ];

        let index = VectorIndex::build(chunks, &embedder).await.unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.model(), "local-hash-256");

        let query = embedder.embed("Rust programming projects").await.unwrap();
        let hits = index.query(&query, 1).unwrap();

        assert_eq!(hits.len(), 1);
        assert!(hits[0].chunk.text.starts_with("Alice"));
    }
}
