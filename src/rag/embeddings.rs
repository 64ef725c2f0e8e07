use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use tracing::debug;

use crate::integrations::{OllamaClient, OpenAIClient};
use crate::Result;

/// Texts per embedding request.
const EMBED_BATCH_SIZE: usize = 48;

/// Sentence-embedding backend. One instance embeds both chunks and questions.
#[derive(Debug, Clone)]
pub enum Embedder {
    Ollama { client: OllamaClient, model: String },
    OpenAI { client: OpenAIClient, model: String },
    Local(LocalEmbedder),
}

impl Embedder {
    pub fn ollama(client: OllamaClient, model: impl Into<String>) -> Self {
        Self::Ollama {
            client,
            model: model.into(),
        }
    }

    pub fn openai(client: OpenAIClient, model: impl Into<String>) -> Self {
        Self::OpenAI {
            client,
            model: model.into(),
        }
    }

    pub fn local(dim: usize) -> Self {
        Self::Local(LocalEmbedder::new(dim))
    }

    /// Name recorded in the index; queries must come from the same model.
    pub fn model_name(&self) -> String {
        match self {
            Embedder::Ollama { model, .. } | Embedder::OpenAI { model, .. } => model.clone(),
            Embedder::Local(local) => format!("local-hash-{}", local.dimension()),
        }
    }

    /// Embed texts in request-sized batches, preserving input order.
    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(EMBED_BATCH_SIZE) {
            let embedded = match self {
                Embedder::Ollama { client, model } => client.embed(model, batch).await?,
                Embedder::OpenAI { client, model } => client.embed_batch(model, batch).await?,
                Embedder::Local(local) => batch.iter().map(|t| local.embed(t)).collect(),
            };
            debug!("Embedded batch of {} texts", embedded.len());
            vectors.extend(embedded);
        }
        Ok(vectors)
    }

    /// Embed a single text.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text.to_string()]).await?;
        Ok(vectors.pop().unwrap_or_default())
    }
}

/// Deterministic, fast embedding for offline/local use.
#[derive(Debug, Clone)]
pub struct LocalEmbedder {
    dim: usize,
}

impl LocalEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(8) }
    }

    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut vec = vec![0.0f32; self.dim];
        for token in text.split_whitespace() {
            let token: String = token
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase();
            if token.is_empty() {
                continue;
            }
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            let idx = (hasher.finish() as usize) % self.dim;
            vec[idx] += 1.0;
        }

        normalize(&mut vec);
        vec
    }

    pub fn dimension(&self) -> usize {
        self.dim
    }
}

/// Scale a vector to unit length; zero vectors are left alone.
pub fn normalize(vec: &mut [f32]) {
    let norm = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in vec.iter_mut() {
            *v /= norm;
        }
    }
}
