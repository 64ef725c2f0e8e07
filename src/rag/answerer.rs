use tracing::{debug, info};

use super::embeddings::Embedder;
use super::index::{ScoredChunk, VectorIndex};
use crate::integrations::{OllamaClient, OpenAIClient};
use crate::prompts::{render_answer_prompt, ANSWER_TEMPLATE};
use crate::{Error, Result};

/// Designed reply when the documents do not contain the answer.
pub const NOT_FOUND_ANSWER: &str = "Answer not found in the documents.";

/// Generated answer plus the chunks it was grounded on, nearest first.
#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    pub sources: Vec<ScoredChunk>,
}

impl Answer {
    pub fn is_not_found(&self) -> bool {
        self.text == NOT_FOUND_ANSWER
    }
}

/// Text generation backend. Decoding is greedy (temperature 0).
#[derive(Debug, Clone)]
pub enum Generator {
    Ollama { client: OllamaClient, model: String },
    OpenAI { client: OpenAIClient, model: String },
}

impl Generator {
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

    pub fn model_name(&self) -> &str {
        match self {
            Generator::Ollama { model, .. } | Generator::OpenAI { model, .. } => model,
        }
    }

    /// One completion call, capped at `max_new_tokens`. No retry.
    pub async fn generate(&self, prompt: &str, max_new_tokens: u32) -> Result<String> {
        match self {
            Generator::Ollama { client, model } => {
                client
                    .generate(prompt, model, 0.0, max_new_tokens)
                    .await
            }
            Generator::OpenAI { client, model } => {
                client.complete(model, prompt, max_new_tokens).await
            }
        }
    }
}

/// Retrieval-augmented answerer over a prebuilt index.
pub struct Answerer<'a> {
    embedder: &'a Embedder,
    generator: &'a Generator,
    top_k: usize,
    max_new_tokens: u32,
    template: &'a str,
}

impl<'a> Answerer<'a> {
    pub fn new(embedder: &'a Embedder, generator: &'a Generator) -> Self {
        Self {
            embedder,
            generator,
            top_k: crate::config::DEFAULT_TOP_K,
            max_new_tokens: crate::config::DEFAULT_MAX_NEW_TOKENS,
            template: ANSWER_TEMPLATE,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    pub fn with_max_new_tokens(mut self, max_new_tokens: u32) -> Self {
        self.max_new_tokens = max_new_tokens;
        self
    }

    pub fn with_template(mut self, template: &'a str) -> Self {
        self.template = template;
        self
    }

    /// Answer a question strictly from the indexed chunks.
    pub async fn answer(&self, index: &VectorIndex, question: &str) -> Result<Answer> {
        let question = question.trim();
        if question.is_empty() {
            return Err(Error::InvalidArgument("question is empty".to_string()));
        }

        if index.is_empty() {
            info!("Index is empty, skipping generation");
            return Ok(Answer {
                text: NOT_FOUND_ANSWER.to_string(),
                sources: Vec::new(),
            });
        }

        if index.model() != self.embedder.model_name() {
            return Err(Error::Embedding(format!(
                "index was built with '{}' but questions are embedded with '{}'",
                index.model(),
                self.embedder.model_name()
            )));
        }

        let query = self.embedder.embed(question).await?;
        let sources = index.query(&query, self.top_k)?;

        let context = sources
            .iter()
            .map(|hit| hit.chunk.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let prompt = render_answer_prompt(self.template, &context, question);
        debug!(
            "Prompt built from {} chunks ({} chars)",
            sources.len(),
            prompt.chars().count()
        );

        let text = self
            .generator
            .generate(&prompt, self.max_new_tokens)
            .await?
            .trim()
            .to_string();

        info!(
            "Answered with {} ({} source chunks)",
            self.generator.model_name(),
            sources.len()
        );
        Ok(Answer { text, sources })
    }
}
