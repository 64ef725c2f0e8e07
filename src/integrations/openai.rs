//! OpenAI (or OpenAI-compatible) embeddings and completions.

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
        CreateEmbeddingRequestArgs, EmbeddingInput,
    },
    Client as OpenAIApiClient,
};
use tracing::{debug, info};

use crate::{Error, Result};

/// Inputs longer than this are cut before embedding.
const MAX_EMBED_CHARS: usize = 8000;

/// Thin wrapper over the async-openai client.
#[derive(Debug, Clone)]
pub struct OpenAIClient {
    client: OpenAIApiClient<OpenAIConfig>,
}

impl OpenAIClient {
    /// Create client with API key and optional base URL (OpenAI-compatible servers).
    pub fn new(api_key: &str, base_url: Option<&str>) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(Error::Config("OPENAI_API_KEY is empty".to_string()));
        }

        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(url) = base_url {
            config = config.with_api_base(url.trim_end_matches('/'));
        }

        Ok(Self {
            client: OpenAIApiClient::with_config(config),
        })
    }

    /// Generate embeddings for multiple texts in batch
    pub async fn embed_batch(&self, model: &str, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Generating embeddings for {} texts", texts.len());

        let processed: Vec<String> = texts
            .iter()
            .map(|t| truncate_chars(t, MAX_EMBED_CHARS))
            .collect();

        let request = CreateEmbeddingRequestArgs::default()
            .model(model)
            .input(EmbeddingInput::StringArray(processed))
            .build()
            .map_err(|e| Error::Embedding(e.to_string()))?;

        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(|e| Error::Embedding(format!("OpenAI request failed: {}", e)))?;

        info!(
            "Generated {} embeddings, tokens used: {}",
            response.data.len(),
            response.usage.total_tokens
        );

        if response.data.len() != texts.len() {
            return Err(Error::Embedding(format!(
                "OpenAI returned {} embeddings for {} inputs",
                response.data.len(),
                texts.len()
            )));
        }

        let mut data = response.data;
        data.sort_by_key(|e| e.index);
        Ok(data.into_iter().map(|e| e.embedding).collect())
    }

    /// Single-turn completion; returns the first choice.
    #[allow(deprecated)]
    pub async fn complete(&self, model: &str, prompt: &str, max_tokens: u32) -> Result<String> {
        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| Error::Generation(e.to_string()))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages(vec![message.into()])
            .max_tokens(max_tokens)
            .temperature(0.0)
            .build()
            .map_err(|e| Error::Generation(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| Error::Generation(format!("OpenAI request failed: {}", e)))?;

        response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| Error::Generation("Empty response from OpenAI".to_string()))
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(max_chars) {
        Some((idx, _)) => trimmed[..idx].to_string(),
        None => trimmed.to_string(),
    }
}
