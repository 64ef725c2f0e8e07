//! Model initialization.
//!
//! All model handles are created once from configuration and then borrowed
//! read-only by every upload and question.

use tracing::info;

use crate::config::{Config, EmbeddingBackendKind, GenerationBackendKind, NerBackendKind};
use crate::graph::EntityRecognizer;
use crate::integrations::{OllamaClient, OpenAIClient};
use crate::prompts::Prompt;
use crate::rag::{Answerer, Chunker, Embedder, Generator};
use crate::{Error, Result};

/// Chunker, embedder, generator and recognizer for one process.
#[derive(Debug, Clone)]
pub struct Models {
    pub chunker: Chunker,
    pub embedder: Embedder,
    pub generator: Generator,
    pub recognizer: EntityRecognizer,
    pub top_k: usize,
    pub max_new_tokens: u32,
    pub answer_template: String,
}

impl Models {
    pub fn new(embedder: Embedder, generator: Generator, recognizer: EntityRecognizer) -> Self {
        Self {
            chunker: Chunker::default(),
            embedder,
            generator,
            recognizer,
            top_k: crate::config::DEFAULT_TOP_K,
            max_new_tokens: crate::config::DEFAULT_MAX_NEW_TOKENS,
            answer_template: Prompt::Answer.default_template().to_string(),
        }
    }

    pub fn with_chunker(mut self, chunker: Chunker) -> Self {
        self.chunker = chunker;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_max_new_tokens(mut self, max_new_tokens: u32) -> Self {
        self.max_new_tokens = max_new_tokens;
        self
    }

    pub fn with_answer_template(mut self, template: impl Into<String>) -> Self {
        self.answer_template = template.into();
        self
    }

    /// Build every backend named in the configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let ollama = OllamaClient::with_url(&config.ollama_url)?;
        let openai = || -> Result<OpenAIClient> {
            let key = config.openai_api_key.as_deref().ok_or_else(|| {
                Error::Config("OPENAI_API_KEY is required for the openai backend".to_string())
            })?;
            OpenAIClient::new(key, config.openai_base_url.as_deref())
        };

        let embedder = match config.embedding_backend {
            EmbeddingBackendKind::Ollama => {
                Embedder::ollama(ollama.clone(), config.embedding_model.as_str())
            }
            EmbeddingBackendKind::OpenAI => {
                Embedder::openai(openai()?, config.embedding_model.as_str())
            }
            EmbeddingBackendKind::Local => Embedder::local(config.embedding_dim),
        };

        let generator = match config.generation_backend {
            GenerationBackendKind::Ollama => {
                Generator::ollama(ollama.clone(), config.generation_model.as_str())
            }
            GenerationBackendKind::OpenAI => {
                Generator::openai(openai()?, config.generation_model.as_str())
            }
        };

        let recognizer = match config.ner_backend {
            NerBackendKind::Rules => EntityRecognizer::rules(&config.ner_language)?,
            NerBackendKind::Ollama => EntityRecognizer::ollama(
                ollama,
                config.ner_model.as_str(),
                config.ner_language.as_str(),
            )
            .with_template(Prompt::Entities.template()),
        };

        info!(
            "Models: embedding {}, generation {}, NER {:?} ({})",
            embedder.model_name(),
            generator.model_name(),
            config.ner_backend,
            config.ner_language
        );

        Ok(Self::new(embedder, generator, recognizer)
            .with_chunker(Chunker::new(config.chunk_size, config.chunk_overlap))
            .with_top_k(config.top_k)
            .with_max_new_tokens(config.max_new_tokens)
            .with_answer_template(Prompt::Answer.template()))
    }

    pub fn answerer(&self) -> Answerer<'_> {
        Answerer::new(&self.embedder, &self.generator)
            .with_top_k(self.top_k)
            .with_max_new_tokens(self.max_new_tokens)
            .with_template(&self.answer_template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_config() -> Config {
        let mut config = Config::defaults();
        config.embedding_backend = EmbeddingBackendKind::Local;
        config.embedding_dim = 64;
        config
    }

    #[test]
    fn from_config_uses_configured_backends() {
        let mut config = local_config();
        config.chunk_size = 500;
        config.chunk_overlap = 50;
        config.top_k = 5;

        let models = Models::from_config(&config).unwrap();

        assert_eq!(models.embedder.model_name(), "local-hash-64");
        assert_eq!(models.generator.model_name(), config.generation_model);
        assert!(matches!(models.recognizer, EntityRecognizer::Rules(_)));
        assert_eq!(models.chunker.size(), 500);
        assert_eq!(models.chunker.overlap(), 50);
        assert_eq!(models.top_k, 5);
        assert_eq!(models.max_new_tokens, 256);
    }

    #[test]
    fn openai_backend_requires_key() {
        let mut config = local_config();
        config.generation_backend = GenerationBackendKind::OpenAI;
        config.openai_api_key = None;

        let err = Models::from_config(&config).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn openai_backend_with_key_is_built() {
        let mut config = local_config();
        config.generation_backend = GenerationBackendKind::OpenAI;
        config.generation_model = "gpt-4o-mini".to_string();
        config.openai_api_key = Some("sk-test".to_string());

        let models = Models::from_config(&config).unwrap();
        assert!(matches!(models.generator, Generator::OpenAI { .. }));
    }

    #[test]
    fn ollama_recognizer_gets_entity_template_once() {
        let mut config = local_config();
        config.ner_backend = NerBackendKind::Ollama;

        let models = Models::from_config(&config).unwrap();

        match models.recognizer {
            EntityRecognizer::Ollama { template, .. } => {
                assert!(template.contains("{text}"));
            }
            other => panic!("expected Ollama recognizer, got {:?}", other),
        }
    }

    #[test]
    fn invalid_chunking_is_rejected() {
        let mut config = local_config();
        config.chunk_overlap = config.chunk_size;

        assert!(Models::from_config(&config).is_err());
    }

    #[test]
    fn unknown_ner_language_is_rejected() {
        let mut config = local_config();
        config.ner_language = "tlh".to_string();

        let err = Models::from_config(&config).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
