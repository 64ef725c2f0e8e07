//! Configuration for model backends, chunking and retrieval
//!
//! Loads configuration from config.yml file

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::{Error, Result};

/// Default constants (fallback if config.yml not found)
pub const CONFIG_FILE: &str = "config.yml";
pub const OLLAMA_URL: &str = "http://localhost:11434";
/// Ollama tag of sentence-transformers/all-MiniLM-L6-v2
pub const DEFAULT_EMBEDDING_MODEL: &str = "all-minilm";
pub const DEFAULT_EMBEDDING_DIM: usize = 384;
pub const DEFAULT_GENERATION_MODEL: &str = "qwen2.5:3b";
pub const DEFAULT_NER_LANGUAGE: &str = "en";
pub const DEFAULT_CHUNK_SIZE: usize = 800;
pub const DEFAULT_CHUNK_OVERLAP: usize = 150;
pub const DEFAULT_TOP_K: usize = 3;
pub const DEFAULT_MAX_NEW_TOKENS: u32 = 256;

/// Which service computes embeddings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingBackendKind {
    Ollama,
    OpenAI,
    /// Hashed bag-of-words, no network (tests, offline use)
    Local,
}

impl EmbeddingBackendKind {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "openai" => Ok(Self::OpenAI),
            "local" | "hash" => Ok(Self::Local),
            other => Err(Error::Config(format!(
                "unknown embedding backend '{}'",
                other
            ))),
        }
    }
}

/// Which service generates answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationBackendKind {
    Ollama,
    OpenAI,
}

impl GenerationBackendKind {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "openai" => Ok(Self::OpenAI),
            other => Err(Error::Config(format!(
                "unknown generation backend '{}'",
                other
            ))),
        }
    }
}

/// Which recognizer finds named entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NerBackendKind {
    /// Capitalization rules with per-language stopwords
    Rules,
    Ollama,
}

impl NerBackendKind {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "rules" | "heuristic" => Ok(Self::Rules),
            "ollama" => Ok(Self::Ollama),
            other => Err(Error::Config(format!("unknown NER backend '{}'", other))),
        }
    }
}

/// YAML config structures
#[derive(Debug, Default, Deserialize)]
struct YamlConfig {
    ollama: Option<OllamaSection>,
    openai: Option<OpenAISection>,
    models: Option<ModelsSection>,
    chunking: Option<ChunkingSection>,
    retrieval: Option<RetrievalSection>,
}

#[derive(Debug, Default, Deserialize)]
struct OllamaSection {
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OpenAISection {
    api_key: Option<String>,
    base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ModelsSection {
    embedding_backend: Option<String>,
    embedding_model: Option<String>,
    embedding_dim: Option<usize>,
    generation_backend: Option<String>,
    generation_model: Option<String>,
    ner_backend: Option<String>,
    ner_model: Option<String>,
    ner_language: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkingSection {
    size: Option<usize>,
    overlap: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct RetrievalSection {
    top_k: Option<usize>,
    max_new_tokens: Option<u32>,
}

/// Main configuration struct
#[derive(Debug, Clone)]
pub struct Config {
    pub ollama_url: String,
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub embedding_backend: EmbeddingBackendKind,
    pub embedding_model: String,
    pub embedding_dim: usize,
    pub generation_backend: GenerationBackendKind,
    pub generation_model: String,
    pub ner_backend: NerBackendKind,
    pub ner_model: String,
    pub ner_language: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
    pub max_new_tokens: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load configuration from config.yml or use defaults
    /// Environment variables take precedence over config.yml values
    pub fn new() -> Result<Self> {
        Self::load_dotenv();
        for candidate in [CONFIG_FILE, "../config.yml"] {
            if Path::new(candidate).exists() {
                return Self::load_from_file(candidate);
            }
        }
        Self::from_yaml(YamlConfig::default())
    }

    /// Resolve a value: prefer env var if config value looks like ${VAR}
    fn resolve_env_string(value: Option<String>, env_key: &str) -> Option<String> {
        if let Some(ref v) = value {
            if v.starts_with("${") && v.ends_with('}') {
                let var_name = &v[2..v.len() - 1];
                if let Ok(env_val) = std::env::var(var_name) {
                    if !env_val.trim().is_empty() {
                        return Some(env_val);
                    }
                }
            }
        }
        if let Ok(env_val) = std::env::var(env_key) {
            if !env_val.trim().is_empty() {
                return Some(env_val);
            }
        }
        // An unresolved placeholder means "not configured"
        value.filter(|v| !(v.starts_with("${") && v.ends_with('}')))
    }

    /// Load .env file into environment variables using dotenvy
    fn load_dotenv() {
        if dotenvy::dotenv().is_err() {
            let _ = dotenvy::from_filename("../.env");
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_dotenv();

        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let yaml: YamlConfig = serde_yaml::from_str(&content)?;
        Self::from_yaml(yaml)
    }

    fn from_yaml(yaml: YamlConfig) -> Result<Self> {
        let ollama = yaml.ollama.unwrap_or_default();
        let openai = yaml.openai.unwrap_or_default();
        let models = yaml.models.unwrap_or_default();
        let chunking = yaml.chunking.unwrap_or_default();
        let retrieval = yaml.retrieval.unwrap_or_default();

        let embedding_backend = match models.embedding_backend {
            Some(v) => EmbeddingBackendKind::parse(&v)?,
            None => EmbeddingBackendKind::Ollama,
        };
        let generation_backend = match models.generation_backend {
            Some(v) => GenerationBackendKind::parse(&v)?,
            None => GenerationBackendKind::Ollama,
        };
        let ner_backend = match models.ner_backend {
            Some(v) => NerBackendKind::parse(&v)?,
            None => NerBackendKind::Rules,
        };

        let generation_model =
            Self::resolve_env_string(models.generation_model, "PDF_CHATBOT_GENERATION_MODEL")
                .unwrap_or_else(|| DEFAULT_GENERATION_MODEL.to_string());

        let config = Self {
            ollama_url: Self::resolve_env_string(ollama.url, "OLLAMA_URL")
                .unwrap_or_else(|| OLLAMA_URL.to_string()),
            openai_api_key: Self::resolve_env_string(openai.api_key, "OPENAI_API_KEY"),
            openai_base_url: Self::resolve_env_string(openai.base_url, "OPENAI_BASE_URL"),
            embedding_backend,
            embedding_model: Self::resolve_env_string(
                models.embedding_model,
                "PDF_CHATBOT_EMBEDDING_MODEL",
            )
            .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            embedding_dim: models.embedding_dim.unwrap_or(DEFAULT_EMBEDDING_DIM),
            generation_backend,
            ner_backend,
            ner_model: models
                .ner_model
                .unwrap_or_else(|| generation_model.clone()),
            generation_model,
            ner_language: Self::resolve_env_string(models.ner_language, "PDF_CHATBOT_NER_LANGUAGE")
                .unwrap_or_else(|| DEFAULT_NER_LANGUAGE.to_string()),
            chunk_size: chunking.size.unwrap_or(DEFAULT_CHUNK_SIZE),
            chunk_overlap: chunking.overlap.unwrap_or(DEFAULT_CHUNK_OVERLAP),
            top_k: retrieval.top_k.unwrap_or(DEFAULT_TOP_K),
            max_new_tokens: retrieval.max_new_tokens.unwrap_or(DEFAULT_MAX_NEW_TOKENS),
        };

        config.validate()?;
        Ok(config)
    }

    /// Create config with built-in defaults (no file, no environment)
    pub fn defaults() -> Self {
        Self {
            ollama_url: OLLAMA_URL.to_string(),
            openai_api_key: None,
            openai_base_url: None,
            embedding_backend: EmbeddingBackendKind::Ollama,
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            generation_backend: GenerationBackendKind::Ollama,
            generation_model: DEFAULT_GENERATION_MODEL.to_string(),
            ner_backend: NerBackendKind::Rules,
            ner_model: DEFAULT_GENERATION_MODEL.to_string(),
            ner_language: DEFAULT_NER_LANGUAGE.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            top_k: DEFAULT_TOP_K,
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
        }
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::Config("chunking.size must be positive".into()));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(Error::Config(format!(
                "chunking.overlap ({}) must be smaller than chunking.size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        if self.top_k == 0 {
            return Err(Error::Config("retrieval.top_k must be positive".into()));
        }
        if self.max_new_tokens == 0 {
            return Err(Error::Config(
                "retrieval.max_new_tokens must be positive".into(),
            ));
        }
        Ok(())
    }
}
