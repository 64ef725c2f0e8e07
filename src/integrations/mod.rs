//! External model services.
//!
//! Provides clients for:
//! - Ollama (local embeddings, generation, LLM-based NER)
//! - OpenAI or any OpenAI-compatible server (embeddings, chat completion)

pub mod ollama;
pub mod openai;

pub use ollama::OllamaClient;
pub use openai::OpenAIClient;
