//! PDF Chatbot Library
//!
//! This library provides tools to:
//! - Extract page texts from uploaded PDF files
//! - Split them into overlapping chunks and index them by embedding
//! - Answer questions strictly from the retrieved chunks
//! - Build an entity co-occurrence graph from the same pages
//!
//! Embedding, generation and LLM-based NER run on external model servers
//! (Ollama or an OpenAI-compatible API).

pub mod config;
pub mod error;
pub mod graph;
pub mod integrations;
pub mod metrics;
pub mod pdf;
pub mod pipeline;
pub mod prompts;
pub mod rag;
pub mod session;

// Re-export common types
pub use config::Config;
pub use error::{Error, Result};
pub use graph::{EntityRecognizer, KnowledgeGraph, Triple};
pub use integrations::{OllamaClient, OpenAIClient};
pub use pdf::{PageText, PdfSource};
pub use pipeline::Models;
pub use prompts::{load_prompt, Prompt};
pub use rag::{Answer, Chunk, Chunker, Embedder, Generator, VectorIndex, NOT_FOUND_ANSWER};
pub use session::{on_question, on_upload, SessionState};

// Commands module uses re-exported types, so it must be declared after the re-exports
pub mod commands;
