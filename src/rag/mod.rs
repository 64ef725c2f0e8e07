//! Retrieval-augmented question answering over uploaded documents.
//!
//! Pages are split into overlapping character windows, embedded with one
//! fixed sentence-embedding model and kept in an exact in-memory index. A
//! question is embedded with the same model, the nearest chunks become the
//! prompt context and a generation model answers from that context only.

pub mod answerer;
pub mod chunker;
pub mod embeddings;
pub mod index;

pub use answerer::{Answer, Answerer, Generator, NOT_FOUND_ANSWER};
pub use chunker::{Chunk, Chunker};
pub use embeddings::{Embedder, LocalEmbedder};
pub use index::{cosine_similarity, IndexedChunk, ScoredChunk, VectorIndex};
