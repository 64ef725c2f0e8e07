use text_splitter::{ChunkConfig, TextSplitter};
use uuid::Uuid;

use crate::config::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
use crate::pdf::PageText;

/// Text chunk produced by the chunker.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Unique chunk id
    pub id: Uuid,
    /// Raw text of the chunk
    pub text: String,
    /// Byte offset of the chunk inside its source text
    pub start: usize,
    /// Byte offset after the last character
    pub end: usize,
    /// Opaque source label (file and page)
    pub source: String,
}

impl Chunk {
    pub fn new(text: String, start: usize, end: usize, source: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            start,
            end,
            source: source.into(),
        }
    }
}

/// Character-window chunker with overlap.
///
/// Splitting descends through semantic levels (line breaks, sentences,
/// words, graphemes) so windows break on the coarsest boundary that still
/// fits in `size` characters.
#[derive(Debug, Clone)]
pub struct Chunker {
    size: usize,
    overlap: usize,
}

impl Default for Chunker {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP)
    }
}

impl Chunker {
    /// Create a new chunker. Overlap is clamped below size.
    pub fn new(size: usize, overlap: usize) -> Self {
        let size = size.max(1);
        Self {
            size,
            overlap: overlap.min(size - 1),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Split text into overlapping chunks. Blank text yields no chunks.
    pub fn chunk(&self, text: &str, source: impl Into<String>) -> Vec<Chunk> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let config = ChunkConfig::new(self.size)
            .with_overlap(self.overlap)
            .unwrap_or_else(|_| ChunkConfig::new(self.size));
        let splitter = TextSplitter::new(config);

        let source = source.into();
        splitter
            .chunk_indices(text)
            .map(|(start, piece)| {
                Chunk::new(piece.to_string(), start, start + piece.len(), source.clone())
            })
            .collect()
    }

    /// Chunk every page; chunks never span two pages.
    pub fn chunk_all(&self, pages: &[PageText]) -> Vec<Chunk> {
        pages
            .iter()
            .flat_map(|page| self.chunk(&page.text, page.label()))
            .collect()
    }
}
