//! Document handling for DocChat: text extraction, chunking, and
//! lexical retrieval over the chunks of a single uploaded document.

pub mod chunker;
pub mod extract;
pub mod retriever;

pub use chunker::{chunk_text, split_sentences, Chunker, DEFAULT_MAX_CHARS};
pub use extract::{extract_text, DocumentKind, Upload};
pub use retriever::{score_chunks, search, tokenize, ScoredChunk, DEFAULT_TOP_K};

/// The ordered chunks of one uploaded document.
///
/// Replaced wholesale when a new document is uploaded; never edited in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkSet {
    source: Option<String>,
    chunks: Vec<String>,
}

impl ChunkSet {
    pub fn new(source: impl Into<String>, chunks: Vec<String>) -> Self {
        Self {
            source: Some(source.into()),
            chunks,
        }
    }

    /// Name of the document the chunks came from.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn chunks(&self) -> &[String] {
        &self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Up to `top_k` chunks relevant to `query`.
    pub fn search(&self, query: &str, top_k: usize) -> Vec<String> {
        retriever::search(query, &self.chunks, top_k)
    }
}
