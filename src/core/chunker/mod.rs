//! Token-bounded document chunking with page attribution.
//!
//! Splits document text into consecutive windows of at most
//! `max_tokens` tokens and recovers the character offsets of each
//! window by detokenizing prefixes of the token stream. Offsets
//! cannot be derived by summing chunk lengths: a window boundary may
//! fall inside a sub-word token, so the detokenized prefix can
//! differ in length from the concatenation of earlier chunks.
//!
//! Page attribution intersects each chunk's character range with the
//! page-offset table produced at extraction time.

pub mod tokenizer;

use std::sync::Arc;

use crate::core::error::Result;
use crate::core::types::{Chunk, ChunkMetadata, PageSpan};

pub use tokenizer::{SubwordTokenizer, TextTokenizer, WordTokenizer};

/// Token-window chunker.
///
/// Pure function of its inputs: identical text, tokenizer, window
/// size, and page table always produce identical chunks.
#[derive(Clone)]
pub struct Chunker {
    tokenizer: Arc<dyn TextTokenizer>,
    max_tokens: usize,
}

impl Chunker {
    /// Create a new chunker.
    ///
    /// # Panics
    ///
    /// Panics if `max_tokens` is 0.
    pub fn new(tokenizer: Arc<dyn TextTokenizer>, max_tokens: usize) -> Self {
        assert!(max_tokens > 0, "max_tokens must be > 0");

        Self {
            tokenizer,
            max_tokens,
        }
    }

    /// Get the window size in tokens.
    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// Split text into token windows with page attribution.
    ///
    /// Produces chunks in left-to-right, non-overlapping, contiguous
    /// order over the token stream; the final chunk may be shorter
    /// than `max_tokens`. Empty input produces no chunks.
    pub fn chunk(&self, text: &str, page_spans: &[PageSpan]) -> Result<Vec<Chunk>> {
        let tokens = self.tokenizer.tokenize(text)?;
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        let mut chunks = Vec::new();
        let mut start = 0;

        while start < tokens.len() {
            let end = (start + self.max_tokens).min(tokens.len());
            let chunk_text = self.tokenizer.detokenize(&tokens[start..end])?;

            // Character offsets come from detokenized prefixes, not
            // from accumulating chunk lengths
            let start_char = self.tokenizer.detokenize(&tokens[..start])?.chars().count();
            let end_char = self.tokenizer.detokenize(&tokens[..end])?.chars().count();

            let mut page_numbers: Vec<u32> = page_spans
                .iter()
                .filter(|page| start_char <= page.end_char && end_char >= page.start_char)
                .map(|page| page.page_num)
                .collect();
            page_numbers.sort_unstable();
            page_numbers.dedup();

            chunks.push(Chunk {
                text: chunk_text,
                metadata: ChunkMetadata {
                    page_numbers,
                    start_char,
                    end_char,
                },
            });

            start = end;
        }

        Ok(chunks)
    }
}
