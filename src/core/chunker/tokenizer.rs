//! Tokenizer capability interface and implementations.
//!
//! The chunker only needs two operations -- turn text into token ids
//! and turn a token slice back into text -- so they live behind a
//! trait and alternate tokenizers can be swapped in without changing
//! chunk-boundary semantics.

use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use crate::core::error::{DocQaError, Result};

/// Capability interface for the chunker's tokenizer.
///
/// Implementations must be deterministic: the same text always
/// produces the same token sequence, and detokenizing any prefix of
/// that sequence always produces the same string.
pub trait TextTokenizer: Send + Sync {
    /// Encode text into an ordered sequence of token ids
    fn tokenize(&self, text: &str) -> Result<Vec<u32>>;

    /// Decode a token sequence back into text
    fn detokenize(&self, tokens: &[u32]) -> Result<String>;
}

/// Whitespace word-level tokenizer with an interned vocabulary.
///
/// Words are assigned ids in first-seen order and kept in a two-way
/// table, so any prefix of a tokenized text detokenizes back to the
/// space-joined words. Runs of whitespace collapse to a single space
/// on the way back, which is the lossy-at-whitespace round trip the
/// chunker tolerates.
#[derive(Debug, Default)]
pub struct WordTokenizer {
    vocab: RwLock<WordVocab>,
}

#[derive(Debug, Default)]
struct WordVocab {
    ids: HashMap<String, u32>,
    words: Vec<String>,
}

impl WordTokenizer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TextTokenizer for WordTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<u32>> {
        let mut vocab = self
            .vocab
            .write()
            .map_err(|_| DocQaError::Tokenizer("vocabulary lock poisoned".to_string()))?;

        let mut tokens = Vec::new();
        for word in text.split_whitespace() {
            let id = match vocab.ids.get(word) {
                Some(&id) => id,
                None => {
                    let id = vocab.words.len() as u32;
                    vocab.ids.insert(word.to_string(), id);
                    vocab.words.push(word.to_string());
                    id
                }
            };
            tokens.push(id);
        }
        Ok(tokens)
    }

    fn detokenize(&self, tokens: &[u32]) -> Result<String> {
        let vocab = self
            .vocab
            .read()
            .map_err(|_| DocQaError::Tokenizer("vocabulary lock poisoned".to_string()))?;

        let mut words = Vec::with_capacity(tokens.len());
        for &id in tokens {
            let word = vocab
                .words
                .get(id as usize)
                .ok_or_else(|| DocQaError::Tokenizer(format!("unknown token id {id}")))?;
            words.push(word.as_str());
        }
        Ok(words.join(" "))
    }
}

/// Sub-word tokenizer backed by a HuggingFace `tokenizer.json` file.
pub struct SubwordTokenizer {
    inner: tokenizers::Tokenizer,
}

impl SubwordTokenizer {
    /// Load a tokenizer definition from disk
    pub fn from_file(path: &Path) -> Result<Self> {
        let inner = tokenizers::Tokenizer::from_file(path).map_err(|e| {
            DocQaError::Tokenizer(format!(
                "failed to load tokenizer from {}: {e}",
                path.display()
            ))
        })?;
        Ok(Self { inner })
    }
}

impl TextTokenizer for SubwordTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<u32>> {
        let encoding = self
            .inner
            .encode(text, false)
            .map_err(|e| DocQaError::Tokenizer(e.to_string()))?;
        Ok(encoding.get_ids().to_vec())
    }

    fn detokenize(&self, tokens: &[u32]) -> Result<String> {
        self.inner
            .decode(tokens, true)
            .map_err(|e| DocQaError::Tokenizer(e.to_string()))
    }
}
