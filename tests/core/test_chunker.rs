// Chunker tests exercising the sub-word tokenizer path and the
// page-attribution contract.

use std::sync::Arc;

use docqa::core::chunker::{Chunker, SubwordTokenizer, TextTokenizer, WordTokenizer};
use docqa::core::types::PageSpan;

use crate::common::fixtures::wordpiece_tokenizer_file;

fn subword_tokenizer(vocab: &[&str]) -> (SubwordTokenizer, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let path = wordpiece_tokenizer_file(dir.path(), vocab);
    (SubwordTokenizer::from_file(&path).unwrap(), dir)
}

#[test]
fn test_subword_round_trip() {
    let (tokenizer, _dir) = subword_tokenizer(&["AA", "##AA", "BBBB", "CCCC", "DDDD"]);

    let tokens = tokenizer.tokenize("AAAA BBBB CCCC DDDD").unwrap();
    // "AAAA" splits into two pieces, the rest are whole words
    assert_eq!(tokens.len(), 5);
    assert_eq!(
        tokenizer.detokenize(&tokens).unwrap(),
        "AAAA BBBB CCCC DDDD"
    );
}

#[test]
fn test_subword_chunk_windows_and_offsets() {
    let (tokenizer, _dir) = subword_tokenizer(&["AA", "##AA", "BBBB", "CCCC", "DDDD"]);
    let chunker = Chunker::new(Arc::new(tokenizer), 2);

    let chunks = chunker.chunk("AAAA BBBB CCCC DDDD", &[]).unwrap();
    // 5 tokens in windows of 2 -> 3 chunks, last one short
    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].text, "AAAA");
    assert_eq!(chunks[1].text, "BBBB CCCC");
    assert_eq!(chunks[2].text, "DDDD");

    assert_eq!(chunks[0].metadata.start_char, 0);
    assert_eq!(chunks[0].metadata.end_char, 4);
    assert_eq!(chunks[1].metadata.start_char, 4);
    assert_eq!(chunks[1].metadata.end_char, 14);
    assert_eq!(chunks[2].metadata.start_char, 14);
    assert_eq!(chunks[2].metadata.end_char, 19);
}

#[test]
fn test_window_boundary_inside_a_word() {
    // With a window of one token, the boundary falls inside "AAAA":
    // offsets must come from detokenized prefixes, which differ from
    // the chunk texts themselves.
    let (tokenizer, _dir) = subword_tokenizer(&["AA", "##AA"]);
    let chunker = Chunker::new(Arc::new(tokenizer), 1);

    let chunks = chunker.chunk("AAAA", &[]).unwrap();
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].metadata.start_char, 0);
    assert_eq!(chunks[0].metadata.end_char, 2);
    assert_eq!(chunks[1].metadata.start_char, 2);
    assert_eq!(chunks[1].metadata.end_char, 4);
}

#[test]
fn test_chunk_coverage_matches_tokenizer_round_trip() {
    let (tokenizer, _dir) = subword_tokenizer(&["AA", "##AA", "BBBB", "CCCC", "DDDD"]);
    let tokenizer = Arc::new(tokenizer);
    let chunker = Chunker::new(Arc::clone(&tokenizer) as Arc<dyn TextTokenizer>, 2);

    let text = "AAAA BBBB CCCC DDDD";
    let chunks = chunker.chunk(text, &[]).unwrap();

    let joined = chunks
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let tokens = tokenizer.tokenize(text).unwrap();
    assert_eq!(joined, tokenizer.detokenize(&tokens).unwrap());
}

#[test]
fn test_unknown_words_map_to_unk() {
    let (tokenizer, _dir) = subword_tokenizer(&["known"]);
    let tokens = tokenizer.tokenize("known stranger").unwrap();
    assert_eq!(tokens.len(), 2);
    // The unknown word maps to [UNK] (id 0) and is skipped on decode
    assert_eq!(tokens[1], 0);
    assert_eq!(tokenizer.detokenize(&tokens).unwrap(), "known");
}

#[test]
fn test_page_attribution_straddling_chunk() {
    // Pages [0,50] and [51,120]; a chunk spanning [40,60] must be
    // attributed to both.
    let spans = vec![
        PageSpan {
            start_char: 0,
            end_char: 50,
            page_num: 1,
        },
        PageSpan {
            start_char: 51,
            end_char: 120,
            page_num: 2,
        },
    ];

    let word = "x".repeat(40);
    let tail = "y".repeat(19);
    let text = format!("{word} {tail}");

    let chunker = Chunker::new(Arc::new(WordTokenizer::new()), 1);
    let chunks = chunker.chunk(&text, &spans).unwrap();
    assert_eq!(chunks.len(), 2);

    // First chunk [0,40] sits inside page 1
    assert_eq!(chunks[0].metadata.page_numbers, vec![1]);

    // Second chunk [40,60] straddles the boundary
    assert_eq!(chunks[1].metadata.start_char, 40);
    assert_eq!(chunks[1].metadata.end_char, 60);
    assert_eq!(chunks[1].metadata.page_numbers, vec![1, 2]);
}

#[test]
fn test_page_numbers_are_sorted_and_distinct() {
    // Page table handed over in reverse order must still come out
    // sorted per chunk
    let spans = vec![
        PageSpan {
            start_char: 6,
            end_char: 12,
            page_num: 2,
        },
        PageSpan {
            start_char: 0,
            end_char: 5,
            page_num: 1,
        },
    ];

    let chunker = Chunker::new(Arc::new(WordTokenizer::new()), 10);
    let chunks = chunker.chunk("hello brave world", &spans).unwrap();
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].metadata.page_numbers, vec![1, 2]);
}
