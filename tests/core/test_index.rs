// Document index lifecycle tests across store instances, plus the
// end-to-end chunk-embed-search scenario.

use std::sync::Arc;

use docqa::core::chunker::{Chunker, WordTokenizer};
use docqa::core::index::DocumentStore;
use docqa::core::types::{DocumentInfo, PageSpan};

fn store_at(dir: &tempfile::TempDir) -> DocumentStore {
    DocumentStore::new(dir.path().to_path_buf())
}

#[test]
fn test_end_to_end_chunk_embed_search() {
    // Single-page document forced into two chunks; each chunk gets a
    // distinct unit vector; querying with chunk 1's vector returns
    // chunk 1 with score ~1.0 and its page attribution.
    let text = "AAAA BBBB CCCC DDDD";
    let spans = vec![PageSpan {
        start_char: 0,
        end_char: 19,
        page_num: 1,
    }];

    let chunker = Chunker::new(Arc::new(WordTokenizer::new()), 2);
    let chunks = chunker.chunk(text, &spans).unwrap();
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].text, "AAAA BBBB");
    assert_eq!(chunks[1].text, "CCCC DDDD");

    let (texts, metadata): (Vec<String>, Vec<_>) =
        chunks.into_iter().map(|c| (c.text, c.metadata)).unzip();
    let embeddings = vec![vec![1.0, 0.0], vec![0.0, 1.0]];

    let dir = tempfile::tempdir().unwrap();
    let store = store_at(&dir);
    store
        .add("doc", texts, embeddings, Some(metadata), None)
        .unwrap();

    let hits = store.search("doc", &[1.0, 0.0], 1).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].text, "AAAA BBBB");
    assert!((hits[0].score - 1.0).abs() < 1e-5);
    assert_eq!(hits[0].page_numbers, vec![1]);
}

#[test]
fn test_state_survives_store_reconstruction() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store = store_at(&dir);
        store
            .add(
                "doc",
                vec!["persisted".to_string()],
                vec![vec![0.0, 1.0]],
                None,
                Some(DocumentInfo {
                    filename: Some("kept.pdf".to_string()),
                    upload_date: None,
                    pages: Some(4),
                }),
            )
            .unwrap();
    }

    // A fresh store over the same directory sees the same state
    let store = store_at(&dir);
    let hits = store.search("doc", &[0.0, 1.0], 3).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].text, "persisted");

    let summary = store.document("doc").unwrap();
    assert_eq!(summary.filename, "kept.pdf");
    assert_eq!(summary.pages, 4);
}

#[test]
fn test_stored_vectors_are_unit_norm_after_reload() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store = store_at(&dir);
        store
            .add(
                "doc",
                vec!["a".to_string(), "b".to_string()],
                vec![vec![10.0, 0.0, 0.0], vec![3.0, 4.0, 0.0]],
                None,
                None,
            )
            .unwrap();
    }

    let store = store_at(&dir);
    let view = store.open("doc").unwrap();
    let index = view.index.as_ref().unwrap();
    assert_eq!(index.len(), 2);

    for i in 0..index.len() {
        let norm = index
            .vector(i)
            .unwrap()
            .iter()
            .map(|x| x * x)
            .sum::<f32>()
            .sqrt();
        assert!((norm - 1.0).abs() < 1e-5, "vector {i} has norm {norm}");
    }
}

#[test]
fn test_growth_across_adds_and_instances() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store = store_at(&dir);
        store
            .add(
                "doc",
                vec!["one".to_string(), "two".to_string()],
                vec![vec![1.0, 0.0], vec![0.0, 1.0]],
                None,
                None,
            )
            .unwrap();
    }
    {
        let store = store_at(&dir);
        store
            .add(
                "doc",
                vec!["three".to_string()],
                vec![vec![1.0, 1.0]],
                None,
                None,
            )
            .unwrap();
    }

    let store = store_at(&dir);
    let meta = store.metadata("doc").unwrap();
    assert_eq!(meta.chunks.len(), 3);
    assert_eq!(meta.chunk_metadata.len(), 3);

    // Chunks from both adds are retrievable
    let hits = store.search("doc", &[1.0, 1.0], 10).unwrap();
    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0].text, "three");
}

#[test]
fn test_delete_then_reindex_is_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_at(&dir);

    store
        .add(
            "doc",
            vec!["old".to_string()],
            vec![vec![1.0, 0.0]],
            None,
            None,
        )
        .unwrap();
    store.delete("doc").unwrap();

    assert!(store.search("doc", &[1.0, 0.0], 1).is_err());
    assert!(store.list().unwrap().is_empty());

    // Re-adding under the same id starts from scratch
    store
        .add(
            "doc",
            vec!["new".to_string()],
            vec![vec![0.0, 1.0]],
            None,
            None,
        )
        .unwrap();
    let meta = store.metadata("doc").unwrap();
    assert_eq!(meta.chunks, vec!["new"]);
}

#[test]
fn test_documents_are_isolated() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_at(&dir);

    store
        .add(
            "doc-a",
            vec!["from a".to_string()],
            vec![vec![1.0, 0.0]],
            None,
            None,
        )
        .unwrap();
    store
        .add(
            "doc-b",
            vec!["from b".to_string()],
            vec![vec![1.0, 0.0]],
            None,
            None,
        )
        .unwrap();

    store.delete("doc-a").unwrap();

    assert!(store.search("doc-a", &[1.0, 0.0], 1).is_err());
    let hits = store.search("doc-b", &[1.0, 0.0], 1).unwrap();
    assert_eq!(hits[0].text, "from b");
}
