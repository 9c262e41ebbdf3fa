// PDF extraction tests over generated documents

use docqa::core::extract::extract_pdf_text;

use crate::common::fixtures::pdf_with_pages;

#[test]
fn test_extracts_text_and_page_count() {
    let pdf = pdf_with_pages(&["alpha bravo charlie", "delta echo foxtrot"]);
    let extracted = extract_pdf_text(&pdf).unwrap();

    assert_eq!(extracted.pages, 2);
    assert!(extracted.text.contains("alpha bravo charlie"));
    assert!(extracted.text.contains("delta echo foxtrot"));
}

#[test]
fn test_page_spans_are_disjoint_and_increasing() {
    let pdf = pdf_with_pages(&["first page here", "second page here", "third page here"]);
    let extracted = extract_pdf_text(&pdf).unwrap();

    assert_eq!(extracted.page_spans.len(), 3);
    for span in &extracted.page_spans {
        assert!(span.start_char < span.end_char);
    }
    for pair in extracted.page_spans.windows(2) {
        assert!(pair[0].end_char < pair[1].start_char);
        assert!(pair[0].page_num < pair[1].page_num);
    }
}

#[test]
fn test_spans_index_into_the_text() {
    let pdf = pdf_with_pages(&["one two", "three four"]);
    let extracted = extract_pdf_text(&pdf).unwrap();

    let chars: Vec<char> = extracted.text.chars().collect();
    for span in &extracted.page_spans {
        assert!(span.end_char <= chars.len());
        let page_text: String = chars[span.start_char..span.end_char].iter().collect();
        assert!(
            !page_text.trim().is_empty(),
            "span {span:?} points at empty text"
        );
    }
}

#[test]
fn test_single_page_document() {
    let pdf = pdf_with_pages(&["only page"]);
    let extracted = extract_pdf_text(&pdf).unwrap();

    assert_eq!(extracted.pages, 1);
    assert_eq!(extracted.page_spans.len(), 1);
    assert_eq!(extracted.page_spans[0].page_num, 1);
    assert_eq!(extracted.page_spans[0].start_char, 0);
}
