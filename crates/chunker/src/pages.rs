//! Page-aware chunk assembly.
//!
//! Two modes: preserve-pages chunks each page independently and tags every
//! chunk with its source page; combined mode concatenates pages, chunks
//! once, and back-maps each chunk's character span to the pages it covers.

use serde_json::json;

use splinter_core::{Chunk, ChunkingConfig, Page};

use crate::identity;

/// Half-open character range within the combined string attributable to
/// one source page.
#[derive(Debug, Clone, Copy)]
struct PageSpan {
    page_number: usize,
    start: usize,
    end: usize,
}

/// Join page texts with the double-newline separator combined mode uses.
pub(crate) fn combined_text(pages: &[Page]) -> String {
    pages
        .iter()
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Chunk each page independently, tag chunks with the page's number and
/// metadata, concatenate in page order, then re-index globally and
/// regenerate ids.
pub(crate) fn chunk_pages_preserved<F>(
    pages: &[Page],
    document_id: &str,
    config: &ChunkingConfig,
    split: F,
) -> Vec<Chunk>
where
    F: Fn(&str) -> Vec<String>,
{
    let mut all = Vec::new();
    for page in pages {
        let mut extra = page.metadata.clone();
        extra.insert("page_number".into(), json!(page.page_number));

        let mut page_chunks = Vec::new();
        for (i, segment) in split(&page.text).into_iter().enumerate() {
            page_chunks.push(identity::build_chunk(
                segment,
                document_id,
                i,
                config,
                Some(&extra),
            ));
        }
        all.append(&mut page_chunks);
    }
    identity::reindex(&mut all);
    all
}

/// Join all pages, chunk the combined string once, then attribute each
/// chunk to the page intervals its span covers.
pub(crate) fn chunk_pages_combined<F>(
    pages: &[Page],
    document_id: &str,
    config: &ChunkingConfig,
    split: F,
) -> Vec<Chunk>
where
    F: Fn(&str) -> Vec<String>,
{
    let combined = combined_text(pages);
    let mut chunks = Vec::new();
    for (i, segment) in split(&combined).into_iter().enumerate() {
        chunks.push(identity::build_chunk(segment, document_id, i, config, None));
    }
    attach_page_numbers(&mut chunks, pages, &combined);
    chunks
}

/// Attach a non-empty `page_numbers` list to every chunk by locating the
/// first occurrence of the chunk's exact text in the combined string.
///
/// First-occurrence lookup is imprecise when the same chunk text appears
/// more than once in the combined string; the earliest match wins.
/// Downstream metadata consumers may rely on this exact behavior, so it is
/// kept as-is. A lookup miss (e.g. after separator normalization)
/// defaults the chunk to page 1.
fn attach_page_numbers(chunks: &mut [Chunk], pages: &[Page], combined: &str) {
    let spans = page_spans(pages);
    for chunk in chunks.iter_mut() {
        let mut numbers: Vec<usize> = match combined.find(&chunk.text) {
            Some(offset) => {
                let end = offset + chunk.text.len();
                spans
                    .iter()
                    .filter(|span| span.start < end && offset < span.end)
                    .map(|span| span.page_number)
                    .collect()
            }
            None => Vec::new(),
        };
        if numbers.is_empty() {
            tracing::debug!(
                chunk_id = %chunk.chunk_id,
                "page offset lookup missed, defaulting to page 1"
            );
            numbers = vec![1];
        }
        chunk.metadata.insert("page_numbers".into(), json!(numbers));
    }
}

/// Accumulate `page.text.len() + 2` per page (the 2 accounts for the
/// injected separator) into half-open byte intervals.
fn page_spans(pages: &[Page]) -> Vec<PageSpan> {
    let mut spans = Vec::with_capacity(pages.len());
    let mut cursor = 0usize;
    for page in pages {
        spans.push(PageSpan {
            page_number: page.page_number,
            start: cursor,
            end: cursor + page.text.len(),
        });
        cursor += page.text.len() + 2;
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use splinter_core::ChunkMethod;

    fn config() -> ChunkingConfig {
        ChunkingConfig::with_method(ChunkMethod::Character)
    }

    fn pages() -> Vec<Page> {
        vec![
            Page::new(1, "Page one text."),
            Page::new(2, "Page two text."),
        ]
    }

    fn whole(text: &str) -> Vec<String> {
        vec![text.to_string()]
    }

    #[test]
    fn preserved_mode_tags_each_page() {
        let chunks = chunk_pages_preserved(&pages(), "doc", &config(), |t| whole(t));
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].metadata["page_number"], json!(1));
        assert_eq!(chunks[1].metadata["page_number"], json!(2));
        // Globally re-indexed after concatenation.
        assert_eq!(chunks[0].chunk_index, 0);
        assert_eq!(chunks[1].chunk_index, 1);
        assert!(chunks[1].chunk_id.starts_with("chunk_doc_0001_"));
    }

    #[test]
    fn preserved_mode_carries_page_metadata() {
        let mut page = Page::new(3, "Some text.");
        page.metadata.insert("source".into(), json!("scan"));
        let chunks = chunk_pages_preserved(&[page], "doc", &config(), |t| whole(t));
        assert_eq!(chunks[0].metadata["source"], json!("scan"));
        assert_eq!(chunks[0].metadata["page_number"], json!(3));
    }

    #[test]
    fn combined_mode_attributes_spans_to_pages() {
        // One chunk per page text: each maps back to its own page.
        let chunks = chunk_pages_combined(&pages(), "doc", &config(), |t| {
            t.split("\n\n").map(str::to_string).collect()
        });
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].metadata["page_numbers"], json!([1]));
        assert_eq!(chunks[1].metadata["page_numbers"], json!([2]));
    }

    #[test]
    fn combined_mode_chunk_spanning_pages_lists_both() {
        let chunks = chunk_pages_combined(&pages(), "doc", &config(), |t| whole(t));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].metadata["page_numbers"], json!([1, 2]));
    }

    #[test]
    fn lookup_miss_defaults_to_page_one() {
        // A splitter that rewrites text defeats the offset lookup.
        let chunks = chunk_pages_combined(&pages(), "doc", &config(), |_| {
            vec!["normalized text not present".to_string()]
        });
        assert_eq!(chunks[0].metadata["page_numbers"], json!([1]));
    }

    #[test]
    fn empty_pages_produce_no_chunks() {
        let empty = vec![Page::new(1, "")];
        let chunks = chunk_pages_preserved(&empty, "doc", &config(), |t| {
            if t.trim().is_empty() { Vec::new() } else { whole(t) }
        });
        assert!(chunks.is_empty());
    }
}
