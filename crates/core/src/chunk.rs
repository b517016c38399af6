use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Free-form metadata: string keys mapped to arbitrary JSON values.
pub type Metadata = HashMap<String, serde_json::Value>;

/// A bounded segment of document text plus identity and metadata — the unit
/// handed to the embedding/indexing stage.
///
/// Chunks are created fresh on every chunking call and not mutated after
/// return, except for the internal re-indexing step in page-combination
/// flows (which rewrites `chunk_index` and regenerates `chunk_id` before
/// handing the list back).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Content-addressed id: `chunk_{document_id}_{index:04}_{hash16}`.
    /// Unique within a document for one chunking run; not stable across
    /// re-chunking with different parameters.
    pub chunk_id: String,
    /// Opaque identifier of the parent document, supplied by the caller.
    pub document_id: String,
    /// 0-based position among chunks produced by the same call.
    pub chunk_index: usize,
    /// The chunk content, never empty.
    pub text: String,
    /// Required computed fields (document id, index, method, size/overlap
    /// parameters) plus page linkage, section hints, and caller extras.
    pub metadata: Metadata,
    /// Approximate token length (`char_count / 4` under the default
    /// estimator).
    pub token_count: usize,
    /// Exact character length of `text`.
    pub char_count: usize,
}

/// A page of pre-parsed document text. Pages are read-only inputs; the
/// chunker never mutates them. Parsing raw file formats into pages belongs
/// to the upstream document-parser collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// 1-based page number.
    pub page_number: usize,
    /// The page text content.
    pub text: String,
    /// Page-level metadata, carried onto chunks in preserve-pages mode.
    pub metadata: Metadata,
}

impl Page {
    pub fn new(page_number: usize, text: impl Into<String>) -> Self {
        Self {
            page_number,
            text: text.into(),
            metadata: Metadata::new(),
        }
    }
}
