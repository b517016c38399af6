//! Chunk identity and metadata assembly.
//!
//! Chunk ids are content-addressed: `chunk_{document_id}_{index:04}_{hash16}`
//! where `hash16` is the first 16 hex chars of the SHA-256 digest of the
//! chunk text. Equal text at the same index always yields an equal id.

use serde_json::json;
use sha2::{Digest, Sha256};

use splinter_core::{Chunk, ChunkingConfig, Metadata};

/// Metadata keys that always hold the computed values, even when caller
/// extras collide.
const RESERVED_KEYS: &[&str] = &["document_id", "chunk_index"];

/// Deterministic chunk id for `text` at `index` within `document_id`.
pub fn chunk_id(document_id: &str, index: usize, text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    let hash = format!("{digest:x}");
    format!("chunk_{document_id}_{index:04}_{}", &hash[..16])
}

/// Build a chunk record. Computed metadata fields are set first; caller
/// extras are layered on top and win on collision for non-reserved keys.
pub fn build_chunk(
    text: String,
    document_id: &str,
    index: usize,
    config: &ChunkingConfig,
    extra: Option<&Metadata>,
) -> Chunk {
    let mut metadata = Metadata::new();
    metadata.insert("document_id".into(), json!(document_id));
    metadata.insert("chunk_index".into(), json!(index));
    metadata.insert("chunking_method".into(), json!(config.method.to_string()));
    metadata.insert("chunk_size".into(), json!(config.chunk_size));
    metadata.insert("chunk_overlap".into(), json!(config.chunk_overlap));

    if let Some(extra) = extra {
        for (key, value) in extra {
            if !RESERVED_KEYS.contains(&key.as_str()) {
                metadata.insert(key.clone(), value.clone());
            }
        }
    }

    let char_count = text.chars().count();
    Chunk {
        chunk_id: chunk_id(document_id, index, &text),
        document_id: document_id.to_string(),
        chunk_index: index,
        text,
        metadata,
        token_count: char_count / 4,
        char_count,
    }
}

/// Rewrite indices to a contiguous `0..len` sequence and regenerate ids and
/// reserved metadata. Used after chunk lists from multiple passes (e.g. one
/// per page) are concatenated.
pub fn reindex(chunks: &mut [Chunk]) {
    for (index, chunk) in chunks.iter_mut().enumerate() {
        chunk.chunk_index = index;
        chunk.chunk_id = chunk_id(&chunk.document_id, index, &chunk.text);
        chunk.metadata.insert("chunk_index".into(), json!(index));
    }
}
