use thiserror::Error;

/// Configuration errors — the only failures a caller ever sees. They are
/// raised at construction time; per-call splitting failures are absorbed
/// internally and never surface.
#[derive(Debug, Error)]
pub enum ChunkError {
    #[error("Unknown chunking method: {0}")]
    UnknownMethod(String),

    #[error("Chunk overlap {overlap} must be smaller than chunk size {size}")]
    InvalidOverlap { overlap: usize, size: usize },
}
