use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChunkError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_usize(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Chunking method ───────────────────────────────────────────

/// How chunk boundaries are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkMethod {
    /// Size-bounded splitting measured in estimated tokens.
    Token,
    /// Size-bounded splitting measured in characters.
    Character,
    /// Greedy sentence accumulation.
    Sentence,
    /// Paragraph grouping.
    Semantic,
    /// Page/paragraph structure preserving.
    Document,
    /// Auto-routes between paragraph grouping and token splitting
    /// depending on input shape.
    Hybrid,
}

impl fmt::Display for ChunkMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkMethod::Token => write!(f, "token"),
            ChunkMethod::Character => write!(f, "character"),
            ChunkMethod::Sentence => write!(f, "sentence"),
            ChunkMethod::Semantic => write!(f, "semantic"),
            ChunkMethod::Document => write!(f, "document"),
            ChunkMethod::Hybrid => write!(f, "hybrid"),
        }
    }
}

impl FromStr for ChunkMethod {
    type Err = ChunkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "token" => Ok(ChunkMethod::Token),
            "character" => Ok(ChunkMethod::Character),
            "sentence" => Ok(ChunkMethod::Sentence),
            "semantic" => Ok(ChunkMethod::Semantic),
            "document" => Ok(ChunkMethod::Document),
            "hybrid" | "auto" => Ok(ChunkMethod::Hybrid),
            other => Err(ChunkError::UnknownMethod(other.to_string())),
        }
    }
}

// ── Chunking config ───────────────────────────────────────────

/// Configuration for the chunking engine. Read-only after construction;
/// validated when handed to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target measured-unit budget per chunk (default: 512).
    pub chunk_size: usize,
    /// Measured units shared between consecutive chunks, must be smaller
    /// than `chunk_size` (default: 50).
    pub chunk_overlap: usize,
    /// Boundary selection method (default: token).
    pub method: ChunkMethod,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 512,
            chunk_overlap: 50,
            method: ChunkMethod::Token,
        }
    }
}

impl ChunkingConfig {
    /// Default sizes with an explicit method.
    pub fn with_method(method: ChunkMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Build config from environment variables (call `load_dotenv()` first).
    /// Keys: `CHUNK_SIZE`, `CHUNK_OVERLAP`, `CHUNK_METHOD`.
    pub fn from_env() -> Result<Self, ChunkError> {
        let config = Self {
            chunk_size: env_usize("CHUNK_SIZE", 512),
            chunk_overlap: env_usize("CHUNK_OVERLAP", 50),
            method: env_or("CHUNK_METHOD", "token").parse()?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Enforce `chunk_overlap < chunk_size`.
    pub fn validate(&self) -> Result<(), ChunkError> {
        if self.chunk_overlap >= self.chunk_size {
            return Err(ChunkError::InvalidOverlap {
                overlap: self.chunk_overlap,
                size: self.chunk_size,
            });
        }
        Ok(())
    }
}
