pub mod chunk;
pub mod config;
pub mod error;

pub use chunk::{Chunk, Metadata, Page};
pub use config::{load_dotenv, ChunkMethod, ChunkingConfig};
pub use error::ChunkError;
