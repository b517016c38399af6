//! Text chunking engine.
//!
//! Splits raw or page-structured document text into bounded, overlapping,
//! content-addressed chunks suitable for embedding and vector-index
//! storage. The boundary method is an enumerated tag: size-bounded token
//! or character splitting, sentence or paragraph grouping, a
//! page-structure-preserving flow, and a hybrid mode that routes on text
//! shape.

pub mod boundary;
pub mod engine;
pub mod identity;
pub mod pages;
pub mod splitter;
pub mod strategy;

pub use engine::TextChunker;
pub use splitter::{estimate_tokens, LengthMeasure, SizeBoundedSplitter};
