//! Public chunking facade.
//!
//! A [`TextChunker`] is configured once at construction and then behaves as
//! a pure function of its inputs: no I/O, no global state, safe to share
//! across threads. The only caller-visible failures are configuration
//! errors raised by [`TextChunker::new`].

use serde_json::json;

use splinter_core::{Chunk, ChunkError, ChunkMethod, ChunkingConfig, Metadata, Page};

use crate::boundary::{is_title_line, split_paragraphs, split_sentences};
use crate::identity;
use crate::pages;
use crate::splitter::{LengthMeasure, SizeBoundedSplitter};
use crate::strategy;

/// The chunking engine.
#[derive(Debug, Clone)]
pub struct TextChunker {
    config: ChunkingConfig,
}

impl TextChunker {
    /// Create a chunker. Fails on an unknown method name (callers parsing
    /// method strings hit this through `ChunkMethod::from_str`) or an
    /// overlap that is not smaller than the chunk size.
    pub fn new(config: ChunkingConfig) -> Result<Self, ChunkError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Chunk plain text into an ordered list of chunk records. Blank input
    /// yields an empty list; non-empty input always yields at least one
    /// chunk. `extra` metadata is layered onto every chunk (reserved keys
    /// excepted).
    pub fn chunk_text(&self, text: &str, document_id: &str, extra: Option<&Metadata>) -> Vec<Chunk> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        if self.config.method == ChunkMethod::Document {
            return self.chunk_structured_text(text, document_id, extra);
        }
        self.split(text)
            .into_iter()
            .enumerate()
            .map(|(i, segment)| identity::build_chunk(segment, document_id, i, &self.config, extra))
            .collect()
    }

    /// Chunk an ordered page list. With `preserve_pages` every chunk stays
    /// within one page and carries its `page_number`; otherwise pages are
    /// concatenated and each chunk carries the `page_numbers` its span
    /// covers.
    pub fn chunk_pages(&self, pages: &[Page], document_id: &str, preserve_pages: bool) -> Vec<Chunk> {
        if preserve_pages {
            pages::chunk_pages_preserved(pages, document_id, &self.config, |t| self.split(t))
        } else {
            pages::chunk_pages_combined(pages, document_id, &self.config, |t| self.split(t))
        }
    }

    /// Document-structure-preserving flow: pages are processed in order;
    /// a page larger than `chunk_size * 4` characters is split into
    /// paragraph-bounded sub-chunks by a greedy accumulator, smaller pages
    /// pass through whole. Title-like paragraphs become `section` hints on
    /// the chunks that follow them within the page.
    pub fn chunk_document(&self, pages: &[Page], document_id: &str) -> Vec<Chunk> {
        let mut all = Vec::new();
        for page in pages {
            let mut extra = page.metadata.clone();
            extra.insert("page_number".into(), json!(page.page_number));

            let mut page_chunks = Vec::new();
            for (i, (section, segment)) in self.structure_segments(&page.text).into_iter().enumerate() {
                let mut chunk_extra = extra.clone();
                if let Some(section) = section {
                    chunk_extra.insert("section".into(), json!(section));
                }
                page_chunks.push(identity::build_chunk(
                    segment,
                    document_id,
                    i,
                    &self.config,
                    Some(&chunk_extra),
                ));
            }
            all.append(&mut page_chunks);
        }
        identity::reindex(&mut all);
        all
    }

    // ── Method dispatch ─────────────────────────────────────────────────

    /// Split one text unit according to the configured method. Blank input
    /// yields no segments.
    fn split(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        match self.config.method {
            ChunkMethod::Token => self.size_splitter(LengthMeasure::TokenEstimate).split(text),
            ChunkMethod::Character => self.size_splitter(LengthMeasure::Characters).split(text),
            ChunkMethod::Sentence => self
                .size_splitter(LengthMeasure::Characters)
                .group_units(&split_sentences(text), " "),
            ChunkMethod::Semantic => self.group_paragraphs(text),
            ChunkMethod::Document => self
                .structure_segments(text)
                .into_iter()
                .map(|(_, segment)| segment)
                .collect(),
            ChunkMethod::Hybrid => {
                if strategy::looks_structured(text) {
                    tracing::debug!("hybrid routing: structured, grouping paragraphs");
                    self.group_paragraphs(text)
                } else {
                    tracing::debug!("hybrid routing: unstructured, token splitting");
                    self.size_splitter(LengthMeasure::TokenEstimate).split(text)
                }
            }
        }
    }

    fn size_splitter(&self, measure: LengthMeasure) -> SizeBoundedSplitter {
        SizeBoundedSplitter::new(self.config.chunk_size, self.config.chunk_overlap, measure)
    }

    /// Paragraph grouping: accumulate whole paragraphs up to the token
    /// budget. A paragraph exceeding the budget on its own becomes one
    /// oversized chunk.
    fn group_paragraphs(&self, text: &str) -> Vec<String> {
        let paragraphs = split_paragraphs(text);
        self.size_splitter(LengthMeasure::TokenEstimate)
            .group_units(&paragraphs, "\n\n")
    }

    /// Structure-preserving segmentation of one page's text, yielding
    /// `(section hint, segment)` pairs.
    fn structure_segments(&self, text: &str) -> Vec<(Option<String>, String)> {
        let budget = self.config.chunk_size * 4;
        let paragraphs = split_paragraphs(text);
        if paragraphs.is_empty() {
            return Vec::new();
        }

        // Small pages pass through whole.
        if text.chars().count() <= budget {
            let section = paragraphs
                .first()
                .filter(|p| is_section_heading(p))
                .cloned();
            return vec![(section, text.trim().to_string())];
        }

        let mut segments = Vec::new();
        let mut active_section: Option<String> = None;
        let mut buffer = String::new();
        let mut buffer_section: Option<String> = None;

        for paragraph in paragraphs {
            if is_section_heading(&paragraph) {
                active_section = Some(paragraph.clone());
            }
            let would_be = if buffer.is_empty() {
                paragraph.chars().count()
            } else {
                buffer.chars().count() + 2 + paragraph.chars().count()
            };
            if would_be > budget && !buffer.is_empty() {
                segments.push((buffer_section.take(), std::mem::take(&mut buffer)));
            }
            if buffer.is_empty() {
                buffer_section = active_section.clone();
                buffer = paragraph;
            } else {
                buffer.push_str("\n\n");
                buffer.push_str(&paragraph);
            }
        }
        if !buffer.is_empty() {
            segments.push((buffer_section, buffer));
        }
        segments
    }

    /// `chunk_text` for the document method: same structure-preserving
    /// segmentation, with section hints merged under caller extras.
    fn chunk_structured_text(
        &self,
        text: &str,
        document_id: &str,
        extra: Option<&Metadata>,
    ) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        for (i, (section, segment)) in self.structure_segments(text).into_iter().enumerate() {
            let mut merged = Metadata::new();
            if let Some(section) = section {
                merged.insert("section".into(), json!(section));
            }
            if let Some(extra) = extra {
                for (key, value) in extra {
                    merged.insert(key.clone(), value.clone());
                }
            }
            chunks.push(identity::build_chunk(
                segment,
                document_id,
                i,
                &self.config,
                Some(&merged),
            ));
        }
        chunks
    }
}

/// A paragraph acting as a section heading: a single title-like line.
fn is_section_heading(paragraph: &str) -> bool {
    !paragraph.contains('\n') && is_title_line(paragraph)
}
