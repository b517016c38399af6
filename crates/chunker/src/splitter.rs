//! Size-bounded splitting with a configurable length measure.
//!
//! The primary algorithm is a recursive descent over a separator ladder
//! (paragraph break, line break, sentence boundary, plain space, hard
//! character cut) with best-effort overlap carried between consecutive
//! chunks. Any internal failure of the primary algorithm activates a
//! greedy sentence-accumulation fallback; the caller always receives a
//! valid chunk sequence for non-empty input.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::boundary::split_sentences;

/// Separator ladder for recursive subdivision, coarsest first. Level 2 is
/// the sentence scanner rather than a literal separator; past the ladder
/// the last resort is a hard character cut.
const LADDER_LEVELS: usize = 4;

/// Hard ceiling on subdivision depth.
const MAX_DEPTH: usize = 16;

/// Estimate token count with the fixed 4:1 chars-per-token approximation.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / 4
}

// ── Length measure ──────────────────────────────────────────────────────────

/// How chunk sizes are measured.
#[derive(Clone)]
pub enum LengthMeasure {
    /// Exact character count.
    Characters,
    /// `chars / 4` token approximation.
    TokenEstimate,
    /// Caller-injected measure, e.g. a real tokenizer.
    Custom(Arc<dyn Fn(&str) -> usize + Send + Sync>),
}

impl LengthMeasure {
    pub fn measure(&self, text: &str) -> usize {
        match self {
            LengthMeasure::Characters => text.chars().count(),
            LengthMeasure::TokenEstimate => estimate_tokens(text),
            LengthMeasure::Custom(f) => f(text),
        }
    }

    /// Approximate characters per measured unit, used to convert unit
    /// budgets into character budgets for overlap tails and hard cuts.
    fn unit_chars(&self) -> usize {
        match self {
            LengthMeasure::TokenEstimate => 4,
            _ => 1,
        }
    }
}

impl fmt::Debug for LengthMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LengthMeasure::Characters => write!(f, "Characters"),
            LengthMeasure::TokenEstimate => write!(f, "TokenEstimate"),
            LengthMeasure::Custom(_) => write!(f, "Custom"),
        }
    }
}

#[derive(Debug, Error)]
enum SplitFailure {
    #[error("separator recursion exceeded depth {0}")]
    DepthExceeded(usize),
}

// ── Splitter ────────────────────────────────────────────────────────────────

/// Splits text into pieces bounded by `chunk_size` measured units.
#[derive(Debug, Clone)]
pub struct SizeBoundedSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    measure: LengthMeasure,
}

impl SizeBoundedSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize, measure: LengthMeasure) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
            measure,
        }
    }

    /// Split arbitrary text. Never fails: if the primary recursive
    /// algorithm aborts, the sentence fallback takes over.
    pub fn split(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        match self.split_recursive(text, 0) {
            Ok(pieces) => pieces
                .into_iter()
                .filter(|piece| !piece.trim().is_empty())
                .collect(),
            Err(err) => {
                tracing::warn!("primary split failed ({err}), using sentence fallback");
                self.fallback_split(text)
            }
        }
    }

    /// Greedily accumulate pre-split units (paragraphs or sentences) up to
    /// the size budget, joining with `joiner`. A single unit larger than
    /// the budget becomes its own oversized chunk — never dropped or cut.
    pub fn group_units(&self, units: &[String], joiner: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();

        for unit in units {
            let candidate = if current.is_empty() {
                unit.clone()
            } else {
                format!("{current}{joiner}{unit}")
            };
            if self.measure.measure(&candidate) > self.chunk_size && !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current = unit.clone();
            } else {
                current = candidate;
            }
        }
        if !current.is_empty() {
            chunks.push(current);
        }
        chunks
    }

    fn split_recursive(&self, text: &str, depth: usize) -> Result<Vec<String>, SplitFailure> {
        if self.measure.measure(text) <= self.chunk_size {
            return Ok(vec![text.to_string()]);
        }
        if depth >= MAX_DEPTH {
            return Err(SplitFailure::DepthExceeded(MAX_DEPTH));
        }
        if depth >= LADDER_LEVELS {
            return Ok(self.hard_cut(text));
        }

        let (units, joiner) = split_level(text, depth);
        let mut accumulated: Vec<String> = Vec::new();
        let mut current = String::new();

        for unit in units {
            let candidate = if current.is_empty() {
                unit.clone()
            } else {
                format!("{current}{joiner}{unit}")
            };
            if self.measure.measure(&candidate) > self.chunk_size && !current.is_empty() {
                let tail = self.overlap_tail(&current);
                accumulated.push(std::mem::take(&mut current));
                current = if tail.is_empty() {
                    unit
                } else {
                    format!("{tail}{joiner}{unit}")
                };
            } else {
                current = candidate;
            }
        }
        if !current.is_empty() {
            accumulated.push(current);
        }

        // Pieces still over budget (a single oversized unit, or an overlap
        // tail that pushed one over) descend to the next ladder level.
        let mut pieces = Vec::new();
        for piece in accumulated {
            if self.measure.measure(&piece) > self.chunk_size {
                pieces.extend(self.split_recursive(&piece, depth + 1)?);
            } else {
                pieces.push(piece);
            }
        }
        Ok(pieces)
    }

    /// Trailing slice of `text` approximating `chunk_overlap` measured
    /// units, cut on a character boundary. Best-effort: unit boundaries
    /// rarely divide evenly.
    fn overlap_tail(&self, text: &str) -> String {
        if self.chunk_overlap == 0 {
            return String::new();
        }
        let budget = self.chunk_overlap * self.measure.unit_chars();
        let chars: Vec<char> = text.chars().collect();
        if chars.len() <= budget {
            return text.to_string();
        }
        chars[chars.len() - budget..].iter().collect()
    }

    /// Last-resort cut at fixed character intervals.
    fn hard_cut(&self, text: &str) -> Vec<String> {
        let budget = (self.chunk_size * self.measure.unit_chars()).max(1);
        let chars: Vec<char> = text.chars().collect();
        chars
            .chunks(budget)
            .map(|piece| piece.iter().collect())
            .collect()
    }

    /// Greedy sentence accumulation bounded by `chunk_size` characters.
    /// Always returns a non-empty list for non-empty input.
    pub(crate) fn fallback_split(&self, text: &str) -> Vec<String> {
        let limit = self.chunk_size.max(1);
        let mut chunks = Vec::new();
        let mut current = String::new();

        for sentence in split_sentences(text) {
            let over = !current.is_empty()
                && current.chars().count() + 1 + sentence.chars().count() > limit;
            if over {
                chunks.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&sentence);
        }
        if !current.is_empty() {
            chunks.push(current);
        }
        if chunks.is_empty() && !text.trim().is_empty() {
            chunks.push(text.trim().to_string());
        }
        chunks
    }
}

/// Units and the joiner that reconstructs them at one ladder level.
fn split_level(text: &str, depth: usize) -> (Vec<String>, &'static str) {
    match depth {
        0 => (text.split("\n\n").map(str::to_string).collect(), "\n\n"),
        1 => (text.split('\n').map(str::to_string).collect(), "\n"),
        2 => (split_sentences(text), " "),
        _ => (text.split(' ').map(str::to_string).collect(), " "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars_splitter(size: usize, overlap: usize) -> SizeBoundedSplitter {
        SizeBoundedSplitter::new(size, overlap, LengthMeasure::Characters)
    }

    #[test]
    fn short_text_stays_whole() {
        let pieces = chars_splitter(100, 0).split("Hello world.");
        assert_eq!(pieces, vec!["Hello world."]);
    }

    #[test]
    fn splits_on_paragraphs_first() {
        let text = "First paragraph here.\n\nSecond paragraph here.";
        let pieces = chars_splitter(25, 0).split(text);
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0], "First paragraph here.");
    }

    #[test]
    fn pieces_respect_character_budget() {
        let text = "Alpha bravo. Charlie delta. Echo foxtrot. Golf hotel. India juliet.";
        for piece in chars_splitter(20, 0).split(text) {
            assert!(piece.chars().count() <= 20, "oversized piece: {piece:?}");
        }
    }

    #[test]
    fn overlap_tail_carries_into_next_chunk() {
        let text = "aaaa bbbb\n\ncccc dddd";
        let pieces = chars_splitter(15, 4).split(text);
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0], "aaaa bbbb");
        // The next chunk re-includes the previous chunk's 4-char tail.
        assert!(pieces[1].starts_with("bbbb"), "got {:?}", pieces[1]);
    }

    #[test]
    fn token_measure_uses_char_quarter() {
        assert_eq!(estimate_tokens("abcdefgh"), 2);
        assert_eq!(estimate_tokens("abc"), 0);
        let splitter = SizeBoundedSplitter::new(2, 0, LengthMeasure::TokenEstimate);
        // 9+ chars > 2 tokens: must split somewhere.
        let pieces = splitter.split("alpha beta gamma delta");
        assert!(pieces.len() > 1);
    }

    #[test]
    fn unbroken_text_hard_cuts_as_last_resort() {
        let text = "x".repeat(100);
        let pieces = chars_splitter(30, 0).split(&text);
        assert!(pieces.len() >= 4);
        for piece in &pieces {
            assert!(piece.chars().count() <= 30);
        }
        assert_eq!(pieces.concat(), text);
    }

    #[test]
    fn group_units_accumulates_greedily() {
        let units: Vec<String> = ["aaaa", "bbbb", "cccc"].iter().map(|s| s.to_string()).collect();
        let grouped = chars_splitter(8, 0).group_units(&units, "\n\n");
        assert_eq!(grouped, vec!["aaaa", "bbbb", "cccc"]);

        let grouped = chars_splitter(100, 0).group_units(&units, "\n\n");
        assert_eq!(grouped, vec!["aaaa\n\nbbbb\n\ncccc"]);
    }

    #[test]
    fn group_units_keeps_oversized_unit_whole() {
        let giant = "g".repeat(50);
        let units = vec!["small".to_string(), giant.clone(), "tiny".to_string()];
        let grouped = chars_splitter(10, 0).group_units(&units, " ");
        assert!(grouped.contains(&giant), "oversized unit must survive intact");
    }

    #[test]
    fn fallback_accumulates_sentences_by_characters() {
        let splitter = chars_splitter(30, 0);
        let pieces = splitter.fallback_split("One sentence here. Another sentence here. Final one.");
        assert!(pieces.len() >= 2);
        for piece in &pieces {
            assert!(!piece.trim().is_empty());
        }
    }

    #[test]
    fn fallback_never_returns_empty_for_nonempty_input() {
        let splitter = chars_splitter(5, 0);
        let pieces = splitter.fallback_split("no terminal punctuation at all");
        assert!(!pieces.is_empty());
    }

    #[test]
    fn custom_measure_is_honored() {
        let word_count = LengthMeasure::Custom(Arc::new(|t: &str| t.split_whitespace().count()));
        let splitter = SizeBoundedSplitter::new(3, 0, word_count);
        let pieces = splitter.split("one two three\n\nfour five six");
        assert_eq!(pieces.len(), 2);
    }

    #[test]
    fn blank_input_yields_no_pieces() {
        assert!(chars_splitter(10, 0).split("").is_empty());
        assert!(chars_splitter(10, 0).split("  \n\n  ").is_empty());
    }
}
