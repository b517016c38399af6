//! Boundary scanners: paragraphs, sentences, and title-like lines.
//!
//! All scanners are hand-rolled single-pass routines; none of them can
//! fail, and blank input always yields an empty result.

/// Split text into paragraphs at blank-line boundaries.
///
/// A boundary is any whitespace run containing at least one blank line
/// (a newline, optional horizontal whitespace, then another newline).
/// Segments are trimmed; segments that become empty are dropped. Input
/// without a blank-line boundary yields a single-element result.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut segment_start = 0;
    let mut run_start: Option<usize> = None;
    let mut newlines_in_run = 0;

    for (i, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if run_start.is_none() {
                run_start = Some(i);
                newlines_in_run = 0;
            }
            if ch == '\n' {
                newlines_in_run += 1;
            }
        } else if let Some(run) = run_start.take() {
            if newlines_in_run >= 2 {
                push_trimmed(&mut paragraphs, &text[segment_start..run]);
                segment_start = i;
            }
        }
    }
    push_trimmed(&mut paragraphs, &text[segment_start..]);
    paragraphs
}

/// Count blank-line boundary runs, using the same definition as
/// [`split_paragraphs`] so the strategy heuristic and the paragraph
/// detector agree on what a boundary is.
pub fn count_blank_boundaries(text: &str) -> usize {
    let mut boundaries = 0;
    let mut in_run = false;
    let mut newlines_in_run = 0;

    for ch in text.chars() {
        if ch.is_whitespace() {
            if !in_run {
                in_run = true;
                newlines_in_run = 0;
            }
            if ch == '\n' {
                newlines_in_run += 1;
            }
        } else {
            if in_run && newlines_in_run >= 2 {
                boundaries += 1;
            }
            in_run = false;
        }
    }
    if in_run && newlines_in_run >= 2 {
        boundaries += 1;
    }
    boundaries
}

/// Split at sentence boundaries: terminal punctuation (`.`, `!`, `?`)
/// followed by a space and then an uppercase letter or newline. Returns
/// trimmed, non-empty fragments.
pub fn split_sentences(text: &str) -> Vec<String> {
    let bytes = text.as_bytes();
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if is_terminal(bytes[i]) && bytes.get(i + 1) == Some(&b' ') {
            // End-of-string after the space acts like a newline.
            let after = bytes.get(i + 2).copied().unwrap_or(b'\n');
            if after.is_ascii_uppercase() || after == b'\n' {
                push_trimmed(&mut sentences, &text[start..=i]);
                start = i + 2;
                i = start;
                continue;
            }
        }
        i += 1;
    }
    if start < text.len() {
        push_trimmed(&mut sentences, &text[start..]);
    }
    sentences
}

/// A title-like line: starts with an uppercase letter and contains no
/// sentence-ending punctuation anywhere. Leading whitespace disqualifies
/// the line (the uppercase letter must occupy the first column).
pub fn is_title_line(line: &str) -> bool {
    let mut chars = line.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => !line.contains(is_terminal_char),
        _ => false,
    }
}

fn is_terminal(b: u8) -> bool {
    matches!(b, b'.' | b'!' | b'?')
}

fn is_terminal_char(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

fn push_trimmed(out: &mut Vec<String>, segment: &str) {
    let trimmed = segment.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_blank_lines() {
        let paragraphs = split_paragraphs("First para.\n\nSecond para.\n\nThird.");
        assert_eq!(paragraphs, vec!["First para.", "Second para.", "Third."]);
    }

    #[test]
    fn blank_line_may_carry_horizontal_whitespace() {
        let paragraphs = split_paragraphs("One\n  \t\nTwo");
        assert_eq!(paragraphs, vec!["One", "Two"]);
    }

    #[test]
    fn windows_line_endings_split_too() {
        let paragraphs = split_paragraphs("One\r\n\r\nTwo");
        assert_eq!(paragraphs, vec!["One", "Two"]);
    }

    #[test]
    fn single_newline_is_not_a_boundary() {
        let paragraphs = split_paragraphs("line one\nline two");
        assert_eq!(paragraphs, vec!["line one\nline two"]);
    }

    #[test]
    fn blank_input_yields_nothing() {
        assert!(split_paragraphs("").is_empty());
        assert!(split_paragraphs("   \n\n\t\n   ").is_empty());
    }

    #[test]
    fn boundary_count_matches_paragraph_gaps() {
        assert_eq!(count_blank_boundaries("a\n\nb\n\nc"), 2);
        assert_eq!(count_blank_boundaries("a\nb"), 0);
        assert_eq!(count_blank_boundaries("a\n \nb"), 1);
    }

    #[test]
    fn splits_sentences_at_terminal_punctuation() {
        let sentences = split_sentences("First sentence. Second one! Third?");
        assert_eq!(sentences.len(), 3);
        assert_eq!(sentences[0], "First sentence.");
        assert_eq!(sentences[1], "Second one!");
    }

    #[test]
    fn abbreviation_followed_by_lowercase_does_not_split() {
        let sentences = split_sentences("approx. one value. Next sentence.");
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0], "approx. one value.");
    }

    #[test]
    fn title_lines_detected() {
        assert!(is_title_line("Chapter One"));
        assert!(is_title_line("Overview"));
        assert!(!is_title_line("a lowercase start"));
        assert!(!is_title_line("Ends with a period."));
        assert!(!is_title_line("  Indented Title"));
        assert!(!is_title_line(""));
    }
}
