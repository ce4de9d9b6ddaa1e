//! Shared text utilities
//!
//! Snippet truncation and word wrapping. Both operate on `char` boundaries,
//! never on raw byte offsets, so multi-byte text is never split.

use unicode_width::UnicodeWidthStr;

/// Marker appended to a truncated snippet
pub const ELLIPSIS: char = '…';

/// Collapse every whitespace run into a single space and trim both ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Build a description snippet of at most `budget` characters.
///
/// Whitespace is normalized first. Text that fits is returned as is; longer
/// text is cut at a char boundary, trailing whitespace is dropped and
/// [`ELLIPSIS`] is appended. The marker counts toward the budget.
/// Returns `None` for blank text or a zero budget.
///
/// # Example
/// ```
/// use classtree::core::truncate_snippet;
///
/// assert_eq!(truncate_snippet("a gene product", 7).as_deref(), Some("a gene…"));
/// assert_eq!(truncate_snippet("   ", 10), None);
/// ```
pub fn truncate_snippet(text: &str, budget: usize) -> Option<String> {
    let normalized = normalize_whitespace(text);
    if normalized.is_empty() || budget == 0 {
        return None;
    }

    if normalized.chars().count() <= budget {
        return Some(normalized);
    }

    let keep = budget - 1;
    let cut = normalized
        .char_indices()
        .nth(keep)
        .map(|(idx, _)| idx)
        .unwrap_or(normalized.len());

    let mut snippet = normalized[..cut].trim_end().to_string();
    snippet.push(ELLIPSIS);
    Some(snippet)
}

/// Wrap text to fit within a maximum width, breaking on word boundaries.
///
/// Returns a vector of lines, each fitting within `max_width` display columns
/// unless a single word is wider. If `max_width` is 0 or the text fits on one
/// line, returns a single-element vector.
///
/// # Example
/// ```
/// use classtree::core::wrap_text;
///
/// let lines = wrap_text("A gene or gene product", 10);
/// assert_eq!(lines, vec!["A gene or", "gene", "product"]);
/// ```
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 || UnicodeWidthStr::width(text) <= max_width {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = UnicodeWidthStr::width(word);

        if current_width == 0 {
            current_line = word.to_string();
            current_width = word_width;
        } else if current_width + 1 + word_width <= max_width {
            current_line.push(' ');
            current_line.push_str(word);
            current_width += 1 + word_width;
        } else {
            lines.push(std::mem::take(&mut current_line));
            current_line = word.to_string();
            current_width = word_width;
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        vec![String::new()]
    } else {
        lines
    }
}

/// Display width of a string in terminal columns
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}
