//! Greedy word wrapping against a pixel budget.
//!
//! Heights are derived from the number of lines rather than measured from
//! rendered glyphs, so the layout code can place blocks without drawing them
//! first.

use cb_core::{FontMetrics, WrappedText};

/// Wraps `text` into lines no wider than `max_width` pixels.
///
/// Every word costs its own width plus one trailing space. A word that would
/// push the running width past the budget starts a new line; words are never
/// split, so a single word wider than the budget sits alone on its line.
pub fn wrap(text: &str, metrics: &dyn FontMetrics, max_width: u32) -> WrappedText {
    let space = metrics.measure(" ");
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut width = 0u32;

    for word in text.split_whitespace() {
        let cost = metrics.measure(word).saturating_add(space);
        if !current.is_empty() && width.saturating_add(cost) > max_width {
            lines.push(std::mem::take(&mut current));
            width = 0;
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
        width = width.saturating_add(cost);
    }

    if !current.is_empty() {
        lines.push(current);
    }

    let pixel_height = block_height(lines.len(), metrics);
    WrappedText {
        lines,
        pixel_height,
    }
}

/// Wraps each paragraph on its own and separates them with one blank line.
pub fn wrap_paragraphs<S: AsRef<str>>(
    paragraphs: &[S],
    metrics: &dyn FontMetrics,
    max_width: u32,
) -> WrappedText {
    let mut lines: Vec<String> = Vec::new();

    for paragraph in paragraphs {
        let wrapped = wrap(paragraph.as_ref(), metrics, max_width);
        if wrapped.is_empty() {
            continue;
        }
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.extend(wrapped.lines);
    }

    let pixel_height = block_height(lines.len(), metrics);
    WrappedText {
        lines,
        pixel_height,
    }
}

/// Height of a block of `line_count` lines; the renderer uses the same formula.
pub fn block_height(line_count: usize, metrics: &dyn FontMetrics) -> u32 {
    (line_count as u32).saturating_mul(metrics.line_height())
}
