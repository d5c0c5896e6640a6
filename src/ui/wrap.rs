//! Text shaping for the list and the message panes.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const TAB: &str = "    ";

/// Word-wrap `text` to lines at most `width` columns wide.
///
/// Line breaks in the input (`\n`, `\r\n`, `\r`) are kept, blank lines
/// included. Other control characters become spaces. Words wider than the
/// line are split at grapheme boundaries. A zero width yields no lines.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut lines = Vec::new();
    for raw in normalized.split('\n') {
        wrap_line(&printable(raw), width, &mut lines);
    }
    lines
}

fn printable(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for c in line.chars() {
        match c {
            '\t' => out.push_str(TAB),
            c if c.is_control() => out.push(' '),
            c => out.push(c),
        }
    }
    out
}

fn wrap_line(line: &str, width: usize, out: &mut Vec<String>) {
    let mut current = String::new();
    let mut current_width = 0;

    for word in line.split_word_bounds() {
        let word_width = word.width();
        if current_width + word_width <= width {
            current.push_str(word);
            current_width += word_width;
            continue;
        }
        if word.trim().is_empty() {
            // Break at the space; it is not carried to the next line.
            out.push(std::mem::take(&mut current));
            current_width = 0;
            continue;
        }
        if !current.is_empty() {
            out.push(std::mem::take(&mut current).trim_end().to_string());
            current_width = 0;
        }
        if word_width <= width {
            current.push_str(word);
            current_width = word_width;
            continue;
        }
        for grapheme in word.graphemes(true) {
            let g_width = grapheme.width();
            if current_width + g_width > width && !current.is_empty() {
                out.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push_str(grapheme);
            current_width += g_width;
        }
    }
    out.push(current);
}

/// Shorten `text` to at most `max_width` columns, ending in `...` when cut.
pub fn truncate(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width < 3 {
        return take_width(text, max_width).to_string();
    }
    format!("{}...", take_width(text, max_width - 3))
}

/// The longest prefix of `text` that fits in `max_width` columns.
fn take_width(text: &str, max_width: usize) -> &str {
    let mut used = 0;
    for (idx, grapheme) in text.grapheme_indices(true) {
        used += grapheme.width();
        if used > max_width {
            return &text[..idx];
        }
    }
    text
}

/// Flatten `text` onto one line: control characters become spaces and runs
/// of whitespace collapse to a single space.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
