//! Shared text utilities for labels
//!
//! Widths are measured in terminal display columns, not bytes.

use unicode_width::UnicodeWidthStr;

/// Display width of `text` in terminal columns
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Break an annotation into lines of at most `max_width` columns.
///
/// Words are never split; a single word wider than `max_width` gets a line
/// of its own. A `max_width` of 0 disables wrapping.
///
/// # Example
/// ```
/// use scenetree::core::wrap_label;
///
/// let lines = wrap_label("terrain tile 4 of 16", 10);
/// assert_eq!(lines, vec!["terrain", "tile 4 of", "16"]);
/// ```
pub fn wrap_label(label: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 || display_width(label) <= max_width {
        return vec![label.to_string()];
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in label.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if display_width(&current) + 1 + display_width(word) <= max_width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Right-pad `text` with spaces up to `width` display columns
pub fn pad_to_width(text: &str, width: usize) -> String {
    let missing = width.saturating_sub(display_width(text));
    format!("{}{}", text, " ".repeat(missing))
}
