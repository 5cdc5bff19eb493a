//! Word wrapping with a hanging indent, aware of ANSI escape codes.
//!
//! Continuation lines, both wrapped ones and line breaks already present in
//! the message, are indented by the width of the widest flag so that the
//! message body lines up under the first line. Words are never split.

use unicode_width::UnicodeWidthStr;

use crate::ansi;
use crate::flags::Renderer;

/// Calculate visible width of a string, ignoring ANSI escape codes.
///
/// ANSI escape sequences (e.g., `\x1b[32m` for green) have zero display width.
pub fn visible_width(s: &str) -> usize {
    ansi::strip(s).width()
}

/// Reflow `text` so that no line runs past `max_width` columns.
///
/// Types listed in `exempt` are returned untouched. Every word costs its
/// rendered visible width plus one separating space, counted from `indent`.
/// A width of 0 is taken literally, which pushes nearly every word onto a
/// line of its own.
pub fn wrap(
    text: &str,
    kind: &str,
    max_width: usize,
    indent: usize,
    exempt: &[String],
    renderer: &Renderer,
) -> String {
    if exempt.iter().any(|e| e == kind) {
        return text.to_string();
    }

    let shoulder = " ".repeat(indent);
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");

    normalized
        .split('\n')
        .map(|line| {
            let mut width = indent;
            line.split(' ')
                .map(|word| {
                    let word_width = renderer.rendered_width(word) + 1;
                    width += word_width;
                    if width > max_width {
                        width = indent + word_width;
                        format!("\n{}{}", shoulder, word)
                    } else {
                        word.to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join(&format!("\n{}", shoulder))
}
