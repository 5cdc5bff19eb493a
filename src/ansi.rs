//! ANSI escape code helpers: nesting-safe styling and stripping.
//!
//! Styles are applied as `ESC[<start>` ... `ESC[<end>`. Colors share the
//! `39m` reset, bold resets with `22m`. Any `end` sequence already inside the
//! text is rewritten to re-emit `start`, so an inner reset does not terminate
//! an outer style.

use std::fmt::Display;
use std::sync::LazyLock;

use regex::Regex;

/// Reset code for foreground colors.
pub const COLOR_END: &str = "39m";

/// Reset code for bold/dim intensity.
pub const BOLD_END: &str = "22m";

// Covers classic CSI sequences as well as BEL-terminated OSC sequences.
static ANSI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"[\x1B\x{9B}][\[\]()#;?]*(?:(?:(?:[a-zA-Z0-9]*(?:;[a-zA-Z0-9]*)*)?\x07)",
        r"|(?:(?:[0-9]{1,4}(?:;[0-9]{0,4})*)?[0-9A-PRZcf-ntqry=><~]))",
    ))
    .unwrap()
});

/// A start/end code pair, e.g. `31m`/`39m` for red.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub start: &'static str,
    pub end: &'static str,
}

impl Style {
    pub const fn color(start: &'static str) -> Self {
        Self {
            start,
            end: COLOR_END,
        }
    }

    pub fn paint(self, text: impl Display) -> String {
        wrap(text, self.start, self.end)
    }
}

pub const BLACK: Style = Style::color("30m");
pub const RED: Style = Style::color("31m");
pub const GREEN: Style = Style::color("32m");
pub const YELLOW: Style = Style::color("33m");
pub const BLUE: Style = Style::color("34m");
pub const MAGENTA: Style = Style::color("35m");
pub const CYAN: Style = Style::color("36m");
pub const WHITE: Style = Style::color("37m");
pub const GRAY: Style = Style::color("90m");
pub const BOLD: Style = Style {
    start: "1m",
    end: BOLD_END,
};

/// Wrap `text` between `ESC[start` and `ESC[end`, re-opening `start` wherever
/// `ESC[end` already occurs inside the text.
pub fn wrap(text: impl Display, start: &str, end: &str) -> String {
    let text = text.to_string();
    let open = format!("\x1b[{}", start);
    let close = format!("\x1b[{}", end);

    format!("{}{}{}", open, text.replace(&close, &open), close)
}

/// Like [`wrap`], but an absent value renders as the empty string.
pub fn wrap_opt<T: Display>(text: Option<T>, start: &str, end: &str) -> String {
    text.map(|t| wrap(t, start, end)).unwrap_or_default()
}

/// Remove every ANSI escape sequence from `text`.
pub fn strip(text: &str) -> String {
    ANSI_RE.replace_all(text, "").into_owned()
}

pub fn black(text: impl Display) -> String {
    BLACK.paint(text)
}

pub fn red(text: impl Display) -> String {
    RED.paint(text)
}

pub fn green(text: impl Display) -> String {
    GREEN.paint(text)
}

pub fn yellow(text: impl Display) -> String {
    YELLOW.paint(text)
}

pub fn blue(text: impl Display) -> String {
    BLUE.paint(text)
}

pub fn magenta(text: impl Display) -> String {
    MAGENTA.paint(text)
}

pub fn cyan(text: impl Display) -> String {
    CYAN.paint(text)
}

pub fn white(text: impl Display) -> String {
    WHITE.paint(text)
}

pub fn gray(text: impl Display) -> String {
    GRAY.paint(text)
}

pub fn bold(text: impl Display) -> String {
    BOLD.paint(text)
}
