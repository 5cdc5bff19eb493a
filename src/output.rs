//! Output streams, terminal size and the per-type message API.

use std::io::{self, Write};

use serde_json::Value;
use tracing::trace;

use crate::ansi::{self, Style};
use crate::config::Settings;
use crate::error::Result;
use crate::flags::Renderer;
use crate::format::Formatter;

// ============================================================================
// Streams and sinks
// ============================================================================

/// The three destinations a message can go to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Standard,
    Info,
    Error,
}

/// Receives one pre-formatted message per call.
pub trait Sink {
    fn write_line(&mut self, stream: Stream, line: &str) -> io::Result<()>;
}

/// Writes to stdout (standard and info) and stderr (error).
///
/// When color is disabled (NO_COLOR, not a TTY) escape codes are stripped.
#[derive(Debug, Clone)]
pub struct StdSink {
    color: bool,
}

impl StdSink {
    pub fn new() -> Self {
        Self {
            color: should_colorize(),
        }
    }

    pub fn with_color(color: bool) -> Self {
        Self { color }
    }
}

impl Default for StdSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for StdSink {
    fn write_line(&mut self, stream: Stream, line: &str) -> io::Result<()> {
        let stripped;
        let line = if self.color {
            line
        } else {
            stripped = ansi::strip(line);
            &stripped
        };

        match stream {
            Stream::Standard | Stream::Info => writeln!(io::stdout().lock(), "{}", line),
            Stream::Error => writeln!(io::stderr().lock(), "{}", line),
        }
    }
}

/// Keeps every write in memory, in order.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Vec<(Stream, String)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[(Stream, String)] {
        &self.lines
    }

    /// Writes that went to `stream`.
    pub fn on(&self, stream: Stream) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|(s, _)| *s == stream)
            .map(|(_, l)| l.as_str())
            .collect()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl Sink for MemorySink {
    fn write_line(&mut self, stream: Stream, line: &str) -> io::Result<()> {
        self.lines.push((stream, line.to_string()));
        Ok(())
    }
}

// ============================================================================
// Terminal utilities
// ============================================================================

/// Terminal size as (width, height), (0, 0) if unavailable.
pub fn terminal_size() -> (usize, usize) {
    terminal_size::terminal_size()
        .map(|(w, h)| (w.0 as usize, h.0 as usize))
        .unwrap_or((0, 0))
}

/// Get terminal width, 0 if unavailable.
pub fn terminal_width() -> usize {
    terminal_size().0
}

/// Whether escape codes should reach the terminal (honours NO_COLOR and TTY detection).
pub fn should_colorize() -> bool {
    colored::control::SHOULD_COLORIZE.should_colorize()
}

/// A horizontal rule two columns narrower than `width`, framed by blank lines.
pub fn hr_line(width: usize) -> String {
    format!("\n {} \n", ansi::gray("═".repeat(width.saturating_sub(2))))
}

// ============================================================================
// Logger
// ============================================================================

type WidthSource = Box<dyn Fn() -> usize + Send + Sync>;

/// Per-type message API over a [`Sink`].
///
/// The logger owns the settings; change them through [`Logger::settings_mut`]
/// between calls.
pub struct Logger<S: Sink = StdSink> {
    settings: Settings,
    renderer: Renderer,
    sink: S,
    width: WidthSource,
}

impl Logger<StdSink> {
    pub fn new(settings: Settings) -> Self {
        Self::with_sink(settings, StdSink::new())
    }
}

impl<S: Sink> Logger<S> {
    pub fn with_sink(settings: Settings, sink: S) -> Self {
        Self {
            settings,
            renderer: Renderer::default(),
            sink,
            width: Box::new(terminal_width),
        }
    }

    pub fn with_renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Query the line width from `width` on every call instead of the terminal.
    pub fn with_width<F>(mut self, width: F) -> Self
    where
        F: Fn() -> usize + Send + Sync + 'static,
    {
        self.width = Box::new(width);
        self
    }

    pub fn fixed_width(self, width: usize) -> Self {
        self.with_width(move || width)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn width(&self) -> usize {
        (self.width)()
    }

    /// Format a message of type `kind` at the current width without printing it.
    ///
    /// Unknown types are reported on the error stream and yield `None`.
    pub fn format(&mut self, kind: &str, text: &str, vars: &[Value]) -> Result<Option<String>> {
        let width = self.width();
        Formatter::new(&self.settings, &self.renderer).format(kind, text, vars, width, &mut self.sink)
    }

    fn emit(
        &mut self,
        kind: &str,
        text: &str,
        vars: &[Value],
        stream: Stream,
        style: Option<Style>,
    ) -> Result<()> {
        if let Some(out) = self.format(kind, text, vars)? {
            let out = match style {
                Some(style) => style.paint(out),
                None => out,
            };
            self.sink.write_line(stream, &out)?;
        }
        Ok(())
    }

    /// Dispatch on a type name, including `hr`.
    pub fn log(&mut self, kind: &str, text: &str, vars: &[Value]) -> Result<()> {
        match kind {
            "banner" => self.banner(text, vars),
            "error" => self.error(text, vars),
            "info" => self.info(text, vars),
            "ok" => self.ok(text, vars),
            "done" => self.done(text, vars),
            "time" => self.time(text, vars),
            "verbose" => self.verbose(text, vars),
            crate::format::HR_KIND => self.hr(),
            other => self.emit(other, text, vars, Stream::Standard, None),
        }
    }

    pub fn banner(&mut self, text: &str, vars: &[Value]) -> Result<()> {
        self.emit("banner", text, vars, Stream::Standard, None)
    }

    pub fn error(&mut self, text: &str, vars: &[Value]) -> Result<()> {
        self.emit("error", text, vars, Stream::Error, Some(ansi::RED))
    }

    pub fn info(&mut self, text: &str, vars: &[Value]) -> Result<()> {
        self.emit("info", text, vars, Stream::Info, None)
    }

    pub fn ok(&mut self, text: &str, vars: &[Value]) -> Result<()> {
        self.emit("ok", text, vars, Stream::Standard, Some(ansi::GREEN))
    }

    pub fn done(&mut self, text: &str, vars: &[Value]) -> Result<()> {
        self.emit("done", text, vars, Stream::Standard, Some(ansi::GREEN))
    }

    pub fn time(&mut self, text: &str, vars: &[Value]) -> Result<()> {
        self.emit("time", text, vars, Stream::Standard, None)
    }

    /// Printed only in verbose mode and when the message matches `verbose_filter`.
    ///
    /// An invalid filter is an error even with verbose mode off.
    pub fn verbose(&mut self, text: &str, vars: &[Value]) -> Result<()> {
        let filter = self.settings.verbose_regex()?;
        let Some(out) = self.format("verbose", text, vars)? else {
            return Ok(());
        };

        if self.settings.verbose_mode && filter.is_match(&out) {
            self.sink.write_line(Stream::Standard, &out)?;
        } else {
            trace!(verbose_mode = self.settings.verbose_mode, filter = %filter, "verbose message suppressed");
        }
        Ok(())
    }

    /// Horizontal rule at the current width.
    pub fn hr(&mut self) -> Result<()> {
        let width = self.width();
        self.hr_with_width(width)
    }

    pub fn hr_with_width(&mut self, width: usize) -> Result<()> {
        self.sink.write_line(Stream::Standard, &hr_line(width))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::TIMESTAMP_TOKEN;
    use crate::vars;

    fn logger() -> Logger<MemorySink> {
        Logger::with_sink(Settings::default(), MemorySink::new())
            .with_renderer(Renderer::empty().with_token(TIMESTAMP_TOKEN, || "NOW".to_string()))
            .fixed_width(80)
    }

    fn flag(kind: &str) -> String {
        Settings::default().flags.get(kind).unwrap().to_string()
    }

    #[test]
    fn test_each_type_begins_with_its_flag() {
        let mut log = logger();
        log.banner("banner", &[]).unwrap();
        log.error("error", &[]).unwrap();
        log.info("info", &[]).unwrap();
        log.ok("ok", &[]).unwrap();
        log.done("done", &[]).unwrap();

        let sink = log.sink();
        let standard = sink.on(Stream::Standard);
        let info = sink.on(Stream::Info);
        let error = sink.on(Stream::Error);
        assert_eq!(standard.len(), 3);
        assert_eq!(info.len(), 1);
        assert_eq!(error.len(), 1);

        let cases = vec![
            (standard[0], "banner"),
            (error[0], "error"),
            (info[0], "info"),
            (standard[1], "ok"),
            (standard[2], "done"),
        ];
        for (line, kind) in cases {
            let stripped = ansi::strip(line);
            assert!(stripped.starts_with(&flag(kind)), "{:?}", stripped);
            assert!(stripped.ends_with(kind), "{:?}", stripped);
        }
    }

    #[test]
    fn test_colors_per_type() {
        let mut log = logger();
        log.error("e", &[]).unwrap();
        log.ok("o", &[]).unwrap();
        log.banner("b", &[]).unwrap();

        let lines = log.sink().lines();
        assert!(lines[0].1.starts_with("\x1b[31m"));
        assert!(lines[1].1.starts_with("\x1b[32m"));
        assert!(!lines[2].1.starts_with("\x1b["));
    }

    #[test]
    fn test_verbose_off_prints_nothing() {
        let mut log = logger();
        log.verbose("test", &[]).unwrap();
        log.verbose("test2", &[]).unwrap();
        assert!(log.sink().lines().is_empty());
    }

    #[test]
    fn test_verbose_on_prints() {
        let mut log = logger();
        log.settings_mut().verbose_mode = true;
        log.verbose("test", &[]).unwrap();
        log.verbose("test2", &[]).unwrap();

        let lines = log.sink().on(Stream::Standard);
        assert_eq!(lines.len(), 2);
        assert!(ansi::strip(lines[0]).starts_with(&flag("verbose")));
        assert!(ansi::strip(lines[0]).ends_with("test"));
        assert!(ansi::strip(lines[1]).ends_with("test2"));
    }

    #[test]
    fn test_verbose_filter() {
        let mut log = logger();
        log.settings_mut().verbose_mode = true;
        log.settings_mut().verbose_filter = "^.*db".to_string();
        log.verbose("db connected", &[]).unwrap();
        log.verbose("cache warm", &[]).unwrap();

        let lines = log.sink().lines();
        assert_eq!(lines.len(), 1);
        assert!(ansi::strip(&lines[0].1).ends_with("db connected"));
    }

    #[test]
    fn test_verbose_invalid_filter_fails_even_when_off() {
        let mut log = logger();
        log.settings_mut().verbose_filter = "[".to_string();
        let result = log.verbose("x", &[]);
        assert!(matches!(result, Err(crate::Error::InvalidFilter { .. })));
    }

    #[test]
    fn test_time_logs_message_after_break() {
        let mut log = logger();
        log.time("test", &[]).unwrap();
        log.time("test2", &[]).unwrap();

        let lines = log.sink().on(Stream::Standard);
        assert_eq!(lines.len(), 2);
        // padded to the 14 columns of the verbose flag, then a line break
        assert_eq!(ansi::strip(lines[0]), " 🕐  [NOW]    \ntest");
        assert!(ansi::strip(lines[1]).ends_with("test2"));
    }

    #[test]
    fn test_hr() {
        let mut log = logger();
        log.hr_with_width(10).unwrap();

        let lines = log.sink().lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(ansi::strip(&lines[0].1), "\n ════════ \n");
        assert!(lines[0].1.contains("\x1b[90m"));
    }

    #[test]
    fn test_hr_narrow_widths() {
        assert_eq!(ansi::strip(&hr_line(0)), "\n  \n");
        assert_eq!(ansi::strip(&hr_line(1)), "\n  \n");
        assert_eq!(ansi::strip(&hr_line(2)), "\n  \n");
        assert_eq!(ansi::strip(&hr_line(3)), "\n ═ \n");
    }

    #[test]
    fn test_hr_uses_width_source() {
        let mut log = logger().fixed_width(5);
        log.hr().unwrap();
        assert_eq!(ansi::strip(&log.sink().lines()[0].1), "\n ═══ \n");
    }

    #[test]
    fn test_unknown_type_prints_only_diagnostic() {
        let mut log = logger();
        let out = log.format("bogus", "x", &[]).unwrap();
        assert_eq!(out, None);

        log.log("bogus", "x", &[]).unwrap();
        let errors = log.sink().on(Stream::Error);
        assert_eq!(errors.len(), 2);
        let stripped = ansi::strip(errors[0]);
        assert!(stripped.contains("bogus"));
        for kind in ["hr", "banner", "error", "info", "ok", "done", "time", "verbose"] {
            assert!(stripped.contains(kind), "missing {}", kind);
        }
        assert!(log.sink().on(Stream::Standard).is_empty());
    }

    #[test]
    fn test_memory_sink_clear_between_calls() {
        let mut log = logger();
        log.log("bogus", "x", &[]).unwrap();
        assert!(!log.sink().lines().is_empty());

        log.sink_mut().clear();
        assert!(log.sink().lines().is_empty());

        log.ok("fine", &[]).unwrap();
        let lines = log.sink().lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, Stream::Standard);
        assert!(ansi::strip(&lines[0].1).contains("fine"));
        assert!(log.sink().on(Stream::Error).is_empty());
    }

    #[test]
    fn test_log_dispatches_hr() {
        let mut log = logger().fixed_width(4);
        log.log("hr", "", &[]).unwrap();
        assert_eq!(ansi::strip(&log.sink().lines()[0].1), "\n ══ \n");
    }

    #[test]
    fn test_vars_are_inserted() {
        let mut log = logger();
        log.info("# of # files", &vars![3, "src"]).unwrap();
        let line = log.sink().on(Stream::Info)[0];
        assert!(ansi::strip(line).ends_with("3 of \"src\" files"));
    }

    #[test]
    fn test_settings_change_applies_to_next_call() {
        let mut log = logger();
        log.settings_mut().disable_indent.push("info".to_string());
        log.info("x", &[]).unwrap();
        let line = log.sink().on(Stream::Info)[0];
        assert!(ansi::strip(line).ends_with("\nx"));
    }
}
