//! Assembles the printable message: shoulder, expanded text, hanging indent.

use serde_json::Value;
use tracing::trace;

use crate::ansi;
use crate::config::Settings;
use crate::error::Result;
use crate::flags::{self, Renderer};
use crate::output::{Sink, Stream};
use crate::template;
use crate::wrap;

/// Pseudo type accepted by the CLI and listed among valid types.
pub const HR_KIND: &str = "hr";

/// Formats messages against one settings snapshot.
#[derive(Debug, Clone, Copy)]
pub struct Formatter<'a> {
    settings: &'a Settings,
    renderer: &'a Renderer,
}

impl<'a> Formatter<'a> {
    pub fn new(settings: &'a Settings, renderer: &'a Renderer) -> Self {
        Self { settings, renderer }
    }

    /// Format `text` with `vars` as a message of type `kind`.
    ///
    /// An unknown `kind` writes a diagnostic to the error stream of `sink` and
    /// returns `Ok(None)`.
    pub fn format(
        &self,
        kind: &str,
        text: &str,
        vars: &[Value],
        max_width: usize,
        sink: &mut dyn Sink,
    ) -> Result<Option<String>> {
        let settings = self.settings;

        if !settings.flags.contains(kind) {
            sink.write_line(Stream::Error, &self.unknown_kind_message(kind))?;
            return Ok(None);
        }

        let widest =
            flags::widest_flag_width(&settings.flags, &settings.disable_indent, self.renderer)?;
        let shoulder = flags::shoulder(kind, &settings.flags, widest, self.renderer);
        let linebreak = if settings.is_exempt(kind) { "\n" } else { "" };
        let expanded = template::expand(text, vars, settings.pretty);
        let message = wrap::wrap(
            &expanded,
            kind,
            max_width,
            widest,
            &settings.disable_indent,
            self.renderer,
        );
        trace!(kind, widest, max_width, "formatted message");

        Ok(Some(format!("{}{}{}", shoulder, linebreak, message)))
    }

    /// Diagnostic naming the bad type and listing every valid one.
    pub fn unknown_kind_message(&self, kind: &str) -> String {
        let valid: Vec<&str> = std::iter::once(HR_KIND)
            .chain(self.settings.flags.kinds())
            .collect();
        ansi::red(format!(
            "Error: Type {} was not recognized. Can only be one of:\n{}",
            ansi::yellow(kind),
            ansi::yellow(valid.join(","))
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::flags::{FlagSet, TIMESTAMP_TOKEN};
    use crate::output::MemorySink;
    use serde_json::json;

    fn renderer() -> Renderer {
        Renderer::empty().with_token(TIMESTAMP_TOKEN, || "NOW".to_string())
    }

    fn plain_settings() -> Settings {
        let mut s = Settings::default();
        s.set_flags(
            [
                ("error", " ERROR: ".to_string()),
                ("ok", " OK ".to_string()),
                ("time", format!(" [{}] ", ansi::bold(TIMESTAMP_TOKEN))),
            ]
            .into_iter()
            .collect(),
        );
        s
    }

    #[test]
    fn test_format_error_message() {
        let settings = plain_settings();
        let r = renderer();
        let mut sink = MemorySink::new();
        let out = Formatter::new(&settings, &r)
            .format("error", "fail: #", &[json!("x")], 80, &mut sink)
            .unwrap()
            .unwrap();

        let stripped = ansi::strip(&out);
        assert!(stripped.starts_with(" ERROR: "));
        assert!(stripped.ends_with("fail: \"x\""));
        assert!(out.contains(&ansi::yellow("\"x\"")));
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn test_format_pads_narrow_flag() {
        let settings = plain_settings();
        let r = renderer();
        let mut sink = MemorySink::new();
        let out = Formatter::new(&settings, &r)
            .format("ok", "yes", &[], 80, &mut sink)
            .unwrap()
            .unwrap();
        assert_eq!(out, " OK     yes");
    }

    #[test]
    fn test_format_wraps_under_the_flag() {
        let settings = plain_settings();
        let r = renderer();
        let mut sink = MemorySink::new();
        let out = Formatter::new(&settings, &r)
            .format("error", "one two three", &[], 16, &mut sink)
            .unwrap()
            .unwrap();
        assert_eq!(out, " ERROR: one two \n        three");
    }

    #[test]
    fn test_format_exempt_type_breaks_after_flag() {
        let settings = plain_settings();
        let r = renderer();
        let mut sink = MemorySink::new();
        let out = Formatter::new(&settings, &r)
            .format("time", "a long line that is not wrapped", &[], 10, &mut sink)
            .unwrap()
            .unwrap();
        // " [NOW] " is one column short of " ERROR: "
        assert_eq!(ansi::strip(&out), " [NOW]  \na long line that is not wrapped");
    }

    #[test]
    fn test_format_unknown_type_reports_once() {
        let settings = plain_settings();
        let r = renderer();
        let mut sink = MemorySink::new();
        let out = Formatter::new(&settings, &r)
            .format("bogus", "x", &[], 80, &mut sink)
            .unwrap();

        assert_eq!(out, None);
        assert_eq!(sink.lines().len(), 1);
        let (stream, line) = &sink.lines()[0];
        assert_eq!(*stream, Stream::Error);
        let stripped = ansi::strip(line);
        assert!(stripped.contains("bogus"));
        assert!(stripped.ends_with("hr,error,ok,time"));
    }

    #[test]
    fn test_format_all_exempt_fails() {
        let mut settings = Settings::default();
        settings.set_flags(FlagSet::from_iter([("time", " T ")]));
        let r = renderer();
        let mut sink = MemorySink::new();
        let result = Formatter::new(&settings, &r).format("time", "x", &[], 80, &mut sink);
        assert!(matches!(result, Err(Error::NoIndentedFlags)));
    }
}
