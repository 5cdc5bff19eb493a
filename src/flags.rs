//! Message flags: the per-type prefix templates and their layout width.
//!
//! A flag template may embed magic tokens such as `#timestamp#`. Tokens are
//! resolved by a [`Renderer`] before any width is measured, so new tokens can
//! be registered without touching the wrapping code.

use std::collections::BTreeMap;
use std::fmt;

use chrono::Local;
use schemars::JsonSchema;
use schemars::r#gen::SchemaGenerator;
use schemars::schema::Schema;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ansi;
use crate::error::{Error, Result};
use crate::wrap::visible_width;

/// Token replaced with the current local date and time.
pub const TIMESTAMP_TOKEN: &str = "#timestamp#";

// ============================================================================
// FlagSet
// ============================================================================

/// Ordered mapping of message type to flag template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSet(Vec<(String, String)>);

impl FlagSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert or replace the template for `kind`, keeping its position.
    pub fn insert(&mut self, kind: impl Into<String>, template: impl Into<String>) {
        let kind = kind.into();
        let template = template.into();
        match self.0.iter_mut().find(|(k, _)| *k == kind) {
            Some(entry) => entry.1 = template,
            None => self.0.push((kind, template)),
        }
    }

    pub fn get(&self, kind: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == kind)
            .map(|(_, t)| t.as_str())
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.get(kind).is_some()
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, t)| (k.as_str(), t.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for FlagSet {
    fn default() -> Self {
        [
            ("banner", " 📣  ".to_string()),
            ("error", " 🔥  ERROR: ".to_string()),
            ("info", " 🔔  INFO: ".to_string()),
            ("ok", " 👍  ".to_string()),
            ("done", " 🚀  DONE: ".to_string()),
            ("time", format!(" 🕐  [{}] ", ansi::bold(TIMESTAMP_TOKEN))),
            ("verbose", " 😬  VERBOSE: ".to_string()),
        ]
        .into_iter()
        .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FlagSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = FlagSet::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}

impl Serialize for FlagSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct FlagSetVisitor;

impl<'de> Visitor<'de> for FlagSetVisitor {
    type Value = FlagSet;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a mapping of message type to flag template")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<FlagSet, A::Error> {
        let mut set = FlagSet::new();
        while let Some((k, v)) = access.next_entry::<String, String>()? {
            set.insert(k, v);
        }
        Ok(set)
    }
}

impl<'de> Deserialize<'de> for FlagSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(FlagSetVisitor)
    }
}

impl JsonSchema for FlagSet {
    fn schema_name() -> String {
        "FlagSet".to_string()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        <BTreeMap<String, String>>::json_schema(generator)
    }
}

// ============================================================================
// Token resolution
// ============================================================================

type Resolve = Box<dyn Fn() -> String + Send + Sync>;

/// Replaces magic tokens in flag templates (and in measured words).
pub struct Renderer {
    resolvers: Vec<(String, Resolve)>,
}

impl Renderer {
    /// A renderer with no tokens registered.
    pub fn empty() -> Self {
        Self {
            resolvers: Vec::new(),
        }
    }

    /// Register `token`, replacing any resolver already bound to it.
    pub fn with_token<F>(mut self, token: impl Into<String>, resolve: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        let token = token.into();
        self.resolvers.retain(|(t, _)| *t != token);
        self.resolvers.push((token, Box::new(resolve)));
        self
    }

    pub fn render(&self, template: &str) -> String {
        let mut out = template.to_string();
        for (token, resolve) in &self.resolvers {
            if out.contains(token.as_str()) {
                out = out.replace(token.as_str(), &resolve());
            }
        }
        out
    }

    /// Visible width of `text` after token resolution.
    pub fn rendered_width(&self, text: &str) -> usize {
        visible_width(&self.render(text))
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::empty().with_token(TIMESTAMP_TOKEN, timestamp)
    }
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tokens: Vec<&str> = self.resolvers.iter().map(|(t, _)| t.as_str()).collect();
        f.debug_struct("Renderer").field("tokens", &tokens).finish()
    }
}

/// Current local time, e.g. `Sun Oct 18 2026 14:03:12 GMT+0200`.
///
/// No parenthesized zone name follows the offset; chrono has no portable
/// zone names.
pub fn timestamp() -> String {
    Local::now().format("%a %b %d %Y %H:%M:%S GMT%z").to_string()
}

// ============================================================================
// Layout
// ============================================================================

/// Widest visible flag among the types that are not indent-exempt.
pub fn widest_flag_width(flags: &FlagSet, exempt: &[String], renderer: &Renderer) -> Result<usize> {
    flags
        .iter()
        .filter(|(kind, _)| !exempt.iter().any(|e| e == kind))
        .map(|(_, template)| renderer.rendered_width(template))
        .max()
        .ok_or(Error::NoIndentedFlags)
}

/// The rendered flag for `kind`, padded with spaces to `widest` visible columns.
///
/// An unknown `kind` yields only the padding.
pub fn shoulder(kind: &str, flags: &FlagSet, widest: usize, renderer: &Renderer) -> String {
    let flag = renderer.render(flags.get(kind).unwrap_or_default());
    let pad = widest.saturating_sub(visible_width(&flag));
    format!("{}{}", flag, " ".repeat(pad))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_renderer() -> Renderer {
        Renderer::empty().with_token(TIMESTAMP_TOKEN, || "12:00".to_string())
    }

    fn exempt_time() -> Vec<String> {
        vec!["time".to_string()]
    }

    #[test]
    fn test_default_flags_order() {
        let flags = FlagSet::default();
        let kinds: Vec<&str> = flags.kinds().collect();
        assert_eq!(
            kinds,
            vec!["banner", "error", "info", "ok", "done", "time", "verbose"]
        );
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut flags: FlagSet = [("a", "A"), ("b", "B")].into_iter().collect();
        flags.insert("a", "AA");
        assert_eq!(flags.iter().collect::<Vec<_>>(), vec![("a", "AA"), ("b", "B")]);
        assert_eq!(flags.len(), 2);
    }

    #[test]
    fn test_render_replaces_every_token() {
        let r = fixed_renderer();
        assert_eq!(r.render("[#timestamp#] #timestamp#"), "[12:00] 12:00");
        assert_eq!(r.render("no token"), "no token");
    }

    #[test]
    fn test_render_custom_token() {
        let r = fixed_renderer().with_token("#host#", || "box".to_string());
        assert_eq!(r.render("#host# @ #timestamp#"), "box @ 12:00");
    }

    #[test]
    fn test_default_renderer_fills_timestamp() {
        let rendered = Renderer::default().render(TIMESTAMP_TOKEN);
        assert!(!rendered.contains(TIMESTAMP_TOKEN));
        assert!(rendered.contains("GMT"));
    }

    #[test]
    fn test_widest_flag_width_skips_exempt() {
        let flags: FlagSet = [
            ("error", " ERROR: ".to_string()),
            ("ok", " ok ".to_string()),
            ("time", format!(" [{}] a very long time flag ", ansi::bold(TIMESTAMP_TOKEN))),
        ]
        .into_iter()
        .collect();

        let widest = widest_flag_width(&flags, &exempt_time(), &fixed_renderer()).unwrap();
        assert_eq!(widest, 8);
    }

    #[test]
    fn test_widest_flag_width_ignores_ansi() {
        let flags: FlagSet = [("a", ansi::red(ansi::bold("ABC"))), ("b", "AB".to_string())]
            .into_iter()
            .collect();
        assert_eq!(widest_flag_width(&flags, &[], &fixed_renderer()).unwrap(), 3);
    }

    #[test]
    fn test_widest_flag_width_all_exempt_fails() {
        let flags: FlagSet = [("time", "t")].into_iter().collect();
        let result = widest_flag_width(&flags, &exempt_time(), &fixed_renderer());
        assert!(matches!(result, Err(Error::NoIndentedFlags)));
    }

    #[test]
    fn test_shoulder_matches_widest_for_every_type() {
        let flags = FlagSet::default();
        let r = fixed_renderer();
        let widest = widest_flag_width(&flags, &exempt_time(), &r).unwrap();

        for kind in flags.kinds().filter(|k| *k != "time") {
            let s = shoulder(kind, &flags, widest, &r);
            assert_eq!(visible_width(&s), widest, "kind: {}", kind);
        }
    }

    #[test]
    fn test_shoulder_widest_has_no_padding() {
        let flags: FlagSet = [("error", " ERROR: "), ("ok", " OK ")].into_iter().collect();
        let r = fixed_renderer();
        let widest = widest_flag_width(&flags, &[], &r).unwrap();
        assert_eq!(shoulder("error", &flags, widest, &r), " ERROR: ");
        assert_eq!(shoulder("ok", &flags, widest, &r), " OK     ");
    }

    #[test]
    fn test_shoulder_exempt_longer_than_widest() {
        let flags = FlagSet::default();
        let r = Renderer::empty().with_token(TIMESTAMP_TOKEN, || "Sun Oct 18 2026".to_string());
        let widest = widest_flag_width(&flags, &exempt_time(), &r).unwrap();
        assert_eq!(widest, 14);

        // 23 columns, wider than every indented flag: no padding, no truncation
        let s = shoulder("time", &flags, widest, &r);
        assert_eq!(ansi::strip(&s), " 🕐  [Sun Oct 18 2026] ");
        assert_eq!(visible_width(&s), 23);
    }

    #[test]
    fn test_shoulder_exempt_shorter_than_widest_is_padded() {
        let flags = FlagSet::default();
        let r = fixed_renderer();
        let widest = widest_flag_width(&flags, &exempt_time(), &r).unwrap();
        let s = shoulder("time", &flags, widest, &r);
        assert_eq!(ansi::strip(&s), " 🕐  [12:00]  ");
    }

    #[test]
    fn test_flagset_yaml_roundtrip_keeps_order() {
        let yaml = "zeta: ' Z '\nalpha: ' A '\n";
        let flags: FlagSet = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(flags.kinds().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
        let again: FlagSet = serde_yaml::from_str(&serde_yaml::to_string(&flags).unwrap()).unwrap();
        assert_eq!(again, flags);
        assert_eq!(again.get("zeta"), Some(" Z "));
    }
}
