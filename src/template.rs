//! Placeholder substitution for message templates.
//!
//! `#` marks a slot. Slots are filled left to right with the supplied
//! variables, rendered as JSON and highlighted in yellow. Slots without a
//! variable keep their literal `#`; variables without a slot are appended
//! after a single space.

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::ansi;

/// Placeholder marker inside a message template.
pub const PLACEHOLDER: char = '#';

/// Render a variable as JSON, compact or with one-space indentation.
pub fn stringify(value: &Value, pretty: bool) -> String {
    let value = &integral_floats(value);
    if !pretty {
        return value.to_string();
    }

    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b" "));
    match value.serialize(&mut ser) {
        Ok(()) => String::from_utf8(buf).unwrap_or_else(|_| value.to_string()),
        Err(_) => value.to_string(),
    }
}

// Largest magnitude where every whole f64 converts to i64 without saturating.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Whole floats that fit in an i64 print as integers (`1.0` -> `1`).
fn integral_floats(value: &Value) -> Value {
    match value {
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(&f) => Value::from(f as i64),
            _ => value.clone(),
        },
        Value::Array(items) => Value::Array(items.iter().map(integral_floats).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), integral_floats(v)))
                .collect(),
        ),
        _ => value.clone(),
    }
}

fn highlight(value: &Value, pretty: bool) -> String {
    ansi::yellow(stringify(value, pretty))
}

/// Insert `vars` into `template`. Styling on the template itself is dropped.
pub fn expand(template: &str, vars: &[Value], pretty: bool) -> String {
    let message = ansi::strip(template);
    let slots = message.matches(PLACEHOLDER).count();

    let mut out = String::with_capacity(message.len());
    for (i, fragment) in message.split(PLACEHOLDER).enumerate() {
        out.push_str(fragment);
        match vars.get(i) {
            Some(value) if i != slots => out.push_str(&highlight(value, pretty)),
            _ => out.push(PLACEHOLDER),
        }
    }
    // The last fragment always gets a synthetic marker
    out.pop();

    if slots < vars.len() {
        let surplus: Vec<String> = vars[slots..]
            .iter()
            .map(|v| highlight(v, pretty))
            .collect();
        out.push(' ');
        out.push_str(&surplus.join(" "));
    }

    out
}
