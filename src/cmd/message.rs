//! `drips <type> TEXT [VARS...]`: print one message.

use clap::Args;
use serde_json::Value;

use drips::{Logger, Sink};

#[derive(Args)]
pub struct MessageArgs {
    /// Message text; each `#` is replaced by the next variable
    #[arg(default_value = "")]
    text: String,

    /// Variables, parsed as JSON when valid and taken as strings otherwise
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    vars: Vec<String>,
}

pub fn run<S: Sink>(kind: &str, args: MessageArgs, logger: &mut Logger<S>) -> Result<(), String> {
    let vars: Vec<Value> = args.vars.iter().map(|v| parse_var(v)).collect();
    logger
        .log(kind, &args.text, &vars)
        .map_err(|e| e.to_string())
}

/// Parse a CLI variable: JSON if it parses, otherwise a plain string.
fn parse_var(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
