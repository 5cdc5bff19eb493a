//! Stdin input utilities.

use std::io::{self, IsTerminal, Read};

/// Read all of stdin if piped (not a terminal).
///
/// Returns `None` if stdin is a terminal or cannot be read.
pub fn read_stdin() -> Option<String> {
    if io::stdin().is_terminal() {
        return None;
    }
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).ok()?;
    Some(buffer)
}
