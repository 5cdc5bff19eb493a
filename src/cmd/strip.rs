//! `drips strip`: remove ANSI escape codes from text or stdin.

use clap::Args;

use drips::ansi;

use crate::input;

#[derive(Args)]
pub struct StripArgs {
    /// Text to strip (reads stdin if omitted)
    text: Option<String>,
}

pub fn run(args: StripArgs) -> Result<(), String> {
    let text = match args.text {
        Some(text) => text,
        None => input::read_stdin().ok_or("no text given and stdin is a terminal")?,
    };

    print!("{}", ansi::strip(&text));
    if needs_trailing_newline(&text) {
        println!();
    }
    Ok(())
}

fn needs_trailing_newline(text: &str) -> bool {
    !text.is_empty() && !text.ends_with('\n')
}
