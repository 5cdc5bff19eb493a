//! `drips flags`: show every message type with its rendered shoulder.

use drips::{Logger, Sink, flags};

pub fn run<S: Sink>(logger: &Logger<S>) -> Result<(), String> {
    let settings = logger.settings();
    let renderer = logger.renderer();

    let widest = flags::widest_flag_width(&settings.flags, &settings.disable_indent, renderer)
        .map_err(|e| e.to_string())?;

    for kind in settings.flags.kinds() {
        let shoulder = flags::shoulder(kind, &settings.flags, widest, renderer);
        let note = if settings.is_exempt(kind) {
            " (no indent)"
        } else {
            ""
        };
        println!("{}| {}{}", shoulder, kind, note);
    }
    println!();
    println!("widest flag: {} columns, line width: {}", widest, logger.width());

    Ok(())
}
