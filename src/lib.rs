//! Flagged, wrapped and colored terminal messages.
//!
//! Every message type has a flag, a short prefix such as ` 🔥  ERROR: `. The
//! message text is laid out to the right of the widest flag: `#` placeholders
//! are filled with variables, long lines wrap at the terminal width, and
//! continuation lines are indented so the text stays aligned.
//!
//! ```no_run
//! use drips::{Logger, Settings, vars};
//!
//! let mut log = Logger::new(Settings::default());
//! log.info("found # files in #", &vars![12, "src"])?;
//! log.hr()?;
//! # Ok::<(), drips::Error>(())
//! ```

pub mod ansi;
pub mod config;
pub mod error;
pub mod flags;
pub mod format;
pub mod output;
pub mod template;
pub mod wrap;

pub use config::Settings;
pub use error::{Error, Result};
pub use flags::{FlagSet, Renderer};
pub use format::Formatter;
pub use output::{Logger, MemorySink, Sink, StdSink, Stream};

#[doc(hidden)]
pub use serde_json;

/// Build a `Vec<serde_json::Value>` of message variables.
///
/// ```
/// let v = drips::vars![1, "two", [3]];
/// assert_eq!(v.len(), 3);
/// ```
#[macro_export]
macro_rules! vars {
    () => {
        ::std::vec::Vec::<$crate::serde_json::Value>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::serde_json::json!($value)),+]
    };
}
