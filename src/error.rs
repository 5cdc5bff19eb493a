//! Error type shared by the formatting engine and the output layer.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The verbose filter does not compile as a regex.
    #[error("invalid verbose filter `{pattern}`: {source}")]
    InvalidFilter {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Every flag is indent-exempt, so there is no width to align to.
    #[error("no flag takes part in indentation (all types are in disable_indent)")]
    NoIndentedFlags,

    /// Writing to an output stream failed.
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to read {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
