//! Process-wide settings for message formatting.
//!
//! Settings are loaded from multiple sources with the following precedence:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (DRIPS_*)
//! 3. Explicit config file (--config)
//! 4. User global (~/.config/drips/config.yaml)
//! 5. Built-in defaults (lowest priority)
//!
//! The host application owns one [`Settings`] value and may change it between
//! formatting calls. A formatting call borrows it for its whole duration, so
//! width and wrap computations always see the same snapshot.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::flags::FlagSet;

// ============================================================================
// Settings
// ============================================================================

/// Formatting settings shared by every message call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Settings {
    /// Print `verbose` messages at all
    pub verbose_mode: bool,
    /// Regex a formatted verbose message must match to be printed
    pub verbose_filter: String,
    /// Indent variables rendered as JSON
    pub pretty: bool,
    /// Message types that skip wrapping and hanging indentation
    pub disable_indent: Vec<String>,
    /// Flag template per message type (`#timestamp#` is replaced on render)
    pub flags: FlagSet,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            verbose_mode: false,
            verbose_filter: String::new(),
            pretty: false,
            disable_indent: vec!["time".to_string()],
            flags: FlagSet::default(),
        }
    }
}

impl Settings {
    pub fn is_exempt(&self, kind: &str) -> bool {
        self.disable_indent.iter().any(|k| k == kind)
    }

    /// Replace the whole flag table.
    pub fn set_flags(&mut self, flags: FlagSet) {
        self.flags = flags;
    }

    /// Compile `verbose_filter`.
    pub fn verbose_regex(&self) -> Result<Regex> {
        Regex::new(&self.verbose_filter).map_err(|source| Error::InvalidFilter {
            pattern: self.verbose_filter.clone(),
            source,
        })
    }

    /// Apply the non-empty fields of `patch`. Flags are replaced as a whole.
    pub fn merge(&mut self, patch: SettingsPatch) {
        if let Some(v) = patch.verbose_mode {
            self.verbose_mode = v;
        }
        if let Some(v) = patch.verbose_filter {
            self.verbose_filter = v;
        }
        if let Some(v) = patch.pretty {
            self.pretty = v;
        }
        if let Some(v) = patch.disable_indent {
            self.disable_indent = v;
        }
        if let Some(v) = patch.flags {
            self.set_flags(v);
        }
    }

    /// Apply DRIPS_* environment overrides, returning the variables that were used.
    pub fn apply_env(&mut self) -> Vec<SettingSource> {
        let mut used = Vec::new();

        if let Some(v) = env_bool("DRIPS_VERBOSE") {
            self.verbose_mode = v;
            used.push(SettingSource::EnvVar("DRIPS_VERBOSE".to_string()));
        }
        if let Some(v) = env_string("DRIPS_VERBOSE_FILTER") {
            self.verbose_filter = v;
            used.push(SettingSource::EnvVar("DRIPS_VERBOSE_FILTER".to_string()));
        }
        if let Some(v) = env_bool("DRIPS_PRETTY") {
            self.pretty = v;
            used.push(SettingSource::EnvVar("DRIPS_PRETTY".to_string()));
        }

        for source in &used {
            debug!(%source, "applied environment override");
        }
        used
    }
}

/// A partial settings file. Absent keys leave the current value alone.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct SettingsPatch {
    pub verbose_mode: Option<bool>,
    pub verbose_filter: Option<String>,
    pub pretty: Option<bool>,
    pub disable_indent: Option<Vec<String>>,
    pub flags: Option<FlagSet>,
}

// ============================================================================
// Source tracking
// ============================================================================

/// Where a setting came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingSource {
    /// Built-in default
    Default,
    /// User global config (~/.config/drips/config.yaml)
    UserGlobal,
    /// Config file given on the command line
    File(PathBuf),
    /// Environment variable
    EnvVar(String),
    /// CLI flag
    CliFlag,
}

impl std::fmt::Display for SettingSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingSource::Default => write!(f, "default"),
            SettingSource::UserGlobal => write!(f, "~/.config/drips/config.yaml"),
            SettingSource::File(path) => write!(f, "{}", path.display()),
            SettingSource::EnvVar(name) => write!(f, "${}", name),
            SettingSource::CliFlag => write!(f, "CLI flag"),
        }
    }
}

/// Result of loading settings with source tracking.
#[derive(Debug)]
pub struct LoadedSettings {
    pub settings: Settings,
    /// Sources in order of application
    pub sources: Vec<SettingSource>,
}

// ============================================================================
// Environment Variable Registry
// ============================================================================

/// Environment variable definition for documentation.
pub struct EnvVar {
    pub name: &'static str,
    pub description: &'static str,
    pub default: &'static str,
    pub values: Option<&'static str>,
}

/// Registry of all supported environment variables.
pub const ENV_VARS: &[EnvVar] = &[
    EnvVar {
        name: "NO_COLOR",
        description: "Disable colored output (standard)",
        default: "unset",
        values: Some("any non-empty value"),
    },
    EnvVar {
        name: "FORCE_COLOR",
        description: "Force colored output even when not a TTY",
        default: "unset",
        values: Some("any non-empty value"),
    },
    EnvVar {
        name: "DRIPS_VERBOSE",
        description: "Print verbose messages",
        default: "false",
        values: Some("1, true, yes"),
    },
    EnvVar {
        name: "DRIPS_VERBOSE_FILTER",
        description: "Regex a verbose message must match",
        default: "empty (matches everything)",
        values: Some("regex"),
    },
    EnvVar {
        name: "DRIPS_PRETTY",
        description: "Indent variables rendered as JSON",
        default: "false",
        values: Some("1, true, yes"),
    },
    EnvVar {
        name: "DRIPS_WIDTH",
        description: "Line width used for wrapping",
        default: "terminal width (0 if unknown)",
        values: Some("number"),
    },
    EnvVar {
        name: "DRIPS_LOG",
        description: "Diagnostics filter for drips itself",
        default: "warn",
        values: Some("tracing env-filter directive"),
    },
];

// ============================================================================
// Environment Variable Helpers
// ============================================================================

/// Parse a boolean environment variable.
///
/// Returns `Some(true)` for 1/true/yes, `Some(false)` for 0/false/no,
/// and `None` if unset, empty or unrecognized.
pub fn env_bool(name: &str) -> Option<bool> {
    std::env::var(name).ok().and_then(|v| {
        if v.is_empty() {
            return None;
        }
        match v.to_lowercase().as_str() {
            "1" | "true" | "yes" => Some(true),
            "0" | "false" | "no" => Some(false),
            _ => None,
        }
    })
}

/// Returns `Some(value)` if set and non-empty, `None` otherwise.
pub fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

pub fn env_usize(name: &str) -> Option<usize> {
    env_string(name).and_then(|v| v.parse().ok())
}

// ============================================================================
// Loading
// ============================================================================

/// Get the user config file path (~/.config/drips/config.yaml).
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("drips").join("config.yaml"))
}

/// Read and parse a settings file.
pub fn load_patch(path: &Path) -> Result<SettingsPatch> {
    let content = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&content).map_err(|source| Error::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load settings from defaults, the user global file, `explicit` and the environment.
///
/// A broken user global file is skipped with a warning; a broken explicit
/// file is an error.
pub fn load_settings(explicit: Option<&Path>) -> Result<LoadedSettings> {
    load_settings_from(user_config_path().as_deref(), explicit)
}

fn load_settings_from(user: Option<&Path>, explicit: Option<&Path>) -> Result<LoadedSettings> {
    let mut settings = Settings::default();
    let mut sources = vec![SettingSource::Default];

    if let Some(path) = user.filter(|p| p.exists()) {
        match load_patch(path) {
            Ok(patch) => {
                debug!(path = %path.display(), "loaded user config");
                settings.merge(patch);
                sources.push(SettingSource::UserGlobal);
            }
            Err(e) => warn!("ignoring user config: {}", e),
        }
    }

    if let Some(path) = explicit {
        settings.merge(load_patch(path)?);
        debug!(path = %path.display(), "loaded config file");
        sources.push(SettingSource::File(path.to_path_buf()));
    }

    sources.extend(settings.apply_env());

    Ok(LoadedSettings { settings, sources })
}

/// Generate JSON schema for the settings file.
pub fn json_schema() -> String {
    let schema = schemars::schema_for!(Settings);
    serde_json::to_string_pretty(&schema).unwrap_or_else(|_| "{}".to_string())
}

/// Generate a template config file with comments.
pub fn template_config() -> String {
    r#"# drips configuration
# Place in ~/.config/drips/config.yaml or pass with --config

# Print verbose messages
# verbose_mode: false

# Regex a formatted verbose message must match (empty matches everything)
# verbose_filter: ''

# Indent variables rendered as JSON
# pretty: false

# Message types that skip wrapping and hanging indentation
# disable_indent: [time]

# Flag per message type. Replaces the whole table when given.
# '#timestamp#' is replaced with the current date and time.
# flags:
#   banner: ' 📣  '
#   error: ' 🔥  ERROR: '
#   info: ' 🔔  INFO: '
#   ok: ' 👍  '
#   done: ' 🚀  DONE: '
#   time: ' 🕐  [#timestamp#] '
#   verbose: ' 😬  VERBOSE: '
"#
    .to_string()
}

// ============================================================================
// Tests
// ============================================================================
