//! Shared CLI arguments: settings overrides that apply to every command.

use std::path::PathBuf;

use clap::Args;

use drips::config::{self, LoadedSettings, SettingSource, env_usize};

/// Global flags, resolved on top of config files and environment.
#[derive(Args, Clone, Debug, Default)]
pub struct SettingsArgs {
    /// Config file (YAML), applied after ~/.config/drips/config.yaml
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Line width for wrapping (default: terminal width)
    #[arg(short = 'w', long, value_name = "N", global = true)]
    pub width: Option<usize>,

    /// Print verbose messages
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Regex a verbose message must match
    #[arg(long, value_name = "REGEX", global = true)]
    pub filter: Option<String>,

    /// Indent JSON variables
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

impl SettingsArgs {
    /// Load settings from all sources, then apply CLI flags.
    pub fn load(&self) -> Result<LoadedSettings, String> {
        let mut loaded = config::load_settings(self.config.as_deref()).map_err(|e| e.to_string())?;

        let settings = &mut loaded.settings;
        let mut from_cli = false;
        if self.verbose {
            settings.verbose_mode = true;
            from_cli = true;
        }
        if let Some(filter) = &self.filter {
            settings.verbose_filter = filter.clone();
            from_cli = true;
        }
        if self.pretty {
            settings.pretty = true;
            from_cli = true;
        }
        if from_cli {
            loaded.sources.push(SettingSource::CliFlag);
        }

        Ok(loaded)
    }

    /// Width override from --width or DRIPS_WIDTH.
    pub fn width(&self) -> Option<usize> {
        self.width.or_else(|| env_usize("DRIPS_WIDTH"))
    }

    /// Apply --no-color / FORCE_COLOR to the global color switch.
    pub fn apply_color(&self) {
        if self.no_color {
            colored::control::set_override(false);
        } else if config::env_string("FORCE_COLOR").is_some() {
            colored::control::set_override(true);
        }
    }
}
