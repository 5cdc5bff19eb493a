//! Configuration introspection command.
//!
//! Provides `drips config` subcommands:
//! - show: Display resolved settings
//! - env: List environment variables
//! - schema: Output JSON schema
//! - init: Create template config file

use std::fs;
use std::path::PathBuf;

use clap::{Args, Subcommand};

use drips::config::{self, ENV_VARS, LoadedSettings, template_config, user_config_path};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show resolved settings
    Show(ShowArgs),

    /// List environment variables
    Env,

    /// Output JSON schema for config validation
    Schema,

    /// Create template config file
    Init(InitArgs),
}

#[derive(Args)]
struct ShowArgs {
    /// Show where values came from
    #[arg(long)]
    effective: bool,
}

#[derive(Args)]
struct InitArgs {
    /// File to create (default: ~/.config/drips/config.yaml)
    path: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

pub fn run(args: ConfigArgs, loaded: &LoadedSettings) -> Result<(), String> {
    match args.command {
        ConfigCommand::Show(show_args) => run_show(loaded, show_args.effective),
        ConfigCommand::Env => run_env(),
        ConfigCommand::Schema => run_schema(),
        ConfigCommand::Init(init_args) => run_init(init_args),
    }
}

fn run_show(loaded: &LoadedSettings, effective: bool) -> Result<(), String> {
    if effective {
        println!("# Resolved settings");
        println!("# Sources (in order of application):");
        for source in &loaded.sources {
            println!("#   - {}", source);
        }
        println!();
    }

    let yaml = serde_yaml::to_string(&loaded.settings)
        .map_err(|e| format!("failed to serialize settings: {}", e))?;
    println!("{}", yaml.trim());

    Ok(())
}

fn run_env() -> Result<(), String> {
    println!("Environment Variables:");
    println!();

    for var in ENV_VARS {
        println!("  {}", var.name);
        println!("    {}", var.description);
        if let Some(values) = var.values {
            println!("    Values: {}", values);
        }
        println!("    Default: {}", var.default);
        println!();
    }

    Ok(())
}

fn run_schema() -> Result<(), String> {
    println!("{}", config::json_schema());
    Ok(())
}

fn run_init(args: InitArgs) -> Result<(), String> {
    let path = match args.path {
        Some(path) => path,
        None => user_config_path().ok_or("cannot determine user config directory")?,
    };

    if path.exists() && !args.force {
        return Err(format!(
            "config already exists: {}\nUse --force to overwrite",
            path.display()
        ));
    }

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| format!("failed to create {}: {}", dir.display(), e))?;
    }

    fs::write(&path, template_config())
        .map_err(|e| format!("failed to write {}: {}", path.display(), e))?;

    println!("Created: {}", path.display());

    Ok(())
}
