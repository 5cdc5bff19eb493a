use std::io;
use std::process;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::env::CompleteEnv;
use clap_complete::{Shell, generate};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use drips::Logger;

mod args;
mod cmd;
mod input;

#[derive(Parser)]
#[command(name = "drips")]
#[command(version = env!("DRIPS_VERSION"))]
#[command(about = "Flagged, wrapped and colored terminal messages")]
#[command(
    long_about = "drips - Print tagged messages for shell scripts and CLI tools.\n\nEach message type has a flag prefix. Text is wrapped to the terminal width\nand continuation lines are indented under the widest flag. Every `#` in the\ntext is replaced by the next variable."
)]
struct Cli {
    #[command(flatten)]
    settings: args::SettingsArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a banner message
    Banner(cmd::message::MessageArgs),

    /// Print an error message (stderr)
    Error(cmd::message::MessageArgs),

    /// Print an info message
    Info(cmd::message::MessageArgs),

    /// Print a success message
    Ok(cmd::message::MessageArgs),

    /// Print a completion message
    Done(cmd::message::MessageArgs),

    /// Print a timestamped message
    Time(cmd::message::MessageArgs),

    /// Print a message only in verbose mode
    Verbose(cmd::message::MessageArgs),

    /// Print a horizontal rule
    Hr,

    /// Show message types and their flags
    Flags,

    /// Remove ANSI escape codes
    Strip(cmd::strip::StripArgs),

    /// Configuration introspection
    Config(cmd::config_cmd::ConfigArgs),

    /// Generate shell completion script
    Completion(CompletionArgs),
}

#[derive(clap::Args)]
struct CompletionArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: CompletionShell,
}

#[derive(Clone, ValueEnum)]
enum CompletionShell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("DRIPS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    // Handle dynamic shell completions
    CompleteEnv::with_factory(Cli::command).complete();

    // Use try_parse to catch errors and normalize exit code
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // Exit with 0 for help/version, 1 for actual errors
            let exit_code = if e.kind() == clap::error::ErrorKind::DisplayHelp
                || e.kind() == clap::error::ErrorKind::DisplayVersion
            {
                0
            } else {
                1
            };
            process::exit(exit_code);
        }
    };

    init_tracing();

    if let Commands::Completion(args) = &cli.command {
        let shell = match args.shell {
            CompletionShell::Bash => Shell::Bash,
            CompletionShell::Zsh => Shell::Zsh,
            CompletionShell::Fish => Shell::Fish,
            CompletionShell::Powershell => Shell::PowerShell,
        };
        generate(shell, &mut Cli::command(), "drips", &mut io::stdout());
        return;
    }

    cli.settings.apply_color();

    let loaded = match cli.settings.load() {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            process::exit(1);
        }
    };

    let mut logger = Logger::new(loaded.settings.clone());
    if let Some(width) = cli.settings.width() {
        logger = logger.fixed_width(width);
    }

    let result = match cli.command {
        Commands::Banner(args) => cmd::message::run("banner", args, &mut logger),
        Commands::Error(args) => cmd::message::run("error", args, &mut logger),
        Commands::Info(args) => cmd::message::run("info", args, &mut logger),
        Commands::Ok(args) => cmd::message::run("ok", args, &mut logger),
        Commands::Done(args) => cmd::message::run("done", args, &mut logger),
        Commands::Time(args) => cmd::message::run("time", args, &mut logger),
        Commands::Verbose(args) => cmd::message::run("verbose", args, &mut logger),
        Commands::Hr => logger.hr().map_err(|e| e.to_string()),
        Commands::Flags => cmd::flags::run(&logger),
        Commands::Strip(args) => cmd::strip::run(args),
        Commands::Config(args) => cmd::config_cmd::run(args, &loaded),
        Commands::Completion(_) => unreachable!(), // Handled above
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        process::exit(1);
    }
}
