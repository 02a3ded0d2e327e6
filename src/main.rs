use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use moirai::config::AppConfig;
use moirai::transport::cli::{self, DiffAgainst};

#[derive(Parser)]
#[command(name = "moirai")]
#[command(author, version, about = "Moirai - switch and edit oh-my-opencode profiles", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding the profiles (default: ~/.config/opencode)
    #[arg(long, global = true, value_name = "DIR")]
    config_dir: Option<String>,

    /// Allow autofill to modify profiles (overrides moirai.json)
    #[arg(
        long,
        global = true,
        value_name = "BOOL",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    enable_autofill: Option<bool>,

    /// Write logs of the interactive UI to this file
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive profile manager (default)
    Tui,

    /// List profiles and show the active one
    List,

    /// Make a profile the active one
    Apply {
        /// Profile name
        profile: String,
    },

    /// Report agents without a model (exit code 2 if any)
    Doctor {
        /// Profile name
        profile: String,
    },

    /// Create a timestamped backup of a profile
    Backup {
        /// Profile name
        profile: String,
    },

    /// List backups of a profile, newest first
    Backups {
        /// Profile name
        profile: String,
    },

    /// Restore a profile from one of its backups
    Restore {
        /// Profile name
        profile: String,

        /// Backup file name or path inside the config dir
        #[arg(long)]
        from: String,
    },

    /// Show a colored diff of a profile (exit code 2 if there is nothing to compare)
    Diff {
        /// Profile name
        #[arg(required_unless_present = "between")]
        profile: Option<String>,

        /// What to compare the profile against
        #[arg(long, value_enum, default_value = "last-backup")]
        against: DiffAgainst,

        /// Compare two profiles instead
        #[arg(long, num_args = 2, value_names = ["A", "B"], conflicts_with = "profile")]
        between: Option<Vec<String>>,
    },

    /// Fill agents without a model from a preset (exit code 3 if disabled)
    Autofill {
        /// Profile name
        profile: String,

        /// Preset name
        #[arg(long, default_value = "openai")]
        preset: String,
    },
}

fn init_logging(verbose: bool, interactive: bool, log_file: Option<&PathBuf>) -> Result<()> {
    let filter = if verbose { "moirai=debug" } else { "moirai=info" };

    // The interactive UI owns the terminal, so its logs never go to stderr
    let (writer, ansi) = match (interactive, log_file) {
        (_, Some(path)) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        (true, None) => (BoxMakeWriter::new(std::io::sink), false),
        (false, None) => (BoxMakeWriter::new(std::io::stderr), true),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(ansi),
        )
        .init();
    Ok(())
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let interactive = matches!(cli.command, None | Some(Commands::Tui));
    init_logging(cli.verbose, interactive, cli.log_file.as_ref())?;

    let config = AppConfig::load(cli.config_dir.as_deref(), cli.enable_autofill)?;
    tracing::debug!("Using config dir {}", config.config_dir.display());

    let code = match cli.command {
        None | Some(Commands::Tui) => {
            moirai::tui::run(&config)?;
            cli::EXIT_OK
        }
        Some(Commands::List) => cli::run_list(&config)?,
        Some(Commands::Apply { profile }) => cli::run_apply(&config, &profile)?,
        Some(Commands::Doctor { profile }) => cli::run_doctor(&config, &profile)?,
        Some(Commands::Backup { profile }) => cli::run_backup(&config, &profile)?,
        Some(Commands::Backups { profile }) => cli::run_backups(&config, &profile)?,
        Some(Commands::Restore { profile, from }) => cli::run_restore(&config, &profile, &from)?,
        Some(Commands::Diff {
            profile,
            against,
            between,
        }) => {
            let between = between
                .as_deref()
                .and_then(|pair| match pair {
                    [a, b] => Some((a.as_str(), b.as_str())),
                    _ => None,
                });
            cli::run_diff(&config, profile.as_deref(), against, between)?
        }
        Some(Commands::Autofill { profile, preset }) => {
            cli::run_autofill(&config, &profile, &preset)?
        }
    };

    Ok(ExitCode::from(code))
}
