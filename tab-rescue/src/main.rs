//! tab-rescue: recover tabs from a crashed Chromium browser
//!
//! Reads the `Current Tabs` or `Current Session` file of a profile and
//! prints the tabs it can recover.
//!
//! # Commands
//!
//! - `tab-rescue tabs` - List recovered tabs
//! - `tab-rescue urls` - Print URLs of the tabs to reopen
//! - `tab-rescue records` - Dump every decoded record
//! - `tab-rescue summary` - File header and record statistics

mod recover;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use snss_reader::SessionFileKind;
use tracing_subscriber::{fmt, EnvFilter};

use recover::{OutputFormat, Request};

/// tab-rescue - Chromium session recovery
///
/// Decodes the session files a Chromium profile leaves behind and lists the
/// tabs that were open.
#[derive(Parser)]
#[command(name = "tab-rescue")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Browser profile directory holding the session files
    #[arg(long, global = true, env = "TAB_RESCUE_PROFILE_DIR", value_name = "PATH")]
    profile_dir: Option<PathBuf>,

    /// Session file to read (tabs or session)
    #[arg(long, global = true, default_value = "tabs")]
    file: SessionFileKind,

    /// Read this file instead of the one in the profile directory
    #[arg(long, global = true, value_name = "FILE")]
    path: Option<PathBuf>,

    /// Output format (text or json)
    #[arg(short, long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

// LCOV_EXCL_START - Enum field definitions
#[derive(Subcommand)]
enum Commands {
    /// List recovered tabs
    ///
    /// Examples:
    ///   tab-rescue tabs
    ///   tab-rescue --file session tabs --format json
    ///   tab-rescue tabs --drop 12 --drop 40
    Tabs {
        /// Mark a tab as not kept (repeatable)
        #[arg(long = "drop", value_name = "TAB_ID")]
        drop: Vec<u32>,
    },

    /// Print the URLs of kept tabs, one per line
    Urls {
        /// Leave this tab out (repeatable)
        #[arg(long = "drop", value_name = "TAB_ID")]
        drop: Vec<u32>,
    },

    /// Dump every decoded record
    Records,

    /// Show file header and record statistics
    Summary,
}
// LCOV_EXCL_STOP

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays pipeable.
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    let target = recover::profile::resolve(
        cli.path.as_deref(),
        cli.profile_dir.as_deref(),
        cli.file,
    )?;

    let request = match cli.command {
        Commands::Tabs { drop } => Request::Tabs { drop },
        Commands::Urls { drop } => Request::Urls { drop },
        Commands::Records => Request::Records,
        Commands::Summary => Request::Summary,
    };

    let output = recover::run(&target, &request, cli.format)?;
    print!("{}", output);
    Ok(())
}
