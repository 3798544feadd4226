//! CLI argument definitions using clap derive

use crate::dump::ExtractMode;
use crate::locate::Build;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// dcdump - Dump and recover Discord's on-disk resource cache
///
/// Copies the Chromium cache of every installed Discord build into a
/// timestamped directory, stripping the cache framing so images and other
/// resources open as regular files.
#[derive(Parser, Debug)]
#[command(name = "dcdump")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "DCDUMP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Home directory to search instead of the invoking user's
    #[arg(long, global = true, env = "DCDUMP_HOME")]
    pub home: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Dump the cache of every installed Discord build
    Dump(DumpArgs),

    /// List discovered cache directories
    Locate(LocateArgs),

    /// Recover the payload of a single cache file
    Extract(ExtractArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),
}

/// Arguments for the dump command
#[derive(Parser, Debug)]
pub struct DumpArgs {
    /// Builds to dump (defaults to all)
    #[arg(short, long, value_delimiter = ',', ignore_case = true)]
    pub build: Vec<Build>,

    /// Don't wait for confirmation before copying
    #[arg(short, long)]
    pub noninteractive: bool,

    /// Output directory (default: from config)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// When to strip the cache framing (default: from config)
    #[arg(long)]
    pub extract: Option<ExtractMode>,

    /// Keep original file names instead of appending the detected type
    #[arg(long)]
    pub no_tag: bool,

    /// Concurrent copy jobs (default: from config)
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    pub jobs: Option<u16>,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the locate command
#[derive(Parser, Debug)]
pub struct LocateArgs {
    /// Builds to look for (defaults to all)
    #[arg(short, long, value_delimiter = ',', ignore_case = true)]
    pub build: Vec<Build>,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the extract command
#[derive(Parser, Debug)]
pub struct ExtractArgs {
    /// Cache file to read
    pub input: PathBuf,

    /// Where to write the payload (defaults to <INPUT>.out)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Keep the output name instead of appending the detected type
    #[arg(long)]
    pub no_tag: bool,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}

impl OutputFormat {
    /// Whether step and progress output should be suppressed
    pub fn is_machine(self) -> bool {
        !matches!(self, Self::Table)
    }
}

/// Builds selected on the command line, or every build when none were given
pub fn selected_builds(builds: &[Build]) -> Vec<Build> {
    if builds.is_empty() {
        return Build::all().to_vec();
    }
    let mut builds = builds.to_vec();
    builds.sort();
    builds.dedup();
    builds
}
