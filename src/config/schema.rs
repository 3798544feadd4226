//! Configuration schema for dcdump
//!
//! Configuration is stored at `~/.config/dcdump/config.toml`

use crate::dump::ExtractMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Dump defaults
    pub dump: DumpConfig,
}

/// General application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Format of diagnostic logs on stderr
    pub log_format: LogFormat,
}

/// Diagnostic log format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Dump settings, each overridable from the command line
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DumpConfig {
    /// Directory receiving the timestamped run directories
    pub output_dir: PathBuf,

    /// When to strip the cache framing from copied entries
    pub extract: ExtractMode,

    /// Append a sniffed file extension to recognized copies
    pub tag_files: bool,

    /// Concurrent copy jobs per build
    pub jobs: usize,

    /// Also look for the Flatpak install on Linux
    pub include_flatpak: bool,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("dump"),
            extract: ExtractMode::Auto,
            tag_files: true,
            jobs: default_jobs(),
            include_flatpak: true,
        }
    }
}

impl Config {
    /// Check values the type system cannot rule out
    pub fn validate(&self) -> Result<(), String> {
        if self.dump.jobs == 0 {
            return Err("dump.jobs must be at least 1".to_string());
        }
        if self.dump.output_dir.as_os_str().is_empty() {
            return Err("dump.output_dir must not be empty".to_string());
        }
        Ok(())
    }
}

fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}
