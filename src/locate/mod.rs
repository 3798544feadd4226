//! Cache discovery for installed Discord builds
//!
//! Each build keeps its resource cache under the user's home directory at a
//! platform-specific location. Newer clients nest the entry files one level
//! deeper in `Cache_Data`; Linux Flatpak installs live under `~/.var/app`.

mod identity;

pub use identity::{Identity, Owner};

use crate::error::{DumpError, DumpResult};
use clap::ValueEnum;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Discord client release channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Build {
    Stable,
    Ptb,
    Canary,
    Development,
}

impl Build {
    /// All builds in the order they are searched
    pub fn all() -> &'static [Self] {
        &[Self::Stable, Self::Ptb, Self::Canary, Self::Development]
    }

    /// Display name, also used for the dump subdirectory
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stable => "Stable",
            Self::Ptb => "PTB",
            Self::Canary => "Canary",
            Self::Development => "Development",
        }
    }

    /// Name of the build's application data directory
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Stable => "discord",
            Self::Ptb => "discordptb",
            Self::Canary => "discordcanary",
            Self::Development => "discorddevelopment",
        }
    }

    /// Flatpak application id, e.g. `com.discordapp.DiscordCanary`
    pub fn flatpak_app_id(&self) -> String {
        let channel = self.dir_name().trim_start_matches("discord");
        format!("com.discordapp.Discord{}", title_case(channel))
    }
}

impl fmt::Display for Build {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Detected platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    MacOS,
    Windows,
    Unsupported,
}

impl Platform {
    /// Detect the current platform
    pub fn detect() -> Self {
        match std::env::consts::OS {
            "linux" => Platform::Linux,
            "macos" => Platform::MacOS,
            "windows" => Platform::Windows,
            _ => Platform::Unsupported,
        }
    }

    /// Get a human-readable platform name
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Linux => "Linux",
            Platform::MacOS => "macOS",
            Platform::Windows => "Windows",
            Platform::Unsupported => "Unsupported",
        }
    }

    /// Fail on platforms without a known cache layout
    pub fn ensure_supported(self) -> DumpResult<Self> {
        match self {
            Platform::Unsupported => Err(DumpError::UnsupportedPlatform(
                std::env::consts::OS.to_string(),
            )),
            supported => Ok(supported),
        }
    }

    /// Whether cache entries on this platform carry backend framing
    pub fn frames_entries(&self) -> bool {
        !matches!(self, Platform::Windows)
    }
}

/// Candidate cache directories for `build`, most specific first.
pub fn candidate_dirs(
    platform: Platform,
    home: &Path,
    build: Build,
    include_flatpak: bool,
) -> Vec<PathBuf> {
    let app_dir = match platform {
        Platform::Linux => home.join(".config").join(build.dir_name()),
        Platform::MacOS => home
            .join("Library")
            .join("Application Support")
            .join(build.dir_name()),
        Platform::Windows => home.join("AppData").join("Roaming").join(build.dir_name()),
        Platform::Unsupported => return Vec::new(),
    };

    let mut dirs = vec![app_dir.join("Cache").join("Cache_Data"), app_dir.join("Cache")];

    if platform == Platform::Linux && include_flatpak {
        dirs.push(
            home.join(".var")
                .join("app")
                .join(build.flatpak_app_id())
                .join("config")
                .join(build.dir_name())
                .join("Cache")
                .join("Cache_Data"),
        );
    }

    dirs
}

/// One file inside a cache directory
#[derive(Debug, Clone, Serialize)]
pub struct CacheEntry {
    /// File name, reused for the dumped copy
    pub name: String,
    /// Full path to the live cache file
    pub path: PathBuf,
    /// Size in bytes, `None` if the file could not be opened
    pub size: Option<u64>,
}

/// A cache directory found for one build
#[derive(Debug, Clone, Serialize)]
pub struct CacheLocation {
    pub build: Build,
    pub path: PathBuf,
    pub entries: Vec<CacheEntry>,
}

impl CacheLocation {
    /// Sum of the sizes of all readable entries
    pub fn readable_size(&self) -> u64 {
        self.entries.iter().filter_map(|e| e.size).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Locate the cache directory of each requested build.
///
/// Builds without an existing cache directory are left out. A directory that
/// exists but cannot be listed is an error.
pub fn discover(
    platform: Platform,
    home: &Path,
    builds: &[Build],
    include_flatpak: bool,
) -> DumpResult<Vec<CacheLocation>> {
    let mut locations = Vec::new();

    for build in builds {
        let candidates = candidate_dirs(platform, home, *build, include_flatpak);
        let Some(path) = candidates.into_iter().find(|p| p.is_dir()) else {
            debug!("No cache directory for Discord {}", build);
            continue;
        };

        debug!("Found Discord {} cache at {}", build, path.display());
        let entries = list_entries(&path)?;
        locations.push(CacheLocation {
            build: *build,
            path,
            entries,
        });
    }

    Ok(locations)
}

/// List the regular files directly inside `dir`, sorted by name
fn list_entries(dir: &Path) -> DumpResult<Vec<CacheEntry>> {
    let read_dir = fs::read_dir(dir)
        .map_err(|e| DumpError::io(format!("reading directory {}", dir.display()), e))?;

    let mut entries = Vec::new();
    for entry in read_dir {
        let entry = entry
            .map_err(|e| DumpError::io(format!("reading directory {}", dir.display()), e))?;
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        if !is_file {
            continue;
        }

        let path = entry.path();
        entries.push(CacheEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            size: readable_size(&path),
            path,
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Size of a file that can actually be opened for reading
fn readable_size(path: &Path) -> Option<u64> {
    fs::File::open(path)
        .and_then(|f| f.metadata())
        .map(|m| m.len())
        .ok()
}
