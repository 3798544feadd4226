//! Copying located caches into a dump directory
//!
//! Entries of one build are copied concurrently on the blocking thread pool.
//! Counters are folded from per-entry outcomes once each copy finishes, so
//! no state is shared between the copy jobs.

mod copy;
mod layout;

pub use copy::{copy_entry, CopyOptions, CopyOutcome};
pub use layout::{run_dir_name, DumpLayout};

use crate::error::{DumpError, DumpResult};
use crate::locate::{Build, CacheLocation, Owner, Platform};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::task::JoinSet;
use tracing::debug;

/// When to run the payload extractor on copied entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExtractMode {
    /// Extract on platforms whose cache entries are framed (all but Windows)
    #[default]
    Auto,
    /// Always extract
    Always,
    /// Copy entries verbatim
    Never,
}

impl ExtractMode {
    /// Whether extraction runs on `platform`
    pub fn applies(self, platform: Platform) -> bool {
        match self {
            Self::Auto => platform.frames_entries(),
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// Counters for one build's dump
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub build: Build,
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Entries present in the cache directory
    pub found: usize,
    /// Entries written to the dump
    pub copied: usize,
    /// Entries that could not be read
    pub unreadable: usize,
    /// Copies whose framing was recognized and stripped
    pub recovered: usize,
    /// Copies renamed after their sniffed type
    pub identified: usize,
    /// Bytes written
    pub bytes: u64,
}

impl BuildReport {
    fn new(location: &CacheLocation, destination: &Path) -> Self {
        Self {
            build: location.build,
            source: location.path.clone(),
            destination: destination.to_path_buf(),
            found: location.entries.len(),
            copied: 0,
            unreadable: 0,
            recovered: 0,
            identified: 0,
            bytes: 0,
        }
    }

    fn record(&mut self, outcome: &CopyOutcome) {
        match outcome {
            CopyOutcome::Copied {
                bytes,
                extraction,
                extension,
                ..
            } => {
                self.copied += 1;
                self.bytes += bytes;
                if extraction.is_some_and(|o| o.is_recognized()) {
                    self.recovered += 1;
                }
                if extension.is_some() {
                    self.identified += 1;
                }
            }
            CopyOutcome::Unreadable => self.unreadable += 1,
        }
    }
}

/// Copy every entry of `location` into `destination`.
///
/// At most `jobs` copies run at once. `on_entry` is called as each copy
/// completes. The first write failure aborts the build.
pub async fn dump_location(
    location: &CacheLocation,
    destination: &Path,
    options: CopyOptions,
    jobs: usize,
    on_entry: &(dyn Fn(&CopyOutcome) + Send + Sync),
) -> DumpResult<BuildReport> {
    let jobs = jobs.max(1);
    let mut report = BuildReport::new(location, destination);
    let mut tasks = JoinSet::new();

    debug!(
        "Copying {} entries of Discord {} with {} jobs",
        location.entries.len(),
        location.build,
        jobs
    );

    for entry in &location.entries {
        while tasks.len() >= jobs {
            if let Some(joined) = tasks.join_next().await {
                let outcome = flatten(joined)?;
                report.record(&outcome);
                on_entry(&outcome);
            }
        }

        let source = entry.path.clone();
        let dest = destination.join(&entry.name);
        tasks.spawn_blocking(move || copy_entry(&source, &dest, &options));
    }

    while let Some(joined) = tasks.join_next().await {
        let outcome = flatten(joined)?;
        report.record(&outcome);
        on_entry(&outcome);
    }

    Ok(report)
}

fn flatten(
    joined: Result<DumpResult<CopyOutcome>, tokio::task::JoinError>,
) -> DumpResult<CopyOutcome> {
    joined.map_err(|e| DumpError::Internal(format!("copy task failed: {}", e)))?
}

/// Hand `path` to `owner`; failures are logged and otherwise ignored
#[cfg(unix)]
pub(crate) fn apply_owner(path: &Path, owner: Option<Owner>) {
    if let Some(owner) = owner {
        if let Err(e) = std::os::unix::fs::chown(path, Some(owner.uid), Some(owner.gid)) {
            debug!("Unable to chown {}: {}", path.display(), e);
        }
    }
}

#[cfg(not(unix))]
pub(crate) fn apply_owner(_path: &Path, _owner: Option<Owner>) {}
