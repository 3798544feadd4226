//! Output directory layout: `<output>/<YYYY-MM-DD--HH-MM-SS>/<Build>/`

use super::apply_owner;
use crate::error::{DumpError, DumpResult};
use crate::locate::{Build, Owner};
use chrono::{DateTime, TimeZone};
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the per-run directory for a given instant
pub fn run_dir_name<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    now.format("%Y-%m-%d--%H-%M-%S").to_string()
}

/// Directories of a single dump run
#[derive(Debug, Clone)]
pub struct DumpLayout {
    run_dir: PathBuf,
    owner: Option<Owner>,
}

impl DumpLayout {
    /// Create `<output>/<run_name>`, handing new directories to `owner`
    pub fn create(output: &Path, run_name: &str, owner: Option<Owner>) -> DumpResult<Self> {
        ensure_dir(output, owner)?;
        let run_dir = output.join(run_name);
        ensure_dir(&run_dir, owner)?;
        Ok(Self { run_dir, owner })
    }

    /// Directory holding this run's builds
    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    /// Create and return the directory for `build`
    pub fn build_dir(&self, build: Build) -> DumpResult<PathBuf> {
        let dir = self.run_dir.join(build.name());
        ensure_dir(&dir, self.owner)?;
        Ok(dir)
    }
}

fn ensure_dir(path: &Path, owner: Option<Owner>) -> DumpResult<()> {
    if path.is_dir() {
        return Ok(());
    }

    fs::create_dir_all(path)
        .map_err(|e| DumpError::io(format!("creating directory {}", path.display()), e))?;
    apply_owner(path, owner);
    debug!("Created {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, Utc};
    use tempfile::TempDir;

    #[test]
    fn run_dir_name_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(run_dir_name(&at), "2024-03-09--07-05-01");

        let local = run_dir_name(&Local::now());
        assert_eq!(local.len(), "2024-03-09--07-05-01".len());
    }

    #[test]
    fn creates_nested_layout() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("dump");

        let layout = DumpLayout::create(&output, "2024-03-09--07-05-01", None).unwrap();
        assert_eq!(layout.run_dir(), output.join("2024-03-09--07-05-01"));
        assert!(layout.run_dir().is_dir());

        let ptb = layout.build_dir(Build::Ptb).unwrap();
        assert_eq!(ptb, output.join("2024-03-09--07-05-01").join("PTB"));
        assert!(ptb.is_dir());
    }

    #[test]
    fn existing_directories_are_reused() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("run/Stable")).unwrap();
        fs::write(temp.path().join("run/Stable/keep"), b"x").unwrap();

        let layout = DumpLayout::create(temp.path(), "run", None).unwrap();
        let stable = layout.build_dir(Build::Stable).unwrap();
        assert!(stable.join("keep").exists());
    }
}
