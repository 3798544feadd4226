//! Free-space check before copying
//!
//! The dump needs room for every readable cache file. Free space is queried
//! with `statvfs` on Unix; on other platforms it cannot be determined and
//! the check is skipped.

use crate::error::{DumpError, DumpResult};
use crate::locate::CacheLocation;
use std::path::Path;
use tracing::{debug, warn};

/// Total bytes needed to copy every readable entry in `locations`
pub fn required_space(locations: &[CacheLocation]) -> u64 {
    locations.iter().map(CacheLocation::readable_size).sum()
}

/// Free bytes available to unprivileged users on the filesystem holding `path`
#[cfg(unix)]
pub fn free_space(path: &Path) -> DumpResult<Option<u64>> {
    let stat = rustix::fs::statvfs(path).map_err(|e| {
        DumpError::io(format!("querying free space of {}", path.display()), e.into())
    })?;
    Ok(Some(stat.f_bavail.saturating_mul(stat.f_frsize)))
}

#[cfg(not(unix))]
pub fn free_space(_path: &Path) -> DumpResult<Option<u64>> {
    Ok(None)
}

/// Fail unless more than `required` bytes are free at `path`.
///
/// `path` may not exist yet; its closest existing ancestor is queried.
/// Returns the free space when it could be determined.
pub fn ensure_space(path: &Path, required: u64) -> DumpResult<Option<u64>> {
    let existing = path
        .ancestors()
        .find(|p| p.exists())
        .unwrap_or_else(|| Path::new("."));

    let Some(available) = free_space(existing)? else {
        warn!(
            "Unable to determine free space at {}, skipping storage check",
            path.display()
        );
        return Ok(None);
    };

    debug!(
        "Storage at {}: {} bytes free, {} bytes required",
        path.display(),
        available,
        required
    );
    check(path, required, available).map(Some)
}

fn check(path: &Path, required: u64, available: u64) -> DumpResult<u64> {
    if available <= required {
        return Err(DumpError::InsufficientStorage {
            path: path.to_path_buf(),
            required,
            available,
        });
    }
    Ok(available)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locate::{Build, CacheEntry};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn location(sizes: &[Option<u64>]) -> CacheLocation {
        CacheLocation {
            build: Build::Stable,
            path: PathBuf::from("/cache"),
            entries: sizes
                .iter()
                .enumerate()
                .map(|(i, size)| CacheEntry {
                    name: format!("f_{:06}", i),
                    path: PathBuf::from(format!("/cache/f_{:06}", i)),
                    size: *size,
                })
                .collect(),
        }
    }

    #[test]
    fn required_space_skips_unreadable() {
        let locations = [location(&[Some(10), None, Some(5)]), location(&[Some(100)])];
        assert_eq!(required_space(&locations), 115);
    }

    #[test]
    fn check_needs_strictly_more_space() {
        let path = Path::new("/dump");
        assert_eq!(check(path, 10, 11).unwrap(), 11);

        let err = check(path, 10, 10).unwrap_err();
        assert_eq!(err.shortfall(), Some(0));

        let err = check(path, 100, 40).unwrap_err();
        assert_eq!(err.shortfall(), Some(60));
    }

    #[cfg(unix)]
    #[test]
    fn free_space_of_temp_dir() {
        let dir = TempDir::new().unwrap();
        let free = free_space(dir.path()).unwrap();
        assert!(free.is_some());
        assert!(ensure_space(dir.path(), 0).is_ok());
        assert!(ensure_space(&dir.path().join("dump/not/yet"), 0).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn free_space_of_missing_path() {
        let dir = TempDir::new().unwrap();
        assert!(free_space(&dir.path().join("missing")).is_err());
    }
}
