//! File type tagging of recovered payloads
//!
//! Sniffs the payload's magic number and appends the matching extension to
//! the dumped file name.

use crate::error::{DumpError, DumpResult};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Best-guess file extension for `bytes`, without the leading dot
pub fn sniff(bytes: &[u8]) -> Option<&'static str> {
    infer::get(bytes).map(|kind| kind.extension())
}

/// `path` with `.ext` appended to its full file name
pub fn tagged_path(path: &Path, extension: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

/// A dumped file renamed after its sniffed type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tagged {
    pub path: PathBuf,
    pub extension: &'static str,
}

/// Rename `path` after the type sniffed from `bytes`.
///
/// Returns `None` when the type is unknown and the file was left alone.
pub fn tag(path: &Path, bytes: &[u8]) -> DumpResult<Option<Tagged>> {
    let Some(extension) = sniff(bytes) else {
        return Ok(None);
    };

    let target = tagged_path(path, extension);
    fs::rename(path, &target).map_err(|e| {
        DumpError::io(
            format!("renaming {} to {}", path.display(), target.display()),
            e,
        )
    })?;

    debug!("Identified {} as {}", path.display(), extension);
    Ok(Some(Tagged {
        path: target,
        extension,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PNG_HEAD: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];

    #[test]
    fn sniff_known_types() {
        assert_eq!(sniff(PNG_HEAD), Some("png"));
        assert_eq!(
            sniff(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F']),
            Some("jpg")
        );
        assert_eq!(sniff(b"GIF89a\x01\x00"), Some("gif"));
    }

    #[test]
    fn sniff_unknown() {
        assert_eq!(sniff(b""), None);
        assert_eq!(sniff(b"just some text"), None);
    }

    #[test]
    fn tagged_path_appends() {
        assert_eq!(
            tagged_path(Path::new("/dump/Stable/f_00001a"), "png"),
            PathBuf::from("/dump/Stable/f_00001a.png")
        );
        assert_eq!(tagged_path(Path::new("data_1"), "gz"), PathBuf::from("data_1.gz"));
    }

    #[test]
    fn tag_renames_known_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("f_000001");
        fs::write(&path, PNG_HEAD).unwrap();

        let tagged = tag(&path, PNG_HEAD).unwrap().unwrap();
        assert_eq!(tagged.path, dir.path().join("f_000001.png"));
        assert_eq!(tagged.extension, "png");
        assert!(!path.exists());
        assert!(dir.path().join("f_000001.png").exists());
    }

    #[test]
    fn tag_leaves_unknown_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index");
        fs::write(&path, b"opaque").unwrap();

        assert_eq!(tag(&path, b"opaque").unwrap(), None);
        assert!(path.exists());
    }
}
