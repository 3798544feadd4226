//! Copying a single cache entry into the dump

use super::apply_owner;
use crate::error::{DumpError, DumpResult};
use crate::extract::{self, Outcome};
use crate::locate::Owner;
use crate::tagger;
use filetime::FileTime;
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Per-entry copy settings
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyOptions {
    /// Run the payload extractor on the entry
    pub extract: bool,
    /// Rename the copy after its sniffed file type
    pub tag: bool,
    /// Owner for the written file
    pub owner: Option<Owner>,
}

/// What happened to one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied {
        /// Final location of the copy, including any type extension
        path: PathBuf,
        /// Bytes written
        bytes: u64,
        /// Extraction result when extraction ran
        extraction: Option<Outcome>,
        /// Sniffed file type when tagging identified one
        extension: Option<&'static str>,
    },
    /// The source could not be read, usually because the client holds it open
    Unreadable,
}

/// Copy `source` to `dest`, recovering the payload when `options.extract` is set.
///
/// An unreadable source is reported, not an error. Failing to write the
/// destination is an error.
pub fn copy_entry(source: &Path, dest: &Path, options: &CopyOptions) -> DumpResult<CopyOutcome> {
    let input = match fs::read(source) {
        Ok(input) => input,
        Err(e) => {
            debug!("Unable to read {}: {}", source.display(), e);
            return Ok(CopyOutcome::Unreadable);
        }
    };
    let modified = fs::metadata(source).and_then(|m| m.modified()).ok();

    let (payload, extraction) = if options.extract {
        let extraction = extract::extract(&input);
        (extraction.payload, Some(extraction.outcome))
    } else {
        (Cow::Borrowed(input.as_slice()), None)
    };

    fs::write(dest, &payload).map_err(|e| DumpError::write(dest, e))?;
    apply_owner(dest, options.owner);

    if let Some(modified) = modified {
        if let Err(e) = filetime::set_file_mtime(dest, FileTime::from_system_time(modified)) {
            debug!("Unable to preserve mtime of {}: {}", dest.display(), e);
        }
    }

    let mut path = dest.to_path_buf();
    let mut extension = None;
    if options.tag {
        match tagger::tag(dest, &payload) {
            Ok(Some(tagged)) => {
                path = tagged.path;
                extension = Some(tagged.extension);
            }
            Ok(None) => {}
            Err(e) => warn!("{}", e),
        }
    }

    Ok(CopyOutcome::Copied {
        path,
        bytes: payload.len() as u64,
        extraction,
        extension,
    })
}
