//! Cache entry payload extraction
//!
//! Recovers the resource stored in a cache entry file (an image, font,
//! script body, ...) by recognizing and stripping the cache backend's
//! framing. The pipeline is a pure function of the entry bytes:
//!
//! | Stage | Runs when | Effect |
//! |-------|-----------|--------|
//! | Trailer | always | drop everything from the first trailer sentinel |
//! | Format | always | JPEG/WEBP found: start at the image magic, done |
//! | Key header | no format found | strip `len@12`/`key@24`, or fall back to the input |
//! | Segments | key header stripped | join segment payloads, skipping sub-headers |
//!
//! Input that matches nothing comes back unchanged; extraction never fails.

pub mod magic;
mod stages;

use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use tracing::trace;

/// Which stage of the pipeline produced the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "stage")]
pub enum Outcome {
    /// A confirmed JFIF image; later heuristics were skipped
    JpegRecovered,
    /// A WEBP image in a RIFF container; later heuristics were skipped
    WebpRecovered,
    /// The generic key header was stripped
    GenericStripped,
    /// The key header was stripped and the segments joined
    Reassembled { segments: usize },
    /// Nothing recognized; the payload is the untouched input
    Sanitized,
}

impl Outcome {
    /// Whether any framing was recognized
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Sanitized)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::JpegRecovered => write!(f, "jpeg"),
            Self::WebpRecovered => write!(f, "webp"),
            Self::GenericStripped => write!(f, "key header stripped"),
            Self::Reassembled { segments } => write!(f, "reassembled from {} segments", segments),
            Self::Sanitized => write!(f, "unrecognized"),
        }
    }
}

/// Result of running the pipeline over one entry
#[derive(Debug, Clone)]
pub struct Extraction<'a> {
    /// Recovered bytes; borrows from the input unless segments were joined
    pub payload: Cow<'a, [u8]>,
    /// Stage that produced `payload`
    pub outcome: Outcome,
    /// Whether a trailer sentinel was present in the input
    pub trailer_stripped: bool,
}

impl Extraction<'_> {
    /// Take ownership of the recovered bytes
    pub fn into_payload(self) -> Vec<u8> {
        self.payload.into_owned()
    }
}

/// Run the full extraction pipeline over the contents of one cache entry.
pub fn extract(contents: &[u8]) -> Extraction<'_> {
    let (truncated, trailer_stripped) = stages::truncate_trailer(contents);

    let (payload, outcome) = match stages::recover_format(contents, truncated) {
        Some((outcome, view)) => (Cow::Borrowed(view), outcome),
        None => match stages::strip_key_header(truncated) {
            // The partially cut buffer is never exposed; fall back to the input.
            None => (Cow::Borrowed(contents), Outcome::Sanitized),
            Some(stripped) => match stages::reassemble_segments(stripped) {
                Some((joined, segments)) => {
                    (Cow::Owned(joined), Outcome::Reassembled { segments })
                }
                None => (Cow::Borrowed(stripped), Outcome::GenericStripped),
            },
        },
    };

    trace!(
        input = contents.len(),
        output = payload.len(),
        trailer_stripped,
        outcome = %outcome,
        "Extracted cache entry"
    );

    Extraction {
        payload,
        outcome,
        trailer_stripped,
    }
}

/// Convenience wrapper returning only the recovered bytes
pub fn extract_payload(contents: &[u8]) -> Vec<u8> {
    extract(contents).into_payload()
}
