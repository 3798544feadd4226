//! Individual stages of the extraction pipeline
//!
//! Each stage is a pure function over byte slices. Stages that only cut
//! framing away return sub-slices of their input; reassembly is the only
//! stage that allocates.

use super::magic::{
    is_key_char, JFIF_OFFSET, JFIF_TAG, JPEG_SOI, KEY_LENGTH_OFFSET, KEY_OFFSET, RIFF_TAG,
    SEGMENT_HEADER_LEN, SEGMENT_SENTINEL, TRAILER, WEBP_SIGNATURES,
};
use super::Outcome;
use memchr::memmem;

/// Cut everything from the first trailer sentinel onwards.
///
/// Returns the remaining bytes and whether a trailer was found.
pub(crate) fn truncate_trailer(buf: &[u8]) -> (&[u8], bool) {
    match memmem::find(buf, &TRAILER) {
        Some(pos) => (&buf[..pos], true),
        None => (buf, false),
    }
}

/// Recognize an embedded JPEG or WEBP image.
///
/// Detection looks at the original entry, while the returned view is taken
/// from the trailer-truncated buffer so a trailer after the image start is
/// still dropped. JPEG is tried first; at most one format is reported.
pub(crate) fn recover_format<'a>(
    original: &[u8],
    truncated: &'a [u8],
) -> Option<(Outcome, &'a [u8])> {
    if let Some(view) = recover_jpeg(original, truncated) {
        return Some((Outcome::JpegRecovered, view));
    }
    recover_webp(original, truncated).map(|view| (Outcome::WebpRecovered, view))
}

fn recover_jpeg<'a>(original: &[u8], truncated: &'a [u8]) -> Option<&'a [u8]> {
    let marker = memmem::find(original, &JPEG_SOI)?;
    let tag_start = marker + JFIF_OFFSET;
    let tag = original.get(tag_start..tag_start + JFIF_TAG.len())?;
    if tag != JFIF_TAG {
        return None;
    }

    // The marker can sit behind the trailer; then there is nothing to anchor on.
    let start = memmem::find(truncated, &JPEG_SOI)?;
    Some(&truncated[start..])
}

fn recover_webp<'a>(original: &[u8], truncated: &'a [u8]) -> Option<&'a [u8]> {
    let signed = WEBP_SIGNATURES
        .iter()
        .any(|signature| memmem::find(original, signature).is_some());
    if !signed {
        return None;
    }

    let start = memmem::find(truncated, RIFF_TAG)?;
    Some(&truncated[start..])
}

/// Strip the generic `[.. len@12 ..][key@24][payload]` header.
///
/// Returns `None` when the buffer does not look like that layout: too short
/// for the length byte or the key, a zero length, or a key whose first byte
/// is not a plausible URL character. Only the first key byte is checked.
pub(crate) fn strip_key_header(buf: &[u8]) -> Option<&[u8]> {
    let key_len = usize::from(*buf.get(KEY_LENGTH_OFFSET)?);
    if key_len == 0 {
        return None;
    }

    let key_end = KEY_OFFSET + key_len;
    let key = buf.get(KEY_OFFSET..key_end)?;
    if !is_key_char(key[0]) {
        return None;
    }

    Some(&buf[key_end..])
}

/// Join the payload parts of a multi-segment entry.
///
/// Material before the first sentinel is discarded, and each following
/// segment loses its fixed sub-header. A segment shorter than the sub-header
/// contributes nothing. Returns `None` when no sentinel is present, otherwise
/// the joined payload and the number of segments it was built from.
pub(crate) fn reassemble_segments(buf: &[u8]) -> Option<(Vec<u8>, usize)> {
    let finder = memmem::Finder::new(&SEGMENT_SENTINEL);
    let starts: Vec<usize> = finder
        .find_iter(buf)
        .map(|pos| pos + SEGMENT_SENTINEL.len())
        .collect();
    if starts.is_empty() {
        return None;
    }

    let ends = starts
        .iter()
        .skip(1)
        .map(|next| next - SEGMENT_SENTINEL.len())
        .chain(std::iter::once(buf.len()));

    let mut joined = Vec::with_capacity(buf.len());
    for (start, end) in starts.iter().zip(ends) {
        let segment = &buf[*start..end];
        joined.extend_from_slice(segment.get(SEGMENT_HEADER_LEN..).unwrap_or_default());
    }

    Some((joined, starts.len()))
}
