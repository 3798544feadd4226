//! Fixed byte patterns and offsets of the cache entry framing
//!
//! These values were taken from observed cache layouts. They are a protocol
//! contract and must match bit-for-bit.

/// Bookkeeping appended after the logical payload of an entry
pub const TRAILER: [u8; 10] = [0xD8, 0x41, 0x0D, 0x97, 0x45, 0x6F, 0xFA, 0xF4, 0x01, 0x00];

/// JPEG start-of-image marker
pub const JPEG_SOI: [u8; 3] = [0xFF, 0xD8, 0xFF];

/// APP0 identifier that confirms a JPEG marker is real image data
pub const JFIF_TAG: &[u8; 4] = b"JFIF";

/// Distance from the start of `JPEG_SOI` to `JFIF_TAG`
pub const JFIF_OFFSET: usize = 6;

/// `\0\0WEBPVP8` and `\x01\0WEBPVP8`, the tail of the RIFF size field
/// followed by the WEBP form type and the start of the VP8 chunk id
pub const WEBP_SIGNATURES: [[u8; 9]; 2] = [
    [0x00, 0x00, 0x57, 0x45, 0x42, 0x50, 0x56, 0x50, 0x38],
    [0x01, 0x00, 0x57, 0x45, 0x42, 0x50, 0x56, 0x50, 0x38],
];

/// Container tag a WEBP payload starts with
pub const RIFF_TAG: &[u8; 4] = b"RIFF";

/// Separator between the segments of a multi-part entry
pub const SEGMENT_SENTINEL: [u8; 8] = [0x6B, 0x67, 0x53, 0x65, 0x01, 0xBF, 0x97, 0xEB];

/// Size of the sub-header each segment starts with
pub const SEGMENT_HEADER_LEN: usize = 24;

/// Offset of the single byte holding the stored key length
pub const KEY_LENGTH_OFFSET: usize = 12;

/// Offset at which the stored key starts
pub const KEY_OFFSET: usize = 24;

/// Whether `byte` belongs to `[A-Za-z0-9_\-:/.%?&=]`, the characters a cache
/// key (usually a URL) is expected to start with
pub fn is_key_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
        || matches!(
            byte,
            b'_' | b'-' | b':' | b'/' | b'.' | b'%' | b'?' | b'&' | b'='
        )
}
