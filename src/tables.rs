//! Byte-classification lookup tables.
//!
//! Three fixed 256-entry tables replace branchy conditionals in the
//! parser and serializer hot loops: whitespace detection, escape
//! decoding and escape encoding. All indexing goes through the unsigned
//! byte value, so a byte can never produce a negative index.

/// Number of distinct byte values; every table covers the full range.
const BYTE_VALUES: usize = 256;

/// Marker in [`SERIALIZED_ESCAPES`] for control characters that have no
/// 2-character escape and must be written in the `\u00XX` form.
pub(crate) const UNICODE_ESCAPE: u8 = b'u';

/// `true` for the four "insignificant whitespace" bytes of ECMA-404:
/// SPACE, TAB, CR, LF.
pub(crate) static WHITESPACE: [bool; BYTE_VALUES] = build_whitespace();

/// Maps the letter of a 2-character escape sequence to the byte it
/// decodes to. Zero means the letter does not form a valid escape.
pub(crate) static PARSED_ESCAPES: [u8; BYTE_VALUES] = build_parsed_escapes();

/// Maps a raw byte to the escape letter the serializer emits after a
/// backslash. Zero means no escaping is needed; [`UNICODE_ESCAPE`]
/// means the byte is a control character without a short form.
pub(crate) static SERIALIZED_ESCAPES: [u8; BYTE_VALUES] = build_serialized_escapes();

const fn build_whitespace() -> [bool; BYTE_VALUES] {
    let mut table = [false; BYTE_VALUES];
    table[b' ' as usize] = true;
    table[b'\t' as usize] = true;
    table[b'\r' as usize] = true;
    table[b'\n' as usize] = true;
    table
}

const fn build_parsed_escapes() -> [u8; BYTE_VALUES] {
    let mut table = [0u8; BYTE_VALUES];
    table[b'"' as usize] = b'"';
    table[b'\\' as usize] = b'\\';
    table[b'/' as usize] = b'/';
    table[b'b' as usize] = 0x08;
    table[b'f' as usize] = 0x0C;
    table[b'n' as usize] = b'\n';
    table[b'r' as usize] = b'\r';
    table[b't' as usize] = b'\t';
    table
}

const fn build_serialized_escapes() -> [u8; BYTE_VALUES] {
    let mut table = [0u8; BYTE_VALUES];
    // U+0000..U+001F must all be escaped; the short forms below
    // overwrite the common ones.
    let mut byte = 0;
    while byte < 0x20 {
        table[byte] = UNICODE_ESCAPE;
        byte += 1;
    }
    table[b'"' as usize] = b'"';
    table[b'\\' as usize] = b'\\';
    // Escaping the forward slash is allowed by the grammar but redundant.
    table[0x08] = b'b';
    table[0x0C] = b'f';
    table[b'\n' as usize] = b'n';
    table[b'\r' as usize] = b'r';
    table[b'\t' as usize] = b't';
    table
}
