//! Error kinds and positioned parse diagnostics.
//!
//! Every failure in the crate is surfaced through the single [`Error`]
//! enum. Parse errors carry the byte position of the offending input
//! and a pre-rendered excerpt of the surrounding source with a caret
//! marker, so `Display` output can be handed to users as-is.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// All failures the codec can report.
///
/// Parse errors are never retried and never yield a partial tree; the
/// first one aborts the whole parse.
#[derive(Debug, Error)]
pub enum Error {
    /// Parser saw a byte that is not valid for the current production.
    #[error("unexpected byte {byte:?} at position {pos}{context}")]
    UnexpectedByte {
        /// The offending byte.
        byte: char,
        /// Byte offset into the input.
        pos: usize,
        /// Rendered source excerpt.
        context: String,
    },

    /// Buffer exhausted mid-token, mid-string, mid-escape or between
    /// elements.
    #[error("unexpected end of input at position {pos}{context}")]
    UnexpectedEnd {
        /// Byte offset into the input.
        pos: usize,
        /// Rendered source excerpt.
        context: String,
    },

    /// Unknown character after `\`, or a malformed `\uXXXX` sequence.
    #[error("invalid escape sequence at position {pos}{context}")]
    BadEscape {
        /// Byte offset of the backslash.
        pos: usize,
        /// Rendered source excerpt.
        context: String,
    },

    /// Unescaped U+0000..U+001F inside a string.
    #[error("unescaped control character 0x{byte:02x} in string at position {pos}{context}")]
    BadControlChar {
        /// The control byte.
        byte: u8,
        /// Byte offset into the input.
        pos: usize,
        /// Rendered source excerpt.
        context: String,
    },

    /// Numeric token not parseable as a double.
    #[error("invalid number at position {pos}{context}")]
    NumberFormat {
        /// Byte offset of the token start.
        pos: usize,
        /// Rendered source excerpt.
        context: String,
    },

    /// Numeric token outside the representable range of a double.
    #[error("number out of range at position {pos}{context}")]
    NumberRange {
        /// Byte offset of the token start.
        pos: usize,
        /// Rendered source excerpt.
        context: String,
    },

    /// Input nested deeper than the configured recursion limit.
    #[error(
        "nesting exceeds the recursion limit of {limit}; raise it with \
         set_recursion_limit() if the input is trusted"
    )]
    DepthExceeded {
        /// The limit in effect when parsing started.
        limit: u32,
    },

    /// Non-whitespace bytes after the top-level value.
    #[error("trailing data after the document at position {pos}{context}")]
    TrailingData {
        /// Byte offset of the first trailing byte.
        pos: usize,
        /// Rendered source excerpt.
        context: String,
    },

    /// Input buffer is not valid UTF-8.
    #[error("input is not valid UTF-8 (first invalid byte at position {pos})")]
    InvalidUtf8 {
        /// Byte offset of the first invalid byte.
        pos: usize,
    },

    /// A file could not be opened, read or written.
    #[error("cannot access {}: {source}", path.display())]
    FileAccess {
        /// The path that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// Typed accessor called on a value of a different kind.
    #[error("expected {expected}, found {actual}")]
    WrongKind {
        /// Kind the accessor requires.
        expected: &'static str,
        /// Kind the value actually holds.
        actual: &'static str,
    },

    /// Failing lookup of a key absent from an object.
    #[error("key {key:?} not found in object")]
    KeyNotFound {
        /// The missing key.
        key: String,
    },
}

impl Error {
    /// Byte offset the error refers to, for errors that have one.
    pub fn position(&self) -> Option<usize> {
        match self {
            Error::UnexpectedByte { pos, .. }
            | Error::UnexpectedEnd { pos, .. }
            | Error::BadEscape { pos, .. }
            | Error::BadControlChar { pos, .. }
            | Error::NumberFormat { pos, .. }
            | Error::NumberRange { pos, .. }
            | Error::TrailingData { pos, .. }
            | Error::InvalidUtf8 { pos } => Some(*pos),
            Error::DepthExceeded { .. }
            | Error::FileAccess { .. }
            | Error::WrongKind { .. }
            | Error::KeyNotFound { .. } => None,
        }
    }

    /// Short kind name, stable across message wording changes.
    pub fn name(&self) -> &'static str {
        match self {
            Error::UnexpectedByte { .. } => "UnexpectedByte",
            Error::UnexpectedEnd { .. } => "UnexpectedEnd",
            Error::BadEscape { .. } => "BadEscape",
            Error::BadControlChar { .. } => "BadControlChar",
            Error::NumberFormat { .. } => "NumberFormat",
            Error::NumberRange { .. } => "NumberRange",
            Error::DepthExceeded { .. } => "DepthExceeded",
            Error::TrailingData { .. } => "TrailingData",
            Error::InvalidUtf8 { .. } => "InvalidUtf8",
            Error::FileAccess { .. } => "FileAccess",
            Error::WrongKind { .. } => "WrongKind",
            Error::KeyNotFound { .. } => "KeyNotFound",
        }
    }

    pub(crate) fn unexpected_byte(byte: u8, pos: usize, chars: &str) -> Self {
        Error::UnexpectedByte {
            byte: char::from(byte),
            pos,
            context: pretty_context(pos, chars),
        }
    }

    pub(crate) fn unexpected_end(pos: usize, chars: &str) -> Self {
        Error::UnexpectedEnd {
            pos,
            context: pretty_context(pos, chars),
        }
    }

    pub(crate) fn bad_escape(pos: usize, chars: &str) -> Self {
        Error::BadEscape {
            pos,
            context: pretty_context(pos, chars),
        }
    }

    pub(crate) fn bad_control_char(byte: u8, pos: usize, chars: &str) -> Self {
        Error::BadControlChar {
            byte,
            pos,
            context: pretty_context(pos, chars),
        }
    }

    pub(crate) fn number_format(pos: usize, chars: &str) -> Self {
        Error::NumberFormat {
            pos,
            context: pretty_context(pos, chars),
        }
    }

    pub(crate) fn number_range(pos: usize, chars: &str) -> Self {
        Error::NumberRange {
            pos,
            context: pretty_context(pos, chars),
        }
    }

    pub(crate) fn trailing_data(pos: usize, chars: &str) -> Self {
        Error::TrailingData {
            pos,
            context: pretty_context(pos, chars),
        }
    }
}

/// Window of source shown on each side of the cursor in diagnostics.
const MAX_EXCERPT_WIDTH: usize = 24;

/// Render the multi-line diagnostic attached to parse errors: the line
/// number, an excerpt of the offending line clipped to
/// [`MAX_EXCERPT_WIDTH`] bytes per side, and a caret marking the cursor.
///
/// ```text
/// line 1: [1, x]
///         ----^-
/// ```
pub(crate) fn pretty_context(cursor: usize, chars: &str) -> String {
    let bytes = chars.as_bytes();
    if bytes.is_empty() {
        return String::new();
    }
    // The cursor may sit one past the end after an unexpected EOF.
    let cursor = cursor.min(bytes.len() - 1);

    let mut line_number = 1;
    for &byte in &bytes[..cursor] {
        if byte == b'\n' {
            line_number += 1;
        }
    }

    let mut line_start = cursor;
    while line_start > 0 {
        if bytes[line_start - 1] == b'\n' || cursor - line_start >= MAX_EXCERPT_WIDTH {
            break;
        }
        line_start -= 1;
    }

    let mut line_end = cursor;
    while line_end + 1 < bytes.len() {
        if bytes[line_end + 1] == b'\n' || line_end - cursor >= MAX_EXCERPT_WIDTH {
            break;
        }
        line_end += 1;
    }

    let excerpt = String::from_utf8_lossy(&bytes[line_start..=line_end]);
    let prefix = format!("line {line_number}: ");

    let mut rendered = String::with_capacity(2 + 2 * prefix.len() + 2 * excerpt.len());
    rendered.push('\n');
    rendered.push_str(&prefix);
    rendered.push_str(&excerpt);
    rendered.push('\n');
    rendered.extend(std::iter::repeat(' ').take(prefix.len()));
    rendered.extend(std::iter::repeat('-').take(cursor - line_start));
    rendered.push('^');
    rendered.extend(std::iter::repeat('-').take(line_end - cursor));
    rendered
}
