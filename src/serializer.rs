//! JSON serializer.
//!
//! A depth-parameterized recursive writer that appends to a caller-owned
//! buffer. The layout choice is a const generic, so the minimized path
//! is monomorphized with no runtime branches on it.

use crate::tables::{SERIALIZED_ESCAPES, UNICODE_ESCAPE};
use crate::value::Value;

/// Output layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// 4-space indentation, newline-separated entries, `": "` after
    /// object keys.
    Pretty,
    /// No whitespace between tokens.
    Minimized,
}

/// Spaces per indentation level in pretty output.
const INDENT_WIDTH: usize = 4;

/// Encode a value as JSON text.
pub fn serialize(value: &Value, format: Format) -> String {
    let mut chars = String::new();
    serialize_into(&mut chars, value, format);
    chars
}

/// Encode a value as JSON text, appending to an existing buffer.
pub fn serialize_into(chars: &mut String, value: &Value, format: Format) {
    match format {
        Format::Pretty => write_value::<true>(chars, value, 0, false),
        Format::Minimized => write_value::<false>(chars, value, 0, false),
    }
}

/// Recursive writer. `skip_first_indent` suppresses the indent of the
/// first line when the value follows an object key, which has already
/// placed the leading whitespace:
///
/// ```text
/// {
///     "object": {              <- first indent skipped
///         "something": null    <- first indent skipped
///     },
///     "array": [               <- first indent skipped
///         1,                   <- elements indent their own lines
///         2
///     ]
/// }
/// ```
fn write_value<const PRETTY: bool>(
    chars: &mut String,
    value: &Value,
    indent_level: usize,
    skip_first_indent: bool,
) {
    let indent = INDENT_WIDTH * indent_level;

    if PRETTY && !skip_first_indent {
        push_spaces(chars, indent);
    }

    match value {
        Value::Object(object) => {
            if object.is_empty() {
                chars.push_str("{}");
                return;
            }
            chars.push('{');
            if PRETTY {
                chars.push('\n');
            }
            let mut entries = object.iter().peekable();
            while let Some((key, child)) = entries.next() {
                if PRETTY {
                    push_spaces(chars, indent + INDENT_WIDTH);
                }
                write_string(chars, key);
                chars.push(':');
                if PRETTY {
                    chars.push(' ');
                }
                write_value::<PRETTY>(chars, child, indent_level + 1, true);
                if entries.peek().is_some() {
                    chars.push(',');
                }
                if PRETTY {
                    chars.push('\n');
                }
            }
            if PRETTY {
                push_spaces(chars, indent);
            }
            chars.push('}');
        }
        Value::Array(elements) => {
            if elements.is_empty() {
                chars.push_str("[]");
                return;
            }
            chars.push('[');
            if PRETTY {
                chars.push('\n');
            }
            let mut remaining = elements.iter().peekable();
            while let Some(child) = remaining.next() {
                write_value::<PRETTY>(chars, child, indent_level + 1, false);
                if remaining.peek().is_some() {
                    chars.push(',');
                }
                if PRETTY {
                    chars.push('\n');
                }
            }
            if PRETTY {
                push_spaces(chars, indent);
            }
            chars.push(']');
        }
        Value::String(string) => write_string(chars, string),
        Value::Number(number) => write_number(chars, *number),
        Value::Bool(true) => chars.push_str("true"),
        Value::Bool(false) => chars.push_str("false"),
        Value::Null => chars.push_str("null"),
    }
}

fn push_spaces(chars: &mut String, count: usize) {
    chars.extend(std::iter::repeat(' ').take(count));
}

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Write a quoted, escaped string. Unescaped runs are flushed in whole
/// chunks bounded by escape events; escape-free strings append in a
/// single call. Control characters without a short escape become
/// `\u00XX`.
fn write_string(chars: &mut String, string: &str) {
    chars.push('"');

    let bytes = string.as_bytes();
    let mut segment_start = 0;
    for (position, &byte) in bytes.iter().enumerate() {
        let escape = SERIALIZED_ESCAPES[usize::from(byte)];
        if escape == 0 {
            continue;
        }
        chars.push_str(&string[segment_start..position]);
        if escape == UNICODE_ESCAPE {
            chars.push_str("\\u00");
            chars.push(char::from(HEX_DIGITS[usize::from(byte >> 4)]));
            chars.push(char::from(HEX_DIGITS[usize::from(byte & 0x0F)]));
        } else {
            chars.push('\\');
            chars.push(char::from(escape));
        }
        segment_start = position + 1;
    }
    chars.push_str(&string[segment_start..]);

    chars.push('"');
}

/// Largest double whose integral neighbors are all exactly
/// representable (2^53).
const EXACT_INTEGER_BOUND: f64 = 9_007_199_254_740_992.0;

/// Shortest round-trip formatting. Integral doubles inside the exact
/// range print without a fractional part (`1`, not `1.0`). Non-finite
/// values have no JSON representation and are emitted as quoted tokens,
/// at the cost of round-trip symmetry: they come back as strings.
fn write_number(chars: &mut String, number: f64) {
    if !number.is_finite() {
        chars.push('"');
        if number.is_nan() {
            chars.push_str("nan");
        } else if number > 0.0 {
            chars.push_str("inf");
        } else {
            chars.push_str("-inf");
        }
        chars.push('"');
        return;
    }

    if number.fract() == 0.0
        && number.abs() < EXACT_INTEGER_BOUND
        && !(number == 0.0 && number.is_sign_negative())
    {
        chars.push_str(itoa::Buffer::new().format(number as i64));
    } else {
        chars.push_str(ryu::Buffer::new().format_finite(number));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_str;
    use crate::value::Object;

    #[test]
    fn test_scalars() {
        assert_eq!(serialize(&Value::Null, Format::Minimized), "null");
        assert_eq!(serialize(&Value::Bool(true), Format::Minimized), "true");
        assert_eq!(serialize(&Value::Bool(false), Format::Minimized), "false");
        assert_eq!(serialize(&Value::Number(42.0), Format::Minimized), "42");
        assert_eq!(
            serialize(&Value::String("hello".to_string()), Format::Minimized),
            "\"hello\""
        );
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(serialize(&Value::Array(vec![]), Format::Minimized), "[]");
        assert_eq!(serialize(&Value::Array(vec![]), Format::Pretty), "[]");
        assert_eq!(
            serialize(&Value::Object(Object::new()), Format::Minimized),
            "{}"
        );
        assert_eq!(
            serialize(&Value::Object(Object::new()), Format::Pretty),
            "{}"
        );
    }

    #[test]
    fn test_minimized_has_no_whitespace() {
        let value = parse_str(r#"{ "a" : [ 1 , 2 ] , "b" : null }"#).unwrap();
        assert_eq!(serialize(&value, Format::Minimized), r#"{"a":[1,2],"b":null}"#);
    }

    #[test]
    fn test_pretty_layout() {
        let value = parse_str(r#"{"a":1,"b":[true,null],"c":{"d":"e"}}"#).unwrap();
        let expected = "{\n    \"a\": 1,\n    \"b\": [\n        true,\n        null\n    \
                        ],\n    \"c\": {\n        \"d\": \"e\"\n    }\n}";
        assert_eq!(serialize(&value, Format::Pretty), expected);
    }

    #[test]
    fn test_string_escapes() {
        let value = Value::String("a\"b\\c\nd\te\x08f\x0Cg\rh".to_string());
        assert_eq!(
            serialize(&value, Format::Minimized),
            r#""a\"b\\c\nd\te\bf\fg\rh""#
        );
    }

    #[test]
    fn test_slash_not_escaped() {
        let value = Value::String("a/b".to_string());
        assert_eq!(serialize(&value, Format::Minimized), "\"a/b\"");
    }

    #[test]
    fn test_bare_control_characters_use_unicode_form() {
        let value = Value::String("a\x01b\x1fc".to_string());
        assert_eq!(
            serialize(&value, Format::Minimized),
            r#""a\u0001b\u001fc""#
        );
    }

    #[test]
    fn test_multibyte_text_passes_through() {
        let value = Value::String("\u{e9}\u{1F600}".to_string());
        assert_eq!(
            serialize(&value, Format::Minimized),
            "\"\u{e9}\u{1F600}\""
        );
    }

    #[test]
    fn test_keys_are_escaped() {
        let mut object = Object::new();
        object.insert("a\nb".to_string(), Value::Number(1.0));
        assert_eq!(
            serialize(&Value::Object(object), Format::Minimized),
            r#"{"a\nb":1}"#
        );
    }

    #[test]
    fn test_integral_doubles_print_without_fraction() {
        assert_eq!(serialize(&Value::Number(1.0), Format::Minimized), "1");
        assert_eq!(serialize(&Value::Number(-7.0), Format::Minimized), "-7");
        assert_eq!(serialize(&Value::Number(0.0), Format::Minimized), "0");
        assert_eq!(
            serialize(&Value::Number(9007199254740991.0), Format::Minimized),
            "9007199254740991"
        );
    }

    #[test]
    fn test_fractional_and_large_numbers() {
        assert_eq!(serialize(&Value::Number(1.5), Format::Minimized), "1.5");
        assert_eq!(
            serialize(&Value::Number(-0.0), Format::Minimized),
            "-0.0"
        );
        assert_eq!(
            serialize(&Value::Number(1e300), Format::Minimized),
            "1e300"
        );
    }

    #[test]
    fn test_non_finite_numbers_become_quoted_tokens() {
        assert_eq!(
            serialize(&Value::Number(f64::NAN), Format::Minimized),
            "\"nan\""
        );
        assert_eq!(
            serialize(&Value::Number(f64::INFINITY), Format::Minimized),
            "\"inf\""
        );
        assert_eq!(
            serialize(&Value::Number(f64::NEG_INFINITY), Format::Minimized),
            "\"-inf\""
        );
    }

    #[test]
    fn test_serialize_into_appends() {
        let mut chars = String::from("payload: ");
        serialize_into(&mut chars, &Value::Bool(true), Format::Minimized);
        assert_eq!(chars, "payload: true");
    }
}
