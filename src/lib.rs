//! jsonkit - a self-contained JSON codec.
//!
//! Parses JSON text (ECMA-404 / RFC 8259) into a [`Value`] tree and
//! serializes trees back to text, with a value API for reading,
//! building and mutating documents.
//!
//! # Architecture
//!
//! The implementation is organized into focused modules:
//!
//! - [`value`] - the tagged [`Value`] tree and its access/conversion API
//! - [`parser`] - cursor-based recursive-descent parser with a depth cap
//! - [`serializer`] - pretty/minimized recursive writer
//! - [`error`] - error kinds with positioned, caret-marked diagnostics
//! - [`io`] - file read/write wrappers around the in-memory core
//!
//! # Example
//!
//! ```
//! use jsonkit::{parse, serialize, Format};
//!
//! let root = parse(br#"{"a":1,"b":[true,null]}"#)?;
//! assert!(root.is_object());
//! assert_eq!(root["a"].as_number(), Some(1.0));
//! assert_eq!(serialize(&root, Format::Minimized), r#"{"a":1,"b":[true,null]}"#);
//! # Ok::<(), jsonkit::Error>(())
//! ```
//!
//! # Deviations from strict JSON
//!
//! Non-finite numbers have no JSON representation; the serializer emits
//! them as quoted tokens (`"nan"`, `"inf"`, `"-inf"`), so they
//! round-trip to strings rather than numbers. On the parsing side,
//! numeric forms the host float parser accepts (`1.`, `1.e3`, leading
//! zeros) are passed through rather than rejected.

// Library code must avoid unwrap/expect/panic; the `Index` impls are the
// documented exception and carry targeted allows.
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(missing_docs)]

pub mod error;
pub mod io;
pub mod parser;
mod serde_impls;
pub mod serializer;
mod tables;
pub mod value;

// Re-export the everyday surface at the crate root.
pub use error::{Error, Result};
pub use io::{parse_file, write_file};
pub use parser::{parse, parse_str, set_recursion_limit, DEFAULT_RECURSION_LIMIT};
pub use serializer::{serialize, serialize_into, Format};
pub use value::{Array, Object, Value};
