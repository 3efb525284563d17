//! File wrappers feeding the codec.
//!
//! The core parses from and serializes to in-memory buffers; these
//! helpers adapt the filesystem to that interface and report failures
//! as [`Error::FileAccess`].

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::parser;
use crate::serializer::{self, Format};
use crate::value::Value;

/// Read a file into memory and parse it as a JSON document.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Value> {
    let path = path.as_ref();
    let buffer = fs::read(path).map_err(|source| Error::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    parser::parse(&buffer)
}

/// Serialize a value and write it to `path`, overwriting any existing
/// file.
pub fn write_file<P: AsRef<Path>>(value: &Value, path: P, format: Format) -> Result<()> {
    let path = path.as_ref();
    let chars = serializer::serialize(value, format);
    fs::write(path, chars).map_err(|source| Error::FileAccess {
        path: path.to_path_buf(),
        source,
    })
}
