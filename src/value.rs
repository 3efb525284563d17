//! The JSON value tree.
//!
//! [`Value`] is a tagged union over the six JSON kinds. Objects are
//! backed by an ordered map sorted by key, arrays by a plain vector;
//! both own their contents exclusively, so the tree is a strict tree
//! with no sharing and no cycles.
//!
//! Accessors come in two flavors: `as_*` methods return `Option` and
//! never fail, `try_*` methods return `Result` and report
//! [`Error::WrongKind`] on a kind mismatch.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::serializer::{self, Format};

/// Ordered map backing JSON objects.
///
/// Iteration order is sorted by key; that is the only ordering the
/// crate promises. Lookup accepts a borrowed `&str` without allocating.
pub type Object = BTreeMap<String, Value>;

/// Sequence backing JSON arrays.
pub type Array = Vec<Value>;

/// A node of the JSON tree, holding exactly one of the six JSON kinds.
///
/// Default construction yields `Null`, cloning deep-copies the subtree
/// and moving transfers ownership. All `Null`s compare equal.
///
/// Numbers produced by parsing are always finite; non-finite numbers
/// can only be built by user code and serialize as quoted tokens.
/// String payloads are decoded UTF-8 with no JSON escape syntax left in
/// them. Duplicate keys in parsed objects resolve "last write wins".
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// JSON `null`.
    #[default]
    Null,
    /// JSON `true` / `false`.
    Bool(bool),
    /// JSON number as a 64-bit IEEE-754 double.
    Number(f64),
    /// JSON string.
    String(String),
    /// JSON array of values.
    Array(Array),
    /// JSON object, sorted by key.
    Object(Object),
}

impl Value {
    /// Returns true if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true if this is a boolean value.
    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Returns true if this is a number value.
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Returns true if this is a string value.
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns true if this is an array value.
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Returns true if this is an object value.
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Kind name used in error and panic messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Returns the boolean if this is a Bool, None otherwise.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Mutable access to the boolean payload.
    pub fn as_bool_mut(&mut self) -> Option<&mut bool> {
        match self {
            Value::Bool(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the number if this is a Number, None otherwise.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Mutable access to the number payload.
    pub fn as_number_mut(&mut self) -> Option<&mut f64> {
        match self {
            Value::Number(value) => Some(value),
            _ => None,
        }
    }

    /// Returns a borrowed string if this is a String, None otherwise.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(value) => Some(value),
            _ => None,
        }
    }

    /// Mutable access to the string payload.
    pub fn as_string_mut(&mut self) -> Option<&mut String> {
        match self {
            Value::String(value) => Some(value),
            _ => None,
        }
    }

    /// Returns a reference to the elements if this is an Array.
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(elements) => Some(elements),
            _ => None,
        }
    }

    /// Mutable access to the array payload.
    pub fn as_array_mut(&mut self) -> Option<&mut Array> {
        match self {
            Value::Array(elements) => Some(elements),
            _ => None,
        }
    }

    /// Returns a reference to the map if this is an Object.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Mutable access to the object payload.
    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// `Some(())` if this is Null, None otherwise.
    pub fn as_null(&self) -> Option<()> {
        match self {
            Value::Null => Some(()),
            _ => None,
        }
    }

    fn wrong_kind(&self, expected: &'static str) -> Error {
        Error::WrongKind {
            expected,
            actual: self.type_name(),
        }
    }

    /// The boolean payload, or [`Error::WrongKind`].
    pub fn try_bool(&self) -> Result<bool> {
        self.as_bool().ok_or_else(|| self.wrong_kind("bool"))
    }

    /// Mutable boolean payload, or [`Error::WrongKind`].
    pub fn try_bool_mut(&mut self) -> Result<&mut bool> {
        match self {
            Value::Bool(value) => Ok(value),
            other => Err(other.wrong_kind("bool")),
        }
    }

    /// The number payload, or [`Error::WrongKind`].
    pub fn try_number(&self) -> Result<f64> {
        self.as_number().ok_or_else(|| self.wrong_kind("number"))
    }

    /// Mutable number payload, or [`Error::WrongKind`].
    pub fn try_number_mut(&mut self) -> Result<&mut f64> {
        match self {
            Value::Number(value) => Ok(value),
            other => Err(other.wrong_kind("number")),
        }
    }

    /// The string payload, or [`Error::WrongKind`].
    pub fn try_str(&self) -> Result<&str> {
        match self {
            Value::String(value) => Ok(value),
            other => Err(other.wrong_kind("string")),
        }
    }

    /// Mutable string payload, or [`Error::WrongKind`].
    pub fn try_string_mut(&mut self) -> Result<&mut String> {
        match self {
            Value::String(value) => Ok(value),
            other => Err(other.wrong_kind("string")),
        }
    }

    /// The array payload, or [`Error::WrongKind`].
    pub fn try_array(&self) -> Result<&Array> {
        match self {
            Value::Array(elements) => Ok(elements),
            other => Err(other.wrong_kind("array")),
        }
    }

    /// Mutable array payload, or [`Error::WrongKind`].
    pub fn try_array_mut(&mut self) -> Result<&mut Array> {
        match self {
            Value::Array(elements) => Ok(elements),
            other => Err(other.wrong_kind("array")),
        }
    }

    /// The object payload, or [`Error::WrongKind`].
    pub fn try_object(&self) -> Result<&Object> {
        match self {
            Value::Object(object) => Ok(object),
            other => Err(other.wrong_kind("object")),
        }
    }

    /// Mutable object payload, or [`Error::WrongKind`].
    pub fn try_object_mut(&mut self) -> Result<&mut Object> {
        match self {
            Value::Object(object) => Ok(object),
            other => Err(other.wrong_kind("object")),
        }
    }

    /// `Ok(())` if this is Null, [`Error::WrongKind`] otherwise.
    pub fn try_null(&self) -> Result<()> {
        self.as_null().ok_or_else(|| self.wrong_kind("null"))
    }

    /// Borrowed object lookup. None when the value is not an object or
    /// the key is absent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(object) => object.get(key),
            _ => None,
        }
    }

    /// Mutable object lookup.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        match self {
            Value::Object(object) => object.get_mut(key),
            _ => None,
        }
    }

    /// Array element lookup by position.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        match self {
            Value::Array(elements) => elements.get(index),
            _ => None,
        }
    }

    /// Failing lookup: the value must be an object and the key present.
    ///
    /// Fails with [`Error::WrongKind`] on non-objects and
    /// [`Error::KeyNotFound`] on a missing key.
    pub fn try_get(&self, key: &str) -> Result<&Value> {
        self.try_object()?.get(key).ok_or_else(|| Error::KeyNotFound {
            key: key.to_owned(),
        })
    }

    /// True when the value is an object containing `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.as_object().is_some_and(|object| object.contains_key(key))
    }

    /// The value stored under `key` if present, else `default`. Fails
    /// with [`Error::WrongKind`] when the value is not an object.
    pub fn value_or<'a>(&'a self, key: &str, default: &'a Value) -> Result<&'a Value> {
        Ok(self.try_object()?.get(key).unwrap_or(default))
    }

    /// Serialize the subtree to JSON text.
    pub fn to_json(&self, format: Format) -> String {
        serializer::serialize(self, format)
    }
}

impl Index<&str> for Value {
    type Output = Value;

    /// Panics when the value is not an object or the key is absent; use
    /// [`Value::get`] or [`Value::try_get`] for the checked forms.
    #[allow(clippy::panic)]
    fn index(&self, key: &str) -> &Value {
        match self.get(key) {
            Some(value) => value,
            None => panic!("no key {key:?} in {}", self.type_name()),
        }
    }
}

impl IndexMut<&str> for Value {
    /// `Null` lazily promotes to an empty object, and a missing key
    /// inserts a `Null` entry. Panics when the value is any other kind;
    /// [`Value::try_object_mut`] is the checked form.
    #[allow(clippy::panic)]
    fn index_mut(&mut self, key: &str) -> &mut Value {
        if self.is_null() {
            *self = Value::Object(Object::new());
        }
        match self {
            Value::Object(object) => {
                // Borrowed lookup first so present keys cost no allocation.
                if !object.contains_key(key) {
                    object.insert(key.to_owned(), Value::Null);
                }
                match object.get_mut(key) {
                    Some(value) => value,
                    None => unreachable!(),
                }
            }
            other => panic!("cannot index {} with a string key", other.type_name()),
        }
    }
}

impl Index<usize> for Value {
    type Output = Value;

    /// Panics when the value is not an array or the index is out of
    /// bounds; [`Value::get_index`] is the checked form.
    #[allow(clippy::panic)]
    fn index(&self, index: usize) -> &Value {
        match self.get_index(index) {
            Some(value) => value,
            None => panic!("no element {index} in {}", self.type_name()),
        }
    }
}

impl IndexMut<usize> for Value {
    /// Panics when the value is not an array or the index is out of
    /// bounds.
    #[allow(clippy::panic)]
    fn index_mut(&mut self, index: usize) -> &mut Value {
        match self {
            Value::Array(elements) => match elements.get_mut(index) {
                Some(value) => value,
                None => panic!("no element {index} in array"),
            },
            other => panic!("cannot index {} with an array index", other.type_name()),
        }
    }
}

impl fmt::Display for Value {
    /// Minimized JSON; the alternate flag (`{:#}`) pretty-prints.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let format = if f.alternate() {
            Format::Pretty
        } else {
            Format::Minimized
        };
        f.write_str(&serializer::serialize(self, format))
    }
}

impl FromStr for Value {
    type Err = Error;

    fn from_str(chars: &str) -> Result<Value> {
        crate::parser::parse_str(chars)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Value {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Value {
        Value::Number(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Value {
        Value::Number(f64::from(value))
    }
}

macro_rules! from_integer {
    ($($int:ty)*) => {$(
        impl From<$int> for Value {
            fn from(value: $int) -> Value {
                Value::Number(value as f64)
            }
        }
    )*};
}

from_integer![u8 i8 u16 i16 u32 i32 u64 i64 usize isize];

impl From<&str> for Value {
    fn from(value: &str) -> Value {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Value {
        Value::String(value)
    }
}

impl From<Cow<'_, str>> for Value {
    fn from(value: Cow<'_, str>) -> Value {
        Value::String(value.into_owned())
    }
}

impl From<()> for Value {
    fn from((): ()) -> Value {
        Value::Null
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Value {
        match value {
            Some(value) => value.into(),
            None => Value::Null,
        }
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    /// Array conversion; nests to any depth since `Vec<Vec<T>>` is
    /// itself convertible element-wise.
    fn from(elements: Vec<T>) -> Value {
        Value::Array(elements.into_iter().map(Into::into).collect())
    }
}

impl<T: Clone + Into<Value>> From<&[T]> for Value {
    fn from(elements: &[T]) -> Value {
        Value::Array(elements.iter().cloned().map(Into::into).collect())
    }
}

impl<T: Into<Value>> FromIterator<T> for Value {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Value {
        Value::Array(iter.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<BTreeMap<String, T>> for Value {
    fn from(entries: BTreeMap<String, T>) -> Value {
        Value::Object(
            entries
                .into_iter()
                .map(|(key, value)| (key, value.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Value {
        Value::Object(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_null() {
        assert!(Value::default().is_null());
        assert_eq!(Value::default(), Value::Null);
    }

    #[test]
    fn test_kind_predicates() {
        assert!(Value::Null.is_null());
        assert!(Value::Bool(true).is_bool());
        assert!(Value::Number(42.0).is_number());
        assert!(Value::String("test".to_string()).is_string());
        assert!(Value::Array(vec![]).is_array());
        assert!(Value::Object(Object::new()).is_object());
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Number(42.0).as_number(), Some(42.0));
        assert_eq!(Value::String("test".to_string()).as_str(), Some("test"));
        assert_eq!(Value::Null.as_null(), Some(()));
        assert_eq!(Value::Null.as_bool(), None);
        assert_eq!(Value::Bool(true).as_number(), None);
    }

    #[test]
    fn test_try_accessors_report_wrong_kind() {
        let value = Value::Number(1.0);
        let error = value.try_object().unwrap_err();
        assert_eq!(error.name(), "WrongKind");
        assert_eq!(error.to_string(), "expected object, found number");
        assert_eq!(value.try_number().unwrap(), 1.0);
    }

    #[test]
    fn test_mutable_accessors() {
        let mut value = Value::Number(1.0);
        *value.try_number_mut().unwrap() = 2.0;
        assert_eq!(value.as_number(), Some(2.0));

        let mut value = Value::String("a".to_string());
        value.as_string_mut().unwrap().push('b');
        assert_eq!(value.as_str(), Some("ab"));
    }

    #[test]
    fn test_null_promotes_to_object_on_index_mut() {
        let mut value = Value::Null;
        value["key"] = Value::from("payload");
        assert!(value.is_object());
        assert!(value.contains("key"));
        assert_eq!(value["key"].as_str(), Some("payload"));
    }

    #[test]
    fn test_missing_key_inserts_null() {
        let mut value = Value::Object(Object::new());
        assert!(value.get("absent").is_none());
        // A mutable index inserts the key with a Null entry.
        let inserted = &mut value["absent"];
        assert!(inserted.is_null());
        assert!(value.contains("absent"));
    }

    #[test]
    #[should_panic(expected = "cannot index number")]
    fn test_index_mut_panics_on_scalar() {
        let mut value = Value::Number(1.0);
        value["key"] = Value::Null;
    }

    #[test]
    fn test_nested_index_mut_builds_subtrees() {
        let mut root = Value::Null;
        root["a"]["b"] = Value::from("c");
        assert_eq!(root["a"]["b"].as_str(), Some("c"));
        assert!(root["a"].is_object());
    }

    #[test]
    fn test_try_get() {
        let root: Value = [("key", 1.0)].into_iter().collect();
        assert_eq!(root.try_get("key").unwrap().as_number(), Some(1.0));
        assert_eq!(root.try_get("absent").unwrap_err().name(), "KeyNotFound");
        assert_eq!(Value::Null.try_get("key").unwrap_err().name(), "WrongKind");
    }

    #[test]
    fn test_value_or() {
        let root: Value = [("number", 17.0)].into_iter().collect();
        let default = Value::Number(-5.0);
        assert_eq!(
            root.value_or("number", &default).unwrap().as_number(),
            Some(17.0)
        );
        assert_eq!(
            root.value_or("absent", &default).unwrap().as_number(),
            Some(-5.0)
        );
        assert!(Value::Bool(true).value_or("key", &default).is_err());
    }

    #[test]
    fn test_array_indexing() {
        let value = Value::from(vec![1, 2, 3]);
        assert_eq!(value[0].as_number(), Some(1.0));
        assert_eq!(value.get_index(2).and_then(Value::as_number), Some(3.0));
        assert_eq!(value.get_index(3), None);
    }

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(2u8), Value::Number(2.0));
        assert_eq!(Value::from(2i64), Value::Number(2.0));
        assert_eq!(Value::from(2.5f32), Value::Number(2.5));
        assert_eq!(Value::from(2.5f64), Value::Number(2.5));
        assert_eq!(Value::from("text"), Value::String("text".to_string()));
        assert_eq!(Value::from(()), Value::Null);
        assert_eq!(Value::from(None::<bool>), Value::Null);
        assert_eq!(Value::from(Some(1)), Value::Number(1.0));
    }

    #[test]
    fn test_container_conversions() {
        let array = Value::from(vec!["a", "b"]);
        assert_eq!(array.as_array().map(Vec::len), Some(2));

        let mut entries = BTreeMap::new();
        entries.insert("key_1".to_string(), 1);
        entries.insert("key_2".to_string(), 2);
        let object = Value::from(entries);
        assert_eq!(object["key_1"].as_number(), Some(1.0));
        assert_eq!(object["key_2"].as_number(), Some(2.0));

        let collected: Value = (1..=3).collect();
        assert_eq!(collected.to_json(Format::Minimized), "[1,2,3]");
    }

    #[test]
    fn test_multidimensional_conversions() {
        let array_1d = Value::from(vec![1, 2, 3]);
        let array_2d = Value::from(vec![vec![1, 2], vec![3, 4]]);
        let array_3d = Value::from(vec![vec![vec![1, 2], vec![3, 4]], vec![vec![5, 6]]]);
        assert_eq!(array_1d.to_json(Format::Minimized), "[1,2,3]");
        assert_eq!(array_2d.to_json(Format::Minimized), "[[1,2],[3,4]]");
        assert_eq!(
            array_3d.to_json(Format::Minimized),
            "[[[1,2],[3,4]],[[5,6]]]"
        );
    }

    #[test]
    fn test_deep_copy_and_equality() {
        let mut original = Value::Null;
        original["a"] = Value::from(vec![1, 2]);
        let copy = original.clone();
        assert_eq!(original, copy);

        original["a"][0] = Value::from(9);
        assert_ne!(original, copy);
        assert_eq!(copy["a"][0].as_number(), Some(1.0));
    }

    #[test]
    fn test_display() {
        let root: Value = [("a", 1.0)].into_iter().collect();
        assert_eq!(root.to_string(), r#"{"a":1}"#);
        assert_eq!(format!("{root:#}"), "{\n    \"a\": 1\n}");
    }
}
