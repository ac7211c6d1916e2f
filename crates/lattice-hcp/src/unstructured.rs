//! Typed path access into unstructured documents
//!
//! Every lookup answers one of three ways: the value is there with the
//! expected shape, it is absent, or it is present with some other shape.
//! `null` counts as absent, matching how the API server treats unset fields.

use serde_json::{Map, Value};

use crate::error::HcpError;
use crate::Result;

/// Outcome of a typed lookup into a document
#[derive(Clone, Debug, PartialEq)]
pub enum Lookup<T> {
    /// The field is present with the expected shape
    Found(T),
    /// The field, or one of its parents, is missing or null
    Absent,
    /// The field, or one of its parents, is present with the wrong shape
    WrongType {
        /// Shape needed at the mismatch
        expected: &'static str,
        /// Shape actually present
        found: &'static str,
        /// Path segments below the mismatch; 0 when the field itself is wrong
        below: usize,
    },
}

impl<T> Lookup<T> {
    /// Treat a shape mismatch as malformed; absence stays `None`
    ///
    /// `field` is the dotted path of the lookup. When a parent is the
    /// mismatch, the error names that parent instead.
    pub fn required(self, field: &str) -> Result<Option<T>> {
        match self {
            Lookup::Found(v) => Ok(Some(v)),
            Lookup::Absent => Ok(None),
            Lookup::WrongType {
                expected,
                found,
                below,
            } => Err(HcpError::malformed(
                parent_path(field, below),
                expected,
                found,
            )),
        }
    }

    /// Fold a shape mismatch into absence
    pub fn lenient(self) -> Option<T> {
        match self {
            Lookup::Found(v) => Some(v),
            _ => None,
        }
    }

    /// Returns true if the lookup hit a value of the wrong shape
    pub fn is_wrong_type(&self) -> bool {
        matches!(self, Lookup::WrongType { .. })
    }
}

/// Strip `levels` trailing segments from a dotted field path
fn parent_path(field: &str, levels: usize) -> &str {
    let mut path = field;
    for _ in 0..levels {
        match path.rfind('.') {
            Some(idx) => path = &path[..idx],
            None => break,
        }
    }
    path
}

/// JSON kind name used in error messages
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Walk `path` through nested mappings starting at `root`
pub fn nested<'a>(root: &'a Value, path: &[&str]) -> Lookup<&'a Value> {
    let mut current = root;
    for (depth, segment) in path.iter().enumerate() {
        current = match current {
            Value::Object(map) => match map.get(*segment) {
                Some(v) => v,
                None => return Lookup::Absent,
            },
            Value::Null => return Lookup::Absent,
            other => {
                return Lookup::WrongType {
                    expected: "object",
                    found: kind_of(other),
                    below: path.len() - depth,
                }
            }
        };
    }
    if current.is_null() {
        Lookup::Absent
    } else {
        Lookup::Found(current)
    }
}

/// Look up a string at `path`
pub fn nested_str<'a>(root: &'a Value, path: &[&str]) -> Lookup<&'a str> {
    typed(nested(root, path), "string", Value::as_str)
}

/// Look up a mapping at `path`
pub fn nested_map<'a>(root: &'a Value, path: &[&str]) -> Lookup<&'a Map<String, Value>> {
    typed(nested(root, path), "object", Value::as_object)
}

/// Look up a sequence at `path`
pub fn nested_slice<'a>(root: &'a Value, path: &[&str]) -> Lookup<&'a [Value]> {
    typed(nested(root, path), "array", |v| {
        v.as_array().map(Vec::as_slice)
    })
}

/// Look up an integer at `path`
///
/// Floats and integers outside the `i64` range are mismatches.
pub fn nested_i64(root: &Value, path: &[&str]) -> Lookup<i64> {
    typed(nested(root, path), "integer", Value::as_i64)
}

fn typed<'a, T>(
    lookup: Lookup<&'a Value>,
    expected: &'static str,
    cast: impl FnOnce(&'a Value) -> Option<T>,
) -> Lookup<T> {
    match lookup {
        Lookup::Found(v) => match cast(v) {
            Some(t) => Lookup::Found(t),
            None => Lookup::WrongType {
                expected,
                found: kind_of(v),
                below: 0,
            },
        },
        Lookup::Absent => Lookup::Absent,
        Lookup::WrongType {
            expected,
            found,
            below,
        } => Lookup::WrongType {
            expected,
            found,
            below,
        },
    }
}
