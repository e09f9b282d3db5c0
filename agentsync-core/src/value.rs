//! Loosely-typed value tree produced by the parser.
//!
//! The tree is deliberately untyped: the [`crate::validate`] pass decides what
//! is an error, and [`crate::normalize`] turns whatever survived into a
//! [`crate::types::Document`].

use std::fmt;

/// A parsed scalar or collection.
///
/// `Map` keeps insertion order; duplicate keys are resolved last-write-wins by
/// [`Value::insert`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<Value>),
    Map(Vec<(String, Value)>),
}

impl Value {
    /// An empty ordered map.
    pub fn map() -> Self {
        Value::Map(Vec::new())
    }

    /// Look up `key` when `self` is a map.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Mutable lookup of `key` when `self` is a map.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        match self {
            Value::Map(entries) => entries
                .iter_mut()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// Insert or replace `key`. `Null` is promoted to an empty map first;
    /// any other non-map is left untouched.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        if *self == Value::Null {
            *self = Value::map();
        }
        let Value::Map(entries) = self else {
            return;
        };
        let key = key.into();
        if let Some(slot) = entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            entries.push((key, value));
        }
    }

    /// Append to a list. `Null` is promoted to an empty list first.
    pub fn push(&mut self, value: Value) {
        if *self == Value::Null {
            *self = Value::List(Vec::new());
        }
        if let Value::List(items) = self {
            items.push(value);
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// An integer, or a string spelling a whole number (`"1"`, `"1.0"`).
    pub fn as_whole_number(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Str(s) => {
                let s = s.trim();
                if let Ok(v) = s.parse::<i64>() {
                    return Some(v);
                }
                let f = s.parse::<f64>().ok()?;
                let whole = f.is_finite() && f.fract() == 0.0;
                (whole && f.abs() < i64::MAX as f64).then_some(f as i64)
            }
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn entries(&self) -> Option<&[(String, Value)]> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Scalar rendered as text (strings, integers and booleans), trimmed.
    ///
    /// Used by the normalizer, which accepts `build: 42` where the validator
    /// would not.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Str(s) => Some(s.trim().to_string()),
            Value::Int(i) => Some(i.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// `true` for a string made only of whitespace, or `Null`.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Str(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Short type label for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "mapping",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// Convert a strictly-parsed YAML value into the loose tree.
///
/// Floats and other non-integer numbers become strings; tagged values are
/// unwrapped; non-string keys are stringified.
impl From<serde_yaml::Value> for Value {
    fn from(value: serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Null => Value::Null,
            serde_yaml::Value::Bool(b) => Value::Bool(b),
            serde_yaml::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Str(n.to_string()),
            },
            serde_yaml::Value::String(s) => Value::Str(s),
            serde_yaml::Value::Sequence(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_yaml::Value::Mapping(mapping) => {
                let mut out = Value::map();
                for (k, v) in mapping {
                    let key = match Value::from(k) {
                        Value::Str(s) => s,
                        other => other.to_string(),
                    };
                    out.insert(key, Value::from(v));
                }
                out
            }
            serde_yaml::Value::Tagged(tagged) => Value::from(tagged.value),
        }
    }
}
