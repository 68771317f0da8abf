use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single option value.
///
/// This is the closed set of shapes an option can take. Routed keys validate
/// the shape they receive; everything else is stored as given.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// Absent / unset.
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<String>),
    Map(BTreeMap<String, String>),
}

impl OptionValue {
    pub fn is_null(&self) -> bool {
        matches!(self, OptionValue::Null)
    }

    /// Truthiness: null, `false`, zero, and empty strings/collections are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            OptionValue::Null => false,
            OptionValue::Bool(b) => *b,
            OptionValue::Int(n) => *n != 0,
            OptionValue::Float(f) => *f != 0.0,
            OptionValue::Str(s) => !s.is_empty(),
            OptionValue::List(l) => !l.is_empty(),
            OptionValue::Map(m) => !m.is_empty(),
        }
    }

    /// Boolean view. Accepts `Bool` and the integers 0/1.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            OptionValue::Int(0) => Some(false),
            OptionValue::Int(1) => Some(true),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            OptionValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Float view. Integers widen.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            OptionValue::Float(f) => Some(*f),
            OptionValue::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            OptionValue::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            OptionValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Short name of the value's shape, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            OptionValue::Null => "null",
            OptionValue::Bool(_) => "boolean",
            OptionValue::Int(_) => "integer",
            OptionValue::Float(_) => "float",
            OptionValue::Str(_) => "string",
            OptionValue::List(_) => "list",
            OptionValue::Map(_) => "mapping",
        }
    }

    /// Parse a command-line literal: `true`/`false`, integers and floats are
    /// typed, `null` is [`OptionValue::Null`], anything else is a string.
    pub fn parse_literal(raw: &str) -> Self {
        match raw {
            "true" => return OptionValue::Bool(true),
            "false" => return OptionValue::Bool(false),
            "null" => return OptionValue::Null,
            _ => {}
        }
        if let Ok(n) = raw.parse::<i64>() {
            return OptionValue::Int(n);
        }
        if raw.contains('.') {
            if let Ok(f) = raw.parse::<f64>() {
                return OptionValue::Float(f);
            }
        }
        OptionValue::Str(raw.to_string())
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Null => write!(f, "null"),
            OptionValue::Bool(b) => write!(f, "{b}"),
            OptionValue::Int(n) => write!(f, "{n}"),
            OptionValue::Float(x) => write!(f, "{x:?}"),
            OptionValue::Str(s) => write!(f, "{s}"),
            OptionValue::List(l) => write!(f, "[{}]", l.join(", ")),
            OptionValue::Map(m) => {
                let pairs: Vec<String> = m.iter().map(|(k, v)| format!("{k}={v}")).collect();
                write!(f, "{{{}}}", pairs.join(", "))
            }
        }
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Bool(b)
    }
}

impl From<i64> for OptionValue {
    fn from(n: i64) -> Self {
        OptionValue::Int(n)
    }
}

impl From<i32> for OptionValue {
    fn from(n: i32) -> Self {
        OptionValue::Int(n.into())
    }
}

impl From<f64> for OptionValue {
    fn from(f: f64) -> Self {
        OptionValue::Float(f)
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Str(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        OptionValue::Str(s)
    }
}

impl From<Vec<String>> for OptionValue {
    fn from(l: Vec<String>) -> Self {
        OptionValue::List(l)
    }
}

impl From<BTreeMap<String, String>> for OptionValue {
    fn from(m: BTreeMap<String, String>) -> Self {
        OptionValue::Map(m)
    }
}

impl<T: Into<OptionValue>> From<Option<T>> for OptionValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(OptionValue::Null)
    }
}
