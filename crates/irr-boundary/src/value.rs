//! Typed variable values and access classes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A typed boundary variable value.
///
/// Timestamps are tagged optionals on the wire as well: an inactive schedule
/// is `null`, never a sentinel date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Bool(bool),
    Int(i64),
    Text(String),
    DateTime(Option<DateTime<Utc>>),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Text(_) => ValueKind::Text,
            Value::DateTime(_) => ValueKind::DateTime,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<Option<DateTime<Utc>>> {
        match self {
            Value::DateTime(t) => Some(*t),
            _ => None,
        }
    }
}

/// Wire type of a variable, fixed at address-space construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Bool,
    Int,
    Text,
    DateTime,
}

/// Who owns writes to a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessClass {
    /// Fixed at startup: descriptions and topology metadata.
    Static,
    /// Server-authoritative: mirrored from the model each tick.
    Status,
    /// Client-writable command intake, consumed by the reconciliation loop.
    Command,
}

impl AccessClass {
    pub fn client_writable(self) -> bool {
        matches!(self, AccessClass::Command)
    }
}
