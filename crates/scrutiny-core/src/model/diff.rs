//! Diff and match entries produced by comparators.

use serde::{Deserialize, Serialize};

use crate::core_types::wire::{GROUP_FIELD, PRESENCE_FIELD};
use crate::model::value::Value;

/// The field a diff or match refers to.
///
/// Serialized as a plain string; the two sentinel variants use the reserved
/// wire markers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DiffField {
    /// The record exists on only one side.
    Presence,
    /// A container field changed by element.
    Group,
    Named(String),
}

impl DiffField {
    pub fn named(name: impl Into<String>) -> Self {
        DiffField::Named(name.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            DiffField::Presence => PRESENCE_FIELD,
            DiffField::Group => GROUP_FIELD,
            DiffField::Named(name) => name,
        }
    }
}

impl From<String> for DiffField {
    fn from(s: String) -> Self {
        match s.as_str() {
            PRESENCE_FIELD => DiffField::Presence,
            GROUP_FIELD => DiffField::Group,
            _ => DiffField::Named(s),
        }
    }
}

impl From<DiffField> for String {
    fn from(field: DiffField) -> Self {
        match field {
            DiffField::Named(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for DiffField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relation between the reference and profile value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">")]
    Gt,
    /// Group element removed or added.
    #[serde(rename = "->")]
    Arrow,
}

impl Op {
    pub fn as_str(&self) -> &'static str {
        match self {
            Op::Eq => "==",
            Op::Ne => "!=",
            Op::Lt => "<",
            Op::Gt => ">",
            Op::Arrow => "->",
        }
    }

    /// Ordering of two finite numbers as an op.
    pub fn compare(reference: f64, test: f64) -> Self {
        if reference == test {
            Op::Eq
        } else if reference < test {
            Op::Lt
        } else {
            Op::Gt
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One observed difference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diff {
    pub key: String,
    pub field: DiffField,
    #[serde(rename = "ref")]
    pub reference: Value,
    pub op: Op,
    pub test: Value,
}

impl Diff {
    pub fn new(
        key: impl Into<String>,
        field: DiffField,
        reference: Value,
        op: Op,
        test: Value,
    ) -> Self {
        Self {
            key: key.into(),
            field,
            reference,
            op,
            test,
        }
    }

    /// `field` differs (`!=`).
    pub fn changed(key: impl Into<String>, field: impl Into<String>, reference: Value, test: Value) -> Self {
        Self::new(key, DiffField::named(field), reference, Op::Ne, test)
    }

    pub fn only_in_reference(key: impl Into<String>) -> Self {
        Self::new(key, DiffField::Presence, Value::bool(true), Op::Ne, Value::bool(false))
    }

    pub fn only_in_profile(key: impl Into<String>) -> Self {
        Self::new(key, DiffField::Presence, Value::bool(false), Op::Ne, Value::bool(true))
    }

    pub fn group_removed(key: impl Into<String>, item: Value) -> Self {
        Self::new(key, DiffField::Group, item, Op::Arrow, Value::Null)
    }

    pub fn group_added(key: impl Into<String>, item: Value) -> Self {
        Self::new(key, DiffField::Group, Value::Null, Op::Arrow, item)
    }

    pub fn is_presence(&self) -> bool {
        self.field == DiffField::Presence
    }
}

/// One field that compared equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub key: String,
    pub field: DiffField,
    pub value: Value,
}

impl Match {
    pub fn new(key: impl Into<String>, field: DiffField, value: Value) -> Self {
        Self {
            key: key.into(),
            field,
            value,
        }
    }
}
