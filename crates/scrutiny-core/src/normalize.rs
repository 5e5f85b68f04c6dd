//! Permissive coercions used by comparators and radar normalization.
//!
//! All parsers return `None` instead of failing so malformed data degrades
//! into "not comparable" rather than an error.

use crate::model::value::{Scalar, Value};

/// Reads yes/no style values.
///
/// Accepts booleans, the numbers `0`/`1`, and the strings
/// `yes`/`true`/`1` and `no`/`false`/`0` (case-insensitive, trimmed).
pub fn parse_boolish(value: &Value) -> Option<bool> {
    match value.as_scalar()? {
        Scalar::Bool(b) => Some(*b),
        Scalar::Int(0) => Some(false),
        Scalar::Int(1) => Some(true),
        Scalar::Int(_) => None,
        Scalar::Float(x) if *x == 0.0 => Some(false),
        Scalar::Float(x) if *x == 1.0 => Some(true),
        Scalar::Float(_) => None,
        Scalar::Str(s) => match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "true" | "1" => Some(true),
            "no" | "false" | "0" => Some(false),
            _ => None,
        },
    }
}

/// Reads a finite number from an int, float or numeric string.
pub fn parse_number(value: &Value) -> Option<f64> {
    let n = match value.as_scalar()? {
        Scalar::Int(i) => *i as f64,
        Scalar::Float(x) => *x,
        Scalar::Str(s) => s.trim().parse::<f64>().ok()?,
        Scalar::Bool(_) => return None,
    };
    n.is_finite().then_some(n)
}

/// Reads a strictly positive integer; floats truncate, strings must be integral.
pub fn parse_positive_count(value: &Value) -> Option<u64> {
    let n = match value.as_scalar()? {
        Scalar::Int(i) => *i,
        Scalar::Float(x) if x.is_finite() => x.trunc() as i64,
        Scalar::Str(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    u64::try_from(n).ok().filter(|n| *n > 0)
}

/// First whitespace-delimited token of a string; blank strings become `""`.
/// Non-strings pass through unchanged.
pub fn first_token(value: &Value) -> Value {
    match value.as_str() {
        Some(s) => Value::str(s.split_whitespace().next().unwrap_or_default()),
        None => value.clone(),
    }
}
