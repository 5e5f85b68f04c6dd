//! Deterministic digest of a report.
//!
//! ## Determinism Guarantees
//!
//! - Every map in the report is ordered, so serialization is canonical
//! - Same inputs to the assembler → same digest

use sha2::{Digest, Sha256};

use crate::errors::{ExError, ExErrorKind, Result};
use crate::report::model::Report;

/// Compact canonical JSON of a report.
///
/// # Errors
///
/// `ERR_SERIALIZATION` if the report cannot be serialized.
pub fn to_canonical_json(report: &Report) -> Result<String> {
    serde_json::to_string(report).map_err(|e| {
        ExError::new(ExErrorKind::Serialization)
            .with_op("report_digest")
            .with_message(e.to_string())
    })
}

/// Hex-encoded SHA256 of [`to_canonical_json`].
///
/// # Errors
///
/// `ERR_SERIALIZATION` if the report cannot be serialized.
pub fn report_digest(report: &Report) -> Result<String> {
    let canonical = to_canonical_json(report)?;
    Ok(hash_string(&canonical))
}

fn hash_string(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_string_deterministic() {
        let hash1 = hash_string("report");
        let hash2 = hash_string("report");
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
        assert_ne!(hash1, hash_string("report2"));
    }
}
