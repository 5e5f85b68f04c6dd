//! Sentinel field names carried in the `field` slot of a diff or match.
//!
//! Report consumers rely on these exact strings, so they never change.

/// The record exists on only one side.
pub const PRESENCE_FIELD: &str = "__presence__";

/// A container-valued field changed by element.
pub const GROUP_FIELD: &str = "__group__";

/// Severity labels as they appear in reports and dashboards.
pub const STATE_MATCH: &str = "MATCH";
pub const STATE_WARN: &str = "WARN";
pub const STATE_SUSPICIOUS: &str = "SUSPICIOUS";
