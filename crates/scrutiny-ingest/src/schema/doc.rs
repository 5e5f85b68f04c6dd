//! Guarded reading of `report.doc` files.
//!
//! A doc reference must resolve inside the schema directory, name a `.txt`
//! or `.md` file and stay under [`MAX_DOC_BYTES`].

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::errors::{doc_rejected, io_error, Result};

pub const MAX_DOC_BYTES: u64 = 64 * 1024;
const ALLOWED_EXTENSIONS: [&str; 2] = ["txt", "md"];

/// Lexically resolves `.` and `..` without touching the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Reads the doc file `rel_path` relative to `base_dir`.
///
/// Blank paths read as no doc.
///
/// # Errors
///
/// `ERR_DOC_REJECTED` when the path escapes `base_dir`, has the wrong
/// extension, does not exist or is too large; `ERR_IO` when reading fails.
pub fn read_doc(base_dir: &Path, rel_path: &str, section: &str) -> Result<Option<String>> {
    let rel_path = rel_path.trim();
    if rel_path.is_empty() {
        return Ok(None);
    }

    let base_dir = normalize_path(base_dir);
    let abs_path = normalize_path(&base_dir.join(rel_path));

    if !abs_path.starts_with(&base_dir) {
        return Err(doc_rejected(
            section,
            "report.doc path must stay within the schema directory.",
        ));
    }

    let extension = abs_path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(doc_rejected(
            section,
            "report.doc must point to a .txt or .md file.",
        ));
    }

    if !abs_path.is_file() {
        return Err(doc_rejected(
            section,
            format!("report.doc file not found: {}", rel_path),
        ));
    }

    let size = fs::metadata(&abs_path)
        .map_err(|e| io_error("read_doc", &abs_path, e))?
        .len();
    if size > MAX_DOC_BYTES {
        return Err(doc_rejected(
            section,
            format!("report.doc is too large (>64KB): {}", rel_path),
        ));
    }

    let text = fs::read_to_string(&abs_path).map_err(|e| io_error("read_doc", &abs_path, e))?;
    Ok(Some(text))
}
