//! String-keyed table of comparators.
//!
//! The registry is built once at start-up and only read afterwards. Names
//! are trimmed and lower-cased on the way in and on lookup.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::comparators::{BasicComparator, Comparator, FieldNormalizedComparator, PerformanceComparator};
use crate::errors::{ExError, Result, ScrutinyError};

/// Name of the fallback comparator.
pub const BASIC: &str = "basic";
pub const PERFORMANCE: &str = "performance";
pub const FIELD_NORMALIZED: &str = "field_normalized";

/// Legacy names kept as aliases of the built-ins.
const ALGPERF_ALIAS: &str = "algperf";
const CPLC_ALIAS: &str = "cplc";

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[derive(Clone, Default)]
pub struct ComparatorRegistry {
    entries: BTreeMap<String, Arc<dyn Comparator>>,
}

/// A comparator chosen for a section.
#[derive(Clone)]
pub struct ResolvedComparator {
    pub comparator: Arc<dyn Comparator>,
    /// Name the comparator was found under.
    pub name: String,
    /// Requested name was unknown and `basic` was used instead.
    pub fell_back: bool,
}

impl fmt::Debug for ComparatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComparatorRegistry")
            .field("names", &self.available())
            .finish()
    }
}

impl fmt::Debug for ResolvedComparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedComparator")
            .field("name", &self.name)
            .field("fell_back", &self.fell_back)
            .finish()
    }
}

impl ComparatorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with `basic`, `performance` (alias `algperf`) and
    /// `field_normalized` (alias `cplc`).
    pub fn with_builtins() -> Self {
        let basic: Arc<dyn Comparator> = Arc::new(BasicComparator);
        let performance: Arc<dyn Comparator> = Arc::new(PerformanceComparator);
        let field_normalized: Arc<dyn Comparator> = Arc::new(FieldNormalizedComparator);

        let mut entries = BTreeMap::new();
        entries.insert(BASIC.to_string(), basic);
        entries.insert(PERFORMANCE.to_string(), performance.clone());
        entries.insert(ALGPERF_ALIAS.to_string(), performance);
        entries.insert(FIELD_NORMALIZED.to_string(), field_normalized.clone());
        entries.insert(CPLC_ALIAS.to_string(), field_normalized);
        Self { entries }
    }

    /// Registers `comparator` under `name`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// `ERR_INVALID_COMPARATOR_NAME` when the name is blank.
    pub fn register(&mut self, name: &str, comparator: Arc<dyn Comparator>) -> Result<()> {
        let key = normalize_name(name);
        if key.is_empty() {
            return Err(ScrutinyError::EmptyComparatorName.into());
        }
        self.entries.insert(key, comparator);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Comparator>> {
        self.entries.get(&normalize_name(name)).cloned()
    }

    /// Registered names in sorted order.
    pub fn available(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Looks up the comparator for `section`, falling back to `basic` with
    /// a single warning when `name` is unknown.
    ///
    /// # Errors
    ///
    /// `ERR_COMPARATOR_NOT_FOUND` when neither `name` nor `basic` is registered.
    pub fn resolve(&self, section: &str, name: &str) -> Result<ResolvedComparator> {
        let key = normalize_name(name);
        if let Some(comparator) = self.entries.get(&key) {
            return Ok(ResolvedComparator {
                comparator: comparator.clone(),
                name: key,
                fell_back: false,
            });
        }

        let basic = self.entries.get(BASIC).ok_or_else(|| {
            ExError::from(ScrutinyError::FallbackUnavailable {
                section: section.to_string(),
                name: key.clone(),
            })
        })?;

        tracing::warn!(
            section = section,
            comparator = key.as_str(),
            "comparator not found; falling back to 'basic'"
        );

        Ok(ResolvedComparator {
            comparator: basic.clone(),
            name: BASIC.to_string(),
            fell_back: true,
        })
    }
}
