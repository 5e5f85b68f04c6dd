//! Three-level severity classification of a section.

use serde::{Deserialize, Serialize};

use crate::core_types::wire::{STATE_MATCH, STATE_SUSPICIOUS, STATE_WARN};
use crate::model::value::Value;
use crate::normalize::{parse_number, parse_positive_count};

/// Severity of a section or a whole report, ordered from benign to worst.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    #[default]
    Match,
    Warn,
    Suspicious,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Match, Severity::Warn, Severity::Suspicious];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Match => STATE_MATCH,
            Severity::Warn => STATE_WARN,
            Severity::Suspicious => STATE_SUSPICIOUS,
        }
    }

    /// Lenient label parsing; anything unrecognized reads as `Warn`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            STATE_MATCH => Severity::Match,
            STATE_SUSPICIOUS => Severity::Suspicious,
            _ => Severity::Warn,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maximum of a set of severities; `Match` when empty.
pub fn max_severity<I: IntoIterator<Item = Severity>>(severities: I) -> Severity {
    severities.into_iter().max().unwrap_or_default()
}

/// Raw threshold values as configured.
///
/// Values stay untyped until evaluation so malformed entries can be treated
/// as absent instead of rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeverityThresholds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold_ratio: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold_count: Option<Value>,
}

impl SeverityThresholds {
    pub fn new(threshold_ratio: Option<Value>, threshold_count: Option<Value>) -> Self {
        Self {
            threshold_ratio: threshold_ratio.filter(|v| !v.is_null()),
            threshold_count: threshold_count.filter(|v| !v.is_null()),
        }
    }

    pub fn ratio(ratio: f64) -> Self {
        Self::new(Some(Value::float(ratio)), None)
    }

    pub fn count(count: i64) -> Self {
        Self::new(None, Some(Value::int(count)))
    }

    /// `other`'s non-null entries replace ours.
    pub fn overlay(&self, other: &SeverityThresholds) -> SeverityThresholds {
        let pick = |mine: &Option<Value>, theirs: &Option<Value>| {
            theirs
                .as_ref()
                .filter(|v| !v.is_null())
                .or(mine.as_ref())
                .cloned()
        };
        SeverityThresholds {
            threshold_ratio: pick(&self.threshold_ratio, &other.threshold_ratio),
            threshold_count: pick(&self.threshold_count, &other.threshold_count),
        }
    }

    /// The ratio threshold, if it parses to a number in `[0, 1]`.
    pub fn effective_ratio(&self) -> Option<f64> {
        self.threshold_ratio
            .as_ref()
            .and_then(parse_number)
            .filter(|r| (0.0..=1.0).contains(r))
    }

    /// The count threshold, if it parses to a positive integer.
    pub fn effective_count(&self) -> Option<u64> {
        self.threshold_count.as_ref().and_then(parse_positive_count)
    }
}

/// Classifies a section from its change counts.
///
/// No change (or nothing compared) is always `Match`. A usable ratio wins
/// over a usable count; with neither, any change is `Warn`.
pub fn compute_severity(thresholds: &SeverityThresholds, changed: u64, compared: u64) -> Severity {
    if compared == 0 || changed == 0 {
        return Severity::Match;
    }

    if let Some(ratio) = thresholds.effective_ratio() {
        let observed = changed as f64 / compared as f64;
        return if observed >= ratio {
            Severity::Suspicious
        } else {
            Severity::Warn
        };
    }

    if let Some(count) = thresholds.effective_count() {
        return if changed >= count {
            Severity::Suspicious
        } else {
            Severity::Warn
        };
    }

    Severity::Warn
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Match < Severity::Warn);
        assert!(Severity::Warn < Severity::Suspicious);
        assert_eq!(
            max_severity([Severity::Warn, Severity::Match, Severity::Suspicious]),
            Severity::Suspicious
        );
        assert_eq!(max_severity(Vec::new()), Severity::Match);
    }

    #[test]
    fn test_from_label_is_lenient() {
        assert_eq!(Severity::from_label("match"), Severity::Match);
        assert_eq!(Severity::from_label(" SUSPICIOUS "), Severity::Suspicious);
        assert_eq!(Severity::from_label("bogus"), Severity::Warn);
    }

    #[test]
    fn test_serializes_as_upper_label() {
        assert_eq!(
            serde_json::to_string(&Severity::Suspicious).unwrap(),
            "\"SUSPICIOUS\""
        );
    }

    #[test]
    fn test_no_change_is_match() {
        let thr = SeverityThresholds::ratio(0.0);
        assert_eq!(compute_severity(&thr, 0, 10), Severity::Match);
        assert_eq!(compute_severity(&thr, 5, 0), Severity::Match);
    }

    #[test]
    fn test_ratio_threshold() {
        let thr = SeverityThresholds::ratio(0.5);
        assert_eq!(compute_severity(&thr, 5, 10), Severity::Suspicious);
        assert_eq!(compute_severity(&thr, 4, 10), Severity::Warn);
    }

    #[test]
    fn test_ratio_beats_count() {
        let thr = SeverityThresholds::new(Some(Value::float(0.9)), Some(Value::int(1)));
        assert_eq!(compute_severity(&thr, 5, 10), Severity::Warn);
    }

    #[test]
    fn test_count_threshold() {
        let thr = SeverityThresholds::count(3);
        assert_eq!(compute_severity(&thr, 3, 100), Severity::Suspicious);
        assert_eq!(compute_severity(&thr, 2, 100), Severity::Warn);
    }

    #[test]
    fn test_malformed_thresholds_are_absent() {
        let thr = SeverityThresholds::new(Some(Value::str("lots")), Some(Value::float(1.7)));
        assert_eq!(thr.effective_ratio(), None);
        assert_eq!(thr.effective_count(), Some(1));
        assert_eq!(compute_severity(&thr, 1, 10), Severity::Suspicious);

        let out_of_range = SeverityThresholds::new(Some(Value::float(1.5)), Some(Value::int(0)));
        assert_eq!(compute_severity(&out_of_range, 9, 10), Severity::Warn);
    }

    #[test]
    fn test_overlay_prefers_other() {
        let base = SeverityThresholds::new(Some(Value::float(0.2)), Some(Value::int(5)));
        let over = SeverityThresholds::new(None, Some(Value::int(2)));
        let merged = base.overlay(&over);
        assert_eq!(merged.threshold_ratio, Some(Value::float(0.2)));
        assert_eq!(merged.threshold_count, Some(Value::int(2)));
    }
}
