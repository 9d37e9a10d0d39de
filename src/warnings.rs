//! Warning tracking for recoverable replay faults.
//!
//! Reconstruction must not fail loudly on a single bad event, and must not
//! fail silently either: every recovered anomaly (duplicate add, cancel of
//! an unknown order, malformed input record) is recorded here with enough
//! context for root-cause analysis, in addition to the `log` line emitted at
//! the fault site.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Category of warning for classification and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WarningCategory {
    /// Add event for an order identifier that already exists
    DuplicateOrder,

    /// Cancel/reduce referencing an unknown order
    OrderNotFound,

    /// Input record that could not be decoded
    MalformedRecord,

    /// Well-typed event with field values the book cannot apply
    InvalidEvent,

    /// Index and ladder state disagree
    InconsistentState,

    /// Other/uncategorized warning
    Other,
}

impl WarningCategory {
    /// Human-readable name for the category.
    pub fn name(&self) -> &'static str {
        match self {
            WarningCategory::DuplicateOrder => "DUPLICATE_ORDER",
            WarningCategory::OrderNotFound => "ORDER_NOT_FOUND",
            WarningCategory::MalformedRecord => "MALFORMED_RECORD",
            WarningCategory::InvalidEvent => "INVALID_EVENT",
            WarningCategory::InconsistentState => "INCONSISTENT_STATE",
            WarningCategory::Other => "OTHER",
        }
    }
}

/// A single warning record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warning {
    /// Unique warning ID (auto-incremented)
    pub id: u64,

    /// Warning category
    pub category: WarningCategory,

    /// Human-readable message
    pub message: String,

    /// Event timestamp at the fault site (data time, not wall clock)
    pub ts_event: Option<u64>,

    /// Related order ID (if applicable)
    pub order_id: Option<u64>,

    /// Feed sequence number (if applicable)
    pub sequence: Option<u64>,
}

/// Per-category counts plus the total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarningSummary {
    pub total: u64,
    pub by_category: HashMap<String, u64>,
}

/// Accumulates warnings during a replay run.
#[derive(Debug, Clone, Default)]
pub struct WarningTracker {
    warnings: Vec<Warning>,
    next_id: u64,
}

impl WarningTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning.
    pub fn record(
        &mut self,
        category: WarningCategory,
        message: impl Into<String>,
        ts_event: Option<u64>,
        order_id: Option<u64>,
        sequence: Option<u64>,
    ) {
        self.next_id += 1;
        self.warnings.push(Warning {
            id: self.next_id,
            category,
            message: message.into(),
            ts_event,
            order_id,
            sequence,
        });
    }

    /// All recorded warnings, in recording order.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Total warning count.
    #[inline]
    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    /// True when nothing has been recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Count of warnings in one category.
    pub fn count(&self, category: WarningCategory) -> u64 {
        self.warnings
            .iter()
            .filter(|w| w.category == category)
            .count() as u64
    }

    /// Summarize counts per category.
    pub fn summary(&self) -> WarningSummary {
        let mut by_category: HashMap<String, u64> = HashMap::new();
        for w in &self.warnings {
            *by_category.entry(w.category.name().to_string()).or_insert(0) += 1;
        }
        WarningSummary {
            total: self.warnings.len() as u64,
            by_category,
        }
    }

    /// Export all warnings as JSON lines, one warning per line.
    pub fn export_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        for warning in &self.warnings {
            let json = serde_json::to_string(warning).unwrap_or_default();
            writeln!(writer, "{json}")?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Discard all recorded warnings.
    pub fn clear(&mut self) {
        self.warnings.clear();
        self.next_id = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_count() {
        let mut tracker = WarningTracker::new();
        tracker.record(
            WarningCategory::DuplicateOrder,
            "Add for existing order 7",
            Some(1_000),
            Some(7),
            Some(3),
        );
        tracker.record(
            WarningCategory::OrderNotFound,
            "Cancel for unknown order 99",
            Some(2_000),
            Some(99),
            Some(4),
        );
        tracker.record(
            WarningCategory::OrderNotFound,
            "Cancel for unknown order 100",
            None,
            Some(100),
            None,
        );

        assert_eq!(tracker.len(), 3);
        assert_eq!(tracker.count(WarningCategory::OrderNotFound), 2);
        assert_eq!(tracker.count(WarningCategory::DuplicateOrder), 1);
        assert_eq!(tracker.count(WarningCategory::MalformedRecord), 0);

        // IDs are sequential
        assert_eq!(tracker.warnings()[0].id, 1);
        assert_eq!(tracker.warnings()[2].id, 3);
    }

    #[test]
    fn test_summary() {
        let mut tracker = WarningTracker::new();
        tracker.record(WarningCategory::DuplicateOrder, "dup", None, None, None);
        tracker.record(WarningCategory::DuplicateOrder, "dup", None, None, None);

        let summary = tracker.summary();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.by_category.get("DUPLICATE_ORDER"), Some(&2));
    }

    #[test]
    fn test_clear() {
        let mut tracker = WarningTracker::new();
        tracker.record(WarningCategory::Other, "x", None, None, None);
        tracker.clear();
        assert!(tracker.is_empty());
    }
}
