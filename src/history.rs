//! Per-session scan history.
//!
//! Append-only, unbounded, in memory. One writer (`record_scan`) and one
//! reader (`summary`) that feeds the trend chart and the most-frequent label.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::HistoryEntry;

/// Number of entries the trend display shows by default.
pub const DEFAULT_TREND_LEN: usize = 10;

#[derive(Debug, Clone, Default)]
pub struct SessionHistory {
    entries: Vec<HistoryEntry>,
}

/// Aggregate view rendered by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistorySummary {
    pub total_scans: usize,
    pub most_frequent_label: Option<String>,
    pub most_frequent_count: usize,
    /// Last N entries, oldest first.
    pub recent: Vec<HistoryEntry>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a scan. Skipped (returns `false`) when the timestamp equals
    /// the last entry's timestamp.
    pub fn record_scan(&mut self, entry: HistoryEntry) -> bool {
        if let Some(last) = self.entries.last() {
            if last.timestamp == entry.timestamp {
                return false;
            }
        }
        self.entries.push(entry);
        true
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Last `n` entries in insertion order.
    pub fn tail(&self, n: usize) -> &[HistoryEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    /// Most frequent label with its count. Ties go to the label seen first.
    pub fn most_frequent_label(&self) -> Option<(&str, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut order: Vec<&str> = Vec::new();
        for entry in &self.entries {
            let count = counts.entry(entry.label.as_str()).or_insert(0);
            if *count == 0 {
                order.push(entry.label.as_str());
            }
            *count += 1;
        }

        let mut best: Option<(&str, usize)> = None;
        for label in order {
            let count = counts[label];
            match best {
                Some((_, best_count)) if count <= best_count => {}
                _ => best = Some((label, count)),
            }
        }
        best
    }

    pub fn summary(&self, tail: usize) -> HistorySummary {
        let (label, count) = match self.most_frequent_label() {
            Some((label, count)) => (Some(label.to_string()), count),
            None => (None, 0),
        };
        HistorySummary {
            total_scans: self.entries.len(),
            most_frequent_label: label,
            most_frequent_count: count,
            recent: self.tail(tail).to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(ts: &str, label: &str) -> HistoryEntry {
        HistoryEntry::new(ts, label, 0.8)
    }

    #[test]
    fn duplicate_timestamp_stored_once() {
        let mut history = SessionHistory::new();
        assert!(history.record_scan(entry("2026-10-16T09:00:00Z", "Tomato_Early_blight")));
        assert!(!history.record_scan(entry("2026-10-16T09:00:00Z", "Tomato_Late_blight")));
        assert_eq!(history.len(), 1);
        assert_eq!(history.entries()[0].label, "Tomato_Early_blight");
    }

    #[test]
    fn only_last_timestamp_is_compared() {
        let mut history = SessionHistory::new();
        history.record_scan(entry("t1", "a"));
        history.record_scan(entry("t2", "b"));
        assert!(history.record_scan(entry("t1", "c")));
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn distinct_timestamps_keep_order() {
        let mut history = SessionHistory::new();
        for (i, label) in ["a", "b", "c"].iter().enumerate() {
            history.record_scan(entry(&format!("t{i}"), label));
        }
        let labels: Vec<&str> = history.entries().iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["a", "b", "c"]);
    }

    #[test]
    fn mode_picks_highest_count() {
        let mut history = SessionHistory::new();
        history.record_scan(entry("t1", "a"));
        history.record_scan(entry("t2", "b"));
        history.record_scan(entry("t3", "b"));
        assert_eq!(history.most_frequent_label(), Some(("b", 2)));
    }

    #[test]
    fn mode_tie_goes_to_first_seen() {
        let mut history = SessionHistory::new();
        history.record_scan(entry("t1", "b"));
        history.record_scan(entry("t2", "a"));
        history.record_scan(entry("t3", "a"));
        history.record_scan(entry("t4", "b"));
        assert_eq!(history.most_frequent_label(), Some(("b", 2)));
    }

    #[test]
    fn empty_history_has_no_mode() {
        let history = SessionHistory::new();
        assert_eq!(history.most_frequent_label(), None);
        let summary = history.summary(DEFAULT_TREND_LEN);
        assert_eq!(summary.total_scans, 0);
        assert!(summary.recent.is_empty());
    }

    #[test]
    fn summary_tail_is_most_recent_in_order() {
        let mut history = SessionHistory::new();
        for i in 0..5 {
            history.record_scan(entry(&format!("t{i}"), &format!("l{i}")));
        }
        let summary = history.summary(2);
        assert_eq!(summary.total_scans, 5);
        assert_eq!(summary.recent.len(), 2);
        assert_eq!(summary.recent[0].label, "l3");
        assert_eq!(summary.recent[1].label, "l4");
    }

    #[test]
    fn tail_longer_than_history_returns_all() {
        let mut history = SessionHistory::new();
        history.record_scan(entry("t1", "a"));
        assert_eq!(history.tail(50).len(), 1);
    }
}
