//! # Calculation History
//!
//! A bounded log of completed calculations, newest first. The log
//! serializes as a plain JSON array of entries; see [`crate::file_io`] for
//! saving and loading it.
//!
//! ## Structure
//!
//! ```text
//! History (≤ 100 entries, newest first)
//! └── HistoryEntry { id, mode, calculation, result, timestamp }
//! ```
//!
//! ## Example
//!
//! ```rust
//! use calc_core::engine::Mode;
//! use calc_core::history::{History, HistoryEntry};
//!
//! let mut history = History::new();
//! history.record(HistoryEntry::new(Mode::Standard, "3 + 4", "7"));
//!
//! let json = history.to_json().unwrap();
//! assert!(json.contains("\"calculation\":\"3 + 4\""));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::Mode;
use crate::errors::{CalcError, CalcResult};

/// Maximum number of entries kept; older entries are evicted first.
pub const MAX_HISTORY_ITEMS: usize = 100;

/// One completed calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,

    /// Mode the calculation was made in
    pub mode: Mode,

    /// What was calculated, e.g. `"3 + 4"` or `"Return on Investment: ..."`
    pub calculation: String,

    /// Displayed result, e.g. `"7"` or `"50.00%"`
    pub result: String,

    #[serde(alias = "date")]
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    /// Create an entry stamped with a fresh id and the current time.
    pub fn new(mode: Mode, calculation: impl Into<String>, result: impl Into<String>) -> Self {
        HistoryEntry {
            id: Uuid::new_v4(),
            mode,
            calculation: calculation.into(),
            result: result.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Bounded, newest-first calculation log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from entries already ordered newest first, dropping any beyond
    /// the cap.
    pub fn from_entries(mut entries: Vec<HistoryEntry>) -> Self {
        entries.truncate(MAX_HISTORY_ITEMS);
        History { entries }
    }

    /// Add an entry at the front, evicting the oldest past the cap.
    ///
    /// Returns the id of the new entry.
    pub fn record(&mut self, entry: HistoryEntry) -> Uuid {
        let id = entry.id;
        self.entries.insert(0, entry);
        self.entries.truncate(MAX_HISTORY_ITEMS);
        id
    }

    /// Remove an entry by id.
    pub fn remove(&mut self, id: &Uuid) -> Option<HistoryEntry> {
        let index = self.entries.iter().position(|e| &e.id == id)?;
        Some(self.entries.remove(index))
    }

    pub fn get(&self, id: &Uuid) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries, newest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize as a JSON array.
    pub fn to_json(&self) -> CalcResult<String> {
        serde_json::to_string(self).map_err(|e| CalcError::SerializationError { reason: e.to_string() })
    }

    /// Parse a JSON array, applying the cap.
    pub fn from_json(json: &str) -> CalcResult<Self> {
        let entries: Vec<HistoryEntry> =
            serde_json::from_str(json).map_err(|e| CalcError::SerializationError { reason: e.to_string() })?;
        Ok(History::from_entries(entries))
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a HistoryEntry;
    type IntoIter = std::slice::Iter<'a, HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(n: usize) -> HistoryEntry {
        HistoryEntry::new(Mode::Standard, format!("{} + 0", n), n.to_string())
    }

    #[test]
    fn test_record_newest_first() {
        let mut history = History::new();
        history.record(entry(1));
        history.record(entry(2));
        assert_eq!(history.len(), 2);
        assert_eq!(history.entries()[0].result, "2");
        assert_eq!(history.entries()[1].result, "1");
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let mut history = History::new();
        for n in 0..(MAX_HISTORY_ITEMS + 5) {
            history.record(entry(n));
        }
        assert_eq!(history.len(), MAX_HISTORY_ITEMS);
        assert_eq!(history.entries()[0].result, (MAX_HISTORY_ITEMS + 4).to_string());
        // Entries 0..5 were evicted
        assert_eq!(history.entries().last().unwrap().result, "5");
    }

    #[test]
    fn test_remove_and_clear() {
        let mut history = History::new();
        let first = history.record(entry(1));
        history.record(entry(2));

        let removed = history.remove(&first).unwrap();
        assert_eq!(removed.result, "1");
        assert!(history.get(&first).is_none());
        assert!(history.remove(&first).is_none());

        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn test_serializes_as_array() {
        let mut history = History::new();
        history.record(HistoryEntry::new(Mode::Financial, "ROI", "50.00%"));
        let json = history.to_json().unwrap();
        assert!(json.starts_with('['));
        assert!(json.contains("\"mode\":\"Financial\""));

        let roundtrip = History::from_json(&json).unwrap();
        assert_eq!(roundtrip, history);
    }

    #[test]
    fn test_accepts_date_field_name() {
        let json = r#"[{
            "id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "mode": "Scientific",
            "calculation": "√ 16",
            "result": "4",
            "date": "2024-05-01T12:00:00Z"
        }]"#;
        let history = History::from_json(json).unwrap();
        assert_eq!(history.entries()[0].mode, Mode::Scientific);
    }

    #[test]
    fn test_from_json_applies_cap() {
        let entries: Vec<HistoryEntry> = (0..150).map(entry).collect();
        let json = serde_json::to_string(&entries).unwrap();
        assert_eq!(History::from_json(&json).unwrap().len(), MAX_HISTORY_ITEMS);
    }

    #[test]
    fn test_invalid_json() {
        let err = History::from_json("{not json").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }
}
