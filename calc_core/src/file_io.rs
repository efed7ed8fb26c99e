//! # File I/O Module
//!
//! Persists the calculation history as a JSON array.
//!
//! - **Atomic saves**: write to `.tmp`, fsync, rename, so an interrupted
//!   save never leaves a truncated history file
//! - **Wholesale rewrite**: the whole log is written on every change; the
//!   last writer wins
//! - **Forgiving load**: a missing file is an empty history, and
//!   [`load_history_or_default`] also treats a corrupt file as empty
//!
//! ## Example
//!
//! ```rust,no_run
//! use calc_core::engine::Mode;
//! use calc_core::file_io::{load_history_or_default, save_history};
//! use calc_core::history::HistoryEntry;
//! use std::path::Path;
//!
//! let path = Path::new("calculator_history.json");
//! let mut history = load_history_or_default(path);
//! history.record(HistoryEntry::new(Mode::Standard, "2 + 2", "4"));
//! save_history(&history, path)?;
//! # Ok::<(), calc_core::errors::CalcError>(())
//! ```

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::errors::{CalcError, CalcResult};
use crate::history::History;

/// Save the history with atomic write semantics.
///
/// The save process:
/// 1. Serialize history to JSON
/// 2. Write to a temporary file next to the target
/// 3. Sync to disk (fsync)
/// 4. Rename over the target (atomic on most filesystems)
pub fn save_history(history: &History, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(history).map_err(|e| CalcError::SerializationError {
        reason: e.to_string(),
    })?;

    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    debug!(path = %path.display(), entries = history.len(), "history saved");
    Ok(())
}

/// Load the history from a file.
///
/// # Returns
///
/// * `Ok(History)` - loaded history, or empty if the file does not exist
/// * `Err(CalcError::SerializationError)` - invalid JSON
/// * `Err(CalcError::FileError)` - any other I/O error
pub fn load_history(path: &Path) -> CalcResult<History> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(History::new()),
        Err(e) => return Err(CalcError::file_error("read", path.display().to_string(), e.to_string())),
    };

    History::from_json(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid history in {}: {}", path.display(), e),
    })
}

/// Load the history, falling back to an empty one on any error.
pub fn load_history_or_default(path: &Path) -> History {
    load_history(path).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "could not load history, starting empty");
        History::new()
    })
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Mode;
    use crate::history::HistoryEntry;
    use std::env::temp_dir;

    fn temp_history_path(name: &str) -> PathBuf {
        temp_dir().join(format!("calc_core_test_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn test_tmp_path_generation() {
        let path = Path::new("/path/to/history.json");
        assert_eq!(tmp_path_for(path), Path::new("/path/to/history.json.tmp"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_history_path("roundtrip");

        let mut history = History::new();
        history.record(HistoryEntry::new(Mode::Standard, "3 + 4", "7"));
        history.record(HistoryEntry::new(Mode::Measurement, "1 m → ft", "3.28 ft"));
        save_history(&history, &path).unwrap();

        let loaded = load_history(&path).unwrap();
        assert_eq!(loaded, history);
        assert_eq!(loaded.entries()[0].result, "3.28 ft");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_save_creates_no_tmp_file() {
        let path = temp_history_path("atomic");

        save_history(&History::new(), &path).unwrap();

        assert!(!tmp_path_for(&path).exists());
        assert!(path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_is_empty_history() {
        let path = temp_history_path("missing");
        let _ = fs::remove_file(&path);
        assert!(load_history(&path).unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_file() {
        let path = temp_history_path("corrupt");
        fs::write(&path, "not json").unwrap();

        let err = load_history(&path).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
        assert!(load_history_or_default(&path).is_empty());

        let _ = fs::remove_file(&path);
    }
}
