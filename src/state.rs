//! Sync-state persistence.
//!
//! The state file is a single pretty-printed JSON object mapping issue
//! number to the timestamp of its last successful sync. It is read at the
//! start of a run and replaced wholesale at the end; this module does no
//! merging, callers pass the full desired mapping.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::warn;

use crate::models::SyncState;

/// Load the persisted state, or an empty map when the file does not exist.
///
/// A file that exists but cannot be parsed is treated as empty with a
/// warning; a corrupt state file must never take down a run.
pub fn load_state(path: &Path) -> SyncState {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return SyncState::new(),
        Err(e) => {
            warn!(path = %path.display(), "state file unreadable, starting empty: {}", e);
            return SyncState::new();
        }
    };

    match serde_json::from_str(&content) {
        Ok(state) => state,
        Err(e) => {
            warn!(path = %path.display(), "state file unparseable, starting empty: {}", e);
            SyncState::new()
        }
    }
}

/// Atomically replace the persisted state with exactly `state`.
///
/// Writes a sibling temp file and renames it over the target, so a crash
/// mid-write never leaves a half-written state file behind.
pub fn save_state(path: &Path, state: &SyncState) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create state directory: {}", parent.display())
            })?;
        }
    }

    let json = serde_json::to_string_pretty(state)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json)
        .with_context(|| format!("Failed to write state file: {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("Failed to replace state file: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn missing_file_loads_empty() {
        let tmp = tempfile::TempDir::new().unwrap();
        let state = load_state(&tmp.path().join("nope.json"));
        assert!(state.is_empty());
    }

    #[test]
    fn round_trip() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("state").join("last_sync_state.json");

        let mut state = SyncState::new();
        state.insert(1, Utc.with_ymd_and_hms(2025, 8, 1, 10, 0, 0).unwrap());
        state.insert(4, Utc.with_ymd_and_hms(2025, 8, 2, 11, 30, 5).unwrap());

        save_state(&path, &state).unwrap();
        assert_eq!(load_state(&path), state);
    }

    #[test]
    fn round_trip_empty_map() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("state.json");

        save_state(&path, &SyncState::new()).unwrap();
        assert!(path.exists());
        assert!(load_state(&path).is_empty());
    }

    #[test]
    fn corrupt_file_loads_empty_without_panicking() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("state.json");
        std::fs::write(&path, "{not json at all").unwrap();

        assert!(load_state(&path).is_empty());
    }

    #[test]
    fn save_replaces_previous_contents_wholesale() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("state.json");

        let mut first = SyncState::new();
        first.insert(1, Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap());
        first.insert(2, Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap());
        save_state(&path, &first).unwrap();

        let mut second = SyncState::new();
        second.insert(2, Utc.with_ymd_and_hms(2025, 8, 2, 0, 0, 0).unwrap());
        save_state(&path, &second).unwrap();

        let loaded = load_state(&path);
        assert_eq!(loaded, second);
        assert!(!loaded.contains_key(&1));
    }

    #[test]
    fn file_is_human_readable_json() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("state.json");

        let mut state = SyncState::new();
        state.insert(3, Utc.with_ymd_and_hms(2025, 8, 2, 9, 0, 0).unwrap());
        save_state(&path, &state).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"3\""));
        assert!(raw.contains("2025-08-02T09:00:00Z"));
    }
}
