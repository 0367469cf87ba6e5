//! Most-recent-first calculation history, persisted as a JSON file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Calculation;

/// Entries kept; saving one more evicts the oldest.
pub const MAX_ENTRIES: usize = 20;
pub const DEFAULT_HISTORY_FILE: &str = "cut-histories.json";

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to access history file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("history file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub date: DateTime<Local>,
    #[serde(flatten)]
    pub calculation: Calculation,
    pub total_boards: usize,
    pub total_pieces: u32,
}

impl HistoryEntry {
    pub fn new(date: DateTime<Local>, calculation: Calculation) -> Self {
        Self {
            date,
            total_boards: calculation.board_count(),
            total_pieces: calculation.piece_count(),
            calculation,
        }
    }

    /// One-line summary: date, board size and totals.
    pub fn summary(&self) -> String {
        format!(
            "{}  {}x{}cm  {} boards, {} pieces",
            self.date.format("%Y-%m-%d %H:%M:%S"),
            self.calculation.board_length,
            self.calculation.board_width,
            self.total_boards,
            self.total_pieces
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Put `entry` at index 0, dropping the oldest entries past [`MAX_ENTRIES`].
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.insert(0, entry);
        self.entries.truncate(MAX_ENTRIES);
    }

    /// Load history from `path`. A missing file is an empty history.
    pub fn load(path: &Path) -> Result<Self, HistoryError> {
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no history file yet");
                return Ok(Self::new());
            }
            Err(source) => {
                return Err(HistoryError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let mut history: History = serde_json::from_str(&data)?;
        history.entries.truncate(MAX_ENTRIES);
        tracing::debug!(path = %path.display(), entries = history.len(), "history loaded");
        Ok(history)
    }

    pub fn save(&self, path: &Path) -> Result<(), HistoryError> {
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(path, data).map_err(|source| HistoryError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::Planner;
    use crate::types::{BoardSize, CutRequest};
    use chrono::TimeZone;

    fn entry(width: f64, minute: u32) -> HistoryEntry {
        let requests = vec![CutRequest::new(width, 2)];
        let plan = Planner::new(122.0, requests.clone()).plan();
        let date = Local.with_ymd_and_hms(2026, 3, 1, 12, minute, 0).unwrap();
        HistoryEntry::new(date, Calculation::new(BoardSize::default(), &requests, plan))
    }

    #[test]
    fn test_newest_first() {
        let mut history = History::new();
        history.record(entry(10.0, 0));
        history.record(entry(20.0, 1));
        assert_eq!(history.len(), 2);
        assert_eq!(history.get(0).unwrap().calculation.requests[0].width.value(), 20.0);
        assert_eq!(history.get(1).unwrap().calculation.requests[0].width.value(), 10.0);
    }

    #[test]
    fn test_twenty_first_entry_evicts_oldest() {
        let mut history = History::new();
        for i in 0..MAX_ENTRIES {
            history.record(entry(i as f64 + 1.0, i as u32));
        }
        assert_eq!(history.len(), 20);
        let oldest = history.get(19).unwrap().clone();
        assert_eq!(oldest.calculation.requests[0].width.value(), 1.0);

        history.record(entry(50.0, 30));
        assert_eq!(history.len(), 20);
        assert_eq!(history.get(0).unwrap().calculation.requests[0].width.value(), 50.0);
        assert!(!history.entries().contains(&oldest));
        assert_eq!(history.get(19).unwrap().calculation.requests[0].width.value(), 2.0);
    }

    #[test]
    fn test_entry_totals() {
        let e = entry(61.0, 0);
        assert_eq!(e.total_boards, 1);
        assert_eq!(e.total_pieces, 2);
        assert!(e.summary().contains("244x122cm  1 boards, 2 pieces"));
    }

    #[test]
    fn test_serialized_keys() {
        let json = serde_json::to_value(entry(61.0, 0)).unwrap();
        for key in [
            "date",
            "boardLength",
            "boardWidth",
            "requests",
            "results",
            "totalBoards",
            "totalPieces",
        ] {
            assert!(json.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(json["boardWidth"], "122");
        assert_eq!(json["results"][0]["remain"], "0");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_HISTORY_FILE);
        let mut history = History::new();
        history.record(entry(33.333, 0));
        history.record(entry(61.0, 1));
        history.save(&path).unwrap();

        let loaded = History::load(&path).unwrap();
        assert_eq!(loaded, history);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = History::load(&dir.path().join("absent.json")).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_load_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(History::load(&path), Err(HistoryError::Json(_))));
    }
}
