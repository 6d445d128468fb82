//! History of completed runs.
//!
//! The session hands every [`SortRecord`] to a [`HistorySink`]. A failing
//! sink is logged and never affects the run itself.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::SortRecord;

/// Default file name of the per-mode comparison summary
pub const SUMMARY_FILE: &str = "comparison_summary.json";

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("history encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Receiver of completed-run records
pub trait HistorySink {
    fn record(&mut self, record: &SortRecord) -> Result<(), HistoryError>;
}

/// Discards every record
#[derive(Debug, Default)]
pub struct NoHistory;

impl HistorySink for NoHistory {
    fn record(&mut self, _record: &SortRecord) -> Result<(), HistoryError> {
        Ok(())
    }
}

/// Keeps records in memory. Clones share the same list, so a caller can hold
/// one handle while the session owns another.
#[derive(Clone, Debug, Default)]
pub struct MemoryHistory {
    records: Rc<RefCell<Vec<SortRecord>>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<SortRecord> {
        self.records.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }
}

impl HistorySink for MemoryHistory {
    fn record(&mut self, record: &SortRecord) -> Result<(), HistoryError> {
        self.records.borrow_mut().push(record.clone());
        Ok(())
    }
}

/// Line of the comparison summary
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub algorithm: String,
    pub time_ms: f64,
    pub memory_kb: Option<f64>,
    pub timestamp_ms: u64,
}

/// Comparison summary: data mode name -> runs in completion order
pub type Summary = BTreeMap<String, Vec<SummaryEntry>>;

/// Writes one JSON file per run and keeps a per-mode comparison summary.
#[derive(Clone, Debug)]
pub struct JsonHistory {
    dir: PathBuf,
    summary_file: String,
}

impl JsonHistory {
    /// Sink writing into `dir`, which must already exist
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            summary_file: SUMMARY_FILE.to_string(),
        }
    }

    /// Create `dir` if needed, then build the sink
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self, HistoryError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self::new(dir))
    }

    pub fn with_summary_file(mut self, name: impl Into<String>) -> Self {
        self.summary_file = name.into();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn summary_path(&self) -> PathBuf {
        self.dir.join(&self.summary_file)
    }

    /// File name of the per-run entry for `record`. Runs finishing in the
    /// same millisecond get a `_<n>` suffix from `attempt` 1 onwards.
    pub fn entry_file_name(record: &SortRecord, attempt: u32) -> String {
        let stem = format!(
            "sort_{}_{}_{}",
            record.algorithm.replace(' ', "_"),
            record.data_mode,
            record.timestamp_ms
        );
        if attempt == 0 {
            format!("{}.json", stem)
        } else {
            format!("{}_{}.json", stem, attempt)
        }
    }

    /// Write `contents` to a fresh entry file, never replacing an earlier one
    fn write_entry(&self, record: &SortRecord, contents: &[u8]) -> Result<PathBuf, HistoryError> {
        let mut attempt = 0;
        loop {
            let path = self.dir.join(Self::entry_file_name(record, attempt));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(contents)?;
                    return Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Read the summary, starting fresh when it is missing or unreadable
    pub fn load_summary(&self) -> Summary {
        let path = self.summary_path();
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Summary::new(),
            Err(e) => {
                warn!("Could not read {}: {}. Starting fresh.", path.display(), e);
                return Summary::new();
            }
        };
        match serde_json::from_str(&text) {
            Ok(summary) => summary,
            Err(e) => {
                warn!("Could not decode {}: {}. Starting fresh.", path.display(), e);
                Summary::new()
            }
        }
    }

    fn update_summary(&self, record: &SortRecord) -> Result<(), HistoryError> {
        let mut summary = self.load_summary();
        summary
            .entry(record.data_mode.to_string())
            .or_default()
            .push(SummaryEntry {
                algorithm: record.algorithm.clone(),
                time_ms: record.duration_ms,
                memory_kb: record.peak_memory_kb,
                timestamp_ms: record.timestamp_ms,
            });
        fs::write(self.summary_path(), serde_json::to_vec_pretty(&summary)?)?;
        Ok(())
    }
}

impl HistorySink for JsonHistory {
    fn record(&mut self, record: &SortRecord) -> Result<(), HistoryError> {
        let record = record.rounded();
        let path = self.write_entry(&record, &serde_json::to_vec_pretty(&record)?)?;
        debug!("Saved history to: {}", path.display());
        self.update_summary(&record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DataMode, Item};
    use crate::session::InputPreview;

    fn record(algorithm: &str, mode: DataMode, ts: u64) -> SortRecord {
        SortRecord {
            algorithm: algorithm.to_string(),
            data_mode: mode,
            input: InputPreview::of(&[Item::Number(3), Item::Number(1)], 5),
            duration_ms: 12.345678,
            peak_memory_kb: Some(1.23456),
            timestamp_ms: ts,
        }
    }

    #[test]
    fn test_memory_history_shares_records() {
        let history = MemoryHistory::new();
        let mut sink = history.clone();
        sink.record(&record("Merge Sort", DataMode::Numbers, 1)).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history.records()[0].algorithm, "Merge Sort");
    }

    #[test]
    fn test_json_history_writes_entry_and_summary() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = JsonHistory::create(dir.path().join("history")).unwrap();

        sink.record(&record("Merge Sort", DataMode::Numbers, 1000)).unwrap();
        sink.record(&record("Quick Sort", DataMode::Numbers, 2000)).unwrap();
        sink.record(&record("Heap Sort", DataMode::Words, 3000)).unwrap();

        let entry_path = sink.dir().join("sort_Merge_Sort_numbers_1000.json");
        let saved: SortRecord =
            serde_json::from_str(&fs::read_to_string(entry_path).unwrap()).unwrap();
        assert_eq!(saved.duration_ms, 12.346);
        assert_eq!(saved.peak_memory_kb, Some(1.23));

        let summary = sink.load_summary();
        let numbers: Vec<&str> = summary["numbers"].iter().map(|e| e.algorithm.as_str()).collect();
        assert_eq!(numbers, vec!["Merge Sort", "Quick Sort"]);
        assert_eq!(summary["words"].len(), 1);
    }

    fn entry_files(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with("sort_"))
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_same_millisecond_runs_keep_separate_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = JsonHistory::new(dir.path());
        for _ in 0..3 {
            sink.record(&record("Bubble Sort", DataMode::Numbers, 777)).unwrap();
        }

        assert_eq!(
            entry_files(dir.path()),
            vec![
                "sort_Bubble_Sort_numbers_777.json",
                "sort_Bubble_Sort_numbers_777_1.json",
                "sort_Bubble_Sort_numbers_777_2.json",
            ]
        );
        assert_eq!(sink.load_summary()["numbers"].len(), 3);
    }

    #[test]
    fn test_corrupt_summary_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = JsonHistory::new(dir.path());
        fs::write(sink.summary_path(), "{ not json").unwrap();

        sink.record(&record("Comb Sort", DataMode::Letters, 5)).unwrap();
        let summary = sink.load_summary();
        assert_eq!(summary.len(), 1);
        assert_eq!(summary["letters"][0].algorithm, "Comb Sort");
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = JsonHistory::new(dir.path().join("absent"));
        let err = sink.record(&record("Merge Sort", DataMode::Numbers, 1)).unwrap_err();
        assert!(matches!(err, HistoryError::Io(_)));
    }

    #[test]
    fn test_unavailable_memory_is_null() {
        let mut r = record("Bubble Sort", DataMode::Colors, 9);
        r.peak_memory_kb = None;
        let json = serde_json::to_value(r).unwrap();
        assert!(json["peak_memory_kb"].is_null());
    }
}
