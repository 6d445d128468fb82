//! Result of a completed sort run.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::data::{DataMode, Item};

/// Compact description of the input of a run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputPreview {
    pub count: usize,
    pub first: Vec<Item>,
    pub last: Vec<Item>,
}

impl InputPreview {
    /// Count plus the first and last `n` items
    pub fn of(items: &[Item], n: usize) -> Self {
        let head = n.min(items.len());
        let tail = items.len().saturating_sub(n);
        Self {
            count: items.len(),
            first: items[..head].to_vec(),
            last: items[tail..].to_vec(),
        }
    }
}

/// One completed run, as handed to the history sink. Never mutated after
/// creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SortRecord {
    pub algorithm: String,
    pub data_mode: DataMode,
    pub input: InputPreview,
    pub duration_ms: f64,
    /// `None` when no memory backend was available
    pub peak_memory_kb: Option<f64>,
    /// Milliseconds since the Unix epoch
    pub timestamp_ms: u64,
}

impl SortRecord {
    /// Copy with duration rounded to 3 decimals and memory to 2
    pub fn rounded(&self) -> Self {
        Self {
            duration_ms: round_to(self.duration_ms, 3),
            peak_memory_kb: self.peak_memory_kb.map(|kb| round_to(kb, 2)),
            ..self.clone()
        }
    }
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

/// Wall-clock time in milliseconds since the Unix epoch
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
