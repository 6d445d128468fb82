//! Visualiser configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::data::DataMode;
use crate::history::SUMMARY_FILE;
use crate::pacing::{Pacing, PacingError};
use crate::session::DEFAULT_PREVIEW_LEN;

/// Defaults for a visualiser session; the binary overrides fields from flags.
#[derive(Clone, Debug, PartialEq)]
pub struct VisualizerConfig {
    /// Items generated in colour mode (default: 100)
    pub colors: usize,
    /// Items generated in number mode (default: 50)
    pub numbers: usize,
    /// Items generated in word mode (default: 30)
    pub words: usize,
    /// Items generated in letter mode (default: 52)
    pub letters: usize,
    /// Fastest allowed step delay (default: 1 ms)
    pub min_interval: Duration,
    /// Slowest allowed step delay (default: 500 ms)
    pub max_interval: Duration,
    /// Step delay at start-up (default: 50 ms)
    pub initial_delay: Duration,
    /// Where run records are written (default: `history`)
    pub history_dir: PathBuf,
    pub summary_file: String,
    /// Items kept at each end of a record's input preview (default: 5)
    pub preview_len: usize,
    /// Runs per algorithm in comparison mode (default: 3)
    pub compare_runs: usize,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            colors: 100,
            numbers: 50,
            words: 30,
            letters: 52,
            min_interval: Duration::from_millis(1),
            max_interval: Duration::from_millis(500),
            initial_delay: Duration::from_millis(50),
            history_dir: PathBuf::from("history"),
            summary_file: SUMMARY_FILE.to_string(),
            preview_len: DEFAULT_PREVIEW_LEN,
            compare_runs: 3,
        }
    }
}

impl VisualizerConfig {
    /// Default number of items for `mode`
    pub fn count_for(&self, mode: DataMode) -> usize {
        match mode {
            DataMode::Colors => self.colors,
            DataMode::Numbers => self.numbers,
            DataMode::Words => self.words,
            DataMode::Letters => self.letters,
        }
    }

    pub fn set_count(&mut self, mode: DataMode, count: usize) {
        match mode {
            DataMode::Colors => self.colors = count,
            DataMode::Numbers => self.numbers = count,
            DataMode::Words => self.words = count,
            DataMode::Letters => self.letters = count,
        }
    }

    pub fn pacing(&self) -> Result<Pacing, PacingError> {
        Pacing::new(self.min_interval, self.max_interval, self.initial_delay)
    }
}
