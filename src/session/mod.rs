//! # Sort session controller
//!
//! A [`SortSession`] owns at most one active run. The driver calls
//! [`SortSession::advance_one`] on its own schedule (paced or manual); each
//! call pulls exactly one snapshot from the algorithm and republishes it as a
//! fresh `Arc<[Item]>` that renderers can hold on to without ever seeing it
//! change. When the sequence runs dry the run is timed, measured and handed to
//! the history sink.
//!
//! Faults inside an algorithm (a panic, or a snapshot of the wrong size) are
//! caught here: the run is dropped without a record and the error is returned
//! to the driver, which keeps going.

mod record;
#[cfg(test)]
mod test;

pub use record::{now_ms, round_to, InputPreview, SortRecord};

use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, trace, warn};
use thiserror::Error;

use crate::data::{Collection, DataMode, Item};
use crate::history::{HistorySink, NoHistory};
use crate::sorting::{SnapshotSeq, SortAlgorithm};
use crate::utils::memory::{default_probe, MemoryProbe};
use crate::utils::timer::{summarize, DurationSummary, RunTimer};

/// Number of items kept at each end of the input preview
pub const DEFAULT_PREVIEW_LEN: usize = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Start requested with zero items. Nothing was changed.
    #[error("no data to sort")]
    EmptyInput,
    /// The algorithm broke mid-sequence; the run was stopped without a record.
    #[error("'{algorithm}' faulted at step {step}: {reason}")]
    SequenceFault {
        algorithm: String,
        step: usize,
        reason: String,
    },
    #[error("no previous run to restart")]
    NothingToRestart,
}

/// Result of one [`SortSession::advance_one`] call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// A new snapshot was published
    Continuing,
    /// The run is complete; repeated calls keep returning this
    Finished,
    /// No run to advance
    Idle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Finished,
}

/// One execution of one algorithm over one collection
struct SortRun {
    algorithm: Arc<dyn SortAlgorithm>,
    mode: DataMode,
    timer: RunTimer,
    steps: usize,
    /// `None` once the run has finished
    sequence: Option<SnapshotSeq>,
    elapsed_at_finish: Option<Duration>,
}

pub struct SortSession {
    run: Option<SortRun>,
    current: Arc<[Item]>,
    mode: Option<DataMode>,
    original: Option<Collection>,
    last_algorithm: Option<Arc<dyn SortAlgorithm>>,
    history: Box<dyn HistorySink>,
    probe: Box<dyn MemoryProbe>,
    preview_len: usize,
    completed: Vec<SortRecord>,
}

impl SortSession {
    pub fn new() -> Self {
        Self {
            run: None,
            current: Arc::from(Vec::new()),
            mode: None,
            original: None,
            last_algorithm: None,
            history: Box::new(NoHistory),
            probe: default_probe(),
            preview_len: DEFAULT_PREVIEW_LEN,
            completed: Vec::new(),
        }
    }

    pub fn with_history<H: HistorySink + 'static>(mut self, history: H) -> Self {
        self.history = Box::new(history);
        self
    }

    pub fn with_probe<P: MemoryProbe + 'static>(mut self, probe: P) -> Self {
        self.probe = Box::new(probe);
        self
    }

    pub fn with_preview_len(mut self, n: usize) -> Self {
        self.preview_len = n;
        self
    }

    /// Show `data` without sorting it, stopping any run in progress
    pub fn load(&mut self, data: Collection) {
        self.stop();
        self.current = Arc::from(data.items());
        self.mode = Some(data.mode());
        self.original = Some(data);
    }

    /// Start `algorithm` on a private copy of `data`, replacing any current
    /// run. Empty data is rejected with [`SessionError::EmptyInput`] and
    /// leaves the session untouched.
    pub fn start(
        &mut self,
        algorithm: Arc<dyn SortAlgorithm>,
        data: &Collection,
    ) -> Result<(), SessionError> {
        if data.is_empty() {
            debug!("No data to sort, ignoring start of {}", algorithm.name());
            return Err(SessionError::EmptyInput);
        }
        self.stop();

        info!(
            "Starting sort: {} ({}, {} items)",
            algorithm.name(),
            data.mode(),
            data.len()
        );
        self.probe.begin();
        let timer = RunTimer::start();
        let sequence = algorithm.snapshots(data.items().to_vec(), data.mode());

        self.current = Arc::from(data.items());
        self.mode = Some(data.mode());
        self.original = Some(data.clone());
        self.last_algorithm = Some(Arc::clone(&algorithm));
        self.run = Some(SortRun {
            algorithm,
            mode: data.mode(),
            timer,
            steps: 0,
            sequence: Some(sequence),
            elapsed_at_finish: None,
        });
        Ok(())
    }

    /// Run the last algorithm again on the preserved original data
    pub fn restart(&mut self) -> Result<(), SessionError> {
        let algorithm = self
            .last_algorithm
            .clone()
            .ok_or(SessionError::NothingToRestart)?;
        let data = self
            .original
            .clone()
            .ok_or(SessionError::NothingToRestart)?;
        info!("Restarting sort: {}", algorithm.name());
        self.start(algorithm, &data)
    }

    /// Pull one snapshot from the active run.
    pub fn advance_one(&mut self) -> Result<StepOutcome, SessionError> {
        let expected_len = self.original.as_ref().map_or(0, Collection::len);
        let Some(run) = self.run.as_mut() else {
            return Ok(StepOutcome::Idle);
        };
        let Some(sequence) = run.sequence.as_mut() else {
            return Ok(StepOutcome::Finished);
        };

        let fault = match catch_unwind(AssertUnwindSafe(|| sequence.next())) {
            Ok(Some(snapshot)) if snapshot.len() == expected_len => {
                run.steps += 1;
                trace!("{} step {}", run.algorithm.name(), run.steps);
                self.current = Arc::from(snapshot);
                return Ok(StepOutcome::Continuing);
            }
            Ok(Some(snapshot)) => format!(
                "snapshot holds {} items, expected {}",
                snapshot.len(),
                expected_len
            ),
            Ok(None) => {
                self.finish();
                return Ok(StepOutcome::Finished);
            }
            Err(payload) => panic_message(payload.as_ref()),
        };

        let err = SessionError::SequenceFault {
            algorithm: run.algorithm.name().to_string(),
            step: run.steps + 1,
            reason: fault,
        };
        warn!("Error during sort step: {}", err);
        self.run = None;
        Err(err)
    }

    /// Drop the current run without recording it. Safe to call at any time.
    pub fn stop(&mut self) {
        if let Some(run) = self.run.take() {
            debug!(
                "Stopped {} after {} steps",
                run.algorithm.name(),
                run.steps
            );
        }
    }

    fn finish(&mut self) {
        let Some(run) = self.run.as_mut() else {
            return;
        };
        run.sequence = None;
        let elapsed = run.timer.elapsed();
        run.elapsed_at_finish = Some(elapsed);

        let peak_memory_kb = match self.probe.finish() {
            Ok(kib) => Some(kib),
            Err(e) => {
                warn!("{}; recording duration only", e);
                None
            }
        };
        let items = self.original.as_ref().map_or(&[][..], Collection::items);
        let record = SortRecord {
            algorithm: run.algorithm.name().to_string(),
            data_mode: run.mode,
            input: InputPreview::of(items, self.preview_len),
            duration_ms: elapsed.as_secs_f64() * 1000.0,
            peak_memory_kb,
            timestamp_ms: now_ms(),
        };

        match record.peak_memory_kb {
            Some(kb) => info!(
                "Sort {} finished: {:.2} ms, peak memory {:.1} KiB",
                record.algorithm, record.duration_ms, kb
            ),
            None => info!(
                "Sort {} finished: {:.2} ms, peak memory unavailable",
                record.algorithm, record.duration_ms
            ),
        }
        if let Err(e) = self.history.record(&record) {
            warn!("Error saving history for {}: {}", record.algorithm, e);
        }
        self.completed.push(record);
    }

    pub fn state(&self) -> SessionState {
        match &self.run {
            None => SessionState::Idle,
            Some(run) if run.sequence.is_some() => SessionState::Running,
            Some(_) => SessionState::Finished,
        }
    }

    /// True while a run still has snapshots to give
    pub fn is_running(&self) -> bool {
        self.state() == SessionState::Running
    }

    /// Data to display: the latest snapshot, or the loaded data
    pub fn current(&self) -> Arc<[Item]> {
        Arc::clone(&self.current)
    }

    pub fn mode(&self) -> Option<DataMode> {
        self.mode
    }

    /// Input of the latest run, untouched by sorting
    pub fn original(&self) -> Option<&Collection> {
        self.original.as_ref()
    }

    /// Algorithm of the current or last run
    pub fn algorithm(&self) -> Option<&Arc<dyn SortAlgorithm>> {
        self.last_algorithm.as_ref()
    }

    /// Snapshots published by the current run
    pub fn steps(&self) -> usize {
        self.run.as_ref().map_or(0, |r| r.steps)
    }

    /// Live time of the current run; frozen once it finishes
    pub fn elapsed(&self) -> Option<Duration> {
        self.run
            .as_ref()
            .map(|r| r.elapsed_at_finish.unwrap_or_else(|| r.timer.elapsed()))
    }

    /// Records of runs completed since the last [`SortSession::clear_results`]
    pub fn completed(&self) -> &[SortRecord] {
        &self.completed
    }

    pub fn last_record(&self) -> Option<&SortRecord> {
        self.completed.last()
    }

    pub fn clear_results(&mut self) {
        self.completed.clear();
    }

    /// Per-algorithm timing summaries of the completed runs, fastest first
    pub fn comparison(&self) -> Vec<(String, DurationSummary)> {
        let mut by_algorithm: BTreeMap<&str, Vec<Duration>> = BTreeMap::new();
        for record in &self.completed {
            by_algorithm
                .entry(record.algorithm.as_str())
                .or_default()
                .push(Duration::from_secs_f64(record.duration_ms.max(0.0) / 1000.0));
        }
        let mut rows: Vec<(String, DurationSummary)> = by_algorithm
            .into_iter()
            .filter_map(|(name, times)| summarize(&times).map(|s| (name.to_string(), s)))
            .collect();
        rows.sort_by_key(|(_, s)| s.avg);
        rows
    }
}

impl Default for SortSession {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
