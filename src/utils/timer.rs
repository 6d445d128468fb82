//! Wall-clock timing for sort runs.
//!
//! A [`RunTimer`] brackets exactly one run on the monotonic clock. The
//! summary helpers turn repeated runs of one algorithm into the figures shown
//! in the comparison table.

use std::time::{Duration, Instant};

/// Monotonic timer started when a run starts
#[derive(Clone, Copy, Debug)]
pub struct RunTimer {
    started: Instant,
}

impl RunTimer {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Statistics over several runs of one algorithm
#[derive(Clone, Debug, PartialEq)]
pub struct DurationSummary {
    pub runs: usize,
    pub avg: Duration,
    pub median: Duration,
    pub min: Duration,
    pub max: Duration,
    pub std_dev: Duration,
}

/// Summarise a list of durations. Returns `None` for an empty list.
pub fn summarize(times: &[Duration]) -> Option<DurationSummary> {
    if times.is_empty() {
        return None;
    }

    let nanos: Vec<u128> = times.iter().map(|t| t.as_nanos()).collect();
    let min = *nanos.iter().min()?;
    let max = *nanos.iter().max()?;
    let avg_f64 = nanos.iter().sum::<u128>() as f64 / nanos.len() as f64;

    let variance: f64 = nanos
        .iter()
        .map(|&n| {
            let diff = n as f64 - avg_f64;
            diff * diff
        })
        .sum::<f64>()
        / (nanos.len() - 1).max(1) as f64;

    Some(DurationSummary {
        runs: times.len(),
        avg: Duration::from_nanos(avg_f64 as u64),
        median: calculate_median(times),
        min: Duration::from_nanos(min as u64),
        max: Duration::from_nanos(max as u64),
        std_dev: Duration::from_nanos(variance.sqrt() as u64),
    })
}

/// Calculate median from a slice of durations.
pub fn calculate_median(times: &[Duration]) -> Duration {
    if times.is_empty() {
        return Duration::ZERO;
    }
    let mut sorted: Vec<_> = times.to_vec();
    sorted.sort();
    sorted[sorted.len() / 2]
}

/// Human-readable duration for tables
pub fn format_duration(d: Duration) -> String {
    let ms = d.as_secs_f64() * 1000.0;
    if ms >= 1000.0 {
        format!("{:.2} s", ms / 1000.0)
    } else if ms >= 1.0 {
        format!("{:.2} ms", ms)
    } else {
        format!("{:.1} µs", ms * 1000.0)
    }
}
