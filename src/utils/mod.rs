//! Utility modules for timing and memory measurement.

pub mod memory;
pub mod timer;

// Re-export commonly used items
pub use memory::{default_probe, MeasurementError, MemoryProbe, TrackingAllocator};
pub use timer::{calculate_median, format_duration, summarize, DurationSummary, RunTimer};
