//! Peak-memory measurement for sort runs.
//!
//! Three backends, picked by [`default_probe`]:
//!
//! - [`AllocationProbe`]: exact peak of live heap bytes above the baseline,
//!   read from [`TrackingAllocator`]. Only works when the binary installs
//!   the allocator with `#[global_allocator]`.
//! - [`RusageProbe`] (unix): growth of the process' maximum resident set size
//!   as reported by `getrusage`.
//! - [`NoProbe`]: always unavailable.
//!
//! A probe that cannot measure returns [`MeasurementError::Unavailable`]; it
//! never reports a made-up zero.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeasurementError {
    #[error("memory measurement unavailable ({backend})")]
    Unavailable { backend: &'static str },
}

/// Measures the memory peak of one run, in KiB.
pub trait MemoryProbe {
    /// Backend name, for logs
    fn backend(&self) -> &'static str;

    /// Take the baseline at the start of a run
    fn begin(&mut self);

    /// Peak growth since [`MemoryProbe::begin`], in KiB
    fn finish(&mut self) -> Result<f64, MeasurementError>;
}

static LIVE: AtomicUsize = AtomicUsize::new(0);
static PEAK: AtomicUsize = AtomicUsize::new(0);
static ACTIVE: AtomicBool = AtomicBool::new(false);

/// Counting wrapper around the system allocator.
///
/// ```ignore
/// #[global_allocator]
/// static ALLOC: TrackingAllocator = TrackingAllocator::new();
/// ```
pub struct TrackingAllocator;

impl TrackingAllocator {
    pub const fn new() -> Self {
        Self
    }

    /// True once the allocator has served an allocation, i.e. it is installed
    pub fn is_active() -> bool {
        ACTIVE.load(Ordering::Relaxed)
    }

    pub fn live_bytes() -> usize {
        LIVE.load(Ordering::Relaxed)
    }

    pub fn peak_bytes() -> usize {
        PEAK.load(Ordering::Relaxed)
    }

    /// Restart peak tracking from the current live size
    pub fn reset_peak() {
        PEAK.store(LIVE.load(Ordering::Relaxed), Ordering::Relaxed);
    }

    #[inline]
    fn grow(size: usize) {
        ACTIVE.store(true, Ordering::Relaxed);
        let now = LIVE.fetch_add(size, Ordering::Relaxed) + size;
        PEAK.fetch_max(now, Ordering::Relaxed);
    }

    #[inline]
    fn shrink(size: usize) {
        LIVE.fetch_sub(size, Ordering::Relaxed);
    }
}

impl Default for TrackingAllocator {
    fn default() -> Self {
        Self::new()
    }
}

unsafe impl GlobalAlloc for TrackingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            Self::grow(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc_zeroed(layout);
        if !ptr.is_null() {
            Self::grow(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        Self::shrink(layout.size());
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = System.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() {
            let old_size = layout.size();
            if new_size > old_size {
                Self::grow(new_size - old_size);
            } else {
                Self::shrink(old_size - new_size);
            }
        }
        new_ptr
    }
}

/// Probe backed by [`TrackingAllocator`]
#[derive(Debug, Default)]
pub struct AllocationProbe {
    baseline: usize,
}

impl MemoryProbe for AllocationProbe {
    fn backend(&self) -> &'static str {
        "allocator"
    }

    fn begin(&mut self) {
        self.baseline = TrackingAllocator::live_bytes();
        TrackingAllocator::reset_peak();
    }

    fn finish(&mut self) -> Result<f64, MeasurementError> {
        if !TrackingAllocator::is_active() {
            return Err(MeasurementError::Unavailable {
                backend: self.backend(),
            });
        }
        let peak = TrackingAllocator::peak_bytes().saturating_sub(self.baseline);
        Ok(peak as f64 / 1024.0)
    }
}

/// Probe backed by `getrusage(RUSAGE_SELF)`
#[cfg(unix)]
#[derive(Debug, Default)]
pub struct RusageProbe {
    baseline_kib: Option<f64>,
}

#[cfg(unix)]
impl RusageProbe {
    /// Maximum resident set size so far, in KiB
    fn max_rss_kib() -> Option<f64> {
        let mut usage: libc::rusage = unsafe { std::mem::zeroed() };
        if unsafe { libc::getrusage(libc::RUSAGE_SELF, &mut usage) } != 0 {
            return None;
        }
        let raw = usage.ru_maxrss as f64;
        // macOS reports bytes, everyone else KiB
        if cfg!(target_os = "macos") {
            Some(raw / 1024.0)
        } else {
            Some(raw)
        }
    }
}

#[cfg(unix)]
impl MemoryProbe for RusageProbe {
    fn backend(&self) -> &'static str {
        "getrusage"
    }

    fn begin(&mut self) {
        self.baseline_kib = Self::max_rss_kib();
    }

    fn finish(&mut self) -> Result<f64, MeasurementError> {
        match (self.baseline_kib.take(), Self::max_rss_kib()) {
            (Some(before), Some(after)) => Ok((after - before).max(0.0)),
            _ => Err(MeasurementError::Unavailable {
                backend: self.backend(),
            }),
        }
    }
}

/// Probe for platforms without a backend
#[derive(Debug, Default)]
pub struct NoProbe;

impl MemoryProbe for NoProbe {
    fn backend(&self) -> &'static str {
        "none"
    }

    fn begin(&mut self) {}

    fn finish(&mut self) -> Result<f64, MeasurementError> {
        Err(MeasurementError::Unavailable {
            backend: self.backend(),
        })
    }
}

/// Best probe available in this process
pub fn default_probe() -> Box<dyn MemoryProbe> {
    if TrackingAllocator::is_active() {
        return Box::new(AllocationProbe::default());
    }
    #[cfg(unix)]
    {
        Box::new(RusageProbe::default())
    }
    #[cfg(not(unix))]
    {
        Box::new(NoProbe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_probe_is_unavailable() {
        let mut probe = NoProbe;
        probe.begin();
        assert_eq!(
            probe.finish(),
            Err(MeasurementError::Unavailable { backend: "none" })
        );
    }

    #[test]
    fn test_allocation_probe_needs_installed_allocator() {
        // Test binaries run on the system allocator
        let mut probe = AllocationProbe::default();
        probe.begin();
        let _buf = vec![0u8; 4096];
        assert!(probe.finish().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_rusage_probe_reports_growth() {
        let mut probe = RusageProbe::default();
        probe.begin();
        let kib = probe.finish().unwrap();
        assert!(kib >= 0.0);
    }

    #[cfg(unix)]
    #[test]
    fn test_rusage_probe_without_begin_is_unavailable() {
        let mut probe = RusageProbe::default();
        assert!(probe.finish().is_err());
    }
}
