//! # Pacing
//!
//! The speed slider works on a logarithmic scale: a ratio in `[0, 1]` maps to
//! a delay between steps of `exp(ln(min) + ratio * (ln(max) - ln(min)))`.
//! [`PaceClock`] turns wall-clock progress into the number of steps owed.

use std::time::{Duration, Instant};

use thiserror::Error;

/// Slider distance moved by one faster/slower command
pub const SPEED_STEP: f64 = 0.1;

/// Delays below this are treated as this when counting due steps
pub const MIN_SAFE_INTERVAL: Duration = Duration::from_micros(100);

#[derive(Debug, Error, PartialEq)]
pub enum PacingError {
    #[error("invalid pacing bounds: min {min:?} must be > 0 and <= max {max:?}")]
    InvalidBounds { min: Duration, max: Duration },
}

/// Current minimum delay between two steps, kept within `[min, max]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Pacing {
    min: Duration,
    max: Duration,
    delay: Duration,
}

impl Pacing {
    pub fn new(min: Duration, max: Duration, initial: Duration) -> Result<Self, PacingError> {
        if min.is_zero() || min > max {
            return Err(PacingError::InvalidBounds { min, max });
        }
        Ok(Self {
            min,
            max,
            delay: initial.clamp(min, max),
        })
    }

    pub fn min_interval(&self) -> Duration {
        self.min
    }

    pub fn max_interval(&self) -> Duration {
        self.max
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Set the delay, clamped to the bounds
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay.clamp(self.min, self.max);
    }

    /// Set the delay from a user-supplied number of milliseconds. NaN and
    /// non-positive values give the minimum, values too large for a
    /// `Duration` (including infinity) give the maximum.
    pub fn set_delay_ms(&mut self, ms: f64) {
        self.delay = if ms.is_nan() || ms <= 0.0 {
            self.min
        } else {
            Duration::try_from_secs_f64(ms / 1000.0)
                .map_or(self.max, |d| d.clamp(self.min, self.max))
        };
    }

    /// Slider position of the current delay
    pub fn ratio(&self) -> f64 {
        self.delay_to_ratio(self.delay)
    }

    /// Move the slider to `ratio` (clamped to `[0, 1]`)
    pub fn set_ratio(&mut self, ratio: f64) {
        self.delay = self.ratio_to_delay(ratio);
    }

    /// Move the slider by `delta`; negative is faster
    pub fn nudge(&mut self, delta: f64) {
        self.set_ratio(self.ratio() + delta);
    }

    pub fn ratio_to_delay(&self, ratio: f64) -> Duration {
        let ratio = if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) };
        let (log_min, log_max) = self.log_bounds();
        let secs = (log_min + ratio * (log_max - log_min)).exp();
        Duration::from_secs_f64(secs).clamp(self.min, self.max)
    }

    pub fn delay_to_ratio(&self, delay: Duration) -> f64 {
        let (log_min, log_max) = self.log_bounds();
        let span = log_max - log_min;
        if span == 0.0 {
            return 0.0;
        }
        let log_current = delay.clamp(self.min, self.max).as_secs_f64().ln();
        ((log_current - log_min) / span).clamp(0.0, 1.0)
    }

    /// Steps per second, as shown next to the slider (e.g. "20x")
    pub fn speed_label(&self) -> String {
        format!("{:.0}x", 1.0 / self.delay.as_secs_f64().max(0.001))
    }

    fn log_bounds(&self) -> (f64, f64) {
        (self.min.as_secs_f64().ln(), self.max.as_secs_f64().ln())
    }
}

/// Tracks when the last step was taken in continuous mode.
#[derive(Clone, Copy, Debug)]
pub struct PaceClock {
    last: Instant,
}

impl PaceClock {
    pub fn new(now: Instant) -> Self {
        Self { last: now }
    }

    /// Forget accumulated time, e.g. after a pause or a manual step
    pub fn reset(&mut self, now: Instant) {
        self.last = now;
    }

    /// Number of steps owed at `now`. The reference point advances by exactly
    /// that many delays, so leftover time carries over to the next call.
    pub fn due_steps(&mut self, pacing: &Pacing, now: Instant) -> u32 {
        let interval = pacing.delay().max(MIN_SAFE_INTERVAL);
        let elapsed = now.saturating_duration_since(self.last);
        let steps = (elapsed.as_nanos() / interval.as_nanos()).min(u32::MAX as u128) as u32;
        if steps > 0 {
            self.last += interval * steps;
        }
        steps
    }
}
