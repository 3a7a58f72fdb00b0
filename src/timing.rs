//! Wall-clock timing of kernel runs.
//!
//! The kernels never read a clock themselves; callers pass one in so
//! tests can substitute a deterministic source.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// A time source with at least microsecond resolution.
pub trait Clock {
    /// Time elapsed since this clock's own origin.
    fn now(&self) -> Duration;
}

/// Monotonic clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// System wall clock truncated to whole microseconds.
///
/// It may jump backwards; [`TimingSample::elapsed`] saturates at zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct WallClock;

impl Clock for WallClock {
    fn now(&self) -> Duration {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Duration::from_micros(u64::try_from(since_epoch.as_micros()).unwrap_or(u64::MAX))
    }
}

/// Start and end readings of one measured interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingSample {
    pub start: Duration,
    pub end: Duration,
}

impl TimingSample {
    /// `end - start`, never negative.
    pub fn elapsed(&self) -> Duration {
        self.end.saturating_sub(self.start)
    }

    /// Elapsed time in fractional seconds.
    pub fn seconds(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }
}

/// A value together with how long it took to produce.
#[derive(Debug, Clone, PartialEq)]
pub struct Timed<T> {
    pub value: T,
    pub timing: TimingSample,
}

/// Runs `f` between two readings of `clock`.
pub fn measure<C, T, F>(clock: &C, f: F) -> Timed<T>
where
    C: Clock + ?Sized,
    F: FnOnce() -> T,
{
    let start = clock.now();
    let value = f();
    let end = clock.now();
    Timed {
        value,
        timing: TimingSample { start, end },
    }
}
