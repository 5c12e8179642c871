//! Polling backoff scheduler.
//!
//! Wait intervals between verification polls start at a base value and
//! double after each poll, clamped so they never exceed the configured
//! ceiling. The scheduler also accumulates the total time slept, which the
//! resolver compares against the caller's overall budget.

use std::time::Duration;

/// Backoff state for one polling phase.
///
/// Intervals are non-decreasing until clamped at the ceiling. When the
/// interval equals a caller-supplied fixed timeout (see
/// [`Trustgate::checkpoint`](crate::Trustgate::checkpoint)), `grow` is
/// false and the interval stays constant.
#[derive(Debug, Clone)]
pub struct PollBackoff {
    interval: Duration,
    ceiling: Duration,
    elapsed: Duration,
    grow: bool,
}

impl PollBackoff {
    /// Create a scheduler starting at `interval`, doubling up to `ceiling`.
    #[must_use]
    pub fn new(interval: Duration, ceiling: Duration) -> Self {
        Self {
            interval: interval.min(ceiling),
            ceiling,
            elapsed: Duration::ZERO,
            grow: true,
        }
    }

    /// Create a scheduler with a fixed, non-growing interval.
    #[must_use]
    pub fn fixed(interval: Duration) -> Self {
        Self {
            interval,
            ceiling: interval,
            elapsed: Duration::ZERO,
            grow: false,
        }
    }

    /// The interval to sleep before the next poll.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Total time handed out to sleeps so far.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Account for one sleep of the current interval and grow the next one.
    ///
    /// Returns the interval that was slept. The next interval doubles only
    /// while the doubled value stays within the ceiling; afterwards it
    /// holds steady.
    pub fn advance(&mut self) -> Duration {
        let slept = self.interval;
        self.elapsed += slept;

        if self.grow {
            let doubled = slept.saturating_mul(2);
            if doubled <= self.ceiling {
                self.interval = doubled;
            }
        }

        slept
    }
}
