//! Progress reporting and cooperative cancellation.
//!
//! Long pixel loops report a percentage at a bounded rate and poll for
//! cancellation once per scan line. Closures work as reporters directly:
//!
//! ```
//! use place_dither::{Phase, Progress};
//!
//! let mut seen = Vec::new();
//! let mut report = |phase: Phase, pct: u8| seen.push((phase, pct));
//! report.report(Phase::Dither, 40);
//! assert!(!report.is_cancelled());
//! assert_eq!(seen, vec![(Phase::Dither, 40)]);
//! ```

use std::fmt;

/// Pipeline stage a progress value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Adjust,
    Dither,
    Terrain,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Phase::Adjust => "adjust",
            Phase::Dither => "dither",
            Phase::Terrain => "terrain",
        })
    }
}

/// Receiver of progress events.
pub trait Progress {
    /// Called with a percentage in 0..=100, non-decreasing within one run.
    fn report(&mut self, phase: Phase, percent: u8);

    /// Polled between scan lines; returning true stops the run with
    /// [`Cancelled`].
    fn is_cancelled(&self) -> bool {
        false
    }
}

impl<F: FnMut(Phase, u8)> Progress for F {
    fn report(&mut self, phase: Phase, percent: u8) {
        self(phase, percent)
    }
}

/// Discards all progress and never cancels.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn report(&mut self, _phase: Phase, _percent: u8) {}
}

/// A run was stopped because its [`Progress`] asked to cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("operation cancelled")
    }
}

impl std::error::Error for Cancelled {}

/// Emits a percentage every `max(1, total / 100)` steps.
#[derive(Debug)]
pub(crate) struct Throttle {
    total: usize,
    step: usize,
}

impl Throttle {
    pub(crate) fn new(total: usize) -> Self {
        Self {
            total,
            step: (total / 100).max(1),
        }
    }

    /// Percentage to report at step `index`, if this step is a report point.
    #[inline]
    pub(crate) fn at(&self, index: usize) -> Option<u8> {
        if index % self.step == 0 {
            Some(percent(index, self.total))
        } else {
            None
        }
    }
}

/// `round(index * 100 / total)`, saturating at 100.
#[inline]
pub(crate) fn percent(index: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((index as f64 * 100.0 / total as f64).round() as usize).min(100) as u8
}
