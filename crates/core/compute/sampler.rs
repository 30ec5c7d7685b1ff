//! Discretizes a time window into sample instants.

use crate::error::{EngineError, Result};
use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use overpass_types::TimeWindow;
use std::iter::FusedIterator;
use std::time::Duration;

/// Produces the sample instants of a window at a fixed step.
///
/// The first instant is the window start truncated to `granularity`; each
/// following instant adds `step`; the last one is the latest instant not
/// after the window end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sampler {
    step: TimeDelta,
    granularity: TimeDelta,
}

impl Sampler {
    pub fn new(step: Duration, granularity: Duration) -> Result<Self> {
        Ok(Self {
            step: positive_delta("step", step)?,
            granularity: positive_delta("granularity", granularity)?,
        })
    }

    /// One-hour step on whole hours.
    pub fn hourly() -> Self {
        Self {
            step: TimeDelta::hours(1),
            granularity: TimeDelta::hours(1),
        }
    }

    pub fn step(&self) -> Duration {
        self.step.to_std().unwrap_or_default()
    }

    pub fn sample(&self, window: &TimeWindow) -> Result<Samples> {
        let first = window
            .start()
            .duration_trunc(self.granularity)
            .map_err(|e| EngineError::InvalidWindow(format!("cannot truncate start: {}", e)))?;

        let span = total_nanos(window.end() - first);
        let len = usize::try_from(span / total_nanos(self.step) + 1)
            .ok()
            .filter(|_| span >= 0)
            .ok_or_else(|| {
                EngineError::InvalidWindow(format!(
                    "window [{}, {}] yields no samples",
                    window.start(),
                    window.end()
                ))
            })?;

        Ok(Samples {
            next: first,
            step: self.step,
            remaining: len,
        })
    }
}

fn positive_delta(name: &str, value: Duration) -> Result<TimeDelta> {
    let delta = TimeDelta::from_std(value)
        .map_err(|_| EngineError::InvalidWindow(format!("{} is out of range", name)))?;
    if delta <= TimeDelta::zero() {
        return Err(EngineError::InvalidWindow(format!(
            "{} must be positive, got {:?}",
            name, value
        )));
    }
    Ok(delta)
}

fn total_nanos(delta: TimeDelta) -> i128 {
    i128::from(delta.num_seconds()) * 1_000_000_000 + i128::from(delta.subsec_nanos())
}

/// Lazy, finite sequence of sample instants. Clone it to restart.
#[derive(Debug, Clone)]
pub struct Samples {
    next: DateTime<Utc>,
    step: TimeDelta,
    remaining: usize,
}

impl Iterator for Samples {
    type Item = DateTime<Utc>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next;
        self.remaining -= 1;
        if self.remaining > 0 {
            self.next = current + self.step;
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Samples {}

impl FusedIterator for Samples {}
