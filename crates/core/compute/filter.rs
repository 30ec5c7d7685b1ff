//! Minimum-duration filtering of window traces.

use overpass_types::WindowResult;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How presence time is estimated from a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationPolicy {
    /// Present samples times the step, contiguous or not.
    #[default]
    Total,
    /// Longest run of adjacent present samples times the step.
    Contiguous,
}

impl DurationPolicy {
    pub fn estimate(self, result: &WindowResult) -> Duration {
        match self {
            Self::Total => result.approximate_duration(),
            Self::Contiguous => result.longest_present_duration(),
        }
    }
}

/// Keeps a trace only if its estimated presence exceeds a threshold.
#[derive(Debug, Clone, Copy, Default)]
pub struct DurationFilter {
    policy: DurationPolicy,
}

impl DurationFilter {
    pub fn new(policy: DurationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> DurationPolicy {
        self.policy
    }

    /// `true` when no threshold is given or the estimate strictly exceeds it.
    /// A zero threshold counts as no threshold.
    pub fn accepts(&self, result: &WindowResult, min_duration: Option<Duration>) -> bool {
        match min_duration {
            Some(min) if !min.is_zero() => self.policy.estimate(result) > min,
            _ => true,
        }
    }

    /// The trace unchanged when accepted, otherwise an empty trace.
    pub fn apply(&self, result: WindowResult, min_duration: Option<Duration>) -> WindowResult {
        if self.accepts(&result, min_duration) {
            result
        } else {
            WindowResult::empty(result.step())
        }
    }
}
