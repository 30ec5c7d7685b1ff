use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A closed time interval `[start, end]` in UTC.
///
/// Always satisfies `start <= end`: constructors and deserialization swap
/// reversed bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Bounds")]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct Bounds {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl From<Bounds> for TimeWindow {
    fn from(bounds: Bounds) -> Self {
        Self::new(bounds.start, bounds.end)
    }
}

impl TimeWindow {
    pub fn new(a: DateTime<Utc>, b: DateTime<Utc>) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// Degenerate window covering a single instant.
    pub fn instant(at: DateTime<Utc>) -> Self {
        Self { start: at, end: at }
    }

    #[inline]
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    #[inline]
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    #[inline]
    pub fn is_instant(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }

    pub fn span(&self) -> chrono::TimeDelta {
        self.end - self.start
    }
}
