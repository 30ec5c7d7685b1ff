use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Outcome of one proximity query at one sample instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleResult {
    pub instant: DateTime<Utc>,
    pub present: bool,
    /// Distance to the target in the target's units, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl SampleResult {
    pub fn present(instant: DateTime<Utc>, distance: f64) -> Self {
        Self {
            instant,
            present: true,
            distance: Some(distance),
        }
    }

    pub fn absent(instant: DateTime<Utc>) -> Self {
        Self {
            instant,
            present: false,
            distance: None,
        }
    }
}

/// Chronological trace of per-sample outcomes for one target over one window.
///
/// An empty trace is the rejected (falsy) outcome of a duration filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowResult {
    #[serde(rename = "step_secs", with = "duration_secs")]
    step: Duration,
    samples: Vec<SampleResult>,
}

impl WindowResult {
    pub fn new(step: Duration, samples: Vec<SampleResult>) -> Self {
        debug_assert!(
            samples.windows(2).all(|w| w[0].instant < w[1].instant),
            "samples must be strictly chronological"
        );
        Self { step, samples }
    }

    pub fn empty(step: Duration) -> Self {
        Self {
            step,
            samples: Vec::new(),
        }
    }

    #[inline]
    pub fn step(&self) -> Duration {
        self.step
    }

    #[inline]
    pub fn samples(&self) -> &[SampleResult] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<SampleResult> {
        self.samples
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn present_count(&self) -> usize {
        self.samples.iter().filter(|s| s.present).count()
    }

    /// Present samples times the step.
    ///
    /// Assumes the present samples are contiguous; see
    /// [`longest_present_run`](Self::longest_present_run) for the strict form.
    pub fn approximate_duration(&self) -> Duration {
        scale(self.step, self.present_count())
    }

    /// Length of the longest run of adjacent present samples.
    pub fn longest_present_run(&self) -> usize {
        let (longest, _) = self.samples.iter().fold((0, 0), |(best, run), s| {
            if s.present {
                (best.max(run + 1), run + 1)
            } else {
                (best, 0)
            }
        });
        longest
    }

    pub fn longest_present_duration(&self) -> Duration {
        scale(self.step, self.longest_present_run())
    }
}

fn scale(step: Duration, count: usize) -> Duration {
    step.saturating_mul(u32::try_from(count).unwrap_or(u32::MAX))
}

/// Per-target results of a multi-target request, keyed by target identity.
pub type AggregateResponse = BTreeMap<String, WindowResult>;

/// Whole seconds as an integer, fractional steps as a float.
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Secs {
        Whole(u64),
        Fractional(f64),
    }

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        if value.subsec_nanos() == 0 {
            serializer.serialize_u64(value.as_secs())
        } else {
            serializer.serialize_f64(value.as_secs_f64())
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        match Secs::deserialize(deserializer)? {
            Secs::Whole(secs) => Ok(Duration::from_secs(secs)),
            Secs::Fractional(secs) if secs.is_finite() && secs >= 0.0 => {
                Ok(Duration::from_nanos((secs * 1e9).round() as u64))
            }
            Secs::Fractional(secs) => Err(serde::de::Error::custom(format!(
                "step_secs must be a non-negative number, got {}",
                secs
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const HOUR: Duration = Duration::from_secs(3600);

    fn trace(pattern: &[bool]) -> WindowResult {
        let samples = pattern
            .iter()
            .enumerate()
            .map(|(i, &present)| {
                let instant = Utc.with_ymd_and_hms(2024, 1, 1, i as u32, 0, 0).unwrap();
                if present {
                    SampleResult::present(instant, 1.0)
                } else {
                    SampleResult::absent(instant)
                }
            })
            .collect();
        WindowResult::new(HOUR, samples)
    }

    #[test]
    fn test_approximate_duration_counts_all_present() {
        let result = trace(&[true, false, true, true]);
        assert_eq!(result.present_count(), 3);
        assert_eq!(result.approximate_duration(), HOUR * 3);
    }

    #[test]
    fn test_longest_present_run() {
        assert_eq!(trace(&[true, false, true, true]).longest_present_run(), 2);
        assert_eq!(trace(&[false, false]).longest_present_run(), 0);
        assert_eq!(
            trace(&[true, true, true, false, true]).longest_present_duration(),
            HOUR * 3
        );
    }

    #[test]
    fn test_serialized_shape() {
        let result = trace(&[true, false]);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["step_secs"], 3600);
        assert_eq!(json["samples"][0]["present"], true);
        assert_eq!(json["samples"][0]["distance"], 1.0);
        assert!(json["samples"][1].get("distance").is_none());

        let back: WindowResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn test_sub_second_step_survives_serialization() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let step = Duration::from_micros(1500);
        let result = WindowResult::new(step, vec![SampleResult::present(instant, 1.0)]);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["step_secs"], 0.0015);

        let back: WindowResult = serde_json::from_value(json).unwrap();
        assert_eq!(back.step(), step);
        assert_eq!(back.approximate_duration(), step);
    }

    #[test]
    fn test_empty_is_falsy() {
        let empty = WindowResult::empty(HOUR);
        assert!(empty.is_empty());
        assert_eq!(empty.approximate_duration(), Duration::ZERO);
    }
}
