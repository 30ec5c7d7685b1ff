//! Single proximity checks against the geospatial index.

use crate::error::{EngineError, Result};
use crate::storage::ProximityIndex;
use chrono::{DateTime, Utc};
use overpass_types::{SampleResult, Target};
use std::sync::Arc;

/// Issues one proximity query per call. No retries.
///
/// Targets are expected to be validated by the caller.
#[derive(Clone)]
pub struct ProximityClient {
    index: Arc<dyn ProximityIndex>,
}

impl ProximityClient {
    pub fn new(index: Arc<dyn ProximityIndex>) -> Self {
        Self { index }
    }

    pub async fn query(&self, instant: DateTime<Utc>, target: &Target) -> Result<SampleResult> {
        let hit = self
            .index
            .is_within_radius(instant, target.location, target.radius, target.units)
            .await
            .map_err(|source| EngineError::QueryFailed { instant, source })?;

        Ok(match hit {
            Some(distance) => SampleResult::present(instant, distance),
            None => SampleResult::absent(instant),
        })
    }
}

impl std::fmt::Debug for ProximityClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProximityClient").finish_non_exhaustive()
    }
}
