//! Multi-target orchestration.

use crate::builder::EngineBuilder;
use crate::compute::aggregate::{Aggregator, join_ordered};
use crate::compute::filter::DurationFilter;
use crate::compute::proximity::ProximityClient;
use crate::compute::sampler::Sampler;
use crate::compute::validation::validate_targets;
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::storage::{PositionStore, ProximityIndex};
use futures::future;
use overpass_types::{AggregateResponse, PositionFix, Target, TimeWindow, WindowResult};
use std::sync::Arc;
use std::time::Duration;

/// Answers "when was the object within range of these targets".
///
/// Every call is request-scoped: nothing computed is cached between calls.
pub struct Engine {
    config: EngineConfig,
    aggregator: Aggregator,
    filter: DurationFilter,
    positions: Arc<dyn PositionStore>,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub(crate) fn from_parts(
        config: EngineConfig,
        index: Arc<dyn ProximityIndex>,
        positions: Arc<dyn PositionStore>,
    ) -> Self {
        let aggregator = Aggregator::new(ProximityClient::new(index), config.granularity())
            .with_max_in_flight(config.max_in_flight);
        let filter = DurationFilter::new(config.duration_policy);
        Self {
            config,
            aggregator,
            filter,
            positions,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Presence trace of one target, filtered by `min_duration` when given.
    pub async fn intersect(
        &self,
        window: &TimeWindow,
        step: Option<Duration>,
        target: &Target,
        min_duration: Option<Duration>,
    ) -> Result<WindowResult> {
        let step = step.unwrap_or_else(|| self.config.step());
        let raw = self.aggregator.aggregate(window, step, target).await?;
        Ok(self.filter.apply(raw, min_duration))
    }

    /// Presence traces of every target, keyed by target identity.
    ///
    /// Targets run concurrently. The batch is all-or-nothing: the first
    /// failing target fails it with [`EngineError::PartialBatch`]. When two
    /// targets share an identity the later one in `targets` wins.
    pub async fn compute(
        &self,
        window: &TimeWindow,
        step: Option<Duration>,
        targets: &[Target],
        min_duration: Option<Duration>,
    ) -> Result<AggregateResponse> {
        validate_targets(targets)?;

        let runs = targets.iter().map(|target| async move {
            let identity = target.identity();
            match self.intersect(window, step, target, min_duration).await {
                Ok(result) => Ok((identity, result)),
                Err(source) => Err(EngineError::PartialBatch {
                    identity,
                    source: Box::new(source),
                }),
            }
        });
        let results = future::try_join_all(runs).await?;

        let mut response = AggregateResponse::new();
        for (identity, result) in results {
            if response.insert(identity.clone(), result).is_some() {
                log::warn!(
                    "Duplicate target identity `{}`; keeping the last result",
                    identity
                );
            }
        }
        Ok(response)
    }

    /// Position of the object at every sample instant of `window`.
    pub async fn positions(
        &self,
        window: &TimeWindow,
        step: Option<Duration>,
    ) -> Result<Vec<PositionFix>> {
        let step = step.unwrap_or_else(|| self.config.step());
        let samples = Sampler::new(step, self.config.granularity())?.sample(window)?;

        let lookups = samples.map(|instant| async move {
            let location = self.positions.position_at(instant).await?;
            Ok(PositionFix::new(instant, location))
        });
        join_ordered(lookups, self.config.max_in_flight).await
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}
