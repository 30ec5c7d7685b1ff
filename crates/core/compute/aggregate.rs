//! Concurrent fan-out of per-sample queries.
//!
//! All queries of one window run on the calling task as a structured join:
//! results come back in sample order regardless of completion order, and the
//! first failure drops every query still in flight.

use crate::compute::proximity::ProximityClient;
use crate::compute::sampler::Sampler;
use crate::compute::validation::validate_target;
use crate::error::Result;
use futures::future::{self, Future};
use futures::stream::{self, StreamExt, TryStreamExt};
use overpass_types::{Target, TimeWindow, WindowResult};
use std::time::Duration;

/// Await every future, keeping input order, failing on the first error.
///
/// With `limit`, at most that many futures are polled at once.
pub(crate) async fn join_ordered<I, F, T>(futures: I, limit: Option<usize>) -> Result<Vec<T>>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T>>,
{
    match limit {
        Some(limit) => {
            stream::iter(futures)
                .buffered(limit.max(1))
                .try_collect()
                .await
        }
        None => future::try_join_all(futures).await,
    }
}

#[derive(Debug, Clone)]
pub struct Aggregator {
    client: ProximityClient,
    granularity: Duration,
    max_in_flight: Option<usize>,
}

impl Aggregator {
    pub fn new(client: ProximityClient, granularity: Duration) -> Self {
        Self {
            client,
            granularity,
            max_in_flight: None,
        }
    }

    pub fn with_max_in_flight(mut self, limit: Option<usize>) -> Self {
        self.max_in_flight = limit;
        self
    }

    /// One proximity query per sample instant of `window`, in chronological order.
    pub async fn aggregate(
        &self,
        window: &TimeWindow,
        step: Duration,
        target: &Target,
    ) -> Result<WindowResult> {
        validate_target(target)?;
        let sampler = Sampler::new(step, self.granularity)?;
        let samples = sampler.sample(window)?;

        log::debug!(
            "Fanning out {} proximity queries for `{}` over [{}, {}]",
            samples.len(),
            target.identity(),
            window.start(),
            window.end()
        );

        let queries = samples.map(|instant| self.client.query(instant, target));
        let results = join_ordered(queries, self.max_in_flight).await?;

        Ok(WindowResult::new(sampler.step(), results))
    }
}
