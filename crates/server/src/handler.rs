//! Handler implementation for Overpass RPC service

use crate::protocol::{OverpassService, Stats};
use crate::state::ServerState;
use overpass_types::{AggregateResponse, PositionFix, Target, TimeWindow};
use std::time::Duration;
use tarpc::context;

#[derive(Clone, Debug)]
pub struct Handler {
    state: ServerState,
}

impl Handler {
    pub fn new(state: ServerState) -> Self {
        Self { state }
    }
}

impl OverpassService for Handler {
    async fn coords(
        self,
        _: context::Context,
        window: TimeWindow,
        step_secs: Option<u64>,
    ) -> Result<Vec<PositionFix>, String> {
        self.state.admit(&window).map_err(|e| e.to_string())?;
        self.state
            .engine
            .positions(&window, step_secs.map(Duration::from_secs))
            .await
            .map_err(|e| e.to_string())
    }

    async fn intersect(
        self,
        _: context::Context,
        window: TimeWindow,
        targets: Vec<Target>,
        step_secs: Option<u64>,
        min_duration_secs: Option<u64>,
    ) -> Result<AggregateResponse, String> {
        self.state.admit(&window).map_err(|e| e.to_string())?;
        self.state
            .engine
            .compute(
                &window,
                step_secs.map(Duration::from_secs),
                &targets,
                min_duration_secs.filter(|&s| s > 0).map(Duration::from_secs),
            )
            .await
            .map_err(|e| e.to_string())
    }

    async fn insert_track(self, _: context::Context, fixes: Vec<PositionFix>) -> usize {
        let inserted = self.state.ephemeris.extend(fixes);
        tracing::debug!("Inserted {} fixes over RPC", inserted);
        inserted
    }

    async fn publish(self, _: context::Context, channel: String, message: String) -> usize {
        self.state.hub.publish(&channel, message)
    }

    async fn stats(self, _: context::Context) -> Stats {
        self.state.stats()
    }
}
