//! Protocol definitions for Overpass RPC
//!
//! This module contains the service trait and types used for RPC communication.

use overpass_types::{AggregateResponse, PositionFix, Target, TimeWindow};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stats {
    /// Fixes held by the ephemeris.
    pub fixes: usize,
    /// Time span covered by the ephemeris, if any.
    pub track: Option<TimeWindow>,
    /// Channels with at least one subscriber.
    pub channels: usize,
}

/// Durations travel as whole seconds; `None` selects the server default.
#[tarpc::service]
pub trait OverpassService {
    async fn coords(window: TimeWindow, step_secs: Option<u64>) -> Result<Vec<PositionFix>, String>;

    async fn intersect(
        window: TimeWindow,
        targets: Vec<Target>,
        step_secs: Option<u64>,
        min_duration_secs: Option<u64>,
    ) -> Result<AggregateResponse, String>;

    /// Append fixes to the ephemeris; returns how many were inserted.
    async fn insert_track(fixes: Vec<PositionFix>) -> usize;

    async fn publish(channel: String, message: String) -> usize;

    async fn stats() -> Stats;
}
