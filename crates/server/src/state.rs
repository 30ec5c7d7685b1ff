//! State shared by every transport.

use crate::channels::ChannelHub;
use crate::protocol::Stats;
use chrono::{DateTime, NaiveTime, Utc};
use overpass::{Engine, Ephemeris};
use overpass_types::TimeWindow;
use std::sync::Arc;
use thiserror::Error;

/// A query reached into the past while history is disabled.
#[derive(Debug, Error)]
#[error("requested start {start} precedes the current day")]
pub struct HistoryRejected {
    pub start: DateTime<Utc>,
}

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub ephemeris: Arc<Ephemeris>,
    pub hub: ChannelHub,
    allow_history: bool,
}

impl ServerState {
    pub fn new(engine: Arc<Engine>, ephemeris: Arc<Ephemeris>, hub: ChannelHub) -> Self {
        Self {
            engine,
            ephemeris,
            hub,
            allow_history: false,
        }
    }

    /// Accept windows starting before today (UTC).
    pub fn with_history(mut self, allow: bool) -> Self {
        self.allow_history = allow;
        self
    }

    pub fn allows_history(&self) -> bool {
        self.allow_history
    }

    /// Apply the history policy to a resolved window.
    pub fn admit(&self, window: &TimeWindow) -> Result<(), HistoryRejected> {
        if self.allow_history || window.start() >= start_of_today() {
            Ok(())
        } else {
            Err(HistoryRejected {
                start: window.start(),
            })
        }
    }

    pub fn stats(&self) -> Stats {
        Stats {
            fixes: self.ephemeris.len(),
            track: self.ephemeris.span(),
            channels: self.hub.channel_count(),
        }
    }
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("engine", &self.engine)
            .field("fixes", &self.ephemeris.len())
            .field("allow_history", &self.allow_history)
            .finish_non_exhaustive()
    }
}

fn start_of_today() -> DateTime<Utc> {
    Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc()
}
