//! Shared fixtures for end-to-end tests: a live server on ephemeral ports
//! and a synthetic track.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use overpass::{Engine, Ephemeris};
use overpass_server::{ChannelHub, ServerState};
use overpass_types::{GeoPoint, PositionFix};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

pub struct TestServer {
    pub rpc_addr: SocketAddr,
    pub http_addr: SocketAddr,
    pub state: ServerState,
    shutdown: CancellationToken,
}

impl TestServer {
    pub fn http_url(&self) -> String {
        format!("http://{}", self.http_addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Start RPC and HTTP transports over `ephemeris`.
pub async fn spawn_test_server(
    ephemeris: Arc<Ephemeris>,
    allow_history: bool,
) -> anyhow::Result<TestServer> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "overpass_server=info,overpass=info,info".into()),
        )
        .try_init()
        .ok();

    let engine = Engine::builder().ephemeris(ephemeris.clone()).build()?;
    let state = ServerState::new(Arc::new(engine), ephemeris, ChannelHub::default())
        .with_history(allow_history);
    let shutdown = CancellationToken::new();

    let rpc_listener = TcpListener::bind("127.0.0.1:0").await?;
    let rpc_addr = rpc_listener.local_addr()?;
    let http_listener = TcpListener::bind("127.0.0.1:0").await?;
    let http_addr = http_listener.local_addr()?;

    let rpc_state = state.clone();
    let rpc_shutdown = shutdown.clone();
    tokio::spawn(async move {
        let _ = overpass_server::run_server(
            rpc_listener,
            rpc_state,
            Box::pin(rpc_shutdown.cancelled_owned()),
        )
        .await;
    });

    let http_state = state.clone();
    let http_shutdown = shutdown.clone();
    tokio::spawn(async move {
        let _ = overpass_server::transport::http::run_server(
            http_listener,
            http_state,
            http_shutdown.cancelled_owned(),
        )
        .await;
    });

    // Give it a moment to start
    tokio::time::sleep(Duration::from_millis(50)).await;

    Ok(TestServer {
        rpc_addr,
        http_addr,
        state,
        shutdown,
    })
}

/// Reference day used by fixtures.
pub fn day_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// `hours` after [`day_start`].
pub fn at(hours: i64) -> DateTime<Utc> {
    day_start() + TimeDelta::hours(hours)
}

/// Equatorial track moving east 15 degrees per hour, at lon -180 when
/// `start` and lon 0 twelve hours later. One fix every 15 minutes.
pub fn equatorial_track(start: DateTime<Utc>, hours: i64) -> Vec<PositionFix> {
    (0..=hours * 4)
        .map(|quarter| {
            let instant = start + TimeDelta::minutes(15 * quarter);
            let lon = (3.75 * quarter as f64).rem_euclid(360.0) - 180.0;
            PositionFix::new(instant, GeoPoint::new(lon, 0.0))
        })
        .collect()
}
