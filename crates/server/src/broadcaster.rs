//! Background task publishing the object's current position.

use crate::channels::ChannelHub;
use chrono::Utc;
use overpass::Ephemeris;
use overpass_types::PositionFix;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Publish the current position to `channel` every `interval`.
///
/// Instants the ephemeris does not cover are skipped. The task runs until
/// the returned handle is aborted or the runtime shuts down.
pub fn spawn_position_broadcaster(
    ephemeris: Arc<Ephemeris>,
    hub: ChannelHub,
    channel: String,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tracing::info!("Broadcasting positions to `{}` every {:?}", channel, interval);

        loop {
            ticker.tick().await;
            let now = Utc::now();
            let Some(location) = ephemeris.position(now) else {
                tracing::debug!("No position for {}, skipping broadcast", now);
                continue;
            };

            match serde_json::to_string(&PositionFix::new(now, location)) {
                Ok(message) => {
                    let receivers = hub.publish(&channel, message);
                    tracing::trace!("Position sent to {} subscribers", receivers);
                }
                Err(e) => tracing::error!("Failed to encode position: {}", e),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use overpass_types::GeoPoint;

    #[tokio::test]
    async fn test_broadcasts_current_position() {
        let now = Utc::now();
        let ephemeris = Arc::new(Ephemeris::from_fixes([
            PositionFix::new(now - TimeDelta::hours(1), GeoPoint::new(10.0, 20.0)),
            PositionFix::new(now + TimeDelta::hours(1), GeoPoint::new(10.0, 20.0)),
        ]));
        let hub = ChannelHub::default();
        let mut rx = hub.subscribe("iss");

        let task = spawn_position_broadcaster(
            ephemeris,
            hub.clone(),
            "iss".to_string(),
            Duration::from_millis(20),
        );

        let message = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("broadcast within timeout")
            .unwrap();
        let fix: PositionFix = serde_json::from_str(&message).unwrap();
        assert!((fix.location.lon() - 10.0).abs() < 1e-9);
        assert!((fix.location.lat() - 20.0).abs() < 1e-9);
        task.abort();
    }

    #[tokio::test]
    async fn test_skips_uncovered_instants() {
        let hub = ChannelHub::default();
        let mut rx = hub.subscribe("iss");
        let task = spawn_position_broadcaster(
            Arc::new(Ephemeris::new()),
            hub.clone(),
            "iss".to_string(),
            Duration::from_millis(10),
        );

        let waited = tokio::time::timeout(Duration::from_millis(100), rx.recv()).await;
        assert!(waited.is_err());
        task.abort();
    }
}
