use overpass::Ephemeris;
use overpass_client::{ClientError, OverpassClient};
use overpass_integration_tests::{at, day_start, equatorial_track, spawn_test_server};
use overpass_types::{DistanceUnit, GeoPoint, Target, TimeWindow};
use std::sync::Arc;
use std::time::Duration;

fn greenwich() -> Target {
    Target::new(GeoPoint::new(0.0, 0.0), 2000.0, DistanceUnit::Kilometers).with_title("greenwich")
}

#[tokio::test]
async fn test_track_then_query_over_rpc() -> anyhow::Result<()> {
    let server = spawn_test_server(Arc::new(Ephemeris::new()), true).await?;
    let client = OverpassClient::connect(server.rpc_addr).await?;

    let stats = client.stats().await?;
    assert_eq!(stats.fixes, 0);
    assert!(stats.track.is_none());

    let inserted = client
        .insert_track(equatorial_track(day_start(), 24))
        .await?;
    assert_eq!(inserted, 97);

    let stats = client.stats().await?;
    assert_eq!(stats.fixes, 97);
    assert_eq!(stats.track, Some(TimeWindow::new(at(0), at(24))));

    let fixes = client
        .coords(TimeWindow::new(at(11), at(13)), None)
        .await?;
    assert_eq!(fixes.len(), 3);
    assert!(fixes[1].location.lon().abs() < 1e-9);

    let half_hourly = client
        .coords(TimeWindow::new(at(11), at(13)), Some(Duration::from_secs(1800)))
        .await?;
    assert_eq!(half_hourly.len(), 5);
    Ok(())
}

#[tokio::test]
async fn test_intersect_batch_over_rpc() -> anyhow::Result<()> {
    let ephemeris = Arc::new(Ephemeris::from_fixes(equatorial_track(day_start(), 24)));
    let server = spawn_test_server(ephemeris, true).await?;
    let client = OverpassClient::connect(server.rpc_addr).await?;

    let north = Target::new(GeoPoint::new(0.0, 60.0), 2000.0, DistanceUnit::Kilometers);
    let window = TimeWindow::new(at(23), at(0));

    let response = client
        .intersect(window, vec![greenwich(), north.clone()], None, None)
        .await?;
    assert_eq!(response.len(), 2);
    let present: Vec<_> = response["greenwich"]
        .samples()
        .iter()
        .filter(|s| s.present)
        .map(|s| s.instant)
        .collect();
    assert_eq!(present, vec![at(11), at(12), at(13)]);
    assert_eq!(response["0,60"].present_count(), 0);

    // Three hours of presence is not strictly more than three hours.
    let filtered = client
        .intersect(
            window,
            vec![greenwich(), north],
            None,
            Some(Duration::from_secs(3 * 3600)),
        )
        .await?;
    assert!(filtered["greenwich"].is_empty());
    assert!(filtered["0,60"].is_empty());
    Ok(())
}

#[tokio::test]
async fn test_server_errors_reach_client() -> anyhow::Result<()> {
    let ephemeris = Arc::new(Ephemeris::from_fixes(equatorial_track(day_start(), 24)));
    let server = spawn_test_server(ephemeris, false).await?;
    let client = OverpassClient::connect(server.rpc_addr).await?;

    // 2024 lies before today.
    let err = client
        .intersect(TimeWindow::new(at(0), at(3)), vec![greenwich()], None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Server(msg) if msg.contains("precedes")));

    let now = chrono::Utc::now();
    let ahead = TimeWindow::new(now, now + chrono::TimeDelta::hours(2));
    let mut bad = greenwich();
    bad.radius = -1.0;
    let err = client.intersect(ahead, vec![bad], None, None).await.unwrap_err();
    assert!(matches!(err, ClientError::Server(msg) if msg.contains("invalid target")));

    // The track ends in 2024, so the future has no positions.
    let err = client.coords(ahead, None).await.unwrap_err();
    assert!(matches!(err, ClientError::Server(msg) if msg.contains("no position data")));
    Ok(())
}

#[tokio::test]
async fn test_publish_over_rpc() -> anyhow::Result<()> {
    let server = spawn_test_server(Arc::new(Ephemeris::new()), true).await?;
    let client = OverpassClient::connect(server.rpc_addr).await?;

    assert_eq!(client.publish("alerts", &serde_json::json!({"n": 1})).await?, 0);

    let mut rx = server.state.hub.subscribe("alerts");
    let reached = client
        .publish("alerts", &serde_json::json!({"n": 2}))
        .await?;
    assert_eq!(reached, 1);
    assert_eq!(rx.recv().await?, r#"{"n":2}"#);
    assert_eq!(client.stats().await?.channels, 1);
    Ok(())
}
