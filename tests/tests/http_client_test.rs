use overpass::Ephemeris;
use overpass_client::{HttpClientError, OverpassHttpClient};
use overpass_integration_tests::{at, day_start, equatorial_track, spawn_test_server};
use overpass_types::{DistanceUnit, GeoPoint, Target, TimeWindow};
use std::sync::Arc;

fn greenwich() -> Target {
    Target::new(GeoPoint::new(0.0, 0.0), 2000.0, DistanceUnit::Kilometers).with_title("greenwich")
}

#[tokio::test]
async fn test_http_round_trip() -> anyhow::Result<()> {
    let server = spawn_test_server(Arc::new(Ephemeris::new()), true).await?;
    let client = OverpassHttpClient::new(&server.http_url())?;

    let health = client.health().await?;
    assert_eq!(health["status"], "ok");
    assert_eq!(health["fixes"], 0);

    let inserted = client.track(&equatorial_track(day_start(), 24)).await?;
    assert_eq!(inserted, 97);

    let fixes = client.coords_at(at(12)).await?;
    assert_eq!(fixes.len(), 1);
    assert!(fixes[0].location.lon().abs() < 1e-9);

    let fixes = client
        .coords(TimeWindow::new(at(0), at(6)), Some(2))
        .await?;
    assert_eq!(fixes.len(), 4);
    Ok(())
}

#[tokio::test]
async fn test_http_radius() -> anyhow::Result<()> {
    let ephemeris = Arc::new(Ephemeris::from_fixes(equatorial_track(day_start(), 24)));
    let server = spawn_test_server(ephemeris, true).await?;
    let client = OverpassHttpClient::new(&server.http_url())?;
    let day = TimeWindow::new(at(0), at(23));

    let trace = client.radius(day, &greenwich(), None).await?;
    assert_eq!(trace.len(), 24);
    assert_eq!(trace.present_count(), 3);

    // Minutes on the wire: 120 minutes is exceeded, 180 is not.
    assert_eq!(client.radius(day, &greenwich(), Some(120)).await?, trace);
    assert!(client.radius(day, &greenwich(), Some(180)).await?.is_empty());

    let miles = Target::new(GeoPoint::new(90.0, 0.0), 100.0, DistanceUnit::Miles);
    let response = client
        .radius_many(day, &[greenwich(), miles], None)
        .await?;
    assert_eq!(response["greenwich"].present_count(), 3);
    let east = &response["90,0"];
    assert_eq!(east.present_count(), 1);
    assert_eq!(east.samples()[18].distance, Some(0.0));
    Ok(())
}

#[tokio::test]
async fn test_http_errors() -> anyhow::Result<()> {
    let ephemeris = Arc::new(Ephemeris::from_fixes(equatorial_track(day_start(), 24)));
    let server = spawn_test_server(ephemeris, false).await?;
    let client = OverpassHttpClient::new(&server.http_url())?;

    let err = client
        .radius(TimeWindow::new(at(0), at(3)), &greenwich(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, HttpClientError::Server { status: 404, .. }));

    let now = chrono::Utc::now();
    let ahead = TimeWindow::new(now, now + chrono::TimeDelta::hours(1));
    let mut bad = greenwich();
    bad.location = GeoPoint::new(0.0, 95.0);
    let err = client.radius(ahead, &bad, None).await.unwrap_err();
    match err {
        HttpClientError::Server { status, code, .. } => {
            assert_eq!(status, 400);
            assert_eq!(code, "BAD_REQUEST");
        }
        other => panic!("unexpected error: {}", other),
    }
    Ok(())
}
