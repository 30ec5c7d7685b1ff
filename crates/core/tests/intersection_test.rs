use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use overpass::prelude::*;
use overpass::{IndexError, PositionFix, Sampler};
use std::sync::Arc;

const HOUR: Duration = Duration::from_secs(3600);

fn t(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, hour, minute, 0).unwrap()
}

/// Object circling the equator eastwards at 15 degrees per hour, starting at lon -180.
fn equatorial_track() -> Arc<Ephemeris> {
    let start = t(0, 0);
    let fixes = (0..=48 * 4).map(|quarter| {
        let instant = start + TimeDelta::minutes(15 * quarter);
        let lon = -180.0 + 3.75 * quarter as f64;
        let lon = (lon + 180.0).rem_euclid(360.0) - 180.0;
        PositionFix::new(instant, GeoPoint::new(lon, 0.0))
    });
    Arc::new(Ephemeris::from_fixes(fixes))
}

#[test]
fn test_hourly_window_has_four_samples() {
    let window = TimeWindow::new(t(0, 0), t(3, 0));
    let samples: Vec<_> = Sampler::hourly().sample(&window).unwrap().collect();
    assert_eq!(samples, vec![t(0, 0), t(1, 0), t(2, 0), t(3, 0)]);
}

#[tokio::test]
async fn test_pass_over_greenwich() -> anyhow::Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let engine = Engine::builder().ephemeris(equatorial_track()).build()?;

    // Lon 0 is reached at 12:00; 2000 km is ~18 degrees, so 11:00..13:00 are in range.
    let greenwich = Target::new(GeoPoint::new(0.0, 0.0), 2000.0, DistanceUnit::Kilometers)
        .with_title("greenwich");
    let day = TimeWindow::new(t(23, 0), t(0, 0));

    let trace = engine.intersect(&day, None, &greenwich, None).await?;
    assert_eq!(trace.len(), 24);
    let present: Vec<_> = trace
        .samples()
        .iter()
        .filter(|s| s.present)
        .map(|s| s.instant)
        .collect();
    assert_eq!(present, vec![t(11, 0), t(12, 0), t(13, 0)]);
    assert_eq!(trace.samples()[12].distance, Some(0.0));

    let accepted = engine
        .intersect(&day, None, &greenwich, Some(HOUR * 2))
        .await?;
    assert_eq!(accepted, trace);

    let rejected = engine
        .intersect(&day, None, &greenwich, Some(HOUR * 3))
        .await?;
    assert!(rejected.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_finer_step_sees_shorter_pass() -> anyhow::Result<()> {
    let engine = Engine::builder().ephemeris(equatorial_track()).build()?;
    let spot = Target::new(GeoPoint::new(90.0, 0.0), 500.0, DistanceUnit::Kilometers);
    let window = TimeWindow::new(t(17, 0), t(19, 0));

    // Lon 90 at 18:00; 500 km is ~4.5 degrees, i.e. +-18 minutes.
    let hourly = engine.intersect(&window, None, &spot, None).await?;
    assert_eq!(hourly.present_count(), 1);

    let quarterly = engine
        .intersect(&window, Some(Duration::from_secs(15 * 60)), &spot, None)
        .await?;
    assert_eq!(quarterly.len(), 9);
    assert_eq!(quarterly.present_count(), 3);
    assert_eq!(quarterly.approximate_duration(), Duration::from_secs(45 * 60));
    Ok(())
}

#[tokio::test]
async fn test_batch_of_targets() -> anyhow::Result<()> {
    let engine = Engine::builder().ephemeris(equatorial_track()).build()?;
    let targets = vec![
        Target::new(GeoPoint::new(0.0, 0.0), 2000.0, DistanceUnit::Kilometers).with_title("A"),
        Target::new(GeoPoint::new(0.0, 60.0), 2000.0, DistanceUnit::Kilometers).with_title("B"),
    ];
    let window = TimeWindow::new(t(0, 0), t(23, 0));

    let response = engine.compute(&window, None, &targets, None).await?;
    assert_eq!(response.len(), 2);
    assert_eq!(response["A"].present_count(), 3);
    assert_eq!(response["B"].present_count(), 0);

    let filtered = engine
        .compute(&window, None, &targets, Some(HOUR))
        .await?;
    assert!(!filtered["A"].is_empty());
    assert!(filtered["B"].is_empty());
    Ok(())
}

struct Unreachable;

#[async_trait]
impl ProximityIndex for Unreachable {
    async fn is_within_radius(
        &self,
        _instant: DateTime<Utc>,
        _center: GeoPoint,
        _radius: f64,
        _units: DistanceUnit,
    ) -> std::result::Result<Option<f64>, IndexError> {
        Err(IndexError::Unavailable("connection refused".to_string()))
    }
}

#[tokio::test]
async fn test_unreachable_index_fails_batch() -> anyhow::Result<()> {
    let engine = Engine::builder()
        .index(Arc::new(Unreachable))
        .positions(equatorial_track())
        .build()?;
    let targets = vec![Target::new(GeoPoint::new(0.0, 0.0), 1.0, DistanceUnit::Miles)];
    let window = TimeWindow::new(t(0, 0), t(3, 0));

    let err = engine
        .compute(&window, None, &targets, None)
        .await
        .unwrap_err();
    assert!(matches!(err.root(), EngineError::QueryFailed { .. }));

    // Positions come from the store, not the index.
    let fixes = engine.positions(&window, None).await?;
    assert_eq!(fixes.len(), 4);
    Ok(())
}
