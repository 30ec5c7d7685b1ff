//! In-memory ephemeris: a time-indexed track of the object's positions.

use super::{PositionStore, ProximityIndex};
use crate::error::{IndexError, PositionError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use overpass_types::{DistanceUnit, GeoPoint, PositionFix, TimeWindow, Track};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Track of position fixes ordered by instant.
///
/// Lookups between two fixes interpolate linearly, taking the short way
/// around the antimeridian. Instants outside the track have no position.
#[derive(Debug, Default)]
pub struct Ephemeris {
    fixes: RwLock<BTreeMap<DateTime<Utc>, GeoPoint>>,
}

impl Ephemeris {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fixes<I: IntoIterator<Item = PositionFix>>(fixes: I) -> Self {
        let ephemeris = Self::new();
        ephemeris.extend(fixes);
        ephemeris
    }

    /// Load a JSON array of `{"instant", "lon", "lat"}` fixes.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let track: Track = serde_json::from_reader(BufReader::new(file))?;
        log::info!(
            "Loaded {} position fixes from {}",
            track.len(),
            path.as_ref().display()
        );
        Ok(Self::from_fixes(track))
    }

    /// Insert a fix, returning the location it replaced.
    pub fn insert(&self, fix: PositionFix) -> Option<GeoPoint> {
        self.fixes.write().insert(fix.instant, fix.location)
    }

    /// Insert many fixes, returning how many were inserted.
    pub fn extend<I: IntoIterator<Item = PositionFix>>(&self, fixes: I) -> usize {
        let mut map = self.fixes.write();
        let mut count = 0;
        for fix in fixes {
            map.insert(fix.instant, fix.location);
            count += 1;
        }
        count
    }

    pub fn len(&self) -> usize {
        self.fixes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixes.read().is_empty()
    }

    /// First and last instant covered by the track.
    pub fn span(&self) -> Option<TimeWindow> {
        let fixes = self.fixes.read();
        let (first, _) = fixes.first_key_value()?;
        let (last, _) = fixes.last_key_value()?;
        Some(TimeWindow::new(*first, *last))
    }

    /// Position at `instant`, exact or interpolated.
    pub fn position(&self, instant: DateTime<Utc>) -> Option<GeoPoint> {
        let fixes = self.fixes.read();
        if let Some(point) = fixes.get(&instant) {
            return Some(*point);
        }
        let (t0, p0) = fixes.range(..instant).next_back()?;
        let (t1, p1) = fixes.range(instant..).next()?;
        Some(interpolate((*t0, *p0), (*t1, *p1), instant))
    }
}

fn interpolate(
    (t0, p0): (DateTime<Utc>, GeoPoint),
    (t1, p1): (DateTime<Utc>, GeoPoint),
    at: DateTime<Utc>,
) -> GeoPoint {
    let total = (t1 - t0).num_milliseconds() as f64;
    let frac = (at - t0).num_milliseconds() as f64 / total;

    let mut dlon = p1.lon() - p0.lon();
    if dlon > 180.0 {
        dlon -= 360.0;
    } else if dlon < -180.0 {
        dlon += 360.0;
    }

    let lon = wrap_longitude(p0.lon() + dlon * frac);
    let lat = p0.lat() + (p1.lat() - p0.lat()) * frac;
    GeoPoint::new(lon, lat)
}

#[inline]
fn wrap_longitude(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

#[async_trait]
impl PositionStore for Ephemeris {
    async fn position_at(
        &self,
        instant: DateTime<Utc>,
    ) -> std::result::Result<GeoPoint, PositionError> {
        self.position(instant)
            .ok_or(PositionError::NotFound(instant))
    }
}

#[async_trait]
impl ProximityIndex for Ephemeris {
    async fn is_within_radius(
        &self,
        instant: DateTime<Utc>,
        center: GeoPoint,
        radius: f64,
        units: DistanceUnit,
    ) -> std::result::Result<Option<f64>, IndexError> {
        let position = self.position(instant).ok_or(IndexError::NoData(instant))?;
        let meters = center.haversine_distance(&position);

        if meters <= units.to_meters(radius) {
            Ok(Some(units.from_meters(meters)))
        } else {
            Ok(None)
        }
    }
}
