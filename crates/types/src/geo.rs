//! Geographic primitives built on the `geo` crate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Length unit a proximity radius is expressed in.
///
/// Mirrors the units accepted by geo-radius indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DistanceUnit {
    #[serde(rename = "m")]
    Meters,
    #[default]
    #[serde(rename = "km")]
    Kilometers,
    #[serde(rename = "mi")]
    Miles,
    #[serde(rename = "ft")]
    Feet,
}

impl DistanceUnit {
    /// Length of one unit in meters.
    pub const fn meters_per_unit(self) -> f64 {
        match self {
            Self::Meters => 1.0,
            Self::Kilometers => 1_000.0,
            Self::Miles => 1_609.344,
            Self::Feet => 0.3048,
        }
    }

    /// Convert a value in this unit to meters.
    #[inline]
    pub fn to_meters(self, value: f64) -> f64 {
        value * self.meters_per_unit()
    }

    /// Convert a value in meters to this unit.
    #[inline]
    pub fn from_meters(self, meters: f64) -> f64 {
        meters / self.meters_per_unit()
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Meters => "m",
            Self::Kilometers => "km",
            Self::Miles => "mi",
            Self::Feet => "ft",
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown distance unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownUnit(pub String);

impl fmt::Display for UnknownUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown distance unit `{}` (expected one of m, km, mi, ft)",
            self.0
        )
    }
}

impl std::error::Error for UnknownUnit {}

impl FromStr for DistanceUnit {
    type Err = UnknownUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" => Ok(Self::Meters),
            "km" => Ok(Self::Kilometers),
            "mi" => Ok(Self::Miles),
            "ft" => Ok(Self::Feet),
            other => Err(UnknownUnit(other.to_string())),
        }
    }
}

/// A geographic point with longitude/latitude coordinates.
///
/// Wraps `geo::Point` and serializes as `{"lon": .., "lat": ..}`.
///
/// # Examples
///
/// ```
/// use overpass_types::GeoPoint;
///
/// let nyc = GeoPoint::new(-74.0060, 40.7128);
/// assert_eq!(nyc.lon(), -74.0060);
/// assert_eq!(nyc.lat(), 40.7128);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "LonLat", into = "LonLat")]
pub struct GeoPoint {
    inner: geo::Point<f64>,
}

#[derive(Serialize, Deserialize)]
struct LonLat {
    lon: f64,
    lat: f64,
}

impl From<LonLat> for GeoPoint {
    fn from(raw: LonLat) -> Self {
        Self::new(raw.lon, raw.lat)
    }
}

impl From<GeoPoint> for LonLat {
    fn from(point: GeoPoint) -> Self {
        Self {
            lon: point.lon(),
            lat: point.lat(),
        }
    }
}

impl GeoPoint {
    /// Create a point from longitude and latitude in degrees.
    #[inline]
    pub fn new(lon: f64, lat: f64) -> Self {
        Self {
            inner: geo::Point::new(lon, lat),
        }
    }

    #[inline]
    pub fn lon(&self) -> f64 {
        self.inner.x()
    }

    #[inline]
    pub fn lat(&self) -> f64 {
        self.inner.y()
    }

    /// Access the inner `geo::Point`.
    #[inline]
    pub fn inner(&self) -> &geo::Point<f64> {
        &self.inner
    }

    /// Calculate haversine distance to another point in meters.
    ///
    /// # Examples
    ///
    /// ```
    /// use overpass_types::GeoPoint;
    ///
    /// let nyc = GeoPoint::new(-74.0060, 40.7128);
    /// let la = GeoPoint::new(-118.2437, 34.0522);
    /// assert!(nyc.haversine_distance(&la) > 3_900_000.0);
    /// ```
    #[inline]
    pub fn haversine_distance(&self, other: &GeoPoint) -> f64 {
        use geo::Distance;
        geo::Haversine.distance(self.inner, other.inner)
    }
}

impl From<geo::Point<f64>> for GeoPoint {
    fn from(point: geo::Point<f64>) -> Self {
        Self { inner: point }
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((lon, lat): (f64, f64)) -> Self {
        Self::new(lon, lat)
    }
}

impl From<GeoPoint> for (f64, f64) {
    fn from(point: GeoPoint) -> Self {
        (point.lon(), point.lat())
    }
}
