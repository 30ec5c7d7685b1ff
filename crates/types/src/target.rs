use crate::geo::{DistanceUnit, GeoPoint};
use serde::{Deserialize, Serialize};

/// A geographic point plus radius to test proximity against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub location: GeoPoint,
    pub radius: f64,
    #[serde(default)]
    pub units: DistanceUnit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Target {
    pub fn new(location: GeoPoint, radius: f64, units: DistanceUnit) -> Self {
        Self {
            location,
            radius,
            units,
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Key of this target in an aggregate response.
    ///
    /// The title when one was given, otherwise `"lon,lat"`.
    pub fn identity(&self) -> String {
        match &self.title {
            Some(title) => title.clone(),
            None => format!("{},{}", self.location.lon(), self.location.lat()),
        }
    }

    #[inline]
    pub fn radius_meters(&self) -> f64 {
        self.units.to_meters(self.radius)
    }
}
