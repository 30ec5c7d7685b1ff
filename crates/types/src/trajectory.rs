use crate::geo::GeoPoint;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Position of the tracked object at one instant.
///
/// Serializes flat: `{"instant": "...", "lon": .., "lat": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionFix {
    pub instant: DateTime<Utc>,
    #[serde(flatten)]
    pub location: GeoPoint,
}

impl PositionFix {
    pub fn new(instant: DateTime<Utc>, location: GeoPoint) -> Self {
        Self { instant, location }
    }
}

pub type Track = Vec<PositionFix>;
