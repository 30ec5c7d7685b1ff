//! Collaborator abstractions: where positions and proximity answers come from.
//!
//! The engine never talks to a concrete backend. A deployment plugs in a
//! geo-radius index and a position store; [`Ephemeris`] is the in-memory
//! implementation of both.

use crate::error::{IndexError, PositionError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use overpass_types::{DistanceUnit, GeoPoint};

mod memory;

pub use memory::Ephemeris;

/// Opaque proximity oracle.
///
/// One call is one round trip to the index; implementations must not retry.
#[async_trait]
pub trait ProximityIndex: Send + Sync {
    /// Distance from `center` to the object at `instant`, in `units`, if the
    /// object lies within `radius`; `None` if it lies outside.
    async fn is_within_radius(
        &self,
        instant: DateTime<Utc>,
        center: GeoPoint,
        radius: f64,
        units: DistanceUnit,
    ) -> Result<Option<f64>, IndexError>;
}

/// Source of the object's coordinates at a given instant.
#[async_trait]
pub trait PositionStore: Send + Sync {
    async fn position_at(&self, instant: DateTime<Utc>) -> Result<GeoPoint, PositionError>;
}
