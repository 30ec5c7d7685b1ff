//! Validation for geographic coordinates and targets.

use crate::error::{EngineError, Result};
use overpass_types::{GeoPoint, Target};

/// Validates a point has valid longitude and latitude.
///
/// Longitude: [-180.0, 180.0], Latitude: [-90.0, 90.0]
///
/// # Examples
///
/// ```
/// use overpass::compute::validation::validate_geographic_point;
/// use overpass_types::GeoPoint;
///
/// assert!(validate_geographic_point(&GeoPoint::new(-74.0060, 40.7128)).is_ok());
/// assert!(validate_geographic_point(&GeoPoint::new(200.0, 40.0)).is_err());
/// assert!(validate_geographic_point(&GeoPoint::new(-74.0, 95.0)).is_err());
/// ```
pub fn validate_geographic_point(point: &GeoPoint) -> Result<()> {
    let (lon, lat) = (point.lon(), point.lat());

    if !lon.is_finite() {
        return Err(EngineError::InvalidTarget(format!(
            "Longitude must be finite, got: {}",
            lon
        )));
    }

    if !lat.is_finite() {
        return Err(EngineError::InvalidTarget(format!(
            "Latitude must be finite, got: {}",
            lat
        )));
    }

    if !(-180.0..=180.0).contains(&lon) {
        return Err(EngineError::InvalidTarget(format!(
            "Longitude out of range [-180.0, 180.0]: {}",
            lon
        )));
    }

    if !(-90.0..=90.0).contains(&lat) {
        return Err(EngineError::InvalidTarget(format!(
            "Latitude out of range [-90.0, 90.0]: {}",
            lat
        )));
    }

    Ok(())
}

/// Validates location and radius of a target.
pub fn validate_target(target: &Target) -> Result<()> {
    validate_geographic_point(&target.location)?;

    if !target.radius.is_finite() || target.radius <= 0.0 {
        return Err(EngineError::InvalidTarget(format!(
            "Radius must be a positive number, got: {} for `{}`",
            target.radius,
            target.identity()
        )));
    }

    Ok(())
}

/// Validates every target, failing on the first invalid one.
pub fn validate_targets(targets: &[Target]) -> Result<()> {
    if targets.is_empty() {
        return Err(EngineError::InvalidTarget(
            "At least one target is required".to_string(),
        ));
    }
    targets.iter().try_for_each(validate_target)
}
