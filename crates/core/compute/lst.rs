//! Target list files.
//!
//! One target per line: `lon lat [title...]`, separated by whitespace or
//! commas. Blank lines and lines starting with `#` are skipped.
//!
//! ```text
//! # lon     lat      title
//! 37.6173   55.7558  Moscow
//! -0.1276,  51.5072, London
//! 2.3522    48.8566
//! ```

use crate::compute::validation::validate_target;
use crate::error::{EngineError, Result};
use overpass_types::{DistanceUnit, GeoPoint, Target};

/// Parse a target list, giving every target the same radius.
pub fn parse_target_list(text: &str, radius: f64, units: DistanceUnit) -> Result<Vec<Target>> {
    let mut targets = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line_no = idx + 1;
        let mut fields = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|f| !f.is_empty());

        let lon = parse_coordinate(fields.next(), "longitude", line_no)?;
        let lat = parse_coordinate(fields.next(), "latitude", line_no)?;
        let title = fields.collect::<Vec<_>>().join(" ");

        let mut target = Target::new(GeoPoint::new(lon, lat), radius, units);
        if !title.is_empty() {
            target = target.with_title(title);
        }

        validate_target(&target)
            .map_err(|e| EngineError::InvalidTarget(format!("line {}: {}", line_no, e)))?;
        targets.push(target);
    }

    if targets.is_empty() {
        return Err(EngineError::InvalidTarget(
            "target list contains no targets".to_string(),
        ));
    }

    Ok(targets)
}

fn parse_coordinate(field: Option<&str>, name: &str, line_no: usize) -> Result<f64> {
    let field = field.ok_or_else(|| {
        EngineError::InvalidTarget(format!("line {}: missing {}", line_no, name))
    })?;
    field.parse().map_err(|_| {
        EngineError::InvalidTarget(format!(
            "line {}: {} `{}` is not a number",
            line_no, name, field
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_mixed_separators_and_titles() {
        let text = "# header\n\n37.6173 55.7558 Moscow\n-0.1276, 51.5072, City of London\n2.3522\t48.8566\n";
        let targets = parse_target_list(text, 250.0, DistanceUnit::Kilometers).unwrap();

        assert_eq!(targets.len(), 3);
        assert_eq!(targets[0].identity(), "Moscow");
        assert_eq!(targets[1].identity(), "City of London");
        assert_eq!(targets[1].location, GeoPoint::new(-0.1276, 51.5072));
        assert_eq!(targets[2].identity(), "2.3522,48.8566");
        assert!(targets.iter().all(|t| t.radius == 250.0));
    }

    #[test]
    fn test_reports_line_of_bad_coordinate() {
        let text = "1.0 2.0\n3.0 north\n";
        let err = parse_target_list(text, 10.0, DistanceUnit::Miles).unwrap_err();
        assert!(err.to_string().contains("line 2"), "{}", err);
    }

    #[test]
    fn test_missing_latitude_and_out_of_range() {
        assert!(parse_target_list("12.5\n", 1.0, DistanceUnit::Meters).is_err());
        assert!(parse_target_list("190 10\n", 1.0, DistanceUnit::Meters).is_err());
    }

    #[test]
    fn test_empty_list_is_rejected() {
        assert!(parse_target_list("# nothing\n\n", 1.0, DistanceUnit::Meters).is_err());
    }
}
