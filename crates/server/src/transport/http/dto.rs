//! Request bodies and their resolution into engine queries.
//!
//! Wire units: `step` in hours, `min_duration` in minutes, `dist` in
//! `units`. Omitted distances fall back to the engine configuration.

use super::error::ApiError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use overpass::EngineConfig;
use overpass_types::{DistanceUnit, GeoPoint, Target, TimeWindow};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse an RFC 3339 timestamp, or a naive date/time read as UTC.
pub fn parse_instant(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    let raw = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    Err(ApiError::bad_request(format!("Unrecognised timestamp `{}`", raw)))
}

/// Decode a request body, rejecting anything that is not JSON.
pub fn parse_json(body: &[u8]) -> Result<Value, ApiError> {
    serde_json::from_slice(body).map_err(|_| ApiError::bad_request("Wrong JSON format"))
}

fn from_body<T: DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    serde_json::from_value(body)
        .map_err(|e| ApiError::bad_request(format!("Invalid request body: {}", e)))
}

fn window(start_dt: &str, end_dt: &str) -> Result<TimeWindow, ApiError> {
    Ok(TimeWindow::new(parse_instant(start_dt)?, parse_instant(end_dt)?))
}

fn hours(step: Option<u64>) -> Option<Duration> {
    step.map(|h| Duration::from_secs(h.saturating_mul(3600)))
}

fn minutes(min_duration: Option<u64>) -> Option<Duration> {
    min_duration
        .filter(|&m| m > 0)
        .map(|m| Duration::from_secs(m.saturating_mul(60)))
}

/// A resolved query over one target or a batch of them.
#[derive(Debug, Clone)]
pub struct Query<T> {
    pub window: TimeWindow,
    pub subject: T,
    pub step: Option<Duration>,
    pub min_duration: Option<Duration>,
}

/// `POST /coords` body: one instant or a sampled range.
#[derive(Debug)]
pub enum CoordsRequest {
    Instant(InstantCoords),
    Range(RangeCoords),
}

#[derive(Debug, Deserialize)]
pub struct InstantCoords {
    pub dt: String,
}

#[derive(Debug, Deserialize)]
pub struct RangeCoords {
    pub start_dt: String,
    pub end_dt: String,
    #[serde(default)]
    pub step: Option<u64>,
}

impl CoordsRequest {
    pub fn from_value(body: Value) -> Result<Self, ApiError> {
        if body.get("dt").is_some() {
            from_body(body).map(Self::Instant)
        } else {
            from_body(body).map(Self::Range)
        }
    }

    pub fn resolve(&self) -> Result<Query<()>, ApiError> {
        match self {
            Self::Instant(req) => Ok(Query {
                window: TimeWindow::instant(parse_instant(&req.dt)?),
                subject: (),
                step: None,
                min_duration: None,
            }),
            Self::Range(req) => Ok(Query {
                window: window(&req.start_dt, &req.end_dt)?,
                subject: (),
                step: hours(req.step),
                min_duration: None,
            }),
        }
    }
}

/// A target as sent on the wire; `dist` and `units` override request defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetSpec {
    pub lon: f64,
    pub lat: f64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub dist: Option<f64>,
    #[serde(default)]
    pub units: Option<DistanceUnit>,
}

impl TargetSpec {
    fn into_target(self, dist: f64, units: DistanceUnit) -> Target {
        let mut target = Target::new(
            GeoPoint::new(self.lon, self.lat),
            self.dist.unwrap_or(dist),
            self.units.unwrap_or(units),
        );
        target.title = self.title;
        target
    }
}

#[derive(Debug, Deserialize)]
pub struct SingleRadius {
    pub start_dt: String,
    pub end_dt: String,
    pub lon: f64,
    pub lat: f64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub dist: Option<f64>,
    #[serde(default)]
    pub units: Option<DistanceUnit>,
    #[serde(default)]
    pub min_duration: Option<u64>,
    #[serde(default)]
    pub step: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct BatchRadius {
    pub start_dt: String,
    pub end_dt: String,
    pub objects: Vec<TargetSpec>,
    #[serde(default)]
    pub dist: Option<f64>,
    #[serde(default)]
    pub units: Option<DistanceUnit>,
    #[serde(default)]
    pub min_duration: Option<u64>,
    #[serde(default)]
    pub step: Option<u64>,
}

/// `POST /radius` body, told apart by the presence of `objects`.
#[derive(Debug)]
pub enum RadiusRequest {
    Single(SingleRadius),
    Batch(BatchRadius),
}

impl RadiusRequest {
    pub fn from_value(body: Value) -> Result<Self, ApiError> {
        match body.get("objects") {
            Some(objects) if !objects.is_array() => Err(ApiError::bad_request(
                "Body parameter `objects` must be `array`",
            )),
            Some(_) => from_body(body).map(Self::Batch),
            None => from_body(body).map(Self::Single),
        }
    }
}

impl SingleRadius {
    pub fn resolve(self, config: &EngineConfig) -> Result<Query<Target>, ApiError> {
        let spec = TargetSpec {
            lon: self.lon,
            lat: self.lat,
            title: self.title,
            dist: self.dist,
            units: self.units,
        };
        Ok(Query {
            window: window(&self.start_dt, &self.end_dt)?,
            subject: spec.into_target(config.default_radius, config.default_units),
            step: hours(self.step),
            min_duration: minutes(self.min_duration),
        })
    }
}

impl BatchRadius {
    pub fn resolve(self, config: &EngineConfig) -> Result<Query<Vec<Target>>, ApiError> {
        let dist = self.dist.unwrap_or(config.default_radius);
        let units = self.units.unwrap_or(config.default_units);
        Ok(Query {
            window: window(&self.start_dt, &self.end_dt)?,
            subject: self
                .objects
                .into_iter()
                .map(|spec| spec.into_target(dist, units))
                .collect(),
            step: hours(self.step),
            min_duration: minutes(self.min_duration),
        })
    }
}

/// Text fields of a `POST /lst` multipart form.
#[derive(Debug, Default)]
pub struct LstForm {
    pub start_dt: Option<String>,
    pub end_dt: Option<String>,
    pub lst: Option<String>,
    pub dist: Option<String>,
    pub units: Option<String>,
    pub min_duration: Option<String>,
    pub step: Option<String>,
}

impl LstForm {
    /// Record a form field; unknown fields are ignored.
    pub fn set(&mut self, name: &str, value: String) {
        let slot = match name {
            "start_dt" => &mut self.start_dt,
            "end_dt" => &mut self.end_dt,
            "lst" => &mut self.lst,
            "dist" => &mut self.dist,
            "units" => &mut self.units,
            "min_duration" => &mut self.min_duration,
            "step" => &mut self.step,
            _ => return,
        };
        *slot = Some(value);
    }

    pub fn resolve(self, config: &EngineConfig) -> Result<Query<Vec<Target>>, ApiError> {
        let (Some(start_dt), Some(end_dt), Some(lst)) = (self.start_dt, self.end_dt, self.lst)
        else {
            return Err(ApiError::bad_request(
                "Body parameters must contain required keys `start_dt`, `end_dt`, `lst`",
            ));
        };

        let dist = match self.dist {
            Some(raw) => parse_field::<f64>("dist", &raw)?,
            None => config.default_radius,
        };
        let units = match self.units {
            Some(raw) => raw
                .parse::<DistanceUnit>()
                .map_err(|e| ApiError::bad_request(e.to_string()))?,
            None => config.default_units,
        };
        let min_duration = match self.min_duration {
            Some(raw) => minutes(Some(parse_field::<u64>("min_duration", &raw)?)),
            None => Some(config.lst_min_duration()),
        };
        let step = match self.step {
            Some(raw) => hours(Some(parse_field::<u64>("step", &raw)?)),
            None => None,
        };

        Ok(Query {
            window: window(&start_dt, &end_dt)?,
            subject: overpass::parse_target_list(&lst, dist, units)?,
            step,
            min_duration,
        })
    }
}

fn parse_field<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::bad_request(format!("Form field `{}` is not a valid number", name)))
}
