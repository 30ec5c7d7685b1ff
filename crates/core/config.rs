//! Engine configuration.
//!
//! Defaults that the transport falls back to when a request leaves them out
//! (step, radius, units) live here and are passed to the engine explicitly.
use crate::compute::filter::DurationPolicy;
use overpass_types::DistanceUnit;
use serde::de::Error;
use std::time::Duration;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Sampling step in seconds when a request does not give one.
    #[serde(default = "EngineConfig::default_step_secs")]
    pub step_secs: u64,

    /// Window starts are truncated to a multiple of this many seconds.
    #[serde(default = "EngineConfig::default_granularity_secs")]
    pub granularity_secs: u64,

    #[serde(default = "EngineConfig::default_radius")]
    pub default_radius: f64,

    #[serde(default)]
    pub default_units: DistanceUnit,

    #[serde(default)]
    pub duration_policy: DurationPolicy,

    /// Cap on concurrent proximity queries per window. Unbounded when unset.
    #[serde(default)]
    pub max_in_flight: Option<usize>,

    /// Minimum duration applied to uploaded target lists, in minutes.
    #[serde(default = "EngineConfig::default_lst_min_duration_mins")]
    pub lst_min_duration_mins: u64,
}

impl EngineConfig {
    const fn default_step_secs() -> u64 {
        3600
    }

    const fn default_granularity_secs() -> u64 {
        3600
    }

    const fn default_radius() -> f64 {
        250.0
    }

    const fn default_lst_min_duration_mins() -> u64 {
        60
    }

    pub fn step(&self) -> Duration {
        Duration::from_secs(self.step_secs)
    }

    pub fn granularity(&self) -> Duration {
        Duration::from_secs(self.granularity_secs)
    }

    pub fn lst_min_duration(&self) -> Duration {
        Duration::from_secs(self.lst_min_duration_mins * 60)
    }

    pub fn with_step(mut self, step: Duration) -> Self {
        assert!(step.as_secs() > 0, "Step must be at least one second");
        self.step_secs = step.as_secs();
        self
    }

    pub fn with_granularity(mut self, granularity: Duration) -> Self {
        assert!(
            granularity.as_secs() > 0,
            "Granularity must be at least one second"
        );
        self.granularity_secs = granularity.as_secs();
        self
    }

    pub fn with_default_radius(mut self, radius: f64, units: DistanceUnit) -> Self {
        self.default_radius = radius;
        self.default_units = units;
        self
    }

    pub fn with_duration_policy(mut self, policy: DurationPolicy) -> Self {
        self.duration_policy = policy;
        self
    }

    pub fn with_max_in_flight(mut self, limit: usize) -> Self {
        assert!(limit > 0, "In-flight limit must be greater than zero");

        if limit > 10_000 {
            log::warn!(
                "In-flight limit of {} is effectively unbounded for typical windows",
                limit
            );
        }

        self.max_in_flight = Some(limit);
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.step_secs == 0 {
            return Err("Step must be greater than zero".to_string());
        }

        if self.granularity_secs == 0 {
            return Err("Granularity must be greater than zero".to_string());
        }

        if !self.default_radius.is_finite() || self.default_radius <= 0.0 {
            return Err(format!(
                "Default radius must be a positive number, got: {}",
                self.default_radius
            ));
        }

        if let Some(limit) = self.max_in_flight
            && limit == 0
        {
            return Err("In-flight limit must be greater than zero".to_string());
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: EngineConfig = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: EngineConfig = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            step_secs: Self::default_step_secs(),
            granularity_secs: Self::default_granularity_secs(),
            default_radius: Self::default_radius(),
            default_units: DistanceUnit::default(),
            duration_policy: DurationPolicy::default(),
            max_in_flight: None,
            lst_min_duration_mins: Self::default_lst_min_duration_mins(),
        }
    }
}
