//! Temporal geospatial intersection engine.
//!
//! Answers "during `[start, end]`, when was the moving object within radius R
//! of these points". A window is sampled at a fixed step, every sample is
//! checked against a proximity index concurrently, and the per-sample results
//! are reassembled in time order and optionally filtered by a minimum
//! presence duration.
//!
//! ## Components
//! - **Sampler**: window to ordered sample instants ([`Sampler`])
//! - **Proximity client**: one index round trip per instant ([`ProximityClient`])
//! - **Aggregator**: order-preserving, fail-fast fan-out ([`Aggregator`])
//! - **Duration filter**: minimum-presence threshold ([`DurationFilter`])
//! - **Engine**: concurrent, all-or-nothing multi-target batches ([`Engine`])
//!
//! ```rust
//! use overpass::{Engine, Ephemeris};
//! use overpass_types::{DistanceUnit, GeoPoint, PositionFix, Target, TimeWindow};
//! use chrono::{TimeZone, Utc};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> overpass::Result<()> {
//! let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let t3 = Utc.with_ymd_and_hms(2024, 1, 1, 3, 0, 0).unwrap();
//! let track = Arc::new(Ephemeris::from_fixes([
//!     PositionFix::new(t0, GeoPoint::new(0.0, 0.0)),
//!     PositionFix::new(t3, GeoPoint::new(3.0, 0.0)),
//! ]));
//!
//! let engine = Engine::builder().ephemeris(track).build()?;
//! let target = Target::new(GeoPoint::new(0.0, 0.0), 250.0, DistanceUnit::Kilometers);
//! let trace = engine.intersect(&TimeWindow::new(t0, t3), None, &target, None).await?;
//! assert_eq!(trace.present_count(), 3);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod compute;
pub mod config;
pub mod engine;
pub mod error;
pub mod storage;

pub use builder::EngineBuilder;
pub use engine::Engine;
pub use error::{EngineError, IndexError, PositionError, Result};

pub use compute::aggregate::Aggregator;
pub use compute::filter::{DurationFilter, DurationPolicy};
pub use compute::lst::parse_target_list;
pub use compute::proximity::ProximityClient;
pub use compute::sampler::{Sampler, Samples};
pub use config::EngineConfig;
pub use storage::{Ephemeris, PositionStore, ProximityIndex};

pub use overpass_types::{
    AggregateResponse, DistanceUnit, GeoPoint, PositionFix, SampleResult, Target, TimeWindow,
    WindowResult,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {
    pub use crate::{Engine, EngineBuilder, EngineConfig, EngineError, Result};

    pub use crate::{DurationPolicy, Ephemeris, PositionStore, ProximityIndex};

    pub use crate::{DistanceUnit, GeoPoint, Target, TimeWindow, WindowResult};

    pub use std::time::Duration;
}
