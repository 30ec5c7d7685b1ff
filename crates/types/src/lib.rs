//! # overpass-types
//!
//! Data model shared by the Overpass engine, server and client.
//!
//! - **Geography**: [`GeoPoint`], [`DistanceUnit`]
//! - **Time**: [`TimeWindow`]
//! - **Queries**: [`Target`]
//! - **Results**: [`SampleResult`], [`WindowResult`], [`AggregateResponse`]
//! - **Ephemeris**: [`PositionFix`]
//!
//! Every type is serializable with Serde; instants are UTC `chrono` timestamps.
//!
//! ## Examples
//!
//! ```rust
//! use overpass_types::{DistanceUnit, GeoPoint, Target, TimeWindow};
//! use chrono::{TimeZone, Utc};
//!
//! let moscow = Target::new(GeoPoint::new(37.62, 55.75), 250.0, DistanceUnit::Kilometers);
//! assert_eq!(moscow.identity(), "37.62,55.75");
//!
//! let start = Utc.with_ymd_and_hms(2024, 1, 1, 3, 0, 0).unwrap();
//! let end = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let window = TimeWindow::new(start, end); // reversed bounds are swapped
//! assert!(window.start() <= window.end());
//! ```

pub mod geo;
pub mod result;
pub mod target;
pub mod trajectory;
pub mod window;

pub use crate::geo::{DistanceUnit, GeoPoint};
pub use result::{AggregateResponse, SampleResult, WindowResult};
pub use target::Target;
pub use trajectory::{PositionFix, Track};
pub use window::TimeWindow;
