//! Overpass Client
//!
//! Native Rust client for the Overpass intersection server.
//!
//! # Transports
//!
//! - **RPC** (default): tarpc-based transport
//! - **HTTP** (optional): JSON API client, enable with `http` feature
//!
//! # Example
//!
//! ```ignore
//! use overpass_client::OverpassClient;
//!
//! let client = OverpassClient::connect(addr).await?;
//! let traces = client.intersect(window, targets, None, None).await?;
//! ```

pub mod transport;

// Re-export the default (RPC) client for convenience
pub use transport::rpc::{ClientError, OverpassClient, Result};

#[cfg(feature = "http")]
pub use transport::http::{HttpClientError, OverpassHttpClient};

pub use overpass_server::Stats;
