//! Overpass Server
//!
//! Network front end for the Overpass intersection engine.
//!
//! # Transports
//!
//! - **RPC** (default): tarpc service speaking JSON over length-delimited TCP
//! - **HTTP** (`http` feature, on by default): JSON API, multipart target
//!   lists and WebSocket channels
//!
//! # Example
//!
//! ```ignore
//! use overpass_server::{run_server, ServerState};
//!
//! run_server(listener, state, shutdown).await?;
//! ```

pub mod broadcaster;
pub mod channels;
pub mod config;
pub mod handler;
pub mod protocol;
pub mod state;
pub mod transport;

pub use broadcaster::spawn_position_broadcaster;
pub use channels::ChannelHub;
pub use config::{BroadcastConfig, ServerConfig};
pub use protocol::{OverpassService, OverpassServiceClient, Stats};
pub use state::{HistoryRejected, ServerState};

// Re-export default transport for convenience
pub use transport::rpc::run_server;
