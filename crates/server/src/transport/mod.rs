//! Transport layer for Overpass server
//!
//! Available transports:
//! - `rpc` - tarpc-based RPC (default)
//! - `http` - HTTP/JSON API with WebSocket channels (requires `http` feature)

pub mod rpc;

#[cfg(feature = "http")]
pub mod http;
