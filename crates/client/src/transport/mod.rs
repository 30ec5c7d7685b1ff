//! Transport layer for Overpass client
//!
//! Available transports:
//! - `rpc` - tarpc-based RPC (default)
//! - `http` - HTTP/JSON API (requires `http` feature)

pub mod rpc;

#[cfg(feature = "http")]
pub mod http;
