//! tarpc transport for Overpass client
//!
//! This is the default RPC client. Durations are sent as whole seconds.

use overpass_server::{OverpassServiceClient, Stats};
use overpass_types::{AggregateResponse, PositionFix, Target, TimeWindow};
use std::net::SocketAddr;
use std::time::Duration;
use tarpc::client;
use tarpc::context;
use tarpc::tokio_serde::formats::Json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Connection error: {0}")]
    Connection(#[from] std::io::Error),
    #[error("RPC error: {0}")]
    Rpc(#[from] tarpc::client::RpcError),
    #[error("Server error: {0}")]
    Server(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Clone)]
pub struct OverpassClient {
    client: OverpassServiceClient,
}

impl OverpassClient {
    pub async fn connect(addr: SocketAddr) -> Result<Self> {
        let transport = tarpc::serde_transport::tcp::connect(addr, Json::default).await?;
        let client = OverpassServiceClient::new(client::Config::default(), transport).spawn();
        Ok(Self { client })
    }

    /// Positions of the object at every sample of `window`.
    pub async fn coords(
        &self,
        window: TimeWindow,
        step: Option<Duration>,
    ) -> Result<Vec<PositionFix>> {
        let ctx = context::current();
        self.client
            .coords(ctx, window, step.map(|s| s.as_secs()))
            .await?
            .map_err(ClientError::Server)
    }

    /// Presence traces keyed by target identity.
    pub async fn intersect(
        &self,
        window: TimeWindow,
        targets: Vec<Target>,
        step: Option<Duration>,
        min_duration: Option<Duration>,
    ) -> Result<AggregateResponse> {
        let ctx = context::current();
        self.client
            .intersect(
                ctx,
                window,
                targets,
                step.map(|s| s.as_secs()),
                min_duration.map(|d| d.as_secs()),
            )
            .await?
            .map_err(ClientError::Server)
    }

    pub async fn insert_track(&self, fixes: Vec<PositionFix>) -> Result<usize> {
        let ctx = context::current();
        Ok(self.client.insert_track(ctx, fixes).await?)
    }

    /// Publish `message` to a channel, returning how many subscribers got it.
    pub async fn publish(&self, channel: &str, message: &serde_json::Value) -> Result<usize> {
        let ctx = context::current();
        let message = serde_json::to_string(message)?;
        Ok(self
            .client
            .publish(ctx, channel.to_string(), message)
            .await?)
    }

    pub async fn stats(&self) -> Result<Stats> {
        let ctx = context::current();
        Ok(self.client.stats(ctx).await?)
    }
}
