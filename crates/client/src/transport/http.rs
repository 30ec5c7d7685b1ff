//! HTTP client for Overpass
//!
//! Speaks the server's JSON API, as an alternative to the tarpc transport.
//!
//! # Example
//!
//! ```ignore
//! use overpass_client::OverpassHttpClient;
//!
//! let client = OverpassHttpClient::new("http://localhost:8080")?;
//! let trace = client.radius(window, &target, Some(60)).await?;
//! ```

use chrono::{DateTime, Utc};
use overpass_types::{AggregateResponse, PositionFix, Target, TimeWindow, WindowResult};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

/// Error type for HTTP client operations
#[derive(Debug, thiserror::Error)]
pub enum HttpClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Server error {status} ({code}): {message}")]
    Server {
        status: u16,
        code: String,
        message: String,
    },
}

#[derive(Deserialize)]
struct ErrorReply {
    code: String,
    message: String,
}

/// HTTP client for Overpass. `step` is in hours and `min_duration` in
/// minutes, as on the wire.
#[derive(Clone, Debug)]
pub struct OverpassHttpClient {
    base_url: String,
    http: reqwest::Client,
}

impl OverpassHttpClient {
    pub fn new(base_url: &str) -> Result<Self, HttpClientError> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::builder().build()?,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, HttpClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }
        let reply = response.json::<ErrorReply>().await.unwrap_or_else(|_| ErrorReply {
            code: "UNKNOWN".to_string(),
            message: status.to_string(),
        });
        Err(HttpClientError::Server {
            status: status.as_u16(),
            code: reply.code,
            message: reply.message,
        })
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, HttpClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        Self::decode(response).await
    }

    pub async fn health(&self) -> Result<Value, HttpClientError> {
        let response = self.http.get(self.url("/health")).send().await?;
        Self::decode(response).await
    }

    pub async fn coords_at(&self, dt: DateTime<Utc>) -> Result<Vec<PositionFix>, HttpClientError> {
        self.post("/coords", &json!({ "dt": dt.to_rfc3339() })).await
    }

    pub async fn coords(
        &self,
        window: TimeWindow,
        step: Option<u64>,
    ) -> Result<Vec<PositionFix>, HttpClientError> {
        let mut body = window_body(&window);
        if let Some(step) = step {
            body.insert("step".into(), step.into());
        }
        self.post("/coords", &Value::Object(body)).await
    }

    pub async fn radius(
        &self,
        window: TimeWindow,
        target: &Target,
        min_duration: Option<u64>,
    ) -> Result<WindowResult, HttpClientError> {
        let mut body = window_body(&window);
        body.extend(target_body(target));
        if let Some(min) = min_duration {
            body.insert("min_duration".into(), min.into());
        }
        self.post("/radius", &Value::Object(body)).await
    }

    pub async fn radius_many(
        &self,
        window: TimeWindow,
        targets: &[Target],
        min_duration: Option<u64>,
    ) -> Result<AggregateResponse, HttpClientError> {
        let mut body = window_body(&window);
        let objects = targets.iter().map(|t| Value::Object(target_body(t))).collect();
        body.insert("objects".into(), Value::Array(objects));
        if let Some(min) = min_duration {
            body.insert("min_duration".into(), min.into());
        }
        self.post("/radius", &Value::Object(body)).await
    }

    /// Append fixes to the server's ephemeris; returns how many were inserted.
    pub async fn track(&self, fixes: &[PositionFix]) -> Result<usize, HttpClientError> {
        let reply: Value = self.post("/track", fixes).await?;
        Ok(reply["inserted"].as_u64().unwrap_or(0) as usize)
    }

    pub async fn publish(&self, channel: &str, message: &Value) -> Result<usize, HttpClientError> {
        let reply: Value = self.post(&format!("/channels/{}", channel), message).await?;
        Ok(reply["receivers"].as_u64().unwrap_or(0) as usize)
    }
}

fn window_body(window: &TimeWindow) -> Map<String, Value> {
    let mut body = Map::new();
    body.insert("start_dt".into(), window.start().to_rfc3339().into());
    body.insert("end_dt".into(), window.end().to_rfc3339().into());
    body
}

fn target_body(target: &Target) -> Map<String, Value> {
    let mut body = Map::new();
    body.insert("lon".into(), target.location.lon().into());
    body.insert("lat".into(), target.location.lat().into());
    body.insert("dist".into(), target.radius.into());
    body.insert("units".into(), target.units.as_str().into());
    if let Some(title) = &target.title {
        body.insert("title".into(), title.clone().into());
    }
    body
}
