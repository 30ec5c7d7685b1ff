//! HTTP error responses.

use crate::state::HistoryRejected;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use overpass::{EngineError, IndexError, PositionError};
use serde::Serialize;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Error code for programmatic handling
    pub code: &'static str,
    /// Human-readable error message
    pub message: String,
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed body, missing keys or values the engine cannot evaluate
    BadRequest(String),
    /// No data for the requested instants, or a rejected historical query
    NotFound(String),
    /// The proximity index or position store failed
    BadGateway(String),
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadGateway(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::NotFound(_) => "NOT_FOUND",
            Self::BadGateway(_) => "UPSTREAM_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let message = match self {
            Self::BadRequest(msg) | Self::NotFound(msg) => msg,
            Self::BadGateway(msg) | Self::Internal(msg) => {
                tracing::error!("Request failed: {}", msg);
                msg
            }
        };

        (status, Json(ErrorBody { code, message })).into_response()
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        let message = err.to_string();
        match err.root() {
            EngineError::InvalidWindow(_) | EngineError::InvalidTarget(_) => {
                Self::BadRequest(message)
            }
            EngineError::QueryFailed {
                source: IndexError::NoData(_),
                ..
            }
            | EngineError::Position(PositionError::NotFound(_)) => Self::NotFound(message),
            EngineError::QueryFailed { .. } | EngineError::Position(_) => {
                Self::BadGateway(message)
            }
            _ => Self::Internal(message),
        }
    }
}

impl From<HistoryRejected> for ApiError {
    fn from(err: HistoryRejected) -> Self {
        Self::NotFound(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_engine_error_status() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        let invalid = ApiError::from(EngineError::InvalidWindow("step".into()));
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

        let no_data = ApiError::from(EngineError::QueryFailed {
            instant: at,
            source: IndexError::NoData(at),
        });
        assert_eq!(no_data.status(), StatusCode::NOT_FOUND);

        let down = ApiError::from(EngineError::PartialBatch {
            identity: "A".into(),
            source: Box::new(EngineError::QueryFailed {
                instant: at,
                source: IndexError::Unavailable("refused".into()),
            }),
        });
        assert_eq!(down.status(), StatusCode::BAD_GATEWAY);

        let missing = ApiError::from(EngineError::Position(PositionError::NotFound(at)));
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_history_is_not_found() {
        let start = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        let err = ApiError::from(HistoryRejected { start });
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
