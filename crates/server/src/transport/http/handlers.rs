//! JSON endpoints.

use super::dto::{CoordsRequest, LstForm, RadiusRequest, parse_json};
use super::error::ApiError;
use crate::state::ServerState;
use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, Path, State},
    response::{IntoResponse, Response},
};
use overpass_types::{AggregateResponse, PositionFix};
use serde_json::{Value, json};

pub async fn health(State(state): State<ServerState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": overpass::VERSION,
        "fixes": state.ephemeris.len(),
    }))
}

/// Positions at one instant or over a sampled range.
pub async fn coords(
    State(state): State<ServerState>,
    body: Bytes,
) -> Result<Json<Vec<PositionFix>>, ApiError> {
    let query = CoordsRequest::from_value(parse_json(&body)?)?.resolve()?;
    state.admit(&query.window)?;

    let fixes = state.engine.positions(&query.window, query.step).await?;
    Ok(Json(fixes))
}

/// Presence trace of one target, or a map of traces for `objects`.
pub async fn radius(State(state): State<ServerState>, body: Bytes) -> Result<Response, ApiError> {
    let config = state.engine.config();
    match RadiusRequest::from_value(parse_json(&body)?)? {
        RadiusRequest::Single(request) => {
            let query = request.resolve(config)?;
            state.admit(&query.window)?;
            let result = state
                .engine
                .intersect(&query.window, query.step, &query.subject, query.min_duration)
                .await?;
            Ok(Json(result).into_response())
        }
        RadiusRequest::Batch(request) => {
            let query = request.resolve(config)?;
            state.admit(&query.window)?;
            let response = state
                .engine
                .compute(&query.window, query.step, &query.subject, query.min_duration)
                .await?;
            Ok(Json(response).into_response())
        }
    }
}

/// Batch query over an uploaded target list.
pub async fn lst(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> Result<Json<AggregateResponse>, ApiError> {
    let mut form = LstForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let value = field
            .text()
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        form.set(&name, value);
    }

    let query = form.resolve(state.engine.config())?;
    state.admit(&query.window)?;
    tracing::debug!("Target list with {} entries", query.subject.len());

    let response = state
        .engine
        .compute(&query.window, query.step, &query.subject, query.min_duration)
        .await?;
    Ok(Json(response))
}

/// Append fixes to the ephemeris.
pub async fn track(State(state): State<ServerState>, body: Bytes) -> Result<Json<Value>, ApiError> {
    let fixes: Vec<PositionFix> = serde_json::from_slice(&body)
        .map_err(|e| ApiError::bad_request(format!("Invalid track: {}", e)))?;

    let inserted = state.ephemeris.extend(fixes);
    tracing::info!("Inserted {} fixes", inserted);
    Ok(Json(json!({
        "inserted": inserted,
        "fixes": state.ephemeris.len(),
    })))
}

/// Publish a JSON message to every subscriber of `channel`.
pub async fn publish(
    State(state): State<ServerState>,
    Path(channel): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let message = parse_json(&body)?;
    let receivers = state.hub.publish(&channel, message.to_string());
    Ok(Json(json!({
        "channel": channel,
        "receivers": receivers,
    })))
}
