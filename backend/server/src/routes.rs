use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State as AxumState, rejection::{JsonRejection, QueryRejection}},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    error::AppError,
    models::{HistoryQuery, KNOWN_SYMPTOMS, PredictionOutcome, PredictionRecord, Submission},
    state::State,
    utils::MISSING_USER_ID,
};

pub async fn predict_handler(
    AxumState(state): AxumState<Arc<State>>,
    payload: Result<Json<Submission>, JsonRejection>,
) -> Result<Json<PredictionOutcome>, AppError> {
    let Json(submission) = payload?;

    let outcome = state.service.submit(submission).await?;

    Ok(Json(outcome))
}

pub async fn history_handler(
    AxumState(state): AxumState<Arc<State>>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<Vec<PredictionRecord>>, AppError> {
    let Query(query) = query?;

    let user_id = query
        .user_id
        .as_deref()
        .map(str::trim)
        .filter(|user_id| !user_id.is_empty())
        .ok_or(AppError::Validation(MISSING_USER_ID))?;

    let records = state.service.history(user_id).await?;

    Ok(Json(records))
}

pub async fn symptoms_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(KNOWN_SYMPTOMS)).into_response()
}

pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response()
}
