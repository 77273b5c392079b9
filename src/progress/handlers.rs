use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::LogProgressRequest;
use super::repo::ProgressRecord;
use crate::{
    error::ApiResult,
    state::AppState,
    store::{timestamp_now, RecordQuery, RecordStore},
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/progress", get(list_progress).post(log_progress))
}

#[instrument(skip(state, body))]
pub async fn log_progress(
    State(state): State<AppState>,
    Json(body): Json<LogProgressRequest>,
) -> ApiResult<(StatusCode, Json<ProgressRecord>)> {
    let entry = state
        .progress
        .append(ProgressRecord::from_request(body, timestamp_now))
        .await?;
    info!(id = %entry.id, user_id = %entry.user_id, "progress logged");
    Ok((StatusCode::CREATED, Json(entry)))
}

#[instrument(skip(state))]
pub async fn list_progress(
    State(state): State<AppState>,
    Query(q): Query<RecordQuery>,
) -> ApiResult<Json<Vec<ProgressRecord>>> {
    let entries = state.progress.query(&q).await?;
    Ok(Json(entries))
}
