use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::LogMealRequest;
use super::repo::MealRecord;
use crate::{
    error::ApiResult,
    state::AppState,
    store::{timestamp_now, RecordQuery, RecordStore},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/log-meal", post(log_meal))
        .route("/meals", get(list_meals))
}

#[instrument(skip(state, body))]
pub async fn log_meal(
    State(state): State<AppState>,
    Json(body): Json<LogMealRequest>,
) -> ApiResult<(StatusCode, Json<MealRecord>)> {
    let meal = state
        .meals
        .append(MealRecord::from_request(body, timestamp_now))
        .await?;
    info!(id = %meal.id, user_id = %meal.user_id, meal_type = %meal.meal_type, "meal logged");
    Ok((StatusCode::CREATED, Json(meal)))
}

#[instrument(skip(state))]
pub async fn list_meals(
    State(state): State<AppState>,
    Query(q): Query<RecordQuery>,
) -> ApiResult<Json<Vec<MealRecord>>> {
    let meals = state.meals.query(&q).await?;
    Ok(Json(meals))
}
