use axum::{extract::State, routing::post, Json, Router};
use serde_json::Value;
use tracing::{info, instrument};

use super::dto::{ChatRequest, ChatResponse, FoodImageRequest, PlanRequest, RecipeRequest};
use super::prompts;
use crate::{
    ai::{extract::extract_json, Generator, InlineImage},
    error::{ApiError, ApiResult},
    state::AppState,
};

const RECOMMEND_FAILED: &str = "An error occurred while generating recommendations";
const ANALYZE_FAILED: &str = "An error occurred while analyzing the food image";
const RECIPE_FAILED: &str = "An error occurred while generating the recipe";
const CHAT_FAILED: &str = "An error occurred while generating a response";

pub const MIN_INGREDIENTS: usize = 2;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/recommend", post(recommend))
        .route("/analyze-food-image", post(analyze_food_image))
        .route("/generate-recipe", post(generate_recipe))
        .route("/chatbot", post(chatbot))
}

#[instrument(skip(state, body))]
pub async fn recommend(
    State(state): State<AppState>,
    Json(body): Json<PlanRequest>,
) -> ApiResult<Json<Value>> {
    let prompt = prompts::plan_prompt(&body);
    let raw = state
        .ai
        .generate(&prompt)
        .await
        .map_err(|e| ApiError::generation(RECOMMEND_FAILED, e))?;

    let plan = extract_json(&raw)?;
    info!("plan generated");
    Ok(Json(plan))
}

#[instrument(skip(state, body))]
pub async fn analyze_food_image(
    State(state): State<AppState>,
    Json(body): Json<FoodImageRequest>,
) -> ApiResult<Json<Value>> {
    let payload = body
        .image
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("No image provided"))?;
    let image = InlineImage::from_client_payload(payload.trim());

    let raw = state
        .ai
        .generate_with_image(&prompts::food_image_prompt(), &image)
        .await
        .map_err(|e| ApiError::generation(ANALYZE_FAILED, e))?;

    let analysis = extract_json(&raw)?;
    info!(mime_type = %image.mime_type, "food image analyzed");
    Ok(Json(analysis))
}

#[instrument(skip(state, body))]
pub async fn generate_recipe(
    State(state): State<AppState>,
    Json(body): Json<RecipeRequest>,
) -> ApiResult<Json<Value>> {
    let ingredients: Vec<String> = body
        .ingredients
        .unwrap_or_default()
        .into_iter()
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty())
        .collect();
    if ingredients.len() < MIN_INGREDIENTS {
        return Err(ApiError::bad_request("At least 2 ingredients are required"));
    }

    let raw = state
        .ai
        .generate(&prompts::recipe_prompt(&ingredients))
        .await
        .map_err(|e| ApiError::generation(RECIPE_FAILED, e))?;

    let recipe = extract_json(&raw)?;
    info!(ingredients = ingredients.len(), "recipe generated");
    Ok(Json(recipe))
}

#[instrument(skip(state, body))]
pub async fn chatbot(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> ApiResult<Json<ChatResponse>> {
    let query = body
        .query
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("No query provided"))?;

    let response = state
        .ai
        .generate(&prompts::chat_prompt(query.trim()))
        .await
        .map_err(|e| ApiError::generation(CHAT_FAILED, e))?;

    Ok(Json(ChatResponse { response }))
}
