use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Profile used to build a weekly diet and workout plan.
///
/// Scalars are kept as raw JSON so whatever the client sends (number or
/// string) is echoed into the prompt verbatim.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub age: Option<Value>,
    pub gender: Option<Value>,
    pub weight: Option<Value>,
    pub height: Option<Value>,
    pub activity_level: Option<Value>,
    pub goals: Option<Value>,
    pub dietary_restrictions: Option<Vec<String>>,
    pub health_conditions: Option<Vec<String>>,
    pub workout_preferences: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FoodImageRequest {
    pub image: Option<String>,
}

/// The web client also posts its own `prompt`; it is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct RecipeRequest {
    pub ingredients: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}
