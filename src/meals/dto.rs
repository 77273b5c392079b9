use serde::Deserialize;

/// Body of `POST /api/log-meal`. Everything is optional; gaps are defaulted.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogMealRequest {
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub meal_type: Option<String>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fats: Option<f64>,
    pub date: Option<String>,
}
