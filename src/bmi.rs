//! Local BMI calculation; no AI involved.

use axum::{routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Default, Deserialize)]
pub struct BmiRequest {
    /// Kilograms.
    pub weight: Option<f64>,
    /// Centimetres.
    pub height: Option<f64>,
    pub age: Option<f64>,
    pub gender: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn classify(bmi: f64) -> Self {
        if bmi < 18.5 {
            Self::Underweight
        } else if bmi < 25.0 {
            Self::Normal
        } else if bmi < 30.0 {
            Self::Overweight
        } else {
            Self::Obese
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Underweight => "Underweight",
            Self::Normal => "Normal weight",
            Self::Overweight => "Overweight",
            Self::Obese => "Obese",
        }
    }

    pub fn risk(self) -> &'static str {
        match self {
            Self::Underweight => "Increased risk of nutritional deficiency and osteoporosis",
            Self::Normal => "Low risk",
            Self::Overweight => "Moderately increased risk of heart disease and type 2 diabetes",
            Self::Obese => "High risk of heart disease, type 2 diabetes and hypertension",
        }
    }

    pub fn advice(self) -> &'static str {
        match self {
            Self::Underweight => {
                "Add nutrient-dense meals and strength training; consider talking to a dietitian."
            }
            Self::Normal => "Keep up a balanced diet and regular physical activity.",
            Self::Overweight => {
                "Aim for a modest calorie deficit and at least 150 minutes of activity per week."
            }
            Self::Obese => {
                "Consult a healthcare provider for a supervised plan combining diet and exercise."
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BmiResponse {
    pub bmi: f64,
    pub category: &'static str,
    pub risk: &'static str,
    pub advice: &'static str,
}

/// `weight_kg / height_m²`, rounded to one decimal.
pub fn compute_bmi(weight_kg: f64, height_cm: f64) -> Option<f64> {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if !valid(weight_kg) || !valid(height_cm) {
        return None;
    }
    let height_m = height_cm / 100.0;
    let bmi = weight_kg / (height_m * height_m);
    Some((bmi * 10.0).round() / 10.0)
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/calculate-bmi", post(calculate_bmi))
}

#[instrument(skip(body))]
pub async fn calculate_bmi(Json(body): Json<BmiRequest>) -> ApiResult<Json<BmiResponse>> {
    let bmi = match (body.weight, body.height) {
        (Some(w), Some(h)) => compute_bmi(w, h),
        _ => None,
    }
    .ok_or_else(|| ApiError::bad_request("Weight and height must be positive numbers"))?;

    let category = BmiCategory::classify(bmi);
    tracing::debug!(bmi, category = category.label(), age = ?body.age, gender = ?body.gender, "bmi computed");
    Ok(Json(BmiResponse {
        bmi,
        category: category.label(),
        risk: category.risk(),
        advice: category.advice(),
    }))
}
