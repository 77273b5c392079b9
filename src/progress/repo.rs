use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::dto::LogProgressRequest;
use crate::store::{default_user_id, Record};

/// One progress snapshot. Metrics the client left out stay absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub id: Uuid,
    pub user_id: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_fat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fats: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workout_minutes: Option<f64>,
}

impl ProgressRecord {
    pub fn from_request(req: LogProgressRequest, now: impl FnOnce() -> String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: req.user_id.unwrap_or_else(default_user_id),
            date: req.date.unwrap_or_else(now),
            weight: req.weight,
            body_fat: req.body_fat,
            calories: req.calories,
            protein: req.protein,
            carbs: req.carbs,
            fats: req.fats,
            steps: req.steps,
            workout_minutes: req.workout_minutes,
        }
    }
}

impl Record for ProgressRecord {
    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn date(&self) -> &str {
        &self.date
    }
}
