use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::dto::LogMealRequest;
use crate::store::{default_user_id, Record};

pub const DEFAULT_MEAL_TYPE: &str = "other";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MealRecord {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub meal_type: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub date: String,
}

impl MealRecord {
    /// Fills every missing field and stamps a fresh id.
    pub fn from_request(req: LogMealRequest, now: impl FnOnce() -> String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: req.user_id.unwrap_or_else(default_user_id),
            name: req.name.unwrap_or_default(),
            description: req.description.unwrap_or_default(),
            meal_type: req.meal_type.unwrap_or_else(|| DEFAULT_MEAL_TYPE.into()),
            calories: req.calories.unwrap_or_default(),
            protein: req.protein.unwrap_or_default(),
            carbs: req.carbs.unwrap_or_default(),
            fats: req.fats.unwrap_or_default(),
            date: req.date.unwrap_or_else(now),
        }
    }
}

impl Record for MealRecord {
    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn date(&self) -> &str {
        &self.date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_and_calories_only() {
        let req: LogMealRequest =
            serde_json::from_str(r#"{"name": "Oatmeal", "calories": 350}"#).unwrap();
        let meal = MealRecord::from_request(req, || "2024-05-01T07:30:00Z".into());

        assert_eq!(meal.user_id, "default_user");
        assert_eq!(meal.name, "Oatmeal");
        assert_eq!(meal.description, "");
        assert_eq!(meal.meal_type, "other");
        assert_eq!(meal.calories, 350.0);
        assert_eq!(meal.protein, 0.0);
        assert_eq!(meal.carbs, 0.0);
        assert_eq!(meal.fats, 0.0);
        assert_eq!(meal.date, "2024-05-01T07:30:00Z");
    }

    #[test]
    fn supplied_date_wins_and_ids_differ() {
        let a = MealRecord::from_request(
            LogMealRequest {
                date: Some("2024-01-01T00:00:00Z".into()),
                ..Default::default()
            },
            || unreachable!(),
        );
        let b = MealRecord::from_request(LogMealRequest::default(), || "now".into());
        assert_eq!(a.date, "2024-01-01T00:00:00Z");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn serializes_camel_case() {
        let meal = MealRecord::from_request(
            LogMealRequest {
                user_id: Some("u1".into()),
                meal_type: Some("lunch".into()),
                ..Default::default()
            },
            || "2024-01-01".into(),
        );
        let json = serde_json::to_value(&meal).unwrap();
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["mealType"], "lunch");
        assert!(json["id"].is_string());
    }

    #[test]
    fn null_numbers_fall_back_to_zero() {
        let req: LogMealRequest =
            serde_json::from_str(r#"{"calories": null, "protein": 12.5}"#).unwrap();
        let meal = MealRecord::from_request(req, || "now".into());
        assert_eq!(meal.calories, 0.0);
        assert_eq!(meal.protein, 12.5);
    }
}
