use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Food catalog entry; nutrients are per 100 g
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Food {
    pub id: i32,
    #[serde(rename = "nome_alimento")]
    pub name: String,
    #[serde(rename = "tipo_id")]
    pub meal_type_id: i32,
    #[serde(rename = "calorias")]
    pub calories: i32,
    #[serde(rename = "proteinas")]
    pub proteins: i32,
    #[serde(rename = "gorduras")]
    pub fats: i32,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MealType {
    pub id: i32,
    #[serde(rename = "tipo_nome")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CalorieGoal {
    pub id: i32,
    #[serde(rename = "ContaId")]
    pub account_id: i32,
    pub meta_calorias: i32,
    pub data_registro: NaiveDate,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MealEntry {
    pub id: i32,
    #[serde(rename = "contaid")]
    pub account_id: i32,
    pub data_registro: NaiveDate,
    pub tipo_id: i32,
    pub alimento_id: i32,
    pub quantidade_gramas: f64,
}

/// Food columns embedded in meal listings
#[derive(Debug, Clone, Serialize)]
pub struct MealFood {
    pub nome_alimento: String,
    pub calorias: i32,
    pub proteinas: i32,
    pub gorduras: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct MealEntryWithFood {
    #[serde(flatten)]
    pub entry: MealEntry,
    pub alimento: MealFood,
}

/// Flat row produced by the meal/food join
#[derive(Debug, Clone, FromRow)]
pub struct MealEntryFoodRow {
    pub id: i32,
    pub account_id: i32,
    pub data_registro: NaiveDate,
    pub tipo_id: i32,
    pub alimento_id: i32,
    pub quantidade_gramas: f64,
    pub nome_alimento: String,
    pub calorias: i32,
    pub proteinas: i32,
    pub gorduras: i32,
}

impl From<MealEntryFoodRow> for MealEntryWithFood {
    fn from(row: MealEntryFoodRow) -> Self {
        Self {
            entry: MealEntry {
                id: row.id,
                account_id: row.account_id,
                data_registro: row.data_registro,
                tipo_id: row.tipo_id,
                alimento_id: row.alimento_id,
                quantidade_gramas: row.quantidade_gramas,
            },
            alimento: MealFood {
                nome_alimento: row.nome_alimento,
                calorias: row.calorias,
                proteinas: row.proteinas,
                gorduras: row.gorduras,
            },
        }
    }
}

/// Nutrient totals for a day: Σ(nutrient × grams / 100)
#[derive(Debug, Clone, Default, PartialEq, Serialize, FromRow)]
pub struct NutrientTotals {
    pub calorias: f64,
    pub proteinas: f64,
    pub gorduras: f64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SetCalorieGoalRequest {
    #[validate(range(min = 0, message = "meta_calorias must be zero or positive"))]
    pub meta_calorias: i32,
    pub data_registro: NaiveDate,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LogMealRequest {
    #[validate(required(message = "All fields are required."))]
    pub data_registro: Option<NaiveDate>,
    #[validate(required(message = "All fields are required."))]
    pub tipo_id: Option<i32>,
    #[validate(required(message = "All fields are required."))]
    pub alimento_id: Option<i32>,
    #[validate(
        required(message = "All fields are required."),
        range(min = 0.1, max = 9999.99, message = "quantidade_gramas must be between 0.1 and 9999.99")
    )]
    pub quantidade_gramas: Option<f64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMealRequest {
    #[validate(
        required(message = "quantidade_gramas was not provided."),
        range(min = 0.1, max = 9999.99, message = "quantidade_gramas must be between 0.1 and 9999.99")
    )]
    pub quantidade_gramas: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub data_registro: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct DailySummary {
    pub data_registro: NaiveDate,
    pub resumo: NutrientTotals,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_calorias: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calorias_restantes: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl DailySummary {
    pub fn new(data_registro: NaiveDate, resumo: NutrientTotals, goal: Option<i32>) -> Self {
        let calorias_restantes = goal.map(|meta| f64::from(meta) - resumo.calorias);
        Self {
            data_registro,
            resumo,
            meta_calorias: goal,
            calorias_restantes,
            message: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(grams: f64, calories: i32, proteins: i32, fats: i32) -> MealEntryWithFood {
        MealEntryWithFood {
            entry: MealEntry {
                id: 1,
                account_id: 1,
                data_registro: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
                tipo_id: 1,
                alimento_id: 1,
                quantidade_gramas: grams,
            },
            alimento: MealFood {
                nome_alimento: "Arroz".to_string(),
                calorias: calories,
                proteinas: proteins,
                gorduras: fats,
            },
        }
    }

    #[test]
    fn test_log_meal_requires_every_field() {
        let request: LogMealRequest = serde_json::from_value(json!({
            "data_registro": "2025-01-15",
            "tipo_id": 1,
            "alimento_id": 1
        }))
        .unwrap();
        assert!(request.validate().is_err());

        let request: LogMealRequest = serde_json::from_value(json!({
            "data_registro": "2025-01-15",
            "tipo_id": 1,
            "alimento_id": 1,
            "quantidade_gramas": 222
        }))
        .unwrap();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_update_meal_rejects_tiny_quantity() {
        let request = UpdateMealRequest { quantidade_gramas: Some(0.05) };
        assert!(request.validate().is_err());

        let request = UpdateMealRequest { quantidade_gramas: Some(5555.66) };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_summary_remaining_calories() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let totals = NutrientTotals { calorias: 1500.0, proteinas: 80.0, gorduras: 40.0 };

        let summary = DailySummary::new(date, totals.clone(), Some(2000));
        assert_eq!(summary.calorias_restantes, Some(500.0));

        let value = serde_json::to_value(DailySummary::new(date, totals, None)).unwrap();
        assert!(value.get("meta_calorias").is_none());
        assert_eq!(value["resumo"]["calorias"], 1500.0);
    }

    #[test]
    fn test_meal_listing_embeds_food() {
        let value = serde_json::to_value(entry(100.0, 130, 3, 1)).unwrap();
        assert_eq!(value["contaid"], 1);
        assert_eq!(value["alimento"]["nome_alimento"], "Arroz");
    }
}
