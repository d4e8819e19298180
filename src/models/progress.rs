use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProgressLog {
    pub id: i32,
    #[serde(rename = "ContaId")]
    pub account_id: i32,
    #[serde(rename = "Data")]
    pub date: NaiveDate,
    #[serde(rename = "PesoAtual")]
    pub current_weight: f64,
    #[serde(rename = "IMC")]
    pub bmi: f64,
    #[serde(rename = "Performance")]
    pub performance: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PerformanceLog {
    pub id: i32,
    #[serde(rename = "ContaId")]
    pub account_id: i32,
    #[serde(rename = "Data")]
    pub date: NaiveDate,
    #[serde(rename = "PesoLevantado")]
    pub weight_lifted: f64,
    #[serde(rename = "Repeticoes")]
    pub repetitions: i32,
    #[serde(rename = "Observacoes")]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProgressLog {
    #[serde(rename = "data")]
    pub date: NaiveDate,
    #[serde(rename = "pesoAtual")]
    #[validate(range(min = 0.0, max = 1000.0, message = "pesoAtual must be between 0 and 1000"))]
    pub current_weight: f64,
    #[validate(range(min = 0.0, max = 200.0, message = "imc must be between 0 and 200"))]
    pub imc: f64,
    #[validate(length(max = 255))]
    pub performance: Option<String>,
}

/// Partial update; absent fields keep their stored value
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProgressLog {
    #[serde(rename = "pesoAtual")]
    #[validate(range(min = 0.0, max = 1000.0, message = "pesoAtual must be between 0 and 1000"))]
    pub current_weight: Option<f64>,
    #[validate(range(min = 0.0, max = 200.0, message = "imc must be between 0 and 200"))]
    pub imc: Option<f64>,
    #[validate(length(max = 255))]
    pub performance: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePerformanceLog {
    #[serde(rename = "data")]
    pub date: NaiveDate,
    #[serde(rename = "pesoLevantado")]
    #[validate(range(min = 0.0, message = "pesoLevantado must be zero or positive"))]
    pub weight_lifted: f64,
    #[serde(rename = "repeticoes")]
    #[validate(range(min = 0, message = "repeticoes must be zero or positive"))]
    pub repetitions: i32,
    #[serde(rename = "observacoes")]
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePerformanceLog {
    #[serde(rename = "pesoLevantado")]
    #[validate(range(min = 0.0, message = "pesoLevantado must be zero or positive"))]
    pub weight_lifted: Option<f64>,
    #[serde(rename = "repeticoes")]
    #[validate(range(min = 0, message = "repeticoes must be zero or positive"))]
    pub repetitions: Option<i32>,
    #[serde(rename = "observacoes")]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProgressLogResponse {
    pub message: String,
    pub progresso: ProgressLog,
}

#[derive(Debug, Serialize)]
pub struct PerformanceLogResponse {
    pub message: String,
    pub log: PerformanceLog,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_progress_ignores_unknown_fields() {
        let request: CreateProgressLog = serde_json::from_value(json!({
            "data": "2025-01-12",
            "pesoAtual": 100.5,
            "imc": 66.6,
            "performance": "FACIL",
            "treinosConcluidos": 66
        }))
        .unwrap();

        assert_eq!(request.current_weight, 100.5);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_partial_update_parses() {
        let request: UpdateProgressLog =
            serde_json::from_value(json!({ "performance": "LEGAL" })).unwrap();

        assert!(request.current_weight.is_none());
        assert_eq!(request.performance.as_deref(), Some("LEGAL"));
    }

    #[test]
    fn test_performance_log_rejects_negative_reps() {
        let request: CreatePerformanceLog = serde_json::from_value(json!({
            "data": "2025-01-12",
            "pesoLevantado": 50,
            "repeticoes": -1
        }))
        .unwrap();

        assert!(request.validate().is_err());
    }

    #[test]
    fn test_progress_wire_names() {
        let log = ProgressLog {
            id: 3,
            account_id: 9,
            date: NaiveDate::from_ymd_opt(2025, 1, 12).unwrap(),
            current_weight: 80.0,
            bmi: 24.1,
            performance: None,
        };

        let value = serde_json::to_value(log).unwrap();
        assert_eq!(value["ContaId"], 9);
        assert_eq!(value["PesoAtual"], 80.0);
        assert_eq!(value["Data"], "2025-01-12");
    }
}
