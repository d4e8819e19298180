use sqlx::PgPool;
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::models::{
    CreatePerformanceLog, CreateProgressLog, PerformanceLog, ProgressLog, UpdatePerformanceLog,
    UpdateProgressLog,
};

const PROGRESS_COLUMNS: &str =
    "id, contaid AS account_id, data AS date, pesoatual AS current_weight, imc AS bmi, performance";

const PERFORMANCE_COLUMNS: &str = "id, contaid AS account_id, data AS date, \
     pesolevantado AS weight_lifted, repeticoes AS repetitions, observacoes AS notes";

/// Body-weight progress and lifting performance logs
#[derive(Clone)]
pub struct ProgressService {
    db: PgPool,
}

impl ProgressService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn create_progress(&self, account_id: i32, request: CreateProgressLog) -> ApiResult<ProgressLog> {
        request.validate()?;

        let log = sqlx::query_as::<_, ProgressLog>(&format!(
            "INSERT INTO progresso (contaid, data, pesoatual, imc, performance)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {PROGRESS_COLUMNS}"
        ))
        .bind(account_id)
        .bind(request.date)
        .bind(request.current_weight)
        .bind(request.imc)
        .bind(request.performance)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(account_id, progress_id = log.id, "Progress log created");
        Ok(log)
    }

    pub async fn list_progress(&self, account_id: i32) -> ApiResult<Vec<ProgressLog>> {
        let logs = sqlx::query_as::<_, ProgressLog>(&format!(
            "SELECT {PROGRESS_COLUMNS} FROM progresso WHERE contaid = $1 ORDER BY data DESC, id DESC"
        ))
        .bind(account_id)
        .fetch_all(&self.db)
        .await?;

        Ok(logs)
    }

    /// Partial update; absent fields keep their stored value
    pub async fn update_progress(
        &self,
        account_id: i32,
        progress_id: i32,
        request: UpdateProgressLog,
    ) -> ApiResult<ProgressLog> {
        request.validate()?;
        self.ensure_progress_owner(account_id, progress_id).await?;

        let log = sqlx::query_as::<_, ProgressLog>(&format!(
            "UPDATE progresso
             SET pesoatual = COALESCE($2, pesoatual),
                 imc = COALESCE($3, imc),
                 performance = COALESCE($4, performance)
             WHERE id = $1 AND contaid = $5
             RETURNING {PROGRESS_COLUMNS}"
        ))
        .bind(progress_id)
        .bind(request.current_weight)
        .bind(request.imc)
        .bind(request.performance)
        .bind(account_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Progress log not found."))?;

        Ok(log)
    }

    pub async fn delete_progress(&self, account_id: i32, progress_id: i32) -> ApiResult<()> {
        self.ensure_progress_owner(account_id, progress_id).await?;

        sqlx::query("DELETE FROM progresso WHERE id = $1 AND contaid = $2")
            .bind(progress_id)
            .bind(account_id)
            .execute(&self.db)
            .await?;

        tracing::info!(account_id, progress_id, "Progress log deleted");
        Ok(())
    }

    async fn ensure_progress_owner(&self, account_id: i32, progress_id: i32) -> ApiResult<()> {
        let owner = sqlx::query_scalar::<_, i32>("SELECT contaid FROM progresso WHERE id = $1")
            .bind(progress_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| ApiError::not_found("Progress log not found."))?;

        ensure_owner(owner, account_id, "progress log")
    }

    pub async fn create_performance_log(
        &self,
        account_id: i32,
        request: CreatePerformanceLog,
    ) -> ApiResult<PerformanceLog> {
        request.validate()?;

        let log = sqlx::query_as::<_, PerformanceLog>(&format!(
            "INSERT INTO performancelogs (contaid, data, pesolevantado, repeticoes, observacoes)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {PERFORMANCE_COLUMNS}"
        ))
        .bind(account_id)
        .bind(request.date)
        .bind(request.weight_lifted)
        .bind(request.repetitions)
        .bind(request.notes)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(account_id, log_id = log.id, "Performance log created");
        Ok(log)
    }

    pub async fn list_performance_logs(&self, account_id: i32) -> ApiResult<Vec<PerformanceLog>> {
        let logs = sqlx::query_as::<_, PerformanceLog>(&format!(
            "SELECT {PERFORMANCE_COLUMNS} FROM performancelogs WHERE contaid = $1 ORDER BY data DESC, id DESC"
        ))
        .bind(account_id)
        .fetch_all(&self.db)
        .await?;

        Ok(logs)
    }

    pub async fn update_performance_log(
        &self,
        account_id: i32,
        log_id: i32,
        request: UpdatePerformanceLog,
    ) -> ApiResult<PerformanceLog> {
        request.validate()?;
        self.ensure_performance_owner(account_id, log_id).await?;

        let log = sqlx::query_as::<_, PerformanceLog>(&format!(
            "UPDATE performancelogs
             SET pesolevantado = COALESCE($2, pesolevantado),
                 repeticoes = COALESCE($3, repeticoes),
                 observacoes = COALESCE($4, observacoes)
             WHERE id = $1 AND contaid = $5
             RETURNING {PERFORMANCE_COLUMNS}"
        ))
        .bind(log_id)
        .bind(request.weight_lifted)
        .bind(request.repetitions)
        .bind(request.notes)
        .bind(account_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Performance log not found."))?;

        Ok(log)
    }

    pub async fn delete_performance_log(&self, account_id: i32, log_id: i32) -> ApiResult<()> {
        self.ensure_performance_owner(account_id, log_id).await?;

        sqlx::query("DELETE FROM performancelogs WHERE id = $1 AND contaid = $2")
            .bind(log_id)
            .bind(account_id)
            .execute(&self.db)
            .await?;

        tracing::info!(account_id, log_id, "Performance log deleted");
        Ok(())
    }

    async fn ensure_performance_owner(&self, account_id: i32, log_id: i32) -> ApiResult<()> {
        let owner = sqlx::query_scalar::<_, i32>("SELECT contaid FROM performancelogs WHERE id = $1")
            .bind(log_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| ApiError::not_found("Performance log not found."))?;

        ensure_owner(owner, account_id, "performance log")
    }
}

fn ensure_owner(owner_id: i32, account_id: i32, resource: &str) -> ApiResult<()> {
    if owner_id != account_id {
        tracing::warn!(account_id, owner_id, resource, "Rejected access to another account's record");
        return Err(ApiError::forbidden(format!(
            "You do not have permission to modify this {resource}."
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_ensure_owner() {
        assert!(ensure_owner(7, 7, "progress log").is_ok());
        assert_matches!(ensure_owner(7, 8, "progress log"), Err(ApiError::Forbidden(message)) if message.contains("progress log"));
    }
}
