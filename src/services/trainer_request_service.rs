use std::collections::HashSet;

use sqlx::PgPool;
use validator::Validate;

use crate::auth::UserSession;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    CreateTrainerRequest, CreateWorkoutPlanRequest, CreatedWorkoutPlan, PendingTrainerRequest,
    PendingTrainerRequestRow, RequestStatus, TrainerListing, TrainerListingRow, TrainerRequest,
};
use crate::services::workout_plan_service::create_plan_in_tx;

const REQUEST_COLUMNS: &str = "id, usuario_id AS user_id, personal_id AS trainer_id, \
     dia_semana_id AS weekday_id, objetivo, descricao, estado, data_criacao AS created_at";

/// Plan requests sent by users to personal trainers
#[derive(Clone)]
pub struct TrainerRequestService {
    db: PgPool,
}

impl TrainerRequestService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn list_trainers(&self) -> ApiResult<Vec<TrainerListing>> {
        let rows = sqlx::query_as::<_, TrainerListingRow>(
            r#"
            SELECT p.id, p.especialidade, p.certificado, c.id AS account_id, c.nome, c.peso, c.altura
            FROM personaltrainers p
            JOIN contas c ON c.id = p.contaid
            ORDER BY c.nome
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        if rows.is_empty() {
            return Err(ApiError::not_found("No personal trainers found."));
        }

        Ok(rows.into_iter().map(TrainerListing::from).collect())
    }

    /// One pending request per requested weekday, all or nothing
    pub async fn create_requests(
        &self,
        account_id: i32,
        request: CreateTrainerRequest,
    ) -> ApiResult<Vec<TrainerRequest>> {
        request.validate()?;

        let user_id = sqlx::query_scalar::<_, i32>("SELECT id FROM usuarios WHERE contaid = $1")
            .bind(account_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| ApiError::not_found("User profile not found."))?;

        let trainer = sqlx::query_scalar::<_, i32>("SELECT id FROM personaltrainers WHERE id = $1")
            .bind(request.personal_id)
            .fetch_optional(&self.db)
            .await?;
        if trainer.is_none() {
            return Err(ApiError::not_found("Personal trainer not found."));
        }

        let weekdays = unique_weekdays(&request.weekdays);

        let known = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM diasdasemana WHERE id = ANY($1)")
            .bind(&weekdays)
            .fetch_one(&self.db)
            .await?;
        if known != weekdays.len() as i64 {
            return Err(ApiError::bad_request("One or more weekdays are invalid."));
        }

        let mut tx = self.db.begin().await?;
        let mut created = Vec::with_capacity(weekdays.len());

        for weekday_id in weekdays {
            let row = sqlx::query_as::<_, TrainerRequest>(&format!(
                "INSERT INTO solicitacaodeplanodetreino
                     (usuario_id, personal_id, dia_semana_id, objetivo, descricao, estado)
                 VALUES ($1, $2, $3, $4, $5, $6)
                 RETURNING {REQUEST_COLUMNS}"
            ))
            .bind(user_id)
            .bind(request.personal_id)
            .bind(weekday_id)
            .bind(&request.objetivo)
            .bind(&request.descricao)
            .bind(RequestStatus::Pending)
            .fetch_one(&mut *tx)
            .await?;

            created.push(row);
        }

        tx.commit().await?;

        tracing::info!(account_id, trainer_id = request.personal_id, count = created.len(), "Trainer requests created");
        Ok(created)
    }

    /// Pending requests addressed to the calling trainer
    pub async fn pending_for_trainer(&self, account_id: i32) -> ApiResult<Vec<PendingTrainerRequest>> {
        let trainer_id = self.trainer_profile_id(account_id).await?;

        let rows = sqlx::query_as::<_, PendingTrainerRequestRow>(
            r#"
            SELECT s.id, s.usuario_id AS user_id, s.personal_id AS trainer_id,
                   s.dia_semana_id AS weekday_id, s.objetivo, s.descricao, s.estado,
                   s.data_criacao AS created_at, u.objetivo AS user_goal,
                   c.id AS account_id, c.nome, c.peso, c.altura
            FROM solicitacaodeplanodetreino s
            JOIN usuarios u ON u.id = s.usuario_id
            JOIN contas c ON c.id = u.contaid
            WHERE s.personal_id = $1 AND s.estado = $2
            ORDER BY s.data_criacao, s.id
            "#,
        )
        .bind(trainer_id)
        .bind(RequestStatus::Pending)
        .fetch_all(&self.db)
        .await?;

        if rows.is_empty() {
            return Err(ApiError::not_found("No pending requests found."));
        }

        Ok(rows.into_iter().map(PendingTrainerRequest::from).collect())
    }

    /// Build the requested plan for the requester and complete the request in one transaction
    pub async fn respond(
        &self,
        session: &UserSession,
        request_id: i32,
        plan: CreateWorkoutPlanRequest,
    ) -> ApiResult<(TrainerRequest, CreatedWorkoutPlan)> {
        plan.validate()?;
        let trainer_id = self.trainer_profile_id(session.account_id).await?;

        let mut tx = self.db.begin().await?;

        let pending = sqlx::query_as::<_, TrainerRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM solicitacaodeplanodetreino
             WHERE id = $1 AND personal_id = $2 AND estado = $3
             FOR UPDATE"
        ))
        .bind(request_id)
        .bind(trainer_id)
        .bind(RequestStatus::Pending)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(pending_not_found)?;

        let requester_account = sqlx::query_scalar::<_, i32>("SELECT contaid FROM usuarios WHERE id = $1")
            .bind(pending.user_id)
            .fetch_one(&mut *tx)
            .await?;

        let created_plan = create_plan_in_tx(&mut tx, requester_account, session.account_id, &plan).await?;

        let completed = sqlx::query_as::<_, TrainerRequest>(&format!(
            "UPDATE solicitacaodeplanodetreino SET estado = $2 WHERE id = $1 RETURNING {REQUEST_COLUMNS}"
        ))
        .bind(request_id)
        .bind(RequestStatus::Completed)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(request_id, plan_id = created_plan.id, trainer_id, "Trainer request completed");
        Ok((completed, created_plan))
    }

    pub async fn reject(&self, session: &UserSession, request_id: i32) -> ApiResult<TrainerRequest> {
        let trainer_id = self.trainer_profile_id(session.account_id).await?;

        let cancelled = sqlx::query_as::<_, TrainerRequest>(&format!(
            "UPDATE solicitacaodeplanodetreino SET estado = $3
             WHERE id = $1 AND personal_id = $2 AND estado = $4
             RETURNING {REQUEST_COLUMNS}"
        ))
        .bind(request_id)
        .bind(trainer_id)
        .bind(RequestStatus::Cancelled)
        .bind(RequestStatus::Pending)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(pending_not_found)?;

        tracing::info!(request_id, trainer_id, "Trainer request rejected");
        Ok(cancelled)
    }

    async fn trainer_profile_id(&self, account_id: i32) -> ApiResult<i32> {
        sqlx::query_scalar::<_, i32>("SELECT id FROM personaltrainers WHERE contaid = $1")
            .bind(account_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| ApiError::not_found("Personal trainer profile not found."))
    }
}

fn pending_not_found() -> ApiError {
    ApiError::not_found("Pending request not found or not addressed to you.")
}

/// Deduplicate while keeping the caller's order
fn unique_weekdays(weekdays: &[i32]) -> Vec<i32> {
    let mut seen = HashSet::new();
    weekdays.iter().copied().filter(|day| seen.insert(*day)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_weekdays_keeps_order() {
        assert_eq!(unique_weekdays(&[3, 1, 3, 5, 1]), vec![3, 1, 5]);
        assert!(unique_weekdays(&[]).is_empty());
    }
}
