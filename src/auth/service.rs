use chrono::Duration;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength, verify_password, PasswordPolicy};
use crate::auth::{
    Account, AccountRecord, AccountType, AuthError, JwtService, LoginRequest, LoginResponse,
    LoginUserInfo, MessageResponse, RefreshTokenRequest, RegisterAccountRequest,
    RegisterTrainerRequest, RegisterTrainerResponse, RegisterUserRequest, RegisterUserResponse,
    TokenResponse, TokenUse, TrainerProfile, UserProfile, UserSession,
};
use crate::error::is_unique_violation;

const ACCOUNT_RECORD_COLUMNS: &str = "id, nome AS name, email, senha AS password_hash, \
     tipo AS account_type, datadenascimento AS birth_date, peso AS weight, altura AS height, \
     datadecriacao AS created_at";

const ACCOUNT_COLUMNS: &str = "id, nome AS name, email, tipo AS account_type, \
     datadenascimento AS birth_date, peso AS weight, altura AS height, datadecriacao AS created_at";

#[derive(Debug, Clone)]
pub struct AuthService {
    jwt_service: JwtService,
    password_policy: PasswordPolicy,
    db: PgPool,
}

impl AuthService {
    pub fn new(db: PgPool, jwt_secret: &str) -> Self {
        Self::with_jwt_service(db, JwtService::new(jwt_secret))
    }

    pub fn with_token_lifetime(db: PgPool, jwt_secret: &str, access_token_expires_in: Duration) -> Self {
        Self::with_jwt_service(db, JwtService::with_expiry(jwt_secret, access_token_expires_in))
    }

    pub fn with_jwt_service(db: PgPool, jwt_service: JwtService) -> Self {
        Self {
            jwt_service,
            password_policy: PasswordPolicy::default(),
            db,
        }
    }

    /// Register a regular user: `contas` row plus `usuarios` profile
    pub async fn register_user(&self, request: RegisterUserRequest) -> Result<RegisterUserResponse, AuthError> {
        request.validate()?;
        let password_hash = self.prepare_registration(&request.account).await?;

        let mut tx = self.db.begin().await?;

        let conta = insert_account(&mut tx, &request.account, &password_hash, AccountType::User).await?;

        let usuario = sqlx::query_as::<_, UserProfile>(
            "INSERT INTO usuarios (contaid, objetivo) VALUES ($1, $2)
             RETURNING id, contaid AS account_id, objetivo AS goal",
        )
        .bind(conta.id)
        .bind(&request.goal)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(account_id = conta.id, "Registered user account");

        Ok(RegisterUserResponse {
            message: "User registered successfully!".to_string(),
            conta,
            usuario,
        })
    }

    /// Register a personal trainer: `contas` row plus `personaltrainers` profile
    pub async fn register_trainer(
        &self,
        request: RegisterTrainerRequest,
    ) -> Result<RegisterTrainerResponse, AuthError> {
        request.validate()?;
        let password_hash = self.prepare_registration(&request.account).await?;

        let mut tx = self.db.begin().await?;

        let conta = insert_account(
            &mut tx,
            &request.account,
            &password_hash,
            AccountType::PersonalTrainer,
        )
        .await?;

        let personal = sqlx::query_as::<_, TrainerProfile>(
            "INSERT INTO personaltrainers (contaid, especialidade, certificado) VALUES ($1, $2, $3)
             RETURNING id, contaid AS account_id, especialidade AS specialty, certificado AS certificate",
        )
        .bind(conta.id)
        .bind(&request.specialty)
        .bind(&request.certificate)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(account_id = conta.id, "Registered personal trainer account");

        Ok(RegisterTrainerResponse {
            message: "Personal trainer registered successfully!".to_string(),
            conta,
            personal,
        })
    }

    /// Login with email and password
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AuthError> {
        request.validate()?;

        let account = self
            .get_account_by_email(&request.email)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        if !verify_password(&request.password, &account.password_hash)? {
            tracing::debug!(account_id = account.id, "Login rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let (token, refresh_token) =
            self.jwt_service
                .create_token_pair(account.id, &account.email, account.account_type)?;

        self.store_refresh_token(account.id, &refresh_token).await?;

        tracing::info!(account_id = account.id, "Login succeeded");

        Ok(LoginResponse {
            message: "Login successful!".to_string(),
            token,
            refresh_token,
            expires_in: self.jwt_service.access_token_expires_in_seconds(),
            user: LoginUserInfo {
                id: account.id,
                name: account.name,
                email: account.email,
                account_type: account.account_type,
                altura: account.height,
            },
        })
    }

    /// Exchange a stored refresh token for a new access token
    pub async fn refresh_token(&self, request: RefreshTokenRequest) -> Result<TokenResponse, AuthError> {
        let claims = self
            .jwt_service
            .validate_token_use(&request.refresh_token, TokenUse::Refresh)?;
        let account_id: i32 = claims.sub.parse().map_err(|_| AuthError::InvalidToken)?;

        if !self.is_refresh_token_valid(account_id, &request.refresh_token).await? {
            return Err(AuthError::InvalidToken);
        }

        let token = self
            .jwt_service
            .create_access_token(account_id, &claims.email, claims.account_type)?;

        Ok(TokenResponse {
            token,
            expires_in: self.jwt_service.access_token_expires_in_seconds(),
        })
    }

    /// Logout revokes every refresh token of the caller
    pub async fn logout(&self, session: &UserSession) -> Result<MessageResponse, AuthError> {
        sqlx::query("UPDATE refresh_tokens SET revoked = TRUE WHERE contaid = $1 AND NOT revoked")
            .bind(session.account_id)
            .execute(&self.db)
            .await?;

        tracing::info!(account_id = session.account_id, "Logged out");

        Ok(MessageResponse::new("Successfully logged out"))
    }

    /// Validate user session from token
    pub fn validate_session(&self, token: &str) -> Result<UserSession, AuthError> {
        self.jwt_service.extract_user_session(token)
    }

    pub async fn get_account(&self, account_id: i32) -> Result<Account, AuthError> {
        let query = format!("SELECT {ACCOUNT_COLUMNS} FROM contas WHERE id = $1");

        sqlx::query_as::<_, Account>(&query)
            .bind(account_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or(AuthError::AccountNotFound)
    }

    // Private helper methods

    async fn prepare_registration(&self, account: &RegisterAccountRequest) -> Result<String, AuthError> {
        validate_password_strength(&account.password, &self.password_policy)
            .map_err(|e| AuthError::PasswordValidation(e.to_string()))?;

        if self.get_account_by_email(&account.email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }

        Ok(hash_password(&account.password)?)
    }

    async fn get_account_by_email(&self, email: &str) -> Result<Option<AccountRecord>, AuthError> {
        let query = format!(
            "SELECT {ACCOUNT_RECORD_COLUMNS} FROM contas WHERE LOWER(email) = LOWER($1)"
        );

        let account = sqlx::query_as::<_, AccountRecord>(&query)
            .bind(email.trim())
            .fetch_optional(&self.db)
            .await?;

        Ok(account)
    }

    async fn store_refresh_token(&self, account_id: i32, refresh_token: &str) -> Result<(), AuthError> {
        let claims = self.jwt_service.validate_token_use(refresh_token, TokenUse::Refresh)?;
        let expires_at =
            chrono::DateTime::from_timestamp(claims.exp as i64, 0).ok_or(AuthError::InvalidToken)?;

        sqlx::query(
            "INSERT INTO refresh_tokens (id, contaid, token_hash, expires_at)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(Uuid::new_v4())
        .bind(account_id)
        .bind(hash_token(refresh_token))
        .bind(expires_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn is_refresh_token_valid(&self, account_id: i32, refresh_token: &str) -> Result<bool, AuthError> {
        let result = sqlx::query(
            "SELECT 1 FROM refresh_tokens
             WHERE contaid = $1 AND token_hash = $2 AND expires_at > NOW() AND NOT revoked",
        )
        .bind(account_id)
        .bind(hash_token(refresh_token))
        .fetch_optional(&self.db)
        .await?;

        Ok(result.is_some())
    }
}

async fn insert_account(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    account: &RegisterAccountRequest,
    password_hash: &str,
    account_type: AccountType,
) -> Result<Account, AuthError> {
    let query = format!(
        "INSERT INTO contas (nome, email, senha, tipo, datadenascimento, peso, altura)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING {ACCOUNT_COLUMNS}"
    );

    sqlx::query_as::<_, Account>(&query)
        .bind(account.name.trim())
        .bind(account.email.trim())
        .bind(password_hash)
        .bind(account_type)
        .bind(account.birth_date)
        .bind(account.weight)
        .bind(account.height)
        .fetch_one(&mut **tx)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                AuthError::EmailAlreadyExists
            } else {
                AuthError::Database(err)
            }
        })
}

fn hash_token(token: &str) -> String {
    format!("{:x}", md5::compute(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_hash_is_stable_hex() {
        let first = hash_token("token");
        assert_eq!(first, hash_token("token"));
        assert_eq!(first.len(), 32);
        assert_ne!(first, hash_token("other"));
    }
}
