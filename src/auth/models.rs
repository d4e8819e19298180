use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Account types stored in `contas.tipo`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "tipo_conta")]
pub enum AccountType {
    #[serde(rename = "Usuario")]
    #[sqlx(rename = "Usuario")]
    User,
    PersonalTrainer,
}

impl AccountType {
    pub fn is_trainer(&self) -> bool {
        matches!(self, AccountType::PersonalTrainer)
    }
}

/// What a signed token may be used for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenUse {
    Access,
    Refresh,
}

/// JWT token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // Subject (account id)
    pub email: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub token_use: TokenUse,
    pub exp: usize,
    pub iat: usize,
    pub jti: String,        // JWT ID
}

/// Account row as stored in `contas`, including the password hash
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AccountRecord {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub account_type: AccountType,
    pub birth_date: NaiveDate,
    pub weight: f64,
    pub height: f64,
    pub created_at: DateTime<Utc>,
}

/// Public view of an account; never carries the password hash
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Account {
    pub id: i32,
    #[serde(rename = "Nome")]
    pub name: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Tipo")]
    pub account_type: AccountType,
    #[serde(rename = "DataDeNascimento")]
    pub birth_date: NaiveDate,
    #[serde(rename = "Peso")]
    pub weight: f64,
    #[serde(rename = "Altura")]
    pub height: f64,
    #[serde(rename = "DataDeCriacao")]
    pub created_at: DateTime<Utc>,
}

impl From<AccountRecord> for Account {
    fn from(record: AccountRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            email: record.email,
            account_type: record.account_type,
            birth_date: record.birth_date,
            weight: record.weight,
            height: record.height,
            created_at: record.created_at,
        }
    }
}

/// Regular user profile (`usuarios`)
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct UserProfile {
    pub id: i32,
    #[serde(rename = "contaid")]
    pub account_id: i32,
    #[serde(rename = "objetivo")]
    pub goal: Option<String>,
}

/// Personal trainer profile (`personaltrainers`)
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TrainerProfile {
    pub id: i32,
    #[serde(rename = "contaid")]
    pub account_id: i32,
    #[serde(rename = "especialidade")]
    pub specialty: Option<String>,
    #[serde(rename = "certificado")]
    pub certificate: Option<String>,
}

/// Fields shared by both registration forms
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterAccountRequest {
    #[serde(rename = "nome")]
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"), length(max = 255))]
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
    #[serde(rename = "datadenascimento")]
    pub birth_date: NaiveDate,
    #[serde(rename = "peso")]
    #[validate(range(min = 0.0, max = 1000.0, message = "Weight must be between 0 and 1000"))]
    pub weight: f64,
    #[serde(rename = "altura")]
    #[validate(range(min = 0.0, max = 3.5, message = "Height must be between 0 and 3.5"))]
    pub height: f64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterUserRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub account: RegisterAccountRequest,
    #[serde(rename = "objetivo")]
    #[validate(length(max = 255))]
    pub goal: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterTrainerRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub account: RegisterAccountRequest,
    #[serde(rename = "especialidade")]
    #[validate(length(max = 255))]
    pub specialty: Option<String>,
    #[serde(rename = "certificado")]
    #[validate(length(max = 255))]
    pub certificate: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[serde(rename = "senha", alias = "password")]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    #[serde(rename = "refreshToken", alias = "refresh_token")]
    pub refresh_token: String,
}

/// Authentication response models
#[derive(Debug, Serialize)]
pub struct RegisterUserResponse {
    pub message: String,
    pub conta: Account,
    pub usuario: UserProfile,
}

#[derive(Debug, Serialize)]
pub struct RegisterTrainerResponse {
    pub message: String,
    pub conta: Account,
    pub personal: TrainerProfile,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
    #[serde(rename = "expiresIn")]
    pub expires_in: usize,
    pub user: LoginUserInfo,
}

#[derive(Debug, Serialize)]
pub struct LoginUserInfo {
    pub id: i32,
    pub name: String,
    pub email: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub altura: f64,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    #[serde(rename = "expiresIn")]
    pub expires_in: usize,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Authenticated caller, inserted into request extensions by the JWT middleware
#[derive(Debug, Clone)]
pub struct UserSession {
    pub account_id: i32,
    pub email: String,
    pub account_type: AccountType,
}

impl UserSession {
    pub fn from_claims(claims: &Claims) -> Result<Self, std::num::ParseIntError> {
        Ok(Self {
            account_id: claims.sub.parse()?,
            email: claims.email.clone(),
            account_type: claims.account_type,
        })
    }

    pub fn is_trainer(&self) -> bool {
        self.account_type.is_trainer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_account_type_wire_names() {
        assert_eq!(serde_json::to_value(AccountType::User).unwrap(), json!("Usuario"));
        assert_eq!(
            serde_json::to_value(AccountType::PersonalTrainer).unwrap(),
            json!("PersonalTrainer")
        );
        assert!(serde_json::from_value::<AccountType>(json!("admin")).is_err());
    }

    #[test]
    fn test_register_user_request_parses_client_payload() {
        let payload = json!({
            "nome": "Maria",
            "email": "maria@example.com",
            "senha": "senha123",
            "datadenascimento": "2001-07-22",
            "peso": 80,
            "altura": 1.77,
            "objetivo": "Hipertrofia"
        });

        let request: RegisterUserRequest = serde_json::from_value(payload).unwrap();
        assert_eq!(request.account.name, "Maria");
        assert_eq!(request.account.weight, 80.0);
        assert_eq!(request.goal.as_deref(), Some("Hipertrofia"));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_register_request_rejects_bad_email() {
        let payload = json!({
            "nome": "Maria",
            "email": "not-an-email",
            "senha": "senha123",
            "datadenascimento": "2001-07-22",
            "peso": 80,
            "altura": 1.77
        });

        let request: RegisterTrainerRequest = serde_json::from_value(payload).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_login_accepts_password_alias() {
        let request: LoginRequest =
            serde_json::from_value(json!({"email": "a@b.com", "password": "x"})).unwrap();
        assert_eq!(request.password, "x");

        let request: LoginRequest =
            serde_json::from_value(json!({"email": "a@b.com", "senha": "y"})).unwrap();
        assert_eq!(request.password, "y");
    }

    #[test]
    fn test_account_serialization_hides_password() {
        let record = AccountRecord {
            id: 1,
            name: "Maria".to_string(),
            email: "maria@example.com".to_string(),
            password_hash: "$2b$10$hash".to_string(),
            account_type: AccountType::User,
            birth_date: NaiveDate::from_ymd_opt(2001, 7, 22).unwrap(),
            weight: 80.0,
            height: 1.77,
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(Account::from(record)).unwrap();
        assert_eq!(value["Email"], "maria@example.com");
        assert_eq!(value["Tipo"], "Usuario");
        assert!(value.get("Senha").is_none());
        assert!(value.get("password_hash").is_none());
    }
}
