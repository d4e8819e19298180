use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::auth::{AccountType, AuthError, Claims, TokenUse, UserSession};

/// JWT token service for creating and validating tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expires_in: Duration,
    refresh_token_expires_in: Duration,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .field("access_token_expires_in", &self.access_token_expires_in)
            .field("refresh_token_expires_in", &self.refresh_token_expires_in)
            .finish()
    }
}

impl JwtService {
    /// Create a new JWT service with the given secret and a one hour access token
    pub fn new(secret: &str) -> Self {
        Self::with_expiry(secret, Duration::hours(1))
    }

    pub fn with_expiry(secret: &str, access_token_expires_in: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expires_in,
            refresh_token_expires_in: Duration::days(30),
        }
    }

    fn create_token(
        &self,
        account_id: i32,
        email: &str,
        account_type: AccountType,
        token_use: TokenUse,
        expires_in: Duration,
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + expires_in;

        let claims = Claims {
            sub: account_id.to_string(),
            email: email.to_string(),
            account_type,
            token_use,
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(AuthError::Jwt)
    }

    /// Create an access token for an account
    pub fn create_access_token(
        &self,
        account_id: i32,
        email: &str,
        account_type: AccountType,
    ) -> Result<String, AuthError> {
        self.create_token(
            account_id,
            email,
            account_type,
            TokenUse::Access,
            self.access_token_expires_in,
        )
    }

    /// Create a refresh token for an account
    pub fn create_refresh_token(
        &self,
        account_id: i32,
        email: &str,
        account_type: AccountType,
    ) -> Result<String, AuthError> {
        self.create_token(
            account_id,
            email,
            account_type,
            TokenUse::Refresh,
            self.refresh_token_expires_in,
        )
    }

    /// Validate and decode a token
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(|err| match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })
    }

    /// Validate a token and require it to be of the given kind
    pub fn validate_token_use(&self, token: &str, token_use: TokenUse) -> Result<Claims, AuthError> {
        let claims = self.validate_token(token)?;
        if claims.token_use != token_use {
            return Err(AuthError::InvalidToken);
        }
        Ok(claims)
    }

    /// Extract user session from an access token
    pub fn extract_user_session(&self, token: &str) -> Result<UserSession, AuthError> {
        let claims = self.validate_token_use(token, TokenUse::Access)?;
        UserSession::from_claims(&claims).map_err(|_| AuthError::InvalidToken)
    }

    pub fn access_token_expires_in_seconds(&self) -> usize {
        self.access_token_expires_in.num_seconds() as usize
    }

    /// Create token pair (access + refresh)
    pub fn create_token_pair(
        &self,
        account_id: i32,
        email: &str,
        account_type: AccountType,
    ) -> Result<(String, String), AuthError> {
        let access_token = self.create_access_token(account_id, email, account_type)?;
        let refresh_token = self.create_refresh_token(account_id, email, account_type)?;
        Ok((access_token, refresh_token))
    }
}

/// Extract bearer token from authorization header
pub fn extract_bearer_token(auth_header: &str) -> Result<&str, AuthError> {
    match auth_header.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(AuthError::InvalidAuthHeaderFormat),
    }
}
