use bcrypt::{hash, verify};
use thiserror::Error;

/// Matches the cost used by the accounts already stored in `contas.senha`
pub const BCRYPT_COST: u32 = 10;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Password must be at least {0} characters long")]
    TooShort(usize),
    #[error("Password must be no more than {0} characters long")]
    TooLong(usize),
    #[error("Failed to hash password")]
    HashingFailed,
    #[error("Failed to verify password")]
    VerificationFailed,
}

/// Password strength requirements
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub max_length: usize,
}

impl Default for PasswordPolicy {
    /// The mobile client only enforces a minimum length, so the server does the same.
    fn default() -> Self {
        Self {
            min_length: 6,
            max_length: 72, // bcrypt ignores anything past 72 bytes
        }
    }
}

/// Validate password strength according to policy
pub fn validate_password_strength(password: &str, policy: &PasswordPolicy) -> Result<(), PasswordError> {
    if password.len() < policy.min_length {
        return Err(PasswordError::TooShort(policy.min_length));
    }

    if password.len() > policy.max_length {
        return Err(PasswordError::TooLong(policy.max_length));
    }

    Ok(())
}

/// Hash a password using bcrypt. Callers validate strength first.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    hash(password, BCRYPT_COST).map_err(|_| PasswordError::HashingFailed)
}

/// Verify a password against its hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    verify(password, hash).map_err(|_| PasswordError::VerificationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_default_policy() {
        let policy = PasswordPolicy::default();

        assert_matches!(
            validate_password_strength("abc", &policy),
            Err(PasswordError::TooShort(6))
        );
        assert!(validate_password_strength("senha123", &policy).is_ok());
        assert_matches!(
            validate_password_strength(&"a".repeat(73), &policy),
            Err(PasswordError::TooLong(72))
        );
    }

    #[test]
    fn test_password_hashing() {
        let password = "senha123";
        let hash = hash_password(password).unwrap();

        assert!(hash.starts_with("$2"));
        assert!(verify_password(password, &hash).unwrap());
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_verify_against_malformed_hash() {
        assert_matches!(
            verify_password("senha123", "not-a-bcrypt-hash"),
            Err(PasswordError::VerificationFailed)
        );
    }
}
