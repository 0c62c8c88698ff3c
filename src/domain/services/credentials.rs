use crate::domain::models::user::{normalize_email, User};
use crate::domain::ports::UserRepository;
use crate::error::AppError;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::{debug, error};

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!("Password hashing failed: {}", e);
            AppError::Internal
        })
}

pub fn verify_password(password: &str, digest: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(digest).map_err(|_| AppError::Internal)?;
    Ok(Argon2::default().verify_password(password.as_bytes(), &parsed_hash).is_ok())
}

/// Looks the user up by email and checks the password. An unknown email and a
/// wrong password are indistinguishable to the caller.
pub async fn verify_credentials(
    users: &dyn UserRepository,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    let email = normalize_email(email);
    let user = users.find_by_email(&email).await?.ok_or_else(|| {
        debug!("Login attempt for unknown email");
        AppError::InvalidCredentials
    })?;

    if !verify_password(password, &user.password_hash)? {
        debug!("Login attempt with wrong password for user {}", user.id);
        return Err(AppError::InvalidCredentials);
    }

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_verifies_only_the_original_password() {
        let digest = hash_password("password").unwrap();
        assert_ne!(digest, "password");
        assert!(verify_password("password", &digest).unwrap());
        assert!(!verify_password("Password", &digest).unwrap());
    }

    #[test]
    fn test_corrupt_digest_is_internal_error() {
        assert!(matches!(verify_password("password", "not-a-phc-string"), Err(AppError::Internal)));
    }
}
