//! Authentication service.
//!
//! Password registration and login on top of the accounts repository.
//! Hashing uses Argon2id.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;
use thiserror::Error;

use bloodlink_core::Email;

use crate::db::accounts::AccountRepository;
use crate::db::{NewBloodRequest, NewDonor, RepositoryError};
use crate::models::Account;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Errors that can occur during authentication.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Username/password pair did not match an account.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The requested username is already registered.
    #[error("username is already taken")]
    UsernameTaken,

    /// The password does not meet requirements.
    #[error("{0}")]
    WeakPassword(String),

    /// Hashing the password failed.
    #[error("password hashing failed")]
    PasswordHash,

    /// Underlying repository error.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Authentication service.
///
/// Handles registration (account plus role profile, atomically) and login.
pub struct AuthService<'a> {
    accounts: AccountRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            accounts: AccountRepository::new(pool),
        }
    }

    /// Register a donor: account and linked profile in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WeakPassword` if the password is too short,
    /// `AuthError::UsernameTaken` if the username is already registered.
    pub async fn register_donor(
        &self,
        username: &str,
        email: &Email,
        password: &str,
        profile: &NewDonor,
    ) -> Result<Account, AuthError> {
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        self.accounts
            .create_donor_account(username, email, &password_hash, profile)
            .await
            .map_err(taken_or_repository)
    }

    /// Register a requester: account and first blood request in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WeakPassword` if the password is too short,
    /// `AuthError::UsernameTaken` if the username is already registered.
    pub async fn register_requester(
        &self,
        username: &str,
        email: &Email,
        password: &str,
        request: &NewBloodRequest,
    ) -> Result<Account, AuthError> {
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        self.accounts
            .create_requester_account(username, email, &password_hash, request)
            .await
            .map_err(taken_or_repository)
    }

    /// Login with username and password.
    ///
    /// Role checking happens at the route layer; this only verifies the
    /// credential.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the pair is wrong.
    pub async fn login(&self, username: &str, password: &str) -> Result<Account, AuthError> {
        let (account, password_hash) = self
            .accounts
            .get_password_hash(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(account)
    }
}

fn taken_or_repository(e: RepositoryError) -> AuthError {
    match e {
        RepositoryError::Conflict(_) => AuthError::UsernameTaken,
        other => AuthError::Repository(other),
    }
}

/// Validate password meets requirements.
///
/// # Errors
///
/// Returns `AuthError::WeakPassword` if the password is too short.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` if the password does not match.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password_too_short() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
    }

    #[test]
    fn test_validate_password_ok() {
        assert!(validate_password("long enough").is_ok());
    }

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(matches!(
            verify_password("whatever", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
