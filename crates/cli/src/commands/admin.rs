//! Admin account management.
//!
//! The web UI only registers donors and requesters; operator accounts are
//! provisioned here.
//!
//! # Usage
//!
//! ```bash
//! bloodlink admin create -u operator -e admin@example.com -p <password>
//! ```

use bloodlink_core::Email;
use bloodlink_web::db::{AccountRepository, RepositoryError};
use bloodlink_web::services::auth::{hash_password, validate_password};

use super::{CommandError, connect};

/// Create a new admin account.
///
/// # Errors
///
/// Returns `CommandError::Invalid` for a malformed email, a weak password
/// or an already-taken username; `CommandError::Database` otherwise.
pub async fn create_account(
    username: &str,
    email: &str,
    password: &str,
) -> Result<i32, CommandError> {
    let email =
        Email::parse(email).map_err(|e| CommandError::Invalid(format!("invalid email: {e}")))?;
    validate_password(password).map_err(|e| CommandError::Invalid(e.to_string()))?;

    let password_hash =
        hash_password(password).map_err(|e| CommandError::Invalid(e.to_string()))?;

    let pool = connect().await?;

    tracing::info!("Creating admin account: {username}");
    let account = AccountRepository::new(&pool)
        .create_admin(username, &email, &password_hash)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => {
                CommandError::Invalid(format!("username already exists: {username}"))
            }
            RepositoryError::Database(e) => CommandError::Database(e),
            RepositoryError::NotFound => CommandError::Invalid("account not found".to_owned()),
        })?;

    tracing::info!("Created admin account {} (id {})", account.username, account.id);
    Ok(account.id.as_i32())
}
