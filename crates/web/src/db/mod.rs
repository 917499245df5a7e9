//! Database access layer.
//!
//! Single `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `account` - Credentials and role
//! - `donor` - Donor profiles (optionally linked to an account)
//! - `blood_request` - Open requests for blood
//! - `donation_request` - Operator-mediated solicitations with a lifecycle status
//! - `notification` - One-way notices to requesters
//! - `bloodlink.session` - Tower-sessions storage
//!
//! # Migrations
//!
//! Migrations are stored in `crates/web/migrations/` and run via:
//! ```bash
//! cargo run -p bloodlink-cli -- migrate
//! ```

pub mod accounts;
pub mod donation_requests;
pub mod donors;
pub mod notifications;
pub mod requests;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use accounts::AccountRepository;
pub use donation_requests::DonationRequestRepository;
pub use donors::{DonorRepository, NewDonor};
pub use notifications::NotificationRepository;
pub use requests::{BloodRequestRepository, NewBloodRequest};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a sqlx error to `Conflict` when it is a unique violation.
fn conflict_on_unique(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}
