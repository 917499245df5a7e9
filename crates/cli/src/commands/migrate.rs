//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! bloodlink migrate
//! ```
//!
//! Migration files live in `crates/web/migrations/` and are embedded into
//! the binary at compile time.

use super::{CommandError, connect};

/// Run all pending database migrations.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or a migration
/// fails to apply.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../web/migrations").run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
