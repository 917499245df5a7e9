//! Account domain type.

use chrono::{DateTime, Utc};

use bloodlink_core::{AccountId, Email, Role};

/// A registered account.
///
/// The password hash is deliberately absent here; it only ever surfaces
/// through the dedicated credential lookup in the accounts repository.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    /// Unique account ID.
    pub id: AccountId,
    /// Login name, unique across the system.
    pub username: String,
    /// Address workflow emails are sent to.
    pub email: Email,
    /// Access level.
    pub role: Role,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}
