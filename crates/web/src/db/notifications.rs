//! Notification repository.

use sqlx::PgPool;

use bloodlink_core::{AccountId, BloodRequestId, DonorId};

use super::RepositoryError;
use crate::models::Notification;

/// Repository for notification database operations.
pub struct NotificationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> NotificationRepository<'a> {
    /// Create a new notification repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a notification for a blood request about a donor.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        request_id: BloodRequestId,
        donor_id: DonorId,
        message: &str,
    ) -> Result<Notification, RepositoryError> {
        let created = sqlx::query_as::<_, Notification>(
            "INSERT INTO notification (request_id, donor_id, message)
             VALUES ($1, $2, $3)
             RETURNING id, request_id, donor_id, message, is_read, created_at",
        )
        .bind(request_id)
        .bind(donor_id)
        .bind(message)
        .fetch_one(self.pool)
        .await?;

        Ok(created)
    }

    /// List notifications for every blood request owned by an account,
    /// newest first. Feeds the requester dashboard.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<Notification>, RepositoryError> {
        let notifications = sqlx::query_as::<_, Notification>(
            "SELECT n.id, n.request_id, n.donor_id, n.message, n.is_read, n.created_at
             FROM notification n
             JOIN blood_request br ON br.id = n.request_id
             WHERE br.account_id = $1
             ORDER BY n.created_at DESC",
        )
        .bind(account_id)
        .fetch_all(self.pool)
        .await?;

        Ok(notifications)
    }
}
