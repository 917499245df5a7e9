//! Blood request repository.

use chrono::NaiveDate;
use sqlx::PgPool;

use bloodlink_core::{AccountId, BloodGroup, BloodRequestId};

use super::RepositoryError;
use crate::models::BloodRequest;

/// Field set for inserting or updating a blood request.
#[derive(Debug, Clone)]
pub struct NewBloodRequest {
    pub name: String,
    pub blood_group: BloodGroup,
    pub phone: String,
    pub reason: String,
    pub location: Option<String>,
    pub message: String,
    pub date_needed: Option<NaiveDate>,
}

const REQUEST_COLUMNS: &str = "id, account_id, name, blood_group, phone, reason, location, \
                               message, date_needed, created_at";

/// Repository for blood request database operations.
pub struct BloodRequestRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BloodRequestRepository<'a> {
    /// Create a new blood request repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all blood requests, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<BloodRequest>, RepositoryError> {
        let requests = sqlx::query_as::<_, BloodRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM blood_request ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(requests)
    }

    /// Get a blood request by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: BloodRequestId) -> Result<Option<BloodRequest>, RepositoryError> {
        let request = sqlx::query_as::<_, BloodRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM blood_request WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(request)
    }

    /// List the requests owned by an account, most urgent needed-date first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<BloodRequest>, RepositoryError> {
        let requests = sqlx::query_as::<_, BloodRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM blood_request
             WHERE account_id = $1
             ORDER BY date_needed DESC NULLS LAST, created_at DESC"
        ))
        .bind(account_id)
        .fetch_all(self.pool)
        .await?;

        Ok(requests)
    }

    /// Create a blood request, optionally linked to an account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        request: &NewBloodRequest,
        account_id: Option<AccountId>,
    ) -> Result<BloodRequest, RepositoryError> {
        let created = sqlx::query_as::<_, BloodRequest>(&format!(
            "INSERT INTO blood_request
                 (account_id, name, blood_group, phone, reason, location, message, date_needed)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {REQUEST_COLUMNS}"
        ))
        .bind(account_id)
        .bind(&request.name)
        .bind(request.blood_group)
        .bind(&request.phone)
        .bind(&request.reason)
        .bind(request.location.as_deref())
        .bind(&request.message)
        .bind(request.date_needed)
        .fetch_one(self.pool)
        .await?;

        Ok(created)
    }

    /// Update a blood request.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the request doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: BloodRequestId,
        request: &NewBloodRequest,
    ) -> Result<BloodRequest, RepositoryError> {
        let updated = sqlx::query_as::<_, BloodRequest>(&format!(
            "UPDATE blood_request
             SET name = $1, blood_group = $2, phone = $3, reason = $4, location = $5,
                 message = $6, date_needed = $7
             WHERE id = $8
             RETURNING {REQUEST_COLUMNS}"
        ))
        .bind(&request.name)
        .bind(request.blood_group)
        .bind(&request.phone)
        .bind(&request.reason)
        .bind(request.location.as_deref())
        .bind(&request.message)
        .bind(request.date_needed)
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(updated)
    }

    /// Delete a blood request by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the request doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: BloodRequestId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM blood_request WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Total number of blood requests.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM blood_request")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}
