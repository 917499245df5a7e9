//! Donation request repository.

use sqlx::PgPool;

use bloodlink_core::{BloodRequestId, DonationRequestId, DonorId, RequestStatus};

use super::RepositoryError;
use crate::models::{DonationRequest, DonationRequestDetail};

const DONATION_REQUEST_COLUMNS: &str =
    "id, donor_id, request_id, message, status, is_read, created_at";

/// Repository for donation request database operations.
pub struct DonationRequestRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DonationRequestRepository<'a> {
    /// Create a new donation request repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a pending donation request.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        donor_id: DonorId,
        request_id: BloodRequestId,
        message: &str,
    ) -> Result<DonationRequest, RepositoryError> {
        let created = sqlx::query_as::<_, DonationRequest>(&format!(
            "INSERT INTO donation_request (donor_id, request_id, message)
             VALUES ($1, $2, $3)
             RETURNING {DONATION_REQUEST_COLUMNS}"
        ))
        .bind(donor_id)
        .bind(request_id)
        .bind(message)
        .fetch_one(self.pool)
        .await?;

        Ok(created)
    }

    /// Get a donation request by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        id: DonationRequestId,
    ) -> Result<Option<DonationRequest>, RepositoryError> {
        let request = sqlx::query_as::<_, DonationRequest>(&format!(
            "SELECT {DONATION_REQUEST_COLUMNS} FROM donation_request WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(request)
    }

    /// List a donor's pending donation requests joined with their blood
    /// requests, newest first. Feeds the donor dashboard.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_pending_for_donor(
        &self,
        donor_id: DonorId,
    ) -> Result<Vec<DonationRequestDetail>, RepositoryError> {
        let pending = sqlx::query_as::<_, DonationRequestDetail>(
            "SELECT dr.id, dr.message, dr.status, dr.created_at,
                    br.name AS requester_name, br.blood_group, br.location, br.date_needed
             FROM donation_request dr
             JOIN blood_request br ON br.id = dr.request_id
             WHERE dr.donor_id = $1 AND dr.status = 'pending'
             ORDER BY dr.created_at DESC",
        )
        .bind(donor_id)
        .fetch_all(self.pool)
        .await?;

        Ok(pending)
    }

    /// Set the status of a donation request.
    ///
    /// Deliberately an unconditional re-setter: re-posting accept on an
    /// already accepted request is a no-op rather than an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the request doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_status(
        &self,
        id: DonationRequestId,
        status: RequestStatus,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE donation_request SET status = $1 WHERE id = $2")
            .bind(status)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
