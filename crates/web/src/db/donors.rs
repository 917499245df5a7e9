//! Donor repository.

use sqlx::PgPool;

use bloodlink_core::{AccountId, BloodGroup, DonorId};

use super::RepositoryError;
use crate::models::{BloodGroupCount, Donor};

/// Field set for inserting or updating a donor profile.
#[derive(Debug, Clone)]
pub struct NewDonor {
    pub name: String,
    pub age: i32,
    pub blood_group: BloodGroup,
    pub phone: String,
    pub address: String,
}

const DONOR_COLUMNS: &str =
    "id, account_id, name, age, blood_group, phone, address, created_at, updated_at";

/// Repository for donor database operations.
pub struct DonorRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DonorRepository<'a> {
    /// Create a new donor repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all donors, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Donor>, RepositoryError> {
        let donors = sqlx::query_as::<_, Donor>(&format!(
            "SELECT {DONOR_COLUMNS} FROM donor ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(donors)
    }

    /// Get a donor by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: DonorId) -> Result<Option<Donor>, RepositoryError> {
        let donor = sqlx::query_as::<_, Donor>(&format!(
            "SELECT {DONOR_COLUMNS} FROM donor WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(donor)
    }

    /// Get the donor profile linked to an account, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_account(
        &self,
        account_id: AccountId,
    ) -> Result<Option<Donor>, RepositoryError> {
        let donor = sqlx::query_as::<_, Donor>(&format!(
            "SELECT {DONOR_COLUMNS} FROM donor WHERE account_id = $1"
        ))
        .bind(account_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(donor)
    }

    /// Create a donor profile, optionally linked to an account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        profile: &NewDonor,
        account_id: Option<AccountId>,
    ) -> Result<Donor, RepositoryError> {
        let donor = sqlx::query_as::<_, Donor>(&format!(
            "INSERT INTO donor (account_id, name, age, blood_group, phone, address)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {DONOR_COLUMNS}"
        ))
        .bind(account_id)
        .bind(&profile.name)
        .bind(profile.age)
        .bind(profile.blood_group)
        .bind(&profile.phone)
        .bind(&profile.address)
        .fetch_one(self.pool)
        .await?;

        Ok(donor)
    }

    /// Update a donor profile.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the donor doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: DonorId,
        profile: &NewDonor,
    ) -> Result<Donor, RepositoryError> {
        let donor = sqlx::query_as::<_, Donor>(&format!(
            "UPDATE donor
             SET name = $1, age = $2, blood_group = $3, phone = $4, address = $5,
                 updated_at = now()
             WHERE id = $6
             RETURNING {DONOR_COLUMNS}"
        ))
        .bind(&profile.name)
        .bind(profile.age)
        .bind(profile.blood_group)
        .bind(&profile.phone)
        .bind(&profile.address)
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(donor)
    }

    /// Delete a donor by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the donor doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: DonorId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM donor WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Find donors with exactly the given blood group.
    ///
    /// Case-insensitivity is handled at the parsing boundary; by the time a
    /// query reaches here it is already a canonical [`BloodGroup`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_blood_group(
        &self,
        blood_group: BloodGroup,
    ) -> Result<Vec<Donor>, RepositoryError> {
        let donors = sqlx::query_as::<_, Donor>(&format!(
            "SELECT {DONOR_COLUMNS} FROM donor WHERE blood_group = $1 ORDER BY created_at DESC"
        ))
        .bind(blood_group)
        .fetch_all(self.pool)
        .await?;

        Ok(donors)
    }

    /// Count donors per blood group, most common group first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn blood_group_histogram(
        &self,
    ) -> Result<Vec<BloodGroupCount>, RepositoryError> {
        let counts = sqlx::query_as::<_, BloodGroupCount>(
            "SELECT blood_group, COUNT(*) AS count
             FROM donor
             GROUP BY blood_group
             ORDER BY count DESC, blood_group",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(counts)
    }

    /// Total number of donor profiles.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM donor")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}
