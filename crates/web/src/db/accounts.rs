//! Account repository.
//!
//! Registration inserts the account and its role profile inside one
//! transaction so a validation or constraint failure can never leave a
//! half-created registration behind.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use bloodlink_core::{AccountId, Email, Role};

use super::donors::NewDonor;
use super::requests::NewBloodRequest;
use super::{RepositoryError, conflict_on_unique};
use crate::models::Account;

/// Internal row type carrying the credential alongside the account.
#[derive(sqlx::FromRow)]
struct AccountWithHash {
    id: AccountId,
    username: String,
    email: Email,
    role: Role,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AccountWithHash {
    fn split(self) -> (Account, String) {
        (
            Account {
                id: self.id,
                username: self.username,
                email: self.email,
                role: self.role,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            self.password_hash,
        )
    }
}

/// Repository for account database operations.
pub struct AccountRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AccountRepository<'a> {
    /// Create a new account repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an account by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT id, username, email, role, created_at, updated_at
             FROM account WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(account)
    }

    /// Get an account by its username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Account>, RepositoryError> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT id, username, email, role, created_at, updated_at
             FROM account WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(account)
    }

    /// Get an account together with its password hash, for login.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        username: &str,
    ) -> Result<Option<(Account, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, AccountWithHash>(
            "SELECT id, username, email, role, password_hash, created_at, updated_at
             FROM account WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(AccountWithHash::split))
    }

    /// Create an admin account (used by the CLI; the web UI only registers
    /// donors and requesters).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_admin(
        &self,
        username: &str,
        email: &Email,
        password_hash: &str,
    ) -> Result<Account, RepositoryError> {
        let account = sqlx::query_as::<_, Account>(
            "INSERT INTO account (username, email, password_hash, role)
             VALUES ($1, $2, $3, $4)
             RETURNING id, username, email, role, created_at, updated_at",
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(Role::Admin)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "username"))?;

        Ok(account)
    }

    /// Create a donor account with its linked profile in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_donor_account(
        &self,
        username: &str,
        email: &Email,
        password_hash: &str,
        profile: &NewDonor,
    ) -> Result<Account, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let account = sqlx::query_as::<_, Account>(
            "INSERT INTO account (username, email, password_hash, role)
             VALUES ($1, $2, $3, $4)
             RETURNING id, username, email, role, created_at, updated_at",
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(Role::Donor)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, "username"))?;

        sqlx::query(
            "INSERT INTO donor (account_id, name, age, blood_group, phone, address)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(account.id)
        .bind(&profile.name)
        .bind(profile.age)
        .bind(profile.blood_group)
        .bind(&profile.phone)
        .bind(&profile.address)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(account)
    }

    /// Create a requester account with its first blood request in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_requester_account(
        &self,
        username: &str,
        email: &Email,
        password_hash: &str,
        request: &NewBloodRequest,
    ) -> Result<Account, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let account = sqlx::query_as::<_, Account>(
            "INSERT INTO account (username, email, password_hash, role)
             VALUES ($1, $2, $3, $4)
             RETURNING id, username, email, role, created_at, updated_at",
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(Role::Requester)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, "username"))?;

        sqlx::query(
            "INSERT INTO blood_request
                 (account_id, name, blood_group, phone, reason, location, message, date_needed)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(account.id)
        .bind(&request.name)
        .bind(request.blood_group)
        .bind(&request.phone)
        .bind(&request.reason)
        .bind(request.location.as_deref())
        .bind(&request.message)
        .bind(request.date_needed)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(account)
    }
}
