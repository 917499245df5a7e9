//! Donor profile domain types.

use chrono::{DateTime, Utc};

use bloodlink_core::{AccountId, BloodGroup, DonorId};

/// A donor profile.
///
/// `account_id` is present for donors who registered themselves and absent
/// for records entered by an operator; only linked donors can sign in and
/// answer donation requests.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Donor {
    pub id: DonorId,
    pub account_id: Option<AccountId>,
    pub name: String,
    pub age: i32,
    pub blood_group: BloodGroup,
    pub phone: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One row of the admin dashboard blood-group histogram.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct BloodGroupCount {
    pub blood_group: BloodGroup,
    pub count: i64,
}
