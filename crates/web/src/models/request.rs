//! Blood request and workflow domain types.

use chrono::{DateTime, NaiveDate, Utc};

use bloodlink_core::{
    AccountId, BloodGroup, BloodRequestId, DonationRequestId, DonorId, NotificationId,
    RequestStatus,
};

/// An open request for blood.
///
/// `account_id` links the record to the requester account that created it;
/// operator-entered records have none. One account may own many requests.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BloodRequest {
    pub id: BloodRequestId,
    pub account_id: Option<AccountId>,
    pub name: String,
    pub blood_group: BloodGroup,
    pub phone: String,
    pub reason: String,
    pub location: Option<String>,
    pub message: String,
    pub date_needed: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// A solicitation sent to a specific donor on behalf of a blood request.
///
/// Created by an operator action, answered (accepted/rejected) only by the
/// donor it targets, and never deleted in the normal flow.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DonationRequest {
    pub id: DonationRequestId,
    pub donor_id: DonorId,
    pub request_id: BloodRequestId,
    pub message: String,
    pub status: RequestStatus,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// A donation request joined with its blood request, as shown on the donor
/// dashboard.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DonationRequestDetail {
    pub id: DonationRequestId,
    pub message: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub requester_name: String,
    pub blood_group: BloodGroup,
    pub location: Option<String>,
    pub date_needed: Option<NaiveDate>,
}

/// A one-way informational notice delivered to a requester about a donor.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Notification {
    pub id: NotificationId,
    pub request_id: BloodRequestId,
    pub donor_id: DonorId,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}
