//! Bloodlink core library.
//!
//! Shared, validated domain types used by every Bloodlink crate: newtype IDs,
//! the closed role and blood-group enumerations, the donation-request status
//! and a lightly validated email address type.
//!
//! Enable the `postgres` feature to get `sqlx` encode/decode support for all
//! of these types.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::{
    AccountId, BloodGroup, BloodGroupError, BloodRequestId, DonationRequestId, DonorId, Email,
    EmailError, NotificationId, RequestStatus, Role, RoleError,
};
