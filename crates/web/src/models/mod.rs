//! Domain models.
//!
//! These map one-to-one onto database rows (sqlx `FromRow`); the strongly
//! typed columns (IDs, role, blood group, status, email) come from
//! `bloodlink-core`.

pub mod account;
pub mod donor;
pub mod request;
pub mod session;

pub use account::Account;
pub use donor::{BloodGroupCount, Donor};
pub use request::{BloodRequest, DonationRequest, DonationRequestDetail, Notification};
pub use session::{CurrentUser, session_keys};
