//! Core type definitions.

pub mod blood_group;
pub mod email;
pub mod id;
pub mod role;
pub mod status;

pub use blood_group::{BloodGroup, BloodGroupError};
pub use email::{Email, EmailError};
pub use id::{AccountId, BloodRequestId, DonationRequestId, DonorId, NotificationId};
pub use role::{Role, RoleError};
pub use status::RequestStatus;
