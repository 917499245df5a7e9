//! Donation request lifecycle status.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a donation request.
///
/// Requests start out pending and are moved to accepted or rejected by the
/// donor they target. The transition handlers are idempotent re-setters; no
/// state machine prevents a second transition after the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "request_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl RequestStatus {
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Accepted => f.write_str("accepted"),
            Self::Rejected => f.write_str("rejected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_pending() {
        assert_eq!(RequestStatus::default(), RequestStatus::Pending);
        assert!(RequestStatus::default().is_pending());
    }

    #[test]
    fn test_display() {
        assert_eq!(RequestStatus::Accepted.to_string(), "accepted");
        assert_eq!(RequestStatus::Rejected.to_string(), "rejected");
    }
}
