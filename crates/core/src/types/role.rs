//! Account roles.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing a [`Role`] from a string.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown role: {0:?} (expected admin, donor or requester)")]
pub struct RoleError(pub String);

/// The access level attached to an account.
///
/// A closed enumeration: anything outside these three values is rejected at
/// the parsing boundary rather than carried around as a free-form string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "account_role", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Operates the system: manages records, matches donors to requests.
    Admin,
    /// Owns a donor profile and answers donation requests.
    Donor,
    /// Creates blood requests and receives notifications.
    Requester,
}

impl Role {
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    #[must_use]
    pub const fn is_donor(self) -> bool {
        matches!(self, Self::Donor)
    }

    #[must_use]
    pub const fn is_requester(self) -> bool {
        matches!(self, Self::Requester)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => f.write_str("admin"),
            Self::Donor => f.write_str("donor"),
            Self::Requester => f.write_str("requester"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "donor" => Ok(Self::Donor),
            "requester" => Ok(Self::Requester),
            _ => Err(RoleError(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_roles() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("donor".parse::<Role>().unwrap(), Role::Donor);
        assert_eq!("requester".parse::<Role>().unwrap(), Role::Requester);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("".parse::<Role>().is_err());
        assert!("Admin".parse::<Role>().is_err());
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_display_roundtrips() {
        for role in [Role::Admin, Role::Donor, Role::Requester] {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_predicates() {
        assert!(Role::Admin.is_admin());
        assert!(!Role::Admin.is_donor());
        assert!(Role::Donor.is_donor());
        assert!(Role::Requester.is_requester());
    }
}
