//! Session state types.

use serde::{Deserialize, Serialize};

use bloodlink_core::{AccountId, Role};

/// Keys under which values are stored in the session.
pub mod session_keys {
    /// The authenticated principal.
    pub const CURRENT_USER: &str = "current_user";
}

/// The authenticated principal stored in the session.
///
/// The role here is a snapshot taken at sign-in; the dashboard re-resolves
/// the account on every visit and force-logs-out sessions whose account has
/// disappeared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub account_id: AccountId,
    pub username: String,
    pub role: Role,
}
