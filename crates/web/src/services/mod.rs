//! Application services.

pub mod auth;
pub mod mail;

pub use auth::{AuthError, AuthService};
pub use mail::{MailError, Mailer};
