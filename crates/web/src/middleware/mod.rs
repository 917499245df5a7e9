//! Request middleware: sessions and authentication extractors.

pub mod auth;
pub mod session;

pub use auth::{
    AuthRejection, RequireAdmin, RequireAuth, RequireDonor, RequireRequester, clear_session,
    set_current_user,
};
pub use session::create_session_layer;
