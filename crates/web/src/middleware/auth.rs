//! Authentication extractors.
//!
//! `RequireAuth` admits any signed-in account. The three role extractors are
//! instances of one shared gate: admit iff the session principal's role
//! equals the required role, otherwise redirect to the landing page with an
//! authorization message and no state change.
//!
//! # Example
//!
//! ```rust,ignore
//! async fn admin_only(RequireAdmin(user): RequireAdmin) -> impl IntoResponse {
//!     format!("hello, {}", user.username)
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use bloodlink_core::Role;

use crate::models::{CurrentUser, session_keys};

/// Extractor that requires a signed-in account of any role.
pub struct RequireAuth(pub CurrentUser);

/// Extractor that requires the admin role.
pub struct RequireAdmin(pub CurrentUser);

/// Extractor that requires the donor role.
pub struct RequireDonor(pub CurrentUser);

/// Extractor that requires the requester role.
pub struct RequireRequester(pub CurrentUser);

/// Rejection returned when an auth extractor denies a request.
pub enum AuthRejection {
    /// No authenticated session.
    SignedOut,
    /// Authenticated, but with a different role than required.
    WrongRole,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let message = match self {
            Self::SignedOut => "Please sign in to continue.",
            Self::WrongRole => "You do not have permission to access that page.",
        };
        Redirect::to(&format!("/?error={}", urlencoding::encode(message))).into_response()
    }
}

/// Read the authenticated principal from the request's session.
async fn current_user(parts: &mut Parts) -> Result<CurrentUser, AuthRejection> {
    // The session is placed in extensions by SessionManagerLayer.
    let session = parts
        .extensions
        .get::<Session>()
        .ok_or(AuthRejection::SignedOut)?;

    let user: Option<CurrentUser> = session
        .get(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten();

    user.ok_or(AuthRejection::SignedOut)
}

/// The shared role gate.
async fn require_role(parts: &mut Parts, required: Role) -> Result<CurrentUser, AuthRejection> {
    let user = current_user(parts).await?;
    if user.role == required {
        Ok(user)
    } else {
        Err(AuthRejection::WrongRole)
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        current_user(parts).await.map(Self)
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        require_role(parts, Role::Admin).await.map(Self)
    }
}

impl<S> FromRequestParts<S> for RequireDonor
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        require_role(parts, Role::Donor).await.map(Self)
    }
}

impl<S> FromRequestParts<S> for RequireRequester
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        require_role(parts, Role::Requester).await.map(Self)
    }
}

/// Store the signed-in principal in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Destroy the session entirely (logout).
///
/// # Errors
///
/// Returns an error if the session store cannot be reached.
pub async fn clear_session(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
