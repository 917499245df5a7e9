//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Landing page with role choices
//!
//! # Auth
//! GET/POST /login/{role}          - Role-scoped sign in
//! GET/POST /register/{role}       - Registration (donor|requester only)
//! POST /logout                    - Flush session
//!
//! # Dashboard
//! GET  /dashboard                 - Role dispatch (admin/donor/requester)
//!
//! # Donor management
//! GET/POST /add-donor             - Admin
//! GET/POST /edit-donor/{id}       - Admin or the owning donor
//! GET/POST /delete-donor/{id}     - Admin; GET renders a confirmation page
//!
//! # Request management
//! GET/POST /add-requester         - Admin
//! GET/POST /create-request        - Requester
//! GET/POST /requester/edit/{id}   - Admin or the owning requester
//! GET/POST /delete-requester/{id} - Admin or the owning requester
//!
//! # Search and matching
//! GET  /search?q=                 - Admin; exact case-insensitive group match
//! GET  /requester/{id}/find-donors - Admin; donors matching a request
//!
//! # Workflow
//! GET/POST /send-request/donor/{donor_id}/requester/{request_id} - Admin
//! GET/POST /send-details/requester/{request_id}/donor/{donor_id} - Admin
//! GET/POST /request/{id}/accept   - The targeted donor only
//! GET/POST /request/{id}/reject   - The targeted donor only
//! ```
//!
//! All mutations are POSTs; GET on the same path renders a confirmation or
//! prefill form. User feedback travels across redirects as `?error=` /
//! `?success=` / `?warning=` / `?info=` query parameters.

pub mod auth;
pub mod dashboard;
pub mod donors;
pub mod home;
pub mod requests;
pub mod search;
pub mod workflow;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};
use serde::Deserialize;

use crate::state::AppState;

/// Query parameters carrying one-shot user feedback across redirects.
#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
    pub warning: Option<String>,
    pub info: Option<String>,
}

/// Redirect to `path` carrying a feedback message in the query string.
///
/// `kind` is one of `error`, `success`, `warning`, `info`.
pub fn redirect_with(path: &str, kind: &str, message: &str) -> Redirect {
    Redirect::to(&format!("{path}?{kind}={}", urlencoding::encode(message)))
}

/// Create all application routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Landing page
        .route("/", get(home::home))
        // Auth
        .route("/login/{role}", get(auth::login_page).post(auth::login))
        .route(
            "/register/{role}",
            get(auth::register_page).post(auth::register),
        )
        .route("/logout", post(auth::logout))
        // Dashboard
        .route("/dashboard", get(dashboard::dashboard))
        // Donor management
        .route("/add-donor", get(donors::add_page).post(donors::add))
        .route("/edit-donor/{id}", get(donors::edit_page).post(donors::edit))
        .route(
            "/delete-donor/{id}",
            get(donors::delete_page).post(donors::delete),
        )
        // Request management
        .route("/add-requester", get(requests::add_page).post(requests::add))
        .route(
            "/create-request",
            get(requests::create_page).post(requests::create),
        )
        .route(
            "/requester/edit/{id}",
            get(requests::edit_page).post(requests::edit),
        )
        .route(
            "/delete-requester/{id}",
            get(requests::delete_page).post(requests::delete),
        )
        // Search and matching
        .route("/search", get(search::search))
        .route("/requester/{id}/find-donors", get(search::find_donors))
        // Workflow
        .route(
            "/send-request/donor/{donor_id}/requester/{request_id}",
            get(workflow::send_request_page).post(workflow::send_request),
        )
        .route(
            "/send-details/requester/{request_id}/donor/{donor_id}",
            get(workflow::send_details_page).post(workflow::send_details),
        )
        .route(
            "/request/{id}/accept",
            get(workflow::accept_page).post(workflow::accept),
        )
        .route(
            "/request/{id}/reject",
            get(workflow::reject_page).post(workflow::reject),
        )
}
