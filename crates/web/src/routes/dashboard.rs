//! Dashboard route: one path, three role-specific views.
//!
//! The account is re-resolved from the database on every visit; a session
//! whose account has disappeared (or whose donor profile is gone) is
//! force-logged-out rather than shown a broken page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use bloodlink_core::Role;

use super::{MessageQuery, redirect_with};
use crate::db::{
    AccountRepository, BloodRequestRepository, DonationRequestRepository, DonorRepository,
    NotificationRepository,
};
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{
    Account, BloodGroupCount, BloodRequest, DonationRequestDetail, Donor, Notification,
};
use crate::state::AppState;

/// Admin dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/admin.html")]
pub struct AdminDashboardTemplate {
    pub donors: Vec<Donor>,
    pub requests: Vec<BloodRequest>,
    pub total_donors: i64,
    pub total_requests: i64,
    pub histogram: Vec<BloodGroupCount>,
    pub messages: MessageQuery,
}

/// Donor dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/donor.html")]
pub struct DonorDashboardTemplate {
    pub donor: Donor,
    pub pending: Vec<DonationRequestDetail>,
    pub messages: MessageQuery,
}

/// Requester dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/requester.html")]
pub struct RequesterDashboardTemplate {
    pub requests: Vec<BloodRequest>,
    pub notifications: Vec<Notification>,
    pub messages: MessageQuery,
}

/// Display the dashboard for the signed-in account's role.
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Query(messages): Query<MessageQuery>,
) -> Result<Response, AppError> {
    let accounts = AccountRepository::new(state.pool());
    let Some(account) = accounts.get_by_id(user.account_id).await? else {
        return Ok(force_sign_out(&session, "Your account could not be resolved. Please sign in again.").await);
    };

    match account.role {
        Role::Admin => admin_dashboard(&state, messages).await,
        Role::Donor => donor_dashboard(&state, &account, &session, messages).await,
        Role::Requester => requester_dashboard(&state, &account, messages).await,
    }
}

/// Flush the session and bounce to the landing page with a warning.
async fn force_sign_out(session: &Session, message: &str) -> Response {
    tracing::warn!("forcing sign-out: {message}");
    if let Err(e) = session.flush().await {
        tracing::error!("failed to flush session: {e}");
    }
    redirect_with("/", "warning", message).into_response()
}

async fn admin_dashboard(
    state: &AppState,
    messages: MessageQuery,
) -> Result<Response, AppError> {
    let donors_repo = DonorRepository::new(state.pool());
    let requests_repo = BloodRequestRepository::new(state.pool());

    let donors = donors_repo.list_all().await?;
    let requests = requests_repo.list_all().await?;
    let total_donors = donors_repo.count().await?;
    let total_requests = requests_repo.count().await?;
    let histogram = donors_repo.blood_group_histogram().await?;

    Ok(AdminDashboardTemplate {
        donors,
        requests,
        total_donors,
        total_requests,
        histogram,
        messages,
    }
    .into_response())
}

async fn donor_dashboard(
    state: &AppState,
    account: &Account,
    session: &Session,
    messages: MessageQuery,
) -> Result<Response, AppError> {
    let donors_repo = DonorRepository::new(state.pool());
    let Some(donor) = donors_repo.get_by_account(account.id).await? else {
        // A donor account without a profile cannot do anything useful.
        return Ok(force_sign_out(
            session,
            "No donor profile is linked to your account. Please contact support.",
        )
        .await);
    };

    let pending = DonationRequestRepository::new(state.pool())
        .list_pending_for_donor(donor.id)
        .await?;

    Ok(DonorDashboardTemplate {
        donor,
        pending,
        messages,
    }
    .into_response())
}

async fn requester_dashboard(
    state: &AppState,
    account: &Account,
    messages: MessageQuery,
) -> Result<Response, AppError> {
    let requests = BloodRequestRepository::new(state.pool())
        .list_by_account(account.id)
        .await?;
    let notifications = NotificationRepository::new(state.pool())
        .list_for_account(account.id)
        .await?;

    Ok(RequesterDashboardTemplate {
        requests,
        notifications,
        messages,
    }
    .into_response())
}
