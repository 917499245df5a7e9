//! Donation request workflow.
//!
//! Two admin-initiated actions (send a request to a donor, send donor
//! details to a requester) and two donor-initiated transitions (accept,
//! reject). Each action is a GET prefill / POST commit pair.
//!
//! Emails ride along with the database writes but are not transactional
//! with them: the on-site record is committed first and a delivery failure
//! surfaces as a warning, never a rollback.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use bloodlink_core::{BloodRequestId, DonationRequestId, DonorId, RequestStatus};

use super::{MessageQuery, redirect_with};
use crate::db::{
    AccountRepository, BloodRequestRepository, DonationRequestRepository, DonorRepository,
    NotificationRepository,
};
use crate::error::AppError;
use crate::filters;
use crate::middleware::{RequireAdmin, RequireDonor};
use crate::models::{BloodRequest, CurrentUser, DonationRequest, Donor};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// The (optional) operator-edited message committed by the POST half of the
/// send actions.
#[derive(Debug, Default, Deserialize)]
pub struct MessageForm {
    pub message: Option<String>,
}

impl MessageForm {
    /// The posted message, or `prefill` when the operator left it blank.
    fn body_or(&self, prefill: String) -> String {
        match self.message.as_deref().map(str::trim) {
            Some(body) if !body.is_empty() => body.to_owned(),
            _ => prefill,
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Prefill form for sending a donation request to a donor.
#[derive(Template, WebTemplate)]
#[template(path = "workflow/send_request.html")]
pub struct SendRequestTemplate {
    pub donor: Donor,
    pub request: BloodRequest,
    pub body: String,
    pub messages: MessageQuery,
}

/// Prefill form for sending donor details to a requester.
#[derive(Template, WebTemplate)]
#[template(path = "workflow/send_details.html")]
pub struct SendDetailsTemplate {
    pub donor: Donor,
    pub request: BloodRequest,
    pub body: String,
    pub messages: MessageQuery,
}

/// Accept/decline confirmation page for a donor.
#[derive(Template, WebTemplate)]
#[template(path = "workflow/decide.html")]
pub struct DecideTemplate {
    pub accept: bool,
    pub donation: DonationRequest,
    pub requester: BloodRequest,
    pub donor: Donor,
    pub messages: MessageQuery,
}

// =============================================================================
// Message bodies
// =============================================================================

/// The prefilled appeal mailed to a donor.
fn donor_appeal(donor: &Donor, request: &BloodRequest) -> String {
    let location = request.location.as_deref().unwrap_or("not specified");
    let date_needed = request
        .date_needed
        .map_or_else(|| "not specified".to_owned(), |d| d.to_string());

    format!(
        "Dear {},\n\n\
         There is an urgent need for your blood type ({}) for a patient named {}. \
         Please consider donating blood to save a life.\n\n\
         Requester's location: {location}\n\
         Date needed: {date_needed}\n\n\
         Thank you for your consideration.\n\n\
         Best regards,\n\
         The Bloodlink team",
        donor.name, donor.blood_group, request.name
    )
}

/// The prefilled donor contact card mailed to a requester.
fn donor_details(request: &BloodRequest, donor: &Donor) -> String {
    format!(
        "Dear {},\n\n\
         We have found a potential blood donor for you. Here are their details:\n\n\
         Donor's name: {}\n\
         Blood group: {}\n\
         Phone number: {}\n\n\
         Please contact them to coordinate the donation. We wish you the best.\n\n\
         Best regards,\n\
         The Bloodlink team",
        request.name, donor.name, donor.blood_group, donor.phone
    )
}

/// The in-app notice created when a donor accepts a request.
fn acceptance_notice(donor: &Donor) -> String {
    format!(
        "Great news! Donor {} has accepted your request. \
         You can contact them using the details below to coordinate:\n\n\
         Phone: {}",
        donor.name, donor.phone
    )
}

// =============================================================================
// Admin: send request to donor
// =============================================================================

async fn load_pair(
    state: &AppState,
    donor_id: i32,
    request_id: i32,
) -> Result<(Donor, BloodRequest), AppError> {
    let donor = DonorRepository::new(state.pool())
        .get(DonorId::new(donor_id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("donor {donor_id}")))?;

    let request = BloodRequestRepository::new(state.pool())
        .get(BloodRequestId::new(request_id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("blood request {request_id}")))?;

    Ok((donor, request))
}

/// Look up the email address of the account linked to a donor or requester
/// record, if there is one.
async fn linked_email(
    state: &AppState,
    account_id: Option<bloodlink_core::AccountId>,
) -> Result<Option<String>, AppError> {
    let Some(account_id) = account_id else {
        return Ok(None);
    };
    let account = AccountRepository::new(state.pool())
        .get_by_id(account_id)
        .await?;
    Ok(account.map(|a| a.email.into_inner()))
}

/// Display the prefilled send-request form.
pub async fn send_request_page(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path((donor_id, request_id)): Path<(i32, i32)>,
    Query(messages): Query<MessageQuery>,
) -> Result<Response, AppError> {
    let (donor, request) = load_pair(&state, donor_id, request_id).await?;
    let body = donor_appeal(&donor, &request);

    Ok(SendRequestTemplate {
        donor,
        request,
        body,
        messages,
    }
    .into_response())
}

/// Commit the send-request action: create the pending donation request,
/// then attempt the email.
pub async fn send_request(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path((donor_id, request_id)): Path<(i32, i32)>,
    Form(form): Form<MessageForm>,
) -> Result<Response, AppError> {
    let (donor, request) = load_pair(&state, donor_id, request_id).await?;
    let body = form.body_or(donor_appeal(&donor, &request));

    // The on-site record is the source of truth; it is committed before any
    // email is attempted and survives a delivery failure.
    DonationRequestRepository::new(state.pool())
        .create(donor.id, request.id, &body)
        .await?;

    let Some(recipient) = linked_email(&state, donor.account_id).await? else {
        return Ok(redirect_with(
            "/dashboard",
            "warning",
            "Donation request created, but the donor has no linked account email.",
        )
        .into_response());
    };

    let subject = format!("Urgent blood donation request for {}", request.name);
    match state.mailer().send_plain(&recipient, &subject, &body).await {
        Ok(()) => Ok(redirect_with(
            "/dashboard",
            "success",
            "Donation request created and the donor has been emailed.",
        )
        .into_response()),
        Err(e) => {
            tracing::warn!(error = %e, donor = %donor.id, "failed to email donor");
            Ok(redirect_with(
                "/dashboard",
                "warning",
                "Donation request created, but the email to the donor failed.",
            )
            .into_response())
        }
    }
}

// =============================================================================
// Admin: send donor details to requester
// =============================================================================

/// Display the prefilled send-details form.
pub async fn send_details_page(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path((request_id, donor_id)): Path<(i32, i32)>,
    Query(messages): Query<MessageQuery>,
) -> Result<Response, AppError> {
    let (donor, request) = load_pair(&state, donor_id, request_id).await?;
    let body = donor_details(&request, &donor);

    Ok(SendDetailsTemplate {
        donor,
        request,
        body,
        messages,
    }
    .into_response())
}

/// Commit the send-details action: create the notification, then attempt
/// the email.
pub async fn send_details(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path((request_id, donor_id)): Path<(i32, i32)>,
    Form(form): Form<MessageForm>,
) -> Result<Response, AppError> {
    let (donor, request) = load_pair(&state, donor_id, request_id).await?;
    let body = form.body_or(donor_details(&request, &donor));

    NotificationRepository::new(state.pool())
        .create(request.id, donor.id, &body)
        .await?;

    let Some(recipient) = linked_email(&state, request.account_id).await? else {
        return Ok(redirect_with(
            "/dashboard",
            "warning",
            "Notification created, but the requester has no linked account email.",
        )
        .into_response());
    };

    let subject = "Donor information for your blood request".to_owned();
    match state.mailer().send_plain(&recipient, &subject, &body).await {
        Ok(()) => Ok(redirect_with(
            "/dashboard",
            "success",
            "Donor details sent to the requester.",
        )
        .into_response()),
        Err(e) => {
            tracing::warn!(error = %e, request = %request.id, "failed to email requester");
            Ok(redirect_with(
                "/dashboard",
                "warning",
                "Notification created, but the email to the requester failed.",
            )
            .into_response())
        }
    }
}

// =============================================================================
// Donor: accept / reject
// =============================================================================

/// Load a donation request and enforce that the signed-in donor owns it.
///
/// On failure the caller gets a ready response: 404 for a missing record,
/// a redirect with an authorization error for someone else's request.
async fn load_owned_donation(
    state: &AppState,
    id: i32,
    user: &CurrentUser,
) -> Result<(DonationRequest, Donor, BloodRequest), Response> {
    let donation = match DonationRequestRepository::new(state.pool())
        .get(DonationRequestId::new(id))
        .await
    {
        Ok(Some(donation)) => donation,
        Ok(None) => {
            return Err(AppError::NotFound(format!("donation request {id}")).into_response());
        }
        Err(e) => return Err(AppError::from(e).into_response()),
    };

    let donor = match DonorRepository::new(state.pool()).get(donation.donor_id).await {
        Ok(Some(donor)) => donor,
        Ok(None) => {
            return Err(AppError::NotFound(format!("donor {}", donation.donor_id)).into_response());
        }
        Err(e) => return Err(AppError::from(e).into_response()),
    };

    if donor.account_id != Some(user.account_id) {
        tracing::warn!(
            donation = %donation.id,
            account = %user.account_id,
            "account tried to act on another donor's request"
        );
        return Err(redirect_with(
            "/dashboard",
            "error",
            "You are not authorized to act on this request.",
        )
        .into_response());
    }

    let requester = match BloodRequestRepository::new(state.pool())
        .get(donation.request_id)
        .await
    {
        Ok(Some(requester)) => requester,
        Ok(None) => {
            return Err(
                AppError::NotFound(format!("blood request {}", donation.request_id))
                    .into_response(),
            );
        }
        Err(e) => return Err(AppError::from(e).into_response()),
    };

    Ok((donation, donor, requester))
}

/// Display the accept confirmation page.
pub async fn accept_page(
    State(state): State<AppState>,
    RequireDonor(user): RequireDonor,
    Path(id): Path<i32>,
    Query(messages): Query<MessageQuery>,
) -> Response {
    match load_owned_donation(&state, id, &user).await {
        Ok((donation, donor, requester)) => DecideTemplate {
            accept: true,
            donation,
            requester,
            donor,
            messages,
        }
        .into_response(),
        Err(response) => response,
    }
}

/// Accept: set status=accepted and notify the requester with the donor's
/// phone number.
pub async fn accept(
    State(state): State<AppState>,
    RequireDonor(user): RequireDonor,
    Path(id): Path<i32>,
) -> Response {
    let (donation, donor, _requester) = match load_owned_donation(&state, id, &user).await {
        Ok(loaded) => loaded,
        Err(response) => return response,
    };

    if let Err(e) = DonationRequestRepository::new(state.pool())
        .set_status(donation.id, RequestStatus::Accepted)
        .await
    {
        return AppError::from(e).into_response();
    }

    if let Err(e) = NotificationRepository::new(state.pool())
        .create(donation.request_id, donation.donor_id, &acceptance_notice(&donor))
        .await
    {
        return AppError::from(e).into_response();
    }

    redirect_with(
        "/dashboard",
        "success",
        "Request accepted! The requester has been notified with your contact details.",
    )
    .into_response()
}

/// Display the decline confirmation page.
pub async fn reject_page(
    State(state): State<AppState>,
    RequireDonor(user): RequireDonor,
    Path(id): Path<i32>,
    Query(messages): Query<MessageQuery>,
) -> Response {
    match load_owned_donation(&state, id, &user).await {
        Ok((donation, donor, requester)) => DecideTemplate {
            accept: false,
            donation,
            requester,
            donor,
            messages,
        }
        .into_response(),
        Err(response) => response,
    }
}

/// Reject: set status=rejected. No notification is created.
pub async fn reject(
    State(state): State<AppState>,
    RequireDonor(user): RequireDonor,
    Path(id): Path<i32>,
) -> Response {
    let (donation, _donor, _requester) = match load_owned_donation(&state, id, &user).await {
        Ok(loaded) => loaded,
        Err(response) => return response,
    };

    if let Err(e) = DonationRequestRepository::new(state.pool())
        .set_status(donation.id, RequestStatus::Rejected)
        .await
    {
        return AppError::from(e).into_response();
    }

    redirect_with("/dashboard", "info", "You have declined the donation request.")
        .into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bloodlink_core::BloodGroup;
    use chrono::{NaiveDate, Utc};

    fn donor() -> Donor {
        Donor {
            id: DonorId::new(1),
            account_id: None,
            name: "MD. Hossain".to_owned(),
            age: 25,
            blood_group: BloodGroup::OPositive,
            phone: "+8801000000".to_owned(),
            address: "Dhaka".to_owned(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn request() -> BloodRequest {
        BloodRequest {
            id: BloodRequestId::new(2),
            account_id: None,
            name: "A. Rahman".to_owned(),
            blood_group: BloodGroup::OPositive,
            phone: "+8801999999".to_owned(),
            reason: "Urgent surgery".to_owned(),
            location: Some("Dhaka Medical College".to_owned()),
            message: String::new(),
            date_needed: NaiveDate::from_ymd_opt(2026, 9, 1),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_donor_appeal_names_everyone_involved() {
        let body = donor_appeal(&donor(), &request());
        assert!(body.contains("MD. Hossain"));
        assert!(body.contains("A. Rahman"));
        assert!(body.contains("O+"));
        assert!(body.contains("Dhaka Medical College"));
        assert!(body.contains("2026-09-01"));
    }

    #[test]
    fn test_donor_appeal_handles_missing_optionals() {
        let mut req = request();
        req.location = None;
        req.date_needed = None;
        let body = donor_appeal(&donor(), &req);
        assert!(body.contains("Requester's location: not specified"));
        assert!(body.contains("Date needed: not specified"));
    }

    #[test]
    fn test_donor_details_contains_contact_card() {
        let body = donor_details(&request(), &donor());
        assert!(body.contains("Donor's name: MD. Hossain"));
        assert!(body.contains("Blood group: O+"));
        assert!(body.contains("Phone number: +8801000000"));
    }

    #[test]
    fn test_acceptance_notice_contains_phone() {
        let notice = acceptance_notice(&donor());
        assert!(notice.contains("has accepted your request"));
        assert!(notice.contains("+8801000000"));
    }

    #[test]
    fn test_message_form_falls_back_to_prefill() {
        let blank = MessageForm {
            message: Some("   ".to_owned()),
        };
        assert_eq!(blank.body_or("prefill".to_owned()), "prefill");

        let missing = MessageForm { message: None };
        assert_eq!(missing.body_or("prefill".to_owned()), "prefill");

        let edited = MessageForm {
            message: Some("custom appeal".to_owned()),
        };
        assert_eq!(edited.body_or("prefill".to_owned()), "custom appeal");
    }
}
