//! Blood request CRUD route handlers.
//!
//! Admins add unlinked records; requesters create requests tied to their
//! own account. Editing and deleting is open to the admin and the owner.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use serde::Deserialize;

use bloodlink_core::{BloodGroup, BloodRequestId};

use super::{MessageQuery, redirect_with};
use crate::db::{BloodRequestRepository, NewBloodRequest};
use crate::error::AppError;
use crate::filters;
use crate::middleware::{RequireAdmin, RequireAuth, RequireRequester};
use crate::models::{BloodRequest, CurrentUser};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Raw blood request form fields as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub blood_group: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub date_needed: String,
    #[serde(default)]
    pub message: String,
}

impl RequestForm {
    /// Prefill from an existing record for the edit form.
    #[must_use]
    pub fn from_request(request: &BloodRequest) -> Self {
        Self {
            name: request.name.clone(),
            blood_group: request.blood_group.as_str().to_owned(),
            phone: request.phone.clone(),
            reason: request.reason.clone(),
            location: request.location.clone().unwrap_or_default(),
            date_needed: request
                .date_needed
                .map(|d| d.to_string())
                .unwrap_or_default(),
            message: request.message.clone(),
        }
    }

    /// Validate into an insertable record, collecting every field error.
    ///
    /// # Errors
    ///
    /// Returns the full list of field-level messages when any field is
    /// invalid.
    pub fn validate(&self) -> Result<NewBloodRequest, Vec<String>> {
        let mut errors = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push("Patient name is required.".to_owned());
        }

        let blood_group = match self.blood_group.parse::<BloodGroup>() {
            Ok(group) => Some(group),
            Err(_) => {
                errors.push("Select a valid blood group.".to_owned());
                None
            }
        };

        if self.phone.trim().is_empty() {
            errors.push("Phone number is required.".to_owned());
        }
        if self.reason.trim().is_empty() {
            errors.push("A reason for the request is required.".to_owned());
        }

        let date_needed = match self.date_needed.trim() {
            "" => None,
            raw => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.push("Needed-by date must be YYYY-MM-DD.".to_owned());
                    None
                }
            },
        };

        let location = match self.location.trim() {
            "" => None,
            loc => Some(loc.to_owned()),
        };

        match blood_group {
            Some(blood_group) if errors.is_empty() => Ok(NewBloodRequest {
                name: name.to_owned(),
                blood_group,
                phone: self.phone.trim().to_owned(),
                reason: self.reason.trim().to_owned(),
                location,
                message: self.message.trim().to_owned(),
                date_needed,
            }),
            _ => Err(errors),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Blood request add/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "requests/form.html")]
pub struct RequestFormTemplate {
    pub title: &'static str,
    pub action: String,
    pub values: RequestForm,
    pub errors: Vec<String>,
    pub blood_groups: [BloodGroup; 8],
    pub messages: MessageQuery,
}

/// Blood request delete confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "requests/delete_confirm.html")]
pub struct RequestDeleteTemplate {
    pub request: BloodRequest,
    pub messages: MessageQuery,
}

// =============================================================================
// Add (admin)
// =============================================================================

/// Display the add-request form (admin, unlinked record).
pub async fn add_page(
    RequireAdmin(_user): RequireAdmin,
    Query(messages): Query<MessageQuery>,
) -> impl IntoResponse {
    RequestFormTemplate {
        title: "Add blood request",
        action: "/add-requester".to_owned(),
        values: RequestForm::default(),
        errors: Vec::new(),
        blood_groups: BloodGroup::ALL,
        messages,
    }
}

/// Handle add-request form submission (admin).
pub async fn add(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Form(form): Form<RequestForm>,
) -> Result<Response, AppError> {
    match form.validate() {
        Ok(request) => {
            BloodRequestRepository::new(state.pool())
                .create(&request, None)
                .await?;
            Ok(
                redirect_with("/dashboard", "success", "Blood request added successfully.")
                    .into_response(),
            )
        }
        Err(errors) => Ok(RequestFormTemplate {
            title: "Add blood request",
            action: "/add-requester".to_owned(),
            values: form,
            errors,
            blood_groups: BloodGroup::ALL,
            messages: MessageQuery::default(),
        }
        .into_response()),
    }
}

// =============================================================================
// Create (requester)
// =============================================================================

/// Display the create-request form for the signed-in requester.
pub async fn create_page(
    RequireRequester(_user): RequireRequester,
    Query(messages): Query<MessageQuery>,
) -> impl IntoResponse {
    RequestFormTemplate {
        title: "New blood request",
        action: "/create-request".to_owned(),
        values: RequestForm::default(),
        errors: Vec::new(),
        blood_groups: BloodGroup::ALL,
        messages,
    }
}

/// Handle create-request submission; the record is linked to the account.
pub async fn create(
    State(state): State<AppState>,
    RequireRequester(user): RequireRequester,
    Form(form): Form<RequestForm>,
) -> Result<Response, AppError> {
    match form.validate() {
        Ok(request) => {
            BloodRequestRepository::new(state.pool())
                .create(&request, Some(user.account_id))
                .await?;
            Ok(redirect_with(
                "/dashboard",
                "success",
                "Your blood request has been created successfully.",
            )
            .into_response())
        }
        Err(errors) => Ok(RequestFormTemplate {
            title: "New blood request",
            action: "/create-request".to_owned(),
            values: form,
            errors,
            blood_groups: BloodGroup::ALL,
            messages: MessageQuery::default(),
        }
        .into_response()),
    }
}

// =============================================================================
// Edit / Delete (admin or owner)
// =============================================================================

/// Whether `user` may manage this request.
fn may_manage(user: &CurrentUser, request: &BloodRequest) -> bool {
    user.role.is_admin() || request.account_id == Some(user.account_id)
}

/// Load the request and enforce the admin-or-owner rule.
async fn load_managed(
    state: &AppState,
    id: BloodRequestId,
    user: &CurrentUser,
) -> Result<BloodRequest, Response> {
    let request = match BloodRequestRepository::new(state.pool()).get(id).await {
        Ok(Some(request)) => request,
        Ok(None) => {
            return Err(AppError::NotFound(format!("blood request {id}")).into_response());
        }
        Err(e) => return Err(AppError::from(e).into_response()),
    };

    if may_manage(user, &request) {
        Ok(request)
    } else {
        Err(redirect_with(
            "/dashboard",
            "error",
            "You do not have permission to manage this request.",
        )
        .into_response())
    }
}

/// Display the edit form for a blood request.
pub async fn edit_page(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
    Query(messages): Query<MessageQuery>,
) -> Response {
    let request = match load_managed(&state, BloodRequestId::new(id), &user).await {
        Ok(request) => request,
        Err(response) => return response,
    };

    RequestFormTemplate {
        title: "Edit blood request",
        action: format!("/requester/edit/{id}"),
        values: RequestForm::from_request(&request),
        errors: Vec::new(),
        blood_groups: BloodGroup::ALL,
        messages,
    }
    .into_response()
}

/// Handle edit form submission.
pub async fn edit(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
    Form(form): Form<RequestForm>,
) -> Response {
    let request = match load_managed(&state, BloodRequestId::new(id), &user).await {
        Ok(request) => request,
        Err(response) => return response,
    };

    match form.validate() {
        Ok(changes) => {
            match BloodRequestRepository::new(state.pool())
                .update(request.id, &changes)
                .await
            {
                Ok(_) => redirect_with(
                    "/dashboard",
                    "success",
                    "Blood request updated successfully.",
                )
                .into_response(),
                Err(e) => AppError::from(e).into_response(),
            }
        }
        Err(errors) => RequestFormTemplate {
            title: "Edit blood request",
            action: format!("/requester/edit/{id}"),
            values: form,
            errors,
            blood_groups: BloodGroup::ALL,
            messages: MessageQuery::default(),
        }
        .into_response(),
    }
}

/// Display the delete confirmation page.
pub async fn delete_page(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
    Query(messages): Query<MessageQuery>,
) -> Response {
    let request = match load_managed(&state, BloodRequestId::new(id), &user).await {
        Ok(request) => request,
        Err(response) => return response,
    };

    RequestDeleteTemplate { request, messages }.into_response()
}

/// Handle the delete confirmation.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
) -> Response {
    let request = match load_managed(&state, BloodRequestId::new(id), &user).await {
        Ok(request) => request,
        Err(response) => return response,
    };

    match BloodRequestRepository::new(state.pool())
        .delete(request.id)
        .await
    {
        Ok(()) => redirect_with("/dashboard", "success", "Blood request deleted successfully.")
            .into_response(),
        Err(e) => AppError::from(e).into_response(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_form() -> RequestForm {
        RequestForm {
            name: "A. Rahman".to_owned(),
            blood_group: "B-".to_owned(),
            phone: "+8801999999".to_owned(),
            reason: "Urgent surgery".to_owned(),
            location: "Dhaka Medical College".to_owned(),
            date_needed: "2026-09-01".to_owned(),
            message: "Please help".to_owned(),
        }
    }

    #[test]
    fn test_validate_ok() {
        let request = valid_form().validate().unwrap();
        assert_eq!(request.blood_group, BloodGroup::BNegative);
        assert_eq!(request.location.as_deref(), Some("Dhaka Medical College"));
        assert_eq!(
            request.date_needed,
            Some(NaiveDate::from_ymd_opt(2026, 9, 1).unwrap())
        );
    }

    #[test]
    fn test_validate_optional_fields_may_be_empty() {
        let mut form = valid_form();
        form.location = String::new();
        form.date_needed = String::new();
        form.message = String::new();
        let request = form.validate().unwrap();
        assert_eq!(request.location, None);
        assert_eq!(request.date_needed, None);
        assert_eq!(request.message, "");
    }

    #[test]
    fn test_validate_rejects_bad_date() {
        let mut form = valid_form();
        form.date_needed = "01/09/2026".to_owned();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors, vec!["Needed-by date must be YYYY-MM-DD.".to_owned()]);
    }

    #[test]
    fn test_validate_collects_every_error() {
        let form = RequestForm::default();
        let errors = form.validate().unwrap_err();
        // name, blood group, phone, reason
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_from_request_roundtrips_through_validate() {
        let parsed = valid_form().validate().unwrap();
        let record = BloodRequest {
            id: BloodRequestId::new(3),
            account_id: None,
            name: parsed.name.clone(),
            blood_group: parsed.blood_group,
            phone: parsed.phone.clone(),
            reason: parsed.reason.clone(),
            location: parsed.location.clone(),
            message: parsed.message.clone(),
            date_needed: parsed.date_needed,
            created_at: chrono::Utc::now(),
        };
        let reparsed = RequestForm::from_request(&record).validate().unwrap();
        assert_eq!(reparsed.date_needed, parsed.date_needed);
        assert_eq!(reparsed.location, parsed.location);
    }
}
