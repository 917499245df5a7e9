//! Donor CRUD route handlers.
//!
//! Adding and deleting donors is an admin operation; editing is open to the
//! admin and to the donor who owns the profile.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use bloodlink_core::{BloodGroup, DonorId};

use super::{MessageQuery, redirect_with};
use crate::db::{DonorRepository, NewDonor};
use crate::error::AppError;
use crate::filters;
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::{CurrentUser, Donor};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Raw donor form fields as submitted.
///
/// Everything is a string so that a bad value becomes a field-level error
/// instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DonorForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub blood_group: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

impl DonorForm {
    /// Prefill from an existing profile for the edit form.
    #[must_use]
    pub fn from_donor(donor: &Donor) -> Self {
        Self {
            name: donor.name.clone(),
            age: donor.age.to_string(),
            blood_group: donor.blood_group.as_str().to_owned(),
            phone: donor.phone.clone(),
            address: donor.address.clone(),
        }
    }

    /// Validate into an insertable profile, collecting every field error.
    ///
    /// # Errors
    ///
    /// Returns the full list of field-level messages when any field is
    /// invalid.
    pub fn validate(&self) -> Result<NewDonor, Vec<String>> {
        let mut errors = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push("Name is required.".to_owned());
        }

        let age = match self.age.trim().parse::<i32>() {
            Ok(age) if (1..=120).contains(&age) => Some(age),
            Ok(_) => {
                errors.push("Age must be between 1 and 120.".to_owned());
                None
            }
            Err(_) => {
                errors.push("Age must be a whole number.".to_owned());
                None
            }
        };

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
        if self.address.trim().is_empty() {
            errors.push("Address is required.".to_owned());
        }

        match (age, blood_group) {
            (Some(age), Some(blood_group)) if errors.is_empty() => Ok(NewDonor {
                name: name.to_owned(),
                age,
                blood_group,
                phone: self.phone.trim().to_owned(),
                address: self.address.trim().to_owned(),
            }),
            _ => Err(errors),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Donor add/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "donors/form.html")]
pub struct DonorFormTemplate {
    pub title: &'static str,
    pub action: String,
    pub values: DonorForm,
    pub errors: Vec<String>,
    pub blood_groups: [BloodGroup; 8],
    pub messages: MessageQuery,
}

/// Donor delete confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "donors/delete_confirm.html")]
pub struct DonorDeleteTemplate {
    pub donor: Donor,
    pub messages: MessageQuery,
}

// =============================================================================
// Add (admin)
// =============================================================================

/// Display the add-donor form.
pub async fn add_page(
    RequireAdmin(_user): RequireAdmin,
    Query(messages): Query<MessageQuery>,
) -> impl IntoResponse {
    DonorFormTemplate {
        title: "Add donor",
        action: "/add-donor".to_owned(),
        values: DonorForm::default(),
        errors: Vec::new(),
        blood_groups: BloodGroup::ALL,
        messages,
    }
}

/// Handle add-donor form submission.
pub async fn add(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Form(form): Form<DonorForm>,
) -> Result<Response, AppError> {
    match form.validate() {
        Ok(profile) => {
            DonorRepository::new(state.pool())
                .create(&profile, None)
                .await?;
            Ok(redirect_with("/dashboard", "success", "Donor added successfully.").into_response())
        }
        Err(errors) => Ok(DonorFormTemplate {
            title: "Add donor",
            action: "/add-donor".to_owned(),
            values: form,
            errors,
            blood_groups: BloodGroup::ALL,
            messages: MessageQuery::default(),
        }
        .into_response()),
    }
}

// =============================================================================
// Edit (admin or owner)
// =============================================================================

/// Whether `user` may manage this donor record.
fn may_manage(user: &CurrentUser, donor: &Donor) -> bool {
    user.role.is_admin() || donor.account_id == Some(user.account_id)
}

/// Load the donor and enforce the admin-or-owner rule.
async fn load_managed(
    state: &AppState,
    id: DonorId,
    user: &CurrentUser,
) -> Result<Donor, Response> {
    let donor = match DonorRepository::new(state.pool()).get(id).await {
        Ok(Some(donor)) => donor,
        Ok(None) => {
            return Err(AppError::NotFound(format!("donor {id}")).into_response());
        }
        Err(e) => return Err(AppError::from(e).into_response()),
    };

    if may_manage(user, &donor) {
        Ok(donor)
    } else {
        Err(
            redirect_with(
                "/dashboard",
                "error",
                "You do not have permission to manage this donor.",
            )
            .into_response(),
        )
    }
}

/// Display the edit form for a donor.
pub async fn edit_page(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
    Query(messages): Query<MessageQuery>,
) -> Response {
    let donor = match load_managed(&state, DonorId::new(id), &user).await {
        Ok(donor) => donor,
        Err(response) => return response,
    };

    DonorFormTemplate {
        title: "Edit donor",
        action: format!("/edit-donor/{id}"),
        values: DonorForm::from_donor(&donor),
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
    Form(form): Form<DonorForm>,
) -> Response {
    let donor = match load_managed(&state, DonorId::new(id), &user).await {
        Ok(donor) => donor,
        Err(response) => return response,
    };

    match form.validate() {
        Ok(profile) => {
            match DonorRepository::new(state.pool())
                .update(donor.id, &profile)
                .await
            {
                Ok(_) => redirect_with("/dashboard", "success", "Donor updated successfully.")
                    .into_response(),
                Err(e) => AppError::from(e).into_response(),
            }
        }
        Err(errors) => DonorFormTemplate {
            title: "Edit donor",
            action: format!("/edit-donor/{id}"),
            values: form,
            errors,
            blood_groups: BloodGroup::ALL,
            messages: MessageQuery::default(),
        }
        .into_response(),
    }
}

// =============================================================================
// Delete (admin)
// =============================================================================

/// Display the delete confirmation page.
pub async fn delete_page(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<i32>,
    Query(messages): Query<MessageQuery>,
) -> Result<Response, AppError> {
    let donor = DonorRepository::new(state.pool())
        .get(DonorId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("donor {id}")))?;

    Ok(DonorDeleteTemplate { donor, messages }.into_response())
}

/// Handle the delete confirmation.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    DonorRepository::new(state.pool())
        .delete(DonorId::new(id))
        .await?;

    Ok(redirect_with("/dashboard", "success", "Donor deleted successfully.").into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_form() -> DonorForm {
        DonorForm {
            name: "MD. Hossain".to_owned(),
            age: "25".to_owned(),
            blood_group: "O+".to_owned(),
            phone: "+8801000000".to_owned(),
            address: "Dhaka".to_owned(),
        }
    }

    #[test]
    fn test_validate_ok() {
        let profile = valid_form().validate().unwrap();
        assert_eq!(profile.name, "MD. Hossain");
        assert_eq!(profile.age, 25);
        assert_eq!(profile.blood_group, BloodGroup::OPositive);
    }

    #[test]
    fn test_validate_accepts_lowercase_blood_group() {
        let mut form = valid_form();
        form.blood_group = "ab-".to_owned();
        assert_eq!(
            form.validate().unwrap().blood_group,
            BloodGroup::AbNegative
        );
    }

    #[test]
    fn test_validate_collects_every_error() {
        let form = DonorForm {
            name: String::new(),
            age: "abc".to_owned(),
            blood_group: "Z+".to_owned(),
            phone: String::new(),
            address: String::new(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn test_validate_rejects_out_of_range_age() {
        let mut form = valid_form();
        form.age = "300".to_owned();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors, vec!["Age must be between 1 and 120.".to_owned()]);
    }

    #[test]
    fn test_from_donor_roundtrips_through_validate() {
        let profile = valid_form().validate().unwrap();
        let donor = Donor {
            id: DonorId::new(1),
            account_id: None,
            name: profile.name.clone(),
            age: profile.age,
            blood_group: profile.blood_group,
            phone: profile.phone.clone(),
            address: profile.address.clone(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let reparsed = DonorForm::from_donor(&donor).validate().unwrap();
        assert_eq!(reparsed.name, profile.name);
        assert_eq!(reparsed.blood_group, profile.blood_group);
    }
}
