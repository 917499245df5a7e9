//! Authentication route handlers.
//!
//! Registration and sign-in are role-scoped: the `{role}` path segment picks
//! the form, and at sign-in the account's stored role must match the path.
//! Registration validates the credential fields and the role profile fields
//! independently and reports every failure at once.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use bloodlink_core::{BloodGroup, Email, Role};

use super::donors::DonorForm;
use super::requests::RequestForm;
use super::{MessageQuery, redirect_with};
use crate::db::{NewBloodRequest, NewDonor};
use crate::error::AppError;
use crate::filters;
use crate::middleware::{clear_session, set_current_user};
use crate::models::{CurrentUser, session_keys};
use crate::services::auth::{AuthError, AuthService, MIN_PASSWORD_LENGTH};
use crate::state::AppState;

/// Longest accepted username.
const MAX_USERNAME_LENGTH: usize = 50;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Registration form data.
///
/// Carries the union of the donor and requester profile fields; which subset
/// is validated depends on the `{role}` path segment. Everything arrives as
/// a string so that a bad value surfaces as a field-level error instead of a
/// deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
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
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub date_needed: String,
    #[serde(default)]
    pub message: String,
}

impl RegisterForm {
    fn donor_fields(&self) -> DonorForm {
        DonorForm {
            name: self.name.clone(),
            age: self.age.clone(),
            blood_group: self.blood_group.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
        }
    }

    fn requester_fields(&self) -> RequestForm {
        RequestForm {
            name: self.name.clone(),
            blood_group: self.blood_group.clone(),
            phone: self.phone.clone(),
            reason: self.reason.clone(),
            location: self.location.clone(),
            date_needed: self.date_needed.clone(),
            message: self.message.clone(),
        }
    }
}

/// The validated role profile carried out of registration validation.
enum Profile {
    Donor(NewDonor),
    Requester(NewBloodRequest),
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub role: Role,
    pub messages: MessageQuery,
}

/// Registration page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub role: Role,
    pub errors: Vec<String>,
    pub form: RegisterForm,
    pub blood_groups: [BloodGroup; 8],
    pub messages: MessageQuery,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page for a role.
pub async fn login_page(
    Path(role): Path<String>,
    session: Session,
    Query(messages): Query<MessageQuery>,
) -> Response {
    let Ok(role) = role.parse::<Role>() else {
        return redirect_with("/", "error", "Unknown role.").into_response();
    };

    // Already signed in: straight to the dashboard.
    let signed_in: Option<CurrentUser> = session
        .get(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten();
    if signed_in.is_some() {
        return redirect_with("/dashboard", "info", "You are already signed in.").into_response();
    }

    LoginTemplate { role, messages }.into_response()
}

/// Handle login form submission.
pub async fn login(
    State(state): State<AppState>,
    Path(role): Path<String>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let Ok(role) = role.parse::<Role>() else {
        return redirect_with("/", "error", "Unknown role.").into_response();
    };
    let login_path = format!("/login/{role}");

    let auth = AuthService::new(state.pool());
    match auth.login(&form.username, &form.password).await {
        Ok(account) if account.role == role => {
            let user = CurrentUser {
                account_id: account.id,
                username: account.username.clone(),
                role: account.role,
            };
            if let Err(e) = set_current_user(&session, &user).await {
                tracing::error!("failed to write session: {e}");
                return redirect_with(&login_path, "error", "Session error, please try again.")
                    .into_response();
            }
            redirect_with(
                "/dashboard",
                "success",
                &format!("Signed in as {}.", account.username),
            )
            .into_response()
        }
        Ok(account) => {
            tracing::warn!(username = %account.username, expected = %role, actual = %account.role, "role mismatch at sign-in");
            redirect_with(
                &login_path,
                "error",
                &format!("Invalid credentials or wrong role for {role} sign-in."),
            )
            .into_response()
        }
        Err(AuthError::InvalidCredentials) => {
            redirect_with(&login_path, "error", "Invalid username or password.").into_response()
        }
        Err(e) => {
            tracing::error!("sign-in failed: {e}");
            redirect_with(&login_path, "error", "Sign-in failed, please try again.")
                .into_response()
        }
    }
}

/// Handle logout: destroy the session.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_session(&session).await {
        tracing::error!("failed to clear session: {e}");
    }
    redirect_with("/", "info", "You have been signed out.").into_response()
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Parse the registration role. Only donors and requesters self-register;
/// admin accounts are provisioned through the CLI.
fn registration_role(role: &str) -> Option<Role> {
    match role.parse::<Role>() {
        Ok(r @ (Role::Donor | Role::Requester)) => Some(r),
        _ => None,
    }
}

/// Display the registration page for a role.
pub async fn register_page(
    Path(role): Path<String>,
    Query(messages): Query<MessageQuery>,
) -> Response {
    let Some(role) = registration_role(&role) else {
        return redirect_with(
            "/",
            "error",
            "Registration is only open to donors and requesters.",
        )
        .into_response();
    };

    RegisterTemplate {
        role,
        errors: Vec::new(),
        form: RegisterForm::default(),
        blood_groups: BloodGroup::ALL,
        messages,
    }
    .into_response()
}

/// Handle registration form submission.
pub async fn register(
    State(state): State<AppState>,
    Path(role): Path<String>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    let Some(role) = registration_role(&role) else {
        return Ok(redirect_with(
            "/",
            "error",
            "Registration is only open to donors and requesters.",
        )
        .into_response());
    };

    // Credential fields and profile fields are validated independently so
    // the user sees every problem at once.
    let mut errors = Vec::new();
    let credentials = validate_credentials(&form, &mut errors);
    let profile = match role {
        Role::Donor => match form.donor_fields().validate() {
            Ok(p) => Some(Profile::Donor(p)),
            Err(mut e) => {
                errors.append(&mut e);
                None
            }
        },
        _ => match form.requester_fields().validate() {
            Ok(p) => Some(Profile::Requester(p)),
            Err(mut e) => {
                errors.append(&mut e);
                None
            }
        },
    };

    if let (Some((username, email)), Some(profile)) = (credentials, profile) {
        let auth = AuthService::new(state.pool());
        let result = match profile {
            Profile::Donor(p) => {
                auth.register_donor(&username, &email, &form.password, &p)
                    .await
            }
            Profile::Requester(p) => {
                auth.register_requester(&username, &email, &form.password, &p)
                    .await
            }
        };

        match result {
            Ok(account) => {
                let user = CurrentUser {
                    account_id: account.id,
                    username: account.username.clone(),
                    role: account.role,
                };
                if let Err(e) = set_current_user(&session, &user).await {
                    tracing::error!("failed to write session after registration: {e}");
                    return Ok(redirect_with(
                        &format!("/login/{role}"),
                        "info",
                        "Account created, please sign in.",
                    )
                    .into_response());
                }
                return Ok(redirect_with(
                    "/dashboard",
                    "success",
                    &format!("Registration successful! Welcome, {}.", account.username),
                )
                .into_response());
            }
            Err(AuthError::UsernameTaken) => {
                errors.push("That username is already taken.".to_owned());
            }
            Err(AuthError::WeakPassword(msg)) => errors.push(msg),
            Err(e) => return Err(e.into()),
        }
    }

    Ok(RegisterTemplate {
        role,
        errors,
        form,
        blood_groups: BloodGroup::ALL,
        messages: MessageQuery::default(),
    }
    .into_response())
}

/// Validate the credential fields, appending every failure to `errors`.
fn validate_credentials(form: &RegisterForm, errors: &mut Vec<String>) -> Option<(String, Email)> {
    let before = errors.len();

    let username = form.username.trim();
    if username.is_empty() {
        errors.push("Username is required.".to_owned());
    } else if username.len() > MAX_USERNAME_LENGTH {
        errors.push(format!(
            "Username must be at most {MAX_USERNAME_LENGTH} characters."
        ));
    }

    let email = match Email::parse(form.email.trim()) {
        Ok(email) => Some(email),
        Err(e) => {
            errors.push(format!("Email: {e}."));
            None
        }
    };

    if form.password.len() < MIN_PASSWORD_LENGTH {
        errors.push(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters."
        ));
    }

    match email {
        Some(email) if errors.len() == before => Some((username.to_owned(), email)),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_form() -> RegisterForm {
        RegisterForm {
            username: "hossain".to_owned(),
            email: "hossain@example.com".to_owned(),
            password: "a sturdy passphrase".to_owned(),
            ..RegisterForm::default()
        }
    }

    #[test]
    fn test_validate_credentials_ok() {
        let mut errors = Vec::new();
        let parsed = validate_credentials(&valid_form(), &mut errors);
        assert!(errors.is_empty());
        let (username, email) = parsed.unwrap();
        assert_eq!(username, "hossain");
        assert_eq!(email.as_str(), "hossain@example.com");
    }

    #[test]
    fn test_validate_credentials_collects_all_errors() {
        let form = RegisterForm {
            username: String::new(),
            email: "not-an-email".to_owned(),
            password: "short".to_owned(),
            ..RegisterForm::default()
        };
        let mut errors = Vec::new();
        assert!(validate_credentials(&form, &mut errors).is_none());
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_validate_credentials_trims_username() {
        let mut form = valid_form();
        form.username = "  hossain  ".to_owned();
        let mut errors = Vec::new();
        let (username, _) = validate_credentials(&form, &mut errors).unwrap();
        assert_eq!(username, "hossain");
    }

    #[test]
    fn test_registration_role_accepts_only_self_service_roles() {
        assert_eq!(registration_role("donor"), Some(Role::Donor));
        assert_eq!(registration_role("requester"), Some(Role::Requester));
        assert_eq!(registration_role("admin"), None);
        assert_eq!(registration_role("superuser"), None);
    }
}
