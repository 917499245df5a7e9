//! Integration tests for registration, login and the role gate.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database
//! - A running bloodlink-web server (`cargo run -p bloodlink-web`)
//!
//! Run with: `cargo test -p bloodlink-integration-tests -- --ignored`

use bloodlink_integration_tests::{base_url, client, manual_redirect_client, sign_in};
use reqwest::{Client, StatusCode};
use uuid::Uuid;

/// Register a donor account through the form, returning the credentials.
async fn register_donor(client: &Client) -> (String, String) {
    let username = format!("donor-{}", Uuid::new_v4());
    let password = "integration-pass-1".to_string();
    let email = format!("{username}@example.com");

    let resp = client
        .post(format!("{}/register/donor", base_url()))
        .form(&[
            ("username", username.as_str()),
            ("email", email.as_str()),
            ("password", password.as_str()),
            ("name", "Integration Donor"),
            ("age", "30"),
            ("blood_group", "O+"),
            ("phone", "+8801700000000"),
            ("address", "Test Lane 1, Dhaka"),
        ])
        .send()
        .await
        .expect("Failed to register donor");

    assert!(
        resp.status().is_success(),
        "registration returned {}",
        resp.status()
    );
    (username, password)
}

#[tokio::test]
#[ignore = "Requires running bloodlink-web server and PostgreSQL"]
async fn test_role_gated_path_redirects_when_signed_out() {
    let client = manual_redirect_client();

    for path in ["/dashboard", "/add-donor", "/search", "/create-request"] {
        let resp = client
            .get(format!("{}{path}", base_url()))
            .send()
            .await
            .expect("Failed to request gated path");

        assert!(
            resp.status().is_redirection(),
            "{path} returned {} instead of a redirect",
            resp.status()
        );
        let location = resp
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        assert!(
            location.starts_with("/?error="),
            "{path} redirected to {location}"
        );
    }
}

#[tokio::test]
#[ignore = "Requires running bloodlink-web server and PostgreSQL"]
async fn test_register_rejects_unknown_and_admin_roles() {
    let client = manual_redirect_client();

    for role in ["admin", "superuser", "Donor"] {
        let resp = client
            .get(format!("{}/register/{role}", base_url()))
            .send()
            .await
            .expect("Failed to request register page");

        assert!(
            resp.status().is_redirection(),
            "register/{role} returned {}",
            resp.status()
        );
    }
}

#[tokio::test]
#[ignore = "Requires running bloodlink-web server and PostgreSQL"]
async fn test_donor_registration_signs_in_and_shows_dashboard() {
    let client = client();
    let (_username, _password) = register_donor(&client).await;

    // Registration starts a session; the dashboard should render the donor
    // view straight away.
    let resp = client
        .get(format!("{}/dashboard", base_url()))
        .send()
        .await
        .expect("Failed to load dashboard");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read dashboard");
    assert!(body.contains("Integration Donor"));
    assert!(body.contains("Pending donation requests"));
}

#[tokio::test]
#[ignore = "Requires running bloodlink-web server and PostgreSQL"]
async fn test_invalid_registration_leaves_no_account() {
    let client = client();
    let username = format!("broken-{}", Uuid::new_v4());
    let email = format!("{username}@example.com");

    // Bad age: the form re-renders with field errors instead of redirecting.
    let resp = client
        .post(format!("{}/register/donor", base_url()))
        .form(&[
            ("username", username.as_str()),
            ("email", email.as_str()),
            ("password", "integration-pass-1"),
            ("name", "Broken Donor"),
            ("age", "not-a-number"),
            ("blood_group", "O+"),
            ("phone", "+8801700000000"),
            ("address", "Test Lane 1"),
        ])
        .send()
        .await
        .expect("Failed to submit registration");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Age must be a whole number."));

    // No account was created, so signing in with those credentials fails.
    let login = manual_redirect_client();
    let resp = login
        .post(format!("{}/login/donor", base_url()))
        .form(&[
            ("username", username.as_str()),
            ("password", "integration-pass-1"),
        ])
        .send()
        .await
        .expect("Failed to submit login");

    let location = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(
        location.starts_with("/login/donor?error="),
        "expected login error redirect, got {location}"
    );
}

#[tokio::test]
#[ignore = "Requires running bloodlink-web server and PostgreSQL"]
async fn test_login_with_wrong_role_is_rejected() {
    let registered = client();
    let (username, password) = register_donor(&registered).await;

    // A donor credential on the requester login form must not start a
    // requester session.
    let login = manual_redirect_client();
    let resp = login
        .post(format!("{}/login/requester", base_url()))
        .form(&[("username", username.as_str()), ("password", password.as_str())])
        .send()
        .await
        .expect("Failed to submit login");

    let location = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(
        location.starts_with("/login/requester?error="),
        "expected role mismatch redirect, got {location}"
    );
}

#[tokio::test]
#[ignore = "Requires running bloodlink-web server and PostgreSQL"]
async fn test_donor_login_happy_path() {
    let registered = client();
    let (username, password) = register_donor(&registered).await;

    let fresh = client();
    sign_in(&fresh, "donor", &username, &password).await;

    let resp = fresh
        .get(format!("{}/dashboard", base_url()))
        .send()
        .await
        .expect("Failed to load dashboard");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read dashboard");
    assert!(body.contains("Your profile"));
}
