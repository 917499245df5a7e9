//! Integration test helpers for Bloodlink.
//!
//! The actual tests live in `tests/`. They drive a running server over
//! HTTP and are `#[ignore]`d by default:
//!
//! ```bash
//! # Requires a migrated database and a running bloodlink-web instance
//! cargo test -p bloodlink-integration-tests -- --ignored
//! ```
//!
//! Environment:
//! - `BLOODLINK_BASE_URL` - server under test (default: `http://localhost:3000`)
//! - `BLOODLINK_TEST_ADMIN_USERNAME` / `BLOODLINK_TEST_ADMIN_PASSWORD` -
//!   admin credentials (created via `bloodlink admin create`); admin-gated
//!   tests skip themselves when these are unset.

#![cfg_attr(not(test), forbid(unsafe_code))]

use reqwest::{Client, redirect::Policy};

/// Base URL of the server under test.
#[must_use]
pub fn base_url() -> String {
    std::env::var("BLOODLINK_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// A client with a cookie store that follows redirects.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// A client with a cookie store that does NOT follow redirects, for
/// asserting on redirect responses themselves.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn manual_redirect_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// Admin credentials from the environment, or `None` to skip admin tests.
#[must_use]
pub fn admin_credentials() -> Option<(String, String)> {
    let username = std::env::var("BLOODLINK_TEST_ADMIN_USERNAME").ok()?;
    let password = std::env::var("BLOODLINK_TEST_ADMIN_PASSWORD").ok()?;
    Some((username, password))
}

/// Sign a client in as the given role via the login form.
///
/// # Panics
///
/// Panics if the request fails outright.
pub async fn sign_in(client: &Client, role: &str, username: &str, password: &str) {
    let resp = client
        .post(format!("{}/login/{role}", base_url()))
        .form(&[("username", username), ("password", password)])
        .send()
        .await
        .expect("Failed to submit login form");
    assert!(
        resp.status().is_success() || resp.status().is_redirection(),
        "login returned {}",
        resp.status()
    );
}

/// Extract the substring between `start` and `end`, if both occur in order.
#[must_use]
pub fn extract_between<'a>(haystack: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let begin = haystack.find(start)? + start.len();
    let rest = haystack.get(begin..)?;
    let stop = rest.find(end)?;
    rest.get(..stop)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_between() {
        let html = r#"<a href="/request/42/accept">Accept</a>"#;
        assert_eq!(
            extract_between(html, "/request/", "/accept"),
            Some("42")
        );
        assert_eq!(extract_between(html, "/missing/", "/accept"), None);
    }
}
