//! Integration tests for the admin blood-group search.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database
//! - A running bloodlink-web server
//! - `BLOODLINK_TEST_ADMIN_USERNAME` / `BLOODLINK_TEST_ADMIN_PASSWORD`
//!   pointing at an account created via `bloodlink admin create`
//!
//! Run with: `cargo test -p bloodlink-integration-tests -- --ignored`

use bloodlink_integration_tests::{admin_credentials, base_url, client, sign_in};
use reqwest::StatusCode;
use uuid::Uuid;

#[tokio::test]
#[ignore = "Requires running bloodlink-web server, PostgreSQL and admin credentials"]
async fn test_search_is_case_insensitive_exact_match() {
    let Some((admin_username, admin_password)) = admin_credentials() else {
        return; // No admin account configured for this environment.
    };

    // Register a donor with a unique name and an uncommon group.
    let donor_name = format!("Searchable {}", Uuid::new_v4());
    let donor_username = format!("donor-{}", Uuid::new_v4());
    let donor_email = format!("{donor_username}@example.com");
    let donor = client();
    let resp = donor
        .post(format!("{}/register/donor", base_url()))
        .form(&[
            ("username", donor_username.as_str()),
            ("email", donor_email.as_str()),
            ("password", "integration-pass-1"),
            ("name", donor_name.as_str()),
            ("age", "27"),
            ("blood_group", "AB-"),
            ("phone", "+8801700000042"),
            ("address", "Search Street 9"),
        ])
        .send()
        .await
        .expect("Failed to register donor");
    assert!(resp.status().is_success());

    let admin = client();
    sign_in(&admin, "admin", &admin_username, &admin_password).await;

    // Lower-case and canonical spellings must return the same donor.
    for query in ["ab-", "AB-", " Ab- "] {
        let resp = admin
            .get(format!("{}/search", base_url()))
            .query(&[("q", query)])
            .send()
            .await
            .expect("Failed to search");
        assert_eq!(resp.status(), StatusCode::OK);
        let body = resp.text().await.expect("Failed to read search results");
        assert!(
            body.contains(&donor_name),
            "search for {query:?} did not find the donor"
        );
    }

    // A different group excludes the donor.
    let resp = admin
        .get(format!("{}/search", base_url()))
        .query(&[("q", "O+")])
        .send()
        .await
        .expect("Failed to search");
    let body = resp.text().await.expect("Failed to read search results");
    assert!(!body.contains(&donor_name));
}

#[tokio::test]
#[ignore = "Requires running bloodlink-web server, PostgreSQL and admin credentials"]
async fn test_search_rejects_non_blood_group_queries() {
    let Some((admin_username, admin_password)) = admin_credentials() else {
        return;
    };

    let admin = client();
    sign_in(&admin, "admin", &admin_username, &admin_password).await;

    let resp = admin
        .get(format!("{}/search", base_url()))
        .query(&[("q", "universal")])
        .send()
        .await
        .expect("Failed to search");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read search results");
    assert!(body.contains("is not a blood group"));
}
