//! Donor search and matching (admin).
//!
//! Matching is exact equality on blood group, case-insensitive at the
//! parsing boundary. No compatibility logic (O- is not treated as a
//! universal donor).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use bloodlink_core::{BloodGroup, BloodRequestId};

use super::MessageQuery;
use crate::db::{BloodRequestRepository, DonorRepository};
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::{BloodRequest, Donor};
use crate::state::AppState;

/// Search query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// Search results template.
#[derive(Template, WebTemplate)]
#[template(path = "search/results.html")]
pub struct SearchTemplate {
    pub query: String,
    pub searched: bool,
    pub donors: Vec<Donor>,
    pub hint: Option<String>,
    pub messages: MessageQuery,
}

/// Matching donors for one request template.
#[derive(Template, WebTemplate)]
#[template(path = "search/find_donors.html")]
pub struct FindDonorsTemplate {
    pub request: BloodRequest,
    pub donors: Vec<Donor>,
    pub messages: MessageQuery,
}

/// Search donors by blood group (`/search?q=`).
pub async fn search(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Query(params): Query<SearchParams>,
    Query(messages): Query<MessageQuery>,
) -> Result<Response, AppError> {
    let query = params.q.unwrap_or_default();
    let trimmed = query.trim();

    if trimmed.is_empty() {
        return Ok(SearchTemplate {
            query,
            searched: false,
            donors: Vec::new(),
            hint: None,
            messages,
        }
        .into_response());
    }

    let (donors, hint) = match trimmed.parse::<BloodGroup>() {
        Ok(group) => (
            DonorRepository::new(state.pool())
                .find_by_blood_group(group)
                .await?,
            None,
        ),
        Err(_) => (
            Vec::new(),
            Some(format!(
                "\"{trimmed}\" is not a blood group. Try one of A+, A-, B+, B-, O+, O-, AB+, AB-."
            )),
        ),
    };

    Ok(SearchTemplate {
        query,
        searched: true,
        donors,
        hint,
        messages,
    }
    .into_response())
}

/// List donors whose blood group matches a request's.
pub async fn find_donors(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<i32>,
    Query(messages): Query<MessageQuery>,
) -> Result<Response, AppError> {
    let request = BloodRequestRepository::new(state.pool())
        .get(BloodRequestId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("blood request {id}")))?;

    let donors = DonorRepository::new(state.pool())
        .find_by_blood_group(request.blood_group)
        .await?;

    Ok(FindDonorsTemplate {
        request,
        donors,
        messages,
    }
    .into_response())
}
