//! Landing page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::Query;
use axum::response::IntoResponse;

use super::MessageQuery;
use crate::filters;

/// Landing page template with the role choices.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub messages: MessageQuery,
}

/// Display the landing page.
pub async fn home(Query(messages): Query<MessageQuery>) -> impl IntoResponse {
    HomeTemplate { messages }
}
