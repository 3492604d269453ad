//! Static page route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::routes::PageContext;

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/about.html")]
pub struct AboutTemplate {
    pub page: PageContext,
}

/// Not-found page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/not_found.html")]
pub struct NotFoundTemplate {
    pub page: PageContext,
    pub path: String,
}

/// Display about page.
#[instrument(skip(session, _auth))]
pub async fn about(RequireAuth(_auth): RequireAuth, session: Session) -> Result<AboutTemplate> {
    Ok(AboutTemplate {
        page: PageContext::load(&session).await?,
    })
}

/// Fallback for unknown paths.
pub async fn not_found(session: Session, uri: Uri) -> Result<Response> {
    render_not_found(&session, uri.path()).await
}

/// Render the not-found page with a 404 status.
///
/// # Errors
///
/// Returns an error if the session cannot be read.
pub async fn render_not_found(session: &Session, path: &str) -> Result<Response> {
    let template = NotFoundTemplate {
        page: PageContext::load(session).await?,
        path: path.to_string(),
    };
    Ok((StatusCode::NOT_FOUND, template).into_response())
}
