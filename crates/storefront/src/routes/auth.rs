//! Authentication route handlers.
//!
//! Sign-in, registration and sign-out against the e-commerce API. Form
//! validation runs before any request; API refusals are shown inline.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use freshcart_core::{FieldErrors, LoginDraft, RegistrationDraft};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::LOGIN_PATH;
use crate::routes::PageContext;
use crate::services::notices::{self, Notice};
use crate::services::AuthError;
use crate::state::AppState;

const REGISTERED: &str = "Registration successful!";

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub page: PageContext,
    pub email: String,
    pub errors: FieldErrors,
    pub api_error: Option<String>,
}

/// Registration page template.
///
/// Password fields are never echoed back.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub page: PageContext,
    pub form: RegisterFormView,
    pub errors: FieldErrors,
    pub api_error: Option<String>,
}

/// Non-secret registration fields to refill the form with.
#[derive(Clone, Debug, Default)]
pub struct RegisterFormView {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl From<&RegistrationDraft> for RegisterFormView {
    fn from(draft: &RegistrationDraft) -> Self {
        Self {
            name: draft.name.clone(),
            email: draft.email.clone(),
            phone: draft.phone.clone(),
        }
    }
}

// =============================================================================
// Login
// =============================================================================

/// Display login page.
#[instrument(skip(session))]
pub async fn login_page(session: Session) -> Result<LoginTemplate> {
    Ok(LoginTemplate {
        page: PageContext::load(&session).await?,
        email: String::new(),
        errors: FieldErrors::new(),
        api_error: None,
    })
}

/// Handle login form submission.
///
/// On success the cart is fetched once to seed the badge count.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginDraft>,
) -> Result<Response> {
    let (status, errors, api_error) = match state.auth(&session).sign_in(&form).await {
        Ok(auth) => {
            state.cart(&session, &auth.token).fetch().await?;
            return Ok(Redirect::to("/").into_response());
        }
        Err(AuthError::Invalid(errors)) => (StatusCode::UNPROCESSABLE_ENTITY, errors, None),
        Err(AuthError::Rejected(e)) => (
            StatusCode::OK,
            FieldErrors::new(),
            Some(e.detailed_message()),
        ),
        Err(AuthError::Session(e)) => return Err(AppError::Session(e)),
    };

    let template = LoginTemplate {
        page: PageContext::load(&session).await?,
        email: form.email,
        errors,
        api_error,
    };
    Ok((status, template).into_response())
}

// =============================================================================
// Registration
// =============================================================================

/// Display registration page.
#[instrument(skip(session))]
pub async fn register_page(session: Session) -> Result<RegisterTemplate> {
    Ok(RegisterTemplate {
        page: PageContext::load(&session).await?,
        form: RegisterFormView::default(),
        errors: FieldErrors::new(),
        api_error: None,
    })
}

/// Handle registration form submission.
#[instrument(skip(state, session, form))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegistrationDraft>,
) -> Result<Response> {
    let (status, errors, api_error) = match state.auth(&session).register(&form).await {
        Ok(_) => {
            notices::push(&session, Notice::success(REGISTERED)).await?;
            return Ok(Redirect::to(LOGIN_PATH).into_response());
        }
        Err(AuthError::Invalid(errors)) => (StatusCode::UNPROCESSABLE_ENTITY, errors, None),
        Err(AuthError::Rejected(e)) => (
            StatusCode::OK,
            FieldErrors::new(),
            Some(e.status_message()),
        ),
        Err(AuthError::Session(e)) => return Err(AppError::Session(e)),
    };

    let template = RegisterTemplate {
        page: PageContext::load(&session).await?,
        form: RegisterFormView::from(&form),
        errors,
        api_error,
    };
    Ok((status, template).into_response())
}

// =============================================================================
// Logout
// =============================================================================

/// Handle logout.
#[instrument(skip(state, session))]
pub async fn logout(State(state): State<AppState>, session: Session) -> Result<Redirect> {
    state.auth(&session).sign_out().await?;
    Ok(Redirect::to(LOGIN_PATH))
}
