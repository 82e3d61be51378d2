//! Login flow.
//!
//! `GET /login` asks the authorization server about the challenge. If it already
//! knows the subject (`skip`), the subject is re-checked against the credential
//! store and the challenge is accepted or rejected without user interaction.
//! Otherwise the login form is shown, and `POST /login` decides once the user has
//! submitted valid credentials or cancelled.

use crate::AppState;
use crate::admin::FlowKind;
use crate::error::{FlowError, StoreError};
use crate::flows::{FLOWS_TAG, redirect, require_challenge};
use axum::{
    Form,
    extract::{Query, State},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::Span;
use utoipa::ToSchema;

pub const ALERT_MISSING_CREDENTIALS: &str = "Username or Password not set.";

/// Query parameters for the login page.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub login_challenge: Option<String>,
}

/// Form data for login submission.
#[derive(Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginForm {
    /// `cancel` aborts the login, anything else is a login attempt.
    pub submit: String,
    pub challenge: String,
    pub username: String,
    pub password: String,
}

/// Resolve a login challenge.
#[tracing::instrument(
    skip_all,
    fields(route = "/login", method = "GET", challenge_present = tracing::field::Empty)
)]
#[utoipa::path(
    get,
    path = "/login",
    tag = FLOWS_TAG,
    operation_id = "Login Challenge",
    summary = "Resolve a login challenge",
    description = "Looks up the login challenge at the authorization server. If the subject is already \
                   known it is re-validated against the credential store and the challenge is accepted \
                   or rejected right away; otherwise the login form is rendered.",
    params(
        ("login_challenge" = String, Query, description = "Login challenge issued by the authorization server."),
    ),
    responses(
        (status = 200, description = "Login form HTML", content_type = "text/html"),
        (status = 307, description = "Redirect back to the authorization server"),
        (status = 400, description = "Missing login challenge"),
        (status = 500, description = "Admin API or credential store failure"),
    )
)]
pub async fn login_page(
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
) -> Result<Response, FlowError> {
    Span::current().record(
        "challenge_present",
        query.login_challenge.as_deref().is_some_and(|c| !c.is_empty()),
    );
    let challenge = require_challenge(query.login_challenge, FlowKind::Login)?;

    let request = state.admin.get_login_request(&challenge).await?;
    if !request.skip {
        return render_form(&state, &challenge, "").await;
    }

    // The authorization server remembers the subject; make sure it still exists.
    match state.store.find_by_id(&request.subject).await {
        Ok(user) => {
            tracing::info!(subject = %user.id, "Remembered subject still exists, accepting login");
            accept(&state, &challenge, &user.id).await
        }
        Err(StoreError::NotFound(_)) => {
            tracing::info!(
                subject = %request.subject,
                "Remembered subject no longer exists, rejecting login"
            );
            reject(
                &state,
                &challenge,
                "user_notfound",
                &format!("unable to find user with id: {}", request.subject),
            )
            .await
        }
        Err(e) => Err(e.into()),
    }
}

/// Handle login form submission.
#[tracing::instrument(
    skip_all,
    fields(route = "/login", method = "POST", challenge_present = tracing::field::Empty)
)]
#[utoipa::path(
    post,
    path = "/login",
    tag = FLOWS_TAG,
    operation_id = "Login Submit",
    summary = "Submit login credentials",
    description = "Validates the submitted username and password. Valid credentials accept the login \
                   challenge; `submit=cancel` rejects it. Missing or wrong credentials re-render the form \
                   with an alert and leave the challenge undecided.",
    request_body(
        content = LoginForm,
        content_type = "application/x-www-form-urlencoded",
        description = "Login credentials and the challenge being answered"
    ),
    responses(
        (status = 200, description = "Login form HTML with an alert", content_type = "text/html"),
        (status = 307, description = "Redirect back to the authorization server"),
        (status = 400, description = "Missing challenge"),
        (status = 500, description = "Admin API or credential store failure"),
    )
)]
pub async fn login_submit(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, FlowError> {
    Span::current().record("challenge_present", !form.challenge.is_empty());

    if form.submit == "cancel" {
        tracing::info!("Login cancelled by user");
        return reject(
            &state,
            &form.challenge,
            "cancelled",
            "login was cancelled by the user",
        )
        .await;
    }

    if form.username.is_empty() || form.password.is_empty() {
        return render_form(&state, &form.challenge, ALERT_MISSING_CREDENTIALS).await;
    }

    let user = match state.store.find_by_login_name(&form.username).await {
        Ok(user) => user,
        Err(StoreError::NotFound(_)) => {
            tracing::debug!("Unknown login name submitted");
            return render_form(
                &state,
                &form.challenge,
                &format!("User '{}' not found.", form.username),
            )
            .await;
        }
        Err(e) => return Err(e.into()),
    };

    match state.store.verify_password(&user, &form.password) {
        Ok(()) => {}
        Err(StoreError::Mismatch) => {
            tracing::debug!(subject = %user.id, "Invalid password submitted");
            return render_form(
                &state,
                &form.challenge,
                &format!("Invalid password for user '{}'.", form.username),
            )
            .await;
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!(subject = %user.id, "User authenticated, accepting login");
    accept(&state, &form.challenge, &user.id).await
}

async fn render_form(
    state: &AppState,
    challenge: &str,
    alert: &str,
) -> Result<Response, FlowError> {
    let html = state.renderer.render(challenge, alert).await?;
    Ok(Html(html).into_response())
}

async fn accept(state: &AppState, challenge: &str, subject: &str) -> Result<Response, FlowError> {
    let done = state.admin.accept_login_request(challenge, subject).await?;
    Ok(redirect(done))
}

async fn reject(
    state: &AppState,
    challenge: &str,
    error_id: &str,
    error_description: &str,
) -> Result<Response, FlowError> {
    let done = state
        .admin
        .reject_login_request(challenge, error_id, error_description)
        .await?;
    Ok(redirect(done))
}
