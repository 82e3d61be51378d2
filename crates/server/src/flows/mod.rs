//! Flow handlers the authorization server redirects the browser to.
//!
//! ## Endpoints
//!
//! - `GET /login` - resolve a login challenge (skip or show the form)
//! - `POST /login` - validate submitted credentials, accept or reject
//! - `GET /consent` - auto-accept a consent challenge
//! - `GET /logout` - auto-accept a logout challenge
//!
//! Every decided challenge ends in a `307` redirect to the URL returned by the
//! admin API.

pub mod consent;
pub mod login;
pub mod logout;

use crate::AppState;
use crate::admin::{CompletedRequest, FlowKind};
use crate::error::FlowError;
use axum::response::{IntoResponse, Redirect, Response};
use utoipa_axum::{router::OpenApiRouter, routes};

/// OpenAPI tag for the flow endpoints
pub const FLOWS_TAG: &str = "Flows";

/// Creates the router for all three flows.
pub fn router(state: AppState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(login::login_page, login::login_submit))
        .routes(routes!(consent::consent))
        .routes(routes!(logout::logout))
        .with_state(state)
}

/// Returns the challenge, or a 400 if the query parameter was absent or empty.
fn require_challenge(value: Option<String>, flow: FlowKind) -> Result<String, FlowError> {
    match value {
        Some(challenge) if !challenge.is_empty() => Ok(challenge),
        _ => Err(FlowError::MissingChallenge(flow.challenge_param())),
    }
}

fn redirect(done: CompletedRequest) -> Response {
    Redirect::temporary(&done.redirect_to).into_response()
}
