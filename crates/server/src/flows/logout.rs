//! Logout flow. Every logout request is accepted.

use crate::AppState;
use crate::admin::FlowKind;
use crate::error::FlowError;
use crate::flows::{FLOWS_TAG, redirect, require_challenge};
use axum::{
    extract::{Query, State},
    response::Response,
};
use serde::Deserialize;
use tracing::Span;

/// Query parameters for the logout endpoint.
#[derive(Debug, Deserialize)]
pub struct LogoutQuery {
    pub logout_challenge: Option<String>,
}

#[tracing::instrument(
    skip_all,
    fields(route = "/logout", challenge_present = tracing::field::Empty)
)]
#[utoipa::path(
    get,
    path = "/logout",
    tag = FLOWS_TAG,
    operation_id = "Logout Challenge",
    summary = "Auto-accept a logout challenge",
    description = "Confirms the logout challenge is known to the authorization server, then accepts it.",
    params(
        ("logout_challenge" = String, Query, description = "Logout challenge issued by the authorization server."),
    ),
    responses(
        (status = 307, description = "Redirect back to the authorization server"),
        (status = 400, description = "Missing logout challenge"),
        (status = 500, description = "Admin API failure"),
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    Query(query): Query<LogoutQuery>,
) -> Result<Response, FlowError> {
    Span::current().record(
        "challenge_present",
        query.logout_challenge.as_deref().is_some_and(|c| !c.is_empty()),
    );
    let challenge = require_challenge(query.logout_challenge, FlowKind::Logout)?;

    let request = state.admin.get_logout_request(&challenge).await?;
    tracing::info!(
        subject = %request.subject,
        rp_initiated = request.rp_initiated,
        "Accepting logout"
    );

    let done = state.admin.accept_logout_request(&challenge).await?;
    Ok(redirect(done))
}
