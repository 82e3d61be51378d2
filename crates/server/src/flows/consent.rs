//! Consent flow. Clients of this deployment are trusted, so every consent request
//! is granted with exactly the scope and audience it asked for.

use crate::AppState;
use crate::admin::{AcceptConsent, FlowKind};
use crate::error::FlowError;
use crate::flows::{FLOWS_TAG, redirect, require_challenge};
use axum::{
    extract::{Query, State},
    response::Response,
};
use serde::Deserialize;
use tracing::Span;

/// Query parameters for the consent endpoint.
#[derive(Debug, Deserialize)]
pub struct ConsentQuery {
    pub consent_challenge: Option<String>,
}

#[tracing::instrument(
    skip_all,
    fields(route = "/consent", challenge_present = tracing::field::Empty)
)]
#[utoipa::path(
    get,
    path = "/consent",
    tag = FLOWS_TAG,
    operation_id = "Consent Challenge",
    summary = "Auto-accept a consent challenge",
    description = "Fetches the consent challenge and immediately accepts it, granting the requested \
                   scope and audience unchanged.",
    params(
        ("consent_challenge" = String, Query, description = "Consent challenge issued by the authorization server."),
    ),
    responses(
        (status = 307, description = "Redirect back to the authorization server"),
        (status = 400, description = "Missing consent challenge"),
        (status = 500, description = "Admin API failure"),
    )
)]
pub async fn consent(
    State(state): State<AppState>,
    Query(query): Query<ConsentQuery>,
) -> Result<Response, FlowError> {
    Span::current().record(
        "challenge_present",
        query.consent_challenge.as_deref().is_some_and(|c| !c.is_empty()),
    );
    let challenge = require_challenge(query.consent_challenge, FlowKind::Consent)?;

    let request = state.admin.get_consent_request(&challenge).await?;
    tracing::info!(
        subject = %request.subject,
        client_id = request.client.as_ref().map(|c| c.client_id.as_str()).unwrap_or_default(),
        scope = ?request.requested_scope,
        audience = ?request.requested_access_token_audience,
        "Granting consent"
    );

    let done = state
        .admin
        .accept_consent_request(&challenge, &AcceptConsent::grant_all(&request))
        .await?;
    Ok(redirect(done))
}
