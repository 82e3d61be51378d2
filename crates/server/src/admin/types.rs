//! Wire types exchanged with the authorization server's admin API.

use serde::{Deserialize, Serialize};

/// How long the authorization server should remember an accepted decision.
pub const REMEMBER_FOR_SECS: u64 = 7200;

/// Client information attached to login and consent requests.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientSummary {
    pub client_id: String,
    pub client_name: String,
}

/// Descriptor returned when fetching a login challenge.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub challenge: String,
    /// The authorization server already knows the subject.
    pub skip: bool,
    pub subject: String,
    pub client: Option<ClientSummary>,
    pub request_url: String,
    pub requested_scope: Vec<String>,
}

/// Descriptor returned when fetching a consent challenge.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConsentRequest {
    pub challenge: String,
    pub skip: bool,
    pub subject: String,
    pub client: Option<ClientSummary>,
    pub requested_scope: Vec<String>,
    pub requested_access_token_audience: Vec<String>,
}

/// Descriptor returned when fetching a logout challenge.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogoutRequest {
    pub subject: String,
    pub sid: String,
    pub request_url: String,
    pub rp_initiated: bool,
}

/// Response to every accept/reject call.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CompletedRequest {
    pub redirect_to: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AcceptLogin {
    pub remember: bool,
    pub remember_for: u64,
    pub subject: String,
}

impl AcceptLogin {
    pub fn remembered(subject: impl Into<String>) -> Self {
        Self {
            remember: true,
            remember_for: REMEMBER_FOR_SECS,
            subject: subject.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AcceptConsent {
    pub remember: bool,
    pub remember_for: u64,
    pub grant_scope: Vec<String>,
    pub grant_access_token_audience: Vec<String>,
}

impl AcceptConsent {
    /// Grant exactly what was requested.
    pub fn grant_all(request: &ConsentRequest) -> Self {
        Self {
            remember: true,
            remember_for: REMEMBER_FOR_SECS,
            grant_scope: request.requested_scope.clone(),
            grant_access_token_audience: request.requested_access_token_audience.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RejectRequest {
    pub error: String,
    pub error_description: String,
}
