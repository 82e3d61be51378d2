use crate::admin::types::{
    AcceptConsent, AcceptLogin, CompletedRequest, ConsentRequest, LoginRequest, LogoutRequest,
    RejectRequest,
};
use crate::admin::{Action, FlowKind};
use crate::error::{AdminError, UpstreamErrorBody};
use crate::tls::shared_tls_config;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Method, Request, StatusCode, header};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::{Client, connect::HttpConnector};
use hyper_util::rt::TokioExecutor;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use tokio::time::timeout;
use url::Url;

pub const ADMIN_TIMEOUT_SECS: u64 = 5;

type HttpClient = Client<HttpsConnector<HttpConnector>, Full<Bytes>>;

/// Client for the authorization server's admin "requests" API.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Clone)]
pub struct AdminClient {
    base_url: Url,
    http: HttpClient,
    timeout: Duration,
}

impl fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminClient")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl AdminClient {
    pub fn new(base_url: &str) -> Result<Self, AdminError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AdminError::InvalidArgument(format!("admin URL '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(AdminError::InvalidArgument(format!(
                "admin URL '{base_url}' cannot be used as a base"
            )));
        }

        let tls = shared_tls_config().map_err(|e| AdminError::Transport(e.to_string()))?;
        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_tls_config((*tls).clone())
            .https_or_http()
            .enable_http1()
            .build();
        let http = Client::builder(TokioExecutor::new()).build(connector);

        Ok(Self {
            base_url,
            http,
            timeout: Duration::from_secs(ADMIN_TIMEOUT_SECS),
        })
    }

    /// Override the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build `{base}/oauth2/auth/requests/{flow}[/{action}]?{flow}_challenge={challenge}`.
    pub fn endpoint(
        &self,
        flow: FlowKind,
        action: Action,
        challenge: &str,
    ) -> Result<Url, AdminError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                AdminError::InvalidArgument("admin URL cannot be used as a base".into())
            })?;
            segments
                .pop_if_empty()
                .extend(["oauth2", "auth", "requests", flow.as_str()]);
            if let Some(segment) = action.path_segment() {
                segments.push(segment);
            }
        }
        url.set_query(None);
        url.query_pairs_mut()
            .append_pair(flow.challenge_param(), challenge);
        Ok(url)
    }

    /// Single round trip against the admin API.
    ///
    /// `Get` is sent as a GET without body; `Accept` and `Reject` as a PUT with the
    /// JSON `body` (or an empty body when `None`). Arguments are validated before
    /// anything goes on the wire.
    #[tracing::instrument(
        name = "admin_request",
        skip(self, challenge, body),
        fields(flow = %flow, action = %action)
    )]
    pub async fn call<T: DeserializeOwned>(
        &self,
        flow: FlowKind,
        action: Action,
        challenge: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T, AdminError> {
        if challenge.is_empty() {
            return Err(AdminError::InvalidArgument(format!(
                "empty challenge given for flow {flow}"
            )));
        }
        if action == Action::Reject && flow != FlowKind::Login {
            return Err(AdminError::InvalidArgument(format!(
                "flow {flow} cannot be rejected"
            )));
        }

        let url = self.endpoint(flow, action, challenge)?;
        let method = match action {
            Action::Get => Method::GET,
            Action::Accept | Action::Reject => Method::PUT,
        };

        let mut builder = Request::builder()
            .method(method)
            .uri(url.as_str())
            .header("X-Forwarded-Proto", "https")
            .header(header::ACCEPT, "application/json");
        let payload = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                serde_json::to_vec(&value)
                    .map(Bytes::from)
                    .map_err(|e| AdminError::InvalidArgument(format!("unencodable body: {e}")))?
            }
            None => Bytes::new(),
        };
        let request = builder
            .body(Full::new(payload))
            .map_err(|e| AdminError::InvalidArgument(format!("could not create request: {e}")))?;

        let (status, bytes) = timeout(self.timeout, async {
            let response = self
                .http
                .request(request)
                .await
                .map_err(|e| AdminError::Transport(format!("http request failed: {e}")))?;
            let status = response.status();
            let bytes = response
                .into_body()
                .collect()
                .await
                .map_err(|e| AdminError::Transport(format!("failed to read body: {e}")))?
                .to_bytes();
            Ok::<_, AdminError>((status, bytes))
        })
        .await
        .map_err(|_| AdminError::Transport(format!("timed out after {:?}", self.timeout)))??;

        tracing::debug!(status = %status, "Admin API responded");
        decode_response(status, &bytes)
    }

    pub async fn get_login_request(&self, challenge: &str) -> Result<LoginRequest, AdminError> {
        self.call(FlowKind::Login, Action::Get, challenge, None).await
    }

    pub async fn accept_login_request(
        &self,
        challenge: &str,
        subject: &str,
    ) -> Result<CompletedRequest, AdminError> {
        let body = to_body(&AcceptLogin::remembered(subject))?;
        self.call(FlowKind::Login, Action::Accept, challenge, Some(body)).await
    }

    pub async fn reject_login_request(
        &self,
        challenge: &str,
        error_id: &str,
        error_description: &str,
    ) -> Result<CompletedRequest, AdminError> {
        let body = to_body(&RejectRequest {
            error: error_id.to_string(),
            error_description: error_description.to_string(),
        })?;
        self.call(FlowKind::Login, Action::Reject, challenge, Some(body)).await
    }

    pub async fn get_consent_request(
        &self,
        challenge: &str,
    ) -> Result<ConsentRequest, AdminError> {
        self.call(FlowKind::Consent, Action::Get, challenge, None).await
    }

    pub async fn accept_consent_request(
        &self,
        challenge: &str,
        accept: &AcceptConsent,
    ) -> Result<CompletedRequest, AdminError> {
        let body = to_body(accept)?;
        self.call(FlowKind::Consent, Action::Accept, challenge, Some(body)).await
    }

    pub async fn get_logout_request(&self, challenge: &str) -> Result<LogoutRequest, AdminError> {
        self.call(FlowKind::Logout, Action::Get, challenge, None).await
    }

    pub async fn accept_logout_request(
        &self,
        challenge: &str,
    ) -> Result<CompletedRequest, AdminError> {
        self.call(FlowKind::Logout, Action::Accept, challenge, None).await
    }
}

fn to_body<T: serde::Serialize>(payload: &T) -> Result<serde_json::Value, AdminError> {
    serde_json::to_value(payload)
        .map_err(|e| AdminError::InvalidArgument(format!("unencodable body: {e}")))
}

/// Statuses in `200..=302` carry the expected payload, anything else an error envelope.
pub(crate) fn decode_response<T: DeserializeOwned>(
    status: StatusCode,
    body: &[u8],
) -> Result<T, AdminError> {
    if !(200..=302).contains(&status.as_u16()) {
        let mut envelope: UpstreamErrorBody = serde_json::from_slice(body).map_err(|e| {
            AdminError::Decode(format!("undecodable error body for HTTP {status}: {e}"))
        })?;
        if envelope.status_code == 0 {
            envelope.status_code = status.as_u16();
        }
        return Err(AdminError::Upstream(envelope));
    }
    serde_json::from_slice(body).map_err(|e| AdminError::Decode(e.to_string()))
}
