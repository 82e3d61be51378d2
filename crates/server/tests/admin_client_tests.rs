//! Admin client tests.
//!
//! Runs the client against a mock admin API.

use login_consent_provider::admin::{
    AcceptConsent, Action, AdminClient, ConsentRequest, FlowKind, LoginRequest,
};
use login_consent_provider::error::AdminError;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{any, body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn admin(server: &MockServer) -> AdminClient {
    AdminClient::new(&server.uri()).expect("create admin client")
}

/// Fails the test on drop if anything reaches the mock server.
async fn expect_no_calls(server: &MockServer) {
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_get_login_request_sends_challenge_and_forwarded_proto() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oauth2/auth/requests/login"))
        .and(query_param("login_challenge", "abc123"))
        .and(header("X-Forwarded-Proto", "https"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "challenge": "abc123",
            "skip": true,
            "subject": "user-1",
            "client": {"client_id": "app", "client_name": "App"},
            "requested_scope": ["openid"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = admin(&server)
        .await
        .get_login_request("abc123")
        .await
        .expect("get login request");
    assert!(request.skip);
    assert_eq!(request.subject, "user-1");
    assert_eq!(request.client.unwrap().client_id, "app");
}

#[tokio::test]
async fn test_accept_login_request_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/oauth2/auth/requests/login/accept"))
        .and(query_param("login_challenge", "abc123"))
        .and(header("X-Forwarded-Proto", "https"))
        .and(body_json(json!({
            "remember": true,
            "remember_for": 7200,
            "subject": "user-1"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"redirect_to": "https://hydra/next"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let done = admin(&server)
        .await
        .accept_login_request("abc123", "user-1")
        .await
        .expect("accept login");
    assert_eq!(done.redirect_to, "https://hydra/next");
}

#[tokio::test]
async fn test_reject_login_request_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/oauth2/auth/requests/login/reject"))
        .and(query_param("login_challenge", "abc123"))
        .and(body_json(json!({
            "error": "user_notfound",
            "error_description": "unable to find user with id: 42"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"redirect_to": "https://hydra/err"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let done = admin(&server)
        .await
        .reject_login_request("abc123", "user_notfound", "unable to find user with id: 42")
        .await
        .expect("reject login");
    assert_eq!(done.redirect_to, "https://hydra/err");
}

#[tokio::test]
async fn test_accept_consent_echoes_requested_values() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/oauth2/auth/requests/consent/accept"))
        .and(query_param("consent_challenge", "c-1"))
        .and(body_json(json!({
            "remember": true,
            "remember_for": 7200,
            "grant_scope": ["openid", "offline"],
            "grant_access_token_audience": ["https://api.example.com"]
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"redirect_to": "https://hydra/c"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let request = ConsentRequest {
        requested_scope: vec!["openid".into(), "offline".into()],
        requested_access_token_audience: vec!["https://api.example.com".into()],
        ..Default::default()
    };
    let done = admin(&server)
        .await
        .accept_consent_request("c-1", &AcceptConsent::grant_all(&request))
        .await
        .expect("accept consent");
    assert_eq!(done.redirect_to, "https://hydra/c");
}

#[tokio::test]
async fn test_logout_uses_logout_challenge_param() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oauth2/auth/requests/logout"))
        .and(query_param("logout_challenge", "lo-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "subject": "user-1",
            "sid": "s-1",
            "rp_initiated": true
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/oauth2/auth/requests/logout/accept"))
        .and(query_param("logout_challenge", "lo-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"redirect_to": "https://hydra/bye"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = admin(&server).await;
    let request = client.get_logout_request("lo-1").await.expect("get logout");
    assert!(request.rp_initiated);
    let done = client
        .accept_logout_request("lo-1")
        .await
        .expect("accept logout");
    assert_eq!(done.redirect_to, "https://hydra/bye");
}

#[tokio::test]
async fn test_upstream_error_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oauth2/auth/requests/login"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": "Not Found",
            "error_description": "Unable to locate the requested resource",
            "error_debug": "login challenge expired",
            "status_code": 404
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = admin(&server)
        .await
        .get_login_request("expired")
        .await
        .unwrap_err();
    match err {
        AdminError::Upstream(body) => {
            assert_eq!(body.status_code, 404);
            assert_eq!(body.error, "Not Found");
            assert_eq!(body.error_description, "Unable to locate the requested resource");
            assert_eq!(body.error_debug, "login challenge expired");
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_redirect_status_is_success() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/oauth2/auth/requests/login/accept"))
        .respond_with(
            ResponseTemplate::new(302).set_body_json(json!({"redirect_to": "https://hydra/r"})),
        )
        .mount(&server)
        .await;

    let done = admin(&server)
        .await
        .accept_login_request("abc", "u")
        .await
        .expect("302 is within the accepted range");
    assert_eq!(done.redirect_to, "https://hydra/r");
}

#[tokio::test]
async fn test_malformed_success_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = admin(&server)
        .await
        .get_consent_request("c")
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn test_malformed_error_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream connect error"))
        .mount(&server)
        .await;

    let err = admin(&server)
        .await
        .get_login_request("c")
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn test_empty_challenge_makes_no_call() {
    let server = MockServer::start().await;
    expect_no_calls(&server).await;

    let err = admin(&server)
        .await
        .get_login_request("")
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::InvalidArgument(_)));
}

#[tokio::test]
async fn test_reject_outside_login_makes_no_call() {
    let server = MockServer::start().await;
    expect_no_calls(&server).await;

    let err = admin(&server)
        .await
        .call::<LoginRequest>(FlowKind::Consent, Action::Reject, "c", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::InvalidArgument(_)));
}

#[tokio::test]
async fn test_timeout_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"skip": false}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let err = admin(&server)
        .await
        .with_timeout(Duration::from_millis(200))
        .get_login_request("slow")
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::Transport(_)), "got {err:?}");
}

#[tokio::test]
async fn test_unreachable_admin_api_is_transport_error() {
    // Grab a free port, then close it again.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = AdminClient::new(&format!("http://{addr}")).unwrap();
    let err = client.get_login_request("abc").await.unwrap_err();
    assert!(matches!(err, AdminError::Transport(_)), "got {err:?}");
}
