//! Integration tests for the login → dispatch flow
//!
//! **Coverage:**
//! - Session gate: no network I/O before login, and again after logout
//! - Login: cookie capture, cookie priority, missing cookie
//! - Retry policy: connection refused, server errors, remote failures
//! - Raw downloads bypass envelope validation
//!
//! **Infrastructure:**
//! - WireMock HTTP server standing in for the panel
//! - A closed local port for connection-refused scenarios

#![allow(dead_code)]

#[path = "support.rs"]
mod support;

use std::time::{Duration, Instant};

use serde_json::json;
use support::{api, api_with_logger, closed_port_url, logged_in, mount_login, ok};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use xui_domain::XuiError;
use xui_infra::{ClientSession, RequestOptions, RequestSpec, ResponseBody, SessionStore};

// ============================================================================
// Session gate
// ============================================================================

#[tokio::test]
async fn test_authenticated_calls_before_login_do_no_io() {
    let server = MockServer::start().await;
    let api = api(&server.uri());

    assert_eq!(api.inbounds().list().await.unwrap_err(), XuiError::AuthRequired);
    assert_eq!(api.clients().online().await.unwrap_err(), XuiError::AuthRequired);
    assert_eq!(api.server().status().await.unwrap_err(), XuiError::AuthRequired);
    assert_eq!(api.database().export().await.unwrap_err(), XuiError::AuthRequired);

    let requests = server.received_requests().await.expect("request recording enabled");
    assert!(requests.is_empty(), "no request may leave before login");
}

#[tokio::test]
async fn test_logout_restores_session_gate() {
    let server = MockServer::start().await;
    let api = logged_in(&server).await;
    let before = server.received_requests().await.unwrap().len();

    api.logout();

    assert_eq!(api.server().status().await.unwrap_err(), XuiError::AuthRequired);
    assert_eq!(server.received_requests().await.unwrap().len(), before);
}

#[test]
fn test_clearing_store_twice_is_stable() {
    let store = SessionStore::new();
    store.set("3x-ui", "abc123");

    store.clear();
    let first = store.get();
    store.clear();
    let second = store.get();

    assert_eq!(first, None);
    assert_eq!(first, second);
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_round_trip_attaches_cookie() {
    let server = MockServer::start().await;
    mount_login(&server, "abc123").await;
    Mock::given(method("GET"))
        .and(path("/panel/api/inbounds/list"))
        .and(header("cookie", "3x-ui=abc123"))
        .respond_with(ok(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let api = api(&server.uri());
    let session = api.login(None).await.expect("login");

    assert_eq!(session, ClientSession::new("3x-ui", "abc123"));
    assert_eq!(api.session(), Some(session));
    assert!(api.inbounds().list().await.expect("list").is_empty());
}

#[tokio::test]
async fn test_login_without_set_cookie_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ok(json!(null)))
        .mount(&server)
        .await;

    let api = api(&server.uri());
    let err = api.login(None).await.unwrap_err();

    assert!(matches!(err, XuiError::LoginFailed(_)), "got {err:?}");
    assert!(api.session().is_none());
}

#[tokio::test]
async fn test_3xui_cookie_wins_over_session_cookie() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ok(json!(null))
                .append_header("set-cookie", "session=legacy; Path=/")
                .append_header("set-cookie", "3x-ui=current; Path=/"),
        )
        .mount(&server)
        .await;

    let api = api(&server.uri());
    let session = api.login(None).await.expect("login");

    assert_eq!(session.cookie_name, "3x-ui");
    assert_eq!(session.value, "current");
}

#[tokio::test]
async fn test_legacy_session_cookie_is_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ok(json!(null)).insert_header("set-cookie", "session=legacy; Path=/"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/server/status"))
        .and(header("cookie", "session=legacy"))
        .respond_with(ok(json!({"cpu": 0.0})))
        .expect(1)
        .mount(&server)
        .await;

    let api = api(&server.uri());
    api.login(None).await.expect("login");

    assert!(api.server().status().await.expect("status").is_some());
}

#[tokio::test]
async fn test_failed_relogin_keeps_previous_session() {
    let server = MockServer::start().await;
    let api = logged_in(&server).await;
    server.reset().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ok(json!(null)))
        .mount(&server)
        .await;

    assert!(api.login(None).await.is_err());
    assert_eq!(api.session(), Some(ClientSession::new("3x-ui", "abc123")));
}

// ============================================================================
// Retry policy
// ============================================================================

#[tokio::test]
async fn test_connection_refused_is_retried_three_times() {
    let (api, logger) = api_with_logger(&closed_port_url());
    api.dispatcher().session_store().set("3x-ui", "abc123");

    let started = Instant::now();
    let err = api.inbounds().list().await.unwrap_err();

    assert!(
        matches!(err, XuiError::TransientNetwork { attempts: 3, .. }),
        "expected transient network error, got {err:?}"
    );
    // 10 ms before the second attempt, 20 ms before the third
    assert!(started.elapsed() >= Duration::from_millis(30));

    let attempts: Vec<_> =
        logger.infos().into_iter().filter(|line| line.contains("request to")).collect();
    assert_eq!(attempts.len(), 3);
    assert!(attempts[0].contains("attempt 1 of 3"));
    assert!(attempts[2].contains("attempt 3 of 3"));
    assert_eq!(logger.warns().len(), 3);
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let server = MockServer::start().await;
    let api = logged_in(&server).await;

    Mock::given(method("GET"))
        .and(path("/panel/api/inbounds/list"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(1)
        .mount(&server)
        .await;

    let err = api.inbounds().list().await.unwrap_err();
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn test_remote_failure_is_not_retried() {
    let server = MockServer::start().await;
    let api = logged_in(&server).await;

    Mock::given(method("POST"))
        .and(path("/panel/api/inbounds/del/42"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": false, "msg": "Record not found", "obj": null})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = api.inbounds().delete(42).await.unwrap_err();
    assert_eq!(err, XuiError::RemoteOperation { message: "Record not found".into() });
}

// ============================================================================
// Raw downloads
// ============================================================================

#[tokio::test]
async fn test_raw_download_skips_validation() {
    let server = MockServer::start().await;
    let api = logged_in(&server).await;

    Mock::given(method("GET"))
        .and(path("/server/getDb"))
        .and(header("accept", "application/octet-stream"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"SQLite format 3\0".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let response = api
        .dispatcher()
        .execute(
            RequestSpec::get("server/getDb")
                .accept("application/octet-stream")
                .options(RequestOptions::raw()),
        )
        .await
        .expect("raw download");

    assert_eq!(response.body, ResponseBody::Raw(b"SQLite format 3\0".to_vec()));
}
