//! Session provider tests against a local mock server.

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use leadbook::config::ResolvedStoreConfig;
use leadbook::store::session::SessionProvider;

fn config(server: &MockServer) -> ResolvedStoreConfig {
    ResolvedStoreConfig {
        url: Url::parse(&server.uri()).unwrap(),
        anon_key: "anon-123".to_string(),
        timeout_secs: 5,
    }
}

fn provider(server: &MockServer, dir: &tempfile::TempDir) -> SessionProvider {
    SessionProvider::with_cache_path(&config(server), dir.path().join("session.json")).unwrap()
}

#[tokio::test]
async fn sign_in_caches_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(header("apikey", "anon-123"))
        .and(body_json(json!({
            "email": "jo@acme.test",
            "password": "hunter2"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-1",
            "refresh_token": "ref-1",
            "user": {"id": "u-1", "email": "jo@acme.test"}
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let sessions = provider(&server, &dir);

    let session = sessions.sign_in("jo@acme.test", "hunter2").await.unwrap();
    assert_eq!(session.access_token, "tok-1");

    let cached = sessions.current_session().unwrap().unwrap();
    assert_eq!(cached.access_token, "tok-1");
    assert_eq!(cached.user.unwrap().id, "u-1");
}

#[tokio::test]
async fn bad_credentials_surface_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error_description": "Invalid login credentials"
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let sessions = provider(&server, &dir);

    let err = sessions.sign_in("jo@acme.test", "wrong").await.unwrap_err();
    assert_eq!(err.to_string(), "Auth error: Invalid login credentials");
    assert!(sessions.current_session().unwrap().is_none());
}

#[tokio::test]
async fn current_user_uses_session_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("Authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u-1",
            "email": "jo@acme.test"
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let sessions = provider(&server, &dir);

    let session = leadbook::store::session::Session {
        access_token: "tok-1".to_string(),
        refresh_token: None,
        user: None,
    };
    let user = sessions.current_user(&session).await.unwrap();
    assert_eq!(user.email.as_deref(), Some("jo@acme.test"));
}

#[tokio::test]
async fn sign_out_clears_cache_even_if_remote_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-1"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let sessions = provider(&server, &dir);

    let session = sessions.sign_in("jo@acme.test", "hunter2").await.unwrap();
    sessions.sign_out(&session).await.unwrap();
    assert!(sessions.current_session().unwrap().is_none());
}
