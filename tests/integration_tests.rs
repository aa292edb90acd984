//! Integration tests using mock HTTP server
//!
//! Tests the full flow: cookie file → bearer interceptor → HTTP request

use authclient::actions::IconButton;
use authclient::config::{resolve_base_url, DEFAULT_BASE_URL};
use authclient::{
    ClientConfig, CookieFileStore, CredentialStore, Error, HttpClient, MemoryStore, TOKEN_COOKIE,
};
use futures::future::join_all;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_cookie(path: &std::path::Path, value: &str) {
    std::fs::write(
        path,
        format!(
            "# Netscape HTTP Cookie File\n127.0.0.1\tFALSE\t/\tFALSE\t0\t{TOKEN_COOKIE}\t{value}\n"
        ),
    )
    .unwrap();
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_base_url_resolution() {
    assert_eq!(
        resolve_base_url(Some("https://api.example.com")),
        "https://api.example.com"
    );
    assert_eq!(resolve_base_url(None), "http://localhost:4000/api");
    assert_eq!(DEFAULT_BASE_URL, "http://localhost:4000/api");
}

#[test]
fn test_default_config_contract() {
    let config = ClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(10));
    assert_eq!(
        config.default_headers.get("content-type").map(String::as_str),
        Some("application/json")
    );
}

// ============================================================================
// Cookie-backed authentication
// ============================================================================

#[tokio::test]
async fn test_cookie_token_is_sent_as_bearer() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/orders"))
        .and(header("Authorization", "Bearer cookie-v1"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"orders": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let cookies = dir.path().join("cookies.txt");
    write_cookie(&cookies, "cookie-v1");

    let config = ClientConfig::builder()
        .base_url(format!("{}/api", mock_server.uri()))
        .build();
    let store = Arc::new(CookieFileStore::new(&cookies));
    let client = HttpClient::authenticated(config, store).unwrap();

    let body: serde_json::Value = client.get_json("orders").await.unwrap();
    assert_eq!(body["orders"], json!([]));
}

#[tokio::test]
async fn test_cookie_rotation_between_requests() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("Authorization", "Bearer old"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(header("Authorization", "Bearer new"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let cookies = dir.path().join("cookies.txt");
    write_cookie(&cookies, "old");

    let config = ClientConfig::builder().base_url(mock_server.uri()).build();
    let store = Arc::new(CookieFileStore::new(&cookies));
    let client = HttpClient::authenticated(config, store).unwrap();

    client.get("/a").await.unwrap();
    write_cookie(&cookies, "new");
    client.get("/b").await.unwrap();
}

#[tokio::test]
async fn test_missing_cookie_file_sends_unauthenticated() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = CookieFileStore::new(dir.path().join("absent.txt"));
    let config = ClientConfig::builder().base_url(mock_server.uri()).build();
    let client = HttpClient::authenticated(config, Arc::new(store)).unwrap();

    client.get("/health").await.unwrap();

    let received = mock_server.received_requests().await.unwrap();
    assert!(!received[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_unreadable_cookie_store_aborts_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    // A directory cannot be read as a cookie file
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn CredentialStore> = Arc::new(CookieFileStore::new(dir.path()));
    let config = ClientConfig::builder().base_url(mock_server.uri()).build();
    let client = HttpClient::authenticated(config, store).unwrap();

    let err = client.get("/orders").await.unwrap_err();
    assert!(matches!(err, Error::CredentialLookup { .. }));
}

#[tokio::test]
async fn test_shared_client_concurrent_requests() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("Authorization", "Bearer shared"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(20)
        .mount(&mock_server)
        .await;

    let config = ClientConfig::builder().base_url(mock_server.uri()).build();
    let client = Arc::new(
        HttpClient::authenticated(config, Arc::new(MemoryStore::with(TOKEN_COOKIE, "shared")))
            .unwrap(),
    );

    let tasks = (0..20).map(|i| {
        let client = Arc::clone(&client);
        tokio::spawn(async move {
            client
                .get_json::<serde_json::Value>(&format!("/items/{i}"))
                .await
        })
    });

    for result in join_all(tasks).await {
        let body = result.unwrap().unwrap();
        assert_eq!(body["ok"], true);
    }
}

#[tokio::test]
async fn test_timeout_surfaces_without_retry() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = ClientConfig::builder()
        .base_url(mock_server.uri())
        .timeout(Duration::from_millis(150))
        .build();
    let client = HttpClient::authenticated(config, Arc::new(MemoryStore::new())).unwrap();

    let err = client.get("/slow").await.unwrap_err();
    assert!(err.is_timeout());
}

// ============================================================================
// Action buttons
// ============================================================================

#[tokio::test]
async fn test_delete_button_drives_client_call() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/items/9"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut pending = Vec::new();
    let mut button = IconButton::delete(|| pending.push("/items/9"));
    button.activate();
    assert_eq!(button.label(), "Delete");
    drop(button);

    let config = ClientConfig::builder().base_url(mock_server.uri()).build();
    let client = HttpClient::new(config).unwrap();
    for target in pending {
        assert_eq!(client.delete(target).await.unwrap().status(), 204);
    }
}
