//! Redirect resolver tests against a local `wiremock` server.

use std::time::Duration;
use url_tidy::network::{RedirectClient, TransformError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client() -> RedirectClient {
    RedirectClient::with_options(Duration::from_secs(2), "url-tidy-test/0.1")
        .expect("failed to build test RedirectClient")
}

#[tokio::test]
async fn test_client_initialization() {
    assert!(RedirectClient::new().is_ok());
}

#[tokio::test]
async fn test_location_header_is_returned_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/abc"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("Location", "https://real.example.com/page?utm_id=1&x=2"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let resolved = test_client()
        .resolve_once(&format!("{}/abc", server.uri()))
        .await
        .unwrap();

    assert_eq!(resolved, "https://real.example.com/page?utm_id=1&x=2");
}

#[tokio::test]
async fn test_only_one_hop_is_followed() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/first"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("Location", format!("{}/second", server.uri())),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/second"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("Location", format!("{}/third", server.uri())),
        )
        .expect(0)
        .mount(&server)
        .await;

    let resolved = test_client()
        .resolve_once(&format!("{}/first", server.uri()))
        .await
        .unwrap();

    assert_eq!(resolved, format!("{}/second", server.uri()));
}

#[tokio::test]
async fn test_relative_location_is_not_made_absolute() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(307).insert_header("Location", "/elsewhere"))
        .mount(&server)
        .await;

    let resolved = test_client().resolve_once(&server.uri()).await.unwrap();
    assert_eq!(resolved, "/elsewhere");
}

#[tokio::test]
async fn test_no_location_returns_input() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let input = format!("{}/plain?x=1", server.uri());
    let resolved = test_client().resolve_once(&input).await.unwrap();
    assert_eq!(resolved, input);
}

#[tokio::test]
async fn test_error_status_without_location_is_not_a_failure() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let input = format!("{}/gone", server.uri());
    assert_eq!(test_client().resolve_once(&input).await.unwrap(), input);
}

#[tokio::test]
async fn test_timeout_is_a_transport_failure() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let client = RedirectClient::with_options(Duration::from_millis(200), "url-tidy-test/0.1")
        .unwrap();
    let result = client.resolve_once(&server.uri()).await;

    assert!(
        matches!(result, Err(TransformError::Transport(_))),
        "expected transport error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_connection_refused_is_a_transport_failure() {
    let result = test_client().resolve_once("http://127.0.0.1:1/").await;
    assert!(matches!(result, Err(TransformError::Transport(_))));
}
