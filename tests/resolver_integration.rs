//! Integration tests for text-URL resolution against a mock mirror.

use std::time::Duration;

use harvester_core::download::{HttpClient, RetryPolicy};
use harvester_core::resolver::TextUrlResolver;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn single_attempt_client() -> HttpClient {
    HttpClient::with_settings(RetryPolicy::new(1, Duration::ZERO), Duration::from_secs(5))
        .expect("client should build")
}

async fn mount_text(server: &MockServer, route: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string("text"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_resolve_prefers_utf8_file() {
    let mock_server = MockServer::start().await;
    mount_text(&mock_server, "/files/2701/2701-0.txt").await;
    mount_text(&mock_server, "/files/2701/2701.txt").await;
    mount_text(&mock_server, "/cache/epub/2701/pg2701.txt").await;

    let resolver = TextUrlResolver::new(mock_server.uri());
    let resolved = resolver
        .resolve_text_url(&single_attempt_client(), "2701")
        .await;

    assert_eq!(
        resolved,
        Some(format!("{}/files/2701/2701-0.txt", mock_server.uri()))
    );
    let requests = mock_server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1, "probing stops at the first hit");
}

#[tokio::test]
async fn test_resolve_falls_through_to_cache() {
    let mock_server = MockServer::start().await;
    mount_text(&mock_server, "/cache/epub/11/pg11.txt").await;

    let resolver = TextUrlResolver::new(format!("{}/", mock_server.uri()));
    let resolved = resolver.resolve_text_url(&single_attempt_client(), "11").await;

    assert_eq!(
        resolved,
        Some(format!("{}/cache/epub/11/pg11.txt", mock_server.uri()))
    );
    let paths: Vec<String> = mock_server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect();
    assert_eq!(
        paths,
        vec![
            "/files/11/11-0.txt",
            "/files/11/11.txt",
            "/cache/epub/11/pg11.txt"
        ]
    );
}

#[tokio::test]
async fn test_resolve_none_when_every_candidate_fails() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(3)
        .mount(&mock_server)
        .await;

    let resolver = TextUrlResolver::new(mock_server.uri());
    assert!(
        resolver
            .resolve_text_url(&single_attempt_client(), "999999")
            .await
            .is_none()
    );
}
