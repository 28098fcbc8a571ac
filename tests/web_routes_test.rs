//! Integration tests for web routes.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use facefeed::config::{Config, TokenSource, WidgetConfig};
use facefeed::graph::GraphClient;
use facefeed::web::{create_app, AppState};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FEED_JSON: &str = r#"{
  "data": [
    {"id": "7_1", "message": "Hello <world>", "updated_time": "2020-01-01T00:00:00+0000"},
    {"id": "7_2", "story": "Story text", "updated_time": "2020-01-01T00:00:00+0000"}
  ]
}"#;

/// Create a test app whose Graph API is the given mock server.
fn create_test_app(mock_server: &MockServer) -> Router {
    let config = Config {
        graph_url: mock_server.uri(),
        targets: vec![
            WidgetConfig::new("goodpage", TokenSource::Static("abc".to_string()))
                .with_name("good"),
            WidgetConfig::new("brokenpage", TokenSource::Static("abc".to_string()))
                .with_name("broken"),
        ],
        ..Config::for_testing()
    };
    let client = GraphClient::new(&config.graph_url, Duration::from_secs(5))
        .expect("Failed to create client");

    create_app(AppState::new(config, Arc::new(client)))
}

async fn mount_feeds(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/goodpage/feed"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(FEED_JSON, "application/json"))
        .mount(mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/brokenpage/feed"))
        .respond_with(ResponseTemplate::new(503))
        .mount(mock_server)
        .await;
}

async fn get_body(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_health_endpoint() {
    let mock_server = MockServer::start().await;
    let (status, body) = get_body(create_test_app(&mock_server), "/healthz").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_feed_fragment_renders_posts() {
    let mock_server = MockServer::start().await;
    mount_feeds(&mock_server).await;

    let (status, body) = get_body(create_test_app(&mock_server), "/feed/good").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with(r#"<div class="facefeed" data-feed="good">"#));
    assert!(body.contains("<p>Hello &lt;world&gt;<br>"));
    assert!(body.contains("<p>Story text<br>"));
    assert!(body.contains(r#"href="https://www.facebook.com/goodpage/posts/7_1""#));
    assert!(body.contains(r#"href="https://www.facebook.com/goodpage/posts/7_2""#));
    assert!(body.contains(" days ago</a>"));
}

#[tokio::test]
async fn test_failed_feed_returns_placeholder() {
    let mock_server = MockServer::start().await;
    mount_feeds(&mock_server).await;

    let (status, body) = get_body(create_test_app(&mock_server), "/feed/broken").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        r#"<div class="facefeed" data-feed="broken"><p>Loading status updates...</p></div>"#
    );
}

#[tokio::test]
async fn test_unknown_feed_is_not_found() {
    let mock_server = MockServer::start().await;
    let (status, _) = get_body(create_test_app(&mock_server), "/feed/missing").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_home_renders_every_feed() {
    let mock_server = MockServer::start().await;
    mount_feeds(&mock_server).await;

    let (status, body) = get_body(create_test_app(&mock_server), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with("<!DOCTYPE html>"));

    let good = body.find(r#"data-feed="good""#).unwrap();
    let broken = body.find(r#"data-feed="broken""#).unwrap();
    assert!(good < broken);
    assert!(body.contains("<p>Story text<br>"));
    assert!(body.contains("<p>Loading status updates...</p>"));
}
