use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt; // for `oneshot`

use delinkify::api::models::{MediaKind, ResolveResponse};
use delinkify::api::server;
use delinkify::api::state::AppState;
use delinkify::config::Config;
use delinkify::dispatch::RequestContext;
use delinkify::handlers::{Handled, HandlerError, HandlerRegistry, UrlHandler};
use delinkify::media::{MediaItem, MediaSource};
use delinkify::publish::StorePublisher;

/// Appends one remote media item for any URL it matches.
struct AppendingHandler {
    name: &'static str,
    patterns: &'static [&'static str],
    weight: i32,
}

#[async_trait]
impl UrlHandler for AppendingHandler {
    fn name(&self) -> &'static str {
        self.name
    }

    fn url_patterns(&self) -> &'static [&'static str] {
        self.patterns
    }

    fn weight(&self) -> i32 {
        self.weight
    }

    async fn handle(
        &self,
        url: &str,
        context: &mut RequestContext,
    ) -> Result<Handled, HandlerError> {
        let item = MediaItem::builder()
            .source(MediaSource::Remote(
                "https://cdn.example.com/clip.mp4".to_string(),
            ))
            .caption("a clip".to_string())
            .original_url(url.to_string())
            .build()?;
        context.add_media(item).await?;
        Ok(Handled::Resolved)
    }
}

/// Fails every attempt with a fixed reason.
struct FailingHandler {
    name: &'static str,
    patterns: &'static [&'static str],
    weight: i32,
    reason: &'static str,
}

#[async_trait]
impl UrlHandler for FailingHandler {
    fn name(&self) -> &'static str {
        self.name
    }

    fn url_patterns(&self) -> &'static [&'static str] {
        self.patterns
    }

    fn weight(&self) -> i32 {
        self.weight
    }

    async fn handle(
        &self,
        _url: &str,
        _context: &mut RequestContext,
    ) -> Result<Handled, HandlerError> {
        Err(HandlerError::Extraction(self.reason.to_string()))
    }
}

fn build_test_app(registry: HandlerRegistry) -> Router {
    let config = Config::default();
    let publisher = Arc::new(StorePublisher::in_memory());
    let state = AppState::new(config, registry, publisher);
    server::app(state)
}

fn post_resolve_request(url: &str) -> Request<Body> {
    Request::builder()
        .uri("/resolve")
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({ "url": url })).unwrap(),
        ))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn resolve_returns_media_from_winning_handler() {
    let mut registry = HandlerRegistry::new();
    registry
        .register(Arc::new(AppendingHandler {
            name: "clips",
            patterns: &["^https://clips\\.example\\.com/"],
            weight: 1000,
        }))
        .unwrap();
    let app = build_test_app(registry);

    let response = app
        .oneshot(post_resolve_request("https://clips.example.com/watch/42"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let resolved: ResolveResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(resolved.url, "https://clips.example.com/watch/42");
    assert_eq!(resolved.media.len(), 1);
    assert_eq!(resolved.media[0].url, "https://cdn.example.com/clip.mp4");
    assert_eq!(resolved.media[0].kind, MediaKind::Video);
    assert_eq!(resolved.media[0].mime_type, "video/mp4");
    assert_eq!(
        resolved.media[0].original_url.as_deref(),
        Some("https://clips.example.com/watch/42")
    );
}

#[tokio::test]
async fn unmatched_url_is_unhandled() {
    let mut registry = HandlerRegistry::new();
    registry
        .register(Arc::new(AppendingHandler {
            name: "clips",
            patterns: &["^https://clips\\.example\\.com/"],
            weight: 1000,
        }))
        .unwrap();
    let app = build_test_app(registry);

    let response = app
        .oneshot(post_resolve_request("https://elsewhere.example.com/post/1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = json_body(response).await;
    assert_eq!(body["code"], "UNHANDLED_URL");
}

#[tokio::test]
async fn empty_url_is_rejected() {
    let app = build_test_app(HandlerRegistry::new());

    let response = app.oneshot(post_resolve_request("   ")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["code"], "INVALID_PAYLOAD");
}

#[tokio::test]
async fn exhausted_candidates_report_every_failure() {
    let mut registry = HandlerRegistry::new();
    registry
        .register(Arc::new(FailingHandler {
            name: "primary",
            patterns: &["^https://clips\\.example\\.com/"],
            weight: 1000,
            reason: "rate limited",
        }))
        .unwrap();
    registry
        .register(Arc::new(FailingHandler {
            name: "backup",
            patterns: &["^https://clips\\.example\\.com/"],
            weight: 500,
            reason: "no data found",
        }))
        .unwrap();
    let app = build_test_app(registry);

    let response = app
        .oneshot(post_resolve_request("https://clips.example.com/watch/42"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = json_body(response).await;
    assert_eq!(body["code"], "EXTRACTION_FAILED");
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("handler primary failed: extraction failed: rate limited"));
    assert!(message.contains("handler backup failed: extraction failed: no data found"));
    // Attempt order: higher weight first
    assert!(
        message.find("primary").unwrap() < message.find("backup").unwrap(),
        "failures should appear in attempt order"
    );
}

#[tokio::test]
async fn fallback_handler_rescues_failed_primary() {
    let mut registry = HandlerRegistry::new();
    registry
        .register(Arc::new(FailingHandler {
            name: "primary",
            patterns: &["^https://clips\\.example\\.com/"],
            weight: 1000,
            reason: "rate limited",
        }))
        .unwrap();
    registry
        .register(Arc::new(AppendingHandler {
            name: "backup",
            patterns: &["^https://clips\\.example\\.com/"],
            weight: 500,
        }))
        .unwrap();
    let app = build_test_app(registry);

    let response = app
        .oneshot(post_resolve_request("https://clips.example.com/watch/42"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let resolved: ResolveResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(resolved.media.len(), 1);
}

#[tokio::test]
async fn handlers_listing_includes_disabled_entries() {
    let mut registry = HandlerRegistry::new();
    registry
        .register(Arc::new(AppendingHandler {
            name: "clips",
            patterns: &["^https://clips\\.example\\.com/"],
            weight: 1000,
        }))
        .unwrap();
    registry
        .register_with_weight(
            Arc::new(AppendingHandler {
                name: "muted",
                patterns: &["^https://muted\\.example\\.com/"],
                weight: 500,
            }),
            Some(-1),
        )
        .unwrap();
    let app = build_test_app(registry);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/handlers")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let listed = body.as_array().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["name"], "clips");
    assert_eq!(listed[0]["enabled"], true);
    assert_eq!(listed[1]["name"], "muted");
    assert_eq!(listed[1]["enabled"], false);
    assert_eq!(listed[1]["weight"], -1);
}

#[tokio::test]
async fn health_reports_handler_count_and_metrics() {
    let mut registry = HandlerRegistry::new();
    registry
        .register(Arc::new(AppendingHandler {
            name: "clips",
            patterns: &["^https://clips\\.example\\.com/"],
            weight: 1000,
        }))
        .unwrap();
    let app = build_test_app(registry);

    let response = app
        .clone()
        .oneshot(post_resolve_request("https://clips.example.com/watch/1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["handlers"], 1);
}

#[tokio::test]
async fn builtin_registry_routes_known_share_links() {
    let config = Config::default();
    let registry = HandlerRegistry::with_builtins(&config).unwrap();
    let router = delinkify::handlers::Router::new(Arc::new(registry));

    let candidates = router.get_handlers(
        "https://www.reddit.com/r/pics/comments/abc123/some_title/",
    );
    let names: Vec<&str> = candidates.iter().map(|c| c.name()).collect();
    assert_eq!(names, ["reddit"]);

    let candidates = router.get_handlers("https://v.redd.it/xyz789");
    let names: Vec<&str> = candidates.iter().map(|c| c.name()).collect();
    assert_eq!(names, ["reddit_video"]);

    // both tiktok strategies are candidates, yt-dlp first
    let candidates =
        router.get_handlers("https://www.tiktok.com/@someone/video/7123456789012345678");
    let names: Vec<&str> = candidates.iter().map(|c| c.name()).collect();
    assert_eq!(names, ["tiktok", "tiktok_gallerydl"]);

    let candidates = router.get_handlers("https://www.dailymotion.com/video/x8abc12");
    let names: Vec<&str> = candidates.iter().map(|c| c.name()).collect();
    assert_eq!(names, ["dailymotion"]);

    assert!(router.get_handlers("https://example.com/nothing").is_empty());
}
