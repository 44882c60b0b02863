//! End-to-end tests for the sitemap endpoints and locale routing,
//! driving the real router against a canned-JSON mock backend.

use axum::Router;
use axum::body::Body;
use axum::extract::{Query, Request};
use axum::http::{Request as HttpRequest, StatusCode, header};
use axum::routing::get;
use http_body_util::BodyExt;
use serde_json::json;
use std::collections::HashMap;
use tower::ServiceExt;

use boxgate::config::Config;
use boxgate::state::AppState;
use boxgate::web::create_router;

/// Spawn a mock backend serving fixture data on an ephemeral port.
/// Returns its origin. The fallback echoes the request path, standing in
/// for the downstream SSR renderer.
async fn spawn_mock_backend() -> String {
    let router = Router::new()
        .route(
            "/api/public/games",
            get(|| async {
                json!({
                    "code": 200,
                    "rows": [
                        {"id": 1, "name": "Alpha", "updateTime": "2025-01-01"},
                        {"id": 2, "name": "Beta", "updateTime": null},
                    ],
                    "total": 2
                })
                .to_string()
            }),
        )
        .route(
            "/api/public/categories",
            get(|| async {
                json!({
                    "code": 200,
                    "data": [{"id": 5, "slug": "rpg", "name": "RPG"}]
                })
                .to_string()
            }),
        )
        .route(
            "/api/public/boxes",
            get(|| async {
                json!({
                    "code": 200,
                    "rows": [{"id": 9, "updateTime": "2025-02-02"}],
                    "total": 1
                })
                .to_string()
            }),
        )
        .route(
            "/api/public/strategies",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let id = match params.get("section").map(String::as_str) {
                    Some("guide") => 11,
                    _ => 12,
                };
                json!({"code": 200, "rows": [{"id": id}], "total": 1}).to_string()
            }),
        )
        .fallback(|req: Request| async move {
            (
                [("x-echo-method", req.method().to_string())],
                format!("path={}", req.uri().path()),
            )
        });

    spawn(router).await
}

/// Spawn a backend where every endpoint fails.
async fn spawn_failing_backend() -> String {
    let router = Router::new().fallback(|| async {
        (StatusCode::INTERNAL_SERVER_ERROR, "backend down")
    });
    spawn(router).await
}

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn gateway(backend_origin: &str) -> Router {
    let config = Config {
        port: 0,
        backend_base_url: backend_origin.to_owned(),
        site_id: "1".to_owned(),
        api_key: None,
        allowed_hosts: "site.test,*.pages.dev".to_owned(),
        default_origin: "https://site.test".to_owned(),
        ssr_downstream: backend_origin.to_owned(),
        log_level: "warn".to_owned(),
        shutdown_timeout: 1,
    };
    let state = AppState::from_config(&config).unwrap();
    create_router(state)
}

async fn get_body(router: &Router, path: &str, host: &str) -> (StatusCode, String) {
    let request = HttpRequest::builder()
        .uri(path)
        .header(header::HOST, host)
        .header("x-forwarded-proto", "https")
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

/// Index lastmods are generation timestamps; strip them when comparing two
/// renders of the same document.
fn without_lastmod(xml: &str) -> String {
    xml.lines()
        .filter(|line| !line.trim_start().starts_with("<lastmod>"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[tokio::test]
async fn root_index_lists_all_locale_sitemaps() {
    let backend = spawn_mock_backend().await;
    let router = gateway(&backend);

    let (status, body) = get_body(&router, "/sitemap.xml", "site.test").await;
    assert_eq!(status, StatusCode::OK);
    for locale in ["zh-CN", "zh-TW", "en-US"] {
        assert!(body.contains(&format!("https://site.test/sitemap-{locale}.xml")));
    }
}

#[tokio::test]
async fn untrusted_host_falls_back_to_default_origin() {
    let backend = spawn_mock_backend().await;
    let router = gateway(&backend);

    let (status, body) = get_body(&router, "/sitemap.xml", "evil.com").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("https://site.test/sitemap-zh-CN.xml"));
    assert!(!body.contains("evil.com"));
}

#[tokio::test]
async fn wildcard_host_is_reflected_in_sitemap_urls() {
    let backend = spawn_mock_backend().await;
    let router = gateway(&backend);

    let (_, body) = get_body(&router, "/sitemap.xml", "preview.pages.dev").await;
    assert!(body.contains("https://preview.pages.dev/sitemap-zh-CN.xml"));
}

#[tokio::test]
async fn sitemap_file_name_routes_to_the_same_handler_as_the_api_path() {
    let backend = spawn_mock_backend().await;
    let router = gateway(&backend);

    let (status_a, rewritten) = get_body(&router, "/sitemap-zh-TW.xml", "site.test").await;
    let (status_b, direct) = get_body(&router, "/api/sitemap/zh-TW", "site.test").await;
    assert_eq!(status_a, StatusCode::OK);
    assert_eq!(status_b, StatusCode::OK);
    assert_eq!(without_lastmod(&rewritten), without_lastmod(&direct));
    assert!(rewritten.contains("https://site.test/sitemap-zh-TW-games.xml"));
}

#[tokio::test]
async fn leaf_sitemap_via_file_name_matches_direct_api_content() {
    let backend = spawn_mock_backend().await;
    let router = gateway(&backend);

    let (_, rewritten) = get_body(&router, "/sitemap-en-US-games.xml", "site.test").await;
    let (_, direct) = get_body(&router, "/api/sitemap/en-US/games", "site.test").await;
    assert_eq!(without_lastmod(&rewritten), without_lastmod(&direct));
}

#[tokio::test]
async fn games_leaf_carries_details_categories_and_alternates() {
    let backend = spawn_mock_backend().await;
    let router = gateway(&backend);

    let (status, body) = get_body(&router, "/api/sitemap/zh-CN/games", "site.test").await;
    assert_eq!(status, StatusCode::OK);

    // Two game detail pages plus one category page
    assert_eq!(body.matches("<url>").count(), 3);
    assert!(body.contains("<loc>https://site.test/games/1</loc>"));
    assert!(body.contains("<loc>https://site.test/games/2</loc>"));
    assert!(body.contains("<loc>https://site.test/games/category/rpg</loc>"));

    // Game 1 keeps its backend timestamp; game 2's null updateTime defaults
    // to generation time, so every url block still has a lastmod.
    assert!(body.contains("<lastmod>2025-01-01</lastmod>"));
    assert_eq!(body.matches("<lastmod>").count(), 3);

    // Category pages are fixed at weekly/0.7 regardless of the games default
    assert!(body.contains("<priority>0.9</priority>"));
    assert!(body.contains("<priority>0.7</priority>"));

    // Three alternates per url, one per supported locale
    assert_eq!(body.matches("rel=\"alternate\"").count(), 9);
    assert!(body.contains("hreflang=\"zh-TW\" href=\"https://site.test/zh-TW/games/1\""));
}

#[tokio::test]
async fn boxes_leaf_emits_detail_and_download_pages() {
    let backend = spawn_mock_backend().await;
    let router = gateway(&backend);

    let (_, body) = get_body(&router, "/api/sitemap/zh-CN/boxes", "site.test").await;
    assert!(body.contains("<loc>https://site.test/boxes/9</loc>"));
    assert!(body.contains("<loc>https://site.test/boxes/9/download</loc>"));
    assert!(body.contains("<priority>0.8</priority>"));
    assert!(body.contains("<priority>0.7</priority>"));
}

#[tokio::test]
async fn guides_and_news_split_the_strategies_endpoint() {
    let backend = spawn_mock_backend().await;
    let router = gateway(&backend);

    let (_, guides) = get_body(&router, "/api/sitemap/zh-CN/guides", "site.test").await;
    assert!(guides.contains("<loc>https://site.test/content/guides/11</loc>"));

    let (_, news) = get_body(&router, "/api/sitemap/zh-CN/news", "site.test").await;
    assert!(news.contains("<loc>https://site.test/content/news/12</loc>"));
}

#[tokio::test]
async fn static_leaf_covers_the_fixed_page_set_with_locale_prefix() {
    let backend = spawn_mock_backend().await;
    let router = gateway(&backend);

    let (_, body) = get_body(&router, "/api/sitemap/en-US/static", "site.test").await;
    assert_eq!(body.matches("<url>").count(), 6);
    assert!(body.contains("<loc>https://site.test/en-US</loc>"));
    assert!(body.contains("<loc>https://site.test/en-US/games</loc>"));
    assert!(body.contains("<loc>https://site.test/en-US/search</loc>"));
}

#[tokio::test]
async fn unknown_locale_and_type_return_404() {
    let backend = spawn_mock_backend().await;
    let router = gateway(&backend);

    let (status, _) = get_body(&router, "/api/sitemap/fr-FR", "site.test").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get_body(&router, "/api/sitemap/zh-CN/bogus", "site.test").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Unrecognized sitemap token is rewritten as a locale-only request and
    // 404s at the API route rather than at the middleware.
    let (status, _) = get_body(&router, "/sitemap-weird.xml", "site.test").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn backend_failure_degrades_to_an_empty_urlset() {
    let backend = spawn_failing_backend().await;
    let router = gateway(&backend);

    let (status, body) = get_body(&router, "/api/sitemap/zh-CN/games", "site.test").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<urlset"));
    assert!(!body.contains("<url>"));
}

#[tokio::test]
async fn default_locale_prefix_redirects_to_canonical_url() {
    let backend = spawn_mock_backend().await;
    let router = gateway(&backend);

    let request = HttpRequest::builder()
        .uri("/zh-CN/games?page=2")
        .header(header::HOST, "site.test")
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/games?page=2"
    );
}

#[tokio::test]
async fn unprefixed_page_is_rewritten_to_default_locale_internally() {
    let backend = spawn_mock_backend().await;
    let router = gateway(&backend);

    // The mock SSR fallback echoes the path it receives: the client asked
    // for /games but the downstream must see the default-locale path.
    let (status, body) = get_body(&router, "/games", "site.test").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "path=/zh-CN/games");
}

#[tokio::test]
async fn non_default_locale_prefix_passes_through_to_ssr() {
    let backend = spawn_mock_backend().await;
    let router = gateway(&backend);

    let (status, body) = get_body(&router, "/zh-TW/games", "site.test").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "path=/zh-TW/games");
}

#[tokio::test]
async fn head_page_requests_keep_their_method_downstream() {
    let backend = spawn_mock_backend().await;
    let router = gateway(&backend);

    let request = HttpRequest::builder()
        .method("HEAD")
        .uri("/games")
        .header(header::HOST, "site.test")
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    // The mock echoes the method it saw; a HEAD must not become a GET.
    assert_eq!(response.headers().get("x-echo-method").unwrap(), "HEAD");
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert!(body.is_empty());
}

#[tokio::test]
async fn health_reports_version_and_commit() {
    let backend = spawn_mock_backend().await;
    let router = gateway(&backend);

    let (status, body) = get_body(&router, "/api/health", "site.test").await;
    assert_eq!(status, StatusCode::OK);
    let health: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["version"], env!("CARGO_PKG_VERSION"));
    assert!(health["commit"].is_string());
}

#[tokio::test]
async fn robots_txt_points_at_the_sitemap() {
    let backend = spawn_mock_backend().await;
    let router = gateway(&backend);

    let (status, body) = get_body(&router, "/robots.txt", "site.test").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Disallow: /api/"));
    assert!(body.contains("Sitemap: https://site.test/sitemap.xml"));
}
