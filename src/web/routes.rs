//! Router construction and the SSR fallback.

use axum::{
    Router,
    extract::{ConnectInfo, Request, State},
    http::HeaderValue,
    response::{IntoResponse, Response},
    routing::get,
};

use std::net::SocketAddr;
use std::time::Duration;

use crate::state::AppState;
use crate::web::middleware::locale_rewrite::LocaleRewriteLayer;
use crate::web::middleware::request_id::RequestIdLayer;
use crate::web::{sitemap, status};
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer};

/// Creates the gateway router.
pub fn create_router(app_state: AppState) -> Router {
    let api_router = Router::new()
        .route("/health", get(status::health))
        .route("/sitemap/{locale}", get(sitemap::locale_index))
        .route("/sitemap/{locale}/{content_type}", get(sitemap::leaf))
        .with_state(app_state.clone());

    let router = Router::new()
        .route("/robots.txt", get(robots_txt))
        .route("/sitemap.xml", get(sitemap::root_index))
        .nest("/api", api_router)
        .fallback(ssr_fallback)
        .with_state(app_state);

    router.layer((
        // Outermost: per-request ID span + severity-proportional response logging.
        RequestIdLayer,
        CompressionLayer::new()
            .zstd(true)
            .br(true)
            .gzip(true)
            .quality(tower_http::CompressionLevel::Fastest),
        TimeoutLayer::new(Duration::from_secs(60)),
        // Innermost, directly in front of the router: sitemap file names and
        // unprefixed pages are rewritten in place, default-locale-prefixed
        // URLs are redirected to canonical form.
        LocaleRewriteLayer,
    ))
}

/// Fallback for everything that isn't an SEO surface: proxy to the
/// downstream SSR renderer with the (possibly rewritten) internal path.
async fn ssr_fallback(State(state): State<AppState>, request: Request) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let path = uri.path();
    let query = uri.query();
    let mut headers = request.headers().clone();

    // Augment X-Forwarded-For so the SSR server (and its backend calls) see
    // the real client IP, not localhost. Append the peer address to any
    // existing value rather than replacing it.
    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        let client_ip = addr.ip().to_string();
        let xff_value = match headers.get("x-forwarded-for") {
            Some(existing) => {
                let existing = existing.to_str().unwrap_or("");
                format!("{existing}, {client_ip}")
            }
            None => client_ip,
        };
        if let Ok(value) = HeaderValue::from_str(&xff_value) {
            headers.insert("x-forwarded-for", value);
        }
    }

    crate::web::proxy::proxy_to_ssr(&state, &method, path, query, headers).await
}

/// `GET /robots.txt`
///
/// Blocks crawlers from the API surface and points them at the sitemap on
/// the validated origin.
async fn robots_txt(State(state): State<AppState>, headers: axum::http::HeaderMap) -> Response {
    let origin = state.host_policy.origin_for_request(&headers);
    let body = format!(
        "User-agent: *\n\
         Disallow: /api/\n\
         \n\
         Sitemap: {origin}/sitemap.xml\n"
    );
    let mut resp = body.into_response();
    resp.headers_mut().insert(
        axum::http::header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    resp.headers_mut().insert(
        axum::http::header::CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=86400"),
    );
    resp
}
