//! XML sitemap endpoints for search engine discovery.
//!
//! Three levels: the root index (one entry per locale), per-locale indices
//! (one entry per content type), and leaf url-sets fetched from the backend.
//! Nothing is cached in-process; the `Cache-Control` header delegates
//! freshness to the edge cache on a one-hour window.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::locale::Locale;
use crate::sitemap::types::ContentType;
use crate::sitemap::{fetchers, generator};
use crate::state::AppState;

/// XML content type and cache control headers shared by all sitemap responses.
fn xml_response(body: String) -> Response {
    let mut response = body.into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/xml; charset=utf-8"),
    );
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=3600, s-maxage=3600"),
    );
    response
}

/// `GET /sitemap.xml` -- root index pointing at every locale's index.
pub async fn root_index(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let origin = state.host_policy.origin_for_request(&headers);
    xml_response(generator::render_root_index(&origin))
}

/// `GET /api/sitemap/{locale}` -- per-locale index over the content types.
///
/// Reached directly or via the middleware rewrite of `/sitemap-<locale>.xml`.
pub async fn locale_index(
    State(state): State<AppState>,
    Path(locale): Path<String>,
    headers: HeaderMap,
) -> Response {
    let Ok(locale) = locale.parse::<Locale>() else {
        return (StatusCode::NOT_FOUND, "unsupported locale").into_response();
    };

    let origin = state.host_policy.origin_for_request(&headers);
    xml_response(generator::render_locale_index(locale, &origin))
}

/// `GET /api/sitemap/{locale}/{type}` -- leaf sitemap for one content type.
///
/// Backend failures have already been degraded to empty lists by the
/// fetchers, so this always renders a well-formed url-set.
pub async fn leaf(
    State(state): State<AppState>,
    Path((locale, content_type)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    let Ok(locale) = locale.parse::<Locale>() else {
        return (StatusCode::NOT_FOUND, "unsupported locale").into_response();
    };
    let Ok(content_type) = content_type.parse::<ContentType>() else {
        return (StatusCode::NOT_FOUND, "unsupported content type").into_response();
    };

    let origin = state.host_policy.origin_for_request(&headers);
    let urls = fetchers::fetch_urls_by_type(&state.backend, locale, content_type, &origin).await;
    xml_response(generator::render_leaf(&urls))
}
