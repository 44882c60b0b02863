//! SSR proxy: forwards page requests to the downstream renderer.
//!
//! The locale middleware has already rewritten the internal path by the time
//! a request lands here, so the downstream sees locale-prefixed paths while
//! the client-visible URL stays prefix-free.

use axum::http::{HeaderMap, HeaderName, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use tracing::{debug, warn};

use crate::state::AppState;

/// Hop-by-hop headers (RFC 9110 section 7.6.1). They describe a single
/// connection, not the message, so they are dropped in both directions.
const HOP_BY_HOP: &[HeaderName] = &[
    header::CONNECTION,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

fn is_hop_by_hop(name: &HeaderName) -> bool {
    // keep-alive has no named constant in http
    HOP_BY_HOP.contains(name) || name.as_str() == "keep-alive"
}

/// Proxy a page request to the downstream SSR renderer.
///
/// The method is preserved, so a HEAD probe stays a HEAD downstream instead
/// of rendering a full page body.
pub async fn proxy_to_ssr(
    state: &AppState,
    method: &Method,
    path: &str,
    query: Option<&str>,
    forward_headers: HeaderMap,
) -> Response {
    // Only page requests come through here
    if *method != Method::GET && *method != Method::HEAD {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let mut url = format!("{}{path}", state.ssr_downstream);
    if let Some(q) = query {
        url.push('?');
        url.push_str(q);
    }

    debug!(method = %method, url = %url, "proxying to SSR");

    let mut req = state.ssr_client.request(method.clone(), &url);
    for (name, value) in forward_headers.iter() {
        // The downstream gets its own Host from the client builder.
        if *name == header::HOST || is_hop_by_hop(name) {
            continue;
        }
        req = req.header(name, value);
    }

    let resp = match req.send().await {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "SSR proxy request failed");
            return (StatusCode::BAD_GATEWAY, "SSR server unavailable").into_response();
        }
    };

    let status = resp.status();
    let mut headers = HeaderMap::with_capacity(resp.headers().len());
    for (name, value) in resp.headers() {
        // content-length is recomputed for the buffered body
        if is_hop_by_hop(name) || *name == header::CONTENT_LENGTH {
            continue;
        }
        headers.insert(name.clone(), value.clone());
    }

    let body = match resp.bytes().await {
        Ok(b) => b,
        Err(e) => {
            warn!(error = %e, "failed to read SSR response body");
            return StatusCode::BAD_GATEWAY.into_response();
        }
    };

    (status, headers, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hop_by_hop_set_covers_connection_level_headers() {
        for name in [
            "connection",
            "keep-alive",
            "te",
            "trailer",
            "transfer-encoding",
            "upgrade",
            "proxy-authenticate",
            "proxy-authorization",
        ] {
            assert!(is_hop_by_hop(&name.parse::<HeaderName>().unwrap()), "{name}");
        }
    }

    #[test]
    fn end_to_end_headers_survive_the_proxy() {
        for name in ["content-type", "cache-control", "set-cookie", "x-request-id"] {
            assert!(!is_hop_by_hop(&name.parse::<HeaderName>().unwrap()), "{name}");
        }
    }
}
