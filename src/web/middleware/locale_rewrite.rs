//! Edge adapter for the routing decision function.
//!
//! Runs before the router: rewrites mutate the request URI in place (the
//! visible URL is untouched), redirects short-circuit with a 307 so the
//! default locale never appears in client-facing URLs, and passthroughs are
//! forwarded unchanged. Query strings survive both rewrites and redirects.

use axum::extract::Request;
use axum::http::{StatusCode, Uri, header};
use axum::response::Response;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::debug;

use crate::routing::{RouteAction, decide};

#[derive(Clone)]
pub struct LocaleRewriteLayer;

impl<S> Layer<S> for LocaleRewriteLayer {
    type Service = LocaleRewriteService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LocaleRewriteService { inner }
    }
}

#[derive(Clone)]
pub struct LocaleRewriteService<S> {
    inner: S,
}

impl<S> Service<Request> for LocaleRewriteService<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        let path = req.uri().path().to_owned();
        let query = req.uri().query().map(str::to_owned);

        match decide(&path) {
            RouteAction::Passthrough => Box::pin(self.inner.call(req)),
            RouteAction::Rewrite(target) => {
                debug!(from = %path, to = %target, "internal rewrite");
                if let Some(uri) = rebuild_uri(&target, query.as_deref()) {
                    *req.uri_mut() = uri;
                }
                Box::pin(self.inner.call(req))
            }
            RouteAction::Redirect(target) => {
                debug!(from = %path, to = %target, "locale redirect");
                let location = match query {
                    Some(ref q) => format!("{target}?{q}"),
                    None => target,
                };
                let response = Response::builder()
                    .status(StatusCode::TEMPORARY_REDIRECT)
                    .header(header::LOCATION, location)
                    .body(axum::body::Body::empty())
                    .expect("static redirect response");
                Box::pin(async move { Ok(response) })
            }
        }
    }
}

/// Swap the path of a request URI, carrying the original query along.
fn rebuild_uri(path: &str, query: Option<&str>) -> Option<Uri> {
    let path_and_query = match query {
        Some(q) => format!("{path}?{q}"),
        None => path.to_owned(),
    };
    path_and_query.parse::<Uri>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebuild_uri_keeps_query() {
        let uri = rebuild_uri("/zh-CN/games", Some("page=2")).unwrap();
        assert_eq!(uri.path(), "/zh-CN/games");
        assert_eq!(uri.query(), Some("page=2"));
    }

    #[test]
    fn rebuild_uri_without_query() {
        let uri = rebuild_uri("/api/sitemap/zh-TW", None).unwrap();
        assert_eq!(uri.path(), "/api/sitemap/zh-TW");
        assert_eq!(uri.query(), None);
    }
}
