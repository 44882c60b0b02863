//! Request-host validation for sitemap generation.
//!
//! Sitemap `<loc>` entries embed an absolute origin taken from the incoming
//! request, so a spoofed Host header could otherwise make us emit sitemaps
//! pointing crawlers at an attacker-controlled domain (content scraping via
//! DNS aliasing). Every candidate host is checked against an allowlist; an
//! untrusted host degrades to the configured canonical origin rather than
//! failing the request.

use axum::http::HeaderMap;
use axum::http::header;
use tracing::warn;
use url::Url;

/// Allowlist of trusted hosts plus the canonical origin used when a request
/// host is untrusted. Built once from config and shared via `AppState`.
#[derive(Debug, Clone)]
pub struct HostPolicy {
    /// Exact `host[:port]` entries or `*.domain.tld` wildcard suffixes.
    allowed_hosts: Vec<String>,
    /// Full origin (`scheme://host`) returned for untrusted requests.
    default_origin: String,
}

impl HostPolicy {
    pub fn new(allowed_hosts: Vec<String>, default_origin: String) -> Self {
        Self {
            allowed_hosts,
            default_origin,
        }
    }

    /// Validate a full request URL and return a trusted origin string.
    ///
    /// Accepts when the URL's `host[:port]` matches an allowlist entry
    /// exactly, or ends with the suffix of a `*.`-prefixed entry. Rejection
    /// is not an error: it logs and returns the canonical default origin.
    pub fn validate(&self, request_url: &Url) -> String {
        let Some(host) = host_with_port(request_url) else {
            warn!("request URL has no host, using default origin");
            return self.default_origin.clone();
        };

        let allowed = self.allowed_hosts.iter().any(|entry| {
            if host == *entry {
                return true;
            }
            if let Some(suffix) = entry.strip_prefix("*.") {
                return host.ends_with(suffix);
            }
            false
        });

        if !allowed {
            warn!(host = %host, "untrusted request host, using default origin");
            return self.default_origin.clone();
        }

        format!("{}://{}", request_url.scheme(), host)
    }

    /// Resolve a trusted origin from request headers.
    ///
    /// Reconstructs the external URL from `Host` and `X-Forwarded-Proto`
    /// (the service terminates plain HTTP behind an edge proxy), then
    /// validates it.
    pub fn origin_for_request(&self, headers: &HeaderMap) -> String {
        let Some(host) = headers.get(header::HOST).and_then(|v| v.to_str().ok()) else {
            warn!("request carries no Host header, using default origin");
            return self.default_origin.clone();
        };
        let scheme = headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("http");

        match Url::parse(&format!("{scheme}://{host}/")) {
            Ok(url) => self.validate(&url),
            Err(e) => {
                warn!(host = %host, error = %e, "unparseable request host, using default origin");
                self.default_origin.clone()
            }
        }
    }
}

/// `host` or `host:port`, matching how allowlist entries are written.
fn host_with_port(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    match url.port() {
        Some(port) => Some(format!("{host}:{port}")),
        None => Some(host.to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> HostPolicy {
        HostPolicy::new(
            vec![
                "example.com".to_owned(),
                "localhost:3000".to_owned(),
                "*.pages.dev".to_owned(),
            ],
            "https://example.com".to_owned(),
        )
    }

    #[test]
    fn exact_host_is_accepted() {
        let url = Url::parse("https://example.com/sitemap.xml").unwrap();
        assert_eq!(policy().validate(&url), "https://example.com");
    }

    #[test]
    fn exact_host_with_port_is_accepted() {
        let url = Url::parse("http://localhost:3000/sitemap.xml").unwrap();
        assert_eq!(policy().validate(&url), "http://localhost:3000");
    }

    #[test]
    fn wildcard_subdomain_is_accepted() {
        let url = Url::parse("https://preview.pages.dev/sitemap.xml").unwrap();
        assert_eq!(policy().validate(&url), "https://preview.pages.dev");
    }

    #[test]
    fn untrusted_host_degrades_to_default_origin() {
        let url = Url::parse("https://evil.com/sitemap.xml").unwrap();
        assert_eq!(policy().validate(&url), "https://example.com");
    }

    #[test]
    fn origin_from_headers_respects_forwarded_proto() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, "example.com".parse().unwrap());
        headers.insert("x-forwarded-proto", "https".parse().unwrap());
        assert_eq!(policy().origin_for_request(&headers), "https://example.com");
    }

    #[test]
    fn missing_host_header_degrades_to_default_origin() {
        let headers = HeaderMap::new();
        assert_eq!(policy().origin_for_request(&headers), "https://example.com");
    }
}
