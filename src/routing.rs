//! Locale- and sitemap-aware request routing decisions.
//!
//! [`decide`] is a pure function from a request path to the action the edge
//! layer should take. Rule order is a correctness invariant:
//!
//! 1. sitemap-file rewrite (`/sitemap-...xml` -> `/api/sitemap/...`)
//! 2. bypass for assets, API routes, and SEO files
//! 3. redirect default-locale-prefixed URLs to the unprefixed canonical form
//! 4. pass through non-default locale prefixes
//! 5. rewrite everything else to the default locale's internal path
//!
//! Swapping 3/4/5 either loops redirects through rule 5's rewrite or leaks
//! the default locale into visible URLs.

use crate::locale::{DEFAULT_LOCALE, Locale};
use crate::sitemap::types::ContentType;

/// What the edge layer should do with a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAction {
    /// Serve `target` internally; the visible URL stays as requested.
    Rewrite(String),
    /// Send the client to `target`.
    Redirect(String),
    /// Hand the path to the router unchanged.
    Passthrough,
}

/// Resolve the action for a request path. Exactly one rule applies.
pub fn decide(path: &str) -> RouteAction {
    if let Some(target) = sitemap_rewrite(path) {
        return RouteAction::Rewrite(target);
    }

    if is_bypassed(path) {
        return RouteAction::Passthrough;
    }

    let default_prefix = format!("/{}", DEFAULT_LOCALE.as_str());
    if path == default_prefix {
        return RouteAction::Redirect("/".to_owned());
    }
    if let Some(rest) = path.strip_prefix(&format!("{default_prefix}/")) {
        return RouteAction::Redirect(format!("/{rest}"));
    }

    if Locale::from_path(path) != DEFAULT_LOCALE {
        return RouteAction::Passthrough;
    }

    RouteAction::Rewrite(format!("{default_prefix}{path}"))
}

/// Parse `/sitemap-<token>.xml` into its internal API route.
///
/// The token splits on its last `-`: if the tail is a known content type and
/// the head is a valid locale, the request addresses a leaf sitemap.
/// Anything else is treated as a locale-only request and left for the API
/// route to 404; unrecognized trailing tokens stay part of the locale
/// token rather than being rejected here.
fn sitemap_rewrite(path: &str) -> Option<String> {
    let token = path.strip_prefix("/sitemap-")?.strip_suffix(".xml")?;

    if let Some((head, tail)) = token.rsplit_once('-')
        && !head.is_empty()
        && tail.parse::<ContentType>().is_ok()
        && head.parse::<Locale>().is_ok()
    {
        return Some(format!("/api/sitemap/{head}/{tail}"));
    }

    Some(format!("/api/sitemap/{token}"))
}

/// Paths the locale rules must never touch: framework assets, the API
/// surface, and SEO/static files served as-is.
fn is_bypassed(path: &str) -> bool {
    path.starts_with("/_next")
        || path == "/api"
        || path.starts_with("/api/")
        || path == "/robots.txt"
        || path == "/sitemap.xml"
        || path.ends_with(".xsl")
        || path.ends_with(".css")
        || path.ends_with(".js")
}
