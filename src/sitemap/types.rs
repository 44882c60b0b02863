//! Record types shared by the sitemap fetchers and renderers.

use std::fmt;
use std::str::FromStr;

/// How often a page is expected to change, per the sitemaps.org protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeFrequency::Always => "always",
            ChangeFrequency::Hourly => "hourly",
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
            ChangeFrequency::Yearly => "yearly",
            ChangeFrequency::Never => "never",
        }
    }
}

/// The five page categories that get their own leaf sitemap per locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Static,
    Games,
    Boxes,
    Guides,
    News,
}

/// Leaf-sitemap order within a locale index. Fixed; crawlers see this order.
pub const CONTENT_TYPES: [ContentType; 5] = [
    ContentType::Static,
    ContentType::Games,
    ContentType::Boxes,
    ContentType::Guides,
    ContentType::News,
];

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Static => "static",
            ContentType::Games => "games",
            ContentType::Boxes => "boxes",
            ContentType::Guides => "guides",
            ContentType::News => "news",
        }
    }

    /// Default `(changefreq, priority)` used when an emitted URL carries no
    /// per-item override.
    pub fn defaults(self) -> (ChangeFrequency, f32) {
        match self {
            ContentType::Static => (ChangeFrequency::Daily, 1.0),
            ContentType::Games => (ChangeFrequency::Daily, 0.9),
            ContentType::Boxes => (ChangeFrequency::Weekly, 0.8),
            ContentType::Guides => (ChangeFrequency::Weekly, 0.7),
            ContentType::News => (ChangeFrequency::Weekly, 0.7),
        }
    }
}

impl FromStr for ContentType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CONTENT_TYPES
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A same-content URL in another locale, declared via `xhtml:link` in leaf
/// sitemaps.
#[derive(Debug, Clone, PartialEq)]
pub struct AlternateLink {
    pub locale: &'static str,
    pub href: String,
}

/// One discoverable page. Built fresh per sitemap request, serialized to XML,
/// then discarded.
#[derive(Debug, Clone)]
pub struct SitemapUrl {
    /// Absolute URL, unique within its leaf sitemap.
    pub loc: String,
    /// ISO-8601 timestamp of the last content change.
    pub lastmod: Option<String>,
    pub changefreq: Option<ChangeFrequency>,
    /// Crawl priority in `[0.0, 1.0]`.
    pub priority: Option<f32>,
    /// One entry per supported locale, in declaration order.
    pub alternates: Vec<AlternateLink>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_parses_its_own_name() {
        for ct in CONTENT_TYPES {
            assert_eq!(ct.as_str().parse::<ContentType>(), Ok(ct));
        }
        assert!("articles".parse::<ContentType>().is_err());
    }

    #[test]
    fn defaults_stay_within_priority_bounds() {
        for ct in CONTENT_TYPES {
            let (_, priority) = ct.defaults();
            assert!((0.0..=1.0).contains(&priority));
        }
    }
}
