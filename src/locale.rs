//! Supported locales and URL-prefix resolution.
//!
//! The site serves three languages. The default locale (`zh-CN`) is never
//! visible in URLs; the other two are addressed by a `/xx-XX` path prefix.

use std::fmt;
use std::str::FromStr;

/// A supported content locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locale {
    ZhCn,
    ZhTw,
    EnUs,
}

/// All supported locales, in declaration order.
///
/// Alternate-link generation and the root sitemap index iterate this slice,
/// so the order here is the order crawlers see.
pub const SUPPORTED_LOCALES: [Locale; 3] = [Locale::ZhCn, Locale::ZhTw, Locale::EnUs];

/// The locale served without a URL prefix.
pub const DEFAULT_LOCALE: Locale = Locale::ZhCn;

impl Locale {
    pub fn as_str(self) -> &'static str {
        match self {
            Locale::ZhCn => "zh-CN",
            Locale::ZhTw => "zh-TW",
            Locale::EnUs => "en-US",
        }
    }

    /// URL path prefix for this locale: empty for the default locale,
    /// `/xx-XX` for all others.
    pub fn prefix(self) -> &'static str {
        match self {
            Locale::ZhCn => "",
            Locale::ZhTw => "/zh-TW",
            Locale::EnUs => "/en-US",
        }
    }

    /// Locale code in the format the backend content API expects.
    ///
    /// Currently an identity mapping, but kept as an explicit seam since the
    /// backend's format is not ours to control.
    pub fn backend_code(self) -> &'static str {
        self.as_str()
    }

    /// Resolve the locale a request path addresses.
    ///
    /// Total: any path that doesn't start with a non-default locale's prefix
    /// belongs to the default locale.
    pub fn from_path(path: &str) -> Locale {
        for locale in SUPPORTED_LOCALES {
            let prefix = locale.prefix();
            if prefix.is_empty() {
                continue;
            }
            if let Some(rest) = path.strip_prefix(prefix)
                && (rest.is_empty() || rest.starts_with('/'))
            {
                return locale;
            }
        }
        DEFAULT_LOCALE
    }
}

impl FromStr for Locale {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SUPPORTED_LOCALES
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
