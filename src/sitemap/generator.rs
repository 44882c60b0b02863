//! Pure XML renderers for the three sitemap document kinds.
//!
//! The hierarchy is root index (one entry per locale) -> locale index (one
//! entry per content type) -> leaf url-set. All three are plain string
//! builders over already-fetched records; no I/O happens here.

use chrono::Utc;

use crate::locale::{Locale, SUPPORTED_LOCALES};
use crate::sitemap::types::{AlternateLink, CONTENT_TYPES, SitemapUrl};

const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
     <?xml-stylesheet type=\"text/xsl\" href=\"/sitemap.xsl\"?>\n";

/// Escape a value for use as XML element text.
fn xml_text(value: &str) -> String {
    html_escape::encode_text(value).into_owned()
}

/// Escape a value for use inside a double-quoted XML attribute.
fn xml_attr(value: &str) -> String {
    html_escape::encode_double_quoted_attribute(value).into_owned()
}

/// Absolute URL for `path` under `origin` in the given locale.
///
/// The root path is special-cased: a prefixed locale's homepage is
/// `{origin}{prefix}`, not `{origin}{prefix}/` glued onto another slash.
pub fn localized_url(origin: &str, locale: Locale, path: &str) -> String {
    let prefix = locale.prefix();
    if path == "/" && !prefix.is_empty() {
        return format!("{origin}{prefix}");
    }
    format!("{origin}{prefix}{path}")
}

/// One alternate link per supported locale for the same logical path, in
/// declaration order.
pub fn alternate_urls(path: &str, origin: &str) -> Vec<AlternateLink> {
    SUPPORTED_LOCALES
        .into_iter()
        .map(|locale| AlternateLink {
            locale: locale.as_str(),
            href: localized_url(origin, locale, path),
        })
        .collect()
}

/// `GET /sitemap.xml` body: a `<sitemapindex>` pointing at each locale's
/// per-locale index.
pub fn render_root_index(origin: &str) -> String {
    let lastmod = Utc::now().to_rfc3339();

    let mut xml = String::from(XML_HEADER);
    xml.push_str("<sitemapindex xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");
    for locale in SUPPORTED_LOCALES {
        xml.push_str(&format!(
            "  <sitemap>\n    <loc>{}/sitemap-{}.xml</loc>\n    <lastmod>{lastmod}</lastmod>\n  </sitemap>\n",
            xml_text(origin),
            locale.as_str(),
        ));
    }
    xml.push_str("</sitemapindex>\n");
    xml
}

/// Per-locale index body: a `<sitemapindex>` pointing at each content type's
/// leaf sitemap for that locale, in the fixed content-type order.
pub fn render_locale_index(locale: Locale, origin: &str) -> String {
    let lastmod = Utc::now().to_rfc3339();

    let mut xml = String::from(XML_HEADER);
    xml.push_str("<sitemapindex xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");
    for content_type in CONTENT_TYPES {
        xml.push_str(&format!(
            "  <sitemap>\n    <loc>{}/sitemap-{}-{}.xml</loc>\n    <lastmod>{lastmod}</lastmod>\n  </sitemap>\n",
            xml_text(origin),
            locale.as_str(),
            content_type.as_str(),
        ));
    }
    xml.push_str("</sitemapindex>\n");
    xml
}

/// Leaf body: a `<urlset>` with one `<url>` block per record. Alternates are
/// declared with `xhtml:link rel="alternate"` entries, hence the extra
/// namespace.
pub fn render_leaf(urls: &[SitemapUrl]) -> String {
    let mut xml = String::from(XML_HEADER);
    xml.push_str(
        "<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\"\n        \
         xmlns:xhtml=\"http://www.w3.org/1999/xhtml\">\n",
    );

    for url in urls {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", xml_text(&url.loc)));
        if let Some(ref lastmod) = url.lastmod {
            xml.push_str(&format!("    <lastmod>{}</lastmod>\n", xml_text(lastmod)));
        }
        if let Some(changefreq) = url.changefreq {
            xml.push_str(&format!(
                "    <changefreq>{}</changefreq>\n",
                changefreq.as_str()
            ));
        }
        if let Some(priority) = url.priority {
            xml.push_str(&format!("    <priority>{priority:.1}</priority>\n"));
        }
        for alt in &url.alternates {
            xml.push_str(&format!(
                "    <xhtml:link rel=\"alternate\" hreflang=\"{}\" href=\"{}\"/>\n",
                xml_attr(alt.locale),
                xml_attr(&alt.href),
            ));
        }
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}
