//! Per-content-type URL fetchers.
//!
//! Each fetcher projects one backend list into sitemap records for a single
//! locale. Sitemap generation is best-effort: a fetcher that fails logs the
//! error and contributes an empty list instead of failing the request, so a
//! partial sitemap is served rather than a 500. Nothing here retries; the
//! HTTP cache window self-heals transient failures on the next crawl.

use chrono::Utc;
use tracing::{debug, warn};

use crate::backend::BackendApi;
use crate::backend::models::ArticleSection;
use crate::locale::Locale;
use crate::sitemap::generator::{alternate_urls, localized_url};
use crate::sitemap::types::{ChangeFrequency, ContentType, SitemapUrl};

/// Page-size ceiling for "fetch everything" list calls.
///
/// Known limitation: catalogs larger than this are silently truncated. The
/// backend treats huge page sizes as a bounded query rather than streaming,
/// so this stays a ceiling instead of real pagination.
const PAGE_SIZE_CEILING: u32 = 9999;

/// Top-level pages that exist regardless of backend content.
const STATIC_PATHS: [&str; 6] = [
    "/",
    "/games",
    "/boxes",
    "/content/guides",
    "/content/news",
    "/search",
];

/// Fetch the sitemap records for one `(locale, content type)` pair.
pub async fn fetch_urls_by_type(
    backend: &BackendApi,
    locale: Locale,
    content_type: ContentType,
    origin: &str,
) -> Vec<SitemapUrl> {
    debug!(locale = %locale, content_type = %content_type, "fetching sitemap urls");
    match content_type {
        ContentType::Static => static_urls(locale, origin),
        ContentType::Games => game_urls(backend, locale, origin).await,
        ContentType::Boxes => box_urls(backend, locale, origin).await,
        ContentType::Guides => article_urls(backend, locale, origin, ArticleSection::Guide).await,
        ContentType::News => article_urls(backend, locale, origin, ArticleSection::News).await,
    }
}

/// Build one record with the content type's defaults and full alternates.
fn record(
    origin: &str,
    locale: Locale,
    path: &str,
    lastmod: Option<String>,
    changefreq: ChangeFrequency,
    priority: f32,
) -> SitemapUrl {
    SitemapUrl {
        loc: localized_url(origin, locale, path),
        lastmod: Some(lastmod.unwrap_or_else(|| Utc::now().to_rfc3339())),
        changefreq: Some(changefreq),
        priority: Some(priority),
        alternates: alternate_urls(path, origin),
    }
}

/// The fixed set of top-level pages. No backend call, cannot fail.
fn static_urls(locale: Locale, origin: &str) -> Vec<SitemapUrl> {
    let (changefreq, priority) = ContentType::Static.defaults();
    STATIC_PATHS
        .into_iter()
        .map(|path| record(origin, locale, path, None, changefreq, priority))
        .collect()
}

/// Game detail pages plus game category pages.
///
/// The two backend calls run concurrently and fail independently: a dead
/// categories endpoint still yields the game detail URLs. A failed games
/// call empties the whole fetcher, matching its all-or-nothing list.
async fn game_urls(backend: &BackendApi, locale: Locale, origin: &str) -> Vec<SitemapUrl> {
    let (games, categories) = tokio::join!(
        backend.list_games(locale, 1, PAGE_SIZE_CEILING),
        backend.list_categories(locale, "game"),
    );

    let games = match games {
        Ok(games) => games,
        Err(e) => {
            warn!(locale = %locale, error = %e, "failed to fetch games for sitemap");
            return Vec::new();
        }
    };

    let (changefreq, priority) = ContentType::Games.defaults();
    let mut urls: Vec<SitemapUrl> = games
        .into_iter()
        .map(|game| {
            let path = format!("/games/{}", game.id);
            record(origin, locale, &path, game.update_time, changefreq, priority)
        })
        .collect();

    match categories {
        Ok(categories) => {
            // Category pages are rated independently of the games default.
            for category in categories {
                let path = format!("/games/category/{}", category.route_segment());
                urls.push(record(
                    origin,
                    locale,
                    &path,
                    None,
                    ChangeFrequency::Weekly,
                    0.7,
                ));
            }
        }
        Err(e) => {
            warn!(locale = %locale, error = %e, "failed to fetch game categories for sitemap");
        }
    }

    urls
}

/// Box detail and download pages: two URLs per box, with the download
/// variant pinned at priority 0.7.
async fn box_urls(backend: &BackendApi, locale: Locale, origin: &str) -> Vec<SitemapUrl> {
    let boxes = match backend.list_boxes(locale, 1, PAGE_SIZE_CEILING).await {
        Ok(boxes) => boxes,
        Err(e) => {
            warn!(locale = %locale, error = %e, "failed to fetch boxes for sitemap");
            return Vec::new();
        }
    };

    let (changefreq, priority) = ContentType::Boxes.defaults();
    let mut urls = Vec::with_capacity(boxes.len() * 2);
    for game_box in boxes {
        let detail_path = format!("/boxes/{}", game_box.id);
        urls.push(record(
            origin,
            locale,
            &detail_path,
            game_box.update_time.clone(),
            changefreq,
            priority,
        ));

        let download_path = format!("/boxes/{}/download", game_box.id);
        urls.push(record(
            origin,
            locale,
            &download_path,
            game_box.update_time,
            changefreq,
            0.7,
        ));
    }
    urls
}

/// Guides and news both come from the strategies endpoint, split by the
/// `section` discriminator, and route under `/content/{section}s/{id}`.
async fn article_urls(
    backend: &BackendApi,
    locale: Locale,
    origin: &str,
    section: ArticleSection,
) -> Vec<SitemapUrl> {
    let articles = match backend
        .list_strategies(locale, 1, PAGE_SIZE_CEILING, section)
        .await
    {
        Ok(articles) => articles,
        Err(e) => {
            warn!(locale = %locale, section = section.as_str(), error = %e, "failed to fetch articles for sitemap");
            return Vec::new();
        }
    };

    let content_type = match section {
        ArticleSection::Guide => ContentType::Guides,
        ArticleSection::News => ContentType::News,
    };
    let (changefreq, priority) = content_type.defaults();
    let base = match section {
        ArticleSection::Guide => "/content/guides",
        ArticleSection::News => "/content/news",
    };

    articles
        .into_iter()
        .map(|article| {
            let path = format!("{base}/{}", article.id);
            record(
                origin,
                locale,
                &path,
                article.update_time,
                changefreq,
                priority,
            )
        })
        .collect()
}
