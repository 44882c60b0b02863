//! Client for the backend content API.
//!
//! Thin reqwest wrapper over the public list endpoints the sitemap needs:
//! games, boxes, categories, and strategy articles. Every request carries
//! the site id; an API key header is added when configured.

pub mod errors;
pub mod models;

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;

pub use errors::BackendError;
use models::{Article, ArticleSection, Category, Game, GameBox, ListEnvelope};

use crate::locale::Locale;

/// Business-level success code in the response envelope.
const CODE_OK: i64 = 200;

pub struct BackendApi {
    http: reqwest::Client,
    base_url: String,
    site_id: String,
    api_key: Option<String>,
}

impl BackendApi {
    pub fn new(
        base_url: String,
        site_id: String,
        api_key: Option<String>,
    ) -> Result<Self, anyhow::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            site_id,
            api_key,
        })
    }

    /// `GET /api/public/games` for one locale.
    ///
    /// `page_size` acts as a ceiling, not true pagination: callers that want
    /// "everything" pass a large size and accept silent truncation beyond it.
    pub async fn list_games(
        &self,
        locale: Locale,
        page_num: u32,
        page_size: u32,
    ) -> Result<Vec<Game>, BackendError> {
        let envelope: ListEnvelope<Game> = self
            .get_list(
                "/api/public/games",
                &[
                    ("locale", locale.backend_code().to_owned()),
                    ("pageNum", page_num.to_string()),
                    ("pageSize", page_size.to_string()),
                ],
            )
            .await?;
        Ok(envelope.into_items())
    }

    /// `GET /api/public/boxes` for one locale. Same pagination ceiling as
    /// [`list_games`](Self::list_games).
    pub async fn list_boxes(
        &self,
        locale: Locale,
        page_num: u32,
        page_size: u32,
    ) -> Result<Vec<GameBox>, BackendError> {
        let envelope: ListEnvelope<GameBox> = self
            .get_list(
                "/api/public/boxes",
                &[
                    ("locale", locale.backend_code().to_owned()),
                    ("pageNum", page_num.to_string()),
                    ("pageSize", page_size.to_string()),
                ],
            )
            .await?;
        Ok(envelope.into_items())
    }

    /// `GET /api/public/categories` filtered to one category type
    /// (currently always `game`).
    pub async fn list_categories(
        &self,
        locale: Locale,
        category_type: &str,
    ) -> Result<Vec<Category>, BackendError> {
        let envelope: ListEnvelope<Category> = self
            .get_list(
                "/api/public/categories",
                &[
                    ("locale", locale.backend_code().to_owned()),
                    ("categoryType", category_type.to_owned()),
                ],
            )
            .await?;
        Ok(envelope.into_items())
    }

    /// `GET /api/public/strategies` filtered by section (guides vs news).
    pub async fn list_strategies(
        &self,
        locale: Locale,
        page_num: u32,
        page_size: u32,
        section: ArticleSection,
    ) -> Result<Vec<Article>, BackendError> {
        let envelope: ListEnvelope<Article> = self
            .get_list(
                "/api/public/strategies",
                &[
                    ("locale", locale.backend_code().to_owned()),
                    ("pageNum", page_num.to_string()),
                    ("pageSize", page_size.to_string()),
                    ("section", section.as_str().to_owned()),
                ],
            )
            .await?;
        Ok(envelope.into_items())
    }

    /// Shared GET-and-decode path for all list endpoints.
    ///
    /// Non-2xx HTTP, a non-200 business code, and malformed JSON all surface
    /// as errors; the sitemap fetchers treat them identically.
    async fn get_list<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<ListEnvelope<T>, BackendError> {
        let url = format!("{}{endpoint}", self.base_url);
        debug!(url = %url, "backend request");

        let mut request = self
            .http
            .get(&url)
            .query(params)
            .query(&[("siteId", self.site_id.as_str())]);
        if let Some(ref key) = self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await.map_err(|source| {
            BackendError::Transport {
                url: url.clone(),
                source,
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| BackendError::Transport {
                url: url.clone(),
                source,
            })?;

        let envelope = decode_envelope(&url, &body)?;
        Ok(envelope)
    }
}

/// Decode an envelope, reporting the serde path on failure and rejecting
/// non-200 business codes.
fn decode_envelope<T: DeserializeOwned>(
    url: &str,
    body: &str,
) -> Result<ListEnvelope<T>, BackendError> {
    let deserializer = &mut serde_json::Deserializer::from_str(body);
    let envelope: ListEnvelope<T> =
        serde_path_to_error::deserialize(deserializer).map_err(|err| BackendError::Decode {
            url: url.to_owned(),
            path: err.path().to_string(),
            source: err.into_inner(),
        })?;

    if envelope.code != CODE_OK {
        return Err(BackendError::Api {
            code: envelope.code,
            url: url.to_owned(),
            msg: envelope.msg.unwrap_or_default(),
        });
    }
    Ok(envelope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::Game;

    #[test]
    fn decode_rejects_non_success_business_code() {
        let body = r#"{"code":500,"msg":"backend exploded"}"#;
        let err = decode_envelope::<Game>("http://backend/api/public/games", body).unwrap_err();
        match err {
            BackendError::Api { code, msg, .. } => {
                assert_eq!(code, 500);
                assert_eq!(msg, "backend exploded");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn decode_reports_serde_path_on_malformed_items() {
        let body = r#"{"code":200,"rows":[{"id":"not-a-number"}]}"#;
        let err = decode_envelope::<Game>("http://backend/api/public/games", body).unwrap_err();
        match err {
            BackendError::Decode { path, .. } => assert!(path.contains("rows[0]")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn decode_accepts_success_envelope() {
        let body = r#"{"code":200,"rows":[{"id":3,"updateTime":"2025-01-01"}],"total":1}"#;
        let envelope = decode_envelope::<Game>("http://backend/api/public/games", body).unwrap();
        let items = envelope.into_items();
        assert_eq!(items[0].id, 3);
        assert_eq!(items[0].update_time.as_deref(), Some("2025-01-01"));
    }
}
