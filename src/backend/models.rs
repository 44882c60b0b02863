//! Wire types for the backend content API.
//!
//! Every list endpoint responds with the same envelope: a business `code`
//! (200 on success), an optional message, and the payload under either
//! `rows` (paginated lists) or `data` (plain lists). Item fields are kept
//! optional wherever the backend has been observed to omit them.

use serde::Deserialize;

/// Common list-response envelope.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ListEnvelope<T> {
    pub code: i64,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub rows: Option<Vec<T>>,
    #[serde(default)]
    pub data: Option<Vec<T>>,
    #[serde(default)]
    pub total: Option<i64>,
}

impl<T> ListEnvelope<T> {
    /// The payload, regardless of which envelope field carried it.
    pub fn into_items(self) -> Vec<T> {
        self.rows.or(self.data).unwrap_or_default()
    }
}

/// A game in the catalog. Detail pages live at `/games/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub update_time: Option<String>,
}

/// A downloadable game box. Detail at `/boxes/{id}`, download page at
/// `/boxes/{id}/download`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameBox {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub update_time: Option<String>,
}

/// A game category. Routed by slug, with the numeric id as fallback for
/// categories that predate slugs.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl Category {
    /// Route segment for `/games/category/{segment}`.
    pub fn route_segment(&self) -> String {
        match self.slug {
            Some(ref slug) if !slug.is_empty() => slug.clone(),
            _ => self.id.to_string(),
        }
    }
}

/// A strategy article, discriminated into guides and news by `section`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub update_time: Option<String>,
}

/// The `section` filter value for the strategies endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleSection {
    Guide,
    News,
}

impl ArticleSection {
    pub fn as_str(self) -> &'static str {
        match self {
            ArticleSection::Guide => "guide",
            ArticleSection::News => "news",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_prefers_rows_over_data() {
        let json = r#"{"code":200,"rows":[{"id":1}],"data":[{"id":2}],"total":1}"#;
        let envelope: ListEnvelope<Game> = serde_json::from_str(json).unwrap();
        let items = envelope.into_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, 1);
    }

    #[test]
    fn envelope_with_neither_field_is_empty() {
        let json = r#"{"code":200,"msg":"ok"}"#;
        let envelope: ListEnvelope<Game> = serde_json::from_str(json).unwrap();
        assert!(envelope.into_items().is_empty());
    }

    #[test]
    fn category_route_segment_falls_back_to_id() {
        let with_slug: Category =
            serde_json::from_str(r#"{"id":7,"slug":"rpg","name":"RPG"}"#).unwrap();
        assert_eq!(with_slug.route_segment(), "rpg");

        let without_slug: Category = serde_json::from_str(r#"{"id":7}"#).unwrap();
        assert_eq!(without_slug.route_segment(), "7");

        let empty_slug: Category = serde_json::from_str(r#"{"id":7,"slug":""}"#).unwrap();
        assert_eq!(empty_slug.route_segment(), "7");
    }
}
