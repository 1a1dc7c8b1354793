use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use super::sort::SortKey;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ArticleStatus {
    #[default]
    Draft,
    Published,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub preview: String,
    pub content: String,
    pub image_url: Option<String>,
    pub author_id: i64,
    pub views: i64,
    pub tags: Json<Vec<String>>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub status: ArticleStatus,
    pub published_at: Option<NaiveDateTime>,
    pub institution_id: Option<i64>,
    pub psychologist_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct NewArticle {
    pub title: String,
    #[serde(default)]
    pub preview: String,
    pub content: String,
    pub image_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub institution_id: Option<i64>,
    pub psychologist_id: Option<i64>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateArticle {
    pub title: Option<String>,
    pub preview: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub tags: Option<Vec<String>>,
    pub institution_id: Option<i64>,
    pub psychologist_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleSortKey {
    Id,
    Title,
    Views,
    Status,
    #[default]
    CreatedAt,
    UpdatedAt,
    PublishedAt,
}

impl SortKey for ArticleSortKey {
    fn column(&self) -> &'static str {
        match self {
            ArticleSortKey::Id => "id",
            ArticleSortKey::Title => "title",
            ArticleSortKey::Views => "views",
            ArticleSortKey::Status => "status",
            ArticleSortKey::CreatedAt => "created_at",
            ArticleSortKey::UpdatedAt => "updated_at",
            ArticleSortKey::PublishedAt => "published_at",
        }
    }
}
