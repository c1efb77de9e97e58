use crate::models::{RefArticle, Story, StoryListing};
use crate::services::query::{skip_for_page, PAGE_SIZE};
use crate::services::shaping::{cover_images, summary_sentences};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

fn default_page() -> i64 {
    1
}

/// Query string of `GET /stories`. `collections` may repeat.
#[derive(Debug, Deserialize, Validate)]
pub struct StoryListParams {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, max = 1_000_000, message = "page must be between 1 and 1000000"))]
    pub page: i64,
    #[serde(default)]
    pub collections: Vec<String>,
    #[validate(length(max = 200, message = "search must be at most 200 characters"))]
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoryItem {
    pub id: String,
    pub headline: String,
    pub latest_ref_article_at: DateTime<Utc>,
    pub cover_images: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
    pub has_next: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoriesResponse {
    pub items: Vec<StoryItem>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RefArticleResponse {
    pub article_id: String,
    pub url: String,
    pub title: String,
    pub update_date: DateTime<Utc>,
    pub source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoryDetail {
    pub id: String,
    pub headline: String,
    pub summary: Vec<String>,
    pub cover_images: Vec<String>,
    pub latest_ref_article_at: DateTime<Utc>,
    pub ref_articles: Vec<RefArticleResponse>,
}

impl Pagination {
    pub fn new(page: u64, total: u64) -> Self {
        let skip = skip_for_page(page);
        Self {
            page,
            page_size: PAGE_SIZE,
            total,
            has_next: skip.saturating_add(PAGE_SIZE) < total,
        }
    }
}

impl StoriesResponse {
    pub fn empty(page: u64) -> Self {
        Self {
            items: Vec::new(),
            pagination: Pagination::new(page, 0),
        }
    }
}

impl From<StoryListing> for StoryItem {
    fn from(listing: StoryListing) -> Self {
        let cover_images = cover_images(
            listing
                .ref_articles()
                .iter()
                .map(|article| article.cover_image.as_deref()),
        );
        Self {
            id: listing.id.to_hex(),
            headline: listing.headline,
            latest_ref_article_at: listing.latest_ref_article_at,
            cover_images,
        }
    }
}

impl From<RefArticle> for RefArticleResponse {
    fn from(article: RefArticle) -> Self {
        Self {
            article_id: article.article_id,
            url: article.url,
            title: article.title,
            update_date: article.update_date,
            source: article.source,
        }
    }
}

impl From<Story> for StoryDetail {
    fn from(story: Story) -> Self {
        let cover_images = cover_images(
            story
                .ref_articles()
                .iter()
                .map(|article| article.cover_image.as_deref()),
        );
        Self {
            id: story.id.to_hex(),
            headline: story.headline,
            summary: summary_sentences(story.summary),
            cover_images,
            latest_ref_article_at: story.latest_ref_article_at,
            ref_articles: story
                .ref_articles
                .unwrap_or_default()
                .into_iter()
                .map(RefArticleResponse::from)
                .collect(),
        }
    }
}
