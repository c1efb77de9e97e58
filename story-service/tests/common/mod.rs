#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use mongodb::bson::oid::ObjectId;
use service_core::config::Config as CoreConfig;
use service_core::error::AppError;
use std::sync::Arc;
use story_service::config::StoryConfig;
use story_service::models::{CoverRef, RefArticle, Story, StoryListing, Summary};
use story_service::services::{StoryFilter, StoryService, StoryStore};
use story_service::startup::Application;

/// A stored story plus the visibility flags the service filters on.
#[derive(Debug, Clone)]
pub struct StoredStory {
    pub story: Story,
    pub is_active: bool,
    pub is_visible: bool,
}

impl StoredStory {
    pub fn new(headline: &str, latest_ref_article_at: DateTime<Utc>) -> Self {
        Self {
            story: Story {
                id: ObjectId::new(),
                headline: headline.to_string(),
                summary: None,
                latest_ref_article_at,
                ref_articles: Some(Vec::new()),
            },
            is_active: true,
            is_visible: true,
        }
    }

    pub fn id(&self) -> String {
        self.story.id.to_hex()
    }

    pub fn summary(mut self, summary: &str) -> Self {
        self.story.summary = Some(Summary::Text(summary.to_string()));
        self
    }

    pub fn article(mut self, collection: &str, cover_image: Option<&str>) -> Self {
        let articles = self.story.ref_articles.get_or_insert_with(Vec::new);
        let n = articles.len() + 1;
        articles.push(RefArticle {
            article_id: format!("{}-{}", collection, n),
            url: format!("https://news.example/{}/{}", collection, n),
            title: format!("{} article {}", collection, n),
            update_date: self.story.latest_ref_article_at,
            source: collection.to_string(),
            cover_image: cover_image.map(str::to_string),
            collection: Some(collection.to_string()),
        });
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.is_visible = false;
        self
    }
}

/// In-memory stand-in for the MongoDB collection, applying the same
/// filter, sort and paging rules as the query documents.
#[derive(Default)]
pub struct MemoryStoryStore {
    stories: Vec<StoredStory>,
}

impl MemoryStoryStore {
    pub fn new(stories: Vec<StoredStory>) -> Self {
        Self { stories }
    }

    fn matching(&self, filter: &StoryFilter) -> Vec<&Story> {
        let mut matches: Vec<&Story> = self
            .stories
            .iter()
            .filter(|stored| stored.is_active && stored.is_visible)
            .filter(|stored| {
                filter.collections.is_empty()
                    || stored.story.ref_articles().iter().any(|article| {
                        article
                            .collection
                            .as_ref()
                            .is_some_and(|c| filter.collections.contains(c))
                    })
            })
            .filter(|stored| match &filter.search {
                None => true,
                Some(term) => {
                    let term = term.to_lowercase();
                    let summary_hit = match &stored.story.summary {
                        Some(Summary::Text(text)) => text.to_lowercase().contains(&term),
                        Some(Summary::Sentences(sentences)) => sentences
                            .iter()
                            .any(|s| s.to_lowercase().contains(&term)),
                        None => false,
                    };
                    stored.story.headline.to_lowercase().contains(&term) || summary_hit
                }
            })
            .map(|stored| &stored.story)
            .collect();

        matches.sort_by(|a, b| {
            b.latest_ref_article_at
                .cmp(&a.latest_ref_article_at)
                .then_with(|| b.id.bytes().cmp(&a.id.bytes()))
        });
        matches
    }
}

#[async_trait]
impl StoryStore for MemoryStoryStore {
    async fn count_stories(&self, filter: &StoryFilter) -> Result<u64, AppError> {
        Ok(self.matching(filter).len() as u64)
    }

    async fn find_stories(
        &self,
        filter: &StoryFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<StoryListing>, AppError> {
        Ok(self
            .matching(filter)
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .map(|story| StoryListing {
                id: story.id,
                headline: story.headline.clone(),
                latest_ref_article_at: story.latest_ref_article_at,
                ref_articles: Some(
                    story
                        .ref_articles()
                        .iter()
                        .map(|article| CoverRef {
                            cover_image: article.cover_image.clone(),
                        })
                        .collect(),
                ),
            })
            .collect())
    }

    async fn find_story(&self, id: ObjectId) -> Result<Option<Story>, AppError> {
        Ok(self
            .stories
            .iter()
            .find(|stored| stored.story.id == id && stored.is_active && stored.is_visible)
            .map(|stored| stored.story.clone()))
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// `count` visible stories, one hour apart, newest first.
pub fn hourly_stories(count: usize) -> Vec<StoredStory> {
    let newest = Utc.with_ymd_and_hms(2026, 2, 23, 12, 0, 0).unwrap();
    (0..count)
        .map(|i| {
            StoredStory::new(
                &format!("Story {}", i),
                newest - Duration::hours(i as i64),
            )
        })
        .collect()
}

pub fn test_config() -> StoryConfig {
    StoryConfig {
        common: CoreConfig {
            port: 0, // Random port for testing
            ..CoreConfig::default()
        },
        mongodb: None,
        request_timeout: std::time::Duration::from_secs(5),
    }
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn(stories: Vec<StoredStory>) -> Self {
        let service = StoryService::new(Arc::new(MemoryStoryStore::new(stories)));
        Self::spawn_with_service(service).await
    }

    pub async fn spawn_unconfigured() -> Self {
        Self::spawn_with_service(StoryService::unconfigured()).await
    }

    pub async fn spawn_with_service(service: StoryService) -> Self {
        let app = Application::build_with_service(test_config(), service)
            .await
            .expect("Failed to build test application");
        Self::run(app).await
    }

    pub async fn run(app: Application) -> Self {
        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
        }
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }
}
