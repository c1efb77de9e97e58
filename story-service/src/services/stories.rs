use crate::dtos::{Pagination, StoriesResponse, StoryDetail, StoryItem};
use crate::services::query::{skip_for_page, StoryFilter, PAGE_SIZE};
use crate::services::store::StoryStore;
use metrics::counter;
use mongodb::bson::oid::ObjectId;
use service_core::error::AppError;
use std::sync::Arc;

/// Story listing and lookup over an injected store.
///
/// Without a store the service is "unconfigured": listings degrade to an
/// empty page, detail lookups fail with a configuration error.
#[derive(Clone)]
pub struct StoryService {
    store: Option<Arc<dyn StoryStore>>,
}

impl StoryService {
    pub fn new(store: Arc<dyn StoryStore>) -> Self {
        Self { store: Some(store) }
    }

    pub fn unconfigured() -> Self {
        Self { store: None }
    }

    pub fn is_configured(&self) -> bool {
        self.store.is_some()
    }

    /// One page of visible stories. An unconfigured or unreachable store
    /// yields an empty page with `total = 0`; any other store error is
    /// returned.
    pub async fn list_stories(
        &self,
        page: u64,
        filter: &StoryFilter,
    ) -> Result<StoriesResponse, AppError> {
        let Some(store) = &self.store else {
            tracing::warn!(page, "Story store not configured; returning empty page");
            counter!("story_list_requests_total", "outcome" => "unconfigured").increment(1);
            return Ok(StoriesResponse::empty(page));
        };

        let skip = skip_for_page(page);
        let result = tokio::try_join!(
            store.count_stories(filter),
            store.find_stories(filter, skip, PAGE_SIZE),
        );

        match result {
            Ok((total, listings)) => {
                counter!("story_list_requests_total", "outcome" => "ok").increment(1);
                tracing::debug!(
                    page,
                    total,
                    returned = listings.len(),
                    collections = ?filter.collections,
                    search = ?filter.search,
                    "Listed stories"
                );
                Ok(StoriesResponse {
                    items: listings.into_iter().map(StoryItem::from).collect(),
                    pagination: Pagination::new(page, total),
                })
            }
            Err(e @ (AppError::DatabaseError(_) | AppError::ServiceUnavailable)) => {
                tracing::error!(page, error = %e, "Story store unavailable; returning empty page");
                counter!("story_list_requests_total", "outcome" => "store_unavailable").increment(1);
                Ok(StoriesResponse::empty(page))
            }
            Err(e) => {
                tracing::error!(page, error = %e, "Story listing failed");
                counter!("story_list_requests_total", "outcome" => "store_error").increment(1);
                Err(e)
            }
        }
    }

    /// A single visible story by its hex ObjectId.
    pub async fn get_story(&self, story_id: &str) -> Result<StoryDetail, AppError> {
        let id = ObjectId::parse_str(story_id).map_err(|_| {
            counter!("story_detail_requests_total", "outcome" => "invalid_id").increment(1);
            AppError::BadRequest(anyhow::anyhow!("Invalid story id: {}", story_id))
        })?;

        let store = self.store.as_ref().ok_or_else(|| {
            tracing::error!(story_id = %id, "Story store not configured");
            counter!("story_detail_requests_total", "outcome" => "unconfigured").increment(1);
            AppError::ConfigError(anyhow::anyhow!("Database not configured"))
        })?;

        let story = store
            .find_story(id)
            .await
            .inspect_err(|_| {
                counter!("story_detail_requests_total", "outcome" => "store_error").increment(1);
            })?
            .ok_or_else(|| {
                counter!("story_detail_requests_total", "outcome" => "not_found").increment(1);
                AppError::NotFound(anyhow::anyhow!("Story not found"))
            })?;

        counter!("story_detail_requests_total", "outcome" => "ok").increment(1);
        Ok(StoryDetail::from(story))
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        match &self.store {
            Some(store) => store.health_check().await,
            None => Err(AppError::ServiceUnavailable),
        }
    }
}
