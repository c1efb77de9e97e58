use crate::models::{Story, StoryListing};
use crate::services::query::StoryFilter;
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use service_core::error::AppError;

/// Read access to the story collection.
///
/// Implementations apply the visibility rules themselves: nothing that is
/// inactive or hidden may come back from any method.
#[async_trait]
pub trait StoryStore: Send + Sync {
    async fn count_stories(&self, filter: &StoryFilter) -> Result<u64, AppError>;

    /// One page of stories, newest `latest_ref_article_at` first.
    async fn find_stories(
        &self,
        filter: &StoryFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<StoryListing>, AppError>;

    async fn find_story(&self, id: ObjectId) -> Result<Option<Story>, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}
