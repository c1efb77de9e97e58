use crate::dtos::{StoriesResponse, StoryDetail, StoryListParams};
use crate::services::StoryFilter;
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::Query;
use service_core::error::AppError;
use validator::Validate;

pub async fn list_stories(
    State(state): State<AppState>,
    Query(params): Query<StoryListParams>,
) -> Result<Json<StoriesResponse>, AppError> {
    params.validate()?;

    let page = u64::try_from(params.page)
        .map_err(|_| AppError::BadRequest(anyhow::anyhow!("Invalid page: {}", params.page)))?;
    let filter = StoryFilter::new(params.collections, params.search);

    Ok(Json(state.stories.list_stories(page, &filter).await?))
}

pub async fn get_story(
    State(state): State<AppState>,
    Path(story_id): Path<String>,
) -> Result<Json<StoryDetail>, AppError> {
    let story = state.stories.get_story(&story_id).await.map_err(|e| {
        tracing::debug!(story_id = %story_id, error = %e, "Story lookup failed");
        e
    })?;

    Ok(Json(story))
}
