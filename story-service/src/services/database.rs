use crate::config::MongoConfig;
use crate::models::{Story, StoryListing};
use crate::services::query::{
    detail_filter, detail_projection, listing_projection, listing_sort, StoryFilter,
};
use crate::services::store::StoryStore;
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use metrics::counter;
use mongodb::{
    bson::{self, doc, oid::ObjectId, Document},
    options::{ClientOptions, FindOneOptions, FindOptions},
    Client as MongoClient, Collection, Database,
};
use service_core::error::AppError;

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
    collection: String,
}

impl MongoDb {
    /// Build a pooled client. The driver connects lazily, so an unreachable
    /// server surfaces on the first query rather than here.
    pub async fn connect(config: &MongoConfig) -> Result<Self, AppError> {
        let mut options = ClientOptions::parse(&config.uri).await.map_err(|e| {
            tracing::error!("Invalid MongoDB URI: {}", e);
            AppError::ConfigError(anyhow::anyhow!("Invalid MongoDB URI: {}", e))
        })?;
        options.app_name = Some("story-service".to_string());
        options.server_selection_timeout = Some(config.server_selection_timeout);

        let client = MongoClient::with_options(options).map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(&config.database);
        tracing::info!(
            database = %config.database,
            collection = %config.collection,
            "MongoDB client ready"
        );

        Ok(Self {
            client,
            db,
            collection: config.collection.clone(),
        })
    }

    pub fn stories<T: Send + Sync>(&self) -> Collection<T> {
        self.db.collection(&self.collection)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl StoryStore for MongoDb {
    async fn count_stories(&self, filter: &StoryFilter) -> Result<u64, AppError> {
        self.stories::<StoryListing>()
            .count_documents(filter.to_document(), None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count stories: {}", e);
                AppError::from(e)
            })
    }

    async fn find_stories(
        &self,
        filter: &StoryFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<StoryListing>, AppError> {
        let find_options = FindOptions::builder()
            .projection(listing_projection())
            .sort(listing_sort())
            .skip(skip)
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .build();

        let cursor = self
            .stories::<Document>()
            .find(filter.to_document(), find_options)
            .await
            .map_err(|e| {
                tracing::error!("Failed to query stories: {}", e);
                AppError::from(e)
            })?;

        let documents: Vec<Document> = cursor.try_collect().await.map_err(|e| {
            tracing::error!("Failed to read story page: {}", e);
            AppError::from(e)
        })?;

        Ok(decode_listings(documents))
    }

    async fn find_story(&self, id: ObjectId) -> Result<Option<Story>, AppError> {
        let options = FindOneOptions::builder()
            .projection(detail_projection())
            .build();

        self.stories::<Story>()
            .find_one(detail_filter(id), options)
            .await
            .map_err(|e| {
                tracing::error!(story_id = %id, "Failed to load story: {}", e);
                AppError::from(e)
            })
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }
}

/// Decode a page of raw story documents, dropping the ones ingestion wrote
/// in a shape the feed cannot render.
fn decode_listings(documents: Vec<Document>) -> Vec<StoryListing> {
    documents
        .into_iter()
        .filter_map(|document| {
            let id = document.get_object_id("_id").ok();
            bson::from_document::<StoryListing>(document)
                .inspect_err(|e| {
                    tracing::warn!(story_id = ?id, error = %e, "Skipping undecodable story");
                    counter!("story_documents_skipped_total").increment(1);
                })
                .ok()
        })
        .collect()
}
