use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SERVER_SELECTION_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub struct StoryConfig {
    pub common: core_config::Config,
    /// `None` puts the service in unconfigured mode: listings come back
    /// empty and detail lookups fail with a configuration error.
    pub mongodb: Option<MongoConfig>,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
    pub server_selection_timeout: Duration,
}

impl StoryConfig {
    pub fn from_env(common: core_config::Config) -> Result<Self, AppError> {
        Self::from_lookup(common, |key| env::var(key).ok())
    }

    /// Build the service settings from `lookup`, which resolves environment
    /// variable names. Blank values count as unset.
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let request_timeout = Duration::from_secs(parse_secs(
            "REQUEST_TIMEOUT_SECS",
            get("REQUEST_TIMEOUT_SECS"),
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?);
        let server_selection_timeout = Duration::from_secs(parse_secs(
            "MONGO_SERVER_SELECTION_TIMEOUT_SECS",
            get("MONGO_SERVER_SELECTION_TIMEOUT_SECS"),
            DEFAULT_SERVER_SELECTION_TIMEOUT_SECS,
        )?);

        let mongodb = match (
            get("MONGO_URI"),
            get("MONGO_DATABASE"),
            get("MONGO_COLLECTION"),
        ) {
            (Some(uri), Some(database), Some(collection)) => Some(MongoConfig {
                uri,
                database,
                collection,
                server_selection_timeout,
            }),
            (uri, database, collection) => {
                let missing: Vec<&str> = [
                    ("MONGO_URI", uri.is_none()),
                    ("MONGO_DATABASE", database.is_none()),
                    ("MONGO_COLLECTION", collection.is_none()),
                ]
                .into_iter()
                .filter_map(|(key, is_missing)| is_missing.then_some(key))
                .collect();
                tracing::warn!(
                    missing = ?missing,
                    "MongoDB is not configured; story endpoints run in degraded mode"
                );
                None
            }
        };

        Ok(StoryConfig {
            common,
            mongodb,
            request_timeout,
        })
    }
}

fn parse_secs(key: &str, value: Option<String>, default: u64) -> Result<u64, AppError> {
    match value {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!("{} must be a whole number of seconds: {}", key, e))
        }),
    }
}
