use crate::config::StoryConfig;
use crate::handlers;
use crate::services::{MongoDb, StoryService};
use axum::{body::Body, middleware::from_fn, routing::get, Router};
use service_core::error::AppError;
use service_core::middleware::{
    make_request_span, metrics_middleware, request_id_middleware, security_headers_middleware,
};
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: StoryConfig,
    pub stories: StoryService,
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
    state: AppState,
}

impl Application {
    /// Connect to MongoDB when configured and bind the HTTP listener.
    pub async fn build(config: StoryConfig) -> Result<Self, AppError> {
        let stories = match &config.mongodb {
            Some(mongo) => {
                let db = MongoDb::connect(mongo).await.map_err(|e| {
                    tracing::error!("Failed to set up MongoDB client: {}", e);
                    e
                })?;
                StoryService::new(Arc::new(db))
            }
            None => StoryService::unconfigured(),
        };

        Self::build_with_service(config, stories).await
    }

    /// Bind the HTTP listener around an already constructed service.
    pub async fn build_with_service(
        config: StoryConfig,
        stories: StoryService,
    ) -> Result<Self, AppError> {
        let state = AppState {
            config: config.clone(),
            stories,
        };

        let app = build_router(state.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            port,
            configured = state.stories.is_configured(),
            "story-service listening"
        );

        let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn stories(&self) -> &StoryService {
        &self.state.stories
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

fn story_routes() -> Router<AppState> {
    Router::new()
        .route("/stories", get(handlers::list_stories))
        .route("/story/:story_id", get(handlers::get_story))
}

/// Story routes are served at the root and again under `/api`, the prefix
/// the frontend proxy forwards.
pub fn build_router(state: AppState) -> Router {
    let timeout = state.config.request_timeout;

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .merge(story_routes())
        .nest("/api", story_routes())
        .layer(from_fn(security_headers_middleware))
        .layer(TimeoutLayer::new(timeout))
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<Body>))
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
