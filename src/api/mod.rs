//! HTTP API server for the voice task manager

mod auth;
pub mod categories;
mod error;
pub mod health;
pub mod speak;
pub mod tasks;
pub mod voice;

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

use crate::Result;
use crate::db::DbPool;
use crate::model::UserId;
use crate::session::VoiceSession;
use crate::speech::TextToSpeech;
use crate::store::TaskStore;

/// Shared state for API handlers
pub struct ApiState {
    pub db: DbPool,
    pub session: Arc<VoiceSession>,
    pub api_key: Option<String>,
    /// Cloud TTS for `/api/speak`; absent without an `OpenAI` key
    pub tts: Option<TextToSpeech>,
}

impl ApiState {
    /// Storage shared with the voice session
    #[must_use]
    pub fn store(&self) -> &Arc<dyn TaskStore> {
        self.session.store()
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.session.user_id()
    }
}

/// Build the full router: health probes plus the authenticated `/api` tree
pub fn router(state: Arc<ApiState>) -> Router {
    // CORS layer for the browser client
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api/tasks", tasks::router(state.clone()))
        .nest("/api/categories", categories::router(state.clone()))
        .nest("/api/voice", voice::router(state.clone()))
        .nest("/api/speak", speak::router(state.clone()))
        .merge(health::router())
        .merge(health::ready_router(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Configuration for building an API server
pub struct ApiServerBuilder {
    db: DbPool,
    session: Arc<VoiceSession>,
    port: u16,
    api_key: Option<String>,
    tts: Option<TextToSpeech>,
}

impl ApiServerBuilder {
    /// Create a new API server builder
    #[must_use]
    pub fn new(db: DbPool, session: Arc<VoiceSession>, port: u16) -> Self {
        Self {
            db,
            session,
            port,
            api_key: None,
            tts: None,
        }
    }

    /// Require this bearer key on `/api/*`
    #[must_use]
    pub fn api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key;
        self
    }

    /// Enable `/api/speak`
    #[must_use]
    pub fn tts(mut self, tts: Option<TextToSpeech>) -> Self {
        self.tts = tts;
        self
    }

    /// Build the API server
    #[must_use]
    pub fn build(self) -> ApiServer {
        let state = Arc::new(ApiState {
            db: self.db,
            session: self.session,
            api_key: self.api_key,
            tts: self.tts,
        });

        ApiServer {
            state,
            port: self.port,
        }
    }
}

/// API server
pub struct ApiServer {
    state: Arc<ApiState>,
    port: u16,
}

impl ApiServer {
    /// Router over this server's state
    #[must_use]
    pub fn router(&self) -> Router {
        router(self.state.clone())
    }

    /// Run the API server
    ///
    /// # Errors
    ///
    /// Returns error if server fails to bind or run
    pub async fn run(self) -> Result<()> {
        if self.state.api_key.is_none() {
            tracing::warn!("API key not configured - allowing unauthenticated access");
        }

        let addr = format!("0.0.0.0:{}", self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| crate::Error::Config(format!("failed to bind API server: {e}")))?;

        tracing::info!(port = self.port, "API server listening");

        axum::serve(listener, self.router())
            .await
            .map_err(|e| crate::Error::Config(format!("API server error: {e}")))?;

        Ok(())
    }

    /// Run the API server in a background task
    #[must_use]
    pub fn spawn(self) -> tokio::task::JoinHandle<Result<()>> {
        tokio::spawn(async move { self.run().await })
    }
}
