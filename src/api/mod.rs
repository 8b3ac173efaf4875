pub mod dto;
pub mod error;
pub mod handlers;

use crate::adapters::AnyStore;
use crate::core::service::ScorerService;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ScorerService<AnyStore>>,
    shutdown: CancellationToken,
}

impl AppState {
    pub fn new(service: ScorerService<AnyStore>, shutdown: CancellationToken) -> Self {
        Self {
            service: Arc::new(service),
            shutdown,
        }
    }

    /// Per-request token, cancelled when the server shuts down.
    pub fn request_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }
}

pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    // Existing clients call the upload and listing routes with a trailing slash.
    let api = Router::new()
        .route("/scorers/content", post(handlers::ingest_content))
        .route("/scorers/content/", post(handlers::ingest_content))
        .route("/scorers/file", post(handlers::ingest_file))
        .route("/scorers/file/", post(handlers::ingest_file))
        .route("/topScorerByName/:name", get(handlers::top_scorer_by_name))
        .route("/topScorers", get(handlers::top_scorers))
        .route("/topScorers/", get(handlers::top_scorers))
        .route("/topScorers/csv", get(handlers::top_scorers_csv));

    Router::new()
        .nest("/api/TopScorers", api)
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
