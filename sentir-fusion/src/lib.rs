//! sentir-fusion library interface
//!
//! Multi-source text sentiment and emotion fusion, plus the HTTP surface
//! built on top of it. Exposed as a library for integration testing.

pub mod adapter;
pub mod api;
pub mod assembler;
pub mod combiner;
pub mod config;
pub mod engine;
pub mod error;
pub mod lexical_scorer;
pub mod lexicon;
pub mod mapping;
pub mod providers;
pub mod router;
pub mod taxonomy;
pub mod types;

pub use crate::assembler::FusionResult;
pub use crate::engine::FusionEngine;
pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Process-wide analysis engine
    pub engine: Arc<FusionEngine>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Error attached to the most recent analysis, if any
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(engine: FusionEngine) -> Self {
        Self {
            engine: Arc::new(engine),
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::analyze_routes())
        .merge(api::info_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
