//! HTTP/JSON surface over the catalog, comparison sessions and loan estimator

pub mod handlers;
pub mod sessions;

use crate::api::sessions::SessionStore;
use crate::catalog::{Catalog, CompareError};
use crate::loan::LoanError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

/// Shared server state. The catalog is immutable; each session owns its
/// own comparison set.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub sessions: Arc<RwLock<SessionStore>>,
    pub similar_limit: usize,
}

impl AppState {
    pub fn new(catalog: Catalog, similar_limit: usize) -> Self {
        Self {
            catalog: Arc::new(catalog),
            sessions: Arc::new(RwLock::new(SessionStore::default())),
            similar_limit,
        }
    }

    pub fn with_sessions(mut self, sessions: SessionStore) -> Self {
        self.sessions = Arc::new(RwLock::new(sessions));
        self
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("property {0} not found")]
    PropertyNotFound(String),

    #[error("comparison session {0} not found")]
    SessionNotFound(Uuid),

    #[error(transparent)]
    Loan(#[from] LoanError),

    #[error(transparent)]
    Compare(#[from] CompareError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::PropertyNotFound(_) | ApiError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Loan(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Compare(_) => StatusCode::CONFLICT,
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health_check))
        .route("/api/health", get(handlers::health_check))
        .route("/api/properties", get(handlers::list_properties))
        .route("/api/properties/featured", get(handlers::featured_properties))
        .route("/api/properties/:id", get(handlers::get_property))
        .route("/api/properties/:id/similar", get(handlers::similar_properties))
        .route("/api/filters", get(handlers::filter_options))
        .route("/api/loan/estimate", post(handlers::estimate_loan))
        .route("/api/loan/schedule", post(handlers::loan_schedule))
        .route("/api/compare", post(handlers::create_session))
        .route("/api/sessions/:session", delete(handlers::end_session))
        .route(
            "/api/compare/:session",
            get(handlers::get_comparison).delete(handlers::clear_comparison),
        )
        .route(
            "/api/compare/:session/:id",
            post(handlers::toggle_comparison).delete(handlers::remove_from_comparison),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
