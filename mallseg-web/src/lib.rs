//! mallseg-web library - customer form and operator dashboard
//!
//! Serves the single-screen segmentation app over HTTP. The classifier is
//! built before the router and injected through [`AppState`].

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use mallseg_common::{AccessGate, SegmentClassifier, SessionStore, StaticCredentialGate};
use tower_http::trace::TraceLayer;

pub mod api;

/// Form posts are a handful of short fields
pub const MAX_FORM_BYTES: usize = 16 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Fitted (or rule-table) classifier, read-only after startup
    pub classifier: Arc<dyn SegmentClassifier>,
    /// Submissions for the process lifetime
    pub store: Arc<SessionStore>,
    /// Operator credential check
    pub gate: Arc<dyn AccessGate>,
}

impl AppState {
    /// Create new application state with an empty store and the static gate
    pub fn new(classifier: Arc<dyn SegmentClassifier>) -> Self {
        Self::with_gate(classifier, Arc::new(StaticCredentialGate::default()))
    }

    pub fn with_gate(classifier: Arc<dyn SegmentClassifier>, gate: Arc<dyn AccessGate>) -> Self {
        Self {
            classifier,
            store: Arc::new(SessionStore::new()),
            gate,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/", get(api::serve_index))
        .route(
            "/customer",
            get(api::customer_form).post(api::submit_customer),
        )
        .route("/owner", get(api::owner_login).post(api::owner_dashboard))
        .merge(api::health_routes())
        .layer(DefaultBodyLimit::max(MAX_FORM_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
