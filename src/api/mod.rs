//! API layer - the report relay HTTP endpoint

pub mod error;
pub mod relay;

use axum::{
    http::{header, Method},
    routing::post,
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::services::ReportMailer;

pub use error::RelayError;

/// Shared state of the relay handlers
#[derive(Clone)]
pub struct RelayState {
    pub report_mailer: Arc<ReportMailer>,
    /// Bearer token callers must present; unchecked when unset
    pub anon_key: Option<String>,
}

/// Build the relay router with middleware
pub fn build_router(state: RelayState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/functions/v1/send-report", post(relay::send_report))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
