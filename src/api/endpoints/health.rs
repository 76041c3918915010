//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Whether a formulary service key is configured. Without one every
    /// search comes back empty.
    pub formulary_configured: bool,
    pub active_sessions: usize,
}

/// `GET /health`: liveness and configuration check.
pub async fn check(State(ctx): State<ApiContext>) -> Result<Json<HealthResponse>, ApiError> {
    Ok(Json(HealthResponse {
        status: "ok",
        version: crate::config::APP_VERSION,
        formulary_configured: ctx.core.resolver().config().has_credential(),
        active_sessions: ctx.core.session_count()?,
    }))
}
