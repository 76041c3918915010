//! Medication list endpoints.
//!
//! - `GET    /medications`: current list
//! - `POST   /medications`: register a medication
//! - `DELETE /medications/:name`: remove one (case-insensitive)
//! - `DELETE /medications`: clear the list

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{session_id, with_session, ApiContext};
use crate::models::MedicationEntry;

#[derive(Deserialize)]
pub struct AddMedicationRequest {
    pub name: String,
}

#[derive(Serialize)]
pub struct MedicationsResponse {
    pub medications: Vec<MedicationEntry>,
}

/// `GET /medications`
pub async fn list(
    State(ctx): State<ApiContext>,
    headers: HeaderMap,
) -> Result<Json<MedicationsResponse>, ApiError> {
    let medications = ctx.core.medications(session_id(&headers))?;
    Ok(Json(MedicationsResponse { medications }))
}

/// `POST /medications`: issues a session cookie on first use.
pub async fn add(
    State(ctx): State<ApiContext>,
    headers: HeaderMap,
    Json(request): Json<AddMedicationRequest>,
) -> Result<Response, ApiError> {
    let presented = session_id(&headers);
    let (id, medications) = ctx.core.add_medication(presented, &request.name)?;
    Ok(with_session(presented, id, Json(MedicationsResponse { medications })))
}

/// `DELETE /medications/:name`
pub async fn remove(
    State(ctx): State<ApiContext>,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> Result<Json<MedicationsResponse>, ApiError> {
    let medications = ctx.core.remove_medication(session_id(&headers), &name)?;
    Ok(Json(MedicationsResponse { medications }))
}

/// `DELETE /medications`
pub async fn clear(
    State(ctx): State<ApiContext>,
    headers: HeaderMap,
) -> Result<Json<MedicationsResponse>, ApiError> {
    ctx.core.clear_medications(session_id(&headers))?;
    Ok(Json(MedicationsResponse {
        medications: Vec::new(),
    }))
}
