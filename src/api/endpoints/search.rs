//! Drug search endpoint.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{session_id, ApiContext};
use crate::interactions::LookupOutcome;
use crate::models::MedicationEntry;

/// Shown when neither lookup stage found the drug.
pub const NOT_FOUND_MESSAGE: &str = "no information found for this drug";

#[derive(Deserialize)]
pub struct SearchRequest {
    pub drug_name: String,
}

#[derive(Serialize)]
pub struct SearchResponse {
    #[serde(flatten)]
    pub outcome: LookupOutcome,
    pub message: Option<&'static str>,
    pub medications: Vec<MedicationEntry>,
    pub checked_at: String,
}

/// `POST /search`: resolve a drug and check it against the caller's list.
pub async fn search(
    State(ctx): State<ApiContext>,
    headers: HeaderMap,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let term = request.drug_name.trim().to_string();
    if term.is_empty() {
        return Err(ApiError::EmptyDrugName);
    }

    let medications = ctx.core.medications(session_id(&headers))?;

    // The formulary transport blocks; keep it off the async workers.
    let core = ctx.core.clone();
    let meds = medications.clone();
    let outcome = tokio::task::spawn_blocking(move || core.lookup(&term, &meds)).await?;

    let message = (!outcome.found()).then_some(NOT_FOUND_MESSAGE);

    Ok(Json(SearchResponse {
        outcome,
        message,
        medications,
        checked_at: chrono::Utc::now().to_rfc3339(),
    }))
}
