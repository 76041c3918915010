//! Failure responses for the search and medication routes.
//!
//! Every failure body is `{"error": {"code", "message"}}`. A rejected
//! request says what was wrong with it; a server-side fault is logged and
//! answered with a fixed sentence so lock or task details stay server-side.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::core_state::CoreError;

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    error: ErrorPayload,
}

#[derive(Debug, Serialize)]
struct ErrorPayload {
    code: &'static str,
    message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Search submitted with a blank drug name.
    #[error("drug_name must not be empty")]
    EmptyDrugName,
    /// The session registry could not be read or updated.
    #[error("Medication list unavailable: {0}")]
    SessionStore(#[from] CoreError),
    /// The blocking formulary lookup panicked or was cancelled.
    #[error("Drug lookup aborted: {0}")]
    LookupAborted(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::EmptyDrugName => StatusCode::BAD_REQUEST,
            Self::SessionStore(_) | Self::LookupAborted(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::EmptyDrugName => "BAD_REQUEST",
            Self::SessionStore(_) | Self::LookupAborted(_) => "INTERNAL",
        }
    }

    /// Text shown to the caller.
    fn public_message(&self) -> String {
        match self {
            Self::EmptyDrugName => self.to_string(),
            Self::SessionStore(_) => "Your medication list is temporarily unavailable".into(),
            Self::LookupAborted(_) => "The drug lookup could not be completed".into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        let envelope = ErrorEnvelope {
            error: ErrorPayload {
                code: self.code(),
                message: self.public_message(),
            },
        };
        (status, Json(envelope)).into_response()
    }
}
