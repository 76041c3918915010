//! Formulary lookup: transport seam, response types, record normalization,
//! and the two-stage name resolver.

pub mod types;
pub mod client;
pub mod normalize;
pub mod resolver;

pub use types::*;
pub use client::*;
pub use normalize::*;
pub use resolver::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormularyError {
    #[error("Formulary service key is not configured")]
    MissingCredential,

    #[error("Formulary service unreachable at {0}")]
    Connection(String),

    #[error("Formulary request timed out after {0}s")]
    Timeout(u64),

    #[error("Formulary service returned error (status {status}): {body}")]
    HttpStatus { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Malformed formulary response: {0}")]
    MalformedResponse(String),
}
