//! JSON HTTP API.
//!
//! Exposes drug search and the medication list operations. Routes are
//! stateless apart from the session cookie that selects the caller's list.
//!
//! The router is composable: `api_router()` returns a `Router` that can be
//! mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_api_server, ApiServer, ServerError};
pub use types::ApiContext;
