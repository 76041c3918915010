//! API endpoint handlers.
//!
//! Handlers are thin: they read the session cookie, delegate to
//! `CoreState`, and shape the JSON response.

pub mod health;
pub mod medications;
pub mod search;
