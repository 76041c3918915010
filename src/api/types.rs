//! Shared types for the API layer: request context and the session cookie.

use std::sync::Arc;

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use crate::core_state::CoreState;

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "medcross_session";

/// Shared context for all API routes.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }
}

/// Session id presented by the client, if any and well-formed.
pub fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// `Set-Cookie` value binding the client to `id`.
pub fn session_cookie(id: Uuid) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}

/// Attach a `Set-Cookie` header when the server issued a new session id.
pub fn with_session(presented: Option<Uuid>, current: Uuid, body: impl IntoResponse) -> Response {
    let mut response = body.into_response();
    if presented != Some(current) {
        if let Ok(val) = HeaderValue::from_str(&session_cookie(current)) {
            response.headers_mut().insert(SET_COOKIE, val);
        }
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with_cookie(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn reads_session_cookie_among_others() {
        let id = Uuid::new_v4();
        let headers = headers_with_cookie(&format!("theme=dark; {SESSION_COOKIE}={id}; lang=ko"));
        assert_eq!(session_id(&headers), Some(id));
    }

    #[test]
    fn missing_or_malformed_cookie_is_none() {
        assert_eq!(session_id(&HeaderMap::new()), None);
        assert_eq!(session_id(&headers_with_cookie("theme=dark")), None);
        assert_eq!(
            session_id(&headers_with_cookie(&format!("{SESSION_COOKIE}=not-a-uuid"))),
            None
        );
    }

    #[test]
    fn cookie_value_round_trips() {
        let id = Uuid::new_v4();
        let text = session_cookie(id);
        assert!(text.starts_with(&format!("{SESSION_COOKIE}={id}")));
        assert!(text.contains("HttpOnly"));
    }

    #[test]
    fn new_session_sets_cookie_existing_does_not() {
        let id = Uuid::new_v4();
        let fresh = with_session(None, id, "ok");
        assert!(fresh.headers().contains_key(SET_COOKIE));

        let existing = with_session(Some(id), id, "ok");
        assert!(!existing.headers().contains_key(SET_COOKIE));
    }
}
