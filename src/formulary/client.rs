use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use super::types::{FormularyQuery, FormularyTransport, SearchStage};
use super::FormularyError;
use crate::config::FormularyConfig;

/// Blocking HTTP client for the formulary lookup service.
pub struct HttpFormularyClient {
    api_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl HttpFormularyClient {
    pub fn new(api_url: &str, timeout_secs: u64) -> Result<Self, FormularyError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| FormularyError::HttpClient(e.to_string()))?;

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        })
    }

    pub fn from_config(config: &FormularyConfig) -> Result<Self, FormularyError> {
        Self::new(&config.api_url, config.timeout_secs)
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

impl FormularyTransport for HttpFormularyClient {
    fn fetch(&self, query: &FormularyQuery<'_>) -> Result<String, FormularyError> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&query.params())
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    FormularyError::Connection(self.api_url.clone())
                } else if e.is_timeout() {
                    FormularyError::Timeout(self.timeout_secs)
                } else {
                    FormularyError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(FormularyError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        response
            .text()
            .map_err(|e| FormularyError::MalformedResponse(e.to_string()))
    }
}

/// Scripted reply for one stage of the mock.
#[derive(Debug, Clone)]
enum MockReply {
    Body(String),
    Failure(String),
}

/// Mock formulary transport for testing: replies per stage from a script
/// and records every stage it was asked for.
///
/// Unscripted stages answer with a well-formed empty result.
#[derive(Clone, Default)]
pub struct MockFormularyClient {
    replies: HashMap<SearchStage, MockReply>,
    calls: Arc<Mutex<Vec<SearchStage>>>,
}

impl MockFormularyClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply to `stage` with a successful envelope holding `items`.
    pub fn with_items(self, stage: SearchStage, items: Vec<Value>) -> Self {
        self.with_body(stage, &success_body(items))
    }

    /// Reply to `stage` with a raw body.
    pub fn with_body(mut self, stage: SearchStage, body: &str) -> Self {
        self.replies.insert(stage, MockReply::Body(body.to_string()));
        self
    }

    /// Fail `stage` at the transport level.
    pub fn with_failure(mut self, stage: SearchStage, reason: &str) -> Self {
        self.replies
            .insert(stage, MockReply::Failure(reason.to_string()));
        self
    }

    /// Shared handle to the call log; stays valid after the mock is boxed.
    pub fn call_log(&self) -> Arc<Mutex<Vec<SearchStage>>> {
        Arc::clone(&self.calls)
    }
}

impl FormularyTransport for MockFormularyClient {
    fn fetch(&self, query: &FormularyQuery<'_>) -> Result<String, FormularyError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(query.stage);
        }
        match self.replies.get(&query.stage) {
            Some(MockReply::Body(body)) => Ok(body.clone()),
            Some(MockReply::Failure(reason)) => Err(FormularyError::HttpClient(reason.clone())),
            None => Ok(success_body(Vec::new())),
        }
    }
}

/// A successful response envelope around `items`.
pub fn success_body(items: Vec<Value>) -> String {
    json!({
        "header": {"resultCode": "00", "resultMsg": "NORMAL SERVICE."},
        "body": {"pageNo": 1, "totalCount": items.len(), "numOfRows": 3, "items": items},
    })
    .to_string()
}
