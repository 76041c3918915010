use serde::Serialize;

use super::normalize::normalize;
use super::types::{FormularyEnvelope, FormularyQuery, FormularyTransport, SearchStage};
use super::FormularyError;
use crate::config::FormularyConfig;
use crate::models::DrugRecord;

/// Outcome of resolving a free-text drug name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resolution {
    /// At least one record, from the first stage that produced any.
    Found {
        stage: SearchStage,
        records: Vec<DrugRecord>,
    },
    /// Neither stage produced a record, or the resolver is inert.
    NotFound,
}

impl Resolution {
    pub fn stage(&self) -> Option<SearchStage> {
        match self {
            Self::Found { stage, .. } => Some(*stage),
            Self::NotFound => None,
        }
    }

    pub fn records(&self) -> &[DrugRecord] {
        match self {
            Self::Found { records, .. } => records,
            Self::NotFound => &[],
        }
    }

    pub fn into_records(self) -> Vec<DrugRecord> {
        match self {
            Self::Found { records, .. } => records,
            Self::NotFound => Vec::new(),
        }
    }
}

/// Resolves a drug name against the formulary: trade name first, then
/// ingredient name, stopping at the first stage with results.
///
/// Built without a service key the resolver is inert: every lookup is
/// `NotFound` and the transport is never called.
pub struct FormularyResolver {
    transport: Box<dyn FormularyTransport + Send + Sync>,
    config: FormularyConfig,
}

impl FormularyResolver {
    pub fn new(transport: Box<dyn FormularyTransport + Send + Sync>, config: FormularyConfig) -> Self {
        if !config.has_credential() {
            tracing::error!("DRUG_API_KEY is not set; drug lookups will return no results");
        }
        Self { transport, config }
    }

    pub fn config(&self) -> &FormularyConfig {
        &self.config
    }

    pub fn resolve(&self, query_name: &str) -> Resolution {
        let Some(service_key) = self.config.service_key.as_deref() else {
            tracing::error!(
                query = query_name,
                error = %FormularyError::MissingCredential,
                "Skipping formulary lookup"
            );
            return Resolution::NotFound;
        };

        for stage in SearchStage::ORDER {
            match self.search(stage, service_key, query_name) {
                Ok(records) if !records.is_empty() => {
                    tracing::info!(
                        query = query_name,
                        %stage,
                        count = records.len(),
                        "Formulary lookup succeeded"
                    );
                    for (i, record) in records.iter().enumerate() {
                        tracing::debug!(
                            result = i + 1,
                            name = %record.name,
                            interaction = %record.interaction_text,
                            "Resolved record interaction text"
                        );
                    }
                    return Resolution::Found { stage, records };
                }
                Ok(_) => {
                    tracing::debug!(query = query_name, %stage, "No formulary results");
                }
                Err(e) => {
                    tracing::warn!(query = query_name, %stage, error = %e, "Formulary lookup failed");
                }
            }
        }

        Resolution::NotFound
    }

    /// One raw query attempt. An empty vector means "no results".
    fn search(
        &self,
        stage: SearchStage,
        service_key: &str,
        query_name: &str,
    ) -> Result<Vec<DrugRecord>, FormularyError> {
        let query = FormularyQuery {
            stage,
            term: query_name,
            service_key,
            rows: self.config.result_cap,
        };
        let body = self.transport.fetch(&query)?;
        let envelope = FormularyEnvelope::parse(&body)?;

        Ok(envelope
            .into_items()
            .iter()
            .map(|item| normalize(item, query_name))
            .collect())
    }
}
