//! Process configuration, read once from the environment at startup.
//!
//! A `.env` file in the working directory is honoured (see [`AppConfig::load`]).

use std::net::SocketAddr;

/// Application-level constants
pub const APP_NAME: &str = "MedCross";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Formulary endpoint (Korean MFDS "e-drug" easy information service).
pub const DEFAULT_API_URL: &str =
    "http://apis.data.go.kr/1471000/DrbEasyDrugInfoService/getDrbEasyDrugList";

/// Maximum formulary rows requested per query.
pub const RESULT_CAP: u32 = 3;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

/// Sessions untouched for this long are dropped.
pub const SESSION_IDLE_TIMEOUT_SECS: u64 = 30 * 60;
/// Upper bound on live sessions held in memory.
pub const MAX_SESSIONS: usize = 10_000;

const ENV_API_KEY: &str = "DRUG_API_KEY";
const ENV_API_URL: &str = "MEDCROSS_API_URL";
const ENV_TIMEOUT: &str = "MEDCROSS_TIMEOUT_SECS";
const ENV_BIND_ADDR: &str = "MEDCROSS_BIND_ADDR";

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "medcross=info,medcross_lib=info,tower_http=info"
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid bind address {value:?}: {reason}")]
    InvalidBindAddr { value: String, reason: String },
    #[error("Invalid timeout {value:?}: expected whole seconds greater than zero")]
    InvalidTimeout { value: String },
}

/// Settings for talking to the formulary lookup service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormularyConfig {
    /// Service key. `None` leaves the resolver inert.
    pub service_key: Option<String>,
    pub api_url: String,
    pub timeout_secs: u64,
    pub result_cap: u32,
}

impl FormularyConfig {
    pub fn new(service_key: Option<String>) -> Self {
        Self {
            service_key: service_key.filter(|k| !k.trim().is_empty()),
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            result_cap: RESULT_CAP,
        }
    }

    pub fn has_credential(&self) -> bool {
        self.service_key.is_some()
    }
}

/// Everything the binary needs to start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub formulary: FormularyConfig,
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    /// Load `.env` (if any), then read the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!(error = %e, ".env file present but unreadable");
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Separated from `load` for tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut formulary = FormularyConfig::new(lookup(ENV_API_KEY));

        if let Some(url) = lookup(ENV_API_URL).filter(|u| !u.trim().is_empty()) {
            formulary.api_url = url.trim().to_string();
        }

        if let Some(raw) = lookup(ENV_TIMEOUT) {
            formulary.timeout_secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidTimeout { value: raw })?;
        }

        let raw_addr = lookup(ENV_BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidBindAddr {
                value: raw_addr.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            formulary,
            bind_addr,
        })
    }
}
