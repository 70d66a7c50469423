use std::collections::{BTreeMap, BTreeSet};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::catalog::{self, CandidateList};
use crate::core::error::ConfigError;

pub const OPENROUTER_API_KEY_ENV: &str = "OPENROUTER_API_KEY";
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const HUGGINGFACE_API_KEY_ENV: &str = "HUGGINGFACE_API_KEY";

const HOST_ENV: &str = "HOST";
const PORT_ENV: &str = "PORT";
const ATTEMPT_TIMEOUT_ENV: &str = "TRANSLATOR_ATTEMPT_TIMEOUT_MS";
const CANDIDATES_FILE_ENV: &str = "TRANSLATOR_CANDIDATES_FILE";
const HTTP_REFERER_ENV: &str = "TRANSLATOR_HTTP_REFERER";
const APP_TITLE_ENV: &str = "TRANSLATOR_APP_TITLE";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_ATTEMPT_TIMEOUT_MS: u64 = 12_000;
const TRANSPORT_TIMEOUT_SLACK_MS: u64 = 1_000;

const CREDENTIAL_ENV_KEYS: [&str; 3] = [
    OPENROUTER_API_KEY_ENV,
    OPENAI_API_KEY_ENV,
    HUGGINGFACE_API_KEY_ENV,
];

/// Immutable `auth_key_ref -> secret` map handed to adapters at startup.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    secrets: BTreeMap<String, String>,
}

impl Credentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blank secrets are dropped so they read as unconfigured.
    pub fn with_secret(mut self, key: impl Into<String>, secret: impl Into<String>) -> Self {
        let secret = secret.into();
        let trimmed = secret.trim();
        if !trimmed.is_empty() {
            self.secrets.insert(key.into(), trimmed.to_string());
        }
        self
    }

    pub fn resolve(&self, key: &str) -> Option<&str> {
        self.secrets.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.secrets.contains_key(key)
    }

    pub fn configured_keys(&self) -> impl Iterator<Item = &str> {
        self.secrets.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("configured", &self.secrets.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub attempt_timeout_ms: u64,
    pub candidates: CandidateList,
    pub credentials: Credentials,
    pub http_referer: Option<String>,
    pub app_title: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key).and_then(|value| {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            })
        };

        let host = read(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let host: IpAddr = host
            .parse()
            .map_err(|error: std::net::AddrParseError| ConfigError::InvalidBindAddress {
                value: host.clone(),
                reason: error.to_string(),
            })?;

        let port = match read(PORT_ENV) {
            Some(value) => value
                .parse::<u16>()
                .map_err(|error| ConfigError::InvalidBindAddress {
                    value: value.clone(),
                    reason: error.to_string(),
                })?,
            None => DEFAULT_PORT,
        };

        let attempt_timeout_ms = match read(ATTEMPT_TIMEOUT_ENV) {
            Some(value) => parse_timeout(&value)?,
            None => DEFAULT_ATTEMPT_TIMEOUT_MS,
        };

        let candidates = match read(CANDIDATES_FILE_ENV) {
            Some(path) => catalog::load_candidates_file(&PathBuf::from(path))?,
            None => catalog::builtin_candidates(),
        };

        let credential_keys: BTreeSet<&str> = CREDENTIAL_ENV_KEYS
            .into_iter()
            .chain(
                candidates
                    .iter()
                    .filter_map(|candidate| candidate.auth_key_ref.as_deref()),
            )
            .collect();
        let credentials = credential_keys
            .into_iter()
            .fold(Credentials::new(), |credentials, key| match read(key) {
                Some(secret) => credentials.with_secret(key, secret),
                None => credentials,
            });

        Ok(Self {
            bind_addr: SocketAddr::new(host, port),
            attempt_timeout_ms,
            candidates,
            credentials,
            http_referer: read(HTTP_REFERER_ENV),
            app_title: read(APP_TITLE_ENV),
        })
    }

    /// Client-side bound for one upstream call. Kept above the attempt timeout
    /// so an overrun is classified by the router as a timeout.
    pub fn transport_timeout_ms(&self) -> u64 {
        self.attempt_timeout_ms
            .saturating_add(TRANSPORT_TIMEOUT_SLACK_MS)
    }

    /// Credential references used by candidates but absent from configuration.
    pub fn missing_credentials(&self) -> Vec<String> {
        let mut missing: Vec<String> = self
            .candidates
            .iter()
            .filter_map(|candidate| candidate.auth_key_ref.clone())
            .filter(|key| !self.credentials.contains(key))
            .collect();
        missing.sort_unstable();
        missing.dedup();
        missing
    }
}

fn parse_timeout(value: &str) -> Result<u64, ConfigError> {
    match value.parse::<u64>() {
        Ok(0) | Err(_) => Err(ConfigError::InvalidTimeout {
            timeout_ms: value.parse::<u64>().unwrap_or(0),
        }),
        Ok(timeout_ms) => Ok(timeout_ms),
    }
}

#[cfg(test)]
mod tests;
