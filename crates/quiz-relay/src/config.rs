use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://api.web3forms.com/submit";
pub const DEFAULT_SUBJECT: &str = "New Lead • PERMA Quiz";
pub const DEFAULT_FROM_NAME: &str = "PERMA Website";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

pub const ENDPOINT_VAR: &str = "QUIZ_RELAY_ENDPOINT";
pub const ACCESS_KEY_VAR: &str = "QUIZ_RELAY_ACCESS_KEY";
pub const SUBJECT_VAR: &str = "QUIZ_RELAY_SUBJECT";
pub const FROM_NAME_VAR: &str = "QUIZ_RELAY_FROM_NAME";
pub const TIMEOUT_VAR: &str = "QUIZ_RELAY_TIMEOUT_SECS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("relay access key is missing; set QUIZ_RELAY_ACCESS_KEY")]
    MissingAccessKey,
    #[error("invalid relay endpoint '{value}': {source}")]
    InvalidEndpoint {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid relay timeout '{value}': expected whole seconds above zero")]
    InvalidTimeout { value: String },
}

/// Where and how leads are relayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub endpoint: Url,
    pub access_key: String,
    pub subject: String,
    pub from_name: String,
    /// Upper bound on one relay request, connect to last byte.
    pub timeout: Duration,
}

impl RelayConfig {
    pub fn new(access_key: impl Into<String>) -> Result<Self, ConfigError> {
        let access_key = access_key.into();
        if access_key.trim().is_empty() {
            return Err(ConfigError::MissingAccessKey);
        }
        Ok(Self {
            endpoint: parse_endpoint(DEFAULT_ENDPOINT)?,
            access_key,
            subject: DEFAULT_SUBJECT.to_string(),
            from_name: DEFAULT_FROM_NAME.to_string(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::new(get(ACCESS_KEY_VAR).unwrap_or_default())?;
        if let Some(endpoint) = get(ENDPOINT_VAR) {
            config.endpoint = parse_endpoint(&endpoint)?;
        }
        if let Some(subject) = get(SUBJECT_VAR) {
            config.subject = subject;
        }
        if let Some(from_name) = get(FROM_NAME_VAR) {
            config.from_name = from_name;
        }
        if let Some(timeout) = get(TIMEOUT_VAR) {
            config.timeout = parse_timeout(&timeout)?;
        }
        Ok(config)
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self, ConfigError> {
        self.endpoint = parse_endpoint(endpoint)?;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn parse_timeout(value: &str) -> Result<Duration, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout {
            value: value.to_string(),
        }),
    }
}

fn parse_endpoint(value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|source| ConfigError::InvalidEndpoint {
        value: value.to_string(),
        source,
    })
}
