use std::env;

use ingest_sink::FirehoseSinkConfig;
use security::WebhookSecret;

pub const SECRET_ENV: &str = "SHOPIFY_AUTHENTICATION_KEY";
pub const STREAM_ENV: &str = "KINESIS_FIREHOSE";
pub const LOG_PAYLOADS_ENV: &str = "LOG_REJECTED_PAYLOADS";
pub const ENDPOINT_ENV: &str = "FIREHOSE_ENDPOINT_URL";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),
    #[error("environment variable {0} is empty")]
    Empty(&'static str),
    #[error("environment variable {name} has invalid boolean value `{value}`")]
    InvalidFlag { name: &'static str, value: String },
}

/// Settings read once at cold start and shared by every invocation.
#[derive(Debug, Clone)]
pub struct ForwarderConfig {
    pub secret: WebhookSecret,
    pub delivery_stream: String,
    pub endpoint_url: Option<String>,
    /// Include raw body and signature in rejection logs.
    pub log_rejected_payloads: bool,
}

impl ForwarderConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = required(&lookup, SECRET_ENV)?;
        let delivery_stream = required(&lookup, STREAM_ENV)?;
        let endpoint_url = lookup(ENDPOINT_ENV).filter(|v| !v.trim().is_empty());
        let log_rejected_payloads = match lookup(LOG_PAYLOADS_ENV) {
            None => false,
            Some(value) => parse_flag(LOG_PAYLOADS_ENV, &value)?,
        };

        Ok(Self {
            secret: WebhookSecret::new(secret),
            delivery_stream,
            endpoint_url,
            log_rejected_payloads,
        })
    }

    pub fn sink_config(&self) -> FirehoseSinkConfig {
        FirehoseSinkConfig {
            delivery_stream: self.delivery_stream.clone(),
            endpoint_url: self.endpoint_url.clone(),
        }
    }
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Err(ConfigError::Missing(name)),
        Some(value) if value.is_empty() => Err(ConfigError::Empty(name)),
        Some(value) => Ok(value),
    }
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            name,
            value: value.to_string(),
        }),
    }
}
