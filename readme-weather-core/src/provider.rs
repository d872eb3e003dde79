use crate::{Config, model::WeatherUpdatePayload};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openmeteo;

pub use openmeteo::WeatherClient;

/// Failures that abort a fetch. Both propagate to the caller; nothing retries here.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to forecast provider failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("forecast provider returned status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("forecast response has unexpected shape: {0}")]
    Schema(String),
}

impl FetchError {
    /// Network failures and non-success statuses.
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Transport(_) | FetchError::Status { .. })
    }

    pub fn is_schema(&self) -> bool {
        matches!(self, FetchError::Schema(_))
    }
}

/// Source of one weather payload per update cycle.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch(&self) -> Result<WeatherUpdatePayload, FetchError>;
}

/// Construct the configured weather source.
pub fn source_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherSource>> {
    Ok(Box::new(WeatherClient::new(config)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_from_config_accepts_defaults() {
        assert!(source_from_config(&Config::default()).is_ok());
    }

    #[test]
    fn source_from_config_rejects_bad_timezone() {
        let mut cfg = Config::default();
        cfg.location.timezone = "Nowhere/Land".into();

        let err = source_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("Invalid timezone 'Nowhere/Land'"));
    }
}
