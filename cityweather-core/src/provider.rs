use crate::{Config, WeatherViewModel, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::{fmt, fmt::Debug, sync::Arc};
use thiserror::Error;

pub mod openweather;

/// Application-level refusal: the provider answered, but its embedded status
/// code was not the success value (e.g. city not found, bad API key).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// The provider's `cod` field as text, `None` when absent.
    pub code: Option<String>,
    pub message: Option<String>,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.code, &self.message) {
            (Some(code), Some(message)) => write!(f, "{code}: {message}"),
            (Some(code), None) => f.write_str(code),
            (None, Some(message)) => f.write_str(message),
            (None, None) => f.write_str("no status code"),
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to weather provider failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to parse weather provider response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("weather provider response is missing {0}")]
    Malformed(&'static str),

    #[error("weather provider rejected the lookup ({0})")]
    Rejected(Rejection),
}

impl FetchError {
    pub fn is_rejection(&self) -> bool {
        matches!(self, FetchError::Rejected(_))
    }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Look up current conditions for `city`, passed through untouched.
    async fn current_weather(&self, city: &str) -> Result<WeatherViewModel, FetchError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
             Hint: run `cityweather configure` or set {}.",
            crate::config::API_KEY_ENV
        )
    })?;

    let provider = OpenWeatherProvider::from_config(&config.openweather, api_key.to_owned())?;
    Ok(Arc::new(provider))
}
