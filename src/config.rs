use crate::error::{FlowgenError, Result};
use std::env;
use std::path::PathBuf;

/// Environment variable holding the generation service endpoint.
pub const ENDPOINT_ENV: &str = "FLOWGEN_API_URL";

#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: Option<String>,
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            endpoint: None,
            output_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the endpoint from `FLOWGEN_API_URL`. Call `dotenv::dotenv()`
    /// first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self> {
        let endpoint = env::var(ENDPOINT_ENV).ok().filter(|v| !v.trim().is_empty());
        let config = Config {
            endpoint,
            ..Default::default()
        };
        config.endpoint_url()?;
        Ok(config)
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// The validated endpoint URL.
    pub fn endpoint_url(&self) -> Result<&str> {
        let endpoint = self.endpoint.as_deref().ok_or_else(|| {
            FlowgenError::Config(format!("{} is not set", ENDPOINT_ENV))
        })?;

        let endpoint = endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(FlowgenError::Config(format!(
                "endpoint must be an http(s) URL, got '{}'",
                endpoint
            )));
        }

        Ok(endpoint)
    }
}
