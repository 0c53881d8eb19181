//! Connection settings for the catalog API

use std::time::Duration;

use reqwest::Url;
use secrecy::SecretString;

use crate::error::{ClientError, Result};

/// Settings needed to reach and authenticate against the catalog API
#[derive(Debug)]
pub struct ClientConfig {
    /// API root, e.g. `https://api.getport.io`
    pub base_url: String,
    pub client_id: String,
    pub client_secret: SecretString,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ClientConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.getport.io";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            client_id: client_id.into(),
            client_secret: SecretString::new(client_secret.into().into()),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Parse the base URL, rejecting values that cannot carry a path
    pub(crate) fn parsed_base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        if url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(format!(
                "{}: not a base URL",
                self.base_url
            )));
        }
        Ok(url)
    }
}
