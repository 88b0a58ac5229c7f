// HttpClientFactory: builds the reqwest client used by the gateway and the
// token exchange from an explicit `ClientSettings` value.

use crate::constants;
use crate::error::{FleetError, Result};
use fleet_sdk::FleetPackage;
use reqwest::Client;
use std::time::Duration;

/// Transport configuration handed to `HttpClientFactory::create_client`.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Deadline for each individual call.
    pub timeout: Duration,
    /// Skip TLS certificate verification (dangerous; for test instances).
    pub insecure: bool,
    /// Identifying `User-Agent` string.
    pub user_agent: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            timeout: constants::DEFAULT_REQUEST_TIMEOUT,
            insecure: false,
            user_agent: FleetPackage::user_agent(),
        }
    }
}

impl ClientSettings {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }
}

/// Creates configured HTTP clients.
pub struct HttpClientFactory;

impl HttpClientFactory {
    pub fn create_client(settings: &ClientSettings) -> Result<Client> {
        let mut builder = Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.clone());

        if settings.insecure {
            builder = builder.danger_accept_invalid_certs(true);
        }

        builder
            .build()
            .map_err(|e| FleetError::Config(format!("failed to build HTTP client: {e}")))
    }

    /// Create a client with default settings.
    pub fn create_default_client() -> Result<Client> {
        Self::create_client(&ClientSettings::default())
    }
}
