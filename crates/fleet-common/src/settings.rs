// ProviderSettings: connection and authentication settings, read from the
// environment and overridable by the caller.

use crate::constants;
use crate::credential::SigningIdentity;
use crate::error::{FleetError, Result};
use crate::http_client_factory::ClientSettings;
use fleet_sdk::{StringUtil, UrlUtil};
use std::time::Duration;

/// App authentication settings. All three values are required together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppAuthSettings {
    pub app_id: Option<u64>,
    pub installation_id: Option<u64>,
    pub pem: Option<String>,
}

impl AppAuthSettings {
    fn is_empty(&self) -> bool {
        self.app_id.is_none() && self.installation_id.is_none() && self.pem.is_none()
    }
}

/// How the gateway authenticates, resolved from `ProviderSettings`.
#[derive(Debug, Clone)]
pub enum AuthMode {
    /// A static token used verbatim.
    Token(String),
    /// Installation credentials minted from an app signing key.
    App(SigningIdentity),
}

/// Settings for talking to one organization.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub token: Option<String>,
    pub base_url: String,
    pub organization: String,
    pub insecure: bool,
    pub timeout: Duration,
    pub app_auth: AppAuthSettings,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            token: None,
            base_url: constants::api::DEFAULT_BASE_URL.to_string(),
            organization: String::new(),
            insecure: false,
            timeout: constants::DEFAULT_REQUEST_TIMEOUT,
            app_auth: AppAuthSettings::default(),
        }
    }
}

impl ProviderSettings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, which returns the value of a variable.
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut settings = Self {
            token: get(constants::env::TOKEN),
            organization: get(constants::env::ORGANIZATION).unwrap_or_default(),
            ..Self::default()
        };

        if let Some(base_url) = get(constants::env::BASE_URL) {
            settings.base_url = base_url;
        }

        if let Some(raw) = get(constants::env::INSECURE) {
            settings.insecure = StringUtil::convert_to_bool(&raw).ok_or_else(|| {
                FleetError::Config(format!(
                    "{} must be a boolean, got '{}'",
                    constants::env::INSECURE,
                    raw
                ))
            })?;
        }

        settings.app_auth = AppAuthSettings {
            app_id: get(constants::env::APP_ID)
                .map(|v| parse_id(constants::env::APP_ID, &v))
                .transpose()?,
            installation_id: get(constants::env::APP_INSTALLATION_ID)
                .map(|v| parse_id(constants::env::APP_INSTALLATION_ID, &v))
                .transpose()?,
            pem: get(constants::env::APP_PEM_FILE),
        };

        Ok(settings)
    }

    /// Check the settings and decide how to authenticate.
    ///
    /// The organization is required, as is either a token or a complete app
    /// configuration. When both are present, app authentication wins.
    pub fn auth_mode(&self) -> Result<AuthMode> {
        if self.organization.trim().is_empty() {
            return Err(FleetError::Config("organization is required".to_string()));
        }

        UrlUtil::normalize_base_url(&self.base_url).map_err(FleetError::Config)?;

        if !self.app_auth.is_empty() {
            let app_id = self
                .app_auth
                .app_id
                .ok_or_else(|| FleetError::Config("app authentication requires an app id".to_string()))?;
            let installation_id = self.app_auth.installation_id.ok_or_else(|| {
                FleetError::Config("app authentication requires an installation id".to_string())
            })?;
            let pem = self
                .app_auth
                .pem
                .as_deref()
                .filter(|p| !p.trim().is_empty())
                .ok_or_else(|| {
                    FleetError::Config(
                        "app authentication requires a non-empty private key (pem)".to_string(),
                    )
                })?;
            return Ok(AuthMode::App(SigningIdentity::new(app_id, installation_id, pem)));
        }

        match self.token.as_deref().filter(|t| !t.trim().is_empty()) {
            Some(token) => Ok(AuthMode::Token(token.to_string())),
            None => Err(FleetError::Config(
                "either a token or app authentication settings are required".to_string(),
            )),
        }
    }

    /// The normalized base URL.
    pub fn api_base_url(&self) -> Result<String> {
        UrlUtil::normalize_base_url(&self.base_url).map_err(FleetError::Config)
    }

    /// Transport settings derived from these settings.
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings::default()
            .with_timeout(self.timeout)
            .with_insecure(self.insecure)
    }
}

fn parse_id(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| FleetError::Config(format!("{key} must be a positive integer, got '{value}'")))
}
