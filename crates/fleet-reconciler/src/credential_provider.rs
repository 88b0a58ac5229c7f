// Credential providers: a static token passed through verbatim, or an
// installation token minted by exchanging a signed app assertion.

use crate::api_paths;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fleet_common::constants::{self, api};
use fleet_common::settings::AuthMode;
use fleet_common::{Credential, FleetError, Result, SigningIdentity, Tracing};
use fleet_sdk::{StringUtil, TraceWriter, UrlUtil};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::header::ACCEPT;
use rsa::pkcs1::{DecodeRsaPrivateKey, EncodeRsaPrivateKey};
use rsa::pkcs8::DecodePrivateKey;
use rsa::RsaPrivateKey;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Supplies the bearer credential for API calls.
///
/// Providers never cache: every `obtain` returns a freshly issued credential.
/// Keeping one alive across calls is the gateway's job.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn obtain(&self) -> Result<Credential>;

    /// Short name of the authentication scheme, for diagnostics.
    fn scheme(&self) -> &'static str;
}

/// Build the provider matching the resolved authentication mode.
pub fn create_credential_provider(
    mode: AuthMode,
    base_url: &str,
    client: reqwest::Client,
    trace: Tracing,
) -> Arc<dyn CredentialProvider> {
    match mode {
        AuthMode::Token(token) => Arc::new(StaticCredentialProvider::new(token, trace)),
        AuthMode::App(identity) => Arc::new(AppCredentialProvider::new(identity, base_url, client, trace)),
    }
}

// ---------------------------------------------------------------------------
// Static token provider
// ---------------------------------------------------------------------------

/// Wraps a caller-supplied token. No network call; the credential never
/// expires as far as this client is concerned.
pub struct StaticCredentialProvider {
    token: String,
    trace: Tracing,
}

impl StaticCredentialProvider {
    pub fn new(token: impl Into<String>, trace: Tracing) -> Self {
        let token = token.into();
        trace.add_secret(&token);
        Self { token, trace }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentialProvider {
    async fn obtain(&self) -> Result<Credential> {
        self.trace.verbose("Using static token credential");
        Ok(Credential::from_static(self.token.clone()))
    }

    fn scheme(&self) -> &'static str {
        "token"
    }
}

// ---------------------------------------------------------------------------
// App installation provider
// ---------------------------------------------------------------------------

/// Claims of the signed app assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iat: i64,
    pub exp: i64,
    pub iss: u64,
}

#[derive(Deserialize)]
struct InstallationTokenResponse {
    token: String,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
}

/// Mints installation credentials: decode the app key, sign a short-lived
/// RS256 assertion, and exchange it once for an installation token.
pub struct AppCredentialProvider {
    identity: SigningIdentity,
    base_url: String,
    client: reqwest::Client,
    trace: Tracing,
}

impl AppCredentialProvider {
    pub fn new(identity: SigningIdentity, base_url: &str, client: reqwest::Client, trace: Tracing) -> Self {
        Self {
            identity,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            trace,
        }
    }

    /// Exchange `assertion` for an installation credential.
    async fn exchange(&self, assertion: &str) -> Result<Credential> {
        let path = api_paths::installation_access_tokens(self.identity.installation_id);
        let url = UrlUtil::join(&self.base_url, &path);

        self.trace.info(&format!(
            "Exchanging app assertion for installation {} token",
            self.identity.installation_id
        ));

        let transport = |source: reqwest::Error| FleetError::Transport {
            method: "POST".to_string(),
            path: path.clone(),
            source,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(assertion)
            .header(ACCEPT, api::ACCEPT)
            .header(api::VERSION_HEADER, api::VERSION)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let body = response.bytes().await.map_err(transport)?;

        if !status.is_success() {
            return Err(FleetError::Exchange {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        let token: InstallationTokenResponse =
            serde_json::from_slice(&body).map_err(|source| FleetError::Decode {
                path: path.clone(),
                source,
            })?;

        self.trace.add_secret(&token.token);
        self.trace.info(&format!(
            "Installation token issued, expires at {}",
            token
                .expires_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "<unspecified>".to_string())
        ));

        Ok(Credential::minted(token.token, token.expires_at))
    }
}

#[async_trait]
impl CredentialProvider for AppCredentialProvider {
    async fn obtain(&self) -> Result<Credential> {
        let key = decode_private_key(&self.identity.private_key_pem)?;
        let assertion = sign_assertion(&self.identity, &key, Utc::now())?;
        self.trace.add_secret(&assertion);
        self.exchange(&assertion).await
    }

    fn scheme(&self) -> &'static str {
        "app"
    }
}

/// Decode an RSA private key from PEM.
///
/// Escaped `\n` sequences are turned into real line breaks first. PKCS#1
/// (`RSA PRIVATE KEY`) is the expected encoding; PKCS#8 is accepted too.
pub fn decode_private_key(pem: &str) -> Result<RsaPrivateKey> {
    let normalized = StringUtil::unescape_newlines(pem);
    let normalized = normalized.trim();

    if !normalized.contains("-----BEGIN ") {
        return Err(FleetError::Config(
            "failed to parse PEM block containing the key".to_string(),
        ));
    }

    RsaPrivateKey::from_pkcs1_pem(normalized)
        .or_else(|_| RsaPrivateKey::from_pkcs8_pem(normalized))
        .map_err(|e| FleetError::Config(format!("failed to parse private key: {e}")))
}

/// Sign the app assertion: `iat = now`, `exp = now + 10 minutes`,
/// `iss = app id`, RS256.
pub fn sign_assertion(identity: &SigningIdentity, key: &RsaPrivateKey, now: DateTime<Utc>) -> Result<String> {
    let lifetime = chrono::Duration::from_std(constants::ASSERTION_LIFETIME)
        .map_err(|e| FleetError::Signing(e.to_string()))?;

    let claims = AssertionClaims {
        iat: now.timestamp(),
        exp: (now + lifetime).timestamp(),
        iss: identity.app_id,
    };

    let der = key
        .to_pkcs1_der()
        .map_err(|e| FleetError::Signing(format!("failed to encode private key: {e}")))?;
    let encoding_key = EncodingKey::from_rsa_der(der.as_bytes());

    jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
        .map_err(|e| FleetError::Signing(e.to_string()))
}
