// FleetClient: wires settings, credential provider and gateway together and
// hands out the per-resource reconcilers.

use crate::api_paths::OrgPaths;
use crate::credential_provider::create_credential_provider;
use crate::gateway::{ApiGateway, RemoteApi};
use crate::network::NetworkReconciler;
use crate::org_services::OrgServices;
use crate::runner::RunnerReconciler;
use crate::runner_group::RunnerGroupReconciler;
use fleet_common::{HttpClientFactory, ProviderSettings, Result, TraceManager};
use fleet_sdk::TraceWriter;
use std::sync::Arc;

/// Entry point for callers: one organization, one authenticated gateway.
///
/// Cloning is cheap; clones share the gateway and its credential.
#[derive(Clone)]
pub struct FleetClient {
    api: Arc<dyn RemoteApi>,
    paths: OrgPaths,
    trace_manager: TraceManager,
}

impl FleetClient {
    /// Validate `settings`, build the credential provider and gateway, and
    /// obtain the first credential so bad credentials fail here.
    pub async fn connect(settings: &ProviderSettings, trace_manager: TraceManager) -> Result<Self> {
        let auth_mode = settings.auth_mode()?;
        let base_url = settings.api_base_url()?;
        let http = HttpClientFactory::create_client(&settings.client_settings())?;

        let trace = trace_manager.get("FleetClient");
        trace.info(&format!(
            "Connecting to {} for organization '{}'",
            base_url, settings.organization
        ));
        if settings.insecure {
            trace.warning("TLS certificate verification is disabled");
        }

        let provider = create_credential_provider(
            auth_mode,
            &base_url,
            http.clone(),
            trace_manager.get("CredentialProvider"),
        );
        trace.verbose(&format!("Using {} authentication", provider.scheme()));

        let gateway = ApiGateway::new(http, &base_url, provider, trace_manager.get("ApiGateway"));
        gateway.authenticate().await?;

        Ok(Self::from_api(Arc::new(gateway), settings.organization.trim(), trace_manager))
    }

    /// Build a client over an existing `RemoteApi`.
    pub fn from_api(api: Arc<dyn RemoteApi>, organization: &str, trace_manager: TraceManager) -> Self {
        Self {
            api,
            paths: OrgPaths::new(organization),
            trace_manager,
        }
    }

    pub fn organization(&self) -> &str {
        self.paths.organization()
    }

    pub fn api(&self) -> &Arc<dyn RemoteApi> {
        &self.api
    }

    pub fn runners(&self) -> RunnerReconciler {
        RunnerReconciler::new(self.api.clone(), self.paths.clone(), self.trace_manager.get("Runner"))
    }

    pub fn runner_groups(&self) -> RunnerGroupReconciler {
        RunnerGroupReconciler::new(self.api.clone(), self.paths.clone(), self.trace_manager.get("RunnerGroup"))
    }

    pub fn network(&self) -> NetworkReconciler {
        NetworkReconciler::new(self.api.clone(), self.paths.clone(), self.trace_manager.get("Network"))
    }

    pub fn org(&self) -> OrgServices {
        OrgServices::new(self.api.clone(), self.paths.clone(), self.trace_manager.get("OrgServices"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_common::FleetError;

    #[tokio::test]
    async fn connect_rejects_incomplete_settings_without_network() {
        let settings = ProviderSettings {
            organization: "acme".into(),
            ..Default::default()
        };
        let result = FleetClient::connect(&settings, TraceManager::default()).await;
        assert!(matches!(result, Err(FleetError::Config(_))));
    }

    #[tokio::test]
    async fn connect_with_bad_key_fails_before_any_call() {
        let mut settings = ProviderSettings {
            organization: "acme".into(),
            base_url: "http://127.0.0.1:9".into(),
            ..Default::default()
        };
        settings.app_auth.app_id = Some(1);
        settings.app_auth.installation_id = Some(2);
        settings.app_auth.pem = Some("not a pem".into());

        let result = FleetClient::connect(&settings, TraceManager::default()).await;
        assert!(matches!(result, Err(FleetError::Config(_))));
    }
}
