// Hosted compute network configurations, and the network settings they
// reference.

use crate::api_paths::OrgPaths;
use crate::gateway::{get_all, get_json, send_json, RemoteApi};
use crate::models::{
    ComputeService, NetworkConfiguration, NetworkConfigurationList, NetworkConfigurationRequest, NetworkSettings,
};
use fleet_common::{FleetError, Result, Tracing};
use fleet_sdk::TraceWriter;
use reqwest::Method;
use std::sync::Arc;

/// Desired network configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkConfigurationSpec {
    pub name: String,
    pub compute_service: ComputeService,
    pub network_settings_ids: Vec<String>,
}

impl NetworkConfigurationSpec {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(FleetError::validation("network configuration name cannot be empty"));
        }
        if self.network_settings_ids.is_empty() || self.network_settings_ids.iter().any(|id| id.trim().is_empty()) {
            return Err(FleetError::validation(
                "network configuration needs at least one non-empty network settings id",
            ));
        }
        Ok(())
    }

    fn to_request(&self) -> NetworkConfigurationRequest {
        NetworkConfigurationRequest {
            name: self.name.clone(),
            compute_service: self.compute_service,
            network_settings_ids: self.network_settings_ids.clone(),
        }
    }
}

pub struct NetworkReconciler {
    api: Arc<dyn RemoteApi>,
    paths: OrgPaths,
    trace: Tracing,
}

impl NetworkReconciler {
    pub fn new(api: Arc<dyn RemoteApi>, paths: OrgPaths, trace: Tracing) -> Self {
        Self { api, paths, trace }
    }

    pub async fn create(&self, spec: &NetworkConfigurationSpec) -> Result<NetworkConfiguration> {
        spec.validate()?;
        self.trace
            .info(&format!("Creating network configuration '{}'", spec.name));
        send_json(
            self.api.as_ref(),
            Method::POST,
            &self.paths.network_configurations(),
            &spec.to_request(),
        )
        .await
    }

    pub async fn read(&self, id: &str) -> Result<NetworkConfiguration> {
        get_json(self.api.as_ref(), &self.paths.network_configuration(id)).await
    }

    /// Replace all fields of configuration `id`.
    pub async fn update(&self, id: &str, desired: &NetworkConfigurationSpec) -> Result<NetworkConfiguration> {
        desired.validate()?;
        self.trace
            .info(&format!("Updating network configuration {id}"));
        send_json(
            self.api.as_ref(),
            Method::PATCH,
            &self.paths.network_configuration(id),
            &desired.to_request(),
        )
        .await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.trace
            .info(&format!("Deleting network configuration {id}"));
        self.api
            .call(Method::DELETE, &self.paths.network_configuration(id), None)
            .await?;
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<NetworkConfiguration>> {
        get_all::<NetworkConfigurationList>(self.api.as_ref(), &self.paths.network_configurations()).await
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<NetworkConfiguration>> {
        Ok(self.list().await?.into_iter().find(|c| c.name == name))
    }

    /// Network settings are managed outside this client and only read here.
    pub async fn network_settings(&self, id: &str) -> Result<NetworkSettings> {
        get_json(self.api.as_ref(), &self.paths.network_settings(id)).await
    }
}
