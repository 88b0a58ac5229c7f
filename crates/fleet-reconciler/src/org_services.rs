// Organization-level runner services: registration and removal tokens, and
// the downloadable runner applications.

use crate::api_paths::OrgPaths;
use crate::gateway::{get_json, RemoteApi};
use crate::models::{OrganizationToken, RunnerApplication};
use fleet_common::{Result, Tracing};
use fleet_sdk::TraceWriter;
use reqwest::Method;
use std::sync::Arc;

pub struct OrgServices {
    api: Arc<dyn RemoteApi>,
    paths: OrgPaths,
    trace: Tracing,
}

impl OrgServices {
    pub fn new(api: Arc<dyn RemoteApi>, paths: OrgPaths, trace: Tracing) -> Self {
        Self { api, paths, trace }
    }

    /// A token a runner uses to register itself with the organization.
    pub async fn registration_token(&self) -> Result<OrganizationToken> {
        self.mint_token(&self.paths.registration_token(), "registration").await
    }

    /// A token a runner uses to unregister itself.
    pub async fn remove_token(&self) -> Result<OrganizationToken> {
        self.mint_token(&self.paths.remove_token(), "remove").await
    }

    async fn mint_token(&self, path: &str, kind: &str) -> Result<OrganizationToken> {
        let token: OrganizationToken = self.api.call(Method::POST, path, None).await?.json()?;
        self.trace.add_secret(&token.token);
        self.trace.info(&format!(
            "Issued {kind} token for organization '{}'",
            self.paths.organization()
        ));
        Ok(token)
    }

    /// Runner application packages available for download.
    pub async fn runner_applications(&self) -> Result<Vec<RunnerApplication>> {
        get_json(self.api.as_ref(), &self.paths.runner_downloads()).await
    }
}
