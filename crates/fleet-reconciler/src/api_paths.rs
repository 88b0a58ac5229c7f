// Path templates for the organization-scoped API endpoints.

/// Builds request paths for one organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgPaths {
    organization: String,
}

impl OrgPaths {
    pub fn new(organization: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
        }
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    // -----------------------------------------------------------------------
    // Runners
    // -----------------------------------------------------------------------

    pub fn runners(&self) -> String {
        format!("/orgs/{}/actions/runners", self.organization)
    }

    pub fn runner(&self, runner_id: u64) -> String {
        format!("{}/{}", self.runners(), runner_id)
    }

    pub fn runner_labels(&self, runner_id: u64) -> String {
        format!("{}/labels", self.runner(runner_id))
    }

    pub fn jit_config(&self) -> String {
        format!("{}/generate-jitconfig", self.runners())
    }

    pub fn runner_downloads(&self) -> String {
        format!("{}/downloads", self.runners())
    }

    pub fn registration_token(&self) -> String {
        format!("{}/registration-token", self.runners())
    }

    pub fn remove_token(&self) -> String {
        format!("{}/remove-token", self.runners())
    }

    // -----------------------------------------------------------------------
    // Runner groups
    // -----------------------------------------------------------------------

    pub fn runner_groups(&self) -> String {
        format!("/orgs/{}/actions/runner-groups", self.organization)
    }

    pub fn runner_group(&self, group_id: u64) -> String {
        format!("{}/{}", self.runner_groups(), group_id)
    }

    pub fn runner_group_repositories(&self, group_id: u64) -> String {
        format!("{}/repositories", self.runner_group(group_id))
    }

    pub fn runner_group_runners(&self, group_id: u64) -> String {
        format!("{}/runners", self.runner_group(group_id))
    }

    pub fn runner_group_runner(&self, group_id: u64, runner_id: u64) -> String {
        format!("{}/{}", self.runner_group_runners(group_id), runner_id)
    }

    // -----------------------------------------------------------------------
    // Network settings
    // -----------------------------------------------------------------------

    pub fn network_configurations(&self) -> String {
        format!("/orgs/{}/settings/network-configurations", self.organization)
    }

    pub fn network_configuration(&self, id: &str) -> String {
        format!("{}/{}", self.network_configurations(), id)
    }

    pub fn network_settings(&self, id: &str) -> String {
        format!("/orgs/{}/settings/network-settings/{}", self.organization, id)
    }
}

/// Path of the installation token exchange. Not organization-scoped.
pub fn installation_access_tokens(installation_id: u64) -> String {
    format!("/app/installations/{installation_id}/access_tokens")
}
