// Wire types for the runner, runner group, network and token endpoints.

use chrono::{DateTime, Utc};
use fleet_common::constants;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Runners and labels
// ---------------------------------------------------------------------------

/// Label kind as reported by the remote system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LabelKind {
    /// Assigned at creation from the caller's read-only list; never removable.
    #[serde(rename = "read-only")]
    ReadOnly,
    #[default]
    #[serde(rename = "custom")]
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerLabel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: LabelKind,
}

/// A self-hosted runner as returned by the remote system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRunner {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub os: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub busy: bool,
    #[serde(default)]
    pub ephemeral: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runner_group_id: Option<u64>,
    #[serde(default)]
    pub labels: Vec<RunnerLabel>,
}

impl RemoteRunner {
    pub fn is_offline(&self) -> bool {
        self.status == constants::runner_status::OFFLINE
    }

    /// Names of the labels of the given kind, in remote order.
    pub fn label_names(&self, kind: LabelKind) -> Vec<String> {
        self.labels
            .iter()
            .filter(|l| l.kind == kind)
            .map(|l| l.name.clone())
            .collect()
    }

    pub fn all_label_names(&self) -> Vec<String> {
        self.labels.iter().map(|l| l.name.clone()).collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunnerList {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub runners: Vec<RemoteRunner>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LabelList {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub labels: Vec<RunnerLabel>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JitConfigRequest {
    pub name: String,
    pub runner_group_id: u64,
    pub labels: Vec<String>,
    pub work_folder: String,
}

#[derive(Clone, Deserialize)]
pub struct JitConfigResponse {
    pub runner: RemoteRunner,
    pub encoded_jit_config: String,
}

impl fmt::Debug for JitConfigResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JitConfigResponse")
            .field("runner", &self.runner)
            .field("encoded_jit_config", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SetLabelsRequest {
    pub labels: Vec<String>,
}

/// A downloadable runner application package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerApplication {
    #[serde(default)]
    pub os: String,
    #[serde(default)]
    pub architecture: String,
    #[serde(default)]
    pub download_url: String,
    #[serde(default)]
    pub filename: String,
}

/// A registration or removal token.
#[derive(Clone, Deserialize)]
pub struct OrganizationToken {
    pub token: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl fmt::Debug for OrganizationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrganizationToken")
            .field("token", &"***")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Runner groups
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    All,
    Selected,
    Private,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Visibility::All => constants::visibility::ALL,
            Visibility::Selected => constants::visibility::SELECTED,
            Visibility::Private => constants::visibility::PRIVATE,
        };
        f.write_str(value)
    }
}

/// A runner group as returned by the remote system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerGroup {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub inherited: bool,
    #[serde(default)]
    pub allows_public_repositories: bool,
    #[serde(default)]
    pub restricted_to_workflows: bool,
    #[serde(default)]
    pub selected_workflows: Vec<String>,
    #[serde(default)]
    pub workflow_restrictions_read_only: bool,
    #[serde(default)]
    pub network_configuration_id: Option<String>,
    #[serde(default)]
    pub selected_repositories_url: Option<String>,
    #[serde(default)]
    pub runners_url: Option<String>,
    #[serde(default)]
    pub hosted_runners_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunnerGroupList {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub runner_groups: Vec<RunnerGroup>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateRunnerGroupRequest {
    pub name: String,
    pub visibility: Visibility,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub selected_repository_ids: Vec<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub runners: Vec<u64>,
    pub allows_public_repositories: bool,
    pub restricted_to_workflows: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub selected_workflows: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_configuration_id: Option<String>,
}

/// Scalar fields of a runner group. Always sent whole, so a field reset to
/// its default is applied too. An empty `network_configuration_id` detaches
/// the group from its network configuration.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateRunnerGroupRequest {
    pub name: String,
    pub visibility: Visibility,
    pub allows_public_repositories: bool,
    pub restricted_to_workflows: bool,
    pub selected_workflows: Vec<String>,
    pub network_configuration_id: String,
}

/// A repository granted access to a runner group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub full_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryList {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub repositories: Vec<Repository>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SetRepositoriesRequest {
    pub selected_repository_ids: Vec<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SetRunnersRequest {
    pub runners: Vec<u64>,
}

// ---------------------------------------------------------------------------
// Network configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComputeService {
    None,
    #[default]
    Actions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfiguration {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub compute_service: ComputeService,
    #[serde(default)]
    pub network_settings_ids: Vec<String>,
    #[serde(default)]
    pub created_on: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfigurationList {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub network_configurations: Vec<NetworkConfiguration>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NetworkConfigurationRequest {
    pub name: String,
    pub compute_service: ComputeService,
    pub network_settings_ids: Vec<String>,
}

/// Network settings (subnet binding) referenced by a network configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSettings {
    pub id: String,
    #[serde(default)]
    pub network_configuration_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub subnet_id: String,
    #[serde(default)]
    pub region: String,
}

// ---------------------------------------------------------------------------
// Paging
// ---------------------------------------------------------------------------

/// A page of a list endpoint: the remote total plus this page's items.
pub trait Paged {
    type Item;

    fn total_count(&self) -> u64;

    fn into_items(self) -> Vec<Self::Item>;
}

impl Paged for RunnerList {
    type Item = RemoteRunner;

    fn total_count(&self) -> u64 {
        self.total_count
    }

    fn into_items(self) -> Vec<RemoteRunner> {
        self.runners
    }
}

impl Paged for RunnerGroupList {
    type Item = RunnerGroup;

    fn total_count(&self) -> u64 {
        self.total_count
    }

    fn into_items(self) -> Vec<RunnerGroup> {
        self.runner_groups
    }
}

impl Paged for RepositoryList {
    type Item = Repository;

    fn total_count(&self) -> u64 {
        self.total_count
    }

    fn into_items(self) -> Vec<Repository> {
        self.repositories
    }
}

impl Paged for NetworkConfigurationList {
    type Item = NetworkConfiguration;

    fn total_count(&self) -> u64 {
        self.total_count
    }

    fn into_items(self) -> Vec<NetworkConfiguration> {
        self.network_configurations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn runner_deserializes_label_kinds() {
        let runner: RemoteRunner = serde_json::from_value(json!({
            "id": 23,
            "name": "build-01",
            "os": "linux",
            "status": "offline",
            "busy": false,
            "ephemeral": false,
            "labels": [
                {"id": 1, "name": "self-hosted", "type": "read-only"},
                {"id": 2, "name": "linux", "type": "read-only"},
                {"id": 3, "name": "gpu", "type": "custom"}
            ]
        }))
        .unwrap();

        assert!(runner.is_offline());
        assert_eq!(runner.label_names(LabelKind::ReadOnly), vec!["self-hosted", "linux"]);
        assert_eq!(runner.label_names(LabelKind::Custom), vec!["gpu"]);
        assert_eq!(runner.all_label_names().len(), 3);
    }

    #[test]
    fn group_visibility_round_trips_lowercase() {
        let group: RunnerGroup = serde_json::from_value(json!({
            "id": 4,
            "name": "gpu",
            "visibility": "selected",
            "default": false
        }))
        .unwrap();
        assert_eq!(group.visibility, Visibility::Selected);
        assert_eq!(group.visibility.to_string(), "selected");
        assert!(group.selected_workflows.is_empty());
    }

    #[test]
    fn create_group_request_omits_empty_sets() {
        let req = CreateRunnerGroupRequest {
            name: "g".into(),
            visibility: Visibility::All,
            selected_repository_ids: vec![],
            runners: vec![],
            allows_public_repositories: false,
            restricted_to_workflows: false,
            selected_workflows: vec![],
            network_configuration_id: None,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["visibility"], "all");
        assert!(value.get("selected_repository_ids").is_none());
        assert!(value.get("runners").is_none());
        assert!(value.get("network_configuration_id").is_none());
    }

    #[test]
    fn tokens_hide_secrets_in_debug() {
        let token: OrganizationToken = serde_json::from_value(json!({
            "token": "AABF3JGZDX3P5PMEXLND6TS6FCWO6",
            "expires_at": "2020-01-22T12:13:35.123-08:00"
        }))
        .unwrap();
        assert!(token.expires_at.is_some());
        assert!(!format!("{token:?}").contains("AABF3"));
    }
}
