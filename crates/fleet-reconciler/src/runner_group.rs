// Runner group reconciler: create, update and delete groups, and replace
// their repository and runner sets.

use crate::api_paths::OrgPaths;
use crate::gateway::{get_all, get_json, send_empty, send_json, RemoteApi};
use crate::label_diff::set_changed;
use crate::models::{
    CreateRunnerGroupRequest, RemoteRunner, RepositoryList, RunnerGroup, RunnerGroupList, RunnerList,
    SetRepositoriesRequest, SetRunnersRequest, UpdateRunnerGroupRequest, Visibility,
};
use crate::validators::{validate_group_name, validate_group_visibility};
use fleet_common::{ReconcileStep, Result, Tracing};
use fleet_sdk::TraceWriter;
use reqwest::Method;
use std::sync::Arc;

/// Desired runner group configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunnerGroupSpec {
    pub name: String,
    pub visibility: Visibility,
    pub selected_repository_ids: Vec<u64>,
    pub runner_ids: Vec<u64>,
    pub allows_public_repositories: bool,
    pub restricted_to_workflows: bool,
    pub selected_workflows: Vec<String>,
    pub network_configuration_id: Option<String>,
}

impl RunnerGroupSpec {
    fn validate(&self) -> Result<()> {
        validate_group_name(&self.name)?;
        validate_group_visibility(self.visibility, &self.selected_repository_ids)
    }

    fn scalars_differ(&self, other: &RunnerGroupSpec) -> bool {
        self.name != other.name
            || self.visibility != other.visibility
            || self.allows_public_repositories != other.allows_public_repositories
            || self.restricted_to_workflows != other.restricted_to_workflows
            || set_changed(&self.selected_workflows, &other.selected_workflows)
            || self.network_configuration_id != other.network_configuration_id
    }
}

/// Observed runner group with its membership sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerGroupState {
    pub group: RunnerGroup,
    pub selected_repository_ids: Vec<u64>,
    pub runner_ids: Vec<u64>,
}

pub struct RunnerGroupReconciler {
    api: Arc<dyn RemoteApi>,
    paths: OrgPaths,
    trace: Tracing,
}

impl RunnerGroupReconciler {
    pub fn new(api: Arc<dyn RemoteApi>, paths: OrgPaths, trace: Tracing) -> Self {
        Self { api, paths, trace }
    }

    pub async fn create(&self, spec: &RunnerGroupSpec) -> Result<RunnerGroupState> {
        spec.validate()?;

        let request = CreateRunnerGroupRequest {
            name: spec.name.clone(),
            visibility: spec.visibility,
            selected_repository_ids: spec.selected_repository_ids.clone(),
            runners: spec.runner_ids.clone(),
            allows_public_repositories: spec.allows_public_repositories,
            restricted_to_workflows: spec.restricted_to_workflows,
            selected_workflows: spec.selected_workflows.clone(),
            network_configuration_id: spec.network_configuration_id.clone(),
        };

        self.trace.info(&format!(
            "Creating runner group '{}' with visibility {}",
            spec.name, spec.visibility
        ));

        let group: RunnerGroup =
            send_json(self.api.as_ref(), Method::POST, &self.paths.runner_groups(), &request)
                .await
                .map_err(|e| e.at_step(ReconcileStep::CreateGroup, None))?;

        Ok(RunnerGroupState {
            group,
            selected_repository_ids: spec.selected_repository_ids.clone(),
            runner_ids: spec.runner_ids.clone(),
        })
    }

    /// Read a group along with its repository and runner sets.
    pub async fn read(&self, group_id: u64) -> Result<RunnerGroupState> {
        let group: RunnerGroup = get_json(self.api.as_ref(), &self.paths.runner_group(group_id)).await?;

        let selected_repository_ids = if group.visibility == Visibility::Selected {
            get_all::<RepositoryList>(self.api.as_ref(), &self.paths.runner_group_repositories(group_id))
                .await?
                .into_iter()
                .map(|r| r.id)
                .collect()
        } else {
            Vec::new()
        };

        let runner_ids = self
            .list_runners(group_id)
            .await?
            .into_iter()
            .map(|r| r.id)
            .collect();

        Ok(RunnerGroupState {
            group,
            selected_repository_ids,
            runner_ids,
        })
    }

    /// Bring group `group_id` from `previous` to `desired`.
    ///
    /// Scalar fields go out in one PATCH; repositories and runners are each
    /// replaced whole, and only when the set changed.
    pub async fn update(
        &self,
        group_id: u64,
        previous: &RunnerGroupSpec,
        desired: &RunnerGroupSpec,
    ) -> Result<RunnerGroupState> {
        desired.validate()?;

        let mut group = None;

        if previous.scalars_differ(desired) {
            let request = UpdateRunnerGroupRequest {
                name: desired.name.clone(),
                visibility: desired.visibility,
                allows_public_repositories: desired.allows_public_repositories,
                restricted_to_workflows: desired.restricted_to_workflows,
                selected_workflows: desired.selected_workflows.clone(),
                network_configuration_id: desired.network_configuration_id.clone().unwrap_or_default(),
            };
            self.trace.info(&format!("Updating runner group {group_id}"));
            let updated: RunnerGroup =
                send_json(self.api.as_ref(), Method::PATCH, &self.paths.runner_group(group_id), &request)
                    .await
                    .map_err(|e| e.at_step(ReconcileStep::UpdateGroup, Some(group_id)))?;
            group = Some(updated);
        }

        // Only `selected` groups carry an explicit repository list.
        if desired.visibility == Visibility::Selected
            && set_changed(&previous.selected_repository_ids, &desired.selected_repository_ids)
        {
            self.trace.info(&format!(
                "Replacing repositories of runner group {group_id} ({} selected)",
                desired.selected_repository_ids.len()
            ));
            send_empty(
                self.api.as_ref(),
                Method::PUT,
                &self.paths.runner_group_repositories(group_id),
                Some(&SetRepositoriesRequest {
                    selected_repository_ids: desired.selected_repository_ids.clone(),
                }),
            )
            .await
            .map_err(|e| e.at_step(ReconcileStep::ReplaceGroupRepositories, Some(group_id)))?;
        }

        if set_changed(&previous.runner_ids, &desired.runner_ids) {
            self.trace.info(&format!(
                "Replacing runners of runner group {group_id} ({} runners)",
                desired.runner_ids.len()
            ));
            send_empty(
                self.api.as_ref(),
                Method::PUT,
                &self.paths.runner_group_runners(group_id),
                Some(&SetRunnersRequest {
                    runners: desired.runner_ids.clone(),
                }),
            )
            .await
            .map_err(|e| e.at_step(ReconcileStep::ReplaceGroupRunners, Some(group_id)))?;
        }

        let group = match group {
            Some(group) => group,
            None => get_json(self.api.as_ref(), &self.paths.runner_group(group_id))
                .await
                .map_err(|e| e.at_step(ReconcileStep::ReadGroup, Some(group_id)))?,
        };

        Ok(RunnerGroupState {
            group,
            selected_repository_ids: if desired.visibility == Visibility::Selected {
                desired.selected_repository_ids.clone()
            } else {
                Vec::new()
            },
            runner_ids: desired.runner_ids.clone(),
        })
    }

    pub async fn delete(&self, group_id: u64) -> Result<()> {
        self.trace.info(&format!("Deleting runner group {group_id}"));
        self.api
            .call(Method::DELETE, &self.paths.runner_group(group_id), None)
            .await?;
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<RunnerGroup>> {
        get_all::<RunnerGroupList>(self.api.as_ref(), &self.paths.runner_groups()).await
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<RunnerGroup>> {
        Ok(self.list().await?.into_iter().find(|g| g.name == name))
    }

    pub async fn list_runners(&self, group_id: u64) -> Result<Vec<RemoteRunner>> {
        get_all::<RunnerList>(self.api.as_ref(), &self.paths.runner_group_runners(group_id)).await
    }
}
