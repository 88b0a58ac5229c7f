// Runner lifecycle reconciler: JIT creation, label and group updates, and
// guarded deletion of self-hosted runners.

use crate::api_paths::OrgPaths;
use crate::gateway::{get_all, get_json, send_empty, send_json, RemoteApi};
use crate::label_diff::{diff, set_changed, union};
use crate::models::{
    JitConfigRequest, JitConfigResponse, LabelKind, LabelList, RemoteRunner, RunnerList, SetLabelsRequest,
};
use crate::validators::{validate_label_values, validate_labels, validate_runner_name};
use fleet_common::constants::{label_kind, DEFAULT_RUNNER_GROUP_ID, DEFAULT_WORK_FOLDER};
use fleet_common::{FleetError, ReconcileStep, Result, Tracing};
use fleet_sdk::{StringUtil, TraceWriter};
use reqwest::Method;
use std::fmt;
use std::sync::Arc;

/// Desired runner configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunnerSpec {
    pub name: String,
    /// Group the runner belongs to. `None` means the organization default
    /// at creation, and "no explicit membership" on update.
    pub runner_group_id: Option<u64>,
    /// Custom labels, freely replaceable.
    pub labels: Vec<String>,
    /// Labels fixed at creation. They can never be removed afterwards.
    pub read_only_labels: Vec<String>,
    pub work_folder: Option<String>,
}

/// Observed runner state.
#[derive(Clone, PartialEq, Eq)]
pub struct RunnerState {
    pub id: u64,
    pub name: String,
    pub os: String,
    pub status: String,
    pub busy: bool,
    pub ephemeral: bool,
    pub runner_group_id: Option<u64>,
    pub labels: Vec<String>,
    pub read_only_labels: Vec<String>,
    /// Only present right after creation; the remote never returns it again.
    pub encoded_jit_config: Option<String>,
}

impl RunnerState {
    pub fn from_remote(runner: RemoteRunner) -> Self {
        Self {
            labels: runner.label_names(LabelKind::Custom),
            read_only_labels: runner.label_names(LabelKind::ReadOnly),
            id: runner.id,
            name: runner.name,
            os: runner.os,
            status: runner.status,
            busy: runner.busy,
            ephemeral: runner.ephemeral,
            runner_group_id: runner.runner_group_id,
            encoded_jit_config: None,
        }
    }
}

impl fmt::Debug for RunnerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunnerState")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("os", &self.os)
            .field("status", &self.status)
            .field("busy", &self.busy)
            .field("ephemeral", &self.ephemeral)
            .field("runner_group_id", &self.runner_group_id)
            .field("labels", &self.labels)
            .field("read_only_labels", &self.read_only_labels)
            .field("encoded_jit_config", &self.encoded_jit_config.as_ref().map(|_| "***"))
            .finish()
    }
}

pub struct RunnerReconciler {
    api: Arc<dyn RemoteApi>,
    paths: OrgPaths,
    trace: Tracing,
}

impl RunnerReconciler {
    pub fn new(api: Arc<dyn RemoteApi>, paths: OrgPaths, trace: Tracing) -> Self {
        Self { api, paths, trace }
    }

    /// Create a runner through a JIT configuration, then set its custom
    /// labels.
    ///
    /// The JIT call allocates a new remote runner on every invocation and is
    /// never repeated. If the label call fails, the error carries the id of
    /// the runner that now exists.
    pub async fn create(&self, spec: &RunnerSpec) -> Result<RunnerState> {
        validate_runner_name(&spec.name)?;
        validate_labels(label_kind::CUSTOM, &spec.labels)?;
        validate_labels(label_kind::READ_ONLY, &spec.read_only_labels)?;

        let request = JitConfigRequest {
            name: spec.name.clone(),
            runner_group_id: spec.runner_group_id.unwrap_or(DEFAULT_RUNNER_GROUP_ID),
            labels: spec.read_only_labels.clone(),
            work_folder: spec
                .work_folder
                .clone()
                .unwrap_or_else(|| DEFAULT_WORK_FOLDER.to_string()),
        };

        self.trace.info(&format!(
            "Issuing JIT configuration for runner '{}' in group {}",
            request.name, request.runner_group_id
        ));

        let jit: JitConfigResponse =
            send_json(self.api.as_ref(), Method::POST, &self.paths.jit_config(), &request)
                .await
                .map_err(|e| e.at_step(ReconcileStep::IssueJitConfig, None))?;
        self.trace.add_secret(&jit.encoded_jit_config);

        let runner_id = jit.runner.id;
        let desired = union(&spec.read_only_labels, &spec.labels);
        let labels = diff(&spec.read_only_labels, &desired, &spec.read_only_labels);

        self.trace.info(&format!(
            "Runner {runner_id} created, setting labels [{}]",
            StringUtil::join_display(&labels.to_send)
        ));

        let applied: LabelList = send_json(
            self.api.as_ref(),
            Method::PUT,
            &self.paths.runner_labels(runner_id),
            &SetLabelsRequest {
                labels: labels.to_send,
            },
        )
        .await
        .map_err(|e| e.at_step(ReconcileStep::SetRunnerLabels, Some(runner_id)))?;

        let mut runner = jit.runner;
        runner.labels = applied.labels;
        runner.runner_group_id.get_or_insert(request.runner_group_id);

        let mut state = RunnerState::from_remote(runner);
        state.encoded_jit_config = Some(jit.encoded_jit_config);
        Ok(state)
    }

    pub async fn read(&self, runner_id: u64) -> Result<RunnerState> {
        let runner: RemoteRunner = get_json(self.api.as_ref(), &self.paths.runner(runner_id)).await?;
        Ok(RunnerState::from_remote(runner))
    }

    /// Move `runner_id` from the `previous` declaration to the `desired` one.
    ///
    /// All label checks run before the first mutating call. Then the group
    /// membership is reassigned (remove, then add) and the custom labels are
    /// replaced, each only when changed. An empty custom label list clears
    /// the runner's custom labels.
    ///
    /// Read-only labels are fixed by the JIT call. One added here is sent
    /// with the label replacement, so the remote stores it as a custom
    /// label and the returned state lists it under `labels`.
    pub async fn update(&self, runner_id: u64, previous: &RunnerSpec, desired: &RunnerSpec) -> Result<RunnerState> {
        if previous.name != desired.name {
            return Err(FleetError::validation(format!(
                "runner name cannot be changed after creation ('{}' -> '{}')",
                previous.name, desired.name
            )));
        }
        validate_label_values(label_kind::CUSTOM, &desired.labels)?;
        validate_label_values(label_kind::READ_ONLY, &desired.read_only_labels)?;

        let desired_labels = union(&desired.read_only_labels, &desired.labels);

        let declared = diff(&previous.read_only_labels, &desired_labels, &previous.read_only_labels);
        if declared.is_rejected() {
            return Err(read_only_rejection(declared.rejected));
        }

        let remote: RemoteRunner = get_json(self.api.as_ref(), &self.paths.runner(runner_id))
            .await
            .map_err(|e| e.at_step(ReconcileStep::ReadRunner, Some(runner_id)))?;

        let remote_read_only = remote.label_names(LabelKind::ReadOnly);
        let labels = diff(&remote.all_label_names(), &desired_labels, &remote_read_only);
        if labels.is_rejected() {
            return Err(read_only_rejection(labels.rejected));
        }

        if previous.runner_group_id != desired.runner_group_id {
            self.reassign_group(runner_id, previous.runner_group_id, desired.runner_group_id)
                .await?;
        }

        if set_changed(&remote.label_names(LabelKind::Custom), &labels.to_send) {
            self.trace.info(&format!(
                "Replacing labels of runner {runner_id} with [{}]",
                StringUtil::join_display(&labels.to_send)
            ));
            send_empty(
                self.api.as_ref(),
                Method::PUT,
                &self.paths.runner_labels(runner_id),
                Some(&SetLabelsRequest {
                    labels: labels.to_send,
                }),
            )
            .await
            .map_err(|e| e.at_step(ReconcileStep::SetRunnerLabels, Some(runner_id)))?;
        }

        let runner: RemoteRunner = get_json(self.api.as_ref(), &self.paths.runner(runner_id))
            .await
            .map_err(|e| e.at_step(ReconcileStep::ReadRunner, Some(runner_id)))?;
        Ok(RunnerState::from_remote(runner))
    }

    async fn reassign_group(&self, runner_id: u64, from: Option<u64>, to: Option<u64>) -> Result<()> {
        if let Some(old_group) = from {
            self.trace
                .info(&format!("Removing runner {runner_id} from group {old_group}"));
            self.api
                .call(Method::DELETE, &self.paths.runner_group_runner(old_group, runner_id), None)
                .await
                .map_err(|e| e.at_step(ReconcileStep::RemoveFromGroup, Some(runner_id)))?;
        }

        if let Some(new_group) = to {
            self.trace
                .info(&format!("Adding runner {runner_id} to group {new_group}"));
            self.api
                .call(Method::PUT, &self.paths.runner_group_runner(new_group, runner_id), None)
                .await
                .map_err(|e| e.at_step(ReconcileStep::AddToGroup, Some(runner_id)))?;
        }

        Ok(())
    }

    /// Delete an offline runner. A runner that no longer exists counts as
    /// deleted; any status other than `offline` is refused.
    pub async fn delete(&self, runner_id: u64) -> Result<()> {
        let runner: RemoteRunner = match get_json(self.api.as_ref(), &self.paths.runner(runner_id)).await {
            Ok(runner) => runner,
            Err(e) if e.status() == Some(404) => {
                self.trace
                    .info(&format!("Runner {runner_id} not found, nothing to delete"));
                return Ok(());
            }
            Err(e) => return Err(e.at_step(ReconcileStep::ReadRunner, Some(runner_id))),
        };

        if !runner.is_offline() {
            return Err(FleetError::Precondition(format!(
                "runner {} ('{}') is {}; only offline runners can be deleted",
                runner.id, runner.name, runner.status
            )));
        }

        self.trace.info(&format!("Deleting runner {runner_id}"));
        self.api
            .call(Method::DELETE, &self.paths.runner(runner_id), None)
            .await
            .map_err(|e| e.at_step(ReconcileStep::DeleteRunner, Some(runner_id)))?;
        Ok(())
    }

    /// All runners of the organization, or of one group.
    pub async fn list(&self, runner_group_id: Option<u64>) -> Result<Vec<RemoteRunner>> {
        let path = match runner_group_id {
            Some(group_id) => self.paths.runner_group_runners(group_id),
            None => self.paths.runners(),
        };
        get_all::<RunnerList>(self.api.as_ref(), &path).await
    }

    pub async fn find_by_name(&self, name: &str, runner_group_id: Option<u64>) -> Result<Option<RemoteRunner>> {
        Ok(self
            .list(runner_group_id)
            .await?
            .into_iter()
            .find(|r| r.name == name))
    }
}

fn read_only_rejection(rejected: Vec<String>) -> FleetError {
    FleetError::Validation {
        message: format!(
            "read-only labels cannot be removed: {}",
            StringUtil::join_display(&rejected)
        ),
        rejected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeApi;
    use fleet_common::TraceManager;
    use serde_json::{json, Value};

    const RUNNER: &str = "/orgs/acme/actions/runners/42";
    const LABELS: &str = "/orgs/acme/actions/runners/42/labels";
    const JIT: &str = "/orgs/acme/actions/runners/generate-jitconfig";

    fn runner_json(status: &str, group: u64, labels: &[(&str, &str)]) -> Value {
        json!({
            "id": 42,
            "name": "build-1",
            "os": "linux",
            "status": status,
            "busy": false,
            "ephemeral": true,
            "runner_group_id": group,
            "labels": labels
                .iter()
                .map(|(name, kind)| json!({ "name": name, "type": kind }))
                .collect::<Vec<_>>(),
        })
    }

    fn reconciler(api: Arc<FakeApi>) -> (RunnerReconciler, TraceManager) {
        let manager = TraceManager::default();
        let reconciler = RunnerReconciler::new(api, OrgPaths::new("acme"), manager.get("Runner"));
        (reconciler, manager)
    }

    fn spec(group: Option<u64>, custom: &[&str], read_only: &[&str]) -> RunnerSpec {
        RunnerSpec {
            name: "build-1".into(),
            runner_group_id: group,
            labels: custom.iter().map(|s| s.to_string()).collect(),
            read_only_labels: read_only.iter().map(|s| s.to_string()).collect(),
            work_folder: None,
        }
    }

    #[tokio::test]
    async fn create_issues_jit_then_sets_custom_labels() {
        let api = FakeApi::new();
        api.reply(
            Method::POST,
            JIT,
            201,
            json!({
                "runner": runner_json("offline", 7, &[("self-hosted", "read-only"), ("linux", "read-only")]),
                "encoded_jit_config": "ZW5jb2RlZA==",
            }),
        );
        api.reply(
            Method::PUT,
            LABELS,
            200,
            json!({
                "total_count": 3,
                "labels": [
                    { "name": "self-hosted", "type": "read-only" },
                    { "name": "linux", "type": "read-only" },
                    { "name": "gpu", "type": "custom" },
                ],
            }),
        );
        let (reconciler, manager) = reconciler(api.clone());

        let state = reconciler
            .create(&spec(Some(7), &["gpu"], &["self-hosted", "linux"]))
            .await
            .unwrap();

        assert_eq!(api.summary(), vec![format!("POST {JIT}"), format!("PUT {LABELS}")]);
        assert_eq!(
            api.body_of(Method::POST, JIT).unwrap(),
            json!({
                "name": "build-1",
                "runner_group_id": 7,
                "labels": ["self-hosted", "linux"],
                "work_folder": "_work",
            })
        );
        assert_eq!(api.body_of(Method::PUT, LABELS).unwrap(), json!({ "labels": ["gpu"] }));

        assert_eq!(state.id, 42);
        assert_eq!(state.labels, vec!["gpu"]);
        assert_eq!(state.read_only_labels, vec!["self-hosted", "linux"]);
        assert_eq!(state.encoded_jit_config.as_deref(), Some("ZW5jb2RlZA=="));
        assert_eq!(manager.secret_masker().mask_secrets("cfg ZW5jb2RlZA=="), "cfg ***");
        assert!(!format!("{state:?}").contains("ZW5jb2RlZA=="));
    }

    #[tokio::test]
    async fn create_without_group_uses_default_group() {
        let api = FakeApi::new();
        api.reply(
            Method::POST,
            JIT,
            201,
            json!({ "runner": runner_json("offline", 1, &[]), "encoded_jit_config": "x" }),
        );
        api.reply(Method::PUT, LABELS, 200, json!({ "total_count": 0, "labels": [] }));
        let (reconciler, _) = reconciler(api.clone());

        reconciler
            .create(&spec(None, &["gpu"], &["self-hosted"]))
            .await
            .unwrap();

        assert_eq!(api.body_of(Method::POST, JIT).unwrap()["runner_group_id"], json!(1));
    }

    #[tokio::test]
    async fn create_requires_both_label_lists() {
        let api = FakeApi::new();
        let (reconciler, _) = reconciler(api.clone());

        let no_custom = reconciler.create(&spec(Some(7), &[], &["self-hosted"])).await;
        let no_read_only = reconciler.create(&spec(Some(7), &["gpu"], &[])).await;

        assert!(matches!(no_custom, Err(FleetError::Validation { .. })));
        assert!(matches!(no_read_only, Err(FleetError::Validation { .. })));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn label_failure_after_jit_reports_runner_id() {
        let api = FakeApi::new();
        api.reply(
            Method::POST,
            JIT,
            201,
            json!({ "runner": runner_json("offline", 7, &[]), "encoded_jit_config": "x" }),
        );
        api.reply(Method::PUT, LABELS, 422, json!({ "message": "bad label" }));
        let (reconciler, _) = reconciler(api.clone());

        let err = reconciler
            .create(&spec(Some(7), &["gpu"], &["self-hosted"]))
            .await
            .unwrap_err();

        match &err {
            FleetError::StepFailed {
                step, resource_id, ..
            } => {
                assert_eq!(*step, ReconcileStep::SetRunnerLabels);
                assert_eq!(*resource_id, Some(42));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.status(), Some(422));
        assert_eq!(api.calls().iter().filter(|c| c.path == JIT).count(), 1);
    }

    #[tokio::test]
    async fn jit_failure_is_not_retry_safe() {
        let api = FakeApi::new();
        api.reply(Method::POST, JIT, 500, json!({ "message": "boom" }));
        let (reconciler, _) = reconciler(api.clone());

        let err = reconciler
            .create(&spec(Some(7), &["gpu"], &["self-hosted"]))
            .await
            .unwrap_err();

        assert_eq!(err.step(), Some(ReconcileStep::IssueJitConfig));
        assert!(!err.is_retry_safe());
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn dropping_declared_read_only_label_is_rejected_without_calls() {
        let api = FakeApi::new();
        let (reconciler, _) = reconciler(api.clone());

        let previous = spec(Some(7), &["gpu"], &["self-hosted", "linux"]);
        let desired = spec(Some(7), &["gpu"], &["linux"]);
        let err = reconciler.update(42, &previous, &desired).await.unwrap_err();

        match err {
            FleetError::Validation { rejected, .. } => assert_eq!(rejected, vec!["self-hosted"]),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn dropping_remote_read_only_label_is_rejected_before_mutation() {
        let api = FakeApi::new();
        api.reply(
            Method::GET,
            RUNNER,
            200,
            runner_json("online", 7, &[("self-hosted", "read-only"), ("x64", "read-only")]),
        );
        let (reconciler, _) = reconciler(api.clone());

        // The declaration forgot about "x64", the remote did not.
        let previous = spec(Some(7), &["gpu"], &["self-hosted"]);
        let desired = spec(Some(9), &["gpu"], &["self-hosted"]);
        let err = reconciler.update(42, &previous, &desired).await.unwrap_err();

        match err {
            FleetError::Validation { rejected, .. } => assert_eq!(rejected, vec!["x64"]),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(api.mutating_calls().is_empty());
    }

    #[tokio::test]
    async fn group_reassignment_removes_before_adding() {
        let api = FakeApi::new();
        api.reply(Method::GET, RUNNER, 200, runner_json("online", 7, &[("self-hosted", "read-only"), ("gpu", "custom")]));
        api.reply(Method::DELETE, "/orgs/acme/actions/runner-groups/7/runners/42", 204, Value::Null);
        api.reply(Method::PUT, "/orgs/acme/actions/runner-groups/9/runners/42", 204, Value::Null);
        let (reconciler, _) = reconciler(api.clone());

        let previous = spec(Some(7), &["gpu"], &["self-hosted"]);
        let desired = spec(Some(9), &["gpu"], &["self-hosted"]);
        reconciler.update(42, &previous, &desired).await.unwrap();

        assert_eq!(
            api.summary(),
            vec![
                format!("GET {RUNNER}"),
                "DELETE /orgs/acme/actions/runner-groups/7/runners/42".to_string(),
                "PUT /orgs/acme/actions/runner-groups/9/runners/42".to_string(),
                format!("GET {RUNNER}"),
            ]
        );
    }

    #[tokio::test]
    async fn failed_group_removal_skips_the_add() {
        let api = FakeApi::new();
        api.reply(Method::GET, RUNNER, 200, runner_json("online", 7, &[("self-hosted", "read-only"), ("gpu", "custom")]));
        api.reply(Method::DELETE, "/orgs/acme/actions/runner-groups/7/runners/42", 403, json!({ "message": "forbidden" }));
        let (reconciler, _) = reconciler(api.clone());

        let previous = spec(Some(7), &["gpu"], &["self-hosted"]);
        let desired = spec(Some(9), &["gpu"], &["self-hosted"]);
        let err = reconciler.update(42, &previous, &desired).await.unwrap_err();

        assert_eq!(err.step(), Some(ReconcileStep::RemoveFromGroup));
        assert!(api.calls().iter().all(|c| c.method != Method::PUT));
    }

    #[tokio::test]
    async fn missing_old_group_only_adds() {
        let api = FakeApi::new();
        api.reply(Method::GET, RUNNER, 200, runner_json("online", 1, &[("self-hosted", "read-only"), ("gpu", "custom")]));
        api.reply(Method::PUT, "/orgs/acme/actions/runner-groups/9/runners/42", 204, Value::Null);
        let (reconciler, _) = reconciler(api.clone());

        let previous = spec(None, &["gpu"], &["self-hosted"]);
        let desired = spec(Some(9), &["gpu"], &["self-hosted"]);
        reconciler.update(42, &previous, &desired).await.unwrap();

        let mutating: Vec<_> = api.mutating_calls().into_iter().map(|c| c.method).collect();
        assert_eq!(mutating, vec![Method::PUT]);
    }

    #[tokio::test]
    async fn label_update_sends_full_custom_set() {
        let api = FakeApi::new();
        api.reply(Method::GET, RUNNER, 200, runner_json("online", 7, &[("self-hosted", "read-only"), ("gpu", "custom")]));
        api.reply(Method::PUT, LABELS, 200, json!({ "total_count": 0, "labels": [] }));
        let (reconciler, _) = reconciler(api.clone());

        let previous = spec(Some(7), &["gpu"], &["self-hosted"]);
        let desired = spec(Some(7), &["gpu", "cuda"], &["self-hosted"]);
        reconciler.update(42, &previous, &desired).await.unwrap();

        assert_eq!(
            api.body_of(Method::PUT, LABELS).unwrap(),
            json!({ "labels": ["gpu", "cuda"] })
        );
        assert_eq!(api.mutating_calls().len(), 1);
    }

    #[tokio::test]
    async fn unchanged_update_makes_no_mutating_call() {
        let api = FakeApi::new();
        api.reply(Method::GET, RUNNER, 200, runner_json("online", 7, &[("self-hosted", "read-only"), ("gpu", "custom")]));
        let (reconciler, _) = reconciler(api.clone());

        let declared = spec(Some(7), &["gpu"], &["self-hosted"]);
        let state = reconciler.update(42, &declared, &declared).await.unwrap();

        assert!(api.mutating_calls().is_empty());
        assert_eq!(state.labels, vec!["gpu"]);
    }

    #[tokio::test]
    async fn added_read_only_label_is_stored_as_custom() {
        let api = FakeApi::new();
        api.reply(Method::GET, RUNNER, 200, runner_json("online", 7, &[("self-hosted", "read-only"), ("gpu", "custom")]));
        api.reply(
            Method::GET,
            RUNNER,
            200,
            runner_json(
                "online",
                7,
                &[("self-hosted", "read-only"), ("arm64", "custom"), ("gpu", "custom")],
            ),
        );
        api.reply(Method::PUT, LABELS, 200, json!({ "total_count": 0, "labels": [] }));
        let (reconciler, _) = reconciler(api.clone());

        let previous = spec(Some(7), &["gpu"], &["self-hosted"]);
        let desired = spec(Some(7), &["gpu"], &["self-hosted", "arm64"]);
        let state = reconciler.update(42, &previous, &desired).await.unwrap();

        assert_eq!(
            api.body_of(Method::PUT, LABELS).unwrap(),
            json!({ "labels": ["arm64", "gpu"] })
        );
        assert_eq!(state.read_only_labels, vec!["self-hosted"]);
        assert_eq!(state.labels, vec!["arm64", "gpu"]);
    }

    #[tokio::test]
    async fn update_to_no_custom_labels_clears_them() {
        let api = FakeApi::new();
        api.reply(Method::GET, RUNNER, 200, runner_json("online", 7, &[("self-hosted", "read-only"), ("gpu", "custom")]));
        api.reply(Method::GET, RUNNER, 200, runner_json("online", 7, &[("self-hosted", "read-only")]));
        api.reply(Method::PUT, LABELS, 200, json!({ "total_count": 1, "labels": [] }));
        let (reconciler, _) = reconciler(api.clone());

        let previous = spec(Some(7), &["gpu"], &["self-hosted"]);
        let desired = spec(Some(7), &[], &["self-hosted"]);
        let state = reconciler.update(42, &previous, &desired).await.unwrap();

        assert_eq!(api.body_of(Method::PUT, LABELS).unwrap(), json!({ "labels": [] }));
        assert_eq!(api.mutating_calls().len(), 1);
        assert!(state.labels.is_empty());
    }

    #[tokio::test]
    async fn update_rejects_blank_custom_label() {
        let api = FakeApi::new();
        let (reconciler, _) = reconciler(api.clone());

        let previous = spec(Some(7), &["gpu"], &["self-hosted"]);
        let desired = spec(Some(7), &["  "], &["self-hosted"]);
        let err = reconciler.update(42, &previous, &desired).await.unwrap_err();

        assert!(matches!(err, FleetError::Validation { .. }));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn delete_refuses_runner_that_is_not_offline() {
        let api = FakeApi::new();
        api.reply(Method::GET, RUNNER, 200, runner_json("online", 7, &[]));
        let (reconciler, _) = reconciler(api.clone());

        let err = reconciler.delete(42).await.unwrap_err();

        assert!(matches!(err, FleetError::Precondition(ref m) if m.contains("online")));
        assert!(api.mutating_calls().is_empty());
    }

    #[tokio::test]
    async fn delete_removes_offline_runner() {
        let api = FakeApi::new();
        api.reply(Method::GET, RUNNER, 200, runner_json("offline", 7, &[]));
        api.reply(Method::DELETE, RUNNER, 204, Value::Null);
        let (reconciler, _) = reconciler(api.clone());

        reconciler.delete(42).await.unwrap();

        assert_eq!(api.summary(), vec![format!("GET {RUNNER}"), format!("DELETE {RUNNER}")]);
    }

    #[tokio::test]
    async fn delete_of_missing_runner_succeeds() {
        let api = FakeApi::new();
        api.reply(Method::GET, RUNNER, 404, json!({ "message": "Not Found" }));
        let (reconciler, _) = reconciler(api.clone());

        reconciler.delete(42).await.unwrap();

        assert!(api.mutating_calls().is_empty());
    }

    #[tokio::test]
    async fn find_by_name_scoped_to_group() {
        let api = FakeApi::new();
        api.reply(
            Method::GET,
            "/orgs/acme/actions/runner-groups/7/runners?per_page=100&page=1",
            200,
            json!({ "total_count": 1, "runners": [runner_json("online", 7, &[])] }),
        );
        let (reconciler, _) = reconciler(api.clone());

        let found = reconciler.find_by_name("build-1", Some(7)).await.unwrap();
        let missing = reconciler.find_by_name("other", Some(7)).await.unwrap();

        assert_eq!(found.map(|r| r.id), Some(42));
        assert!(missing.is_none());
    }
}
