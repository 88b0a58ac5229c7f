// Typed error taxonomy for credential exchange and reconciliation.

use std::fmt;

/// The sub-step of a multi-call reconciliation sequence.
///
/// Sequences are best-effort and not transactional; when one fails, the
/// step tells the caller where to resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileStep {
    IssueJitConfig,
    SetRunnerLabels,
    ReadRunner,
    RemoveFromGroup,
    AddToGroup,
    DeleteRunner,
    CreateGroup,
    UpdateGroup,
    ReadGroup,
    ReplaceGroupRepositories,
    ReplaceGroupRunners,
    DeleteGroup,
}

impl fmt::Display for ReconcileStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReconcileStep::IssueJitConfig => "issue JIT configuration",
            ReconcileStep::SetRunnerLabels => "set runner labels",
            ReconcileStep::ReadRunner => "read runner",
            ReconcileStep::RemoveFromGroup => "remove runner from group",
            ReconcileStep::AddToGroup => "add runner to group",
            ReconcileStep::DeleteRunner => "delete runner",
            ReconcileStep::CreateGroup => "create runner group",
            ReconcileStep::UpdateGroup => "update runner group",
            ReconcileStep::ReadGroup => "read runner group",
            ReconcileStep::ReplaceGroupRepositories => "replace runner group repositories",
            ReconcileStep::ReplaceGroupRunners => "replace runner group runners",
            ReconcileStep::DeleteGroup => "delete runner group",
        };
        f.write_str(name)
    }
}

/// Every failure surfaced by the fleet crates.
#[derive(Debug, thiserror::Error)]
pub enum FleetError {
    /// Bad key material or settings. Never reaches the network.
    #[error("configuration error: {0}")]
    Config(String),

    /// A local invariant was violated. `rejected` lists offending values
    /// (for example read-only labels missing from a desired label set).
    #[error("validation error: {message}")]
    Validation {
        message: String,
        rejected: Vec<String>,
    },

    #[error("failed to sign app assertion: {0}")]
    Signing(String),

    #[error("installation token exchange failed with status {status}: {body}")]
    Exchange { status: u16, body: String },

    #[error("{method} {path} failed with status {status}: {body}")]
    Remote {
        method: String,
        path: String,
        status: u16,
        body: String,
    },

    /// A required remote state was not met (a runner that is not offline).
    #[error("precondition failed: {0}")]
    Precondition(String),

    #[error("transport error on {method} {path}: {source}")]
    Transport {
        method: String,
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to decode response of {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A step inside a multi-call sequence failed. Already-applied steps are
    /// left in place; `resource_id` is set once the remote identity exists.
    #[error("step '{step}' failed: {source}")]
    StepFailed {
        step: ReconcileStep,
        resource_id: Option<u64>,
        #[source]
        source: Box<FleetError>,
    },
}

impl FleetError {
    pub fn validation(message: impl Into<String>) -> Self {
        FleetError::Validation {
            message: message.into(),
            rejected: Vec::new(),
        }
    }

    /// Wrap this error as the failure of `step`.
    pub fn at_step(self, step: ReconcileStep, resource_id: Option<u64>) -> Self {
        FleetError::StepFailed {
            step,
            resource_id,
            source: Box::new(self),
        }
    }

    /// The remote HTTP status, looking through step wrappers.
    pub fn status(&self) -> Option<u16> {
        match self {
            FleetError::Exchange { status, .. } | FleetError::Remote { status, .. } => Some(*status),
            FleetError::StepFailed { source, .. } => source.status(),
            _ => None,
        }
    }

    /// The failing step, when the error came out of a multi-call sequence.
    pub fn step(&self) -> Option<ReconcileStep> {
        match self {
            FleetError::StepFailed { step, .. } => Some(*step),
            _ => None,
        }
    }

    /// The innermost error, with step wrappers removed.
    pub fn root(&self) -> &FleetError {
        match self {
            FleetError::StepFailed { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether the caller may blindly repeat the failed operation.
    ///
    /// Local failures never change on retry. Issuing a JIT configuration
    /// allocates a new remote identity per call, so it is never retry-safe.
    pub fn is_retry_safe(&self) -> bool {
        match self {
            FleetError::StepFailed {
                step: ReconcileStep::IssueJitConfig,
                ..
            } => false,
            FleetError::StepFailed { source, .. } => source.is_retry_safe(),
            FleetError::Config(_)
            | FleetError::Validation { .. }
            | FleetError::Signing(_)
            | FleetError::Precondition(_)
            | FleetError::Decode { .. } => false,
            FleetError::Exchange { .. } | FleetError::Remote { .. } | FleetError::Transport { .. } => {
                true
            }
        }
    }
}

pub type Result<T, E = FleetError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(status: u16) -> FleetError {
        FleetError::Remote {
            method: "PUT".into(),
            path: "/orgs/acme/actions/runners/1/labels".into(),
            status,
            body: "{\"message\":\"nope\"}".into(),
        }
    }

    #[test]
    fn remote_error_display_keeps_status_and_body() {
        let msg = remote(422).to_string();
        assert!(msg.contains("422"));
        assert!(msg.contains("nope"));
        assert!(msg.contains("/orgs/acme/actions/runners/1/labels"));
    }

    #[test]
    fn step_wrapper_exposes_inner_details() {
        let err = remote(500).at_step(ReconcileStep::SetRunnerLabels, Some(42));
        assert_eq!(err.step(), Some(ReconcileStep::SetRunnerLabels));
        assert_eq!(err.status(), Some(500));
        assert!(matches!(err.root(), FleetError::Remote { status: 500, .. }));
        assert!(err.to_string().contains("set runner labels"));
        assert!(err.is_retry_safe());
    }

    #[test]
    fn jit_step_is_never_retry_safe() {
        let err = remote(502).at_step(ReconcileStep::IssueJitConfig, None);
        assert!(!err.is_retry_safe());
    }

    #[test]
    fn local_errors_are_not_retry_safe() {
        assert!(!FleetError::validation("bad").is_retry_safe());
        assert!(!FleetError::Precondition("busy".into()).is_retry_safe());
        assert_eq!(FleetError::Config("x".into()).status(), None);
    }
}
