// fleet-reconciler: credential exchange and runner fleet reconciliation.
// Depends on `fleet-sdk` and `fleet-common`.
//
// Architecture:
//   FleetClient::connect → CredentialProvider → ApiGateway (RemoteApi)
//   RunnerReconciler / RunnerGroupReconciler / NetworkReconciler / OrgServices
//     → label_diff (pure) → RemoteApi calls

pub mod api_paths;
pub mod client;
pub mod credential_provider;
pub mod gateway;
pub mod label_diff;
pub mod models;
pub mod network;
pub mod org_services;
pub mod runner;
pub mod runner_group;
pub mod validators;

#[cfg(test)]
pub(crate) mod testing;

pub use client::FleetClient;
pub use credential_provider::{
    create_credential_provider, AppCredentialProvider, CredentialProvider, StaticCredentialProvider,
};
pub use gateway::{ApiGateway, ApiResponse, CredentialCache, RemoteApi};
pub use label_diff::LabelDiff;
pub use network::{NetworkConfigurationSpec, NetworkReconciler};
pub use org_services::OrgServices;
pub use runner::{RunnerReconciler, RunnerSpec, RunnerState};
pub use runner_group::{RunnerGroupReconciler, RunnerGroupSpec, RunnerGroupState};
