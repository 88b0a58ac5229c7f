// fleet-common: Shared services and infrastructure for the runner fleet crates.
// Depends on `fleet-sdk`.

pub mod constants;
pub mod credential;
pub mod error;
pub mod http_client_factory;
pub mod secret_masker;
pub mod settings;
pub mod tracing;

// ---------------------------------------------------------------------------
// Re-exports for convenient access
// ---------------------------------------------------------------------------

pub use credential::{Credential, CredentialOrigin, SigningIdentity};
pub use error::{FleetError, ReconcileStep, Result};
pub use http_client_factory::{ClientSettings, HttpClientFactory};
pub use secret_masker::SecretMasker;
pub use settings::{AppAuthSettings, AuthMode, ProviderSettings};
pub use crate::tracing::{TraceEventType, TraceManager, TraceSetting, Tracing};
