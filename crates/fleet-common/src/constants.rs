// Well-known constants shared by the fleet crates: API headers, environment
// variable names, defaults, and the remote system's fixed string values.

use std::time::Duration;

/// Headers and media types sent on every API request.
pub mod api {
    /// `Accept` value for the structured JSON format in use.
    pub const ACCEPT: &str = "application/vnd.github+json";

    /// Header carrying the pinned API version.
    pub const VERSION_HEADER: &str = "X-GitHub-Api-Version";

    /// The pinned API version.
    pub const VERSION: &str = "2022-11-28";

    /// Public API endpoint used when no base URL is configured.
    pub const DEFAULT_BASE_URL: &str = "https://api.github.com";
}

/// Environment variables read by `ProviderSettings::from_env`.
pub mod env {
    pub const TOKEN: &str = "GITHUB_TOKEN";
    pub const BASE_URL: &str = "GITHUB_BASE_URL";
    pub const ORGANIZATION: &str = "GITHUB_ORGANIZATION";
    pub const INSECURE: &str = "GITHUB_INSECURE";
    pub const APP_ID: &str = "GITHUB_APP_ID";
    pub const APP_INSTALLATION_ID: &str = "GITHUB_APP_INSTALLATION_ID";
    pub const APP_PEM_FILE: &str = "GITHUB_APP_PEM_FILE";
}

/// Per-call deadline applied by the HTTP client.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Lifetime of a signed app assertion.
pub const ASSERTION_LIFETIME: Duration = Duration::from_secs(10 * 60);

/// A minted credential closer than this to its expiry is replaced before use.
pub const CREDENTIAL_REFRESH_SKEW: Duration = Duration::from_secs(60);

/// Work folder sent with a JIT configuration request when none is declared.
pub const DEFAULT_WORK_FOLDER: &str = "_work";

/// Maximum length of a runner name or label.
pub const MAX_NAME_LENGTH: usize = 64;

/// Label `type` values reported by the remote system.
pub mod label_kind {
    pub const READ_ONLY: &str = "read-only";
    pub const CUSTOM: &str = "custom";
}

/// Runner `status` values reported by the remote system.
pub mod runner_status {
    pub const OFFLINE: &str = "offline";
}

/// Runner group `visibility` values.
pub mod visibility {
    pub const ALL: &str = "all";
    pub const SELECTED: &str = "selected";
    pub const PRIVATE: &str = "private";
}

/// Runner group a JIT runner joins when none is declared (the org default).
pub const DEFAULT_RUNNER_GROUP_ID: u64 = 1;

/// Items requested per page from list endpoints.
pub const PAGE_SIZE: u32 = 100;
