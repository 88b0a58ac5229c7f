//! Build constants for the fleet package, read from compile-time
//! environment variables with defaults.

/// Package metadata used to build the identifying user agent.
#[derive(Debug, Clone)]
pub struct FleetPackage;

impl FleetPackage {
    /// The semantic version, taken from `CARGO_PKG_VERSION`.
    pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    /// The product name sent in the `User-Agent` header.
    /// Set via the `FLEET_PRODUCT_NAME` env var at compile time.
    pub const PRODUCT_NAME: &'static str = match option_env!("FLEET_PRODUCT_NAME") {
        Some(n) => n,
        None => "runner-fleet",
    };

    /// `<product>/<version>`, the value of the `User-Agent` header.
    pub fn user_agent() -> String {
        format!("{}/{}", Self::PRODUCT_NAME, Self::VERSION)
    }
}
