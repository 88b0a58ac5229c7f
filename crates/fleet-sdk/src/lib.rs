// fleet-sdk: Foundation layer for the runner fleet tooling.
// This crate has ZERO dependencies on other fleet crates and provides
// the trace abstraction and small utilities used throughout the workspace.

pub mod build_constants;
pub mod string_util;
pub mod trace;
pub mod url_util;

// Re-export commonly used items at crate root
pub use build_constants::FleetPackage;
pub use string_util::StringUtil;
pub use trace::TraceWriter;
pub use url_util::UrlUtil;
