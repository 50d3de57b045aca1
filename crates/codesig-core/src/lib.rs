//! Code signature inspection.
//!
//! Asks the platform's trust subsystem to validate an on-disk executable or
//! bundle and normalizes what it reports into a [`Report`]: a trust
//! [`Status`] plus the signing [`Info`] (identifier, certificate chain,
//! requirements, entitlements).

pub mod error;
pub mod platform;
pub mod report;
pub mod signature;

pub use error::SignatureError;
pub use report::{Authority, Info, Report, Status};
pub use signature::{InspectConfig, inspect_with, trim_requirements};

/// Entitlement that marks an app as sandboxed.
pub const SANDBOX_ENTITLEMENT: &str = "com.apple.security.app-sandbox";

/// Name and fallback error of a certificate whose details could not be read.
pub const UNREADABLE_AUTHORITY: &str = "The certificate details could not be read.";

/// Inspect the code signature at `path` using Security.framework.
#[cfg(target_os = "macos")]
pub fn inspect(path: impl AsRef<std::path::Path>) -> Result<Report, SignatureError> {
    inspect_with_config(path, &InspectConfig::default())
}

#[cfg(target_os = "macos")]
pub fn inspect_with_config(
    path: impl AsRef<std::path::Path>,
    config: &InspectConfig,
) -> Result<Report, SignatureError> {
    inspect_with(&platform::macos::SecurityFramework, path.as_ref(), config)
}
