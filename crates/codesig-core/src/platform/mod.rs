//! Boundary to the platform's code-signing and trust subsystem.
//!
//! Everything the inspection pipeline needs from the operating system goes
//! through [`CodeSigningPlatform`]. Handles are owned values: dropping them
//! releases the underlying platform resource.

use std::path::Path;

use bitflags::bitflags;
use serde::Serialize;

pub mod bundle;
#[cfg(target_os = "macos")]
pub mod macos;
pub mod recorded;
pub mod status;

pub use bundle::{PropertyBundle, Value};
pub use status::OsStatus;

bitflags! {
    /// Flags passed to the validity check.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ValidityFlags: u32 {
        const CHECK_ALL_ARCHITECTURES = 1 << 0;
        const DO_NOT_VALIDATE_EXECUTABLE = 1 << 1;
        const DO_NOT_VALIDATE_RESOURCES = 1 << 2;
        const CHECK_NESTED_CODE = 1 << 3;
        const STRICT_VALIDATE = 1 << 4;
    }
}

bitflags! {
    /// Categories of information requested from the signing information call.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct InfoFlags: u32 {
        const INTERNAL = 1 << 0;
        const SIGNING = 1 << 1;
        const REQUIREMENT = 1 << 2;
        const DYNAMIC = 1 << 3;
        const CONTENT = 1 << 4;
    }
}

/// Underlying type of an opaque object found in a property bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Trust,
    Requirement,
    Other,
}

/// Rich error detail attached to a failed validity check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub domain: String,
    pub code: i64,
    pub description: String,
}

/// Failed validity check: the status code plus whatever detail the trust
/// engine supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidityFailure {
    pub status: OsStatus,
    pub diagnostic: Option<Diagnostic>,
}

impl ValidityFailure {
    pub fn new(status: OsStatus) -> Self {
        Self {
            status,
            diagnostic: None,
        }
    }

    pub fn with_diagnostic(mut self, diagnostic: Diagnostic) -> Self {
        self.diagnostic = Some(diagnostic);
        self
    }
}

/// Operations consumed from the platform trust subsystem.
///
/// `Ok(None)` from the constructor-like calls means the platform reported
/// success without handing back a usable payload.
pub trait CodeSigningPlatform {
    /// Static code handle.
    type Code;
    /// Opaque object carried inside property bundles (trust, requirement, ...).
    type Object;

    fn create_code(&self, path: &Path) -> Result<Option<Self::Code>, OsStatus>;

    fn check_validity(
        &self,
        code: &Self::Code,
        flags: ValidityFlags,
    ) -> Result<(), ValidityFailure>;

    fn copy_signing_information(
        &self,
        code: &Self::Code,
        flags: InfoFlags,
    ) -> Result<Option<PropertyBundle<Self::Object>>, OsStatus>;

    fn object_kind(&self, object: &Self::Object) -> ObjectKind;

    /// Per-certificate property maps of a trust object, in chain order.
    /// `None` when the object yields no readable properties.
    fn copy_trust_properties(
        &self,
        trust: &Self::Object,
    ) -> Option<Vec<PropertyBundle<Self::Object>>>;

    fn copy_requirement_string(&self, requirement: &Self::Object) -> Result<String, OsStatus>;

    /// Human-readable message for a status code.
    fn error_message(&self, status: OsStatus) -> String;
}
