//! In-memory platform backed by recorded signing information.
//!
//! A [`RecordedPlatform`] answers every platform call from data captured
//! ahead of time, keyed by artifact path. It runs on any OS, which makes it
//! suitable for replaying signature data captured on another machine and
//! for exercising the inspection pipeline without real signed binaries.

use std::cell::Cell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{
    CodeSigningPlatform, InfoFlags, ObjectKind, OsStatus, PropertyBundle, ValidityFailure,
    ValidityFlags,
};

/// Opaque objects a recording can carry inside its property bundles.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedObject {
    /// Trust reference with its per-certificate property maps, or `None`
    /// when the trust engine exposed nothing readable.
    Trust(Option<Vec<PropertyBundle<RecordedObject>>>),
    /// Requirement object and the outcome of rendering it as text.
    Requirement(Result<String, OsStatus>),
    /// Any other platform object, described by its type name.
    Other(String),
}

/// Everything the platform would report about one artifact.
#[derive(Debug, Clone)]
pub struct RecordedArtifact {
    yields_handle: bool,
    validity: Result<(), ValidityFailure>,
    information: Result<Option<PropertyBundle<RecordedObject>>, OsStatus>,
}

impl RecordedArtifact {
    /// A validly signed artifact exposing `information`.
    pub fn signed(information: PropertyBundle<RecordedObject>) -> Self {
        Self {
            yields_handle: true,
            validity: Ok(()),
            information: Ok(Some(information)),
        }
    }

    /// An artifact without a signature.
    pub fn unsigned() -> Self {
        Self {
            yields_handle: true,
            validity: Err(ValidityFailure::new(OsStatus::CS_UNSIGNED)),
            information: Ok(Some(PropertyBundle::new())),
        }
    }

    /// Replace the validity verdict with a failure.
    pub fn failing_validity(mut self, failure: ValidityFailure) -> Self {
        self.validity = Err(failure);
        self
    }

    /// Make the signing information call fail with `status`.
    pub fn failing_information(mut self, status: OsStatus) -> Self {
        self.information = Err(status);
        self
    }

    /// Make the signing information call succeed without a payload.
    pub fn untyped_information(mut self) -> Self {
        self.information = Ok(None);
        self
    }

    /// Make handle creation succeed without producing a handle.
    pub fn without_handle(mut self) -> Self {
        self.yields_handle = false;
        self
    }
}

/// [`CodeSigningPlatform`] answering from recorded artifacts.
///
/// The flags of the most recent validity check and information request are
/// kept so callers can see what the pipeline asked for.
#[derive(Debug, Clone, Default)]
pub struct RecordedPlatform {
    artifacts: HashMap<PathBuf, Arc<RecordedArtifact>>,
    messages: HashMap<OsStatus, String>,
    last_validity_flags: Cell<Option<ValidityFlags>>,
    last_info_flags: Cell<Option<InfoFlags>>,
}

impl RecordedPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_artifact(mut self, path: impl Into<PathBuf>, artifact: RecordedArtifact) -> Self {
        self.insert(path, artifact);
        self
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, artifact: RecordedArtifact) {
        self.artifacts.insert(path.into(), Arc::new(artifact));
    }

    /// Register the message returned by [`CodeSigningPlatform::error_message`].
    pub fn with_message(mut self, status: OsStatus, message: impl Into<String>) -> Self {
        self.messages.insert(status, message.into());
        self
    }

    /// Flags passed to the last [`CodeSigningPlatform::check_validity`] call.
    pub fn last_validity_flags(&self) -> Option<ValidityFlags> {
        self.last_validity_flags.get()
    }

    /// Flags passed to the last
    /// [`CodeSigningPlatform::copy_signing_information`] call.
    pub fn last_info_flags(&self) -> Option<InfoFlags> {
        self.last_info_flags.get()
    }
}

impl CodeSigningPlatform for RecordedPlatform {
    type Code = Arc<RecordedArtifact>;
    type Object = RecordedObject;

    fn create_code(&self, path: &Path) -> Result<Option<Self::Code>, OsStatus> {
        let artifact = self
            .artifacts
            .get(path)
            .ok_or(OsStatus::CS_STATIC_CODE_NOT_FOUND)?;

        Ok(artifact.yields_handle.then(|| Arc::clone(artifact)))
    }

    fn check_validity(
        &self,
        code: &Self::Code,
        flags: ValidityFlags,
    ) -> Result<(), ValidityFailure> {
        self.last_validity_flags.set(Some(flags));
        code.validity.clone()
    }

    fn copy_signing_information(
        &self,
        code: &Self::Code,
        flags: InfoFlags,
    ) -> Result<Option<PropertyBundle<Self::Object>>, OsStatus> {
        self.last_info_flags.set(Some(flags));
        code.information.clone()
    }

    fn object_kind(&self, object: &Self::Object) -> ObjectKind {
        match object {
            RecordedObject::Trust(_) => ObjectKind::Trust,
            RecordedObject::Requirement(_) => ObjectKind::Requirement,
            RecordedObject::Other(_) => ObjectKind::Other,
        }
    }

    fn copy_trust_properties(
        &self,
        trust: &Self::Object,
    ) -> Option<Vec<PropertyBundle<Self::Object>>> {
        match trust {
            RecordedObject::Trust(properties) => properties.clone(),
            _ => None,
        }
    }

    fn copy_requirement_string(&self, requirement: &Self::Object) -> Result<String, OsStatus> {
        match requirement {
            RecordedObject::Requirement(text) => text.clone(),
            _ => Err(OsStatus::CS_REQ_INVALID),
        }
    }

    fn error_message(&self, status: OsStatus) -> String {
        self.messages
            .get(&status)
            .cloned()
            .unwrap_or_else(|| status.to_string())
    }
}
