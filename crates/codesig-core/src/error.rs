use std::path::PathBuf;

use thiserror::Error;

use crate::platform::{Diagnostic, OsStatus};

/// Errors raised while inspecting a code signature.
///
/// `Clone + PartialEq` so an error can sit inside an immutable
/// [`Report`](crate::report::model::Report) status and be compared in tests.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignatureError {
    /// A platform call returned a non-success status.
    #[error("{}: {code}", .path.display())]
    PlatformStatus {
        code: OsStatus,
        path: PathBuf,
        underlying: Option<Diagnostic>,
    },

    /// A platform call reported success but returned nothing usable.
    #[error("{}: platform returned no readable signing data", .path.display())]
    UnreadableArtifact { path: PathBuf },
}

impl SignatureError {
    pub fn platform(code: OsStatus, path: impl Into<PathBuf>) -> Self {
        SignatureError::PlatformStatus {
            code,
            path: path.into(),
            underlying: None,
        }
    }

    pub fn unreadable(path: impl Into<PathBuf>) -> Self {
        SignatureError::UnreadableArtifact { path: path.into() }
    }

    /// Status code carried by the error, if any.
    pub fn code(&self) -> Option<OsStatus> {
        match self {
            SignatureError::PlatformStatus { code, .. } => Some(*code),
            SignatureError::UnreadableArtifact { .. } => None,
        }
    }

    pub fn path(&self) -> &std::path::Path {
        match self {
            SignatureError::PlatformStatus { path, .. } => path,
            SignatureError::UnreadableArtifact { path } => path,
        }
    }

    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            SignatureError::PlatformStatus { underlying, .. } => underlying.as_ref(),
            SignatureError::UnreadableArtifact { .. } => None,
        }
    }
}
