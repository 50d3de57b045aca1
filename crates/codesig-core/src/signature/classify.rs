//! Trust status classification.
//!
//! Maps the trust engine's validity verdict onto [`Status`]:
//!
//!   - success            -> `Valid`
//!   - errSecCSUnsigned   -> `NotSigned`
//!   - anything else      -> `Invalid`, carrying code, path and diagnostic
//!
//! Classification never fails; an unsigned artifact is an expected outcome,
//! not an error.

use std::path::Path;

use crate::error::SignatureError;
use crate::platform::{CodeSigningPlatform, OsStatus, ValidityFlags};
use crate::report::model::Status;

pub fn classify<P: CodeSigningPlatform>(
    platform: &P,
    code: &P::Code,
    path: &Path,
    flags: ValidityFlags,
) -> Status {
    let status = match platform.check_validity(code, flags) {
        Ok(()) => Status::Valid,
        Err(failure) if failure.status == OsStatus::CS_UNSIGNED => Status::NotSigned,
        Err(failure) => Status::Invalid(SignatureError::PlatformStatus {
            code: failure.status,
            path: path.to_path_buf(),
            underlying: failure.diagnostic,
        }),
    };

    tracing::debug!(status = status.as_str(), "validity check complete");
    status
}
