use std::path::Path;

use crate::error::SignatureError;
use crate::platform::{CodeSigningPlatform, InfoFlags, ValidityFlags};
use crate::report::model::{Info, Report, Status};
use crate::signature::{classify, extract, resolve};

/// Knobs passed through to the platform calls.
#[derive(Debug, Clone)]
pub struct InspectConfig {
    /// Flags for the validity check.
    pub validity_flags: ValidityFlags,

    /// Extra information categories. Signing and requirement information
    /// are always requested.
    pub info_flags: InfoFlags,
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            validity_flags: ValidityFlags::empty(),
            info_flags: InfoFlags::SIGNING | InfoFlags::REQUIREMENT,
        }
    }
}

/// Inspect the code signature of the artifact at `path`.
///
/// 1. Resolves a static code handle. Failure here is returned as an error
///    and no report is produced.
/// 2. Classifies the trust status. Never fails.
/// 3. Extracts signing information. On failure the report's status becomes
///    `Invalid` with the extraction error and `info` is left empty,
///    whatever step 2 decided.
///
/// The code handle is released before returning.
#[tracing::instrument(skip(platform, config), fields(path = %path.display()))]
pub fn inspect_with<P: CodeSigningPlatform>(
    platform: &P,
    path: &Path,
    config: &InspectConfig,
) -> Result<Report, SignatureError> {
    let code = resolve::resolve_code(platform, path)?;

    let status = classify::classify(platform, &code, path, config.validity_flags);

    let report = match extract::extract_info(platform, &code, path, config.info_flags) {
        Ok(info) => Report::new(status, info),
        Err(err) => {
            tracing::warn!(error = %err, "signing information unavailable");
            Report::new(Status::Invalid(err), Info::default())
        }
    };

    tracing::debug!(status = report.status().as_str(), "inspection complete");
    Ok(report)
}
