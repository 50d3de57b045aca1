use std::path::Path;

use crate::error::SignatureError;
use crate::platform::bundle::keys;
use crate::platform::{CodeSigningPlatform, InfoFlags, PropertyBundle};
use crate::report::model::Info;
use crate::signature::authorities::extract_authorities;
use crate::signature::requirements::extract_requirements;

/// Retrieve the signing information bundle.
///
/// Signing and requirement information are always requested on top of
/// `flags`.
pub fn copy_information<P: CodeSigningPlatform>(
    platform: &P,
    code: &P::Code,
    path: &Path,
    flags: InfoFlags,
) -> Result<PropertyBundle<P::Object>, SignatureError> {
    let flags = flags | InfoFlags::SIGNING | InfoFlags::REQUIREMENT;

    platform
        .copy_signing_information(code, flags)
        .map_err(|status| SignatureError::platform(status, path))?
        .ok_or_else(|| SignatureError::unreadable(path))
}

/// Extract [`Info`] from a static code handle.
///
/// Only the bundle retrieval can fail. Individual fields that are missing
/// or of an unexpected type come back empty.
pub fn extract_info<P: CodeSigningPlatform>(
    platform: &P,
    code: &P::Code,
    path: &Path,
    flags: InfoFlags,
) -> Result<Info, SignatureError> {
    let bundle = copy_information(platform, code, path, flags)?;
    Ok(info_from_bundle(platform, &bundle))
}

/// Map a signing information bundle onto [`Info`]. Never fails.
pub fn info_from_bundle<P: CodeSigningPlatform>(
    platform: &P,
    bundle: &PropertyBundle<P::Object>,
) -> Info {
    let requirements = extract_requirements(platform, bundle);
    let entitlements = bundle
        .get_dictionary(keys::ENTITLEMENTS)
        .map(PropertyBundle::to_json_map)
        .unwrap_or_default();

    let info = Info {
        identifier: bundle.get_str(keys::IDENTIFIER).map(str::to_string),
        authorities: extract_authorities(platform, bundle),
        designated_requirement: requirements.designated,
        additional_requirements: requirements.additional,
        format: bundle.get_str(keys::FORMAT).map(str::to_string),
        signing_date: bundle.get_date(keys::SIGNING_TIME),
        entitlements,
    };

    tracing::debug!(
        identifier = info.identifier.as_deref().unwrap_or("-"),
        authorities = info.authorities.len(),
        entitlements = info.entitlements.len(),
        "signing information extracted"
    );

    info
}
