use std::path::Path;

use crate::error::SignatureError;
use crate::platform::CodeSigningPlatform;

/// Obtain a static code handle for the artifact at `path`.
///
/// The handle is owned by the caller and released when dropped.
pub fn resolve_code<P: CodeSigningPlatform>(
    platform: &P,
    path: &Path,
) -> Result<P::Code, SignatureError> {
    platform
        .create_code(path)
        .map_err(|code| SignatureError::platform(code, path))?
        .ok_or_else(|| SignatureError::unreadable(path))
}
