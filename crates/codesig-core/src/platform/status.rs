use std::fmt;

use serde::Serialize;

/// Raw status code returned by a platform code-signing call.
///
/// Wraps the numeric value so callers can compare against well-known codes
/// without losing anything the platform reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OsStatus(pub i32);

impl OsStatus {
    pub const SUCCESS: OsStatus = OsStatus(0);
    pub const IO: OsStatus = OsStatus(-36);
    pub const PARAM: OsStatus = OsStatus(-50);
    pub const ALLOCATE: OsStatus = OsStatus(-108);

    pub const CS_UNIMPLEMENTED: OsStatus = OsStatus(-67072);
    pub const CS_INVALID_OBJECT_REF: OsStatus = OsStatus(-67071);
    pub const CS_INVALID_FLAGS: OsStatus = OsStatus(-67070);
    pub const CS_OBJECT_REQUIRED: OsStatus = OsStatus(-67069);
    pub const CS_STATIC_CODE_NOT_FOUND: OsStatus = OsStatus(-67068);
    pub const CS_NO_SUCH_CODE: OsStatus = OsStatus(-67065);
    pub const CS_UNSIGNED: OsStatus = OsStatus(-67062);
    pub const CS_SIGNATURE_FAILED: OsStatus = OsStatus(-67061);
    pub const CS_SIGNATURE_NOT_VERIFIABLE: OsStatus = OsStatus(-67060);
    pub const CS_SIGNATURE_UNSUPPORTED: OsStatus = OsStatus(-67059);
    pub const CS_BAD_DICTIONARY_FORMAT: OsStatus = OsStatus(-67058);
    pub const CS_RESOURCES_NOT_SEALED: OsStatus = OsStatus(-67057);
    pub const CS_RESOURCES_NOT_FOUND: OsStatus = OsStatus(-67056);
    pub const CS_RESOURCES_INVALID: OsStatus = OsStatus(-67055);
    pub const CS_BAD_RESOURCE: OsStatus = OsStatus(-67054);
    pub const CS_RESOURCE_RULES_INVALID: OsStatus = OsStatus(-67053);
    pub const CS_REQ_INVALID: OsStatus = OsStatus(-67052);
    pub const CS_REQ_UNSUPPORTED: OsStatus = OsStatus(-67051);
    pub const CS_REQ_FAILED: OsStatus = OsStatus(-67050);
    pub const CS_BAD_OBJECT_FORMAT: OsStatus = OsStatus(-67049);
    pub const CS_INTERNAL_ERROR: OsStatus = OsStatus(-67048);
    pub const CS_SIGNATURE_INVALID: OsStatus = OsStatus(-67045);
    pub const CS_STATIC_CODE_CHANGED: OsStatus = OsStatus(-67034);
    pub const CS_INFO_PLIST_FAILED: OsStatus = OsStatus(-67030);
    pub const CS_NO_MAIN_EXECUTABLE: OsStatus = OsStatus(-67029);
    pub const CS_BAD_BUNDLE_FORMAT: OsStatus = OsStatus(-67028);
    pub const CS_UNSIGNED_NESTED_CODE: OsStatus = OsStatus(-67022);
    pub const CS_BAD_NESTED_CODE: OsStatus = OsStatus(-67021);

    /// Symbolic names of the status codes above, keyed by value.
    const NAMES: &'static [(OsStatus, &'static str)] = &[
        (Self::SUCCESS, "errSecSuccess"),
        (Self::IO, "errSecIO"),
        (Self::PARAM, "errSecParam"),
        (Self::ALLOCATE, "errSecAllocate"),
        (Self::CS_UNIMPLEMENTED, "errSecCSUnimplemented"),
        (Self::CS_INVALID_OBJECT_REF, "errSecCSInvalidObjectRef"),
        (Self::CS_INVALID_FLAGS, "errSecCSInvalidFlags"),
        (Self::CS_OBJECT_REQUIRED, "errSecCSObjectRequired"),
        (Self::CS_STATIC_CODE_NOT_FOUND, "errSecCSStaticCodeNotFound"),
        (Self::CS_NO_SUCH_CODE, "errSecCSNoSuchCode"),
        (Self::CS_UNSIGNED, "errSecCSUnsigned"),
        (Self::CS_SIGNATURE_FAILED, "errSecCSSignatureFailed"),
        (Self::CS_SIGNATURE_NOT_VERIFIABLE, "errSecCSSignatureNotVerifiable"),
        (Self::CS_SIGNATURE_UNSUPPORTED, "errSecCSSignatureUnsupported"),
        (Self::CS_BAD_DICTIONARY_FORMAT, "errSecCSBadDictionaryFormat"),
        (Self::CS_RESOURCES_NOT_SEALED, "errSecCSResourcesNotSealed"),
        (Self::CS_RESOURCES_NOT_FOUND, "errSecCSResourcesNotFound"),
        (Self::CS_RESOURCES_INVALID, "errSecCSResourcesInvalid"),
        (Self::CS_BAD_RESOURCE, "errSecCSBadResource"),
        (Self::CS_RESOURCE_RULES_INVALID, "errSecCSResourceRulesInvalid"),
        (Self::CS_REQ_INVALID, "errSecCSReqInvalid"),
        (Self::CS_REQ_UNSUPPORTED, "errSecCSReqUnsupported"),
        (Self::CS_REQ_FAILED, "errSecCSReqFailed"),
        (Self::CS_BAD_OBJECT_FORMAT, "errSecCSBadObjectFormat"),
        (Self::CS_INTERNAL_ERROR, "errSecCSInternalError"),
        (Self::CS_SIGNATURE_INVALID, "errSecCSSignatureInvalid"),
        (Self::CS_STATIC_CODE_CHANGED, "errSecCSStaticCodeChanged"),
        (Self::CS_INFO_PLIST_FAILED, "errSecCSInfoPlistFailed"),
        (Self::CS_NO_MAIN_EXECUTABLE, "errSecCSNoMainExecutable"),
        (Self::CS_BAD_BUNDLE_FORMAT, "errSecCSBadBundleFormat"),
        (Self::CS_UNSIGNED_NESTED_CODE, "errSecCSUnsignedNestedCode"),
        (Self::CS_BAD_NESTED_CODE, "errSecCSBadNestedCode"),
    ];

    pub fn code(self) -> i32 {
        self.0
    }

    pub fn is_success(self) -> bool {
        self == Self::SUCCESS
    }

    /// Symbolic `errSec*` name for well-known codes.
    pub fn name(self) -> Option<&'static str> {
        Self::NAMES
            .iter()
            .find(|(status, _)| *status == self)
            .map(|(_, name)| *name)
    }
}

impl From<i32> for OsStatus {
    fn from(code: i32) -> Self {
        OsStatus(code)
    }
}

impl fmt::Display for OsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name} ({})", self.0),
            None => write!(f, "OSStatus {}", self.0),
        }
    }
}
