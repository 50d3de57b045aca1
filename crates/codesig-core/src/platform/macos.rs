//! Security.framework backend.
//!
//! Static code handles and every object copied out of the framework are
//! wrapped in Core Foundation types, so they are released on drop on every
//! exit path.

use std::os::raw::c_void;
use std::path::Path;
use std::ptr;

use chrono::{DateTime, Utc};
use core_foundation::array::CFArray;
use core_foundation::base::{CFType, TCFType};
use core_foundation::boolean::CFBoolean;
use core_foundation::data::CFData;
use core_foundation::date::CFDate;
use core_foundation::dictionary::CFDictionary;
use core_foundation::error::CFError;
use core_foundation::number::CFNumber;
use core_foundation::string::CFString;
use core_foundation::url::CFURL;
use core_foundation::{declare_TCFType, impl_TCFType};
use core_foundation_sys::array::CFArrayRef;
use core_foundation_sys::base::{CFTypeID, CFTypeRef, OSStatus};
use core_foundation_sys::dictionary::CFDictionaryRef;
use core_foundation_sys::error::CFErrorRef;
use core_foundation_sys::number::CFNumberIsFloatType;
use core_foundation_sys::string::CFStringRef;
use core_foundation_sys::url::CFURLRef;

use super::{
    CodeSigningPlatform, Diagnostic, InfoFlags, ObjectKind, OsStatus, PropertyBundle,
    ValidityFailure, ValidityFlags, Value,
};

/// Seconds between the Unix epoch and the Core Foundation reference date
/// (2001-01-01T00:00:00Z).
const CF_EPOCH_OFFSET: f64 = 978_307_200.0;

pub enum __SecStaticCode {}
pub type SecStaticCodeRef = *mut __SecStaticCode;

#[link(name = "Security", kind = "framework")]
unsafe extern "C" {
    fn SecStaticCodeGetTypeID() -> CFTypeID;
    fn SecTrustGetTypeID() -> CFTypeID;
    fn SecRequirementGetTypeID() -> CFTypeID;

    fn SecStaticCodeCreateWithPath(
        path: CFURLRef,
        flags: u32,
        static_code: *mut SecStaticCodeRef,
    ) -> OSStatus;
    fn SecStaticCodeCheckValidityWithErrors(
        static_code: SecStaticCodeRef,
        flags: u32,
        requirement: *const c_void,
        errors: *mut CFErrorRef,
    ) -> OSStatus;
    fn SecCodeCopySigningInformation(
        code: SecStaticCodeRef,
        flags: u32,
        information: *mut CFDictionaryRef,
    ) -> OSStatus;
    fn SecTrustCopyProperties(trust: CFTypeRef) -> CFArrayRef;
    fn SecRequirementCopyString(
        requirement: CFTypeRef,
        flags: u32,
        text: *mut CFStringRef,
    ) -> OSStatus;
    fn SecCopyErrorMessageString(status: OSStatus, reserved: *mut c_void) -> CFStringRef;
}

declare_TCFType! {
    /// Owned `SecStaticCodeRef`.
    SecStaticCode, SecStaticCodeRef
}
impl_TCFType!(SecStaticCode, SecStaticCodeRef, SecStaticCodeGetTypeID);

/// [`CodeSigningPlatform`] backed by the system Security.framework.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecurityFramework;

impl CodeSigningPlatform for SecurityFramework {
    type Code = SecStaticCode;
    type Object = CFType;

    fn create_code(&self, path: &Path) -> Result<Option<SecStaticCode>, OsStatus> {
        let url = CFURL::from_path(path, path.is_dir()).ok_or(OsStatus::PARAM)?;
        let mut code: SecStaticCodeRef = ptr::null_mut();

        check(unsafe { SecStaticCodeCreateWithPath(url.as_concrete_TypeRef(), 0, &mut code) })?;

        if code.is_null() {
            return Ok(None);
        }
        Ok(Some(unsafe { SecStaticCode::wrap_under_create_rule(code) }))
    }

    fn check_validity(
        &self,
        code: &SecStaticCode,
        flags: ValidityFlags,
    ) -> Result<(), ValidityFailure> {
        let mut error: CFErrorRef = ptr::null_mut();

        let status = unsafe {
            SecStaticCodeCheckValidityWithErrors(
                code.as_concrete_TypeRef(),
                flags.bits(),
                ptr::null(),
                &mut error,
            )
        };

        // Take ownership first so the error is released on success too.
        let diagnostic = (!error.is_null()).then(|| {
            let error = unsafe { CFError::wrap_under_create_rule(error) };
            Diagnostic {
                domain: error.domain().to_string(),
                code: error.code() as i64,
                description: error.description().to_string(),
            }
        });

        match check(status) {
            Ok(()) => Ok(()),
            Err(status) => Err(ValidityFailure { status, diagnostic }),
        }
    }

    fn copy_signing_information(
        &self,
        code: &SecStaticCode,
        flags: InfoFlags,
    ) -> Result<Option<PropertyBundle<CFType>>, OsStatus> {
        let mut info: CFDictionaryRef = ptr::null();

        check(unsafe {
            SecCodeCopySigningInformation(code.as_concrete_TypeRef(), flags.bits(), &mut info)
        })?;

        if info.is_null() {
            return Ok(None);
        }
        let info = unsafe { CFType::wrap_under_create_rule(info as CFTypeRef) };

        Ok(match to_value(&info) {
            Value::Dictionary(bundle) => Some(bundle),
            _ => None,
        })
    }

    fn object_kind(&self, object: &CFType) -> ObjectKind {
        let type_id = object.type_of();
        if type_id == unsafe { SecTrustGetTypeID() } {
            ObjectKind::Trust
        } else if type_id == unsafe { SecRequirementGetTypeID() } {
            ObjectKind::Requirement
        } else {
            ObjectKind::Other
        }
    }

    fn copy_trust_properties(&self, trust: &CFType) -> Option<Vec<PropertyBundle<CFType>>> {
        let properties = unsafe { SecTrustCopyProperties(trust.as_CFTypeRef()) };
        if properties.is_null() {
            return None;
        }
        let properties = unsafe { CFType::wrap_under_create_rule(properties as CFTypeRef) };

        // Either every entry is a dictionary or the whole list is unreadable.
        match to_value(&properties) {
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Dictionary(bundle) => Some(bundle),
                    _ => None,
                })
                .collect(),
            _ => None,
        }
    }

    fn copy_requirement_string(&self, requirement: &CFType) -> Result<String, OsStatus> {
        let mut text: CFStringRef = ptr::null();

        check(unsafe { SecRequirementCopyString(requirement.as_CFTypeRef(), 0, &mut text) })?;

        if text.is_null() {
            return Err(OsStatus::CS_REQ_INVALID);
        }
        Ok(unsafe { CFString::wrap_under_create_rule(text) }.to_string())
    }

    fn error_message(&self, status: OsStatus) -> String {
        let text = unsafe { SecCopyErrorMessageString(status.code(), ptr::null_mut()) };
        if text.is_null() {
            return status.to_string();
        }
        unsafe { CFString::wrap_under_create_rule(text) }.to_string()
    }
}

fn check(status: OSStatus) -> Result<(), OsStatus> {
    let status = OsStatus(status);
    if status.is_success() {
        Ok(())
    } else {
        Err(status)
    }
}

/// Convert a Core Foundation value into a bundle [`Value`].
///
/// Property-list types map onto their typed variants; anything else is kept
/// as an opaque object.
fn to_value(value: &CFType) -> Value<CFType> {
    if let Some(s) = value.downcast::<CFString>() {
        return Value::String(s.to_string());
    }
    if let Some(b) = value.downcast::<CFBoolean>() {
        return Value::Bool(b.into());
    }
    if let Some(n) = value.downcast::<CFNumber>() {
        let is_float = unsafe { CFNumberIsFloatType(n.as_concrete_TypeRef()) } != 0;
        if !is_float {
            if let Some(i) = n.to_i64() {
                return Value::Integer(i);
            }
        }
        if let Some(r) = n.to_f64() {
            return Value::Real(r);
        }
    }
    if let Some(date) = value.downcast::<CFDate>() {
        if let Some(date) = date_from_absolute_time(date.abs_time()) {
            return Value::Date(date);
        }
    }
    if let Some(data) = value.downcast::<CFData>() {
        return Value::Data(data.bytes().to_vec());
    }
    if let Some(array) = value.downcast::<CFArray>() {
        return Value::Array(
            array
                .iter()
                .map(|item| {
                    let item = unsafe { CFType::wrap_under_get_rule(*item as CFTypeRef) };
                    to_value(&item)
                })
                .collect(),
        );
    }
    if let Some(dict) = value.downcast::<CFDictionary>() {
        let (keys, values) = dict.get_keys_and_values();
        return Value::Dictionary(
            keys.into_iter()
                .zip(values)
                .filter_map(|(key, value)| {
                    let key = unsafe { CFType::wrap_under_get_rule(key as CFTypeRef) };
                    let value = unsafe { CFType::wrap_under_get_rule(value as CFTypeRef) };
                    Some((key.downcast::<CFString>()?.to_string(), to_value(&value)))
                })
                .collect(),
        );
    }

    Value::Object(value.clone())
}

fn date_from_absolute_time(seconds: f64) -> Option<DateTime<Utc>> {
    let unix = seconds + CF_EPOCH_OFFSET;
    let whole = unix.floor();
    let nanos = ((unix - whole) * 1e9) as u32;
    DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
}
