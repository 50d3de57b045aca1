//! Requirement extraction and clean-up.
//!
//! The platform reports the designated requirement twice: once as a
//! requirement object, and once inline in the combined requirement-set text
//! on a line starting with `designated =>`. The inline copy is elided from
//! `additional_requirements` when it matches the designated requirement.

use crate::platform::bundle::keys;
use crate::platform::{CodeSigningPlatform, ObjectKind, PropertyBundle};

/// Prefix of the designated requirement line in the requirement-set text.
pub const DESIGNATED_MARKER: &str = "designated =>";

/// Designated and additional requirements of one artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Requirements {
    pub designated: Option<String>,
    pub additional: Option<String>,
}

/// Read both requirement fields from the signing information bundle.
///
/// Never fails. A designated requirement that cannot be rendered is replaced
/// by the platform's message for the failure code.
pub fn extract_requirements<P: CodeSigningPlatform>(
    platform: &P,
    info: &PropertyBundle<P::Object>,
) -> Requirements {
    let designated = info
        .get_object(keys::DESIGNATED_REQUIREMENT)
        .filter(|req| platform.object_kind(req) == ObjectKind::Requirement)
        .map(|req| match platform.copy_requirement_string(req) {
            Ok(text) => text,
            Err(status) => {
                tracing::warn!(%status, "designated requirement could not be rendered");
                platform.error_message(status)
            }
        });

    let additional = info
        .get_str(keys::REQUIREMENTS)
        .map(|text| trim_requirements(text, designated.as_deref()));

    Requirements {
        designated,
        additional,
    }
}

/// Remove the inline designated requirement from a requirement-set text.
///
/// A line starting with [`DESIGNATED_MARKER`] is dropped, terminator
/// included, when its remainder equals `designated` (both whitespace
/// trimmed). Otherwise the remainder is kept without the marker. Every other
/// line is copied unchanged.
pub fn trim_requirements(requirements: &str, designated: Option<&str>) -> String {
    let designated = designated.map(str::trim);
    let mut out = String::with_capacity(requirements.len());

    for line in requirements.split_inclusive('\n') {
        let (body, ending) = split_line_ending(line);

        match body.strip_prefix(DESIGNATED_MARKER) {
            Some(rest) if designated == Some(rest.trim()) => {}
            Some(rest) => {
                out.push_str(rest);
                out.push_str(ending);
            }
            None => out.push_str(line),
        }
    }

    out
}

fn split_line_ending(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}
