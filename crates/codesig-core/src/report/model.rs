use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::SANDBOX_ENTITLEMENT;
use crate::error::SignatureError;
use crate::platform::{Diagnostic, OsStatus};

/// Top-level signature report.
///
/// Built once per inspection and never modified afterwards. `info` is
/// present whatever the status: it is the all-empty default when signing
/// information could not be extracted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    status: Status,
    info: Info,
}

impl Report {
    pub fn new(status: Status, info: Info) -> Self {
        Self { status, info }
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn info(&self) -> &Info {
        &self.info
    }

    pub fn is_valid(&self) -> bool {
        matches!(self.status, Status::Valid)
    }

    pub fn is_signed(&self) -> bool {
        !matches!(self.status, Status::NotSigned)
    }

    pub fn into_parts(self) -> (Status, Info) {
        (self.status, self.info)
    }
}

/// Trust status of an artifact.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Valid,
    Invalid(SignatureError),
    NotSigned,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Valid => "valid",
            Status::Invalid(_) => "invalid",
            Status::NotSigned => "not_signed",
        }
    }

    pub fn error(&self) -> Option<&SignatureError> {
        match self {
            Status::Invalid(err) => Some(err),
            _ => None,
        }
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Repr<'a> {
            state: &'static str,
            #[serde(skip_serializing_if = "Option::is_none")]
            error: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            code: Option<OsStatus>,
            #[serde(skip_serializing_if = "Option::is_none")]
            diagnostic: Option<&'a Diagnostic>,
        }

        let err = self.error();
        Repr {
            state: self.as_str(),
            error: err.map(ToString::to_string),
            code: err.and_then(SignatureError::code),
            diagnostic: err.and_then(SignatureError::diagnostic),
        }
        .serialize(serializer)
    }
}

/// Signing information extracted from an artifact.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Info {
    pub identifier: Option<String>,
    /// Certificate chain in the order the trust engine reported it.
    pub authorities: Vec<Authority>,
    pub designated_requirement: Option<String>,
    /// Full requirement set with the designated requirement line elided.
    pub additional_requirements: Option<String>,
    pub format: Option<String>,
    pub signing_date: Option<DateTime<Utc>>,
    pub entitlements: BTreeMap<String, serde_json::Value>,
}

impl Info {
    /// Whether the app-sandbox entitlement is present and boolean `true`.
    pub fn is_sandboxed(&self) -> bool {
        matches!(
            self.entitlements.get(SANDBOX_ENTITLEMENT),
            Some(serde_json::Value::Bool(true))
        )
    }
}

/// One certificate of the signing chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Authority {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
