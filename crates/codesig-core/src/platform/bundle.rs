//! Heterogeneous property bags returned by the platform.
//!
//! The platform hands back loosely-typed dictionaries whose values may be
//! plain data (strings, numbers, dates, nested collections) or opaque
//! platform objects such as trust references. This module models them as
//! [`PropertyBundle`] and exposes failure-free typed accessors: a lookup
//! returns `Some` only when the key is present *and* the value has the
//! requested type.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};

/// Well-known keys of the signing information bundle and of per-certificate
/// trust property maps.
pub mod keys {
    pub const IDENTIFIER: &str = "identifier";
    pub const FORMAT: &str = "format";
    pub const SIGNING_TIME: &str = "signing-time";
    pub const TRUST: &str = "trust";
    pub const DESIGNATED_REQUIREMENT: &str = "designated-requirement";
    pub const REQUIREMENTS: &str = "requirements";
    pub const ENTITLEMENTS: &str = "entitlements-dict";

    pub const PROPERTY_TITLE: &str = "title";
    pub const PROPERTY_WARNING: &str = "warning";
    pub const PROPERTY_ERROR: &str = "error";
}

/// A single value inside a [`PropertyBundle`].
///
/// `O` is the platform's opaque object type.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<O> {
    Bool(bool),
    Integer(i64),
    Real(f64),
    String(String),
    Date(DateTime<Utc>),
    Data(Vec<u8>),
    Array(Vec<Value<O>>),
    Dictionary(PropertyBundle<O>),
    Object(O),
}

impl<O> Value<O> {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_dictionary(&self) -> Option<&PropertyBundle<O>> {
        match self {
            Value::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&O> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Convert into a JSON value.
    ///
    /// Dates become RFC 3339 strings and binary data lowercase hex. Opaque
    /// objects and non-finite reals have no JSON form and yield `None`;
    /// inside collections such entries are skipped.
    pub fn to_json(&self) -> Option<serde_json::Value> {
        use serde_json::Value as Json;

        Some(match self {
            Value::Bool(b) => Json::Bool(*b),
            Value::Integer(i) => Json::from(*i),
            Value::Real(r) => Json::Number(serde_json::Number::from_f64(*r)?),
            Value::String(s) => Json::String(s.clone()),
            Value::Date(d) => Json::String(d.to_rfc3339_opts(SecondsFormat::Secs, true)),
            Value::Data(bytes) => Json::String(hex::encode(bytes)),
            Value::Array(items) => Json::Array(items.iter().filter_map(Value::to_json).collect()),
            Value::Dictionary(dict) => Json::Object(dict.to_json_map().into_iter().collect()),
            Value::Object(_) => return None,
        })
    }
}

impl<O> From<bool> for Value<O> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<O> From<i64> for Value<O> {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl<O> From<f64> for Value<O> {
    fn from(r: f64) -> Self {
        Value::Real(r)
    }
}

impl<O> From<&str> for Value<O> {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl<O> From<String> for Value<O> {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<O> From<DateTime<Utc>> for Value<O> {
    fn from(d: DateTime<Utc>) -> Self {
        Value::Date(d)
    }
}

impl<O> From<PropertyBundle<O>> for Value<O> {
    fn from(d: PropertyBundle<O>) -> Self {
        Value::Dictionary(d)
    }
}

/// String-keyed map of platform values.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyBundle<O> {
    entries: BTreeMap<String, Value<O>>,
}

impl<O> Default for PropertyBundle<O> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<O> PropertyBundle<O> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value<O>>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value<O>>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value<O>> {
        self.entries.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn get_date(&self, key: &str) -> Option<DateTime<Utc>> {
        self.get(key).and_then(Value::as_date)
    }

    pub fn get_dictionary(&self, key: &str) -> Option<&PropertyBundle<O>> {
        self.get(key).and_then(Value::as_dictionary)
    }

    pub fn get_object(&self, key: &str) -> Option<&O> {
        self.get(key).and_then(Value::as_object)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value<O>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// JSON view of every entry that has a JSON form.
    pub fn to_json_map(&self) -> BTreeMap<String, serde_json::Value> {
        self.iter()
            .filter_map(|(k, v)| Some((k.to_string(), v.to_json()?)))
            .collect()
    }
}

impl<O, K: Into<String>> FromIterator<(K, Value<O>)> for PropertyBundle<O> {
    fn from_iter<I: IntoIterator<Item = (K, Value<O>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
