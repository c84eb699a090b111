// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for label print jobs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// MIME type of every document this system submits.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Unique identifier for a single print call, used to correlate log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A typed job attribute value before wire encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Boolean(bool),
    Integer(i64),
    Text(String),
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<u32> for AttributeValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl std::fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Job attributes keyed by IPP attribute name.
///
/// Keys are unique. Setting an existing key replaces its value in place, so
/// the first insertion position of each key is retained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobAttributes {
    entries: Vec<(String, AttributeValue)>,
}

impl JobAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `name`.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<AttributeValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Merge every entry of `other` into `self`; `other` wins on collision.
    pub fn merge(&mut self, other: JobAttributes) {
        for (name, value) in other.entries {
            self.set(name, value);
        }
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl Serialize for JobAttributes {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl FromIterator<(String, AttributeValue)> for JobAttributes {
    fn from_iter<I: IntoIterator<Item = (String, AttributeValue)>>(iter: I) -> Self {
        let mut attrs = Self::new();
        for (name, value) in iter {
            attrs.set(name, value);
        }
        attrs
    }
}

/// A CUPS queue addressed over IPP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterDestination {
    pub host: String,
    pub port: u16,
    pub queue: String,
}

impl PrinterDestination {
    pub fn new(host: impl Into<String>, port: u16, queue: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            queue: queue.into(),
        }
    }

    /// `ipp://<host>:<port>/printers/<queue>`
    pub fn uri(&self) -> String {
        format!("ipp://{}:{}/printers/{}", self.host, self.port, self.queue)
    }
}

/// A fully assembled Print-Job request, ready for submission.
#[derive(Debug, Clone)]
pub struct PrintJobRequest {
    pub id: JobId,
    pub destination_uri: String,
    pub document_format: &'static str,
    pub job_attributes: JobAttributes,
    pub document: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

impl PrintJobRequest {
    pub fn new(destination_uri: String, job_attributes: JobAttributes, document: Vec<u8>) -> Self {
        Self {
            id: JobId::new(),
            destination_uri,
            document_format: PDF_MIME_TYPE,
            job_attributes,
            document,
            created_at: Utc::now(),
        }
    }
}
