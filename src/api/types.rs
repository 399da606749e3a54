//! Types exchanged with the resume server.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Opaque identifier of a stored resume.
///
/// The server sends integers, but nothing here relies on that: the id is
/// only ever echoed back in URLs and shown as a list label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResumeId(String);

impl ResumeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResumeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ResumeId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            Err("resume id cannot be empty".to_string())
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }
}

impl<'de> Deserialize<'de> for ResumeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(s) => Ok(Self(s)),
            serde_json::Value::Number(n) => Ok(Self(n.to_string())),
            other => Err(D::Error::custom(format!("invalid resume id: {}", other))),
        }
    }
}

impl Serialize for ResumeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// An entry of the resume list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeSummary {
    pub id: ResumeId,
    /// When the resume was stored, as formatted by the server.
    #[serde(default)]
    pub entry_date: Option<String>,
}

impl ResumeSummary {
    /// Label shown in the resume list.
    pub fn label(&self) -> String {
        match &self.entry_date {
            Some(date) if !date.is_empty() => format!("Resume {}  ({})", self.id, date),
            _ => format!("Resume {}", self.id),
        }
    }
}
