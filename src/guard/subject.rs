//! Subject identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest accepted subject identifier, in bytes.
pub const MAX_SUBJECT_LEN: usize = 256;

/// Reasons a subject identifier is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubjectError {
    #[error("subject identifier is empty")]
    Empty,
    #[error("subject identifier is {len} bytes, limit is {max}")]
    TooLong { len: usize, max: usize },
    #[error("subject identifier contains invalid character {0:?}")]
    InvalidCharacter(char),
    #[error("subject identifier {0:?} is reserved")]
    Reserved(&'static str),
    #[error("subject identifier is not valid UTF-8")]
    NotUtf8,
}

/// Opaque identifier of the thing protected against code guessing,
/// e.g. an owner id tied to a booking code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SubjectId(String);

impl SubjectId {
    pub fn parse(raw: &str) -> Result<Self, SubjectError> {
        if raw.is_empty() {
            return Err(SubjectError::Empty);
        }
        if raw.len() > MAX_SUBJECT_LEN {
            return Err(SubjectError::TooLong {
                len: raw.len(),
                max: MAX_SUBJECT_LEN,
            });
        }
        if let Some(c) = raw.chars().find(|c| c.is_whitespace() || c.is_control()) {
            return Err(SubjectError::InvalidCharacter(c));
        }
        // Dot segments cannot travel as a URL path segment.
        if let Some(reserved) = [".", ".."].into_iter().find(|r| *r == raw) {
            return Err(SubjectError::Reserved(reserved));
        }
        Ok(Self(raw.to_string()))
    }

    /// Parse raw header bytes.
    pub fn from_bytes(raw: &[u8]) -> Result<Self, SubjectError> {
        std::str::from_utf8(raw)
            .map_err(|_| SubjectError::NotUtf8)
            .and_then(Self::parse)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for SubjectId {
    type Err = SubjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SubjectId {
    type Error = SubjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SubjectId> for String {
    fn from(value: SubjectId) -> Self {
        value.0
    }
}

impl From<u64> for SubjectId {
    /// Numeric owner ids are always valid subjects.
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
