//! Core types for commentd

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::{Error, Result};

/// Caller-supplied comment fields, stored verbatim
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// Name of the identifier field on the wire
pub const ID_FIELD: &str = "_id";

/// Store-assigned comment identifier
///
/// Identifiers are UUIDv7 values rendered as 32 lowercase hex characters, so
/// their lexical order follows creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommentId(Uuid);

impl CommentId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }

    /// Parse an identifier in its 32 hex character form
    pub fn parse(s: &str) -> Result<Self> {
        if s.len() != 32 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidId(s.to_string()));
        }

        Uuid::try_parse(s)
            .map(Self)
            .map_err(|_| Error::InvalidId(s.to_string()))
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for CommentId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for CommentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CommentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// A persisted comment: the store-assigned id plus whatever the caller sent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: CommentId,
    #[serde(flatten)]
    pub fields: Fields,
}

impl Comment {
    /// Build a record from caller fields. A caller-supplied `_id` is dropped;
    /// the store owns identifier assignment.
    pub fn new(id: CommentId, mut fields: Fields) -> Self {
        fields.remove(ID_FIELD);
        Self { id, fields }
    }
}
