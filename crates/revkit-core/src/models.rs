//! Core data models for revision history.
//!
//! A [`Revision`] is an immutable snapshot of a document. Hosts build them
//! with [`Revision::new`] and the `with_*` builders, then hand them to a
//! [`RevisionStore`](crate::store::RevisionStore). Nothing in this crate
//! creates revisions on its own.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RevisionError;

/// What caused a revision to be saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevisionType {
    Autosave,
    Manual,
    Publish,
    Scheduled,
}

impl RevisionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Autosave => "autosave",
            Self::Manual => "manual",
            Self::Publish => "publish",
            Self::Scheduled => "scheduled",
        }
    }

    /// Publish and scheduled revisions share the "published" bucket.
    pub fn is_published(&self) -> bool {
        matches!(self, Self::Publish | Self::Scheduled)
    }
}

impl fmt::Display for RevisionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for RevisionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "autosave" => Ok(Self::Autosave),
            "manual" => Ok(Self::Manual),
            "publish" => Ok(Self::Publish),
            "scheduled" => Ok(Self::Scheduled),
            other => Err(format!(
                "Unknown revision type: '{}'. Use autosave, manual, publish, or scheduled.",
                other
            )),
        }
    }
}

/// The user who saved a revision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl Author {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
}

/// One field-level change versus the previous revision.
///
/// Informational only; the diff engine works on `content` directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionChange {
    pub field: String,
    pub kind: ChangeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<String>,
}

/// A primitive metadata value. Arrays, objects and null are not accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Bool(bool),
    Number(f64),
    String(String),
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Number(n) => write!(f, "{}", n),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Extension data attached to a revision.
pub type Metadata = BTreeMap<String, MetadataValue>;

/// Convert a JSON object into [`Metadata`], rejecting non-primitive values.
///
/// A non-object input is rejected under the key `"$"`.
pub fn metadata_from_json(value: serde_json::Value) -> Result<Metadata, RevisionError> {
    let object = match value {
        serde_json::Value::Object(map) => map,
        _ => return Err(RevisionError::UnsupportedMetadata("$".to_string())),
    };

    let mut metadata = Metadata::new();
    for (key, value) in object {
        let converted = match value {
            serde_json::Value::Bool(b) => MetadataValue::Bool(b),
            serde_json::Value::String(s) => MetadataValue::String(s),
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(f) => MetadataValue::Number(f),
                None => return Err(RevisionError::UnsupportedMetadata(key)),
            },
            _ => return Err(RevisionError::UnsupportedMetadata(key)),
        };
        metadata.insert(key, converted);
    }
    Ok(metadata)
}

/// An immutable snapshot of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Revision {
    pub id: String,
    /// Strictly increasing within a document's history; never reused.
    pub version: u64,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    pub author: Author,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "type")]
    pub revision_type: RevisionType,
    /// Derived from `content`. Missing on input means 0 until
    /// [`Revision::refresh_counts`] runs.
    #[serde(default)]
    pub word_count: usize,
    #[serde(default)]
    pub character_count: usize,
    #[serde(default)]
    pub changes: Vec<RevisionChange>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Revision {
    /// Build a revision, capturing word and character counts of `content`.
    pub fn new(
        id: impl Into<String>,
        version: u64,
        revision_type: RevisionType,
        title: impl Into<String>,
        content: impl Into<String>,
        author: Author,
        created_at: DateTime<Utc>,
    ) -> Self {
        let mut revision = Self {
            id: id.into(),
            version,
            title: title.into(),
            content: content.into(),
            excerpt: None,
            author,
            created_at,
            revision_type,
            word_count: 0,
            character_count: 0,
            changes: Vec::new(),
            metadata: Metadata::new(),
        };
        revision.refresh_counts();
        revision
    }

    /// Recompute word and character counts from `content`.
    ///
    /// Returns true when the stored counts were missing or stale.
    pub fn refresh_counts(&mut self) -> bool {
        let word_count = self.content.split_whitespace().count();
        let character_count = self.content.chars().count();
        let changed = word_count != self.word_count || character_count != self.character_count;
        self.word_count = word_count;
        self.character_count = character_count;
        changed
    }

    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }

    pub fn with_changes(mut self, changes: Vec<RevisionChange>) -> Self {
        self.changes = changes;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.author.avatar = Some(avatar.into());
        self
    }
}

/// Kind of a single diff operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    Equal,
    Insert,
    Delete,
}

/// One token of a computed difference, including its trailing space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffOp {
    pub kind: DiffKind,
    pub text: String,
}

impl DiffOp {
    pub fn equal(text: impl Into<String>) -> Self {
        Self {
            kind: DiffKind::Equal,
            text: text.into(),
        }
    }

    pub fn insert(text: impl Into<String>) -> Self {
        Self {
            kind: DiffKind::Insert,
            text: text.into(),
        }
    }

    pub fn delete(text: impl Into<String>) -> Self {
        Self {
            kind: DiffKind::Delete,
            text: text.into(),
        }
    }
}
