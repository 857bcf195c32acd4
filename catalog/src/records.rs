//! Catalog records as served by the data source.
//!
//! Taxonomy records ([`Subject`], [`Difficulty`]) are keyed by their `type`
//! string; courses reference them by that key.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A record addressed by its `type` key.
pub trait Typed {
    fn type_key(&self) -> &str;
}

/// Backend identifier: numeric in some collections, textual in others.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(id) => write!(f, "{id}"),
            RecordId::Text(id) => f.write_str(id),
        }
    }
}

/// A subject filter, e.g. `programming` or `ai`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Subject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Stable key referenced by courses.
    #[serde(rename = "type")]
    pub kind: String,
    pub label: String,
    /// Icon path or URL.
    pub icon: String,
    /// CSS colour, usually `#rrggbb`.
    pub color: String,
    /// Sentences appended to short course descriptions of this subject.
    pub additional_description: Vec<String>,
}

/// A difficulty level filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Difficulty {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "type")]
    pub kind: String,
    pub label: String,
    pub icon: String,
    pub color: String,
}

/// A school grade that courses can target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Grade {
    pub id: RecordId,
    pub grade: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Course {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub title: String,
    pub description: String,
    /// Subject `type` keys, most relevant first.
    pub subjects: Vec<String>,
    pub grades: Vec<u32>,
    pub start_date: String,
    pub end_date: String,
    pub url: String,
    pub image_url: Option<String>,
    pub organization: String,
    /// Difficulty `type` key.
    pub difficulty: Option<String>,
}

impl Typed for Subject {
    fn type_key(&self) -> &str {
        &self.kind
    }
}

impl Typed for Difficulty {
    fn type_key(&self) -> &str {
        &self.kind
    }
}
