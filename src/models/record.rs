//! Decoded dump records and the AS paths extracted from them.
use crate::models::CodeSet;
use itertools::Itertools;
use serde::de::{Deserializer, IgnoredAny};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Delimiter joining AS tokens into canonical keys and path lines.
pub const TOKEN_DELIMITER: &str = ",";

/// One decoded dump entry.
///
/// Field names follow the JSON layout of mrtparse-based dumps (`type`, `subtype`,
/// `rib_entries`), so both records exported by this crate and `mrt2json`-style files decode
/// into it. Every field is optional; a missing field is an empty collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    #[serde(rename = "type")]
    pub record_type: CodeSet,
    #[serde(rename = "subtype")]
    pub record_subtype: CodeSet,
    pub rib_entries: Vec<RibEntry>,
}

/// One routing-table entry within a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RibEntry {
    pub path_attributes: Vec<PathAttribute>,
}

/// A BGP path attribute. Only AS path style attributes carry segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathAttribute {
    #[serde(rename = "type")]
    pub attr_type: CodeSet,
    #[serde(rename = "value", deserialize_with = "lenient_segments")]
    pub segments: Vec<PathSegment>,
}

/// One AS path segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSegment {
    #[serde(rename = "type")]
    pub segment_type: CodeSet,
    #[serde(rename = "value", deserialize_with = "lenient_tokens")]
    pub as_tokens: Vec<String>,
}

impl Record {
    pub fn new(record_type: CodeSet, record_subtype: CodeSet, rib_entries: Vec<RibEntry>) -> Self {
        Record {
            record_type,
            record_subtype,
            rib_entries,
        }
    }
}

impl RibEntry {
    pub fn new(path_attributes: Vec<PathAttribute>) -> Self {
        RibEntry { path_attributes }
    }
}

impl PathAttribute {
    /// Builds an attribute tagged with a single type code.
    pub fn new(attr_type: u32, segments: Vec<PathSegment>) -> Self {
        PathAttribute {
            attr_type: CodeSet::of(&[attr_type]),
            segments,
        }
    }
}

impl PathSegment {
    /// Builds a segment tagged with a single type code.
    pub fn new<T: ToString>(segment_type: u32, as_tokens: &[T]) -> Self {
        PathSegment {
            segment_type: CodeSet::of(&[segment_type]),
            as_tokens: as_tokens.iter().map(|t| t.to_string()).collect(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AttributeValue {
    Segments(Vec<PathSegment>),
    Other(IgnoredAny),
}

/// Attribute values that are not a list of segment objects (ORIGIN, NEXT_HOP, communities, ...)
/// carry no segments.
fn lenient_segments<'de, D>(deserializer: D) -> Result<Vec<PathSegment>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match AttributeValue::deserialize(deserializer)? {
        AttributeValue::Segments(segments) => segments,
        AttributeValue::Other(_) => vec![],
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AsToken {
    Text(String),
    Number(u64),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SegmentValue {
    Tokens(Vec<AsToken>),
    Other(IgnoredAny),
}

/// AS tokens are decimal strings in mrtparse output; bare integers are accepted too. A value
/// that is not a list of tokens yields an empty segment.
fn lenient_tokens<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match SegmentValue::deserialize(deserializer)? {
        SegmentValue::Tokens(tokens) => tokens
            .into_iter()
            .map(|t| match t {
                AsToken::Text(s) => s,
                AsToken::Number(n) => n.to_string(),
            })
            .collect(),
        SegmentValue::Other(_) => vec![],
    })
}

/// An ordered sequence of AS tokens taken from a single AS_SEQUENCE segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct AsPath {
    tokens: Vec<String>,
}

impl AsPath {
    pub fn new(tokens: Vec<String>) -> Self {
        AsPath { tokens }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The comma-joined key used for deduplication and as the path line format.
    pub fn canonical_key(&self) -> String {
        self.tokens.iter().join(TOKEN_DELIMITER)
    }

    pub fn into_tokens(self) -> Vec<String> {
        self.tokens
    }
}

impl<T: ToString> From<&[T]> for AsPath {
    fn from(tokens: &[T]) -> Self {
        AsPath::new(tokens.iter().map(|t| t.to_string()).collect())
    }
}

impl Display for AsPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.canonical_key())
    }
}
