//! Structured field paths
//!
//! A `FieldPath` addresses one node of a discovered field tree. Internally it is
//! a list of segments, so a key that happens to contain `.` or `[` never
//! collides with a nested path. The familiar string form (`variants[0].sku`,
//! `images[all]`, `metadata.weight`) is only produced at the boundary, through
//! `Display` and serde.

use crate::error::FieldPathError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// One step in a field path
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    /// Object key, rendered as `name` at the start and `.name` afterwards
    Key(String),
    /// The whole array as a unit, rendered as `[all]`
    AllItems,
    /// Field of the representative (first) array element, rendered as `[0].name`
    Element(String),
}

impl Segment {
    fn name(&self) -> Option<&str> {
        match self {
            Segment::Key(name) | Segment::Element(name) => Some(name),
            Segment::AllItems => None,
        }
    }
}

/// Path of a field inside a sample record
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    /// Path of a direct field of the record
    pub fn root(key: impl Into<String>) -> Self {
        FieldPath {
            segments: vec![Segment::Key(key.into())],
        }
    }

    /// Path of an object sub-field below this one
    pub fn child(&self, key: impl Into<String>) -> Self {
        self.with_segment(Segment::Key(key.into()))
    }

    /// The `[all]` marker of this array field
    pub fn all_items(&self) -> Self {
        self.with_segment(Segment::AllItems)
    }

    /// Field of this array's representative element
    pub fn element(&self, key: impl Into<String>) -> Self {
        self.with_segment(Segment::Element(key.into()))
    }

    fn with_segment(&self, segment: Segment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(segment);
        FieldPath { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Nesting level, 0 for direct fields of the record
    pub fn level(&self) -> usize {
        self.segments.len().saturating_sub(1)
    }

    /// Key of the record field this path starts from
    pub fn root_key(&self) -> &str {
        self.segments.first().and_then(Segment::name).unwrap_or("")
    }

    /// Last named segment, `None` for an `[all]` marker
    pub fn leaf_name(&self) -> Option<&str> {
        self.segments.last().and_then(Segment::name)
    }

    /// A direct field of the record: no dot and no bracket in its string form
    pub fn is_top_level(&self) -> bool {
        matches!(self.segments.as_slice(), [Segment::Key(_)])
    }

    pub fn is_all_items(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::AllItems))
    }

    /// Whether this path goes through an array's representative element
    pub fn is_element_field(&self) -> bool {
        self.segments.iter().any(|s| matches!(s, Segment::Element(_)))
    }

    /// Whether this path addresses a field under `array`'s representative element,
    /// e.g. `variants[0].sku` or `variants[0].dimensions.width` for `variants`
    pub fn is_element_of(&self, array: &FieldPath) -> bool {
        self.segments.len() > array.segments.len()
            && self.segments.starts_with(&array.segments)
            && matches!(self.segments[array.segments.len()], Segment::Element(_))
    }

    /// Human-readable name: `variants > sku`, `images (All Items)`, `metadata > weight`
    pub fn display_name(&self) -> String {
        let mut names: Vec<&str> = Vec::with_capacity(self.segments.len());
        let mut all_items = false;
        for segment in &self.segments {
            match segment.name() {
                Some(name) => names.push(name),
                None => all_items = true,
            }
        }

        let joined = names.join(" > ");
        if all_items {
            format!("{} (All Items)", joined)
        } else {
            joined
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(name) if idx == 0 => f.write_str(name)?,
                Segment::Key(name) => write!(f, ".{}", name)?,
                Segment::AllItems => f.write_str("[all]")?,
                Segment::Element(name) => write!(f, "[0].{}", name)?,
            }
        }
        Ok(())
    }
}

/// Split off the key at the front of `rest`, up to the next `.` or `[`
fn split_key(rest: &str) -> (&str, &str) {
    match rest.find(['.', '[']) {
        Some(idx) => rest.split_at(idx),
        None => (rest, ""),
    }
}

impl FromStr for FieldPath {
    type Err = FieldPathError;

    /// Parse the canonical string form. Keys are assumed not to contain `.`, `[` or `]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(FieldPathError::Empty);
        }

        let (key, mut rest) = split_key(s);
        if key.is_empty() {
            return Err(FieldPathError::EmptyKey(s.to_string()));
        }
        let mut segments = vec![Segment::Key(key.to_string())];

        while !rest.is_empty() {
            if let Some(tail) = rest.strip_prefix("[all]") {
                segments.push(Segment::AllItems);
                rest = tail;
            } else if let Some(tail) = rest.strip_prefix("[0].") {
                let (key, tail) = split_key(tail);
                if key.is_empty() {
                    return Err(FieldPathError::EmptyKey(s.to_string()));
                }
                segments.push(Segment::Element(key.to_string()));
                rest = tail;
            } else if let Some(tail) = rest.strip_prefix('.') {
                let (key, tail) = split_key(tail);
                if key.is_empty() {
                    return Err(FieldPathError::EmptyKey(s.to_string()));
                }
                segments.push(Segment::Key(key.to_string()));
                rest = tail;
            } else {
                return Err(FieldPathError::Malformed(s.to_string()));
            }
        }

        Ok(FieldPath { segments })
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FieldPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
