//! Property value types for graph nodes and edges

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

/// A typed property value.
///
/// The union is closed: exactly these four variants exist, so every value
/// round-trips through the snapshot format and the secondary indexes
/// without an "unknown" escape hatch.
///
/// # Ordering
///
/// `PropertyValue` carries a total order so it can key the ordered index
/// structure. Values order first by type tag (Integer < Float < Text <
/// Boolean), then by value within the tag; floats compare with
/// [`f64::total_cmp`]. Comparisons across tags are consistent but not
/// numerically meaningful: `Integer(2) < Float(1.0)` holds because every
/// integer sorts before every float.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
}

impl PropertyValue {
    /// Get integer value if this is an integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            PropertyValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get float value if this is a float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            PropertyValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get text value if this is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get boolean value if this is a boolean
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            PropertyValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get type name as string
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Integer(_) => "Integer",
            PropertyValue::Float(_) => "Float",
            PropertyValue::Text(_) => "Text",
            PropertyValue::Boolean(_) => "Boolean",
        }
    }

    /// Rank of the type tag in the total order.
    fn tag_rank(&self) -> u8 {
        match self {
            PropertyValue::Integer(_) => 0,
            PropertyValue::Float(_) => 1,
            PropertyValue::Text(_) => 2,
            PropertyValue::Boolean(_) => 3,
        }
    }

    /// Parse a literal the way the command shell does: boolean keywords
    /// first, then integer, then float, falling back to text.
    pub fn parse_literal(raw: &str) -> PropertyValue {
        match raw.to_ascii_lowercase().as_str() {
            "true" => return PropertyValue::Boolean(true),
            "false" => return PropertyValue::Boolean(false),
            _ => {}
        }
        if let Ok(i) = raw.parse::<i64>() {
            return PropertyValue::Integer(i);
        }
        if let Ok(f) = raw.parse::<f64>() {
            return PropertyValue::Float(f);
        }
        PropertyValue::Text(raw.to_string())
    }
}

impl Eq for PropertyValue {}

impl Ord for PropertyValue {
    fn cmp(&self, other: &Self) -> Ordering {
        use PropertyValue::*;
        match (self, other) {
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            (Boolean(a), Boolean(b)) => a.cmp(b),
            _ => self.tag_rank().cmp(&other.tag_rank()),
        }
    }
}

impl PartialOrd for PropertyValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Integer(i) => write!(f, "{}", i),
            PropertyValue::Float(fl) => write!(f, "{}", fl),
            PropertyValue::Text(s) => write!(f, "{}", s),
            PropertyValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::Text(s)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::Text(s.to_string())
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        PropertyValue::Integer(i)
    }
}

impl From<i32> for PropertyValue {
    fn from(i: i32) -> Self {
        PropertyValue::Integer(i as i64)
    }
}

impl From<f64> for PropertyValue {
    fn from(f: f64) -> Self {
        PropertyValue::Float(f)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Boolean(b)
    }
}

/// Property map for storing node and edge properties
pub type PropertyMap = HashMap<String, PropertyValue>;
