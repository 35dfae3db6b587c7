//! Frontmatter: the fenced YAML block at the top of a content file.
//!
//! Authored input is trusted but loosely typed, so every recognized key is
//! coerced on its own. A block that is not valid YAML (or not a mapping)
//! degrades to "no declared fields"; it never fails the item.

use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_yaml::{Mapping, Value};
use tracing::warn;

/// Fence line that opens and closes the block.
pub const FENCE: &str = "---";

/// Split `text` into `(frontmatter, body)`.
///
/// The first line must be a fence and a later line must close it; otherwise
/// there is no frontmatter and the whole text is body.
pub fn split_frontmatter(text: &str) -> (Option<&str>, &str) {
    let mut lines = text.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return (None, text);
    };
    if first.trim_end() != FENCE {
        return (None, text);
    }

    let block_start = first.len();
    let mut offset = block_start;
    for line in lines {
        if line.trim_end() == FENCE {
            return (Some(&text[block_start..offset]), &text[offset + line.len()..]);
        }
        offset += line.len();
    }

    (None, text)
}

/// Podium rank or free-form label attached to a write-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Achievement {
    First,
    Second,
    Third,
    Label(String),
}

impl Achievement {
    /// Parse a label; blank labels mean no achievement.
    pub fn parse(label: &str) -> Option<Achievement> {
        match label.trim() {
            "" => None,
            "1st" => Some(Achievement::First),
            "2nd" => Some(Achievement::Second),
            "3rd" => Some(Achievement::Third),
            other => Some(Achievement::Label(other.to_string())),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Achievement::First => "1st",
            Achievement::Second => "2nd",
            Achievement::Third => "3rd",
            Achievement::Label(label) => label,
        }
    }

    pub fn rank(&self) -> Option<u8> {
        match self {
            Achievement::First => Some(1),
            Achievement::Second => Some(2),
            Achievement::Third => Some(3),
            Achievement::Label(_) => None,
        }
    }
}

impl Serialize for Achievement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Achievement", 2)?;
        state.serialize_field("label", self.label())?;
        state.serialize_field("rank", &self.rank())?;
        state.end()
    }
}

/// Declared fields of a content file, after coercion.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Frontmatter {
    pub title: String,
    /// Normalized date, see [`normalize_date`]
    pub date: String,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub achievement: Option<Achievement>,
}

impl Frontmatter {
    /// Parse the raw YAML block.
    pub fn from_yaml(yaml: &str) -> Frontmatter {
        match serde_yaml::from_str::<Value>(yaml) {
            Ok(Value::Mapping(map)) => Frontmatter::from_mapping(&map),
            Ok(Value::Null) => Frontmatter::default(),
            Ok(_) => {
                warn!("Frontmatter is not a key-value mapping, ignoring it");
                Frontmatter::default()
            }
            Err(e) => {
                warn!("Unparseable frontmatter, treating as empty: {}", e);
                Frontmatter::default()
            }
        }
    }

    fn from_mapping(map: &Mapping) -> Frontmatter {
        let achievement = map
            .get("achievement")
            .and_then(scalar_to_string)
            .or_else(|| map.get("achievment").and_then(scalar_to_string))
            .and_then(|label| Achievement::parse(&label));

        Frontmatter {
            title: map
                .get("title")
                .and_then(scalar_to_string)
                .unwrap_or_default(),
            date: normalize_date(map.get("date")),
            categories: map.get("categories").map(string_list).unwrap_or_default(),
            tags: map.get("tags").map(string_list).unwrap_or_default(),
            cover: map.get("cover").and_then(scalar_to_string),
            achievement,
        }
    }
}

/// Parse a whole file into its declared fields and its body.
pub fn parse_document(text: &str) -> (Frontmatter, &str) {
    match split_frontmatter(text) {
        (Some(yaml), body) => (Frontmatter::from_yaml(yaml), body),
        (None, body) => (Frontmatter::default(), body),
    }
}

/// Normalize a declared date to `YYYY-MM-DD`.
///
/// - numbers are epoch milliseconds, formatted as a UTC date
/// - strings of 10+ characters are cut to their first 10 characters
/// - shorter strings pass through unchanged
/// - anything else is empty
pub fn normalize_date(value: Option<&Value>) -> String {
    match value {
        Some(Value::Number(n)) => {
            let millis = n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64));
            millis
                .and_then(DateTime::<Utc>::from_timestamp_millis)
                .map(|dt| dt.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        }
        Some(Value::String(s)) => {
            if s.chars().count() >= 10 {
                s.chars().take(10).collect()
            } else {
                s.clone()
            }
        }
        _ => String::new(),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A sequence of scalars, or a single scalar as a one-element list.
fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Sequence(items) => items.iter().filter_map(scalar_to_string).collect(),
        other => scalar_to_string(other).into_iter().collect(),
    }
}
