//! Content node definitions.

use super::null_as_default;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Highest heading level the model represents.
pub const MAX_HEADING_LEVEL: u8 = 6;

/// A block-level node in the document tree.
///
/// Serialized with an internal `"type"` tag, e.g.
/// `{"type":"paragraph","text":"..."}`. Decoding is lenient: a node
/// without a known tag, or whose fields do not fit, becomes
/// [`ContentNode::Unknown`] instead of failing the whole document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentNode {
    /// A heading with the paragraphs that follow it
    Heading(HeadingNode),
    /// A single paragraph line
    Paragraph(ParagraphNode),
    /// A run of list items
    List(ListNode),
    /// A node type this model does not know; ignored when writing Markdown
    Unknown,
}

impl ContentNode {
    /// Creates a heading node without children.
    pub fn heading(level: u8, title: impl Into<String>) -> Self {
        ContentNode::Heading(HeadingNode::new(level, title))
    }

    /// Creates a paragraph node.
    pub fn paragraph(text: impl Into<String>) -> Self {
        ContentNode::Paragraph(ParagraphNode { text: text.into() })
    }

    /// Creates a list node from its items.
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ContentNode::List(ListNode {
            items: items.into_iter().map(Into::into).collect(),
        })
    }

    /// Decodes one node from a JSON value.
    pub fn from_value(value: Value) -> Self {
        let tag = value.get("type").and_then(Value::as_str).map(str::to_owned);
        let decoded = match tag.as_deref() {
            Some("heading") => serde_json::from_value(value).map(ContentNode::Heading),
            Some("paragraph") => serde_json::from_value(value).map(ContentNode::Paragraph),
            Some("list") => serde_json::from_value(value).map(ContentNode::List),
            _ => return ContentNode::Unknown,
        };
        decoded.unwrap_or(ContentNode::Unknown)
    }

    /// Returns the node's type tag as it appears on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            ContentNode::Heading(_) => "heading",
            ContentNode::Paragraph(_) => "paragraph",
            ContentNode::List(_) => "list",
            ContentNode::Unknown => "unknown",
        }
    }
}

impl<'de> Deserialize<'de> for ContentNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(ContentNode::from_value)
    }
}

fn default_level() -> u8 {
    1
}

/// Reads any JSON number (or null) as a level clamped to 1-6.
fn clamped_level<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let level = Option::<f64>::deserialize(deserializer)?;
    Ok(level.map_or(1, |l| l.clamp(1.0, f64::from(MAX_HEADING_LEVEL)) as u8))
}

/// A heading and the paragraphs attached beneath it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingNode {
    /// Heading level (1-6)
    #[serde(default = "default_level", deserialize_with = "clamped_level")]
    pub level: u8,
    /// Heading text without the `#` markers
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Paragraphs that followed the heading before the next heading
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<ContentNode>,
}

impl HeadingNode {
    /// Creates a heading, clamping the level to 1-6.
    pub fn new(level: u8, title: impl Into<String>) -> Self {
        Self {
            level: level.clamp(1, MAX_HEADING_LEVEL),
            title: title.into(),
            children: Vec::new(),
        }
    }
}

/// A paragraph of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphNode {
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
}

/// A flat list of items.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ListNode {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<String>,
}
