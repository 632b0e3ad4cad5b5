//! Document root and metadata.

use super::{null_as_default, ContentNode};
use serde::{Deserialize, Serialize};

/// Reserved document metadata. Nothing populates it yet, but it is kept on
/// the wire so producers can attach free-form keys.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// The root of a document tree built from Markdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentRoot {
    /// Reserved metadata mapping
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: Metadata,
    /// The Markdown text the tree was built from, verbatim
    #[serde(default, deserialize_with = "null_as_default")]
    pub raw: String,
    /// Top-level content nodes in document order
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: Vec<ContentNode>,
}

impl DocumentRoot {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty document that remembers its source text.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            ..Self::default()
        }
    }

    /// Returns true if the document has neither source text nor content.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty() && self.content.is_empty()
    }

    /// Returns a copy of this document with `raw` cleared, forcing
    /// Markdown reconstruction from the tree.
    pub fn without_raw(&self) -> Self {
        Self {
            metadata: self.metadata.clone(),
            raw: String::new(),
            content: self.content.clone(),
        }
    }

    /// Returns the number of headings at the top level.
    pub fn heading_count(&self) -> usize {
        self.content
            .iter()
            .filter(|n| matches!(n, ContentNode::Heading(_)))
            .count()
    }

    /// Returns every paragraph text, including those nested under headings.
    pub fn paragraphs(&self) -> Vec<&str> {
        fn collect<'a>(nodes: &'a [ContentNode], out: &mut Vec<&'a str>) {
            for node in nodes {
                match node {
                    ContentNode::Paragraph(p) => out.push(&p.text),
                    ContentNode::Heading(h) => collect(&h.children, out),
                    _ => {}
                }
            }
        }

        let mut out = Vec::new();
        collect(&self.content, &mut out);
        out
    }

    /// Serializes the document as JSON text.
    pub fn to_json(&self, pretty: bool) -> crate::Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        json.map_err(crate::Error::Serialize)
    }

    /// Parses a document from JSON text. The top level must be an object.
    pub fn from_json(text: &str) -> crate::Result<Self> {
        if !text.trim_start().starts_with('{') {
            let err = <serde_json::Error as serde::de::Error>::custom("expected a JSON object");
            return Err(crate::Error::MalformedJson(err));
        }
        serde_json::from_str(text).map_err(crate::Error::MalformedJson)
    }
}
