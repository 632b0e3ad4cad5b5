//! Conversion options.

use serde::Deserialize;

/// Options for controlling conversion behavior.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Whether Markdown → JSON output is indented (2 spaces).
    pub pretty_json: bool,

    /// Whether JSON → Markdown returns a non-empty `raw` field verbatim
    /// instead of rebuilding Markdown from the tree.
    pub raw_shortcut: bool,

    /// Whether Markdown → JSON records the source text in `raw`.
    pub keep_raw: bool,

    /// Marker written in front of list items when rebuilding Markdown.
    /// Default: '*'
    pub list_marker: char,

    /// Class prefix for fenced code languages in HTML output.
    /// Default: "language-"
    pub code_class_prefix: String,

    /// Whether batch conversion may use multiple threads.
    pub parallel: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            pretty_json: true,
            raw_shortcut: true,
            keep_raw: true,
            list_marker: '*',
            code_class_prefix: "language-".to_string(),
            parallel: true,
        }
    }
}

impl ConvertOptions {
    /// Creates new options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits compact JSON.
    pub fn compact_json(mut self) -> Self {
        self.pretty_json = false;
        self
    }

    /// Always rebuilds Markdown from the tree, ignoring `raw`.
    pub fn without_raw_shortcut(mut self) -> Self {
        self.raw_shortcut = false;
        self
    }

    /// Leaves `raw` empty in built documents.
    pub fn without_raw(mut self) -> Self {
        self.keep_raw = false;
        self
    }

    /// Sets the list marker used when writing Markdown.
    pub fn with_list_marker(mut self, marker: char) -> Self {
        self.list_marker = marker;
        self
    }

    /// Sets the class prefix for fenced code languages.
    pub fn with_code_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.code_class_prefix = prefix.into();
        self
    }

    /// Disables parallel batch processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ConvertOptions::default();
        assert!(options.pretty_json);
        assert!(options.raw_shortcut);
        assert!(options.keep_raw);
        assert_eq!(options.list_marker, '*');
        assert_eq!(options.code_class_prefix, "language-");
        assert!(options.parallel);
    }

    #[test]
    fn test_builder_chain() {
        let options = ConvertOptions::new()
            .compact_json()
            .without_raw_shortcut()
            .without_raw()
            .with_list_marker('-')
            .with_code_class_prefix("lang-")
            .sequential();

        assert!(!options.pretty_json);
        assert!(!options.raw_shortcut);
        assert!(!options.keep_raw);
        assert_eq!(options.list_marker, '-');
        assert_eq!(options.code_class_prefix, "lang-");
        assert!(!options.parallel);
    }

    #[test]
    fn test_deserialize_partial() {
        let options: ConvertOptions =
            serde_json::from_str(r#"{"list_marker": "-", "pretty_json": false}"#).unwrap();
        assert_eq!(options.list_marker, '-');
        assert!(!options.pretty_json);
        assert!(options.raw_shortcut);
    }
}
