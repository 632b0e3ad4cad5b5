//! # mdkit
//!
//! Markdown transcoding for editor front-ends: Markdown ↔ HTML ↔ a JSON
//! document tree, text statistics, and the bookkeeping behind a
//! side-by-side editor with a synchronized preview.
//!
//! ## Quick Start
//!
//! ```
//! use mdkit::{markdown_to_html, html_to_markdown};
//!
//! let html = markdown_to_html("# Title\n\nSome **bold** text.");
//! assert_eq!(html, "<h1>Title</h1>\n<p>Some <strong>bold</strong> text.</p>");
//!
//! let markdown = html_to_markdown(&html);
//! assert_eq!(markdown, "# Title\n\nSome **bold** text.");
//! ```
//!
//! ## Modules
//!
//! - [`convert`]: the four conversion directions and the conversion selector
//! - [`model`]: the JSON document tree
//! - [`stats`]: word, character, line and paragraph counts
//! - [`sync`]: editor/preview scroll synchronization
//! - [`debounce`]: quiet-period coalescing of edits
//! - [`render`]: full preview rendering and file export
//!
//! ## Features
//!
//! - `async`: Async file conversion and export with Tokio

pub mod convert;
pub mod debounce;
pub mod error;
pub mod model;
pub mod options;
pub mod render;
pub mod stats;
pub mod sync;

#[cfg(feature = "async")]
pub mod async_api;

// Re-exports
pub use convert::{convert_batch, convert_or_message, convert_with_options, ConversionKind};
pub use debounce::{Debouncer, DEFAULT_PREVIEW_QUIET};
pub use error::{Error, Result};
pub use model::{ContentNode, DocumentRoot};
pub use options::ConvertOptions;
pub use render::{export, ExportArtifact, ExportFormat, ExportOptions, PreviewRenderer};
pub use stats::TextStats;
pub use sync::{compute_scroll_sync, ScrollMetrics, ScrollSyncController, SyncOptions, SyncOutcome};

use std::path::Path;

/// Converts Markdown to an HTML fragment with default options.
pub fn markdown_to_html(markdown: &str) -> String {
    convert::markdown_to_html(markdown, &ConvertOptions::default())
}

/// Converts HTML to Markdown.
pub fn html_to_markdown(html: &str) -> String {
    convert::html_to_markdown(html)
}

/// Builds the JSON document tree for Markdown, keeping the source in `raw`.
///
/// # Example
///
/// ```
/// use mdkit::{markdown_to_json, ContentNode};
///
/// let doc = markdown_to_json("* a\n* b\n\ntext");
/// assert_eq!(doc.content, vec![ContentNode::list(["a", "b"]), ContentNode::paragraph("text")]);
/// ```
pub fn markdown_to_json(markdown: &str) -> DocumentRoot {
    convert::markdown_to_document(markdown, &ConvertOptions::default())
}

/// Writes a document tree back to Markdown.
pub fn json_to_markdown(document: &DocumentRoot) -> String {
    convert::document_to_markdown(document, &ConvertOptions::default())
}

/// Computes text statistics at the default reading rate.
pub fn text_stats(text: &str) -> TextStats {
    TextStats::analyze(text)
}

/// Converts with a selector name, e.g. `"md-to-html"`.
///
/// Never fails: errors come back as their user-visible message.
///
/// # Example
///
/// ```
/// assert_eq!(mdkit::convert("json-to-md", "{bad json"), "invalid JSON input");
/// assert_eq!(mdkit::convert("md-to-html", "# Hi"), "<h1>Hi</h1>");
/// ```
pub fn convert(selector: &str, input: &str) -> String {
    convert_or_message(selector, input, &ConvertOptions::default())
}

/// Reads a file and converts its contents.
///
/// # Example
///
/// ```no_run
/// use mdkit::{convert_file, ConversionKind};
///
/// let html = convert_file("README.md", ConversionKind::MarkdownToHtml)?;
/// std::fs::write("README.html", html)?;
/// # Ok::<(), mdkit::Error>(())
/// ```
pub fn convert_file(path: impl AsRef<Path>, kind: ConversionKind) -> Result<String> {
    let input = std::fs::read_to_string(path)?;
    convert_with_options(kind, &input, &ConvertOptions::default())
}

/// Builder for configured conversions.
///
/// # Example
///
/// ```
/// use mdkit::{ConversionKind, Transcoder};
///
/// let json = Transcoder::new()
///     .compact_json()
///     .without_raw()
///     .convert(ConversionKind::MarkdownToJson, "# T")?;
/// assert_eq!(json, r#"{"metadata":{},"raw":"","content":[{"type":"heading","level":1,"title":"T","children":[]}]}"#);
/// # Ok::<(), mdkit::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Transcoder {
    options: ConvertOptions,
}

impl Transcoder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder from existing options.
    pub fn with_options(options: ConvertOptions) -> Self {
        Self { options }
    }

    /// Emits compact JSON.
    pub fn compact_json(mut self) -> Self {
        self.options = self.options.compact_json();
        self
    }

    /// Leaves `raw` empty in produced documents.
    pub fn without_raw(mut self) -> Self {
        self.options = self.options.without_raw();
        self
    }

    /// Always rebuilds Markdown from the tree.
    pub fn without_raw_shortcut(mut self) -> Self {
        self.options = self.options.without_raw_shortcut();
        self
    }

    /// Sets the list marker used when rebuilding Markdown.
    pub fn with_list_marker(mut self, marker: char) -> Self {
        self.options = self.options.with_list_marker(marker);
        self
    }

    /// Sets the class prefix for code languages.
    pub fn with_code_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.options = self.options.with_code_class_prefix(prefix);
        self
    }

    /// Disables parallel batch conversion.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Returns the configured options.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Runs one conversion.
    pub fn convert(&self, kind: ConversionKind, input: &str) -> Result<String> {
        convert_with_options(kind, input, &self.options)
    }

    /// Runs one conversion chosen by selector name, never failing.
    pub fn convert_or_message(&self, selector: &str, input: &str) -> String {
        convert_or_message(selector, input, &self.options)
    }

    /// Converts many inputs.
    pub fn convert_batch<S: AsRef<str> + Sync>(
        &self,
        kind: ConversionKind,
        inputs: &[S],
    ) -> Vec<Result<String>> {
        convert_batch(kind, inputs, &self.options)
    }

    /// Builds a document tree.
    pub fn document(&self, markdown: &str) -> DocumentRoot {
        convert::markdown_to_document(markdown, &self.options)
    }

    /// Writes a document tree back to Markdown.
    pub fn markdown(&self, document: &DocumentRoot) -> String {
        convert::document_to_markdown(document, &self.options)
    }
}
