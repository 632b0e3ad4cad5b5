//! Conversion engine.
//!
//! Four directional transforms between Markdown, HTML and the JSON
//! document model. All of them are pure functions over their input and
//! hold no shared state, so they can be called back-to-back or from
//! several threads without coordination.

mod html_markdown;
mod inline;
mod ir_builder;
mod ir_writer;
mod markdown_html;
mod placeholder;

pub use html_markdown::html_to_markdown;
pub use ir_builder::{markdown_to_document, LineKind, ParseState};
pub use ir_writer::document_to_markdown;
pub use markdown_html::markdown_to_html;

pub(crate) use markdown_html::escape_html;

use crate::error::{Error, Result};
use crate::model::DocumentRoot;
use crate::options::ConvertOptions;
use rayon::prelude::*;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// A conversion direction, as offered by the conversion selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversionKind {
    /// Markdown → HTML
    MarkdownToHtml,
    /// HTML → Markdown
    HtmlToMarkdown,
    /// Markdown → JSON document model
    MarkdownToJson,
    /// JSON document model → Markdown
    JsonToMarkdown,
}

impl ConversionKind {
    /// All conversion kinds in selector order.
    pub const ALL: [ConversionKind; 4] = [
        ConversionKind::MarkdownToHtml,
        ConversionKind::HtmlToMarkdown,
        ConversionKind::MarkdownToJson,
        ConversionKind::JsonToMarkdown,
    ];

    /// Returns the selector name, e.g. `md-to-html`.
    pub fn name(&self) -> &'static str {
        match self {
            ConversionKind::MarkdownToHtml => "md-to-html",
            ConversionKind::HtmlToMarkdown => "html-to-md",
            ConversionKind::MarkdownToJson => "md-to-json",
            ConversionKind::JsonToMarkdown => "json-to-md",
        }
    }

    /// Returns a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ConversionKind::MarkdownToHtml => "Markdown → HTML",
            ConversionKind::HtmlToMarkdown => "HTML → Markdown",
            ConversionKind::MarkdownToJson => "Markdown → JSON",
            ConversionKind::JsonToMarkdown => "JSON → Markdown",
        }
    }

    /// Returns the opposite direction.
    pub fn swapped(&self) -> Self {
        match self {
            ConversionKind::MarkdownToHtml => ConversionKind::HtmlToMarkdown,
            ConversionKind::HtmlToMarkdown => ConversionKind::MarkdownToHtml,
            ConversionKind::MarkdownToJson => ConversionKind::JsonToMarkdown,
            ConversionKind::JsonToMarkdown => ConversionKind::MarkdownToJson,
        }
    }
}

impl fmt::Display for ConversionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConversionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ConversionKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnsupportedConversion(s.to_string()))
    }
}

/// Serializes the document tree built from Markdown as JSON text.
pub fn markdown_to_json_string(markdown: &str, options: &ConvertOptions) -> Result<String> {
    markdown_to_document(markdown, options).to_json(options.pretty_json)
}

/// Parses JSON text as a document and writes it back to Markdown.
///
/// Text that is not a valid document yields [`Error::MalformedJson`] and
/// the tree writer is never invoked.
pub fn json_text_to_markdown(json: &str, options: &ConvertOptions) -> Result<String> {
    let document = DocumentRoot::from_json(json)?;
    Ok(document_to_markdown(&document, options))
}

/// Runs one conversion with the given options.
pub fn convert_with_options(
    kind: ConversionKind,
    input: &str,
    options: &ConvertOptions,
) -> Result<String> {
    debug!(%kind, input_len = input.len(), "converting");

    let output = match kind {
        ConversionKind::MarkdownToHtml => markdown_to_html(input, options),
        ConversionKind::HtmlToMarkdown => html_to_markdown(input),
        ConversionKind::MarkdownToJson => markdown_to_json_string(input, options)?,
        ConversionKind::JsonToMarkdown => json_text_to_markdown(input, options)?,
    };

    debug!(%kind, output_len = output.len(), "conversion finished");
    Ok(output)
}

/// Runs one conversion with default options.
pub fn convert(kind: ConversionKind, input: &str) -> Result<String> {
    convert_with_options(kind, input, &ConvertOptions::default())
}

/// Converts using a selector name and always returns displayable text.
///
/// Failures are turned into their user message ("invalid JSON input",
/// "unsupported conversion type", ...) instead of being propagated.
pub fn convert_or_message(selector: &str, input: &str, options: &ConvertOptions) -> String {
    let result = selector
        .parse::<ConversionKind>()
        .and_then(|kind| convert_with_options(kind, input, options));

    match result {
        Ok(output) => output,
        Err(err) => {
            warn!(selector, error = %err, "conversion failed");
            err.user_message()
        }
    }
}

/// Converts many independent inputs, in parallel when enabled.
pub fn convert_batch<S>(
    kind: ConversionKind,
    inputs: &[S],
    options: &ConvertOptions,
) -> Vec<Result<String>>
where
    S: AsRef<str> + Sync,
{
    if options.parallel {
        inputs
            .par_iter()
            .map(|input| convert_with_options(kind, input.as_ref(), options))
            .collect()
    } else {
        inputs
            .iter()
            .map(|input| convert_with_options(kind, input.as_ref(), options))
            .collect()
    }
}
