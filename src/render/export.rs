//! Export artifacts: standalone HTML, Markdown and plain text files.

use crate::convert::{escape_html, markdown_to_html};
use crate::error::{Error, Result};
use crate::options::ConvertOptions;
use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::debug;

static RE_MERMAID_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```mermaid\r?\n.*?```").unwrap());

/// Replacement for diagrams in plain text exports.
pub const DIAGRAM_PLACEHOLDER: &str = "[Chart content omitted]";

const STYLESHEET: &str = r#"        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans', Helvetica, Arial, sans-serif;
            line-height: 1.6;
            color: #1f2937;
            max-width: 800px;
            margin: 0 auto;
            padding: 40px 20px;
            background: #ffffff;
        }
        h1, h2, h3, h4, h5, h6 { margin-top: 24px; margin-bottom: 16px; font-weight: 600; line-height: 1.25; }
        h1 { font-size: 2em; border-bottom: 1px solid #e5e7eb; padding-bottom: 10px; }
        h2 { font-size: 1.5em; border-bottom: 1px solid #e5e7eb; padding-bottom: 8px; }
        h3 { font-size: 1.25em; }
        p { margin-bottom: 16px; }
        ul, ol { margin-bottom: 16px; padding-left: 2em; }
        li { margin-bottom: 4px; }
        code {
            background: #f3f4f6;
            padding: 2px 4px;
            border-radius: 4px;
            font-family: 'SFMono-Regular', Consolas, 'Liberation Mono', Menlo, monospace;
            font-size: 0.875em;
        }
        pre { background: #f3f4f6; padding: 16px; border-radius: 8px; overflow-x: auto; margin-bottom: 16px; }
        pre code { background: none; padding: 0; }
        a { color: #3b82f6; text-decoration: none; }
        a:hover { text-decoration: underline; }
        img { max-width: 100%; height: auto; border-radius: 8px; }
        .mermaid { text-align: center; margin: 20px 0; background: #f9fafb; padding: 20px; border-radius: 8px; border: 1px solid #e5e7eb; }
"#;

/// Output format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// Standalone HTML document
    Html,
    /// Markdown source
    Markdown,
    /// Plain text with diagrams omitted
    Text,
}

impl ExportFormat {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Html => "html",
            ExportFormat::Markdown => "md",
            ExportFormat::Text => "txt",
        }
    }

    /// MIME type handed to the file-save collaborator.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Html => "text/html;charset=utf-8",
            ExportFormat::Markdown => "text/markdown;charset=utf-8",
            ExportFormat::Text => "text/plain;charset=utf-8",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" | "htm" => Ok(ExportFormat::Html),
            "md" | "markdown" => Ok(ExportFormat::Markdown),
            "txt" | "text" => Ok(ExportFormat::Text),
            other => Err(Error::Export(format!("unknown export format: {other}"))),
        }
    }
}

/// Options for exports.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// `<title>` of HTML exports
    pub title: String,
    /// File name without extension
    pub file_stem: String,
    /// Embed the default stylesheet in HTML exports
    pub include_stylesheet: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            title: "Exported Markdown Document".to_string(),
            file_stem: "document".to_string(),
            include_stylesheet: true,
        }
    }
}

impl ExportOptions {
    /// Creates default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTML title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the file name stem.
    pub fn with_file_stem(mut self, stem: impl Into<String>) -> Self {
        self.file_stem = stem.into();
        self
    }

    /// Omits the embedded stylesheet.
    pub fn without_stylesheet(mut self) -> Self {
        self.include_stylesheet = false;
        self
    }
}

/// A file ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Suggested file name
    pub file_name: String,
    /// MIME type of `bytes`
    pub mime_type: &'static str,
    /// File contents
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// Contents as text; exports are always UTF-8.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.bytes).unwrap_or_default()
    }
}

/// Builds an export artifact from Markdown.
pub fn export(markdown: &str, format: ExportFormat, options: &ExportOptions) -> ExportArtifact {
    let contents = match format {
        ExportFormat::Html => html_document(markdown, options),
        ExportFormat::Markdown => markdown.to_string(),
        ExportFormat::Text => strip_diagrams(markdown),
    };

    let artifact = ExportArtifact {
        file_name: format!("{}.{}", options.file_stem, format.extension()),
        mime_type: format.mime_type(),
        bytes: contents.into_bytes(),
    };
    debug!(file = %artifact.file_name, bytes = artifact.bytes.len(), "built export");
    artifact
}

/// Wraps converted Markdown in a standalone HTML5 document.
pub fn html_document(markdown: &str, options: &ExportOptions) -> String {
    let body = markdown_to_html(markdown, &ConvertOptions::default());
    let style = if options.include_stylesheet {
        format!("    <style>\n{STYLESHEET}    </style>\n")
    } else {
        String::new()
    };

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n    <meta charset=\"UTF-8\">\n    \
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n    \
         <title>{title}</title>\n{style}</head>\n<body>\n{body}\n</body>\n</html>\n",
        title = escape_html(&options.title),
    )
}

/// Replaces every fenced diagram block with a placeholder.
pub fn strip_diagrams(markdown: &str) -> String {
    RE_MERMAID_BLOCK
        .replace_all(markdown, DIAGRAM_PLACEHOLDER)
        .into_owned()
}

/// Destination for export artifacts.
pub trait ExportSink {
    /// Delivers one artifact.
    fn deliver(&mut self, artifact: &ExportArtifact) -> Result<()>;
}

/// Collects artifacts in memory.
impl ExportSink for Vec<ExportArtifact> {
    fn deliver(&mut self, artifact: &ExportArtifact) -> Result<()> {
        self.push(artifact.clone());
        Ok(())
    }
}

/// Writes artifacts as files into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    /// Creates a sink for `dir`. The directory is created on first delivery.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths written so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Path an artifact will be written to.
    pub fn path_for(&self, artifact: &ExportArtifact) -> Result<PathBuf> {
        let name = Path::new(&artifact.file_name);
        let is_plain_name = name.file_name().is_some_and(|n| n == name.as_os_str());
        if !is_plain_name {
            return Err(Error::Export(format!("invalid file name: {}", artifact.file_name)));
        }
        Ok(self.dir.join(name))
    }
}

impl ExportSink for DirectorySink {
    fn deliver(&mut self, artifact: &ExportArtifact) -> Result<()> {
        let path = self.path_for(artifact)?;
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(&path, &artifact.bytes)?;
        debug!(path = %path.display(), "wrote export");
        self.written.push(path);
        Ok(())
    }
}
