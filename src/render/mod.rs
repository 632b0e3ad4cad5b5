//! Preview rendering and file export.

mod export;
mod preview;

pub use export::{
    export, html_document, strip_diagrams, DirectorySink, ExportArtifact, ExportFormat,
    ExportOptions, ExportSink, DIAGRAM_PLACEHOLDER,
};
pub use preview::{
    append_diagram, DeferredDiagrams, DiagramRenderer, Preview, PreviewRenderer,
    DIAGRAM_LANGUAGE,
};

use crate::error::Result;
use std::io::Write;
use std::path::Path;

/// Exports Markdown and writes the artifact to a file.
pub fn export_to_file(
    markdown: &str,
    format: ExportFormat,
    path: impl AsRef<Path>,
    options: &ExportOptions,
) -> Result<()> {
    let artifact = export(markdown, format, options);
    std::fs::write(path, &artifact.bytes)?;
    Ok(())
}

/// Exports Markdown and writes the artifact to a writer.
pub fn export_to_writer<W: Write>(
    markdown: &str,
    format: ExportFormat,
    writer: &mut W,
    options: &ExportOptions,
) -> Result<()> {
    let artifact = export(markdown, format, options);
    writer.write_all(&artifact.bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_to_writer() {
        let mut buffer = Vec::new();
        export_to_writer(
            "a\n```mermaid\nx\n```",
            ExportFormat::Text,
            &mut buffer,
            &ExportOptions::default(),
        )
        .unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "a\n[Chart content omitted]");
    }

    #[test]
    fn test_export_to_file() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        export_to_file("# T", ExportFormat::Html, temp.path(), &ExportOptions::default()).unwrap();
        let html = std::fs::read_to_string(temp.path()).unwrap();
        assert!(html.contains("<h1>T</h1>"));
    }
}
