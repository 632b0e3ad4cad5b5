//! Async API for non-blocking file conversion.
//!
//! Enable the `async` feature to use these APIs:
//!
//! ```toml
//! [dependencies]
//! mdkit = { version = "0.1", features = ["async"] }
//! ```

use crate::convert::{convert_with_options, ConversionKind};
use crate::error::{Error, Result};
use crate::options::ConvertOptions;
use crate::render::{export, DirectorySink, ExportFormat, ExportOptions, ExportSink};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt};

fn join_error(e: tokio::task::JoinError) -> Error {
    Error::Io(std::io::Error::other(e.to_string()))
}

/// Asynchronously reads a file and converts its contents.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> mdkit::Result<()> {
/// use mdkit::ConversionKind;
///
/// let html = mdkit::async_api::convert_file("README.md", ConversionKind::MarkdownToHtml).await?;
/// tokio::fs::write("README.html", html).await?;
/// # Ok(())
/// # }
/// ```
pub async fn convert_file(path: impl AsRef<Path>, kind: ConversionKind) -> Result<String> {
    convert_file_with_options(path, kind, &ConvertOptions::default()).await
}

/// Asynchronously reads a file and converts it with custom options.
pub async fn convert_file_with_options(
    path: impl AsRef<Path>,
    kind: ConversionKind,
    options: &ConvertOptions,
) -> Result<String> {
    let input = fs::read_to_string(path).await?;
    convert_text(input, kind, options).await
}

/// Asynchronously converts text owned by the caller.
pub async fn convert_text(
    input: String,
    kind: ConversionKind,
    options: &ConvertOptions,
) -> Result<String> {
    // Conversion is CPU-bound, so it runs on the blocking pool
    let options = options.clone();
    tokio::task::spawn_blocking(move || convert_with_options(kind, &input, &options))
        .await
        .map_err(join_error)?
}

/// Asynchronously converts everything an async reader yields.
pub async fn convert_reader<R: AsyncRead + Unpin>(
    mut reader: R,
    kind: ConversionKind,
) -> Result<String> {
    let mut input = String::new();
    reader.read_to_string(&mut input).await?;
    convert_text(input, kind, &ConvertOptions::default()).await
}

/// Asynchronously exports Markdown into a directory.
///
/// Returns the path of the written file.
pub async fn export_to_dir(
    markdown: &str,
    format: ExportFormat,
    dir: impl AsRef<Path>,
) -> Result<PathBuf> {
    export_to_dir_with_options(markdown, format, dir, &ExportOptions::default()).await
}

/// Asynchronously exports Markdown into a directory with custom options.
pub async fn export_to_dir_with_options(
    markdown: &str,
    format: ExportFormat,
    dir: impl AsRef<Path>,
    options: &ExportOptions,
) -> Result<PathBuf> {
    let sink = DirectorySink::new(dir.as_ref());
    let sink = export_to_sink(markdown.to_string(), format, options.clone(), sink).await?;

    sink.written()
        .last()
        .cloned()
        .ok_or_else(|| Error::Export("no file was written".to_string()))
}

/// Asynchronously delivers an export to any sink.
pub async fn export_to_sink<S>(
    markdown: String,
    format: ExportFormat,
    options: ExportOptions,
    mut sink: S,
) -> Result<S>
where
    S: ExportSink + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let artifact = export(&markdown, format, &options);
        sink.deliver(&artifact)?;
        Ok(sink)
    })
    .await
    .map_err(join_error)?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::ExportArtifact;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_convert_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("doc.md");
        fs::write(&path, "# Title").await.unwrap();

        let html = convert_file(&path, ConversionKind::MarkdownToHtml).await.unwrap();
        assert_eq!(html, "<h1>Title</h1>");
    }

    #[tokio::test]
    async fn test_convert_file_missing() {
        let result = convert_file("/nonexistent/doc.md", ConversionKind::MarkdownToHtml).await;
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[tokio::test]
    async fn test_convert_reader_malformed_json() {
        let result = convert_reader(&b"{bad json"[..], ConversionKind::JsonToMarkdown).await;
        assert!(matches!(result, Err(Error::MalformedJson(_))));
    }

    #[tokio::test]
    async fn test_export_to_dir() {
        let temp = TempDir::new().unwrap();
        let path = export_to_dir("# Hi", ExportFormat::Html, temp.path()).await.unwrap();

        assert_eq!(path, temp.path().join("document.html"));
        let html = fs::read_to_string(path).await.unwrap();
        assert!(html.contains("<h1>Hi</h1>"));
    }

    #[tokio::test]
    async fn test_export_to_dir_creates_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("nested").join("out");
        let options = ExportOptions::new().with_file_stem("notes");

        let path = export_to_dir_with_options("# Hi", ExportFormat::Text, &dir, &options)
            .await
            .unwrap();
        assert_eq!(path, dir.join("notes.txt"));
        assert_eq!(fs::read_to_string(path).await.unwrap(), "# Hi");
    }

    #[tokio::test]
    async fn test_export_to_dir_rejects_path_stem() {
        let temp = TempDir::new().unwrap();
        let options = ExportOptions::new().with_file_stem("../escape");

        let result =
            export_to_dir_with_options("x", ExportFormat::Markdown, temp.path(), &options).await;
        assert!(matches!(result, Err(Error::Export(_))));
        assert!(!temp.path().join("../escape.md").exists());
    }

    #[tokio::test]
    async fn test_export_to_memory_sink() {
        let sink = export_to_sink(
            "# Hi".to_string(),
            ExportFormat::Markdown,
            ExportOptions::default(),
            Vec::<ExportArtifact>::new(),
        )
        .await
        .unwrap();
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].as_str(), "# Hi");
    }
}
