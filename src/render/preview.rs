//! Full Markdown preview with a pluggable diagram sub-renderer.
//!
//! The preview is rendered with pulldown-cmark, which covers far more of
//! CommonMark than the converter. Fenced blocks tagged with the diagram
//! language are handed to a [`DiagramRenderer`]; if it cannot render, the
//! block stays a plain code block and the rest of the document renders as
//! usual.

use crate::convert::escape_html;
use crate::error::Result;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use tracing::{debug, warn};

/// Fence language routed to the diagram renderer.
pub const DIAGRAM_LANGUAGE: &str = "mermaid";

/// Turns diagram source into an HTML fragment.
pub trait DiagramRenderer {
    /// Renders one diagram.
    ///
    /// [`crate::Error::RendererUnavailable`] means the renderer is not ready.
    fn render(&self, source: &str) -> Result<String>;
}

impl<F> DiagramRenderer for F
where
    F: Fn(&str) -> Result<String>,
{
    fn render(&self, source: &str) -> Result<String> {
        self(source)
    }
}

/// Leaves diagrams for client-side rendering.
///
/// Emits `<div class="mermaid">` with the escaped source.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeferredDiagrams;

impl DiagramRenderer for DeferredDiagrams {
    fn render(&self, source: &str) -> Result<String> {
        Ok(format!(
            "<div class=\"mermaid\">{}</div>\n",
            escape_html(source.trim_end_matches('\n'))
        ))
    }
}

/// Result of rendering a preview.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Preview {
    /// Rendered HTML
    pub html: String,
    /// Diagrams rendered by the sub-renderer
    pub diagrams: usize,
    /// Diagrams that fell back to a code block
    pub degraded: usize,
}

/// Markdown preview renderer.
pub struct PreviewRenderer {
    options: Options,
    diagrams: Box<dyn DiagramRenderer + Send + Sync>,
}

impl std::fmt::Debug for PreviewRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewRenderer")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Default for PreviewRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewRenderer {
    /// Creates a renderer with tables, strikethrough and task lists enabled.
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        Self {
            options,
            diagrams: Box::new(DeferredDiagrams),
        }
    }

    /// Replaces the diagram sub-renderer.
    pub fn with_diagram_renderer<R>(mut self, renderer: R) -> Self
    where
        R: DiagramRenderer + Send + Sync + 'static,
    {
        self.diagrams = Box::new(renderer);
        self
    }

    /// Renders Markdown to HTML.
    pub fn render(&self, markdown: &str) -> String {
        self.render_preview(markdown).html
    }

    /// Renders Markdown and reports how diagrams were handled.
    pub fn render_preview(&self, markdown: &str) -> Preview {
        let mut preview = Preview::default();
        let mut events: Vec<Event> = Vec::new();
        let mut diagram: Option<Vec<Event>> = None;

        for event in Parser::new_ext(markdown, self.options) {
            if let Some(buffered) = diagram.as_mut() {
                let closes = matches!(event, Event::End(TagEnd::CodeBlock));
                buffered.push(event);
                if closes {
                    if let Some(buffered) = diagram.take() {
                        self.emit_diagram(buffered, &mut events, &mut preview);
                    }
                }
                continue;
            }

            if let Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) = &event {
                if is_diagram(info) {
                    diagram = Some(vec![event]);
                    continue;
                }
            }
            events.push(event);
        }

        if let Some(buffered) = diagram {
            events.extend(buffered);
        }

        html::push_html(&mut preview.html, events.into_iter());
        debug!(
            diagrams = preview.diagrams,
            degraded = preview.degraded,
            "rendered preview"
        );
        preview
    }

    fn emit_diagram<'a>(
        &self,
        buffered: Vec<Event<'a>>,
        events: &mut Vec<Event<'a>>,
        preview: &mut Preview,
    ) {
        let source: String = buffered
            .iter()
            .filter_map(|event| match event {
                Event::Text(text) => Some(text.as_ref()),
                _ => None,
            })
            .collect();

        match self.diagrams.render(&source) {
            Ok(fragment) => {
                preview.diagrams += 1;
                events.push(Event::Html(CowStr::from(fragment)));
            }
            Err(err) => {
                warn!(error = %err, "diagram not rendered, keeping code block");
                preview.degraded += 1;
                events.extend(buffered);
            }
        }
    }
}

fn is_diagram(info: &str) -> bool {
    info.split_whitespace().next() == Some(DIAGRAM_LANGUAGE)
}

/// Appends a diagram block to the end of a document.
pub fn append_diagram(markdown: &str, source: &str) -> String {
    format!("{markdown}```{DIAGRAM_LANGUAGE}\n{source}\n```\n\n")
}
