//! Markdown → HTML conversion.
//!
//! Runs in stages: fenced code blocks are rendered and replaced by
//! placeholder tokens while lines are grouped into blocks, code spans are
//! protected per block, inline rules run on what remains, and the tokens
//! are restored last.

use super::inline::{protect_code_spans, render_inline};
use super::placeholder::{strip_markers, PlaceholderTable};
use crate::model::MAX_HEADING_LEVEL;
use crate::options::ConvertOptions;
use tracing::trace;

/// A block-level element recognized by the line scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Block {
    Heading { level: u8, text: String },
    Paragraph(Vec<String>),
    List { ordered: bool, items: Vec<String> },
    /// Placeholder token for an already rendered code block
    Code(String),
}

/// An open fenced code block.
#[derive(Debug)]
struct Fence {
    language: String,
    lines: Vec<String>,
}

/// Groups lines into blocks.
#[derive(Debug)]
struct BlockScanner<'a> {
    options: &'a ConvertOptions,
    table: &'a mut PlaceholderTable,
    blocks: Vec<Block>,
    paragraph: Vec<String>,
    list: Option<(bool, Vec<String>)>,
    fence: Option<Fence>,
}

impl<'a> BlockScanner<'a> {
    fn new(options: &'a ConvertOptions, table: &'a mut PlaceholderTable) -> Self {
        Self {
            options,
            table,
            blocks: Vec::new(),
            paragraph: Vec::new(),
            list: None,
            fence: None,
        }
    }

    fn push_line(&mut self, line: &str) {
        let trimmed = line.trim();

        if let Some(fence) = self.fence.as_mut() {
            if trimmed.starts_with("```") {
                self.close_fence();
            } else {
                fence.lines.push(line.to_string());
            }
            return;
        }

        if let Some(info) = trimmed.strip_prefix("```") {
            self.flush();
            self.fence = Some(Fence {
                language: fence_language(info),
                lines: Vec::new(),
            });
            return;
        }

        if trimmed.is_empty() {
            self.flush();
            return;
        }

        if let Some((level, text)) = parse_heading(trimmed) {
            self.flush();
            self.blocks.push(Block::Heading {
                level,
                text: text.to_string(),
            });
            return;
        }

        if let Some((ordered, item)) = parse_list_item(trimmed) {
            self.flush_paragraph();
            let continues = matches!(self.list, Some((current, _)) if current == ordered);
            if !continues {
                self.flush_list();
                self.list = Some((ordered, Vec::new()));
            }
            if let Some((_, items)) = self.list.as_mut() {
                items.push(item.to_string());
            }
            return;
        }

        self.flush_list();
        self.paragraph.push(trimmed.to_string());
    }

    fn close_fence(&mut self) {
        if let Some(fence) = self.fence.take() {
            let html = render_code_block(&fence, &self.options.code_class_prefix);
            let token = self.table.insert(html);
            self.blocks.push(Block::Code(token));
        }
    }

    fn flush_paragraph(&mut self) {
        if !self.paragraph.is_empty() {
            let lines = std::mem::take(&mut self.paragraph);
            self.blocks.push(Block::Paragraph(lines));
        }
    }

    fn flush_list(&mut self) {
        if let Some((ordered, items)) = self.list.take() {
            self.blocks.push(Block::List { ordered, items });
        }
    }

    fn flush(&mut self) {
        self.flush_paragraph();
        self.flush_list();
    }

    fn finish(mut self) -> Vec<Block> {
        // An unterminated fence runs to the end of the input
        self.close_fence();
        self.flush();
        self.blocks
    }
}

/// Converts Markdown to an HTML fragment.
pub fn markdown_to_html(markdown: &str, options: &ConvertOptions) -> String {
    let source = strip_markers(&markdown.replace("\r\n", "\n"));
    let mut table = PlaceholderTable::new();

    let blocks = {
        let mut scanner = BlockScanner::new(options, &mut table);
        for line in source.split('\n') {
            scanner.push_line(line);
        }
        scanner.finish()
    };
    trace!(blocks = blocks.len(), code_blocks = table.len(), "scanned markdown blocks");

    let rendered: Vec<String> = blocks
        .iter()
        .map(|block| render_block(block, &mut table))
        .collect();

    table.restore(&rendered.join("\n"))
}

fn render_block(block: &Block, table: &mut PlaceholderTable) -> String {
    match block {
        Block::Heading { level, text } => {
            format!("<h{level}>{}</h{level}>", render_text(text, table))
        }
        Block::Paragraph(lines) => format!("<p>{}</p>", render_text(&lines.join("\n"), table)),
        Block::List { ordered, items } => {
            let tag = if *ordered { "ol" } else { "ul" };
            let mut html = format!("<{tag}>\n");
            for item in items {
                html.push_str(&format!("<li>{}</li>\n", render_text(item, table)));
            }
            html.push_str(&format!("</{tag}>"));
            html
        }
        Block::Code(token) => token.clone(),
    }
}

fn render_text(text: &str, table: &mut PlaceholderTable) -> String {
    render_inline(&protect_code_spans(text, table))
}

fn render_code_block(fence: &Fence, class_prefix: &str) -> String {
    let mut code = escape_html(&fence.lines.join("\n"));
    if !fence.lines.is_empty() {
        code.push('\n');
    }

    if fence.language.is_empty() {
        format!("<pre><code>{}</code></pre>", code)
    } else {
        format!(
            "<pre><code class=\"{}{}\">{}</code></pre>",
            class_prefix, fence.language, code
        )
    }
}

/// Takes the leading word of a fence info string as the language.
fn fence_language(info: &str) -> String {
    info.trim()
        .chars()
        .take_while(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '+'))
        .collect()
}

/// Parses an ATX heading: 1-6 `#` followed by a space.
fn parse_heading(line: &str) -> Option<(u8, &str)> {
    let hashes = line.chars().take_while(|&c| c == '#').count();
    if hashes == 0 || hashes > MAX_HEADING_LEVEL as usize {
        return None;
    }

    let rest = &line[hashes..];
    if rest.is_empty() {
        return Some((hashes as u8, ""));
    }
    if !rest.starts_with([' ', '\t']) {
        return None;
    }
    Some((hashes as u8, rest.trim()))
}

/// Parses `* item`, `- item`, `+ item` or `N. item`.
fn parse_list_item(line: &str) -> Option<(bool, &str)> {
    for marker in ["* ", "- ", "+ "] {
        if let Some(item) = line.strip_prefix(marker) {
            return Some((false, item.trim_start()));
        }
    }

    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        if let Some(item) = line[digits..].strip_prefix(". ") {
            return Some((true, item.trim_start()));
        }
    }
    None
}

/// Escapes the HTML special characters.
pub(crate) fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(ch),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_html(markdown: &str) -> String {
        markdown_to_html(markdown, &ConvertOptions::default())
    }

    #[test]
    fn test_headings() {
        assert_eq!(to_html("# Title"), "<h1>Title</h1>");
        assert_eq!(to_html("## Sub"), "<h2>Sub</h2>");
        assert_eq!(to_html("###### Deep"), "<h6>Deep</h6>");
        assert_eq!(to_html("####### Too deep"), "<p>####### Too deep</p>");
        assert_eq!(to_html("#hashtag"), "<p>#hashtag</p>");
    }

    #[test]
    fn test_paragraphs_split_on_blank_lines() {
        assert_eq!(
            to_html("first line\nsecond line\n\nnext para"),
            "<p>first line\nsecond line</p>\n<p>next para</p>"
        );
    }

    #[test]
    fn test_contiguous_list_single_ul() {
        assert_eq!(
            to_html("* a\n* b\n* c"),
            "<ul>\n<li>a</li>\n<li>b</li>\n<li>c</li>\n</ul>"
        );
    }

    #[test]
    fn test_separate_lists() {
        let html = to_html("* a\n\ntext\n\n* b");
        assert_eq!(html.matches("<ul>").count(), 2);
        assert!(html.contains("<p>text</p>"));
    }

    #[test]
    fn test_ordered_list() {
        assert_eq!(
            to_html("1. one\n2. two"),
            "<ol>\n<li>one</li>\n<li>two</li>\n</ol>"
        );
    }

    #[test]
    fn test_list_marker_switch_starts_new_list() {
        let html = to_html("* a\n1. b");
        assert!(html.contains("<ul>\n<li>a</li>\n</ul>"));
        assert!(html.contains("<ol>\n<li>b</li>\n</ol>"));
    }

    #[test]
    fn test_fenced_code_block() {
        let html = to_html("```rust\nlet x = **y**;\n```");
        assert_eq!(
            html,
            "<pre><code class=\"language-rust\">let x = **y**;\n</code></pre>"
        );
    }

    #[test]
    fn test_fenced_code_without_language() {
        let html = to_html("```\n# not a heading\n* not a list\n```");
        assert_eq!(
            html,
            "<pre><code># not a heading\n* not a list\n</code></pre>"
        );
    }

    #[test]
    fn test_fenced_code_escaped() {
        let html = to_html("```html\n<b>&</b>\n```");
        assert!(html.contains("&lt;b&gt;&amp;&lt;/b&gt;"));
    }

    #[test]
    fn test_unterminated_fence_runs_to_end() {
        let html = to_html("text\n\n```\ncode *here*");
        assert_eq!(html, "<p>text</p>\n<pre><code>code *here*\n</code></pre>");
    }

    #[test]
    fn test_custom_code_class_prefix() {
        let options = ConvertOptions::default().with_code_class_prefix("lang-");
        let html = markdown_to_html("```py\npass\n```", &options);
        assert!(html.contains("class=\"lang-py\""));
    }

    #[test]
    fn test_inline_code_before_emphasis() {
        assert_eq!(
            to_html("run `*x*` now *please*"),
            "<p>run <code>*x*</code> now <em>please</em></p>"
        );
    }

    #[test]
    fn test_emphasis_in_heading_and_list() {
        assert_eq!(to_html("# **Bold** title"), "<h1><strong>Bold</strong> title</h1>");
        assert_eq!(
            to_html("* [link](http://a.b)"),
            "<ul>\n<li><a href=\"http://a.b\">link</a></li>\n</ul>"
        );
    }

    #[test]
    fn test_bold_line_not_a_list() {
        assert_eq!(to_html("**bold** start"), "<p><strong>bold</strong> start</p>");
    }

    #[test]
    fn test_crlf_input() {
        assert_eq!(to_html("# A\r\n\r\nb"), "<h1>A</h1>\n<p>b</p>");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(to_html(""), "");
    }

    #[test]
    fn test_parse_heading() {
        assert_eq!(parse_heading("# A"), Some((1, "A")));
        assert_eq!(parse_heading("###"), Some((3, "")));
        assert_eq!(parse_heading("#A"), None);
        assert_eq!(parse_heading("plain"), None);
    }

    #[test]
    fn test_fence_language() {
        assert_eq!(fence_language("mermaid"), "mermaid");
        assert_eq!(fence_language(" c++ title=x"), "c++");
        assert_eq!(fence_language(""), "");
    }
}
