//! Markdown → document model.
//!
//! A line-oriented pass driven by [`ParseState`]. Parsing is lenient: every
//! line is accepted, and anything unrecognized becomes a paragraph.

use crate::model::{ContentNode, DocumentRoot, HeadingNode, ListNode};
use crate::options::ConvertOptions;
use tracing::{debug, trace};

/// How a single trimmed line was interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Empty after trimming
    Blank,
    /// Opening or closing code fence
    Fence,
    /// Inside a fenced code block; not represented in the tree
    FencedContent,
    /// Opened a new heading section
    Heading,
    /// Appended to the pending list
    ListItem,
    /// Became a paragraph node
    Paragraph,
}

/// Mutable state of the Markdown → tree builder.
#[derive(Debug, Default)]
pub struct ParseState {
    content: Vec<ContentNode>,
    /// Index in `content` of the heading that receives paragraphs
    current_heading: Option<usize>,
    pending_list: Vec<String>,
    in_fence: bool,
}

impl ParseState {
    /// Creates an empty parse state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one source line and reports how it was interpreted.
    pub fn process_line(&mut self, line: &str) -> LineKind {
        let line = line.trim();

        if line.starts_with("```") {
            if !self.in_fence {
                self.flush_list();
            }
            self.in_fence = !self.in_fence;
            return LineKind::Fence;
        }

        if self.in_fence {
            return LineKind::FencedContent;
        }

        if line.is_empty() {
            return LineKind::Blank;
        }

        if line.starts_with('#') {
            self.flush_list();

            let level = line.chars().take_while(|&c| c == '#').count();
            let title = line[level..].trim_start();
            let level = u8::try_from(level).unwrap_or(u8::MAX);

            self.content
                .push(ContentNode::Heading(HeadingNode::new(level, title)));
            self.current_heading = Some(self.content.len() - 1);
            return LineKind::Heading;
        }

        if let Some(item) = list_item_text(line) {
            self.pending_list.push(item.to_string());
            return LineKind::ListItem;
        }

        self.flush_list();
        let paragraph = ContentNode::paragraph(line);
        match self.current_heading.and_then(|i| self.content.get_mut(i)) {
            Some(ContentNode::Heading(heading)) => heading.children.push(paragraph),
            _ => self.content.push(paragraph),
        }
        LineKind::Paragraph
    }

    /// Returns true while inside a fenced code block.
    pub fn in_fence(&self) -> bool {
        self.in_fence
    }

    /// Returns the number of list items waiting to be flushed.
    pub fn pending_items(&self) -> usize {
        self.pending_list.len()
    }

    /// Flushes any pending list and returns the built content.
    pub fn finish(mut self) -> Vec<ContentNode> {
        self.flush_list();
        self.content
    }

    fn flush_list(&mut self) {
        if !self.pending_list.is_empty() {
            let items = std::mem::take(&mut self.pending_list);
            self.content.push(ContentNode::List(ListNode { items }));
        }
    }
}

/// Returns the item text for `*`, `-` or `N.` lines.
fn list_item_text(line: &str) -> Option<&str> {
    if let Some(rest) = line.strip_prefix(['*', '-']) {
        return Some(rest.trim_start());
    }

    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        return line[digits..].strip_prefix('.').map(str::trim_start);
    }
    None
}

/// Builds a document tree from Markdown.
pub fn markdown_to_document(markdown: &str, options: &ConvertOptions) -> DocumentRoot {
    let mut state = ParseState::new();

    for (number, line) in markdown.split('\n').enumerate() {
        let kind = state.process_line(line);
        trace!(line = number + 1, ?kind, "classified line");
    }

    let content = state.finish();
    debug!(nodes = content.len(), "built document tree");

    DocumentRoot {
        metadata: Default::default(),
        raw: if options.keep_raw {
            markdown.to_string()
        } else {
            String::new()
        },
        content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(markdown: &str) -> Vec<ContentNode> {
        markdown_to_document(markdown, &ConvertOptions::default()).content
    }

    #[test]
    fn test_list_closes_at_first_non_list_line() {
        assert_eq!(
            build("* a\n* b\n\ntext"),
            vec![ContentNode::list(["a", "b"]), ContentNode::paragraph("text")]
        );
    }

    #[test]
    fn test_blank_line_keeps_list_open() {
        assert_eq!(build("* a\n\n* b"), vec![ContentNode::list(["a", "b"])]);
    }

    #[test]
    fn test_heading_collects_paragraphs() {
        let content = build("# Title\nfirst\nsecond\n## Next\nthird");
        assert_eq!(content.len(), 2);

        let mut title = HeadingNode::new(1, "Title");
        title.children = vec![ContentNode::paragraph("first"), ContentNode::paragraph("second")];
        let mut next = HeadingNode::new(2, "Next");
        next.children = vec![ContentNode::paragraph("third")];

        assert_eq!(
            content,
            vec![ContentNode::Heading(title), ContentNode::Heading(next)]
        );
    }

    #[test]
    fn test_heading_closes_list() {
        let content = build("* a\n# H");
        assert_eq!(
            content,
            vec![ContentNode::list(["a"]), ContentNode::heading(1, "H")]
        );
    }

    #[test]
    fn test_list_after_heading_is_top_level() {
        let content = build("# H\n- x\n- y\nafter");
        let mut heading = HeadingNode::new(1, "H");
        heading.children.push(ContentNode::paragraph("after"));
        assert_eq!(
            content,
            vec![ContentNode::Heading(heading), ContentNode::list(["x", "y"])]
        );
    }

    #[test]
    fn test_ordered_items() {
        assert_eq!(
            build("1. one\n10. ten"),
            vec![ContentNode::list(["one", "ten"])]
        );
    }

    #[test]
    fn test_heading_level_from_run() {
        assert_eq!(build("### Three"), vec![ContentNode::heading(3, "Three")]);
        assert_eq!(build("#NoSpace"), vec![ContentNode::heading(1, "NoSpace")]);
        assert_eq!(build("######## Eight"), vec![ContentNode::heading(6, "Eight")]);
    }

    #[test]
    fn test_fenced_code_skipped() {
        let content = build("before\n```\n* not a list\n# not a heading\n```\nafter");
        assert_eq!(
            content,
            vec![ContentNode::paragraph("before"), ContentNode::paragraph("after")]
        );
    }

    #[test]
    fn test_fence_flushes_list() {
        let content = build("* a\n```\ncode\n```\n* b");
        assert_eq!(
            content,
            vec![ContentNode::list(["a"]), ContentNode::list(["b"])]
        );
    }

    #[test]
    fn test_end_of_input_flushes_list() {
        let mut state = ParseState::new();
        assert_eq!(state.process_line("* a"), LineKind::ListItem);
        assert_eq!(state.pending_items(), 1);
        assert_eq!(state.finish(), vec![ContentNode::list(["a"])]);
    }

    #[test]
    fn test_process_line_kinds() {
        let mut state = ParseState::new();
        assert_eq!(state.process_line("   "), LineKind::Blank);
        assert_eq!(state.process_line("```rust"), LineKind::Fence);
        assert!(state.in_fence());
        assert_eq!(state.process_line("let x = 1;"), LineKind::FencedContent);
        assert_eq!(state.process_line("```"), LineKind::Fence);
        assert!(!state.in_fence());
        assert_eq!(state.process_line("# H"), LineKind::Heading);
        assert_eq!(state.process_line("text"), LineKind::Paragraph);
    }

    #[test]
    fn test_raw_kept_verbatim() {
        let source = "# T\r\n\n  odd   spacing  \n";
        let doc = markdown_to_document(source, &ConvertOptions::default());
        assert_eq!(doc.raw, source);
        assert_eq!(doc.paragraphs(), vec!["odd   spacing"]);

        let doc = markdown_to_document(source, &ConvertOptions::default().without_raw());
        assert!(doc.raw.is_empty());
    }

    #[test]
    fn test_lenient_never_rejects() {
        let doc = markdown_to_document("<<>>\n\u{0}\n]]]", &ConvertOptions::default());
        assert_eq!(doc.content.len(), 3);
    }
}
