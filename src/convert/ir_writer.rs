//! Document model → Markdown.

use crate::model::{ContentNode, DocumentRoot, MAX_HEADING_LEVEL};
use crate::options::ConvertOptions;
use tracing::trace;

/// Writes a document tree back to Markdown.
///
/// When the document still carries its source text and the raw shortcut
/// is enabled, that text is returned verbatim.
pub fn document_to_markdown(document: &DocumentRoot, options: &ConvertOptions) -> String {
    if options.raw_shortcut && !document.raw.is_empty() {
        trace!("returning raw source verbatim");
        return document.raw.clone();
    }

    let mut output = String::new();
    for node in &document.content {
        write_node(node, options, &mut output);
    }

    output.truncate(output.trim_end().len());
    output
}

fn write_node(node: &ContentNode, options: &ConvertOptions, output: &mut String) {
    match node {
        ContentNode::Heading(heading) => {
            let level = heading.level.clamp(1, MAX_HEADING_LEVEL) as usize;
            output.push_str(&"#".repeat(level));
            output.push(' ');
            output.push_str(&heading.title);
            output.push_str("\n\n");

            for child in &heading.children {
                write_node(child, options, output);
            }
        }
        ContentNode::Paragraph(paragraph) => {
            output.push_str(&paragraph.text);
            output.push_str("\n\n");
        }
        ContentNode::List(list) => {
            for item in &list.items {
                output.push(options.list_marker);
                output.push(' ');
                output.push_str(item);
                output.push('\n');
            }
            output.push('\n');
        }
        ContentNode::Unknown => {
            trace!("skipping unknown node");
        }
    }
}
